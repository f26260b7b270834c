//! Plain-text month report.
//!
//! Column widths are fixed: separator lines are 70 characters, rows start
//! with `*` when the value broke a rule and a space otherwise.

use std::io::{self, Write};

use wf_core::{
    ActivityDay, ActivityTime, Record, Summary, TimeValue, WORK_MINUTES_PER_DAY, Warning, WorkDay,
};

const LINE_WIDTH: usize = 70;
const WARNING_WIDTH: usize = 58;

/// Formats minutes as `H:MM`, with a leading `-` when negative.
pub fn format_clock(minutes: i32) -> String {
    let time = TimeValue::from_minutes(minutes);
    let sign = if time.is_negative() { "-" } else { "" };
    format!("{sign}{}:{:02}", time.hours(), time.minutes())
}

/// Formats minutes as decimal hours with a two-digit fraction, e.g. `1.50`.
/// Whole hours have no fraction.
pub fn format_fraction(minutes: i32) -> String {
    let sign = if minutes < 0 { "-" } else { "" };
    let abs = minutes.unsigned_abs();
    let fraction = abs % 60 * 100 / 60;
    if fraction == 0 {
        format!("{sign}{}", abs / 60)
    } else {
        format!("{sign}{}.{fraction:02}", abs / 60)
    }
}

fn hours(minutes: i32) -> f64 {
    TimeValue::from_minutes(minutes).as_hours()
}

const fn mark(flagged: bool) -> char {
    if flagged { '*' } else { ' ' }
}

/// Splits a warning message at the last space within the column width.
fn wrap_message(message: &str) -> (&str, Option<&str>) {
    if message.chars().count() <= WARNING_WIDTH {
        return (message, None);
    }
    let split = message
        .char_indices()
        .take(WARNING_WIDTH + 1)
        .filter(|(_, c)| *c == ' ')
        .map(|(i, _)| i)
        .last();
    match split {
        Some(i) => (&message[..i], Some(message[i + 1..].trim_start())),
        None => (message, None),
    }
}

/// Writes report sections to a sink.
pub struct Renderer<'a, W: Write> {
    out: &'a mut W,
}

impl<'a, W: Write> Renderer<'a, W> {
    pub const fn new(out: &'a mut W) -> Self {
        Self { out }
    }

    /// Title, daily table, month tables and warnings.
    pub fn report(&mut self, record: &Record, summary: &Summary) -> io::Result<()> {
        writeln!(
            self.out,
            "Tidrapport {} {:04}-{:02}",
            record.employee_name, record.year, record.month
        )?;
        writeln!(self.out)?;
        self.day_table(&summary.days)?;
        self.month_tables(summary)?;
        self.warnings(&summary.warnings)
    }

    fn line(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", "-".repeat(LINE_WIDTH))
    }

    fn header(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, " {text}")?;
        self.line()
    }

    fn time_row(&mut self, flagged: bool, label: &str, minutes: i32) -> io::Result<()> {
        writeln!(
            self.out,
            "{}{label:<49}{:>7} {:>12.2}",
            mark(flagged),
            format_clock(minutes),
            hours(minutes)
        )
    }

    fn count_row(&mut self, label: &str, value: f64) -> io::Result<()> {
        writeln!(self.out, " {label:<49}{value:>20.2}")
    }

    pub fn day_table(&mut self, days: &[WorkDay]) -> io::Result<()> {
        writeln!(
            self.out,
            "{:<11}{:>10}{:>10}{:>10}{:>10}{:>10}{:>9}",
            " Datum", "Total", "Flex", "Normal", "Övertid1", "Övertid2", "Restid"
        )?;
        self.line()?;
        for day in days {
            writeln!(
                self.out,
                "{}{}{:>10}{:>10}{:>10}{:>10}{:>10}{:>9}",
                mark(day.warning),
                day.date,
                format_clock(day.total() + day.sick),
                format_clock(day.flex()),
                format_clock(day.normal + day.leave),
                format_clock(day.overtime1),
                format_clock(day.overtime2),
                format_clock(day.travel),
            )?;
        }
        self.line()
    }

    pub fn month_tables(&mut self, summary: &Summary) -> io::Result<()> {
        let totals = &summary.totals;
        let checks = &summary.checks;

        self.header("Arbetsinformation")?;
        self.count_row("Antal arbetsdagar denna månad:", f64::from(totals.weekdays))?;
        self.time_row(false, "Antal arbetstimmar denna månad:", totals.scheduled_minutes())?;
        self.line()?;

        self.header("Månadsrapport")?;
        self.time_row(false, "Normaltid denna månad:", totals.normal_without_leave())?;
        self.time_row(false, "Permissionstid denna månad:", totals.leave)?;
        self.time_row(false, "Övertid denna månad(Ö1 + Ö2):", totals.overtime())?;
        self.time_row(false, "Restid denna månad:", totals.travel)?;
        self.time_row(false, "Totalt antal arbetade timmar denna månad:", totals.total)?;
        writeln!(self.out)?;
        self.count_row("Semesterdagar denna månad:", f64::from(totals.vacation_days))?;
        self.time_row(false, "Sjuktimmar denna månad:", totals.sick)?;
        self.count_row(
            "Sjukdagar denna månad:",
            f64::from(totals.sick) / f64::from(WORK_MINUTES_PER_DAY),
        )?;
        self.line()?;

        self.header("Flex- och komptid")?;
        self.time_row(false, "Ingående komptid:", totals.opening_comp.as_minutes())?;
        self.time_row(false, "Ingående flextid:", totals.opening_flex.as_minutes())?;
        self.time_row(false, "Flextid denna månad:", totals.flex)?;
        self.time_row(false, "Komptid denna månad:", totals.closing_comp.as_minutes())?;
        self.time_row(checks.flex_out_of_range, "Flexsaldo:", totals.flex_balance())?;
        self.time_row(checks.comp_over_limit, "Kompsaldo:", totals.comp_balance())?;
        self.line()?;

        self.header("Övertid")?;
        self.time_row(false, "Ingående övertid1:", totals.opening_overtime1.as_minutes())?;
        self.time_row(false, "Ingående övertid2:", totals.opening_overtime2.as_minutes())?;
        self.time_row(false, "Övertid1 denna månad:", totals.overtime1)?;
        self.time_row(false, "Övertid2 denna månad:", totals.overtime2)?;
        self.time_row(
            checks.overtime_over_limit,
            "Total övertid denna månad:",
            totals.overtime(),
        )?;
        self.time_row(false, "Saldo för övertid1:", totals.overtime1_balance())?;
        self.time_row(false, "Saldo för övertid2:", totals.overtime2_balance())?;
        self.time_row(
            checks.overtime_and_comp_over_limit,
            "Saldo för total övertid + total komptid:",
            totals.overtime_and_comp_balance(),
        )?;
        self.line()?;

        let (paid1, paid2) = if totals.in_money {
            (totals.overtime1, totals.overtime2)
        } else {
            (0, 0)
        };
        self.header("Utbetalning")?;
        self.time_row(false, "Restid:", totals.travel)?;
        self.time_row(false, "Komptid denna månad:", totals.closing_comp.as_minutes())?;
        self.time_row(false, "Övertid1 denna månad:", paid1)?;
        self.time_row(false, "Övertid2 denna månad:", paid2)?;
        self.line()
    }

    /// The warning table; nothing when there are no warnings.
    pub fn warnings(&mut self, warnings: &[Warning]) -> io::Result<()> {
        if warnings.is_empty() {
            return Ok(());
        }
        self.header("Varningar")?;
        for warning in warnings {
            self.warning_row(warning)?;
        }
        self.line()
    }

    pub fn warning_row(&mut self, warning: &Warning) -> io::Result<()> {
        let (first, rest) = wrap_message(warning.message());
        writeln!(self.out, " {:<12}{first}", warning.date)?;
        if let Some(rest) = rest {
            writeln!(self.out, "{:13}{rest}", "")?;
        }
        Ok(())
    }

    fn activity_row(&mut self, time: &ActivityTime) -> io::Result<()> {
        writeln!(
            self.out,
            " {:<20} {:>9} {:>9} {:>9} {:>9}",
            time.activity,
            format_fraction(time.normal),
            format_fraction(time.overtime1),
            format_fraction(time.overtime2),
            format_fraction(time.travel),
        )
    }

    /// Time per activity and day; nothing when there are no activities.
    pub fn activities(&mut self, days: &[ActivityDay]) -> io::Result<()> {
        if days.is_empty() {
            return Ok(());
        }
        writeln!(self.out)?;
        writeln!(self.out)?;
        writeln!(
            self.out,
            " {:<20} {:>9} {:>9} {:>9} {:>9}",
            "Aktivitet", "Normal", "Övertid1", "Övertid2", "Restid"
        )?;
        self.line()?;

        for (i, day) in days.iter().enumerate() {
            // Week separator
            if i > 0 && day.day_name.to_lowercase().starts_with("mån") {
                writeln!(self.out)?;
                writeln!(self.out, "------")?;
            }
            // The first date follows the header line directly.
            if i > 0 {
                writeln!(self.out)?;
            }
            writeln!(self.out, "{} {}", day.date, day.day_name)?;
            for time in &day.activities {
                self.activity_row(time)?;
            }
        }
        Ok(())
    }
}
