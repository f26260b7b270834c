//! Day and month aggregation with the time-reporting rules.
//!
//! Rows are folded in file order. Consecutive rows sharing a date build one
//! [`WorkDay`]; a row with a new date finalizes the day in progress, which
//! adds it to the month totals. Rule violations become [`Warning`]s and never
//! stop the fold.
//!
//! # Rules
//!
//! Per row:
//! - `r` on a weekday must not overlap 08:30–17:00.
//! - `ö1` needs a full normal day first, must lie within 06:00–20:00 and is
//!   only allowed on weekdays.
//! - `ö2` on a weekday needs a full normal day first and must lie before
//!   06:00 or after 20:00.
//! - `sj` always warns.
//!
//! Per day (first match only): sick plus worked time above 7.5 hours, more
//! than 10 hours worked, less than 6 hours worked.
//!
//! Per month: flex balance within -10:00..=100:00, comp balance at most
//! 100:00, at most 50:00 overtime this month, overtime plus comp balances at
//! most 300:00.

use std::fmt;

use serde::Serialize;

use crate::category::Category;
use crate::date::DateValue;
use crate::record::{Record, Row};
use crate::time::TimeValue;

/// Minutes in a standard full working day (7.5 hours).
pub const WORK_MINUTES_PER_DAY: i32 = 450;

const HALF_DAY_MINUTES: i32 = WORK_MINUTES_PER_DAY / 2;
const LONG_DAY_MINUTES: i32 = 10 * 60;
const SHORT_DAY_MINUTES: i32 = 6 * 60;

const OFFICE_HOURS_START: i32 = 8 * 60 + 30;
const OFFICE_HOURS_END: i32 = 17 * 60;
const DAYTIME_START: i32 = 6 * 60;
const DAYTIME_END: i32 = 20 * 60;

const FLEX_BALANCE_MIN: i32 = -10 * 60;
const FLEX_BALANCE_MAX: i32 = 100 * 60;
const COMP_BALANCE_MAX: i32 = 100 * 60;
const MONTH_OVERTIME_MAX: i32 = 50 * 60;
const OVERTIME_AND_COMP_MAX: i32 = 300 * 60;

const WEEKDAY_PREFIXES: [&str; 5] = ["mån", "tis", "ons", "tor", "fre"];

/// Whether a row's day counts as a working weekday.
///
/// The day name decides (`mån`..`fre`; `lör`, `sön` and `röd` do not). An
/// empty name falls back to the calendar.
pub fn is_weekday(day_name: &str, date: DateValue) -> bool {
    if day_name.is_empty() {
        return date.is_calendar_weekday().unwrap_or(false);
    }
    let name = day_name.to_lowercase();
    WEEKDAY_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
}

/// Totals for one date, built from that date's consecutive rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkDay {
    pub date: DateValue,
    pub day_name: String,
    pub normal: i32,
    pub overtime1: i32,
    pub overtime2: i32,
    pub travel: i32,
    pub sick: i32,
    pub leave: i32,
    pub vacation: bool,
    pub half_day: bool,
    /// Some rule produced a warning for this day.
    pub warning: bool,
}

impl WorkDay {
    pub fn new(date: DateValue, day_name: impl Into<String>) -> Self {
        Self {
            date,
            day_name: day_name.into(),
            normal: 0,
            overtime1: 0,
            overtime2: 0,
            travel: 0,
            sick: 0,
            leave: 0,
            vacation: false,
            half_day: false,
            warning: false,
        }
    }

    pub fn is_weekday(&self) -> bool {
        is_weekday(&self.day_name, self.date)
    }

    /// Worked minutes: normal, leave and both overtime tiers.
    pub const fn total(&self) -> i32 {
        self.normal + self.leave + self.overtime1 + self.overtime2
    }

    /// Minutes the day is expected to contain.
    pub fn expected_minutes(&self) -> i32 {
        if !self.is_weekday() || self.vacation {
            0
        } else if self.half_day {
            HALF_DAY_MINUTES
        } else {
            WORK_MINUTES_PER_DAY
        }
    }

    /// Contribution to the flex balance.
    pub fn flex(&self) -> i32 {
        self.normal + self.leave + self.sick - self.expected_minutes()
    }

    pub const fn is_sick(&self) -> bool {
        self.sick > 0
    }

    /// Sick and worked time together fit in one standard day.
    pub const fn is_sick_ok(&self) -> bool {
        !self.is_sick() || self.total() + self.sick <= WORK_MINUTES_PER_DAY
    }
}

/// Which rule a warning comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    TravelDuringOfficeHours,
    Overtime1BeforeFullDay,
    Overtime1OutsideDaytime,
    Overtime1OnHoliday,
    Overtime2BeforeFullDay,
    Overtime2DuringDaytime,
    Sick,
    SickOverflow,
    LongDay,
    ShortDay,
    FlexBalanceOutOfRange,
    CompBalanceOverLimit,
    MonthOvertimeOverLimit,
    OvertimeAndCompOverLimit,
}

impl WarningKind {
    pub const fn message(self) -> &'static str {
        match self {
            Self::TravelDuringOfficeHours => {
                "Restid räknas endast utanför intervallet helgfria mån-fre 8:30-17:00."
            }
            Self::Overtime1BeforeFullDay => {
                "Du måste ha jobbat mer än 7,5 timmar för att få ut övertid1 denna dag."
            }
            Self::Overtime1OutsideDaytime => "Före 06:00 och efter 20:00 är all övertid av typ 2.",
            Self::Overtime1OnHoliday => "På röd, lör och sön är all övertid av typ 2.",
            Self::Overtime2BeforeFullDay => {
                "Du måste ha jobbat mer än 7,5 timmar för att få ut övertid2 denna dag."
            }
            Self::Overtime2DuringDaytime => {
                "Övertid2 får enbart tas ut före 06:00 eller efter 20:00 på vardagar."
            }
            Self::Sick => "Sjukdom",
            Self::SickOverflow => {
                "Om du är sjuk, kan du knappast registrera fler än totalt 7,5 timmar."
            }
            Self::LongDay => "Du har jobbat länge!",
            Self::ShortDay => "Du har jobbat lite!",
            Self::FlexBalanceOutOfRange => {
                "Flexsaldo måste ligga mellan -10:00 och 100:00 vid varje månadsskifte."
            }
            Self::CompBalanceOverLimit => "Kompsaldo får inte överstiga 100:00 timmar per år.",
            Self::MonthOvertimeOverLimit => {
                "Övertiden denna månad får inte överstiga 50:00 timmar."
            }
            Self::OvertimeAndCompOverLimit => {
                "Övertid + komptid får inte överstiga 300:00 timmar per år."
            }
        }
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// A rule violation. `date` is the offending day, or the balance label
/// (`Flexsaldo:`, `Kompsaldo:`, `Övertid:`) for month-end rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub date: String,
    pub kind: WarningKind,
}

impl Warning {
    pub fn new(date: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            date: date.into(),
            kind,
        }
    }

    pub const fn message(&self) -> &'static str {
        self.kind.message()
    }
}

/// Month accumulators plus the opening balances from the header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthTotals {
    pub opening_flex: TimeValue,
    pub opening_comp: TimeValue,
    pub closing_comp: TimeValue,
    pub opening_overtime1: TimeValue,
    pub opening_overtime2: TimeValue,
    pub in_money: bool,

    /// Flex earned this month.
    pub flex: i32,
    /// Normal time this month, leave included.
    pub normal: i32,
    pub leave: i32,
    pub travel: i32,
    pub sick: i32,
    pub total: i32,
    pub overtime1: i32,
    pub overtime2: i32,
    /// One per vacation row.
    pub vacation_days: u32,
    pub weekdays: u32,
}

impl MonthTotals {
    pub fn new(record: &Record) -> Self {
        Self {
            opening_flex: record.opening_flex,
            opening_comp: record.opening_comp,
            closing_comp: record.closing_comp,
            opening_overtime1: record.opening_overtime1,
            opening_overtime2: record.opening_overtime2,
            in_money: record.in_money,
            flex: 0,
            normal: 0,
            leave: 0,
            travel: 0,
            sick: 0,
            total: 0,
            overtime1: 0,
            overtime2: 0,
            vacation_days: 0,
            weekdays: 0,
        }
    }

    /// Opening flex, minus comp taken out, plus this month's flex.
    pub const fn flex_balance(&self) -> i32 {
        self.opening_flex.as_minutes() - self.closing_comp.as_minutes() + self.flex
    }

    pub const fn comp_balance(&self) -> i32 {
        self.opening_comp.as_minutes() + self.closing_comp.as_minutes()
    }

    pub const fn overtime1_balance(&self) -> i32 {
        self.opening_overtime1.as_minutes() + self.overtime1
    }

    pub const fn overtime2_balance(&self) -> i32 {
        self.opening_overtime2.as_minutes() + self.overtime2
    }

    /// Both overtime tiers this month.
    pub const fn overtime(&self) -> i32 {
        self.overtime1 + self.overtime2
    }

    pub const fn overtime_and_comp_balance(&self) -> i32 {
        self.overtime1_balance() + self.overtime2_balance() + self.comp_balance()
    }

    /// Normal time this month without leave.
    pub const fn normal_without_leave(&self) -> i32 {
        self.normal - self.leave
    }

    /// Contracted minutes for the weekdays seen this month.
    pub fn scheduled_minutes(&self) -> i32 {
        i32::try_from(self.weekdays).map_or(i32::MAX, |days| days * WORK_MINUTES_PER_DAY)
    }
}

/// Outcome of the month-end rules, one flag per rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MonthChecks {
    pub flex_out_of_range: bool,
    pub comp_over_limit: bool,
    pub overtime_over_limit: bool,
    pub overtime_and_comp_over_limit: bool,
}

impl MonthChecks {
    fn evaluate(totals: &MonthTotals) -> Self {
        let flex = totals.flex_balance();
        Self {
            flex_out_of_range: !(FLEX_BALANCE_MIN..=FLEX_BALANCE_MAX).contains(&flex),
            comp_over_limit: totals.comp_balance() > COMP_BALANCE_MAX,
            overtime_over_limit: totals.overtime() > MONTH_OVERTIME_MAX,
            overtime_and_comp_over_limit: totals.overtime_and_comp_balance()
                > OVERTIME_AND_COMP_MAX,
        }
    }

    fn warnings(self) -> impl Iterator<Item = Warning> {
        [
            (self.flex_out_of_range, "Flexsaldo:", WarningKind::FlexBalanceOutOfRange),
            (self.comp_over_limit, "Kompsaldo:", WarningKind::CompBalanceOverLimit),
            (self.overtime_over_limit, "Övertid:", WarningKind::MonthOvertimeOverLimit),
            (
                self.overtime_and_comp_over_limit,
                "Övertid:",
                WarningKind::OvertimeAndCompOverLimit,
            ),
        ]
        .into_iter()
        .filter(|(failed, _, _)| *failed)
        .map(|(_, label, kind)| Warning::new(label, kind))
    }
}

/// Result of aggregating one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub days: Vec<WorkDay>,
    pub totals: MonthTotals,
    pub checks: MonthChecks,
    pub warnings: Vec<Warning>,
}

/// Fold state: finished days, the day in progress, totals and warnings.
#[derive(Debug, Clone)]
pub struct Aggregation {
    current: Option<WorkDay>,
    days: Vec<WorkDay>,
    totals: MonthTotals,
    warnings: Vec<Warning>,
}

impl Aggregation {
    pub fn new(record: &Record) -> Self {
        Self {
            current: None,
            days: Vec::new(),
            totals: MonthTotals::new(record),
            warnings: Vec::new(),
        }
    }

    /// Folds one row into the state.
    #[must_use]
    pub fn push_row(mut self, row: &Row) -> Self {
        let mut day = match self.current.take() {
            Some(day) if day.date == row.date => day,
            Some(done) => {
                self = self.finalize(done);
                WorkDay::new(row.date, row.day_name.clone())
            }
            None => WorkDay::new(row.date, row.day_name.clone()),
        };
        self.add_row(&mut day, row);
        self.current = Some(day);
        self
    }

    /// Finalizes the last day and applies the month-end rules.
    pub fn finish(mut self) -> Summary {
        if let Some(day) = self.current.take() {
            self = self.finalize(day);
        }

        let checks = MonthChecks::evaluate(&self.totals);
        self.warnings.extend(checks.warnings());

        Summary {
            days: self.days,
            totals: self.totals,
            checks,
            warnings: self.warnings,
        }
    }

    fn warn(&mut self, day: &mut WorkDay, kind: WarningKind) {
        day.warning = true;
        self.warnings.push(Warning::new(day.date.to_string(), kind));
    }

    fn add_row(&mut self, day: &mut WorkDay, row: &Row) {
        let minutes = row.duration();
        let from = row.from.as_minutes();
        let to = row.to.as_minutes();

        match &row.category {
            Category::Normal => day.normal += minutes,
            Category::HalfDay => {
                day.normal += minutes;
                day.half_day = true;
            }
            Category::Travel => {
                // Touching 08:30 or 17:00 is not an overlap.
                if day.is_weekday() && from < OFFICE_HOURS_END && to > OFFICE_HOURS_START {
                    self.warn(day, WarningKind::TravelDuringOfficeHours);
                }
                day.travel += minutes;
            }
            Category::Overtime1 => {
                if !day.is_weekday() {
                    self.warn(day, WarningKind::Overtime1OnHoliday);
                } else if day.normal < WORK_MINUTES_PER_DAY {
                    self.warn(day, WarningKind::Overtime1BeforeFullDay);
                } else if from < DAYTIME_START || to > DAYTIME_END {
                    self.warn(day, WarningKind::Overtime1OutsideDaytime);
                }
                day.overtime1 += minutes;
            }
            Category::Overtime2 => {
                if day.is_weekday() {
                    if day.normal < WORK_MINUTES_PER_DAY {
                        self.warn(day, WarningKind::Overtime2BeforeFullDay);
                    } else if !(to <= DAYTIME_START || from >= DAYTIME_END) {
                        self.warn(day, WarningKind::Overtime2DuringDaytime);
                    }
                }
                day.overtime2 += minutes;
            }
            Category::Vacation => {
                day.vacation = true;
                self.totals.vacation_days += 1;
            }
            Category::Sick => {
                // Assigned, not added: the last sick row of a day wins.
                day.sick = minutes;
                self.warn(day, WarningKind::Sick);
            }
            Category::Leave => {
                day.leave += minutes;
                self.totals.leave += minutes;
            }
            Category::Other(code) => {
                tracing::debug!(code = %code, line = row.line, "skipping row with unrecognized time code");
            }
        }
    }

    fn day_rule(day: &WorkDay) -> Option<WarningKind> {
        let total = day.total();
        let ordinary = day.is_weekday() && !day.vacation && !day.is_sick();

        if !day.is_sick_ok() {
            Some(WarningKind::SickOverflow)
        } else if ordinary && total > LONG_DAY_MINUTES {
            Some(WarningKind::LongDay)
        } else if ordinary && !day.half_day && total < SHORT_DAY_MINUTES {
            Some(WarningKind::ShortDay)
        } else {
            None
        }
    }

    fn finalize(mut self, mut day: WorkDay) -> Self {
        if let Some(kind) = Self::day_rule(&day) {
            self.warn(&mut day, kind);
        }

        let totals = &mut self.totals;
        if day.is_weekday() {
            totals.weekdays += 1;
        }
        totals.flex += day.flex();
        totals.normal += day.normal + day.leave;
        totals.total += day.total();
        totals.travel += day.travel;
        totals.sick += day.sick;
        totals.overtime1 += day.overtime1;
        totals.overtime2 += day.overtime2;

        tracing::debug!(
            date = %day.date,
            total = day.total(),
            flex = day.flex(),
            warning = day.warning,
            "finalized work day"
        );
        self.days.push(day);
        self
    }
}

/// Aggregates a record's rows into days, month totals and warnings.
pub fn aggregate(record: &Record) -> Summary {
    record
        .rows
        .iter()
        .fold(Aggregation::new(record), Aggregation::push_row)
        .finish()
}
