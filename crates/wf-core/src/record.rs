//! Parsed timesheet records.

use crate::category::Category;
use crate::date::DateValue;
use crate::time::TimeValue;

/// One timesheet entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub date: DateValue,
    pub day_name: String,
    pub from: TimeValue,
    pub to: TimeValue,
    pub category: Category,
    /// Project numbers, in the order written (`1234-5678` gives two).
    pub project_numbers: Vec<i32>,
    pub activity: String,
    pub comment: String,
    /// Source line the row started on.
    pub line: usize,
}

impl Row {
    /// Signed minutes from `from` to `to`.
    pub const fn duration(&self) -> i32 {
        self.to.as_minutes() - self.from.as_minutes()
    }
}

/// A whole timesheet: header fields followed by rows in file order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    pub employee_name: String,
    /// Overtime is paid out in money rather than saved.
    pub in_money: bool,
    pub opening_flex: TimeValue,
    pub opening_comp: TimeValue,
    /// Comp time moved out of the flex balance this month.
    pub closing_comp: TimeValue,
    pub opening_overtime1: TimeValue,
    pub opening_overtime2: TimeValue,
    pub year: i32,
    pub month: i32,
    pub rows: Vec<Row>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_is_signed_difference() {
        let row = Row {
            date: DateValue::new(2023, 1, 2),
            day_name: "mån".to_string(),
            from: TimeValue::new(16, 0, false),
            to: TimeValue::new(8, 30, false),
            category: Category::Normal,
            project_numbers: vec![],
            activity: String::new(),
            comment: String::new(),
            line: 1,
        };
        assert_eq!(row.duration(), -450);
    }
}
