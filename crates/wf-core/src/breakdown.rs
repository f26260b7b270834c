//! Per-activity time, grouped by date.

use serde::Serialize;

use crate::category::Category;
use crate::date::DateValue;
use crate::record::Row;

/// Minutes booked on one activity during one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityTime {
    pub activity: String,
    /// Normal, half-day and leave time.
    pub normal: i32,
    pub overtime1: i32,
    pub overtime2: i32,
    pub travel: i32,
}

impl ActivityTime {
    fn new(activity: &str) -> Self {
        Self {
            activity: activity.to_string(),
            normal: 0,
            overtime1: 0,
            overtime2: 0,
            travel: 0,
        }
    }

    fn add(&mut self, row: &Row) {
        let minutes = row.duration();
        match row.category {
            _ if row.category.is_normal_time() => self.normal += minutes,
            Category::Overtime1 => self.overtime1 += minutes,
            Category::Overtime2 => self.overtime2 += minutes,
            Category::Travel => self.travel += minutes,
            _ => {}
        }
    }
}

/// The activities of one day, in the order they first appear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityDay {
    pub date: DateValue,
    pub day_name: String,
    pub activities: Vec<ActivityTime>,
}

impl ActivityDay {
    fn new(row: &Row) -> Self {
        Self {
            date: row.date,
            day_name: row.day_name.clone(),
            activities: Vec::new(),
        }
    }

    fn add(&mut self, row: &Row) {
        let index = match self
            .activities
            .iter()
            .position(|a| a.activity == row.activity)
        {
            Some(index) => index,
            None => {
                self.activities.push(ActivityTime::new(&row.activity));
                self.activities.len() - 1
            }
        };
        self.activities[index].add(row);
    }
}

/// Groups rows by date (adjacent rows), then by activity name.
///
/// Returns nothing unless the first row names an activity; timesheets either
/// track activities throughout or not at all.
pub fn activity_breakdown(rows: &[Row]) -> Vec<ActivityDay> {
    if rows.first().is_none_or(|row| row.activity.is_empty()) {
        return Vec::new();
    }

    let mut days = Vec::new();
    let mut current: Option<ActivityDay> = None;
    for row in rows {
        let mut day = match current.take() {
            Some(day) if day.date == row.date => day,
            Some(done) => {
                days.push(done);
                ActivityDay::new(row)
            }
            None => ActivityDay::new(row),
        };
        day.add(row);
        current = Some(day);
    }
    days.extend(current);
    days
}
