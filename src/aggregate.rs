//! # Count tables
//!
//! Pure grouping over already-filtered rows. Tables list present keys only, in key order, and
//! their counts always sum to the number of input items.
use crate::classify::Priority;
use crate::classify::TicketStatus;
use crate::frame::Value;
use chrono::Datelike;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PriorityStatusCount {
    pub priority: Priority,
    pub status: TicketStatus,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PriorityCount {
    pub priority: Priority,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AssigneeCount {
    pub assignee: String,
    pub priority: Priority,
    pub count: usize,
}

/// Assignee × Priority counts with the assignee display order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AssigneeTable {
    /// Assignees by descending total; equal totals in name order
    pub order: Vec<String>,
    pub counts: Vec<AssigneeCount>,
}

impl AssigneeTable {
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total count of one assignee
    pub fn total(&self, assignee: &str) -> usize {
        self.counts
            .iter()
            .filter(|count| count.assignee == assignee)
            .map(|count| count.count)
            .sum()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MonthCount {
    /// First day of the month
    pub month: NaiveDate,
    pub count: usize,
}

/// Occurrences of each key, in key order
pub fn count_by<K: Ord, I: IntoIterator<Item = K>>(keys: I) -> BTreeMap<K, usize> {
    let mut counts = BTreeMap::<K, usize>::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

/// Priority × Status counts (stacked bar input)
pub fn priority_status_counts<I>(pairs: I) -> Vec<PriorityStatusCount>
where
    I: IntoIterator<Item = (Priority, TicketStatus)>,
{
    count_by(pairs)
        .into_iter()
        .map(|((priority, status), count)| PriorityStatusCount { priority, status, count })
        .collect()
}

/// Priority counts (pie input)
pub fn priority_counts<I: IntoIterator<Item = Priority>>(priorities: I) -> Vec<PriorityCount> {
    count_by(priorities)
        .into_iter()
        .map(|(priority, count)| PriorityCount { priority, count })
        .collect()
}

/// Assignee × Priority counts
pub fn assignee_priority_counts<I>(pairs: I) -> AssigneeTable
where
    I: IntoIterator<Item = (String, Priority)>,
{
    let counts: Vec<AssigneeCount> = count_by(pairs)
        .into_iter()
        .map(|((assignee, priority), count)| AssigneeCount { assignee, priority, count })
        .collect();
    let mut totals = BTreeMap::<&str, usize>::new();
    for count in &counts {
        *totals.entry(count.assignee.as_str()).or_insert(0) += count.count;
    }
    let mut totals: Vec<(&str, usize)> = totals.into_iter().collect();
    // Stable: equal totals stay in name order
    totals.sort_by(|left, right| right.1.cmp(&left.1));
    let order = totals.into_iter().map(|(assignee, _)| assignee.to_owned()).collect();
    AssigneeTable { order, counts }
}

/// Truncates a date to the first day of its month
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Counts dated values per month. Values that are not dates are left out.
pub fn monthly_counts<'a, I: IntoIterator<Item = &'a Value>>(values: I) -> Vec<MonthCount> {
    count_by(values.into_iter().filter_map(Value::to_date).map(month_start))
        .into_iter()
        .map(|(month, count)| MonthCount { month, count })
        .collect()
}
