//! Core data types: recurring spans and the page/date mapping.
//!
//! A journal PDF dedicates one page per day of a single year, starting at a
//! fixed page number. [`PageDateMap`] converts between the two, and
//! [`SpanSet`] answers "which span is in force on this date".

use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::HashMap;
use std::ops::RangeInclusive;

/// Gregorian leap year rule.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// A set of items that recur every day from `start_date` on, until a later
/// span takes over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurringSpan {
    pub start_date: NaiveDate,
    pub daily_items: Vec<String>,
    pub weekday_items: HashMap<Weekday, Vec<String>>,
}

impl RecurringSpan {
    pub fn new(start_date: NaiveDate, daily_items: Vec<String>) -> Self {
        Self {
            start_date,
            daily_items,
            weekday_items: HashMap::new(),
        }
    }

    pub fn with_weekday_items(mut self, weekday: Weekday, items: Vec<String>) -> Self {
        self.weekday_items.entry(weekday).or_default().extend(items);
        self
    }

    /// Daily items followed by the items bound to `date`'s weekday.
    pub fn items_for(&self, date: NaiveDate) -> Vec<String> {
        let mut items = self.daily_items.clone();
        if let Some(extra) = self.weekday_items.get(&date.weekday()) {
            items.extend(extra.iter().cloned());
        }
        items
    }
}

/// Spans sorted by start date. Spans sharing a start date keep their
/// configured order, so the one configured last wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpanSet {
    spans: Vec<RecurringSpan>,
}

impl SpanSet {
    pub fn new(mut spans: Vec<RecurringSpan>) -> Self {
        spans.sort_by_key(|span| span.start_date);
        Self { spans }
    }

    /// The span with the latest start date on or before `date`.
    pub fn effective_span(&self, date: NaiveDate) -> Option<&RecurringSpan> {
        let after = self.spans.partition_point(|span| span.start_date <= date);
        after.checked_sub(1).map(|idx| &self.spans[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecurringSpan> {
        self.spans.iter()
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

/// One page per day of `year`, Jan 1 on `first_page` (1-based page numbers).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageDateMap {
    first_page: u32,
    year: i32,
}

impl PageDateMap {
    pub fn new(first_page: u32, year: i32) -> Self {
        Self { first_page, year }
    }

    pub fn first_page(&self) -> u32 {
        self.first_page
    }

    pub fn last_page(&self) -> u32 {
        self.first_page.saturating_add(self.days() - 1)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn days(&self) -> u32 {
        days_in_year(self.year)
    }

    pub fn pages(&self) -> RangeInclusive<u32> {
        self.first_page..=self.last_page()
    }

    pub fn contains(&self, page: u32) -> bool {
        self.pages().contains(&page)
    }

    pub fn date_for_page(&self, page: u32) -> Option<NaiveDate> {
        if !self.contains(page) {
            return None;
        }
        NaiveDate::from_yo_opt(self.year, page - self.first_page + 1)
    }

    pub fn page_for_date(&self, date: NaiveDate) -> Option<u32> {
        if date.year() != self.year {
            return None;
        }
        self.first_page.checked_add(date.ordinal() - 1)
    }
}
