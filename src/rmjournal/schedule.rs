//! Resolves which recurring items belong on a given journal page.

use crate::model::{PageDateMap, SpanSet};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Items for `page`, or an empty list when the page is outside the date range
/// or no span has started yet.
pub fn resolve(page: u32, map: &PageDateMap, spans: &SpanSet) -> Vec<String> {
    match map.date_for_page(page) {
        Some(date) => resolve_date(date, spans),
        None => Vec::new(),
    }
}

pub fn resolve_date(date: NaiveDate, spans: &SpanSet) -> Vec<String> {
    spans
        .effective_span(date)
        .map(|span| span.items_for(date))
        .unwrap_or_default()
}

/// Every page in the date range that has at least one item.
pub fn resolve_all(map: &PageDateMap, spans: &SpanSet) -> BTreeMap<u32, Vec<String>> {
    map.pages()
        .filter_map(|page| {
            let items = resolve(page, map, spans);
            (!items.is_empty()).then_some((page, items))
        })
        .collect()
}
