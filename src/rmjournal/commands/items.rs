use crate::commands::{CmdMessage, CmdResult, DayPlan};
use crate::config::JournalConfig;
use crate::error::Result;
use crate::schedule;
use chrono::{Days, NaiveDate};

/// Resolves the items for `days` consecutive dates starting at `start`.
pub fn run(config: &JournalConfig, start: NaiveDate, days: u32, today: NaiveDate) -> Result<CmdResult> {
    let spans = config.span_set()?;
    let map = config.page_date_map(today);

    let plans: Vec<DayPlan> = (0..u64::from(days.max(1)))
        .filter_map(|offset| start.checked_add_days(Days::new(offset)))
        .map(|date| DayPlan {
            date,
            page: map.page_for_date(date),
            items: schedule::resolve_date(date, &spans),
        })
        .collect();

    let mut result = CmdResult::default();
    if spans.is_empty() {
        result.add_message(CmdMessage::warning("No recurring item spans configured"));
    }
    if plans.iter().any(|plan| plan.page.is_none()) {
        result.add_message(CmdMessage::info(format!(
            "Dates outside {} have no journal page",
            map.year()
        )));
    }
    Ok(result.with_day_plans(plans))
}
