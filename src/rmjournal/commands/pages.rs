use crate::commands::{CmdMessage, CmdResult};
use crate::config::JournalConfig;
use crate::error::Result;
use chrono::NaiveDate;
use lopdf::Document;

/// Reports the date page range, checked against the template when one is
/// configured.
pub fn run(config: &JournalConfig, today: NaiveDate) -> Result<CmdResult> {
    let map = config.page_date_map(today);
    let mut result = CmdResult::default();

    if let Some(template) = config.load_template()? {
        let page_count = Document::load_mem(&template)?.get_pages().len() as u32;
        if map.last_page() > page_count {
            result.add_message(CmdMessage::warning(format!(
                "Template has {} pages; date pages after page {} would be skipped",
                page_count, page_count
            )));
        } else {
            result.add_message(CmdMessage::success(format!(
                "Template has {} pages; every date page fits",
                page_count
            )));
        }
    }

    Ok(result.with_page_map(map))
}
