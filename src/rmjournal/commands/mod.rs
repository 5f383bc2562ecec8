use crate::container::DocumentId;
use crate::model::PageDateMap;
use chrono::NaiveDate;
use std::path::PathBuf;

pub mod items;
pub mod pages;
pub mod update;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

/// Items resolved for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayPlan {
    pub date: NaiveDate,
    /// Journal page for the date, if it falls inside the date pages.
    pub page: Option<u32>,
    pub items: Vec<String>,
}

/// Outcome of an update run.
#[derive(Debug, Clone)]
pub struct UpdateSummary {
    pub source: String,
    pub target: String,
    pub backup: Option<String>,
    pub document_id: DocumentId,
    pub modified_pages: Vec<u32>,
    pub skipped_pages: Vec<u32>,
    /// Where the archive was written when not published.
    pub output: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub messages: Vec<CmdMessage>,
    pub day_plans: Vec<DayPlan>,
    pub page_map: Option<PageDateMap>,
    pub update: Option<UpdateSummary>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_day_plans(mut self, plans: Vec<DayPlan>) -> Self {
        self.day_plans = plans;
        self
    }

    pub fn with_page_map(mut self, map: PageDateMap) -> Self {
        self.page_map = Some(map);
        self
    }

    pub fn with_update(mut self, summary: UpdateSummary) -> Self {
        self.update = Some(summary);
        self
    }
}
