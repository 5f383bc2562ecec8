//! # API Facade
//!
//! A thin facade over the command layer and the single entry point for every
//! journal operation, whatever the front end.
//!
//! The facade:
//! - **Dispatches** to the matching `commands::*::run`
//! - **Normalizes inputs** (date arguments such as `today` or `2025-03-01`)
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It does no printing and holds no pipeline logic.
//!
//! ## Generic Over RemoteStore
//!
//! `JournalApi<R: RemoteStore>` is generic over the remote backend:
//! - Production: `JournalApi<RmapiStore>`
//! - Testing: `JournalApi<MemoryRemote>`

use crate::commands;
use crate::commands::update::UpdateOptions;
use crate::config::JournalConfig;
use crate::error::{JournalError, Result};
use crate::remote::RemoteStore;
use chrono::{Days, NaiveDate};
use std::path::PathBuf;

pub struct JournalApi<R: RemoteStore> {
    remote: R,
    config: JournalConfig,
    today: NaiveDate,
}

impl<R: RemoteStore> JournalApi<R> {
    pub fn new(remote: R, config: JournalConfig, today: NaiveDate) -> Self {
        Self {
            remote,
            config,
            today,
        }
    }

    pub fn config(&self) -> &JournalConfig {
        &self.config
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn update(&mut self, output: Option<PathBuf>) -> Result<commands::CmdResult> {
        let options = UpdateOptions {
            today: self.today,
            output,
        };
        commands::update::run(&mut self.remote, &self.config, &options)
    }

    pub fn items(&self, date: &str, days: u32) -> Result<commands::CmdResult> {
        let start = parse_date(date, self.today)?;
        commands::items::run(&self.config, start, days, self.today)
    }

    pub fn pages(&self) -> Result<commands::CmdResult> {
        commands::pages::run(&self.config, self.today)
    }
}

/// Accepts `YYYY-MM-DD`, `today`, `tomorrow` and `yesterday`.
pub fn parse_date(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let input = input.trim();
    let relative = match input.to_ascii_lowercase().as_str() {
        "today" => Some(today),
        "tomorrow" => today.checked_add_days(Days::new(1)),
        "yesterday" => today.checked_sub_days(Days::new(1)),
        _ => None,
    };
    if let Some(date) = relative {
        return Ok(date);
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| {
        JournalError::Api(format!(
            "'{}' is not a date (expected YYYY-MM-DD or today)",
            input
        ))
    })
}
