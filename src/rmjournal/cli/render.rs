//! Terminal output for command results.
//!
//! `format_*` build the text, `print_*` write it to stdout.

use colored::*;
use rmjournal::commands::{CmdMessage, DayPlan, MessageLevel, UpdateSummary};
use rmjournal::model::PageDateMap;
use std::fmt::Write;

pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
        }
    }
}

pub fn format_day_plans(plans: &[DayPlan]) -> String {
    let mut out = String::new();
    for plan in plans {
        let page = match plan.page {
            Some(page) => format!("page {}", page),
            None => "no page".to_string(),
        };
        let _ = writeln!(
            out,
            "{} {}",
            plan.date.format("%Y-%m-%d %a").to_string().bold(),
            format!("({})", page).dimmed()
        );
        if plan.items.is_empty() {
            let _ = writeln!(out, "  {}", "nothing scheduled".dimmed());
        }
        for item in &plan.items {
            let _ = writeln!(out, "  \u{2022} {}", item);
        }
    }
    out
}

pub fn format_page_map(map: &PageDateMap) -> String {
    format!(
        "Date pages {}-{} hold {} ({} days)",
        map.first_page(),
        map.last_page(),
        map.year(),
        map.days()
    )
}

pub fn format_update_summary(summary: &UpdateSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} -> {}", summary.source, summary.target.bold());
    if let Some(backup) = &summary.backup {
        let _ = writeln!(out, "  backup:   {}", backup);
    }
    let _ = writeln!(out, "  pages:    {} updated", summary.modified_pages.len());
    if !summary.skipped_pages.is_empty() {
        let _ = writeln!(
            out,
            "  skipped:  {} past the end of the document",
            summary.skipped_pages.len()
        );
    }
    let _ = writeln!(out, "  document: {}", summary.document_id.to_string().dimmed());
    if let Some(path) = &summary.output {
        let _ = writeln!(out, "  written:  {}", path.display());
    }
    out
}

pub fn print_day_plans(plans: &[DayPlan]) {
    print!("{}", format_day_plans(plans));
}

pub fn print_page_map(map: &PageDateMap) {
    println!("{}", format_page_map(map));
}

pub fn print_update_summary(summary: &UpdateSummary) {
    print!("{}", format_update_summary(summary));
}
