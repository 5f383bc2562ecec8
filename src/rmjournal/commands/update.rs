use crate::backup::next_backup_name;
use crate::commands::{CmdMessage, CmdResult, UpdateSummary};
use crate::config::JournalConfig;
use crate::container::{self, DocumentContainer};
use crate::error::{JournalError, Result};
use crate::merge;
use crate::remote::{RemoteStore, ROOT};
use crate::schedule;
use crate::workdir::WorkDir;
use chrono::NaiveDate;
use lopdf::Document;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct UpdateOptions {
    /// Date used for backup names and the default journal year.
    pub today: NaiveDate,
    /// Write the archive here instead of publishing it.
    pub output: Option<PathBuf>,
}

impl UpdateOptions {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            output: None,
        }
    }
}

pub fn run<R: RemoteStore>(
    remote: &mut R,
    config: &JournalConfig,
    options: &UpdateOptions,
) -> Result<CmdResult> {
    let spans = config.span_set()?;
    let map = config.page_date_map(options.today);
    let template = config.load_template()?;
    let source = config.source_journal.as_str();
    let target = config.target_journal();
    let publishing = options.output.is_none();

    let work = WorkDir::new()?;
    let mut result = CmdResult::default();

    if spans.is_empty() {
        result.add_message(CmdMessage::warning(
            "No recurring item spans configured; pages will be left unchanged",
        ));
    }

    let (mut journal, backup) = if remote.exists(source, &work)? {
        let backup_slot = if publishing {
            Some(reserve_backup_name(remote, config, options.today, &work)?)
        } else {
            None
        };

        result.add_message(CmdMessage::info(format!("Downloading '{}'", source)));
        let archive = remote.fetch(source, &work)?;
        let journal = container::decode(&archive, None)?;
        log::debug!("decoded '{}' as document {}", source, journal.id);

        if let Some((folder, name)) = &backup_slot {
            let encoded = container::encode(&journal)?;
            remote.publish(&encoded.bytes, folder, name, &work)?;
            result.add_message(CmdMessage::success(format!("Backup created: {}", name)));
        }
        (journal, backup_slot.map(|(_, name)| name))
    } else {
        let base = template.clone().ok_or_else(|| {
            JournalError::Config(format!(
                "'{}' does not exist remotely and no base_pdf_template is configured",
                source
            ))
        })?;
        result.add_message(CmdMessage::warning(format!(
            "'{}' not found remotely; starting a new notebook from the template",
            source
        )));
        (DocumentContainer::synthesize_empty(base)?, None)
    };

    let base = match template {
        Some(template) => template,
        None => std::mem::take(&mut journal.visual_base),
    };
    let mut doc = Document::load_mem(&base)?;
    let page_count = doc.get_pages().len() as u32;

    result.add_message(CmdMessage::info(format!(
        "Date pages {}-{} cover {} ({} days)",
        map.first_page(),
        map.last_page(),
        map.year(),
        map.days()
    )));

    let items_by_page = schedule::resolve_all(&map, &spans);
    let mut skipped: Vec<u32> = items_by_page
        .range(page_count + 1..)
        .map(|(page, _)| *page)
        .collect();
    if map.last_page() > page_count {
        result.add_message(CmdMessage::warning(format!(
            "Document has {} pages; date pages after page {} are skipped",
            page_count, page_count
        )));
    }

    let overlays = merge::render_overlays(&doc, &items_by_page, &config.overlay_style());
    let report = merge::merge_document(&mut doc, &overlays)?;
    skipped.extend(report.skipped.iter().copied());
    result.add_message(CmdMessage::success(format!(
        "Added recurring items to {} pages",
        report.modified.len()
    )));

    let mut pdf = Vec::new();
    doc.save_to(&mut pdf)?;
    journal.visual_base = pdf;
    let encoded = container::encode(&journal)?;

    match &options.output {
        Some(path) => {
            fs::write(path, &encoded.bytes)?;
            result.add_message(CmdMessage::success(format!(
                "Wrote {}",
                path.display()
            )));
        }
        None => {
            remote.publish(&encoded.bytes, ROOT, target, &work)?;
            result.add_message(CmdMessage::success(format!("Published '{}'", target)));
        }
    }

    Ok(result.with_update(UpdateSummary {
        source: source.to_string(),
        target: target.to_string(),
        backup,
        document_id: encoded.id,
        modified_pages: report.modified,
        skipped_pages: skipped,
        output: options.output.clone(),
    }))
}

/// Makes sure the backup folder exists and picks a free name inside it.
fn reserve_backup_name<R: RemoteStore>(
    remote: &mut R,
    config: &JournalConfig,
    today: NaiveDate,
    work: &WorkDir,
) -> Result<(String, String)> {
    let folder = config.backup_folder.as_deref().unwrap_or(ROOT);
    remote.ensure_folder(folder, work)?;
    let existing = remote.list_names(folder, work)?;
    let name = next_backup_name(&config.backup_base(), today, &existing);
    log::info!("backing up to {}", crate::remote::remote_path(folder, &name));
    Ok((folder.to_string(), name))
}
