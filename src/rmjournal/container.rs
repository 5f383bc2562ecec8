//! # The `.rmdoc` container
//!
//! A tablet document travels as a zip archive whose entries all share one
//! identifier prefix:
//!
//! ```text
//! {id}.pdf               # visual base
//! {id}.content           # JSON descriptor (pageCount, page ids, ...)
//! {id}.pagedata          # template name per page, newline separated
//! {id}.metadata          # JSON descriptor (visibleName, parent, ...)
//! {id}/{page}.rm         # hand-drawn strokes, one blob per page
//! {id}.thumbnails/...    # anything else keyed by the same id
//! ```
//!
//! [`DocumentContainer`] holds those parts as named fields. Only the visual
//! base is ever replaced; every other blob is carried through byte for byte.
//! Encoding always assigns a fresh identifier, rekeying entry paths without
//! touching their content, and stores entries uncompressed because the
//! tablet refuses deflated archives.

use crate::error::{JournalError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::io::{Cursor, Read, Write};
use uuid::Uuid;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const PDF_SUFFIX: &str = ".pdf";
const CONTENT_SUFFIX: &str = ".content";
const PAGEDATA_SUFFIX: &str = ".pagedata";
const METADATA_SUFFIX: &str = ".metadata";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentContainer {
    pub id: DocumentId,
    pub visual_base: Vec<u8>,
    pub content: Option<Vec<u8>>,
    pub pagedata: Option<Vec<u8>>,
    pub metadata: Option<Vec<u8>>,
    /// Hand-drawn page content, keyed by path below `{id}/`.
    pub annotations: BTreeMap<String, Vec<u8>>,
    /// Any other `{id}.*` entry, keyed by the path following the id.
    pub attachments: BTreeMap<String, Vec<u8>>,
}

/// An encoded archive and the identifier it was written under.
#[derive(Debug, Clone)]
pub struct EncodedContainer {
    pub id: DocumentId,
    pub bytes: Vec<u8>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ContentDescriptor {
    file_type: &'static str,
    orientation: &'static str,
    page_count: usize,
}

impl DocumentContainer {
    /// A brand-new container around `visual_base`, with no strokes.
    pub fn synthesize_empty(visual_base: Vec<u8>) -> Result<Self> {
        let page_count = pdf_page_count(&visual_base)?;
        Ok(Self {
            id: DocumentId::generate(),
            content: Some(minimal_content(page_count)?),
            pagedata: Some(Vec::new()),
            metadata: None,
            annotations: BTreeMap::new(),
            attachments: BTreeMap::new(),
            visual_base,
        })
    }

    pub fn page_count(&self) -> Result<usize> {
        pdf_page_count(&self.visual_base)
    }

    /// Archive paths for every part under `id`, paired with their bytes.
    fn rekeyed<'a>(&'a self, id: &DocumentId, content: &'a [u8]) -> Vec<(String, &'a [u8])> {
        let mut entries = vec![
            (format!("{}{}", id, PDF_SUFFIX), self.visual_base.as_slice()),
            (format!("{}{}", id, CONTENT_SUFFIX), content),
            (
                format!("{}{}", id, PAGEDATA_SUFFIX),
                self.pagedata.as_deref().unwrap_or_default(),
            ),
        ];
        if let Some(metadata) = &self.metadata {
            entries.push((format!("{}{}", id, METADATA_SUFFIX), metadata.as_slice()));
        }
        entries.extend(
            self.annotations
                .iter()
                .map(|(path, blob)| (format!("{}/{}", id, path), blob.as_slice())),
        );
        entries.extend(
            self.attachments
                .iter()
                .map(|(suffix, blob)| (format!("{}{}", id, suffix), blob.as_slice())),
        );
        entries
    }
}

/// Splits an archive into its parts. When `expected_id` is given, the
/// archive must be keyed by it.
pub fn decode(archive: &[u8], expected_id: Option<&str>) -> Result<DocumentContainer> {
    let mut zip = ZipArchive::new(Cursor::new(archive))?;

    let mut id: Option<String> = None;
    let mut visual_base = None;
    let mut content = None;
    let mut pagedata = None;
    let mut metadata = None;
    let mut annotations = BTreeMap::new();
    let mut attachments = BTreeMap::new();

    for index in 0..zip.len() {
        let mut file = zip.by_index(index)?;
        if file.is_dir() {
            continue;
        }
        let name = file.name().to_string();
        let mut bytes = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut bytes)?;

        let split = name.find(['.', '/']).unwrap_or(name.len());
        let (entry_id, rest) = name.split_at(split);
        if entry_id.is_empty() || rest.is_empty() {
            return Err(JournalError::Format(format!(
                "unexpected archive entry '{}'",
                name
            )));
        }

        match &id {
            Some(existing) if existing != entry_id => {
                return Err(JournalError::Format(format!(
                    "archive mixes identifiers '{}' and '{}'",
                    existing, entry_id
                )));
            }
            Some(_) => {}
            None => id = Some(entry_id.to_string()),
        }

        match rest {
            PDF_SUFFIX => visual_base = Some(bytes),
            CONTENT_SUFFIX => content = Some(bytes),
            PAGEDATA_SUFFIX => pagedata = Some(bytes),
            METADATA_SUFFIX => metadata = Some(bytes),
            _ => match rest.strip_prefix('/') {
                Some(path) => {
                    annotations.insert(path.to_string(), bytes);
                }
                None => {
                    attachments.insert(rest.to_string(), bytes);
                }
            },
        }
    }

    let id = id.ok_or_else(|| JournalError::Format("archive is empty".to_string()))?;
    if let Some(expected) = expected_id {
        if expected != id {
            return Err(JournalError::Format(format!(
                "expected document '{}', archive holds '{}'",
                expected, id
            )));
        }
    }
    let visual_base = visual_base
        .ok_or_else(|| JournalError::Format(format!("archive has no '{}{}' entry", id, PDF_SUFFIX)))?;

    Ok(DocumentContainer {
        id: DocumentId::from(id),
        visual_base,
        content,
        pagedata,
        metadata,
        annotations,
        attachments,
    })
}

/// Writes the container under a fresh identifier.
pub fn encode(container: &DocumentContainer) -> Result<EncodedContainer> {
    let id = loop {
        let candidate = DocumentId::generate();
        if candidate != container.id {
            break candidate;
        }
    };

    let page_count = container.page_count()?;
    let content = reconcile_content(container.content.as_deref(), page_count)?;

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (path, bytes) in container.rekeyed(&id, &content) {
        zip.start_file(path, options)?;
        zip.write_all(bytes)?;
    }
    let bytes = zip.finish()?.into_inner();

    log::debug!(
        "encoded container {} -> {} ({} pages, {} bytes)",
        container.id,
        id,
        page_count,
        bytes.len()
    );
    Ok(EncodedContainer { id, bytes })
}

/// Keeps `.content` verbatim when its page count already matches.
fn reconcile_content(content: Option<&[u8]>, page_count: usize) -> Result<Vec<u8>> {
    let Some(raw) = content else {
        return minimal_content(page_count);
    };

    let mut value: serde_json::Value = serde_json::from_slice(raw)
        .map_err(|e| JournalError::Format(format!(".content is not valid JSON: {}", e)))?;
    let recorded = value.get("pageCount").and_then(serde_json::Value::as_u64);
    if recorded == Some(page_count as u64) {
        return Ok(raw.to_vec());
    }

    let object = value
        .as_object_mut()
        .ok_or_else(|| JournalError::Format(".content is not a JSON object".to_string()))?;
    object.insert("pageCount".to_string(), serde_json::Value::from(page_count));
    Ok(serde_json::to_vec_pretty(&value)?)
}

fn minimal_content(page_count: usize) -> Result<Vec<u8>> {
    let descriptor = ContentDescriptor {
        file_type: "pdf",
        orientation: "portrait",
        page_count,
    };
    Ok(serde_json::to_vec_pretty(&descriptor)?)
}

fn pdf_page_count(pdf: &[u8]) -> Result<usize> {
    Ok(lopdf::Document::load_mem(pdf)?.get_pages().len())
}
