//! # Underlay compositing
//!
//! Overlays are slid *beneath* the existing page so that hyperlinks and
//! everything else the template draws stay on top and clickable.
//!
//! For every page that receives an overlay:
//!
//! 1. The overlay content stream becomes a Form XObject carrying its own
//!    font resources, translated onto the page's media box origin.
//! 2. The page gets a private copy of its (possibly inherited or shared)
//!    resource dictionary with the XObject registered under a fresh name.
//! 3. A `q /Name Do Q` stream is prepended to the page's `/Contents`.
//!
//! `/Annots` and every other page entry are left untouched, and pages are
//! never added, removed or reordered.

use crate::error::Result;
use crate::overlay::{self, OverlayLayer, OverlayStyle, PageSize, FONT_BASE, FONT_RESOURCE};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::collections::BTreeMap;

const DEFAULT_MEDIA_BOX: MediaBox = MediaBox {
    x0: 0.0,
    y0: 0.0,
    x1: 612.0,
    y1: 792.0,
};
const UNDERLAY_PREFIX: &str = "RmjUnderlay";
const MAX_TREE_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl MediaBox {
    pub fn size(&self) -> PageSize {
        PageSize::new(self.x1 - self.x0, self.y1 - self.y0)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MergeReport {
    /// Pages that received an underlay, in page order.
    pub modified: Vec<u32>,
    /// Overlay pages past the end of the document.
    pub skipped: Vec<u32>,
}

/// The page's media box, following `/Parent` inheritance. Falls back to US
/// Letter when no usable box is found.
pub fn media_box(doc: &Document, page_id: ObjectId) -> MediaBox {
    let values: Vec<f32> = inherited_attribute(doc, page_id, b"MediaBox")
        .and_then(|obj| obj.as_array().ok())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| resolve(doc, item).and_then(|v| v.as_float().ok()))
                .collect()
        })
        .unwrap_or_default();

    match values.as_slice() {
        [a, b, c, d] => MediaBox {
            x0: a.min(*c),
            y0: b.min(*d),
            x1: a.max(*c),
            y1: b.max(*d),
        },
        _ => DEFAULT_MEDIA_BOX,
    }
}

/// Renders an overlay for each page that exists in `doc`. Pages past the
/// end of the document are left out.
pub fn render_overlays(
    doc: &Document,
    items_by_page: &BTreeMap<u32, Vec<String>>,
    style: &OverlayStyle,
) -> BTreeMap<u32, OverlayLayer> {
    let pages = doc.get_pages();
    items_by_page
        .iter()
        .filter_map(|(page, items)| {
            let page_id = pages.get(page)?;
            let size = media_box(doc, *page_id).size();
            Some((*page, overlay::render(items, style, size)))
        })
        .collect()
}

/// Composes `layer` beneath the existing content of `page_id`.
/// Returns `false` when the layer is empty and the page was left alone.
pub fn merge_page(doc: &mut Document, page_id: ObjectId, layer: &OverlayLayer) -> Result<bool> {
    if layer.is_empty() {
        return Ok(false);
    }

    let bbox = media_box(doc, page_id);
    let mut resources = owned_resources(doc, page_id);
    let mut xobjects = resources
        .get(b"XObject")
        .ok()
        .and_then(|obj| resolve(doc, obj))
        .and_then(|obj| obj.as_dict().ok())
        .cloned()
        .unwrap_or_else(Dictionary::new);
    let existing_contents = content_refs(doc, page_id)?;

    let form_id = doc.add_object(form_xobject(layer, bbox)?);
    let name = fresh_name(&xobjects);
    xobjects.set(name.clone(), Object::Reference(form_id));
    resources.set("XObject", Object::Dictionary(xobjects));

    let invoke = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new("Do", vec![Object::Name(name.into_bytes())]),
            Operation::new("Q", vec![]),
        ],
    };
    let invoke_id = doc.add_object(Stream::new(Dictionary::new(), invoke.encode()?));

    let mut contents = Vec::with_capacity(existing_contents.len() + 1);
    contents.push(Object::Reference(invoke_id));
    contents.extend(existing_contents);

    let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
    page.set("Contents", Object::Array(contents));
    page.set("Resources", Object::Dictionary(resources));
    Ok(true)
}

/// Applies each overlay to its page. Page count and order never change.
pub fn merge_document(
    doc: &mut Document,
    overlays: &BTreeMap<u32, OverlayLayer>,
) -> Result<MergeReport> {
    let pages = doc.get_pages();
    let mut report = MergeReport::default();

    for (page, layer) in overlays {
        let Some(page_id) = pages.get(page) else {
            report.skipped.push(*page);
            continue;
        };
        if merge_page(doc, *page_id, layer)? {
            report.modified.push(*page);
            if report.modified.len() % 10 == 0 {
                log::debug!("merged {} pages so far", report.modified.len());
            }
        }
    }

    Ok(report)
}

fn form_xobject(layer: &OverlayLayer, bbox: MediaBox) -> Result<Stream> {
    let size = layer.size();

    let mut fonts = Dictionary::new();
    fonts.set(
        FONT_RESOURCE,
        dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => FONT_BASE,
            "Encoding" => "WinAnsiEncoding",
        },
    );

    let dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Form",
        "BBox" => vec![
            Object::Real(0.0),
            Object::Real(0.0),
            Object::Real(size.width),
            Object::Real(size.height),
        ],
        "Matrix" => vec![
            Object::Real(1.0),
            Object::Real(0.0),
            Object::Real(0.0),
            Object::Real(1.0),
            Object::Real(bbox.x0),
            Object::Real(bbox.y0),
        ],
        "Resources" => dictionary! { "Font" => fonts },
    };

    Ok(Stream::new(dict, layer.encode()?))
}

/// A page-private copy of the effective resource dictionary.
fn owned_resources(doc: &Document, page_id: ObjectId) -> Dictionary {
    inherited_attribute(doc, page_id, b"Resources")
        .and_then(|obj| obj.as_dict().ok())
        .cloned()
        .unwrap_or_else(Dictionary::new)
}

/// The page's content streams as a flat list of references.
fn content_refs(doc: &Document, page_id: ObjectId) -> Result<Vec<Object>> {
    let page = doc.get_object(page_id)?.as_dict()?;
    let refs = match page.get(b"Contents") {
        Ok(Object::Reference(id)) => match doc.get_object(*id) {
            Ok(Object::Array(items)) => items.clone(),
            _ => vec![Object::Reference(*id)],
        },
        Ok(Object::Array(items)) => items.clone(),
        _ => Vec::new(),
    };
    Ok(refs)
}

fn fresh_name(xobjects: &Dictionary) -> String {
    let mut index = 0usize;
    loop {
        let candidate = format!("{}{}", UNDERLAY_PREFIX, index);
        if !xobjects.has(candidate.as_bytes()) {
            return candidate;
        }
        index += 1;
    }
}

fn inherited_attribute<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut node = page_id;
    for _ in 0..MAX_TREE_DEPTH {
        let dict = doc.get_object(node).ok()?.as_dict().ok()?;
        if let Ok(value) = dict.get(key) {
            return resolve(doc, value);
        }
        node = dict.get(b"Parent").ok()?.as_reference().ok()?;
    }
    None
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}
