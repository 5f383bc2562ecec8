//! Fixtures shared by the unit tests: small journal PDFs and `.rmdoc` archives.

use crate::container::DocumentContainer;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::collections::BTreeMap;

/// A journal PDF with `page_count` pages. Every page carries a text line and a
/// URI link annotation; media box and font resources live on the page tree
/// root and are inherited.
pub fn journal_pdf(page_count: u32) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for n in 1..=page_count {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![50.into(), 1700.into()]),
                Operation::new("Tj", vec![Object::string_literal(format!("Page {}", n))]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("fixture content encodes"),
        ));
        let link_id = doc.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Link",
            "Rect" => vec![40.into(), 40.into(), 400.into(), 120.into()],
            "Border" => vec![0.into(), 0.into(), 0.into()],
            "A" => dictionary! {
                "S" => "URI",
                "URI" => Object::string_literal(format!("https://example.com/day/{}", n)),
            },
        });
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Annots" => vec![link_id.into()],
        });
        kids.push(page_id.into());
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => i64::from(page_count),
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 1404.into(), 1872.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

pub fn journal_pdf_bytes(page_count: u32) -> Vec<u8> {
    let mut doc = journal_pdf(page_count);
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("fixture pdf saves");
    bytes
}

/// A container as a tablet would hand it out: two pages of strokes, a
/// thumbnail and all three descriptor files.
pub fn tablet_container(id: &str, page_count: u32) -> DocumentContainer {
    let mut annotations = BTreeMap::new();
    annotations.insert("page-a.rm".to_string(), b"reMarkable .lines file, version=6 A".to_vec());
    annotations.insert("page-b.rm".to_string(), b"reMarkable .lines file, version=6 B".to_vec());
    annotations.insert(
        "page-b-metadata.json".to_string(),
        br#"{"layers":[{"name":"Layer 1"}]}"#.to_vec(),
    );

    let mut attachments = BTreeMap::new();
    attachments.insert(".thumbnails/page-a.png".to_string(), vec![0x89, b'P', b'N', b'G']);
    attachments.insert(".local".to_string(), br#"{"contentFormatVersion":2}"#.to_vec());

    DocumentContainer {
        id: id.into(),
        visual_base: journal_pdf_bytes(page_count),
        content: Some(
            format!(
                r#"{{"fileType":"pdf","orientation":"portrait","pageCount":{},"tags":[]}}"#,
                page_count
            )
            .into_bytes(),
        ),
        pagedata: Some(b"Blank\nBlank\n".to_vec()),
        metadata: Some(br#"{"visibleName":"Bullet Journal","type":"DocumentType"}"#.to_vec()),
        annotations,
        attachments,
    }
}
