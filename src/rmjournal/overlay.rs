//! Renders recurring items into a single-page content stream.
//!
//! The layer is drawn in page space with the origin at the bottom-left of
//! the page's media box. [`crate::merge`] turns it into a Form XObject and
//! slides it beneath the existing page content.

use crate::error::Result;
use lopdf::content::{Content, Operation};
use lopdf::Object;

/// Resource name the text operators refer to.
pub const FONT_RESOURCE: &str = "F1";
pub const FONT_BASE: &str = "Helvetica";

const COLUMN_X: f32 = 0.55;
const LINE_PITCH: f32 = 1.5;
const DIVIDER_GRAY: f32 = 0.7;
const DIVIDER_WIDTH: f32 = 1.0;
const BULLET: &str = "\u{2022} ";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    pub font_size: f32,
    /// Fraction of page height for the first baseline, 0 is the bottom.
    pub y_position: f32,
    pub add_divider: bool,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            font_size: 36.0,
            y_position: 0.82,
            add_divider: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone)]
pub struct OverlayLayer {
    size: PageSize,
    operations: Vec<Operation>,
    lines: usize,
}

impl OverlayLayer {
    pub fn empty(size: PageSize) -> Self {
        Self {
            size,
            operations: Vec::new(),
            lines: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn size(&self) -> PageSize {
        self.size
    }

    /// Number of item lines that fit on the page.
    pub fn lines(&self) -> usize {
        self.lines
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let content = Content {
            operations: self.operations.clone(),
        };
        Ok(content.encode()?)
    }
}

pub fn render(items: &[String], style: &OverlayStyle, size: PageSize) -> OverlayLayer {
    let mut layer = OverlayLayer::empty(size);
    if items.is_empty() {
        return layer;
    }

    if style.add_divider {
        let x = size.width / 2.0;
        layer.operations.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "RG",
                vec![real(DIVIDER_GRAY), real(DIVIDER_GRAY), real(DIVIDER_GRAY)],
            ),
            Operation::new("w", vec![real(DIVIDER_WIDTH)]),
            Operation::new("m", vec![real(x), real(0.0)]),
            Operation::new("l", vec![real(x), real(size.height)]),
            Operation::new("S", vec![]),
            Operation::new("Q", vec![]),
        ]);
    }

    let x = size.width * COLUMN_X;
    let pitch = style.font_size * LINE_PITCH;
    let mut y = size.height * style.y_position;

    layer.operations.extend([
        Operation::new("BT", vec![]),
        Operation::new(
            "Tf",
            vec![Object::Name(FONT_RESOURCE.into()), real(style.font_size)],
        ),
        Operation::new("rg", vec![real(0.0), real(0.0), real(0.0)]),
    ]);

    for item in items {
        if y < 0.0 {
            break;
        }
        let text = format!("{}{}", BULLET, item);
        layer.operations.push(Operation::new(
            "Tm",
            vec![
                real(1.0),
                real(0.0),
                real(0.0),
                real(1.0),
                real(x),
                real(y),
            ],
        ));
        layer.operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(encode_win_ansi(&text))],
        ));
        layer.lines += 1;
        y -= pitch;
    }

    layer.operations.push(Operation::new("ET", vec![]));
    layer
}

fn real(value: f32) -> Object {
    Object::Real(value)
}

/// Maps text onto the WinAnsiEncoding used by the standard Helvetica font.
/// Characters outside the encoding become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{20AC}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{00A0}'..='\u{00FF}' => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}
