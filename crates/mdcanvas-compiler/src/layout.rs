//! Spatial layout of parsed blocks.
//!
//! A single top-to-bottom pass: the cursor only ever moves down, no re-layout
//! or overlap resolution happens. Prose is anchored to the right of the
//! diagram bounding box when one precedes it, otherwise to a fixed default
//! column.

use std::collections::BTreeMap;

use mdcanvas_images::{ImageResolver, is_likely_image_url};
use mdcanvas_parser::{Block, Segment, segment_inlines};
use mdcanvas_scene::{
    BoundingBox, FileRecord, FontFamily, RectSpec, SceneElement, TextSpec,
};

use crate::CompileOptions;
use crate::wrap::wrap_text;

/// Horizontal gap between a diagram bounding box and the prose column.
const MARGIN: f64 = 60.0;
/// Prose column when no diagram anchors the layout.
const DEFAULT_X: f64 = 80.0;
/// First row when no diagram anchors the layout.
const DEFAULT_Y: f64 = 100.0;
/// Word-wrap budget in characters.
const MAX_CHARS: usize = 42;
/// Narrowest emitted text element.
const MIN_TEXT_WIDTH: f64 = 120.0;
/// Approximate glyph width as a fraction of font size.
const CHAR_WIDTH_FACTOR: f64 = 0.62;
/// Line height as a fraction of font size.
const LINE_HEIGHT_FACTOR: f64 = 1.25;
/// Vertical gap after most blocks.
const BLOCK_GAP: f64 = 12.0;
/// Vertical gap after a heading.
const HEADING_GAP: f64 = 18.0;
/// Monospace size for code blocks.
const CODE_FONT_SIZE: f64 = 16.0;
/// Blockquote font size.
const QUOTE_FONT_SIZE: f64 = 18.0;
/// Horizontal padding of the code background rectangle.
const CODE_PAD_X: f64 = 8.0;
/// Vertical padding of the code background rectangle.
const CODE_PAD_Y: f64 = 6.0;
/// Horizontal indent per list nesting level.
const INDENT_STEP: f64 = 16.0;

/// Font size per heading level (1-6).
const HEADING_SIZES: [f64; 6] = [28.0, 24.0, 20.0, 18.0, 16.0, 16.0];

/// Elements and files produced by one layout pass.
#[derive(Debug, Default)]
pub struct LayoutOutput {
    pub elements: Vec<SceneElement>,
    pub files: BTreeMap<String, FileRecord>,
}

/// Assigns position and size to every block and inline segment.
///
/// Owns the layout cursor for the duration of one pass; a fresh engine is
/// built per compile call, so compilation is re-entrant.
pub struct LayoutEngine<'a> {
    resolver: &'a ImageResolver,
    options: &'a CompileOptions,
    x_base: f64,
    y_offset: f64,
    output: LayoutOutput,
}

impl<'a> LayoutEngine<'a> {
    /// Engine anchored to the diagram bounding box, or the defaults.
    #[must_use]
    pub fn new(
        resolver: &'a ImageResolver,
        options: &'a CompileOptions,
        diagram_bbox: Option<BoundingBox>,
    ) -> Self {
        let (x_base, y_offset) = match diagram_bbox {
            Some(bbox) => (bbox.max_x + MARGIN, bbox.min_y),
            None => (DEFAULT_X, DEFAULT_Y),
        };
        Self {
            resolver,
            options,
            x_base,
            y_offset,
            output: LayoutOutput::default(),
        }
    }

    /// Lay out all blocks in document order.
    #[must_use]
    pub fn run(mut self, blocks: &[Block]) -> LayoutOutput {
        for block in blocks {
            match block {
                Block::Code { text } => self.emit_code(text),
                Block::Heading { level, text } => {
                    let size = HEADING_SIZES
                        .get(usize::from(level.saturating_sub(1)))
                        .copied()
                        .unwrap_or(self.options.font_size);
                    self.emit_segments(text, size, 0.0, HEADING_GAP);
                }
                Block::Blockquote { text } => {
                    let text = format!("\u{275d} {text}");
                    self.emit_segments(&text, QUOTE_FONT_SIZE, 0.0, BLOCK_GAP);
                }
                Block::ListItem {
                    ordered,
                    index,
                    indent,
                    text,
                } => {
                    let prefix = if *ordered {
                        format!("{}.", index.unwrap_or(1))
                    } else {
                        String::from("\u{2022}")
                    };
                    let text = format!("{prefix} {text}");
                    #[allow(clippy::cast_precision_loss)]
                    let indent_x = INDENT_STEP * (*indent as f64);
                    self.emit_segments(&text, self.options.font_size, indent_x, BLOCK_GAP);
                }
                Block::Paragraph { text } => {
                    self.emit_segments(text, self.options.font_size, 0.0, BLOCK_GAP);
                }
            }
        }
        self.output
    }

    /// Emit a code block: background rectangle plus verbatim monospace text.
    ///
    /// Code is never inline-segmented; image references inside it stay
    /// literal text.
    fn emit_code(&mut self, text: &str) {
        let lines = wrap_text(text, MAX_CHARS);
        let (width, height) = text_extent(&lines, CODE_FONT_SIZE);

        self.output.elements.push(SceneElement::rectangle(RectSpec {
            x: self.x_base - CODE_PAD_X,
            y: self.y_offset - CODE_PAD_Y,
            width: width + CODE_PAD_X * 2.0,
            height: height + CODE_PAD_Y * 2.0,
            stroke_color: String::from("#e5e7eb"),
            background_color: String::from("#f6f8fa"),
            roughness: 0,
            ..RectSpec::default()
        }));
        self.output.elements.push(SceneElement::text(TextSpec {
            x: self.x_base,
            y: self.y_offset,
            width,
            height,
            text: lines.join("\n"),
            font_size: CODE_FONT_SIZE,
            font_family: FontFamily::Cascadia,
            stroke_color: self.options.color.clone(),
            ..TextSpec::default()
        }));

        self.y_offset += height + BLOCK_GAP;
    }

    /// Segment block text and emit a text element per run, resolving inline
    /// images through the [`ImageResolver`].
    fn emit_segments(&mut self, text: &str, font_size: f64, indent_x: f64, gap: f64) {
        for segment in segment_inlines(text) {
            match segment {
                Segment::Image { alt, url } => {
                    if !is_likely_image_url(&url) {
                        tracing::warn!(url, "skipping non-image URL");
                        continue;
                    }
                    let resolved =
                        self.resolver
                            .resolve(&url, self.x_base + indent_x, self.y_offset, &alt);
                    self.y_offset += resolved.advance(BLOCK_GAP);
                    self.output
                        .files
                        .insert(resolved.file_record.id.clone(), resolved.file_record);
                    self.output.elements.push(resolved.element);
                    self.output.elements.extend(resolved.caption);
                    self.output.elements.extend(resolved.extras);
                }
                Segment::Text { text } => {
                    let lines = wrap_text(&text, MAX_CHARS);
                    let (width, height) = text_extent(&lines, font_size);
                    self.output.elements.push(SceneElement::text(TextSpec {
                        x: self.x_base + indent_x,
                        y: self.y_offset,
                        width,
                        height,
                        text: lines.join("\n"),
                        font_size,
                        font_family: self.options.font_family,
                        stroke_color: self.options.color.clone(),
                        ..TextSpec::default()
                    }));
                    self.y_offset += height + gap;
                }
            }
        }
    }
}

/// Width and height of wrapped lines at a font size.
fn text_extent(lines: &[String], font_size: f64) -> (f64, f64) {
    let longest = lines
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .max(1);
    #[allow(clippy::cast_precision_loss)]
    let width = (longest as f64 * font_size * CHAR_WIDTH_FACTOR)
        .round()
        .max(MIN_TEXT_WIDTH);
    #[allow(clippy::cast_precision_loss)]
    let height = (lines.len() as f64 * font_size * LINE_HEIGHT_FACTOR).round();
    (width, height)
}
