//! Markdown-to-scene compilation for mdcanvas.
//!
//! Pipeline: raw text is classified into diagram regions and prose
//! ([`mdcanvas_parser::classify`]), regions are converted through the
//! [`DiagramAdapter`] boundary, prose is parsed into blocks and laid out by
//! the [`layout::LayoutEngine`] anchored to the diagram bounding box, and the
//! resulting primitives and file records are assembled into a [`Scene`].
//!
//! Compilation is best-effort by design: a failing diagram region or image
//! fetch is logged and skipped or substituted, and a valid scene is always
//! returned. The pass is sequential because the layout cursor is inherently
//! ordered.
//!
//! # Example
//!
//! ```
//! use mdcanvas_compiler::{CompileOptions, Compiler, NoopAdapter};
//!
//! let markdown = "# Title\n\nSome text";
//! let scene = Compiler::new(&NoopAdapter).compile(markdown);
//! assert_eq!(scene.elements.len(), 2);
//! ```

mod adapter;
mod layout;
mod wrap;

use std::collections::BTreeMap;

use mdcanvas_images::ImageResolver;
use mdcanvas_parser::{classify, parse_blocks};
use mdcanvas_scene::{BoundingBox, FontFamily, Scene, SceneElement};

pub use adapter::{AdapterError, DiagramAdapter, NoopAdapter, ParsedDiagram};
pub use layout::{LayoutEngine, LayoutOutput};

/// Styling applied to prose layout.
#[derive(Clone, Debug)]
pub struct CompileOptions {
    /// Body font for non-code text.
    pub font_family: FontFamily,
    /// Base font size for paragraphs and list items.
    pub font_size: f64,
    /// Stroke color of emitted text.
    pub color: String,
    /// Block spacing hint, accepted for API compatibility; block gaps are
    /// currently fixed.
    pub line_height: f64,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            font_family: FontFamily::Helvetica,
            font_size: 20.0,
            color: String::from("#1e1e1e"),
            line_height: 28.0,
        }
    }
}

/// Compiles markdown into laid-out scenes.
///
/// Holds the diagram adapter, options, and the image resolver (so its HTTP
/// agent is pooled across compile calls). Each call owns its own cursor
/// state; the compiler is re-entrant.
pub struct Compiler<'a> {
    adapter: &'a dyn DiagramAdapter,
    options: CompileOptions,
    resolver: ImageResolver,
}

impl<'a> Compiler<'a> {
    /// Compiler with default options and resolver.
    #[must_use]
    pub fn new(adapter: &'a dyn DiagramAdapter) -> Self {
        Self {
            adapter,
            options: CompileOptions::default(),
            resolver: ImageResolver::new(),
        }
    }

    /// Replace the layout options.
    #[must_use]
    pub fn with_options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the image resolver (e.g. to shorten fetch timeouts).
    #[must_use]
    pub fn with_resolver(mut self, resolver: ImageResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Compile markdown into a scene document.
    ///
    /// Diagram regions are converted sequentially; regions that precede all
    /// prose anchor the prose column to the right of their merged bounding
    /// box and their primitives come first in the element order. Regions
    /// detected after prose are appended after the prose primitives and do
    /// not move the anchor.
    #[must_use]
    pub fn compile(&self, markdown: &str) -> Scene {
        let classified = classify(markdown);

        let mut elements: Vec<SceneElement> = Vec::new();
        let mut trailing: Vec<SceneElement> = Vec::new();
        let mut files = BTreeMap::new();
        let mut anchor_bbox: Option<BoundingBox> = None;

        for (index, region) in classified.diagrams.iter().enumerate() {
            match self.adapter.parse(&region.source) {
                Ok(parsed) => {
                    if region.leading {
                        anchor_bbox = BoundingBox::merge(
                            anchor_bbox,
                            BoundingBox::of_elements(&parsed.elements),
                        );
                        elements.extend(parsed.elements);
                    } else {
                        trailing.extend(parsed.elements);
                    }
                    files.extend(parsed.files);
                }
                Err(error) => {
                    tracing::error!(index, %error, "diagram region failed to convert, skipping");
                }
            }
        }

        if !classified.prose.is_empty() {
            let blocks = parse_blocks(&classified.prose);
            let output = LayoutEngine::new(&self.resolver, &self.options, anchor_bbox).run(&blocks);
            elements.extend(output.elements);
            files.extend(output.files);
        }
        elements.extend(trailing);

        Scene::new(elements, files)
    }
}

/// One-shot convenience wrapper around [`Compiler`].
#[must_use]
pub fn compile(markdown: &str, adapter: &dyn DiagramAdapter, options: CompileOptions) -> Scene {
    Compiler::new(adapter).with_options(options).compile(markdown)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use mdcanvas_scene::{FileRecord, RectSpec, Scene, TextSpec};

    use super::*;

    /// Adapter producing one fixed rectangle per region.
    struct BoxAdapter;

    impl DiagramAdapter for BoxAdapter {
        fn parse(&self, _source: &str) -> Result<ParsedDiagram, AdapterError> {
            Ok(ParsedDiagram {
                elements: vec![SceneElement::rectangle(RectSpec {
                    x: 0.0,
                    y: 0.0,
                    width: 240.0,
                    height: 120.0,
                    ..RectSpec::default()
                })],
                files: BTreeMap::new(),
            })
        }
    }

    /// Adapter that always fails.
    struct FailingAdapter;

    impl DiagramAdapter for FailingAdapter {
        fn parse(&self, _source: &str) -> Result<ParsedDiagram, AdapterError> {
            Err(AdapterError::new("syntax error at line 1"))
        }
    }

    fn quick_compiler(adapter: &dyn DiagramAdapter) -> Compiler<'_> {
        Compiler::new(adapter)
            .with_resolver(ImageResolver::with_timeout(Duration::from_millis(200)))
    }

    fn text_contents(scene: &Scene) -> Vec<&str> {
        scene
            .elements
            .iter()
            .filter_map(|e| match e {
                SceneElement::Text(t) => Some(t.text.as_str()),
                SceneElement::Rectangle(_) | SceneElement::Image(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_heading_paragraph_and_trailing_diagram() {
        let markdown = "# Title\n\nSome text\n\n```mermaid\ngraph TD\nA-->B\n```";
        let scene = quick_compiler(&BoxAdapter).compile(markdown);

        // diagram detected after the prose: its primitives come last and the
        // prose keeps the default anchor column
        assert_eq!(scene.elements.len(), 3);
        let SceneElement::Text(heading) = &scene.elements[0] else {
            panic!("expected heading text first");
        };
        assert_eq!(heading.text, "Title");
        assert_eq!(heading.font_size, 28.0);
        assert_eq!(heading.common.x, 80.0);
        let SceneElement::Text(paragraph) = &scene.elements[1] else {
            panic!("expected paragraph text second");
        };
        assert_eq!(paragraph.text, "Some text");
        assert!(matches!(scene.elements[2], SceneElement::Rectangle(_)));
    }

    #[test]
    fn test_leading_diagram_anchors_prose() {
        let markdown = "```mermaid\ngraph TD\nA-->B\n```\n\nSome text";
        let scene = quick_compiler(&BoxAdapter).compile(markdown);

        assert!(matches!(scene.elements[0], SceneElement::Rectangle(_)));
        let SceneElement::Text(paragraph) = &scene.elements[1] else {
            panic!("expected paragraph text after diagram");
        };
        // anchored to the right of the 240-wide diagram box plus margin
        assert_eq!(paragraph.common.x, 300.0);
        assert_eq!(paragraph.common.y, 0.0);
    }

    #[test]
    fn test_ordered_list_scenario() {
        let scene = quick_compiler(&NoopAdapter).compile("1. First\n2. Second");
        assert_eq!(text_contents(&scene), vec!["1. First", "2. Second"]);
        assert!(scene.elements[1].common().y > scene.elements[0].common().y);
    }

    #[test]
    fn test_failing_region_skipped() {
        let markdown = "graph TD\nA-->B\n\nStill compiles fine.";
        let scene = quick_compiler(&FailingAdapter).compile(markdown);
        assert_eq!(text_contents(&scene), vec!["Still compiles fine."]);
    }

    #[test]
    fn test_unreachable_image_scenario() {
        let scene =
            quick_compiler(&NoopAdapter).compile("![alt](http://127.0.0.1:1/img.png)");

        let images: Vec<_> = scene
            .elements
            .iter()
            .filter(|e| matches!(e, SceneElement::Image(_)))
            .collect();
        let rectangles = scene
            .elements
            .iter()
            .filter(|e| matches!(e, SceneElement::Rectangle(_)))
            .count();
        assert_eq!(images.len(), 1);
        assert_eq!(rectangles, 1);
        let common = images[0].common();
        assert_eq!((common.width, common.height), (200.0, 150.0));
        // glyph, URL, and caption texts
        let texts = text_contents(&scene);
        assert_eq!(texts.len(), 3);
        assert!(texts.contains(&"alt"));
        assert!(texts.contains(&"http://127.0.0.1:1/img.png"));
    }

    #[test]
    fn test_files_match_referenced_file_ids() {
        let markdown =
            "![a](http://127.0.0.1:1/a.png)\n\ntext between\n\n![b](http://127.0.0.1:1/b.png)";
        let scene = quick_compiler(&NoopAdapter).compile(markdown);

        let referenced: std::collections::BTreeSet<String> = scene
            .elements
            .iter()
            .filter_map(|e| e.file_id().map(str::to_owned))
            .collect();
        let stored: std::collections::BTreeSet<String> = scene.files.keys().cloned().collect();
        assert_eq!(referenced, stored);
        assert_eq!(stored.len(), 2);
    }

    #[test]
    fn test_scene_round_trip() {
        let markdown = "# Head\n\n> quote\n\n```\ncode();\n```";
        let scene = quick_compiler(&NoopAdapter).compile(markdown);
        let json = serde_json::to_string(&scene).unwrap();
        let parsed: Scene = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, scene);
    }

    #[test]
    fn test_adapter_files_merged() {
        struct FileAdapter;
        impl DiagramAdapter for FileAdapter {
            fn parse(&self, _source: &str) -> Result<ParsedDiagram, AdapterError> {
                let id = String::from("diagfile");
                let mut files = BTreeMap::new();
                files.insert(
                    id.clone(),
                    FileRecord::new(
                        id.clone(),
                        String::from("data:image/png;base64,AAAA"),
                        String::from("image/png"),
                    ),
                );
                Ok(ParsedDiagram {
                    elements: vec![SceneElement::image(id, 0.0, 0.0, 64.0, 64.0)],
                    files,
                })
            }
        }

        let scene = quick_compiler(&FileAdapter).compile("graph TD\nA-->B");
        assert!(scene.files.contains_key("diagfile"));
        assert_eq!(scene.elements[0].file_id(), Some("diagfile"));
    }

    #[test]
    fn test_compile_convenience_fn() {
        let scene = compile("plain", &NoopAdapter, CompileOptions::default());
        assert_eq!(text_contents(&scene), vec!["plain"]);
    }

    #[test]
    fn test_custom_options_applied() {
        let options = CompileOptions {
            font_size: 16.0,
            color: String::from("#ff0000"),
            ..CompileOptions::default()
        };
        let scene = quick_compiler(&NoopAdapter)
            .with_options(options)
            .compile("body text");
        let SceneElement::Text(text) = &scene.elements[0] else {
            panic!("expected text");
        };
        assert_eq!(text.font_size, 16.0);
        assert_eq!(text.common.stroke_color, "#ff0000");
    }

    #[test]
    fn test_text_spec_defaults_are_consistent() {
        // keep the TextSpec default font aligned with CompileOptions
        let spec = TextSpec::default();
        let options = CompileOptions::default();
        assert_eq!(spec.font_size, options.font_size);
        assert_eq!(spec.font_family, options.font_family);
    }
}
