//! Excalidraw scene data model for mdcanvas.
//!
//! This crate defines the graphical primitives a compiled markdown document is
//! made of, plus the envelope they are shipped in:
//! - [`SceneElement`]: text, rectangle, and image primitives with full
//!   excalidraw field sets
//! - [`Scene`]: the `type: "excalidraw", version: 2` document envelope
//! - [`FileRecord`]: embedded binary payloads referenced by image elements
//! - [`BoundingBox`]: mergeable element extents used as layout anchors
//!
//! Serialization is lossless for every defined field, so a compiled scene can
//! be re-serialized and parsed back to a structurally identical document.

mod bbox;
mod element;
mod id;
mod scene;

pub use bbox::BoundingBox;
pub use element::{
    ElementCommon, FontFamily, ImageElement, RectSpec, RectangleElement, SceneElement, TextAlign,
    TextElement, TextSpec, VerticalAlign,
};
pub use id::{element_id, random_seed, unix_millis};
pub use scene::{AppState, FileRecord, Scene};
