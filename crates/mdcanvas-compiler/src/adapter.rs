//! Diagram adapter boundary.
//!
//! Converting a diagram description into graphic primitives is an external
//! collaborator's job. The compiler only consumes the result through
//! [`DiagramAdapter`]; one failing region is logged and skipped, compilation
//! continues with the next.

use std::collections::BTreeMap;

use mdcanvas_scene::{FileRecord, SceneElement};

/// Primitives produced for one diagram region.
#[derive(Clone, Debug, Default)]
pub struct ParsedDiagram {
    /// Graphic primitives in render order.
    pub elements: Vec<SceneElement>,
    /// File records referenced by any image primitives.
    pub files: BTreeMap<String, FileRecord>,
}

/// A diagram region could not be converted.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct AdapterError(String);

impl AdapterError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Converts diagram description text into scene primitives.
pub trait DiagramAdapter {
    /// Parse one diagram region into positioned primitives and their files.
    fn parse(&self, source: &str) -> Result<ParsedDiagram, AdapterError>;
}

/// Adapter that drops every diagram region.
///
/// Used when no external diagram renderer is wired in; detected regions are
/// logged and produce no primitives.
pub struct NoopAdapter;

impl DiagramAdapter for NoopAdapter {
    fn parse(&self, source: &str) -> Result<ParsedDiagram, AdapterError> {
        tracing::debug!(
            lines = source.lines().count(),
            "no diagram adapter configured, region dropped"
        );
        Ok(ParsedDiagram::default())
    }
}
