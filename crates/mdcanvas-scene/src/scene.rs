//! The canonical scene document envelope.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::element::SceneElement;

/// Source attribution written into exported scenes.
const SCENE_SOURCE: &str = "https://excalidraw.com";

/// Canvas state defaults shipped with every scene.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub grid_size: Option<u32>,
    pub view_background_color: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            grid_size: None,
            view_background_color: String::from("#ffffff"),
        }
    }
}

/// An embedded binary payload, referenced from an image element's `fileId`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: String,
    /// Base64-encoded payload with a `data:{mime};base64,` prefix.
    #[serde(rename = "dataURL")]
    pub data_url: String,
    pub mime_type: String,
    pub created: u64,
    pub last_retrieved: u64,
}

impl FileRecord {
    /// Create a record timestamped now.
    #[must_use]
    pub fn new(id: String, data_url: String, mime_type: String) -> Self {
        let now = crate::id::unix_millis();
        Self {
            id,
            data_url,
            mime_type,
            created: now,
            last_retrieved: now,
        }
    }
}

/// The scene document consumed by the canvas renderer.
///
/// Invariant: every `fileId` referenced by an element in `elements` has a
/// matching key in `files`. Producers register the file record together with
/// the element; the assembler only merges the maps.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(rename = "type")]
    pub kind: String,
    pub version: u32,
    pub source: String,
    pub elements: Vec<SceneElement>,
    #[serde(rename = "appState")]
    pub app_state: AppState,
    pub files: BTreeMap<String, FileRecord>,
}

impl Scene {
    /// Wrap elements and files in the canonical envelope.
    #[must_use]
    pub fn new(elements: Vec<SceneElement>, files: BTreeMap<String, FileRecord>) -> Self {
        Self {
            kind: String::from("excalidraw"),
            version: 2,
            source: String::from(SCENE_SOURCE),
            elements,
            app_state: AppState::default(),
            files,
        }
    }
}
