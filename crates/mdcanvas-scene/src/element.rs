//! Scene element primitives.
//!
//! Three element kinds are produced by the compiler: text, rectangle, and
//! image. All carry the full excalidraw common field set so serialized scenes
//! open directly on an excalidraw canvas.

use serde::{Deserialize, Serialize};

use crate::id::{element_id, random_seed, unix_millis};

/// Line height multiplier used for text baselines.
const TEXT_LINE_HEIGHT: f64 = 1.25;

/// Font families supported by the canvas renderer.
///
/// Serialized as the excalidraw numeric codes: 1 = Virgil (hand-drawn),
/// 2 = Helvetica, 3 = Cascadia (monospace).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum FontFamily {
    Virgil,
    #[default]
    Helvetica,
    Cascadia,
}

impl From<FontFamily> for u8 {
    fn from(family: FontFamily) -> Self {
        match family {
            FontFamily::Virgil => 1,
            FontFamily::Helvetica => 2,
            FontFamily::Cascadia => 3,
        }
    }
}

impl TryFrom<u8> for FontFamily {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Virgil),
            2 => Ok(Self::Helvetica),
            3 => Ok(Self::Cascadia),
            other => Err(format!("unknown font family code: {other}")),
        }
    }
}

/// Horizontal text alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical text alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Fields shared by every element kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementCommon {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub angle: f64,
    pub stroke_color: String,
    pub background_color: String,
    pub fill_style: String,
    pub stroke_width: u32,
    pub stroke_style: String,
    pub roughness: u32,
    pub opacity: u32,
    pub version: u32,
    pub version_nonce: u32,
    pub seed: u32,
    pub is_deleted: bool,
    pub group_ids: Vec<String>,
    pub frame_id: Option<String>,
    pub roundness: Option<serde_json::Value>,
    pub bound_elements: Vec<serde_json::Value>,
    pub updated: u64,
    pub link: Option<String>,
    pub locked: bool,
}

impl ElementCommon {
    /// Common fields with a fresh id, seed, and nonce at the given geometry.
    fn at(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: element_id(),
            x,
            y,
            width,
            height,
            angle: 0.0,
            stroke_color: String::from("#000000"),
            background_color: String::from("transparent"),
            fill_style: String::from("hachure"),
            stroke_width: 1,
            stroke_style: String::from("solid"),
            roughness: 1,
            opacity: 100,
            version: 1,
            version_nonce: random_seed(),
            seed: random_seed(),
            is_deleted: false,
            group_ids: Vec::new(),
            frame_id: None,
            roundness: None,
            bound_elements: Vec::new(),
            updated: unix_millis(),
            link: None,
            locked: false,
        }
    }
}

/// A text primitive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextElement {
    #[serde(flatten)]
    pub common: ElementCommon,
    pub font_size: f64,
    pub font_family: FontFamily,
    pub text: String,
    pub text_align: TextAlign,
    pub vertical_align: VerticalAlign,
    pub container_id: Option<String>,
    pub original_text: String,
    pub baseline: f64,
    pub line_height: f64,
}

/// A rectangle primitive (code block backgrounds, placeholder frames).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RectangleElement {
    #[serde(flatten)]
    pub common: ElementCommon,
}

/// An image primitive referencing an embedded [`FileRecord`] by id.
///
/// [`FileRecord`]: crate::FileRecord
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageElement {
    #[serde(flatten)]
    pub common: ElementCommon,
    pub status: String,
    pub file_id: String,
    pub scale: [f64; 2],
}

/// Properties for building a text element.
///
/// Only the fields a call site cares about need to be set; the rest come from
/// [`TextSpec::default`] via struct update syntax.
#[derive(Clone, Debug)]
pub struct TextSpec {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub text: String,
    pub font_size: f64,
    pub font_family: FontFamily,
    pub stroke_color: String,
    pub text_align: TextAlign,
    pub vertical_align: VerticalAlign,
    pub stroke_width: u32,
    pub roughness: u32,
}

impl Default for TextSpec {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            text: String::new(),
            font_size: 20.0,
            font_family: FontFamily::default(),
            stroke_color: String::from("#000000"),
            text_align: TextAlign::Left,
            vertical_align: VerticalAlign::Top,
            stroke_width: 1,
            roughness: 1,
        }
    }
}

/// Properties for building a rectangle element.
#[derive(Clone, Debug)]
pub struct RectSpec {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub stroke_color: String,
    pub background_color: String,
    pub fill_style: String,
    pub stroke_width: u32,
    pub roughness: u32,
}

impl Default for RectSpec {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            stroke_color: String::from("#000000"),
            background_color: String::from("transparent"),
            fill_style: String::from("solid"),
            stroke_width: 1,
            roughness: 1,
        }
    }
}

/// A positioned, sized graphical primitive.
///
/// Tagged on the excalidraw `type` field, so the serialized form matches what
/// the canvas expects element-for-element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SceneElement {
    Text(TextElement),
    Rectangle(RectangleElement),
    Image(ImageElement),
}

impl SceneElement {
    /// Build a text element from a spec.
    #[must_use]
    pub fn text(spec: TextSpec) -> Self {
        let mut common = ElementCommon::at(spec.x, spec.y, spec.width, spec.height);
        common.stroke_color = spec.stroke_color;
        common.stroke_width = spec.stroke_width;
        common.roughness = spec.roughness;
        let baseline = (spec.font_size * TEXT_LINE_HEIGHT).round();
        Self::Text(TextElement {
            common,
            font_size: spec.font_size,
            font_family: spec.font_family,
            original_text: spec.text.clone(),
            text: spec.text,
            text_align: spec.text_align,
            vertical_align: spec.vertical_align,
            container_id: None,
            baseline,
            line_height: TEXT_LINE_HEIGHT,
        })
    }

    /// Build a rectangle element from a spec.
    #[must_use]
    pub fn rectangle(spec: RectSpec) -> Self {
        let mut common = ElementCommon::at(spec.x, spec.y, spec.width, spec.height);
        common.stroke_color = spec.stroke_color;
        common.background_color = spec.background_color;
        common.fill_style = spec.fill_style;
        common.stroke_width = spec.stroke_width;
        common.roughness = spec.roughness;
        Self::Rectangle(RectangleElement { common })
    }

    /// Build an image element bound to the file record with the same id.
    #[must_use]
    pub fn image(id: String, x: f64, y: f64, width: f64, height: f64) -> Self {
        let mut common = ElementCommon::at(x, y, width, height);
        common.id.clone_from(&id);
        common.stroke_color = String::from("transparent");
        Self::Image(ImageElement {
            common,
            status: String::from("pending"),
            file_id: id,
            scale: [1.0, 1.0],
        })
    }

    /// Shared fields of any element kind.
    #[must_use]
    pub fn common(&self) -> &ElementCommon {
        match self {
            Self::Text(e) => &e.common,
            Self::Rectangle(e) => &e.common,
            Self::Image(e) => &e.common,
        }
    }

    /// Mutable access to the shared fields.
    pub fn common_mut(&mut self) -> &mut ElementCommon {
        match self {
            Self::Text(e) => &mut e.common,
            Self::Rectangle(e) => &mut e.common,
            Self::Image(e) => &mut e.common,
        }
    }

    /// The file record id this element references, if it is an image.
    #[must_use]
    pub fn file_id(&self) -> Option<&str> {
        match self {
            Self::Image(e) => Some(&e.file_id),
            Self::Text(_) | Self::Rectangle(_) => None,
        }
    }

    /// Element height, shorthand for layout cursor arithmetic.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.common().height
    }
}
