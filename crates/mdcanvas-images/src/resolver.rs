//! Image reference resolution.
//!
//! The resolver owns the HTTP agent and turns a URL into scene primitives.
//! Every failure mode degrades to a visible placeholder; a compile pass never
//! aborts because an image was unreachable.

use std::sync::LazyLock;
use std::time::Duration;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use regex::Regex;
use ureq::Agent;

use mdcanvas_scene::{
    FileRecord, FontFamily, RectSpec, SceneElement, TextAlign, TextSpec, element_id,
};

use crate::dimensions::{DEFAULT_HEIGHT, DEFAULT_WIDTH, scale_to_fit, sniff_dimensions};
use crate::fetch::{FETCH_TIMEOUT, FetchedImage, create_agent, fetch_image};

/// Recognized raster/vector image extensions.
static IMAGE_EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(jpg|jpeg|png|gif|bmp|webp|svg|tiff?|ico)$").unwrap());

/// 1x1 transparent PNG used as the placeholder payload.
const TRANSPARENT_PIXEL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

/// URLs longer than this are truncated in the placeholder caption.
const MAX_URL_DISPLAY: usize = 40;

/// Does the URL end in a recognized image extension?
///
/// Segments failing this test are skipped by the caller with a warning; no
/// element is emitted for them.
#[must_use]
pub fn is_likely_image_url(url: &str) -> bool {
    IMAGE_EXTENSION.is_match(url)
}

/// Resolve a markdown image URL to a fetchable form.
///
/// Absolute and `data:` URLs pass through. Root-relative URLs are left for
/// the consuming renderer. Other relative forms lose a leading `./`.
#[must_use]
pub fn resolve_image_url(url: &str) -> &str {
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("data:")
    {
        return url;
    }
    if url.starts_with('/') {
        return url;
    }
    url.strip_prefix("./").unwrap_or(url)
}

/// Decode an inline `data:` URL into MIME type and payload bytes.
fn parse_data_url(url: &str) -> Option<(String, Vec<u8>)> {
    let rest = url.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let mime = header.split(';').next().unwrap_or("");
    let mime = if mime.is_empty() { "image/png" } else { mime };
    let bytes = BASE64_STANDARD.decode(payload).ok()?;
    Some((mime.to_owned(), bytes))
}

/// Scene primitives produced for one image reference.
#[derive(Clone, Debug)]
pub struct ResolvedImage {
    /// The image element, placed at the requested anchor.
    pub element: SceneElement,
    /// Embedded payload referenced by the element's `fileId`.
    pub file_record: FileRecord,
    /// Centered alt-text caption below the image, if alt text was given.
    pub caption: Option<SceneElement>,
    /// Placeholder dressing: background rectangle, glyph, truncated URL.
    pub extras: Vec<SceneElement>,
}

impl ResolvedImage {
    /// Vertical space this image consumes: element height plus the caption
    /// height and trailing gap.
    #[must_use]
    pub fn advance(&self, gap: f64) -> f64 {
        self.element.height()
            + self
                .caption
                .as_ref()
                .map_or(gap, |caption| caption.height() + gap)
    }
}

/// Fetches image payloads and builds their scene primitives.
pub struct ImageResolver {
    agent: Agent,
}

impl Default for ImageResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageResolver {
    /// Resolver with the default 10 second fetch timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::with_timeout(FETCH_TIMEOUT)
    }

    /// Resolver with a custom fetch timeout.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            agent: create_agent(timeout),
        }
    }

    /// Resolve an image reference into scene primitives at the given anchor.
    ///
    /// Never fails: fetch errors, bad statuses, and non-image payloads all
    /// produce the placeholder stand-in.
    #[must_use]
    pub fn resolve(&self, url: &str, x: f64, y: f64, alt: &str) -> ResolvedImage {
        let resolved = resolve_image_url(url);

        let fetched = match parse_data_url(resolved) {
            Some((mime_type, bytes)) => Ok(FetchedImage { mime_type, bytes }),
            None => fetch_image(&self.agent, resolved),
        };

        match fetched {
            Ok(image) => self.from_payload(&image, x, y, alt),
            Err(error) => {
                tracing::warn!(url, %error, "image fetch failed, using placeholder");
                placeholder(url, x, y, alt)
            }
        }
    }

    /// Build primitives from successfully fetched bytes.
    fn from_payload(&self, image: &FetchedImage, x: f64, y: f64, alt: &str) -> ResolvedImage {
        let (pixel_width, pixel_height) = sniff_dimensions(&image.mime_type, &image.bytes);
        let (width, height) = scale_to_fit(pixel_width, pixel_height);
        tracing::debug!(
            pixel_width,
            pixel_height,
            width,
            height,
            "image dimensions determined"
        );

        let id = element_id();
        let element = SceneElement::image(id.clone(), x, y, width, height);
        let data_url = format!(
            "data:{};base64,{}",
            image.mime_type,
            BASE64_STANDARD.encode(&image.bytes)
        );
        let file_record = FileRecord::new(id, data_url, image.mime_type.clone());

        ResolvedImage {
            element,
            file_record,
            caption: caption_element(alt, x, y + height),
            extras: Vec::new(),
        }
    }
}

/// Centered caption below the image, when alt text is present.
fn caption_element(alt: &str, x: f64, image_bottom: f64) -> Option<SceneElement> {
    if alt.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let width = (alt.chars().count() as f64 * 8.0).max(80.0);
    Some(SceneElement::text(TextSpec {
        x,
        y: image_bottom + 4.0,
        width,
        height: 18.0,
        text: alt.to_owned(),
        font_size: 14.0,
        font_family: FontFamily::Virgil,
        stroke_color: String::from("#555555"),
        text_align: TextAlign::Center,
        ..TextSpec::default()
    }))
}

/// Fixed-size stand-in for an image that could not be fetched.
///
/// A 200x150 image element bound to a transparent pixel, dressed with a
/// background rectangle, a glyph overlay, and the (truncated) URL.
fn placeholder(url: &str, x: f64, y: f64, alt: &str) -> ResolvedImage {
    let width = f64::from(DEFAULT_WIDTH);
    let height = f64::from(DEFAULT_HEIGHT);
    let id = element_id();

    let element = SceneElement::image(id.clone(), x, y, width, height);
    let file_record = FileRecord::new(
        id,
        String::from(TRANSPARENT_PIXEL),
        String::from("image/png"),
    );

    let background = SceneElement::rectangle(RectSpec {
        x,
        y,
        width,
        height,
        stroke_color: String::from("#cccccc"),
        background_color: String::from("#f9f9f9"),
        stroke_width: 2,
        ..RectSpec::default()
    });

    let glyph = SceneElement::text(TextSpec {
        x: x + width / 2.0 - 20.0,
        y: y + height / 2.0 - 20.0,
        width: 40.0,
        height: 20.0,
        text: String::from("\u{1f5bc}\u{fe0f}"),
        font_size: 24.0,
        font_family: FontFamily::Virgil,
        stroke_color: String::from("#666666"),
        text_align: TextAlign::Center,
        ..TextSpec::default()
    });

    let short_url = if url.chars().count() > MAX_URL_DISPLAY {
        let prefix: String = url.chars().take(MAX_URL_DISPLAY - 3).collect();
        format!("{prefix}...")
    } else {
        url.to_owned()
    };
    let url_text = SceneElement::text(TextSpec {
        x: x + 10.0,
        y: y + height - 30.0,
        width: width - 20.0,
        height: 16.0,
        text: short_url,
        font_size: 10.0,
        font_family: FontFamily::Cascadia,
        stroke_color: String::from("#0066cc"),
        ..TextSpec::default()
    });

    ResolvedImage {
        element,
        file_record,
        caption: caption_element(alt, x, y + height),
        extras: vec![background, glyph, url_text],
    }
}
