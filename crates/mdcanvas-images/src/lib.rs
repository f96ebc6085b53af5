//! Image resolution for the mdcanvas compiler.
//!
//! Turns an inline image reference into scene primitives:
//! - [`ImageResolver`]: fetches image bytes with a bounded timeout, sniffs
//!   pixel dimensions from the binary header (no decode), scales to fit, and
//!   emits an image element plus its file record
//! - Placeholder path: when a fetch fails for any reason, a fixed-size
//!   stand-in (image + background rectangle + glyph + truncated URL) is
//!   produced instead; resolution never aborts a layout pass
//!
//! Dimension sniffing reads byte offsets directly (PNG/JPEG/GIF) so no image
//! decoding dependency is needed, and every parse failure degrades to a
//! default size.

mod dimensions;
mod fetch;
mod resolver;

pub use dimensions::{
    DEFAULT_HEIGHT, DEFAULT_WIDTH, parse_gif_dimensions, parse_jpeg_dimensions,
    parse_png_dimensions, scale_to_fit, sniff_dimensions,
};
pub use fetch::{FETCH_TIMEOUT, FetchError, FetchedImage, create_agent, fetch_image};
pub use resolver::{ImageResolver, ResolvedImage, is_likely_image_url, resolve_image_url};
