//! Binary header inspection for pixel dimensions.
//!
//! Direct byte-offset reads, no image decoding. Every parser returns `None`
//! on anything unexpected; [`sniff_dimensions`] maps that to the default
//! 200x150 so a corrupt payload still lays out.

/// Fallback width when dimensions cannot be determined.
pub const DEFAULT_WIDTH: u32 = 200;
/// Fallback height when dimensions cannot be determined.
pub const DEFAULT_HEIGHT: u32 = 150;

/// Largest rendered width for an inline image.
const MAX_WIDTH: f64 = 400.0;
/// Largest rendered height for an inline image.
const MAX_HEIGHT: f64 = 300.0;

/// Extract width and height from PNG data.
///
/// PNG layout: 8-byte signature, then the IHDR chunk with width and height as
/// big-endian u32 at byte offsets 16 and 20.
#[must_use]
pub fn parse_png_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    if data.len() < 24 {
        return None;
    }
    if data[0..4] != [0x89, 0x50, 0x4E, 0x47] {
        return None;
    }
    let width = u32::from_be_bytes([data[16], data[17], data[18], data[19]]);
    let height = u32::from_be_bytes([data[20], data[21], data[22], data[23]]);
    Some((width, height))
}

/// Extract width and height from JPEG data.
///
/// Scans marker segments from offset 2, skipping each by its declared
/// big-endian length, until a Start-Of-Frame marker (0xC0-0xC3). Height sits
/// 5 bytes past the marker start, width 7. Each step bound-checks the
/// computed offset, so a malformed segment length ends the scan instead of
/// reading out of range.
#[must_use]
pub fn parse_jpeg_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    if data.len() < 4 || data[0] != 0xFF || data[1] != 0xD8 {
        return None;
    }
    let mut offset = 2usize;
    while offset + 9 <= data.len() {
        if data[offset] != 0xFF {
            offset += 1;
            continue;
        }
        let marker = data[offset + 1];
        if (0xC0..=0xC3).contains(&marker) {
            let height = u16::from_be_bytes([data[offset + 5], data[offset + 6]]);
            let width = u16::from_be_bytes([data[offset + 7], data[offset + 8]]);
            return Some((u32::from(width), u32::from(height)));
        }
        let segment_length = usize::from(u16::from_be_bytes([data[offset + 2], data[offset + 3]]));
        if segment_length < 2 {
            return None;
        }
        offset = offset.checked_add(segment_length + 2)?;
    }
    None
}

/// Extract width and height from GIF data.
///
/// GIF layout: `GIF` signature, then logical screen width and height as
/// little-endian u16 at byte offsets 6 and 8.
#[must_use]
pub fn parse_gif_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    if data.len() < 10 || &data[0..3] != b"GIF" {
        return None;
    }
    let width = u16::from_le_bytes([data[6], data[7]]);
    let height = u16::from_le_bytes([data[8], data[9]]);
    Some((u32::from(width), u32::from(height)))
}

/// Determine pixel dimensions for a payload by MIME type.
///
/// Unrecognized formats and parse failures fall back to the 200x150 default.
#[must_use]
pub fn sniff_dimensions(mime_type: &str, data: &[u8]) -> (u32, u32) {
    let parsed = match mime_type {
        "image/png" => parse_png_dimensions(data),
        "image/jpeg" | "image/jpg" => parse_jpeg_dimensions(data),
        "image/gif" => parse_gif_dimensions(data),
        _ => None,
    };
    parsed.unwrap_or((DEFAULT_WIDTH, DEFAULT_HEIGHT))
}

/// Scale measured dimensions to fit within 400x300, preserving aspect ratio.
///
/// Applied only when the image exceeds a bound; results are rounded to the
/// nearest integer.
#[must_use]
pub fn scale_to_fit(width: u32, height: u32) -> (f64, f64) {
    let mut w = f64::from(width);
    let mut h = f64::from(height);
    if w > MAX_WIDTH || h > MAX_HEIGHT {
        let scale = (MAX_WIDTH / w).min(MAX_HEIGHT / h);
        w = (w * scale).round();
        h = (h * scale).round();
    }
    (w, h)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    /// Minimal PNG header with the given IHDR dimensions.
    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut data = vec![
            0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, // signature
            0x00, 0x00, 0x00, 0x0D, // IHDR length
            b'I', b'H', b'D', b'R', // IHDR type
        ];
        data.extend_from_slice(&width.to_be_bytes());
        data.extend_from_slice(&height.to_be_bytes());
        data.extend_from_slice(&[0; 5]);
        data
    }

    #[test]
    fn test_png_dimensions() {
        assert_eq!(parse_png_dimensions(&png_bytes(64, 32)), Some((64, 32)));
    }

    #[test]
    fn test_png_truncated_or_corrupt() {
        assert_eq!(parse_png_dimensions(b"not a png at all, honest"), None);
        assert_eq!(parse_png_dimensions(&[0x89, 0x50]), None);
        assert_eq!(
            sniff_dimensions("image/png", b"corrupt"),
            (DEFAULT_WIDTH, DEFAULT_HEIGHT)
        );
    }

    #[test]
    fn test_jpeg_sof_scan() {
        // SOI, APP0 segment (length 4), SOF0 with height 32 / width 64
        let data = vec![
            0xFF, 0xD8, // SOI
            0xFF, 0xE0, 0x00, 0x04, 0x00, 0x00, // APP0, length 4
            0xFF, 0xC0, 0x00, 0x0B, 0x08, // SOF0, length, precision
            0x00, 0x20, // height = 32
            0x00, 0x40, // width = 64
            0x03, 0x00, 0x00, 0x00, // components
        ];
        assert_eq!(parse_jpeg_dimensions(&data), Some((64, 32)));
    }

    #[test]
    fn test_jpeg_malformed_segment_length_terminates() {
        // Segment length 0 would loop forever unguarded; length pointing past
        // the end must also stop cleanly.
        let zero_len = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        assert_eq!(parse_jpeg_dimensions(&zero_len), None);

        let overrun = vec![0xFF, 0xD8, 0xFF, 0xE0, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0x00];
        assert_eq!(parse_jpeg_dimensions(&overrun), None);
    }

    #[test]
    fn test_gif_dimensions_little_endian() {
        let mut data = b"GIF89a".to_vec();
        data.extend_from_slice(&300u16.to_le_bytes());
        data.extend_from_slice(&200u16.to_le_bytes());
        assert_eq!(parse_gif_dimensions(&data), Some((300, 200)));
    }

    #[test]
    fn test_sniff_unknown_mime_defaults() {
        assert_eq!(
            sniff_dimensions("image/webp", &[0; 64]),
            (DEFAULT_WIDTH, DEFAULT_HEIGHT)
        );
    }

    #[test]
    fn test_scale_to_fit_wide_image() {
        assert_eq!(scale_to_fit(800, 400), (400.0, 200.0));
    }

    #[test]
    fn test_scale_to_fit_small_image_unscaled() {
        assert_eq!(scale_to_fit(100, 80), (100.0, 80.0));
    }

    #[test]
    fn test_scale_to_fit_tall_image() {
        assert_eq!(scale_to_fit(300, 600), (150.0, 300.0));
    }
}
