//! Inline segmentation of block text.

use std::sync::LazyLock;

use regex::Regex;

/// Image reference: `![alt](url)` with an optional quoted title. The url ends
/// at the first whitespace or closing paren.
static IMAGE_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"!\[([^\]]*)\]\(([^)\s]+)(?:\s+"[^"]*")?\)"#).unwrap());

/// Ordered inline content of a block: plain text runs and image references.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Text { text: String },
    Image { alt: String, url: String },
}

/// Split block text into ordered text/image segments.
///
/// This is the only place image references are recognized; diagram regions
/// and code blocks are never segmented. Empty text segments are dropped, and
/// input without any image reference becomes a single text segment.
#[must_use]
pub fn segment_inlines(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last_end = 0;

    for caps in IMAGE_REF.captures_iter(text) {
        let whole = caps.get(0).unwrap();
        if whole.start() > last_end {
            segments.push(Segment::Text {
                text: text[last_end..whole.start()].to_owned(),
            });
        }
        segments.push(Segment::Image {
            alt: caps[1].trim().to_owned(),
            url: caps[2].trim().to_owned(),
        });
        last_end = whole.end();
    }

    if segments.is_empty() {
        return vec![Segment::Text {
            text: text.to_owned(),
        }];
    }

    if last_end < text.len() {
        segments.push(Segment::Text {
            text: text[last_end..].to_owned(),
        });
    }

    segments.retain(|s| !matches!(s, Segment::Text { text } if text.is_empty()));
    segments
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_plain_text_single_segment() {
        let segments = segment_inlines("no images here");
        assert_eq!(
            segments,
            vec![Segment::Text {
                text: String::from("no images here")
            }]
        );
    }

    #[test]
    fn test_image_between_text() {
        let segments = segment_inlines("see ![logo](http://x/logo.png) above");
        assert_eq!(
            segments,
            vec![
                Segment::Text {
                    text: String::from("see ")
                },
                Segment::Image {
                    alt: String::from("logo"),
                    url: String::from("http://x/logo.png")
                },
                Segment::Text {
                    text: String::from(" above")
                },
            ]
        );
    }

    #[test]
    fn test_image_only_drops_empty_text() {
        let segments = segment_inlines("![a](x.png)");
        assert_eq!(
            segments,
            vec![Segment::Image {
                alt: String::from("a"),
                url: String::from("x.png")
            }]
        );
    }

    #[test]
    fn test_quoted_title_ignored() {
        let segments = segment_inlines(r#"![alt](http://x/p.png "a title")"#);
        assert_eq!(
            segments,
            vec![Segment::Image {
                alt: String::from("alt"),
                url: String::from("http://x/p.png")
            }]
        );
    }

    #[test]
    fn test_empty_alt_allowed() {
        let segments = segment_inlines("![](pic.gif)");
        assert_eq!(
            segments,
            vec![Segment::Image {
                alt: String::new(),
                url: String::from("pic.gif")
            }]
        );
    }

    #[test]
    fn test_empty_input_is_single_empty_text() {
        let segments = segment_inlines("");
        assert_eq!(
            segments,
            vec![Segment::Text {
                text: String::new()
            }]
        );
    }
}
