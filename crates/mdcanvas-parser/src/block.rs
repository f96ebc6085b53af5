//! Prose-to-block parsing.

use std::sync::LazyLock;

use regex::Regex;

static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").unwrap());
static BLOCKQUOTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^>\s+(.*)$").unwrap());
static ORDERED_ITEM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d+)[.)]\s+(.*)$").unwrap());
static UNORDERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([*+-])\s+(.*)$").unwrap());

/// A typed markdown block, produced in document order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    Heading {
        level: u8,
        text: String,
    },
    Blockquote {
        text: String,
    },
    ListItem {
        ordered: bool,
        index: Option<u32>,
        indent: usize,
        text: String,
    },
    Code {
        text: String,
    },
    Paragraph {
        text: String,
    },
}

/// Indent level from leading spaces, two spaces per level.
fn indent_level(line: &str) -> usize {
    line.len().saturating_sub(line.trim_start_matches(' ').len()) / 2
}

/// Parse prose text into an ordered block sequence.
///
/// Rules are checked in priority order per line, tabs expanded to 4 spaces
/// first: fence toggle, heading, blockquote, ordered item, unordered item,
/// blank line (paragraph separator), paragraph. Consecutive paragraphs are
/// merged afterwards so soft-wrapped lines become one logical paragraph while
/// intentional blank lines are kept as embedded newlines.
#[must_use]
pub fn parse_blocks(prose: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut in_code = false;
    let mut code_buf: Vec<&str> = Vec::new();

    for raw in prose.split('\n') {
        let line = raw.replace('\t', "    ");
        let trimmed = line.trim();

        if trimmed.starts_with("```") {
            if in_code {
                blocks.push(Block::Code {
                    text: code_buf.join("\n"),
                });
                code_buf.clear();
            }
            in_code = !in_code;
            continue;
        }

        if in_code {
            code_buf.push(raw);
            continue;
        }

        if let Some(caps) = HEADING.captures(trimmed) {
            blocks.push(Block::Heading {
                level: u8::try_from(caps[1].len()).unwrap_or(6),
                text: caps[2].to_owned(),
            });
            continue;
        }

        if let Some(caps) = BLOCKQUOTE.captures(trimmed) {
            blocks.push(Block::Blockquote {
                text: caps[1].to_owned(),
            });
            continue;
        }

        if let Some(caps) = ORDERED_ITEM.captures(trimmed) {
            blocks.push(Block::ListItem {
                ordered: true,
                index: caps[1].parse().ok(),
                indent: indent_level(&line),
                text: caps[2].to_owned(),
            });
            continue;
        }

        if let Some(caps) = UNORDERED_ITEM.captures(trimmed) {
            blocks.push(Block::ListItem {
                ordered: false,
                index: None,
                indent: indent_level(&line),
                text: caps[2].to_owned(),
            });
            continue;
        }

        // Blank lines become empty paragraph markers so the merge pass can
        // record intentional separation.
        blocks.push(Block::Paragraph {
            text: trimmed.to_owned(),
        });
    }

    // An unterminated fence still flushes its buffer.
    if in_code {
        blocks.push(Block::Code {
            text: code_buf.join("\n"),
        });
    }

    merge_paragraphs(blocks)
}

/// Join consecutive paragraphs with newlines.
fn merge_paragraphs(blocks: Vec<Block>) -> Vec<Block> {
    let mut merged: Vec<Block> = Vec::with_capacity(blocks.len());
    for block in blocks {
        if let (
            Some(Block::Paragraph { text: last }),
            Block::Paragraph { text: next },
        ) = (merged.last_mut(), &block)
        {
            if !last.is_empty() {
                last.push('\n');
            }
            last.push_str(next);
            continue;
        }
        merged.push(block);
    }
    merged
}
