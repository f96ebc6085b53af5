//! Diagram region detection.
//!
//! Separates mermaid-style diagram descriptions from prose. Fenced blocks are
//! classified by their language tag (or, untagged, by their first content
//! line); unfenced regions are detected by a start keyword and greedily
//! extended over lines that look like diagram syntax, tolerating a single
//! blank line when the line after it still looks like a diagram.

use std::sync::LazyLock;

use regex::Regex;

/// Fence language tags that mark a diagram region.
static MERMAID_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^mermaid($|\b|=|:)").unwrap());

/// First token of a diagram description, fenced or not.
static DIAGRAM_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(flowchart|graph)\b").unwrap());

/// Start keyword match for continuation lines (case-sensitive).
static DIAGRAM_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(flowchart|graph)\b").unwrap());

/// Arrow and edge tokens that identify a diagram line.
static EDGE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-->|---|==>|--\||\|--|:::|==").unwrap());

/// A bare node identifier with an optional bracket/paren/brace label.
static NODE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+\s*(\[[^\]]*\]|\([^)]*\)|\{[^}]*\})?$").unwrap());

/// One detected diagram region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiagramRegion {
    /// Raw diagram description text.
    pub source: String,
    /// True when no prose content preceded this region in the input. Only
    /// leading regions anchor the prose layout; regions detected after prose
    /// are placed after it.
    pub leading: bool,
}

/// Result of splitting raw text into prose and diagram regions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Classified {
    /// All non-diagram lines, joined and trimmed as a whole.
    pub prose: String,
    /// Diagram regions in document order.
    pub diagrams: Vec<DiagramRegion>,
}

/// Does a line look like diagram syntax? Used for unfenced continuation only.
fn looks_like_diagram_line(line: &str) -> bool {
    if line.is_empty() {
        return false;
    }
    if DIAGRAM_KEYWORD.is_match(line) {
        return true;
    }
    if line == "end" || line.starts_with("subgraph") || line.starts_with("direction ") {
        return true;
    }
    if EDGE_TOKEN.is_match(line) {
        return true;
    }
    NODE_LINE.is_match(line)
}

/// Split raw text into prose and diagram regions.
///
/// Never fails: lines that are not confidently diagram syntax fall through to
/// prose, and no line is ever dropped. An unterminated fence is captured up
/// to end-of-input and classified by the same rule as a closed one.
#[must_use]
pub fn classify(raw: &str) -> Classified {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<&str> = normalized.split('\n').collect();

    let mut diagrams: Vec<DiagramRegion> = Vec::new();
    let mut prose: Vec<&str> = Vec::new();
    let mut seen_prose = false;

    let mut i = 0;
    while i < lines.len() {
        let trimmed = lines[i].trim();

        // Fenced block
        if let Some(info) = trimmed.strip_prefix("```") {
            let lang = info.trim().to_lowercase();
            let mut j = i + 1;
            while j < lines.len() && !lines[j].trim().starts_with("```") {
                j += 1;
            }
            let has_closing = j < lines.len();
            let body = lines[i + 1..j].join("\n");
            let body = body.trim();

            let is_diagram = if lang.is_empty() {
                DIAGRAM_START.is_match(body)
            } else {
                MERMAID_FENCE.is_match(&lang)
            };

            if is_diagram {
                diagrams.push(DiagramRegion {
                    source: body.to_owned(),
                    leading: !seen_prose,
                });
            } else {
                let end = if has_closing { j } else { j - 1 };
                prose.extend(&lines[i..=end]);
                seen_prose = true;
            }
            i = if has_closing { j + 1 } else { j };
            continue;
        }

        // Unfenced region opened by the start keyword
        if DIAGRAM_START.is_match(trimmed) {
            let mut buf = vec![lines[i]];
            i += 1;
            while i < lines.len() {
                let next = lines[i].trim();
                if next.is_empty() {
                    // One blank line is tolerated only if the line after it
                    // still looks like diagram syntax.
                    let following = lines[i + 1..].iter().find(|l| !l.trim().is_empty());
                    match following {
                        Some(l) if looks_like_diagram_line(l.trim()) => {
                            buf.push(lines[i]);
                            i += 1;
                        }
                        _ => {
                            i += 1;
                            break;
                        }
                    }
                    continue;
                }
                if looks_like_diagram_line(next) {
                    buf.push(lines[i]);
                    i += 1;
                } else {
                    break;
                }
            }
            diagrams.push(DiagramRegion {
                source: buf.join("\n"),
                leading: !seen_prose,
            });
            continue;
        }

        if !trimmed.is_empty() {
            seen_prose = true;
        }
        prose.push(lines[i]);
        i += 1;
    }

    Classified {
        prose: prose.join("\n").trim().to_owned(),
        diagrams,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sources(result: &Classified) -> Vec<&str> {
        result.diagrams.iter().map(|d| d.source.as_str()).collect()
    }

    #[test]
    fn test_fenced_mermaid_block() {
        let input = "# Title\n\n```mermaid\ngraph TD\nA-->B\n```\n\nSome text";
        let result = classify(input);
        assert_eq!(sources(&result), vec!["graph TD\nA-->B"]);
        assert_eq!(result.prose, "# Title\n\n\nSome text");
        assert!(!result.diagrams[0].leading);
    }

    #[test]
    fn test_untagged_fence_with_graph_content() {
        let input = "```\nflowchart LR\nA --> B\n```";
        let result = classify(input);
        assert_eq!(sources(&result), vec!["flowchart LR\nA --> B"]);
        assert_eq!(result.prose, "");
        assert!(result.diagrams[0].leading);
    }

    #[test]
    fn test_code_fence_passes_through_to_prose() {
        let input = "```js\nconsole.log(1);\n```";
        let result = classify(input);
        assert!(result.diagrams.is_empty());
        assert_eq!(result.prose, input);
    }

    #[test]
    fn test_unterminated_mermaid_fence() {
        let input = "intro\n```mermaid\ngraph TD\nA-->B";
        let result = classify(input);
        assert_eq!(sources(&result), vec!["graph TD\nA-->B"]);
        assert_eq!(result.prose, "intro");
    }

    #[test]
    fn test_unfenced_region_greedy() {
        let input = "graph TD\nA[Start] --> B[End]\nB --> C\n\nplain prose here";
        let result = classify(input);
        assert_eq!(sources(&result), vec!["graph TD\nA[Start] --> B[End]\nB --> C"]);
        assert_eq!(result.prose, "plain prose here");
        assert!(result.diagrams[0].leading);
    }

    #[test]
    fn test_unfenced_blank_line_tolerated() {
        let input = "graph TD\nA --> B\n\nB --> C\n\nThis sentence ends it.";
        let result = classify(input);
        assert_eq!(sources(&result), vec!["graph TD\nA --> B\n\nB --> C"]);
        assert_eq!(result.prose, "This sentence ends it.");
    }

    #[test]
    fn test_subgraph_and_end_lines_continue_region() {
        let input = "flowchart LR\nsubgraph one\nA --> B\nend\nAfter the diagram, more words follow.";
        let result = classify(input);
        assert_eq!(
            sources(&result),
            vec!["flowchart LR\nsubgraph one\nA --> B\nend"]
        );
        assert_eq!(result.prose, "After the diagram, more words follow.");
    }

    #[test]
    fn test_diagram_text_never_in_prose() {
        let input = "before\n\n```mermaid\ngraph TD\nX-->Y\n```\n\ngraph LR\nP --> Q\n\nafter";
        let result = classify(input);
        for diagram in &result.diagrams {
            assert!(!result.prose.contains(diagram.source.as_str()));
        }
        assert_eq!(result.diagrams.len(), 2);
        assert!(result.diagrams.iter().all(|d| !d.leading));
    }

    #[test]
    fn test_crlf_normalized() {
        let input = "line one\r\nline two\r\n";
        let result = classify(input);
        assert_eq!(result.prose, "line one\nline two");
    }
}
