//! Greedy word wrapping at a character budget.

/// Wrap text to lines of at most `max_chars` characters.
///
/// Paragraph breaks (`\n`) are preserved; an empty input line stays an empty
/// output line. A single word longer than the budget is emitted on its own
/// line rather than split.
pub(crate) fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut result = Vec::new();
    for para in text.split('\n') {
        if para.is_empty() {
            result.push(String::new());
            continue;
        }
        let mut buf = String::new();
        for word in para.split_whitespace() {
            let candidate = if buf.is_empty() {
                word.chars().count()
            } else {
                buf.chars().count() + 1 + word.chars().count()
            };
            if candidate > max_chars {
                if !buf.is_empty() {
                    result.push(std::mem::take(&mut buf));
                }
                buf.push_str(word);
            } else {
                if !buf.is_empty() {
                    buf.push(' ');
                }
                buf.push_str(word);
            }
        }
        if !buf.is_empty() {
            result.push(buf);
        }
    }
    if result.is_empty() {
        result.push(String::new());
    }
    result
}
