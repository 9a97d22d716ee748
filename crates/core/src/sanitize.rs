//! Markdown fence stripping for model output.
//!
//! Models asked for bare JSON still wrap it in a fenced code block often enough that the
//! output is cleaned before parsing. Only a fence at the very start of the text is
//! recognised; prose before a fence is left for the JSON parser to reject.

const FENCE: &str = "```";

/// Strip a leading code fence (with or without a language tag) and a trailing fence.
///
/// Cases:
/// - no fence: the input is returned trimmed
/// - "```json\n{..}\n```" or "```\n{..}\n```": the fenced body
/// - closing fence followed by prose: the body up to the closing fence line
/// - unterminated fence: everything after the opening fence line
/// - single-line "```json {..}```": the body after the tag
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(after_open) = trimmed.strip_prefix(FENCE) else {
        return trimmed;
    };

    let body = match after_open.split_once('\n') {
        Some((info, rest)) if is_language_tag(info) => rest,
        _ => after_open.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };

    if let Some(end) = closing_fence_offset(body) {
        return body[..end].trim();
    }

    let body = body.trim_end();
    body.strip_suffix(FENCE).unwrap_or(body).trim()
}

/// Byte offset of the first line consisting only of a fence.
fn closing_fence_offset(body: &str) -> Option<usize> {
    let mut offset = 0;
    for line in body.split_inclusive('\n') {
        if line.trim() == FENCE {
            return Some(offset);
        }
        offset += line.len();
    }
    None
}

/// True for an info string such as `json`, `JSON` or an empty tag.
fn is_language_tag(info: &str) -> bool {
    info.trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+'))
}
