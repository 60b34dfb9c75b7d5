//! HTML comment removal (`<!-- ... -->`)

const OPEN: &str = "<!--";
const CLOSE: &str = "-->";

/// Remove every `<!-- ... -->` span from `text`.
/// - Each opener pairs with the nearest following `-->`, across line breaks.
/// - An unterminated opener keeps everything from it to the end.
/// - Spans spliced together by a removal are removed too, so the result is a fixed point.
pub fn strip_comments(text: &str) -> String {
    let mut out = strip_once(text);
    while has_complete_comment(&out) {
        out = strip_once(&out);
    }
    out
}

fn strip_once(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find(OPEN) {
        let body = &rest[open + OPEN.len()..];
        match body.find(CLOSE) {
            Some(close) => {
                out.push_str(&rest[..open]);
                rest = &body[close + CLOSE.len()..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}

fn has_complete_comment(text: &str) -> bool {
    match text.find(OPEN) {
        Some(open) => text[open + OPEN.len()..].contains(CLOSE),
        None => false,
    }
}
