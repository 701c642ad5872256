//! Backslash-escaping for identifiers and values used in CSS fragments.
//!
//! [§ 2.1 CSS escape sequences](https://www.w3.org/TR/css-syntax-3/#escaping)
//! allows any code point to be escaped with a backslash. The synthesizer
//! must escape reserved punctuation appearing in real-world id and class
//! values (`my.id`, `col:2`, ...) or the generated selector would parse
//! as something else entirely. Unescaped output here is a correctness
//! bug, not a style choice.

/// The reserved punctuation set. Matches what selector grammars assign
/// meaning to; everything else passes through untouched.
const RESERVED: &str = "!\"#$%&'()*+,./:;<=>?@[\\]^`{|}~";

/// Backslash-escape reserved CSS punctuation in `value`.
#[must_use]
pub fn escape_css(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if RESERVED.contains(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
