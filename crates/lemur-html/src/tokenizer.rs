//! HTML tokenizer: markup text in, tags and text out.
//!
//! A heavily reduced cousin of the
//! [WHATWG tokenizer](https://html.spec.whatwg.org/multipage/parsing.html#tokenization):
//! no state-machine spec states, just the handful of shapes real pasted
//! markup is made of. Anything unrecognizable is treated as character
//! data; adversarial input degrades instead of failing.

use std::iter::Peekable;
use std::str::Chars;

/// One token of markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A start tag: `<div class="x">` or self-closing `<br/>`.
    StartTag {
        /// Lower-cased tag name.
        name: String,
        /// Attributes in source order; duplicates collapse later (last-wins).
        attrs: Vec<(String, String)>,
        /// Whether the tag ended with `/>`.
        self_closing: bool,
    },
    /// An end tag: `</div>`. Attributes inside end tags are discarded.
    EndTag {
        /// Lower-cased tag name.
        name: String,
    },
    /// A run of character data with character references resolved.
    Text(String),
}

/// Tokenize markup into a flat token stream.
///
/// Comments, doctypes and processing instructions are consumed and dropped.
/// The content of `<script>` and `<style>` is captured verbatim as a single
/// [`Token::Text`] (no reference decoding), matching RAWTEXT handling.
#[must_use]
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    let mut text = String::new();

    while let Some(c) = chars.next() {
        if c != '<' {
            text.push(c);
            continue;
        }
        match chars.peek() {
            Some('!') => {
                flush_text(&mut text, &mut tokens);
                let _ = chars.next();
                consume_declaration(&mut chars);
            }
            Some('/') => {
                flush_text(&mut text, &mut tokens);
                let _ = chars.next();
                if let Some(name) = consume_end_tag(&mut chars) {
                    tokens.push(Token::EndTag { name });
                }
            }
            Some(ch) if ch.is_ascii_alphabetic() => {
                flush_text(&mut text, &mut tokens);
                let (name, attrs, self_closing) = consume_start_tag(&mut chars);
                let raw = is_raw_text_element(&name);
                tokens.push(Token::StartTag {
                    name: name.clone(),
                    attrs,
                    self_closing,
                });
                if raw && !self_closing {
                    let content = consume_raw_text(&mut chars, &name);
                    if !content.is_empty() {
                        tokens.push(Token::Text(content));
                    }
                    tokens.push(Token::EndTag { name });
                }
            }
            // A lone '<' that starts nothing recognizable is character data.
            _ => text.push('<'),
        }
    }
    flush_text(&mut text, &mut tokens);
    tokens
}

/// Elements whose content is raw text (never markup).
fn is_raw_text_element(name: &str) -> bool {
    matches!(name, "script" | "style")
}

fn flush_text(text: &mut String, tokens: &mut Vec<Token>) {
    if !text.is_empty() {
        tokens.push(Token::Text(decode_references(text)));
        text.clear();
    }
}

/// Consume `<!-- ... -->` or `<!doctype ...>` style declarations.
/// The leading `<!` has already been consumed.
fn consume_declaration(chars: &mut Peekable<Chars<'_>>) {
    // Comment: ends at "-->". Everything else: ends at the first '>'.
    let mut lookahead = chars.clone();
    let is_comment = lookahead.next() == Some('-') && lookahead.next() == Some('-');
    if is_comment {
        let _ = chars.next();
        let _ = chars.next();
        let mut dashes = 0usize;
        for c in chars.by_ref() {
            match c {
                '-' => dashes += 1,
                '>' if dashes >= 2 => return,
                _ => dashes = 0,
            }
        }
    } else {
        for c in chars.by_ref() {
            if c == '>' {
                return;
            }
        }
    }
}

/// Consume an end tag after `</`. Returns `None` for degenerate input
/// like `</>` or `</ >`.
fn consume_end_tag(chars: &mut Peekable<Chars<'_>>) -> Option<String> {
    let name = consume_tag_name(chars);
    // Skip anything up to '>' (end tags carry no attributes we care about).
    while let Some(c) = chars.next() {
        if c == '>' {
            break;
        }
    }
    if name.is_empty() { None } else { Some(name) }
}

/// Consume a start tag after `<`. The first character is known alphabetic.
fn consume_start_tag(chars: &mut Peekable<Chars<'_>>) -> (String, Vec<(String, String)>, bool) {
    let name = consume_tag_name(chars);
    let mut attrs = Vec::new();
    let mut self_closing = false;

    loop {
        skip_whitespace(chars);
        match chars.peek() {
            None => break,
            Some('>') => {
                let _ = chars.next();
                break;
            }
            Some('/') => {
                let _ = chars.next();
                if chars.peek() == Some(&'>') {
                    let _ = chars.next();
                    self_closing = true;
                    break;
                }
                // Stray '/': ignore, per the forgiving contract.
            }
            Some(_) => {
                if let Some(attr) = consume_attribute(chars) {
                    attrs.push(attr);
                }
            }
        }
    }
    (name, attrs, self_closing)
}

fn consume_tag_name(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut name = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            name.push(c.to_ascii_lowercase());
            let _ = chars.next();
        } else {
            break;
        }
    }
    name
}

/// Consume one `name`, `name=value`, `name="value"` or `name='value'`.
fn consume_attribute(chars: &mut Peekable<Chars<'_>>) -> Option<(String, String)> {
    let mut name = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_whitespace() || c == '=' || c == '>' || c == '/' {
            break;
        }
        name.push(c.to_ascii_lowercase());
        let _ = chars.next();
    }
    if name.is_empty() {
        // Unparseable junk; drop one character to guarantee progress.
        let _ = chars.next();
        return None;
    }

    skip_whitespace(chars);
    if chars.peek() != Some(&'=') {
        return Some((name, String::new()));
    }
    let _ = chars.next();
    skip_whitespace(chars);

    let mut value = String::new();
    match chars.peek() {
        Some(&q @ ('"' | '\'')) => {
            let _ = chars.next();
            while let Some(c) = chars.next() {
                if c == q {
                    break;
                }
                value.push(c);
            }
        }
        _ => {
            while let Some(&c) = chars.peek() {
                if c.is_ascii_whitespace() || c == '>' {
                    break;
                }
                value.push(c);
                let _ = chars.next();
            }
        }
    }
    Some((name, decode_references(&value)))
}

/// Consume raw text until the matching `</name` end tag (case-insensitive).
fn consume_raw_text(chars: &mut Peekable<Chars<'_>>, name: &str) -> String {
    let closer: String = format!("</{name}");
    let mut content = String::new();
    let mut window = String::new();

    for c in chars.by_ref() {
        window.push(c.to_ascii_lowercase());
        content.push(c);
        if window.ends_with(&closer) {
            content.truncate(content.len() - closer.len());
            // Discard the remainder of the end tag.
            for rest in chars.by_ref() {
                if rest == '>' {
                    break;
                }
            }
            break;
        }
        while window.len() > closer.len() {
            let first = window.chars().next().map_or(1, char::len_utf8);
            window.drain(..first).for_each(drop);
        }
    }
    content
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while chars.peek().is_some_and(|c| c.is_ascii_whitespace()) {
        let _ = chars.next();
    }
}

/// Resolve the character references that show up in practice.
///
/// [WHATWG § 13.2.5.72](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
/// defines ~2200 named references; an inspector needs the common few plus
/// numeric forms. Unknown references pass through verbatim.
fn decode_references(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '&' {
            out.push(c);
            continue;
        }
        let mut entity = String::new();
        let mut terminated = false;
        // An entity is at most ~10 chars for our supported set.
        while entity.len() < 10 {
            match chars.peek() {
                Some(&';') => {
                    let _ = chars.next();
                    terminated = true;
                    break;
                }
                Some(&ch) if ch.is_ascii_alphanumeric() || ch == '#' => {
                    entity.push(ch);
                    let _ = chars.next();
                }
                _ => break,
            }
        }
        match (terminated, resolve_reference(&entity)) {
            (true, Some(decoded)) => out.push(decoded),
            _ => {
                out.push('&');
                out.push_str(&entity);
                if terminated {
                    out.push(';');
                }
            }
        }
    }
    out
}

fn resolve_reference(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let code = if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse::<u32>().ok()?
            } else {
                return None;
            };
            char::from_u32(code)
        }
    }
}
