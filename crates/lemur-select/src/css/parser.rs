//! Selector-string parsing into the [`css`](crate::css) AST.
//!
//! [§ 4 Selector syntax](https://www.w3.org/TR/selectors-4/#syntax)
//!
//! A hand-rolled character walker. Parse failures are values, not panics:
//! malformed input yields [`SelectorError::Syntax`] and grammar outside the
//! documented subset yields [`SelectorError::Unsupported`], each with a
//! message worth showing to the person who typed the selector.

use std::iter::Peekable;
use std::str::Chars;

use crate::SelectorError;
use crate::css::{
    AttributeSelector, Combinator, ComplexSelector, CompoundSelector, PseudoClass, SimpleSelector,
};

/// Check if a character can start an identifier.
/// [§ 4.3.10 ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
const fn is_ident_start_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// Check if a character can continue an identifier.
/// [§ 4.3.9 ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
const fn is_ident_char(c: char) -> bool {
    is_ident_start_char(c) || c.is_ascii_digit() || c == '-'
}

/// Parse a comma-separated selector list into complex selectors.
///
/// # Errors
///
/// [`SelectorError::Syntax`] for malformed input (empty selector, dangling
/// combinator, unterminated string or bracket);
/// [`SelectorError::Unsupported`] for recognized-but-out-of-subset grammar
/// (pseudo-elements, `:hover`, `:not(...)`, `an+b` arguments).
pub fn parse_selector_list(raw: &str) -> Result<Vec<ComplexSelector>, SelectorError> {
    if raw.trim().is_empty() {
        return Err(SelectorError::Syntax("empty selector".to_string()));
    }

    let mut list = Vec::new();
    let mut parser = Parser::new(raw);
    loop {
        list.push(parser.parse_complex()?);
        if !parser.consume_comma() {
            break;
        }
    }
    if !parser.at_end() {
        return Err(parser.unexpected());
    }
    Ok(list)
}

/// Character-walking parser state for one selector list.
struct Parser<'a> {
    chars: Peekable<Chars<'a>>,
}

impl<'a> Parser<'a> {
    fn new(raw: &'a str) -> Self {
        Parser {
            chars: raw.trim().chars().peekable(),
        }
    }

    fn at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn unexpected(&mut self) -> SelectorError {
        match self.chars.peek() {
            Some(&c) => SelectorError::Syntax(format!("unexpected character '{c}'")),
            None => SelectorError::Syntax("unexpected end of selector".to_string()),
        }
    }

    fn skip_whitespace(&mut self) {
        while self.chars.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            let _ = self.chars.next();
        }
    }

    /// Consume a top-level `,` (with surrounding whitespace) if present.
    fn consume_comma(&mut self) -> bool {
        self.skip_whitespace();
        if self.chars.peek() == Some(&',') {
            let _ = self.chars.next();
            self.skip_whitespace();
            true
        } else {
            false
        }
    }

    /// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
    ///
    /// Parse one complex selector: compounds joined by combinators, up to a
    /// top-level comma or end of input.
    fn parse_complex(&mut self) -> Result<ComplexSelector, SelectorError> {
        self.skip_whitespace();
        let mut compounds = vec![self.parse_compound()?];
        let mut between: Vec<Combinator> = Vec::new();

        loop {
            // Whitespace is significant here: it may be the descendant
            // combinator, or just padding around an explicit one.
            let had_space = self.chars.peek().is_some_and(|c| c.is_ascii_whitespace());
            self.skip_whitespace();

            let combinator = match self.chars.peek() {
                Some('>') => {
                    let _ = self.chars.next();
                    Combinator::Child
                }
                Some('+') => {
                    let _ = self.chars.next();
                    Combinator::NextSibling
                }
                Some('~') => {
                    let _ = self.chars.next();
                    Combinator::SubsequentSibling
                }
                Some(',') | None => break,
                Some(_) if had_space => Combinator::Descendant,
                Some(_) => return Err(self.unexpected()),
            };
            self.skip_whitespace();
            if matches!(self.chars.peek(), None | Some(',')) {
                return Err(SelectorError::Syntax(
                    "selector ends with a combinator".to_string(),
                ));
            }
            compounds.push(self.parse_compound()?);
            between.push(combinator);
        }

        // Rightmost compound is the subject; the chain is stored
        // right-to-left so matching walks up from the subject.
        let Some(subject) = compounds.pop() else {
            return Err(SelectorError::Syntax("empty selector".to_string()));
        };
        let combinators = compounds
            .into_iter()
            .zip(between)
            .rev()
            .map(|(compound, combinator)| (combinator, compound))
            .collect();

        Ok(ComplexSelector {
            subject,
            combinators,
        })
    }

    /// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
    fn parse_compound(&mut self) -> Result<CompoundSelector, SelectorError> {
        let mut simple_selectors = Vec::new();

        loop {
            match self.chars.peek() {
                Some(&c) if is_ident_start_char(c) || c == '-' => {
                    // A type selector can only open a compound: `[a]b` and
                    // `.xb` never reach here (the `.` branch eats the whole
                    // ident), so a bare ident mid-compound is malformed.
                    if !simple_selectors.is_empty() {
                        return Err(self.unexpected());
                    }
                    simple_selectors.push(SimpleSelector::Type(self.consume_ident()?));
                }
                Some('*') => {
                    let _ = self.chars.next();
                    simple_selectors.push(SimpleSelector::Universal);
                }
                Some('.') => {
                    let _ = self.chars.next();
                    let name = self.consume_ident()?;
                    if name.is_empty() {
                        return Err(SelectorError::Syntax(
                            "'.' must be followed by a class name".to_string(),
                        ));
                    }
                    simple_selectors.push(SimpleSelector::Class(name));
                }
                Some('#') => {
                    let _ = self.chars.next();
                    let name = self.consume_ident()?;
                    if name.is_empty() {
                        return Err(SelectorError::Syntax(
                            "'#' must be followed by an id".to_string(),
                        ));
                    }
                    simple_selectors.push(SimpleSelector::Id(name));
                }
                Some('[') => {
                    let _ = self.chars.next();
                    simple_selectors.push(SimpleSelector::Attribute(self.parse_attribute()?));
                }
                Some(':') => {
                    let _ = self.chars.next();
                    simple_selectors.push(SimpleSelector::PseudoClass(self.parse_pseudo()?));
                }
                _ => break,
            }
        }

        if simple_selectors.is_empty() {
            return Err(SelectorError::Syntax(
                "expected a compound selector".to_string(),
            ));
        }
        Ok(CompoundSelector { simple_selectors })
    }

    /// Consume an identifier, honoring `\X` escapes
    /// ([§ 2.1](https://www.w3.org/TR/css-syntax-3/#escaping)) so that ids
    /// and classes containing reserved punctuation round-trip through the
    /// synthesizer's escaping.
    fn consume_ident(&mut self) -> Result<String, SelectorError> {
        let mut ident = String::new();
        loop {
            match self.chars.peek() {
                Some(&c) if is_ident_char(c) => {
                    ident.push(c);
                    let _ = self.chars.next();
                }
                Some('\\') => {
                    let _ = self.chars.next();
                    let Some(escaped) = self.chars.next() else {
                        return Err(SelectorError::Syntax(
                            "dangling '\\' at end of selector".to_string(),
                        ));
                    };
                    ident.push(escaped);
                }
                _ => break,
            }
        }
        Ok(ident)
    }

    /// Consume a quoted string after its opening quote, honoring `\X`
    /// escapes.
    fn consume_string(&mut self, quote: char) -> Result<String, SelectorError> {
        let mut value = String::new();
        loop {
            match self.chars.next() {
                Some(c) if c == quote => return Ok(value),
                Some('\\') => match self.chars.next() {
                    Some(escaped) => value.push(escaped),
                    None => {
                        return Err(SelectorError::Syntax("unterminated string".to_string()));
                    }
                },
                Some(c) => value.push(c),
                None => return Err(SelectorError::Syntax("unterminated string".to_string())),
            }
        }
    }

    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    ///
    /// The opening `[` has been consumed.
    fn parse_attribute(&mut self) -> Result<AttributeSelector, SelectorError> {
        self.skip_whitespace();
        let name = self.consume_ident()?;
        if name.is_empty() {
            return Err(SelectorError::Syntax(
                "'[' must be followed by an attribute name".to_string(),
            ));
        }
        self.skip_whitespace();

        let op = match self.chars.next() {
            Some(']') => return Ok(AttributeSelector::Exists(name)),
            Some('=') => '=',
            Some(c @ ('~' | '|' | '^' | '$' | '*')) => {
                if self.chars.next() != Some('=') {
                    return Err(SelectorError::Syntax(format!(
                        "'{c}' in an attribute selector must be followed by '='"
                    )));
                }
                c
            }
            Some(c) => {
                return Err(SelectorError::Syntax(format!(
                    "unexpected '{c}' in attribute selector"
                )));
            }
            None => return Err(SelectorError::Syntax("unterminated '['".to_string())),
        };

        self.skip_whitespace();
        let value = match self.chars.peek() {
            Some(&q @ ('"' | '\'')) => {
                let _ = self.chars.next();
                self.consume_string(q)?
            }
            _ => {
                let v = self.consume_ident()?;
                if v.is_empty() {
                    return Err(SelectorError::Syntax(
                        "expected an attribute value".to_string(),
                    ));
                }
                v
            }
        };
        self.skip_whitespace();
        if self.chars.next() != Some(']') {
            return Err(SelectorError::Syntax("unterminated '['".to_string()));
        }

        Ok(match op {
            '=' => AttributeSelector::Equals(name, value),
            '~' => AttributeSelector::Includes(name, value),
            '|' => AttributeSelector::DashMatch(name, value),
            '^' => AttributeSelector::PrefixMatch(name, value),
            '$' => AttributeSelector::SuffixMatch(name, value),
            _ => AttributeSelector::SubstringMatch(name, value),
        })
    }

    /// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    /// [§ 11 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
    ///
    /// The first `:` has been consumed. Anything outside the structural
    /// subset is reported as unsupported; the engine never silently treats
    /// `:hover` or `:not(...)` as "matches nothing".
    fn parse_pseudo(&mut self) -> Result<PseudoClass, SelectorError> {
        if self.chars.peek() == Some(&':') {
            let _ = self.chars.next();
            let name = self.consume_ident()?;
            return Err(SelectorError::Unsupported(format!(
                "pseudo-element '::{name}' (the matcher evaluates elements only)"
            )));
        }

        let name = self.consume_ident()?;
        if name.is_empty() {
            return Err(SelectorError::Syntax(
                "':' must be followed by a pseudo-class name".to_string(),
            ));
        }

        let lower = name.to_ascii_lowercase();
        match lower.as_str() {
            "root" => Ok(PseudoClass::Root),
            "first-child" => Ok(PseudoClass::FirstChild),
            "last-child" => Ok(PseudoClass::LastChild),
            "only-child" => Ok(PseudoClass::OnlyChild),
            "empty" => Ok(PseudoClass::Empty),
            "first-of-type" => Ok(PseudoClass::FirstOfType),
            "last-of-type" => Ok(PseudoClass::LastOfType),
            "nth-child" => {
                let arg = self.consume_parenthesized()?;
                let trimmed = arg.trim();
                trimmed.parse::<usize>().map(PseudoClass::NthChild).map_err(|_| {
                    SelectorError::Unsupported(format!(
                        ":nth-child supports only integer arguments, got '{trimmed}'"
                    ))
                })
            }
            _ => {
                // Consume a functional argument if present so the message
                // names the whole construct.
                if self.chars.peek() == Some(&'(') {
                    let _ = self.consume_parenthesized()?;
                    Err(SelectorError::Unsupported(format!(
                        "functional pseudo-class ':{lower}(...)'"
                    )))
                } else {
                    Err(SelectorError::Unsupported(format!(
                        "pseudo-class ':{lower}'"
                    )))
                }
            }
        }
    }

    /// Consume `( ... )` with balanced nesting, returning the inside.
    fn consume_parenthesized(&mut self) -> Result<String, SelectorError> {
        if self.chars.next() != Some('(') {
            return Err(SelectorError::Syntax(
                "expected '(' after functional pseudo-class".to_string(),
            ));
        }
        let mut depth = 1u32;
        let mut inner = String::new();
        for c in self.chars.by_ref() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(inner);
                    }
                }
                _ => {}
            }
            inner.push(c);
        }
        Err(SelectorError::Syntax("unbalanced parentheses".to_string()))
    }
}
