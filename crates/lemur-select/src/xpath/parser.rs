//! Location-path parsing into the [`xpath`](crate::xpath) AST.
//!
//! [§ 2.5 Abbreviated Syntax](https://www.w3.org/TR/xpath-10/#path-abbrev)
//!
//! Only absolute abbreviated paths are accepted; anything recognizable as
//! fuller XPath (explicit axes, functions beyond `contains`, node-type
//! tests) is called out by name in an `Unsupported` error rather than
//! mis-evaluated.

use std::iter::Peekable;
use std::str::Chars;

use crate::SelectorError;
use crate::xpath::{Axis, LocationPath, NameTest, Predicate, Step};

/// Parse an absolute location path.
///
/// # Errors
///
/// [`SelectorError::Syntax`] for malformed input;
/// [`SelectorError::Unsupported`] for valid XPath outside the subset
/// (relative paths, explicit axes, node-type tests, unknown functions).
pub fn parse(raw: &str) -> Result<LocationPath, SelectorError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SelectorError::Syntax("empty location path".to_string()));
    }
    if !trimmed.starts_with('/') {
        return Err(SelectorError::Unsupported(
            "relative location paths (an absolute path starts with '/' or '//')".to_string(),
        ));
    }

    let mut parser = Parser {
        chars: trimmed.chars().peekable(),
    };
    let mut steps = Vec::new();
    while !parser.at_end() {
        steps.push(parser.parse_step()?);
    }
    if steps.is_empty() {
        return Err(SelectorError::Syntax("empty location path".to_string()));
    }
    Ok(LocationPath { steps })
}

struct Parser<'a> {
    chars: Peekable<Chars<'a>>,
}

impl Parser<'_> {
    fn at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn skip_whitespace(&mut self) {
        while self.chars.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            let _ = self.chars.next();
        }
    }

    /// Parse one `/step` or `//step`, including the leading separator.
    fn parse_step(&mut self) -> Result<Step, SelectorError> {
        if self.chars.next() != Some('/') {
            return Err(SelectorError::Syntax(
                "expected '/' between location steps".to_string(),
            ));
        }
        let axis = if self.chars.peek() == Some(&'/') {
            let _ = self.chars.next();
            Axis::DescendantOrSelf
        } else {
            Axis::Child
        };

        let test = self.parse_name_test()?;
        let mut predicates = Vec::new();
        loop {
            self.skip_whitespace();
            if self.chars.peek() == Some(&'[') {
                let _ = self.chars.next();
                predicates.push(self.parse_predicate()?);
            } else {
                break;
            }
        }

        // A step ends at '/', a predicate, or end of input; anything else
        // is junk we should name.
        match self.chars.peek() {
            None | Some('/') => Ok(Step {
                axis,
                test,
                predicates,
            }),
            Some(&c) => Err(SelectorError::Syntax(format!(
                "unexpected character '{c}' after location step"
            ))),
        }
    }

    fn parse_name_test(&mut self) -> Result<NameTest, SelectorError> {
        if self.chars.peek() == Some(&'*') {
            let _ = self.chars.next();
            return Ok(NameTest::Any);
        }
        let name = self.consume_name();
        if name.is_empty() {
            return Err(SelectorError::Syntax(
                "expected an element name or '*' in location step".to_string(),
            ));
        }
        // Fuller XPath shapes get named, not guessed at.
        if self.chars.peek() == Some(&':') {
            return Err(SelectorError::Unsupported(format!(
                "explicit axis '{name}::' (only the abbreviated '/' and '//' forms)"
            )));
        }
        if self.chars.peek() == Some(&'(') {
            return Err(SelectorError::Unsupported(format!(
                "node-type test '{name}()'"
            )));
        }
        Ok(NameTest::Name(name))
    }

    /// Parse a predicate after its opening `[`.
    fn parse_predicate(&mut self) -> Result<Predicate, SelectorError> {
        self.skip_whitespace();
        let predicate = match self.chars.peek() {
            Some('@') => {
                let _ = self.chars.next();
                let attr = self.consume_name();
                if attr.is_empty() {
                    return Err(SelectorError::Syntax(
                        "'@' must be followed by an attribute name".to_string(),
                    ));
                }
                self.skip_whitespace();
                if self.chars.peek() == Some(&'=') {
                    let _ = self.chars.next();
                    self.skip_whitespace();
                    let value = self.consume_literal()?;
                    Predicate::AttrEquals(attr, value)
                } else {
                    Predicate::AttrExists(attr)
                }
            }
            Some(c) if c.is_ascii_digit() => {
                let mut digits = String::new();
                while self.chars.peek().is_some_and(char::is_ascii_digit) {
                    digits.extend(self.chars.next());
                }
                let position = digits.parse::<usize>().map_err(|_| {
                    SelectorError::Syntax(format!("invalid position '{digits}'"))
                })?;
                Predicate::Position(position)
            }
            Some(c) if c.is_ascii_alphabetic() => {
                let name = self.consume_name();
                if name == "contains" {
                    self.parse_contains()?
                } else {
                    return Err(SelectorError::Unsupported(format!(
                        "function '{name}()' in predicate (only 'contains')"
                    )));
                }
            }
            Some(&c) => {
                return Err(SelectorError::Syntax(format!(
                    "unexpected character '{c}' in predicate"
                )));
            }
            None => return Err(SelectorError::Syntax("unterminated '['".to_string())),
        };

        self.skip_whitespace();
        if self.chars.next() != Some(']') {
            return Err(SelectorError::Syntax("unterminated '['".to_string()));
        }
        Ok(predicate)
    }

    /// `contains(@attr, "value")` — the name has been consumed.
    fn parse_contains(&mut self) -> Result<Predicate, SelectorError> {
        self.skip_whitespace();
        if self.chars.next() != Some('(') {
            return Err(SelectorError::Syntax(
                "expected '(' after 'contains'".to_string(),
            ));
        }
        self.skip_whitespace();
        if self.chars.next() != Some('@') {
            return Err(SelectorError::Unsupported(
                "contains() over anything but an attribute".to_string(),
            ));
        }
        let attr = self.consume_name();
        if attr.is_empty() {
            return Err(SelectorError::Syntax(
                "'@' must be followed by an attribute name".to_string(),
            ));
        }
        self.skip_whitespace();
        if self.chars.next() != Some(',') {
            return Err(SelectorError::Syntax(
                "expected ',' between contains() arguments".to_string(),
            ));
        }
        self.skip_whitespace();
        let value = self.consume_literal()?;
        self.skip_whitespace();
        if self.chars.next() != Some(')') {
            return Err(SelectorError::Syntax(
                "expected ')' to close contains()".to_string(),
            ));
        }
        Ok(Predicate::Contains(attr, value))
    }

    /// [§ 3.7 Lexical Structure](https://www.w3.org/TR/xpath-10/#exprlex):
    /// a quoted literal. XPath 1.0 has no escape sequences, so a literal
    /// simply cannot contain its own quote character.
    fn consume_literal(&mut self) -> Result<String, SelectorError> {
        let quote = match self.chars.next() {
            Some(q @ ('"' | '\'')) => q,
            _ => {
                return Err(SelectorError::Syntax(
                    "expected a quoted string".to_string(),
                ));
            }
        };
        let mut value = String::new();
        for c in self.chars.by_ref() {
            if c == quote {
                return Ok(value);
            }
            value.push(c);
        }
        Err(SelectorError::Syntax("unterminated string".to_string()))
    }

    fn consume_name(&mut self) -> String {
        let mut name = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                name.push(c);
                let _ = self.chars.next();
            } else {
                break;
            }
        }
        name
    }
}
