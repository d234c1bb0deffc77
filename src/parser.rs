//! Template parsing.
//!
//! This module provides the [`Parser`], which turns a template string into a
//! [`Format`] tree in a single left-to-right pass with no backtracking.
//!
//! ## Overview
//!
//! - **Literal text** is accumulated until an unescaped placeholder begin
//! - **Placeholders** are parsed recursively: selectors, alignment, formatter name,
//!   options and nested format
//! - **Escaping** uses doubled braces by default, or an alternative escape
//!   character, plus optional character-literal conversion
//! - **Recovery**: malformed placeholders are kept, dropped or replaced according to
//!   [`ParserSettings::parse_error_action`]
//!
//! ## Usage
//!
//! ```rust
//! use smart_format::{Parser, ParserSettings};
//!
//! let settings = ParserSettings::default();
//! let parser = Parser::new(&settings);
//!
//! let format = parser.parse("{Name} is {Age,3} years old").unwrap();
//! assert_eq!(format.placeholders().count(), 2);
//! ```

use std::sync::Arc;

use crate::escape::{sequence_len, CHAR_LITERAL_ESCAPE};
use crate::format::{
    Format, FormatItem, LiteralKind, LiteralText, ParseIssue, Placeholder, Selector,
};
use crate::settings::{ErrorAction, ParserSettings};
use crate::{Error, Result};

/// Parses templates with a fixed set of [`ParserSettings`].
///
/// A parser holds no state between calls and can be shared between threads.
#[derive(Clone, Debug)]
pub struct Parser {
    settings: Arc<ParserSettings>,
}

impl Parser {
    pub fn new(settings: &ParserSettings) -> Self {
        Self::from_shared(Arc::new(settings.clone()))
    }

    /// Creates a parser that shares `settings` without copying them.
    #[must_use]
    pub fn from_shared(settings: Arc<ParserSettings>) -> Self {
        Parser { settings }
    }

    #[must_use]
    pub fn settings(&self) -> &ParserSettings {
        &self.settings
    }

    /// Parses `template` into a [`Format`] tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parsing`] for a malformed template when the parse error action
    /// is [`ErrorAction::ThrowError`], and [`Error::NestingTooDeep`] whenever the
    /// template nests deeper than `max_nesting_depth`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use smart_format::{ErrorAction, Parser, ParserSettings};
    ///
    /// let strict = ParserSettings::default();
    /// assert!(Parser::new(&strict).parse("{Name").is_err());
    ///
    /// let lenient = ParserSettings::default().with_parse_error_action(ErrorAction::Ignore);
    /// let format = Parser::new(&lenient).parse("a {Name b").unwrap();
    /// assert_eq!(format.parse_errors().len(), 1);
    /// ```
    pub fn parse(&self, template: &str) -> Result<Format> {
        let mut scanner = Scanner {
            input: template,
            raw: Arc::from(template),
            settings: &self.settings,
            syntax: Arc::clone(&self.settings),
            position: 0,
            issues: Vec::new(),
        };

        let mut format = scanner.parse_format(0, false)?;
        format.parse_errors = scanner.issues;
        Ok(format)
    }
}

/// Cursor over one template being parsed.
struct Scanner<'a> {
    input: &'a str,
    raw: Arc<str>,
    settings: &'a ParserSettings,
    syntax: Arc<ParserSettings>,
    position: usize,
    issues: Vec<ParseIssue>,
}

impl<'a> Scanner<'a> {
    fn peek_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.input[self.position..].chars();
        chars.next();
        chars.next()
    }

    fn next_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    fn error(&self, position: usize, message: &str) -> Error {
        Error::parsing(self.input, position, message)
    }

    /// Parses literal text and placeholders until the end of input or, for a nested
    /// format, until an unconsumed placeholder end.
    fn parse_format(&mut self, depth: usize, nested: bool) -> Result<Format> {
        let start = self.position;
        let mut items = Vec::new();
        let mut literal_start = self.position;

        while let Some(ch) = self.peek_char() {
            let here = self.position;
            let next = self.peek_second();

            if self.settings.alternative_escape_char == Some(ch)
                && next.is_some_and(|n| self.settings.is_brace(n))
            {
                // The escaped brace opens the next literal run
                push_text(&mut items, literal_start, here);
                self.next_char();
                literal_start = self.position;
                self.next_char();
                continue;
            }

            if self.settings.convert_char_literals && ch == CHAR_LITERAL_ESCAPE {
                push_text(&mut items, literal_start, here);
                if next.is_some_and(|n| self.settings.is_brace(n)) {
                    self.next_char();
                    literal_start = self.position;
                    self.next_char();
                } else {
                    let len = sequence_len(&self.input[here..]);
                    items.push(FormatItem::Literal(LiteralText {
                        start: here,
                        end: here + len,
                        kind: LiteralKind::CharLiteral,
                    }));
                    self.position += len;
                    literal_start = self.position;
                }
                continue;
            }

            let doubling = self.settings.alternative_escape_char.is_none();

            if ch == self.settings.placeholder_begin {
                if doubling && next == Some(ch) {
                    self.next_char();
                    push_text(&mut items, literal_start, self.position);
                    self.next_char();
                    literal_start = self.position;
                    continue;
                }

                push_text(&mut items, literal_start, here);
                match self.parse_placeholder(depth + 1) {
                    Ok(placeholder) => {
                        items.push(FormatItem::Placeholder(placeholder));
                        literal_start = self.position;
                    }
                    Err(err) if err.is_recoverable() && self.recovers() => {
                        self.position = here;
                        let end = self.skip_placeholder();
                        literal_start = self.recover(&mut items, err, here, end);
                    }
                    Err(err) => return Err(err),
                }
                continue;
            }

            if ch == self.settings.placeholder_end {
                if nested {
                    break;
                }
                if doubling && next == Some(ch) {
                    self.next_char();
                    push_text(&mut items, literal_start, self.position);
                    self.next_char();
                    literal_start = self.position;
                    continue;
                }

                let err = self.error(here, "Unmatched closing brace");
                if !self.recovers() {
                    return Err(err);
                }
                push_text(&mut items, literal_start, here);
                self.next_char();
                literal_start = self.recover(&mut items, err, here, self.position);
                continue;
            }

            self.next_char();
        }

        push_text(&mut items, literal_start, self.position);

        Ok(Format {
            raw: Arc::clone(&self.raw),
            syntax: Arc::clone(&self.syntax),
            start,
            end: self.position,
            depth,
            items,
            parse_errors: Vec::new(),
        })
    }

    fn parse_placeholder(&mut self, depth: usize) -> Result<Placeholder> {
        let start = self.position;
        if depth > self.settings.max_nesting_depth {
            return Err(Error::nesting_too_deep(
                start,
                self.settings.max_nesting_depth,
            ));
        }
        log::trace!("parsing placeholder at {} (depth {})", start, depth);
        self.next_char();

        let selectors = self.parse_selectors()?;
        let alignment = self.parse_alignment()?;

        let mut formatter_name = (self.position, self.position);
        let mut formatter_options = None;
        let mut format = None;

        if self.peek_char() == Some(self.settings.formatter_name_separator) {
            self.next_char();
            let name_start = self.position;
            while self
                .peek_char()
                .is_some_and(|c| c.is_alphanumeric() || c == '_')
            {
                self.next_char();
            }
            let name_end = self.position;
            let has_name = name_end > name_start
                && self
                    .settings
                    .accepts_formatter_name(&self.input[name_start..name_end]);

            match self.peek_char() {
                Some(c) if has_name && c == self.settings.formatter_options_begin => {
                    formatter_name = (name_start, name_end);
                    formatter_options = Some(self.parse_options()?);
                    match self.peek_char() {
                        Some(c) if c == self.settings.formatter_name_separator => {
                            self.next_char();
                            format = Some(self.parse_format(depth, true)?);
                        }
                        Some(c) if c == self.settings.placeholder_end => {}
                        Some(_) => {
                            return Err(self.error(
                                self.position,
                                "Expected a format or the end of the placeholder after formatter options",
                            ));
                        }
                        None => {
                            return Err(self.error(
                                self.position,
                                "Unexpected end of input, missing closing brace",
                            ));
                        }
                    }
                }
                Some(c) if has_name && c == self.settings.formatter_name_separator => {
                    formatter_name = (name_start, name_end);
                    self.next_char();
                    format = Some(self.parse_format(depth, true)?);
                }
                _ => {
                    // Not a name: everything after the separator is the nested format
                    self.position = name_start;
                    formatter_name = (name_start, name_start);
                    format = Some(self.parse_format(depth, true)?);
                }
            }
        }

        match self.peek_char() {
            Some(c) if c == self.settings.placeholder_end => {
                self.next_char();
            }
            _ => {
                return Err(self.error(
                    self.position,
                    "Unexpected end of input, missing closing brace",
                ));
            }
        }

        Ok(Placeholder {
            raw: Arc::clone(&self.raw),
            syntax: Arc::clone(&self.syntax),
            start,
            end: self.position,
            depth,
            selectors,
            alignment,
            formatter_name,
            formatter_options,
            format,
        })
    }

    fn parse_selectors(&mut self) -> Result<Vec<Selector>> {
        let mut selectors = Vec::new();
        let mut operator_start = self.position;
        let mut selector_start = self.position;

        loop {
            match self.peek_char() {
                None => {
                    return Err(self.error(
                        self.position,
                        "Unexpected end of input, missing closing brace",
                    ));
                }
                Some(c) if self.settings.is_selector_char(c) => {
                    self.next_char();
                }
                Some(c) if c == self.settings.selector_operator => {
                    if selector_start == self.position {
                        return Err(self.error(self.position, "Empty selector"));
                    }
                    selectors.push(self.selector(operator_start, selector_start, selectors.len()));
                    operator_start = self.position;
                    self.next_char();
                    selector_start = self.position;
                }
                Some(c)
                    if c == self.settings.alignment_operator
                        || c == self.settings.formatter_name_separator
                        || c == self.settings.placeholder_end =>
                {
                    break;
                }
                Some(_) => {
                    return Err(self.error(self.position, "Invalid character in selector"));
                }
            }
        }

        if selector_start == self.position && !selectors.is_empty() {
            return Err(self.error(self.position, "Trailing selector operator"));
        }
        // A lone empty selector stands for the current scope
        selectors.push(self.selector(operator_start, selector_start, selectors.len()));
        Ok(selectors)
    }

    fn selector(&self, operator_start: usize, start: usize, index: usize) -> Selector {
        Selector {
            raw: Arc::clone(&self.raw),
            start,
            end: self.position,
            operator_start,
            index,
        }
    }

    fn parse_alignment(&mut self) -> Result<i32> {
        if self.peek_char() != Some(self.settings.alignment_operator) {
            return Ok(0);
        }
        self.next_char();

        let number_start = self.position;
        if self.peek_char() == Some('-') {
            self.next_char();
        }
        let digits_start = self.position;
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.next_char();
        }
        if self.position == digits_start {
            return Err(self.error(self.position, "Invalid alignment, expected digits"));
        }

        let alignment = self.input[number_start..self.position]
            .parse::<i32>()
            .ok()
            .filter(|a: &i32| a.unsigned_abs() <= self.settings.max_alignment)
            .ok_or_else(|| self.error(number_start, "Alignment out of range"))?;

        match self.peek_char() {
            Some(c)
                if c == self.settings.formatter_name_separator
                    || c == self.settings.placeholder_end =>
            {
                Ok(alignment)
            }
            None => Err(self.error(
                self.position,
                "Unexpected end of input, missing closing brace",
            )),
            Some(_) => Err(self.error(self.position, "Invalid character after alignment")),
        }
    }

    /// Parses `(options)`, returning the span between the delimiters.
    fn parse_options(&mut self) -> Result<(usize, usize)> {
        let open = self.position;
        self.next_char();
        let start = self.position;
        let mut depth = 0usize;

        loop {
            match self.next_char() {
                None => return Err(self.error(open, "Unterminated formatter options")),
                Some(CHAR_LITERAL_ESCAPE) => {
                    self.next_char();
                }
                Some(c) if c == self.settings.formatter_options_begin => depth += 1,
                Some(c) if c == self.settings.formatter_options_end => {
                    if depth == 0 {
                        let end = self.position - c.len_utf8();
                        return Ok((start, end));
                    }
                    depth -= 1;
                }
                Some(_) => {}
            }
        }
    }

    /// Moves past the placeholder starting at the cursor, counting braces, and
    /// returns the end of the skipped region (end of input if it never closes).
    fn skip_placeholder(&mut self) -> usize {
        let mut depth = 0usize;
        while let Some(ch) = self.next_char() {
            let escaped = self.settings.alternative_escape_char == Some(ch)
                || (self.settings.convert_char_literals && ch == CHAR_LITERAL_ESCAPE);
            if escaped && self.peek_char().is_some_and(|n| self.settings.is_brace(n)) {
                self.next_char();
            } else if ch == self.settings.placeholder_begin {
                depth += 1;
            } else if ch == self.settings.placeholder_end {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    break;
                }
            }
        }
        self.position
    }

    fn recovers(&self) -> bool {
        self.settings.parse_error_action != ErrorAction::ThrowError
    }

    /// Applies the parse error action to the malformed region `start..end` and
    /// returns where the next literal run begins.
    fn recover(
        &mut self,
        items: &mut Vec<FormatItem>,
        err: Error,
        start: usize,
        end: usize,
    ) -> usize {
        let issue = match err {
            Error::Parsing {
                position, message, ..
            } => ParseIssue { position, message },
            other => ParseIssue {
                position: start,
                message: other.to_string(),
            },
        };
        log::warn!("recovered from malformed template: {}", issue);

        let next_literal = match self.settings.parse_error_action {
            ErrorAction::MaintainTokens => start,
            ErrorAction::OutputErrorInResult => {
                items.push(FormatItem::Literal(LiteralText {
                    start,
                    end,
                    kind: LiteralKind::Diagnostic(issue.to_string()),
                }));
                end
            }
            ErrorAction::Ignore | ErrorAction::ThrowError => end,
        };
        self.issues.push(issue);
        next_literal
    }
}

fn push_text(items: &mut Vec<FormatItem>, start: usize, end: usize) {
    if end > start {
        items.push(FormatItem::Literal(LiteralText::text(start, end)));
    }
}
