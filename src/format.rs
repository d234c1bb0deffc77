//! The parsed template tree.
//!
//! A template parses into a [`Format`]: an ordered list of [`FormatItem`]s, each
//! either a run of [`LiteralText`] or a [`Placeholder`]. A placeholder may own a
//! nested `Format` of its own, so the tree is as deep as the template nests.
//!
//! ```text
//! "Hi {Person.Name,-10:choose(1|2):one|two}!"
//!
//! Format (depth 0)
//! ├── LiteralText "Hi "
//! ├── Placeholder (depth 1)
//! │   ├── selectors: Person, Name
//! │   ├── alignment: -10
//! │   ├── formatter name: choose, options: 1|2
//! │   └── Format (depth 1)
//! │       └── LiteralText "one|two"
//! └── LiteralText "!"
//! ```
//!
//! Every node stores byte offsets into the shared raw template, so the original
//! text of any node is available without copying. The tree is immutable once
//! built and can be shared between threads.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::escape::unescape_char_literals;
use crate::settings::ParserSettings;

/// An ordered sequence of literal text and placeholders.
///
/// # Examples
///
/// ```rust
/// use smart_format::{FormatItem, Parser, ParserSettings};
///
/// let settings = ParserSettings::default();
/// let format = Parser::new(&settings).parse("Hello {Name}!").unwrap();
///
/// assert_eq!(format.items().len(), 3);
/// assert!(matches!(format.items()[1], FormatItem::Placeholder(_)));
/// assert_eq!(format.raw_text(), "Hello {Name}!");
/// ```
#[derive(Clone, Debug)]
pub struct Format {
    pub(crate) raw: Arc<str>,
    pub(crate) syntax: Arc<ParserSettings>,
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) depth: usize,
    pub(crate) items: Vec<FormatItem>,
    pub(crate) parse_errors: Vec<ParseIssue>,
}

/// One item of a [`Format`].
#[derive(Clone, Debug)]
pub enum FormatItem {
    Literal(LiteralText),
    Placeholder(Placeholder),
}

/// What a [`LiteralText`] renders as.
#[derive(Clone, Debug, PartialEq)]
pub enum LiteralKind {
    /// The raw text itself.
    Text,
    /// A character-literal escape sequence such as `\n`, converted when rendered.
    CharLiteral,
    /// A message replacing a malformed region of the template.
    Diagnostic(String),
}

/// A run of literal text, as a span of the raw template.
#[derive(Clone, Debug)]
pub struct LiteralText {
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) kind: LiteralKind,
}

/// One `{...}` unit of a template.
///
/// For `{Items.Length,-10:choose(1|2|3):one|two|three}`, the selectors are `Items`
/// and `Length`, the alignment is `-10`, the formatter name is `choose`, the raw
/// options are `1|2|3`, and the nested format is `one|two|three`.
#[derive(Clone, Debug)]
pub struct Placeholder {
    pub(crate) raw: Arc<str>,
    pub(crate) syntax: Arc<ParserSettings>,
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) depth: usize,
    pub(crate) selectors: Vec<Selector>,
    pub(crate) alignment: i32,
    pub(crate) formatter_name: (usize, usize),
    pub(crate) formatter_options: Option<(usize, usize)>,
    pub(crate) format: Option<Format>,
}

/// One segment of a placeholder's dotted selector path.
#[derive(Clone, Debug)]
pub struct Selector {
    pub(crate) raw: Arc<str>,
    pub(crate) start: usize,
    pub(crate) end: usize,
    /// Start of the segment including its leading selector operator, if any.
    pub(crate) operator_start: usize,
    pub(crate) index: usize,
}

/// A malformed region recovered under a non-throwing parse error action.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseIssue {
    pub position: usize,
    pub message: String,
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parse error at position {}: {}", self.position, self.message)
    }
}

impl Format {
    /// Returns the items of this format, in template order.
    #[must_use]
    pub fn items(&self) -> &[FormatItem] {
        &self.items
    }

    /// Returns the exact template text this format was parsed from.
    #[must_use]
    pub fn raw_text(&self) -> &str {
        &self.raw[self.start..self.end]
    }

    /// Returns the whole template this format belongs to.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Returns the nesting depth: 0 for a top-level format, the owning placeholder's
    /// depth for a nested one.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns the parser settings this format was parsed with.
    #[must_use]
    pub fn syntax(&self) -> &ParserSettings {
        &self.syntax
    }

    /// Returns the malformed regions that were recovered while parsing.
    ///
    /// Only the top-level format records these; nested formats return an empty slice.
    #[must_use]
    pub fn parse_errors(&self) -> &[ParseIssue] {
        &self.parse_errors
    }

    /// Returns the placeholders directly contained in this format.
    pub fn placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.items.iter().filter_map(|item| match item {
            FormatItem::Placeholder(placeholder) => Some(placeholder),
            FormatItem::Literal(_) => None,
        })
    }

    /// Returns `true` if this format contains only literal text.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        self.items
            .iter()
            .all(|item| matches!(item, FormatItem::Literal(_)))
    }

    /// Splits this format on `separator` occurring in its own literal text.
    ///
    /// Separators inside nested placeholders and escape sequences are not split on.
    /// The parts share the raw template; nothing is re-parsed. Formatters use this to
    /// read `|`-separated alternatives such as `one|two|many`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use smart_format::{Parser, ParserSettings};
    ///
    /// let settings = ParserSettings::default();
    /// let format = Parser::new(&settings).parse("none|{0:a|b}|many").unwrap();
    /// let parts = format.split('|');
    ///
    /// let texts: Vec<_> = parts.iter().map(|p| p.raw_text()).collect();
    /// assert_eq!(texts, vec!["none", "{0:a|b}", "many"]);
    /// ```
    #[must_use]
    pub fn split(&self, separator: char) -> Vec<Format> {
        let mut parts = Vec::new();
        let mut items = Vec::new();
        let mut part_start = self.start;

        for item in &self.items {
            match item {
                FormatItem::Literal(literal) if literal.kind == LiteralKind::Text => {
                    let mut segment_start = literal.start;
                    for (offset, ch) in self.raw[literal.start..literal.end].char_indices() {
                        if ch != separator {
                            continue;
                        }
                        let at = literal.start + offset;
                        if at > segment_start {
                            items.push(FormatItem::Literal(LiteralText::text(segment_start, at)));
                        }
                        parts.push(self.part(part_start, at, std::mem::take(&mut items)));
                        segment_start = at + separator.len_utf8();
                        part_start = segment_start;
                    }
                    if segment_start < literal.end {
                        items.push(FormatItem::Literal(LiteralText::text(
                            segment_start,
                            literal.end,
                        )));
                    }
                }
                other => items.push(other.clone()),
            }
        }

        parts.push(self.part(part_start, self.end, items));
        parts
    }

    fn part(&self, start: usize, end: usize, items: Vec<FormatItem>) -> Format {
        Format {
            raw: Arc::clone(&self.raw),
            syntax: Arc::clone(&self.syntax),
            start,
            end,
            depth: self.depth,
            items,
            parse_errors: Vec::new(),
        }
    }
}

impl fmt::Display for Format {
    /// Reconstructs the template text: literal text as written, escapes included,
    /// and each placeholder from its parsed components.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut cursor = self.start;
        for placeholder in self.placeholders() {
            f.write_str(&self.raw[cursor..placeholder.start])?;
            write!(f, "{}", placeholder)?;
            cursor = placeholder.end;
        }
        f.write_str(&self.raw[cursor..self.end])
    }
}

impl LiteralText {
    pub(crate) fn text(start: usize, end: usize) -> Self {
        LiteralText {
            start,
            end,
            kind: LiteralKind::Text,
        }
    }

    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> usize {
        self.end
    }

    #[must_use]
    pub fn kind(&self) -> &LiteralKind {
        &self.kind
    }

    /// Returns the template text this literal was parsed from.
    #[must_use]
    pub fn raw_text<'a>(&self, template: &'a str) -> &'a str {
        &template[self.start..self.end]
    }

    /// Returns the text this literal renders as.
    #[must_use]
    pub fn text_in<'a>(&'a self, template: &'a str, convert_char_literals: bool) -> Cow<'a, str> {
        match &self.kind {
            LiteralKind::Text => Cow::Borrowed(self.raw_text(template)),
            LiteralKind::CharLiteral if convert_char_literals => {
                unescape_char_literals(self.raw_text(template), false)
            }
            LiteralKind::CharLiteral => Cow::Borrowed(self.raw_text(template)),
            LiteralKind::Diagnostic(message) => Cow::Borrowed(message),
        }
    }
}

impl Placeholder {
    /// Returns the exact template text of this placeholder, braces included.
    #[must_use]
    pub fn raw_text(&self) -> &str {
        &self.raw[self.start..self.end]
    }

    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Returns the nesting depth, starting at 1 for a top-level placeholder.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns the selectors; never empty.
    #[must_use]
    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }

    /// Returns the alignment: 0 for none, negative to left-align, positive to right-align.
    #[must_use]
    pub fn alignment(&self) -> i32 {
        self.alignment
    }

    /// Returns the formatter name, empty when the placeholder names none.
    #[must_use]
    pub fn formatter_name(&self) -> &str {
        &self.raw[self.formatter_name.0..self.formatter_name.1]
    }

    /// Returns the formatter options exactly as written.
    #[must_use]
    pub fn formatter_options_raw(&self) -> &str {
        self.formatter_options
            .map_or("", |(start, end)| &self.raw[start..end])
    }

    /// Returns `true` if the placeholder has an options group, even an empty one.
    #[must_use]
    pub fn has_formatter_options(&self) -> bool {
        self.formatter_options.is_some()
    }

    /// Returns the formatter options with escape sequences converted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use smart_format::{FormatItem, Parser, ParserSettings};
    ///
    /// let settings = ParserSettings::default();
    /// let format = Parser::new(&settings).parse(r"{0:choose(a\|b|c):x|y}").unwrap();
    /// let placeholder = format.placeholders().next().unwrap();
    ///
    /// assert_eq!(placeholder.formatter_options_raw(), r"a\|b|c");
    /// assert_eq!(placeholder.formatter_options(), "a|b|c");
    /// ```
    #[must_use]
    pub fn formatter_options(&self) -> Cow<'_, str> {
        unescape_char_literals(self.formatter_options_raw(), true)
    }

    /// Returns the nested format, if the placeholder has one.
    #[must_use]
    pub fn format(&self) -> Option<&Format> {
        self.format.as_ref()
    }
}

impl fmt::Display for Placeholder {
    /// Reconstructs the placeholder text from its parsed components.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let syntax = &self.syntax;
        write!(f, "{}", syntax.placeholder_begin)?;
        for selector in &self.selectors {
            f.write_str(selector.raw_text_with_operator())?;
        }
        if self.alignment != 0 {
            write!(f, "{}{}", syntax.alignment_operator, self.alignment)?;
        }
        if !self.formatter_name().is_empty() {
            write!(
                f,
                "{}{}",
                syntax.formatter_name_separator,
                self.formatter_name()
            )?;
            if self.has_formatter_options() {
                write!(
                    f,
                    "{}{}{}",
                    syntax.formatter_options_begin,
                    self.formatter_options_raw(),
                    syntax.formatter_options_end
                )?;
            }
        }
        if let Some(format) = &self.format {
            write!(f, "{}{}", syntax.formatter_name_separator, format)?;
        }
        write!(f, "{}", syntax.placeholder_end)
    }
}

impl Selector {
    /// Returns the selector text, e.g. `Name` for `{Person.Name}`.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.raw[self.start..self.end]
    }

    /// Returns the selector text including its leading operator, e.g. `.Name`.
    #[must_use]
    pub fn raw_text_with_operator(&self) -> &str {
        &self.raw[self.operator_start..self.end]
    }

    /// Returns the position of this selector within its placeholder.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[cfg(test)]
mod tests {
    use crate::{FormatItem, LiteralKind, Parser, ParserSettings};

    fn parse(template: &str) -> crate::Format {
        Parser::new(&ParserSettings::default())
            .parse(template)
            .unwrap()
    }

    #[test]
    fn test_placeholder_components() {
        let format = parse("{Items.Length,-10:choose(1|2|3):one|two|three}");
        let placeholder = format.placeholders().next().unwrap();

        let selectors: Vec<_> = placeholder.selectors().iter().map(|s| s.text()).collect();
        assert_eq!(selectors, vec!["Items", "Length"]);
        assert_eq!(placeholder.alignment(), -10);
        assert_eq!(placeholder.formatter_name(), "choose");
        assert_eq!(placeholder.formatter_options(), "1|2|3");
        assert_eq!(placeholder.format().unwrap().raw_text(), "one|two|three");
    }

    #[test]
    fn test_display_reconstructs_placeholder() {
        let template = "{Items.Length,-10:choose(1|2|3):one|two|three}";
        let format = parse(template);
        assert_eq!(format.to_string(), template);
    }

    #[test]
    fn test_split_without_separator() {
        let format = parse("just text");
        let parts = format.split('|');
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].raw_text(), "just text");
    }

    #[test]
    fn test_split_keeps_empty_parts() {
        let format = parse("|a||");
        let parts: Vec<_> = format.split('|').iter().map(|p| p.raw_text().to_string()).collect();
        assert_eq!(parts, vec!["", "a", "", ""]);
    }

    #[test]
    fn test_split_skips_char_literals() {
        let settings = ParserSettings::default().with_convert_char_literals(true);
        let format = Parser::new(&settings).parse(r"a\|b|c").unwrap();
        let parts = format.split('|');
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].raw_text(), r"a\|b");
        assert!(parts[0]
            .items()
            .iter()
            .any(|item| matches!(item, FormatItem::Literal(l) if *l.kind() == LiteralKind::CharLiteral)));
    }

    #[test]
    fn test_is_literal() {
        assert!(parse("abc").is_literal());
        assert!(!parse("a{b}c").is_literal());
    }
}
