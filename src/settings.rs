//! Configuration for parsing and rendering.
//!
//! This module provides types to customize template syntax and failure handling:
//!
//! - [`Settings`]: Main configuration struct held by a [`SmartFormatter`](crate::SmartFormatter)
//! - [`ParserSettings`]: The parse-relevant subset (delimiters, escaping, depth limit)
//! - [`ErrorAction`]: What to do when parsing or formatting fails
//! - [`CaseSensitivity`]: How selectors, formatter names and choices are matched
//!
//! `ParserSettings` is also the cache key discriminator of the
//! [`FormatCache`](crate::FormatCache): two templates are only shared when they were
//! parsed with equal parser settings.
//!
//! ## Examples
//!
//! ```rust
//! use smart_format::{CaseSensitivity, ErrorAction, ParserSettings, Settings};
//!
//! let settings = Settings::new()
//!     .with_case_sensitivity(CaseSensitivity::CaseInsensitive)
//!     .with_format_error_action(ErrorAction::MaintainTokens)
//!     .with_parser(ParserSettings::new().with_alternative_escape_char('\\'));
//!
//! assert_eq!(settings.parser.alternative_escape_char, Some('\\'));
//! ```

/// Policy applied when parsing or formatting fails.
///
/// # Examples
///
/// ```rust
/// use smart_format::{format_with_settings, value, ErrorAction, Settings};
///
/// let settings = Settings::new().with_format_error_action(ErrorAction::MaintainTokens);
/// let output = format_with_settings("Hi {Missing}!", &[value!({})], settings).unwrap();
/// assert_eq!(output, "Hi {Missing}!");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ErrorAction {
    /// Return the error and abort the call.
    #[default]
    ThrowError,
    /// Write the error message in place of the failing item and continue.
    OutputErrorInResult,
    /// Write nothing for the failing item and continue.
    Ignore,
    /// Write the failing item's original text unchanged and continue.
    MaintainTokens,
}

/// How selector text, formatter names and `choose` options are compared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum CaseSensitivity {
    #[default]
    CaseSensitive,
    CaseInsensitive,
}

impl CaseSensitivity {
    /// Compares two strings under this sensitivity.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use smart_format::CaseSensitivity;
    ///
    /// assert!(CaseSensitivity::CaseInsensitive.matches("Name", "nAME"));
    /// assert!(!CaseSensitivity::CaseSensitive.matches("Name", "nAME"));
    /// ```
    #[must_use]
    pub fn matches(self, a: &str, b: &str) -> bool {
        match self {
            CaseSensitivity::CaseSensitive => a == b,
            CaseSensitivity::CaseInsensitive => {
                a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
            }
        }
    }
}

/// Parse-relevant configuration: template delimiters, escaping and limits.
///
/// All characters are configurable; the defaults give the syntax
/// `{Selector.Path,-10:name(options):nested format}`.
///
/// # Examples
///
/// ```rust
/// use smart_format::ParserSettings;
///
/// let settings = ParserSettings::new()
///     .with_delimiters('<', '>')
///     .with_max_nesting_depth(8);
///
/// assert_eq!(settings.placeholder_begin, '<');
/// assert_eq!(settings.max_nesting_depth, 8);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParserSettings {
    pub placeholder_begin: char,
    pub placeholder_end: char,
    pub selector_operator: char,
    pub alignment_operator: char,
    pub formatter_name_separator: char,
    pub formatter_options_begin: char,
    pub formatter_options_end: char,
    /// When set, this character before a brace escapes it and brace doubling is disabled.
    pub alternative_escape_char: Option<char>,
    /// Characters accepted in selectors in addition to alphanumerics and `_`.
    pub extra_selector_chars: Vec<char>,
    /// Whether `\n`, `\t`, `\\` and similar sequences in literal text are converted.
    pub convert_char_literals: bool,
    pub parse_error_action: ErrorAction,
    pub max_nesting_depth: usize,
    /// Largest accepted alignment width; wider alignments are parse errors.
    pub max_alignment: u32,
    /// Names accepted as formatter names. `None` accepts any identifier followed by
    /// an options group or a nested format; otherwise other identifiers are read as
    /// the start of the nested format. A [`SmartFormatter`](crate::SmartFormatter)
    /// fills this from its registered formatters.
    pub formatter_names: Option<Vec<String>>,
}

impl Default for ParserSettings {
    fn default() -> Self {
        ParserSettings {
            placeholder_begin: '{',
            placeholder_end: '}',
            selector_operator: '.',
            alignment_operator: ',',
            formatter_name_separator: ':',
            formatter_options_begin: '(',
            formatter_options_end: ')',
            alternative_escape_char: None,
            extra_selector_chars: Vec::new(),
            convert_char_literals: false,
            parse_error_action: ErrorAction::ThrowError,
            max_nesting_depth: 64,
            max_alignment: 4096,
            formatter_names: None,
        }
    }
}

impl ParserSettings {
    /// Creates the default syntax (`{`, `}`, `.`, `,`, `:`, `(`, `)`), brace doubling,
    /// no character-literal conversion, throwing on parse errors, depth limit 64,
    /// alignment limit 4096.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the placeholder begin and end characters.
    #[must_use]
    pub fn with_delimiters(mut self, begin: char, end: char) -> Self {
        self.placeholder_begin = begin;
        self.placeholder_end = end;
        self
    }

    /// Sets the character separating selectors (default `.`).
    #[must_use]
    pub fn with_selector_operator(mut self, operator: char) -> Self {
        self.selector_operator = operator;
        self
    }

    /// Sets the character introducing the alignment (default `,`).
    #[must_use]
    pub fn with_alignment_operator(mut self, operator: char) -> Self {
        self.alignment_operator = operator;
        self
    }

    /// Sets the character introducing the formatter name and nested format (default `:`).
    #[must_use]
    pub fn with_formatter_name_separator(mut self, separator: char) -> Self {
        self.formatter_name_separator = separator;
        self
    }

    /// Sets the characters delimiting formatter options (default `(` and `)`).
    #[must_use]
    pub fn with_formatter_options_delimiters(mut self, begin: char, end: char) -> Self {
        self.formatter_options_begin = begin;
        self.formatter_options_end = end;
        self
    }

    /// Escapes braces with `escape` instead of doubling them.
    ///
    /// With doubling disabled, runs of closing braces are always structural, which
    /// keeps deeply nested templates such as `{a:{b:{c}}}` unambiguous.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use smart_format::ParserSettings;
    ///
    /// let settings = ParserSettings::new().with_alternative_escape_char('\\');
    /// assert_eq!(settings.alternative_escape_char, Some('\\'));
    /// ```
    #[must_use]
    pub fn with_alternative_escape_char(mut self, escape: char) -> Self {
        self.alternative_escape_char = Some(escape);
        self
    }

    /// Accepts additional characters inside selectors, e.g. `-` or a space.
    #[must_use]
    pub fn with_extra_selector_chars(mut self, chars: &str) -> Self {
        self.extra_selector_chars.extend(chars.chars());
        self
    }

    /// Enables conversion of character literals such as `\n` in literal text.
    #[must_use]
    pub fn with_convert_char_literals(mut self, convert: bool) -> Self {
        self.convert_char_literals = convert;
        self
    }

    /// Sets the policy for malformed templates.
    #[must_use]
    pub fn with_parse_error_action(mut self, action: ErrorAction) -> Self {
        self.parse_error_action = action;
        self
    }

    /// Sets the maximum placeholder nesting depth.
    #[must_use]
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    /// Sets the largest accepted alignment width.
    #[must_use]
    pub fn with_max_alignment(mut self, width: u32) -> Self {
        self.max_alignment = width;
        self
    }

    /// Restricts formatter names to `names`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use smart_format::{Parser, ParserSettings};
    ///
    /// let settings = ParserSettings::new().with_formatter_names(["choose"]);
    /// let format = Parser::new(&settings).parse("{0:City: {1}}").unwrap();
    /// let placeholder = format.placeholders().next().unwrap();
    ///
    /// assert_eq!(placeholder.formatter_name(), "");
    /// assert_eq!(placeholder.format().unwrap().raw_text(), "City: {1}");
    /// ```
    #[must_use]
    pub fn with_formatter_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.formatter_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Returns `true` if `name` may be read as a formatter name. Matching ignores
    /// case; the formatter lookup applies the configured case sensitivity.
    pub(crate) fn accepts_formatter_name(&self, name: &str) -> bool {
        self.formatter_names.as_ref().map_or(true, |names| {
            names
                .iter()
                .any(|known| CaseSensitivity::CaseInsensitive.matches(known, name))
        })
    }

    pub(crate) fn is_selector_char(&self, ch: char) -> bool {
        ch.is_alphanumeric() || ch == '_' || self.extra_selector_chars.contains(&ch)
    }

    pub(crate) fn is_brace(&self, ch: char) -> bool {
        ch == self.placeholder_begin || ch == self.placeholder_end
    }
}

/// Configuration held by a [`SmartFormatter`](crate::SmartFormatter).
///
/// # Examples
///
/// ```rust
/// use smart_format::{ErrorAction, Settings};
///
/// let settings = Settings::new();
/// assert_eq!(settings.format_error_action, ErrorAction::ThrowError);
///
/// let settings = Settings::new().with_format_error_action(ErrorAction::Ignore);
/// assert_eq!(settings.format_error_action, ErrorAction::Ignore);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Settings {
    pub parser: ParserSettings,
    pub case_sensitivity: CaseSensitivity,
    pub format_error_action: ErrorAction,
}

impl Settings {
    /// Creates default settings: default syntax, case-sensitive, throwing on errors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the parser settings.
    #[must_use]
    pub fn with_parser(mut self, parser: ParserSettings) -> Self {
        self.parser = parser;
        self
    }

    /// Sets how selectors, formatter names and choices are matched.
    #[must_use]
    pub fn with_case_sensitivity(mut self, case_sensitivity: CaseSensitivity) -> Self {
        self.case_sensitivity = case_sensitivity;
        self
    }

    /// Sets the policy for selectors that cannot be resolved and values no formatter handles.
    #[must_use]
    pub fn with_format_error_action(mut self, action: ErrorAction) -> Self {
        self.format_error_action = action;
        self
    }

    /// Sets the policy for malformed templates.
    #[must_use]
    pub fn with_parse_error_action(mut self, action: ErrorAction) -> Self {
        self.parser.parse_error_action = action;
        self
    }

    /// Enables conversion of character literals such as `\n` in literal text.
    #[must_use]
    pub fn with_convert_char_literals(mut self, convert: bool) -> Self {
        self.parser.convert_char_literals = convert;
        self
    }

    /// Sets the largest accepted alignment width.
    #[must_use]
    pub fn with_max_alignment(mut self, width: u32) -> Self {
        self.parser.max_alignment = width;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_syntax() {
        let settings = ParserSettings::default();
        assert_eq!(settings.placeholder_begin, '{');
        assert_eq!(settings.placeholder_end, '}');
        assert_eq!(settings.selector_operator, '.');
        assert_eq!(settings.alignment_operator, ',');
        assert_eq!(settings.formatter_name_separator, ':');
        assert_eq!(settings.alternative_escape_char, None);
        assert!(!settings.convert_char_literals);
    }

    #[test]
    fn test_selector_chars() {
        let settings = ParserSettings::new().with_extra_selector_chars("-");
        assert!(settings.is_selector_char('a'));
        assert!(settings.is_selector_char('_'));
        assert!(settings.is_selector_char('7'));
        assert!(settings.is_selector_char('-'));
        assert!(!settings.is_selector_char(' '));
        assert!(!ParserSettings::new().is_selector_char('-'));
    }

    #[test]
    fn test_case_insensitive_eq() {
        assert!(CaseSensitivity::CaseInsensitive.matches("CHOOSE", "choose"));
        assert!(CaseSensitivity::CaseSensitive.matches("choose", "choose"));
        assert!(!CaseSensitivity::CaseSensitive.matches("Choose", "choose"));
    }

    #[test]
    fn test_accepts_formatter_name() {
        assert!(ParserSettings::new().accepts_formatter_name("anything"));
        let settings = ParserSettings::new().with_formatter_names(["list", "cond"]);
        assert!(settings.accepts_formatter_name("LIST"));
        assert!(!settings.accepts_formatter_name("City"));
    }

    #[test]
    fn test_parse_error_action_shortcut() {
        let settings = Settings::new().with_parse_error_action(ErrorAction::Ignore);
        assert_eq!(settings.parser.parse_error_action, ErrorAction::Ignore);
    }
}
