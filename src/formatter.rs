//! The render engine.
//!
//! [`SmartFormatter`] owns the settings and the ordered source and formatter lists.
//! Rendering walks the parsed [`Format`] depth first: literal text is copied, and
//! each placeholder is resolved through the sources and written by the first
//! formatter that accepts it.
//!
//! ## Scopes
//!
//! The root scope is the first argument. When a formatter renders a nested format
//! with [`FormattingInfo::format_nested`], the value it passes becomes a new
//! innermost scope. The first selector of a placeholder is tried against the
//! innermost scope, then against each enclosing one:
//!
//! ```rust
//! use smart_format::{format, value};
//!
//! let data = value!({
//!     "Person": {"FirstName": "John"},
//!     "Address": {"City": "London"}
//! });
//!
//! let text = format("{Person:{Address:{City}, {FirstName}}}", &[data]).unwrap();
//! assert_eq!(text, "London, John");
//! ```
//!
//! ## Failures
//!
//! A placeholder fails when no source resolves a selector or no formatter accepts
//! the value. [`Settings::format_error_action`] decides what is written instead, and
//! every failure is reported in [`Rendered::failures`].

use std::borrow::Cow;
use std::fmt;
use std::io;
use std::sync::{Arc, OnceLock};

use crate::cache::FormatCache;
use crate::extension::{Formatter, FormattingInfo, SelectorInfo, Source};
use crate::format::{Format, FormatItem, Placeholder};
use crate::formatters::{ChooseFormatter, ConditionalFormatter, DefaultFormatter, ListFormatter};
use crate::parser::Parser;
use crate::settings::{ErrorAction, ParserSettings, Settings};
use crate::sources::{DefaultSource, MemberSource};
use crate::{Error, Result, Value};

static NULL: Value = Value::Null;

/// Renders templates against data.
///
/// # Examples
///
/// ```rust
/// use smart_format::{value, ErrorAction, SmartFormatter};
///
/// let mut formatter = SmartFormatter::with_default_extensions();
/// formatter.settings_mut().format_error_action = ErrorAction::Ignore;
///
/// let rendered = formatter
///     .format_detailed("{Name}{Missing}", &[value!({"Name": "Ann"})])
///     .unwrap();
///
/// assert_eq!(rendered.output, "Ann");
/// assert_eq!(rendered.failures.len(), 1);
/// ```
pub struct SmartFormatter {
    settings: Settings,
    sources: Vec<Box<dyn Source>>,
    formatters: Vec<Box<dyn Formatter>>,
    cache: Option<Arc<FormatCache>>,
    effective_parser: OnceLock<Arc<ParserSettings>>,
}

/// The output of a render call together with the failures that were suppressed.
#[derive(Clone, Debug, PartialEq)]
pub struct Rendered {
    pub output: String,
    pub failures: Vec<FormattingFailure>,
}

/// One placeholder that failed during rendering.
#[derive(Clone, Debug, PartialEq)]
pub struct FormattingFailure {
    /// The placeholder text as written in the template, e.g. `{Name}`.
    pub placeholder: String,
    /// Byte offset of the placeholder in its template.
    pub position: usize,
    pub message: String,
}

impl Default for SmartFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SmartFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.formatters.iter().map(|f| f.names()).collect();
        f.debug_struct("SmartFormatter")
            .field("settings", &self.settings)
            .field("sources", &self.sources.len())
            .field("formatters", &names)
            .field("cache", &self.cache.is_some())
            .finish()
    }
}

impl SmartFormatter {
    /// Creates a formatter with default settings and no extensions.
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    #[must_use]
    pub fn with_settings(settings: Settings) -> Self {
        SmartFormatter {
            settings,
            sources: Vec::new(),
            formatters: Vec::new(),
            cache: None,
            effective_parser: OnceLock::new(),
        }
    }

    /// Creates a formatter with default settings and the built-in extensions:
    /// [`DefaultSource`] and [`MemberSource`], then [`ListFormatter`],
    /// [`ConditionalFormatter`], [`ChooseFormatter`] and [`DefaultFormatter`].
    #[must_use]
    pub fn with_default_extensions() -> Self {
        let mut formatter = Self::new();
        formatter
            .add_source(DefaultSource)
            .add_source(MemberSource)
            .add_formatter(ListFormatter)
            .add_formatter(ConditionalFormatter)
            .add_formatter(ChooseFormatter)
            .add_formatter(DefaultFormatter);
        formatter
    }

    /// Appends a source; sources are tried in the order they were added.
    pub fn add_source<S: Source + 'static>(&mut self, source: S) -> &mut Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Appends a formatter; formatters are tried in the order they were added.
    pub fn add_formatter<F: Formatter + 'static>(&mut self, formatter: F) -> &mut Self {
        self.formatters.push(Box::new(formatter));
        self.effective_parser = OnceLock::new();
        self
    }

    /// Routes all parsing through `cache`.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<FormatCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        self.effective_parser = OnceLock::new();
        &mut self.settings
    }

    #[must_use]
    pub fn cache(&self) -> Option<&Arc<FormatCache>> {
        self.cache.as_ref()
    }

    /// Returns the parser settings templates are parsed with: the configured ones,
    /// restricted to the names of the registered formatters.
    ///
    /// Computed once and kept until the settings or the formatter list change.
    #[must_use]
    pub fn parser_settings(&self) -> Arc<ParserSettings> {
        let effective = self.effective_parser.get_or_init(|| {
            let mut parser = self.settings.parser.clone();
            if parser.formatter_names.is_none() {
                let names = self
                    .formatters
                    .iter()
                    .flat_map(|f| f.names().iter())
                    .filter(|name| !name.is_empty())
                    .map(|name| (*name).to_string());
                parser.formatter_names = Some(names.collect());
            }
            Arc::new(parser)
        });
        Arc::clone(effective)
    }

    /// Parses `template`, through the cache when one is configured.
    ///
    /// # Errors
    ///
    /// See [`Parser::parse`].
    pub fn parse(&self, template: &str) -> Result<Arc<Format>> {
        let parser_settings = self.parser_settings();
        match &self.cache {
            Some(cache) => cache.get_or_parse(template, &parser_settings),
            None => Ok(Arc::new(Parser::from_shared(parser_settings).parse(template)?)),
        }
    }

    /// Renders `template` against `args`.
    ///
    /// The first argument is the root scope; `{0}`, `{1}`, … select arguments by
    /// position.
    ///
    /// # Errors
    ///
    /// Returns a parse error, the first failure when the format error action is
    /// [`ErrorAction::ThrowError`], or [`Error::NestingTooDeep`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use smart_format::{value, SmartFormatter};
    ///
    /// let formatter = SmartFormatter::with_default_extensions();
    /// let text = formatter
    ///     .format("{0} has {1.Count} items", &[value!("Cart"), value!([1, 2, 3])])
    ///     .unwrap();
    /// assert_eq!(text, "Cart has 3 items");
    /// ```
    pub fn format(&self, template: &str, args: &[Value]) -> Result<String> {
        Ok(self.format_detailed(template, args)?.output)
    }

    /// Renders `template` and also returns the suppressed failures.
    ///
    /// # Errors
    ///
    /// See [`SmartFormatter::format`].
    pub fn format_detailed(&self, template: &str, args: &[Value]) -> Result<Rendered> {
        let format = self.parse(template)?;
        self.format_parsed(&format, args)
    }

    /// Renders an already parsed format.
    ///
    /// # Errors
    ///
    /// See [`SmartFormatter::format`].
    pub fn format_parsed(&self, format: &Format, args: &[Value]) -> Result<Rendered> {
        let mut details = FormatDetails::new(self, format, args);
        let root = Scope {
            value: args.first().unwrap_or(&NULL),
            parent: None,
        };
        let mut output = String::with_capacity(format.raw_text().len());
        details.render_format(format, &root, &mut output)?;
        Ok(Rendered {
            output,
            failures: details.failures,
        })
    }

    /// Renders `template` into `out`, returning the suppressed failures.
    ///
    /// Nothing is written when the render fails.
    ///
    /// # Errors
    ///
    /// See [`SmartFormatter::format`]; a failing `out` is returned as [`Error::Io`].
    pub fn format_into<W: fmt::Write + ?Sized>(
        &self,
        out: &mut W,
        template: &str,
        args: &[Value],
    ) -> Result<Vec<FormattingFailure>> {
        let rendered = self.format_detailed(template, args)?;
        out.write_str(&rendered.output)
            .map_err(|e| Error::io(&e.to_string()))?;
        Ok(rendered.failures)
    }

    /// Renders `template` into an `io::Write` sink.
    ///
    /// # Errors
    ///
    /// See [`SmartFormatter::format`]; I/O failures are returned as [`Error::Io`].
    pub fn format_to_writer<W: io::Write>(
        &self,
        mut writer: W,
        template: &str,
        args: &[Value],
    ) -> Result<()> {
        let output = self.format(template, args)?;
        writer
            .write_all(output.as_bytes())
            .map_err(|e| Error::io(&e.to_string()))
    }
}

/// One level of the scope chain.
#[derive(Clone, Copy)]
pub(crate) struct Scope<'s> {
    pub(crate) value: &'s Value,
    pub(crate) parent: Option<&'s Scope<'s>>,
}

/// Per-call render state.
///
/// Created for every render call; extensions see it through
/// [`FormattingInfo::details`].
///
/// # Examples
///
/// ```rust
/// use smart_format::{value, FormatDetails, SmartFormatter};
///
/// let formatter = SmartFormatter::new();
/// let format = formatter.parse("{Greeting}").unwrap();
/// let args = [value!({"Greeting": "Hello"})];
///
/// let details = FormatDetails::new(&formatter, &format, &args);
/// assert_eq!(details.original_args(), &args);
/// assert_eq!(details.original_format().raw_text(), "{Greeting}");
/// assert!(details.cache().is_none());
/// ```
pub struct FormatDetails<'d> {
    formatter: &'d SmartFormatter,
    original_format: &'d Format,
    original_args: &'d [Value],
    failures: Vec<FormattingFailure>,
    depth: usize,
    aborting: bool,
}

impl<'d> FormatDetails<'d> {
    #[must_use]
    pub fn new(formatter: &'d SmartFormatter, format: &'d Format, args: &'d [Value]) -> Self {
        FormatDetails {
            formatter,
            original_format: format,
            original_args: args,
            failures: Vec::new(),
            depth: 0,
            aborting: false,
        }
    }

    #[must_use]
    pub fn formatter(&self) -> &'d SmartFormatter {
        self.formatter
    }

    #[must_use]
    pub fn original_format(&self) -> &'d Format {
        self.original_format
    }

    #[must_use]
    pub fn original_args(&self) -> &'d [Value] {
        self.original_args
    }

    #[must_use]
    pub fn settings(&self) -> &'d Settings {
        &self.formatter.settings
    }

    #[must_use]
    pub fn cache(&self) -> Option<&'d FormatCache> {
        self.formatter.cache.as_deref()
    }

    /// Returns the failures recorded so far in this render call.
    #[must_use]
    pub fn failures(&self) -> &[FormattingFailure] {
        &self.failures
    }

    pub(crate) fn render_format(
        &mut self,
        format: &Format,
        scope: &Scope<'_>,
        out: &mut String,
    ) -> Result<()> {
        let convert = format.syntax().convert_char_literals;
        for item in format.items() {
            match item {
                FormatItem::Literal(literal) => {
                    out.push_str(&literal.text_in(format.template(), convert));
                }
                FormatItem::Placeholder(placeholder) => {
                    self.render_placeholder(placeholder, scope, out)?;
                }
            }
        }
        Ok(())
    }

    pub(crate) fn render_nested(
        &mut self,
        format: &Format,
        scope: &Scope<'_>,
        owner: &Placeholder,
        out: &mut String,
    ) -> Result<()> {
        let max = self.settings().parser.max_nesting_depth;
        if self.depth >= max {
            self.aborting = true;
            return Err(Error::nesting_too_deep(owner.start(), max));
        }
        self.depth += 1;
        let result = self.render_format(format, scope, out);
        self.depth -= 1;
        result
    }

    fn render_placeholder(
        &mut self,
        placeholder: &Placeholder,
        scope: &Scope<'_>,
        out: &mut String,
    ) -> Result<()> {
        let mut buffer = String::new();
        let result = self
            .resolve(placeholder, scope)
            .and_then(|value| self.dispatch(placeholder, &value, scope, &mut buffer));

        match result {
            Ok(()) => {
                out.push_str(&align(buffer, placeholder.alignment()));
                Ok(())
            }
            Err(err) => self.handle_failure(placeholder, err, out),
        }
    }

    fn handle_failure(&mut self, placeholder: &Placeholder, err: Error, out: &mut String) -> Result<()> {
        if self.aborting || !err.is_recoverable() {
            self.aborting = true;
            return Err(err);
        }

        let message = err.to_string();
        log::debug!(
            "placeholder {} at {} failed: {}",
            placeholder.raw_text(),
            placeholder.start(),
            message
        );
        self.failures.push(FormattingFailure {
            placeholder: placeholder.raw_text().to_string(),
            position: placeholder.start(),
            message: message.clone(),
        });

        match self.settings().format_error_action {
            ErrorAction::ThrowError => {
                self.aborting = true;
                Err(err)
            }
            ErrorAction::OutputErrorInResult => {
                out.push_str(&message);
                Ok(())
            }
            ErrorAction::Ignore => Ok(()),
            ErrorAction::MaintainTokens => {
                out.push_str(placeholder.raw_text());
                Ok(())
            }
        }
    }

    /// Resolves the placeholder's selectors: the first against the scope chain from
    /// the innermost scope outward, the rest against the previous result.
    fn resolve<'v>(&self, placeholder: &Placeholder, scope: &Scope<'v>) -> Result<Cow<'v, Value>>
    where
        'd: 'v,
    {
        let selectors = placeholder.selectors();
        let Some(first) = selectors.first() else {
            return Ok(Cow::Borrowed(scope.value));
        };
        if selectors.len() == 1 && first.is_empty() {
            return Ok(Cow::Borrowed(scope.value));
        }

        let unresolved = |text: &str| Error::resolution(placeholder.raw_text(), text);

        let mut level = Some(scope);
        let mut current = None;
        while let Some(s) = level {
            if let Some(value) = self.try_sources(s.value, first.text(), 0, s.parent.is_none()) {
                current = Some(value);
                break;
            }
            level = s.parent;
        }
        let mut current = current.ok_or_else(|| unresolved(first.text()))?;

        for selector in &selectors[1..] {
            let text = selector.text();
            current = match current {
                Cow::Borrowed(value) => self
                    .try_sources(value, text, selector.index(), false)
                    .ok_or_else(|| unresolved(text))?,
                Cow::Owned(value) => Cow::Owned(
                    self.try_sources(&value, text, selector.index(), false)
                        .ok_or_else(|| unresolved(text))?
                        .into_owned(),
                ),
            };
        }
        Ok(current)
    }

    fn try_sources<'v>(
        &self,
        value: &'v Value,
        text: &str,
        index: usize,
        at_root: bool,
    ) -> Option<Cow<'v, Value>>
    where
        'd: 'v,
    {
        let info = SelectorInfo {
            text,
            index,
            at_root,
            args: self.original_args,
            case_sensitivity: self.settings().case_sensitivity,
        };
        self.formatter.sources.iter().find_map(|source| {
            log::trace!("resolving selector {:?}", text);
            source.try_resolve(value, &info)
        })
    }

    fn dispatch(
        &mut self,
        placeholder: &Placeholder,
        value: &Value,
        scope: &Scope<'_>,
        out: &mut String,
    ) -> Result<()> {
        let engine = self.formatter;
        let name = placeholder.formatter_name();
        let case_sensitivity = engine.settings.case_sensitivity;

        for formatter in &engine.formatters {
            let accepts = if name.is_empty() {
                formatter.names().contains(&"")
            } else {
                formatter
                    .names()
                    .iter()
                    .any(|n| !n.is_empty() && case_sensitivity.matches(n, name))
            };
            if !accepts {
                continue;
            }

            log::trace!("trying formatter {:?} for {}", formatter.names(), placeholder.raw_text());
            let written = out.len();
            let recorded = self.failures.len();
            let aborting = self.aborting;
            let mut info = FormattingInfo {
                details: &mut *self,
                scope,
                value,
                placeholder,
                out: &mut *out,
            };
            if formatter.try_format(&mut info)? {
                return Ok(());
            }
            out.truncate(written);
            self.failures.truncate(recorded);
            self.aborting = aborting;
        }

        let message = if name.is_empty() {
            "No formatter could handle the value".to_string()
        } else {
            format!("No formatter named \"{}\" could handle the value", name)
        };
        Err(Error::formatting(placeholder.raw_text(), &message))
    }
}

/// Pads `text` with spaces to `|alignment|` characters: left-justified for negative
/// alignment, right-justified for positive.
fn align(text: String, alignment: i32) -> String {
    let width = alignment.unsigned_abs() as usize;
    if alignment == 0 || text.chars().count() >= width {
        text
    } else {
        let padding = " ".repeat(width - text.chars().count());
        if alignment < 0 {
            text + &padding
        } else {
            padding + &text
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value;

    #[test]
    fn test_align() {
        assert_eq!(align("ab".to_string(), 0), "ab");
        assert_eq!(align("ab".to_string(), 4), "  ab");
        assert_eq!(align("ab".to_string(), -4), "ab  ");
        assert_eq!(align("abcdef".to_string(), -4), "abcdef");
        assert_eq!(align("é".to_string(), 3), "  é");

        let wide = align("x".to_string(), -70_000);
        assert_eq!(wide.len(), 70_000);
        assert!(wide.starts_with('x'));
    }

    #[test]
    fn test_no_args_is_null_root() {
        let formatter = SmartFormatter::with_default_extensions();
        assert_eq!(formatter.format("[{}]", &[]).unwrap(), "[]");
    }

    #[test]
    fn test_empty_formatter_fails() {
        let formatter = SmartFormatter::new();
        let err = formatter.format("{0}", &[value!(1)]).unwrap_err();
        assert!(matches!(err, Error::Resolution { .. }));
    }

    #[test]
    fn test_parser_settings_list_registered_names() {
        let formatter = SmartFormatter::with_default_extensions();
        let names = formatter.parser_settings().formatter_names.clone().unwrap();
        assert!(names.contains(&"choose".to_string()));
        assert!(!names.iter().any(String::is_empty));
    }

    #[test]
    fn test_parser_settings_are_shared_until_changed() {
        let mut formatter = SmartFormatter::with_default_extensions();
        let first = formatter.parser_settings();
        assert!(Arc::ptr_eq(&first, &formatter.parser_settings()));

        formatter.settings_mut().parser.max_alignment = 10;
        let changed = formatter.parser_settings();
        assert!(!Arc::ptr_eq(&first, &changed));
        assert_eq!(changed.max_alignment, 10);
        assert!(formatter.format("{0,11}", &[value!(1)]).is_err());
    }

    #[test]
    fn test_debug_lists_formatter_names() {
        let formatter = SmartFormatter::with_default_extensions();
        let debug = format!("{:?}", formatter);
        assert!(debug.contains("\"cond\""));
    }

    #[test]
    fn test_thrown_failure_is_recorded_once() {
        let formatter = SmartFormatter::with_default_extensions();
        let format = formatter.parse("{a:{b}}").unwrap();
        let args = [value!({"a": {"c": 1}})];
        let mut details = FormatDetails::new(&formatter, &format, &args);
        let root = Scope {
            value: &args[0],
            parent: None,
        };
        let mut out = String::new();
        assert!(details.render_format(&format, &root, &mut out).is_err());
        assert_eq!(details.failures().len(), 1);
        assert_eq!(details.failures()[0].placeholder, "{b}");
    }
}
