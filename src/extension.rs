//! Extension points: sources resolve selectors, formatters write values.
//!
//! A [`SmartFormatter`](crate::SmartFormatter) holds an ordered list of each and
//! tries them in registration order until one claims the work:
//!
//! - A [`Source`] maps the current value and one selector to the next value, or
//!   returns `None` to let the next source try.
//! - A [`Formatter`] writes a resolved value, or returns `Ok(false)` to let the next
//!   formatter try.
//!
//! ## Writing a formatter
//!
//! ```rust
//! use smart_format::{Formatter, FormattingInfo, Result, SmartFormatter, value};
//!
//! struct Shout;
//!
//! impl Formatter for Shout {
//!     fn names(&self) -> &[&'static str] {
//!         &["shout"]
//!     }
//!
//!     fn try_format(&self, info: &mut FormattingInfo<'_, '_>) -> Result<bool> {
//!         let text = info.value().to_string().to_uppercase();
//!         info.write(&text);
//!         Ok(true)
//!     }
//! }
//!
//! let mut formatter = SmartFormatter::with_default_extensions();
//! formatter.add_formatter(Shout);
//!
//! let text = formatter.format("{0:shout()}!", &[value!("hey")]).unwrap();
//! assert_eq!(text, "HEY!");
//! ```

use std::borrow::Cow;
use std::fmt::Write as _;

use crate::format::{Format, Placeholder};
use crate::formatter::{FormatDetails, Scope};
use crate::settings::{CaseSensitivity, Settings};
use crate::{Result, Value};

/// Resolves one selector against the current value.
pub trait Source: Send + Sync {
    /// Returns the value `selector` names within `current`, or `None` if this source
    /// cannot resolve it.
    ///
    /// Borrow from `current` or the original arguments where possible; return
    /// `Cow::Owned` for computed values.
    fn try_resolve<'v>(
        &self,
        current: &'v Value,
        selector: &SelectorInfo<'_, 'v>,
    ) -> Option<Cow<'v, Value>>;
}

/// Writes a resolved value into the output.
pub trait Formatter: Send + Sync {
    /// Names this formatter answers to. Include `""` to take part when a placeholder
    /// names no formatter.
    fn names(&self) -> &[&'static str];

    /// Formats `info.value()`, returning `Ok(false)` to pass to the next formatter.
    ///
    /// Output written and failures recorded by [`FormattingInfo::format_nested`]
    /// before returning `Ok(false)` are discarded.
    ///
    /// # Errors
    ///
    /// An error is a formatting failure of the placeholder and is handled by the
    /// format error action.
    fn try_format(&self, info: &mut FormattingInfo<'_, '_>) -> Result<bool>;
}

/// What a [`Source`] is asked to resolve.
#[derive(Clone, Copy, Debug)]
pub struct SelectorInfo<'s, 'v> {
    pub(crate) text: &'s str,
    pub(crate) index: usize,
    pub(crate) at_root: bool,
    pub(crate) args: &'v [Value],
    pub(crate) case_sensitivity: CaseSensitivity,
}

impl<'s, 'v> SelectorInfo<'s, 'v> {
    /// Returns the selector text, e.g. `Name`.
    #[must_use]
    pub fn text(&self) -> &'s str {
        self.text
    }

    /// Returns the position of the selector within its placeholder.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns `true` when resolving against the root scope, where positional
    /// arguments such as `{1}` are reachable.
    #[must_use]
    pub fn at_root(&self) -> bool {
        self.at_root
    }

    /// Returns all arguments of the render call.
    #[must_use]
    pub fn args(&self) -> &'v [Value] {
        self.args
    }

    #[must_use]
    pub fn case_sensitivity(&self) -> CaseSensitivity {
        self.case_sensitivity
    }

    /// Compares `name` with the selector text under the configured case sensitivity.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.case_sensitivity.matches(name, self.text)
    }
}

/// The state handed to a [`Formatter`]: the value, its placeholder and the output.
pub struct FormattingInfo<'a, 'd> {
    pub(crate) details: &'a mut FormatDetails<'d>,
    pub(crate) scope: &'a Scope<'a>,
    pub(crate) value: &'a Value,
    pub(crate) placeholder: &'a Placeholder,
    pub(crate) out: &'a mut String,
}

impl<'a, 'd> FormattingInfo<'a, 'd> {
    /// Returns the resolved value to format.
    #[must_use]
    pub fn value(&self) -> &'a Value {
        self.value
    }

    #[must_use]
    pub fn placeholder(&self) -> &'a Placeholder {
        self.placeholder
    }

    /// Returns the formatter name the placeholder gave, empty for none.
    #[must_use]
    pub fn formatter_name(&self) -> &'a str {
        self.placeholder.formatter_name()
    }

    /// Returns the formatter options with escape sequences converted.
    #[must_use]
    pub fn formatter_options(&self) -> Cow<'a, str> {
        self.placeholder.formatter_options()
    }

    /// Returns the placeholder's nested format, if any.
    #[must_use]
    pub fn format(&self) -> Option<&'a Format> {
        self.placeholder.format()
    }

    #[must_use]
    pub fn alignment(&self) -> i32 {
        self.placeholder.alignment()
    }

    #[must_use]
    pub fn settings(&self) -> &'d Settings {
        self.details.settings()
    }

    #[must_use]
    pub fn details(&self) -> &FormatDetails<'d> {
        self.details
    }

    /// Writes text to the placeholder's output.
    pub fn write(&mut self, text: &str) {
        self.out.push_str(text);
    }

    /// Writes a value's template text to the placeholder's output.
    pub fn write_value(&mut self, value: &Value) {
        // Writing into a String cannot fail
        let _ = write!(self.out, "{}", value);
    }

    /// Renders `format` with `value` as the innermost scope, writing to the
    /// placeholder's output.
    ///
    /// Placeholders in `format` resolve their first selector against `value`
    /// first, then against each enclosing scope.
    ///
    /// # Errors
    ///
    /// Returns the first failure inside `format` that the format error action does
    /// not suppress, or [`Error::NestingTooDeep`](crate::Error::NestingTooDeep).
    pub fn format_nested(&mut self, format: &Format, value: &Value) -> Result<()> {
        let scope = Scope {
            value,
            parent: Some(self.scope),
        };
        self.details
            .render_nested(format, &scope, self.placeholder, self.out)
    }
}
