//! # smart_format
//!
//! A string templating engine with nested placeholders, alignment, escaping and
//! pluggable value sources and formatters.
//!
//! ## Template syntax
//!
//! A template is literal text with placeholders in braces:
//!
//! ```text
//! {Selector.Selector,Alignment:FormatterName(Options):Nested format}
//! ```
//!
//! - Selectors name a path into the data: `{0}`, `{Name}`, `{Address.City}`
//! - Alignment pads the result: `{Name,10}` right-justifies, `{Name,-10}` left-justifies
//! - The formatter name and options pick a formatter: `{Kind:choose(a|b):A|B}`
//! - The nested format is rendered with the selected value as its scope
//!
//! `{{` and `}}` write literal braces. See [`syntax`] for the complete grammar.
//!
//! ## Quick Start
//!
//! ```rust
//! use smart_format::{format, value};
//!
//! let data = value!({
//!     "Name": "Alice",
//!     "Pets": ["Rex", "Tom", "Max"],
//!     "Messages": 1
//! });
//!
//! let text = format(
//!     "{Name} has {Pets:{}|, | and } and {Messages:one message|{} messages}.",
//!     &[data],
//! )
//! .unwrap();
//! assert_eq!(text, "Alice has Rex, Tom and Max and one message.");
//! ```
//!
//! ### Formatting Rust types
//!
//! Anything that implements `Serialize` can be rendered:
//!
//! ```rust
//! use serde::Serialize;
//! use smart_format::format_data;
//!
//! #[derive(Serialize)]
//! struct Order {
//!     id: u32,
//!     items: Vec<String>,
//! }
//!
//! let order = Order { id: 7, items: vec!["tea".into(), "cake".into()] };
//! let text = format_data("Order #{id,-4}| {items.Count} items", &order).unwrap();
//! assert_eq!(text, "Order #7   | 2 items");
//! ```
//!
//! ### Reusing an engine
//!
//! The convenience functions build a fresh [`SmartFormatter`] per call. Long-lived
//! code should build one, optionally share a [`FormatCache`], and render with it:
//!
//! ```rust
//! use std::sync::Arc;
//! use smart_format::{value, FormatCache, SmartFormatter};
//!
//! let cache = Arc::new(FormatCache::new());
//! let formatter = SmartFormatter::with_default_extensions().with_cache(cache.clone());
//!
//! for n in 1..=3 {
//!     formatter.format("{0} item{0:|s}", &[value!(n)]).unwrap();
//! }
//! assert_eq!(cache.len(), 1);
//! ```
//!
//! ## Extending
//!
//! Implement [`Source`] to resolve selectors against your own values and
//! [`Formatter`] to write values your own way, then register them with
//! [`SmartFormatter::add_source`] and [`SmartFormatter::add_formatter`].
//!
//! ## Failures
//!
//! Parsing and rendering failures are handled by [`ErrorAction`] policies in
//! [`Settings`]: return the error, write the error message, write nothing, or keep
//! the placeholder text as written.

mod cache;
mod error;
pub mod escape;
mod extension;
mod format;
mod formatter;
pub mod formatters;
mod macros;
mod map;
mod parser;
mod ser;
mod settings;
pub mod sources;
pub mod syntax;
mod value;

pub use cache::FormatCache;
pub use error::{Error, Result};
pub use extension::{Formatter, FormattingInfo, SelectorInfo, Source};
pub use format::{Format, FormatItem, LiteralKind, LiteralText, ParseIssue, Placeholder, Selector};
pub use formatter::{FormatDetails, FormattingFailure, Rendered, SmartFormatter};
pub use formatters::{ChooseFormatter, ConditionalFormatter, DefaultFormatter, ListFormatter};
pub use map::ValueMap;
pub use parser::Parser;
pub use ser::{to_value, ValueSerializer};
pub use settings::{CaseSensitivity, ErrorAction, ParserSettings, Settings};
pub use sources::{DefaultSource, MemberSource};
pub use value::{Number, Value};

use serde::Serialize;

/// Renders `template` against `args` with the built-in extensions.
///
/// # Examples
///
/// ```rust
/// use smart_format::{format, value};
///
/// let text = format("{0,-6}|{1,6}", &[value!("left"), value!("right")]).unwrap();
/// assert_eq!(text, "left  | right");
/// ```
///
/// # Errors
///
/// Returns an error if the template does not parse or a placeholder fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn format(template: &str, args: &[Value]) -> Result<String> {
    SmartFormatter::with_default_extensions().format(template, args)
}

/// Renders `template` against `args` with the built-in extensions and `settings`.
///
/// # Errors
///
/// Returns an error if the template does not parse, or a placeholder fails and
/// the format error action is [`ErrorAction::ThrowError`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn format_with_settings(template: &str, args: &[Value], settings: Settings) -> Result<String> {
    let mut formatter = SmartFormatter::with_default_extensions();
    *formatter.settings_mut() = settings;
    formatter.format(template, args)
}

/// Renders `template` with any `T: Serialize` as the only argument.
///
/// # Examples
///
/// ```rust
/// use std::collections::BTreeMap;
/// use smart_format::format_data;
///
/// let mut scores = BTreeMap::new();
/// scores.insert("ann", 3);
/// scores.insert("bob", 5);
///
/// assert_eq!(format_data("{ann}:{bob}", &scores).unwrap(), "3:5");
/// ```
///
/// # Errors
///
/// Returns an error if `data` cannot be converted to a [`Value`], or as
/// [`format`] does.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn format_data<T>(template: &str, data: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let value = to_value(data)?;
    format(template, std::slice::from_ref(&value))
}
