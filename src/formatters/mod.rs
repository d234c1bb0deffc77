//! Built-in formatters.
//!
//! | Formatter | Names | Handles |
//! |---|---|---|
//! | [`ListFormatter`] | `list`, `l`, implicit | arrays, one nested render per item |
//! | [`ConditionalFormatter`] | `conditional`, `cond`, implicit | picks a `|` section from the value |
//! | [`ChooseFormatter`] | `choose`, `c` | picks a `|` section by matching options |
//! | [`DefaultFormatter`] | `default`, `d`, implicit | everything else |
//!
//! Implicit formatters take part when a placeholder names no formatter. The list
//! and conditional formatters only claim such placeholders when the nested format
//! has at least two `|` sections, so `{Items:{Name}}` still reaches the default
//! formatter.

mod choose;
mod conditional;
mod default;
mod list;

pub use choose::ChooseFormatter;
pub use conditional::ConditionalFormatter;
pub use default::DefaultFormatter;
pub use list::ListFormatter;

/// Separator of the sections of a nested format, e.g. `one|many`.
pub(crate) const SECTION_SEPARATOR: char = '|';
