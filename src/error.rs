//! Error types for parsing and rendering templates.
//!
//! This module provides the single [`Error`] type returned by every fallible
//! operation in the crate, together with the [`Result`] alias.
//!
//! ## Error Categories
//!
//! - **Parsing Errors**: Malformed templates (unmatched braces, invalid alignment,
//!   truncated input) with the byte position and a caret under the offending character
//! - **Resolution Errors**: No source could resolve a selector
//! - **Formatting Errors**: No formatter handled a resolved value
//! - **Nesting Errors**: The template nests deeper than the configured maximum
//!
//! Whether a parsing, resolution or formatting error is returned to the caller at all
//! depends on the configured [`ErrorAction`](crate::ErrorAction). Nesting errors are
//! always returned.
//!
//! ## Examples
//!
//! ```rust
//! use smart_format::{format, value, Error};
//!
//! let result = format("{Name", &[value!({"Name": "Alice"})]);
//! assert!(matches!(result, Err(Error::Parsing { .. })));
//!
//! if let Err(err) = result {
//!     eprintln!("{}", err);
//!     // Parse error at position 5: ...
//! }
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all possible errors that can occur while parsing or rendering a template.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Malformed template text
    #[error("Parse error at position {position}: {message}{context}")]
    Parsing {
        position: usize,
        message: String,
        context: String,
    },

    /// The template nests deeper than `max_nesting_depth`
    #[error("Nesting depth exceeds the maximum of {max} at position {position}")]
    NestingTooDeep { position: usize, max: usize },

    /// No source resolved a selector
    #[error("Could not evaluate the selector \"{selector}\" of placeholder {placeholder}")]
    Resolution {
        placeholder: String,
        selector: String,
    },

    /// No formatter handled a value
    #[error("Could not format placeholder {placeholder}: {message}")]
    Formatting { placeholder: String, message: String },

    /// Unsupported type for value conversion
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// IO error while writing output
    #[error("IO error: {0}")]
    Io(String),

    /// Error raised by a source or formatter
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Creates a parsing error, rendering `template` below the message with a caret
    /// under `position`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use smart_format::Error;
    ///
    /// let err = Error::parsing("{a,x}", 3, "Invalid alignment");
    /// assert!(err.to_string().contains("position 3"));
    /// assert!(err.to_string().contains("   ^"));
    /// ```
    pub fn parsing(template: &str, position: usize, message: &str) -> Self {
        Error::Parsing {
            position,
            message: message.to_string(),
            context: caret_context(template, position),
        }
    }

    /// Creates a nesting error.
    pub fn nesting_too_deep(position: usize, max: usize) -> Self {
        Error::NestingTooDeep { position, max }
    }

    /// Creates a resolution error for `selector` within the placeholder text.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use smart_format::Error;
    ///
    /// let err = Error::resolution("{Person.Age}", "Age");
    /// assert!(err.to_string().contains("\"Age\""));
    /// ```
    pub fn resolution(placeholder: &str, selector: &str) -> Self {
        Error::Resolution {
            placeholder: placeholder.to_string(),
            selector: selector.to_string(),
        }
    }

    /// Creates a formatting error for the placeholder text.
    pub fn formatting(placeholder: &str, message: &str) -> Self {
        Error::Formatting {
            placeholder: placeholder.to_string(),
            message: message.to_string(),
        }
    }

    /// Creates an unsupported type error.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates an I/O error.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// Sources and formatters use this to report their own failures. The message is
    /// displayed verbatim.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use smart_format::Error;
    ///
    /// let err = Error::custom("ERROR!");
    /// assert_eq!(err.to_string(), "ERROR!");
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Returns the byte position this error points at, when it has one.
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        match self {
            Error::Parsing { position, .. } | Error::NestingTooDeep { position, .. } => {
                Some(*position)
            }
            _ => None,
        }
    }

    /// Returns `false` for errors that no [`ErrorAction`](crate::ErrorAction) may suppress.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::NestingTooDeep { .. })
    }
}

fn caret_context(template: &str, position: usize) -> String {
    let line_start = template[..position.min(template.len())]
        .rfind('\n')
        .map_or(0, |i| i + 1);
    let line_end = template[line_start..]
        .find('\n')
        .map_or(template.len(), |i| line_start + i);
    let column = template[line_start..position.min(template.len())]
        .chars()
        .count();
    format!(
        "\n{}\n{}^",
        &template[line_start..line_end],
        " ".repeat(column)
    )
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caret_points_at_position() {
        let err = Error::parsing("abc {d,x}", 7, "Invalid alignment");
        assert_eq!(
            err.to_string(),
            "Parse error at position 7: Invalid alignment\nabc {d,x}\n       ^"
        );
    }

    #[test]
    fn test_caret_on_later_line() {
        let err = Error::parsing("first\nse}cond", 8, "Unmatched closing brace");
        assert!(err.to_string().ends_with("\nse}cond\n  ^"));
    }

    #[test]
    fn test_caret_at_end_of_input() {
        let err = Error::parsing("{a", 2, "Unexpected end of input");
        assert!(err.to_string().ends_with("{a\n  ^"));
        assert_eq!(err.position(), Some(2));
    }

    #[test]
    fn test_recoverable() {
        assert!(Error::custom("x").is_recoverable());
        assert!(Error::resolution("{a}", "a").is_recoverable());
        assert!(!Error::nesting_too_deep(0, 4).is_recoverable());
    }
}
