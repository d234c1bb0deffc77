use std::fmt::Write as _;

use crate::extension::{Formatter, FormattingInfo};
use crate::format::FormatItem;
use crate::{Error, Result, Value};

/// Writes the value's text, or renders the nested format with the value as scope.
///
/// A date with an all-literal nested format is formatted with that format as a
/// `strftime` pattern (see [`chrono::format::strftime`]).
///
/// # Examples
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use smart_format::{format, value, Value};
///
/// assert_eq!(format("{0}", &[value!(4.5)]).unwrap(), "4.5");
///
/// let date = Value::from(Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap());
/// assert_eq!(format("{0:%d.%m.%Y %H:%M}", &[date]).unwrap(), "17.05.2024 09:30");
///
/// let person = value!({"First": "Ada", "Last": "Lovelace"});
/// assert_eq!(format("{0:{Last}, {First}}", &[person]).unwrap(), "Lovelace, Ada");
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultFormatter;

impl Formatter for DefaultFormatter {
    fn names(&self) -> &[&'static str] {
        &["default", "d", ""]
    }

    fn try_format(&self, info: &mut FormattingInfo<'_, '_>) -> Result<bool> {
        let value = info.value();
        let format = match info.format() {
            Some(format) if !format.items().is_empty() => format,
            _ => {
                info.write_value(value);
                return Ok(true);
            }
        };

        match value {
            Value::Date(date) if format.is_literal() => {
                let convert = format.syntax().convert_char_literals;
                let pattern: String = format
                    .items()
                    .iter()
                    .filter_map(|item| match item {
                        FormatItem::Literal(literal) => {
                            Some(literal.text_in(format.template(), convert))
                        }
                        FormatItem::Placeholder(_) => None,
                    })
                    .collect();

                let mut text = String::new();
                write!(text, "{}", date.format(&pattern)).map_err(|_| {
                    Error::formatting(
                        info.placeholder().raw_text(),
                        &format!("invalid date format \"{}\"", pattern),
                    )
                })?;
                info.write(&text);
            }
            _ => info.format_nested(format, value)?,
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use crate::{format, value, Error};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_scalars() {
        assert_eq!(format("{0}|{1}|{2}", &[value!(true), value!(null), value!("s")]).unwrap(), "true||s");
    }

    #[test]
    fn test_empty_nested_format_writes_value() {
        assert_eq!(format("{0:}", &[value!(12)]).unwrap(), "12");
    }

    #[test]
    fn test_literal_format_on_non_date() {
        assert_eq!(format("{0:ZZZZ}", &[value!(5)]).unwrap(), "ZZZZ");
    }

    #[test]
    fn test_invalid_date_pattern() {
        let date = crate::Value::from(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let err = format("{0:%Q}", &[date]).unwrap_err();
        assert!(matches!(err, Error::Formatting { .. }));
    }
}
