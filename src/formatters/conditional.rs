use chrono::Utc;
use num_bigint::Sign;

use crate::extension::{Formatter, FormattingInfo};
use crate::formatters::SECTION_SEPARATOR;
use crate::{Number, Result, Value};

/// Picks one `|`-separated section of the nested format based on the value, and
/// renders it with the value as its scope.
///
/// | Value | Sections | Choice |
/// |---|---|---|
/// | number | 2 | `one\|other` |
/// | number | 3 | `zero or less\|one\|more` |
/// | number | 4 | `negative\|zero\|one\|more` |
/// | number | 5+ | the section at the (floored) value; negative and too large pick the last |
/// | bool | 2 | `true\|false` |
/// | string, array | 2 | `non-empty\|empty` |
/// | date | 2 | `past or now\|future` |
/// | null | any | the last section |
/// | object | any | the first section |
///
/// With a single section (only when named explicitly) the section is rendered for
/// truthy values and nothing is written otherwise.
///
/// # Examples
///
/// ```rust
/// use smart_format::{format, value};
///
/// let template = "There {0:is a person.|are {} people.}";
/// assert_eq!(format(template, &[value!(1)]).unwrap(), "There is a person.");
/// assert_eq!(format(template, &[value!(3)]).unwrap(), "There are 3 people.");
///
/// assert_eq!(format("{0:cond:Enabled}", &[value!(false)]).unwrap(), "");
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct ConditionalFormatter;

impl Formatter for ConditionalFormatter {
    fn names(&self) -> &[&'static str] {
        &["conditional", "cond", ""]
    }

    fn try_format(&self, info: &mut FormattingInfo<'_, '_>) -> Result<bool> {
        let Some(format) = info.format() else {
            return Ok(false);
        };
        let sections = format.split(SECTION_SEPARATOR);
        if info.formatter_name().is_empty() && sections.len() < 2 {
            return Ok(false);
        }

        let value = info.value();
        if sections.len() == 1 {
            if value.is_truthy() {
                info.format_nested(&sections[0], value)?;
            }
            return Ok(true);
        }

        let index = section_index(value, sections.len());
        info.format_nested(&sections[index], value)?;
        Ok(true)
    }
}

fn section_index(value: &Value, count: usize) -> usize {
    let last = count - 1;
    let index = match value {
        Value::Number(Number::NaN) | Value::Null => last,
        Value::Number(n) => number_index(n.as_f64(), count),
        Value::BigInt(b) => {
            let approx = match b.sign() {
                Sign::Minus => f64::NEG_INFINITY,
                Sign::NoSign => 0.0,
                Sign::Plus => f64::INFINITY,
            };
            number_index(approx, count)
        }
        Value::Bool(b) => usize::from(!*b),
        Value::String(s) => usize::from(s.is_empty()),
        Value::Array(items) => usize::from(items.is_empty()),
        Value::Date(date) => usize::from(*date > Utc::now()),
        Value::Object(_) => 0,
    };
    index.min(last)
}

fn number_index(n: f64, count: usize) -> usize {
    let last = count - 1;
    match count {
        2 => usize::from(n != 1.0),
        3 if n <= 0.0 => 0,
        3 if n <= 1.0 => 1,
        3 => 2,
        4 if n < 0.0 => 0,
        4 if n == 0.0 => 1,
        4 if n <= 1.0 => 2,
        4 => 3,
        _ if n < 0.0 => last,
        _ => (n.floor().min(last as f64)) as usize,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{format, value};
    use chrono::TimeZone;

    #[test]
    fn test_number_sections() {
        assert_eq!(number_index(1.0, 2), 0);
        assert_eq!(number_index(0.0, 2), 1);
        assert_eq!(number_index(-3.0, 3), 0);
        assert_eq!(number_index(1.0, 3), 1);
        assert_eq!(number_index(7.0, 3), 2);
        assert_eq!(number_index(-0.5, 4), 0);
        assert_eq!(number_index(0.0, 4), 1);
        assert_eq!(number_index(0.5, 4), 2);
        assert_eq!(number_index(2.0, 4), 3);
        assert_eq!(number_index(2.9, 5), 2);
        assert_eq!(number_index(40.0, 5), 4);
        assert_eq!(number_index(-1.0, 5), 4);
        assert_eq!(number_index(f64::INFINITY, 6), 5);
    }

    #[test]
    fn test_other_values() {
        assert_eq!(section_index(&value!(true), 2), 0);
        assert_eq!(section_index(&value!(false), 2), 1);
        assert_eq!(section_index(&value!(null), 3), 2);
        assert_eq!(section_index(&value!(""), 2), 1);
        assert_eq!(section_index(&value!([1]), 2), 0);
        assert_eq!(section_index(&value!({}), 2), 0);

        let past = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let future = Utc.with_ymd_and_hms(2999, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(section_index(&Value::from(past), 2), 0);
        assert_eq!(section_index(&Value::from(future), 2), 1);
    }

    #[test]
    fn test_nested_format_receives_the_value() {
        let data = value!({"People": [{"Name": "A"}, {"Name": "B"}]});
        let text = format("{People.Count:one: {}|many: {}}", &[data]).unwrap();
        assert_eq!(text, "many: 2");
    }

    #[test]
    fn test_single_section_requires_name() {
        // Without a name and a pipe the default formatter renders the nested format
        assert_eq!(format("{0:[{}]}", &[value!(0)]).unwrap(), "[0]");
        assert_eq!(format("{0:cond:[{}]}", &[value!(0)]).unwrap(), "");
        assert_eq!(format("{0:cond:[{}]}", &[value!(2)]).unwrap(), "[2]");
    }
}
