use crate::extension::{Formatter, FormattingInfo};
use crate::formatters::SECTION_SEPARATOR;
use crate::{Result, Value};

/// Renders every item of an array through the first section of the nested format.
///
/// The sections are `item|spacer|last spacer|two-item spacer`. The last spacer
/// defaults to the spacer, and the two-item spacer to the last spacer. Each section
/// is rendered with the current item as its scope.
///
/// # Examples
///
/// ```rust
/// use smart_format::{format, value};
///
/// let data = value!({"Pets": ["Rex", "Tom", "Max"]});
/// assert_eq!(format("{Pets:{}|, | and }", &[data]).unwrap(), "Rex, Tom and Max");
///
/// let data = value!({"Pets": ["Rex", "Tom"]});
/// assert_eq!(format("{Pets:{}|, | and |+}", &[data]).unwrap(), "Rex+Tom");
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct ListFormatter;

impl Formatter for ListFormatter {
    fn names(&self) -> &[&'static str] {
        &["list", "l", ""]
    }

    fn try_format(&self, info: &mut FormattingInfo<'_, '_>) -> Result<bool> {
        let Value::Array(items) = info.value() else {
            return Ok(false);
        };
        let Some(format) = info.format() else {
            return Ok(false);
        };

        let sections = format.split(SECTION_SEPARATOR);
        if info.formatter_name().is_empty() && sections.len() < 2 {
            return Ok(false);
        }

        let item_format = &sections[0];
        let spacer = sections.get(1);
        let last_spacer = sections.get(2).or(spacer);
        let pair_spacer = sections.get(3).or(last_spacer);

        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                let separator = if items.len() == 2 {
                    pair_spacer
                } else if i == items.len() - 1 {
                    last_spacer
                } else {
                    spacer
                };
                if let Some(separator) = separator {
                    info.format_nested(separator, item)?;
                }
            }
            info.format_nested(item_format, item)?;
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use crate::{format, value};

    #[test]
    fn test_item_placeholders_use_item_scope() {
        let data = value!({"People": [{"Name": "Ann"}, {"Name": "Bob"}]});
        let text = format("{People:<{Name}>|, }", &[data]).unwrap();
        assert_eq!(text, "<Ann>, <Bob>");
    }

    #[test]
    fn test_explicit_name_with_single_section() {
        let data = value!([1, 2, 3]);
        assert_eq!(format("{0:list:[{}]}", &[data]).unwrap(), "[1][2][3]");
    }

    #[test]
    fn test_empty_and_single_item() {
        assert_eq!(format("{0:{}|, }", &[value!([])]).unwrap(), "");
        assert_eq!(format("{0:{}|, | and }", &[value!(["a"])]).unwrap(), "a");
    }

    #[test]
    fn test_outer_scope_reachable_from_items() {
        let data = value!({"Sep": "/", "Parts": ["a", "b", "c"]});
        assert_eq!(format("{Parts:{}|{Sep}}", &[data]).unwrap(), "a/b/c");
    }
}
