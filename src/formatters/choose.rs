use crate::escape::{sequence_len, unescape_char_literals, CHAR_LITERAL_ESCAPE};
use crate::extension::{Formatter, FormattingInfo};
use crate::formatters::SECTION_SEPARATOR;
use crate::{Error, Result, Value};

/// Picks the section whose option matches the value's text.
///
/// The options are `|`-separated and line up with the sections of the nested
/// format. One extra trailing section is the default when no option matches.
/// `null` matches the option `null`; booleans match `true` and `false`. Options are
/// compared under the configured case sensitivity.
///
/// # Examples
///
/// ```rust
/// use smart_format::{format, value};
///
/// let template = "{0:choose(1|2|3):one|two|three|many}";
/// assert_eq!(format(template, &[value!(2)]).unwrap(), "two");
/// assert_eq!(format(template, &[value!(9)]).unwrap(), "many");
///
/// let template = "{0:choose(null|true):nothing|yes|no}";
/// assert_eq!(format(template, &[value!(null)]).unwrap(), "nothing");
/// assert_eq!(format(template, &[value!(false)]).unwrap(), "no");
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct ChooseFormatter;

impl Formatter for ChooseFormatter {
    fn names(&self) -> &[&'static str] {
        &["choose", "c"]
    }

    fn try_format(&self, info: &mut FormattingInfo<'_, '_>) -> Result<bool> {
        let placeholder = info.placeholder();
        let Some(format) = info.format() else {
            return Err(Error::formatting(
                placeholder.raw_text(),
                "choose requires a nested format",
            ));
        };

        let choices = split_options(placeholder.formatter_options_raw());
        let sections = format.split(SECTION_SEPARATOR);
        if sections.len() != choices.len() && sections.len() != choices.len() + 1 {
            return Err(Error::formatting(
                placeholder.raw_text(),
                &format!(
                    "choose has {} options but {} sections; expected as many sections, or one more for the default",
                    choices.len(),
                    sections.len()
                ),
            ));
        }

        let value = info.value();
        let text = match value {
            Value::Null => "null".to_string(),
            other => other.to_string(),
        };
        let case_sensitivity = info.settings().case_sensitivity;

        let index = choices
            .iter()
            .position(|choice| case_sensitivity.matches(choice, &text))
            .or_else(|| (sections.len() > choices.len()).then_some(choices.len()));

        match index {
            Some(index) => {
                info.format_nested(&sections[index], value)?;
                Ok(true)
            }
            None => Err(Error::formatting(
                placeholder.raw_text(),
                &format!("no option matches \"{}\" and there is no default", text),
            )),
        }
    }
}

/// Splits raw options on unescaped `|` and converts escapes in each option.
fn split_options(raw: &str) -> Vec<String> {
    let mut options = Vec::new();
    let mut start = 0;
    let mut position = 0;
    while let Some(ch) = raw[position..].chars().next() {
        if ch == CHAR_LITERAL_ESCAPE {
            position += sequence_len(&raw[position..]);
        } else if ch == SECTION_SEPARATOR {
            options.push(unescape_char_literals(&raw[start..position], true).into_owned());
            position += ch.len_utf8();
            start = position;
        } else {
            position += ch.len_utf8();
        }
    }
    options.push(unescape_char_literals(&raw[start..], true).into_owned());
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{format, format_with_settings, value, CaseSensitivity, Settings};

    #[test]
    fn test_split_options() {
        assert_eq!(split_options("a|b|c"), vec!["a", "b", "c"]);
        assert_eq!(split_options(r"a\|b|c"), vec!["a|b", "c"]);
        assert_eq!(split_options(""), vec![""]);
        assert_eq!(split_options(r"\(x\)|y"), vec!["(x)", "y"]);
    }

    #[test]
    fn test_strings_and_case() {
        let template = "{0:choose(Red|Green):stop|go}";
        assert_eq!(format(template, &[value!("Green")]).unwrap(), "go");
        assert!(format(template, &[value!("green")]).is_err());

        let settings = Settings::new().with_case_sensitivity(CaseSensitivity::CaseInsensitive);
        let text = format_with_settings(template, &[value!("green")], settings).unwrap();
        assert_eq!(text, "go");
    }

    #[test]
    fn test_section_count_mismatch() {
        let err = format("{0:choose(1|2|3):a|b}", &[value!(1)]).unwrap_err();
        assert!(err.to_string().contains("3 options but 2 sections"));
    }

    #[test]
    fn test_short_name_and_nested_placeholders() {
        let data = value!({"Kind": "pdf", "Name": "report"});
        let text = format("{Kind:c(pdf|doc):{Name}.pdf|{Name}.docx}", &[data]).unwrap();
        assert_eq!(text, "report.pdf");
    }
}
