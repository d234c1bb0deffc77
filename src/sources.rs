//! Built-in sources.
//!
//! - [`DefaultSource`]: positional arguments, `{0}`, `{1.Name}`
//! - [`MemberSource`]: object members, array and string indexes, and the `Count` /
//!   `Length` pseudo-members

use std::borrow::Cow;

use crate::extension::{SelectorInfo, Source};
use crate::settings::CaseSensitivity;
use crate::Value;

/// Resolves a numeric selector at the root scope to the argument at that position.
///
/// # Examples
///
/// ```rust
/// use smart_format::{format, value};
///
/// let text = format("{1} {0}", &[value!("world"), value!("hello")]).unwrap();
/// assert_eq!(text, "hello world");
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultSource;

impl Source for DefaultSource {
    fn try_resolve<'v>(
        &self,
        _current: &'v Value,
        selector: &SelectorInfo<'_, 'v>,
    ) -> Option<Cow<'v, Value>> {
        if !selector.at_root() {
            return None;
        }
        let index: usize = selector.text().parse().ok()?;
        selector.args().get(index).map(Cow::Borrowed)
    }
}

/// Resolves members of the current value.
///
/// | Value | Selector | Result |
/// |---|---|---|
/// | object | member name | the member (case sensitivity applies) |
/// | array | index | the item |
/// | string | index | the character |
/// | array, object | `Count` / `Length` | number of items or members |
/// | string | `Count` / `Length` | number of characters |
///
/// A member actually named `Count` or `Length` takes precedence over the
/// pseudo-member.
///
/// # Examples
///
/// ```rust
/// use smart_format::{format, value};
///
/// let data = value!({"Name": "Ann", "Pets": ["Rex", "Tom"]});
/// let text = format("{Name}: {Pets.Count} pets, first {Pets.0}", &[data]).unwrap();
/// assert_eq!(text, "Ann: 2 pets, first Rex");
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct MemberSource;

impl Source for MemberSource {
    fn try_resolve<'v>(
        &self,
        current: &'v Value,
        selector: &SelectorInfo<'_, 'v>,
    ) -> Option<Cow<'v, Value>> {
        let text = selector.text();
        let member = match current {
            Value::Object(map) => {
                let found = if selector.case_sensitivity() == CaseSensitivity::CaseInsensitive {
                    map.get_ignore_case(text)
                } else {
                    map.get(text)
                };
                found.map(Cow::Borrowed)
            }
            Value::Array(items) => text
                .parse::<usize>()
                .ok()
                .and_then(|i| items.get(i))
                .map(Cow::Borrowed),
            Value::String(s) => text
                .parse::<usize>()
                .ok()
                .and_then(|i| s.chars().nth(i))
                .map(|ch| Cow::Owned(Value::from(ch))),
            _ => None,
        };

        member.or_else(|| {
            let len = match current {
                Value::Array(items) => items.len(),
                Value::Object(map) => map.len(),
                Value::String(s) => s.chars().count(),
                _ => return None,
            };
            (selector.matches("Count") || selector.matches("Length"))
                .then(|| Cow::Owned(Value::from(len)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value;

    fn info<'s, 'v>(text: &'s str, args: &'v [Value], at_root: bool) -> SelectorInfo<'s, 'v> {
        SelectorInfo {
            text,
            index: 0,
            at_root,
            args,
            case_sensitivity: CaseSensitivity::CaseSensitive,
        }
    }

    #[test]
    fn test_default_source_only_at_root() {
        let args = [value!("a"), value!("b")];
        let current = Value::Null;
        assert_eq!(
            DefaultSource.try_resolve(&current, &info("1", &args, true)),
            Some(Cow::Borrowed(&args[1]))
        );
        assert!(DefaultSource.try_resolve(&current, &info("1", &args, false)).is_none());
        assert!(DefaultSource.try_resolve(&current, &info("5", &args, true)).is_none());
        assert!(DefaultSource.try_resolve(&current, &info("x", &args, true)).is_none());
    }

    #[test]
    fn test_member_lookup() {
        let data = value!({"Name": "Ann", "Count": 10});
        let found = MemberSource.try_resolve(&data, &info("Name", &[], false));
        assert_eq!(found.as_deref(), Some(&value!("Ann")));
        assert!(MemberSource.try_resolve(&data, &info("name", &[], false)).is_none());
        // A real member shadows the pseudo-member
        let count = MemberSource.try_resolve(&data, &info("Count", &[], false));
        assert_eq!(count.as_deref(), Some(&value!(10)));
    }

    #[test]
    fn test_member_lookup_ignoring_case() {
        let data = value!({"Name": "Ann"});
        let mut selector = info("nAmE", &[], false);
        selector.case_sensitivity = CaseSensitivity::CaseInsensitive;
        let found = MemberSource.try_resolve(&data, &selector);
        assert_eq!(found.as_deref(), Some(&value!("Ann")));
    }

    #[test]
    fn test_indexes_and_lengths() {
        let items = value!(["x", "y"]);
        let second = MemberSource.try_resolve(&items, &info("1", &[], false));
        assert_eq!(second.as_deref(), Some(&value!("y")));
        let len = MemberSource.try_resolve(&items, &info("Length", &[], false));
        assert_eq!(len.as_deref(), Some(&value!(2)));

        let word = value!("héllo");
        let ch = MemberSource.try_resolve(&word, &info("1", &[], false));
        assert_eq!(ch.as_deref(), Some(&value!("é")));
        let count = MemberSource.try_resolve(&word, &info("Count", &[], false));
        assert_eq!(count.as_deref(), Some(&value!(5)));

        assert!(MemberSource.try_resolve(&value!(3), &info("Count", &[], false)).is_none());
    }
}
