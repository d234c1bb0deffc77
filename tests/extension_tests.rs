use std::borrow::Cow;
use std::sync::Arc;
use std::thread;

use smart_format::{
    value, FormatCache, Formatter, FormattingInfo, Result, SelectorInfo, SmartFormatter, Source,
    Value,
};

/// Resolves `Upper` on strings to the upper-cased string.
struct UpperSource;

impl Source for UpperSource {
    fn try_resolve<'v>(
        &self,
        current: &'v Value,
        selector: &SelectorInfo<'_, 'v>,
    ) -> Option<Cow<'v, Value>> {
        match current {
            Value::String(s) if selector.matches("Upper") => {
                Some(Cow::Owned(Value::from(s.to_uppercase())))
            }
            _ => None,
        }
    }
}

/// Resolves `G<name>` to the member `name` of the last argument.
struct GlobalSource;

impl Source for GlobalSource {
    fn try_resolve<'v>(
        &self,
        _current: &'v Value,
        selector: &SelectorInfo<'_, 'v>,
    ) -> Option<Cow<'v, Value>> {
        let name = selector.text().strip_prefix('G')?;
        let globals = selector.args().last()?.as_object()?;
        globals.get(name).map(Cow::Borrowed)
    }
}

/// Repeats the value `n` times, where `n` comes from the options: `{0:repeat(3)}`.
struct Repeat;

impl Formatter for Repeat {
    fn names(&self) -> &[&'static str] {
        &["repeat"]
    }

    fn try_format(&self, info: &mut FormattingInfo<'_, '_>) -> Result<bool> {
        let Ok(times) = info.formatter_options().parse::<usize>() else {
            return Ok(false);
        };
        let value = info.value();
        for i in 0..times {
            if i > 0 {
                info.write(" ");
            }
            match info.format() {
                Some(format) => info.format_nested(format, value)?,
                None => info.write_value(value),
            }
        }
        Ok(true)
    }
}

/// Claims every placeholder without a name, but gives up on numbers.
struct Partial;

impl Formatter for Partial {
    fn names(&self) -> &[&'static str] {
        &[""]
    }

    fn try_format(&self, info: &mut FormattingInfo<'_, '_>) -> Result<bool> {
        info.write("partial output");
        Ok(!info.value().is_number())
    }
}

fn formatter() -> SmartFormatter {
    let mut formatter = SmartFormatter::with_default_extensions();
    formatter
        .add_source(UpperSource)
        .add_source(GlobalSource)
        .add_formatter(Repeat);
    formatter
}

#[test]
fn test_custom_source_computes_values() {
    let text = formatter()
        .format("{Name.Upper}", &[value!({"Name": "ann"})])
        .unwrap();
    assert_eq!(text, "ANN");
}

#[test]
fn test_custom_source_sees_all_arguments() {
    let args = [value!({"Name": "ann"}), value!({"Site": "example.org"})];
    let text = formatter().format("{Name}@{GSite}", &args).unwrap();
    assert_eq!(text, "ann@example.org");
}

#[test]
fn test_sources_are_tried_in_order() {
    // MemberSource answers before UpperSource when the member exists
    let text = formatter()
        .format("{Name.Upper}", &[value!({"Name": {"Upper": "member"}})])
        .unwrap();
    assert_eq!(text, "member");
}

#[test]
fn test_custom_formatter_with_options() {
    let formatter = formatter();
    assert_eq!(formatter.format("{0:repeat(3)}", &[value!("ab")]).unwrap(), "ab ab ab");
    assert_eq!(
        formatter.format("{0:repeat(2):<{}>}", &[value!(7)]).unwrap(),
        "<7> <7>"
    );
}

#[test]
fn test_declined_formatter_output_is_discarded() {
    let mut formatter = SmartFormatter::new();
    formatter
        .add_source(smart_format::DefaultSource)
        .add_formatter(Partial)
        .add_formatter(smart_format::DefaultFormatter);

    assert_eq!(formatter.format("{0}", &[value!(5)]).unwrap(), "5");
    assert_eq!(formatter.format("{0}", &[value!("x")]).unwrap(), "partial output");
}

#[test]
fn test_unhandled_named_formatter_fails() {
    let mut formatter = formatter();
    formatter.settings_mut().format_error_action = smart_format::ErrorAction::OutputErrorInResult;
    let text = formatter.format("[{0:repeat(x)}]", &[value!(1)]).unwrap();
    assert!(text.contains("No formatter named \"repeat\" could handle the value"));
}

#[test]
fn test_shared_cache() {
    let cache = Arc::new(FormatCache::new());
    let first = SmartFormatter::with_default_extensions().with_cache(Arc::clone(&cache));
    let second = SmartFormatter::with_default_extensions().with_cache(Arc::clone(&cache));

    assert_eq!(first.format("{0}", &[value!(1)]).unwrap(), "1");
    assert_eq!(second.format("{0}", &[value!(2)]).unwrap(), "2");
    assert_eq!(cache.len(), 1);

    // Different registered names give different parser settings
    formatter().with_cache(Arc::clone(&cache)).format("{0}", &[value!(3)]).unwrap();
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_formatter_is_shareable_across_threads() {
    let formatter = Arc::new(
        SmartFormatter::with_default_extensions().with_cache(Arc::new(FormatCache::new())),
    );

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let formatter = Arc::clone(&formatter);
            thread::spawn(move || formatter.format("#{0}", &[value!(i)]).unwrap())
        })
        .collect();

    let mut outputs: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    outputs.sort();
    assert_eq!(outputs, vec!["#0", "#1", "#2", "#3"]);
}
