//! Property-based tests for the parser and the render pipeline.

use proptest::prelude::*;
use smart_format::{format, value, Parser, ParserSettings, Value};

fn literal() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 .,;!?-]{0,12}"
}

fn selector_path() -> impl Strategy<Value = String> {
    prop::collection::vec("[A-Za-z][A-Za-z0-9_]{0,5}", 1..4).prop_map(|parts| parts.join("."))
}

fn placeholder() -> impl Strategy<Value = String> {
    (selector_path(), prop::option::of((1i32..40, any::<bool>()))).prop_map(|(path, align)| {
        match align {
            Some((width, true)) => format!("{{{},{}}}", path, width),
            Some((width, false)) => format!("{{{},-{}}}", path, width),
            None => format!("{{{}}}", path),
        }
    })
}

fn template() -> impl Strategy<Value = String> {
    prop::collection::vec((literal(), placeholder()), 0..5).prop_map(|parts| {
        parts
            .into_iter()
            .map(|(text, placeholder)| text + &placeholder)
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_parse_then_display_reconstructs(template in template()) {
        let format = Parser::new(&ParserSettings::default()).parse(&template).unwrap();
        prop_assert_eq!(format.to_string(), template);
    }

    #[test]
    fn prop_literal_text_passes_through(text in literal()) {
        prop_assert_eq!(format(&text, &[]).unwrap(), text);
    }

    #[test]
    fn prop_doubled_braces_become_single(text in "[a-z{}]{0,16}") {
        let escaped = text.replace('{', "{{").replace('}', "}}");
        prop_assert_eq!(format(&escaped, &[]).unwrap(), text);
    }

    #[test]
    fn prop_alignment_pads_to_width(text in "[a-z]{0,20}", width in 1i32..30, left in any::<bool>()) {
        let alignment = if left { -width } else { width };
        let output = format(&format!("{{0,{}}}", alignment), &[Value::from(text.as_str())]).unwrap();

        prop_assert_eq!(output.chars().count(), text.len().max(width as usize));
        prop_assert_eq!(output.trim(), text.as_str());
        if left {
            prop_assert!(output.starts_with(text.as_str()));
        } else {
            prop_assert!(output.ends_with(text.as_str()));
        }
    }

    #[test]
    fn prop_formatting_is_deterministic(items in prop::collection::vec("[a-z]{1,6}", 0..6)) {
        let data = value!({"Items": items});
        let template = "{Items.Count}: {Items:{}|, | and }";
        let first = format(template, std::slice::from_ref(&data)).unwrap();
        let second = format(template, std::slice::from_ref(&data)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_list_joins_every_item(items in prop::collection::vec("[a-z]{1,6}", 1..8)) {
        let data = value!({"Items": (items.clone())});
        let output = format("{Items:{}|,}", &[data]).unwrap();
        prop_assert_eq!(output, items.join(","));
    }
}
