/// Builds a [`Value`](crate::Value) from a JSON-like literal.
///
/// Objects keep their members in the order written. Anything that is not `null`,
/// `true`, `false`, an array or an object is converted with
/// [`to_value`](crate::to_value), so variables of any `Serialize` type can be
/// embedded directly. Negative numbers and other multi-token expressions must be
/// wrapped in parentheses inside arrays and objects.
///
/// # Examples
///
/// ```rust
/// use smart_format::{format, value};
///
/// let pets = vec!["Rex", "Tom"];
/// let person = value!({
///     "Name": "Alice",
///     "Balance": (-12),
///     "Pets": pets,
///     "Address": { "City": "London" }
/// });
///
/// let text = format("{Name} from {Address.City}: {Pets}", &[person]).unwrap();
/// assert_eq!(text, "Alice from London: Rex, Tom");
/// ```
#[macro_export]
macro_rules! value {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array(::std::vec::Vec::new())
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::value!($elem)),*])
    };

    ({}) => {
        $crate::Value::Object($crate::ValueMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::ValueMap::new();
        $(
            object.insert(::std::string::ToString::to_string(&$key), $crate::value!($value));
        )*
        $crate::Value::Object(object)
    }};

    ($other:expr) => {
        $crate::to_value(&$other).unwrap_or($crate::Value::Null)
    };
}

#[cfg(test)]
mod tests {
    use crate::{Number, Value, ValueMap};

    #[test]
    fn test_value_macro_scalars() {
        assert_eq!(value!(null), Value::Null);
        assert_eq!(value!(true), Value::Bool(true));
        assert_eq!(value!(7), Value::Number(Number::Integer(7)));
        assert_eq!(value!((-7)), Value::Number(Number::Integer(-7)));
        assert_eq!(value!("x"), Value::String("x".to_string()));
    }

    #[test]
    fn test_value_macro_nested() {
        let v = value!({"a": [1, {"b": null}], "c": {}});
        let obj = v.as_object().unwrap();
        let a = obj.get("a").and_then(Value::as_array).unwrap();
        assert_eq!(a.len(), 2);
        assert_eq!(a[1].as_object().and_then(|o| o.get("b")), Some(&Value::Null));
        assert_eq!(obj.get("c"), Some(&Value::Object(ValueMap::new())));
    }
}
