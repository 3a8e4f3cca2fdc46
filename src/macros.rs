/// Builds a [`TonValue`](crate::TonValue) from an inline literal.
///
/// Object keys are string literals; values may nest. Anything that is
/// not a recognized literal form falls back to
/// [`TonValue::from`](crate::TonValue).
///
/// # Examples
///
/// ```rust
/// use ton_format::ton;
///
/// let value = ton!({
///     "name": "Ada",
///     "scores": [1, 2, 3],
///     "active": true,
/// });
/// assert_eq!(value.as_object().unwrap().len(), 3);
/// ```
#[macro_export]
macro_rules! ton {
    (null) => {
        $crate::TonValue::Null
    };

    (undefined) => {
        $crate::TonValue::Undefined
    };

    (true) => {
        $crate::TonValue::Boolean(true)
    };

    (false) => {
        $crate::TonValue::Boolean(false)
    };

    ([]) => {
        $crate::TonValue::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::TonValue::Array(vec![$($crate::ton!($elem)),*])
    };

    ({}) => {
        $crate::TonValue::Object($crate::TonObject::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::TonObject::new();
        $(
            object.set($key, $crate::ton!($value));
        )*
        $crate::TonValue::Object(object)
    }};

    // Fallback for any other expression.
    ($other:expr) => {
        $crate::TonValue::from($other)
    };
}
