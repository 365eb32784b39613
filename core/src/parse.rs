//! Stock parse functions for common argument shapes.
//!
//! Each constructor returns a [`ParseFn`] ready to pass to an argument
//! declaration. Per-token parsers fail on the first token that does not
//! convert, which excludes that candidate count from the search.
//!
//! # Examples
//!
//! ```
//! use ndargs_core::{Value, parse};
//!
//! let ints = parse::integers();
//! let tokens = vec!["1".to_string(), "2".to_string()];
//! assert_eq!(ints(&tokens).unwrap(), vec![Value::Int(1), Value::Int(2)]);
//!
//! let bad = vec!["x".to_string()];
//! assert!(ints(&bad).is_err());
//! ```

use std::sync::Arc;

use crate::value::{ParseFn, Value};

/// Applies `convert` to every token independently.
pub fn each<F>(convert: F) -> ParseFn
where
    F: Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
{
    Arc::new(move |tokens: &[String]| -> Result<Vec<Value>, String> {
        tokens.iter().map(|t| convert(t)).collect()
    })
}

/// Signed 64-bit integers.
pub fn integers() -> ParseFn {
    each(|token| {
        token
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| format!("{token:?} is not an integer"))
    })
}

/// 64-bit floats.
pub fn floats() -> ParseFn {
    each(|token| {
        token
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| format!("{token:?} is not a number"))
    })
}

/// Tokens kept verbatim.
pub fn strings() -> ParseFn {
    Arc::new(|tokens: &[String]| -> Result<Vec<Value>, String> {
        Ok(tokens.iter().cloned().map(Value::Str).collect())
    })
}

/// `true`/`false`, `yes`/`no`, `on`/`off`, `1`/`0` (case-insensitive).
pub fn bools() -> ParseFn {
    each(|token| match token.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(Value::Bool(true)),
        "false" | "no" | "off" | "0" => Ok(Value::Bool(false)),
        _ => Err(format!("{token:?} is not a boolean")),
    })
}

/// One of a fixed set of literals.
pub fn choice<I, S>(options: I) -> ParseFn
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let options: Vec<String> = options.into_iter().map(Into::into).collect();
    each(move |token| {
        if options.iter().any(|o| o == token) {
            Ok(Value::Str(token.to_string()))
        } else {
            Err(format!(
                "{token:?} is not one of: {}",
                options.join(", ")
            ))
        }
    })
}

/// All tokens joined into a single string value.
///
/// An empty slice yields no value at all rather than an empty string.
pub fn joined(separator: impl Into<String>) -> ParseFn {
    let separator = separator.into();
    Arc::new(move |tokens: &[String]| -> Result<Vec<Value>, String> {
        if tokens.is_empty() {
            Ok(Vec::new())
        } else {
            Ok(vec![Value::Str(tokens.join(&separator))])
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_integers_reject_any_bad_token() {
        let parse = integers();
        assert_eq!(
            parse(&toks(&["4", "-2"])).unwrap(),
            vec![Value::Int(4), Value::Int(-2)]
        );
        assert!(parse(&toks(&["4", "x"])).is_err());
        assert_eq!(parse(&[]).unwrap(), vec![]);
    }

    #[test]
    fn test_bools_accept_common_spellings() {
        let parse = bools();
        assert_eq!(
            parse(&toks(&["YES", "off"])).unwrap(),
            vec![Value::Bool(true), Value::Bool(false)]
        );
        assert!(parse(&toks(&["maybe"])).is_err());
    }

    #[test]
    fn test_choice_lists_options_on_failure() {
        let parse = choice(["json", "yaml"]);
        assert_eq!(parse(&toks(&["yaml"])).unwrap(), vec![Value::from("yaml")]);
        let err = parse(&toks(&["toml"])).unwrap_err();
        assert!(err.contains("json, yaml"));
    }

    #[test]
    fn test_joined_collapses_tokens() {
        let parse = joined(" ");
        assert_eq!(
            parse(&toks(&["hello", "world"])).unwrap(),
            vec![Value::from("hello world")]
        );
        assert!(parse(&[]).unwrap().is_empty());
    }
}
