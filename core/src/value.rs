//! Parsed argument values and the callback signatures that produce them.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

/// A typed value produced by an argument's parse function.
///
/// # Examples
///
/// ```
/// use ndargs_core::Value;
///
/// let v = Value::from(5_i64);
/// assert_eq!(v.as_int(), Some(5));
/// assert_eq!(v.to_string(), "5");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(*n),
            Self::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

/// Parsed values of one flag, keyed by argument name.
pub type ArgValues = BTreeMap<String, Vec<Value>>;

/// Converts a slice of raw tokens into typed values, or explains why not.
///
/// Must be deterministic and free of side effects: the resolver calls it
/// once per candidate count and the order of those calls is not part of the
/// contract.
pub type ParseFn = Arc<dyn Fn(&[String]) -> Result<Vec<Value>, String> + Send + Sync>;

/// Post-processes a flag's aggregated argument map.
pub type FlagCallback = Arc<dyn Fn(ArgValues) -> Result<ArgValues, String> + Send + Sync>;

/// Total number of values across all arguments of a flag.
pub(crate) fn value_count(values: &ArgValues) -> usize {
    values.values().map(Vec::len).sum()
}

/// Final per-flag argument bindings handed to a command callback.
///
/// # Examples
///
/// ```
/// use ndargs_core::{CommandSpec, FlagSpec, Value, parse};
///
/// let cmd = CommandSpec::<()>::builder("sum")
///     .flag(FlagSpec::builder("--n").arg("values 1-", parse::integers()))
///     .build()
///     .unwrap();
/// let resolution = cmd.resolve(&["--n", "1", "2"]).unwrap();
/// let bindings = resolution.best().bindings();
/// assert!(bindings.contains("--n"));
/// assert_eq!(bindings.values("--n", "values"), Some(&[Value::Int(1), Value::Int(2)][..]));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Bindings(BTreeMap<String, ArgValues>);

impl Bindings {
    pub fn contains(&self, flag: &str) -> bool {
        self.0.contains_key(flag)
    }

    pub fn get(&self, flag: &str) -> Option<&ArgValues> {
        self.0.get(flag)
    }

    /// Values bound to one argument of one flag.
    pub fn values(&self, flag: &str, argument: &str) -> Option<&[Value]> {
        self.0.get(flag)?.get(argument).map(Vec::as_slice)
    }

    /// First value bound to one argument of one flag.
    pub fn first(&self, flag: &str, argument: &str) -> Option<&Value> {
        self.values(flag, argument)?.first()
    }

    pub fn flags(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of values across every bound flag.
    pub fn value_count(&self) -> usize {
        self.0.values().map(value_count).sum()
    }

    pub(crate) fn insert(&mut self, flag: String, values: ArgValues) {
        self.0.insert(flag, values);
    }
}

/// Turns a command's final bindings into the caller's result type.
pub type CommandCallback<T> = Arc<dyn Fn(&Bindings) -> Result<T, String> + Send + Sync>;
