//! Field values for structured logging
//!
//! This module provides:
//! - `Value`: typed field value (scalars, durations, timestamps, groups, redactable values)
//! - `Field`: a key bound to a value
//! - `Arg`: one element of a call-site field list, paired up by [`pair_args`]
//! - `Redact` / `Secret`: the redaction capability

use super::error::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Placeholder rendered in place of any redacted value.
pub const REDACTED: &str = "[REDACTED]";

/// Value paired with a trailing key that has no value.
pub const MISSING: &str = "(MISSING)";

/// Key used for a value found where a key was expected.
pub const BAD_KEY: &str = "!BADKEY";

/// Projections returning another redactable value are followed at most this many times.
const MAX_REDACT_DEPTH: usize = 8;

/// Capability for values that must never be rendered raw.
///
/// The renderer calls [`Redact::redacted_render`] instead of looking at the
/// value itself. An `Err` or a panic in the projection renders [`REDACTED`].
///
/// A panic is caught, but the process panic hook still runs and by default
/// prints the payload to stderr, which is also where the console sink writes
/// errors. Projections must never panic (or build an `Err`) with the secret in
/// the message.
///
/// # Example
///
/// ```
/// use rust_structlog::{Redact, Result, Value};
///
/// struct Token(String);
///
/// impl Redact for Token {
///     fn redacted_render(&self) -> Result<Value> {
///         Ok(Value::from("REDACTED_TOKEN"))
///     }
/// }
///
/// let value = Value::redacted(Token("Secret".to_string()));
/// assert!(!format!("{:?}", value).contains("Secret"));
/// ```
pub trait Redact: Send + Sync {
    fn redacted_render(&self) -> Result<Value>;
}

/// Value type for structured logging fields
#[derive(Clone)]
pub enum Value {
    String(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Duration(Duration),
    Time(DateTime<Utc>),
    Group(Vec<Field>),
    Redactable(Arc<dyn Redact>),
    Null,
}

impl Value {
    /// Wrap a redactable value
    pub fn redacted<R: Redact + 'static>(value: R) -> Self {
        Value::Redactable(Arc::new(value))
    }

    /// Description of an error, as carried by the `err` field
    pub fn error(err: &dyn std::error::Error) -> Self {
        Value::String(err.to_string())
    }

    /// Replace every redactable value, including inside groups, by its projection.
    #[must_use]
    pub fn resolve(self) -> Value {
        let mut failures = 0;
        self.resolve_counting(&mut failures)
    }

    pub(crate) fn resolve_counting(self, failures: &mut u64) -> Value {
        match self {
            Value::Redactable(inner) => resolve_redactable(inner, failures),
            Value::Group(fields) => Value::Group(
                fields
                    .into_iter()
                    .map(|field| field.resolve_counting(failures))
                    .collect(),
            ),
            other => other,
        }
    }

    pub fn is_empty_group(&self) -> bool {
        matches!(self, Value::Group(fields) if fields.is_empty())
    }
}

fn resolve_redactable(mut current: Arc<dyn Redact>, failures: &mut u64) -> Value {
    for _ in 0..MAX_REDACT_DEPTH {
        let projected = panic::catch_unwind(AssertUnwindSafe(|| current.redacted_render()));
        match projected {
            Ok(Ok(Value::Redactable(next))) => current = next,
            Ok(Ok(value)) => return value.resolve_counting(failures),
            Ok(Err(_)) | Err(_) => break,
        }
    }
    *failures += 1;
    Value::String(REDACTED.to_string())
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Value::Uint(u) => f.debug_tuple("Uint").field(u).finish(),
            Value::Float(fl) => f.debug_tuple("Float").field(fl).finish(),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Duration(d) => f.debug_tuple("Duration").field(d).finish(),
            Value::Time(t) => f.debug_tuple("Time").field(t).finish(),
            Value::Group(fields) => f.debug_tuple("Group").field(fields).finish(),
            Value::Redactable(_) => write!(f, "Redactable({})", REDACTED),
            Value::Null => write!(f, "Null"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            Value::Int(i) => write!(f, "{}", i),
            Value::Uint(u) => write!(f, "{}", u),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Duration(d) => write!(f, "{:?}", d),
            Value::Time(t) => write!(f, "{}", t.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Value::Group(fields) => {
                write!(f, "[")?;
                for (idx, field) in fields.iter().enumerate() {
                    if idx > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}={}", field.key, field.value)?;
                }
                write!(f, "]")
            }
            Value::Redactable(_) => write!(f, "{}", REDACTED),
            Value::Null => write!(f, "null"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::String(s) => serializer.serialize_str(s),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Uint(u) => serializer.serialize_u64(*u),
            // JSON has no NaN or infinity
            Value::Float(fl) if fl.is_finite() => serializer.serialize_f64(*fl),
            Value::Float(fl) => serializer.serialize_str(&fl.to_string()),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Duration(_) | Value::Time(_) => serializer.collect_str(self),
            Value::Group(fields) => {
                let mut map = serializer.serialize_map(None)?;
                for field in fields.iter().filter(|field| !field.value.is_empty_group()) {
                    map.serialize_entry(&field.key, &field.value)?;
                }
                map.end()
            }
            Value::Redactable(_) => serializer.serialize_str(REDACTED),
            Value::Null => serializer.serialize_unit(),
        }
    }
}

macro_rules! impl_value_from {
    ($variant:ident as $target:ty: $($source:ty),*) => {
        $(
            impl From<$source> for Value {
                fn from(v: $source) -> Self {
                    Value::$variant(v as $target)
                }
            }
        )*
    };
}

impl_value_from!(Int as i64: i8, i16, i32, i64, isize, u8, u16, u32);
impl_value_from!(Uint as u64: u64, usize);
impl_value_from!(Float as f64: f32, f64);

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::String(c.to_string())
    }
}

impl From<Duration> for Value {
    fn from(d: Duration) -> Self {
        Value::Duration(d)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Time(t)
    }
}

impl From<SystemTime> for Value {
    fn from(t: SystemTime) -> Self {
        Value::Time(t.into())
    }
}

impl From<Vec<Field>> for Value {
    fn from(fields: Vec<Field>) -> Self {
        Value::Group(fields)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl<T: Send + Sync + 'static> From<Secret<T>> for Value {
    fn from(secret: Secret<T>) -> Self {
        Value::redacted(secret)
    }
}

/// A key bound to a value
#[derive(Debug, Clone)]
pub struct Field {
    pub key: String,
    pub value: Value,
}

impl Field {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// A field whose value nests the given fields under `name`
    pub fn group(name: impl Into<String>, fields: impl IntoIterator<Item = Field>) -> Self {
        Self {
            key: name.into(),
            value: Value::Group(fields.into_iter().collect()),
        }
    }

    pub(crate) fn resolve_counting(self, failures: &mut u64) -> Field {
        Field {
            key: self.key,
            value: self.value.resolve_counting(failures),
        }
    }
}

/// One element of a call-site field list
///
/// Bare values are paired up as `key, value, key, value, ...` by [`pair_args`];
/// a [`Field`] stands on its own. Build lists with the [`fields!`](crate::fields) macro.
#[derive(Debug, Clone)]
pub enum Arg {
    Value(Value),
    Field(Field),
}

impl From<Field> for Arg {
    fn from(field: Field) -> Self {
        Arg::Field(field)
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Value(value)
    }
}

macro_rules! impl_arg_from {
    ($($source:ty),*) => {
        $(
            impl From<$source> for Arg {
                fn from(v: $source) -> Self {
                    Arg::Value(Value::from(v))
                }
            }
        )*
    };
}

impl_arg_from!(
    i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool, char, String, &str,
    &String, Duration, DateTime<Utc>, SystemTime
);

impl<T: Into<Value>> From<Option<T>> for Arg {
    fn from(v: Option<T>) -> Self {
        Arg::Value(v.into())
    }
}

impl<T: Send + Sync + 'static> From<Secret<T>> for Arg {
    fn from(secret: Secret<T>) -> Self {
        Arg::Value(Value::redacted(secret))
    }
}

/// Pair a call-site argument list into fields.
///
/// A string followed by a value becomes one field. A trailing string with no
/// value is paired with [`MISSING`]; a non-string value in key position is
/// kept under [`BAD_KEY`]. Never fails.
pub fn pair_args(args: impl IntoIterator<Item = Arg>) -> Vec<Field> {
    let mut iter = args.into_iter();
    let mut fields = Vec::with_capacity(iter.size_hint().0 / 2 + 1);

    while let Some(arg) = iter.next() {
        match arg {
            Arg::Field(field) => fields.push(field),
            Arg::Value(Value::String(key)) => match iter.next() {
                Some(Arg::Value(value)) => fields.push(Field { key, value }),
                Some(Arg::Field(field)) => {
                    fields.push(Field::new(key, MISSING));
                    fields.push(field);
                }
                None => fields.push(Field::new(key, MISSING)),
            },
            Arg::Value(value) => fields.push(Field {
                key: BAD_KEY.to_string(),
                value,
            }),
        }
    }

    fields
}

/// Wrapper that always renders as [`REDACTED`]
///
/// `Display` and `Debug` are redacted too, so a `Secret` stays hidden even
/// when passed to [`printf!`](crate::printf).
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret<T>(T);

impl<T> Secret<T> {
    pub fn new(value: T) -> Self {
        Secret(value)
    }

    /// Access the wrapped value
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> From<T> for Secret<T> {
    fn from(value: T) -> Self {
        Secret(value)
    }
}

impl<T> fmt::Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret({})", REDACTED)
    }
}

impl<T> fmt::Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T: Send + Sync> Redact for Secret<T> {
    fn redacted_render(&self) -> Result<Value> {
        Ok(Value::String(REDACTED.to_string()))
    }
}
