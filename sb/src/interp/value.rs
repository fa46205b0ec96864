//! Runtime values for the evaluator

use super::error::RuntimeError;
use std::collections::BTreeMap;
use std::fmt;

/// Runtime value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Double-precision number
    Number(f64),
    /// Boolean
    Bool(bool),
    /// Owned string
    Str(String),
    /// Ordered, index-mutable sequence
    List(Vec<Value>),
    /// Hash-keyed map, iterated in ascending hash order
    Map(MapValue),
    /// Runtime failure carried as a value
    Error(RuntimeError),
}

impl Value {
    /// Textual form used by Print, error dumps and map hashing
    pub fn stringify(&self) -> String {
        match self {
            Value::Number(n) => format!("{n}"),
            Value::Bool(true) => "True".to_string(),
            Value::Bool(false) => "False".to_string(),
            Value::Str(s) => s.clone(),
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(Value::stringify).collect();
                format!("[{}]", parts.join(", "))
            }
            Value::Map(map) => {
                let parts: Vec<String> = map
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k.stringify(), v.stringify()))
                    .collect();
                format!("{{{}}}", parts.join(", "))
            }
            Value::Error(err) => err.to_string(),
        }
    }

    /// FNV-1a hash of the stringified form, the map slot key.
    ///
    /// Distinct values with the same stringified text (or, rarely, a
    /// genuine hash collision) share a slot and overwrite each other.
    pub fn hash_key(&self) -> u32 {
        fnv1a(self.stringify().as_bytes())
    }

    /// Boolean coercion: Bool uses its flag, everything else is truthy
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            _ => true,
        }
    }

    /// Language equality: defined for Number, Bool and String only;
    /// values of differing runtime type are never equal.
    pub fn is_equal(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            _ => false,
        }
    }

    /// Type name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Bool(_) => "bool",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Error(_) => "error",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.stringify())
    }
}

const FNV_OFFSET_BASIS: u32 = 2166136261;
const FNV_PRIME: u32 = 16777619;

/// Unsigned 32-bit FNV-1a
fn fnv1a(bytes: &[u8]) -> u32 {
    let mut hash = FNV_OFFSET_BASIS;
    for &b in bytes {
        hash ^= u32::from(b);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Map value keyed by the FNV-1a hash of each key's stringified form.
///
/// Entries are deduplicated per hash slot (last write wins) and iterate
/// in ascending hash order, not insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapValue {
    entries: BTreeMap<u32, (Value, Value)>,
}

impl MapValue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the slot for this key's hash
    pub fn insert(&mut self, key: Value, value: Value) {
        self.entries.insert(key.hash_key(), (key, value));
    }

    /// Look up by the key's hash slot
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.get(&key.hash_key()).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Key/value pairs in ascending hash order
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.values().map(|(k, v)| (k, v))
    }
}
