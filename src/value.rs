//! Typed cell values used as histogram keys.
//!
//! Keys are compared by value *and* type: the integer `1` and the text
//! `"1"` are distinct histogram entries. A field that is absent from a
//! row is represented by [`Value::Missing`], which counts as its own
//! category rather than being skipped.

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};

use chrono::NaiveDateTime;

pub const MISSING_LABEL: &str = "<missing>";

#[derive(Debug, Clone)]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    DateTime(NaiveDateTime),
    Missing,
}

// Floats compare by bit pattern so equality stays reflexive for NaN and
// agrees with `Hash` and `Ord`; a NaN cell is one histogram key, not a
// fresh key per observation.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Missing, Value::Missing) => true,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Value {
    /// Parses a raw CSV cell into the narrowest value that round-trips:
    /// integer first, then float, otherwise text. An empty cell stays the
    /// empty text value, which is a legitimate key distinct from
    /// [`Value::Missing`].
    pub fn infer(raw: &str) -> Value {
        if raw.is_empty() {
            return Value::Text(String::new());
        }
        if let Ok(parsed) = raw.parse::<i64>() {
            return Value::Integer(parsed);
        }
        if let Ok(parsed) = raw.parse::<f64>()
            && parsed.is_finite()
        {
            return Value::Float(parsed);
        }
        Value::Text(raw.to_string())
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Missing => 0,
            Value::Boolean(_) => 1,
            Value::Integer(_) => 2,
            Value::Float(_) => 3,
            Value::DateTime(_) => 4,
            Value::Text(_) => 5,
        }
    }
}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Value::Text(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Boolean(b) => b.hash(state),
            Value::DateTime(dt) => dt.hash(state),
            Value::Missing => {}
        }
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
            (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => {
                if v.fract() == 0.0 {
                    write!(f, "{v:.1}")
                } else {
                    write!(f, "{v}")
                }
            }
            Value::Boolean(b) => write!(f, "{b}"),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Value::Missing => write!(f, "{MISSING_LABEL}"),
        }
    }
}
