use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;

/// Keys that may wrap an id inside an endpoint object, checked in this order.
///
/// `system_id` matches the stargate `destination` records in ESI payloads.
const ID_KEYS: [&str; 4] = ["id", "system_id", "systemId", "solar_system_id"];

const MAX_WRAP_DEPTH: usize = 4;

// Largest magnitude at which every integer is exactly representable as f64.
const MAX_EXACT_F64_INT: f64 = 9_007_199_254_740_992.0;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub fn get(self) -> i64 {
                self.0
            }

            /// Coerces a loosely-typed JSON id (number, numeric string, or wrapping object).
            pub fn from_value(value: &Value) -> Option<Self> {
                normalize_id(value).map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_id!(
    /// Region-unique system (node) id.
    SystemId
);
define_id!(ConstellationId);
define_id!(RegionId);

/// Normalizes a loosely-typed id into its canonical integer form.
///
/// Accepts integers, floats without a fractional part, numeric strings, and objects that wrap an
/// id under `id`, `system_id`, `systemId` or `solar_system_id` (checked in that order). Returns
/// `None` for anything else.
pub fn normalize_id(value: &Value) -> Option<i64> {
    normalize_at_depth(value, 0)
}

fn normalize_at_depth(value: &Value, depth: usize) -> Option<i64> {
    match value {
        Value::Number(n) => number_to_id(n),
        Value::String(s) => parse_id_str(s),
        Value::Object(map) if depth < MAX_WRAP_DEPTH => {
            let wrapped = ID_KEYS.iter().find_map(|k| map.get(*k))?;
            normalize_at_depth(wrapped, depth + 1)
        }
        _ => None,
    }
}

fn number_to_id(n: &Number) -> Option<i64> {
    if let Some(v) = n.as_i64() {
        return Some(v);
    }
    if let Some(v) = n.as_u64() {
        return i64::try_from(v).ok();
    }
    n.as_f64().and_then(float_to_id)
}

fn float_to_id(v: f64) -> Option<i64> {
    if v.is_finite() && v.fract() == 0.0 && v.abs() <= MAX_EXACT_F64_INT {
        Some(v as i64)
    } else {
        None
    }
}

fn parse_id_str(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    s.parse::<f64>().ok().and_then(float_to_id)
}
