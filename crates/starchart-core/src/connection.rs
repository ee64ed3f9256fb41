use crate::id::SystemId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of the global connection list, endpoints kept as supplied.
///
/// Endpoints stay loosely typed here; consumers normalize them once via [`Self::endpoints`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawConnection {
    #[serde(default)]
    pub from: Value,
    #[serde(default)]
    pub to: Value,
}

impl RawConnection {
    pub fn new(from: impl Into<Value>, to: impl Into<Value>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Accepts `{ "from", "to" }` objects and `[from, to]` pairs.
    pub fn from_entry(entry: &Value) -> Option<Self> {
        match entry {
            Value::Object(map) => {
                let from = map.get("from")?;
                let to = map.get("to")?;
                Some(Self::new(from.clone(), to.clone()))
            }
            Value::Array(pair) if pair.len() == 2 => {
                Some(Self::new(pair[0].clone(), pair[1].clone()))
            }
            _ => None,
        }
    }

    /// Both endpoints normalized, or `None` when either one is malformed.
    pub fn endpoints(&self) -> Option<(SystemId, SystemId)> {
        Some((
            SystemId::from_value(&self.from)?,
            SystemId::from_value(&self.to)?,
        ))
    }
}

/// Reads a connection list, returning the usable entries and the number of skipped ones.
pub fn connections_from_value(value: &Value) -> (Vec<RawConnection>, usize) {
    let Some(entries) = value.as_array() else {
        return (Vec::new(), 0);
    };
    let mut out = Vec::with_capacity(entries.len());
    let mut skipped = 0usize;
    for e in entries {
        match RawConnection::from_entry(e) {
            Some(c) => out.push(c),
            None => skipped += 1,
        }
    }
    (out, skipped)
}

/// Supplier of the global connection dataset.
pub trait ConnectionSource {
    fn connections(&self) -> &[RawConnection];
}

impl ConnectionSource for [RawConnection] {
    fn connections(&self) -> &[RawConnection] {
        self
    }
}

impl ConnectionSource for Vec<RawConnection> {
    fn connections(&self) -> &[RawConnection] {
        self.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::{RawConnection, connections_from_value};
    use crate::id::SystemId;
    use serde_json::json;

    #[test]
    fn endpoints_normalize_every_supported_shape() {
        let c = RawConnection::new(json!({"system_id": 1}), json!("2"));
        assert_eq!(c.endpoints(), Some((SystemId(1), SystemId(2))));
        let bad = RawConnection::new(json!(1), json!({"name": "x"}));
        assert_eq!(bad.endpoints(), None);
    }

    #[test]
    fn connections_from_value_skips_unusable_entries() {
        let (list, skipped) = connections_from_value(&json!([
            {"from": 1, "to": 2},
            [2, 3],
            {"from": 4},
            "5-6",
            [1, 2, 3],
        ]));
        assert_eq!(list.len(), 2);
        assert_eq!(skipped, 3);
        assert_eq!(list[1].endpoints(), Some((SystemId(2), SystemId(3))));
    }
}
