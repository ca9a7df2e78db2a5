// Nested JSON -> flat dotted-key rows ("cpu": {"usage_percent": 1} => "cpu.usage_percent").

use serde_json::Value;

/// Leaves of one JSON object in document order, keyed by dotted path.
/// Array elements are keyed by index (`gpu.devices.0.name`); empty objects/arrays vanish.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatRow(Vec<(String, Value)>);

impl FlatRow {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub fn flatten(value: &Value) -> FlatRow {
    let mut out = Vec::new();
    flatten_into(String::new(), value, &mut out);
    FlatRow(out)
}

fn flatten_into(prefix: String, value: &Value, out: &mut Vec<(String, Value)>) {
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                flatten_into(join(&prefix, k), v, out);
            }
        }
        Value::Array(items) => {
            for (i, v) in items.iter().enumerate() {
                flatten_into(join(&prefix, &i.to_string()), v, out);
            }
        }
        leaf => out.push((prefix, leaf.clone())),
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}
