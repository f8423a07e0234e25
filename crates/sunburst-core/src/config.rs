use crate::{Error, Result};
use serde_json::{Map, Value};

/// Loosely typed chart configuration (a JSON object addressed by dotted paths).
///
/// Renderers extract their typed settings from it and fall back to their own defaults for every
/// missing key, so an empty object is always a valid config.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig(Value);

impl Default for ChartConfig {
    fn default() -> Self {
        Self::empty_object()
    }
}

impl ChartConfig {
    pub fn empty_object() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_object(value)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(text).map_err(|err| Error::InvalidConfig {
            message: err.to_string(),
        })?;
        Self::from_object(value)
    }

    fn from_object(value: Value) -> Result<Self> {
        match value {
            Value::Object(_) => Ok(Self(value)),
            Value::Null => Ok(Self::empty_object()),
            other => Err(Error::InvalidConfig {
                message: format!("expected an object at the config root, got {other}"),
            }),
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn get(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.get(dotted_path)?.as_str()
    }

    pub fn get_bool(&self, dotted_path: &str) -> Option<bool> {
        self.get(dotted_path)?.as_bool()
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        let v = self.get(dotted_path)?;
        v.as_f64()
            .or_else(|| v.as_i64().map(|n| n as f64))
            .or_else(|| v.as_u64().map(|n| n as f64))
            .filter(|n| n.is_finite())
    }

    pub fn get_str_list(&self, dotted_path: &str) -> Option<Vec<String>> {
        let items = self.get(dotted_path)?.as_array()?;
        Some(
            items
                .iter()
                .filter_map(|v| v.as_str().map(|s| s.to_string()))
                .collect(),
        )
    }

    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        // Callers can construct a config from any JSON value via `from_value`; coerce non-objects
        // so this API never panics on user input.
        if !self.0.is_object() {
            self.0 = Value::Object(Map::new());
        }

        let Value::Object(ref mut root) = self.0 else {
            return;
        };
        let mut cur: &mut Map<String, Value> = root;
        let mut segments = dotted_path.split('.').peekable();
        while let Some(seg) = segments.next() {
            if segments.peek().is_none() {
                cur.insert(seg.to_string(), value);
                return;
            }
            let slot = cur.entry(seg).or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Some(next) = slot.as_object_mut() else {
                return;
            };
            cur = next;
        }
    }

    pub fn deep_merge(&mut self, other: &Value) {
        deep_merge_value(&mut self.0, other);
    }
}

fn deep_merge_value(base: &mut Value, incoming: &Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(in_map)) => {
            for (key, in_value) in in_map {
                match base_map.get_mut(key) {
                    Some(base_value) => deep_merge_value(base_value, in_value),
                    None => {
                        base_map.insert(key.clone(), in_value.clone());
                    }
                }
            }
        }
        (base_slot, in_value) => {
            *base_slot = in_value.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dotted_getters_walk_nested_objects() {
        let cfg = ChartConfig::from_value(json!({
            "sunburst": { "radius": 320, "showRoot": true, "labels": { "fillRatio": 0.8 } }
        }));
        assert_eq!(cfg.get_f64("sunburst.radius"), Some(320.0));
        assert_eq!(cfg.get_bool("sunburst.showRoot"), Some(true));
        assert_eq!(cfg.get_f64("sunburst.labels.fillRatio"), Some(0.8));
        assert_eq!(cfg.get_f64("sunburst.labels.missing"), None);
        assert_eq!(cfg.get_str("sunburst.radius"), None);
    }

    #[test]
    fn set_value_creates_intermediate_objects() {
        let mut cfg = ChartConfig::from_value(json!("not an object"));
        cfg.set_value("sunburst.labels.maxFontSize", json!(12));
        assert_eq!(cfg.get_f64("sunburst.labels.maxFontSize"), Some(12.0));
    }

    #[test]
    fn deep_merge_overrides_leaves_and_keeps_siblings() {
        let mut cfg = ChartConfig::from_value(json!({
            "sunburst": { "radius": 300, "labels": { "minFontSize": 5 } }
        }));
        cfg.deep_merge(&json!({ "sunburst": { "labels": { "minFontSize": 6 } } }));
        assert_eq!(cfg.get_f64("sunburst.radius"), Some(300.0));
        assert_eq!(cfg.get_f64("sunburst.labels.minFontSize"), Some(6.0));
    }

    #[test]
    fn yaml_and_json_loaders_agree() {
        let from_yaml = ChartConfig::from_yaml_str("sunburst:\n  radius: 250\n").unwrap();
        let from_json = ChartConfig::from_json_str(r#"{"sunburst":{"radius":250}}"#).unwrap();
        assert_eq!(from_yaml.get_f64("sunburst.radius"), Some(250.0));
        assert_eq!(from_json.get_f64("sunburst.radius"), Some(250.0));
    }

    #[test]
    fn non_object_roots_are_rejected() {
        let err = ChartConfig::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
        assert_eq!(
            ChartConfig::from_yaml_str("~").unwrap(),
            ChartConfig::empty_object()
        );
    }
}
