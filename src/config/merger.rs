//! Layering of configuration files.
//!
//! # Merge Rules
//!
//! - Mappings are merged recursively
//! - Sequences such as `skip` are replaced, not appended
//! - Null in the overlay removes the key
//! - Scalars in the overlay replace the base

use serde_yaml::Value;

/// Merge `overlay` over `base`.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            let mut result = base_map.clone();
            for (key, overlay_value) in overlay_map {
                if overlay_value.is_null() {
                    result.remove(key);
                } else if let Some(base_value) = base_map.get(key) {
                    result.insert(key.clone(), deep_merge(base_value, overlay_value));
                } else {
                    result.insert(key.clone(), overlay_value.clone());
                }
            }
            Value::Mapping(result)
        }
        (_, overlay) => overlay.clone(),
    }
}

/// Merge layers in order; later layers win.
pub fn merge_layers(layers: &[Value]) -> Value {
    layers
        .iter()
        .fold(Value::Mapping(Default::default()), |acc, layer| {
            deep_merge(&acc, layer)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn local_scalars_win() {
        let merged = deep_merge(&yaml("vendor: acquia\ndetail: true"), &yaml("vendor: pantheon"));
        assert_eq!(merged["vendor"], "pantheon");
        assert_eq!(merged["detail"], true);
    }

    #[test]
    fn sequences_are_replaced() {
        let merged = deep_merge(
            &yaml("skip: [database_size, views_count]"),
            &yaml("skip: [cron_last]"),
        );
        let skip: Vec<String> = serde_yaml::from_value(merged["skip"].clone()).unwrap();
        assert_eq!(skip, vec!["cron_last"]);
    }

    #[test]
    fn null_removes_key() {
        let merged = deep_merge(&yaml("vendor: pantheon\nhtml: true"), &yaml("vendor: ~"));
        assert!(merged.get("vendor").is_none());
        assert_eq!(merged["html"], true);
    }

    #[test]
    fn empty_layers_merge_to_empty_mapping() {
        assert_eq!(merge_layers(&[]), Value::Mapping(Default::default()));
    }
}
