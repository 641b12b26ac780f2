//! JSON merge helpers for layered configuration.

use serde_json::Value;

/// Merge an overlay layer into the accumulated config.
///
/// Objects merge key by key; any other value replaces the base. An explicit
/// `null` in the overlay removes the key so the serde default applies again.
pub(super) fn merge_layer(base: &mut Value, overlay: &Value) {
    let (Value::Object(base_map), Value::Object(overlay_map)) = (&mut *base, overlay) else {
        *base = overlay.clone();
        return;
    };
    for (key, value) in overlay_map {
        if value.is_null() {
            base_map.remove(key);
            continue;
        }
        match base_map.get_mut(key) {
            Some(existing) if existing.is_object() && value.is_object() => {
                merge_layer(existing, value)
            }
            _ => {
                base_map.insert(key.clone(), value.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn nested_keys_merge_and_null_resets() {
        let mut base = json!({ "api": { "base_url": "http://a", "timeout_secs": 5 } });
        merge_layer(
            &mut base,
            &json!({ "api": { "timeout_secs": null, "base_url": "http://b" } }),
        );
        assert_eq!(base, json!({ "api": { "base_url": "http://b" } }));
    }
}
