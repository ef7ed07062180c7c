//! Key-path access and layering over raw settings trees.
//!
//! Key paths are dot-separated (`imageio.workfile.workingSpace`). A numeric
//! segment indexes into an array (`scriptsmenu.definition.0.title`).

use serde_json::{Map, Value};

use crate::error::{Result, SettingsError};

/// Split a dotted key path into its segments. The empty path is the root.
pub fn split_key(key: &str) -> Vec<&str> {
    if key.is_empty() {
        return Vec::new();
    }
    key.split('.').collect()
}

/// Look up the value at `key`.
pub fn get_by_key<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    split_key(key)
        .into_iter()
        .try_fold(root, |current, seg| match current {
            Value::Object(map) => map.get(seg),
            Value::Array(items) => seg.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}

/// Mutable lookup of the value at `key`.
pub fn get_mut_by_key<'a>(root: &'a mut Value, key: &str) -> Option<&'a mut Value> {
    split_key(key)
        .into_iter()
        .try_fold(root, |current, seg| match current {
            Value::Object(map) => map.get_mut(seg),
            Value::Array(items) => seg.parse::<usize>().ok().and_then(|i| items.get_mut(i)),
            _ => None,
        })
}

/// Replace the value at an existing `key`, keeping its JSON type.
///
/// `null` slots accept anything. Integers stay integers: a float cannot
/// replace an integer value.
pub fn update_by_key(root: &mut Value, key: &str, value: Value) -> Result<()> {
    let slot = get_mut_by_key(root, key).ok_or_else(|| SettingsError::TypeMismatch {
        path: key.to_string(),
        expected: "existing key".to_string(),
        actual: "nothing".to_string(),
    })?;

    check_same_kind(slot, &value, key)?;
    *slot = value;
    Ok(())
}

/// Deep-merge `layer` into `base`.
///
/// Objects merge key by key, every other value (arrays included) replaces
/// what was there. A key whose value changes kind (object vs scalar) is an
/// error, except where `base` holds `null`.
pub fn merge(base: &mut Value, layer: &Value) -> Result<()> {
    merge_at(base, layer, &mut Vec::new())
}

fn merge_at(base: &mut Value, layer: &Value, path: &mut Vec<String>) -> Result<()> {
    match (base, layer) {
        (Value::Object(base_map), Value::Object(layer_map)) => {
            for (k, v) in layer_map {
                path.push(k.clone());
                match base_map.get_mut(k) {
                    Some(existing) => merge_at(existing, v, path)?,
                    None => {
                        base_map.insert(k.clone(), v.clone());
                    }
                }
                path.pop();
            }
            Ok(())
        }
        (base, layer) => {
            check_same_kind(base, layer, &path.join("."))?;
            *base = layer.clone();
            Ok(())
        }
    }
}

/// Key paths present in `candidate` but absent from `reference`.
///
/// Only object keys are compared; arrays are treated as leaves. Keys below a
/// reference mapping that is empty (an open extension point) are accepted.
pub fn unknown_keys(candidate: &Value, reference: &Value) -> Vec<String> {
    let mut found = Vec::new();
    collect_unknown(candidate, reference, String::new(), &mut found);
    found
}

fn collect_unknown(candidate: &Value, reference: &Value, prefix: String, out: &mut Vec<String>) {
    let (Value::Object(cand), Value::Object(refm)) = (candidate, reference) else {
        return;
    };
    if refm.is_empty() {
        return;
    }
    for (k, v) in cand {
        let path = if prefix.is_empty() {
            k.clone()
        } else {
            format!("{prefix}.{k}")
        };
        match refm.get(k) {
            Some(r) => collect_unknown(v, r, path, out),
            None => out.push(path),
        }
    }
}

/// Remove object keys from `value` whose content equals `reference`,
/// leaving only what differs. Returns `None` when nothing differs.
pub fn diff(value: &Value, reference: &Value) -> Option<Value> {
    match (value, reference) {
        (Value::Object(v), Value::Object(r)) => {
            let mut out = Map::new();
            for (k, item) in v {
                match r.get(k) {
                    Some(ref_item) => {
                        if let Some(d) = diff(item, ref_item) {
                            out.insert(k.clone(), d);
                        }
                    }
                    None => {
                        out.insert(k.clone(), item.clone());
                    }
                }
            }
            if out.is_empty() {
                None
            } else {
                Some(Value::Object(out))
            }
        }
        (v, r) if v == r => None,
        (v, _) => Some(v.clone()),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "number",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn check_same_kind(current: &Value, new: &Value, path: &str) -> Result<()> {
    let expected = kind(current);
    let actual = kind(new);
    let compatible = expected == actual
        || expected == "null"
        || actual == "null"
        || (expected == "number" && actual == "integer");
    if compatible {
        Ok(())
    } else {
        Err(SettingsError::TypeMismatch {
            path: path.to_string(),
            expected: expected.to_string(),
            actual: format!("{new}"),
        })
    }
}
