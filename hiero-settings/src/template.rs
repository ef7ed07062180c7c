//! Token templates used by naming settings.
//!
//! Templates are plain strings with `{key}` placeholders. A placeholder may
//! index into a nested mapping with `{key[sub]}` (any depth). Doubled braces
//! (`{{`, `}}`) produce literal braces.

use serde_json::Value;

use crate::error::{Result, SettingsError};

/// Render `template` with values taken from the `data` mapping.
///
/// String values are inserted verbatim, numbers and booleans through their
/// JSON text. Missing keys and non-scalar targets are errors.
pub fn format(template: &str, data: &Value) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut key = String::new();
                let mut closed = false;
                for k in chars.by_ref() {
                    if k == '}' {
                        closed = true;
                        break;
                    }
                    key.push(k);
                }
                if !closed || key.is_empty() {
                    return Err(SettingsError::MalformedTemplate(template.to_string()));
                }
                out.push_str(&lookup(template, &key, data)?);
            }
            '}' => return Err(SettingsError::MalformedTemplate(template.to_string())),
            c => out.push(c),
        }
    }

    Ok(out)
}

/// Names of the top-level keys a template refers to, in order of appearance.
pub fn keys(template: &str) -> Vec<String> {
    let mut found = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        if let Some(stripped) = after.strip_prefix('{') {
            rest = stripped;
            continue;
        }
        let Some(end) = after.find('}') else {
            break;
        };
        let key = &after[..end];
        let head = key.split('[').next().unwrap_or(key);
        if !head.is_empty() && !found.iter().any(|k| k == head) {
            found.push(head.to_string());
        }
        rest = &after[end + 1..];
    }
    found
}

fn lookup(template: &str, key: &str, data: &Value) -> Result<String> {
    let missing = || SettingsError::MissingTemplateKey {
        template: template.to_string(),
        key: key.to_string(),
    };

    let mut parts = key.split('[');
    let head = parts.next().unwrap_or_default();
    let mut current = data.get(head).ok_or_else(missing)?;
    for part in parts {
        let sub = part.strip_suffix(']').ok_or_else(missing)?;
        current = match current {
            Value::Array(items) => sub.parse::<usize>().ok().and_then(|i| items.get(i)),
            other => other.get(sub),
        }
        .ok_or_else(missing)?;
    }

    match current {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(missing()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_flat_tokens() {
        let data = json!({"asset": "sh010", "subset": "plateMain", "representation": "mov"});
        let s = format("{asset}_{subset}_{representation}", &data).unwrap();
        assert_eq!(s, "sh010_plateMain_mov");
    }

    #[test]
    fn test_nested_tokens() {
        let data = json!({"folder": {"name": "sh020"}, "tags": ["a", "b"]});
        assert_eq!(format("{folder[name]}-{tags[1]}", &data).unwrap(), "sh020-b");
    }

    #[test]
    fn test_escaped_braces() {
        let data = json!({"x": 3});
        assert_eq!(format("{{{x}}}", &data).unwrap(), "{3}");
    }

    #[test]
    fn test_missing_key() {
        let err = format("{folder}/{sequence}", &json!({"folder": "shots"})).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::MissingTemplateKey { ref key, .. } if key == "sequence"
        ));
    }

    #[test]
    fn test_unbalanced() {
        assert!(matches!(
            format("{folder", &json!({"folder": "a"})),
            Err(SettingsError::MalformedTemplate(_))
        ));
        assert!(matches!(
            format("folder}", &json!({})),
            Err(SettingsError::MalformedTemplate(_))
        ));
    }

    #[test]
    fn test_keys() {
        assert_eq!(
            keys("{track}{sequence}{shot}{track}"),
            vec!["track", "sequence", "shot"]
        );
        assert_eq!(keys("{folder[name]}_{{x}}"), vec!["folder"]);
    }
}
