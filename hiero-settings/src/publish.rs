//! Publish plugin toggles.
//!
//! Two plugins have typed entries. Any other plugin name found in the
//! document is kept in [`PublishSettings::other`] with its raw options.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct PublishSettings {
    #[serde(rename = "CollectInstanceVersion")]
    pub collect_instance_version: PluginToggle,
    #[serde(rename = "ExtractReviewCutUpVideo")]
    pub extract_review_cut_up_video: ExtractReviewCutUpVideo,
    /// Options of plugins without a typed entry, by plugin name.
    #[serde(flatten)]
    pub other: BTreeMap<String, Value>,
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self {
            collect_instance_version: PluginToggle { enabled: false },
            extract_review_cut_up_video: ExtractReviewCutUpVideo::default(),
            other: BTreeMap::new(),
        }
    }
}

/// A plugin that only carries an `enabled` flag.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct PluginToggle {
    pub enabled: bool,
}

impl Default for PluginToggle {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Review cut-up extraction.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct ExtractReviewCutUpVideo {
    pub enabled: bool,
    /// Tags added to the extracted representation.
    pub tags_addition: Vec<String>,
}

impl Default for ExtractReviewCutUpVideo {
    fn default() -> Self {
        Self {
            enabled: true,
            tags_addition: vec!["review".to_string()],
        }
    }
}

impl PublishSettings {
    /// Whether the publish step `name` runs.
    ///
    /// Steps without an entry run; an entry without an `enabled` key runs.
    pub fn is_enabled(&self, name: &str) -> bool {
        match name {
            "CollectInstanceVersion" => self.collect_instance_version.enabled,
            "ExtractReviewCutUpVideo" => self.extract_review_cut_up_video.enabled,
            other => self
                .other
                .get(other)
                .and_then(|v| v.get("enabled"))
                .and_then(Value::as_bool)
                .unwrap_or(true),
        }
    }

    /// Raw options of the publish step `name`, if any.
    pub fn options(&self, name: &str) -> Option<Value> {
        match name {
            "CollectInstanceVersion" => serde_json::to_value(&self.collect_instance_version).ok(),
            "ExtractReviewCutUpVideo" => {
                serde_json::to_value(&self.extract_review_cut_up_video).ok()
            }
            other => self.other.get(other).cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_defaults() {
        let p = PublishSettings::default();
        assert!(!p.is_enabled("CollectInstanceVersion"));
        assert!(p.is_enabled("ExtractReviewCutUpVideo"));
        assert!(p.is_enabled("IntegrateAsset"));
    }

    #[test]
    fn test_untyped_plugins_are_kept() {
        let p: PublishSettings = serde_json::from_value(json!({
            "CollectInstanceVersion": {"enabled": true},
            "ValidateFrameRange": {"enabled": false, "optional": true}
        }))
        .unwrap();
        assert!(p.is_enabled("CollectInstanceVersion"));
        assert!(!p.is_enabled("ValidateFrameRange"));
        assert_eq!(
            p.options("ValidateFrameRange"),
            Some(json!({"enabled": false, "optional": true}))
        );
        assert_eq!(
            p.extract_review_cut_up_video.tags_addition,
            vec!["review".to_string()]
        );

        let back = serde_json::to_value(&p).unwrap();
        assert_eq!(back["ValidateFrameRange"]["optional"], json!(true));
    }
}
