//! Loader plugin settings.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{error::Result, template};

/// Loader plugin settings.
#[derive(Default, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct LoadSettings {
    #[serde(rename = "LoadClip")]
    pub load_clip: LoadClip,
}

/// Which families can be loaded as clips and how loaded clips are named.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct LoadClip {
    pub enabled: bool,
    /// Allow-list of loadable families.
    pub families: Vec<String>,
    /// Display name template, e.g. `{asset}_{subset}_{representation}`.
    pub clip_name_template: String,
}

impl Default for LoadClip {
    fn default() -> Self {
        Self {
            enabled: true,
            families: ["render2d", "source", "plate", "render", "review"]
                .into_iter()
                .map(String::from)
                .collect(),
            clip_name_template: "{asset}_{subset}_{representation}".to_string(),
        }
    }
}

impl LoadClip {
    /// Whether a representation of `family` may be loaded.
    pub fn accepts(&self, family: &str) -> bool {
        self.enabled && self.families.iter().any(|f| f == family)
    }

    /// Display name of a loaded clip.
    pub fn clip_name(&self, data: &Value) -> Result<String> {
        template::format(&self.clip_name_template, data)
    }
}
