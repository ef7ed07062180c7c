//! Color management settings.
//!
//! ```json
//! "imageio": {
//!     "activate_host_color_management": true,
//!     "ocio_config": {"override_global_config": false, "filepath": []},
//!     "workfile": {"workingSpace": "linear", "viewerLut": "sRGB"},
//!     "regexInputs": {"inputs": [{"regex": "(plateRef).*(?=mp4)", "colorspace": "sRGB"}]}
//! }
//! ```

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use fancy_regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::{Result, SettingsError},
    template,
};

/// Root of the color management policy.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct ImageIo {
    /// Whether the host applies its own color management.
    pub activate_host_color_management: bool,
    /// Host-level OCIO config override.
    pub ocio_config: OcioConfig,
    /// File-name rules assigning colorspaces to loaded media.
    pub file_rules: FileRules,
    /// Color spaces applied to new workfiles.
    pub workfile: Workfile,
    /// Regex to colorspace rules for clip inputs.
    #[serde(rename = "regexInputs")]
    pub regex_inputs: RegexInputs,
}

impl Default for ImageIo {
    fn default() -> Self {
        Self {
            activate_host_color_management: true,
            ocio_config: OcioConfig::default(),
            file_rules: FileRules::default(),
            workfile: Workfile::default(),
            regex_inputs: RegexInputs::default(),
        }
    }
}

/// OCIO config override.
#[derive(Default, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct OcioConfig {
    /// Use `filepath` instead of the globally configured OCIO config.
    pub override_global_config: bool,
    /// Candidate config paths, tried in order. May contain `{key}` tokens.
    pub filepath: Vec<String>,
}

/// Host specific file rules.
#[derive(Default, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct FileRules {
    pub activate_host_rules: bool,
    pub rules: BTreeMap<String, FileRule>,
}

/// A single named file rule.
#[derive(Default, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct FileRule {
    /// Regex applied to the file path.
    pub pattern: String,
    /// Colorspace assigned on match.
    pub colorspace: String,
    /// File extension the rule is limited to.
    pub ext: String,
}

/// Default color spaces for new workfiles.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Workfile {
    pub ocio_config_name: String,
    pub working_space: String,
    pub viewer_lut: String,
    pub eight_bit_lut: String,
    pub sixteen_bit_lut: String,
    pub log_lut: String,
    pub float_lut: String,
}

impl Default for Workfile {
    fn default() -> Self {
        Self {
            ocio_config_name: "nuke-default".to_string(),
            working_space: "linear".to_string(),
            viewer_lut: "sRGB".to_string(),
            eight_bit_lut: "sRGB".to_string(),
            sixteen_bit_lut: "sRGB".to_string(),
            log_lut: "Cineon".to_string(),
            float_lut: "linear".to_string(),
        }
    }
}

/// Ordered regex rules; the first match wins.
///
/// Patterns may use look-around and backreferences.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct RegexInputs {
    pub inputs: Vec<RegexInput>,
}

impl Default for RegexInputs {
    fn default() -> Self {
        Self {
            inputs: vec![RegexInput {
                regex: "[^-a-zA-Z0-9](plateRef).*(?=mp4)".to_string(),
                colorspace: "sRGB".to_string(),
            }],
        }
    }
}

/// One regex to colorspace mapping.
#[derive(Default, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct RegexInput {
    pub regex: String,
    pub colorspace: String,
}

impl RegexInputs {
    /// Compile every rule, keeping their order.
    pub fn compile(&self) -> Result<Vec<(Regex, &str)>> {
        self.inputs
            .iter()
            .enumerate()
            .map(|(index, input)| {
                let re = Regex::new(&input.regex)
                    .map_err(|source| SettingsError::InvalidRegex { index, source })?;
                Ok((re, input.colorspace.as_str()))
            })
            .collect()
    }

    /// Colorspace of the first rule whose regex matches `path`.
    ///
    /// Every rule must compile, even those after the first match.
    pub fn colorspace_for(&self, path: &str) -> Result<Option<&str>> {
        for (index, (re, colorspace)) in self.compile()?.into_iter().enumerate() {
            let matched = re
                .is_match(path)
                .map_err(|source| SettingsError::InvalidRegex { index, source })?;
            if matched {
                debug!("'{path}' matched regex input #{index} -> {colorspace}");
                return Ok(Some(colorspace));
            }
        }
        Ok(None)
    }
}

impl ImageIo {
    /// See [`RegexInputs::colorspace_for`].
    pub fn colorspace_for(&self, path: &str) -> Result<Option<&str>> {
        self.regex_inputs.colorspace_for(path)
    }

    /// Resolve the OCIO config override.
    ///
    /// Returns `None` unless `override_global_config` is set. Otherwise each
    /// path in `filepath` is rendered with `data` and the first one for which
    /// `exists` holds is returned. Paths with tokens missing from `data` are
    /// skipped.
    pub fn resolve_ocio_config(
        &self,
        data: &Value,
        exists: impl Fn(&Path) -> bool,
    ) -> Option<PathBuf> {
        if !self.ocio_config.override_global_config {
            return None;
        }
        for raw in &self.ocio_config.filepath {
            let rendered = match template::format(raw, data) {
                Ok(p) => PathBuf::from(p),
                Err(e) => {
                    warn!("skipping OCIO config path {raw:?}: {e}");
                    continue;
                }
            };
            if exists(&rendered) {
                return Some(rendered);
            }
            debug!("OCIO config candidate {} does not exist", rendered.display());
        }
        warn!("OCIO config override is active but no candidate path exists");
        None
    }
}
