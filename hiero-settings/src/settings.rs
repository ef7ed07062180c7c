//! Root settings document and its loader.
//!
//! A settings file is a single JSON object (TOML with the same layout is
//! accepted too). Keys that are missing fall back to the shipped defaults,
//! keys that are unknown are logged and ignored, and values of the wrong
//! type are errors that name their key path.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    time::SystemTime,
};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    create::{CreateSettings, CreateShotClip},
    error::{Result, SettingsError},
    imageio::{ImageIo, Workfile},
    load::LoadSettings,
    menu::{MenuItem, ScriptsMenu},
    publish::PublishSettings,
    tree,
    validate::{self, Issue},
};

/// The default document shipped with the integration.
pub const DEFAULT_SETTINGS_JSON: &str = include_str!("../resources/hiero.json");

/// Environment variable naming a settings file to load instead of the defaults.
pub const SETTINGS_PATH_ENV: &str = "HIERO_SETTINGS_PATH";

/// On-disk encodings of a settings document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Toml,
}

impl Format {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        match ext {
            "json" => Ok(Format::Json),
            "toml" | "tml" => Ok(Format::Toml),
            ext => Err(SettingsError::UnsupportedFormat(ext.to_string())),
        }
    }

    /// Parse `content` into a raw tree. Blank content is an empty mapping.
    pub fn parse(self, content: &str, origin: &str) -> Result<Value> {
        if content.trim().is_empty() {
            return Ok(Value::Object(Default::default()));
        }
        match self {
            Format::Json => serde_json::from_str(content).map_err(|source| SettingsError::Json {
                path: origin.to_string(),
                source,
            }),
            Format::Toml => {
                let v: toml::Value =
                    toml::from_str(content).map_err(|source| SettingsError::Toml {
                        path: origin.to_string(),
                        source,
                    })?;
                serde_json::to_value(v).map_err(SettingsError::Serialize)
            }
        }
    }

    /// Encode a tree.
    pub fn render(self, value: &Value) -> Result<String> {
        match self {
            Format::Json => serde_json::to_string_pretty(value).map_err(SettingsError::Serialize),
            Format::Toml => Ok(toml::to_string_pretty(value)?),
        }
    }
}

/// Project settings of the Hiero integration.
#[derive(Default, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct HieroSettings {
    /// Color management policy.
    pub imageio: ImageIo,
    /// Creator plugin settings.
    pub create: CreateSettings,
    /// Loader plugin settings.
    pub load: LoadSettings,
    /// Publish plugin toggles.
    pub publish: PublishSettings,
    /// Reserved for host filters; kept as is.
    pub filters: BTreeMap<String, Value>,
    /// Tools menu.
    pub scriptsmenu: ScriptsMenu,
}

impl HieroSettings {
    /// Parse a JSON document over the defaults.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let layer = Format::Json.parse(content, "<string>")?;
        Self::from_layers([&layer])
    }

    /// Parse a TOML document over the defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let layer = Format::Toml.parse(content, "<string>")?;
        Self::from_layers([&layer])
    }

    /// Merge partial documents over the defaults, later layers winning.
    ///
    /// Mappings merge key by key; any other value replaces the one below it.
    pub fn from_layers<'a>(layers: impl IntoIterator<Item = &'a Value>) -> Result<Self> {
        let defaults = Self::default().to_value()?;
        let mut merged = defaults.clone();

        for (i, layer) in layers.into_iter().enumerate() {
            if !layer.is_object() {
                return Err(SettingsError::TypeMismatch {
                    path: String::new(),
                    expected: "object".to_string(),
                    actual: format!("{layer}"),
                });
            }
            for key in tree::unknown_keys(layer, &defaults)
                .into_iter()
                .filter(|k| !is_open_publish_entry(k))
            {
                warn!("settings layer #{i}: ignoring unknown key '{key}'");
            }
            tree::merge(&mut merged, layer)?;
        }

        serde_path_to_error::deserialize(merged).map_err(|e| SettingsError::Deserialize {
            path: e.path().to_string(),
            source: e.into_inner(),
        })
    }

    /// Load a settings file; the format follows the extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let layer = read_layer(path.as_ref())?;
        Self::from_layers([&layer])
    }

    /// Load a settings file, or the defaults when it does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("{} not found, using default settings", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Load defaults overlaid with every existing file in `paths`, in order.
    ///
    /// Typical layers are a studio file followed by a project file.
    pub fn load_layers<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut layers = Vec::new();
        for path in paths {
            let path = path.as_ref();
            if !path.exists() {
                debug!("settings layer {} does not exist, skipped", path.display());
                continue;
            }
            layers.push(read_layer(path)?);
        }
        Self::from_layers(&layers)
    }

    /// Load the file named by `HIERO_SETTINGS_PATH`, or the defaults when the
    /// variable is unset.
    pub fn from_env() -> Result<Self> {
        Self::from_env_var(SETTINGS_PATH_ENV)
    }

    fn from_env_var(var: &str) -> Result<Self> {
        match std::env::var_os(var) {
            Some(path) if !path.is_empty() => {
                debug!("loading settings from ${var}");
                Self::load(PathBuf::from(path))
            }
            _ => Ok(Self::default()),
        }
    }

    /// Raw tree of the settings, keys sorted.
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(SettingsError::Serialize)
    }

    /// Pretty JSON in document order.
    pub fn to_json_string_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(SettingsError::Serialize)
    }

    /// Pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Format::Toml.render(&self.to_value()?)
    }

    /// Write the settings to `path`, format by extension.
    ///
    /// An existing file is first copied next to itself as
    /// `<name>.bk-<unix secs>.<ext>`; the backup path is returned.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<Option<PathBuf>> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        let content = match format {
            Format::Json => self.to_json_string_pretty()?,
            Format::Toml => self.to_toml_string()?,
        };

        let io_err = |source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut backup = None;
        if path.exists() {
            let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
            let secs = SystemTime::now()
                .duration_since(SystemTime::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default();
            let backup_path = path.with_extension(format!("bk-{secs}.{ext}"));
            fs::copy(path, &backup_path).map_err(io_err)?;
            debug!("backed up {} to {}", path.display(), backup_path.display());
            backup = Some(backup_path);
        }

        fs::write(path, content).map_err(io_err)?;
        info!("settings written to {}", path.display());
        Ok(backup)
    }

    /// Only the values that differ from the defaults, or `None`.
    pub fn overrides(&self) -> Result<Option<Value>> {
        Ok(tree::diff(&self.to_value()?, &Self::default().to_value()?))
    }

    /// JSON Schema of the document.
    pub fn json_schema() -> Value {
        let schema = schemars::schema_for!(HieroSettings);
        serde_json::to_value(&schema).unwrap_or(Value::Null)
    }

    /// Every broken invariant.
    pub fn validate(&self) -> Vec<Issue> {
        validate::validate(self)
    }

    /// `self` when valid, otherwise all issues as one error.
    pub fn validated(self) -> Result<Self> {
        let issues = self.validate();
        if issues.is_empty() {
            Ok(self)
        } else {
            for issue in &issues {
                warn!("invalid settings: {issue}");
            }
            Err(SettingsError::Validation(issues))
        }
    }

    /// Value at a dotted key path such as `imageio.workfile.workingSpace`.
    pub fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(tree::get_by_key(&self.to_value()?, key).cloned())
    }

    /// Default color spaces for new workfiles.
    pub fn workfile(&self) -> &Workfile {
        &self.imageio.workfile
    }

    /// Working color space of new workfiles.
    pub fn working_space(&self) -> &str {
        &self.imageio.workfile.working_space
    }

    pub fn viewer_lut(&self) -> &str {
        &self.imageio.workfile.viewer_lut
    }

    /// Colorspace assigned to a clip path by the regex inputs.
    pub fn colorspace_for(&self, path: &str) -> Result<Option<&str>> {
        self.imageio.colorspace_for(path)
    }

    pub fn shot_clip(&self) -> &CreateShotClip {
        &self.create.create_shot_clip
    }

    /// Template used to rename clips into shots.
    pub fn shot_naming_template(&self) -> &str {
        &self.create.create_shot_clip.clip_name
    }

    /// Template of the folders a shot is created under.
    pub fn shot_hierarchy_template(&self) -> &str {
        &self.create.create_shot_clip.hierarchy
    }

    /// Whether the publish step `name` runs.
    pub fn is_publish_step_enabled(&self, name: &str) -> bool {
        self.publish.is_enabled(name)
    }

    pub fn loadable_families(&self) -> &[String] {
        &self.load.load_clip.families
    }

    /// Tools menu entries in order.
    pub fn menu_items(&self) -> &[MenuItem] {
        &self.scriptsmenu.definition
    }
}

fn read_layer(path: &Path) -> Result<Value> {
    let format = Format::from_path(path)?;
    let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("read settings layer {}", path.display());
    format.parse(&content, &path.display().to_string())
}

/// `publish.<plugin>` entries are open-ended: any plugin may be configured.
fn is_open_publish_entry(key: &str) -> bool {
    let mut parts = key.split('.');
    parts.next() == Some("publish") && parts.next().is_some() && parts.next().is_none()
}
