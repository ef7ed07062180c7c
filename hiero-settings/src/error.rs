use std::path::PathBuf;

use thiserror::Error;

use crate::validate::Issue;

/// Result alias used across the crate.
pub type Result<T, E = SettingsError> = std::result::Result<T, E>;

/// Errors raised while loading, merging or interpreting settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read or written.
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON.
    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The document is not valid TOML.
    #[error("malformed TOML in {path}: {source}")]
    Toml {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// The settings tree cannot be written as TOML.
    #[error("failed to encode TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// A value has a different type than the schema requires.
    #[error("type mismatch at '{path}': expected {expected}, got {actual}")]
    TypeMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    /// The merged tree does not fit the typed schema.
    #[error("settings do not match the schema at '{path}': {source}")]
    Deserialize {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The settings tree cannot be encoded.
    #[error("failed to encode settings: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The file extension maps to no known format.
    #[error("unsupported settings file extension: {0:?}")]
    UnsupportedFormat(String),

    /// A template references a token that was not provided.
    #[error("template '{template}' references unknown key '{key}'")]
    MissingTemplateKey { template: String, key: String },

    /// A template has an unbalanced brace.
    #[error("template '{0}' is not well formed")]
    MalformedTemplate(String),

    /// A colorspace rule carries a pattern the regex engine rejects.
    #[error("regex input #{index} does not compile: {source}")]
    InvalidRegex {
        index: usize,
        #[source]
        source: fancy_regex::Error,
    },

    /// The document loaded but breaks one or more invariants.
    #[error("{} validation issue(s), first: {}", .0.len(), first_issue(.0))]
    Validation(Vec<Issue>),
}

fn first_issue(issues: &[Issue]) -> String {
    issues.first().map(ToString::to_string).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_names_first_issue() {
        let err = SettingsError::Validation(vec![
            Issue::new("load.LoadClip.families", "duplicate family 'plate'"),
            Issue::new("imageio.regexInputs.inputs[0].regex", "empty"),
        ]);
        assert_eq!(
            err.to_string(),
            "2 validation issue(s), first: load.LoadClip.families: duplicate family 'plate'"
        );
    }

    #[test]
    fn deserialize_message_names_key() {
        let source = serde_json::from_str::<u32>("-1").unwrap_err();
        let err = SettingsError::Deserialize {
            path: "create.CreateShotClip.countFrom".into(),
            source,
        };
        assert!(
            err.to_string()
                .starts_with("settings do not match the schema at 'create.CreateShotClip.countFrom'")
        );
    }

    #[test]
    fn serialize_message_is_not_a_schema_error() {
        let source = serde_json::from_str::<u32>("x").unwrap_err();
        let err = SettingsError::Serialize(source);
        assert!(err.to_string().starts_with("failed to encode settings"));
    }

    #[test]
    fn type_mismatch_message() {
        let err = SettingsError::TypeMismatch {
            path: "create.CreateShotClip.countFrom".into(),
            expected: "integer".into(),
            actual: "\"ten\"".into(),
        };
        assert!(err.to_string().contains("expected integer"));
    }
}
