//! # hiero-settings
//!
//! Typed default settings of the Hiero pipeline integration.
//!
//! The settings document is a single JSON object holding the color
//! management policy, shot creation templates, clip loading filters,
//! publish plugin toggles and the tools menu. This crate provides the
//! schema, a loader that fills in defaults, validation, and the accessors
//! host-side code uses.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hiero_settings::HieroSettings;
//!
//! let settings = HieroSettings::load_or_default("hiero.json").unwrap();
//! assert_eq!(settings.working_space(), "linear");
//!
//! if settings.is_publish_step_enabled("CollectInstanceVersion") {
//!     // run the collector
//! }
//! ```
//!
//! ## Modules
//!
//! - [`settings`] - Root document, loading, saving and accessors
//! - [`imageio`] - Color management
//! - [`create`] - Shot creation naming and numbering
//! - [`load`] - Clip loading filters
//! - [`publish`] - Publish plugin toggles
//! - [`menu`] - Tools menu definition
//! - [`template`] - `{token}` template rendering
//! - [`tree`] - Key-path access and layer merging on raw trees
//! - [`validate`] - Invariant checks
//! - [`error`] - Error type

#[macro_use]
extern crate log;

/// Shot creation settings.
pub mod create;

/// Error types and result alias.
pub mod error;

/// Color management settings.
pub mod imageio;

/// Loader plugin settings.
pub mod load;

/// Tools menu definition.
pub mod menu;

/// Publish plugin toggles.
pub mod publish;

/// Root settings document.
pub mod settings;

/// `{token}` template rendering.
pub mod template;

/// Key-path access and deep merge over raw JSON trees.
pub mod tree;

/// Invariant checks on loaded settings.
pub mod validate;

pub use error::{Result, SettingsError};
pub use settings::{DEFAULT_SETTINGS_JSON, Format, HieroSettings, SETTINGS_PATH_ENV};
pub use validate::Issue;
pub use serde_json::Value;
