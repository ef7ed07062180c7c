//! Invariant checks on a loaded settings tree.
//!
//! Serde already rejects wrong types and negative frame numbers; the checks
//! here cover what the type system cannot express.

use std::{collections::HashSet, fmt};

use fancy_regex::Regex;

use crate::{
    create::CreateShotClip, imageio::RegexInputs, load::LoadClip, menu::MenuItemType,
    settings::HieroSettings, template,
};

/// A single broken invariant, located by key path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub path: String,
    pub message: String,
}

impl Issue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Every issue found in `settings`, in document order.
pub fn validate(settings: &HieroSettings) -> Vec<Issue> {
    let mut issues = Vec::new();
    check_regex_inputs(&settings.imageio.regex_inputs, &mut issues);
    check_shot_clip(&settings.create.create_shot_clip, &mut issues);
    check_load_clip(&settings.load.load_clip, &mut issues);
    check_menu(settings, &mut issues);
    issues
}

fn check_regex_inputs(inputs: &RegexInputs, issues: &mut Vec<Issue>) {
    for (i, input) in inputs.inputs.iter().enumerate() {
        let base = format!("imageio.regexInputs.inputs.{i}");
        if input.regex.trim().is_empty() {
            issues.push(Issue::new(format!("{base}.regex"), "regex must not be empty"));
        } else if let Err(e) = Regex::new(&input.regex) {
            issues.push(Issue::new(
                format!("{base}.regex"),
                format!("regex does not compile: {e}"),
            ));
        }
        if input.colorspace.trim().is_empty() {
            issues.push(Issue::new(
                format!("{base}.colorspace"),
                "colorspace must not be empty",
            ));
        }
    }
}

const SHOT_TOKENS: [&str; 5] = ["folder", "episode", "sequence", "track", "shot"];

fn check_shot_clip(clip: &CreateShotClip, issues: &mut Vec<Issue>) {
    let base = "create.CreateShotClip";
    if clip.count_steps == 0 {
        issues.push(Issue::new(
            format!("{base}.countSteps"),
            "step must be positive or every shot gets the same number",
        ));
    }
    for (field, tmpl) in [("hierarchy", &clip.hierarchy), ("clipName", &clip.clip_name)] {
        for key in template::keys(tmpl) {
            if !SHOT_TOKENS.contains(&key.as_str()) {
                issues.push(Issue::new(
                    format!("{base}.{field}"),
                    format!("unknown token '{{{key}}}'"),
                ));
            }
        }
    }
}

fn check_load_clip(clip: &LoadClip, issues: &mut Vec<Issue>) {
    let mut seen = HashSet::new();
    for family in &clip.families {
        if family.trim().is_empty() {
            issues.push(Issue::new("load.LoadClip.families", "empty family name"));
        } else if !seen.insert(family.as_str()) {
            issues.push(Issue::new(
                "load.LoadClip.families",
                format!("duplicate family '{family}'"),
            ));
        }
    }
}

fn check_menu(settings: &HieroSettings, issues: &mut Vec<Issue>) {
    for (i, item) in settings.scriptsmenu.definition.iter().enumerate() {
        if item.item_type == MenuItemType::Action && item.title.trim().is_empty() {
            issues.push(Issue::new(
                format!("scriptsmenu.definition.{i}.title"),
                "action without a title",
            ));
        }
    }
}
