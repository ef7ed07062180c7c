//! Tools menu definition.
//!
//! The command strings are handed to the host's script console as is; this
//! crate never runs them.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Named, ordered list of menu entries.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct ScriptsMenu {
    pub name: String,
    pub definition: Vec<MenuItem>,
}

impl Default for ScriptsMenu {
    fn default() -> Self {
        Self {
            name: "OpenPype Tools".to_string(),
            definition: vec![MenuItem {
                item_type: MenuItemType::Action,
                sourcetype: SourceType::Python,
                title: "OpenPype Docs".to_string(),
                command: "import webbrowser;webbrowser.open(url='https://openpype.io/docs/artist_hosts_hiero')"
                    .to_string(),
                tooltip: "Open the OpenPype Hiero user doc page".to_string(),
            }],
        }
    }
}

/// Kind of menu entry.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MenuItemType {
    #[default]
    Action,
    Separator,
}

/// Language the command string is written in.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    #[default]
    Python,
    /// `command` is a path to a script file.
    File,
}

/// One entry of the tools menu.
#[derive(Default, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct MenuItem {
    #[serde(rename = "type")]
    pub item_type: MenuItemType,
    pub sourcetype: SourceType,
    pub title: String,
    pub command: String,
    pub tooltip: String,
}

impl ScriptsMenu {
    /// Entries that carry a command, in menu order.
    pub fn actions(&self) -> impl Iterator<Item = &MenuItem> {
        self.definition
            .iter()
            .filter(|item| item.item_type == MenuItemType::Action)
    }

    pub fn find(&self, title: &str) -> Option<&MenuItem> {
        self.actions().find(|item| item.title == title)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_item_wire_names() {
        let item: MenuItem = serde_json::from_value(json!({
            "type": "action",
            "sourcetype": "file",
            "title": "Publish",
            "command": "/studio/scripts/publish.py",
            "tooltip": ""
        }))
        .unwrap();
        assert_eq!(item.item_type, MenuItemType::Action);
        assert_eq!(item.sourcetype, SourceType::File);
    }

    #[test]
    fn test_actions_skip_separators() {
        let menu: ScriptsMenu = serde_json::from_value(json!({
            "name": "Tools",
            "definition": [
                {"type": "action", "title": "A", "command": "a()"},
                {"type": "separator"},
                {"type": "action", "title": "B", "command": "b()"}
            ]
        }))
        .unwrap();
        let titles: Vec<_> = menu.actions().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["A", "B"]);
        assert_eq!(menu.find("B").map(|i| i.command.as_str()), Some("b()"));
        assert!(menu.find("C").is_none());
    }

    #[test]
    fn test_unknown_item_type_is_rejected() {
        let r: Result<MenuItem, _> = serde_json::from_value(json!({"type": "submenu"}));
        assert!(r.is_err());
    }
}
