//! Shot creation settings.
//!
//! `CreateShotClip` drives how a sequence of clips is turned into a shot
//! hierarchy: every selected clip gets a number (`countFrom`, `countSteps`),
//! a hierarchy path (`hierarchy`) and optionally a new clip name
//! (`clipName`), all rendered from the tokens stored next to them.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{error::Result, template};

/// Placeholder in the `track` token replaced by the host track name.
pub const TRACK_PLACEHOLDER: &str = "{_track_}";

/// Creator plugin settings.
#[derive(Default, Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct CreateSettings {
    #[serde(rename = "CreateShotClip")]
    pub create_shot_clip: CreateShotClip,
}

/// Naming and numbering rules for shots created from clips.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateShotClip {
    /// Template for the parent folders of each shot.
    pub hierarchy: String,
    /// Rename clips using `clip_name`.
    pub clip_rename: bool,
    /// Template for renamed clips.
    pub clip_name: String,
    /// Number given to the first shot.
    pub count_from: u32,
    /// Increment between consecutive shot numbers.
    pub count_steps: u32,
    pub folder: String,
    pub episode: String,
    pub sequence: String,
    pub track: String,
    /// Shot token; a run of `#` is replaced with the padded shot number.
    pub shot: String,
    /// Sync shot attributes from the hero track to the other tracks.
    pub v_sync_on: bool,
    /// First frame of the shot in the workfile.
    pub workfile_frame_start: u32,
    pub handle_start: u32,
    pub handle_end: u32,
}

impl Default for CreateShotClip {
    fn default() -> Self {
        Self {
            hierarchy: "{folder}/{sequence}".to_string(),
            clip_rename: true,
            clip_name: "{track}{sequence}{shot}".to_string(),
            count_from: 10,
            count_steps: 10,
            folder: "shots".to_string(),
            episode: "ep01".to_string(),
            sequence: "sq01".to_string(),
            track: TRACK_PLACEHOLDER.to_string(),
            shot: "sh###".to_string(),
            v_sync_on: false,
            workfile_frame_start: 1001,
            handle_start: 10,
            handle_end: 10,
        }
    }
}

/// Inclusive workfile frame range of a shot, handles included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRange {
    pub start: i64,
    pub end: i64,
}

impl FrameRange {
    /// Number of frames in the range.
    pub fn len(&self) -> i64 {
        self.end - self.start + 1
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

impl CreateShotClip {
    /// Number of the shot at position `index` in the selection.
    pub fn shot_number(&self, index: usize) -> u64 {
        u64::from(self.count_from) + index as u64 * u64::from(self.count_steps)
    }

    /// Shot token with its `#` run replaced by the padded shot number.
    ///
    /// A token without `#` gets no number.
    pub fn shot_name(&self, index: usize) -> String {
        let Some(start) = self.shot.find('#') else {
            return self.shot.clone();
        };
        let width = self.shot[start..]
            .chars()
            .take_while(|c| *c == '#')
            .count();
        let number = format!("{:0width$}", self.shot_number(index), width = width);
        format!(
            "{}{}{}",
            &self.shot[..start],
            number,
            &self.shot[start + width..]
        )
    }

    /// Token values for the shot at `index` on the host track `track_name`.
    pub fn hierarchy_data(&self, index: usize, track_name: &str) -> Value {
        let mut data = Map::new();
        data.insert("folder".into(), Value::String(self.folder.clone()));
        data.insert("episode".into(), Value::String(self.episode.clone()));
        data.insert("sequence".into(), Value::String(self.sequence.clone()));
        data.insert(
            "track".into(),
            Value::String(self.track.replace(TRACK_PLACEHOLDER, track_name)),
        );
        data.insert("shot".into(), Value::String(self.shot_name(index)));
        Value::Object(data)
    }

    /// Parent path of the shot, rendered from `hierarchy`.
    pub fn hierarchy_path(&self, index: usize, track_name: &str) -> Result<String> {
        template::format(&self.hierarchy, &self.hierarchy_data(index, track_name))
    }

    /// New name of the clip, or `source_name` when renaming is off.
    pub fn clip_name(&self, index: usize, track_name: &str, source_name: &str) -> Result<String> {
        if !self.clip_rename {
            return Ok(source_name.to_string());
        }
        template::format(&self.clip_name, &self.hierarchy_data(index, track_name))
    }

    /// Workfile frame range for a clip `duration` frames long.
    pub fn frame_range(&self, duration: u32) -> FrameRange {
        let start = i64::from(self.workfile_frame_start);
        FrameRange {
            start: start - i64::from(self.handle_start),
            end: start + i64::from(duration) - 1 + i64::from(self.handle_end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shot_numbering() {
        let c = CreateShotClip::default();
        assert_eq!(c.shot_number(0), 10);
        assert_eq!(c.shot_number(3), 40);
        assert_eq!(c.shot_name(0), "sh010");
        assert_eq!(c.shot_name(99), "sh1000");
    }

    #[test]
    fn test_shot_name_without_hashes() {
        let c = CreateShotClip {
            shot: "hero".into(),
            ..Default::default()
        };
        assert_eq!(c.shot_name(4), "hero");
    }

    #[test]
    fn test_shot_name_keeps_suffix() {
        let c = CreateShotClip {
            shot: "sh####_main".into(),
            count_from: 5,
            count_steps: 5,
            ..Default::default()
        };
        assert_eq!(c.shot_name(1), "sh0010_main");
    }

    #[test]
    fn test_hierarchy_and_clip_name() {
        let c = CreateShotClip::default();
        assert_eq!(c.hierarchy_path(1, "V1").unwrap(), "shots/sq01");
        assert_eq!(c.clip_name(1, "V1", "A001C003").unwrap(), "V1sq01sh020");
    }

    #[test]
    fn test_clip_rename_off() {
        let c = CreateShotClip {
            clip_rename: false,
            ..Default::default()
        };
        assert_eq!(c.clip_name(0, "V1", "A001C003").unwrap(), "A001C003");
    }

    #[test]
    fn test_unknown_hierarchy_token() {
        let c = CreateShotClip {
            hierarchy: "{folder}/{reel}".into(),
            ..Default::default()
        };
        assert!(c.hierarchy_path(0, "V1").is_err());
    }

    #[test]
    fn test_frame_range() {
        let r = CreateShotClip::default().frame_range(48);
        assert_eq!(r, FrameRange { start: 991, end: 1058 });
        assert_eq!(r.len(), 68);
        assert!(!r.is_empty());
    }
}
