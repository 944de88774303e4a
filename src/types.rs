//! Core data types for puzzlelab
//!
//! This module defines the shared data structures used throughout the application.

use serde::{Deserialize, Serialize};

/// Longest file name shown in the file list before it is cut
pub const NAME_DISPLAY_LIMIT: usize = 15;

/// A saved game as stored under the `puzzle-lab` key: `[name, text]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedGame(pub String, pub String);

impl SavedGame {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self(name.into(), text.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn text(&self) -> &str {
        &self.1
    }

    /// Name as shown in the file list
    pub fn display_name(&self) -> String {
        truncate_name(&self.0)
    }
}

/// Progress of the "share as link" action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShareLinkState {
    #[default]
    Idle,
    Loading,
    Copied,
}

impl ShareLinkState {
    pub fn label(&self) -> &'static str {
        match self {
            ShareLinkState::Idle => "as link",
            ShareLinkState::Loading => "loading...",
            ShareLinkState::Copied => "copied!",
        }
    }
}

/// Kind of asset sub-editor shown in the overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetKind {
    Bitmap,
    Sequencer,
    Map,
    /// Anything else; renders no editor
    Unknown(String),
}

impl AssetKind {
    /// Resolve an editor type name
    pub fn from_name(name: &str) -> Self {
        match name {
            "bitmap" => AssetKind::Bitmap,
            "sequencer" => AssetKind::Sequencer,
            "map" => AssetKind::Map,
            other => AssetKind::Unknown(other.to_string()),
        }
    }

    /// Resolve the tag in front of an asset literal (`bitmap`, `map`, `tune`)
    pub fn for_literal(tag: &str) -> Self {
        match tag {
            "tune" => AssetKind::Sequencer,
            other => Self::from_name(other),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            AssetKind::Bitmap => "bitmap",
            AssetKind::Sequencer => "sequencer",
            AssetKind::Map => "map",
            AssetKind::Unknown(name) => name,
        }
    }
}

/// Open asset editor: what is edited and its source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEditor {
    pub kind: AssetKind,
    pub text: String,
}

/// A lesson shown in the learn menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub name: String,
    pub content: String,
}

impl Challenge {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Cut a name to the display limit, marking the cut with `...`
pub fn truncate_name(name: &str) -> String {
    if name.chars().count() > NAME_DISPLAY_LIMIT {
        let head: String = name.chars().take(NAME_DISPLAY_LIMIT).collect();
        format!("{}...", head)
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("abcdefghijklmnopqrstuvwxyz"), "abcdefghijklmno...");
        assert_eq!(truncate_name("abcdefghijklmno"), "abcdefghijklmno");
        assert_eq!(truncate_name("short"), "short");
    }

    #[test]
    fn test_saved_game_json_shape() {
        let games = vec![SavedGame::new("maze", "setMap(levels[0]);")];
        let json = serde_json::to_string(&games).unwrap();
        assert_eq!(json, r#"[["maze","setMap(levels[0]);"]]"#);
    }

    #[test]
    fn test_share_labels() {
        assert_eq!(ShareLinkState::Idle.label(), "as link");
        assert_eq!(ShareLinkState::Loading.label(), "loading...");
        assert_eq!(ShareLinkState::Copied.label(), "copied!");
    }

    #[test]
    fn test_asset_kind_names() {
        assert_eq!(AssetKind::from_name("bitmap"), AssetKind::Bitmap);
        assert_eq!(AssetKind::from_name("tune"), AssetKind::Unknown("tune".into()));
        assert_eq!(AssetKind::for_literal("tune"), AssetKind::Sequencer);
        assert_eq!(AssetKind::for_literal("map"), AssetKind::Map);
    }
}
