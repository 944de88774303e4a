//! Intent messages and the channel they travel over
//!
//! The view and its handlers never touch application state. They describe
//! what should happen as an `Action` and hand it to a `Dispatch`
//! implementation; the host drains the queue into `AppState::update`.

use crate::editor::CursorMove;
use crate::types::{AssetKind, SavedGame};
use std::ops::Range;
use std::sync::mpsc::{self, Receiver, Sender};

/// A requested state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetName {
        name: String,
    },
    /// Replace `range` of the editor text. `new_document` marks a load
    /// (file switch, template, lesson) rather than a user edit.
    SetEditorText {
        text: String,
        range: Range<usize>,
        new_document: bool,
    },
    MoveCursor(CursorMove),
    Run,
    Render,
    Save,
    SaveToFile,
    GetUrl,
    ShareLinkReady {
        link: String,
    },
    ShareLinkIdle,
    Upload,
    /// `kind: None` closes the asset editor
    SetAssetEditor {
        kind: Option<AssetKind>,
        text: Option<String>,
    },
    FoldRange {
        from: usize,
        to: usize,
    },
    SetSavedGames(Vec<SavedGame>),
    ToggleDocs,
}

impl Action {
    /// Action that closes the asset editor overlay
    pub fn close_asset_editor() -> Self {
        Action::SetAssetEditor {
            kind: None,
            text: None,
        }
    }

    /// Short name used in log lines
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetName { .. } => "SET_NAME",
            Action::SetEditorText { .. } => "SET_EDITOR_TEXT",
            Action::MoveCursor(_) => "MOVE_CURSOR",
            Action::Run => "RUN",
            Action::Render => "RENDER",
            Action::Save => "SAVE",
            Action::SaveToFile => "SAVE_TO_FILE",
            Action::GetUrl => "GET_URL",
            Action::ShareLinkReady { .. } => "SHARE_LINK_READY",
            Action::ShareLinkIdle => "SHARE_LINK_IDLE",
            Action::Upload => "UPLOAD",
            Action::SetAssetEditor { .. } => "SET_ASSET_EDITOR",
            Action::FoldRange { .. } => "FOLD_RANGE",
            Action::SetSavedGames(_) => "SET_SAVED_GAMES",
            Action::ToggleDocs => "TOGGLE_DOCS",
        }
    }
}

/// Sink for actions
pub trait Dispatch {
    fn dispatch(&mut self, action: Action);
}

/// Collecting actions into a vector; used for batching and in tests
impl Dispatch for Vec<Action> {
    fn dispatch(&mut self, action: Action) {
        self.push(action);
    }
}

/// Sending half of the action queue
#[derive(Debug, Clone)]
pub struct ChannelDispatcher {
    tx: Sender<Action>,
}

impl Dispatch for ChannelDispatcher {
    fn dispatch(&mut self, action: Action) {
        // The receiver lives as long as the app; a closed queue means we are shutting down
        let _ = self.tx.send(action);
    }
}

/// Create the action queue: a dispatcher and the receiver the host drains
pub fn channel() -> (ChannelDispatcher, Receiver<Action>) {
    let (tx, rx) = mpsc::channel();
    (ChannelDispatcher { tx }, rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_preserves_order() {
        let (mut dispatcher, rx) = channel();
        dispatcher.dispatch(Action::Run);
        dispatcher.dispatch(Action::Render);
        let got: Vec<Action> = rx.try_iter().collect();
        assert_eq!(got, vec![Action::Run, Action::Render]);
    }

    #[test]
    fn test_close_action() {
        assert_eq!(
            Action::close_asset_editor(),
            Action::SetAssetEditor { kind: None, text: None }
        );
        assert_eq!(Action::close_asset_editor().name(), "SET_ASSET_EDITOR");
    }
}
