//! Guarded menu actions
//!
//! Each handler reads the state, then either issues dispatch calls, asks
//! the host to warn the user, or asks for a confirmation carrying the
//! actions to send on "yes". None of them write state.

use crate::dispatch::{Action, Dispatch};
use crate::editor::title_of;
use crate::state::AppState;
use crate::store::{write_saved_games, Store};
use crate::template;
use crate::types::{Challenge, SavedGame};
use anyhow::Result;

pub const UNSAVED_SWITCH: &str =
    "You have unsaved changes! Please save your work before switching files.";
pub const UNSAVED_NEW: &str =
    "You have unsaved changes! Please save your work before creating a new file.";

/// What the host should do after a handler ran
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// Blocking warning; nothing was dispatched
    Alert(String),
    /// Ask the user; send `on_confirm` only if they agree
    Confirm {
        message: String,
        on_confirm: Vec<Action>,
    },
}

/// Load a saved game into the editor
pub fn open_file(state: &AppState, name: &str, dispatch: &mut dyn Dispatch) -> Outcome {
    if state.stale {
        return Outcome::Alert(UNSAVED_SWITCH.into());
    }

    let text = state.saved_text(name).unwrap_or_default().to_string();
    load_document(state, text, dispatch);
    Outcome::Done
}

/// Replace the editor contents with the default game template
pub fn new_file(state: &AppState, dispatch: &mut dyn Dispatch) -> Outcome {
    if state.stale {
        return Outcome::Alert(UNSAVED_NEW.into());
    }

    load_document(state, template::NEW_GAME.to_string(), dispatch);
    Outcome::Done
}

// Clear and run first so the runtime drops the old game, then load and render.
fn load_document(state: &AppState, text: String, dispatch: &mut dyn Dispatch) {
    dispatch.dispatch(Action::SetEditorText {
        text: String::new(),
        range: 0..state.code.len(),
        new_document: true,
    });
    dispatch.dispatch(Action::Run);
    dispatch.dispatch(Action::SetEditorText {
        text,
        range: 0..0,
        new_document: true,
    });
    dispatch.dispatch(Action::Render);
}

/// Remove every saved game with this name.
///
/// Storage is written before the user is asked; declining leaves the
/// in-memory list untouched while storage already lacks the file.
pub fn delete_file(state: &AppState, name: &str, store: &mut dyn Store) -> Result<Outcome> {
    let remaining: Vec<SavedGame> = state
        .saved_games
        .iter()
        .filter(|game| game.name() != name)
        .cloned()
        .collect();

    write_saved_games(store, &remaining)?;

    Ok(Outcome::Confirm {
        message: format!("Do you want to delete: {}?", name),
        on_confirm: vec![Action::SetSavedGames(remaining), Action::Render],
    })
}

/// Load lesson `index`, asking first if it would overwrite an edited copy
pub fn load_challenge(
    state: &AppState,
    challenges: &[Challenge],
    index: usize,
    dispatch: &mut dyn Dispatch,
) -> Outcome {
    let Some(challenge) = challenges.get(index) else {
        return Outcome::Done;
    };

    let load = replace_all(state, &challenge.content);
    if title_of(state.code.text()) == challenge.name {
        return Outcome::Confirm {
            message: format!(
                "are you sure you want to overwrite your edited \"{}\"?",
                challenge.name
            ),
            on_confirm: vec![load],
        };
    }

    dispatch.dispatch(load);
    Outcome::Done
}

/// Load the lesson following the current one
pub fn next_challenge(
    state: &AppState,
    challenges: &[Challenge],
    dispatch: &mut dyn Dispatch,
) -> Outcome {
    let current = title_of(state.code.text());

    let next = challenges
        .windows(2)
        .find(|pair| pair[0].name == current)
        .map(|pair| &pair[1]);

    if let Some(next) = next {
        dispatch.dispatch(replace_all(state, &next.content));
    }
    Outcome::Done
}

fn replace_all(state: &AppState, content: &str) -> Action {
    Action::SetEditorText {
        text: content.trim().to_string(),
        range: 0..state.code.len(),
        new_document: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{load_saved_games, MemoryStore};

    fn state_with_files() -> AppState {
        AppState::new(
            "current text",
            vec![
                SavedGame::new("foo", "foo text"),
                SavedGame::new("bar", "bar text"),
                SavedGame::new("foo", "foo again"),
            ],
            true,
        )
    }

    fn lessons() -> Vec<Challenge> {
        vec![
            Challenge::new("one", "\n@title: one\nfirst\n"),
            Challenge::new("two", "@title: two\nsecond"),
        ]
    }

    #[test]
    fn test_stale_blocks_switch_and_new() {
        let mut state = state_with_files();
        state.stale = true;
        let before = state.code.text().to_string();

        let mut sent = Vec::new();
        assert_eq!(open_file(&state, "bar", &mut sent), Outcome::Alert(UNSAVED_SWITCH.into()));
        assert_eq!(new_file(&state, &mut sent), Outcome::Alert(UNSAVED_NEW.into()));
        assert!(sent.is_empty());
        assert_eq!(state.code.text(), before);
    }

    #[test]
    fn test_switch_dispatch_order() {
        let state = state_with_files();
        let mut sent = Vec::new();
        assert_eq!(open_file(&state, "bar", &mut sent), Outcome::Done);
        assert_eq!(
            sent,
            vec![
                Action::SetEditorText {
                    text: String::new(),
                    range: 0..12,
                    new_document: true
                },
                Action::Run,
                Action::SetEditorText {
                    text: "bar text".into(),
                    range: 0..0,
                    new_document: true
                },
                Action::Render,
            ]
        );
    }

    #[test]
    fn test_switch_uses_last_duplicate() {
        let state = state_with_files();
        let mut sent = Vec::new();
        open_file(&state, "foo", &mut sent);
        assert!(matches!(&sent[2], Action::SetEditorText { text, .. } if text == "foo again"));
    }

    #[test]
    fn test_switch_to_unknown_file_loads_empty() {
        let state = state_with_files();
        let mut sent = Vec::new();
        open_file(&state, "nope", &mut sent);
        assert!(matches!(&sent[2], Action::SetEditorText { text, .. } if text.is_empty()));
    }

    #[test]
    fn test_new_file_loads_template() {
        let state = state_with_files();
        let mut sent = Vec::new();
        new_file(&state, &mut sent);
        assert_eq!(sent.len(), 4);
        assert!(
            matches!(&sent[2], Action::SetEditorText { text, range, .. } if text == template::NEW_GAME && *range == (0..0))
        );
    }

    #[test]
    fn test_declined_delete_still_writes_storage() {
        let state = state_with_files();
        let mut store = MemoryStore::default();

        let outcome = delete_file(&state, "foo", &mut store).unwrap();
        let Outcome::Confirm { message, on_confirm } = outcome else {
            panic!("delete must ask for confirmation");
        };
        assert_eq!(message, "Do you want to delete: foo?");

        // Storage already holds the filtered list, memory is untouched until "yes"
        assert_eq!(load_saved_games(&store), vec![SavedGame::new("bar", "bar text")]);
        assert_eq!(state.saved_games.len(), 3);
        assert_eq!(
            on_confirm,
            vec![
                Action::SetSavedGames(vec![SavedGame::new("bar", "bar text")]),
                Action::Render
            ]
        );
    }

    #[test]
    fn test_load_challenge_confirms_on_same_title() {
        let state = AppState::new("@title: one\nedited", Vec::new(), true);
        let mut sent = Vec::new();
        let outcome = load_challenge(&state, &lessons(), 0, &mut sent);
        assert!(sent.is_empty());
        match outcome {
            Outcome::Confirm { message, on_confirm } => {
                assert_eq!(message, "are you sure you want to overwrite your edited \"one\"?");
                assert_eq!(
                    on_confirm,
                    vec![Action::SetEditorText {
                        text: "@title: one\nfirst".into(),
                        range: 0..18,
                        new_document: true
                    }]
                );
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_load_challenge_direct_when_title_differs() {
        let state = AppState::new("draft", Vec::new(), true);
        let mut sent = Vec::new();
        assert_eq!(load_challenge(&state, &lessons(), 1, &mut sent), Outcome::Done);
        assert_eq!(sent.len(), 1);
        assert_eq!(load_challenge(&state, &lessons(), 9, &mut sent), Outcome::Done);
        assert_eq!(sent.len(), 1);
    }

    #[test]
    fn test_next_challenge() {
        let state = AppState::new("@title: one\n", Vec::new(), true);
        let mut sent = Vec::new();
        next_challenge(&state, &lessons(), &mut sent);
        assert!(matches!(&sent[0], Action::SetEditorText { text, .. } if text == "@title: two\nsecond"));

        let last = AppState::new("@title: two\n", Vec::new(), true);
        let mut sent = Vec::new();
        next_challenge(&last, &lessons(), &mut sent);
        assert!(sent.is_empty());
    }
}
