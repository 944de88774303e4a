//! Application state and the reducer
//!
//! `AppState` is everything the view reads. `AppState::update` is the only
//! place it changes: every menu click, key press and guarded handler ends
//! up here as an `Action`.

use crate::dispatch::Action;
use crate::editor::{EditorBuffer, DRAFT_TITLE};
use crate::store::{write_saved_games, Store};
use crate::types::{AssetEditor, SavedGame, ShareLinkState};
use anyhow::{Context, Result};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

/// Side-effect targets the reducer writes to
pub struct Env {
    pub store: Box<dyn Store>,
    pub export_dir: PathBuf,
}

/// Application state shared between the reducer and the view
#[derive(Debug, Clone)]
pub struct AppState {
    pub code: EditorBuffer,
    pub logs: Vec<String>,
    pub error_info: Option<String>,
    pub editor: Option<AssetEditor>,
    pub saved_games: Vec<SavedGame>,
    pub name: String,
    /// Edits not yet saved
    pub stale: bool,
    /// Edits not yet run
    pub stale_run: bool,
    pub share_link_state: Option<ShareLinkState>,
    pub share_link: Option<String>,
    pub docs_open: bool,
    /// Bumped on every `Render`
    pub generation: u64,
}

impl AppState {
    pub fn new(text: impl Into<String>, saved_games: Vec<SavedGame>, docs_open: bool) -> Self {
        let code = EditorBuffer::new(text);
        let name = code.title().to_string();

        Self {
            code,
            logs: Vec::new(),
            error_info: None,
            editor: None,
            saved_games,
            name,
            stale: false,
            stale_run: true,
            share_link_state: Some(ShareLinkState::Idle),
            share_link: None,
            docs_open,
            generation: 0,
        }
    }

    /// Text of the last saved game with this name
    pub fn saved_text(&self, name: &str) -> Option<&str> {
        self.saved_games
            .iter()
            .rev()
            .find(|game| game.name() == name)
            .map(SavedGame::text)
    }

    /// Apply one action
    pub fn update(&mut self, action: Action, env: &mut Env) -> Result<()> {
        match action {
            Action::SetName { name } => {
                let name = name.trim();
                self.name = if name.is_empty() {
                    DRAFT_TITLE.to_string()
                } else {
                    name.to_string()
                };
            }
            Action::SetEditorText { text, range, new_document } => {
                self.code.replace(range, &text);
                if !new_document {
                    self.stale = true;
                }
                self.stale_run = true;
            }
            Action::MoveCursor(movement) => self.code.move_cursor(movement),
            Action::Run => self.run(),
            Action::Render => self.generation += 1,
            Action::Save => {
                let game = SavedGame::new(self.name.clone(), self.code.text());
                let mut games = vec![game];
                games.extend(
                    self.saved_games
                        .iter()
                        .filter(|g| g.name() != self.name)
                        .cloned(),
                );
                write_saved_games(env.store.as_mut(), &games)?;
                self.saved_games = games;
                self.stale = false;
                self.logs.push(format!("saved \"{}\"", self.name));
            }
            Action::SaveToFile => {
                let path = export_game(&env.export_dir, &self.name, self.code.text())?;
                self.logs.push(format!("wrote {}", path.display()));
            }
            Action::GetUrl => self.share_link_state = Some(ShareLinkState::Loading),
            Action::ShareLinkReady { link } => {
                self.logs.push(format!("share link: {}", link));
                self.share_link = Some(link);
                self.share_link_state = Some(ShareLinkState::Copied);
            }
            Action::ShareLinkIdle => self.share_link_state = Some(ShareLinkState::Idle),
            Action::Upload => {
                let message = "upload to device: no device connected".to_string();
                self.logs.push(message.clone());
                self.error_info = Some(message);
            }
            Action::SetAssetEditor { kind, text } => {
                self.editor = kind.map(|kind| AssetEditor {
                    kind,
                    text: text.unwrap_or_default(),
                });
            }
            Action::FoldRange { from, to } => {
                self.code.fold_range(from, to);
            }
            Action::SetSavedGames(games) => self.saved_games = games,
            Action::ToggleDocs => self.docs_open = !self.docs_open,
        }
        Ok(())
    }

    /// Stand-in for the game runtime: checks the source and logs the run
    fn run(&mut self) {
        self.logs.clear();
        self.error_info = None;
        self.stale_run = false;

        let text = self.code.text();
        if text.matches('`').count() % 2 == 1 {
            let message = "SyntaxError: unterminated template literal".to_string();
            self.logs.push(message.clone());
            self.error_info = Some(message);
            return;
        }

        self.logs.push(format!(
            "[{}] ran \"{}\" ({} lines)",
            Local::now().format("%H:%M:%S"),
            self.name,
            text.lines().count()
        ));
    }
}

/// Write a game to `<dir>/<name>.js`
pub fn export_game(dir: &Path, name: &str, text: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;

    let path = dir.join(format!("{}.js", file_stem(name)));
    fs::write(&path, text).with_context(|| format!("Failed to write game to {:?}", path))?;
    Ok(path)
}

/// File-system safe version of a game name
fn file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if stem.is_empty() {
        DRAFT_TITLE.to_string()
    } else {
        stem
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{load_saved_games, MemoryStore, ReadOnlyStore};
    use crate::types::AssetKind;

    fn env() -> Env {
        Env {
            store: Box::new(MemoryStore::default()),
            export_dir: std::env::temp_dir(),
        }
    }

    fn edit(text: &str, range: std::ops::Range<usize>, new_document: bool) -> Action {
        Action::SetEditorText {
            text: text.into(),
            range,
            new_document,
        }
    }

    #[test]
    fn test_failed_save_keeps_list_unchanged() {
        let games = vec![SavedGame::new("a", "1"), SavedGame::new("b", "2")];
        let mut env = Env {
            store: Box::new(ReadOnlyStore::with_games(&games)),
            export_dir: std::env::temp_dir(),
        };
        let mut state = AppState::new("1", games.clone(), true);
        state.update(Action::SetName { name: "c".into() }, &mut env).unwrap();
        state.update(edit("x", 0..0, false), &mut env).unwrap();

        let err = state.update(Action::Save, &mut env).unwrap_err();
        assert_eq!(err.to_string(), "disk full");
        assert_eq!(state.saved_games, games);
        assert_eq!(load_saved_games(env.store.as_ref()), games);
        assert!(state.stale);
    }

    #[test]
    fn test_new_state_takes_title() {
        let state = AppState::new("/*\n@title: maze\n*/", Vec::new(), true);
        assert_eq!(state.name, "maze");
        assert!(!state.stale);
    }

    #[test]
    fn test_user_edit_marks_both_stale_flags() {
        let mut state = AppState::new("", Vec::new(), true);
        let mut env = env();
        state.update(Action::Run, &mut env).unwrap();
        assert!(!state.stale_run);

        state.update(edit("x", 0..0, false), &mut env).unwrap();
        assert!(state.stale);
        assert!(state.stale_run);
    }

    #[test]
    fn test_document_load_marks_only_stale_run() {
        let mut state = AppState::new("old", Vec::new(), true);
        let mut env = env();
        state.update(Action::Run, &mut env).unwrap();
        state.update(edit("new", 0..3, true), &mut env).unwrap();
        assert!(!state.stale);
        assert!(state.stale_run);
        assert_eq!(state.code.text(), "new");
    }

    #[test]
    fn test_run_between_clear_and_load_sees_empty_buffer() {
        let mut state = AppState::new("a\nb\nc", Vec::new(), true);
        let mut env = env();
        let len = state.code.len();
        state.update(edit("", 0..len, true), &mut env).unwrap();
        state.update(Action::Run, &mut env).unwrap();
        assert!(state.logs[0].ends_with("(0 lines)"));
        state.update(edit("x\ny", 0..0, true), &mut env).unwrap();
        state.update(Action::Render, &mut env).unwrap();
        assert_eq!(state.code.text(), "x\ny");
        assert!(state.stale_run);
        assert_eq!(state.generation, 1);
    }

    #[test]
    fn test_run_flags_unterminated_literal() {
        let mut state = AppState::new("bitmap`...", Vec::new(), true);
        state.update(Action::Run, &mut env()).unwrap();
        assert!(state.error_info.is_some());
    }

    #[test]
    fn test_save_upserts_and_clears_stale() {
        let mut state = AppState::new("", vec![SavedGame::new("maze", "old")], true);
        let mut env = env();
        state.update(Action::SetName { name: " maze ".into() }, &mut env).unwrap();
        state.update(edit("new", 0..0, false), &mut env).unwrap();
        state.update(Action::Save, &mut env).unwrap();

        assert!(!state.stale);
        assert_eq!(state.saved_games, vec![SavedGame::new("maze", "new")]);
        assert_eq!(load_saved_games(env.store.as_ref()), state.saved_games);
    }

    #[test]
    fn test_saved_text_prefers_last_entry() {
        let state = AppState::new(
            "",
            vec![SavedGame::new("a", "first"), SavedGame::new("a", "second")],
            true,
        );
        assert_eq!(state.saved_text("a"), Some("second"));
        assert_eq!(state.saved_text("b"), None);
    }

    #[test]
    fn test_asset_editor_open_and_close() {
        let mut state = AppState::new("", Vec::new(), true);
        let mut env = env();
        state
            .update(
                Action::SetAssetEditor {
                    kind: Some(AssetKind::Map),
                    text: Some("p.".into()),
                },
                &mut env,
            )
            .unwrap();
        assert_eq!(state.editor.as_ref().map(|e| e.text.as_str()), Some("p."));

        state.update(Action::close_asset_editor(), &mut env).unwrap();
        assert!(state.editor.is_none());
    }

    #[test]
    fn test_share_link_cycle() {
        let mut state = AppState::new("", Vec::new(), true);
        let mut env = env();
        state.update(Action::GetUrl, &mut env).unwrap();
        assert_eq!(state.share_link_state, Some(ShareLinkState::Loading));
        state
            .update(Action::ShareLinkReady { link: "file:///tmp/x.js".into() }, &mut env)
            .unwrap();
        assert_eq!(state.share_link_state, Some(ShareLinkState::Copied));
        state.update(Action::ShareLinkIdle, &mut env).unwrap();
        assert_eq!(state.share_link_state, Some(ShareLinkState::Idle));
    }

    #[test]
    fn test_file_stem_sanitizes() {
        assert_eq!(file_stem("my game/v2"), "my_game_v2");
        assert_eq!(file_stem(""), DRAFT_TITLE);
    }
}
