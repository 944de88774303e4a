//! Application host and event handling
//!
//! This is the core of puzzlelab, managing:
//! - The action queue between the view and the reducer
//! - Keyboard and mouse input
//! - UI-only state: open menus, name editing, popups, flash messages

use crate::challenges;
use crate::config::Config;
use crate::dispatch::{self, Action, ChannelDispatcher, Dispatch};
use crate::editor::CursorMove;
use crate::state::{export_game, AppState, Env};
use crate::store::{load_saved_games, Store};
use crate::template;
use crate::types::{Challenge, ShareLinkState};
use crate::ui::{HitMap, Target, Theme};
use crate::view::{self, asset, handlers, Msg, Node, Outcome, Props, Ui};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

/// Main application state
pub struct App {
    pub should_quit: bool,
    pub config: Config,
    pub theme: Theme,
    pub state: AppState,
    pub challenges: Vec<Challenge>,

    env: Env,
    share_dir: PathBuf,
    dispatcher: ChannelDispatcher,
    actions: Receiver<Action>,

    // UI-only state
    pub menu: MenuState,
    pub name_draft: Option<String>,
    pub popup: PopupState,
    pub flash_message: Option<(String, bool, Instant)>, // (message, is_error, timestamp)

    last_tree: Option<Node>,
    hits: HitMap,
    share_copied_at: Option<Instant>,
}

/// Which dropdown and popout are expanded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuState {
    pub dropdown: Option<String>,
    pub popout: Option<String>,
}

impl MenuState {
    pub fn close(&mut self) {
        self.dropdown = None;
        self.popout = None;
    }

    pub fn is_open(&self) -> bool {
        self.dropdown.is_some()
    }
}

/// Popup overlay state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupState {
    None,
    Confirm {
        title: String,
        message: String,
        on_confirm: Vec<Action>,
    },
    Alert {
        title: String,
        message: String,
    },
}

/// Input mode, derived from the UI-only state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    EditName,
    AssetEditor,
    Confirm,
    Alert,
}

impl App {
    /// Create a new App instance
    pub fn new(config: Config, store: Box<dyn Store>, data_dir: PathBuf) -> Self {
        let saved_games = load_saved_games(store.as_ref());

        // Start from the most recently saved game, or a fresh template
        let latest = saved_games.first().cloned();
        let mut state = match latest {
            Some(game) => {
                let mut state = AppState::new(game.text(), saved_games, config.docs_open);
                state.name = game.name().to_string();
                state
            }
            None => AppState::new(template::NEW_GAME, saved_games, config.docs_open),
        };
        state.stale_run = true;

        let (dispatcher, actions) = dispatch::channel();
        let env = Env {
            store,
            export_dir: config.export_dir(),
        };

        Self {
            should_quit: false,
            theme: Theme::from_name(config.theme),
            config,
            state,
            challenges: challenges::builtin(),
            env,
            share_dir: data_dir.join("shared"),
            dispatcher,
            actions,
            menu: MenuState::default(),
            name_draft: None,
            popup: PopupState::None,
            flash_message: None,
            last_tree: None,
            hits: HitMap::default(),
            share_copied_at: None,
        }
    }

    /// Current input mode
    pub fn mode(&self) -> Mode {
        match &self.popup {
            PopupState::Confirm { .. } => Mode::Confirm,
            PopupState::Alert { .. } => Mode::Alert,
            PopupState::None if self.name_draft.is_some() => Mode::EditName,
            PopupState::None if self.state.editor.is_some() => Mode::AssetEditor,
            PopupState::None => Mode::Normal,
        }
    }

    /// Render the view tree for the current state
    pub fn view(&self) -> Ui {
        let props = Props {
            challenges: &self.challenges,
            links: &self.config.links,
        };
        view::render(&self.state, &props)
    }

    /// Keep the drawn tree and its click regions, then dispatch what the
    /// view asked for while rendering
    pub fn after_render(&mut self, ui: Ui, hits: HitMap) -> Result<()> {
        for effect in ui.effects {
            self.dispatcher.dispatch(effect);
        }
        self.last_tree = Some(ui.root);
        self.hits = hits;
        self.process()
    }

    /// Apply every queued action in order
    pub fn process(&mut self) -> Result<()> {
        loop {
            let pending: Vec<Action> = self.actions.try_iter().collect();
            if pending.is_empty() {
                break;
            }
            for action in pending {
                if let Err(e) = self.state.update(action, &mut self.env) {
                    self.show_error("Error", &format!("{:#}", e));
                }
            }
        }

        if self.state.share_link_state == Some(ShareLinkState::Loading) {
            self.complete_share();
            return self.process();
        }
        Ok(())
    }

    /// Timers: flash expiry and share label reset
    pub fn tick(&mut self) -> Result<()> {
        if let Some((_, _, instant)) = &self.flash_message {
            if instant.elapsed().as_secs() >= 3 {
                self.flash_message = None;
            }
        }

        if let Some(copied_at) = self.share_copied_at {
            if copied_at.elapsed() >= Duration::from_secs(self.config.share_link_seconds) {
                self.share_copied_at = None;
                self.dispatcher.dispatch(Action::ShareLinkIdle);
            }
        }

        self.process()
    }

    /// Handle a key event
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.mode() {
            Mode::Confirm => self.handle_confirm_key(key)?,
            Mode::Alert => self.handle_alert_key(key),
            Mode::EditName => self.handle_name_key(key),
            Mode::AssetEditor => self.handle_asset_key(key),
            Mode::Normal => self.handle_normal_key(key)?,
        }
        self.process()
    }

    /// Handle a mouse event
    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<()> {
        if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
            return Ok(());
        }

        // Any click moves focus away from the name field
        if self.name_draft.is_some() {
            self.commit_name();
        }

        match self.hits.hit(mouse.column, mouse.row).cloned() {
            Some(Target::Msg(msg)) => {
                if !matches!(msg, Msg::Toggle(_)) {
                    self.menu.close();
                }
                self.handle_msg(msg)?;
            }
            Some(Target::Sink) => {}
            None => self.menu.close(),
        }
        self.process()
    }

    /// Act on an intent coming from the view tree
    pub fn handle_msg(&mut self, msg: Msg) -> Result<()> {
        match msg {
            Msg::Dispatch(action) => self.dispatcher.dispatch(action),
            Msg::OpenFile(name) => {
                let outcome = handlers::open_file(&self.state, &name, &mut self.dispatcher);
                self.apply(outcome);
            }
            Msg::NewFile => {
                let outcome = handlers::new_file(&self.state, &mut self.dispatcher);
                self.apply(outcome);
            }
            Msg::DeleteFile(name) => {
                match handlers::delete_file(&self.state, &name, self.env.store.as_mut()) {
                    Ok(outcome) => self.apply(outcome),
                    Err(e) => self.show_error("Delete Failed", &format!("{:#}", e)),
                }
            }
            Msg::LoadChallenge(index) => {
                let outcome = handlers::load_challenge(
                    &self.state,
                    &self.challenges,
                    index,
                    &mut self.dispatcher,
                );
                self.apply(outcome);
            }
            Msg::NextChallenge => {
                let outcome =
                    handlers::next_challenge(&self.state, &self.challenges, &mut self.dispatcher);
                self.apply(outcome);
            }
            Msg::FollowLink(url) => self.show_flash(&format!("open {} in your browser", url), false),
            Msg::Toggle(id) => self.toggle(id),
            Msg::Edit => self.name_draft = Some(self.state.name.clone()),
        }
        Ok(())
    }

    fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Done => {}
            Outcome::Alert(message) => {
                self.popup = PopupState::Alert {
                    title: "Unsaved changes".into(),
                    message,
                };
            }
            Outcome::Confirm { message, on_confirm } => {
                self.popup = PopupState::Confirm {
                    title: "Confirm".into(),
                    message,
                    on_confirm,
                };
            }
        }
    }

    fn toggle(&mut self, id: String) {
        let is_popout = self
            .last_tree
            .as_ref()
            .and_then(|root| root.find_id(&id))
            .is_some_and(|node| node.has_class("popout-container"));

        if is_popout {
            self.menu.popout = if self.menu.popout.as_deref() == Some(id.as_str()) {
                None
            } else {
                Some(id)
            };
        } else if self.menu.dropdown.as_deref() == Some(id.as_str()) {
            self.menu.close();
        } else {
            self.menu.dropdown = Some(id);
            self.menu.popout = None;
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Result<()> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('q') if ctrl => self.should_quit = true,
            KeyCode::Char('s') if ctrl => self.dispatcher.dispatch(Action::Save),
            KeyCode::Char('r') if ctrl => self.dispatcher.dispatch(Action::Run),
            KeyCode::Char('n') if ctrl => self.handle_msg(Msg::NewFile)?,
            KeyCode::Char('l') if ctrl => self.handle_msg(Msg::NextChallenge)?,
            KeyCode::Char('e') if ctrl => self.open_asset_at_cursor(),
            KeyCode::F(5) => self.dispatcher.dispatch(Action::Run),
            KeyCode::F(1) => self.dispatcher.dispatch(Action::ToggleDocs),
            KeyCode::F(2) => self.handle_msg(Msg::Edit)?,
            KeyCode::F(9) => self.cycle_theme(),
            KeyCode::Esc => self.menu.close(),
            KeyCode::Left => self.dispatcher.dispatch(Action::MoveCursor(CursorMove::Left)),
            KeyCode::Right => self.dispatcher.dispatch(Action::MoveCursor(CursorMove::Right)),
            KeyCode::Up => self.dispatcher.dispatch(Action::MoveCursor(CursorMove::Up)),
            KeyCode::Down => self.dispatcher.dispatch(Action::MoveCursor(CursorMove::Down)),
            KeyCode::Home => self.dispatcher.dispatch(Action::MoveCursor(CursorMove::LineStart)),
            KeyCode::End => self.dispatcher.dispatch(Action::MoveCursor(CursorMove::LineEnd)),
            KeyCode::Enter => self.insert("\n"),
            KeyCode::Tab => self.insert("  "),
            KeyCode::Backspace => self.delete_around(true),
            KeyCode::Delete => self.delete_around(false),
            KeyCode::Char(c) if !ctrl => self.insert(c.encode_utf8(&mut [0; 4])),
            _ => {}
        }
        Ok(())
    }

    fn handle_name_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Tab => self.commit_name(),
            KeyCode::Esc => self.name_draft = None,
            KeyCode::Backspace => {
                if let Some(draft) = self.name_draft.as_mut() {
                    draft.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(draft) = self.name_draft.as_mut() {
                    draft.push(c);
                }
            }
            _ => {}
        }
    }

    fn handle_asset_key(&mut self, key: KeyEvent) {
        if let KeyCode::Esc | KeyCode::Char('q') = key.code {
            self.dispatcher.dispatch(Action::close_asset_editor());
        }
    }

    /// Handle keys in confirm popup
    fn handle_confirm_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                let popup = std::mem::replace(&mut self.popup, PopupState::None);
                if let PopupState::Confirm { on_confirm, .. } = popup {
                    for action in on_confirm {
                        self.dispatcher.dispatch(action);
                    }
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.popup = PopupState::None;
            }
            _ => {}
        }
        Ok(())
    }

    /// Handle keys in alert popup
    fn handle_alert_key(&mut self, key: KeyEvent) {
        if let KeyCode::Char('o') | KeyCode::Enter | KeyCode::Esc = key.code {
            self.popup = PopupState::None;
        }
    }

    // === HELPER METHODS ===

    /// The name field lost focus: hand its text to the node's blur handler
    fn commit_name(&mut self) {
        let Some(draft) = self.name_draft.take() else {
            return;
        };

        let handler = self
            .last_tree
            .as_ref()
            .and_then(|root| root.find_class("menu-name"))
            .and_then(|node| node.on_blur);

        if let Some(handler) = handler {
            self.dispatcher.dispatch(handler(draft));
        }
    }

    fn insert(&mut self, text: &str) {
        let cursor = self.state.code.cursor();
        self.dispatcher.dispatch(Action::SetEditorText {
            text: text.to_string(),
            range: cursor..cursor,
            new_document: false,
        });
    }

    fn delete_around(&mut self, backwards: bool) {
        let cursor = self.state.code.cursor();
        let text = self.state.code.text();

        let range = if backwards {
            text[..cursor].char_indices().next_back().map(|(i, _)| i..cursor)
        } else {
            text[cursor..].chars().next().map(|c| cursor..cursor + c.len_utf8())
        };

        if let Some(range) = range {
            self.dispatcher.dispatch(Action::SetEditorText {
                text: String::new(),
                range,
                new_document: false,
            });
        }
    }

    fn open_asset_at_cursor(&mut self) {
        let code = &self.state.code;
        let action = code
            .literal_at(code.cursor())
            .map(|literal| asset::open_literal(code.text(), &literal));

        match action {
            Some(action) => self.dispatcher.dispatch(action),
            None => self.show_flash("No asset under the cursor", true),
        }
    }

    fn cycle_theme(&mut self) {
        self.config.theme = self.config.theme.next();
        self.theme = Theme::from_name(self.config.theme);

        if let Err(e) = self.config.save() {
            self.show_error("Save Failed", &e.to_string());
        } else {
            self.show_flash(&format!("Theme: {}", self.config.theme.as_str()), false);
        }
    }

    /// Produce a share link for the current game
    fn complete_share(&mut self) {
        match export_game(&self.share_dir, &self.state.name, self.state.code.text()) {
            Ok(path) => {
                self.dispatcher.dispatch(Action::ShareLinkReady {
                    link: format!("file://{}", path.display()),
                });
                self.share_copied_at = Some(Instant::now());
            }
            Err(e) => {
                self.dispatcher.dispatch(Action::ShareLinkIdle);
                self.show_error("Share Failed", &format!("{:#}", e));
            }
        }
    }

    /// Show an error popup
    fn show_error(&mut self, title: &str, message: &str) {
        self.popup = PopupState::Alert {
            title: title.into(),
            message: message.into(),
        };
    }

    /// Show a flash message
    fn show_flash(&mut self, message: &str, is_error: bool) {
        self.flash_message = Some((message.into(), is_error, Instant::now()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, ReadOnlyStore};
    use crate::types::SavedGame;
    use crossterm::event::KeyEventState;
    use ratatui::layout::Rect;

    fn app_with(games: Vec<SavedGame>) -> App {
        let mut store = MemoryStore::default();
        crate::store::write_saved_games(&mut store, &games).unwrap();
        let dir = std::env::temp_dir().join(format!("puzzlelab-app-{}", std::process::id()));
        let mut config = Config::default();
        config.export_dir = Some(dir.clone());
        App::new(config, Box::new(store), dir)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: crossterm::event::KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_failed_delete_shows_error_popup() {
        let games = vec![SavedGame::new("a", "1"), SavedGame::new("b", "2")];
        let dir = std::env::temp_dir().join(format!("puzzlelab-ro-{}", std::process::id()));
        let mut app = App::new(
            Config::default(),
            Box::new(ReadOnlyStore::with_games(&games)),
            dir,
        );

        app.handle_msg(Msg::DeleteFile("a".into())).unwrap();
        app.process().unwrap();

        assert_eq!(app.mode(), Mode::Alert);
        match &app.popup {
            PopupState::Alert { title, message } => {
                assert_eq!(title, "Delete Failed");
                assert!(message.contains("disk full"));
            }
            other => panic!("expected alert, got {:?}", other),
        }
        assert_eq!(app.state.saved_games, games);
    }

    #[test]
    fn test_starts_from_latest_save() {
        let app = app_with(vec![SavedGame::new("maze", "let a;"), SavedGame::new("old", "")]);
        assert_eq!(app.state.name, "maze");
        assert_eq!(app.state.code.text(), "let a;");

        let fresh = app_with(Vec::new());
        assert_eq!(fresh.state.code.text(), template::NEW_GAME);
        assert_eq!(fresh.state.name, "game_name");
    }

    #[test]
    fn test_open_file_runs_full_sequence() {
        let mut app = app_with(vec![SavedGame::new("a", "first"), SavedGame::new("b", "second")]);
        app.handle_msg(Msg::OpenFile("b".into())).unwrap();
        app.process().unwrap();

        assert_eq!(app.state.code.text(), "second");
        assert!(app.state.stale_run);
        assert!(!app.state.stale);
        assert_eq!(app.state.generation, 1);
        assert!(app.state.logs[0].ends_with("(0 lines)"));
    }

    #[test]
    fn test_stale_open_raises_alert() {
        let mut app = app_with(vec![SavedGame::new("a", "first")]);
        app.handle_key(key(KeyCode::Char('x'))).unwrap();
        assert!(app.state.stale);

        app.handle_msg(Msg::OpenFile("a".into())).unwrap();
        app.process().unwrap();
        assert_eq!(app.mode(), Mode::Alert);
        assert_eq!(app.state.code.text(), "xfirst");

        app.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(app.mode(), Mode::Normal);
    }

    #[test]
    fn test_delete_confirm_and_decline() {
        let mut app = app_with(vec![SavedGame::new("a", "1"), SavedGame::new("b", "2")]);

        app.handle_msg(Msg::DeleteFile("a".into())).unwrap();
        assert_eq!(app.mode(), Mode::Confirm);
        app.handle_key(key(KeyCode::Char('n'))).unwrap();
        assert_eq!(app.state.saved_games.len(), 2);
        assert_eq!(load_saved_games(app.env.store.as_ref()).len(), 1);

        app.handle_msg(Msg::DeleteFile("a".into())).unwrap();
        app.handle_key(key(KeyCode::Char('y'))).unwrap();
        assert_eq!(app.state.saved_games, vec![SavedGame::new("b", "2")]);
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut app = app_with(vec![SavedGame::new("a", "")]);
        app.handle_key(key(KeyCode::Char('h'))).unwrap();
        app.handle_key(key(KeyCode::Char('é'))).unwrap();
        app.handle_key(key(KeyCode::Backspace)).unwrap();
        assert_eq!(app.state.code.text(), "h");
        assert!(app.state.stale);
    }

    #[test]
    fn test_name_edit_commits_through_blur_handler() {
        let mut app = app_with(Vec::new());
        let ui = app.view();
        app.after_render(ui, HitMap::default()).unwrap();

        app.handle_msg(Msg::Edit).unwrap();
        app.name_draft = Some("castle".into());
        app.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(app.state.name, "castle");
        assert_eq!(app.mode(), Mode::Normal);
    }

    #[test]
    fn test_backdrop_click_closes_panel_click_keeps() {
        let mut app = app_with(Vec::new());
        app.dispatcher.dispatch(Action::SetAssetEditor {
            kind: Some(crate::types::AssetKind::Bitmap),
            text: Some("..".into()),
        });
        app.process().unwrap();

        let mut hits = HitMap::default();
        hits.push(
            Rect::new(0, 0, 80, 24),
            Target::Msg(Msg::Dispatch(Action::close_asset_editor())),
        );
        hits.push(Rect::new(10, 5, 40, 10), Target::Sink);
        let ui = app.view();
        app.after_render(ui, hits.clone()).unwrap();

        app.handle_mouse(click(20, 8)).unwrap();
        assert!(app.state.editor.is_some());

        app.handle_mouse(click(1, 1)).unwrap();
        assert!(app.state.editor.is_none());
    }

    #[test]
    fn test_toggle_dropdown_and_popout() {
        let mut app = app_with(Vec::new());
        let ui = app.view();
        app.after_render(ui, HitMap::default()).unwrap();

        app.handle_msg(Msg::Toggle(view::menu::FILE_MENU.into())).unwrap();
        app.handle_msg(Msg::Toggle(view::menu::SHARE.into())).unwrap();
        assert_eq!(app.menu.dropdown.as_deref(), Some(view::menu::FILE_MENU));
        assert_eq!(app.menu.popout.as_deref(), Some(view::menu::SHARE));

        app.handle_msg(Msg::Toggle(view::menu::FILE_MENU.into())).unwrap();
        assert!(!app.menu.is_open());
    }

    #[test]
    fn test_render_effects_fold_literals() {
        let mut app = app_with(Vec::new());
        let ui = app.view();
        app.after_render(ui, HitMap::default()).unwrap();
        assert_eq!(app.state.code.fold_count(), 2);
    }
}
