//! Menu bar: file dropdown, name, run, learn and help

use super::node::{Msg, Node};
use super::Props;
use crate::dispatch::Action;
use crate::state::AppState;
use crate::types::{Challenge, SavedGame, ShareLinkState};

pub const FILE_MENU: &str = "file-menu";
pub const LEARN_MENU: &str = "learn-menu";
pub const OPEN_RECENT: &str = "open-recent";
pub const SHARE: &str = "share";

pub fn menu(state: &AppState, props: &Props, effects: &mut Vec<Action>) -> Node {
    Node::div()
        .class("menu")
        .child(file_menu(state, effects))
        .child(editable_name(state))
        .child(
            Node::link(props.links.gallery.clone())
                .class("menu-item")
                .text("explore gallery"),
        )
        .child(
            Node::div()
                .class("menu-item")
                .text("upload to device")
                .on_click(Msg::Dispatch(Action::Upload)),
        )
        .child(run_item(state))
        .child(learn(props.challenges))
        .child(next())
        .child(Node::div().class("spacer").attr("aria-hidden", "true"))
        .child(
            Node::div()
                .class("menu-item")
                .class("docs-trigger")
                .text(format!("{} help", if state.docs_open { "close" } else { "open" }))
                .on_click(Msg::Dispatch(Action::ToggleDocs)),
        )
        .child(
            Node::link(props.links.repository.clone())
                .class("menu-item")
                .text("github"),
        )
}

fn file_menu(state: &AppState, effects: &mut Vec<Action>) -> Node {
    let dropdown = Node::div()
        .class("dropdown-list")
        .child(new_file(state, effects))
        .child(
            Node::div()
                .class("popout-container")
                .id(OPEN_RECENT)
                .text("open recent ›")
                .on_click(Msg::Toggle(OPEN_RECENT.into()))
                .child(Node::div().class("popout-list").children(file_list(state, effects))),
        )
        .child(
            Node::div()
                .text(if state.stale { "save*" } else { "save" })
                .on_click(Msg::Dispatch(Action::Save)),
        )
        .child(Node::div().class("menu-spacer"))
        .child(
            Node::div()
                .class("popout-container")
                .id(SHARE)
                .text("share ›")
                .on_click(Msg::Toggle(SHARE.into()))
                .child(
                    Node::div()
                        .class("popout-list")
                        .child(
                            Node::div()
                                .text("as file")
                                .on_click(Msg::Dispatch(Action::SaveToFile)),
                        )
                        .child(
                            Node::div()
                                .text(share_label(state.share_link_state))
                                .on_click(Msg::Dispatch(Action::GetUrl)),
                        ),
                ),
        );

    Node::div()
        .class("menu-item")
        .class("dropdown-container")
        .id(FILE_MENU)
        .text(if state.stale { "file*" } else { "file" })
        .on_click(Msg::Toggle(FILE_MENU.into()))
        .child(dropdown)
}

/// Label of the "share as link" item
pub fn share_label(share: Option<ShareLinkState>) -> &'static str {
    share.map_or("", |s| s.label())
}

fn editable_name(state: &AppState) -> Node {
    Node::div()
        .class("menu-item")
        .class("menu-name")
        .attr("contenteditable", "true")
        .attr("spellcheck", "false")
        .text(state.name.clone())
        .on_click(Msg::Edit)
        .on_blur(|name| Action::SetName { name })
}

fn run_item(state: &AppState) -> Node {
    Node::div()
        .class("menu-item")
        .class("run")
        .class_if(state.stale_run, "stale-run")
        .text("▶ run")
        .on_click(Msg::Dispatch(Action::Run))
}

/// "new game" entry; building it requests asset folds
pub fn new_file(state: &AppState, effects: &mut Vec<Action>) -> Node {
    request_folds(state, effects);
    Node::div().text("new game").on_click(Msg::NewFile)
}

/// Saved file entries; building them requests asset folds
pub fn file_list(state: &AppState, effects: &mut Vec<Action>) -> Vec<Node> {
    request_folds(state, effects);
    state.saved_games.iter().map(draw_file).collect()
}

fn draw_file(game: &SavedGame) -> Node {
    Node::div()
        .attr("style", "display: flex; width: 100%;")
        .child(
            Node::div()
                .attr("style", "flex:1;")
                .text(game.display_name())
                .on_click(Msg::OpenFile(game.name().to_string())),
        )
        .child(
            Node::div()
                .attr("style", "margin-left: 10px;")
                .class("delete-file")
                .text("x")
                .on_click(Msg::DeleteFile(game.name().to_string())),
        )
}

/// Ask the editor to fold every asset literal, every pass
fn request_folds(state: &AppState, effects: &mut Vec<Action>) {
    for literal in state.code.asset_literals() {
        let start = literal.range.start;
        effects.push(Action::FoldRange {
            from: start,
            to: start + 1,
        });
    }
}

fn learn(challenges: &[Challenge]) -> Node {
    let items = challenges.iter().enumerate().map(|(i, challenge)| {
        Node::div()
            .text(challenge.name.clone())
            .on_click(Msg::LoadChallenge(i))
    });

    Node::div()
        .class("menu-item")
        .class("dropdown-container")
        .id(LEARN_MENU)
        .text("learn")
        .on_click(Msg::Toggle(LEARN_MENU.into()))
        .child(Node::div().class("dropdown-list").children(items))
}

fn next() -> Node {
    Node::div()
        .class("next-learn")
        .text("next")
        .on_click(Msg::NextChallenge)
}
