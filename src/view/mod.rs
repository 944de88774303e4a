//! View renderer
//!
//! Maps an `AppState` snapshot to a `Node` tree. Rendering never mutates
//! state: editor folds wanted by the file menu come back as actions in
//! `Ui::effects` for the host to dispatch.

pub mod asset;
pub mod handlers;
pub mod menu;
pub mod node;

pub use handlers::Outcome;
pub use node::{Msg, Node};

use crate::config::Links;
use crate::dispatch::Action;
use crate::state::AppState;
use crate::types::Challenge;

/// Inputs to the view besides the state itself
#[derive(Debug, Clone, Copy)]
pub struct Props<'a> {
    pub challenges: &'a [Challenge],
    pub links: &'a Links,
}

/// A rendered frame
#[derive(Debug, Clone)]
pub struct Ui {
    pub root: Node,
    /// Actions requested while rendering, in order
    pub effects: Vec<Action>,
}

pub fn render(state: &AppState, props: &Props) -> Ui {
    let mut effects = Vec::new();

    let root = Node::div()
        .class("app")
        .child(menu::menu(state, props, &mut effects))
        .child(main_container(state))
        .child(asset::overlay(state.editor.as_ref()));

    Ui { root, effects }
}

fn main_container(state: &AppState) -> Node {
    let logs = state
        .logs
        .iter()
        .map(|line| Node::div().class("log-line").text(line.clone()));

    Node::div()
        .class("main-container")
        .child(
            Node::div()
                .class("code-container")
                .child(Node::div().id("code-editor"))
                .child(
                    Node::div()
                        .class("logs")
                        .class_if(state.error_info.is_some(), "erred")
                        .children(logs),
                ),
        )
        .child(
            Node::div()
                .class("game-docs-container")
                .class_if(!state.docs_open, "docs-closed")
                .child(
                    Node::div()
                        .class("game-canvas-container")
                        .child(Node::new("canvas").class("game-canvas"))
                        .child(Node::new("canvas").class("game-text")),
                )
                .child(docs(state)),
        )
        .child(Node::div().class("vertical-bar"))
}

const HELP: &[&str] = &[
    "setLegend([key, bitmap`...`], ...)  define sprites",
    "setMap(map`...`)                    load a level",
    "setSolids([...])                    blocking sprites",
    "setPushables({ [a]: [b] })          a pushes b",
    "onInput(key, fn) / afterInput(fn)   input hooks",
    "getFirst(key) / tilesWith(a, b)     queries",
    "",
    "F5 run   Ctrl-S save   Ctrl-N new game   F1 help",
    "F2 rename   Ctrl-E edit asset   Ctrl-L next lesson",
    "Esc close menus   F9 theme   Ctrl-Q quit",
];

fn docs(state: &AppState) -> Node {
    let lines: &[&str] = if state.docs_open { HELP } else { &[] };
    Node::div()
        .class("docs")
        .children(lines.iter().map(|line| Node::div().text(*line)))
}
