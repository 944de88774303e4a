//! Asset editor overlay

use super::node::{Msg, Node};
use crate::dispatch::Action;
use crate::editor::AssetLiteral;
use crate::types::{AssetEditor, AssetKind};

/// Overlay holding the asset sub-editor.
///
/// The container is the backdrop: a click on it closes the editor. The
/// content panel is a click sink so clicks inside it never close anything.
pub fn overlay(editor: Option<&AssetEditor>) -> Node {
    Node::div()
        .class("asset-editor-container")
        .class_if(editor.is_none(), "hide")
        .on_click(Msg::Dispatch(Action::close_asset_editor()))
        .child(Node::new("button").class("close").text("x"))
        .child(
            Node::div()
                .class("asset-editor-content")
                .click_sink()
                .maybe_child(content(editor)),
        )
}

/// Sub-editor element for the open asset, if its kind has one
pub fn content(editor: Option<&AssetEditor>) -> Option<Node> {
    let editor = editor?;
    let tag = match &editor.kind {
        AssetKind::Bitmap => "pixel-editor",
        AssetKind::Sequencer => "sequencer-editor",
        AssetKind::Map => "map-editor",
        AssetKind::Unknown(_) => return None,
    };

    Some(Node::new(tag).id("asset-editor").text(editor.text.clone()))
}

/// Action opening the editor for an asset literal in `source`
pub fn open_literal(source: &str, literal: &AssetLiteral) -> Action {
    Action::SetAssetEditor {
        kind: Some(AssetKind::for_literal(&literal.tag)),
        text: source.get(literal.body.clone()).map(str::to_string),
    }
}
