//! Main rendering module
//!
//! Draws the view tree into the terminal:
//! - Menu bar with its dropdowns and popouts
//! - Code pane, logs, game status and help
//! - Asset editor overlay
//! - Popups and status bar
//!
//! While drawing, every clickable node's screen area is recorded in a
//! `HitMap` so mouse clicks can be mapped back to the node's `Msg`.

use crate::app::{App, Mode, PopupState};
use crate::ui::{widgets, HitMap, Target};
use crate::view::{asset, Msg, Node, Ui};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Main render function - entry point for all UI rendering
pub fn render(frame: &mut Frame, app: &App, ui: &Ui) -> HitMap {
    let area = frame.area();
    let mut hits = HitMap::default();

    frame.render_widget(Block::default().style(app.theme.text()), area);

    // Main layout: menu bar, content, status bar
    let layout = Layout::vertical([
        Constraint::Length(1), // Menu bar
        Constraint::Min(5),    // Content
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    let menu = ui.root.find_class("menu");
    let anchors = match menu {
        Some(menu) => render_menu_bar(frame, app, menu, layout[0], &mut hits),
        None => Vec::new(),
    };

    if let Some(main) = ui.root.find_class("main-container") {
        render_main(frame, app, main, layout[1], &mut hits);
    }

    render_status_bar(frame, app, layout[2]);

    if let Some(menu) = menu {
        render_dropdown(frame, app, menu, &anchors, area, &mut hits);
    }

    if let Some(overlay) = ui.root.find_class("asset-editor-container") {
        if !overlay.has_class("hide") {
            render_asset_overlay(frame, app, overlay, area, &mut hits);
        }
    }

    render_popups(frame, app, area, &mut hits);

    hits
}

// === MENU BAR ===

/// Render the menu bar; returns the area of every item that has an id
fn render_menu_bar(
    frame: &mut Frame,
    app: &App,
    menu: &Node,
    area: Rect,
    hits: &mut HitMap,
) -> Vec<(String, Rect)> {
    let theme = &app.theme;
    frame.render_widget(Block::default().style(theme.selected()), area);

    // Items after the spacer are right-aligned
    let split = menu
        .children
        .iter()
        .position(|c| c.has_class("spacer"))
        .unwrap_or(menu.children.len());
    let (left, right) = menu.children.split_at(split);
    let right: Vec<&Node> = right
        .iter()
        .filter(|c| c.get_attr("aria-hidden") != Some("true"))
        .collect();

    let mut anchors = Vec::new();

    let mut x = area.x;
    for item in left {
        x = render_menu_item(frame, app, item, x, area, hits, &mut anchors);
    }

    let right_width: u16 = right.iter().map(|item| item_width(app, item) + 1).sum();
    let mut x = area.right().saturating_sub(right_width).max(x);
    for item in right {
        x = render_menu_item(frame, app, item, x, area, hits, &mut anchors);
    }

    anchors
}

fn item_label(app: &App, item: &Node) -> String {
    match &app.name_draft {
        Some(draft) if item.has_class("menu-name") => format!("{}▏", draft),
        _ => item.text.clone(),
    }
}

fn item_width(app: &App, item: &Node) -> u16 {
    Line::raw(item_label(app, item)).width() as u16 + 2
}

fn render_menu_item(
    frame: &mut Frame,
    app: &App,
    item: &Node,
    x: u16,
    area: Rect,
    hits: &mut HitMap,
    anchors: &mut Vec<(String, Rect)>,
) -> u16 {
    let width = item_width(app, item).min(area.right().saturating_sub(x));
    let rect = Rect {
        x,
        y: area.y,
        width,
        height: 1,
    };

    let open = item.id.is_some() && app.menu.dropdown == item.id;
    let style = app.theme.menu_item(&item.classes, open);
    frame.render_widget(
        Paragraph::new(format!(" {} ", item_label(app, item))).style(style),
        rect,
    );

    hits.push_msg(rect, item.on_click.as_ref());
    if let Some(id) = &item.id {
        anchors.push((id.clone(), rect));
    }

    x.saturating_add(width + 1)
}

/// Render the open dropdown and, inside it, the open popout
fn render_dropdown(
    frame: &mut Frame,
    app: &App,
    menu: &Node,
    anchors: &[(String, Rect)],
    area: Rect,
    hits: &mut HitMap,
) {
    let Some(open) = app.menu.dropdown.as_deref() else {
        return;
    };
    let Some(list) = menu
        .find_id(open)
        .and_then(|container| container.find_class("dropdown-list"))
    else {
        return;
    };
    let Some((_, anchor)) = anchors.iter().find(|(id, _)| id == open) else {
        return;
    };

    let theme = &app.theme;
    let rows: Vec<Line> = list
        .children
        .iter()
        .map(|child| {
            if child.has_class("menu-spacer") {
                Line::styled("────────────", theme.border())
            } else if child.id.is_some() && app.menu.popout == child.id {
                Line::styled(child.text.clone(), theme.selected())
            } else {
                Line::styled(child.text.clone(), theme.text())
            }
        })
        .collect();

    let (box_area, row_areas) =
        widgets::render_list_box(frame, &rows, (anchor.x, anchor.y + 1), theme, area);
    hits.push(box_area, Target::Sink);

    let mut popout = None;
    for (child, row) in list.children.iter().zip(&row_areas) {
        hits.push_msg(*row, child.on_click.as_ref());
        if child.id.is_some() && app.menu.popout == child.id {
            popout = child.find_class("popout-list").map(|list| (list, row.y));
        }
    }

    if let Some((list, y)) = popout {
        render_popout(frame, app, list, (box_area.right(), y.saturating_sub(1)), area, hits);
    }
}

/// Render a popout list next to its dropdown row
fn render_popout(
    frame: &mut Frame,
    app: &App,
    list: &Node,
    at: (u16, u16),
    area: Rect,
    hits: &mut HitMap,
) {
    let theme = &app.theme;

    if list.children.is_empty() {
        let rows = [Line::styled("(nothing here yet)", theme.text_dim())];
        let (box_area, _) = widgets::render_list_box(frame, &rows, at, theme, area);
        hits.push(box_area, Target::Sink);
        return;
    }

    // File entries carry a name and a delete marker; plain entries are one label
    let name_width = list
        .children
        .iter()
        .filter_map(|c| c.children.first())
        .map(|name| Line::raw(name.text.clone()).width())
        .max()
        .unwrap_or(0);

    let rows: Vec<Line> = list
        .children
        .iter()
        .map(|child| match child.children.as_slice() {
            [name, delete, ..] => Line::from(vec![
                Span::styled(format!("{:<width$}", name.text, width = name_width), theme.text()),
                Span::raw("  "),
                Span::styled(delete.text.clone(), theme.error()),
            ]),
            _ => Line::styled(child.text.clone(), theme.text()),
        })
        .collect();

    let (box_area, row_areas) = widgets::render_list_box(frame, &rows, at, theme, area);
    hits.push(box_area, Target::Sink);

    for (child, row) in list.children.iter().zip(&row_areas) {
        match child.children.as_slice() {
            [name, delete, ..] => {
                let delete_width = 3.min(row.width);
                let name_area = Rect {
                    width: row.width - delete_width,
                    ..*row
                };
                let delete_area = Rect {
                    x: row.x + name_area.width,
                    width: delete_width,
                    ..*row
                };
                hits.push_msg(name_area, name.on_click.as_ref());
                hits.push_msg(delete_area, delete.on_click.as_ref());
            }
            _ => hits.push_msg(*row, child.on_click.as_ref()),
        }
    }
}

// === MAIN AREA ===

fn render_main(frame: &mut Frame, app: &App, main: &Node, area: Rect, hits: &mut HitMap) {
    let docs = main
        .find_class("game-docs-container")
        .filter(|node| !node.has_class("docs-closed"));

    let columns = match docs {
        Some(_) => widgets::horizontal_split(area, &[60, 40]),
        None => vec![area],
    };

    let code_rows = Layout::vertical([Constraint::Min(3), Constraint::Length(7)]).split(columns[0]);
    render_code(frame, app, code_rows[0], hits);

    if let Some(logs) = main.find_class("logs") {
        render_logs(frame, app, logs, code_rows[1]);
    }

    if let (Some(docs), Some(right)) = (docs, columns.get(1)) {
        render_game_docs(frame, app, docs, *right);
    }
}

/// Code pane: line numbers, folded asset literals, cursor
fn render_code(frame: &mut Frame, app: &App, area: Rect, hits: &mut HitMap) {
    let theme = &app.theme;
    let state = &app.state;

    let title = format!(" {}{} ", state.name, if state.stale { " *" } else { "" });
    let block = Block::default()
        .title(title)
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_style(theme.border_focused())
        .style(theme.text());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let text = state.code.text();
    let view = state.code.display();
    let height = inner.height as usize;
    let scroll = view
        .cursor
        .map_or(0, |(row, _)| (row + 1).saturating_sub(height));

    let gutter_width: u16 = 5;
    let mut line_number = 1;
    let mut prev_start = 0;

    let mut lines = Vec::new();
    for (i, line) in view.lines.iter().enumerate() {
        line_number += text[prev_start..line.start].matches('\n').count();
        prev_start = line.start;

        if i < scroll || i >= scroll + height {
            continue;
        }

        let style = if line.folded.is_some() {
            theme.asset()
        } else {
            theme.text()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:>4} ", line_number), theme.gutter()),
            Span::styled(line.text.clone(), style),
        ]));

        // Clicking a folded literal opens its editor
        if let Some(literal) = &line.folded {
            let row = Rect {
                x: inner.x + gutter_width,
                y: inner.y + (i - scroll) as u16,
                width: inner.width.saturating_sub(gutter_width),
                height: 1,
            };
            hits.push(
                row,
                Target::Msg(Msg::Dispatch(asset::open_literal(text, literal))),
            );
        }
    }
    frame.render_widget(Paragraph::new(lines), inner);

    let typing = app.mode() == Mode::Normal && !app.menu.is_open();
    if let (true, Some((row, col))) = (typing, view.cursor) {
        if let Some(position) = cursor_cell(inner, gutter_width, row.saturating_sub(scroll), col) {
            frame.set_cursor_position(position);
        }
    }
}

/// Screen cell for a cursor at `(row, col)` of the visible text, if on screen
fn cursor_cell(inner: Rect, gutter_width: u16, row: usize, col: usize) -> Option<(u16, u16)> {
    let x = inner
        .x
        .saturating_add(gutter_width)
        .saturating_add(u16::try_from(col).ok()?);
    let y = inner.y.saturating_add(u16::try_from(row).ok()?);
    (x < inner.right() && y < inner.bottom()).then_some((x, y))
}

fn render_logs(frame: &mut Frame, app: &App, logs: &Node, area: Rect) {
    let theme = &app.theme;
    let erred = logs.has_class("erred");

    let block = Block::default()
        .title(" logs ")
        .title_style(if erred { theme.error() } else { theme.title() })
        .borders(Borders::ALL)
        .border_style(if erred { theme.error() } else { theme.border() })
        .style(theme.text());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Keep the newest lines in view
    let visible = inner.height as usize;
    let skip = logs.children.len().saturating_sub(visible);
    let style = if erred { theme.error() } else { theme.text() };
    let lines: Vec<Line> = logs
        .children
        .iter()
        .skip(skip)
        .map(|line| Line::styled(line.text.clone(), style))
        .collect();

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

/// Game status (the runtime itself lives elsewhere) and the help pane
fn render_game_docs(frame: &mut Frame, app: &App, container: &Node, area: Rect) {
    let theme = &app.theme;
    let state = &app.state;
    let rows = Layout::vertical([Constraint::Length(5), Constraint::Min(3)]).split(area);

    let status = if state.error_info.is_some() {
        Line::styled("run failed, see logs", theme.error())
    } else if state.stale_run {
        Line::styled("edits not run yet, press F5", theme.warning())
    } else {
        Line::styled("up to date", theme.success())
    };
    let canvas = Paragraph::new(vec![Line::raw(""), status])
        .block(
            Block::default()
                .title(" game ")
                .title_style(theme.title())
                .borders(Borders::ALL)
                .border_style(theme.border())
                .style(theme.text()),
        )
        .centered();
    frame.render_widget(canvas, rows[0]);

    let help: Vec<Line> = container
        .find_class("docs")
        .map(|docs| {
            docs.children
                .iter()
                .map(|line| Line::styled(line.text.clone(), theme.text_dim()))
                .collect()
        })
        .unwrap_or_default();
    let docs = Paragraph::new(help).block(
        Block::default()
            .title(" help ")
            .title_style(theme.title())
            .borders(Borders::ALL)
            .border_style(theme.border())
            .style(theme.text()),
    );
    frame.render_widget(docs, rows[1]);
}

// === OVERLAYS ===

/// Asset editor: the backdrop closes, the panel keeps clicks to itself
fn render_asset_overlay(
    frame: &mut Frame,
    app: &App,
    overlay: &Node,
    area: Rect,
    hits: &mut HitMap,
) {
    let theme = &app.theme;

    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(theme.text_dim()), area);
    hits.push_msg(area, overlay.on_click.as_ref());

    if let Some(close) = overlay.children.iter().find(|c| c.has_class("close")) {
        let close_area = Rect {
            x: area.right().saturating_sub(5),
            y: area.y,
            width: 5.min(area.width),
            height: 1,
        };
        frame.render_widget(
            Paragraph::new(format!("[{}]", close.text_content())).style(theme.title()),
            close_area,
        );
    }

    let Some(panel) = overlay.find_class("asset-editor-content") else {
        return;
    };

    let panel_area = widgets::centered_rect(area.width * 7 / 10, area.height * 7 / 10, area);
    frame.render_widget(Clear, panel_area);

    let (title, body) = match panel.children.first() {
        Some(editor) => (format!(" {} ", editor.tag), editor.text.clone()),
        None => (" asset ".to_string(), String::new()),
    };
    let content = Paragraph::new(body)
        .style(Style::default().fg(theme.asset).bg(theme.bg))
        .block(
            Block::default()
                .title(title)
                .title_style(theme.title())
                .borders(Borders::ALL)
                .border_style(theme.border_focused())
                .style(theme.text()),
        );
    frame.render_widget(content, panel_area);

    if panel.click_sink {
        hits.push(panel_area, Target::Sink);
    }
}

/// Render popups if active
fn render_popups(frame: &mut Frame, app: &App, area: Rect, hits: &mut HitMap) {
    let theme = &app.theme;

    match &app.popup {
        PopupState::None => {}

        PopupState::Confirm { title, message, .. } => {
            widgets::render_confirm_popup(frame, title, message, theme, area);
            hits.push(area, Target::Sink);
        }

        PopupState::Alert { title, message } => {
            widgets::render_alert_popup(frame, title, message, theme, area);
            hits.push(area, Target::Sink);
        }
    }

    // Flash message (success/error feedback)
    if let Some((msg, is_error, _)) = &app.flash_message {
        widgets::render_flash_message(frame, msg, *is_error, theme, area);
    }
}

/// Render status bar with keybindings
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let hints: &[(&str, &str)] = if app.name_draft.is_some() {
        &[("Enter", "Rename"), ("Esc", "Cancel")]
    } else if app.state.editor.is_some() {
        &[("Esc", "Close asset editor")]
    } else {
        &[
            ("F5", "Run"),
            ("^S", "Save"),
            ("^N", "New"),
            ("^E", "Edit asset"),
            ("^L", "Next lesson"),
            ("F1", "Help"),
            ("^Q", "Quit"),
        ]
    };

    let mut right = vec![Span::styled(app.state.name.clone(), theme.text())];
    if app.state.stale {
        right.push(Span::styled(" ●", theme.warning()));
    }
    right.push(Span::styled(
        format!(
            " · {} assets · {} saved ",
            app.state.code.fold_count(),
            app.state.saved_games.len()
        ),
        theme.text_dim(),
    ));

    widgets::render_status_bar(
        frame,
        widgets::key_hints(hints, theme),
        Line::from(right),
        theme,
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_cell_stays_inside_pane() {
        let inner = Rect::new(1, 2, 40, 10);
        assert_eq!(cursor_cell(inner, 5, 0, 0), Some((6, 2)));
        assert_eq!(cursor_cell(inner, 5, 3, 7), Some((13, 5)));
        assert_eq!(cursor_cell(inner, 5, 0, 34), Some((40, 2)));
        assert_eq!(cursor_cell(inner, 5, 0, 35), None);
        assert_eq!(cursor_cell(inner, 5, 10, 0), None);
        assert_eq!(cursor_cell(inner, 5, 0, 70_000), None);
        assert_eq!(cursor_cell(inner, 5, 70_000, 0), None);
    }
}
