//! Reusable UI widgets
//!
//! Contains common UI components used by the renderer:
//! - Popup dialogs (confirmation, alert)
//! - Dropdown boxes
//! - Flash message and status bar

use crate::ui::Theme;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render a centered popup dialog
pub fn render_popup(
    frame: &mut Frame,
    title: &str,
    content: Vec<Line>,
    buttons: &[(&str, char)], // (label, key)
    theme: &Theme,
    area: Rect,
) {
    // Calculate popup size
    let popup_width = 56.min(area.width.saturating_sub(4));
    let popup_height = (content.len() as u16 + 6).min(area.height.saturating_sub(4));

    let popup_area = centered_rect(popup_width, popup_height, area);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(format!(" {} ", title))
        .title_style(theme.title())
        .borders(Borders::ALL)
        .border_style(theme.border_focused())
        .style(theme.text());

    frame.render_widget(block, popup_area);

    let inner = Rect {
        x: popup_area.x + 2,
        y: popup_area.y + 1,
        width: popup_area.width.saturating_sub(4),
        height: popup_area.height.saturating_sub(4),
    };

    let content_widget = Paragraph::new(content)
        .style(theme.text())
        .wrap(Wrap { trim: false });
    frame.render_widget(content_widget, inner);

    if !buttons.is_empty() {
        let button_area = Rect {
            x: popup_area.x + 2,
            y: popup_area.y + popup_area.height.saturating_sub(2),
            width: popup_area.width.saturating_sub(4),
            height: 1,
        };

        let button_spans: Vec<Span> = buttons
            .iter()
            .enumerate()
            .flat_map(|(i, (label, key))| {
                let mut spans = vec![
                    Span::styled("[", theme.text_dim()),
                    Span::styled(
                        key.to_string(),
                        Style::default()
                            .fg(theme.accent)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled("] ", theme.text_dim()),
                    Span::styled(*label, theme.text()),
                ];
                if i < buttons.len() - 1 {
                    spans.push(Span::raw("    "));
                }
                spans
            })
            .collect();

        let buttons_widget = Paragraph::new(Line::from(button_spans))
            .alignment(Alignment::Center);
        frame.render_widget(buttons_widget, button_area);
    }
}

/// Render a confirmation popup with Yes/No buttons
pub fn render_confirm_popup(
    frame: &mut Frame,
    title: &str,
    message: &str,
    theme: &Theme,
    area: Rect,
) {
    let content = vec![Line::raw(""), Line::raw(message), Line::raw("")];

    render_popup(
        frame,
        title,
        content,
        &[("Yes", 'y'), ("Cancel", 'n')],
        theme,
        area,
    );
}

/// Render a blocking alert
pub fn render_alert_popup(
    frame: &mut Frame,
    title: &str,
    message: &str,
    theme: &Theme,
    area: Rect,
) {
    let content = vec![
        Line::raw(""),
        Line::styled(message, theme.warning()),
        Line::raw(""),
    ];

    render_popup(frame, title, content, &[("OK", 'o')], theme, area);
}

/// Draw a bordered list box and return the rect of each row
pub fn render_list_box(
    frame: &mut Frame,
    rows: &[Line],
    at: (u16, u16),
    theme: &Theme,
    area: Rect,
) -> (Rect, Vec<Rect>) {
    let content_width = rows.iter().map(Line::width).max().unwrap_or(0) as u16;
    let width = (content_width + 4).min(area.width.saturating_sub(at.0.saturating_sub(area.x)));
    let height = (rows.len() as u16 + 2).min(area.height.saturating_sub(at.1.saturating_sub(area.y)));
    let box_area = Rect {
        x: at.0,
        y: at.1,
        width,
        height,
    };

    frame.render_widget(Clear, box_area);
    frame.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_focused())
            .style(theme.text()),
        box_area,
    );

    let visible = height.saturating_sub(2) as usize;
    let row_areas: Vec<Rect> = (0..rows.len().min(visible))
        .map(|i| Rect {
            x: box_area.x + 1,
            y: box_area.y + 1 + i as u16,
            width: box_area.width.saturating_sub(2),
            height: 1,
        })
        .collect();

    for (row, row_area) in rows.iter().zip(&row_areas) {
        frame.render_widget(Paragraph::new(row.clone()), inset(*row_area, 1));
    }

    (box_area, row_areas)
}

/// Render a flash message (bottom of screen)
pub fn render_flash_message(
    frame: &mut Frame,
    message: &str,
    is_error: bool,
    theme: &Theme,
    area: Rect,
) {
    let style = if is_error { theme.error() } else { theme.success() };
    let prefix = if is_error { "✗ " } else { "✓ " };

    let flash_area = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    frame.render_widget(Clear, flash_area);
    let flash = Paragraph::new(Line::from(vec![
        Span::styled(prefix, style),
        Span::styled(message, style),
    ]));

    frame.render_widget(flash, flash_area);
}

/// Render status bar at bottom: hints on the left, `right` right-aligned
pub fn render_status_bar(frame: &mut Frame, left: Line, right: Line, theme: &Theme, area: Rect) {
    let status_area = Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    frame.render_widget(Clear, status_area);
    frame.render_widget(Paragraph::new(left).style(theme.text_dim()), status_area);
    frame.render_widget(
        Paragraph::new(right)
            .style(theme.text_dim())
            .alignment(Alignment::Right),
        status_area,
    );
}

/// Key hints as `[key] label` pairs
pub fn key_hints<'a>(hints: &[(&'a str, &'a str)], theme: &Theme) -> Line<'a> {
    let spans: Vec<Span> = hints
        .iter()
        .flat_map(|(key, label)| {
            [
                Span::styled("[", theme.text_dim()),
                Span::styled(*key, Style::default().fg(theme.accent)),
                Span::styled("] ", theme.text_dim()),
                Span::styled(format!("{}  ", label), theme.text_dim()),
            ]
        })
        .collect();
    Line::from(spans)
}

/// Helper: Create a centered rect of given size
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect { x, y, width, height }
}

/// Helper: Create horizontal layout with given percentages
pub fn horizontal_split(area: Rect, percentages: &[u16]) -> Vec<Rect> {
    let constraints: Vec<Constraint> = percentages
        .iter()
        .map(|p| Constraint::Percentage(*p))
        .collect();

    Layout::horizontal(constraints).split(area).to_vec()
}

/// Helper: Shrink a rect horizontally by `by` cells on each side
pub fn inset(area: Rect, by: u16) -> Rect {
    Rect {
        x: area.x + by.min(area.width),
        y: area.y,
        width: area.width.saturating_sub(by * 2),
        height: area.height,
    }
}
