//! Modal dialogs and toasts drawn on top of a screen.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::action::{Notification, NotificationLevel};
use crate::theme;

/// A `width` x `height` rectangle centered in `area`, clamped to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

fn dialog(frame: &mut Frame, area: Rect, title: &str, border: Color) -> Rect {
    frame.render_widget(Clear, area);
    frame.render_widget(
        Block::default().style(Style::default().bg(theme::BG_DARK)),
        area,
    );
    let block = Block::default()
        .title(format!(" {title} "))
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

/// Blocking alert carrying a server payload verbatim.
pub fn render_alert(frame: &mut Frame, area: Rect, message: &str) {
    let lines = u16::try_from(message.lines().count()).unwrap_or(u16::MAX);
    let dialog_area = centered(area, 64, lines.saturating_add(6).min(16));
    let inner = dialog(frame, dialog_area, "Error", theme::ERROR_RED);

    let mut text: Vec<Line> = message
        .lines()
        .map(|line| Line::from(Span::styled(format!(" {line}"), theme::table_row())))
        .collect();
    text.push(Line::from(""));
    text.push(Line::from(vec![
        Span::styled(" Enter ", theme::key_hint_key()),
        Span::styled("dismiss", theme::key_hint()),
    ]));
    frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), inner);
}

/// Yes/no confirmation.
pub fn render_confirm(frame: &mut Frame, area: Rect, question: &str) {
    let dialog_area = centered(area, 50, 5);
    let inner = dialog(frame, dialog_area, "Confirm", theme::ELECTRIC_YELLOW);
    let text = vec![
        Line::from(Span::styled(format!("  {question}"), theme::table_row())),
        Line::from(""),
        Line::from(vec![
            Span::styled("  y ", theme::key_hint_key()),
            Span::styled("confirm    ", theme::key_hint()),
            Span::styled("n ", theme::key_hint_key()),
            Span::styled("cancel", theme::key_hint()),
        ]),
    ];
    frame.render_widget(Paragraph::new(text), inner);
}

/// Toast in the bottom-right corner, above the status bar.
pub fn render_notification(frame: &mut Frame, area: Rect, notification: &Notification) {
    let message_width = u16::try_from(notification.message.chars().count()).unwrap_or(u16::MAX);
    let width = message_width.saturating_add(6).clamp(20, 60).min(area.width);
    let height = 3u16;
    let x = area.x + area.width.saturating_sub(width + 1);
    let y = area.y + area.height.saturating_sub(height + 2);
    let toast_area = Rect::new(x, y, width, height.min(area.height));

    let (color, icon) = match notification.level {
        NotificationLevel::Success => (theme::SUCCESS_GREEN, "✓"),
        NotificationLevel::Error => (theme::ERROR_RED, "✗"),
        NotificationLevel::Warning => (theme::ELECTRIC_YELLOW, "!"),
        NotificationLevel::Info => (theme::NEON_CYAN, "·"),
    };

    frame.render_widget(Clear, toast_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(theme::BG_DARK));
    let inner = block.inner(toast_area);
    frame.render_widget(block, toast_area);

    let line = Line::from(vec![
        Span::styled(format!(" {icon} "), Style::default().fg(color)),
        Span::styled(notification.message.as_str(), theme::table_row()),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}
