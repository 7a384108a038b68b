use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Model, Prompt, ToastLevel};
use crate::sync::SyncState;

use super::display_width;

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let filename = model.status.path.as_ref().map_or_else(
        || "[no file]".to_string(),
        |p| {
            p.file_name()
                .map_or_else(|| p.display().to_string(), |s| s.to_string_lossy().to_string())
        },
    );
    let modified = if model.status.dirty { " [modified]" } else { "" };
    let state = match model.status.state {
        SyncState::Idle => "idle",
        SyncState::Active => "active",
        SyncState::Stopped => "stopped",
    };
    let (line, col) = {
        let buf = model.buffer.lock();
        let cursor = buf.cursor();
        let text = buf.line_at(cursor.line).unwrap_or_default();
        let chars = text.get(..cursor.col).map_or(0, |s| s.chars().count());
        (cursor.line + 1, chars + 1)
    };

    let status = format!(
        " {filename}{modified}  [{state}]  Ln {line}, Col {col}  ^O:open  ^S:save as  ^Q:quit"
    );
    let status_bar =
        Paragraph::new(status).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(status_bar, area);
}

pub fn render_prompt_bar(prompt: &Prompt, frame: &mut Frame, area: Rect) {
    let text = format!("{}: {}", prompt.label(), prompt.input);
    let cursor_x = usize::from(area.x) + display_width(&text);
    let bar = Paragraph::new(text).style(Style::default().bg(Color::Blue).fg(Color::White));
    frame.render_widget(bar, area);

    let max_x = usize::from(area.x + area.width.saturating_sub(1));
    frame.set_cursor_position(Position::new(
        u16::try_from(cursor_x.min(max_x)).unwrap_or(u16::MAX),
        area.y,
    ));
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
