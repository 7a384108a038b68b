use ratatui::prelude::*;
use ratatui::widgets::{Clear, Paragraph};

use crate::app::Model;

use super::{TAB_WIDTH, cursor_in_rows, status, text_width, wrap_line};

/// Render the complete UI.
pub fn view(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let footer_rows = 1 + u16::from(model.prompt.is_some() || model.active_toast().is_some());
    let editor_area = Rect {
        height: area.height.saturating_sub(footer_rows),
        ..area
    };
    let message_area = Rect {
        y: area.y + area.height.saturating_sub(2),
        height: 1,
        ..area
    };
    let status_area = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: 1,
        ..area
    };

    render_text(model, frame, editor_area);

    if let Some(prompt) = &model.prompt {
        status::render_prompt_bar(prompt, frame, message_area);
    } else if model.active_toast().is_some() {
        status::render_toast_bar(model, frame, message_area);
    }
    status::render_status_bar(model, frame, status_area);
}

/// Draw lines from the scroll offset down, wrapping long ones onto
/// continuation rows with a blank gutter.
fn render_text(model: &Model, frame: &mut Frame, area: Rect) {
    let buf = model.buffer.lock();
    let total_lines = buf.line_count();
    let gutter_width = usize::from(line_number_width(total_lines));
    let width = text_width(area.width, total_lines);
    let height = usize::from(area.height);
    let cursor = buf.cursor();

    let mut content: Vec<Line> = Vec::with_capacity(height);
    let mut cursor_cell = None;
    let mut line_idx = model.scroll_offset.min(total_lines.saturating_sub(1));
    while content.len() < height && line_idx < total_lines {
        let text = buf.line_at(line_idx).unwrap_or_default();
        let rows = wrap_line(&text, width);
        if line_idx == cursor.line && model.prompt.is_none() {
            let (row, x) = cursor_in_rows(&text, &rows, cursor.col);
            cursor_cell = Some((content.len() + row, x));
        }
        for (i, row) in rows.iter().enumerate() {
            let gutter = if i == 0 {
                format!("{:>gutter_width$} ", line_idx + 1)
            } else {
                " ".repeat(gutter_width + 1)
            };
            let piece = text.get(row.start..row.end).unwrap_or_default();
            content.push(Line::from(vec![
                Span::styled(gutter, Style::default().fg(Color::DarkGray)),
                Span::raw(piece.replace('\t', &" ".repeat(TAB_WIDTH))),
            ]));
        }
        line_idx += 1;
    }
    content.truncate(height);

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(content), area);

    // The prompt owns the cursor while it is open.
    if let Some((row, x)) = cursor_cell
        && row < height
    {
        let x = usize::from(area.x) + gutter_width + 1 + x;
        let y = usize::from(area.y) + row;
        frame.set_cursor_position(Position::new(
            u16::try_from(x).unwrap_or(u16::MAX),
            u16::try_from(y).unwrap_or(u16::MAX),
        ));
    }
}

/// Calculate the width needed for line numbers.
pub const fn line_number_width(total_lines: usize) -> u16 {
    let mut width = 1;
    let mut n = total_lines / 10;
    while n > 0 {
        width += 1;
        n /= 10;
    }
    width
}
