use std::path::PathBuf;

use crate::app::Model;
use crate::app::model::Prompt;
use crate::editor::{Direction, EditorBuffer};
use crate::sync::FileMode;

/// All possible events and actions in the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editing
    /// Insert a character at the cursor
    InsertChar(char),
    /// Insert text at the cursor (paste)
    InsertStr(String),
    /// Delete character before cursor (Backspace)
    DeleteBack,
    /// Delete character at cursor (Delete)
    DeleteForward,
    /// Split line at cursor (Enter)
    SplitLine,

    // Cursor
    MoveCursor(Direction),
    MoveHome,
    MoveEnd,
    MoveWordLeft,
    MoveWordRight,
    MoveToStart,
    MoveToEnd,
    PageUp,
    PageDown,
    /// Scroll the view without moving the cursor
    ScrollUp(usize),
    ScrollDown(usize),

    // File selection
    /// Open the path prompt for an open or save-as
    StartPrompt(FileMode),
    PromptInput(char),
    PromptBackspace,
    PromptSubmit,
    PromptCancel,

    // Window
    /// Terminal resized
    Resize(u16, u16),

    // Application
    Quit,
}

/// State transition for one message.
///
/// Edits go through [`SharedBuffer::edit`](crate::app::SharedBuffer::edit),
/// which marks the sync session's dirty flag before the buffer is unlocked.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        Message::InsertChar(ch) => edit(&mut model, |buf| buf.insert_char(ch)),
        Message::InsertStr(text) => edit(&mut model, |buf| buf.insert_str(&text)),
        Message::DeleteBack => edit(&mut model, EditorBuffer::delete_back),
        Message::DeleteForward => edit(&mut model, EditorBuffer::delete_forward),
        Message::SplitLine => edit(&mut model, EditorBuffer::split_line),

        Message::MoveCursor(direction) => navigate(&mut model, |buf| buf.move_cursor(direction)),
        Message::MoveHome => navigate(&mut model, EditorBuffer::move_home),
        Message::MoveEnd => navigate(&mut model, EditorBuffer::move_end),
        Message::MoveWordLeft => navigate(&mut model, EditorBuffer::move_word_left),
        Message::MoveWordRight => navigate(&mut model, EditorBuffer::move_word_right),
        Message::MoveToStart => navigate(&mut model, EditorBuffer::move_to_start),
        Message::MoveToEnd => navigate(&mut model, EditorBuffer::move_to_end),
        Message::PageUp => {
            let page = page_lines(&model);
            model.scroll_offset = model.scroll_offset.saturating_sub(page.unsigned_abs());
            navigate(&mut model, |buf| buf.move_lines(-page));
        }
        Message::PageDown => {
            let page = page_lines(&model);
            let max_offset = max_scroll_offset(&model);
            model.scroll_offset = (model.scroll_offset + page.unsigned_abs()).min(max_offset);
            navigate(&mut model, |buf| buf.move_lines(page));
        }
        Message::ScrollUp(n) => {
            model.scroll_offset = model.scroll_offset.saturating_sub(n);
        }
        Message::ScrollDown(n) => {
            model.scroll_offset = (model.scroll_offset + n).min(max_scroll_offset(&model));
        }

        Message::StartPrompt(mode) => {
            let input = match mode {
                FileMode::Save => model
                    .status
                    .path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
                FileMode::Open => String::new(),
            };
            model.prompt = Some(Prompt { mode, input });
        }
        Message::PromptInput(ch) => {
            if let Some(prompt) = &mut model.prompt {
                prompt.input.push(ch);
            }
        }
        Message::PromptBackspace => {
            if let Some(prompt) = &mut model.prompt {
                prompt.input.pop();
            }
        }
        Message::PromptSubmit => {
            if let Some(prompt) = model.prompt.take() {
                let input = prompt.input.trim();
                if !input.is_empty() {
                    model.pending_selection = Some((PathBuf::from(input), prompt.mode));
                }
            }
        }
        Message::PromptCancel => {
            model.prompt = None;
        }

        Message::Resize(width, height) => {
            model.terminal_size = (width, height);
            model.ensure_cursor_visible();
        }

        Message::Quit => {
            model.should_quit = true;
        }
    }
    model
}

fn edit(model: &mut Model, op: impl FnOnce(&mut EditorBuffer) -> bool) {
    model.buffer.edit(op);
    model.ensure_cursor_visible();
}

fn navigate(model: &mut Model, op: impl FnOnce(&mut EditorBuffer)) {
    op(&mut *model.buffer.lock());
    model.ensure_cursor_visible();
}

fn page_lines(model: &Model) -> isize {
    isize::try_from(model.editor_height().saturating_sub(1).max(1)).unwrap_or(isize::MAX)
}

fn max_scroll_offset(model: &Model) -> usize {
    let lines = model.buffer.lock().line_count();
    lines.saturating_sub(model.editor_height())
}
