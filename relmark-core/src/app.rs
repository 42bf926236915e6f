use tracing::warn;
use uuid::Uuid;

use crate::actions;
use crate::cursor::CursorState;
use crate::model::{Annotation, Document, RelevanceLevel, TextRange};
use crate::resolver::Segment;

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Visual,
    LevelPicker,
    Input,
    Help,
}

/// Focus area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Editor,
    Sidebar,
}

/// Input target for text input mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputTarget {
    Comment,
    FilePath,
}

/// Platform-agnostic application state
#[derive(Debug)]
pub struct App {
    pub document: Option<Document>,
    pub cursor: CursorState,
    pub mode: Mode,
    pub focus: Focus,
    pub running: bool,

    // Selection state
    pub selection_start: Option<(usize, usize)>, // (row, col)
    pub selection_end: Option<(usize, usize)>,

    // Sidebar state
    pub sidebar_selected: usize,
    pub show_stats: bool,

    // Input state
    pub input_buffer: String,
    pub input_target: InputTarget,

    // Picker state
    pub level_selected: usize,
    pub default_level: RelevanceLevel,

    // Selection waiting for a level, then annotation waiting for a comment
    pub pending_range: Option<TextRange>,
    pub comment_target: Option<Uuid>,

    // Status message
    pub status_message: Option<String>,
}

impl App {
    pub fn new() -> Self {
        Self::with_default_level(RelevanceLevel::default())
    }

    /// Create an app whose level picker starts on `level`
    pub fn with_default_level(level: RelevanceLevel) -> Self {
        Self {
            document: None,
            cursor: CursorState::new(),
            mode: Mode::Normal,
            focus: Focus::Editor,
            running: true,

            selection_start: None,
            selection_end: None,

            sidebar_selected: 0,
            show_stats: true,

            input_buffer: String::new(),
            input_target: InputTarget::Comment,

            level_selected: level_slot(level),
            default_level: level,

            pending_range: None,
            comment_target: None,

            status_message: None,
        }
    }

    pub fn load_document(&mut self, doc: Document) {
        self.cursor.set_content(doc.content());
        self.document = Some(doc);
        self.sidebar_selected = 0;
        self.pending_range = None;
        self.comment_target = None;
    }

    /// Get cursor position as (row, col)
    pub fn cursor_pos(&self) -> (usize, usize) {
        self.cursor.cursor()
    }

    /// Convert (row, col) to character offset
    pub fn cursor_to_offset(&self, row: usize, col: usize) -> usize {
        self.cursor.cursor_to_offset(row, col)
    }

    /// Set cursor to character offset
    pub fn set_cursor_offset(&mut self, offset: usize) {
        self.cursor.set_cursor_offset(offset);
    }

    // Cursor movement methods
    pub fn move_up(&mut self) {
        self.cursor.move_up();
    }

    pub fn move_down(&mut self) {
        self.cursor.move_down();
    }

    pub fn move_left(&mut self) {
        self.cursor.move_left();
    }

    pub fn move_right(&mut self) {
        self.cursor.move_right();
    }

    pub fn move_to_top(&mut self) {
        self.cursor.move_to_top();
    }

    pub fn move_to_bottom(&mut self) {
        self.cursor.move_to_bottom();
    }

    pub fn move_to_line_start(&mut self) {
        self.cursor.move_to_start();
    }

    pub fn move_to_line_end(&mut self) {
        self.cursor.move_to_end();
    }

    pub fn move_word_forward(&mut self) {
        self.cursor.move_word_forward();
    }

    pub fn move_word_back(&mut self) {
        self.cursor.move_word_back();
    }

    /// Enter visual/selection mode
    pub fn enter_visual_mode(&mut self) {
        if self.document.is_none() {
            return;
        }
        self.mode = Mode::Visual;
        let cursor = self.cursor.cursor();
        self.selection_start = Some(cursor);
        self.selection_end = Some(cursor);
    }

    /// Leave visual mode without keeping the selection
    pub fn cancel_visual_mode(&mut self) {
        self.mode = Mode::Normal;
        self.selection_start = None;
        self.selection_end = None;
    }

    /// Exit visual mode and get selection range
    pub fn exit_visual_mode(&mut self) -> Option<TextRange> {
        if self.mode != Mode::Visual {
            return None;
        }

        let range = self.get_selection_range();
        self.cancel_visual_mode();

        range
            .map(|(start, end)| TextRange::new(start, end))
            .filter(|r| !r.is_empty())
    }

    /// Update selection end position
    pub fn update_selection(&mut self) {
        if self.mode == Mode::Visual {
            self.selection_end = Some(self.cursor.cursor());
        }
    }

    /// Selection as ordered character offsets, including the character
    /// under the far end of the selection
    pub fn get_selection_range(&self) -> Option<(usize, usize)> {
        if self.mode != Mode::Visual {
            return None;
        }

        let start = self.selection_start?;
        let end = self.selection_end?;

        let start_offset = self.cursor_to_offset(start.0, start.1);
        let end_offset = self.cursor_to_offset(end.0, end.1);
        let len = self.document.as_ref().map_or(0, Document::char_len);

        let (lo, hi) = (start_offset.min(end_offset), start_offset.max(end_offset));
        Some((lo, (hi + 1).min(len)))
    }

    /// Close the selection and ask for a relevance level
    pub fn start_annotation(&mut self) {
        match self.exit_visual_mode() {
            Some(range) => {
                self.pending_range = Some(range);
                self.level_selected = level_slot(self.default_level);
                self.mode = Mode::LevelPicker;
            }
            None => self.set_status("Nothing selected"),
        }
    }

    /// Create the pending annotation at `level`, then prompt for a comment.
    pub fn choose_level(&mut self, level: RelevanceLevel) -> bool {
        let Some(range) = self.pending_range.take() else {
            self.mode = Mode::Normal;
            return false;
        };
        let Some(doc) = self.document.as_mut() else {
            self.mode = Mode::Normal;
            return false;
        };

        match doc.submit_selection(range.start_index, range.end_index, level) {
            Ok(annotation) => {
                self.comment_target = Some(annotation.id);
                self.input_buffer.clear();
                self.input_target = InputTarget::Comment;
                self.mode = Mode::Input;
                self.set_status(&format!("Marked as {}", level.as_str()));
                true
            }
            Err(e) => {
                warn!(error = %e, "selection rejected");
                self.mode = Mode::Normal;
                self.set_status(&format!("Error: {}", e));
                false
            }
        }
    }

    /// Pick the level currently highlighted in the picker
    pub fn choose_selected_level(&mut self) -> bool {
        let level = RelevanceLevel::all()[self.level_selected % RelevanceLevel::all().len()];
        self.choose_level(level)
    }

    pub fn next_level(&mut self) {
        self.level_selected = (self.level_selected + 1) % RelevanceLevel::all().len();
    }

    pub fn prev_level(&mut self) {
        let len = RelevanceLevel::all().len();
        self.level_selected = (self.level_selected + len - 1) % len;
    }

    /// Open the comment prompt for the selected annotation, prefilled
    pub fn begin_edit_comment(&mut self) {
        let Some((id, existing)) = self
            .selected_annotation()
            .map(|a| (a.id, a.comment().unwrap_or_default().to_string()))
        else {
            return;
        };

        self.comment_target = Some(id);
        self.input_buffer = existing;
        self.input_target = InputTarget::Comment;
        self.mode = Mode::Input;
    }

    /// Attach the input buffer as comment. Blank input leaves no comment.
    pub fn complete_comment(&mut self) -> bool {
        let Some(id) = self.comment_target.take() else {
            self.mode = Mode::Normal;
            return false;
        };

        let result = match self.document.as_mut() {
            Some(doc) => doc.attach_comment(id, &self.input_buffer),
            None => return false,
        };

        self.input_buffer.clear();
        self.mode = Mode::Normal;

        match result {
            Ok(()) => {
                self.set_status("Annotation saved");
                true
            }
            Err(e) => {
                warn!(error = %e, "comment rejected");
                self.set_status(&format!("Error: {}", e));
                false
            }
        }
    }

    /// Leave any prompt. An annotation already created stays, uncommented.
    pub fn cancel_input(&mut self) {
        self.mode = Mode::Normal;
        self.input_buffer.clear();
        self.pending_range = None;
        self.comment_target = None;
    }

    /// Get currently selected annotation
    pub fn selected_annotation(&self) -> Option<&Annotation> {
        let doc = self.document.as_ref()?;
        let sorted = doc.annotations_sorted();
        sorted.get(self.sidebar_selected).copied()
    }

    pub fn annotation_count(&self) -> usize {
        self.document.as_ref().map_or(0, |d| d.annotations().len())
    }

    /// Navigate to next annotation
    pub fn next_annotation(&mut self) {
        let count = self.annotation_count();
        if count > 0 {
            self.sidebar_selected = (self.sidebar_selected + 1) % count;
            self.jump_to_selected();
        }
    }

    /// Navigate to previous annotation
    pub fn prev_annotation(&mut self) {
        let count = self.annotation_count();
        if count > 0 {
            self.sidebar_selected = if self.sidebar_selected == 0 {
                count - 1
            } else {
                self.sidebar_selected - 1
            };
            self.jump_to_selected();
        }
    }

    fn jump_to_selected(&mut self) {
        let offset = self
            .document
            .as_ref()
            .and_then(|doc| actions::annotation_offset_by_index(doc, self.sidebar_selected));
        if let Some(offset) = offset {
            self.set_cursor_offset(offset);
        }
    }

    /// Delete selected annotation
    pub fn delete_selected_annotation(&mut self) -> bool {
        let id = match self.selected_annotation() {
            Some(a) => a.id,
            None => return false,
        };

        let Some(doc) = self.document.as_mut() else {
            return false;
        };

        match doc.delete_annotation(id) {
            Ok(_) => {
                // Adjust selection if needed
                let count = doc.annotations().len();
                if self.sidebar_selected >= count && count > 0 {
                    self.sidebar_selected = count - 1;
                }
                self.set_status("Annotation deleted");
                true
            }
            Err(e) => {
                warn!(error = %e, "delete rejected");
                self.set_status(&format!("Error: {}", e));
                false
            }
        }
    }

    /// Remove every annotation from the document
    pub fn clear_annotations(&mut self) {
        if let Some(doc) = self.document.as_mut() {
            doc.clear_all();
            self.sidebar_selected = 0;
            self.set_status("All annotations cleared");
        }
    }

    /// Resolved segments for the loaded document
    pub fn segments(&self) -> Vec<Segment> {
        self.document
            .as_ref()
            .map(Document::render_segments)
            .unwrap_or_default()
    }

    pub fn toggle_stats(&mut self) {
        self.show_stats = !self.show_stats;
    }

    /// Set status message
    pub fn set_status(&mut self, msg: &str) {
        self.status_message = Some(msg.to_string());
    }

    /// Clear status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Toggle focus between editor and sidebar
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Editor => Focus::Sidebar,
            Focus::Sidebar => Focus::Editor,
        };
    }

    /// Get title for display
    pub fn title(&self) -> String {
        self.document
            .as_ref()
            .map(|d| d.filename.clone().unwrap_or_else(|| d.title.clone()))
            .unwrap_or_else(|| "Untitled".to_string())
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

fn level_slot(level: RelevanceLevel) -> usize {
    RelevanceLevel::all()
        .iter()
        .position(|&l| l == level)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_with(content: &str) -> App {
        let mut app = App::new();
        app.load_document(Document::new("Test".to_string(), content.to_string()));
        app
    }

    fn select(app: &mut App, from: usize, to: usize) {
        app.set_cursor_offset(from);
        app.enter_visual_mode();
        app.set_cursor_offset(to);
        app.update_selection();
    }

    #[test]
    fn test_select_level_comment_flow() {
        let mut app = app_with("Hello world");
        select(&mut app, 6, 10);
        assert_eq!(app.get_selection_range(), Some((6, 11)));

        app.start_annotation();
        assert_eq!(app.mode, Mode::LevelPicker);

        assert!(app.choose_level(RelevanceLevel::High));
        assert_eq!(app.mode, Mode::Input);
        assert_eq!(app.input_target, InputTarget::Comment);

        app.input_buffer.push_str("the object");
        assert!(app.complete_comment());
        assert_eq!(app.mode, Mode::Normal);

        let doc = app.document.as_ref().unwrap();
        let ann = &doc.annotations().list()[0];
        assert_eq!(ann.text, "world");
        assert_eq!(ann.relevance_level, RelevanceLevel::High);
        assert_eq!(ann.comment(), Some("the object"));
    }

    #[test]
    fn test_blank_comment_leaves_annotation_uncommented() {
        let mut app = app_with("Hello world");
        select(&mut app, 0, 4);
        app.start_annotation();
        app.choose_selected_level();
        app.input_buffer.push_str("   ");
        app.complete_comment();

        let doc = app.document.as_ref().unwrap();
        assert_eq!(doc.annotations().len(), 1);
        assert_eq!(doc.annotations().list()[0].comment(), None);
        assert_eq!(doc.annotations().list()[0].relevance_level, RelevanceLevel::Neutral);
    }

    #[test]
    fn test_cancelled_prompt_keeps_annotation() {
        let mut app = app_with("Hello world");
        select(&mut app, 0, 4);
        app.start_annotation();
        app.choose_level(RelevanceLevel::Low);
        app.cancel_input();

        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.annotation_count(), 1);
        assert!(app.comment_target.is_none());
    }

    #[test]
    fn test_cancelled_level_picker_creates_nothing() {
        let mut app = app_with("Hello world");
        select(&mut app, 0, 4);
        app.start_annotation();
        app.cancel_input();
        assert_eq!(app.annotation_count(), 0);
    }

    #[test]
    fn test_level_picker_wraps() {
        let mut app = App::with_default_level(RelevanceLevel::High);
        assert_eq!(app.level_selected, 0);
        app.prev_level();
        assert_eq!(app.level_selected, 3);
        app.next_level();
        assert_eq!(app.level_selected, 0);
    }

    #[test]
    fn test_edit_comment_prefills_existing() {
        let mut app = app_with("Hello world");
        let id = {
            let doc = app.document.as_mut().unwrap();
            let id = doc.submit_selection(0, 5, RelevanceLevel::Medium).unwrap().id;
            doc.attach_comment(id, "old").unwrap();
            id
        };

        app.begin_edit_comment();
        assert_eq!(app.input_buffer, "old");
        assert_eq!(app.comment_target, Some(id));

        app.input_buffer = "new".to_string();
        app.complete_comment();
        let doc = app.document.as_ref().unwrap();
        assert_eq!(doc.annotations().get(id).unwrap().comment(), Some("new"));
    }

    #[test]
    fn test_delete_and_clear() {
        let mut app = app_with("one two three");
        {
            let doc = app.document.as_mut().unwrap();
            doc.submit_selection(0, 3, RelevanceLevel::High).unwrap();
            doc.submit_selection(4, 7, RelevanceLevel::Low).unwrap();
            doc.submit_selection(8, 13, RelevanceLevel::Low).unwrap();
        }

        app.sidebar_selected = 2;
        assert!(app.delete_selected_annotation());
        assert_eq!(app.annotation_count(), 2);
        assert_eq!(app.sidebar_selected, 1);

        app.clear_annotations();
        assert_eq!(app.annotation_count(), 0);
        assert!(!app.delete_selected_annotation());
    }

    #[test]
    fn test_navigation_moves_cursor_to_annotation() {
        let mut app = app_with("one\ntwo three");
        app.document
            .as_mut()
            .unwrap()
            .submit_selection(8, 13, RelevanceLevel::High)
            .unwrap();
        app.document
            .as_mut()
            .unwrap()
            .submit_selection(0, 3, RelevanceLevel::Low)
            .unwrap();

        app.next_annotation();
        assert_eq!(app.sidebar_selected, 1);
        assert_eq!(app.cursor_pos(), (1, 4));

        app.prev_annotation();
        assert_eq!(app.cursor_pos(), (0, 0));
    }

    #[test]
    fn test_segments_follow_document() {
        let mut app = app_with("abcdef");
        assert_eq!(app.segments().len(), 1);
        app.document
            .as_mut()
            .unwrap()
            .submit_selection(2, 4, RelevanceLevel::High)
            .unwrap();
        assert_eq!(app.segments().len(), 3);
    }
}
