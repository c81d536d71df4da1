//! Session state for the operator terminal
//!
//! Holds the rendered view of the pending request, the editable reply
//! text, and the outcome once a terminal action fires.

use hal_core::chat::ChatRequest;
use hal_core::reply::ReplyOutcome;

/// Display snapshot of a pending request.
///
/// Content is flattened for transcript rendering only; the typed request
/// stays with the gateway.
#[derive(Debug, Clone)]
pub struct RequestView {
    pub model: String,
    pub transcript: Vec<TranscriptLine>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone)]
pub struct TranscriptLine {
    pub role: String,
    pub content: String,
}

impl RequestView {
    pub fn from_request(request: &ChatRequest) -> Self {
        RequestView {
            model: request.model.clone(),
            transcript: request
                .messages
                .iter()
                .map(|message| TranscriptLine {
                    role: message.role.clone(),
                    content: message.content.display_text(),
                })
                .collect(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

/// State for one operator session
pub struct SessionApp {
    pub view: RequestView,
    pub input: String,
    pub cursor_position: usize,
    pub transcript_scroll: usize,
    pub outcome: Option<ReplyOutcome>,
}

impl SessionApp {
    pub fn new(view: RequestView) -> Self {
        SessionApp {
            view,
            input: String::new(),
            cursor_position: 0,
            transcript_scroll: 0,
            outcome: None,
        }
    }

    /// Record the terminal action. Only the first decision counts; the
    /// session ends before a second can be taken.
    pub fn decide(&mut self, outcome: ReplyOutcome) {
        if self.outcome.is_none() {
            self.outcome = Some(outcome);
        }
    }

    // Cursor movement (positions are in chars, not bytes)
    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        let char_count = self.input.chars().count();
        if self.cursor_position < char_count {
            self.cursor_position += 1;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_position = self.input.chars().count();
    }

    // Text input
    pub fn enter_char(&mut self, new_char: char) {
        if new_char == '\r' {
            return;
        }

        if self.cursor_position >= self.input.chars().count() {
            self.input.push(new_char);
        } else {
            let byte_idx = self
                .input
                .char_indices()
                .nth(self.cursor_position)
                .map(|(i, _)| i)
                .unwrap_or(self.input.len());
            self.input.insert(byte_idx, new_char);
        }
        self.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let mut chars: Vec<char> = self.input.chars().collect();
            chars.remove(self.cursor_position - 1);
            self.input = chars.into_iter().collect();
            self.move_cursor_left();
        }
    }

    pub fn delete_at_cursor(&mut self) {
        let char_count = self.input.chars().count();
        if self.cursor_position < char_count {
            let mut chars: Vec<char> = self.input.chars().collect();
            chars.remove(self.cursor_position);
            self.input = chars.into_iter().collect();
        }
    }

    /// Kill from the cursor to the end of the input
    pub fn kill_to_end(&mut self) {
        let byte_idx = self
            .input
            .char_indices()
            .nth(self.cursor_position)
            .map(|(i, _)| i);
        if let Some(byte_idx) = byte_idx {
            self.input.truncate(byte_idx);
        }
    }

    /// Kill from the start of the input to the cursor
    pub fn kill_to_start(&mut self) {
        if self.cursor_position > 0 {
            let byte_idx = self
                .input
                .char_indices()
                .nth(self.cursor_position)
                .map(|(i, _)| i)
                .unwrap_or(self.input.len());
            self.input = self.input[byte_idx..].to_string();
            self.cursor_position = 0;
        }
    }

    // Scrolling
    pub fn scroll_transcript_up(&mut self) {
        self.transcript_scroll = self.transcript_scroll.saturating_sub(1);
    }

    pub fn scroll_transcript_down(&mut self) {
        self.transcript_scroll = self.transcript_scroll.saturating_add(1);
    }
}
