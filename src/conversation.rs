use std::collections::VecDeque;

use crate::client::TextReply;

pub const CONNECT_ERROR: &str = "Error: Could not connect to the server.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    You,
    Robot,
}

impl Speaker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Speaker::You => "You",
            Speaker::Robot => "Robot",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConversationEntry {
    pub speaker: Speaker,
    pub text: String,
    pub timestamp: String,
}

/// What the assistant response area currently shows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResponsePane {
    #[default]
    Empty,
    Thinking,
    Reply { text: String, updated_at: String },
    Error(String),
}

#[derive(Debug)]
pub struct ReplyOutcome {
    pub seq: u64,
    pub result: anyhow::Result<TextReply>,
}

/// Text that passed trimming, ready to be posted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingText {
    pub seq: u64,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct Conversation {
    pub input: String,
    pub cursor: usize, // cursor position in chars
    /// Newest first
    pub history: VecDeque<ConversationEntry>,
    pub response: ResponsePane,
    pub scroll: u16,
    next_seq: u64,
}

fn now_stamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

impl Conversation {
    pub fn push_entry(&mut self, speaker: Speaker, text: &str) {
        self.history.push_front(ConversationEntry {
            speaker,
            text: text.to_string(),
            timestamp: now_stamp(),
        });
        self.scroll = 0;
    }

    /// Trim the input and, if anything is left, record it and hand it back for sending.
    pub fn take_input(&mut self) -> Option<PendingText> {
        let text = self.input.trim().to_string();
        if text.is_empty() {
            return None;
        }

        self.push_entry(Speaker::You, &text);
        self.input.clear();
        self.cursor = 0;
        self.response = ResponsePane::Thinking;

        self.next_seq += 1;
        Some(PendingText { seq: self.next_seq, text })
    }

    pub fn apply_reply(&mut self, outcome: ReplyOutcome) {
        let ReplyOutcome { seq, result } = outcome;
        // An older request still lands in history but must not overwrite a newer pane
        let newest = seq >= self.next_seq;

        match result {
            Ok(TextReply::Success(text)) => {
                tracing::info!(seq, "assistant replied");
                if newest {
                    self.response = ResponsePane::Reply {
                        text: text.clone(),
                        updated_at: now_stamp(),
                    };
                }
                self.push_entry(Speaker::Robot, &text);
            }
            Ok(TextReply::Failure(message)) => {
                tracing::warn!(seq, "server rejected text: {}", message);
                if newest {
                    self.response = ResponsePane::Error(format!("Error: {}", message));
                }
            }
            Err(e) => {
                tracing::error!(seq, "error sending text: {:#}", e);
                if newest {
                    self.response = ResponsePane::Error(CONNECT_ERROR.to_string());
                }
            }
        }
    }

    pub fn is_waiting(&self) -> bool {
        self.response == ResponsePane::Thinking
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.input, self.cursor);
        self.input.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.input, self.cursor);
            self.input.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        let char_count = self.input.chars().count();
        if self.cursor < char_count {
            let byte_pos = char_to_byte_index(&self.input, self.cursor);
            self.input.remove(byte_pos);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let char_count = self.input.chars().count();
        self.cursor = (self.cursor + 1).min(char_count);
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.input.chars().count();
    }
}
