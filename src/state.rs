// src/state.rs
use crate::message::ChatOption;

pub const TYPING_TEXT: &str = "Typing…";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub sender: Sender,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self { text: text.into(), sender: Sender::User }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self { text: text.into(), sender: Sender::Bot }
    }
}

/// One unit of the chat log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Bubble {
    Message(Message),
    /// Placeholder owned by the request with this sequence number.
    Typing { seq: u64 },
}

/// Everything the widget shows, kept in memory so rendering is a pure
/// function of it.
#[derive(Clone, Debug, Default)]
pub struct ConversationState {
    bubbles: Vec<Bubble>,
    options: Vec<ChatOption>,
    input: String,
    last_seq: u64,
    scroll_pending: bool,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    pub fn options(&self) -> &[ChatOption] {
        &self.options
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Messages only, typing placeholders skipped.
    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.bubbles.iter().filter_map(|b| match b {
            Bubble::Message(m) => Some(m),
            Bubble::Typing { .. } => None,
        })
    }

    // Append a message and pin the log to the bottom.
    pub fn push_message(&mut self, message: Message) -> usize {
        self.bubbles.push(Bubble::Message(message));
        self.scroll_pending = true;
        self.bubbles.len()
    }

    pub fn push_typing(&mut self, seq: u64) {
        self.bubbles.push(Bubble::Typing { seq });
        self.scroll_pending = true;
    }

    /// Remove the placeholder for `seq`. Returns false if it was already gone.
    pub fn remove_typing(&mut self, seq: u64) -> bool {
        let before = self.bubbles.len();
        self.bubbles
            .retain(|b| !matches!(b, Bubble::Typing { seq: s } if *s == seq));
        before != self.bubbles.len()
    }

    pub fn pending_count(&self) -> usize {
        self.bubbles
            .iter()
            .filter(|b| matches!(b, Bubble::Typing { .. }))
            .count()
    }

    pub fn replace_options(&mut self, options: Vec<ChatOption>) {
        self.options = options;
    }

    /// Hand out the next request sequence number.
    pub fn next_seq(&mut self) -> u64 {
        self.last_seq += 1;
        self.last_seq
    }

    pub fn is_latest(&self, seq: u64) -> bool {
        seq == self.last_seq
    }

    /// Returns true once after any append, then resets.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_pending)
    }
}
