// src/services/render.rs
use std::fmt::Write as _;

use crate::state::{Bubble, ConversationState, Sender, TYPING_TEXT};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BubbleView {
    pub sender: Sender,
    pub text: String,
    pub typing: bool,
}

impl BubbleView {
    /// CSS class a browser host would put on the bubble element.
    pub fn class(&self) -> &'static str {
        match self.sender {
            Sender::User => "msg user",
            Sender::Bot => "msg bot",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionButton {
    pub index: usize,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct View {
    pub bubbles: Vec<BubbleView>,
    pub options: Vec<OptionButton>,
    /// Index of the bubble the log is scrolled to, if any.
    pub scroll_anchor: Option<usize>,
}

pub fn render(state: &ConversationState) -> View {
    let bubbles: Vec<BubbleView> = state
        .bubbles()
        .iter()
        .map(|b| match b {
            Bubble::Message(m) => BubbleView {
                sender: m.sender,
                text: m.text.clone(),
                typing: false,
            },
            Bubble::Typing { .. } => BubbleView {
                sender: Sender::Bot,
                text: TYPING_TEXT.to_string(),
                typing: true,
            },
        })
        .collect();

    let options = state
        .options()
        .iter()
        .enumerate()
        .map(|(index, opt)| OptionButton { index, label: opt.text.clone() })
        .collect();

    let scroll_anchor = bubbles.len().checked_sub(1);

    View { bubbles, options, scroll_anchor }
}

pub fn format_bubble(bubble: &BubbleView) -> String {
    match bubble.sender {
        Sender::User => format!("you> {}", bubble.text),
        Sender::Bot => format!("bot> {}", bubble.text),
    }
}

/// Numbered option list, one per line. Empty when there are no options.
pub fn format_options(options: &[OptionButton]) -> String {
    let mut out = String::new();
    for opt in options {
        let _ = writeln!(out, "  [{}] {}", opt.index + 1, opt.label);
    }
    out
}
