// src/services/widget.rs
use tracing::{debug, warn};

use crate::{
    config::WidgetConfig,
    error::TransportError,
    message::{ChatOption, ChatRequest, ChatResponse, OutboundRequest},
    services::{
        render::{View, render},
        transport::ChatTransport,
    },
    state::{ConversationState, Message},
};

pub const SERVER_ERROR_TEXT: &str = "Sorry, an error occurred.";
pub const NETWORK_ERROR_TEXT: &str = "Network error. Please try again.";

/// A request cycle that has started but not yet completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub seq: u64,
    pub request: OutboundRequest,
}

/// How a completed request changed the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Replied,
    ServerError,
    NetworkError,
    /// A newer request was issued meanwhile; only the placeholder was removed.
    /// A late start reply is still shown unless a newer reply already was.
    Stale,
}

#[derive(Debug, Default)]
pub struct ChatWidget {
    state: ConversationState,
    config: WidgetConfig,
    started: bool,
    last_applied: u64,
}

impl ChatWidget {
    pub fn new(config: WidgetConfig) -> Self {
        Self {
            state: ConversationState::new(),
            config,
            started: false,
            last_applied: 0,
        }
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn view(&self) -> View {
        render(&self.state)
    }

    pub fn take_scroll_request(&mut self) -> bool {
        self.state.take_scroll_request()
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.state.set_input(text);
    }

    /// User bubble, input cleared, typing placeholder. `None` for blank text.
    pub fn begin_submit(&mut self, text: &str) -> Option<PendingRequest> {
        if text.trim().is_empty() {
            return None;
        }

        self.state.push_message(Message::user(text));
        self.state.clear_input();
        Some(self.begin(OutboundRequest::Message(ChatRequest::new(text))))
    }

    /// One line from a terminal: `1..=n` picks option n, anything else is
    /// submitted as typed. Blank lines start nothing.
    pub fn begin_line(&mut self, line: &str) -> Option<PendingRequest> {
        self.set_input(line);
        let chosen = line
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| self.select_option(i));
        match chosen {
            Some(text) => self.begin_submit(&text),
            None => self.begin_submit(line),
        }
    }

    /// Initial-load request. Only the first call does anything.
    pub fn begin_start(&mut self) -> Option<PendingRequest> {
        if self.started {
            return None;
        }
        self.started = true;
        Some(self.begin(OutboundRequest::Start))
    }

    fn begin(&mut self, request: OutboundRequest) -> PendingRequest {
        let seq = self.state.next_seq();
        self.state.push_typing(seq);
        debug!(seq, kind = request.kind(), "request started");
        PendingRequest { seq, request }
    }

    pub fn complete(
        &mut self,
        pending: &PendingRequest,
        outcome: Result<ChatResponse, TransportError>,
    ) -> Completion {
        let seq = pending.seq;
        self.state.remove_typing(seq);

        let late_start =
            matches!(pending.request, OutboundRequest::Start) && self.last_applied < seq;
        if !self.state.is_latest(seq) && !late_start {
            debug!(seq, "discarding response to superseded request");
            return Completion::Stale;
        }
        self.last_applied = self.last_applied.max(seq);

        match outcome {
            Ok(resp) if !resp.ok => {
                warn!(seq, error = resp.error.as_deref().unwrap_or(""), "server reported failure");
                self.state.push_message(Message::bot(SERVER_ERROR_TEXT));
                self.render_options(None);
                Completion::ServerError
            }
            Ok(resp) => {
                if let Some(node) = &resp.node {
                    debug!(seq, node = %node, "conversation node");
                }
                self.state.push_message(Message::bot(resp.reply));
                self.render_options(Some(&resp.options));
                Completion::Replied
            }
            Err(err) => {
                warn!(seq, error = %err, "chat request failed");
                self.state.push_message(Message::bot(NETWORK_ERROR_TEXT));
                if self.config.clear_options_on_network_error {
                    self.render_options(None);
                }
                Completion::NetworkError
            }
        }
    }

    /// Replace the visible option set. `None` or an empty slice clears it.
    pub fn render_options(&mut self, options: Option<&[ChatOption]>) {
        self.state
            .replace_options(options.map(<[ChatOption]>::to_vec).unwrap_or_default());
    }

    /// Text of the option at `index` in the current set.
    pub fn select_option(&self, index: usize) -> Option<String> {
        self.state.options().get(index).map(|o| o.text.clone())
    }

    /// Runs one full cycle. Returns whether a request was sent.
    pub async fn submit<T>(&mut self, transport: &T, text: &str) -> bool
    where
        T: ChatTransport + ?Sized,
    {
        let Some(pending) = self.begin_submit(text) else {
            return false;
        };
        let outcome = transport.send(&pending.request).await;
        self.complete(&pending, outcome);
        true
    }

    /// Send button / Enter: submit whatever is in the input field.
    pub async fn submit_input<T>(&mut self, transport: &T) -> bool
    where
        T: ChatTransport + ?Sized,
    {
        let text = self.state.input().to_string();
        self.submit(transport, &text).await
    }

    pub async fn choose_option<T>(&mut self, transport: &T, index: usize) -> bool
    where
        T: ChatTransport + ?Sized,
    {
        match self.select_option(index) {
            Some(text) => self.submit(transport, &text).await,
            None => false,
        }
    }

    pub async fn start<T>(&mut self, transport: &T) -> bool
    where
        T: ChatTransport + ?Sized,
    {
        let Some(pending) = self.begin_start() else {
            return false;
        };
        let outcome = transport.send(&pending.request).await;
        self.complete(&pending, outcome);
        true
    }
}
