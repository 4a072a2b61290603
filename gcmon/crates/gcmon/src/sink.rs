//! Response Sinks - Message Delivery
//!
//! Reports leave the monitor as [`Message`] values handed to a
//! [`ResponseSink`]. A reply goes to whoever invoked the command; a broadcast
//! goes to every listener of the sink.

use parking_lot::Mutex;

/// One line of report text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Line content, without any prefix
    pub text: String,
    /// Whether the sink should prepend its prefix
    pub prefixed: bool,
}

impl Message {
    /// Message rendered as-is
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            prefixed: false,
        }
    }

    /// Message rendered after the sink's prefix
    pub fn prefixed(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            prefixed: true,
        }
    }

    /// Empty spacer line
    pub fn empty() -> Self {
        Self::plain(String::new())
    }

    /// Render with `prefix` applied when the message asks for it
    pub fn render(&self, prefix: &str) -> String {
        if self.prefixed {
            format!("{}{}", prefix, self.text)
        } else {
            self.text.clone()
        }
    }
}

/// Destination for command output
pub trait ResponseSink: Send + Sync {
    /// Deliver to the invoking caller only
    fn reply(&self, message: Message);

    /// Deliver to every recipient of this sink
    fn broadcast(&self, message: Message);
}

/// How a message reached the sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Reply,
    Broadcast,
}

/// In-memory sink that records everything it receives
#[derive(Debug, Default)]
pub struct CollectingSink {
    entries: Mutex<Vec<(Delivery, Message)>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded messages in arrival order
    pub fn entries(&self) -> Vec<(Delivery, Message)> {
        self.entries.lock().clone()
    }

    /// Text of recorded replies
    pub fn replies(&self) -> Vec<String> {
        self.texts_for(Delivery::Reply)
    }

    /// Text of recorded broadcasts
    pub fn broadcasts(&self) -> Vec<String> {
        self.texts_for(Delivery::Broadcast)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    fn texts_for(&self, delivery: Delivery) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .filter(|(kind, _)| *kind == delivery)
            .map(|(_, message)| message.text.clone())
            .collect()
    }
}

impl ResponseSink for CollectingSink {
    fn reply(&self, message: Message) {
        self.entries.lock().push((Delivery::Reply, message));
    }

    fn broadcast(&self, message: Message) {
        self.entries.lock().push((Delivery::Broadcast, message));
    }
}
