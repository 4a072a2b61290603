//! Terminal response sink.
//!
//! A terminal has a single recipient, so replies and broadcasts both end up
//! on the same writer, one rendered line per message.

use std::io::{self, Write};

use gcmon::{Message, ResponseSink};
use parking_lot::Mutex;

/// Writes rendered messages line by line.
pub struct ConsoleSink<W: Write + Send> {
    prefix: String,
    out: Mutex<W>,
}

impl ConsoleSink<io::Stdout> {
    /// Sink printing to standard output.
    pub fn stdout(prefix: impl Into<String>) -> Self {
        Self::new(prefix, io::stdout())
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    pub fn new(prefix: impl Into<String>, out: W) -> Self {
        Self {
            prefix: prefix.into(),
            out: Mutex::new(out),
        }
    }

    /// Give back the writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn write(&self, message: &Message) {
        let line = message.render(&self.prefix);
        let mut out = self.out.lock();
        if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
            tracing::warn!("failed to write report line: {}", e);
        }
    }
}

impl<W: Write + Send> ResponseSink for ConsoleSink<W> {
    fn reply(&self, message: Message) {
        self.write(&message);
    }

    fn broadcast(&self, message: Message) {
        self.write(&message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_applied_to_prefixed_messages() {
        let sink = ConsoleSink::new("[gcmon] ", Vec::new());
        sink.reply(Message::prefixed("GC monitor enabled."));
        sink.broadcast(Message::plain("  1.0 KB freed from Eden"));
        sink.reply(Message::empty());

        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            output,
            "[gcmon] GC monitor enabled.\n  1.0 KB freed from Eden\n\n"
        );
    }
}
