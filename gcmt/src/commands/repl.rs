//! Interactive command session.
//!
//! Reads one command per line while the simulated host keeps collecting in
//! the background, so `gcmonitor` output streams between prompts.

use std::io::{self, BufRead};
use std::sync::Arc;

use gcmon::{GcmonError, Message, ResponseSink};

use crate::config::Config;
use crate::console::ConsoleSink;
use crate::error::Result;

use super::MonitorHost;

/// Arguments for the repl command.
#[derive(Debug, Clone, Default)]
pub struct ReplArgs {
    /// Leave the host idle instead of collecting in the background.
    pub paused: bool,
}

/// Execute the repl command on standard input.
pub fn run_repl(args: ReplArgs, config: &Config) -> Result<()> {
    let sink = Arc::new(ConsoleSink::stdout(config.monitor.message_prefix.clone()));
    let monitor = MonitorHost::boot(config, sink.clone())?;

    if !args.paused {
        monitor.host().start()?;
    }
    let result = run_session(io::stdin().lock(), &monitor, sink.as_ref());
    monitor.close();
    result
}

/// Dispatch every line of `input` until `exit`, `quit`, or end of input.
pub fn run_session<R: BufRead>(
    input: R,
    monitor: &MonitorHost,
    out: &dyn ResponseSink,
) -> Result<()> {
    for line in input.lines() {
        let line = line?;
        let mut words = line.split_whitespace();
        let Some(label) = words.next() else {
            continue;
        };
        let arguments: Vec<String> = words.map(str::to_string).collect();

        match label.to_lowercase().as_str() {
            "exit" | "quit" => break,
            "help" => out.reply(Message::prefixed(format!(
                "Commands: {}, help, exit",
                monitor.aliases().join(", ")
            ))),
            _ => match monitor.dispatch(label, &arguments) {
                Ok(()) => {}
                Err(crate::error::GcmtError::Monitor(err @ GcmonError::UnknownCommand { .. })) => {
                    out.reply(Message::prefixed(format!("{}. Type 'help' for a list.", err)));
                }
                Err(err) => return Err(err),
            },
        }
    }

    tracing::debug!("repl session ended");
    Ok(())
}
