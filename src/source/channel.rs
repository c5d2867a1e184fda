//! Channel-based data source.
//!
//! Pairs two unbounded tokio mpsc channels: commands flow to the scheduler
//! task, events flow back to the UI thread.

use tokio::sync::mpsc::{self, error::TryRecvError};

use super::{Command, DataSource, SourceEvent};

/// The driver's end of a [`ChannelSource`].
#[derive(Debug)]
pub struct SourceHandle {
    pub events: mpsc::UnboundedSender<SourceEvent>,
    pub commands: mpsc::UnboundedReceiver<Command>,
}

/// A data source backed by in-memory channels.
#[derive(Debug)]
pub struct ChannelSource {
    events: mpsc::UnboundedReceiver<SourceEvent>,
    commands: mpsc::UnboundedSender<Command>,
    description: String,
    error: Option<String>,
}

impl ChannelSource {
    /// Create a connected (handle, source) pair.
    ///
    /// `source_description` names where the data comes from
    /// (e.g., "http://localhost:5000").
    pub fn create(source_description: &str) -> (SourceHandle, Self) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        let handle = SourceHandle {
            events: event_tx,
            commands: command_rx,
        };
        let source = Self {
            events: event_rx,
            commands: command_tx,
            description: source_description.to_string(),
            error: None,
        };
        (handle, source)
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Option<SourceEvent> {
        match self.events.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                if self.error.is_none() {
                    self.error = Some("Scheduler stopped".to_string());
                }
                None
            }
        }
    }

    fn send(&mut self, command: Command) -> bool {
        if self.commands.send(command).is_err() {
            self.error = Some("Scheduler stopped".to_string());
            return false;
        }
        true
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
