use crate::client::MoveReply;
use crate::command::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Unknown,
    Connected,
    Disconnected,
}

impl ConnectionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionStatus::Unknown => "Ready",
            ConnectionStatus::Connected => "Connected",
            ConnectionStatus::Disconnected => "Connection Lost",
        }
    }

    pub fn is_disconnected(&self) -> bool {
        *self == ConnectionStatus::Disconnected
    }
}

/// Result of one move request, reported back from its task
#[derive(Debug)]
pub struct MoveOutcome {
    pub seq: u64,
    pub command: Command,
    pub result: anyhow::Result<MoveReply>,
}

#[derive(Debug, Default)]
pub struct MovementController {
    next_seq: u64,
    last_applied: u64,
    pub last_command: Option<Command>,
    pub last_response: Option<String>,
    pub connection: ConnectionStatus,
    pub in_flight: usize,
}

impl MovementController {
    /// Number a new request. Every keypress or click gets its own.
    pub fn begin(&mut self, command: Command) -> u64 {
        self.next_seq += 1;
        self.in_flight += 1;
        tracing::debug!(seq = self.next_seq, command = command.name(), "sending move");
        self.next_seq
    }

    /// Returns false when the outcome was older than one already shown.
    pub fn apply(&mut self, outcome: MoveOutcome) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);

        let MoveOutcome { seq, command, result } = outcome;

        match &result {
            Ok(reply) => tracing::info!(
                seq,
                command = command.name(),
                response = %reply.raw,
                "server response"
            ),
            Err(e) => tracing::error!(seq, command = command.name(), "error sending command: {:#}", e),
        }

        if seq <= self.last_applied {
            tracing::debug!(seq, last_applied = self.last_applied, "discarding stale move response");
            return false;
        }
        self.last_applied = seq;

        match result {
            Ok(reply) => {
                self.last_command = Some(command);
                self.last_response = match (reply.status.as_deref(), reply.message) {
                    (Some("success") | None, message) => message,
                    (Some(status), Some(message)) => Some(format!("{}: {}", status, message)),
                    (Some(status), None) => Some(status.to_string()),
                };
                self.connection = ConnectionStatus::Connected;
            }
            Err(_) => {
                self.connection = ConnectionStatus::Disconnected;
            }
        }
        true
    }
}
