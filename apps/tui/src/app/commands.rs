use crate::app::requests::Command;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandState {
    Idle,
    AwaitingConfirmation(Command),
    Running(Command),
}

impl fmt::Display for CommandState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::AwaitingConfirmation(command) => {
                write!(f, "AwaitingConfirmation({})", command.label())
            }
            Self::Running(command) => write!(f, "Running({})", command.label()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandEvent {
    Request(Command),
    Confirm,
    Cancel,
    Finished,
}

impl fmt::Display for CommandEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(command) => write!(f, "Request({})", command.label()),
            Self::Confirm => write!(f, "Confirm"),
            Self::Cancel => write!(f, "Cancel"),
            Self::Finished => write!(f, "Finished"),
        }
    }
}

#[derive(Debug, Error)]
#[error("invalid transition from {from} with event {event}")]
pub struct CommandTransitionError {
    pub from: CommandState,
    pub event: CommandEvent,
}

/// Serializes device commands: one at a time, destructive ones confirmed first.
#[derive(Debug)]
pub struct CommandMachine {
    state: CommandState,
}

impl Default for CommandMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandMachine {
    pub const fn new() -> Self {
        Self {
            state: CommandState::Idle,
        }
    }

    pub const fn state(&self) -> &CommandState {
        &self.state
    }

    pub const fn pending_confirmation(&self) -> Option<&Command> {
        match &self.state {
            CommandState::AwaitingConfirmation(command) => Some(command),
            _ => None,
        }
    }

    pub const fn is_running(&self) -> bool {
        matches!(self.state, CommandState::Running(_))
    }

    /// Applies `event`. Returns the command to send when one starts running.
    pub fn process(
        &mut self,
        event: CommandEvent,
    ) -> Result<Option<Command>, CommandTransitionError> {
        let (next, start) = match (&self.state, &event) {
            (CommandState::Idle, CommandEvent::Request(command)) => {
                if command.needs_confirmation() {
                    (CommandState::AwaitingConfirmation(command.clone()), None)
                } else {
                    (
                        CommandState::Running(command.clone()),
                        Some(command.clone()),
                    )
                }
            }
            (CommandState::AwaitingConfirmation(command), CommandEvent::Confirm) => (
                CommandState::Running(command.clone()),
                Some(command.clone()),
            ),
            (CommandState::AwaitingConfirmation(_), CommandEvent::Cancel)
            | (CommandState::Running(_), CommandEvent::Finished) => (CommandState::Idle, None),
            _ => {
                return Err(CommandTransitionError {
                    from: self.state.clone(),
                    event,
                })
            }
        };

        tracing::debug!(from = %self.state, to = %next, "command state");
        self.state = next;
        Ok(start)
    }
}
