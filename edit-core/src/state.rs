//! Connection state machine for Quill clients.
//!
//! This module provides a pure, side-effect-free state machine for managing
//! the client lifecycle. The state machine takes events as input and produces
//! a new state plus a list of actions to execute.
//!
//! ```text
//! Disconnected ──ConnectRequested──► Connecting ──ConnectSucceeded──► Synchronized
//!                                     ▲      │
//!                                     └──────┘ ConnectFailed / RetryElapsed
//! ```
//!
//! There is no terminal or error state: a failed connect keeps the client in
//! `Connecting` and schedules another attempt, indefinitely. The driver in
//! edit-client owns the retry delay and performs the actual I/O.

use edit_types::{ClientId, OperationType};

/// Client lifecycle state - NO I/O, just state transitions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No connect attempt made yet.
    #[default]
    Disconnected,
    /// Waiting for the server to assign a client id.
    Connecting,
    /// Client id assigned; polling, posting and resync are running.
    Synchronized {
        /// Id assigned by the server.
        client_id: ClientId,
    },
}

impl ConnectionState {
    /// Create a new state machine in the Disconnected state.
    pub fn new() -> Self {
        Self::Disconnected
    }

    /// Process an event and return the new state plus actions to execute.
    ///
    /// This is a pure function - no side effects. The caller (edit-client)
    /// is responsible for executing the returned actions.
    pub fn on_event(self, event: Event) -> (Self, Vec<Action>) {
        match (self, event) {
            // From Disconnected
            (Self::Disconnected, Event::ConnectRequested) => {
                (Self::Connecting, vec![Action::Connect])
            }

            // From Connecting
            (Self::Connecting, Event::ConnectSucceeded { client_id }) => (
                Self::Synchronized { client_id },
                vec![
                    Action::StartSync { client_id },
                    Action::EmitEvent(SyncEvent::Connected { client_id }),
                ],
            ),
            (Self::Connecting, Event::ConnectFailed { error }) => (
                Self::Connecting,
                vec![
                    Action::EmitEvent(SyncEvent::ConnectionFailed { error }),
                    Action::ScheduleRetry,
                ],
            ),
            (Self::Connecting, Event::RetryElapsed) => (Self::Connecting, vec![Action::Connect]),

            // Invalid transitions - stay in current state
            (state, _) => (state, vec![]),
        }
    }

    /// Check if a client id has been assigned.
    pub fn is_synchronized(&self) -> bool {
        matches!(self, Self::Synchronized { .. })
    }

    /// Check if currently trying to connect.
    pub fn is_connecting(&self) -> bool {
        matches!(self, Self::Connecting)
    }

    /// The assigned client id, once synchronized.
    pub fn client_id(&self) -> Option<ClientId> {
        match self {
            Self::Synchronized { client_id } => Some(*client_id),
            _ => None,
        }
    }
}

/// Events that can occur in the client lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Application asked to connect.
    ConnectRequested,
    /// Server answered the connect request.
    ConnectSucceeded {
        /// Id assigned by the server.
        client_id: ClientId,
    },
    /// Connect request failed.
    ConnectFailed {
        /// Error message describing the failure.
        error: String,
    },
    /// Retry delay has passed.
    RetryElapsed,
}

/// Actions to be executed by the edit-client driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Send a connect request.
    Connect,
    /// Wait the configured retry delay, then feed [`Event::RetryElapsed`].
    ScheduleRetry,
    /// Start the poll, post and resync loops.
    StartSync {
        /// Id to stamp on outgoing requests.
        client_id: ClientId,
    },
    /// Emit an event to the application.
    EmitEvent(SyncEvent),
}

/// Events emitted to the application layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// Client id assigned.
    Connected {
        /// Id assigned by the server.
        client_id: ClientId,
    },
    /// A connect attempt failed; another will follow.
    ConnectionFailed {
        /// Error message describing the failure.
        error: String,
    },
    /// A local edit was rejected by the server or lost in transit.
    ///
    /// The optimistic edit stays in the working model until the next resync.
    PostFailed {
        /// Operation of the failed edit.
        operation: OperationType,
        /// Error message describing the failure.
        error: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_disconnected() {
        let state = ConnectionState::new();
        assert!(matches!(state, ConnectionState::Disconnected));
        assert_eq!(state.client_id(), None);
    }

    #[test]
    fn connect_request_transitions_to_connecting() {
        let state = ConnectionState::Disconnected;
        let (new_state, actions) = state.on_event(Event::ConnectRequested);

        assert!(matches!(new_state, ConnectionState::Connecting));
        assert!(actions.iter().any(|a| matches!(a, Action::Connect)));
    }

    #[test]
    fn connect_success_synchronizes() {
        let state = ConnectionState::Connecting;
        let (new_state, actions) = state.on_event(Event::ConnectSucceeded {
            client_id: ClientId::new(4),
        });

        assert_eq!(new_state.client_id(), Some(ClientId::new(4)));
        assert!(actions
            .iter()
            .any(|a| matches!(a, Action::StartSync { client_id } if *client_id == ClientId::new(4))));
        assert!(actions
            .iter()
            .any(|a| matches!(a, Action::EmitEvent(SyncEvent::Connected { .. }))));
    }

    #[test]
    fn connect_failure_stays_connecting_and_retries() {
        let state = ConnectionState::Connecting;
        let (new_state, actions) = state.on_event(Event::ConnectFailed {
            error: "refused".into(),
        });

        assert!(matches!(new_state, ConnectionState::Connecting));
        assert!(actions.iter().any(|a| matches!(a, Action::ScheduleRetry)));
        assert!(actions.iter().any(|a| matches!(
            a,
            Action::EmitEvent(SyncEvent::ConnectionFailed { error }) if error == "refused"
        )));
    }

    #[test]
    fn retry_elapsed_reconnects() {
        let (new_state, actions) = ConnectionState::Connecting.on_event(Event::RetryElapsed);
        assert!(matches!(new_state, ConnectionState::Connecting));
        assert_eq!(actions, vec![Action::Connect]);
    }

    #[test]
    fn repeated_failures_never_give_up() {
        let mut state = ConnectionState::Disconnected;
        (state, _) = state.on_event(Event::ConnectRequested);
        for _ in 0..50 {
            let (next, actions) = state.on_event(Event::ConnectFailed {
                error: "down".into(),
            });
            assert!(actions.contains(&Action::ScheduleRetry));
            (state, _) = next.on_event(Event::RetryElapsed);
        }
        assert!(state.is_connecting());

        let (state, _) = state.on_event(Event::ConnectSucceeded {
            client_id: ClientId::new(1),
        });
        assert!(state.is_synchronized());
    }

    #[test]
    fn synchronized_ignores_connect_events() {
        let state = ConnectionState::Synchronized {
            client_id: ClientId::new(2),
        };
        let (new_state, actions) = state.clone().on_event(Event::ConnectSucceeded {
            client_id: ClientId::new(9),
        });
        assert_eq!(new_state, state);
        assert!(actions.is_empty());
    }

    #[test]
    fn disconnected_ignores_stray_results() {
        let (new_state, actions) = ConnectionState::Disconnected.on_event(Event::ConnectFailed {
            error: "late".into(),
        });
        assert!(matches!(new_state, ConnectionState::Disconnected));
        assert!(actions.is_empty());
    }

    #[test]
    fn helpers_reflect_state() {
        assert!(!ConnectionState::Disconnected.is_connecting());
        assert!(ConnectionState::Connecting.is_connecting());
        assert!(!ConnectionState::Connecting.is_synchronized());
        assert!(ConnectionState::Synchronized {
            client_id: ClientId::new(1)
        }
        .is_synchronized());
    }
}
