//! Boarding decision exchange.
//!
//! When a waiting group does not fit in the car, the server asks how many of
//! them should board. Requests carry no id: a response is matched to its
//! request by the `(floor, direction, destination)` correlation key.
//!
//! # State Machine
//!
//! ```text
//!              decision_needed
//! ┌──────┐ ──────────────────────> ┌──────────────────┐
//! │ Idle │                         │ AwaitingResponse │ ── decision_needed ──> queue
//! └──────┘ <────────────────────── └──────────────────┘
//!           confirm / cancel / teardown
//!           (next queued request is promoted)
//! ```
//!
//! # Invariants
//!
//! - Single-flight: at most one [`PendingDecision`] is live. Further requests
//!   wait in a FIFO queue, at most one per correlation key.
//! - A response whose key does not match the live request is never sent.
//! - Teardown declines only the live request, and only if the channel is
//!   still Open. Queued requests are dropped silently.

use std::collections::VecDeque;

use elevator_proto::{BoardDirection, BoardingDecision, CorrelationKey, DecisionRequest, display_floor};

use crate::error::DecisionError;

/// A decision awaiting the user's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingDecision {
    /// Floor of the waiting group.
    pub floor: i32,
    /// Travel direction of the waiting group.
    pub direction: BoardDirection,
    /// Destination of the waiting group.
    pub destination: i32,
    /// Size of the waiting group.
    pub num_waiting: u32,
    /// Free space in the car.
    pub can_board: u32,
}

impl From<DecisionRequest> for PendingDecision {
    fn from(req: DecisionRequest) -> Self {
        Self {
            floor: req.floor,
            direction: req.direction,
            destination: req.destination,
            num_waiting: req.num_waiting,
            can_board: req.can_board,
        }
    }
}

impl PendingDecision {
    /// Correlation key.
    pub fn key(&self) -> CorrelationKey {
        CorrelationKey { floor: self.floor, direction: self.direction, destination: self.destination }
    }

    /// Prompt shown to the user.
    pub fn prompt(&self) -> String {
        format!(
            "Group of {} for floor {} doesn't fit. Space for {}. How many should board?",
            self.num_waiting,
            display_floor(self.destination),
            self.can_board
        )
    }

    fn respond(&self, num_to_board: u32) -> BoardingDecision {
        BoardingDecision {
            floor: self.floor,
            direction: self.direction,
            destination: self.destination,
            num_to_board,
        }
    }
}

/// What happened to an incoming decision request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Nothing was pending; present this prompt.
    Presented(PendingDecision),
    /// Same key as the live request; update the prompt in place.
    Refreshed(PendingDecision),
    /// Another request is live; this one waits.
    Queued {
        /// Requests waiting behind the live one.
        depth: usize,
    },
}

/// Result of resolving the live decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Response to send, if the key matched.
    pub response: Option<BoardingDecision>,
    /// Next queued request, now live.
    pub next: Option<PendingDecision>,
}

/// Single-flight boarding decision state machine.
#[derive(Debug, Clone, Default)]
pub struct DecisionProtocol {
    live: Option<PendingDecision>,
    queue: VecDeque<PendingDecision>,
}

impl DecisionProtocol {
    /// Create an idle protocol.
    pub fn new() -> Self {
        Self::default()
    }

    /// Live decision, if any.
    pub fn pending(&self) -> Option<&PendingDecision> {
        self.live.as_ref()
    }

    /// True while a decision awaits a response.
    pub fn is_awaiting(&self) -> bool {
        self.live.is_some()
    }

    /// Requests waiting behind the live one.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Accept a `decision_needed` request.
    pub fn request(&mut self, req: DecisionRequest) -> RequestOutcome {
        let incoming = PendingDecision::from(req);

        match &mut self.live {
            None => {
                self.live = Some(incoming);
                RequestOutcome::Presented(incoming)
            },
            Some(live) if live.key() == incoming.key() => {
                *live = incoming;
                RequestOutcome::Refreshed(incoming)
            },
            Some(_) => {
                match self.queue.iter_mut().find(|queued| queued.key() == incoming.key()) {
                    Some(queued) => *queued = incoming,
                    None => self.queue.push_back(incoming),
                }
                tracing::debug!(key = ?incoming.key(), depth = self.queue.len(), "decision queued");
                RequestOutcome::Queued { depth: self.queue.len() }
            },
        }
    }

    /// Answer the live decision with `value` passengers.
    ///
    /// # Errors
    ///
    /// - `DecisionError::NoPendingDecision` if idle
    /// - `DecisionError::OutOfRange` if `key` matches and `value` is outside
    ///   `[0, can_board]`; the decision stays live
    ///
    /// A mismatched `key` is dropped without a response, whatever `value`
    /// is, and the next queued decision is promoted.
    pub fn confirm(
        &mut self,
        key: CorrelationKey,
        value: i64,
    ) -> Result<Resolution, DecisionError> {
        let live = self.live.ok_or(DecisionError::NoPendingDecision)?;

        if key != live.key() {
            tracing::debug!(?key, live = ?live.key(), "dropping mismatched decision response");
            return Ok(Resolution { response: None, next: self.promote() });
        }

        let num_to_board = u32::try_from(value)
            .ok()
            .filter(|n| *n <= live.can_board)
            .ok_or(DecisionError::OutOfRange { value, max: live.can_board })?;

        Ok(Resolution { response: Some(live.respond(num_to_board)), next: self.promote() })
    }

    /// Decline the live decision (board nobody).
    ///
    /// # Errors
    ///
    /// - `DecisionError::NoPendingDecision` if idle
    pub fn cancel(&mut self) -> Result<Resolution, DecisionError> {
        let live = self.live.ok_or(DecisionError::NoPendingDecision)?;
        Ok(Resolution { response: Some(live.respond(0)), next: self.promote() })
    }

    /// Clear everything on connection teardown.
    ///
    /// Returns a zero-board decline for the live decision if `channel_open`.
    pub fn teardown(&mut self, channel_open: bool) -> Option<BoardingDecision> {
        let dropped = self.queue.len();
        self.queue.clear();
        let live = self.live.take()?;

        tracing::debug!(key = ?live.key(), channel_open, dropped, "decision torn down");
        channel_open.then(|| live.respond(0))
    }

    fn promote(&mut self) -> Option<PendingDecision> {
        self.live = self.queue.pop_front();
        self.live
    }
}
