//! Call request validation.

use elevator_proto::Call;

use crate::{config::SimulationConfig, error::CallError};

/// A validated hail request. Constructed, sent, discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallRequest {
    /// Floor the group waits on.
    pub floor: i32,
    /// Floor the group wants to reach.
    pub destination: i32,
    /// Group size, at least 1.
    pub num_passengers: u32,
}

impl From<CallRequest> for Call {
    fn from(req: CallRequest) -> Self {
        Self { floor: req.floor, destination: req.destination, num_passengers: req.num_passengers }
    }
}

/// Validates calls against the configured floor range.
#[derive(Debug, Clone, Copy)]
pub struct CallRequestBuilder<'a> {
    config: &'a SimulationConfig,
}

impl<'a> CallRequestBuilder<'a> {
    /// Builder bound to `config`.
    pub fn new(config: &'a SimulationConfig) -> Self {
        Self { config }
    }

    /// Validate a call. The first failing check wins:
    ///
    /// 1. a destination is selected
    /// 2. the passenger count is at least 1
    /// 3. the destination is a configured floor
    /// 4. the destination differs from `floor`
    pub fn build(
        &self,
        floor: i32,
        destination: Option<i32>,
        num_passengers: i64,
    ) -> Result<CallRequest, CallError> {
        let destination = destination.ok_or(CallError::DestinationMissing)?;

        let num_passengers = u32::try_from(num_passengers)
            .ok()
            .filter(|n| *n >= 1)
            .ok_or(CallError::InvalidPassengerCount { value: num_passengers })?;

        if !self.config.contains_floor(destination) {
            return Err(CallError::DestinationOutOfRange {
                destination,
                min: self.config.min_floor(),
                max: self.config.max_floor(),
            });
        }

        if destination == floor {
            return Err(CallError::SameFloorDestination { floor });
        }

        Ok(CallRequest { floor, destination, num_passengers })
    }
}
