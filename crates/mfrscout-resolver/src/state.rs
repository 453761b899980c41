//! Pipeline progress for one part number.

use std::fmt;

use crate::error::StageMiss;

/// The stage that was running when the pipeline stopped early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Name,
    Address,
    Locality,
}

impl Stage {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Address => "address",
            Self::Locality => "locality",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Start,
    CandidatesFetched,
    Filtered,
    NameResolved,
    AddressResolved,
    LocalityExtracted,
    Done,
    Aborted { stage: Stage, reason: StageMiss },
}

impl PipelineState {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Aborted { .. })
    }

    /// Position along `Start -> ... -> Done`.
    fn rank(self) -> u8 {
        match self {
            Self::Start => 0,
            Self::CandidatesFetched => 1,
            Self::Filtered => 2,
            Self::NameResolved => 3,
            Self::AddressResolved => 4,
            Self::LocalityExtracted => 5,
            Self::Done | Self::Aborted { .. } => 6,
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::CandidatesFetched => f.write_str("candidates_fetched"),
            Self::Filtered => f.write_str("filtered"),
            Self::NameResolved => f.write_str("name_resolved"),
            Self::AddressResolved => f.write_str("address_resolved"),
            Self::LocalityExtracted => f.write_str("locality_extracted"),
            Self::Done => f.write_str("done"),
            Self::Aborted { stage, reason } => {
                write!(f, "aborted({}: {reason})", stage.as_str())
            }
        }
    }
}

/// Records transitions for one resolution and logs each at debug.
///
/// Only forward moves are taken: a later name strategy re-reaching
/// `CandidatesFetched` after an earlier one got to `Filtered` leaves the
/// state where it is.
#[derive(Debug)]
pub(crate) struct StateTracker<'a> {
    part_number: &'a str,
    state: PipelineState,
}

impl<'a> StateTracker<'a> {
    pub(crate) fn new(part_number: &'a str) -> Self {
        Self {
            part_number,
            state: PipelineState::Start,
        }
    }

    pub(crate) fn state(&self) -> PipelineState {
        self.state
    }

    pub(crate) fn advance(&mut self, next: PipelineState) {
        if self.state.is_terminal() {
            tracing::warn!(
                part_number = self.part_number,
                from = %self.state,
                to = %next,
                "ignoring transition out of terminal state"
            );
            return;
        }
        if !next.is_terminal() && next.rank() <= self.state.rank() {
            return;
        }
        tracing::debug!(
            part_number = self.part_number,
            from = %self.state,
            to = %next,
            "pipeline transition"
        );
        self.state = next;
    }

    pub(crate) fn abort(&mut self, stage: Stage, reason: StageMiss) -> PipelineState {
        self.advance(PipelineState::Aborted { stage, reason });
        self.state
    }
}
