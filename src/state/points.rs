use std::time::SystemTime;

use crate::state::engine::{ScoreState, Side};

/// One recorded rally: who scored it, in which order and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointEvent {
    /// Side credited with the point.
    pub side: Side,
    /// Position in the match, starting at 1. Never reused after an undo.
    pub order: u32,
    /// When the point was recorded.
    pub at: SystemTime,
}

/// Ordered history of the points of one match.
///
/// The score totals can always be recounted from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PointLog {
    entries: Vec<PointEvent>,
    next_order: u32,
}

impl PointLog {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a point for `side`.
    pub fn record(&mut self, side: Side, at: SystemTime) -> &PointEvent {
        self.next_order += 1;
        self.entries.push(PointEvent {
            side,
            order: self.next_order,
            at,
        });
        &self.entries[self.entries.len() - 1]
    }

    /// Drop the most recent point of `side`. Returns it, or `None` when the
    /// side has no point in the log.
    pub fn retract(&mut self, side: Side) -> Option<PointEvent> {
        let index = self.entries.iter().rposition(|event| event.side == side)?;
        Some(self.entries.remove(index))
    }

    /// Score obtained by counting the log.
    pub fn tally(&self) -> ScoreState {
        self.entries
            .iter()
            .fold(ScoreState::new(), |score, event| score.add_point(event.side))
    }

    /// Recorded points, oldest first.
    pub fn entries(&self) -> &[PointEvent] {
        &self.entries
    }

    /// Forget every point.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.next_order = 0;
    }
}
