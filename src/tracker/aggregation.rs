//! Gold totals derived from a [Snapshot]. Everything here is recomputed on demand and has no side
//! effects. Sums saturate at [u64::MAX], which keeps every way of adding up the grand total equal.

use super::entities::{ActivityId, Snapshot};

impl Snapshot {
    /// Gold earned from one activity across the whole roster. Unknown activities earn nothing.
    pub fn activity_total(&self, activity_id: ActivityId) -> u64 {
        let (Some(activity), Some(row)) = (
            self.activity(activity_id),
            self.selections.row(activity_id),
        ) else {
            return 0;
        };
        row.iter()
            .filter(|(index, _)| **index < self.characters.len())
            .map(|(_, tier)| activity.rewards.amount(*tier))
            .fold(0, u64::saturating_add)
    }

    /// Gold earned by one character across every activity.
    pub fn character_total(&self, character: usize) -> u64 {
        if character >= self.characters.len() {
            return 0;
        }
        self.activities
            .iter()
            .map(|activity| {
                activity
                    .rewards
                    .amount(self.selections.get(activity.id, character))
            })
            .fold(0, u64::saturating_add)
    }

    pub fn grand_total(&self) -> u64 {
        (0..self.characters.len())
            .map(|character| self.character_total(character))
            .fold(0, u64::saturating_add)
    }
}

/// All totals of a snapshot at once, in roster and catalog order. Used for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Totals {
    pub by_activity: Vec<(ActivityId, u64)>,
    pub by_character: Vec<u64>,
    pub grand: u64,
}

impl Totals {
    pub fn compute(snapshot: &Snapshot) -> Self {
        Self {
            by_activity: snapshot
                .activities
                .iter()
                .map(|v| (v.id, snapshot.activity_total(v.id)))
                .collect(),
            by_character: (0..snapshot.characters.len())
                .map(|v| snapshot.character_total(v))
                .collect(),
            grand: snapshot.grand_total(),
        }
    }
}
