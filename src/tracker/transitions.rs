//! State transitions. Each one leaves the current [Snapshot] untouched and returns the next one,
//! or a [TrackerError] when the change isn't allowed.

use std::collections::{BTreeMap, HashSet};

use thiserror::Error;

use super::entities::{Activity, ActivityId, Rewards, Selections, Snapshot, Tier, TierSet};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackerError {
    #[error("Raid name can't be empty")]
    EmptyName,
    #[error("Gold for {0} has to be set and can't be zero")]
    MissingReward(Tier),
    #[error("There is no raid with id {0}")]
    UnknownActivity(ActivityId),
    #[error("There is no character at position {0}")]
    CharacterOutOfRange(usize),
    #[error("Raid {activity} doesn't offer {tier}")]
    TierNotOffered { activity: ActivityId, tier: Tier },
    #[error("No character name is being edited")]
    NotEditing,
    #[error("There are no raid ids left")]
    IdsExhausted,
}

/// User input for a new activity, before it gets an id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityDraft {
    pub name: String,
    pub rewards: Rewards,
}

impl ActivityDraft {
    /// Every offered tier needs a non-zero amount. Amounts for tiers outside `tiers` are dropped.
    pub fn validate(&self, tiers: &TierSet) -> Result<Rewards, TrackerError> {
        if self.name.trim().is_empty() {
            return Err(TrackerError::EmptyName);
        }
        tiers.iter().try_fold(Rewards::default(), |rewards, tier| {
            match self.rewards.get(tier) {
                Some(amount) if amount > 0 => Ok(rewards.with(tier, amount)),
                _ => Err(TrackerError::MissingReward(tier)),
            }
        })
    }
}

impl Snapshot {
    pub fn add_activity(
        &self,
        id: ActivityId,
        draft: &ActivityDraft,
        tiers: &TierSet,
    ) -> Result<Snapshot, TrackerError> {
        let rewards = draft.validate(tiers)?;
        let mut next = self.clone();
        next.activities.push(Activity {
            id,
            name: draft.name.clone(),
            rewards,
        });
        next.selections
            .0
            .insert(id, Selections::empty_row(self.characters.len()));
        Ok(next)
    }

    pub fn delete_activity(&self, id: ActivityId) -> Result<Snapshot, TrackerError> {
        if self.activity(id).is_none() {
            return Err(TrackerError::UnknownActivity(id));
        }
        let mut next = self.clone();
        next.activities.retain(|v| v.id != id);
        next.selections.0.remove(&id);
        Ok(next)
    }

    pub fn rename_character(&self, index: usize, name: &str) -> Result<Snapshot, TrackerError> {
        if index >= self.characters.len() {
            return Err(TrackerError::CharacterOutOfRange(index));
        }
        let mut next = self.clone();
        next.characters[index] = name.to_string();
        Ok(next)
    }

    pub fn set_selection(
        &self,
        activity_id: ActivityId,
        character: usize,
        tier: Tier,
        tiers: &TierSet,
    ) -> Result<Snapshot, TrackerError> {
        let activity = self
            .activity(activity_id)
            .ok_or(TrackerError::UnknownActivity(activity_id))?;
        if character >= self.characters.len() {
            return Err(TrackerError::CharacterOutOfRange(character));
        }
        if tier.is_reward() && (!tiers.contains(tier) || activity.rewards.get(tier).is_none()) {
            return Err(TrackerError::TierNotOffered {
                activity: activity_id,
                tier,
            });
        }
        let mut next = self.clone();
        next.selections
            .0
            .entry(activity_id)
            .or_default()
            .insert(character, tier);
        Ok(next)
    }

    /// Restores the snapshot invariants: unique activity ids (the first one wins), a full row per
    /// activity, one cell per character, and no rows for activities that no longer exist. A
    /// consistent snapshot comes back unchanged.
    pub fn normalized(mut self) -> Snapshot {
        let mut seen = HashSet::new();
        self.activities.retain(|v| seen.insert(v.id));

        let characters = self.characters.len();
        let mut rows = std::mem::take(&mut self.selections.0);
        self.selections = Selections(
            self.activities
                .iter()
                .map(|activity| {
                    let mut row = rows.remove(&activity.id).unwrap_or_default();
                    row.retain(|index, _| *index < characters);
                    for index in 0..characters {
                        row.entry(index).or_insert(Tier::None);
                    }
                    (activity.id, row)
                })
                .collect::<BTreeMap<_, _>>(),
        );
        self
    }
}
