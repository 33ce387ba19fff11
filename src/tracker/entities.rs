use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use anyhow::anyhow;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub type ActivityId = u32;

/// Difficulty a character runs an activity on. [Tier::None] means the character skips it this
/// week.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    None,
    Single,
    Normal,
    Hard,
}

impl Tier {
    pub const REWARD_TIERS: [Tier; 3] = [Tier::Single, Tier::Normal, Tier::Hard];

    pub fn is_reward(&self) -> bool {
        !matches!(self, Tier::None)
    }
}

impl Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::None => write!(f, "none"),
            Tier::Single => write!(f, "single"),
            Tier::Normal => write!(f, "normal"),
            Tier::Hard => write!(f, "hard"),
        }
    }
}

/// Reward tiers offered by the calculator. Only affects what can be entered and displayed, the
/// persisted layout is the same for every set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierSet(Vec<Tier>);

impl TierSet {
    pub fn new_opt(tiers: impl IntoIterator<Item = Tier>) -> Option<Self> {
        let mut tiers = tiers
            .into_iter()
            .filter(Tier::is_reward)
            .collect::<Vec<_>>();
        tiers.sort();
        tiers.dedup();
        if tiers.is_empty() {
            None
        } else {
            Some(Self(tiers))
        }
    }

    pub fn contains(&self, tier: Tier) -> bool {
        self.0.contains(&tier)
    }

    pub fn iter(&self) -> impl Iterator<Item = Tier> + '_ {
        self.0.iter().copied()
    }
}

impl Default for TierSet {
    fn default() -> Self {
        Self(Tier::REWARD_TIERS.to_vec())
    }
}

impl Display for TierSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = self.0.iter().map(Tier::to_string).collect::<Vec<_>>();
        write!(f, "{}", names.join(","))
    }
}

impl FromStr for TierSet {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tiers = s
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| Tier::from_str(v, true).map_err(|e| anyhow!(e)))
            .collect::<anyhow::Result<Vec<_>>>()?;
        if tiers.contains(&Tier::None) {
            return Err(anyhow!("\"none\" can't be configured as a reward tier"));
        }
        TierSet::new_opt(tiers).ok_or_else(|| anyhow!("At least one reward tier is required"))
    }
}

/// Gold paid out per tier. Tiers an activity doesn't offer are left out of the stored json.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rewards {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_gold: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal_gold: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hard_gold: Option<u64>,
}

impl Rewards {
    pub fn new(single: u64, normal: u64, hard: u64) -> Self {
        Self {
            single_gold: Some(single),
            normal_gold: Some(normal),
            hard_gold: Some(hard),
        }
    }

    pub fn get(&self, tier: Tier) -> Option<u64> {
        match tier {
            Tier::None => None,
            Tier::Single => self.single_gold,
            Tier::Normal => self.normal_gold,
            Tier::Hard => self.hard_gold,
        }
    }

    /// Amount earned for running on `tier`. Skipping or an unoffered tier pays nothing.
    pub fn amount(&self, tier: Tier) -> u64 {
        self.get(tier).unwrap_or(0)
    }

    pub fn with(mut self, tier: Tier, amount: u64) -> Self {
        match tier {
            Tier::None => {}
            Tier::Single => self.single_gold = Some(amount),
            Tier::Normal => self.normal_gold = Some(amount),
            Tier::Hard => self.hard_gold = Some(amount),
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub name: String,
    #[serde(flatten)]
    pub rewards: Rewards,
}

/// Chosen tier for every (activity, character) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selections(pub BTreeMap<ActivityId, BTreeMap<usize, Tier>>);

impl Selections {
    pub fn get(&self, activity: ActivityId, character: usize) -> Tier {
        self.0
            .get(&activity)
            .and_then(|row| row.get(&character))
            .copied()
            .unwrap_or_default()
    }

    pub fn row(&self, activity: ActivityId) -> Option<&BTreeMap<usize, Tier>> {
        self.0.get(&activity)
    }

    /// A row with every character skipping the activity.
    pub fn empty_row(characters: usize) -> BTreeMap<usize, Tier> {
        (0..characters).map(|index| (index, Tier::None)).collect()
    }
}

/// Everything that gets persisted. Field names are the stored json layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub characters: Vec<String>,
    #[serde(rename = "raids")]
    pub activities: Vec<Activity>,
    pub selections: Selections,
}

impl Snapshot {
    pub fn activity(&self, id: ActivityId) -> Option<&Activity> {
        self.activities.iter().find(|v| v.id == id)
    }

    pub fn max_activity_id(&self) -> ActivityId {
        self.activities.iter().map(|v| v.id).max().unwrap_or(0)
    }
}

/// Stored payload before defaults are applied. Every field may be missing on its own.
#[derive(Debug, Default, Deserialize)]
pub struct PartialSnapshot {
    pub characters: Option<Vec<String>>,
    pub raids: Option<Vec<Activity>>,
    pub selections: Option<Selections>,
}
