use super::entities::{Activity, Rewards, Selections, Snapshot};

pub const DEFAULT_ROSTER_SIZE: usize = 6;

const DEFAULT_CATALOG: [(&str, u64, u64, u64); 4] = [
    ("Kayangel", 3000, 4500, 7500),
    ("Abrelshud", 3000, 4500, 7500),
    ("Illiakan", 3000, 4500, 7500),
    ("Kouku-Saton", 3000, 4500, 7500),
];

pub fn default_characters() -> Vec<String> {
    (1..=DEFAULT_ROSTER_SIZE)
        .map(|i| format!("Character {i}"))
        .collect()
}

pub fn default_activities() -> Vec<Activity> {
    DEFAULT_CATALOG
        .iter()
        .zip(1..)
        .map(|(&(name, single, normal, hard), id)| Activity {
            id,
            name: name.to_string(),
            rewards: Rewards::new(single, normal, hard),
        })
        .collect()
}

impl Snapshot {
    /// State used on first start, after a reset, and whenever the stored state can't be read.
    pub fn default_snapshot() -> Self {
        let characters = default_characters();
        let activities = default_activities();
        let selections = Selections(
            activities
                .iter()
                .map(|activity| (activity.id, Selections::empty_row(characters.len())))
                .collect(),
        );
        Self {
            characters,
            activities,
            selections,
        }
    }
}
