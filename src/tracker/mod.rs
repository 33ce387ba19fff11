//! State of the calculator. [Tracker] owns the current [Snapshot](entities::Snapshot) and is the
//! only place that changes it: every [Action] goes through [Tracker::dispatch], which applies a
//! pure transition, persists the result and tells observers about it.

pub mod aggregation;
pub mod defaults;
pub mod editing;
pub mod entities;
pub mod transitions;

use anyhow::Result;
use async_trait::async_trait;
use editing::{EditState, NameEditor};
use entities::{ActivityId, Snapshot, Tier, TierSet};
use tracing::{debug, info, instrument, warn};
use transitions::{ActivityDraft, TrackerError};

use crate::storage::{kv_store::KeyValueStore, snapshot_store::SnapshotStore};

/// Yes/no question asked before destructive actions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Confirm: Send {
    async fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// Gets called after every dispatch that changed the snapshot or the editing state.
pub trait SnapshotObserver {
    fn snapshot_changed(&mut self, snapshot: &Snapshot, editing: Option<&EditState>);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    AddActivity(ActivityDraft),
    DeleteActivity(ActivityId),
    RenameCharacter {
        index: usize,
        name: String,
    },
    SetSelection {
        activity: ActivityId,
        character: usize,
        tier: Tier,
    },
    BeginEdit(usize),
    EditInput(String),
    CommitEdit,
    CancelEdit,
    Reset,
}

impl Action {
    /// Whether the action moves focus away from a name being edited.
    fn leaves_edit(&self) -> bool {
        !matches!(
            self,
            Action::BeginEdit(_) | Action::EditInput(_) | Action::CommitEdit | Action::CancelEdit
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The snapshot changed and was saved.
    Changed,
    /// Only the editing state changed.
    ViewChanged,
    Rejected(TrackerError),
    /// A confirmation was declined. Nothing happened.
    Declined,
}

pub const RESET_PROMPT: &str = "Reset all characters, raids and selections?";

/// Hands out activity ids. Ids only grow during a session, deleting an activity never frees its id.
/// Once [ActivityId::MAX] is used up there is nothing left to hand out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdAllocator {
    next: Option<ActivityId>,
}

impl IdAllocator {
    pub fn seeded(snapshot: &Snapshot) -> Self {
        Self {
            next: snapshot.max_activity_id().checked_add(1),
        }
    }

    pub fn peek(&self) -> Option<ActivityId> {
        self.next
    }

    fn advance(&mut self) {
        self.next = self.next.and_then(|v| v.checked_add(1));
    }
}

enum Step {
    Next(Snapshot),
    View,
    Reset(Snapshot),
    Declined,
    Rejected(TrackerError),
}

impl From<Result<Snapshot, TrackerError>> for Step {
    fn from(value: Result<Snapshot, TrackerError>) -> Self {
        match value {
            Ok(v) => Step::Next(v),
            Err(e) => Step::Rejected(e),
        }
    }
}

pub struct Tracker<S> {
    store: SnapshotStore<S>,
    snapshot: Snapshot,
    tiers: TierSet,
    ids: IdAllocator,
    editor: NameEditor,
    observers: Vec<Box<dyn SnapshotObserver>>,
}

impl<S: KeyValueStore> Tracker<S> {
    /// Loads the stored snapshot, falling back to the defaults.
    pub async fn open(store: SnapshotStore<S>, tiers: TierSet) -> Result<Self> {
        let snapshot = store.load().await?;
        info!(
            "Loaded {} characters and {} raids",
            snapshot.characters.len(),
            snapshot.activities.len()
        );
        Ok(Self {
            ids: IdAllocator::seeded(&snapshot),
            store,
            snapshot,
            tiers,
            editor: NameEditor::default(),
            observers: vec![],
        })
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn editing(&self) -> Option<&EditState> {
        self.editor.current()
    }

    pub fn tiers(&self) -> &TierSet {
        &self.tiers
    }

    pub fn next_activity_id(&self) -> Option<ActivityId> {
        self.ids.peek()
    }

    pub fn subscribe(&mut self, observer: Box<dyn SnapshotObserver>) {
        self.observers.push(observer);
    }

    #[instrument(skip(self, confirm))]
    pub async fn dispatch(
        &mut self,
        action: Action,
        confirm: &mut impl Confirm,
    ) -> Result<Outcome> {
        let mut dirty = false;
        if action.leaves_edit() && self.editor.is_editing() {
            dirty = self.commit_pending_edit();
        }

        let outcome = match self.apply(action, confirm).await? {
            Step::Next(next) => {
                self.snapshot = next;
                dirty = true;
                Outcome::Changed
            }
            Step::View => Outcome::ViewChanged,
            Step::Reset(defaults) => {
                self.snapshot = defaults;
                self.ids = IdAllocator::seeded(&self.snapshot);
                self.editor.clear();
                // Storage was just cleared, a pending edit isn't saved either.
                info!("Tracker reset to defaults");
                self.notify();
                return Ok(Outcome::Changed);
            }
            Step::Declined => Outcome::Declined,
            Step::Rejected(e) => {
                warn!("Action rejected: {e}");
                Outcome::Rejected(e)
            }
        };

        if dirty {
            self.store.save(&self.snapshot).await?;
        }
        if dirty || outcome == Outcome::ViewChanged {
            self.notify();
        }
        Ok(outcome)
    }

    async fn apply(&mut self, action: Action, confirm: &mut impl Confirm) -> Result<Step> {
        let step = match action {
            Action::AddActivity(draft) => {
                let Some(id) = self.ids.peek() else {
                    return Ok(Step::Rejected(TrackerError::IdsExhausted));
                };
                let step = Step::from(self.snapshot.add_activity(id, &draft, &self.tiers));
                if matches!(step, Step::Next(_)) {
                    debug!("Added raid {id}");
                    self.ids.advance();
                }
                step
            }
            Action::DeleteActivity(id) => self.snapshot.delete_activity(id).into(),
            Action::RenameCharacter { index, name } => {
                self.snapshot.rename_character(index, &name).into()
            }
            Action::SetSelection {
                activity,
                character,
                tier,
            } => self
                .snapshot
                .set_selection(activity, character, tier, &self.tiers)
                .into(),
            // Already editing this cell, keep the buffer.
            Action::BeginEdit(index)
                if self.editor.current().is_some_and(|v| v.index == index) =>
            {
                Step::View
            }
            Action::BeginEdit(index) => match self.snapshot.characters.get(index) {
                Some(name) => {
                    let name = name.clone();
                    match self.editor.begin(index, &name) {
                        // Starting another edit blurs the previous one.
                        Some(previous) => self
                            .snapshot
                            .rename_character(previous.index, &previous.buffer)
                            .into(),
                        None => Step::View,
                    }
                }
                None => Step::Rejected(TrackerError::CharacterOutOfRange(index)),
            },
            Action::EditInput(text) => match self.editor.input(&text) {
                Ok(()) => Step::View,
                Err(e) => Step::Rejected(e),
            },
            Action::CommitEdit => match self.editor.commit() {
                Ok(edit) => self.snapshot.rename_character(edit.index, &edit.buffer).into(),
                Err(e) => Step::Rejected(e),
            },
            Action::CancelEdit => match self.editor.cancel() {
                Ok(edit) => {
                    debug!("Edit of {:?} cancelled", edit.original);
                    Step::View
                }
                Err(e) => Step::Rejected(e),
            },
            Action::Reset => {
                if confirm.confirm(RESET_PROMPT).await? {
                    Step::Reset(self.store.reset().await?)
                } else {
                    info!("Reset declined");
                    Step::Declined
                }
            }
        };
        Ok(step)
    }

    /// Writes the open edit into the roster. Returns whether the snapshot changed.
    fn commit_pending_edit(&mut self) -> bool {
        let Ok(edit) = self.editor.commit() else {
            return false;
        };
        match self.snapshot.rename_character(edit.index, &edit.buffer) {
            Ok(next) => {
                self.snapshot = next;
                true
            }
            Err(e) => {
                warn!("Dropping edit of character {}: {e}", edit.index);
                false
            }
        }
    }

    fn notify(&mut self) {
        let editing = self.editor.current();
        for observer in self.observers.iter_mut() {
            observer.snapshot_changed(&self.snapshot, editing);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc, sync::Arc};

    use anyhow::Result;

    use crate::{
        storage::{
            kv_store::{KeyValueStore, MemoryKeyValueStore},
            snapshot_store::{SnapshotStore, STORAGE_KEY},
        },
        utils::logging::TEST_LOGGING,
    };

    use super::{
        editing::EditState,
        entities::{Rewards, Selections, Snapshot, Tier, TierSet},
        transitions::{ActivityDraft, TrackerError},
        Action, MockConfirm, Outcome, SnapshotObserver, Tracker, RESET_PROMPT,
    };

    type TestTracker = Tracker<Arc<MemoryKeyValueStore>>;

    async fn open_tracker(store: &Arc<MemoryKeyValueStore>) -> Result<TestTracker> {
        Tracker::open(SnapshotStore::new(store.clone()), TierSet::default()).await
    }

    async fn stored(store: &Arc<MemoryKeyValueStore>) -> Result<Snapshot> {
        SnapshotStore::new(store.clone()).load().await
    }

    fn never_asked() -> MockConfirm {
        let mut confirm = MockConfirm::new();
        confirm.expect_confirm().never();
        confirm
    }

    fn select(activity: u32, character: usize, tier: Tier) -> Action {
        Action::SetSelection {
            activity,
            character,
            tier,
        }
    }

    fn test_raid() -> Action {
        Action::AddActivity(ActivityDraft {
            name: "TestRaid".into(),
            rewards: Rewards::new(1000, 2000, 3000),
        })
    }

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<(Snapshot, Option<EditState>)>>>);

    impl SnapshotObserver for Recorder {
        fn snapshot_changed(&mut self, snapshot: &Snapshot, editing: Option<&EditState>) {
            self.0.borrow_mut().push((snapshot.clone(), editing.cloned()));
        }
    }

    #[tokio::test]
    async fn test_selection_scenario() -> Result<()> {
        *TEST_LOGGING;
        let store = Arc::new(MemoryKeyValueStore::new());
        let mut tracker = open_tracker(&store).await?;
        let mut confirm = never_asked();

        assert_eq!(tracker.snapshot().grand_total(), 0);
        let outcome = tracker.dispatch(select(1, 0, Tier::Hard), &mut confirm).await?;
        assert_eq!(outcome, Outcome::Changed);

        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.activity_total(1), 7500);
        assert_eq!(snapshot.character_total(0), 7500);
        assert_eq!(snapshot.grand_total(), 7500);
        assert_eq!(&stored(&store).await?, snapshot);
        Ok(())
    }

    #[tokio::test]
    async fn test_add_activity_scenario() -> Result<()> {
        let store = Arc::new(MemoryKeyValueStore::new());
        let mut tracker = open_tracker(&store).await?;
        let mut confirm = never_asked();
        tracker.dispatch(select(1, 0, Tier::Hard), &mut confirm).await?;

        assert_eq!(tracker.next_activity_id(), Some(5));
        assert_eq!(tracker.dispatch(test_raid(), &mut confirm).await?, Outcome::Changed);

        let snapshot = tracker.snapshot();
        let added = snapshot.activity(5).unwrap();
        assert_eq!(added.name, "TestRaid");
        assert_eq!(snapshot.selections.row(5), Some(&Selections::empty_row(6)));
        assert_eq!(snapshot.grand_total(), 7500);

        tracker.dispatch(select(5, 3, Tier::Normal), &mut confirm).await?;
        assert_eq!(tracker.snapshot().grand_total(), 9500);
        assert_eq!(&stored(&store).await?, tracker.snapshot());
        Ok(())
    }

    #[tokio::test]
    async fn test_rejected_add_changes_nothing() -> Result<()> {
        let store = Arc::new(MemoryKeyValueStore::new());
        let mut tracker = open_tracker(&store).await?;
        let mut confirm = never_asked();

        let outcome = tracker
            .dispatch(
                Action::AddActivity(ActivityDraft {
                    name: "".into(),
                    rewards: Rewards::new(1, 2, 3),
                }),
                &mut confirm,
            )
            .await?;
        assert_eq!(outcome, Outcome::Rejected(TrackerError::EmptyName));
        assert_eq!(tracker.snapshot(), &Snapshot::default_snapshot());
        assert_eq!(tracker.next_activity_id(), Some(5));
        assert_eq!(store.get(STORAGE_KEY).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_ids_are_not_reused() -> Result<()> {
        let store = Arc::new(MemoryKeyValueStore::new());
        let mut tracker = open_tracker(&store).await?;
        let mut confirm = never_asked();

        tracker.dispatch(test_raid(), &mut confirm).await?;
        tracker.dispatch(select(5, 2, Tier::Hard), &mut confirm).await?;
        tracker.dispatch(Action::DeleteActivity(5), &mut confirm).await?;
        tracker.dispatch(Action::DeleteActivity(2), &mut confirm).await?;
        tracker.dispatch(test_raid(), &mut confirm).await?;

        let snapshot = tracker.snapshot();
        let ids = snapshot.activities.iter().map(|v| v.id).collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 3, 4, 6]);
        assert!(snapshot.selections.row(5).is_none());
        assert_eq!(snapshot.selections.row(6), Some(&Selections::empty_row(6)));
        assert_eq!(snapshot.grand_total(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_huge_rewards() -> Result<()> {
        let store = Arc::new(MemoryKeyValueStore::new());
        let mut tracker = open_tracker(&store).await?;
        let mut confirm = never_asked();
        let half = u64::MAX / 2 + 1;

        tracker
            .dispatch(
                Action::AddActivity(ActivityDraft {
                    name: "Behemoth".into(),
                    rewards: Rewards::new(half, half, half),
                }),
                &mut confirm,
            )
            .await?;
        tracker.dispatch(select(5, 0, Tier::Hard), &mut confirm).await?;
        tracker.dispatch(select(5, 1, Tier::Hard), &mut confirm).await?;

        assert_eq!(tracker.snapshot().activity_total(5), u64::MAX);
        assert_eq!(tracker.snapshot().grand_total(), u64::MAX);
        Ok(())
    }

    #[tokio::test]
    async fn test_ids_exhausted() -> Result<()> {
        let store = Arc::new(MemoryKeyValueStore::new());
        let raw = serde_json::json!({
            "raids": [{
                "id": u32::MAX,
                "name": "Last",
                "singleGold": 1,
                "normalGold": 2,
                "hardGold": 3
            }]
        });
        store.set(STORAGE_KEY, &raw.to_string()).await?;
        let mut tracker = open_tracker(&store).await?;
        let mut confirm = never_asked();
        assert_eq!(tracker.next_activity_id(), None);

        assert_eq!(
            tracker.dispatch(test_raid(), &mut confirm).await?,
            Outcome::Rejected(TrackerError::IdsExhausted)
        );
        assert_eq!(tracker.snapshot().activities.len(), 1);

        // Everything else keeps working.
        assert_eq!(
            tracker.dispatch(select(u32::MAX, 0, Tier::Hard), &mut confirm).await?,
            Outcome::Changed
        );
        assert_eq!(tracker.snapshot().grand_total(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_add_then_delete_restores() -> Result<()> {
        let store = Arc::new(MemoryKeyValueStore::new());
        let mut tracker = open_tracker(&store).await?;
        let mut confirm = never_asked();
        let before = tracker.snapshot().clone();

        tracker.dispatch(test_raid(), &mut confirm).await?;
        tracker.dispatch(Action::DeleteActivity(5), &mut confirm).await?;
        assert_eq!(tracker.snapshot(), &before);

        assert_eq!(
            tracker.dispatch(Action::DeleteActivity(5), &mut confirm).await?,
            Outcome::Rejected(TrackerError::UnknownActivity(5))
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_edit_commit() -> Result<()> {
        let store = Arc::new(MemoryKeyValueStore::new());
        let mut tracker = open_tracker(&store).await?;
        let mut confirm = never_asked();

        assert_eq!(
            tracker.dispatch(Action::BeginEdit(2), &mut confirm).await?,
            Outcome::ViewChanged
        );
        tracker
            .dispatch(Action::EditInput("Artist".into()), &mut confirm)
            .await?;
        assert_eq!(tracker.snapshot().characters[2], "Character 3");
        assert_eq!(tracker.editing().unwrap().buffer, "Artist");
        // Nothing is saved while typing.
        assert_eq!(store.get(STORAGE_KEY).await?, None);

        assert_eq!(
            tracker.dispatch(Action::CommitEdit, &mut confirm).await?,
            Outcome::Changed
        );
        assert_eq!(tracker.snapshot().characters[2], "Artist");
        assert!(tracker.editing().is_none());
        assert_eq!(stored(&store).await?.characters[2], "Artist");
        Ok(())
    }

    #[tokio::test]
    async fn test_edit_cancel_reverts() -> Result<()> {
        let store = Arc::new(MemoryKeyValueStore::new());
        let mut tracker = open_tracker(&store).await?;
        let mut confirm = never_asked();

        tracker.dispatch(Action::BeginEdit(0), &mut confirm).await?;
        tracker
            .dispatch(Action::EditInput("Oops".into()), &mut confirm)
            .await?;
        assert_eq!(
            tracker.dispatch(Action::CancelEdit, &mut confirm).await?,
            Outcome::ViewChanged
        );
        assert_eq!(tracker.snapshot().characters[0], "Character 1");
        assert!(tracker.editing().is_none());
        assert_eq!(
            tracker.dispatch(Action::CancelEdit, &mut confirm).await?,
            Outcome::Rejected(TrackerError::NotEditing)
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_edit_commits_on_blur() -> Result<()> {
        let store = Arc::new(MemoryKeyValueStore::new());
        let mut tracker = open_tracker(&store).await?;
        let mut confirm = never_asked();

        tracker.dispatch(Action::BeginEdit(1), &mut confirm).await?;
        tracker
            .dispatch(Action::EditInput("Bard".into()), &mut confirm)
            .await?;
        // Starting another edit commits the first.
        assert_eq!(
            tracker.dispatch(Action::BeginEdit(4), &mut confirm).await?,
            Outcome::Changed
        );
        assert_eq!(tracker.snapshot().characters[1], "Bard");
        assert_eq!(tracker.editing().unwrap().index, 4);

        tracker
            .dispatch(Action::EditInput("Striker".into()), &mut confirm)
            .await?;
        // Any other action does as well.
        tracker.dispatch(select(3, 4, Tier::Single), &mut confirm).await?;
        assert_eq!(tracker.snapshot().characters[4], "Striker");
        assert!(tracker.editing().is_none());

        let stored = stored(&store).await?;
        assert_eq!(stored.characters[1], "Bard");
        assert_eq!(stored.characters[4], "Striker");
        assert_eq!(stored.selections.get(3, 4), Tier::Single);
        Ok(())
    }

    #[tokio::test]
    async fn test_reedit_same_cell() -> Result<()> {
        let store = Arc::new(MemoryKeyValueStore::new());
        let mut tracker = open_tracker(&store).await?;
        let mut confirm = never_asked();

        tracker.dispatch(Action::BeginEdit(1), &mut confirm).await?;
        tracker
            .dispatch(Action::EditInput("Bard".into()), &mut confirm)
            .await?;
        assert_eq!(
            tracker.dispatch(Action::BeginEdit(1), &mut confirm).await?,
            Outcome::ViewChanged
        );
        assert_eq!(tracker.editing().unwrap().buffer, "Bard");
        assert_eq!(tracker.snapshot().characters[1], "Character 2");

        tracker.dispatch(Action::CommitEdit, &mut confirm).await?;
        assert_eq!(tracker.snapshot().characters[1], "Bard");
        assert_eq!(stored(&store).await?.characters[1], "Bard");
        Ok(())
    }

    #[tokio::test]
    async fn test_begin_edit_out_of_range() -> Result<()> {
        let store = Arc::new(MemoryKeyValueStore::new());
        let mut tracker = open_tracker(&store).await?;
        assert_eq!(
            tracker.dispatch(Action::BeginEdit(6), &mut never_asked()).await?,
            Outcome::Rejected(TrackerError::CharacterOutOfRange(6))
        );
        assert!(tracker.editing().is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_reset_confirmed() -> Result<()> {
        let store = Arc::new(MemoryKeyValueStore::new());
        let mut tracker = open_tracker(&store).await?;
        let mut confirm = MockConfirm::new();
        confirm
            .expect_confirm()
            .withf(|prompt| prompt == RESET_PROMPT)
            .times(1)
            .returning(|_| Ok(true));

        tracker.dispatch(test_raid(), &mut confirm).await?;
        tracker.dispatch(test_raid(), &mut confirm).await?;
        tracker.dispatch(select(6, 1, Tier::Hard), &mut confirm).await?;
        tracker.dispatch(Action::BeginEdit(0), &mut confirm).await?;

        assert_eq!(tracker.dispatch(Action::Reset, &mut confirm).await?, Outcome::Changed);
        assert_eq!(tracker.snapshot(), &Snapshot::default_snapshot());
        assert!(tracker.editing().is_none());
        assert_eq!(tracker.next_activity_id(), Some(5));
        assert_eq!(store.get(STORAGE_KEY).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_reset_declined() -> Result<()> {
        let store = Arc::new(MemoryKeyValueStore::new());
        let mut tracker = open_tracker(&store).await?;
        let mut confirm = MockConfirm::new();
        confirm.expect_confirm().times(1).returning(|_| Ok(false));

        tracker.dispatch(select(2, 2, Tier::Normal), &mut confirm).await?;
        let before = tracker.snapshot().clone();

        assert_eq!(tracker.dispatch(Action::Reset, &mut confirm).await?, Outcome::Declined);
        assert_eq!(tracker.snapshot(), &before);
        assert_eq!(stored(&store).await?, before);
        Ok(())
    }

    #[tokio::test]
    async fn test_reopen_keeps_state() -> Result<()> {
        let store = Arc::new(MemoryKeyValueStore::new());
        let snapshot = {
            let mut tracker = open_tracker(&store).await?;
            let mut confirm = never_asked();
            tracker.dispatch(test_raid(), &mut confirm).await?;
            tracker.dispatch(select(5, 5, Tier::Single), &mut confirm).await?;
            tracker
                .dispatch(
                    Action::RenameCharacter {
                        index: 5,
                        name: "Alt".into(),
                    },
                    &mut confirm,
                )
                .await?;
            tracker.snapshot().clone()
        };

        let tracker = open_tracker(&store).await?;
        assert_eq!(tracker.snapshot(), &snapshot);
        assert_eq!(tracker.snapshot().grand_total(), 1000);
        assert_eq!(tracker.next_activity_id(), Some(6));
        Ok(())
    }

    #[tokio::test]
    async fn test_observers() -> Result<()> {
        let store = Arc::new(MemoryKeyValueStore::new());
        let mut tracker = open_tracker(&store).await?;
        let recorder = Recorder::default();
        tracker.subscribe(Box::new(recorder.clone()));
        let mut confirm = never_asked();

        tracker.dispatch(select(1, 1, Tier::Single), &mut confirm).await?;
        // Rejected actions don't notify.
        tracker.dispatch(Action::DeleteActivity(99), &mut confirm).await?;
        tracker.dispatch(Action::BeginEdit(3), &mut confirm).await?;

        let events = recorder.0.borrow();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].0.grand_total(), 3000);
        assert_eq!(events[0].1, None);
        assert_eq!(events[1].1.as_ref().map(|v| v.index), Some(3));
        Ok(())
    }

    #[tokio::test]
    async fn test_two_tier_configuration() -> Result<()> {
        let store = Arc::new(MemoryKeyValueStore::new());
        let tiers: TierSet = "normal,hard".parse()?;
        let mut tracker = Tracker::open(SnapshotStore::new(store.clone()), tiers).await?;
        let mut confirm = never_asked();

        let outcome = tracker
            .dispatch(
                Action::AddActivity(ActivityDraft {
                    name: "Behemoth".into(),
                    rewards: Rewards::default().with(Tier::Normal, 18000),
                }),
                &mut confirm,
            )
            .await?;
        assert_eq!(outcome, Outcome::Rejected(TrackerError::MissingReward(Tier::Hard)));

        assert_eq!(
            tracker.dispatch(select(1, 0, Tier::Single), &mut confirm).await?,
            Outcome::Rejected(TrackerError::TierNotOffered {
                activity: 1,
                tier: Tier::Single
            })
        );
        assert_eq!(
            tracker.dispatch(select(1, 0, Tier::Normal), &mut confirm).await?,
            Outcome::Changed
        );
        Ok(())
    }
}
