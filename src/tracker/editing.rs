use super::transitions::TrackerError;

/// A character name that is currently being edited. The buffer is only written into the roster
/// on commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditState {
    pub index: usize,
    pub original: String,
    pub buffer: String,
}

/// View state of the name header. At most one name is edited at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameEditor {
    editing: Option<EditState>,
}

impl NameEditor {
    pub fn current(&self) -> Option<&EditState> {
        self.editing.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// Starts editing `index`. Returns the edit that was still open, which the caller is expected
    /// to commit.
    pub fn begin(&mut self, index: usize, current_name: &str) -> Option<EditState> {
        self.editing.replace(EditState {
            index,
            original: current_name.to_string(),
            buffer: current_name.to_string(),
        })
    }

    pub fn input(&mut self, text: &str) -> Result<(), TrackerError> {
        let state = self.editing.as_mut().ok_or(TrackerError::NotEditing)?;
        state.buffer = text.to_string();
        Ok(())
    }

    /// Leaves editing mode, handing back the edit to be written.
    pub fn commit(&mut self) -> Result<EditState, TrackerError> {
        self.editing.take().ok_or(TrackerError::NotEditing)
    }

    /// Leaves editing mode and throws the buffer away.
    pub fn cancel(&mut self) -> Result<EditState, TrackerError> {
        self.editing.take().ok_or(TrackerError::NotEditing)
    }

    pub fn clear(&mut self) {
        self.editing = None;
    }
}
