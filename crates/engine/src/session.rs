//! Single-record edit session.
//!
//! At most one draft exists at a time. Drafts never touch the cache: the
//! ledger turns a [`Submission`] into a store call and only returns the
//! session to [`EditSession::Idle`] once the store confirmed it.
use crate::{
    error::LedgerError,
    record::{FieldValue, Fields, Record},
};

#[derive(Clone, Debug, Default, PartialEq)]
pub enum EditSession {
    #[default]
    Idle,
    Creating {
        draft: Fields,
    },
    /// Draft seeded from the record at `index` in the cache.
    Editing {
        index: usize,
        draft: Fields,
    },
}

/// Outcome of [`EditSession::begin_edit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditToggle {
    Opened,
    /// The row was already under edit; the edit was cancelled.
    Closed,
}

/// What a submit has to send to the store.
#[derive(Clone, Debug, PartialEq)]
pub enum Submission {
    Create(Fields),
    Update { index: usize, fields: Fields },
}

impl EditSession {
    /// Starts a new record, discarding any open draft.
    pub fn begin_create(&mut self, blank: Fields) {
        *self = Self::Creating { draft: blank };
    }

    /// Starts editing `record`, found at `index`. Invoking it again for the
    /// row already under edit cancels that edit.
    pub fn begin_edit(&mut self, index: usize, record: &Record) -> EditToggle {
        if self.editing_index() == Some(index) {
            self.cancel();
            return EditToggle::Closed;
        }
        *self = Self::Editing {
            index,
            draft: record.fields.clone(),
        };
        EditToggle::Opened
    }

    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }

    pub fn set_field(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Result<(), LedgerError> {
        let draft = self.draft_mut().ok_or(LedgerError::NoDraft)?;
        draft.insert(name.into(), value.into());
        Ok(())
    }

    pub fn draft(&self) -> Option<&Fields> {
        match self {
            Self::Idle => None,
            Self::Creating { draft } | Self::Editing { draft, .. } => Some(draft),
        }
    }

    fn draft_mut(&mut self) -> Option<&mut Fields> {
        match self {
            Self::Idle => None,
            Self::Creating { draft } | Self::Editing { draft, .. } => Some(draft),
        }
    }

    pub fn editing_index(&self) -> Option<usize> {
        match self {
            Self::Editing { index, .. } => Some(*index),
            _ => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn submission(&self) -> Option<Submission> {
        match self {
            Self::Idle => None,
            Self::Creating { draft } => Some(Submission::Create(draft.clone())),
            Self::Editing { index, draft } => Some(Submission::Update {
                index: *index,
                fields: draft.clone(),
            }),
        }
    }

    /// Keeps the edit target pointing at its record after the record at
    /// `removed` left the cache.
    pub(crate) fn record_removed(&mut self, removed: usize) {
        if let Self::Editing { index, .. } = self {
            if *index == removed {
                self.cancel();
            } else if *index > removed {
                *index -= 1;
            }
        }
    }

    /// Drops an edit whose index may no longer match the cache.
    pub(crate) fn cache_reloaded(&mut self) {
        if matches!(self, Self::Editing { .. }) {
            self.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{DocumentId, fields};

    fn record(amount: &str) -> Record {
        Record::new(DocumentId::new("a").unwrap(), fields([("amount", amount)]))
    }

    #[test]
    fn begin_edit_seeds_draft_from_record() {
        let mut session = EditSession::default();
        assert_eq!(session.begin_edit(0, &record("50")), EditToggle::Opened);
        assert_eq!(
            session,
            EditSession::Editing {
                index: 0,
                draft: fields([("amount", "50")]),
            }
        );
    }

    #[test]
    fn begin_edit_on_same_row_toggles_off() {
        let mut session = EditSession::default();
        session.begin_edit(0, &record("50"));
        assert_eq!(session.begin_edit(0, &record("50")), EditToggle::Closed);
        assert!(session.is_idle());
    }

    #[test]
    fn begin_edit_on_other_row_switches_target() {
        let mut session = EditSession::default();
        session.begin_edit(0, &record("50"));
        session.set_field("amount", "60").unwrap();
        session.begin_edit(1, &record("70"));
        assert_eq!(session.editing_index(), Some(1));
        assert_eq!(session.draft(), Some(&fields([("amount", "70")])));
    }

    #[test]
    fn begin_create_discards_open_edit() {
        let mut session = EditSession::default();
        session.begin_edit(2, &record("50"));
        session.begin_create(fields([("role", "Viewer")]));
        assert_eq!(
            session.submission(),
            Some(Submission::Create(fields([("role", "Viewer")])))
        );
    }

    #[test]
    fn set_field_needs_a_draft() {
        let mut session = EditSession::default();
        assert_eq!(session.set_field("name", "x"), Err(LedgerError::NoDraft));
        assert!(session.submission().is_none());
    }

    #[test]
    fn set_field_only_touches_the_draft() {
        let source = record("50");
        let mut session = EditSession::default();
        session.begin_edit(0, &source);
        session.set_field("amount", "75").unwrap();
        assert_eq!(source.text("amount"), "50");
        assert_eq!(
            session.submission(),
            Some(Submission::Update {
                index: 0,
                fields: fields([("amount", "75")]),
            })
        );
    }

    #[test]
    fn cancel_clears_the_draft() {
        let mut session = EditSession::default();
        session.begin_create(Fields::new());
        session.set_field("name", "x").unwrap();
        session.cancel();
        assert!(session.is_idle());
        assert!(session.draft().is_none());
    }

    #[test]
    fn removal_shifts_or_closes_the_edit() {
        let mut session = EditSession::default();
        session.begin_edit(3, &record("1"));

        session.record_removed(5);
        assert_eq!(session.editing_index(), Some(3));

        session.record_removed(1);
        assert_eq!(session.editing_index(), Some(2));

        session.record_removed(2);
        assert!(session.is_idle());
    }

    #[test]
    fn reload_keeps_a_create_draft() {
        let mut session = EditSession::default();
        session.begin_create(fields([("name", "x")]));
        session.cache_reloaded();
        assert!(!session.is_idle());

        session.begin_edit(0, &record("1"));
        session.cache_reloaded();
        assert!(session.is_idle());
    }
}
