use std::fmt;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::constants::DEFAULT_PRESET;
use crate::spin_config::SpinConfiguration;
use crate::validation::validate_label;

/// Opaque, never-reused identifier for an entry.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A candidate option on the wheel.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Entry {
    id: EntryId,
    label: String,
    active: bool,
}

impl Entry {
    pub fn new(label: impl Into<String>, active: bool) -> Self {
        Self {
            id: EntryId::generate(),
            label: label.into(),
            active,
        }
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Notification returned by every mutation so a presentation layer can
/// react to exactly what happened instead of diffing the whole list.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListChange {
    Added { id: EntryId, position: usize },
    Relabeled { id: EntryId },
    Moved { id: EntryId, from: usize, to: usize },
    Removed { id: EntryId, position: usize },
    Unchanged,
}

/// Ordered list of entries, partitioned into an active prefix and an
/// inactive suffix. Each partition is ordered most-recently-placed first.
///
/// All mutations are total: a stale id is a silent no-op reported as
/// [`ListChange::Unchanged`].
#[derive(Debug, Serialize, Clone, Default)]
pub struct ChoiceList {
    entries: Vec<Entry>,
    // entries[..active_len] are active, entries[active_len..] are not
    #[serde(skip)]
    active_len: usize,
}

impl ChoiceList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list whose order matches `labels`.
    pub fn from_labels<I, S>(labels: I, active: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: Vec<Entry> = labels
            .into_iter()
            .map(|label| Entry::new(label, active))
            .collect();
        let active_len = if active { entries.len() } else { 0 };
        Self { entries, active_len }
    }

    pub fn with_default_preset() -> Self {
        Self::from_labels(DEFAULT_PRESET, true)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.active_len
    }

    pub fn inactive_entries(&self) -> &[Entry] {
        &self.entries[self.active_len..]
    }

    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn position_of(&self, id: EntryId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    pub fn id_at(&self, position: usize) -> Option<EntryId> {
        self.entries.get(position).map(Entry::id)
    }

    /// Inserts an empty entry and returns its id so the caller can focus it.
    pub fn add(&mut self, initial_active: bool) -> EntryId {
        let entry = Entry::new(String::new(), initial_active);
        let id = entry.id;
        let position = self.place(entry);
        log::debug!("Added entry {} at position {}", id, position);
        id
    }

    /// Same as [`ChoiceList::add`], reporting the change instead of the id.
    pub fn add_with_change(&mut self, initial_active: bool) -> ListChange {
        let id = self.add(initial_active);
        ListChange::Added {
            id,
            position: self.position_of(id).unwrap_or(0),
        }
    }

    /// Replaces the label. Never reorders.
    pub fn set_label(&mut self, id: EntryId, text: impl Into<String>) -> ListChange {
        match self.entries.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => {
                entry.label = text.into();
                ListChange::Relabeled { id }
            }
            None => ListChange::Unchanged,
        }
    }

    /// Flips `active` and moves the entry to the front of its new partition.
    pub fn toggle_active(&mut self, id: EntryId) -> ListChange {
        let Some(from) = self.position_of(id) else {
            return ListChange::Unchanged;
        };
        let mut entry = self.detach(from);
        entry.active = !entry.active;
        log::debug!("Entry {} is now {}", id, if entry.active { "active" } else { "inactive" });
        let to = self.place(entry);
        ListChange::Moved { id, from, to }
    }

    /// Moves the entry to the front of its current partition.
    pub fn commit_edit(&mut self, id: EntryId) -> ListChange {
        let Some(from) = self.position_of(id) else {
            return ListChange::Unchanged;
        };
        let entry = self.detach(from);
        let to = self.place(entry);
        ListChange::Moved { id, from, to }
    }

    pub fn remove(&mut self, id: EntryId) -> ListChange {
        match self.position_of(id) {
            Some(position) => self.remove_at(position),
            None => ListChange::Unchanged,
        }
    }

    pub fn remove_at(&mut self, position: usize) -> ListChange {
        if position >= self.entries.len() {
            return ListChange::Unchanged;
        }
        let entry = self.detach(position);
        log::debug!("Removed entry {} from position {}", entry.id, position);
        ListChange::Removed { id: entry.id, position }
    }

    /// Labels of active entries in display order.
    pub fn active_labels(&self) -> Vec<String> {
        self.entries[..self.active_len]
            .iter()
            .map(|entry| entry.label.clone())
            .collect()
    }

    pub fn can_spin(&self, config: &SpinConfiguration) -> bool {
        config.admits(self.active_len)
            && self.entries[..self.active_len]
                .iter()
                .all(|entry| validate_label(&entry.label).is_ok())
    }

    /// UI affordance only; [`ChoiceList::add`] never consults it.
    pub fn can_add(&self, config: &SpinConfiguration) -> bool {
        self.entries.len() < config.max_selectable()
    }

    pub fn is_partitioned(&self) -> bool {
        self.active_len <= self.entries.len()
            && self.entries[..self.active_len].iter().all(|entry| entry.active)
            && self.entries[self.active_len..].iter().all(|entry| !entry.active)
    }

    fn detach(&mut self, position: usize) -> Entry {
        let entry = self.entries.remove(position);
        if entry.active {
            self.active_len -= 1;
        }
        entry
    }

    /// Inserts at the front of the entry's partition and returns the position.
    fn place(&mut self, entry: Entry) -> usize {
        let position = if entry.active {
            self.active_len += 1;
            0
        } else {
            self.active_len
        };
        self.entries.insert(position, entry);
        debug_assert!(self.is_partitioned());
        position
    }
}
