use std::collections::HashSet;

use crate::note::NoteRecord;

/// Notes accumulated for one consolidating transaction.
#[derive(Clone, Debug, Default)]
pub struct Batch {
    pub note_hashes: Vec<String>,
    pub total_value: u64,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.note_hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.note_hashes.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// No position index yet, the note is not spendable.
    Unconfirmed,
    /// Value above the ceiling, the note is already large enough.
    ValueAboveCeiling,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    Included,
    Skipped(SkipReason),
    /// Already consumed earlier in the run. The note source may serve
    /// overlapping pages, so a note is only ever considered once.
    Duplicate,
}

/// Decides per note whether it joins the open batch, and tracks the
/// processed-note counter that drives both batch submission and loop
/// termination. Skipped notes count toward both; duplicates toward neither.
pub struct NoteAccumulator {
    batch: Batch,
    processed: u64,
    consumed: HashSet<String>,
    max_note_value: u64,
    batch_trigger: u64,
}

impl NoteAccumulator {
    pub fn new(max_note_value: u64, batch_trigger: u64) -> Self {
        assert!(batch_trigger > 0, "batch trigger must be positive");
        NoteAccumulator {
            batch: Batch::default(),
            processed: 0,
            consumed: HashSet::new(),
            max_note_value,
            batch_trigger,
        }
    }

    pub fn consider(&mut self, note: &NoteRecord) -> Disposition {
        if !self.consumed.insert(note.note_hash.clone()) {
            return Disposition::Duplicate;
        }
        self.processed += 1;

        if !note.is_confirmed() {
            return Disposition::Skipped(SkipReason::Unconfirmed);
        }
        if note.value > self.max_note_value {
            return Disposition::Skipped(SkipReason::ValueAboveCeiling);
        }

        self.batch.note_hashes.push(note.note_hash.clone());
        self.batch.total_value += note.value;
        Disposition::Included
    }

    /// Total notes considered so far, included and skipped alike.
    pub fn processed(&self) -> u64 {
        self.processed
    }

    /// True exactly when the counter sits on a batch-trigger boundary.
    /// Meaningful right after a non-duplicate `consider` call.
    pub fn at_trigger(&self) -> bool {
        self.processed > 0 && self.processed % self.batch_trigger == 0
    }

    pub fn open_batch_len(&self) -> usize {
        self.batch.len()
    }

    /// Hands over the open batch and resets to empty/zero.
    pub fn take_batch(&mut self) -> Batch {
        std::mem::take(&mut self.batch)
    }
}
