use std::sync::Arc;

use storage::repository::{KeyValueStore, PROGRESS_KEY, ProgressRecord};
use tutor_core::model::{Catalog, CompletionRecord, Lesson, ProgressPointer};
use tutor_core::{Clock, navigation};

use crate::error::ProgressError;
use crate::presentation::{LessonView, RESET_PROMPT, ResetGate};

/// Owns the learner's pointer and completion record and keeps them in sync
/// with the key-value store.
///
/// The pointer always references an existing lesson of `catalog`.
pub struct ProgressStore {
    catalog: Arc<Catalog>,
    kv: Arc<dyn KeyValueStore>,
    clock: Clock,
    pointer: ProgressPointer,
    completion: CompletionRecord,
}

impl ProgressStore {
    /// Create a store at the first lesson with nothing completed.
    ///
    /// Nothing is read from storage; use [`ProgressStore::load`] for that.
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, kv: Arc<dyn KeyValueStore>, clock: Clock) -> Self {
        Self {
            catalog,
            kv,
            clock,
            pointer: ProgressPointer::default(),
            completion: CompletionRecord::new(),
        }
    }

    /// Create a store and restore persisted progress into it.
    pub async fn open(catalog: Arc<Catalog>, kv: Arc<dyn KeyValueStore>, clock: Clock) -> Self {
        let mut store = Self::new(catalog, kv, clock);
        store.load().await;
        store
    }

    /// Replace in-memory state with the persisted one.
    ///
    /// Absent, unreadable or malformed state falls back to the first lesson
    /// with an empty completion record. A stored pointer that no longer fits
    /// the catalog is resolved into it.
    pub async fn load(&mut self) {
        let (pointer, completion) = match self.read_record().await {
            Some(record) => record.into_state(),
            None => (ProgressPointer::default(), CompletionRecord::new()),
        };

        let resolved = navigation::resolve(
            &self.catalog,
            i64::from(pointer.group()),
            i64::from(pointer.lesson()),
        );
        if resolved != pointer {
            tracing::warn!(stored = %pointer, resolved = %resolved, "stored pointer outside catalog");
        }

        self.pointer = resolved;
        self.completion = completion;
        tracing::debug!(pointer = %self.pointer, completed = self.completion.len(), "progress loaded");
    }

    async fn read_record(&self) -> Option<ProgressRecord> {
        let bytes = match self.kv.get(PROGRESS_KEY).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(error = %err, "could not read progress, starting fresh");
                return None;
            }
        };
        match ProgressRecord::decode(&bytes) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::warn!(error = %err, "discarding malformed progress");
                None
            }
        }
    }

    /// Persist the pointer and completion record.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if the record cannot be encoded or
    /// written.
    pub async fn save(&self) -> Result<(), ProgressError> {
        let record = ProgressRecord::from_state(self.pointer, &self.completion, self.clock.now());
        self.kv.set(PROGRESS_KEY, &record.encode()?).await?;
        tracing::debug!(pointer = %self.pointer, "progress saved");
        Ok(())
    }

    /// Mark the current lesson completed. Returns `false` if it already was.
    pub fn complete_lesson(&mut self) -> bool {
        let newly = self.completion.mark(self.pointer);
        if newly {
            tracing::info!(lesson = %self.pointer, "lesson completed");
        }
        newly
    }

    /// Clear all progress if `gate` confirms, then persist.
    ///
    /// Returns `Ok(false)` without touching anything when the gate declines.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` if the cleared state cannot be saved.
    pub async fn reset(&mut self, gate: &dyn ResetGate) -> Result<bool, ProgressError> {
        if !gate.confirm(RESET_PROMPT) {
            tracing::debug!("reset declined");
            return Ok(false);
        }
        self.completion.clear();
        self.pointer = ProgressPointer::default();
        tracing::info!("progress reset");
        self.save().await?;
        Ok(true)
    }

    #[must_use]
    pub fn has_finished_group(&self, group: u32) -> bool {
        self.completion.has_finished_group(&self.catalog, group)
    }

    #[must_use]
    pub fn has_finished(&self) -> bool {
        self.completion.has_finished(&self.catalog)
    }

    #[must_use]
    pub fn pointer(&self) -> ProgressPointer {
        self.pointer
    }

    #[must_use]
    pub fn completion(&self) -> &CompletionRecord {
        &self.completion
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    #[must_use]
    pub fn current_lesson(&self) -> Option<&Lesson> {
        self.catalog.lesson(self.pointer)
    }

    /// View of the current lesson for the presentation sink.
    #[must_use]
    pub fn view(&self) -> Option<LessonView<'_>> {
        let group = self.catalog.group(self.pointer.group())?;
        let lesson = self.catalog.lesson(self.pointer)?;
        Some(LessonView {
            pointer: self.pointer,
            ordinal: self.catalog.ordinal_of(self.pointer)?,
            total: self.catalog.total_lessons(),
            group,
            lesson,
            completed: self.completion.is_completed(self.pointer),
            group_finished: self.has_finished_group(self.pointer.group()),
        })
    }

    pub(crate) fn set_pointer(&mut self, pointer: ProgressPointer) {
        debug_assert!(self.catalog.contains(pointer));
        self.pointer = pointer;
    }
}
