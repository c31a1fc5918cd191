use std::sync::Arc;

use tokio::time::Instant;
use tutor_core::QueryEngine;
use tutor_core::model::{MatchSet, ProgressPointer};
use tutor_core::verdict::Evaluation;

use crate::error::ProgressError;
use crate::navigator::Navigator;
use crate::pacing::Pacing;
use crate::presentation::{PresentationSink, ResetGate};
use crate::progress::ProgressStore;
use crate::verifier::Verifier;

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// Result of a single submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Correct; the next lesson follows after the advance delay.
    Accepted(Evaluation),
    /// Wrong; the solution is revealed after the hint delay.
    Rejected(Evaluation),
    /// Dropped because an advance is already pending.
    Ignored,
}

/// Follow-up transition waiting for its presentation delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingKind {
    Advance { from: ProgressPointer },
    RevealHint { solution: MatchSet },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pending {
    pub kind: PendingKind,
    pub due: Instant,
}

/// One row of the lesson menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub pointer: ProgressPointer,
    pub ordinal: u32,
    pub group_name: String,
    pub lesson_name: String,
    pub completed: bool,
    pub current: bool,
}

//
// ─── TUTOR ─────────────────────────────────────────────────────────────────────
//

/// A learner's session: progress, navigation and verification wired to one
/// presentation sink.
///
/// At most one transition is pending at a time. While an advance is pending,
/// further submissions are ignored so that one correct answer moves the
/// learner exactly one lesson. A pending hint is replaced by the next
/// submission. Explicit navigation and resets drop whatever is pending.
pub struct Tutor {
    store: ProgressStore,
    navigator: Navigator,
    verifier: Verifier,
    pacing: Pacing,
    pending: Option<Pending>,
}

impl Tutor {
    #[must_use]
    pub fn new(store: ProgressStore, sink: Arc<dyn PresentationSink>, pacing: Pacing) -> Self {
        Self {
            store,
            navigator: Navigator::new(Arc::clone(&sink)),
            verifier: Verifier::new(sink),
            pacing,
            pending: None,
        }
    }

    /// Announce the current lesson. Call once after construction.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the pointer cannot be persisted.
    pub async fn start(&mut self) -> Result<ProgressPointer, ProgressError> {
        self.navigator.reload(&mut self.store).await
    }

    /// Judge `candidate` against the current lesson and schedule the
    /// follow-up transition.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if a completion cannot be persisted. The
    /// advance is scheduled regardless.
    pub async fn submit<E: QueryEngine + ?Sized>(
        &mut self,
        engine: &E,
        tree: &E::Tree,
        candidate: &str,
    ) -> Result<SubmitOutcome, ProgressError> {
        if let Some(Pending {
            kind: PendingKind::Advance { .. },
            ..
        }) = &self.pending
        {
            tracing::debug!(candidate, "submission ignored while advancing");
            return Ok(SubmitOutcome::Ignored);
        }

        let evaluation = self
            .verifier
            .evaluate(&self.store, engine, tree, candidate);

        if evaluation.verdict.is_accepted() {
            let saved = self.verifier.accept(&mut self.store, &evaluation).await;
            self.pending = Some(Pending {
                kind: PendingKind::Advance {
                    from: self.store.pointer(),
                },
                due: Instant::now() + self.pacing.advance_delay,
            });
            saved?;
            Ok(SubmitOutcome::Accepted(evaluation))
        } else {
            self.verifier.reject(&evaluation);
            self.pending = Some(Pending {
                kind: PendingKind::RevealHint {
                    solution: evaluation.solution.clone(),
                },
                due: Instant::now() + self.pacing.hint_delay,
            });
            Ok(SubmitOutcome::Rejected(evaluation))
        }
    }

    #[must_use]
    pub fn pending(&self) -> Option<&Pending> {
        self.pending.as_ref()
    }

    /// Fire the pending transition if it is due at `now`.
    ///
    /// Returns the new pointer when an advance fired.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the advanced pointer cannot be persisted.
    pub async fn fire_due(&mut self, now: Instant) -> Result<Option<ProgressPointer>, ProgressError> {
        let Some(pending) = self.pending.take_if(|pending| pending.due <= now) else {
            return Ok(None);
        };

        match pending.kind {
            PendingKind::Advance { from } => {
                let next = self
                    .navigator
                    .change_to(
                        &mut self.store,
                        i64::from(from.group()),
                        i64::from(from.lesson()) + 1,
                    )
                    .await?;
                Ok(Some(next))
            }
            PendingKind::RevealHint { solution } => {
                self.verifier.reveal_hint(&solution);
                Ok(None)
            }
        }
    }

    /// Wait for the pending transition, if any, and fire it.
    ///
    /// # Errors
    ///
    /// See [`Tutor::fire_due`].
    pub async fn settle(&mut self) -> Result<Option<ProgressPointer>, ProgressError> {
        let Some(due) = self.pending.as_ref().map(|p| p.due) else {
            return Ok(None);
        };
        tokio::time::sleep_until(due).await;
        self.fire_due(Instant::now()).await
    }

    /// # Errors
    ///
    /// Returns `ProgressError` if the new pointer cannot be persisted.
    pub async fn change_to(
        &mut self,
        group: i64,
        lesson: i64,
    ) -> Result<ProgressPointer, ProgressError> {
        self.cancel_pending();
        self.navigator.change_to(&mut self.store, group, lesson).await
    }

    /// # Errors
    ///
    /// Returns `ProgressError` if the new pointer cannot be persisted.
    pub async fn next(&mut self) -> Result<ProgressPointer, ProgressError> {
        self.cancel_pending();
        self.navigator.next(&mut self.store).await
    }

    /// # Errors
    ///
    /// Returns `ProgressError` if the new pointer cannot be persisted.
    pub async fn previous(&mut self) -> Result<ProgressPointer, ProgressError> {
        self.cancel_pending();
        self.navigator.previous(&mut self.store).await
    }

    /// # Errors
    ///
    /// Returns `ProgressError` if the new pointer cannot be persisted.
    pub async fn jump_to_ordinal(&mut self, ordinal: i64) -> Result<ProgressPointer, ProgressError> {
        self.cancel_pending();
        self.navigator.jump_to_ordinal(&mut self.store, ordinal).await
    }

    /// Reset all progress if `gate` confirms and show the first lesson.
    ///
    /// Returns whether the reset happened.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if the cleared state cannot be persisted.
    pub async fn reset(&mut self, gate: &dyn ResetGate) -> Result<bool, ProgressError> {
        let reset = self.store.reset(gate).await;
        if matches!(reset, Ok(false)) {
            return Ok(false);
        }
        // The store is already cleared even when saving failed.
        self.cancel_pending();
        reset?;
        self.navigator.reload(&mut self.store).await?;
        Ok(true)
    }

    /// Every lesson of the course with its completion state.
    #[must_use]
    pub fn lesson_menu(&self) -> Vec<MenuEntry> {
        let catalog = self.store.catalog();
        let current = self.store.pointer();
        catalog
            .pointers()
            .filter_map(|pointer| {
                let group = catalog.group(pointer.group())?;
                let lesson = catalog.lesson(pointer)?;
                Some(MenuEntry {
                    pointer,
                    ordinal: catalog.ordinal_of(pointer)?,
                    group_name: group.name().to_string(),
                    lesson_name: lesson.name().to_string(),
                    completed: self.store.completion().is_completed(pointer),
                    current: pointer == current,
                })
            })
            .collect()
    }

    #[must_use]
    pub fn store(&self) -> &ProgressStore {
        &self.store
    }

    #[must_use]
    pub fn pointer(&self) -> ProgressPointer {
        self.store.pointer()
    }

    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            tracing::debug!(kind = ?pending.kind, "pending transition cancelled");
        }
    }
}
