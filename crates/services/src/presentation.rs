//! Contracts towards the presentation side: the sink that renders lessons
//! and match highlighting, and the yes/no gate guarding a progress reset.

use tutor_core::model::{Lesson, LessonGroup, MatchSet, ProgressPointer};

/// Snapshot of the current lesson handed to the sink on every change.
#[derive(Debug, Clone, Copy)]
pub struct LessonView<'a> {
    pub pointer: ProgressPointer,
    pub ordinal: u32,
    pub total: u32,
    pub group: &'a LessonGroup,
    pub lesson: &'a Lesson,
    pub completed: bool,
    pub group_finished: bool,
}

/// Receives every visible consequence of navigation and verification.
///
/// Group-specific behaviour on entering a lesson (editor reset, tooltips) is
/// the sink's business; `on_lesson_changed` fires for every committed
/// pointer, including re-announcements of the same lesson.
pub trait PresentationSink: Send + Sync {
    fn on_lesson_changed(&self, view: &LessonView<'_>);

    /// The submitted query matched exactly the solution nodes.
    fn on_accepted(&self, matches: &MatchSet);

    /// The submitted query was wrong; `candidate` may be empty.
    fn on_rejected(&self, candidate: &MatchSet, solution: &MatchSet);

    /// Delayed follow-up to a rejection: clear the incorrect marking and
    /// reveal the solution nodes.
    fn on_hint(&self, solution: &MatchSet);

    fn clear_input(&self);
}

/// Confirmation prompt shown before destroying progress.
pub trait ResetGate {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> ResetGate for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Prompt shown by [`ResetGate`] implementations.
pub const RESET_PROMPT: &str = "Do you really want to reset your progress?";
