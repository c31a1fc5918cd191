#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod navigator;
pub mod pacing;
pub mod presentation;
pub mod progress;
pub mod tutor;
pub mod verifier;

#[cfg(test)]
mod test_support;

pub use tutor_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, ProgressError};
pub use navigator::Navigator;
pub use pacing::Pacing;
pub use presentation::{LessonView, PresentationSink, RESET_PROMPT, ResetGate};
pub use progress::ProgressStore;
pub use tutor::{MenuEntry, Pending, PendingKind, SubmitOutcome, Tutor};
pub use verifier::Verifier;
