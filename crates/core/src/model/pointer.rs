use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of the first lesson group.
pub const FIRST_GROUP: u32 = 1;

/// Lowest valid lesson index inside a group.
///
/// Lessons are numbered from 1 in every group; retreating past lesson 1
/// lands on the previous group's last lesson, never on a lesson 0.
pub const LESSON_LOW_BOUND: u32 = 1;

/// The learner's position in the course: a 1-based group and a 1-based
/// lesson inside that group.
///
/// Pointers produced by [`crate::navigation::resolve`] always reference an
/// existing lesson of the catalog they were resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProgressPointer {
    group: u32,
    lesson: u32,
}

impl ProgressPointer {
    #[must_use]
    pub fn new(group: u32, lesson: u32) -> Self {
        Self { group, lesson }
    }

    #[must_use]
    pub fn group(&self) -> u32 {
        self.group
    }

    #[must_use]
    pub fn lesson(&self) -> u32 {
        self.lesson
    }
}

impl Default for ProgressPointer {
    fn default() -> Self {
        Self::new(FIRST_GROUP, LESSON_LOW_BOUND)
    }
}

impl fmt::Display for ProgressPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.group, self.lesson)
    }
}
