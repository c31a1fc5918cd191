use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::pointer::{FIRST_GROUP, LESSON_LOW_BOUND, ProgressPointer};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("catalog must contain at least one lesson group")]
    NoGroups,

    #[error("lesson group {group} has no name")]
    BlankGroupName { group: usize },

    #[error("lesson group {group} has no lessons")]
    EmptyGroup { group: usize },

    #[error("lesson {group}.{lesson} has no name")]
    BlankLessonName { group: usize, lesson: usize },

    #[error("lesson {group}.{lesson} has an empty correct query")]
    BlankCorrectQuery { group: usize, lesson: usize },

    #[error("catalog is too large to index")]
    TooLarge,
}

//
// ─── DRAFTS ────────────────────────────────────────────────────────────────────
//

/// Unvalidated catalog content, typically deserialized from JSON.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CatalogDraft {
    pub groups: Vec<LessonGroupDraft>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LessonGroupDraft {
    pub name: String,
    #[serde(default)]
    pub intro: Option<String>,
    pub lessons: Vec<LessonDraft>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LessonDraft {
    pub name: String,
    #[serde(default)]
    pub instruction: Option<String>,
    #[serde(alias = "selector")]
    pub correct_query: String,
    #[serde(alias = "markup")]
    pub reference_markup: String,
    #[serde(default)]
    pub help_title: Option<String>,
    #[serde(default)]
    pub help: Option<String>,
    #[serde(default)]
    pub syntax: Option<String>,
    #[serde(default)]
    pub examples: Vec<String>,
}

impl CatalogDraft {
    /// Validate the draft into an immutable catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if there are no groups, a group has no lessons,
    /// or a lesson lacks a name or a correct query.
    pub fn validate(self) -> Result<Catalog, CatalogError> {
        if self.groups.is_empty() {
            return Err(CatalogError::NoGroups);
        }
        if u32::try_from(self.groups.len()).is_err() {
            return Err(CatalogError::TooLarge);
        }

        let mut groups = Vec::with_capacity(self.groups.len());
        for (g_idx, draft) in self.groups.into_iter().enumerate() {
            let group = g_idx + 1;
            let name = normalize_required(draft.name)
                .ok_or(CatalogError::BlankGroupName { group })?;
            if draft.lessons.is_empty() {
                return Err(CatalogError::EmptyGroup { group });
            }
            if u32::try_from(draft.lessons.len()).is_err() {
                return Err(CatalogError::TooLarge);
            }

            let mut lessons = Vec::with_capacity(draft.lessons.len());
            for (l_idx, lesson) in draft.lessons.into_iter().enumerate() {
                lessons.push(lesson.validate(group, l_idx + 1)?);
            }

            groups.push(LessonGroup {
                name,
                intro: normalize_optional(draft.intro),
                lessons,
            });
        }

        Ok(Catalog { groups })
    }
}

impl LessonDraft {
    fn validate(self, group: usize, lesson: usize) -> Result<Lesson, CatalogError> {
        let name = normalize_required(self.name)
            .ok_or(CatalogError::BlankLessonName { group, lesson })?;
        let correct_query = normalize_required(self.correct_query)
            .ok_or(CatalogError::BlankCorrectQuery { group, lesson })?;

        Ok(Lesson {
            name,
            instruction: normalize_optional(self.instruction),
            correct_query,
            reference_markup: self.reference_markup.trim().to_string(),
            help_title: normalize_optional(self.help_title),
            help: normalize_optional(self.help),
            syntax: normalize_optional(self.syntax),
            examples: self.examples,
        })
    }
}

//
// ─── LESSONS ───────────────────────────────────────────────────────────────────
//

/// A single challenge: the markup to render and the query that selects the
/// target nodes in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    name: String,
    instruction: Option<String>,
    correct_query: String,
    reference_markup: String,
    help_title: Option<String>,
    help: Option<String>,
    syntax: Option<String>,
    examples: Vec<String>,
}

impl Lesson {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn instruction(&self) -> Option<&str> {
        self.instruction.as_deref()
    }

    #[must_use]
    pub fn correct_query(&self) -> &str {
        &self.correct_query
    }

    #[must_use]
    pub fn reference_markup(&self) -> &str {
        &self.reference_markup
    }

    #[must_use]
    pub fn help_title(&self) -> Option<&str> {
        self.help_title.as_deref()
    }

    #[must_use]
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    #[must_use]
    pub fn syntax(&self) -> Option<&str> {
        self.syntax.as_deref()
    }

    #[must_use]
    pub fn examples(&self) -> &[String] {
        &self.examples
    }
}

/// Named, ordered collection of lessons covering one topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonGroup {
    name: String,
    intro: Option<String>,
    lessons: Vec<Lesson>,
}

impl LessonGroup {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn intro(&self) -> Option<&str> {
        self.intro.as_deref()
    }

    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    #[must_use]
    pub fn lesson_count(&self) -> u32 {
        u32::try_from(self.lessons.len()).unwrap_or(u32::MAX)
    }
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// Read-only course content: at least one group, every group non-empty.
///
/// Groups and lessons are addressed by 1-based indices; lessons are also
/// addressable by a 1-based ordinal running across the whole course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    groups: Vec<LessonGroup>,
}

impl Catalog {
    #[must_use]
    pub fn groups(&self) -> &[LessonGroup] {
        &self.groups
    }

    #[must_use]
    pub fn group_count(&self) -> u32 {
        u32::try_from(self.groups.len()).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn group(&self, group: u32) -> Option<&LessonGroup> {
        let idx = usize::try_from(group.checked_sub(FIRST_GROUP)?).ok()?;
        self.groups.get(idx)
    }

    /// Number of lessons in `group`, or 0 if the group does not exist.
    #[must_use]
    pub fn lesson_count(&self, group: u32) -> u32 {
        self.group(group).map_or(0, LessonGroup::lesson_count)
    }

    #[must_use]
    pub fn lesson(&self, pointer: ProgressPointer) -> Option<&Lesson> {
        let group = self.group(pointer.group())?;
        let idx = usize::try_from(pointer.lesson().checked_sub(LESSON_LOW_BOUND)?).ok()?;
        group.lessons.get(idx)
    }

    #[must_use]
    pub fn contains(&self, pointer: ProgressPointer) -> bool {
        self.lesson(pointer).is_some()
    }

    #[must_use]
    pub fn total_lessons(&self) -> u32 {
        self.groups
            .iter()
            .fold(0_u32, |acc, g| acc.saturating_add(g.lesson_count()))
    }

    /// Every lesson position in course order.
    pub fn pointers(&self) -> impl Iterator<Item = ProgressPointer> + '_ {
        (FIRST_GROUP..=self.group_count()).flat_map(move |group| {
            (LESSON_LOW_BOUND..=self.lesson_count(group))
                .map(move |lesson| ProgressPointer::new(group, lesson))
        })
    }

    /// 1-based position of `pointer` across the whole course.
    #[must_use]
    pub fn ordinal_of(&self, pointer: ProgressPointer) -> Option<u32> {
        if !self.contains(pointer) {
            return None;
        }
        let before: u32 = (FIRST_GROUP..pointer.group())
            .map(|g| self.lesson_count(g))
            .sum();
        Some(before + pointer.lesson())
    }

    /// Inverse of [`Catalog::ordinal_of`].
    #[must_use]
    pub fn pointer_at_ordinal(&self, ordinal: u32) -> Option<ProgressPointer> {
        if ordinal < 1 {
            return None;
        }
        let mut remaining = ordinal;
        for group in FIRST_GROUP..=self.group_count() {
            let count = self.lesson_count(group);
            if remaining <= count {
                return Some(ProgressPointer::new(group, remaining));
            }
            remaining -= count;
        }
        None
    }
}

fn normalize_required(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}
