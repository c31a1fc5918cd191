//! Pointer arithmetic over a lesson catalog.
//!
//! Everything here is total: any pair of integers resolves to a pointer that
//! references an existing lesson.

use crate::model::{Catalog, FIRST_GROUP, LESSON_LOW_BOUND, ProgressPointer};

/// Resolve a requested `(group, lesson)` pair into a valid pointer.
///
/// - The group is clamped into `[1, group_count]` first.
/// - A lesson past the end of the group moves to the first lesson of the next
///   group; past the end of the last group it wraps to the first lesson of
///   the first group.
/// - A lesson below 1 moves to the last lesson of the previous group; in the
///   first group it clamps to lesson 1.
#[must_use]
pub fn resolve(catalog: &Catalog, requested_group: i64, requested_lesson: i64) -> ProgressPointer {
    let first = i64::from(FIRST_GROUP);
    let last = i64::from(catalog.group_count()).max(first);
    let low = i64::from(LESSON_LOW_BOUND);

    let group = requested_group.clamp(first, last);
    let count = lesson_count(catalog, group);

    let (group, lesson) = if requested_lesson > count {
        if group < last {
            (group + 1, low)
        } else {
            (first, low)
        }
    } else if requested_lesson < low {
        if group > first {
            let previous = group - 1;
            (previous, lesson_count(catalog, previous))
        } else {
            (group, low)
        }
    } else {
        (group, requested_lesson)
    };

    clamp(catalog, group, lesson)
}

/// The lesson after `pointer`, wrapping to the start of the course.
#[must_use]
pub fn next(catalog: &Catalog, pointer: ProgressPointer) -> ProgressPointer {
    resolve(
        catalog,
        i64::from(pointer.group()),
        i64::from(pointer.lesson()) + 1,
    )
}

/// The lesson before `pointer`, stopping at the start of the course.
#[must_use]
pub fn previous(catalog: &Catalog, pointer: ProgressPointer) -> ProgressPointer {
    resolve(
        catalog,
        i64::from(pointer.group()),
        i64::from(pointer.lesson()) - 1,
    )
}

/// Pointer for a 1-based course ordinal, clamped into `[1, total_lessons]`.
#[must_use]
pub fn at_ordinal(catalog: &Catalog, ordinal: i64) -> ProgressPointer {
    let total = i64::from(catalog.total_lessons()).max(1);
    let ordinal = narrow(ordinal.clamp(1, total));
    catalog
        .pointer_at_ordinal(ordinal)
        .unwrap_or_default()
}

fn clamp(catalog: &Catalog, group: i64, lesson: i64) -> ProgressPointer {
    let first = i64::from(FIRST_GROUP);
    let group = group.clamp(first, i64::from(catalog.group_count()).max(first));
    let low = i64::from(LESSON_LOW_BOUND);
    let lesson = lesson.clamp(low, lesson_count(catalog, group).max(low));
    ProgressPointer::new(narrow(group), narrow(lesson))
}

fn lesson_count(catalog: &Catalog, group: i64) -> i64 {
    i64::from(catalog.lesson_count(narrow(group)))
}

fn narrow(value: i64) -> u32 {
    u32::try_from(value).unwrap_or(if value < 0 { 0 } else { u32::MAX })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::catalog_with;

    fn p(group: u32, lesson: u32) -> ProgressPointer {
        ProgressPointer::new(group, lesson)
    }

    #[test]
    fn in_range_requests_are_kept() {
        let catalog = catalog_with(&[3, 2]);
        assert_eq!(resolve(&catalog, 1, 2), p(1, 2));
        assert_eq!(resolve(&catalog, 2, 2), p(2, 2));
    }

    #[test]
    fn overflow_moves_to_next_group() {
        let catalog = catalog_with(&[3, 2]);
        assert_eq!(resolve(&catalog, 1, 4), p(2, 1));
        assert_eq!(resolve(&catalog, 1, 400), p(2, 1));
    }

    #[test]
    fn overflow_of_last_group_wraps_to_start() {
        let catalog = catalog_with(&[3, 2]);
        assert_eq!(resolve(&catalog, 2, 3), p(1, 1));
        assert_eq!(next(&catalog, p(2, 2)), p(1, 1));
    }

    #[test]
    fn underflow_moves_to_previous_group_last_lesson() {
        let catalog = catalog_with(&[3, 2]);
        assert_eq!(resolve(&catalog, 2, 0), p(1, 3));
        assert_eq!(previous(&catalog, p(2, 1)), p(1, 3));
    }

    #[test]
    fn underflow_of_first_group_clamps() {
        let catalog = catalog_with(&[3, 2]);
        assert_eq!(resolve(&catalog, 1, 0), p(1, 1));
        assert_eq!(resolve(&catalog, 1, -50), p(1, 1));
        assert_eq!(previous(&catalog, p(1, 1)), p(1, 1));
    }

    #[test]
    fn out_of_range_groups_are_clamped() {
        let catalog = catalog_with(&[3, 2]);
        assert_eq!(resolve(&catalog, 0, 2), p(1, 2));
        assert_eq!(resolve(&catalog, -7, 1), p(1, 1));
        assert_eq!(resolve(&catalog, 99, 1), p(2, 1));
        assert_eq!(resolve(&catalog, 99, 99), p(1, 1));
    }

    #[test]
    fn every_request_lands_on_an_existing_lesson() {
        let catalog = catalog_with(&[3, 1, 5]);
        let probes = [
            i64::MIN,
            i64::from(i32::MIN),
            -1,
            0,
            1,
            2,
            3,
            4,
            5,
            6,
            1_000,
            i64::from(u32::MAX),
            i64::MAX,
        ];
        for &g in &probes {
            for &l in &probes {
                let pointer = resolve(&catalog, g, l);
                assert!(
                    catalog.contains(pointer),
                    "({g}, {l}) resolved to missing lesson {pointer}"
                );
            }
        }
    }

    #[test]
    fn next_walks_the_whole_course_and_wraps() {
        let catalog = catalog_with(&[2, 3]);
        let mut pointer = ProgressPointer::default();
        let mut visited = vec![pointer];
        for _ in 0..catalog.total_lessons() {
            pointer = next(&catalog, pointer);
            visited.push(pointer);
        }
        assert_eq!(
            visited,
            vec![p(1, 1), p(1, 2), p(2, 1), p(2, 2), p(2, 3), p(1, 1)]
        );
    }

    #[test]
    fn ordinals_clamp_into_course() {
        let catalog = catalog_with(&[2, 3]);
        assert_eq!(at_ordinal(&catalog, 3), p(2, 1));
        assert_eq!(at_ordinal(&catalog, 0), p(1, 1));
        assert_eq!(at_ordinal(&catalog, -3), p(1, 1));
        assert_eq!(at_ordinal(&catalog, 42), p(2, 3));
    }
}
