use std::collections::HashSet;

use thiserror::Error;

use crate::model::ids::{LessonId, ModuleId};
use crate::model::lesson::Lesson;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ModuleError {
    #[error("module id cannot be empty")]
    EmptyId,

    #[error("module title cannot be empty")]
    EmptyTitle,

    #[error("module must contain at least one lesson")]
    NoLessons,

    #[error("duplicate lesson id: {0}")]
    DuplicateLesson(LessonId),
}

//
// ─── MODULE ────────────────────────────────────────────────────────────────────
//

/// An ordered bundle of lessons with a completion reward.
///
/// The lesson count is fixed at construction. `progress` and `is_completed` are
/// projections of the lesson flags and are never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    id: ModuleId,
    title: String,
    description: String,
    coin_reward: u64,
    lessons: Vec<Lesson>,
}

impl Module {
    /// Creates a module.
    ///
    /// # Errors
    ///
    /// Returns `ModuleError` if the id or title is blank, there are no lessons, or two
    /// lessons share an id.
    pub fn new(
        id: ModuleId,
        title: impl Into<String>,
        description: impl Into<String>,
        coin_reward: u64,
        lessons: Vec<Lesson>,
    ) -> Result<Self, ModuleError> {
        if id.as_str().trim().is_empty() {
            return Err(ModuleError::EmptyId);
        }
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ModuleError::EmptyTitle);
        }
        if lessons.is_empty() {
            return Err(ModuleError::NoLessons);
        }

        let mut seen = HashSet::with_capacity(lessons.len());
        for lesson in &lessons {
            if !seen.insert(lesson.id()) {
                return Err(ModuleError::DuplicateLesson(lesson.id().clone()));
            }
        }

        Ok(Self {
            id,
            title: title.trim().to_owned(),
            description: description.into().trim().to_owned(),
            coin_reward,
            lessons,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &ModuleId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Bonus granted when the final lesson is completed.
    #[must_use]
    pub fn coin_reward(&self) -> u64 {
        self.coin_reward
    }

    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    #[must_use]
    pub fn lesson(&self, index: usize) -> Option<&Lesson> {
        self.lessons.get(index)
    }

    #[must_use]
    pub fn lesson_count(&self) -> usize {
        self.lessons.len()
    }

    #[must_use]
    pub fn last_index(&self) -> usize {
        self.lessons.len() - 1
    }

    #[must_use]
    pub fn is_final_lesson(&self, index: usize) -> bool {
        index == self.last_index()
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.lessons.iter().filter(|l| l.is_completed()).count()
    }

    /// Percentage of completed lessons in `[0, 100]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self) -> f64 {
        100.0 * self.completed_count() as f64 / self.lessons.len() as f64
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.lessons.iter().all(Lesson::is_completed)
    }

    /// Marks the lesson complete. Returns true if it was not complete before.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a valid lesson index.
    pub fn complete_lesson(&mut self, index: usize) -> bool {
        self.checked_lesson_mut(index).mark_completed()
    }

    /// Marks the lesson's interactive element complete. Returns true if it was not
    /// complete before.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a valid lesson index.
    pub fn complete_element(&mut self, index: usize) -> bool {
        self.checked_lesson_mut(index).element_mut().mark_completed()
    }

    pub(crate) fn position_of(&self, id: &LessonId) -> Option<usize> {
        self.lessons.iter().position(|l| l.id() == id)
    }

    fn checked_lesson_mut(&mut self, index: usize) -> &mut Lesson {
        let len = self.lessons.len();
        assert!(
            index < len,
            "lesson index {index} out of range for module with {len} lessons"
        );
        &mut self.lessons[index]
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::element::{Diagram, ElementSpec, InteractiveElement};

    fn lesson(id: &str) -> Lesson {
        let element =
            InteractiveElement::new(ElementSpec::Diagram(Diagram::new("Click", "ok").unwrap()));
        Lesson::new(LessonId::new(id), format!("Lesson {id}"), "text", element).unwrap()
    }

    fn module(count: usize) -> Module {
        let lessons = (1..=count).map(|i| lesson(&format!("l{i}"))).collect();
        Module::new(ModuleId::new("m"), "Module", "desc", 50, lessons).unwrap()
    }

    #[test]
    fn module_rejects_empty_lessons() {
        let err = Module::new(ModuleId::new("m"), "Module", "", 0, Vec::new()).unwrap_err();
        assert_eq!(err, ModuleError::NoLessons);
    }

    #[test]
    fn module_rejects_duplicate_lesson_ids() {
        let err = Module::new(
            ModuleId::new("m"),
            "Module",
            "",
            0,
            vec![lesson("a"), lesson("a")],
        )
        .unwrap_err();
        assert_eq!(err, ModuleError::DuplicateLesson(LessonId::new("a")));
    }

    #[test]
    fn progress_tracks_completed_lessons() {
        for total in 1..=5 {
            for done in 0..=total {
                let mut m = module(total);
                for i in 0..done {
                    m.complete_lesson(i);
                }
                #[allow(clippy::cast_precision_loss)]
                let expected = 100.0 * done as f64 / total as f64;
                assert!((m.progress() - expected).abs() < f64::EPSILON);
                assert_eq!(m.is_completed(), done == total);
            }
        }
    }

    #[test]
    fn complete_lesson_is_idempotent() {
        let mut m = module(3);
        assert!(m.complete_lesson(1));
        let once = m.clone();
        assert!(!m.complete_lesson(1));
        assert_eq!(m, once);
    }

    #[test]
    fn complete_element_does_not_complete_lesson() {
        let mut m = module(2);
        assert!(m.complete_element(0));
        assert!(m.lessons()[0].element().is_completed());
        assert!(!m.lessons()[0].is_completed());
        assert_eq!(m.completed_count(), 0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn complete_lesson_panics_on_bad_index() {
        let mut m = module(3);
        m.complete_lesson(3);
    }
}
