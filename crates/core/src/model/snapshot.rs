use thiserror::Error;

use crate::model::ids::{LessonId, ModuleId};
use crate::model::lesson::Lesson;
use crate::model::module::Module;
use crate::model::user::User;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SnapshotError {
    #[error("stored progress belongs to module {stored}, expected {expected}")]
    ModuleMismatch { stored: ModuleId, expected: ModuleId },

    #[error("lesson index {index} out of range for {lessons} lessons")]
    IndexOutOfRange { index: usize, lessons: usize },
}

/// Per-lesson flags as read back from durable storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedLesson {
    pub id: LessonId,
    pub is_completed: bool,
    pub element_completed: bool,
}

/// Storage-agnostic shape of a saved snapshot.
///
/// Content is never taken from storage: only the flags are merged back into the
/// configured module by lesson id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProgress {
    pub user: User,
    pub current_lesson_index: usize,
    pub module_id: ModuleId,
    pub lessons: Vec<PersistedLesson>,
}

/// The learner, the module with its lesson flags, and the navigation position.
///
/// `current_lesson_index` always addresses an existing lesson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSnapshot {
    user: User,
    current_lesson_index: usize,
    module: Module,
}

impl ProgressSnapshot {
    /// A fresh snapshot positioned on the first lesson.
    #[must_use]
    pub fn new(user: User, module: Module) -> Self {
        Self {
            user,
            current_lesson_index: 0,
            module,
        }
    }

    /// Rebuild a snapshot by applying stored flags onto `template`.
    ///
    /// Stored lessons whose id is not part of the template are ignored.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` if the stored module id differs from the template's or
    /// the stored lesson index is out of range.
    pub fn rehydrate(template: &Module, stored: PersistedProgress) -> Result<Self, SnapshotError> {
        if stored.module_id != *template.id() {
            return Err(SnapshotError::ModuleMismatch {
                stored: stored.module_id,
                expected: template.id().clone(),
            });
        }
        if stored.current_lesson_index >= template.lesson_count() {
            return Err(SnapshotError::IndexOutOfRange {
                index: stored.current_lesson_index,
                lessons: template.lesson_count(),
            });
        }

        let mut module = template.clone();
        for lesson in &stored.lessons {
            let Some(index) = module.position_of(&lesson.id) else {
                continue;
            };
            if lesson.element_completed {
                module.complete_element(index);
            }
            if lesson.is_completed {
                module.complete_lesson(index);
            }
        }

        Ok(Self {
            user: stored.user,
            current_lesson_index: stored.current_lesson_index,
            module,
        })
    }

    // Accessors
    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    #[must_use]
    pub fn module(&self) -> &Module {
        &self.module
    }

    #[must_use]
    pub fn current_lesson_index(&self) -> usize {
        self.current_lesson_index
    }

    #[must_use]
    pub fn current_lesson(&self) -> &Lesson {
        &self.module.lessons()[self.current_lesson_index]
    }

    #[must_use]
    pub fn is_on_last_lesson(&self) -> bool {
        self.module.is_final_lesson(self.current_lesson_index)
    }

    /// Moves to the next lesson. Returns false when already on the last one.
    pub fn advance(&mut self) -> bool {
        let next = (self.current_lesson_index + 1).min(self.module.last_index());
        let moved = next != self.current_lesson_index;
        self.current_lesson_index = next;
        moved
    }

    /// Moves to the previous lesson. Returns false when already on the first one.
    pub fn retreat(&mut self) -> bool {
        let prev = self.current_lesson_index.saturating_sub(1);
        let moved = prev != self.current_lesson_index;
        self.current_lesson_index = prev;
        moved
    }

    /// See [`Module::complete_lesson`].
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a valid lesson index.
    pub fn complete_lesson(&mut self, index: usize) -> bool {
        self.module.complete_lesson(index)
    }

    /// See [`Module::complete_element`].
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a valid lesson index.
    pub fn complete_element(&mut self, index: usize) -> bool {
        self.module.complete_element(index)
    }

    pub fn credit(&mut self, amount: u64) {
        self.user.credit(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::element::{Diagram, ElementSpec, InteractiveElement};

    fn module() -> Module {
        let lessons = ["a", "b", "c"]
            .into_iter()
            .map(|id| {
                let element = InteractiveElement::new(ElementSpec::Diagram(
                    Diagram::new("Click", "ok").unwrap(),
                ));
                Lesson::new(LessonId::new(id), id, "text", element).unwrap()
            })
            .collect();
        Module::new(ModuleId::new("m"), "Module", "", 50, lessons).unwrap()
    }

    fn stored(index: usize, lessons: Vec<PersistedLesson>) -> PersistedProgress {
        PersistedProgress {
            user: User::new(None, "Ada", 99).unwrap(),
            current_lesson_index: index,
            module_id: ModuleId::new("m"),
            lessons,
        }
    }

    #[test]
    fn navigation_is_clamped() {
        let mut snap = ProgressSnapshot::new(User::default(), module());
        assert!(!snap.retreat());
        assert_eq!(snap.current_lesson_index(), 0);
        assert!(snap.advance());
        assert!(snap.advance());
        assert!(!snap.advance());
        assert_eq!(snap.current_lesson_index(), 2);
        assert!(snap.is_on_last_lesson());
    }

    #[test]
    fn rehydrate_applies_flags_by_id() {
        let lessons = vec![
            PersistedLesson {
                id: LessonId::new("b"),
                is_completed: true,
                element_completed: true,
            },
            PersistedLesson {
                id: LessonId::new("zzz"),
                is_completed: true,
                element_completed: true,
            },
        ];
        let snap = ProgressSnapshot::rehydrate(&module(), stored(1, lessons)).unwrap();
        assert_eq!(snap.current_lesson_index(), 1);
        assert_eq!(snap.user().coins(), 99);
        assert_eq!(snap.module().completed_count(), 1);
        assert!(snap.module().lessons()[1].is_completed());
        assert!(snap.module().lessons()[1].element().is_completed());
    }

    #[test]
    fn rehydrate_rejects_foreign_module_and_bad_index() {
        let mut foreign = stored(0, Vec::new());
        foreign.module_id = ModuleId::new("other");
        assert!(matches!(
            ProgressSnapshot::rehydrate(&module(), foreign),
            Err(SnapshotError::ModuleMismatch { .. })
        ));

        assert_eq!(
            ProgressSnapshot::rehydrate(&module(), stored(3, Vec::new())).unwrap_err(),
            SnapshotError::IndexOutOfRange {
                index: 3,
                lessons: 3
            }
        );
    }
}
