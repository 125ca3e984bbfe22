use thiserror::Error;

use crate::model::content::{ContentBlock, parse_content};
use crate::model::element::InteractiveElement;
use crate::model::ids::LessonId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson title cannot be empty")]
    EmptyTitle,

    #[error("lesson content cannot be empty")]
    EmptyContent,
}

/// One content unit with exactly one embedded interactive check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    id: LessonId,
    title: String,
    content: String,
    element: InteractiveElement,
    completed: bool,
}

impl Lesson {
    /// Creates a lesson that has not been completed yet.
    ///
    /// # Errors
    ///
    /// Returns `LessonError` if the title or content is blank.
    pub fn new(
        id: LessonId,
        title: impl Into<String>,
        content: impl Into<String>,
        element: InteractiveElement,
    ) -> Result<Self, LessonError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(LessonError::EmptyTitle);
        }
        let content = content.into();
        if content.trim().is_empty() {
            return Err(LessonError::EmptyContent);
        }

        Ok(Self {
            id,
            title: title.trim().to_owned(),
            content,
            element,
            completed: false,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &LessonId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Raw lesson text, see [`Lesson::blocks`] for the rendered structure.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn blocks(&self) -> Vec<ContentBlock> {
        parse_content(&self.content)
    }

    #[must_use]
    pub fn element(&self) -> &InteractiveElement {
        &self.element
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub(crate) fn element_mut(&mut self) -> &mut InteractiveElement {
        &mut self.element
    }

    /// Returns true when this call flipped the flag.
    pub(crate) fn mark_completed(&mut self) -> bool {
        let changed = !self.completed;
        self.completed = true;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::element::{Diagram, ElementSpec};

    fn element() -> InteractiveElement {
        InteractiveElement::new(ElementSpec::Diagram(Diagram::new("Click", "Nice").unwrap()))
    }

    #[test]
    fn lesson_rejects_blank_title_and_content() {
        let err = Lesson::new(LessonId::new("l1"), " ", "body", element()).unwrap_err();
        assert_eq!(err, LessonError::EmptyTitle);

        let err = Lesson::new(LessonId::new("l1"), "Title", "\n\n", element()).unwrap_err();
        assert_eq!(err, LessonError::EmptyContent);
    }

    #[test]
    fn new_lesson_is_incomplete() {
        let lesson = Lesson::new(LessonId::new("l1"), "  Title ", "body", element()).unwrap();
        assert_eq!(lesson.title(), "Title");
        assert!(!lesson.is_completed());
        assert!(!lesson.element().is_completed());
    }
}
