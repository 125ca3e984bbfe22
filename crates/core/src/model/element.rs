use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ElementError {
    #[error("question cannot be empty")]
    EmptyQuestion,

    #[error("quiz needs at least 2 options, got {count}")]
    TooFewOptions { count: usize },

    #[error("quiz option {index} is empty")]
    EmptyOption { index: usize },

    #[error("correct answer {index} is out of range for {options} options")]
    CorrectAnswerOutOfRange { index: usize, options: usize },
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

/// A single-answer multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    question: String,
    options: Vec<String>,
    correct_answer: usize,
    explanation: String,
}

impl Quiz {
    /// Creates a quiz.
    ///
    /// # Errors
    ///
    /// Returns `ElementError` if the question or an option is blank, fewer than two
    /// options are given, or `correct_answer` does not index an option.
    pub fn new(
        question: impl Into<String>,
        options: Vec<String>,
        correct_answer: usize,
        explanation: impl Into<String>,
    ) -> Result<Self, ElementError> {
        let question = question.into();
        if question.trim().is_empty() {
            return Err(ElementError::EmptyQuestion);
        }
        if options.len() < 2 {
            return Err(ElementError::TooFewOptions {
                count: options.len(),
            });
        }
        if let Some(index) = options.iter().position(|o| o.trim().is_empty()) {
            return Err(ElementError::EmptyOption { index });
        }
        if correct_answer >= options.len() {
            return Err(ElementError::CorrectAnswerOutOfRange {
                index: correct_answer,
                options: options.len(),
            });
        }

        Ok(Self {
            question: question.trim().to_owned(),
            options,
            correct_answer,
            explanation: explanation.into().trim().to_owned(),
        })
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_answer
    }
}

//
// ─── DIAGRAM ───────────────────────────────────────────────────────────────────
//

/// Clickable areas of the house diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramRegion {
    Roof,
    Foundation,
    Electrical,
    Plumbing,
    Hvac,
    Windows,
}

impl DiagramRegion {
    pub const ALL: [DiagramRegion; 6] = [
        DiagramRegion::Roof,
        DiagramRegion::Foundation,
        DiagramRegion::Electrical,
        DiagramRegion::Plumbing,
        DiagramRegion::Hvac,
        DiagramRegion::Windows,
    ];

    /// Whether inspectors commonly find problems here.
    #[must_use]
    pub fn is_target(self) -> bool {
        matches!(
            self,
            DiagramRegion::Roof
                | DiagramRegion::Foundation
                | DiagramRegion::Electrical
                | DiagramRegion::Plumbing
        )
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DiagramRegion::Roof => "roof",
            DiagramRegion::Foundation => "foundation",
            DiagramRegion::Electrical => "electrical",
            DiagramRegion::Plumbing => "plumbing",
            DiagramRegion::Hvac => "hvac",
            DiagramRegion::Windows => "windows",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            DiagramRegion::Roof => "Roof",
            DiagramRegion::Foundation => "Foundation",
            DiagramRegion::Electrical => "Electrical Panel",
            DiagramRegion::Plumbing => "Plumbing",
            DiagramRegion::Hvac => "HVAC Unit",
            DiagramRegion::Windows => "Window Frames",
        }
    }
}

impl fmt::Display for DiagramRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown diagram region: {0}")]
pub struct UnknownRegion(String);

impl FromStr for DiagramRegion {
    type Err = UnknownRegion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        DiagramRegion::ALL
            .into_iter()
            .find(|region| region.as_str() == wanted)
            .ok_or_else(|| UnknownRegion(s.trim().to_owned()))
    }
}

/// A clickable-diagram exercise.
///
/// The clickable regions and the selection threshold are fixed for every diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagram {
    question: String,
    explanation: String,
}

impl Diagram {
    /// Minimum number of selected regions before a diagram can be submitted.
    pub const SELECTION_THRESHOLD: usize = 3;

    /// Creates a diagram exercise.
    ///
    /// # Errors
    ///
    /// Returns `ElementError::EmptyQuestion` if the question is blank.
    pub fn new(
        question: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Result<Self, ElementError> {
        let question = question.into();
        if question.trim().is_empty() {
            return Err(ElementError::EmptyQuestion);
        }
        Ok(Self {
            question: question.trim().to_owned(),
            explanation: explanation.into().trim().to_owned(),
        })
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn targets() -> impl Iterator<Item = DiagramRegion> {
        DiagramRegion::ALL.into_iter().filter(|r| r.is_target())
    }

    #[must_use]
    pub fn target_count() -> usize {
        Self::targets().count()
    }
}

//
// ─── INTERACTIVE ELEMENT ───────────────────────────────────────────────────────
//

/// Discriminant of an interactive element, used for reward lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Quiz,
    Diagram,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementSpec {
    Quiz(Quiz),
    Diagram(Diagram),
}

impl ElementSpec {
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementSpec::Quiz(_) => ElementKind::Quiz,
            ElementSpec::Diagram(_) => ElementKind::Diagram,
        }
    }

    #[must_use]
    pub fn question(&self) -> &str {
        match self {
            ElementSpec::Quiz(quiz) => quiz.question(),
            ElementSpec::Diagram(diagram) => diagram.question(),
        }
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        match self {
            ElementSpec::Quiz(quiz) => quiz.explanation(),
            ElementSpec::Diagram(diagram) => diagram.explanation(),
        }
    }
}

/// The check embedded in a lesson, with its completion flag.
///
/// `completed` only moves from false to true.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractiveElement {
    spec: ElementSpec,
    completed: bool,
}

impl InteractiveElement {
    #[must_use]
    pub fn new(spec: ElementSpec) -> Self {
        Self {
            spec,
            completed: false,
        }
    }

    #[must_use]
    pub fn spec(&self) -> &ElementSpec {
        &self.spec
    }

    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.spec.kind()
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
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

    fn options(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn quiz_rejects_out_of_range_answer() {
        let err = Quiz::new("Q?", options(&["a", "b"]), 2, "").unwrap_err();
        assert_eq!(
            err,
            ElementError::CorrectAnswerOutOfRange {
                index: 2,
                options: 2
            }
        );
    }

    #[test]
    fn quiz_rejects_single_option_and_blank_option() {
        assert_eq!(
            Quiz::new("Q?", options(&["a"]), 0, "").unwrap_err(),
            ElementError::TooFewOptions { count: 1 }
        );
        assert_eq!(
            Quiz::new("Q?", options(&["a", " "]), 0, "").unwrap_err(),
            ElementError::EmptyOption { index: 1 }
        );
    }

    #[test]
    fn diagram_has_four_targets_among_six_regions() {
        assert_eq!(Diagram::target_count(), 4);
        assert!(!DiagramRegion::Hvac.is_target());
        assert!(!DiagramRegion::Windows.is_target());
    }

    #[test]
    fn region_parses_case_insensitively() {
        assert_eq!("Roof".parse::<DiagramRegion>().unwrap(), DiagramRegion::Roof);
        assert_eq!(" hvac ".parse::<DiagramRegion>().unwrap(), DiagramRegion::Hvac);
        assert!("attic".parse::<DiagramRegion>().is_err());
    }

    #[test]
    fn mark_completed_reports_only_first_transition() {
        let quiz = Quiz::new("Q?", options(&["a", "b"]), 1, "b").unwrap();
        let mut element = InteractiveElement::new(ElementSpec::Quiz(quiz));
        assert!(element.mark_completed());
        assert!(!element.mark_completed());
        assert!(element.is_completed());
        assert_eq!(element.kind(), ElementKind::Quiz);
    }
}
