//! Evaluation of quiz and diagram submissions.
//!
//! Completion is effort-gated: a wrong quiz answer, or a diagram selection that misses
//! targets, still counts as a finished attempt. Correctness only drives feedback.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::model::{Diagram, DiagramRegion, Quiz};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InteractionError {
    #[error("no option selected")]
    NoSelection,

    #[error("option {index} is out of range for {options} options")]
    OptionOutOfRange { index: usize, options: usize },

    #[error("attempt already submitted")]
    AlreadySubmitted,

    #[error("select at least {required} areas ({selected} selected)")]
    BelowThreshold { selected: usize, required: usize },
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizOutcome {
    pub selected: usize,
    pub correct_answer: usize,
    pub is_correct: bool,
}

/// In-progress answer to a quiz. The selection may change until submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizAttempt {
    options: usize,
    correct_answer: usize,
    selected: Option<usize>,
    outcome: Option<QuizOutcome>,
}

impl QuizAttempt {
    #[must_use]
    pub fn new(quiz: &Quiz) -> Self {
        Self {
            options: quiz.options().len(),
            correct_answer: quiz.correct_answer(),
            selected: None,
            outcome: None,
        }
    }

    /// Select an option by zero-based index.
    ///
    /// # Errors
    ///
    /// Returns `InteractionError` if the attempt was submitted or the index is invalid.
    pub fn select(&mut self, option: usize) -> Result<(), InteractionError> {
        if self.outcome.is_some() {
            return Err(InteractionError::AlreadySubmitted);
        }
        if option >= self.options {
            return Err(InteractionError::OptionOutOfRange {
                index: option,
                options: self.options,
            });
        }
        self.selected = Some(option);
        Ok(())
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.selected.is_some() && self.outcome.is_none()
    }

    #[must_use]
    pub fn outcome(&self) -> Option<QuizOutcome> {
        self.outcome
    }

    /// Lock the selection and grade it.
    ///
    /// # Errors
    ///
    /// Returns `InteractionError::NoSelection` before an option is chosen and
    /// `InteractionError::AlreadySubmitted` on a second submission.
    pub fn submit(&mut self) -> Result<QuizOutcome, InteractionError> {
        if self.outcome.is_some() {
            return Err(InteractionError::AlreadySubmitted);
        }
        let selected = self.selected.ok_or(InteractionError::NoSelection)?;
        let outcome = QuizOutcome {
            selected,
            correct_answer: self.correct_answer,
            is_correct: selected == self.correct_answer,
        };
        self.outcome = Some(outcome);
        Ok(outcome)
    }
}

//
// ─── DIAGRAM ───────────────────────────────────────────────────────────────────
//

/// Hint shown on request while selecting regions.
pub const DIAGRAM_HINT: &str = "Look for structural elements, utility systems, and areas \
    where water or electrical issues commonly occur.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionFeedback {
    pub region: DiagramRegion,
    pub is_target: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramOutcome {
    pub regions: Vec<RegionFeedback>,
}

impl DiagramOutcome {
    #[must_use]
    pub fn targets_found(&self) -> usize {
        self.regions.iter().filter(|r| r.is_target).count()
    }
}

/// In-progress region selection for a diagram.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagramAttempt {
    selected: BTreeSet<DiagramRegion>,
    hints_visible: bool,
    outcome: Option<DiagramOutcome>,
}

impl DiagramAttempt {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select or deselect a region. Returns whether the region is now selected.
    ///
    /// # Errors
    ///
    /// Returns `InteractionError::AlreadySubmitted` once the attempt is locked.
    pub fn toggle(&mut self, region: DiagramRegion) -> Result<bool, InteractionError> {
        if self.outcome.is_some() {
            return Err(InteractionError::AlreadySubmitted);
        }
        if self.selected.remove(&region) {
            Ok(false)
        } else {
            self.selected.insert(region);
            Ok(true)
        }
    }

    pub fn selected(&self) -> impl Iterator<Item = DiagramRegion> + '_ {
        self.selected.iter().copied()
    }

    #[must_use]
    pub fn is_selected(&self, region: DiagramRegion) -> bool {
        self.selected.contains(&region)
    }

    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.outcome.is_none() && self.selected.len() >= Diagram::SELECTION_THRESHOLD
    }

    /// Flip hint visibility and return the new state.
    pub fn toggle_hints(&mut self) -> bool {
        self.hints_visible = !self.hints_visible;
        self.hints_visible
    }

    #[must_use]
    pub fn hints_visible(&self) -> bool {
        self.hints_visible
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&DiagramOutcome> {
        self.outcome.as_ref()
    }

    /// Lock the selection and report which picks were targets.
    ///
    /// # Errors
    ///
    /// Returns `InteractionError::BelowThreshold` with too few regions and
    /// `InteractionError::AlreadySubmitted` on a second submission.
    pub fn submit(&mut self) -> Result<DiagramOutcome, InteractionError> {
        if self.outcome.is_some() {
            return Err(InteractionError::AlreadySubmitted);
        }
        if self.selected.len() < Diagram::SELECTION_THRESHOLD {
            return Err(InteractionError::BelowThreshold {
                selected: self.selected.len(),
                required: Diagram::SELECTION_THRESHOLD,
            });
        }
        let outcome = DiagramOutcome {
            regions: self
                .selected
                .iter()
                .map(|&region| RegionFeedback {
                    region,
                    is_target: region.is_target(),
                })
                .collect(),
        };
        self.outcome = Some(outcome.clone());
        Ok(outcome)
    }
}
