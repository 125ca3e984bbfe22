use tracing::debug;

use learn_core::RewardPolicy;
use learn_core::interaction::{DiagramAttempt, DiagramOutcome, QuizAttempt, QuizOutcome};
use learn_core::model::{DiagramRegion, ElementKind, ElementSpec, Lesson};

use crate::error::FlowError;
use crate::progress_store::ProgressStore;

//
// ─── RESULTS ───────────────────────────────────────────────────────────────────
//

/// Result of submitting a quiz answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizFeedback {
    pub outcome: QuizOutcome,
    pub explanation: String,
    pub coins_awarded: u64,
}

/// Result of submitting a diagram selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramFeedback {
    pub outcome: DiagramOutcome,
    pub explanation: String,
    pub coins_awarded: u64,
}

/// Result of completing a lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LessonCompletion {
    pub coins_awarded: u64,
    pub module_completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Attempt {
    Quiz(QuizAttempt),
    Diagram(DiagramAttempt),
}

impl Attempt {
    fn for_lesson(lesson: &Lesson) -> Self {
        match lesson.element().spec() {
            ElementSpec::Quiz(quiz) => Self::Quiz(QuizAttempt::new(quiz)),
            ElementSpec::Diagram(_) => Self::Diagram(DiagramAttempt::new()),
        }
    }

    fn kind(&self) -> ElementKind {
        match self {
            Self::Quiz(_) => ElementKind::Quiz,
            Self::Diagram(_) => ElementKind::Diagram,
        }
    }
}

//
// ─── FLOW ──────────────────────────────────────────────────────────────────────
//

/// Page-level state for the lesson the store is positioned on.
///
/// Holds what is not persisted: whether the content was read and the in-progress
/// quiz or diagram attempt. Coins are credited through the store only when an
/// element or lesson transitions to completed, so repeating a submission never
/// pays twice.
#[derive(Debug, Clone)]
pub struct LessonFlow {
    policy: RewardPolicy,
    lesson_index: usize,
    has_read: bool,
    attempt: Attempt,
}

impl LessonFlow {
    #[must_use]
    pub fn new(store: &ProgressStore, policy: RewardPolicy) -> Self {
        Self {
            policy,
            lesson_index: store.current_lesson_index(),
            has_read: false,
            attempt: Attempt::for_lesson(store.current_lesson()),
        }
    }

    #[must_use]
    pub fn policy(&self) -> RewardPolicy {
        self.policy
    }

    #[must_use]
    pub fn lesson_index(&self) -> usize {
        self.lesson_index
    }

    #[must_use]
    pub fn element_kind(&self) -> ElementKind {
        self.attempt.kind()
    }

    /// Drop page state if the store has moved to another lesson.
    pub fn sync(&mut self, store: &ProgressStore) {
        if self.lesson_index != store.current_lesson_index() {
            *self = Self::new(store, self.policy);
        }
    }

    //
    // ─── READING ───────────────────────────────────────────────────────────────
    //

    pub fn mark_read(&mut self) {
        self.has_read = true;
    }

    #[must_use]
    pub fn has_read(&self) -> bool {
        self.has_read
    }

    //
    // ─── QUIZ ──────────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn quiz(&self) -> Option<&QuizAttempt> {
        match &self.attempt {
            Attempt::Quiz(quiz) => Some(quiz),
            Attempt::Diagram(_) => None,
        }
    }

    /// Choose a quiz option by zero-based index.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::WrongElementKind` on a diagram lesson, or the attempt's
    /// `InteractionError` for an invalid or locked selection.
    pub fn select_option(&mut self, option: usize) -> Result<(), FlowError> {
        self.quiz_mut()?.select(option)?;
        Ok(())
    }

    /// Submit the selected answer and complete the element.
    ///
    /// A wrong answer completes the element too. The element reward is paid only
    /// the first time the element is completed.
    ///
    /// # Errors
    ///
    /// Returns `FlowError` if this is not a quiz lesson, nothing is selected, or the
    /// quiz was already submitted.
    pub async fn submit_quiz(
        &mut self,
        store: &mut ProgressStore,
    ) -> Result<QuizFeedback, FlowError> {
        self.sync(store);
        let outcome = self.quiz_mut()?.submit()?;
        debug!(
            lesson = self.lesson_index,
            selected = outcome.selected,
            correct = outcome.is_correct,
            "quiz submitted"
        );
        let coins_awarded = self.finish_element(store).await;
        Ok(QuizFeedback {
            outcome,
            explanation: self.explanation(store),
            coins_awarded,
        })
    }

    //
    // ─── DIAGRAM ───────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn diagram(&self) -> Option<&DiagramAttempt> {
        match &self.attempt {
            Attempt::Diagram(diagram) => Some(diagram),
            Attempt::Quiz(_) => None,
        }
    }

    /// Select or deselect a region. Returns whether it is now selected.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::WrongElementKind` on a quiz lesson and
    /// `InteractionError::AlreadySubmitted` once the diagram is locked.
    pub fn toggle_region(&mut self, region: DiagramRegion) -> Result<bool, FlowError> {
        Ok(self.diagram_mut()?.toggle(region)?)
    }

    /// Show or hide the diagram hint. Returns the new visibility.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::WrongElementKind` on a quiz lesson.
    pub fn toggle_hints(&mut self) -> Result<bool, FlowError> {
        Ok(self.diagram_mut()?.toggle_hints())
    }

    /// Lock the selection and complete the element.
    ///
    /// # Errors
    ///
    /// Returns `FlowError` if this is not a diagram lesson, fewer regions than the
    /// threshold are selected, or the diagram was already submitted.
    pub async fn submit_diagram(
        &mut self,
        store: &mut ProgressStore,
    ) -> Result<DiagramFeedback, FlowError> {
        self.sync(store);
        let outcome = self.diagram_mut()?.submit()?;
        debug!(
            lesson = self.lesson_index,
            selected = outcome.regions.len(),
            targets = outcome.targets_found(),
            "diagram submitted"
        );
        let coins_awarded = self.finish_element(store).await;
        Ok(DiagramFeedback {
            outcome,
            explanation: self.explanation(store),
            coins_awarded,
        })
    }

    //
    // ─── LESSON ────────────────────────────────────────────────────────────────
    //

    /// The content was read and the element is completed.
    #[must_use]
    pub fn can_complete_lesson(&self, store: &ProgressStore) -> bool {
        self.lesson_index == store.current_lesson_index()
            && self.has_read
            && store.current_lesson().element().is_completed()
    }

    /// Mark the current lesson completed and pay the lesson reward, plus the module
    /// bonus as a separate award on the final lesson. Completing an already
    /// completed lesson pays nothing.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::NotRead` or `FlowError::ElementIncomplete` when the
    /// lesson is not ready to complete.
    pub async fn complete_lesson(
        &mut self,
        store: &mut ProgressStore,
    ) -> Result<LessonCompletion, FlowError> {
        self.sync(store);
        if !self.has_read {
            return Err(FlowError::NotRead);
        }
        if !store.current_lesson().element().is_completed() {
            return Err(FlowError::ElementIncomplete);
        }

        let index = self.lesson_index;
        let mut coins_awarded = 0;
        if store.complete_lesson(index).await {
            coins_awarded = self
                .policy
                .lesson_completion_total(store.current_module(), index);
            store.award_coins(self.policy.lesson_reward()).await;
            let bonus = self.policy.module_bonus(store.current_module(), index);
            store.award_coins(bonus).await;
        }
        Ok(LessonCompletion {
            coins_awarded,
            module_completed: store.current_module().is_completed(),
        })
    }

    //
    // ─── NAVIGATION ────────────────────────────────────────────────────────────
    //

    /// Move the store to the next lesson and start a fresh page.
    pub async fn next_lesson(&mut self, store: &mut ProgressStore) -> bool {
        let moved = store.advance_lesson().await;
        *self = Self::new(store, self.policy);
        moved
    }

    /// Move the store to the previous lesson and start a fresh page.
    pub async fn previous_lesson(&mut self, store: &mut ProgressStore) -> bool {
        let moved = store.retreat_lesson().await;
        *self = Self::new(store, self.policy);
        moved
    }

    /// Reset all progress and start a fresh page on the first lesson.
    pub async fn reset(&mut self, store: &mut ProgressStore) {
        store.reset_module().await;
        *self = Self::new(store, self.policy);
    }

    //
    // ─── HELPERS ───────────────────────────────────────────────────────────────
    //

    fn quiz_mut(&mut self) -> Result<&mut QuizAttempt, FlowError> {
        match &mut self.attempt {
            Attempt::Quiz(quiz) => Ok(quiz),
            Attempt::Diagram(_) => Err(FlowError::WrongElementKind {
                expected: ElementKind::Quiz,
                actual: ElementKind::Diagram,
            }),
        }
    }

    fn diagram_mut(&mut self) -> Result<&mut DiagramAttempt, FlowError> {
        match &mut self.attempt {
            Attempt::Diagram(diagram) => Ok(diagram),
            Attempt::Quiz(_) => Err(FlowError::WrongElementKind {
                expected: ElementKind::Diagram,
                actual: ElementKind::Quiz,
            }),
        }
    }

    async fn finish_element(&self, store: &mut ProgressStore) -> u64 {
        if !store.complete_interactive_element(self.lesson_index).await {
            return 0;
        }
        let reward = self.policy.element_reward(self.attempt.kind());
        store.award_coins(reward).await;
        reward
    }

    fn explanation(&self, store: &ProgressStore) -> String {
        store.current_lesson().element().spec().explanation().to_owned()
    }
}
