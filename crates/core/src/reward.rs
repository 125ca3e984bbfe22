//! Coin-award rules.
//!
//! Rewards depend only on the triggering event, never on the current balance.

use crate::model::{ElementKind, Module};

/// Coin amounts granted for each milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardPolicy {
    quiz: u64,
    diagram: u64,
    lesson: u64,
}

impl RewardPolicy {
    pub const QUIZ_REWARD: u64 = 5;
    pub const DIAGRAM_REWARD: u64 = 8;
    pub const LESSON_REWARD: u64 = 10;

    #[must_use]
    pub fn new(quiz: u64, diagram: u64, lesson: u64) -> Self {
        Self {
            quiz,
            diagram,
            lesson,
        }
    }

    /// Coins for finishing an interactive element of the given kind.
    #[must_use]
    pub fn element_reward(&self, kind: ElementKind) -> u64 {
        match kind {
            ElementKind::Quiz => self.quiz,
            ElementKind::Diagram => self.diagram,
        }
    }

    /// Coins for marking a lesson complete. Does not include the module bonus.
    #[must_use]
    pub fn lesson_reward(&self) -> u64 {
        self.lesson
    }

    /// Module bonus for completing the lesson at `index`: the module's coin reward
    /// when it is the final lesson, zero otherwise.
    #[must_use]
    pub fn module_bonus(&self, module: &Module, index: usize) -> u64 {
        if module.is_final_lesson(index) {
            module.coin_reward()
        } else {
            0
        }
    }

    /// Everything granted for completing the lesson at `index`.
    #[must_use]
    pub fn lesson_completion_total(&self, module: &Module, index: usize) -> u64 {
        self.lesson_reward()
            .saturating_add(self.module_bonus(module, index))
    }
}

impl Default for RewardPolicy {
    fn default() -> Self {
        Self::new(Self::QUIZ_REWARD, Self::DIAGRAM_REWARD, Self::LESSON_REWARD)
    }
}
