//! Display projections of the progress snapshot.

use learn_core::model::ProgressSnapshot;

/// Estimated reading and exercise time per lesson.
pub const MINUTES_PER_LESSON: usize = 5;

/// Coin balance label: the plain number below 1000, otherwise thousands with one
/// decimal and a `k` suffix, rounded half up.
#[must_use]
pub fn format_coins(amount: u64) -> String {
    if amount < 1000 {
        return amount.to_string();
    }
    let tenths = (u128::from(amount) * 10 + 500) / 1000;
    format!("{}.{}k", tenths / 10, tenths % 10)
}

/// Remaining-time label for `total` lessons of which `completed` are done.
#[must_use]
pub fn time_remaining(total: usize, completed: usize) -> String {
    let minutes = total
        .saturating_sub(completed)
        .saturating_mul(MINUTES_PER_LESSON);
    if minutes < 60 {
        return format!("{minutes} min");
    }
    let (hours, rest) = (minutes / 60, minutes % 60);
    if rest == 0 {
        format!("{hours}h")
    } else {
        format!("{hours}h {rest}m")
    }
}

/// Header figures for the current module.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSummary {
    pub total_lessons: usize,
    pub completed_lessons: usize,
    pub percent: f64,
    pub time_remaining: String,
    pub position: String,
    pub coins: String,
}

impl ProgressSummary {
    #[must_use]
    pub fn from_snapshot(snapshot: &ProgressSnapshot) -> Self {
        let module = snapshot.module();
        let total = module.lesson_count();
        let completed = module.completed_count();
        Self {
            total_lessons: total,
            completed_lessons: completed,
            percent: module.progress(),
            time_remaining: time_remaining(total, completed),
            position: format!("Lesson {} of {total}", snapshot.current_lesson_index() + 1),
            coins: format_coins(snapshot.user().coins()),
        }
    }

    /// Whole-number percentage for labels and bars.
    #[must_use]
    pub fn percent_rounded(&self) -> u32 {
        // progress is bounded to 0..=100
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let rounded = self.percent.round() as u32;
        rounded
    }
}
