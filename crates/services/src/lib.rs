#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod lesson_flow;
pub mod persistence;
pub mod progress_store;
pub mod progress_view;

pub use learn_core::Clock;

pub use app_services::{AppServices, load_module};
pub use error::{AppServicesError, FlowError};
pub use lesson_flow::{DiagramFeedback, LessonCompletion, LessonFlow, QuizFeedback};
pub use persistence::ProgressPersistence;
pub use progress_store::{COIN_AWARD_TTL_SECS, ProgressStore};
pub use progress_view::{ProgressSummary, format_coins, time_remaining};
