pub mod content;
mod element;
mod ids;
mod lesson;
mod module;
mod snapshot;
mod user;

pub use content::{BULLET, ContentBlock, parse_content};
pub use ids::{LessonId, ModuleId, ParseIdError, UserId};

pub use element::{
    Diagram, DiagramRegion, ElementError, ElementKind, ElementSpec, InteractiveElement, Quiz,
    UnknownRegion,
};
pub use lesson::{Lesson, LessonError};
pub use module::{Module, ModuleError};
pub use snapshot::{PersistedLesson, PersistedProgress, ProgressSnapshot, SnapshotError};
pub use user::{User, UserError};
