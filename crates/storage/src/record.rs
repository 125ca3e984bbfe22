//! JSON shape of the persisted progress snapshot.
//!
//! Derived fields (`progress`, `isCompleted` on the module) are written so other
//! readers of the slot can use them, but they are ignored when reading back.

use learn_core::model::{
    ElementSpec, Lesson, LessonId, ModuleId, PersistedLesson, PersistedProgress,
    ProgressSnapshot, User, UserId,
};
use serde::{Deserialize, Serialize};

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRecord {
    pub user: UserRecord,
    pub current_lesson_index: usize,
    pub module: ModuleRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    pub name: String,
    pub coins: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub coin_reward: u64,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub progress: f64,
    pub lessons: Vec<LessonRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub is_completed: bool,
    pub interactive_element: ElementRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRecord {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub question: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<usize>,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub completed: bool,
}

impl SnapshotRecord {
    #[must_use]
    pub fn from_snapshot(snapshot: &ProgressSnapshot) -> Self {
        let user = snapshot.user();
        let module = snapshot.module();
        Self {
            user: UserRecord {
                id: user.id(),
                name: user.name().to_owned(),
                coins: user.coins(),
            },
            current_lesson_index: snapshot.current_lesson_index(),
            module: ModuleRecord {
                id: module.id().to_string(),
                title: module.title().to_owned(),
                description: module.description().to_owned(),
                coin_reward: module.coin_reward(),
                is_completed: module.is_completed(),
                progress: module.progress(),
                lessons: module.lessons().iter().map(LessonRecord::from_lesson).collect(),
            },
        }
    }

    /// Serialize to the slot payload.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if encoding fails.
    pub fn to_json(&self) -> Result<String, StorageError> {
        serde_json::to_string(self).map_err(ser)
    }

    /// Parse a slot payload.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the payload is not a snapshot.
    pub fn from_json(payload: &str) -> Result<Self, StorageError> {
        serde_json::from_str(payload).map_err(ser)
    }

    /// Convert the record into the flags the core merges into its configured module.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored user or ids are invalid.
    pub fn into_persisted(self) -> Result<PersistedProgress, StorageError> {
        let user = User::new(self.user.id, self.user.name, self.user.coins).map_err(ser)?;
        let module_id: ModuleId = self.module.id.parse().map_err(ser)?;
        let lessons = self
            .module
            .lessons
            .into_iter()
            .map(|lesson| {
                Ok(PersistedLesson {
                    id: lesson.id.parse::<LessonId>().map_err(ser)?,
                    is_completed: lesson.is_completed,
                    element_completed: lesson.interactive_element.completed,
                })
            })
            .collect::<Result<Vec<_>, StorageError>>()?;

        Ok(PersistedProgress {
            user,
            current_lesson_index: self.current_lesson_index,
            module_id,
            lessons,
        })
    }
}

impl LessonRecord {
    fn from_lesson(lesson: &Lesson) -> Self {
        Self {
            id: lesson.id().to_string(),
            title: lesson.title().to_owned(),
            content: lesson.content().to_owned(),
            is_completed: lesson.is_completed(),
            interactive_element: ElementRecord::from_spec(
                lesson.element().spec(),
                lesson.element().is_completed(),
            ),
        }
    }
}

impl ElementRecord {
    fn from_spec(spec: &ElementSpec, completed: bool) -> Self {
        match spec {
            ElementSpec::Quiz(quiz) => Self {
                kind: "quiz".to_owned(),
                question: quiz.question().to_owned(),
                options: quiz.options().to_vec(),
                correct_answer: Some(quiz.correct_answer()),
                explanation: quiz.explanation().to_owned(),
                completed,
            },
            ElementSpec::Diagram(diagram) => Self {
                kind: "diagram".to_owned(),
                question: diagram.question().to_owned(),
                options: Vec::new(),
                correct_answer: None,
                explanation: diagram.explanation().to_owned(),
                completed,
            },
        }
    }
}
