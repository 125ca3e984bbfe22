//! Module configuration: the JSON document describing a module's lessons.
//!
//! Any malformed document is rejected as a whole; a module is never built with a
//! lesson that lacks its interactive element.

use serde::Deserialize;
use thiserror::Error;

use crate::model::{
    Diagram, ElementError, ElementSpec, InteractiveElement, Lesson, LessonError, LessonId,
    Module, ModuleError, ModuleId, ParseIdError, ProgressSnapshot, Quiz, User,
};

/// The module bundled with the player.
pub const DEFAULT_MODULE_JSON: &str = include_str!("../data/home-inspection-basics.json");

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("malformed module document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid id {raw:?}: {source}")]
    InvalidId {
        raw: String,
        #[source]
        source: ParseIdError,
    },

    #[error("lesson {id}: {source}")]
    Lesson {
        id: LessonId,
        #[source]
        source: LessonError,
    },

    #[error("lesson {id} interactive element: {source}")]
    Element {
        id: LessonId,
        #[source]
        source: ElementError,
    },

    #[error(transparent)]
    Module(#[from] ModuleError),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModuleConfig {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    coin_reward: u64,
    lessons: Vec<LessonConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LessonConfig {
    id: String,
    title: String,
    content: String,
    interactive_element: ElementConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum ElementConfig {
    #[serde(alias = "knowledge-check", rename_all = "camelCase")]
    Quiz {
        question: String,
        options: Vec<String>,
        correct_answer: usize,
        #[serde(default)]
        explanation: String,
    },
    #[serde(rename_all = "camelCase")]
    Diagram {
        question: String,
        #[serde(default)]
        explanation: String,
    },
}

impl ElementConfig {
    fn into_spec(self) -> Result<ElementSpec, ElementError> {
        Ok(match self {
            ElementConfig::Quiz {
                question,
                options,
                correct_answer,
                explanation,
            } => ElementSpec::Quiz(Quiz::new(question, options, correct_answer, explanation)?),
            ElementConfig::Diagram {
                question,
                explanation,
            } => ElementSpec::Diagram(Diagram::new(question, explanation)?),
        })
    }
}

/// Parse and validate a module document.
///
/// # Errors
///
/// Returns `ConfigError` if the JSON is malformed (including a lesson without an
/// `interactiveElement`) or any part of the module fails validation.
pub fn parse_module(json: &str) -> Result<Module, ConfigError> {
    let config: ModuleConfig = serde_json::from_str(json)?;
    build_module(config)
}

/// The bundled "Home Inspection Basics" module.
///
/// # Errors
///
/// Returns `ConfigError` if the bundled document is invalid.
pub fn default_module() -> Result<Module, ConfigError> {
    parse_module(DEFAULT_MODULE_JSON)
}

/// Fresh progress for `module`: the default learner on the first lesson.
#[must_use]
pub fn initial_snapshot(module: Module) -> ProgressSnapshot {
    ProgressSnapshot::new(User::default(), module)
}

fn build_module(config: ModuleConfig) -> Result<Module, ConfigError> {
    let module_id = parse_id::<ModuleId>(&config.id)?;

    let lessons = config
        .lessons
        .into_iter()
        .map(build_lesson)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Module::new(
        module_id,
        config.title,
        config.description,
        config.coin_reward,
        lessons,
    )?)
}

fn build_lesson(config: LessonConfig) -> Result<Lesson, ConfigError> {
    let id = parse_id::<LessonId>(&config.id)?;
    let spec = config
        .interactive_element
        .into_spec()
        .map_err(|source| ConfigError::Element {
            id: id.clone(),
            source,
        })?;

    Lesson::new(
        id.clone(),
        config.title,
        config.content,
        InteractiveElement::new(spec),
    )
    .map_err(|source| ConfigError::Lesson { id, source })
}

fn parse_id<T>(raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr<Err = ParseIdError>,
{
    raw.parse().map_err(|source| ConfigError::InvalidId {
        raw: raw.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentBlock, ElementKind};

    #[test]
    fn bundled_module_is_valid() {
        let module = default_module().unwrap();
        assert_eq!(module.id().as_str(), "home-inspection-basics");
        assert_eq!(module.title(), "Home Inspection Basics");
        assert_eq!(module.coin_reward(), 50);
        assert_eq!(module.lesson_count(), 3);

        let kinds: Vec<_> = module.lessons().iter().map(|l| l.element().kind()).collect();
        assert_eq!(
            kinds,
            vec![ElementKind::Quiz, ElementKind::Diagram, ElementKind::Quiz]
        );
        assert!(!module.is_completed());
        assert!(module.progress().abs() < f64::EPSILON);
    }

    #[test]
    fn bundled_lessons_keep_plain_section_labels() {
        let module = default_module().unwrap();
        let lessons = module.lessons();
        let blocks: Vec<ContentBlock> = lessons.iter().flat_map(Lesson::blocks).collect();
        assert!(!blocks.iter().any(|b| matches!(b, ContentBlock::Heading(_))));

        let review = ContentBlock::Prose(
            "Review the Report:\nFocus on safety issues and expensive repairs first. \
             Cosmetic stuff can wait."
                .into(),
        );
        assert!(lessons[2].blocks().contains(&review));

        let leads: Vec<String> = lessons[1]
            .blocks()
            .into_iter()
            .filter_map(|b| match b {
                ContentBlock::List { lead, .. } => lead.into_iter().next(),
                _ => None,
            })
            .collect();
        assert_eq!(
            leads,
            vec![
                "Electrical Problems:",
                "Plumbing Issues:",
                "Structural Concerns:",
                "HVAC Red Flags:"
            ]
        );

        let systems = lessons[0].blocks();
        assert!(systems.iter().any(|b| matches!(
            b,
            ContentBlock::List { items, .. } if items.iter().any(|i| i == "Plumbing and water systems")
        )));
    }

    #[test]
    fn initial_snapshot_uses_default_user() {
        let snap = initial_snapshot(default_module().unwrap());
        assert_eq!(snap.current_lesson_index(), 0);
        assert_eq!(snap.user().coins(), 25);
    }

    #[test]
    fn missing_interactive_element_is_fatal() {
        let json = r#"{
            "id": "m", "title": "M",
            "lessons": [{ "id": "l1", "title": "L", "content": "text" }]
        }"#;
        assert!(matches!(parse_module(json), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn knowledge_check_is_a_quiz() {
        let json = r#"{
            "id": "m", "title": "M",
            "lessons": [{
                "id": "l1", "title": "L", "content": "text",
                "interactiveElement": {
                    "type": "knowledge-check", "question": "Q?",
                    "options": ["a", "b"], "correctAnswer": 0
                }
            }]
        }"#;
        let module = parse_module(json).unwrap();
        assert_eq!(module.lessons()[0].element().kind(), ElementKind::Quiz);
        assert_eq!(module.coin_reward(), 0);
    }

    #[test]
    fn invalid_quiz_reports_lesson() {
        let json = r#"{
            "id": "m", "title": "M",
            "lessons": [{
                "id": "l1", "title": "L", "content": "text",
                "interactiveElement": {
                    "type": "quiz", "question": "Q?",
                    "options": ["a", "b"], "correctAnswer": 5
                }
            }]
        }"#;
        match parse_module(json) {
            Err(ConfigError::Element { id, source }) => {
                assert_eq!(id, LessonId::new("l1"));
                assert!(matches!(
                    source,
                    ElementError::CorrectAnswerOutOfRange { index: 5, .. }
                ));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn empty_lesson_list_is_rejected() {
        let json = r#"{ "id": "m", "title": "M", "lessons": [] }"#;
        assert!(matches!(
            parse_module(json),
            Err(ConfigError::Module(ModuleError::NoLessons))
        ));
    }

    #[test]
    fn blank_module_id_is_rejected() {
        let json = r#"{ "id": "  ", "title": "M", "lessons": [] }"#;
        assert!(matches!(
            parse_module(json),
            Err(ConfigError::InvalidId { .. })
        ));
    }
}
