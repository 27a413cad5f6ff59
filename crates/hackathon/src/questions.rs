//! Question-bank payloads: wire shapes, their in-game form, and the built-in bank.

use serde::{Deserialize, Serialize};

use crate::error::FetchError;
use crate::npc::MinigameKind;

/// One question-bank endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionFeed {
    /// `/mcq`: one multiple-choice question, 1-based `answer`.
    SingleChoice,
    /// `/coding_quiz`: one ordering question.
    Reorder,
    /// `/mcq2`: a batch of multiple-choice questions, 0-based `answer`.
    ChoiceBatch,
}

impl QuestionFeed {
    pub const ALL: [QuestionFeed; 3] = [
        QuestionFeed::SingleChoice,
        QuestionFeed::Reorder,
        QuestionFeed::ChoiceBatch,
    ];

    pub fn path(self) -> &'static str {
        match self {
            QuestionFeed::SingleChoice => "/mcq",
            QuestionFeed::Reorder => "/coding_quiz",
            QuestionFeed::ChoiceBatch => "/mcq2",
        }
    }

    pub fn kind(self) -> MinigameKind {
        match self {
            QuestionFeed::Reorder => MinigameKind::Reorder,
            QuestionFeed::SingleChoice | QuestionFeed::ChoiceBatch => MinigameKind::Choice,
        }
    }
}

/// Request body sent to every feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub username: String,
    pub experience: u32,
    pub language: String,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            username: "hacker".into(),
            experience: 1,
            language: "Java".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Wire shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChoiceWire {
    question: String,
    choices: Vec<String>,
    answer: i64,
    #[serde(default)]
    hints: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ReorderWire {
    question: String,
    answer: Vec<String>,
    #[serde(default)]
    hints: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct BatchItemWire {
    question: String,
    choices: Vec<String>,
    answer: i64,
}

#[derive(Debug, Deserialize)]
struct BatchWire {
    quizzes: Vec<BatchItemWire>,
    #[serde(default)]
    hints: Vec<Vec<String>>,
}

// ---------------------------------------------------------------------------
// In-game form
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ChoicePrompt {
    pub question: String,
    pub choices: Vec<String>,
    /// Zero-based, always a valid index into `choices`.
    pub correct: usize,
    pub hints: Vec<String>,
}

impl ChoicePrompt {
    /// Clamp an answer index onto the available choices.
    /// `one_based` undoes the `/mcq` service's 1-based numbering.
    fn new(
        question: String,
        choices: Vec<String>,
        answer: i64,
        one_based: bool,
        hints: Vec<String>,
    ) -> Result<Self, FetchError> {
        if choices.is_empty() {
            return Err(FetchError::Empty);
        }
        let zero_based = if one_based { answer - 1 } else { answer };
        let correct = zero_based.clamp(0, choices.len() as i64 - 1) as usize;
        Ok(Self {
            question,
            choices,
            correct,
            hints,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReorderPrompt {
    pub question: String,
    /// Labels in the correct top-to-bottom order.
    pub answer: Vec<String>,
    pub hints: Vec<String>,
}

/// What a minigame is mounted with.
#[derive(Debug, Clone, PartialEq)]
pub enum Question {
    Choice(ChoicePrompt),
    Reorder(ReorderPrompt),
}

impl Question {
    pub fn kind(&self) -> MinigameKind {
        match self {
            Question::Choice(_) => MinigameKind::Choice,
            Question::Reorder(_) => MinigameKind::Reorder,
        }
    }

    pub fn hints(&self) -> &[String] {
        match self {
            Question::Choice(p) => &p.hints,
            Question::Reorder(p) => &p.hints,
        }
    }
}

/// A decoded response, cached per feed.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Single(ChoicePrompt),
    Reorder(ReorderPrompt),
    Batch(Vec<ChoicePrompt>),
}

impl Payload {
    /// Decode a response body for `feed`.
    pub fn decode(feed: QuestionFeed, body: &str) -> Result<Self, FetchError> {
        match feed {
            QuestionFeed::SingleChoice => {
                let wire: ChoiceWire = serde_json::from_str(body)?;
                Ok(Payload::Single(ChoicePrompt::new(
                    wire.question,
                    wire.choices,
                    wire.answer,
                    true,
                    wire.hints,
                )?))
            }
            QuestionFeed::Reorder => {
                let wire: ReorderWire = serde_json::from_str(body)?;
                if wire.answer.is_empty() {
                    return Err(FetchError::Empty);
                }
                Ok(Payload::Reorder(ReorderPrompt {
                    question: wire.question,
                    answer: wire.answer,
                    hints: wire.hints,
                }))
            }
            QuestionFeed::ChoiceBatch => {
                let wire: BatchWire = serde_json::from_str(body)?;
                let mut hints = wire.hints.into_iter();
                let quizzes = wire
                    .quizzes
                    .into_iter()
                    .map(|q| {
                        let h = hints.next().unwrap_or_default();
                        ChoicePrompt::new(q.question, q.choices, q.answer, false, h)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                if quizzes.is_empty() {
                    return Err(FetchError::Empty);
                }
                Ok(Payload::Batch(quizzes))
            }
        }
    }

    /// The question at `cursor` (batches wrap around).
    pub fn question_at(&self, cursor: usize) -> Option<Question> {
        match self {
            Payload::Single(p) => Some(Question::Choice(p.clone())),
            Payload::Reorder(p) => Some(Question::Reorder(p.clone())),
            Payload::Batch(list) if list.is_empty() => None,
            Payload::Batch(list) => Some(Question::Choice(list[cursor % list.len()].clone())),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

/// Built-in batch used until (and whenever) `/mcq2` fails.
pub fn default_batch() -> Vec<ChoicePrompt> {
    let entries: [(&str, &[&str], usize, &[&str]); 4] = [
        (
            "What is Java primarily used for?",
            &["Web development", "Mobile apps", "Game consoles", "Cooking recipes"],
            1,
            &["Java is widely used for mobile applications.", "Android apps often use Java."],
        ),
        (
            "Which of these is a feature of Java?",
            &[
                "Memory management",
                "Automatic garbage collection",
                "No object orientation",
                "Uses Python syntax",
            ],
            1,
            &["Java automatically cleans up unused objects.", "Helps prevent memory leaks."],
        ),
        (
            "Which keyword is used to create a class in Java?",
            &["function", "class", "struct", "def"],
            1,
            &["A class defines a blueprint for objects.", "Java is an object-oriented language."],
        ),
        (
            "What is the entry point of a Java application?",
            &["main()", "start()", "run()", "init()"],
            0,
            &[
                "Every Java app starts here.",
                "It must be 'public static void main(String[] args)'.",
            ],
        ),
    ];
    entries
        .iter()
        .map(|(question, choices, correct, hints)| ChoicePrompt {
            question: (*question).to_owned(),
            choices: strings(choices),
            correct: *correct,
            hints: strings(hints),
        })
        .collect()
}
