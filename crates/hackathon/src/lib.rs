//! Hackathon simulator session core.
//!
//! A player walks the venue, talks to NPCs, and answers quiz minigames to
//! fill a completion meter before the countdown runs out. The session runs
//! headless on top of `hackday_engine`; the host draws the scene store.

pub mod config;
pub mod dialog;
pub mod error;
pub mod hud;
pub mod interrupts;
pub mod layout;
pub mod minigame;
pub mod npc;
pub mod overlay;
pub mod player;
pub mod questions;
pub mod repository;
pub mod session;

pub use config::{DialogLayout, ProgressMode, SessionConfig};
pub use dialog::{DialogEvent, MiniGameDialog};
pub use error::{ConfigError, FetchError};
pub use hud::ScoreBoard;
pub use interrupts::{Interrupt, InterruptScheduler};
pub use minigame::{ChoiceQuestion, Minigame, ReorderQuestion};
pub use npc::{MinigameKind, NpcId, Roster};
pub use questions::{PlayerProfile, Question, QuestionFeed};
pub use repository::{Completion, QuestionBank, QuestionRepository, QuestionSource, SourceResponse};
pub use session::{SessionController, SessionObserver, SessionState};
