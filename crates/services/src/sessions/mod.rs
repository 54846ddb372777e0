mod progress;
mod service;
mod workflow;

// Public API of the quiz session subsystem.
pub use crate::error::QuizSessionError;
pub use progress::SessionProgress;
pub use service::{AnswerFeedback, QuizSession};
pub use workflow::{QuizSessionLoop, SessionAnswerResult};
