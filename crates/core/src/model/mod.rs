mod ids;
mod question;
mod quiz;
mod session;

pub use ids::{ParseIdError, QuestionId, QuizId, SessionId};

pub use question::{
    MAX_ALTERNATIVES, MIN_ALTERNATIVES, Question, QuestionDraft, QuestionError,
};
pub use quiz::{Quiz, QuizError};
pub use session::{
    MalformedRecordError, SessionRecord, SessionRecordDraft, SessionRecordError, TopicBreakdown,
    TopicStats,
};
