#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{
    InMemoryRepository, QuizRepository, SessionHistoryProvider, SessionRecorder, Storage,
    StorageError,
};
