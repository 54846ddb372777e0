#![forbid(unsafe_code)]

pub mod analytics_service;
pub mod app_services;
pub mod error;
pub mod format;
pub mod quiz_bank_service;
pub mod sessions;

pub use quiz_core::Clock;

pub use analytics_service::AnalyticsService;
pub use app_services::AppServices;
pub use error::{AnalyticsServiceError, AppServicesError, QuizBankError, QuizSessionError};
pub use format::{format_duration, format_interval};
pub use quiz_bank_service::QuizBankService;

pub use sessions::{AnswerFeedback, QuizSession, QuizSessionLoop, SessionAnswerResult, SessionProgress};
