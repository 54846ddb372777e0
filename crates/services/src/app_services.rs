use std::sync::Arc;

use quiz_core::analytics::AnalyticsConfig;
use storage::repository::{SessionRecorder, Storage};

use crate::Clock;
use crate::analytics_service::AnalyticsService;
use crate::error::AppServicesError;
use crate::quiz_bank_service::QuizBankService;
use crate::sessions::QuizSessionLoop;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    quiz_bank: Arc<QuizBankService>,
    session_loop: Arc<QuizSessionLoop>,
    analytics: Arc<AnalyticsService>,
    recorder: Arc<dyn SessionRecorder>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        config: AnalyticsConfig,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock, config))
    }

    /// Build services backed by in-memory storage.
    #[must_use]
    pub fn in_memory(clock: Clock, config: AnalyticsConfig) -> Self {
        Self::from_storage(&Storage::in_memory(), clock, config)
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock, config: AnalyticsConfig) -> Self {
        let quiz_bank = Arc::new(QuizBankService::new(clock, Arc::clone(&storage.quizzes)));
        let session_loop = Arc::new(
            QuizSessionLoop::new(
                clock,
                Arc::clone(&storage.quizzes),
                Arc::clone(&storage.recorder),
            )
            .with_shuffle(true),
        );
        let analytics = Arc::new(
            AnalyticsService::new(clock, Arc::clone(&storage.history)).with_config(config),
        );

        Self {
            quiz_bank,
            session_loop,
            analytics,
            recorder: Arc::clone(&storage.recorder),
        }
    }

    #[must_use]
    pub fn quiz_bank(&self) -> Arc<QuizBankService> {
        Arc::clone(&self.quiz_bank)
    }

    #[must_use]
    pub fn session_loop(&self) -> Arc<QuizSessionLoop> {
        Arc::clone(&self.session_loop)
    }

    #[must_use]
    pub fn analytics(&self) -> Arc<AnalyticsService> {
        Arc::clone(&self.analytics)
    }

    /// Direct access to the session store, for imports and seeding.
    #[must_use]
    pub fn recorder(&self) -> Arc<dyn SessionRecorder> {
        Arc::clone(&self.recorder)
    }
}
