//! Wires the services for one CLI invocation.

use std::path::Path;
use std::sync::Arc;

use qrtrail_application::{GenerateService, HistoryService, ScanSession, SeedOutcome, SessionService};
use qrtrail_core::Result;
use qrtrail_core::clock::{Clock, SystemClock};
use qrtrail_core::config::AppConfig;
use qrtrail_infrastructure::{
    ConfigService, FileTokenRepository, JsonHistoryRepository, LocalAccountVerifier, QrtrailPaths,
};

pub struct App {
    pub config: AppConfig,
    /// `None` when the store could not be prepared at startup
    pub seed_outcome: Option<SeedOutcome>,
    pub history: Arc<HistoryService>,
    pub generator: GenerateService,
    pub session: SessionService,
}

impl App {
    /// Loads config, opens the stores, prepares the history log and
    /// restores any persisted session.
    ///
    /// `data_dir` wins over `data_dir` from the config file.
    pub async fn bootstrap(data_dir: Option<&Path>, config_path: Option<&Path>) -> Result<Self> {
        let config_service = match config_path {
            Some(path) => ConfigService::with_path(path.to_path_buf()),
            None => ConfigService::new(&QrtrailPaths::default())?,
        };
        let config = config_service.load()?;

        let data_dir = data_dir.map(Path::to_path_buf).or_else(|| config.data_dir.clone());
        let paths = QrtrailPaths::new(data_dir.as_deref());
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let history = Arc::new(HistoryService::new(
            Arc::new(JsonHistoryRepository::new(&paths)?),
            clock.clone(),
            config.history.clone(),
        ));

        // A broken history file must not block session commands; the
        // history commands report it when they read the store.
        let seed_outcome = match history.initialize().await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                tracing::warn!("[App] History store not initialized: {}", e);
                None
            }
        };

        let session = SessionService::new(
            Arc::new(FileTokenRepository::new(&paths)?),
            Arc::new(LocalAccountVerifier::new(&paths)?),
            clock.clone(),
            config.session.clone(),
        );
        session.restore().await?;

        let generator = GenerateService::new(history.clone(), clock, &config.generator);

        tracing::debug!("[App] Data directory: {:?}", paths.data_dir().ok());
        Ok(Self {
            config,
            seed_outcome,
            history,
            generator,
            session,
        })
    }

    pub fn scan_session(&self) -> ScanSession {
        ScanSession::new(self.history.clone(), self.config.scanner.scan_options())
    }
}
