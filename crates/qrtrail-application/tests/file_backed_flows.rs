use std::path::Path;
use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use qrtrail_application::{GenerateService, HistoryService, SeedOutcome, SessionService};
use qrtrail_core::clock::ManualClock;
use qrtrail_core::config::{GeneratorSettings, HistorySettings, SessionSettings};
use qrtrail_core::history::{HistoryKind, HistoryQuery};
use qrtrail_core::session::SessionState;
use qrtrail_infrastructure::{
    FileTokenRepository, JsonHistoryRepository, LocalAccountVerifier, QrtrailPaths,
};
use tempfile::TempDir;

fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap()))
}

fn history_service(dir: &Path, clock: Arc<ManualClock>, seed: bool) -> HistoryService<Utc> {
    let paths = QrtrailPaths::new(Some(dir));
    let settings = HistorySettings {
        seed_sample_data: seed,
        ..HistorySettings::default()
    };
    HistoryService::new(
        Arc::new(JsonHistoryRepository::new(&paths).unwrap()),
        clock,
        settings,
    )
    .with_time_zone(Utc)
}

fn session_service(dir: &Path, clock: Arc<ManualClock>) -> SessionService {
    let paths = QrtrailPaths::new(Some(dir));
    SessionService::new(
        Arc::new(FileTokenRepository::new(&paths).unwrap()),
        Arc::new(LocalAccountVerifier::new(&paths).unwrap()),
        clock,
        SessionSettings::default(),
    )
}

#[tokio::test]
async fn test_append_to_empty_store_then_query() {
    let temp_dir = TempDir::new().unwrap();
    let service = history_service(temp_dir.path(), clock(), false);
    assert_eq!(service.initialize().await.unwrap(), SeedOutcome::InitializedEmpty);

    service
        .append("https://example.com", HistoryKind::Generated)
        .await
        .unwrap();

    let page = service.query(&HistoryQuery::new(1, 10)).await.unwrap();
    assert_eq!(page.total_items, 1);
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.items[0].content, "https://example.com");
}

#[tokio::test]
async fn test_seeded_history_survives_restart() {
    let temp_dir = TempDir::new().unwrap();
    let clock = clock();

    let first = history_service(temp_dir.path(), clock.clone(), true);
    assert_eq!(first.initialize().await.unwrap(), SeedOutcome::Seeded(15));
    clock.advance(Duration::seconds(1));
    let record = first.append("hello", HistoryKind::Scanned).await.unwrap();
    let before = first.query(&HistoryQuery::new(1, 100)).await.unwrap();

    let restarted = history_service(temp_dir.path(), clock, true);
    assert_eq!(
        restarted.initialize().await.unwrap(),
        SeedOutcome::AlreadyInitialized
    );

    let after = restarted.query(&HistoryQuery::new(1, 100)).await.unwrap();
    assert_eq!(after, before);
    assert_eq!(after.total_items, 16);
    assert_eq!(after.items[0], record);
}

#[tokio::test]
async fn test_corrupted_store_is_reported_and_left_alone() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("qr_history.json");
    std::fs::write(&path, "{not json").unwrap();

    let service = history_service(temp_dir.path(), clock(), true);

    assert!(service.initialize().await.unwrap_err().is_persistence_parse());
    let err = service.query(&HistoryQuery::new(1, 10)).await.unwrap_err();
    assert!(err.is_persistence_parse());
    assert_eq!(err.notice_title(), "Could not load QR code history");

    assert!(service.append("x", HistoryKind::Generated).await.is_err());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{not json");
}

#[tokio::test]
async fn test_generate_writes_through_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let clock = clock();
    let history = Arc::new(history_service(temp_dir.path(), clock.clone(), false));
    history.initialize().await.unwrap();
    let generator = GenerateService::new(history, clock.clone(), &GeneratorSettings::default());

    let code = generator.generate("https://example.com/a").await.unwrap();

    let reopened = history_service(temp_dir.path(), clock, false);
    let page = reopened.query(&HistoryQuery::new(1, 10)).await.unwrap();
    assert_eq!(page.items, vec![code.record]);
}

#[tokio::test]
async fn test_login_then_logout_with_local_account() {
    let temp_dir = TempDir::new().unwrap();
    let clock = clock();

    let registering = session_service(temp_dir.path(), clock.clone());
    registering.register("Ada", "a@b.com", "x").await.unwrap();
    registering.logout().await.unwrap();

    let service = session_service(temp_dir.path(), clock);
    let identity = service.login("a@b.com", "x").await.unwrap();
    assert_eq!(identity.email, "a@b.com");
    assert_eq!(identity.display_name, "Ada");

    service.logout().await.unwrap();
    assert_eq!(service.current().await, SessionState::Anonymous);
    assert!(!temp_dir.path().join("qr_auth_token").exists());
}

#[tokio::test]
async fn test_session_restored_until_expiry() {
    let temp_dir = TempDir::new().unwrap();
    let clock = clock();

    let first = session_service(temp_dir.path(), clock.clone());
    first.register("Ada", "ada@example.com", "pw").await.unwrap();

    let restarted = session_service(temp_dir.path(), clock.clone());
    let state = restarted.restore().await.unwrap();
    assert_eq!(
        state.identity().map(|i| i.email.as_str()),
        Some("ada@example.com")
    );

    clock.advance(Duration::hours(168));
    let expired = session_service(temp_dir.path(), clock);
    assert_eq!(expired.restore().await.unwrap(), SessionState::Anonymous);
    assert!(!temp_dir.path().join("qr_auth_token").exists());
}

#[tokio::test]
async fn test_wrong_password_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let service = session_service(temp_dir.path(), clock());
    service.register("Ada", "a@b.com", "x").await.unwrap();
    service.logout().await.unwrap();

    let err = service.login("a@b.com", "y").await.unwrap_err();
    assert!(err.is_authentication());
    assert!(!service.is_authenticated().await);
}
