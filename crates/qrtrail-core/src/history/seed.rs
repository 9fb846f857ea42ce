//! Synthetic history dataset written on first initialization.

use chrono::{DateTime, Utc};
use rand::Rng;

use super::model::{HistoryKind, HistoryRecord, new_record_id};

/// Contents the sample records are drawn from.
pub const SAMPLE_CONTENTS: &[&str] = &[
    "https://github.com",
    "https://twitter.com",
    "https://youtube.com",
    "https://linkedin.com",
    "https://facebook.com",
    "https://instagram.com",
    "Plain text content",
    "Contact: Pranav, 123456789",
    "WiFi: charusat, Pranav@123",
];

/// Builds `count` records with random content and kind, each dated a whole
/// number of days (`0..window_days`) before `now`.
pub fn sample_records<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    window_days: u32,
    now: DateTime<Utc>,
) -> Vec<HistoryRecord> {
    let window = window_days.max(1);

    (0..count)
        .map(|_| {
            let content = SAMPLE_CONTENTS[rng.gen_range(0..SAMPLE_CONTENTS.len())];
            let kind = if rng.gen_bool(0.5) {
                HistoryKind::Generated
            } else {
                HistoryKind::Scanned
            };
            let days_ago = rng.gen_range(0..window);

            HistoryRecord {
                id: new_record_id(),
                content: content.to_string(),
                kind,
                created_at: now - chrono::Duration::days(i64::from(days_ago)),
            }
        })
        .collect()
}
