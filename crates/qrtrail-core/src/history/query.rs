//! History query: date-range filtering, ordering and pagination.
//!
//! Everything here is pure; the service layer loads the records and picks
//! the time zone that calendar dates are resolved in.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::model::HistoryRecord;
use crate::error::{QrError, Result};

/// Query parameters: `{page, pageSize, startDate?, endDate?}`.
///
/// Dates are calendar days. `start_date` covers its whole day from
/// 00:00:00.000, `end_date` up to and including 23:59:59.999. Ordering of
/// the two is the caller's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    /// 1-based page number
    pub page: usize,
    pub page_size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl HistoryQuery {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self {
            page,
            page_size,
            start_date: None,
            end_date: None,
        }
    }

    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn with_end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    /// Rejects a zero page or page size.
    pub fn validate(&self) -> Result<()> {
        if self.page == 0 {
            return Err(QrError::validation("page must be at least 1"));
        }
        if self.page_size == 0 {
            return Err(QrError::validation("page size must be at least 1"));
        }
        Ok(())
    }

    /// Resolves the calendar dates to instants in `tz`.
    pub fn bounds_in<Tz: TimeZone>(&self, tz: &Tz) -> DateBounds {
        DateBounds {
            start: self.start_date.map(|d| start_of_day(d, tz)),
            end: self.end_date.map(|d| end_of_day(d, tz)),
        }
    }
}

/// One page of results: `{items, totalItems, totalPages}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPage {
    pub items: Vec<HistoryRecord>,
    pub total_items: usize,
    pub total_pages: usize,
}

impl HistoryPage {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_items: 0,
            total_pages: 0,
        }
    }
}

/// Inclusive instant bounds of a date filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateBounds {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateBounds {
    pub fn contains(&self, at: &DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| *at >= start) && self.end.is_none_or(|end| *at <= end)
    }
}

/// Sorts, filters and slices `records` for one page.
///
/// Ordering is descending by `created_at`; the sort is stable, so records
/// with equal timestamps keep their storage order. A page past the end
/// yields no items but still reports the totals.
pub fn paginate(
    mut records: Vec<HistoryRecord>,
    page: usize,
    page_size: usize,
    bounds: &DateBounds,
) -> HistoryPage {
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    records.retain(|r| bounds.contains(&r.created_at));

    let total_items = records.len();
    let total_pages = total_items.div_ceil(page_size);

    let start = page.saturating_sub(1).saturating_mul(page_size);
    let items = if start >= total_items {
        Vec::new()
    } else {
        let end = start.saturating_add(page_size).min(total_items);
        records.drain(start..end).collect()
    };

    HistoryPage {
        items,
        total_items,
        total_pages,
    }
}

fn start_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    resolve_local(date.and_time(NaiveTime::default()), tz)
}

fn end_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let last_milli = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or_default();
    resolve_local(date.and_time(last_milli), tz)
}

// DST folds pick the earlier instant. A wall time that falls into a gap is
// shifted forward by an hour.
fn resolve_local<Tz: TimeZone>(naive: NaiveDateTime, tz: &Tz) -> DateTime<Utc> {
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| {
            tz.from_local_datetime(&(naive + chrono::Duration::hours(1)))
                .earliest()
        })
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::model::HistoryKind;
    use chrono::FixedOffset;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn record(id: &str, created_at: DateTime<Utc>) -> HistoryRecord {
        HistoryRecord {
            id: id.to_string(),
            content: format!("content {}", id),
            kind: HistoryKind::Generated,
            created_at,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_sorted_descending() {
        let records = vec![
            record("old", at(2024, 1, 1, 0, 0, 0)),
            record("new", at(2024, 3, 1, 0, 0, 0)),
            record("mid", at(2024, 2, 1, 0, 0, 0)),
        ];

        let page = paginate(records, 1, 10, &DateBounds::default());
        let ids: Vec<_> = page.items.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
        assert_eq!(page.total_items, 3);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_equal_timestamps_keep_storage_order() {
        let t = at(2024, 1, 1, 0, 0, 0);
        let records = vec![record("first", t), record("second", t)];
        let page = paginate(records, 1, 10, &DateBounds::default());
        assert_eq!(page.items[0].id, "first");
        assert_eq!(page.items[1].id, "second");
    }

    #[test]
    fn test_pages_cover_everything_once() {
        let records: Vec<_> = (0..23)
            .map(|i| record(&format!("r{}", i), at(2024, 1, 1, 0, 0, 0) + chrono::Duration::minutes(i)))
            .collect();

        let first = paginate(records.clone(), 1, 5, &DateBounds::default());
        assert_eq!(first.total_pages, 5);

        let mut seen = Vec::new();
        for page in 1..=first.total_pages {
            let result = paginate(records.clone(), page, 5, &DateBounds::default());
            seen.extend(result.items.into_iter().map(|r| r.id));
        }

        let mut expected: Vec<_> = records.iter().map(|r| r.id.clone()).collect();
        expected.reverse();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_last_page_is_partial() {
        let records: Vec<_> = (0..12)
            .map(|i| record(&format!("r{}", i), at(2024, 1, 1, 0, 0, 0) + chrono::Duration::minutes(i)))
            .collect();
        let page = paginate(records, 2, 10, &DateBounds::default());
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn test_out_of_range_page_is_empty() {
        let records = vec![record("a", at(2024, 1, 1, 0, 0, 0))];
        let page = paginate(records, 7, 10, &DateBounds::default());
        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 1);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_start_boundary() {
        let query = HistoryQuery::new(1, 10).with_start_date(date(2024, 2, 10));
        let bounds = query.bounds_in(&Utc);
        let midnight = at(2024, 2, 10, 0, 0, 0);

        let records = vec![
            record("on", midnight),
            record("before", midnight - chrono::Duration::microseconds(1)),
        ];
        let page = paginate(records, 1, 10, &bounds);
        assert_eq!(page.total_items, 1);
        assert_eq!(page.items[0].id, "on");
    }

    #[test]
    fn test_end_boundary_is_inclusive_end_of_day() {
        let query = HistoryQuery::new(1, 10).with_end_date(date(2024, 2, 10));
        let bounds = query.bounds_in(&Utc);
        let last = at(2024, 2, 10, 23, 59, 59) + chrono::Duration::milliseconds(999);

        let records = vec![
            record("on", last),
            record("after", last + chrono::Duration::microseconds(1)),
            record("next-day", at(2024, 2, 11, 0, 0, 0)),
        ];
        let page = paginate(records, 1, 10, &bounds);
        assert_eq!(page.total_items, 1);
        assert_eq!(page.items[0].id, "on");
    }

    #[test]
    fn test_bounds_follow_time_zone() {
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let bounds = HistoryQuery::new(1, 10)
            .with_start_date(date(2024, 2, 10))
            .with_end_date(date(2024, 2, 10))
            .bounds_in(&tokyo);

        assert_eq!(bounds.start, Some(at(2024, 2, 9, 15, 0, 0)));
        assert_eq!(
            bounds.end,
            Some(at(2024, 2, 10, 14, 59, 59) + chrono::Duration::milliseconds(999))
        );
    }

    #[test]
    fn test_future_start_date_on_past_records() {
        let records = vec![
            record("a", at(2024, 1, 1, 0, 0, 0)),
            record("b", at(2024, 1, 2, 0, 0, 0)),
        ];
        let bounds = HistoryQuery::new(1, 10)
            .with_start_date(date(2024, 1, 3))
            .bounds_in(&Utc);

        assert_eq!(paginate(records, 1, 10, &bounds), HistoryPage::empty());
    }

    #[test]
    fn test_validate_rejects_zero() {
        assert!(HistoryQuery::new(0, 10).validate().unwrap_err().is_validation());
        assert!(HistoryQuery::new(1, 0).validate().unwrap_err().is_validation());
        assert!(HistoryQuery::new(1, 1).validate().is_ok());
    }

    #[test]
    fn test_query_wire_shape() {
        let query = HistoryQuery::new(2, 10).with_start_date(date(2024, 2, 10));
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value["pageSize"], 10);
        assert_eq!(value["startDate"], "2024-02-10");
        assert!(value.get("endDate").is_none());
    }
}
