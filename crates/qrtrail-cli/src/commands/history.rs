use anyhow::Result;
use chrono::{Local, NaiveDate};
use qrtrail_application::SeedOutcome;
use qrtrail_core::history::HistoryQuery;

use crate::app::App;

pub async fn init(app: &App) -> Result<()> {
    let outcome = match app.seed_outcome {
        Some(outcome) => outcome,
        None => app.history.initialize().await?,
    };

    match outcome {
        SeedOutcome::Seeded(count) => println!("History initialized with {} sample records", count),
        SeedOutcome::InitializedEmpty => println!("History initialized (empty)"),
        SeedOutcome::AlreadyInitialized => println!("History already initialized"),
    }
    Ok(())
}

pub async fn list(
    app: &App,
    page: usize,
    page_size: Option<usize>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    let page_size = page_size.unwrap_or(app.history.settings().default_page_size);
    let mut query = HistoryQuery::new(page, page_size);
    if let Some(from) = from {
        query = query.with_start_date(from);
    }
    if let Some(to) = to {
        query = query.with_end_date(to);
    }

    let result = app.history.query(&query).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if result.items.is_empty() {
        println!("No QR codes found");
    }
    for record in &result.items {
        println!(
            "{}  {:<9}  {}",
            record.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            record.kind.as_str(),
            record.content
        );
    }
    if result.total_pages > 0 {
        println!(
            "Page {} of {} ({} total)",
            page, result.total_pages, result.total_items
        );
    }
    Ok(())
}
