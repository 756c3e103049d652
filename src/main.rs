//! Volunteer signup core
//!
//! Loads the event sheet, marks events already signed up for and prints the
//! filtered list. An optional first argument is used as the name search.

use anyhow::Context;
use tracing::{info, warn};

use volunteer_signup::{
    config::Settings,
    models::FilterCriteria,
    search::FilterEngine,
    services::{SheetClient, SubmissionLedger},
    utils::logging,
    FormVariant,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("loading settings")?;
    settings.validate().context("validating settings")?;

    // Initialize logging
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}", volunteer_signup::info());

    let sheet = SheetClient::new(settings.sheet.clone())?;
    let mut events = sheet.fetch_events().await;

    match SubmissionLedger::from_config(&settings.storage).await {
        Ok(ledger) => ledger.mark_submitted(&mut events).await,
        Err(e) => warn!(error = %e, "Submission ledger unavailable, submitted flags not shown"),
    }

    let mut engine = FilterEngine::new(settings.filter);
    engine.set_events(events);

    let options = engine.options();
    info!(
        locations = options.locations.len(),
        tags = options.tags.len(),
        "Filter options ready"
    );

    let mut criteria = FilterCriteria::default();
    if let Some(query) = std::env::args().nth(1) {
        criteria = criteria.with_name_query(query);
    }
    let visible = engine.apply_criteria(criteria);

    for event in visible.iter() {
        let form = FormVariant::for_event(event).map_or("-", FormVariant::title);
        let badge = if event.is_submitted { " [submitted]" } else { "" };
        println!(
            "{} | {} | {} | form: {}{}",
            event.date_key(),
            event.title,
            event.location,
            form,
            badge
        );
    }

    info!(total = engine.events().len(), visible = visible.len(), "Done");
    Ok(())
}
