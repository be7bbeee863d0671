//! # Survey Portal
//!
//! Command-line walk through the end-user portal's data layer:
//!
//! 1.  Load [`PortalConfig`] from the environment (and `.env`).
//! 2.  Start a [`UserPortal`] and resolve the session, logging in with
//!     `SURVEY_USERNAME` / `SURVEY_PASSWORD` when no session cookie is valid.
//! 3.  Wait for the department and rating resources, then log derived views.
//! 4.  Shut every actor down.

use std::time::Duration;

use survey_resources::config::PortalConfig;
use survey_resources::lifecycle::{setup_tracing, UserPortal};
use survey_resources::model::SessionUser;
use survey_resources::views::{needs_attention, rating_bars, SurveyProgress};
use tracing::{info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = PortalConfig::from_env().map_err(|e| e.to_string())?;
    info!(base_url = %config.base_url, "Starting survey portal");

    let portal = UserPortal::from_config(&config).map_err(|e| e.to_string())?;

    let user = sign_in(&portal).instrument(tracing::info_span!("session")).await;
    match user {
        Some(user) => {
            info!(user = %user.username, department = ?user.department, "Signed in");
            let wait = Duration::from_millis(config.timeout_ms);
            if let Err(e) = report(&portal, wait).instrument(tracing::info_span!("dashboard")).await {
                warn!(error = %e, "Dashboard incomplete");
            }
        }
        None => warn!("No authenticated session; set SURVEY_USERNAME and SURVEY_PASSWORD to log in"),
    }

    portal.shutdown().await?;
    info!("Application finished successfully");
    Ok(())
}

async fn sign_in(portal: &UserPortal) -> Option<SessionUser> {
    match portal.auth.verify().await {
        Ok(Some(user)) => return Some(user),
        Ok(None) => info!("No active session"),
        Err(e) => {
            warn!(error = %e, "Session check failed");
            return None;
        }
    }

    let username = std::env::var("SURVEY_USERNAME").ok()?;
    let password = std::env::var("SURVEY_PASSWORD").ok()?;
    match portal.auth.login(&username, &password).await {
        Ok(user) => Some(user),
        Err(e) => {
            warn!(error = %e, "Login failed");
            None
        }
    }
}

async fn report(portal: &UserPortal, wait: Duration) -> Result<(), String> {
    let settle = async {
        tokio::try_join!(
            portal.departments.settled(),
            portal.ratings.settled(),
            portal.assigned.settled(),
            portal.submissions.settled(),
        )
    };
    let (departments, ratings, assigned, submissions) = tokio::time::timeout(wait, settle)
        .await
        .map_err(|_| "timed out waiting for resources".to_string())?
        .map_err(|e| e.to_string())?;

    match departments.value {
        Some(list) => info!(count = list.len(), gate_failures = portal.gate_failures.count(), "Departments loaded"),
        None => warn!(error = ?departments.error, "Departments unavailable"),
    }

    match ratings.value {
        Some(ratings) => {
            let bars = rating_bars(&ratings);
            info!(departments = bars.len(), attention = ?needs_attention(&bars), "Department ratings");
        }
        None => warn!(error = ?ratings.error, "Ratings unavailable"),
    }

    if let (Some(assigned), Some(submissions)) = (assigned.value, submissions.value) {
        let progress = SurveyProgress::from_lists(&assigned, &submissions);
        info!(
            completed = progress.completed,
            total = progress.total,
            percentage = progress.percentage,
            remaining = progress.remaining(),
            "Survey progress"
        );
    }
    Ok(())
}
