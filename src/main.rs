use dotenvy::dotenv;
use invoice_desk::{
    config,
    core::{report::DateRange, state::AppState},
    errors::Result,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load seed configuration
    let seed_config = config::defaults::load_or_default(config::defaults::DEFAULT_CONFIG_PATH)
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;

    // 4. Connect and make sure the tables exist
    let db = config::database::create_connection()
        .await
        .inspect(|_| info!("Database connected."))
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    config::database::create_tables(&db)
        .await
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Seed an empty store
    config::defaults::seed_defaults(&db, &seed_config, config::users::bootstrap_admin())
        .await
        .inspect_err(|e| error!("Failed to seed defaults: {}", e))?;

    // 6. Load application state
    let state = AppState::load(&db)
        .await
        .inspect(|s| {
            info!(
                "Loaded {} users, {} invoices, {} quotations",
                s.users.len(),
                s.invoices.len(),
                s.quotations.len()
            );
        })
        .inspect_err(|e| error!("Failed to load application state: {}", e))?;

    // 7. Restore the previous session, if any
    let sessions = config::session::session_store();
    match sessions.restore(&state.users).await? {
        Some(user) => info!("Restored session for {} ({})", user.name, user.role),
        None => warn!("No active session; sign-in required"),
    }

    // 8. Summarize the current month
    let report = state.invoice_report(DateRange::current_month());
    info!(
        "Invoices {}",
        report.summary_line(&state.settings.currency_symbol)
    );

    Ok(())
}
