use chrono::Utc;
use color_eyre::eyre::{Result, WrapErr};
use courtside_api::config::{parse_log_level, parse_timezone};
use courtside_core::{models::facility::FacilityStatus, slots::plan_hourly_slots};
use courtside_db::{
    create_pool,
    repositories::{facility, time_slot},
};
use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Initialize logging
    let log_level =
        parse_log_level(&std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let database_url = std::env::var("DATABASE_URL")
        .wrap_err("DATABASE_URL environment variable must be set")?;
    let timezone = parse_timezone(
        &std::env::var("FACILITY_TIMEZONE").unwrap_or_else(|_| "UTC".to_string()),
    )?;
    let days: u32 = std::env::var("SLOT_GENERATION_DAYS")
        .unwrap_or_else(|_| "7".to_string())
        .parse()
        .wrap_err("Invalid SLOT_GENERATION_DAYS value")?;

    let db_pool = create_pool(&database_url).await?;

    let now = Utc::now();
    let today = now.with_timezone(&timezone).date_naive();
    let mut failures = 0;

    for f in facility::list_facilities(&db_pool, None).await? {
        if f.status != FacilityStatus::Active {
            info!("Skipping facility {} ({}): status {}", f.id, f.name, f.status);
            continue;
        }

        let planned = plan_hourly_slots(f.opening_hour, f.closing_hour, today, days, timezone, now);
        match time_slot::regenerate_slots(&db_pool, f.id, &planned, now).await {
            Ok((deleted, created)) => info!(
                "Facility {} ({}): deleted={}, created={}",
                f.id,
                f.name,
                deleted,
                created
            ),
            Err(e) => {
                error!("Slot generation failed for facility {}: {}", f.id, e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(color_eyre::eyre::eyre!("Slot generation failed for {} facilities", failures));
    }
    Ok(())
}
