use reporte_core::auth::PasswordHasher;
use reporte_core::config::Config;
use reporte_core::db::{close_connection, open_connection};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env()?;
    let hasher = PasswordHasher::from_config(&config.password)?;
    log::info!("Password hashing configured with bcrypt cost {}", hasher.cost());

    if config.database.uses_url() {
        log::info!("Connecting with DATABASE_URL");
    } else {
        log::info!(
            "Connecting to database {:?} on {:?}",
            config.database.name,
            config.database.host
        );
    }

    let mut conn = open_connection(&config.database).await?;
    let cursor = conn.cursor().await?;
    cursor.execute("SELECT 1", []).await?;
    close_connection(Some(conn), Some(cursor)).await?;

    Ok(())
}
