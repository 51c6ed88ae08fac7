use std::sync::Arc;

use dotenv::dotenv;
use mimalloc::MiMalloc;
use sqlx::postgres::PgPoolOptions;

use contact_service::config::Config;
use contact_service::repository::PgContactRepository;
use contact_service::routes;
use contact_service::service::ContactService;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt().init();

    let config = Config::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(num_cpus::get() as u32 * 2)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let repo = Arc::new(PgContactRepository::new(pool));
    let app = routes::app(ContactService::new(repo));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "contact service listening");
    axum::serve(listener, app).await?;

    Ok(())
}
