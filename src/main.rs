//! OpenSASE Storefront - Self-hosted storefront template

use std::sync::Arc;
use anyhow::Result;
use opensase_storefront::application::{seeded_cart, spawn_catalog_load, HeroInformation, StoreContext, StoreSession};
use opensase_storefront::config::AppConfig;
use opensase_storefront::domain::aggregates::CartLedger;
use opensase_storefront::http::{router, AppState};
use opensase_storefront::infrastructure::{sample_catalog, CatalogSource, MockCatalogSource};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();
    let config = AppConfig::from_env()?;

    let store = Arc::new(StoreContext::unresolved());
    store.resolve(config.store_id)?;
    let hero = Arc::new(HeroInformation::resolve(config.load_site_config().as_ref()));

    let cart = if config.seed_demo_cart { seeded_cart(&sample_catalog()?, &config.currency) } else { CartLedger::new(&config.currency) };
    let session = StoreSession::new(cart).into_shared();
    let badge = session.lock().await.subscribe_badge();
    let source: Arc<dyn CatalogSource> = Arc::new(MockCatalogSource::new(config.catalog_load_delay));
    spawn_catalog_load(session.clone(), source.clone());

    let state = AppState { session, store, hero, source, badge };
    let app = router(state).layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive());

    tracing::info!("🛍️ OpenSASE Storefront listening on 0.0.0.0:{}", config.port);
    axum::serve(tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?, app).await?;
    Ok(())
}
