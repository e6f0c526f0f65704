use std::sync::Arc;
use std::time::Duration;

use marquee_api::{
    catalog::CatalogStore,
    config::Config,
    db::{self, AccountStore, Cache, ReviewStore},
    routes::{create_router, AppState},
    sentiment::{Lexicon, SentimentScorer},
    services::{
        providers::{RottenTomatoesProvider, TmdbProvider},
        RecommendationEngine,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marquee_api=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    // Catalog and lexicon integrity failures abort startup; the server
    // never runs against partially loaded artifacts.
    let catalog = Arc::new(CatalogStore::load(
        &config.catalog_movies_path,
        &config.catalog_similarity_path,
    )?);
    let scorer = Arc::new(SentimentScorer::new(Lexicon::load(
        &config.sentiment_lexicon_path,
    )?));

    let db_pool = db::create_pool(&config.database_url).await?;
    sqlx::migrate!("./migrations").run(&db_pool).await?;

    let redis_client = db::create_redis_client(&config.redis_url)?;
    let cache = Cache::new(redis_client);

    let timeout = Duration::from_secs(config.fetch_timeout_secs);
    let tmdb = Arc::new(TmdbProvider::new(
        cache,
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        config.tmdb_image_url.clone(),
        timeout,
    )?);
    let critic_reviews = Arc::new(RottenTomatoesProvider::new(
        config.critic_review_url.clone(),
        timeout,
    )?);

    let engine = RecommendationEngine::new(
        Arc::clone(&catalog),
        scorer,
        critic_reviews,
        tmdb.clone(),
    );

    let state = Arc::new(AppState {
        catalog,
        engine,
        reviews: ReviewStore::new(db_pool.clone()),
        accounts: AccountStore::new(db_pool),
        metadata: tmdb.clone(),
        posters: tmdb,
    });

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
