pub mod api;
pub mod config;
pub mod logic;
pub mod model;
pub mod store;

use anyhow::Context;
use log::info;
use std::sync::Arc;
use tokio::net::TcpListener;

// Export API types
pub use api::handlers;
pub use api::routes;

pub use logic::{
    endpoint_path, CatalogEntry, CatalogError, IdRegistry, PatternCatalog, RegistryError,
    ResolveError, ResolvedMatch, Resolver,
};
pub use model::*;
pub use store::{
    CachedFixtureStore, FixtureError, FixtureStore, FsFixtureStore, MemoryFixtureStore,
};

use crate::config::AppConfig;

/// Build the built-in catalog and the identifier registry over `store`.
///
/// Either failing is a startup error: without the registry no request can be validated.
pub async fn build_resolver<S: FixtureStore>(store: S) -> anyhow::Result<Resolver<S>> {
    let catalog = PatternCatalog::builtin().context("Invalid endpoint catalog")?;
    info!("Endpoint catalog loaded: {} patterns", catalog.len());

    let registry = IdRegistry::build(&store)
        .await
        .context("Failed to build identifier registry")?;
    for (class, count) in registry.stats() {
        info!("Registry {}: {} known", class, count);
    }

    Ok(Resolver::new(catalog, registry, store))
}

/// The HTTP application for a ready resolver
pub fn app<S: FixtureStore + 'static>(resolver: Resolver<S>) -> axum::Router {
    routes::create_router::<S>().with_state(Arc::new(resolver))
}

pub async fn run_server(config: &AppConfig) -> anyhow::Result<()> {
    let store = FsFixtureStore::new(config.fixtures_dir());

    if config.fixtures.cache {
        serve(CachedFixtureStore::new(store), config).await
    } else {
        serve(store, config).await
    }
}

async fn serve<S: FixtureStore + 'static>(store: S, config: &AppConfig) -> anyhow::Result<()> {
    let resolver = build_resolver(store).await?;

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    info!("Mock director running on http://{}", bind_address);

    axum::serve(listener, app(resolver)).await?;

    Ok(())
}
