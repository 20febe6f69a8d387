//! Service builder and router

use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::Json;
use axum::Router;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use layout::Providers;
use repository::{
    ArtifactStore, Browser, Configuration, ConfigurationError, ConfigurationFile,
    DirectoryListing, relative_path,
};
use serde::{Deserialize, Serialize};
use storage::MultiBackend;
use tower_http::trace::TraceLayer;

use crate::error::BrowseResult;
use crate::render;

/// Builder for the browse service
#[derive(Debug)]
pub struct BrowseBuilder {
    configuration: Configuration,
    backends: MultiBackend,
    providers: Option<Providers>,
    base_url: String,
}

impl Default for BrowseBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowseBuilder {
    /// Create a builder with an empty configuration and no backends
    pub fn new() -> Self {
        Self {
            configuration: Configuration::new(),
            backends: MultiBackend::new(),
            providers: None,
            base_url: String::new(),
        }
    }

    /// Set the storages and repositories to serve
    pub fn configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = configuration;
        self
    }

    /// Set the storage backends repository locations resolve to
    pub fn backends(mut self, backends: MultiBackend) -> Self {
        self.backends = backends;
        self
    }

    /// Set the layout and formatter registries, the built-in ones by default
    pub fn providers(mut self, providers: Providers) -> Self {
        self.providers = Some(providers);
        self
    }

    /// Set the URL prefix of links in HTML listings
    ///
    /// Links are absolute paths when no base URL is set.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    /// Build the service from a configuration file, using the configured providers
    pub fn from_file(self, file: &ConfigurationFile) -> Result<Self, ConfigurationError> {
        let providers = self.providers.clone().unwrap_or_else(Providers::builtin);
        let configuration = file.build(providers.layouts())?;
        let backends = file.backends()?;
        Ok(self
            .providers(providers)
            .configuration(configuration)
            .backends(backends))
    }

    /// Build the browse service
    pub fn build(self) -> BrowseService {
        BrowseService {
            state: Arc::new(BrowseState {
                configuration: ArcSwap::from_pointee(self.configuration),
                backends: Arc::new(self.backends),
                providers: self.providers.unwrap_or_else(Providers::builtin),
                base_url: self.base_url,
            }),
        }
    }
}

#[derive(Debug)]
struct BrowseState {
    configuration: ArcSwap<Configuration>,
    backends: Arc<MultiBackend>,
    providers: Providers,
    base_url: String,
}

impl BrowseState {
    fn browser(&self) -> Browser {
        Browser::new(self.configuration.load_full(), self.backends.clone())
    }

    fn artifacts(&self) -> ArtifactStore {
        ArtifactStore::new(self.configuration.load_full(), self.backends.clone())
    }
}

/// The browse service: a router over a swappable configuration
///
/// Clones share state, so reconfiguring one clone reconfigures every router
/// built from any of them.
#[derive(Debug, Clone)]
pub struct BrowseService {
    state: Arc<BrowseState>,
}

impl BrowseService {
    /// Create a builder
    pub fn builder() -> BrowseBuilder {
        BrowseBuilder::new()
    }

    /// The configuration currently served
    pub fn configuration(&self) -> Arc<Configuration> {
        self.state.configuration.load_full()
    }

    /// Serve a new configuration
    ///
    /// Requests already in flight finish against the configuration they
    /// started with.
    pub fn reconfigure(&self, configuration: Configuration) {
        let storages = configuration.storages().count();
        self.state.configuration.store(Arc::new(configuration));
        tracing::info!(storages, "Reconfigured");
    }

    /// Build the router
    ///
    /// Returns a Router that can be served with any tower-compatible server
    pub fn router(&self) -> Router {
        Router::new()
            .route("/storages", get(storages))
            .route("/storages/", get(storages))
            .route("/storages/{storage}", get(repositories))
            .route("/storages/{storage}/", get(repositories))
            .route("/storages/{storage}/{repository}", get(repository_root))
            .route("/storages/{storage}/{repository}/", get(repository_root))
            .route("/storages/{storage}/{repository}/{*path}", get(contents))
            .route("/api/snippets/{storage}/{repository}/{*path}", get(snippet))
            .route("/api/formatters/{layout}", get(formatters))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }
}

fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.contains("application/json"))
}

fn respond(
    state: &BrowseState,
    headers: &HeaderMap,
    segments: &[&str],
    listing: DirectoryListing,
) -> Response {
    if wants_json(headers) {
        Json(listing).into_response()
    } else {
        Html(render::listing(&state.base_url, segments, &listing)).into_response()
    }
}

async fn storages(State(state): State<Arc<BrowseState>>, headers: HeaderMap) -> Response {
    let listing = state.browser().list_storages();
    respond(&state, &headers, &["storages"], listing)
}

async fn repositories(
    State(state): State<Arc<BrowseState>>,
    Path(storage): Path<String>,
    headers: HeaderMap,
) -> BrowseResult<Response> {
    let listing = state.browser().list_repositories(&storage)?;
    Ok(respond(&state, &headers, &["storages", &storage], listing))
}

async fn repository_root(
    State(state): State<Arc<BrowseState>>,
    Path((storage, repository)): Path<(String, String)>,
    headers: HeaderMap,
) -> BrowseResult<Response> {
    list(&state, &headers, &storage, &repository, "").await
}

async fn contents(
    State(state): State<Arc<BrowseState>>,
    Path((storage, repository, path)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> BrowseResult<Response> {
    list(&state, &headers, &storage, &repository, &path).await
}

async fn list(
    state: &BrowseState,
    headers: &HeaderMap,
    storage: &str,
    repository: &str,
    path: &str,
) -> BrowseResult<Response> {
    let listing = state.browser().browse(storage, repository, path).await?;

    let relative = relative_path(path).unwrap_or_default();
    let segments: Vec<&str> = ["storages", storage, repository]
        .into_iter()
        .chain(relative.iter())
        .collect();
    Ok(respond(state, headers, &segments, listing))
}

#[derive(Debug, Deserialize)]
struct SnippetQuery {
    formatter: String,
}

async fn snippet(
    State(state): State<Arc<BrowseState>>,
    Path((storage, repository, path)): Path<(String, String, String)>,
    query: Result<Query<SnippetQuery>, QueryRejection>,
) -> BrowseResult<String> {
    let Query(query) = query?;
    let coordinates = state.artifacts().parse(&storage, &repository, &path)?;
    let snippet = state.providers.dependency_snippet(
        coordinates.layout(),
        &query.formatter,
        &coordinates,
    )?;
    Ok(snippet)
}

#[derive(Debug, Serialize)]
struct Formatters {
    layout: String,
    formatters: Vec<String>,
}

async fn formatters(
    State(state): State<Arc<BrowseState>>,
    Path(layout): Path<String>,
) -> BrowseResult<Json<Formatters>> {
    state
        .providers
        .lookup_layout_provider(&layout)
        .map_err(layout::LayoutError::from)?;
    let formatters = state.providers.formatters().aliases_for(&layout);
    Ok(Json(Formatters { layout, formatters }))
}
