//! # Repository browser
//!
//! HTTP front end over the [`repository`] browsing engine. Listings of
//! storages, repositories and directories are rendered as JSON when the
//! request accepts `application/json`, and as HTML pages with absolute links
//! otherwise. Dependency snippets for artifacts are served as plain text.
//!
//! | route | response |
//! |---|---|
//! | `GET /storages` | storage ids |
//! | `GET /storages/{storage}` | repository names |
//! | `GET /storages/{storage}/{repository}/{*path}` | directory contents |
//! | `GET /api/snippets/{storage}/{repository}/{*path}?formatter=` | dependency snippet |
//! | `GET /api/formatters/{layout}` | formatter aliases of a layout |
//!
//! Every listing route also answers with a trailing slash. A missing storage,
//! repository or path answers `404` with one and the same body.
//!
//! ## Example
//!
//! ```no_run
//! use browse::BrowseService;
//! use storage::{MemoryStorage, MultiBackend};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = BrowseService::builder()
//!     .backends(MultiBackend::new().with(MemoryStorage::with_buckets(&["storage0"])))
//!     .base_url("http://localhost:8080")
//!     .build();
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, service.router()).await?;
//! # Ok(())
//! # }
//! ```

mod api;
mod error;
mod render;

pub use api::{BrowseBuilder, BrowseService};
pub use error::{BrowseError, BrowseResult};
