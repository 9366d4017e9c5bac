//! Elasticsearch-compatible search backend integration.
//!
//! ```ascii
//! elastic/
//! ├── mod.rs       ─► re-exports
//! ├── config.rs    ─► ElasticConfig, field constants
//! └── client.rs    ─► ElasticClient (create/bulk/refresh/count/msearch)
//! ```

mod client;
mod config;

pub use client::ElasticClient;
pub use config::{ElasticConfig, TEXT_FIELD, TITLE_FIELD};

pub(crate) use client::hits_to_scores;
