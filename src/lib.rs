pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod translator;

pub use config::{AuthorFilterConfig, FilterFieldConfig, QueryConfig};
pub use error::{HepQueryError, Result};
pub use models::*;
pub use query::{Clause, SearchBuilder, SearchRequest};
pub use translator::{QueryTranslator, TranslatedQuery};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
