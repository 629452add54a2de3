//! Input loading and data source handling.

mod loader;
mod source;

pub use loader::{Loader, LoaderConfig, SourceFormat};
pub use source::{DataTable, SourceMetadata};
