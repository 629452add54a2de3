//! Level classification and typed student records.

mod level;
mod record;

pub use level::{Category, Level};
pub use record::{Assessment, StudentRecord};
