//! API request handlers.

mod dataset;
mod reload;
mod views;

pub use dataset::*;
pub use reload::*;
pub use views::*;
