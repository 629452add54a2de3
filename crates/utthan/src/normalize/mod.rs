//! Value normalization for the raw sheet.

mod aliases;
mod normalizer;

pub use aliases::{ATTENDANCE_ALIASES, canonical_attendance};
pub use normalizer::{
    Normalizer, normalize_code, normalize_level, normalize_name, title_case,
};
