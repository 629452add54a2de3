//! Header resolution into typed column positions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::field::Field;
use crate::error::{Result, UtthanError};

/// Position of every expected field in a header row.
///
/// Resolved once when a snapshot is built; everything downstream reads
/// columns through the binding instead of looking headers up by string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaBinding {
    positions: BTreeMap<Field, usize>,
}

impl SchemaBinding {
    /// Match headers against the expected fields.
    ///
    /// The first matching header wins when a sheet repeats a column.
    pub fn resolve(headers: &[String]) -> Self {
        let mut positions = BTreeMap::new();
        for field in Field::ALL {
            if let Some(index) = headers.iter().position(|h| field.matches_header(h)) {
                positions.insert(field, index);
            }
        }
        Self { positions }
    }

    /// Column index of a field.
    pub fn index(&self, field: Field) -> Option<usize> {
        self.positions.get(&field).copied()
    }

    /// Whether the field was found.
    pub fn has(&self, field: Field) -> bool {
        self.positions.contains_key(&field)
    }

    /// Fields the header row does not provide.
    pub fn missing(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| !self.positions.contains_key(f))
            .collect()
    }

    /// Field stored at a column position, if the column is an expected one.
    pub fn field_at(&self, index: usize) -> Option<Field> {
        self.positions
            .iter()
            .find(|&(_, &i)| i == index)
            .map(|(&f, _)| f)
    }

    /// Fail with [`UtthanError::SchemaMismatch`] unless every field is present.
    pub fn require_all(&self) -> Result<()> {
        let missing = self.missing();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(UtthanError::SchemaMismatch {
                missing: missing.iter().map(|f| f.label().to_string()).collect(),
            })
        }
    }

    /// Fail with [`UtthanError::MissingColumn`] if `field` is absent.
    pub fn require(&self, field: Field) -> Result<usize> {
        self.index(field)
            .ok_or_else(|| UtthanError::MissingColumn(field.label().to_string()))
    }
}
