//! Car entity and its pre-persistence draft.

use serde::{Deserialize, Serialize};

use super::id::CarId;

/// A persisted car in the fleet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Car {
    /// Store-assigned identifier.
    pub id: CarId,
    /// Manufacturer, e.g. "Volvo".
    pub make: String,
    /// Model name, e.g. "XC60".
    pub model: String,
    /// Model year.
    pub year: u16,
}

/// A car that has not been persisted yet, so it has no id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CarDraft {
    /// Manufacturer.
    pub make: String,
    /// Model name.
    pub model: String,
    /// Model year.
    pub year: u16,
}

impl CarDraft {
    /// Attach a store-assigned id, producing a persisted [`Car`].
    #[must_use]
    pub fn with_id(self, id: CarId) -> Car {
        Car {
            id,
            make: self.make,
            model: self.model,
            year: self.year,
        }
    }
}
