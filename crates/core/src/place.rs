//! The normalized place model shared by search, selection and detail views.

use serde::{Deserialize, Serialize};

/// A pair of decimal-degree coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// A normalized search/selection result.
///
/// Produced by a [`crate::geocoder::Geocoder`] backend and consumed by the
/// map view and detail panel. A `Place` is a value: updates replace the whole
/// value, nothing mutates in place.
///
/// Coordinates are optional. A place lacking either component is "incomplete"
/// and downstream consumers degrade (no-location affordance on the map,
/// unavailable weather) instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Provider-assigned identifier. Stable, but not guaranteed unique
    /// across providers.
    pub id: String,
    /// Short display name, e.g. "Paris".
    pub label: String,
    /// Full display string, e.g. "Paris, Île-de-France, France".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Place {
    /// Coordinates, if the place is complete.
    ///
    /// Non-finite values (NaN, infinities) count as missing.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => {
                Some(Coordinates { lat, lon })
            }
            _ => None,
        }
    }

    /// The string shown in the search box once this place is selected.
    pub fn display_name(&self) -> &str {
        self.full_label.as_deref().unwrap_or(&self.label)
    }

    /// Identity check tolerant of duplicate ids across providers.
    ///
    /// Falls back to coordinate equality when the ids differ, since two
    /// providers can hand out the same place under different ids.
    pub fn same_place(&self, other: &Place) -> bool {
        if self.id == other.id {
            return true;
        }
        match (self.coordinates(), other.coordinates()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}
