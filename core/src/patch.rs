//! Helpers for partial-update payloads.

use serde::{Deserialize, Deserializer};

/// Deserializes a nullable field so that an explicit `null` becomes
/// `Some(None)` while a missing field stays `None` (via `#[serde(default)]`).
pub(crate) fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
