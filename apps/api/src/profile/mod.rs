//! Profile API: the stored profile document and its entry-level updates.

pub mod handlers;

use serde_json::{Map, Value};

use resumecraft_profile::models::Profile;

/// Replaces the top-level fields of `profile` named in `update`.
///
/// Keys the profile does not have are ignored. Fails when a replaced field
/// does not fit the profile's shape.
pub fn merge_known_keys(
    profile: &Profile,
    update: Map<String, Value>,
) -> Result<Profile, serde_json::Error> {
    let mut current = match serde_json::to_value(profile)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    for (key, value) in update {
        if let Some(slot) = current.get_mut(&key) {
            *slot = value;
        }
    }
    serde_json::from_value(Value::Object(current))
}
