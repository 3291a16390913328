//! Data Model
//!
//! Profile, fleet and draft types exchanged with the backend.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Profile of the signed-in user. Read-only on the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mobile: String,
    /// Any other profile fields the backend sends along.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Server-assigned vehicle identifier.
///
/// Opaque to the client. The backend may send it as a JSON string or a
/// number; both end up as the same textual id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VehicleId(String);

impl VehicleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for VehicleId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Self(s),
            RawId::Number(n) => Self(n.to_string()),
        })
    }
}

/// A vehicle confirmed by the backend.
///
/// Always carries an id; unsaved vehicles live in [`VehicleDraft`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub number: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub model: String,
}

/// Unsaved vehicle being filled in by the creation form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VehicleDraft {
    pub name: String,
    pub number: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub model: String,
}

impl VehicleDraft {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.number.is_empty()
            && self.kind.is_empty()
            && self.model.is_empty()
    }

    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        let slot = match field {
            DraftField::Name => &mut self.name,
            DraftField::Number => &mut self.number,
            DraftField::Type => &mut self.kind,
            DraftField::Model => &mut self.model,
        };
        *slot = value.into();
    }
}

/// Editable fields of a [`VehicleDraft`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Name,
    Number,
    Type,
    Model,
}

/// Body of `GET /protected/`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProfileSnapshot {
    #[serde(rename = "users", default)]
    pub user: User,
    #[serde(rename = "vehicles", default, deserialize_with = "listed_vehicles")]
    pub fleet: Vec<Vehicle>,
}

/// Keeps the vehicles that decode; entries without a usable id are
/// drafts and never reach the fleet.
fn listed_vehicles<'de, D>(deserializer: D) -> Result<Vec<Vehicle>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;

    Ok(raw
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<Vehicle>(entry) {
            Ok(vehicle) => Some(vehicle),
            Err(e) => {
                warn!("Skipping unlisted vehicle entry: {}", e);
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn vehicle_id_accepts_strings_and_numbers() {
        let a: Vehicle = serde_json::from_value(json!({"id": "v1", "name": "Car"})).unwrap();
        let b: Vehicle = serde_json::from_value(json!({"id": 42, "name": "Van"})).unwrap();

        assert_eq!(a.id.as_str(), "v1");
        assert_eq!(b.id.as_str(), "42");
    }

    #[test]
    fn vehicle_without_id_is_rejected() {
        let result = serde_json::from_value::<Vehicle>(json!({"name": "Car"}));
        assert!(result.is_err());
    }

    #[test]
    fn fleet_skips_entries_without_id() {
        let snapshot: ProfileSnapshot = serde_json::from_value(json!({
            "users": {"name": "Asha"},
            "vehicles": [
                {"id": "v1", "name": "Car"},
                {"name": "pending", "number": "KA09"},
                {"id": null, "name": "Truck"},
                {"id": 7, "name": "Van"}
            ]
        }))
        .unwrap();

        let ids: Vec<_> = snapshot.fleet.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, ["v1", "7"]);
        assert_eq!(snapshot.user.name, "Asha");
    }

    #[test]
    fn draft_serializes_exactly_four_fields() {
        let mut draft = VehicleDraft::default();
        draft.set(DraftField::Name, "Car");
        draft.set(DraftField::Number, "KA01");
        draft.set(DraftField::Type, "Sedan");
        draft.set(DraftField::Model, "X");

        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            json!({"name": "Car", "number": "KA01", "type": "Sedan", "model": "X"})
        );
        assert!(!draft.is_empty());
        assert!(VehicleDraft::default().is_empty());
    }

    #[test]
    fn snapshot_keeps_extra_profile_fields_and_order() {
        let snapshot: ProfileSnapshot = serde_json::from_value(json!({
            "users": {"name": "Asha", "mobile": "98450", "email": "a@example.com"},
            "vehicles": [
                {"id": "v1", "name": "Car", "number": "KA01", "type": "Sedan", "model": "X"},
                {"id": "v2", "name": "Bike", "number": "KA02", "type": "Scooter", "model": "Y"}
            ]
        }))
        .unwrap();

        assert_eq!(snapshot.user.name, "Asha");
        assert_eq!(snapshot.user.extra["email"], "a@example.com");
        let ids: Vec<_> = snapshot.fleet.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, ["v1", "v2"]);
        assert_eq!(snapshot.fleet[0].kind, "Sedan");
    }
}
