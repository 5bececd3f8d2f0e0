//! Base encounter record and its enumerations

use serde::{Deserialize, Serialize};

use super::{EncounterId, ValidationError};

/// Lifecycle status of an encounter.
///
/// Travels as a string, stored as a small integer constant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EncounterStatus {
    #[default]
    #[serde(alias = "draft")]
    Draft,
    #[serde(alias = "archived")]
    Archived,
    #[serde(alias = "active")]
    Active,
}

impl EncounterStatus {
    /// Numeric constant used by storage.
    pub fn as_i16(self) -> i16 {
        match self {
            Self::Draft => 0,
            Self::Archived => 1,
            Self::Active => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Archived => "Archived",
            Self::Active => "Active",
        }
    }
}

impl TryFrom<i16> for EncounterStatus {
    type Error = ValidationError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Draft),
            1 => Ok(Self::Archived),
            2 => Ok(Self::Active),
            other => Err(ValidationError::InvalidVariant {
                field: "status",
                value: other.to_string(),
            }),
        }
    }
}

/// Which specialization an encounter belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EncounterKind {
    #[serde(alias = "social")]
    Social,
    #[serde(
        alias = "location",
        alias = "hiddenLocation",
        alias = "HiddenLocation",
        alias = "location-hidden"
    )]
    Location,
    #[default]
    #[serde(alias = "misc")]
    Misc,
}

impl EncounterKind {
    /// Numeric constant used by storage.
    pub fn as_i16(self) -> i16 {
        match self {
            Self::Social => 0,
            Self::Location => 1,
            Self::Misc => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Social => "Social",
            Self::Location => "Location",
            Self::Misc => "Misc",
        }
    }
}

impl TryFrom<i16> for EncounterKind {
    type Error = ValidationError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Social),
            1 => Ok(Self::Location),
            2 => Ok(Self::Misc),
            other => Err(ValidationError::InvalidVariant {
                field: "type",
                value: other.to_string(),
            }),
        }
    }
}

/// Base encounter as persisted.
///
/// The identifier serializes under the storage key `_id`; the HTTP layer
/// renames it to `id` on the way out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Encounter {
    #[serde(rename = "_id", alias = "id")]
    pub id: EncounterId,
    pub name: String,
    pub description: String,
    pub xp_points: i32,
    pub status: EncounterStatus,
    #[serde(rename = "type")]
    pub kind: EncounterKind,
    pub latitude: f64,
    pub longitude: f64,
    pub should_be_approved: bool,
}

/// Create payload for a base encounter. Absent fields take their zero value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewEncounter {
    pub name: String,
    pub description: String,
    pub xp_points: i32,
    pub status: EncounterStatus,
    #[serde(rename = "type")]
    pub kind: EncounterKind,
    pub latitude: f64,
    pub longitude: f64,
    pub should_be_approved: bool,
}

impl NewEncounter {
    /// Attach a storage identifier.
    pub fn with_id(self, id: EncounterId) -> Encounter {
        Encounter {
            id,
            name: self.name,
            description: self.description,
            xp_points: self.xp_points,
            status: self.status,
            kind: self.kind,
            latitude: self.latitude,
            longitude: self.longitude,
            should_be_approved: self.should_be_approved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_round_trips_through_storage_constant() {
        for status in [
            EncounterStatus::Draft,
            EncounterStatus::Archived,
            EncounterStatus::Active,
        ] {
            assert_eq!(EncounterStatus::try_from(status.as_i16()).unwrap(), status);
        }
        assert!(EncounterStatus::try_from(7).is_err());
    }

    #[test]
    fn kind_rejects_unknown_constant() {
        let err = EncounterKind::try_from(-1).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidVariant { field: "type", .. }));
    }

    #[test]
    fn enums_accept_lowercase_strings() {
        let status: EncounterStatus = serde_json::from_value(json!("active")).unwrap();
        assert_eq!(status, EncounterStatus::Active);
        let kind: EncounterKind = serde_json::from_value(json!("location-hidden")).unwrap();
        assert_eq!(kind, EncounterKind::Location);
        let kind: EncounterKind = serde_json::from_value(json!("Social")).unwrap();
        assert_eq!(kind, EncounterKind::Social);
    }

    #[test]
    fn new_encounter_tolerates_missing_fields() {
        let new: NewEncounter = serde_json::from_value(json!({ "name": "Bridge" })).unwrap();
        assert_eq!(new.name, "Bridge");
        assert_eq!(new.xp_points, 0);
        assert_eq!(new.status, EncounterStatus::Draft);
        assert_eq!(new.kind, EncounterKind::Misc);
    }

    #[test]
    fn encounter_uses_storage_key_and_wire_names() {
        let encounter = NewEncounter {
            name: "Fortress".into(),
            xp_points: 40,
            kind: EncounterKind::Social,
            should_be_approved: true,
            ..Default::default()
        }
        .with_id(EncounterId::new());

        let value = serde_json::to_value(&encounter).unwrap();
        assert!(value.get("_id").is_some());
        assert!(value.get("id").is_none());
        assert_eq!(value["xpPoints"], 40);
        assert_eq!(value["type"], "Social");
        assert_eq!(value["status"], "Draft");
        assert_eq!(value["shouldBeApproved"], true);
    }
}
