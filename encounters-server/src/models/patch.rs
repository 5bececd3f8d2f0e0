//! Update payloads
//!
//! Updates overwrite the full field whitelist of a record. A patch decodes
//! every field as optional, parses the identifier, and then fills whatever
//! the caller left out with the zero value before the overwrite.

use serde::Deserialize;

use super::{
    Encounter, EncounterId, EncounterKind, EncounterStatus, HiddenLocationEncounter,
    HiddenLocationEncounterId, SocialEncounter, SocialEncounterId, ValidationError,
};

/// Parse a required identifier field.
fn required_id<I>(field: &'static str, raw: Option<String>) -> Result<I, ValidationError>
where
    I: std::str::FromStr<Err = ValidationError>,
{
    raw.ok_or(ValidationError::Missing { field })?.parse()
}

/// Parse an optional parent reference, defaulting to the nil id when absent.
fn parent_id(raw: Option<String>) -> Result<EncounterId, ValidationError> {
    raw.map(|s| s.parse::<EncounterId>())
        .transpose()
        .map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncounterPatch {
    #[serde(alias = "Id", alias = "_id")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub xp_points: Option<i32>,
    pub status: Option<EncounterStatus>,
    #[serde(rename = "type")]
    pub kind: Option<EncounterKind>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub should_be_approved: Option<bool>,
}

impl EncounterPatch {
    pub fn into_encounter(self) -> Result<Encounter, ValidationError> {
        Ok(Encounter {
            id: required_id("id", self.id)?,
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            xp_points: self.xp_points.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            kind: self.kind.unwrap_or_default(),
            latitude: self.latitude.unwrap_or_default(),
            longitude: self.longitude.unwrap_or_default(),
            should_be_approved: self.should_be_approved.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialEncounterPatch {
    #[serde(alias = "Id", alias = "_id")]
    pub id: Option<String>,
    pub encounter_id: Option<String>,
    pub tourists_required_for_completion: Option<i32>,
    #[serde(rename = "distanceTreshold", alias = "distanceThreshold")]
    pub distance_threshold: Option<f64>,
    #[serde(rename = "touristIDs")]
    pub tourist_ids: Option<Vec<i64>>,
}

impl SocialEncounterPatch {
    pub fn into_social_encounter(self) -> Result<SocialEncounter, ValidationError> {
        let id: SocialEncounterId = required_id("id", self.id)?;
        Ok(SocialEncounter {
            id,
            encounter_id: parent_id(self.encounter_id)?,
            tourists_required_for_completion: self
                .tourists_required_for_completion
                .unwrap_or_default(),
            distance_threshold: self.distance_threshold.unwrap_or_default(),
            tourist_ids: self.tourist_ids.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HiddenLocationEncounterPatch {
    #[serde(alias = "Id", alias = "_id")]
    pub id: Option<String>,
    #[serde(rename = "imageURL")]
    pub image_url: Option<String>,
    pub image_latitude: Option<f64>,
    pub image_longitude: Option<f64>,
    #[serde(rename = "distanceTreshold", alias = "distanceThreshold")]
    pub distance_threshold: Option<f64>,
    pub encounter_id: Option<String>,
}

impl HiddenLocationEncounterPatch {
    pub fn into_hidden_location_encounter(
        self,
    ) -> Result<HiddenLocationEncounter, ValidationError> {
        let id: HiddenLocationEncounterId = required_id("id", self.id)?;
        Ok(HiddenLocationEncounter {
            id,
            image_url: self.image_url.unwrap_or_default(),
            image_latitude: self.image_latitude.unwrap_or_default(),
            image_longitude: self.image_longitude.unwrap_or_default(),
            distance_threshold: self.distance_threshold.unwrap_or_default(),
            encounter_id: parent_id(self.encounter_id)?,
        })
    }
}
