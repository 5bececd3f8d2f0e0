//! Hidden-location encounter: revealed when a tourist gets close to the
//! place shown in an image

use serde::{Deserialize, Serialize};

use super::{EncounterId, HiddenLocationEncounterId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HiddenLocationEncounter {
    #[serde(rename = "_id", alias = "id")]
    pub id: HiddenLocationEncounterId,
    #[serde(rename = "imageURL")]
    pub image_url: String,
    pub image_latitude: f64,
    pub image_longitude: f64,
    /// How close counts as "found", in the same unit the client measures
    #[serde(rename = "distanceTreshold", alias = "distanceThreshold")]
    pub distance_threshold: f64,
    pub encounter_id: EncounterId,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewHiddenLocationEncounter {
    #[serde(rename = "imageURL")]
    pub image_url: String,
    pub image_latitude: f64,
    pub image_longitude: f64,
    #[serde(rename = "distanceTreshold", alias = "distanceThreshold")]
    pub distance_threshold: f64,
    pub encounter_id: EncounterId,
}

impl NewHiddenLocationEncounter {
    pub fn with_id(self, id: HiddenLocationEncounterId) -> HiddenLocationEncounter {
        HiddenLocationEncounter {
            id,
            image_url: self.image_url,
            image_latitude: self.image_latitude,
            image_longitude: self.image_longitude,
            distance_threshold: self.distance_threshold,
            encounter_id: self.encounter_id,
        }
    }
}
