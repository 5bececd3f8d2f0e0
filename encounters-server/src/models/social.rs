//! Social encounter: completed when enough tourists are nearby at once

use serde::{Deserialize, Serialize};

use super::{EncounterId, SocialEncounterId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialEncounter {
    #[serde(rename = "_id", alias = "id")]
    pub id: SocialEncounterId,
    /// Parent encounter; never checked for existence
    pub encounter_id: EncounterId,
    pub tourists_required_for_completion: i32,
    #[serde(rename = "distanceTreshold", alias = "distanceThreshold")]
    pub distance_threshold: f64,
    #[serde(rename = "touristIDs", default)]
    pub tourist_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewSocialEncounter {
    pub encounter_id: EncounterId,
    pub tourists_required_for_completion: i32,
    #[serde(rename = "distanceTreshold", alias = "distanceThreshold")]
    pub distance_threshold: f64,
    #[serde(rename = "touristIDs")]
    pub tourist_ids: Vec<i64>,
}

impl NewSocialEncounter {
    pub fn with_id(self, id: SocialEncounterId) -> SocialEncounter {
        SocialEncounter {
            id,
            encounter_id: self.encounter_id,
            tourists_required_for_completion: self.tourists_required_for_completion,
            distance_threshold: self.distance_threshold,
            tourist_ids: self.tourist_ids,
        }
    }
}
