//! Domain models
//!
//! Entities carry their storage identifier under `_id` when serialized.
//! Update payloads go through typed patches, never through loose maps.

pub mod validation;
pub mod ids;
pub mod encounter;
pub mod social;
pub mod hidden_location;
pub mod patch;

pub use validation::ValidationError;
pub use ids::{EncounterId, HiddenLocationEncounterId, SocialEncounterId};
pub use encounter::{Encounter, EncounterKind, EncounterStatus, NewEncounter};
pub use social::{NewSocialEncounter, SocialEncounter};
pub use hidden_location::{HiddenLocationEncounter, NewHiddenLocationEncounter};
pub use patch::{EncounterPatch, HiddenLocationEncounterPatch, SocialEncounterPatch};
