pub mod error;
pub mod participant;
pub mod phase;
pub mod stimulus;
pub mod trial;

pub use error::{InvalidResponseState, PaletteError, ProfileField, ValidationError};
pub use participant::{Education, Gender, ParticipantDraft, ParticipantProfile, SocioeconomicLevel};
pub use phase::{Condition, Phase, Step};
pub use stimulus::{ColorSwatch, Palette, STANDARD_SWATCHES, Trial};
pub use trial::{ResultLog, TrialResult, TrialState};
