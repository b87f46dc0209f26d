//! CineMorph core: derive a structured set of cinematographic parameters
//! ("DNA") from a reference image, edit it leaf by leaf, and regenerate
//! imagery through a generative backend while preserving visual continuity
//! with the original reference.
//!
//! # Flow overview
//!
//! 1. **Extract**: [`SessionContext::extract`] sends an image to the backend
//!    and receives a [`CinematographyDna`] plus the consistency anchor
//!    (source image reference, seed, opaque structured prompt).
//! 2. **Edit**: the session's `working` copy is mutated leaf by leaf via
//!    dotted paths (`"lighting.intensity"`), while `baseline` stays pinned to
//!    the last backend-confirmed DNA.
//! 3. **Remix**: [`diff`] computes the minimal `path -> value` edit set
//!    between baseline and working; the session forwards it together with the
//!    anchor, unmodified, so the backend regenerates a consistent image.
//! 4. **Blend / presets**: two extracted sessions can be blended at a ratio,
//!    and director presets restyle an image wholesale (installing a fresh
//!    anchor).
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **No hidden state**: a [`SessionContext`] is an explicit owned value;
//!   independent sessions never share anything.
//! - **No partial commits**: every operation either applies its full effect
//!   set or leaves the session exactly as it was.
//! - **No IO in the core**: network access lives behind the [`Gateway`]
//!   trait; the model, diff, and state machine are pure.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod diff;
mod dna;
mod foundation;
mod gateway;
mod session;

pub use diff::engine::{DnaDiff, diff};
pub use dna::model::{
    AtmosphereParams, CameraAngle, CameraParams, CinematographyDna, ColorGrade, ColorMood,
    ColorParams, CompositionParams, DepthOfField, Environment, FieldOfView, Framing,
    LightDirection, LightingParams, LightingStyle, Particles, ShotType, TimeOfDay, Weather,
};
pub use dna::paths::{LEAF_PATHS, set_leaf};
pub use dna::value::{FLOAT_TOLERANCE, LeafValue, floats_close};
pub use foundation::error::{CinemorphError, CinemorphResult};
pub use gateway::Gateway;
pub use gateway::http::{GatewayConfig, HttpGateway};
pub use gateway::protocol::{
    BlendRequest, BlendResponse, ExportFormat, ExportRequest, ExtractRequest, ExtractResponse,
    ImageSource, PresetInfo, PresetRequest, PresetResponse, RemixRequest, RemixResponse,
    StructuredPrompt,
};
pub use session::blend::{BlendOutcome, blend_sessions};
pub use session::context::{
    ConsistencyAnchor, ExtractSummary, PresetOutcome, PresetSource, RemixOutcome, RemixTicket,
    SessionContext, SessionState,
};
