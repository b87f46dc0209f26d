use crate::dna::model::CinematographyDna;
use crate::foundation::error::{CinemorphError, CinemorphResult};
use crate::gateway::Gateway;
use crate::gateway::protocol::BlendRequest;
use crate::session::context::SessionContext;

#[derive(Clone, Debug)]
/// Result of a blend between two sessions.
pub struct BlendOutcome {
    /// The generated blend image.
    pub image_url: String,
    /// The combined DNA, validated.
    pub blended_dna: CinematographyDna,
    /// The ratio the backend applied.
    pub ratio: f64,
}

/// Blends the styles of two independent sessions at `ratio` (weight toward
/// session `b`).
///
/// Both sessions must have completed an extraction: the blend has one anchor
/// per input image, held by its own session. The combination itself is
/// backend-computed; this only transports the two baseline DNAs and the
/// ratio. Neither session is mutated, so a blend never disturbs either
/// editing flow.
pub async fn blend_sessions<G: Gateway>(
    gateway: &G,
    a: &SessionContext,
    b: &SessionContext,
    ratio: f64,
    prompt: Option<String>,
) -> CinemorphResult<BlendOutcome> {
    let dna_a = a
        .baseline()
        .ok_or_else(|| CinemorphError::precondition("blend input A has no extracted session"))?;
    let dna_b = b
        .baseline()
        .ok_or_else(|| CinemorphError::precondition("blend input B has no extracted session"))?;
    if !(0.0..=1.0).contains(&ratio) {
        return Err(CinemorphError::precondition(format!(
            "blend ratio must be within 0..=1, got {ratio}"
        )));
    }

    let response = gateway
        .blend(BlendRequest {
            dna_a: dna_a.clone(),
            dna_b: dna_b.clone(),
            ratio,
            prompt,
        })
        .await?;
    response.blended_dna.validate()?;
    Ok(BlendOutcome {
        image_url: response.image_url,
        blended_dna: response.blended_dna,
        ratio: response.ratio,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/session/blend.rs"]
mod tests;
