use crate::diff::engine::DnaDiff;
use crate::dna::model::CinematographyDna;
use crate::foundation::error::{CinemorphError, CinemorphResult};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
/// The backend's structured prompt for a reference image.
///
/// Owned by the backend; this crate stores it and forwards it verbatim on
/// remix requests. It is never introspected or mutated here; its shape may
/// change between backend releases without notice.
pub struct StructuredPrompt(serde_json::Value);

impl StructuredPrompt {
    /// Wraps a raw backend payload.
    pub fn new(raw: serde_json::Value) -> Self {
        Self(raw)
    }
}

#[derive(Clone, Debug, PartialEq)]
/// An image handed to the backend, either by reference or inline.
///
/// Inline bytes travel as a multipart file part; URLs (including data URIs)
/// as a plain form field.
pub enum ImageSource {
    /// An image the backend can fetch, or a data URI.
    Url(String),
    /// Raw image bytes uploaded with the request.
    Inline {
        /// Encoded image data.
        bytes: Vec<u8>,
        /// MIME type, e.g. `image/jpeg`.
        mime: String,
        /// File name reported in the multipart part.
        file_name: String,
    },
}

#[derive(Clone, Debug)]
/// Request for [`crate::Gateway::extract`].
pub struct ExtractRequest {
    /// The reference image to analyze.
    pub source: ImageSource,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Response of [`crate::Gateway::extract`].
pub struct ExtractResponse {
    /// The derived DNA. Validate before trusting.
    pub dna: CinematographyDna,
    /// Natural-language description of the reference image.
    pub source_description: String,
    /// Backend confidence in the extraction, `0..=1`.
    pub confidence: f64,
    /// Reference the backend will accept for consistent regeneration.
    pub source_image_url: String,
    /// Reproducibility seed minted for this extraction.
    pub seed: u64,
    /// Opaque backend prompt structure for the reference image.
    pub structured_prompt: StructuredPrompt,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Request for [`crate::Gateway::remix`].
///
/// The anchor fields (`source_image_url`, `seed`, `original_structured_prompt`)
/// must be the extraction-time values, forwarded unmodified. The backend
/// cannot hold the scene steady otherwise.
pub struct RemixRequest {
    /// The baseline DNA the modifications apply to.
    pub base_dna: CinematographyDna,
    /// Leaf-level edit set, dotted path to new value.
    pub modifications: DnaDiff,
    /// Anchor: the original reference image.
    pub source_image_url: String,
    /// Anchor: the extraction seed.
    pub seed: u64,
    /// Anchor: the extraction-time structured prompt, when one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_structured_prompt: Option<StructuredPrompt>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Response of [`crate::Gateway::remix`].
pub struct RemixResponse {
    /// The regenerated image.
    pub image_url: String,
    /// The DNA as the backend confirmed it. Validate before trusting.
    pub modified_dna: CinematographyDna,
    /// Opaque per-generation metadata (model, steps, timing).
    pub generation_metadata: serde_json::Value,
    /// Seed the backend used; expected to echo the request seed.
    pub seed: u64,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Request for [`crate::Gateway::blend`].
pub struct BlendRequest {
    /// First style source.
    pub dna_a: CinematographyDna,
    /// Second style source.
    pub dna_b: CinematographyDna,
    /// Blend weight toward `dna_b`, `0..=1`.
    pub ratio: f64,
    /// Optional subject prompt for the blended image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Response of [`crate::Gateway::blend`].
pub struct BlendResponse {
    /// The generated blend.
    pub image_url: String,
    /// The combined DNA. Validate before trusting.
    pub blended_dna: CinematographyDna,
    /// The ratio actually applied.
    pub ratio: f64,
}

#[derive(Clone, Debug)]
/// Request for [`crate::Gateway::apply_preset`].
pub struct PresetRequest {
    /// Name of the director preset.
    pub preset_name: String,
    /// The image to restyle.
    pub source: ImageSource,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Response of [`crate::Gateway::apply_preset`].
///
/// Carries a complete replacement anchor (image reference + seed); note the
/// backend returns no structured prompt for presets.
pub struct PresetResponse {
    /// The restyled image.
    pub image_url: String,
    /// Name of the preset that was applied.
    pub applied_preset: String,
    /// DNA of the image before styling. Validate before trusting.
    pub original_dna: CinematographyDna,
    /// DNA after styling; becomes the new baseline. Validate before trusting.
    pub styled_dna: CinematographyDna,
    /// Replacement anchor: source image reference.
    pub source_image_url: String,
    /// Replacement anchor: seed.
    pub seed: u64,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// One entry of [`crate::Gateway::list_presets`].
pub struct PresetInfo {
    /// Preset identifier, e.g. `"kubrick"`.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Signature stylistic traits of the preset.
    pub signature_traits: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Export encoding.
pub enum ExportFormat {
    /// Uncompressed TIFF.
    Tiff,
    /// Lossless PNG.
    Png,
    /// JPEG; honors [`ExportRequest::quality`].
    Jpeg,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
/// Request for [`crate::Gateway::export`].
pub struct ExportRequest {
    /// The generated image to download.
    pub image_url: String,
    /// Target encoding.
    pub format: ExportFormat,
    /// JPEG quality, `1..=100`. Ignored for other formats.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<u8>,
}

impl ExportRequest {
    /// Checks the quality range before the request leaves the process.
    pub fn validate(&self) -> CinemorphResult<()> {
        if let Some(q) = self.quality
            && !(1..=100).contains(&q)
        {
            return Err(CinemorphError::validation(format!(
                "export quality must be within 1..=100, got {q}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gateway/protocol.rs"]
mod tests;
