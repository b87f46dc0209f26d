pub mod http;
pub mod protocol;

use crate::foundation::error::CinemorphResult;
use crate::gateway::protocol::{
    BlendRequest, BlendResponse, ExportRequest, ExtractRequest, ExtractResponse, PresetInfo,
    PresetRequest, PresetResponse, RemixRequest, RemixResponse,
};

/// The generative backend, as seen from a session.
///
/// One method per logical backend call, each with its own request/response
/// pair so handlers match statically on exactly the fields that call returns.
/// [`http::HttpGateway`] is the production implementation; tests substitute
/// hand-rolled impls with canned responses.
///
/// Implementations perform no retries: a failure is returned as-is and the
/// caller decides what to surface.
#[allow(async_fn_in_trait)]
pub trait Gateway {
    /// Derives a DNA and a fresh consistency anchor from an image.
    async fn extract(&self, request: ExtractRequest) -> CinemorphResult<ExtractResponse>;

    /// Regenerates the anchored image with a set of leaf modifications.
    async fn remix(&self, request: RemixRequest) -> CinemorphResult<RemixResponse>;

    /// Combines two DNA instances at a ratio chosen by the caller.
    async fn blend(&self, request: BlendRequest) -> CinemorphResult<BlendResponse>;

    /// Restyles an image with a named director preset.
    async fn apply_preset(&self, request: PresetRequest) -> CinemorphResult<PresetResponse>;

    /// Lists the director presets the backend offers.
    async fn list_presets(&self) -> CinemorphResult<Vec<PresetInfo>>;

    /// Downloads a generated image re-encoded in the requested format.
    async fn export(&self, request: ExportRequest) -> CinemorphResult<Vec<u8>>;
}
