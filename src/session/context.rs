use crate::diff::engine::diff;
use crate::dna::model::CinematographyDna;
use crate::dna::paths::set_leaf;
use crate::dna::value::LeafValue;
use crate::foundation::error::{CinemorphError, CinemorphResult};
use crate::gateway::Gateway;
use crate::gateway::protocol::{
    ExtractRequest, ImageSource, PresetRequest, RemixRequest, RemixResponse, StructuredPrompt,
};

#[derive(Clone, Debug, PartialEq)]
/// The consistency anchor: what the backend needs to keep regenerations
/// visually continuous with one photographic reference.
///
/// Captured exactly once per extraction and forwarded verbatim on every remix
/// of the same session. It is only ever replaced wholesale (by a new
/// extraction or a preset application), never field-by-field.
pub struct ConsistencyAnchor {
    /// The original reference image (URL or data URI).
    pub source_image_url: String,
    /// Reproducibility seed; always positive.
    pub seed: u64,
    /// Backend-owned prompt structure; `None` after preset-apply, which
    /// returns no prompt.
    pub structured_prompt: Option<StructuredPrompt>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Observable session state.
pub enum SessionState {
    /// No extraction yet; only `extract` is permitted.
    Empty,
    /// Baseline, working copy, and anchor are all present.
    Ready,
}

#[derive(Clone, Debug)]
struct Ready {
    baseline: CinematographyDna,
    working: CinematographyDna,
    anchor: ConsistencyAnchor,
}

#[derive(Clone, Debug)]
/// A frozen remix request plus the session generation it was issued under.
///
/// Produced by [`SessionContext::begin_remix`]: the diff inside is the edit
/// set at the moment of issue, and stays that way no matter how the working
/// copy mutates afterwards. [`SessionContext::commit_remix`] refuses the
/// ticket once the session generation has moved on.
pub struct RemixTicket {
    epoch: u64,
    request: RemixRequest,
}

impl RemixTicket {
    /// The request payload to put on the wire.
    pub fn request(&self) -> &RemixRequest {
        &self.request
    }
}

#[derive(Clone, Debug)]
/// What `extract` reports besides the session state it installs.
pub struct ExtractSummary {
    /// Natural-language description of the reference image.
    pub source_description: String,
    /// Backend confidence in the extraction.
    pub confidence: f64,
}

#[derive(Clone, Debug)]
/// What a committed remix reports besides the new baseline.
pub struct RemixOutcome {
    /// The regenerated image.
    pub image_url: String,
    /// Seed the backend used for this generation.
    pub seed: u64,
    /// Opaque per-generation metadata.
    pub generation_metadata: serde_json::Value,
}

#[derive(Clone, Debug)]
/// What a preset application reports besides the replaced session state.
pub struct PresetOutcome {
    /// The restyled image.
    pub image_url: String,
    /// Name of the preset that was applied.
    pub applied_preset: String,
    /// DNA of the image before styling, for before/after display.
    pub original_dna: CinematographyDna,
}

#[derive(Clone, Debug)]
/// Image input for a preset application.
pub enum PresetSource {
    /// A newly supplied image.
    New(ImageSource),
    /// Reuse the current anchor's reference image; requires a Ready session.
    AnchorImage,
}

#[derive(Clone, Debug, Default)]
/// One editing session: the baseline/working DNA pair and the consistency
/// anchor, with the operation state machine that guards them.
///
/// A session is an explicit owned value; create as many independent ones as
/// needed, nothing is shared between them. All backend DNA is validated before it enters
/// the session, every guard is checked before any network call, and no
/// operation partially commits: a failure at any point leaves baseline,
/// working, and anchor exactly as they were.
pub struct SessionContext {
    inner: Option<Ready>,
    epoch: u64,
}

impl SessionContext {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        if self.inner.is_some() {
            SessionState::Ready
        } else {
            SessionState::Empty
        }
    }

    /// The last backend-confirmed DNA, if any.
    pub fn baseline(&self) -> Option<&CinematographyDna> {
        self.inner.as_ref().map(|r| &r.baseline)
    }

    /// The user-editable DNA copy, if any.
    pub fn working(&self) -> Option<&CinematographyDna> {
        self.inner.as_ref().map(|r| &r.working)
    }

    /// The consistency anchor, if any.
    pub fn anchor(&self) -> Option<&ConsistencyAnchor> {
        self.inner.as_ref().map(|r| &r.anchor)
    }

    /// Session generation counter. Bumped whenever the baseline is replaced
    /// or the session cleared; outstanding remix tickets from earlier
    /// generations are rejected at commit.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Extracts DNA from an image and installs baseline, working copy, and a
    /// fresh anchor. On failure the session is unchanged.
    pub async fn extract<G: Gateway>(
        &mut self,
        gateway: &G,
        source: ImageSource,
    ) -> CinemorphResult<ExtractSummary> {
        let response = gateway.extract(ExtractRequest { source }).await?;
        response.dna.validate()?;
        if response.seed == 0 {
            return Err(CinemorphError::validation("extraction seed must be positive"));
        }
        let working = response.dna.clone();
        self.inner = Some(Ready {
            baseline: response.dna,
            working,
            anchor: ConsistencyAnchor {
                source_image_url: response.source_image_url,
                seed: response.seed,
                structured_prompt: Some(response.structured_prompt),
            },
        });
        self.epoch += 1;
        tracing::debug!(epoch = self.epoch, "extraction installed");
        Ok(ExtractSummary {
            source_description: response.source_description,
            confidence: response.confidence,
        })
    }

    /// Edits one leaf of the working copy by dotted path.
    ///
    /// Local-only: numeric values are clamped into range the way an input
    /// widget would, and the baseline is never touched.
    pub fn edit(&mut self, path: &str, value: &LeafValue) -> CinemorphResult<()> {
        let ready = self.ready_mut("edit")?;
        set_leaf(&mut ready.working, path, value)
    }

    /// Reverts the working copy to the baseline. The anchor is untouched.
    pub fn reset(&mut self) -> CinemorphResult<()> {
        let ready = self.ready_mut("reset")?;
        ready.working = ready.baseline.clone();
        Ok(())
    }

    /// Clears the session back to `Empty` from any state.
    pub fn clear(&mut self) {
        self.inner = None;
        self.epoch += 1;
    }

    /// Freezes a remix request: the diff between baseline and working as of
    /// this call, plus the anchor forwarded verbatim.
    ///
    /// Fails with a `Precondition` error on an empty session, before any
    /// network call could be made. An empty diff is legal; the backend
    /// treats it as "maintain the exact same scene". The caller may keep
    /// editing the working copy while the request is in flight; the ticket's
    /// snapshot is unaffected.
    pub fn begin_remix(&self) -> CinemorphResult<RemixTicket> {
        let ready = self.ready("remix")?;
        let modifications = diff(&ready.baseline, &ready.working)?;
        tracing::debug!(
            modifications = modifications.len(),
            epoch = self.epoch,
            "remix ticket issued"
        );
        Ok(RemixTicket {
            epoch: self.epoch,
            request: RemixRequest {
                base_dna: ready.baseline.clone(),
                modifications,
                source_image_url: ready.anchor.source_image_url.clone(),
                seed: ready.anchor.seed,
                original_structured_prompt: ready.anchor.structured_prompt.clone(),
            },
        })
    }

    /// Applies a remix response: the backend-confirmed DNA becomes the new
    /// baseline, the working copy resets to it, and the anchor stays put, so
    /// further remixes keep editing relative to the same reference.
    ///
    /// A ticket issued before the session generation moved on (new
    /// extraction, another committed remix, preset, clear) is stale and is
    /// rejected without touching anything.
    pub fn commit_remix(
        &mut self,
        ticket: &RemixTicket,
        response: RemixResponse,
    ) -> CinemorphResult<RemixOutcome> {
        if ticket.epoch != self.epoch {
            return Err(CinemorphError::precondition(
                "stale remix response: the session has moved on since the request was issued",
            ));
        }
        let anchor_seed = self.ready("remix")?.anchor.seed;
        response.modified_dna.validate()?;
        if response.seed != anchor_seed {
            tracing::warn!(
                anchor_seed,
                response_seed = response.seed,
                "remix response seed differs from anchor seed"
            );
        }
        let ready = self.ready_mut("remix")?;
        ready.baseline = response.modified_dna;
        ready.working = ready.baseline.clone();
        self.epoch += 1;
        Ok(RemixOutcome {
            image_url: response.image_url,
            seed: response.seed,
            generation_metadata: response.generation_metadata,
        })
    }

    /// One-shot remix: freeze the request, send it, commit the response.
    ///
    /// The session is borrowed for the whole round trip, so nothing can move
    /// underneath; callers that want to keep editing while a request is in
    /// flight use [`begin_remix`](Self::begin_remix) /
    /// [`commit_remix`](Self::commit_remix) directly. On any failure the
    /// session is unchanged.
    pub async fn remix<G: Gateway>(&mut self, gateway: &G) -> CinemorphResult<RemixOutcome> {
        let ticket = self.begin_remix()?;
        let response = gateway.remix(ticket.request.clone()).await?;
        self.commit_remix(&ticket, response)
    }

    /// Applies a director preset to an image and replaces the session
    /// wholesale: new baseline (the styled DNA), new anchor (new reference
    /// image and seed, no structured prompt). On failure the session is
    /// unchanged.
    pub async fn apply_preset<G: Gateway>(
        &mut self,
        gateway: &G,
        preset_name: &str,
        source: PresetSource,
    ) -> CinemorphResult<PresetOutcome> {
        let source = match source {
            PresetSource::New(source) => source,
            PresetSource::AnchorImage => {
                let ready = self.ready("preset-apply")?;
                ImageSource::Url(ready.anchor.source_image_url.clone())
            }
        };
        let response = gateway
            .apply_preset(PresetRequest {
                preset_name: preset_name.to_string(),
                source,
            })
            .await?;
        response.styled_dna.validate()?;
        response.original_dna.validate()?;
        if response.seed == 0 {
            return Err(CinemorphError::validation("preset seed must be positive"));
        }
        let working = response.styled_dna.clone();
        self.inner = Some(Ready {
            baseline: response.styled_dna,
            working,
            anchor: ConsistencyAnchor {
                source_image_url: response.source_image_url,
                seed: response.seed,
                structured_prompt: None,
            },
        });
        self.epoch += 1;
        Ok(PresetOutcome {
            image_url: response.image_url,
            applied_preset: response.applied_preset,
            original_dna: response.original_dna,
        })
    }

    fn ready(&self, operation: &str) -> CinemorphResult<&Ready> {
        self.inner.as_ref().ok_or_else(|| {
            CinemorphError::precondition(format!("{operation} requires an extracted session"))
        })
    }

    fn ready_mut(&mut self, operation: &str) -> CinemorphResult<&mut Ready> {
        self.inner.as_mut().ok_or_else(|| {
            CinemorphError::precondition(format!("{operation} requires an extracted session"))
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/context.rs"]
mod tests;
