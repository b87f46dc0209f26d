use super::*;
use crate::dna::model::{
    AtmosphereParams, CameraAngle, CameraParams, ColorGrade, ColorMood, ColorParams,
    CompositionParams, DepthOfField, Environment, FieldOfView, Framing, LightDirection,
    LightingParams, LightingStyle, Particles, ShotType, TimeOfDay, Weather,
};
use crate::gateway::protocol::{
    BlendRequest, BlendResponse, ExportRequest, ExtractResponse, PresetInfo, PresetResponse,
};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

fn reference_dna() -> CinematographyDna {
    CinematographyDna {
        camera: CameraParams {
            angle: CameraAngle::EyeLevel,
            fov: FieldOfView::Normal,
            lens_mm: 50,
            depth_of_field: DepthOfField::Medium,
            shot_type: ShotType::Medium,
        },
        lighting: LightingParams {
            direction: LightDirection::Front,
            intensity: 0.3,
            color_temp: 5500,
            style: LightingStyle::Natural,
            time_of_day: TimeOfDay::Day,
        },
        color: ColorParams {
            palette: vec!["neutral".to_string()],
            saturation: 0.5,
            contrast: 0.5,
            mood: ColorMood::Neutral,
            grade: ColorGrade::Natural,
        },
        composition: CompositionParams {
            framing: Framing::Centered,
            rule_of_thirds: true,
            symmetry: 0.5,
            leading_lines: false,
        },
        atmosphere: AtmosphereParams {
            weather: Weather::Clear,
            particles: Particles::None,
            haze: 0.0,
            environment: Environment::Interior,
        },
    }
}

const REF_URL: &str = "https://img.example/ref.jpg";
const REF_SEED: u64 = 424_242;

fn extract_response(dna: &CinematographyDna) -> ExtractResponse {
    ExtractResponse {
        dna: dna.clone(),
        source_description: "a quiet interior scene".to_string(),
        confidence: 0.85,
        source_image_url: REF_URL.to_string(),
        seed: REF_SEED,
        structured_prompt: StructuredPrompt::new(serde_json::json!({
            "short_description": "quiet interior",
            "lighting": { "conditions": "natural, day" }
        })),
    }
}

fn remix_response(dna: &CinematographyDna, seed: u64) -> RemixResponse {
    RemixResponse {
        image_url: "https://img.example/remix-1.jpg".to_string(),
        modified_dna: dna.clone(),
        generation_metadata: serde_json::json!({ "model": "fibo", "steps": 28 }),
        seed,
    }
}

fn preset_response(dna: &CinematographyDna) -> PresetResponse {
    PresetResponse {
        image_url: "https://img.example/preset-1.jpg".to_string(),
        applied_preset: "noir".to_string(),
        original_dna: reference_dna(),
        styled_dna: dna.clone(),
        source_image_url: "https://img.example/preset-src.jpg".to_string(),
        seed: 777_001,
    }
}

#[derive(Default)]
struct StubGateway {
    extract_result: Option<ExtractResponse>,
    remix_result: Option<RemixResponse>,
    preset_result: Option<PresetResponse>,
    remix_requests: Mutex<Vec<RemixRequest>>,
    preset_requests: Mutex<Vec<PresetRequest>>,
    calls: AtomicUsize,
}

impl StubGateway {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Gateway for StubGateway {
    async fn extract(&self, _request: ExtractRequest) -> CinemorphResult<ExtractResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.extract_result
            .clone()
            .ok_or_else(|| CinemorphError::backend(502, "extract failed"))
    }

    async fn remix(&self, request: RemixRequest) -> CinemorphResult<RemixResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.remix_requests.lock().unwrap().push(request);
        self.remix_result
            .clone()
            .ok_or_else(|| CinemorphError::backend(500, "remix failed"))
    }

    async fn blend(&self, _request: BlendRequest) -> CinemorphResult<BlendResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(CinemorphError::backend(500, "blend not scripted"))
    }

    async fn apply_preset(&self, request: PresetRequest) -> CinemorphResult<PresetResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.preset_requests.lock().unwrap().push(request);
        self.preset_result
            .clone()
            .ok_or_else(|| CinemorphError::backend(500, "preset failed"))
    }

    async fn list_presets(&self) -> CinemorphResult<Vec<PresetInfo>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![])
    }

    async fn export(&self, _request: ExportRequest) -> CinemorphResult<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(CinemorphError::backend(500, "export not scripted"))
    }
}

async fn ready_session(gateway: &StubGateway) -> SessionContext {
    let mut session = SessionContext::new();
    session
        .extract(gateway, ImageSource::Url(REF_URL.to_string()))
        .await
        .unwrap();
    session
}

#[test]
fn new_session_is_empty() {
    let session = SessionContext::new();
    assert_eq!(session.state(), SessionState::Empty);
    assert!(session.baseline().is_none());
    assert!(session.working().is_none());
    assert!(session.anchor().is_none());
}

#[test]
fn operations_on_empty_session_are_precondition_errors() {
    let mut session = SessionContext::new();
    assert!(matches!(
        session.edit("lighting.intensity", &LeafValue::Float(0.8)),
        Err(CinemorphError::Precondition(_))
    ));
    assert!(matches!(session.reset(), Err(CinemorphError::Precondition(_))));
    assert!(matches!(
        session.begin_remix(),
        Err(CinemorphError::Precondition(_))
    ));
}

#[tokio::test]
async fn remix_on_empty_session_makes_no_network_call() {
    let gateway = StubGateway::default();
    let mut session = SessionContext::new();
    let err = session.remix(&gateway).await.unwrap_err();
    assert!(matches!(err, CinemorphError::Precondition(_)));
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn extract_installs_baseline_working_and_anchor() {
    let gateway = StubGateway {
        extract_result: Some(extract_response(&reference_dna())),
        ..StubGateway::default()
    };
    let mut session = SessionContext::new();
    let summary = session
        .extract(&gateway, ImageSource::Url(REF_URL.to_string()))
        .await
        .unwrap();

    assert_eq!(session.state(), SessionState::Ready);
    assert_eq!(session.baseline(), Some(&reference_dna()));
    assert_eq!(session.working(), session.baseline());
    let anchor = session.anchor().unwrap();
    assert_eq!(anchor.source_image_url, REF_URL);
    assert_eq!(anchor.seed, REF_SEED);
    assert!(anchor.structured_prompt.is_some());
    assert_eq!(summary.source_description, "a quiet interior scene");
}

#[tokio::test]
async fn extract_failure_leaves_session_untouched() {
    let gateway = StubGateway::default();
    let mut session = SessionContext::new();
    let err = session
        .extract(&gateway, ImageSource::Url(REF_URL.to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, CinemorphError::Backend { .. }));
    assert_eq!(session.state(), SessionState::Empty);
}

#[tokio::test]
async fn extract_rejects_malformed_dna_before_it_enters_the_session() {
    let mut bad = reference_dna();
    bad.camera.lens_mm = 999;
    let gateway = StubGateway {
        extract_result: Some(extract_response(&bad)),
        ..StubGateway::default()
    };
    let mut session = SessionContext::new();
    let err = session
        .extract(&gateway, ImageSource::Url(REF_URL.to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, CinemorphError::Validation(_)));
    assert_eq!(session.state(), SessionState::Empty);
}

#[tokio::test]
async fn extract_rejects_zero_seed() {
    let mut response = extract_response(&reference_dna());
    response.seed = 0;
    let gateway = StubGateway {
        extract_result: Some(response),
        ..StubGateway::default()
    };
    let mut session = SessionContext::new();
    assert!(
        session
            .extract(&gateway, ImageSource::Url(REF_URL.to_string()))
            .await
            .is_err()
    );
    assert_eq!(session.state(), SessionState::Empty);
}

#[tokio::test]
async fn edit_mutates_working_only() {
    let gateway = StubGateway {
        extract_result: Some(extract_response(&reference_dna())),
        ..StubGateway::default()
    };
    let mut session = ready_session(&gateway).await;

    session
        .edit("lighting.intensity", &LeafValue::Float(0.8))
        .unwrap();
    assert_eq!(session.baseline().unwrap().lighting.intensity, 0.3);
    assert_eq!(session.working().unwrap().lighting.intensity, 0.8);
}

#[tokio::test]
async fn reset_reverts_working_to_baseline() {
    let gateway = StubGateway {
        extract_result: Some(extract_response(&reference_dna())),
        ..StubGateway::default()
    };
    let mut session = ready_session(&gateway).await;

    session.edit("color.mood", &LeafValue::from("warm")).unwrap();
    session
        .edit("atmosphere.weather", &LeafValue::from("stormy"))
        .unwrap();
    session.reset().unwrap();

    assert_eq!(session.working(), session.baseline());
    let d = crate::diff::engine::diff(
        session.baseline().unwrap(),
        session.working().unwrap(),
    )
    .unwrap();
    assert!(d.is_empty());
    // The anchor survives a reset.
    assert_eq!(session.anchor().unwrap().seed, REF_SEED);
}

#[tokio::test]
async fn anchor_is_forwarded_verbatim_no_matter_how_many_edits() {
    let gateway = StubGateway {
        extract_result: Some(extract_response(&reference_dna())),
        ..StubGateway::default()
    };
    let mut session = ready_session(&gateway).await;
    let anchor = session.anchor().unwrap().clone();

    for (path, value) in [
        ("lighting.intensity", LeafValue::Float(0.9)),
        ("color.mood", LeafValue::from("cool")),
        ("camera.lens_mm", LeafValue::Int(135)),
        ("atmosphere.haze", LeafValue::Float(0.4)),
        ("lighting.intensity", LeafValue::Float(0.6)),
        ("composition.rule_of_thirds", LeafValue::Bool(false)),
    ] {
        session.edit(path, &value).unwrap();
    }

    let ticket = session.begin_remix().unwrap();
    let request = ticket.request();
    assert_eq!(request.source_image_url, anchor.source_image_url);
    assert_eq!(request.seed, anchor.seed);
    assert_eq!(request.original_structured_prompt, anchor.structured_prompt);
    assert_eq!(request.base_dna, reference_dna());
}

#[tokio::test]
async fn remix_replaces_baseline_and_keeps_anchor() {
    let mut styled = reference_dna();
    styled.lighting.intensity = 0.8;
    let gateway = StubGateway {
        extract_result: Some(extract_response(&reference_dna())),
        remix_result: Some(remix_response(&styled, REF_SEED)),
        ..StubGateway::default()
    };
    let mut session = ready_session(&gateway).await;
    let anchor_before = session.anchor().unwrap().clone();
    let epoch_before = session.epoch();

    session
        .edit("lighting.intensity", &LeafValue::Float(0.8))
        .unwrap();
    let outcome = session.remix(&gateway).await.unwrap();

    assert_eq!(outcome.image_url, "https://img.example/remix-1.jpg");
    assert_eq!(session.baseline(), Some(&styled));
    assert_eq!(session.working(), Some(&styled));
    assert_eq!(session.anchor(), Some(&anchor_before));
    assert!(session.epoch() > epoch_before);

    // The wire request carried the diff and the untouched anchor.
    let requests = gateway.remix_requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].modifications.len(), 1);
    assert_eq!(requests[0].seed, anchor_before.seed);
    assert_eq!(requests[0].source_image_url, anchor_before.source_image_url);
}

#[tokio::test]
async fn remix_failure_rolls_back_completely() {
    let gateway = StubGateway {
        extract_result: Some(extract_response(&reference_dna())),
        ..StubGateway::default() // no remix_result: the call fails
    };
    let mut session = ready_session(&gateway).await;
    session
        .edit("lighting.intensity", &LeafValue::Float(0.8))
        .unwrap();

    let baseline_before = session.baseline().unwrap().clone();
    let working_before = session.working().unwrap().clone();
    let anchor_before = session.anchor().unwrap().clone();
    let epoch_before = session.epoch();

    let err = session.remix(&gateway).await.unwrap_err();
    assert!(matches!(err, CinemorphError::Backend { .. }));
    assert_eq!(session.baseline(), Some(&baseline_before));
    assert_eq!(session.working(), Some(&working_before));
    assert_eq!(session.anchor(), Some(&anchor_before));
    assert_eq!(session.epoch(), epoch_before);
}

#[tokio::test]
async fn remix_rejects_malformed_response_dna() {
    let mut bad = reference_dna();
    bad.lighting.intensity = 7.0;
    let gateway = StubGateway {
        extract_result: Some(extract_response(&reference_dna())),
        remix_result: Some(remix_response(&bad, REF_SEED)),
        ..StubGateway::default()
    };
    let mut session = ready_session(&gateway).await;
    let baseline_before = session.baseline().unwrap().clone();

    let err = session.remix(&gateway).await.unwrap_err();
    assert!(matches!(err, CinemorphError::Validation(_)));
    assert_eq!(session.baseline(), Some(&baseline_before));
}

#[tokio::test]
async fn ticket_snapshot_survives_later_edits() {
    let gateway = StubGateway {
        extract_result: Some(extract_response(&reference_dna())),
        ..StubGateway::default()
    };
    let mut session = ready_session(&gateway).await;

    session
        .edit("lighting.intensity", &LeafValue::Float(0.8))
        .unwrap();
    let ticket = session.begin_remix().unwrap();
    assert_eq!(ticket.request().modifications.len(), 1);

    // The working copy keeps moving while the request is notionally in
    // flight; the frozen payload must not.
    session.edit("color.mood", &LeafValue::from("warm")).unwrap();
    session
        .edit("atmosphere.particles", &LeafValue::from("smoke"))
        .unwrap();
    assert_eq!(ticket.request().modifications.len(), 1);
    assert!(ticket.request().modifications.contains_key("lighting.intensity"));

    let mut styled = reference_dna();
    styled.lighting.intensity = 0.8;
    let outcome = session
        .commit_remix(&ticket, remix_response(&styled, REF_SEED))
        .unwrap();
    assert_eq!(outcome.seed, REF_SEED);
    assert_eq!(session.baseline(), Some(&styled));
    // Working resets to the confirmed baseline.
    assert_eq!(session.working(), Some(&styled));
}

#[tokio::test]
async fn stale_ticket_is_rejected_after_session_moves_on() {
    let gateway = StubGateway {
        extract_result: Some(extract_response(&reference_dna())),
        ..StubGateway::default()
    };
    let mut session = ready_session(&gateway).await;
    let ticket = session.begin_remix().unwrap();

    // A second extraction replaces the whole session.
    session
        .extract(&gateway, ImageSource::Url(REF_URL.to_string()))
        .await
        .unwrap();
    let baseline_after = session.baseline().unwrap().clone();

    let err = session
        .commit_remix(&ticket, remix_response(&reference_dna(), REF_SEED))
        .unwrap_err();
    assert!(matches!(err, CinemorphError::Precondition(_)));
    assert_eq!(session.baseline(), Some(&baseline_after));
}

#[tokio::test]
async fn committing_the_same_ticket_twice_is_stale() {
    let gateway = StubGateway {
        extract_result: Some(extract_response(&reference_dna())),
        ..StubGateway::default()
    };
    let mut session = ready_session(&gateway).await;
    let ticket = session.begin_remix().unwrap();

    session
        .commit_remix(&ticket, remix_response(&reference_dna(), REF_SEED))
        .unwrap();
    let err = session
        .commit_remix(&ticket, remix_response(&reference_dna(), REF_SEED))
        .unwrap_err();
    assert!(matches!(err, CinemorphError::Precondition(_)));
}

#[tokio::test]
async fn seed_mismatch_in_remix_response_is_informational() {
    let gateway = StubGateway {
        extract_result: Some(extract_response(&reference_dna())),
        remix_result: Some(remix_response(&reference_dna(), REF_SEED + 1)),
        ..StubGateway::default()
    };
    let mut session = ready_session(&gateway).await;

    let outcome = session.remix(&gateway).await.unwrap();
    assert_eq!(outcome.seed, REF_SEED + 1);
    // The anchor keeps the extraction seed.
    assert_eq!(session.anchor().unwrap().seed, REF_SEED);
}

#[tokio::test]
async fn preset_replaces_anchor_wholesale() {
    let mut styled = reference_dna();
    styled.color.grade = ColorGrade::Monochrome;
    let gateway = StubGateway {
        extract_result: Some(extract_response(&reference_dna())),
        preset_result: Some(preset_response(&styled)),
        ..StubGateway::default()
    };
    let mut session = ready_session(&gateway).await;
    let old_anchor = session.anchor().unwrap().clone();
    let ticket = session.begin_remix().unwrap();

    let outcome = session
        .apply_preset(
            &gateway,
            "noir",
            PresetSource::New(ImageSource::Url("https://img.example/new.jpg".to_string())),
        )
        .await
        .unwrap();

    assert_eq!(outcome.applied_preset, "noir");
    assert_eq!(session.baseline(), Some(&styled));
    assert_eq!(session.working(), Some(&styled));
    let anchor = session.anchor().unwrap();
    assert_ne!(anchor, &old_anchor);
    assert_eq!(anchor.source_image_url, "https://img.example/preset-src.jpg");
    assert_eq!(anchor.seed, 777_001);
    assert!(anchor.structured_prompt.is_none());

    // Remix tickets from before the preset are dead.
    assert!(
        session
            .commit_remix(&ticket, remix_response(&reference_dna(), REF_SEED))
            .is_err()
    );
}

#[tokio::test]
async fn preset_can_reuse_the_anchor_image() {
    let gateway = StubGateway {
        extract_result: Some(extract_response(&reference_dna())),
        preset_result: Some(preset_response(&reference_dna())),
        ..StubGateway::default()
    };
    let mut session = ready_session(&gateway).await;

    session
        .apply_preset(&gateway, "noir", PresetSource::AnchorImage)
        .await
        .unwrap();

    let requests = gateway.preset_requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].preset_name, "noir");
    assert_eq!(
        requests[0].source,
        ImageSource::Url(REF_URL.to_string())
    );
}

#[tokio::test]
async fn preset_with_anchor_image_requires_a_ready_session() {
    let gateway = StubGateway::default();
    let mut session = SessionContext::new();
    let err = session
        .apply_preset(&gateway, "noir", PresetSource::AnchorImage)
        .await
        .unwrap_err();
    assert!(matches!(err, CinemorphError::Precondition(_)));
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn clear_returns_to_empty_from_any_state() {
    let gateway = StubGateway {
        extract_result: Some(extract_response(&reference_dna())),
        ..StubGateway::default()
    };
    let mut session = ready_session(&gateway).await;
    session.clear();
    assert_eq!(session.state(), SessionState::Empty);
    assert!(session.anchor().is_none());

    // Clearing an already empty session is fine.
    let mut empty = SessionContext::new();
    empty.clear();
    assert_eq!(empty.state(), SessionState::Empty);
}
