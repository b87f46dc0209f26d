use crate::foundation::error::{CinemorphError, CinemorphResult};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
/// A complete cinematographic description of an image.
///
/// A DNA instance is a pure data model: a fixed record of five categories,
/// each a fixed record of typed leaves. It is always complete: there is no
/// notion of a partially populated DNA, and deserialization rejects unknown
/// or missing categories and leaves outright.
///
/// Enum leaves are valid by construction; numeric leaves carry declared
/// ranges that [`CinematographyDna::validate`] enforces. Any DNA arriving
/// from the backend must pass through [`CinematographyDna::from_value`]
/// before it is trusted locally.
pub struct CinematographyDna {
    /// Camera placement and optics.
    pub camera: CameraParams,
    /// Light sources and their quality.
    pub lighting: LightingParams,
    /// Palette and grading.
    pub color: ColorParams,
    /// Frame geometry.
    pub composition: CompositionParams,
    /// Environmental condition of the scene.
    pub atmosphere: AtmosphereParams,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
/// Camera placement and optics.
pub struct CameraParams {
    /// Vertical camera angle relative to the subject.
    pub angle: CameraAngle,
    /// Field-of-view class.
    pub fov: FieldOfView,
    /// Lens focal length in millimeters, `14..=200`.
    pub lens_mm: u32,
    /// Depth-of-field class.
    pub depth_of_field: DepthOfField,
    /// Shot framing distance.
    pub shot_type: ShotType,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
/// Light sources and their quality.
pub struct LightingParams {
    /// Dominant light direction.
    pub direction: LightDirection,
    /// Overall light intensity, `0..=1`.
    pub intensity: f64,
    /// Color temperature in Kelvin, `2000..=10000`.
    pub color_temp: u32,
    /// Lighting style.
    pub style: LightingStyle,
    /// Apparent time of day.
    pub time_of_day: TimeOfDay,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
/// Palette and grading.
pub struct ColorParams {
    /// Ordered color tokens. Order is display-significant; equality is
    /// full-sequence equality. Never empty in a valid DNA.
    pub palette: Vec<String>,
    /// Saturation, `0..=1`.
    pub saturation: f64,
    /// Contrast, `0..=1`.
    pub contrast: f64,
    /// Color mood.
    pub mood: ColorMood,
    /// Color grade.
    pub grade: ColorGrade,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
/// Frame geometry.
pub struct CompositionParams {
    /// Subject framing.
    pub framing: Framing,
    /// Whether the frame follows the rule of thirds.
    pub rule_of_thirds: bool,
    /// Degree of symmetry, `0..=1`.
    pub symmetry: f64,
    /// Whether leading lines are present.
    pub leading_lines: bool,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
/// Environmental condition of the scene.
pub struct AtmosphereParams {
    /// Weather condition.
    pub weather: Weather,
    /// Airborne particles.
    pub particles: Particles,
    /// Haze density, `0..=1`.
    pub haze: f64,
    /// Environment class.
    pub environment: Environment,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Vertical camera angle relative to the subject.
pub enum CameraAngle {
    /// Camera at subject eye height.
    EyeLevel,
    /// Camera below the subject, looking up.
    LowAngle,
    /// Camera above the subject, looking down.
    HighAngle,
    /// Tilted horizon.
    DutchAngle,
    /// Directly overhead.
    BirdsEye,
    /// Directly below.
    WormsEye,
}

impl CameraAngle {
    /// Wire token for this variant, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EyeLevel => "eye_level",
            Self::LowAngle => "low_angle",
            Self::HighAngle => "high_angle",
            Self::DutchAngle => "dutch_angle",
            Self::BirdsEye => "birds_eye",
            Self::WormsEye => "worms_eye",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Field-of-view class.
pub enum FieldOfView {
    /// Wider than wide.
    UltraWide,
    /// Wide field of view.
    Wide,
    /// Standard field of view.
    Normal,
    /// Narrow field of view.
    Telephoto,
}

impl FieldOfView {
    /// Wire token for this variant, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UltraWide => "ultra_wide",
            Self::Wide => "wide",
            Self::Normal => "normal",
            Self::Telephoto => "telephoto",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Depth-of-field class.
pub enum DepthOfField {
    /// Thin focus plane.
    Shallow,
    /// Moderate focus depth.
    Medium,
    /// Everything in focus.
    Deep,
}

impl DepthOfField {
    /// Wire token for this variant, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shallow => "shallow",
            Self::Medium => "medium",
            Self::Deep => "deep",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Shot framing distance.
pub enum ShotType {
    /// Detail shot.
    ExtremeCloseUp,
    /// Face or detail framing.
    CloseUp,
    /// Waist-up framing.
    Medium,
    /// Full-body framing.
    Full,
    /// Subject small in frame.
    Wide,
    /// Landscape-scale framing.
    ExtremeWide,
}

impl ShotType {
    /// Wire token for this variant, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExtremeCloseUp => "extreme_close_up",
            Self::CloseUp => "close_up",
            Self::Medium => "medium",
            Self::Full => "full",
            Self::Wide => "wide",
            Self::ExtremeWide => "extreme_wide",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Dominant light direction.
pub enum LightDirection {
    /// From the camera toward the subject.
    Front,
    /// From behind the subject.
    Back,
    /// From the side.
    Side,
    /// From above.
    Top,
    /// From below.
    Bottom,
    /// Edge light from behind.
    Rim,
    /// Classic key/fill/back setup.
    ThreePoint,
}

impl LightDirection {
    /// Wire token for this variant, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
            Self::Side => "side",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Rim => "rim",
            Self::ThreePoint => "three_point",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Lighting style.
pub enum LightingStyle {
    /// Unstyled available light.
    Natural,
    /// High-contrast directed light.
    Dramatic,
    /// Diffused light.
    Soft,
    /// Undiffused light with crisp shadows.
    Hard,
    /// Extreme light/dark modeling.
    Chiaroscuro,
    /// Even, shadowless light.
    Flat,
}

impl LightingStyle {
    /// Wire token for this variant, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Natural => "natural",
            Self::Dramatic => "dramatic",
            Self::Soft => "soft",
            Self::Hard => "hard",
            Self::Chiaroscuro => "chiaroscuro",
            Self::Flat => "flat",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Apparent time of day.
pub enum TimeOfDay {
    /// Full daylight.
    Day,
    /// Shortly after sunrise or before sunset.
    GoldenHour,
    /// Twilight blue cast.
    BlueHour,
    /// Night.
    Night,
    /// Between sunset and dark.
    Twilight,
}

impl TimeOfDay {
    /// Wire token for this variant, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::GoldenHour => "golden_hour",
            Self::BlueHour => "blue_hour",
            Self::Night => "night",
            Self::Twilight => "twilight",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Color mood.
pub enum ColorMood {
    /// No dominant cast.
    Neutral,
    /// Warm cast.
    Warm,
    /// Cool cast.
    Cool,
    /// Saturated and lively.
    Vibrant,
    /// Subdued tones.
    Muted,
    /// Drained of color.
    Desaturated,
}

impl ColorMood {
    /// Wire token for this variant, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Warm => "warm",
            Self::Cool => "cool",
            Self::Vibrant => "vibrant",
            Self::Muted => "muted",
            Self::Desaturated => "desaturated",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Color grade.
pub enum ColorGrade {
    /// Ungraded look.
    Natural,
    /// Film-style grade.
    Cinematic,
    /// Faded period look.
    Vintage,
    /// Silver-retention look.
    BleachBypass,
    /// Complementary teal/orange grade.
    TealOrange,
    /// Black and white.
    Monochrome,
}

impl ColorGrade {
    /// Wire token for this variant, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Natural => "natural",
            Self::Cinematic => "cinematic",
            Self::Vintage => "vintage",
            Self::BleachBypass => "bleach_bypass",
            Self::TealOrange => "teal_orange",
            Self::Monochrome => "monochrome",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Subject framing.
pub enum Framing {
    /// Subject centered in frame.
    Centered,
    /// Subject displaced from center.
    OffCenter,
    /// Mirrored composition.
    Symmetrical,
    /// Little room around the subject.
    Tight,
    /// Generous room around the subject.
    Loose,
    /// Subject surrounded by empty space.
    NegativeSpace,
}

impl Framing {
    /// Wire token for this variant, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Centered => "centered",
            Self::OffCenter => "off_center",
            Self::Symmetrical => "symmetrical",
            Self::Tight => "tight",
            Self::Loose => "loose",
            Self::NegativeSpace => "negative_space",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Weather condition.
pub enum Weather {
    /// Clear sky.
    Clear,
    /// Overcast.
    Cloudy,
    /// Fog.
    Foggy,
    /// Rain.
    Rainy,
    /// Snow.
    Snowy,
    /// Storm.
    Stormy,
}

impl Weather {
    /// Wire token for this variant, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Cloudy => "cloudy",
            Self::Foggy => "foggy",
            Self::Rainy => "rainy",
            Self::Snowy => "snowy",
            Self::Stormy => "stormy",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Airborne particles.
pub enum Particles {
    /// Clean air.
    None,
    /// Dust motes.
    Dust,
    /// Smoke.
    Smoke,
    /// Falling rain.
    Rain,
    /// Falling snow.
    Snow,
    /// Embers or sparks.
    Sparks,
}

impl Particles {
    /// Wire token for this variant, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Dust => "dust",
            Self::Smoke => "smoke",
            Self::Rain => "rain",
            Self::Snow => "snow",
            Self::Sparks => "sparks",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Environment class.
pub enum Environment {
    /// Indoors.
    Interior,
    /// Outdoors.
    Exterior,
    /// City setting.
    Urban,
    /// Countryside setting.
    Rural,
    /// Industrial setting.
    Industrial,
    /// Natural landscape.
    Natural,
}

impl Environment {
    /// Wire token for this variant, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Interior => "interior",
            Self::Exterior => "exterior",
            Self::Urban => "urban",
            Self::Rural => "rural",
            Self::Industrial => "industrial",
            Self::Natural => "natural",
        }
    }
}

impl CinematographyDna {
    /// Checks every numeric leaf against its declared range and the palette
    /// against non-emptiness.
    ///
    /// Enum leaves cannot hold out-of-set values once constructed, so the
    /// only things left to check are ranges. `NaN` fails every range check.
    pub fn validate(&self) -> CinemorphResult<()> {
        range_int("camera.lens_mm", i64::from(self.camera.lens_mm), 14, 200)?;
        range_unit("lighting.intensity", self.lighting.intensity)?;
        range_int(
            "lighting.color_temp",
            i64::from(self.lighting.color_temp),
            2000,
            10000,
        )?;
        if self.color.palette.is_empty() {
            return Err(CinemorphError::validation("color.palette must not be empty"));
        }
        if self.color.palette.iter().any(|t| t.trim().is_empty()) {
            return Err(CinemorphError::validation(
                "color.palette tokens must not be blank",
            ));
        }
        range_unit("color.saturation", self.color.saturation)?;
        range_unit("color.contrast", self.color.contrast)?;
        range_unit("composition.symmetry", self.composition.symmetry)?;
        range_unit("atmosphere.haze", self.atmosphere.haze)?;
        Ok(())
    }

    /// Deserializes and validates a DNA from an untrusted JSON value.
    ///
    /// This is the sanitizer applied to every DNA crossing the gateway
    /// boundary: unknown categories or leaves, missing leaves, mistyped
    /// values, and out-of-range numerics are all rejected before the payload
    /// can enter a session.
    pub fn from_value(value: serde_json::Value) -> CinemorphResult<Self> {
        let dna: Self = serde_json::from_value(value)
            .map_err(|e| CinemorphError::validation(format!("malformed DNA payload: {e}")))?;
        dna.validate()?;
        Ok(dna)
    }
}

fn range_int(path: &str, value: i64, min: i64, max: i64) -> CinemorphResult<()> {
    if value < min || value > max {
        return Err(CinemorphError::validation(format!(
            "{path} must be within {min}..={max}, got {value}"
        )));
    }
    Ok(())
}

fn range_unit(path: &str, value: f64) -> CinemorphResult<()> {
    // NaN is not contained in any range, so it fails here too.
    if (0.0..=1.0).contains(&value) {
        return Ok(());
    }
    Err(CinemorphError::validation(format!(
        "{path} must be within 0..=1, got {value}"
    )))
}

#[cfg(test)]
#[path = "../../tests/unit/dna/model.rs"]
mod tests;
