use crate::dna::model::CinematographyDna;
use crate::dna::value::LeafValue;
use crate::foundation::error::{CinemorphError, CinemorphResult};

/// Every addressable leaf, as `category.leaf` dotted paths.
///
/// This is the complete edit surface: diff keys and [`set_leaf`] paths are
/// both drawn from this set.
pub const LEAF_PATHS: &[&str] = &[
    "camera.angle",
    "camera.fov",
    "camera.lens_mm",
    "camera.depth_of_field",
    "camera.shot_type",
    "lighting.direction",
    "lighting.intensity",
    "lighting.color_temp",
    "lighting.style",
    "lighting.time_of_day",
    "color.palette",
    "color.saturation",
    "color.contrast",
    "color.mood",
    "color.grade",
    "composition.framing",
    "composition.rule_of_thirds",
    "composition.symmetry",
    "composition.leading_lines",
    "atmosphere.weather",
    "atmosphere.particles",
    "atmosphere.haze",
    "atmosphere.environment",
];

/// Writes one leaf by dotted path.
///
/// Numeric leaves are clamped into their declared range, matching what an
/// input widget would do; enum leaves accept their snake_case wire token.
/// An unknown path, an unknown token, or a value of the wrong shape is a
/// `Validation` error and leaves the DNA untouched.
pub fn set_leaf(
    dna: &mut CinematographyDna,
    path: &str,
    value: &LeafValue,
) -> CinemorphResult<()> {
    match path {
        "camera.angle" => dna.camera.angle = expect_token(path, value)?,
        "camera.fov" => dna.camera.fov = expect_token(path, value)?,
        "camera.lens_mm" => dna.camera.lens_mm = expect_int(path, value, 14, 200)?,
        "camera.depth_of_field" => dna.camera.depth_of_field = expect_token(path, value)?,
        "camera.shot_type" => dna.camera.shot_type = expect_token(path, value)?,
        "lighting.direction" => dna.lighting.direction = expect_token(path, value)?,
        "lighting.intensity" => dna.lighting.intensity = expect_unit(path, value)?,
        "lighting.color_temp" => dna.lighting.color_temp = expect_int(path, value, 2000, 10000)?,
        "lighting.style" => dna.lighting.style = expect_token(path, value)?,
        "lighting.time_of_day" => dna.lighting.time_of_day = expect_token(path, value)?,
        "color.palette" => dna.color.palette = expect_list(path, value)?,
        "color.saturation" => dna.color.saturation = expect_unit(path, value)?,
        "color.contrast" => dna.color.contrast = expect_unit(path, value)?,
        "color.mood" => dna.color.mood = expect_token(path, value)?,
        "color.grade" => dna.color.grade = expect_token(path, value)?,
        "composition.framing" => dna.composition.framing = expect_token(path, value)?,
        "composition.rule_of_thirds" => dna.composition.rule_of_thirds = expect_bool(path, value)?,
        "composition.symmetry" => dna.composition.symmetry = expect_unit(path, value)?,
        "composition.leading_lines" => dna.composition.leading_lines = expect_bool(path, value)?,
        "atmosphere.weather" => dna.atmosphere.weather = expect_token(path, value)?,
        "atmosphere.particles" => dna.atmosphere.particles = expect_token(path, value)?,
        "atmosphere.haze" => dna.atmosphere.haze = expect_unit(path, value)?,
        "atmosphere.environment" => dna.atmosphere.environment = expect_token(path, value)?,
        _ => {
            return Err(CinemorphError::validation(format!(
                "unknown leaf path \"{path}\""
            )));
        }
    }
    Ok(())
}

fn expect_token<T: serde::de::DeserializeOwned>(
    path: &str,
    value: &LeafValue,
) -> CinemorphResult<T> {
    let LeafValue::Str(token) = value else {
        return Err(shape_mismatch(path, "an enum token", value));
    };
    serde_json::from_value(serde_json::Value::String(token.clone())).map_err(|_| {
        CinemorphError::validation(format!("{path}: unknown token \"{token}\""))
    })
}

fn expect_int(path: &str, value: &LeafValue, min: i64, max: i64) -> CinemorphResult<u32> {
    let LeafValue::Int(v) = value else {
        return Err(shape_mismatch(path, "an integer", value));
    };
    Ok((*v).clamp(min, max) as u32)
}

fn expect_unit(path: &str, value: &LeafValue) -> CinemorphResult<f64> {
    let LeafValue::Float(v) = value else {
        return Err(shape_mismatch(path, "a float", value));
    };
    if v.is_nan() {
        return Err(CinemorphError::validation(format!("{path}: NaN is not a value")));
    }
    Ok(v.clamp(0.0, 1.0))
}

fn expect_bool(path: &str, value: &LeafValue) -> CinemorphResult<bool> {
    let LeafValue::Bool(v) = value else {
        return Err(shape_mismatch(path, "a boolean", value));
    };
    Ok(*v)
}

fn expect_list(path: &str, value: &LeafValue) -> CinemorphResult<Vec<String>> {
    let LeafValue::StrList(v) = value else {
        return Err(shape_mismatch(path, "a string list", value));
    };
    if v.is_empty() {
        return Err(CinemorphError::validation(format!(
            "{path}: list must not be empty"
        )));
    }
    Ok(v.clone())
}

fn shape_mismatch(path: &str, wanted: &str, got: &LeafValue) -> CinemorphError {
    CinemorphError::validation(format!("{path} expects {wanted}, got {got:?}"))
}

#[cfg(test)]
#[path = "../../tests/unit/dna/paths.rs"]
mod tests;
