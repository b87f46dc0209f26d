use std::collections::BTreeMap;

use crate::dna::model::CinematographyDna;
use crate::dna::value::{LeafValue, floats_close};
use crate::foundation::error::CinemorphResult;

/// Minimal edit set between two DNA instances: dotted leaf path to new value.
///
/// `BTreeMap` keeps key order stable, so identical inputs always serialize to
/// identical payloads.
pub type DnaDiff = BTreeMap<String, LeafValue>;

/// Computes the minimal `path -> value` edit set turning `base` into `edited`.
///
/// Granularity is always the individual leaf: even when an entire category
/// changed, each changed leaf is emitted as its own `category.leaf` entry,
/// and unchanged leaves are never emitted. Scalars compare exactly, floats
/// under [`crate::FLOAT_TOLERANCE`], and the palette by full ordered-sequence
/// equality. Identical inputs yield an empty map.
///
/// Both arguments must be valid; diffing a malformed DNA is an error, never a
/// partial result. The diff feeding a remix request must be computed fresh at
/// issue time, because the working copy may keep mutating after any earlier
/// diff was taken.
pub fn diff(base: &CinematographyDna, edited: &CinematographyDna) -> CinemorphResult<DnaDiff> {
    base.validate()?;
    edited.validate()?;

    let mut out = DnaDiff::new();

    push_token(&mut out, "camera.angle", base.camera.angle.as_str(), edited.camera.angle.as_str());
    push_token(&mut out, "camera.fov", base.camera.fov.as_str(), edited.camera.fov.as_str());
    push_int(&mut out, "camera.lens_mm", i64::from(base.camera.lens_mm), i64::from(edited.camera.lens_mm));
    push_token(
        &mut out,
        "camera.depth_of_field",
        base.camera.depth_of_field.as_str(),
        edited.camera.depth_of_field.as_str(),
    );
    push_token(
        &mut out,
        "camera.shot_type",
        base.camera.shot_type.as_str(),
        edited.camera.shot_type.as_str(),
    );

    push_token(
        &mut out,
        "lighting.direction",
        base.lighting.direction.as_str(),
        edited.lighting.direction.as_str(),
    );
    push_float(&mut out, "lighting.intensity", base.lighting.intensity, edited.lighting.intensity);
    push_int(
        &mut out,
        "lighting.color_temp",
        i64::from(base.lighting.color_temp),
        i64::from(edited.lighting.color_temp),
    );
    push_token(&mut out, "lighting.style", base.lighting.style.as_str(), edited.lighting.style.as_str());
    push_token(
        &mut out,
        "lighting.time_of_day",
        base.lighting.time_of_day.as_str(),
        edited.lighting.time_of_day.as_str(),
    );

    push_list(&mut out, "color.palette", &base.color.palette, &edited.color.palette);
    push_float(&mut out, "color.saturation", base.color.saturation, edited.color.saturation);
    push_float(&mut out, "color.contrast", base.color.contrast, edited.color.contrast);
    push_token(&mut out, "color.mood", base.color.mood.as_str(), edited.color.mood.as_str());
    push_token(&mut out, "color.grade", base.color.grade.as_str(), edited.color.grade.as_str());

    push_token(
        &mut out,
        "composition.framing",
        base.composition.framing.as_str(),
        edited.composition.framing.as_str(),
    );
    push_bool(
        &mut out,
        "composition.rule_of_thirds",
        base.composition.rule_of_thirds,
        edited.composition.rule_of_thirds,
    );
    push_float(
        &mut out,
        "composition.symmetry",
        base.composition.symmetry,
        edited.composition.symmetry,
    );
    push_bool(
        &mut out,
        "composition.leading_lines",
        base.composition.leading_lines,
        edited.composition.leading_lines,
    );

    push_token(
        &mut out,
        "atmosphere.weather",
        base.atmosphere.weather.as_str(),
        edited.atmosphere.weather.as_str(),
    );
    push_token(
        &mut out,
        "atmosphere.particles",
        base.atmosphere.particles.as_str(),
        edited.atmosphere.particles.as_str(),
    );
    push_float(&mut out, "atmosphere.haze", base.atmosphere.haze, edited.atmosphere.haze);
    push_token(
        &mut out,
        "atmosphere.environment",
        base.atmosphere.environment.as_str(),
        edited.atmosphere.environment.as_str(),
    );

    Ok(out)
}

fn push_token(out: &mut DnaDiff, path: &str, base: &'static str, edited: &'static str) {
    if base != edited {
        out.insert(path.to_string(), LeafValue::Str(edited.to_string()));
    }
}

fn push_int(out: &mut DnaDiff, path: &str, base: i64, edited: i64) {
    if base != edited {
        out.insert(path.to_string(), LeafValue::Int(edited));
    }
}

fn push_float(out: &mut DnaDiff, path: &str, base: f64, edited: f64) {
    if !floats_close(base, edited) {
        out.insert(path.to_string(), LeafValue::Float(edited));
    }
}

fn push_bool(out: &mut DnaDiff, path: &str, base: bool, edited: bool) {
    if base != edited {
        out.insert(path.to_string(), LeafValue::Bool(edited));
    }
}

fn push_list(out: &mut DnaDiff, path: &str, base: &[String], edited: &[String]) {
    if base != edited {
        out.insert(path.to_string(), LeafValue::StrList(edited.to_vec()));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/diff/engine.rs"]
mod tests;
