//! Intensity-to-color mapping: the thermal ramp and the red overlay blend.


use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const RED: [u8; 3] = [255, 0, 0];

/// One breakpoint of a [`ColorRamp`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RampStop {
    /// Position in `[0, 1]`.
    pub position: f32,
    pub color: [u8; 3],
}

impl RampStop {
    pub const fn new(position: f32, color: [u8; 3]) -> Self {
        Self { position, color }
    }
}

/// Piecewise-linear color gradient over `[0, 1]`.
///
/// Stops are strictly increasing, the first sits at 0.0 and the last at 1.0.
/// Deserialization goes through [`ColorRamp::new`], so a ramp value is always valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RampStop>", into = "Vec<RampStop>")]
pub struct ColorRamp {
    stops: Vec<RampStop>,
}

impl ColorRamp {
    pub fn new(stops: Vec<RampStop>) -> Result<Self> {
        if stops.len() < 2 {
            return Err(Error::Config(format!(
                "color ramp needs at least 2 stops, got {}",
                stops.len()
            )));
        }

        let first = stops[0].position;
        let last = stops[stops.len() - 1].position;
        if first != 0.0 || last != 1.0 {
            return Err(Error::Config(format!(
                "color ramp must span [0, 1], got [{}, {}]",
                first, last
            )));
        }

        if let Some(pair) = stops.windows(2).find(|w| w[0].position >= w[1].position) {
            return Err(Error::Config(format!(
                "color ramp stops must be strictly increasing: {} then {}",
                pair[0].position, pair[1].position
            )));
        }

        Ok(Self { stops })
    }

    /// Blue → cyan → green → yellow → orange → red.
    ///
    /// Breakpoints sit at 0, 50, 100, 150, 200 and 255 on a 0..255 scale, so
    /// the last segment is slightly longer than the others.
    pub fn thermal() -> Self {
        Self {
            stops: vec![
                RampStop::new(0.0, [0, 0, 255]),
                RampStop::new(50.0 / 255.0, [0, 100, 255]),
                RampStop::new(100.0 / 255.0, [0, 255, 0]),
                RampStop::new(150.0 / 255.0, [255, 255, 0]),
                RampStop::new(200.0 / 255.0, [255, 155, 0]),
                RampStop::new(1.0, [255, 0, 0]),
            ],
        }
    }

    pub fn stops(&self) -> &[RampStop] {
        &self.stops
    }

    /// Color at `intensity`, clamped to `[0, 1]`; NaN maps to the first stop.
    pub fn color_at(&self, intensity: f32) -> [u8; 3] {
        let t = clamp_unit(intensity);

        let upper = self
            .stops
            .iter()
            .position(|stop| stop.position >= t)
            .unwrap_or(self.stops.len() - 1);
        if upper == 0 {
            return self.stops[0].color;
        }

        let lo = self.stops[upper - 1];
        let hi = self.stops[upper];
        let u = (t - lo.position) / (hi.position - lo.position);

        std::array::from_fn(|c| lerp_channel(lo.color[c], hi.color[c], u))
    }
}

impl Default for ColorRamp {
    fn default() -> Self {
        Self::thermal()
    }
}

impl TryFrom<Vec<RampStop>> for ColorRamp {
    type Error = Error;

    fn try_from(stops: Vec<RampStop>) -> Result<Self> {
        Self::new(stops)
    }
}

impl From<ColorRamp> for Vec<RampStop> {
    fn from(ramp: ColorRamp) -> Self {
        ramp.stops
    }
}

/// Blends `rgb` toward pure red by `intensity`, never by more than `cap`.
pub fn red_overlay(rgb: [u8; 3], intensity: f32, cap: f32) -> [u8; 3] {
    let blend = clamp_unit(intensity).min(clamp_unit(cap));
    std::array::from_fn(|c| lerp_channel(rgb[c], RED[c], blend))
}

/// Scales every channel by `factor`.
pub fn dim(rgb: [u8; 3], factor: f32) -> [u8; 3] {
    let factor = clamp_unit(factor);
    rgb.map(|c| to_channel(c as f32 * factor))
}

#[inline]
fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

#[inline]
fn lerp_channel(a: u8, b: u8, u: f32) -> u8 {
    let a = a as f32;
    let b = b as f32;
    to_channel(a + (b - a) * u)
}

#[inline]
fn to_channel(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
