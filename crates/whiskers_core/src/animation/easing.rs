//! Easing curves for interpolating positions and attributes during a
//! transition. Inputs are clamped to [0, 1]; every curve maps 0 to 0 and 1 to 1.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use whiskers_data::CatStateType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    /// General-purpose transitions.
    CubicInOut,
    /// Natural deceleration.
    QuadOut,
    /// Bouncy, playful transitions.
    ElasticOut,
}

impl Easing {
    #[inline]
    pub fn apply(&self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Easing::CubicInOut => cubic_in_out(t),
            Easing::QuadOut => quad_out(t),
            Easing::ElasticOut => elastic_out(t),
        }
    }

    /// Easing used when moving between two visual states.
    pub fn for_transition(_from: CatStateType, to: CatStateType) -> Easing {
        match to {
            CatStateType::Playing => Easing::ElasticOut,
            CatStateType::Idle | CatStateType::Sitting | CatStateType::Sleeping => Easing::QuadOut,
            CatStateType::Walking | CatStateType::Running => Easing::CubicInOut,
        }
    }
}

#[inline]
pub fn cubic_in_out(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[inline]
pub fn quad_out(t: f32) -> f32 {
    1.0 - (1.0 - t) * (1.0 - t)
}

#[inline]
pub fn elastic_out(t: f32) -> f32 {
    const C4: f32 = (2.0 * PI) / 3.0;
    if t <= 0.0 {
        0.0
    } else if t >= 1.0 {
        1.0
    } else {
        2f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * C4).sin() + 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        for easing in [Easing::CubicInOut, Easing::QuadOut, Easing::ElasticOut] {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{easing:?} at 1");
        }
    }

    #[test]
    fn test_cubic_midpoint_is_half() {
        assert!((cubic_in_out(0.5) - 0.5).abs() < 1e-6);
        assert!((cubic_in_out(0.25) - 0.0625).abs() < 1e-6);
    }

    #[test]
    fn test_quad_out_decelerates() {
        assert!((quad_out(0.5) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_elastic_overshoots() {
        let peak = (1..100)
            .map(|i| elastic_out(i as f32 / 100.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn test_out_of_range_input_is_clamped() {
        assert_eq!(Easing::QuadOut.apply(-3.0), 0.0);
        assert_eq!(Easing::QuadOut.apply(f32::NAN), 0.0);
        assert!((Easing::CubicInOut.apply(7.0) - 1.0).abs() < 1e-6);
    }
}
