//! Interest scoring: how strongly a cat's disposition favors a target.
//!
//! The constants and their ordering are part of the observable behavior of a
//! cat. Same inputs always yield the same score.

use crate::error::{CatError, Result};
use whiskers_data::{Behavior, BrainState, InteractionTarget, Personality, Position, TargetKind};

/// Distance at which the distance decay bottoms out, in pixels.
pub const DISTANCE_DECAY_RANGE: f32 = 500.0;

/// Scores `target` for a cat standing at `origin`. Always in [0, 1].
///
/// A cat that is already consuming scores every target at exactly zero. Yarn
/// and pointer targets return straight after their type-specific shaping; all
/// other kinds go through the behavior, rest and distance adjustments.
pub fn evaluate_interest(
    personality: &Personality,
    state: &BrainState,
    target: &InteractionTarget,
    origin: &Position,
) -> f32 {
    let behavior = state.behavior;
    if behavior == Behavior::Consuming {
        return 0.0;
    }

    let rest = state.motivation.rest;
    let p = personality;

    let mut interest = match &target.kind {
        TargetKind::FoodBasic => {
            (0.5 + (1.0 - p.energy) * 0.3) * (1.0 - p.independence * 0.3)
        }
        TargetKind::FoodFancy => (0.7 + p.curiosity * 0.2) * (1.0 + p.curiosity * 0.3),
        TargetKind::Water => {
            let mut i = 0.3;
            if matches!(behavior, Behavior::Playing | Behavior::Wandering) {
                i += 0.3;
            }
            i += (1.0 - rest) * 0.2;
            i * (1.0 - p.independence * 0.2)
        }
        TargetKind::Yarn => {
            let mut i = 0.5 + p.curiosity * 0.3;
            if target.is_moving() {
                i *= 1.5;
            }
            i += p.energy * 0.2;
            i *= 1.0 - p.independence * 0.3;
            return clamp_unit(i);
        }
        TargetKind::Pointer => {
            let mut i = 0.8 + p.curiosity * 0.2;
            i += p.energy * 0.3;
            i *= 1.0 - p.independence * 0.1;
            return clamp_unit(i);
        }
        TargetKind::Other(_) => 0.0,
    };

    match behavior {
        Behavior::Resting => {
            interest *= if target.kind == TargetKind::FoodFancy {
                0.5
            } else {
                0.2
            };
        }
        Behavior::Playing => interest *= 0.6,
        Behavior::Approaching => interest *= 0.3,
        _ => {}
    }

    interest += rest * 0.2;

    let distance = origin.distance_to(&target.position);
    let factor = (1.0 - distance / DISTANCE_DECAY_RANGE).max(0.0);
    interest *= 0.7 + factor * 0.3;

    clamp_unit(interest)
}

/// Like [`evaluate_interest`], but rejects malformed targets instead of
/// scoring them.
pub fn try_evaluate_interest(
    personality: &Personality,
    state: &BrainState,
    target: &InteractionTarget,
    origin: &Position,
) -> Result<f32> {
    if !target.position.is_finite() {
        return Err(CatError::InvalidTarget {
            id: target.id,
            reason: "non-finite position",
        });
    }
    if !origin.is_finite() {
        return Err(CatError::InvalidTarget {
            id: target.id,
            reason: "cat position is not finite",
        });
    }
    Ok(evaluate_interest(personality, state, target, origin))
}

#[inline]
fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use whiskers_data::{Motivation, TargetMotion};

    fn at(kind: TargetKind, x: f32) -> InteractionTarget {
        InteractionTarget::new(kind, Position::new(x, 0.0))
    }

    fn state(behavior: Behavior, rest: f32) -> BrainState {
        BrainState {
            behavior,
            motivation: Motivation { rest, boredom: 0.0 },
        }
    }

    fn approx(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-5, "{a} != {b}");
    }

    const ORIGIN: Position = Position::new(0.0, 0.0);

    #[test]
    fn test_basic_food_formula() {
        let p = Personality::default();
        let s = state(Behavior::Idle, 0.0);
        approx(
            evaluate_interest(&p, &s, &at(TargetKind::FoodBasic, 0.0), &ORIGIN),
            0.5525,
        );
        // Half-way through the decay range.
        approx(
            evaluate_interest(&p, &s, &at(TargetKind::FoodBasic, 250.0), &ORIGIN),
            0.5525 * 0.85,
        );
    }

    #[test]
    fn test_fancy_food_while_resting() {
        let p = Personality::default();
        let s = state(Behavior::Resting, 0.5);
        // (0.8 * 1.15) * 0.5 + 0.1
        approx(
            evaluate_interest(&p, &s, &at(TargetKind::FoodFancy, 0.0), &ORIGIN),
            0.56,
        );
    }

    #[test]
    fn test_water_bonus_while_wandering() {
        let p = Personality::default();
        let idle = evaluate_interest(
            &p,
            &state(Behavior::Idle, 0.0),
            &at(TargetKind::Water, 0.0),
            &ORIGIN,
        );
        let wandering = evaluate_interest(
            &p,
            &state(Behavior::Wandering, 0.0),
            &at(TargetKind::Water, 0.0),
            &ORIGIN,
        );
        approx(idle, 0.45);
        approx(wandering, 0.72);
    }

    #[test]
    fn test_rolling_yarn_skips_distance_decay() {
        let p = Personality::default();
        let s = state(Behavior::Idle, 0.0);
        let near = at(TargetKind::Yarn, 0.0).with_motion(TargetMotion::Rolling);
        let far = at(TargetKind::Yarn, 2000.0).with_motion(TargetMotion::Rolling);
        // ((0.65 * 1.5) + 0.1) * 0.85
        approx(evaluate_interest(&p, &s, &near, &ORIGIN), 0.91375);
        approx(
            evaluate_interest(&p, &s, &near, &ORIGIN),
            evaluate_interest(&p, &s, &far, &ORIGIN),
        );
    }

    #[test]
    fn test_unknown_kind_only_gets_generic_adjustment() {
        let p = Personality::default();
        let target = at(TargetKind::from("cardboard-box"), 0.0);
        approx(
            evaluate_interest(&p, &state(Behavior::Idle, 0.0), &target, &ORIGIN),
            0.0,
        );
        approx(
            evaluate_interest(&p, &state(Behavior::Idle, 0.5), &target, &ORIGIN),
            0.1,
        );
    }

    #[test]
    fn test_consuming_scores_zero() {
        let p = Personality {
            curiosity: 0.9,
            energy: 0.8,
            independence: 0.1,
            sociability: 0.5,
            rest_bias: 0.2,
        };
        for kind in [TargetKind::Pointer, TargetKind::Yarn, TargetKind::FoodFancy] {
            assert_eq!(
                evaluate_interest(&p, &state(Behavior::Consuming, 1.0), &at(kind, 0.0), &ORIGIN),
                0.0
            );
        }
    }

    #[test]
    fn test_malformed_target_rejected() {
        let p = Personality::default();
        let bad = InteractionTarget::new(TargetKind::Water, Position::new(f32::NAN, 0.0));
        assert!(try_evaluate_interest(&p, &BrainState::default(), &bad, &ORIGIN).is_err());
    }
}
