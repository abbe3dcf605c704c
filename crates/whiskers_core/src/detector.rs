//! Proximity scan over the environment's interaction targets.
//!
//! The detector keeps its buffers between scans so a steady-state tick does not
//! allocate. It never mutates targets.

use crate::config::DetectionConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;
use whiskers_data::{InteractionTarget, Position, TargetKind};

/// Minimum displacement reported as a move, in pixels.
pub const MOVE_EPSILON: f32 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DetectionEvent {
    Appeared {
        id: Uuid,
        kind: TargetKind,
        position: Position,
    },
    Disappeared {
        id: Uuid,
    },
    Moved {
        id: Uuid,
        from: Position,
        to: Position,
    },
}

#[derive(Debug, Clone, Copy)]
struct TrackedTarget {
    position: Position,
    seen: u64,
}

/// Result of one scan. Indices point into the target slice that was scanned.
#[derive(Debug, Clone, Copy)]
pub struct Detection<'a> {
    /// In-range targets, nearest first. Equal distances keep slice order.
    pub nearby: &'a [usize],
    pub events: &'a [DetectionEvent],
    /// Targets skipped because they were malformed.
    pub rejected: usize,
}

#[derive(Debug, Clone, Default)]
pub struct InteractionDetector {
    config: DetectionConfig,
    nearby: Vec<usize>,
    ranked: Vec<(f32, usize)>,
    events: Vec<DetectionEvent>,
    known: BTreeMap<Uuid, TrackedTarget>,
    generation: u64,
}

impl InteractionDetector {
    pub fn new(config: DetectionConfig) -> Self {
        Self {
            config,
            nearby: Vec::with_capacity(16),
            ranked: Vec::with_capacity(16),
            events: Vec::with_capacity(8),
            known: BTreeMap::new(),
            generation: 0,
        }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: DetectionConfig) {
        self.config = config;
    }

    /// Range in effect for `kind`, after default fallback.
    pub fn range_for(&self, kind: &TargetKind) -> f32 {
        self.config.range_for(kind.category())
    }

    /// Finds the targets within range of `origin` and diffs them against the
    /// previous scan.
    pub fn scan(&mut self, origin: &Position, targets: &[InteractionTarget]) -> Detection<'_> {
        self.generation = self.generation.wrapping_add(1);
        self.nearby.clear();
        self.ranked.clear();
        self.events.clear();
        let generation = self.generation;
        let mut rejected = 0;

        for (idx, target) in targets.iter().enumerate() {
            if !target.position.is_finite() {
                rejected += 1;
                tracing::warn!(target_id = %target.id, "Skipping target with non-finite position");
                continue;
            }
            let range = self.config.range_for(target.kind.category());
            let distance = origin.distance_to(&target.position);
            if distance > range {
                continue;
            }
            self.ranked.push((distance, idx));

            match self.known.get_mut(&target.id) {
                Some(tracked) => {
                    if tracked.position.distance_to(&target.position) > MOVE_EPSILON {
                        self.events.push(DetectionEvent::Moved {
                            id: target.id,
                            from: tracked.position,
                            to: target.position,
                        });
                        tracked.position = target.position;
                    }
                    tracked.seen = generation;
                }
                None => {
                    self.known.insert(
                        target.id,
                        TrackedTarget {
                            position: target.position,
                            seen: generation,
                        },
                    );
                    self.events.push(DetectionEvent::Appeared {
                        id: target.id,
                        kind: target.kind.clone(),
                        position: target.position,
                    });
                }
            }
        }

        self.ranked
            .sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        self.nearby.extend(self.ranked.iter().map(|&(_, idx)| idx));

        self.known.retain(|id, tracked| {
            if tracked.seen == generation {
                true
            } else {
                self.events.push(DetectionEvent::Disappeared { id: *id });
                false
            }
        });

        Detection {
            nearby: &self.nearby,
            events: &self.events,
            rejected,
        }
    }

    pub fn is_tracking(&self, id: &Uuid) -> bool {
        self.known.contains_key(id)
    }

    /// Forgets every tracked target; the next scan reports all nearby targets
    /// as newly appeared.
    pub fn reset(&mut self) {
        self.known.clear();
        self.nearby.clear();
        self.ranked.clear();
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_DETECTION_RANGE;

    fn target(kind: TargetKind, x: f32) -> InteractionTarget {
        InteractionTarget::new(kind, Position::new(x, 0.0))
    }

    #[test]
    fn test_ranges_filter_targets() {
        let mut detector = InteractionDetector::new(DetectionConfig {
            food: Some(100.0),
            pointer: Some(1000.0),
            ..Default::default()
        });
        let targets = vec![
            target(TargetKind::FoodBasic, 50.0),
            target(TargetKind::FoodBasic, 150.0),
            target(TargetKind::Pointer, 900.0),
            target(TargetKind::Water, DEFAULT_DETECTION_RANGE + 1.0),
        ];
        let detection = detector.scan(&Position::default(), &targets);
        assert_eq!(detection.nearby, &[0, 2]);
        assert_eq!(detection.events.len(), 2);
    }

    #[test]
    fn test_appear_move_disappear_sequence() {
        let mut detector = InteractionDetector::default();
        let origin = Position::default();
        let mut targets = vec![target(TargetKind::Yarn, 10.0)];
        let id = targets[0].id;

        let first = detector.scan(&origin, &targets);
        assert!(matches!(first.events, [DetectionEvent::Appeared { .. }]));

        let quiet = detector.scan(&origin, &targets);
        assert!(quiet.events.is_empty());

        targets[0].position.x = 40.0;
        let moved = detector.scan(&origin, &targets);
        assert_eq!(
            moved.events,
            &[DetectionEvent::Moved {
                id,
                from: Position::new(10.0, 0.0),
                to: Position::new(40.0, 0.0),
            }]
        );

        let gone = detector.scan(&origin, &[]);
        assert_eq!(gone.events, &[DetectionEvent::Disappeared { id }]);
        assert!(!detector.is_tracking(&id));
    }

    #[test]
    fn test_nearby_is_ordered_by_distance() {
        let mut detector = InteractionDetector::default();
        let targets = vec![
            target(TargetKind::Yarn, 200.0),
            target(TargetKind::FoodBasic, -20.0),
            target(TargetKind::Water, 90.0),
            target(TargetKind::Pointer, 20.0),
        ];
        let detection = detector.scan(&Position::default(), &targets);
        assert_eq!(detection.nearby, &[1, 3, 2, 0]);
    }

    #[test]
    fn test_malformed_target_is_isolated() {
        let mut detector = InteractionDetector::default();
        let targets = vec![
            target(TargetKind::Water, f32::NAN),
            target(TargetKind::Water, 5.0),
        ];
        let detection = detector.scan(&Position::default(), &targets);
        assert_eq!(detection.rejected, 1);
        assert_eq!(detection.nearby, &[1]);
    }
}
