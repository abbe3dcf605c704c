use criterion::{black_box, criterion_group, criterion_main, Criterion};
use whiskers_core::detector::InteractionDetector;
use whiskers_core::interest::evaluate_interest;
use whiskers_core::personality::PersonalityLogic;
use whiskers_data::{
    Behavior, BrainState, InteractionTarget, Personality, Position, TargetKind, TargetMotion,
};

/// Benchmark scoring each target kind once.
fn bench_evaluate_interest(c: &mut Criterion) {
    let personality = Personality::preset("curious").unwrap_or_default();
    let state = BrainState::with_behavior(Behavior::Wandering);
    let origin = Position::new(100.0, 100.0);
    let targets = [
        InteractionTarget::new(TargetKind::FoodBasic, Position::new(150.0, 120.0)),
        InteractionTarget::new(TargetKind::FoodFancy, Position::new(300.0, 100.0)),
        InteractionTarget::new(TargetKind::Water, Position::new(50.0, 400.0)),
        InteractionTarget::new(TargetKind::Yarn, Position::new(120.0, 90.0))
            .with_motion(TargetMotion::Rolling),
        InteractionTarget::new(TargetKind::Pointer, Position::new(110.0, 110.0)),
    ];

    c.bench_function("evaluate_interest", |b| {
        b.iter(|| {
            targets
                .iter()
                .map(|t| evaluate_interest(&personality, &state, black_box(t), &origin))
                .sum::<f32>()
        })
    });
}

/// Benchmark a detector scan over a crowded room.
fn bench_detector_scan(c: &mut Criterion) {
    let mut detector = InteractionDetector::default();
    let origin = Position::new(640.0, 360.0);
    let targets: Vec<_> = (0..100)
        .map(|i| {
            let kind = match i % 4 {
                0 => TargetKind::FoodBasic,
                1 => TargetKind::Water,
                2 => TargetKind::Yarn,
                _ => TargetKind::Pointer,
            };
            InteractionTarget::new(
                kind,
                Position::new((i * 13 % 1280) as f32, (i * 7 % 720) as f32),
            )
        })
        .collect();

    c.bench_function("detector_scan", |b| {
        b.iter(|| black_box(detector.scan(&origin, black_box(&targets)).nearby.len()))
    });
}

criterion_group!(benches, bench_evaluate_interest, bench_detector_scan);
criterion_main!(benches);
