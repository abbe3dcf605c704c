/// Asserts that a score is a real number within [0, 1].
#[macro_export]
macro_rules! assert_unit_interval {
    ($value:expr) => {
        let v: f32 = $value;
        assert!(
            v.is_finite() && (0.0..=1.0).contains(&v),
            "value {} is outside [0, 1]",
            v
        );
    };
}

/// Asserts the current behavior of a registered cat.
#[macro_export]
macro_rules! assert_behavior {
    ($registry:expr, $id:expr, $behavior:expr) => {
        let cat = $registry.get($id).expect("Cat not found in registry");
        assert_eq!(
            cat.behavior(),
            $behavior,
            "Cat {} is {:?}, expected {:?}",
            $id,
            cat.behavior(),
            $behavior
        );
    };
}

/// Asserts the number of cats in a registry.
#[macro_export]
macro_rules! assert_cat_count {
    ($registry:expr, $count:expr) => {
        assert_eq!($registry.len(), $count, "Cat count mismatch");
    };
}
