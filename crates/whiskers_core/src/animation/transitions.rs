//! Transition table and per-transition timing between visual states.

use whiskers_data::CatStateType::{self, *};

/// Duration for any valid pair missing from [`TRANSITION_DURATIONS`].
pub const DEFAULT_TRANSITION_MS: u32 = 500;

/// Known transition timings keyed by `"{from}-{to}"`, in milliseconds.
pub const TRANSITION_DURATIONS: [(&str, u32); 16] = [
    ("idle-walking", 300),
    ("walking-idle", 300),
    ("walking-running", 200),
    ("running-walking", 200),
    ("running-idle", 400),
    ("idle-running", 400),
    ("idle-sitting", 500),
    ("sitting-idle", 500),
    ("sitting-sleeping", 2000),
    ("sleeping-sitting", 1000),
    ("sleeping-idle", 1000),
    ("idle-sleeping", 2000),
    ("idle-playing", 300),
    ("playing-idle", 300),
    ("playing-walking", 300),
    ("walking-sitting", 500),
];

/// States reachable from `from` according to the table, excluding the
/// always-valid self and idle transitions.
pub fn allowed_targets(from: CatStateType) -> &'static [CatStateType] {
    match from {
        Idle => &[Walking, Running, Sitting, Playing, Sleeping],
        Walking => &[Idle, Running, Sitting],
        Running => &[Idle, Walking],
        Sitting => &[Idle, Sleeping],
        Sleeping => &[Idle, Sitting],
        Playing => &[Idle, Walking],
    }
}

/// Self-transitions and transitions into idle are always valid.
pub fn is_valid_transition(from: CatStateType, to: CatStateType) -> bool {
    from == to || to == Idle || allowed_targets(from).contains(&to)
}

pub fn transition_key(from: CatStateType, to: CatStateType) -> String {
    format!("{}-{}", from.as_str(), to.as_str())
}

/// Looks up a duration by its `"{from}-{to}"` key.
pub fn duration_for_key(key: &str) -> u32 {
    TRANSITION_DURATIONS
        .iter()
        .find(|(k, _)| *k == key)
        .map_or(DEFAULT_TRANSITION_MS, |(_, ms)| *ms)
}

/// Listed duration for `from -> to`, or [`DEFAULT_TRANSITION_MS`].
pub fn transition_duration(from: CatStateType, to: CatStateType) -> u32 {
    let pair = (from.as_str(), to.as_str());
    TRANSITION_DURATIONS
        .iter()
        .find(|(key, _)| key.split_once('-') == Some(pair))
        .map_or(DEFAULT_TRANSITION_MS, |(_, ms)| *ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_pair_agrees_with_key() {
        for from in CatStateType::ALL {
            for to in CatStateType::ALL {
                assert_eq!(
                    transition_duration(from, to),
                    duration_for_key(&transition_key(from, to)),
                    "{from}-{to}"
                );
            }
        }
        assert_eq!(transition_duration(Sitting, Sleeping), 2000);
        assert_eq!(transition_duration(Walking, Running), 200);
    }

    #[test]
    fn test_every_listed_pair_is_a_valid_transition() {
        for (key, _) in TRANSITION_DURATIONS {
            let (from, to) = key.split_once('-').unwrap();
            let parse = |s: &str| CatStateType::ALL.into_iter().find(|c| c.as_str() == s);
            let (from, to) = (parse(from).unwrap(), parse(to).unwrap());
            assert!(is_valid_transition(from, to), "{key}");
        }
    }

    #[test]
    fn test_documented_asymmetries() {
        assert!(is_valid_transition(Walking, Running));
        assert!(is_valid_transition(Running, Walking));
        assert!(is_valid_transition(Walking, Sitting));
        assert!(!is_valid_transition(Sitting, Walking));
        assert!(!is_valid_transition(Running, Sitting));
        assert!(!is_valid_transition(Sleeping, Running));
        assert!(!is_valid_transition(Sleeping, Playing));
    }

    #[test]
    fn test_unlisted_valid_pair_uses_default() {
        // Self-transitions are valid but have no timing entry.
        for state in CatStateType::ALL {
            assert!(is_valid_transition(state, state));
            assert_eq!(transition_duration(state, state), DEFAULT_TRANSITION_MS);
        }
        assert_eq!(duration_for_key("sleeping-walking"), DEFAULT_TRANSITION_MS);
    }
}
