//! Partnerships of a run: which players shared a side.

use crate::models::{Match, PlayerId, Team};
use std::collections::HashSet;

/// Order-independent key for two teammates.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct PairKey(PlayerId, PlayerId);

impl PairKey {
    pub fn new(a: PlayerId, b: PlayerId) -> Self {
        if a <= b {
            PairKey(a, b)
        } else {
            PairKey(b, a)
        }
    }

    pub fn players(&self) -> (PlayerId, PlayerId) {
        (self.0, self.1)
    }
}

/// Partnerships that should not be repeated in the next run.
pub type ForbiddenPairs = HashSet<PairKey>;

/// Collect the team pairs of every match in `matches`. A side with an empty slot yields nothing.
pub fn pairs_of_run(matches: &[Match]) -> ForbiddenPairs {
    matches
        .iter()
        .flat_map(|m| [m.team(Team::One), m.team(Team::Two)])
        .filter_map(|side| match side {
            (Some(a), Some(b)) => Some(PairKey::new(a, b)),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GameMode, NewMatch};
    use chrono::Utc;
    use uuid::Uuid;

    fn m(slots: [Option<PlayerId>; 4]) -> Match {
        let new = NewMatch {
            run: 1,
            season: 1,
            mode: GameMode::Open,
            slots,
        };
        Match::from_new(Uuid::new_v4(), Uuid::new_v4(), 0, Utc::now(), new)
    }

    #[test]
    fn pair_key_ignores_order() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(PairKey::new(a, b), PairKey::new(b, a));
    }

    #[test]
    fn both_sides_of_full_match_are_recorded() {
        let p: Vec<PlayerId> = (0..4).map(|_| Uuid::new_v4()).collect();
        let pairs = pairs_of_run(&[m([Some(p[0]), Some(p[1]), Some(p[2]), Some(p[3])])]);
        assert_eq!(pairs.len(), 2);
        assert!(pairs.contains(&PairKey::new(p[1], p[0])));
        assert!(pairs.contains(&PairKey::new(p[2], p[3])));
    }

    #[test]
    fn incomplete_sides_yield_no_pair() {
        let p: Vec<PlayerId> = (0..3).map(|_| Uuid::new_v4()).collect();
        let matches = [
            m([Some(p[0]), Some(p[1]), Some(p[2]), None]),
            m([Some(p[2]), None, None, None]),
        ];
        let pairs = pairs_of_run(&matches);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs_of_run(&matches), pairs);
    }
}
