//! Anti-repetition selection for rotating content such as quiz questions.
//!
//! Selection is pure: the caller owns the exclusion set and persists it
//! however it likes.

use std::collections::BTreeSet;

use fablepath_core::rng::DeterministicRng;

/// What to do once every id has been seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResetPolicy {
    /// Clear the exclusion set and keep filling from the full pool.
    #[default]
    ResetWhenExhausted,
    /// Return only what is left, possibly fewer than requested.
    Never,
}

/// Result of a rotation pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationSelection<T> {
    /// Picked ids, in presentation order. Never contains duplicates.
    pub selected: Vec<T>,
    /// Exclusion set to pass to the next call.
    pub excluded: BTreeSet<T>,
    /// Whether the exclusion set was reset during this pick.
    pub reset: bool,
}

/// Picks up to `count` ids from `all_ids` that are not in `excluded`.
///
/// With [`ResetPolicy::ResetWhenExhausted`], a pick that runs out of unseen
/// ids starts a new cycle: the exclusion set is cleared and the rest is drawn
/// from ids not already picked in this call. After a reset the returned
/// exclusion set holds exactly this call's selection.
pub fn select_rotation<T>(
    all_ids: &[T],
    excluded: &BTreeSet<T>,
    count: usize,
    policy: ResetPolicy,
    rng: &mut dyn DeterministicRng,
) -> RotationSelection<T>
where
    T: Clone + Ord,
{
    let mut seen = BTreeSet::new();
    let pool: Vec<T> = all_ids
        .iter()
        .filter(|id| seen.insert((*id).clone()))
        .cloned()
        .collect();

    let mut unseen: Vec<T> = pool
        .iter()
        .filter(|id| !excluded.contains(*id))
        .cloned()
        .collect();
    shuffle(&mut unseen, rng);
    unseen.truncate(count);
    let mut selected = unseen;

    let exhausted = selected.len() < count && selected.len() < pool.len();
    if exhausted && policy == ResetPolicy::ResetWhenExhausted {
        let taken: BTreeSet<T> = selected.iter().cloned().collect();
        let mut refill: Vec<T> = pool
            .iter()
            .filter(|id| !taken.contains(*id))
            .cloned()
            .collect();
        shuffle(&mut refill, rng);
        refill.truncate(count - selected.len());
        selected.extend(refill);

        let excluded = selected.iter().cloned().collect();
        return RotationSelection {
            selected,
            excluded,
            reset: true,
        };
    }

    let mut next_excluded = excluded.clone();
    next_excluded.extend(selected.iter().cloned());
    RotationSelection {
        selected,
        excluded: next_excluded,
        reset: false,
    }
}

/// Fisher–Yates shuffle driven by the injected RNG.
fn shuffle<T>(items: &mut [T], rng: &mut dyn DeterministicRng) {
    for i in (1..items.len()).rev() {
        let upper = u32::try_from(i).unwrap_or(u32::MAX);
        let j = usize::try_from(rng.next_u32_range(0, upper))
            .unwrap_or(i)
            .min(i);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use fablepath_core::rng::SeededRng;
    use fablepath_test_support::{MockRng, SequenceRng};

    use super::*;

    fn ids(values: &[u32]) -> Vec<u32> {
        values.to_vec()
    }

    #[test]
    fn test_selects_only_unseen_ids() {
        // Arrange
        let all = ids(&[1, 2, 3, 4, 5]);
        let excluded: BTreeSet<u32> = [1, 2].into_iter().collect();

        // Act
        let pick = select_rotation(&all, &excluded, 3, ResetPolicy::Never, &mut MockRng);

        // Assert
        assert_eq!(pick.selected, vec![4, 5, 3]);
        assert!(!pick.reset);
        assert_eq!(pick.excluded, [1, 2, 3, 4, 5].into_iter().collect());
    }

    #[test]
    fn test_never_policy_returns_fewer_when_exhausted() {
        let all = ids(&[1, 2, 3]);
        let excluded: BTreeSet<u32> = [1, 2].into_iter().collect();

        let pick = select_rotation(&all, &excluded, 2, ResetPolicy::Never, &mut MockRng);

        assert_eq!(pick.selected, vec![3]);
        assert!(!pick.reset);
    }

    #[test]
    fn test_reset_policy_refills_without_repeating_within_a_pick() {
        // Arrange
        let all = ids(&[1, 2, 3, 4]);
        let excluded: BTreeSet<u32> = [1, 2, 3].into_iter().collect();

        // Act
        let pick = select_rotation(
            &all,
            &excluded,
            3,
            ResetPolicy::ResetWhenExhausted,
            &mut SeededRng::from_seed(3),
        );

        // Assert
        assert!(pick.reset);
        assert_eq!(pick.selected.len(), 3);
        assert_eq!(pick.selected[0], 4);
        let unique: BTreeSet<u32> = pick.selected.iter().copied().collect();
        assert_eq!(unique.len(), 3);
        assert_eq!(pick.excluded, unique);
    }

    #[test]
    fn test_scripted_draws_pin_the_order_after_a_reset() {
        // Arrange
        let all = ids(&[1, 2, 3, 4]);
        let excluded: BTreeSet<u32> = [1, 2, 3].into_iter().collect();
        let mut rng = SequenceRng::new(vec![0, 0]);

        // Act
        let pick = select_rotation(&all, &excluded, 3, ResetPolicy::ResetWhenExhausted, &mut rng);

        // Assert
        assert!(pick.reset);
        assert_eq!(pick.selected, vec![4, 2, 3]);
        assert_eq!(pick.excluded, [2, 3, 4].into_iter().collect());
    }

    #[test]
    fn test_out_of_range_draws_are_clamped_to_the_last_slot() {
        let all = ids(&[1, 2, 3]);
        let mut rng = SequenceRng::new(vec![99, 99]);

        let pick = select_rotation(&all, &BTreeSet::new(), 3, ResetPolicy::Never, &mut rng);

        assert_eq!(pick.selected, vec![1, 2, 3]);
    }

    #[test]
    fn test_request_larger_than_pool_returns_whole_pool_once() {
        let all = ids(&[7, 8, 7, 9]);

        let pick = select_rotation(
            &all,
            &BTreeSet::new(),
            10,
            ResetPolicy::ResetWhenExhausted,
            &mut MockRng,
        );

        let mut sorted = pick.selected.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![7, 8, 9]);
        assert!(!pick.reset);
    }

    #[test]
    fn test_same_seed_gives_same_order() {
        let all: Vec<u32> = (0..20).collect();

        let a = select_rotation(
            &all,
            &BTreeSet::new(),
            5,
            ResetPolicy::Never,
            &mut SeededRng::from_seed(11),
        );
        let b = select_rotation(
            &all,
            &BTreeSet::new(),
            5,
            ResetPolicy::Never,
            &mut SeededRng::from_seed(11),
        );

        assert_eq!(a.selected, b.selected);
    }

    #[test]
    fn test_zero_count_selects_nothing() {
        let all = ids(&[1, 2]);
        let pick = select_rotation(
            &all,
            &BTreeSet::new(),
            0,
            ResetPolicy::ResetWhenExhausted,
            &mut MockRng,
        );
        assert!(pick.selected.is_empty());
        assert!(!pick.reset);
    }
}
