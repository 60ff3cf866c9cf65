use crate::models::patient::PatientId;

/// Compute the recent list to persist after `viewed` has been opened.
///
/// `existing` is ordered most recently viewed first. The returned list is
/// ordered the way it is stored: least recently viewed first, with `viewed`
/// as the last element. A `limit` of zero disables tracking and always
/// yields an empty list.
///
/// An id already present in `existing` is moved to the most recent position
/// instead of being duplicated, so a full list only evicts its oldest entry
/// when `viewed` is new.
pub fn update(existing: &[PatientId], viewed: PatientId, limit: usize) -> Vec<PatientId> {
    if limit == 0 {
        return Vec::new();
    }

    let mut ids = Vec::with_capacity(limit.min(existing.len() + 1));
    ids.push(viewed);

    for &id in existing {
        if ids.len() == limit {
            break;
        }
        if ids.contains(&id) {
            continue;
        }
        ids.push(id);
    }

    ids.reverse();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Stored lists are least recent first, the tracker reads most recent first
    fn view(stored: &[PatientId], viewed: PatientId, limit: usize) -> Vec<PatientId> {
        let existing: Vec<PatientId> = stored.iter().rev().copied().collect();
        update(&existing, viewed, limit)
    }

    #[test]
    fn test_first_view_on_empty_list() {
        assert_eq!(view(&[], 5, 3), vec![5]);
    }

    #[test]
    fn test_huge_limit_does_not_reserve_limit_slots() {
        assert_eq!(update(&[], 5, usize::MAX), vec![5]);
        assert_eq!(update(&[1, 2], 5, 1 << 40), vec![2, 1, 5]);
    }

    #[test]
    fn test_full_list_evicts_oldest() {
        assert_eq!(view(&[1, 2, 3], 4, 3), vec![2, 3, 4]);
    }

    #[test]
    fn test_duplicate_moves_to_most_recent_without_eviction() {
        assert_eq!(view(&[1, 2, 3], 2, 3), vec![1, 3, 2]);
    }

    #[test]
    fn test_viewing_most_recent_is_unchanged() {
        assert_eq!(view(&[1, 2, 3], 3, 3), vec![1, 2, 3]);
    }

    #[test]
    fn test_zero_limit_disables_tracking() {
        assert!(view(&[1, 2, 3], 4, 0).is_empty());
        assert!(view(&[], 4, 0).is_empty());
        assert!(update(&[7, 8], 7, 0).is_empty());
    }

    #[test]
    fn test_limit_one_keeps_only_viewed() {
        assert_eq!(view(&[1], 2, 1), vec![2]);
        assert_eq!(view(&[2], 2, 1), vec![2]);
    }

    #[test]
    fn test_not_full_list_grows() {
        assert_eq!(view(&[1, 2], 9, 5), vec![1, 2, 9]);
    }

    #[test]
    fn test_oversized_existing_is_truncated_to_limit() {
        // limit lowered since the list was stored
        assert_eq!(view(&[1, 2, 3, 4, 5], 6, 3), vec![4, 5, 6]);
        assert_eq!(view(&[1, 2, 3, 4, 5], 1, 3), vec![4, 5, 1]);
    }

    #[test]
    fn test_duplicates_in_existing_are_collapsed() {
        assert_eq!(update(&[3, 3, 2, 2], 1, 5), vec![2, 3, 1]);
    }

    #[test]
    fn test_length_and_position_properties() {
        for limit in 1..=5usize {
            for len in 0..=limit {
                let stored: Vec<PatientId> = (1..=len as PatientId).collect();
                for viewed in 1..=(len as PatientId + 1) {
                    let result = view(&stored, viewed, limit);

                    let distinct = if stored.contains(&viewed) { len } else { len + 1 };
                    assert_eq!(result.len(), distinct.min(limit));
                    assert_eq!(result.last(), Some(&viewed));

                    let mut sorted = result.clone();
                    sorted.sort_unstable();
                    sorted.dedup();
                    assert_eq!(sorted.len(), result.len(), "duplicate in {:?}", result);
                }
            }
        }
    }

    #[test]
    fn test_untouched_entries_keep_relative_order() {
        let result = view(&[10, 20, 30, 40], 20, 4);
        assert_eq!(result, vec![10, 30, 40, 20]);
    }

    #[test]
    fn test_repeated_view_is_idempotent_through_storage() {
        let stored = vec![1, 2, 3];
        let once = view(&stored, 2, 3);
        let twice = view(&once, 2, 3);
        assert_eq!(once, twice);

        let once = view(&stored, 9, 3);
        let twice = view(&once, 9, 3);
        assert_eq!(once, twice);
    }
}
