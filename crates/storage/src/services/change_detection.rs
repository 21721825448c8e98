use uuid::Uuid;

use crate::models::{HoleStat, HoleStatValues};

/// What a hole stat submission requires from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoleStatChange {
    /// Same business values as stored; nothing to write or recompute.
    Unchanged,
    /// First write for the hole.
    Insert(HoleStatValues),
    /// The candidate takes over the stored row's identity.
    Update {
        hole_stat_id: Uuid,
        values: HoleStatValues,
    },
}

/// Compares only the business values; row and hole identifiers are not part
/// of [`HoleStatValues`].
pub fn is_material_change(previous: &HoleStatValues, candidate: &HoleStatValues) -> bool {
    previous != candidate
}

/// Decides how a validated candidate is written.
///
/// A missing previous record compares as the zero value, which never equals a
/// valid candidate since a green outcome can't be `NOT_APPLICABLE`.
pub fn detect_change(previous: Option<&HoleStat>, candidate: HoleStatValues) -> HoleStatChange {
    let zero = HoleStatValues::default();
    let previous_values = previous.map(|p| &p.values).unwrap_or(&zero);

    if !is_material_change(previous_values, &candidate) {
        return HoleStatChange::Unchanged;
    }

    match previous {
        Some(stat) => HoleStatChange::Update {
            hole_stat_id: stat.hole_stat_id,
            values: candidate,
        },
        None => HoleStatChange::Insert(candidate),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::HitOutcome;

    fn values() -> HoleStatValues {
        HoleStatValues {
            score: 5,
            putts: 2,
            penalties: 1,
            fairway_hit: HitOutcome::Right,
            green_hit: HitOutcome::Short,
            pin_location: "front".to_string(),
        }
    }

    fn stored(values: HoleStatValues) -> HoleStat {
        HoleStat {
            hole_stat_id: Uuid::new_v4(),
            hole_id: Uuid::new_v4(),
            values,
            updated_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn test_identical_values_unchanged() {
        let previous = stored(values());
        assert_eq!(
            detect_change(Some(&previous), values()),
            HoleStatChange::Unchanged
        );
    }

    #[test]
    fn test_identifiers_do_not_count_as_change() {
        let a = stored(values());
        let b = stored(values());
        assert_ne!(a.hole_stat_id, b.hole_stat_id);
        assert!(!is_material_change(&a.values, &b.values));
    }

    #[test]
    fn test_changed_value_keeps_previous_id() {
        let previous = stored(values());
        let candidate = HoleStatValues {
            pin_location: "back".to_string(),
            ..values()
        };

        match detect_change(Some(&previous), candidate.clone()) {
            HoleStatChange::Update {
                hole_stat_id,
                values,
            } => {
                assert_eq!(hole_stat_id, previous.hole_stat_id);
                assert_eq!(values, candidate);
            }
            other => panic!("expected update, got {:?}", other),
        }
    }

    #[test]
    fn test_first_submission_inserts() {
        let change = detect_change(None, values());
        assert_eq!(change, HoleStatChange::Insert(values()));
    }
}
