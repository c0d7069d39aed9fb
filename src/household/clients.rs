//! Default-client resolution for household entities
//!
//! Incomes, assets and liabilities reference their owner by client id. The
//! single rule for turning that reference into one of the two projected
//! clients lives here so every evaluator applies it the same way.

/// Which of the two projected clients an entity belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientSlot {
    First,
    Second,
}

/// Resolve an entity's owner.
///
/// Only an exact match on the second client's id selects `Second`. Unset
/// references, and references to ids that are not part of the projection,
/// fall back to the household's first client.
pub fn resolve_client(assigned: Option<&str>, client_ids: &[Option<String>; 2]) -> ClientSlot {
    match (assigned, client_ids[1].as_deref()) {
        (Some(id), Some(second)) if id == second => ClientSlot::Second,
        _ => ClientSlot::First,
    }
}

/// True when `assigned` names neither projected client
pub fn is_unknown_client(assigned: Option<&str>, client_ids: &[Option<String>; 2]) -> bool {
    match assigned {
        None => false,
        Some(id) => !client_ids.iter().flatten().any(|known| known == id),
    }
}

/// Simulated ages of both clients for one projection year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClientAges {
    pub first: Option<i32>,
    pub second: Option<i32>,
}

impl ClientAges {
    /// Ages `year_offset` years after the starting ages; unknown stays unknown
    pub fn at_offset(first: Option<i32>, second: Option<i32>, year_offset: i32) -> Self {
        Self {
            first: first.map(|age| age.saturating_add(year_offset)),
            second: second.map(|age| age.saturating_add(year_offset)),
        }
    }

    pub fn age_of(&self, slot: ClientSlot) -> Option<i32> {
        match slot {
            ClientSlot::First => self.first,
            ClientSlot::Second => self.second,
        }
    }

    /// Age of whichever client `assigned` resolves to
    pub fn for_assignment(&self, assigned: Option<&str>, client_ids: &[Option<String>; 2]) -> Option<i32> {
        self.age_of(resolve_client(assigned, client_ids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> [Option<String>; 2] {
        [Some("alice".to_string()), Some("bob".to_string())]
    }

    #[test]
    fn test_resolution() {
        assert_eq!(resolve_client(Some("bob"), &ids()), ClientSlot::Second);
        assert_eq!(resolve_client(Some("alice"), &ids()), ClientSlot::First);
        assert_eq!(resolve_client(None, &ids()), ClientSlot::First);
        assert_eq!(resolve_client(Some("carol"), &ids()), ClientSlot::First);
    }

    #[test]
    fn test_single_client_household() {
        let ids = [Some("alice".to_string()), None];
        assert_eq!(resolve_client(Some("bob"), &ids), ClientSlot::First);
        assert!(is_unknown_client(Some("bob"), &ids));
        assert!(!is_unknown_client(None, &ids));
        assert!(!is_unknown_client(Some("alice"), &ids));
    }

    #[test]
    fn test_ages_at_offset() {
        let ages = ClientAges::at_offset(Some(60), None, 5);
        assert_eq!(ages.first, Some(65));
        assert_eq!(ages.second, None);
        assert_eq!(ages.for_assignment(Some("bob"), &ids()), None);
        assert_eq!(ages.for_assignment(None, &ids()), Some(65));
    }

    #[test]
    fn test_ages_saturate_at_extremes() {
        let ages = ClientAges::at_offset(Some(i32::MAX), Some(i32::MIN), 10);
        assert_eq!(ages.first, Some(i32::MAX));
        assert_eq!(ages.second, Some(i32::MIN + 10));
    }
}
