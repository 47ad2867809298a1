//! Tolerant matching of address natural keys.

use time::{Duration, OffsetDateTime};
use user_addresses_sdk::{Address, AddressKey};

/// Compares address keys allowing a bounded difference on `valid_from`.
///
/// `user_id` and `address_type` must be equal; `valid_from` may differ by at
/// most the tolerance, in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMatcher {
    tolerance: Duration,
}

impl KeyMatcher {
    #[must_use]
    pub fn new(tolerance: std::time::Duration) -> Self {
        Self {
            tolerance: Duration::try_from(tolerance).unwrap_or(Duration::MAX),
        }
    }

    #[must_use]
    pub fn tolerance(&self) -> Duration {
        self.tolerance
    }

    fn distance(a: OffsetDateTime, b: OffsetDateTime) -> Duration {
        (a - b).abs()
    }

    #[must_use]
    pub fn matches(&self, a: &AddressKey, b: &AddressKey) -> bool {
        a.user_id == b.user_id
            && a.address_type == b.address_type
            && Self::distance(a.valid_from, b.valid_from) <= self.tolerance
    }

    /// The candidate whose key matches `target` with the smallest
    /// `valid_from` distance. Ties go to the earlier candidate.
    #[must_use]
    pub fn closest<'a>(&self, target: &AddressKey, candidates: &'a [Address]) -> Option<&'a Address> {
        candidates
            .iter()
            .filter(|c| self.matches(target, &c.key))
            .min_by_key(|c| Self::distance(target.valid_from, c.key.valid_from))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use time::macros::datetime;
    use user_addresses_sdk::{Address, AddressFields, AddressKey, AddressType};

    use super::KeyMatcher;

    fn key(address_type: AddressType, valid_from: time::OffsetDateTime) -> AddressKey {
        AddressKey {
            user_id: 1,
            address_type,
            valid_from,
        }
    }

    fn stored(k: AddressKey) -> Address {
        Address {
            key: k,
            fields: AddressFields::default(),
            created_at: k.valid_from,
            updated_at: k.valid_from,
        }
    }

    #[test]
    fn tolerance_is_inclusive_in_both_directions() {
        let m = KeyMatcher::new(Duration::from_millis(1000));
        let base = key(AddressType::Home, datetime!(2024-01-01 0:00:01 UTC));
        assert!(m.matches(&base, &key(AddressType::Home, datetime!(2024-01-01 0:00:02 UTC))));
        assert!(m.matches(&base, &key(AddressType::Home, datetime!(2024-01-01 0:00:00 UTC))));
        assert!(!m.matches(
            &base,
            &key(AddressType::Home, datetime!(2024-01-01 0:00:02.001 UTC))
        ));
    }

    #[test]
    fn type_and_user_must_be_equal() {
        let m = KeyMatcher::new(Duration::from_secs(60));
        let base = key(AddressType::Home, datetime!(2024-01-01 0:00 UTC));
        assert!(!m.matches(&base, &key(AddressType::Work, datetime!(2024-01-01 0:00 UTC))));
        let other_user = AddressKey { user_id: 2, ..base };
        assert!(!m.matches(&base, &other_user));
    }

    #[test]
    fn closest_candidate_wins() {
        let m = KeyMatcher::new(Duration::from_millis(1000));
        let candidates = vec![
            stored(key(AddressType::Home, datetime!(2024-01-01 0:00:00.900 UTC))),
            stored(key(AddressType::Home, datetime!(2024-01-01 0:00:00.100 UTC))),
            stored(key(AddressType::Home, datetime!(2024-01-01 0:00:05 UTC))),
        ];
        let target = key(AddressType::Home, datetime!(2024-01-01 0:00 UTC));
        let found = m.closest(&target, &candidates).unwrap();
        assert_eq!(found.key.valid_from, datetime!(2024-01-01 0:00:00.100 UTC));

        let far = key(AddressType::Home, datetime!(2024-01-01 0:00:03 UTC));
        assert!(m.closest(&far, &candidates).is_none());
    }

    #[test]
    fn zero_tolerance_is_exact() {
        let m = KeyMatcher::new(Duration::ZERO);
        let base = key(AddressType::Post, datetime!(2024-01-01 0:00 UTC));
        assert!(m.matches(&base, &base));
        assert!(!m.matches(
            &base,
            &key(AddressType::Post, datetime!(2024-01-01 0:00:00.001 UTC))
        ));
    }
}
