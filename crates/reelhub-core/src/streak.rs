//! Streaks: one-time, non-revocable endorsements of a profile by other users.
//!
//! The persisted record keeps the endorsers in grant order; only distinct
//! endorsers count, so `count == endorsers.len()` always holds.

use serde::Serialize;

use crate::CoreError;

/// Result of a grant attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantOutcome {
    pub count: i64,
    /// `false` when the endorser had already granted; the count is unchanged.
    pub granted: bool,
}

/// Read-only view of one endorser's relation to a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakStatus {
    pub count: i64,
    pub has_granted: bool,
}

/// Check the preconditions of a grant before touching storage.
///
/// Returns the trimmed `(subject, endorser)` pair; callers store those, never the raw input.
///
/// # Errors
///
/// Returns [`CoreError::EmptyIdentifier`] if either id is blank, or
/// [`CoreError::SelfEndorsement`] if a user tries to endorse themselves.
pub fn validate_grant<'a>(
    subject_id: &'a str,
    endorser_id: &'a str,
) -> Result<(&'a str, &'a str), CoreError> {
    let subject_id = subject_id.trim();
    let endorser_id = endorser_id.trim();
    if subject_id.is_empty() {
        return Err(CoreError::EmptyIdentifier("profileUserId"));
    }
    if endorser_id.is_empty() {
        return Err(CoreError::EmptyIdentifier("watchUserId"));
    }
    if subject_id == endorser_id {
        return Err(CoreError::SelfEndorsement);
    }
    Ok((subject_id, endorser_id))
}

/// The distinct endorsers of a single subject.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndorsementSet {
    endorsers: Vec<String>,
}

impl EndorsementSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a grant from `endorser_id`.
    pub fn grant(&mut self, endorser_id: &str) -> GrantOutcome {
        let granted = !self.contains(endorser_id);
        if granted {
            self.endorsers.push(endorser_id.to_string());
        }
        GrantOutcome {
            count: self.count(),
            granted,
        }
    }

    #[must_use]
    pub fn contains(&self, endorser_id: &str) -> bool {
        self.endorsers.iter().any(|e| e == endorser_id)
    }

    #[must_use]
    pub fn count(&self) -> i64 {
        i64::try_from(self.endorsers.len()).unwrap_or(i64::MAX)
    }

    #[must_use]
    pub fn status(&self, endorser_id: &str) -> StreakStatus {
        StreakStatus {
            count: self.count(),
            has_granted: self.contains(endorser_id),
        }
    }

    #[must_use]
    pub fn endorsers(&self) -> &[String] {
        &self.endorsers
    }
}

impl From<Vec<String>> for EndorsementSet {
    /// Builds a set from stored ids, dropping any repeated entries.
    fn from(ids: Vec<String>) -> Self {
        let mut set = Self::new();
        for id in ids {
            set.grant(&id);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_grant_creates_count_of_one() {
        let mut set = EndorsementSet::new();
        assert_eq!(
            set.grant("bob"),
            GrantOutcome {
                count: 1,
                granted: true
            }
        );
    }

    #[test]
    fn repeated_grant_is_idempotent() {
        let mut set = EndorsementSet::new();
        set.grant("bob");
        let again = set.grant("bob");
        assert!(!again.granted);
        assert_eq!(again.count, 1);
        assert_eq!(set.endorsers(), ["bob".to_string()]);
    }

    #[test]
    fn distinct_endorsers_accumulate() {
        let mut set = EndorsementSet::new();
        set.grant("bob");
        let second = set.grant("carol");
        assert_eq!(second.count, 2);
        assert!(set.status("bob").has_granted);
        assert!(set.status("carol").has_granted);
        assert!(!set.status("dave").has_granted);
    }

    #[test]
    fn empty_set_reports_zero() {
        let set = EndorsementSet::new();
        assert_eq!(
            set.status("anyone"),
            StreakStatus {
                count: 0,
                has_granted: false
            }
        );
    }

    #[test]
    fn from_stored_ids_drops_duplicates() {
        let set = EndorsementSet::from(vec![
            "bob".to_string(),
            "carol".to_string(),
            "bob".to_string(),
        ]);
        assert_eq!(set.count(), 2);
    }

    #[test]
    fn self_grant_is_rejected() {
        assert!(matches!(
            validate_grant("alice", "alice"),
            Err(CoreError::SelfEndorsement)
        ));
    }

    #[test]
    fn blank_ids_are_rejected() {
        assert!(matches!(
            validate_grant("", "bob"),
            Err(CoreError::EmptyIdentifier("profileUserId"))
        ));
        assert!(matches!(
            validate_grant("alice", "  "),
            Err(CoreError::EmptyIdentifier("watchUserId"))
        ));
        assert!(validate_grant("alice", "bob").is_ok());
    }

    #[test]
    fn padded_ids_are_trimmed_before_comparison() {
        assert_eq!(
            validate_grant(" alice ", "bob\t").expect("distinct users"),
            ("alice", "bob")
        );
        assert!(matches!(
            validate_grant("alice", " alice"),
            Err(CoreError::SelfEndorsement)
        ));
    }

    #[test]
    fn outcome_serializes_camel_case() {
        let json = serde_json::to_value(StreakStatus {
            count: 3,
            has_granted: true,
        })
        .expect("serialize");
        assert_eq!(json["hasGranted"], true);
        assert_eq!(json["count"], 3);
    }
}
