//! Contributor identity resolution.
//!
//! The contributor listing is authoritative for who counts. The commit
//! stream only enriches accepted identities with activity.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use github_client::Contributor;

use crate::activity::ActivityRecord;

/// One account from the authoritative contributor listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityRecord {
    pub handle: String,
    pub numeric_id: u64,
    pub contribution_count: u64,
    pub avatar_ref: String,
    pub is_automated: bool,
}

impl From<&Contributor> for IdentityRecord {
    fn from(c: &Contributor) -> Self {
        Self {
            handle: c.login.clone(),
            numeric_id: c.id,
            contribution_count: c.contributions,
            avatar_ref: c.avatar_url.clone(),
            is_automated: is_automated(&c.login),
        }
    }
}

/// Naming heuristic for bot and service accounts.
pub fn is_automated(handle: &str) -> bool {
    handle.contains("[bot]")
        || handle.ends_with("-bot")
        || (handle.ends_with("bot") && handle.contains('['))
}

/// A human identity joined with its commit-stream activity, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedContributor {
    pub identity: IdentityRecord,
    pub activity: Option<ActivityRecord>,
}

#[derive(Debug, Default)]
pub struct Resolution {
    /// Humans, highest contribution count first.
    pub humans: Vec<ResolvedContributor>,
    pub automated: Vec<IdentityRecord>,
    /// Human records accepted by dedup, counted independently of the join.
    pub accepted_humans: usize,
}

/// Dedup the listing by handle and numeric id (first seen wins), split off
/// automated accounts and join humans with their activity by handle.
pub fn resolve(
    identities: &[IdentityRecord],
    activity: &HashMap<String, ActivityRecord>,
) -> Resolution {
    let mut seen_handles: HashSet<&str> = HashSet::new();
    let mut seen_ids: HashSet<u64> = HashSet::new();
    let mut resolution = Resolution::default();

    for record in identities {
        if seen_handles.contains(record.handle.as_str()) || seen_ids.contains(&record.numeric_id) {
            debug!(handle = record.handle.as_str(), id = record.numeric_id, "Skipping duplicate identity");
            continue;
        }
        seen_handles.insert(record.handle.as_str());
        seen_ids.insert(record.numeric_id);

        if record.is_automated {
            resolution.automated.push(record.clone());
            continue;
        }

        resolution.accepted_humans += 1;
        resolution.humans.push(ResolvedContributor {
            identity: record.clone(),
            activity: activity.get(&record.handle).cloned(),
        });
    }

    // Stable: equal counts keep listing order.
    resolution
        .humans
        .sort_by(|a, b| b.identity.contribution_count.cmp(&a.identity.contribution_count));

    resolution
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(handle: &str, id: u64, contributions: u64) -> IdentityRecord {
        IdentityRecord {
            handle: handle.to_string(),
            numeric_id: id,
            contribution_count: contributions,
            avatar_ref: String::new(),
            is_automated: is_automated(handle),
        }
    }

    #[test]
    fn bot_heuristic() {
        assert!(is_automated("dependabot[bot]"));
        assert!(is_automated("github-actions[bot]"));
        assert!(is_automated("renovate-bot"));
        assert!(is_automated("[ci]bot"));
        assert!(!is_automated("abbot"));
        assert!(!is_automated("robotics-dev"));
        assert!(!is_automated("alice"));
    }

    #[test]
    fn duplicate_handle_and_renamed_id_are_dropped() {
        let list = vec![
            identity("alice", 1, 10),
            identity("alice", 2, 99),
            identity("alice-renamed", 1, 5),
            identity("bob", 3, 7),
        ];
        let res = resolve(&list, &HashMap::new());

        let handles: Vec<_> = res.humans.iter().map(|c| c.identity.handle.as_str()).collect();
        assert_eq!(handles, vec!["alice", "bob"]);
        assert_eq!(res.accepted_humans, 2);
    }

    #[test]
    fn automated_accounts_are_separated() {
        let list = vec![identity("alice", 1, 10), identity("ci[bot]", 2, 3)];
        let res = resolve(&list, &HashMap::new());

        assert_eq!(res.humans.len(), 1);
        assert_eq!(res.automated.len(), 1);
        assert_eq!(res.automated[0].handle, "ci[bot]");
        assert!(res.humans.iter().all(|c| !c.identity.handle.contains("[bot]")));
    }

    #[test]
    fn join_attaches_activity_by_handle() {
        let mut activity = HashMap::new();
        activity.insert("bob".to_string(), ActivityRecord::new("bob", "Bob B."));
        // activity for an unlisted handle never surfaces
        activity.insert("mallory".to_string(), ActivityRecord::new("mallory", "M"));

        let list = vec![identity("alice", 1, 10), identity("bob", 2, 4)];
        let res = resolve(&list, &activity);

        assert!(res.humans[0].activity.is_none());
        assert_eq!(
            res.humans[1].activity.as_ref().map(|a| a.display_name.as_str()),
            Some("Bob B.")
        );
        assert_eq!(res.humans.len(), 2);
    }

    #[test]
    fn sort_is_descending_and_stable() {
        let list = vec![
            identity("low", 1, 1),
            identity("tie-first", 2, 5),
            identity("high", 3, 50),
            identity("tie-second", 4, 5),
        ];
        let res = resolve(&list, &HashMap::new());
        let handles: Vec<_> = res.humans.iter().map(|c| c.identity.handle.as_str()).collect();
        assert_eq!(handles, vec!["high", "tie-first", "tie-second", "low"]);
    }

    #[test]
    fn no_duplicate_handles_or_ids_for_any_mix() {
        let mut list = Vec::new();
        for i in 0..40u64 {
            list.push(identity(&format!("user{}", i % 7), i % 11, i));
        }
        let res = resolve(&list, &HashMap::new());

        let handles: HashSet<_> = res.humans.iter().map(|c| c.identity.handle.clone()).collect();
        let ids: HashSet<_> = res.humans.iter().map(|c| c.identity.numeric_id).collect();
        assert_eq!(handles.len(), res.humans.len());
        assert_eq!(ids.len(), res.humans.len());
        assert_eq!(res.accepted_humans, res.humans.len());
    }
}
