//! Cross-referencing first contributions with labeled issues

use crate::models::{ContributorFirstCommit, LabeledIssue, MatchResult};

/// Pair every contribution with every issue its contributor is assigned to.
///
/// Identities compare by exact, case-sensitive equality. A contributor
/// assigned to several issues yields one match per issue. Output follows
/// contribution order first, then issue order.
pub fn cross_reference(
    contributions: &[ContributorFirstCommit],
    issues: &[LabeledIssue],
) -> Vec<MatchResult> {
    let mut matches = Vec::new();
    for contribution in contributions {
        for issue in issues {
            if issue.is_assigned_to(&contribution.contributor) {
                matches.push(MatchResult {
                    contribution: contribution.clone(),
                    issue: issue.clone(),
                });
            }
        }
    }
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CommitRecord;

    fn contribution(who: &str, hash: &str) -> ContributorFirstCommit {
        ContributorFirstCommit {
            contributor: who.to_string(),
            commit: CommitRecord::new(hash, Some(who)),
        }
    }

    fn issue(title: &str, assignees: &[&str]) -> LabeledIssue {
        LabeledIssue {
            title: title.to_string(),
            assignees: assignees.iter().map(|a| a.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_single_match() {
        let matches = cross_reference(
            &[contribution("A", "h1"), contribution("B", "h2")],
            &[issue("T1", &["A"])],
        );
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].contribution.contributor, "A");
        assert_eq!(matches[0].issue.title, "T1");
    }

    #[test]
    fn test_multiple_issues_per_contributor_kept() {
        let matches = cross_reference(
            &[contribution("A", "h1"), contribution("B", "h2")],
            &[issue("T1", &["A", "B"]), issue("T2", &["A"]), issue("T3", &[])],
        );
        let got: Vec<(&str, &str)> = matches
            .iter()
            .map(|m| (m.contribution.contributor.as_str(), m.issue.title.as_str()))
            .collect();
        assert_eq!(got, [("A", "T1"), ("A", "T2"), ("B", "T1")]);
    }

    #[test]
    fn test_case_sensitive() {
        let matches = cross_reference(&[contribution("alice", "h1")], &[issue("T", &["Alice"])]);
        assert!(matches.is_empty());
    }

    #[test]
    fn test_empty_inputs() {
        assert!(cross_reference(&[], &[issue("T", &["A"])]).is_empty());
        assert!(cross_reference(&[contribution("A", "h1")], &[]).is_empty());
    }
}
