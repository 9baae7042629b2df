//! Sequential batch execution over a member snapshot.
//!
//! Bulk operations take a point-in-time member list, filter it with a
//! predicate, and apply one action per surviving member. Failures never
//! abort the run: each is recorded in iteration order and reported back
//! to the operator in aggregate. Members are processed strictly one at a
//! time so outbound requests stay inside the platform's per-action rate
//! limits; a concurrent variant would need its own rate-limiting gate.

use std::future::Future;

use twilight_model::guild::Member;
use twilight_model::id::{
    Id,
    marker::{RoleMarker, UserMarker},
};

use crate::parse::parse_role_id;

/// Who a bulk operation applies to.
///
/// Resolved once from the operator argument, before the member loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    Everyone,
    Role(Id<RoleMarker>),
}

impl Target {
    /// Parse an operator-supplied target: the literal `everyone` or a role.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("everyone") || trimmed == "@everyone" {
            return Some(Self::Everyone);
        }

        parse_role_id(trimmed).map(Self::Role)
    }

    /// Whether a member holding `roles` falls inside this target.
    pub fn includes(&self, roles: &[Id<RoleMarker>]) -> bool {
        match self {
            Self::Everyone => true,
            Self::Role(role_id) => roles.contains(role_id),
        }
    }
}

/// Point-in-time projection of a guild member.
///
/// Taken once before a batch run; membership changes during the loop are
/// not observed.
#[derive(Clone, Debug)]
pub struct MemberSnapshot {
    pub user_id: Id<UserMarker>,
    pub display_name: String,
    pub bot: bool,
    pub roles: Vec<Id<RoleMarker>>,
}

impl From<&Member> for MemberSnapshot {
    fn from(member: &Member) -> Self {
        Self {
            user_id: member.user.id,
            display_name: member
                .nick
                .clone()
                .unwrap_or_else(|| member.user.name.clone()),
            bot: member.user.bot,
            roles: member.roles.clone(),
        }
    }
}

/// How a single per-member action failed.
#[derive(Clone, Debug)]
pub enum BatchError {
    /// Expected failure: missing authorization, closed DMs, rate limiting.
    /// Reported with a fixed human-readable reason.
    Refused(&'static str),
    /// Anything else; the message is interpolated into the report.
    Other(String),
}

/// One recorded failure. Order matches snapshot iteration order and
/// duplicates are never collapsed.
#[derive(Clone, Debug)]
pub struct BatchFailure {
    pub user_id: Id<UserMarker>,
    pub display_name: String,
    pub reason: String,
}

/// Run `action` over every snapshot member accepted by `predicate` and
/// collect the failures.
pub async fn run_batch<P, A, Fut>(
    snapshot: &[MemberSnapshot],
    predicate: P,
    mut action: A,
) -> Vec<BatchFailure>
where
    P: Fn(&MemberSnapshot) -> bool,
    A: FnMut(MemberSnapshot) -> Fut,
    Fut: Future<Output = Result<(), BatchError>>,
{
    let mut failures = Vec::new();

    for member in snapshot {
        if !predicate(member) {
            continue;
        }

        if let Err(error) = action(member.clone()).await {
            let reason = match error {
                BatchError::Refused(reason) => reason.to_owned(),
                BatchError::Other(message) => format!("Unexpected failure: `{message}`"),
            };

            failures.push(BatchFailure {
                user_id: member.user_id,
                display_name: member.display_name.clone(),
                reason,
            });
        }
    }

    failures
}

/// Map an HTTP request failure onto the two batch failure tiers.
///
/// 403 and 429 responses are the expected tier; everything else carries
/// its own message.
pub fn classify_http_failure(source: twilight_http::Error, refused: &'static str) -> BatchError {
    use twilight_http::error::ErrorType;

    match source.kind() {
        ErrorType::Response { status, .. } if status.get() == 403 || status.get() == 429 => {
            BatchError::Refused(refused)
        }
        _ => BatchError::Other(source.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn snapshot_member(id: u64, bot: bool, roles: &[u64]) -> MemberSnapshot {
        MemberSnapshot {
            user_id: Id::new(id),
            display_name: format!("member-{id}"),
            bot,
            roles: roles.iter().copied().map(Id::new).collect(),
        }
    }

    #[tokio::test]
    async fn action_runs_once_per_surviving_member() {
        let snapshot = vec![
            snapshot_member(1, false, &[]),
            snapshot_member(2, true, &[]),
            snapshot_member(3, false, &[]),
            snapshot_member(4, true, &[]),
            snapshot_member(5, false, &[]),
        ];

        let calls = Cell::new(0_usize);
        let failures = run_batch(
            &snapshot,
            |member| !member.bot,
            |_member| {
                calls.set(calls.get() + 1);
                async { Ok(()) }
            },
        )
        .await;

        // Five members, two excluded by the predicate.
        assert_eq!(calls.get(), 3);
        assert!(failures.is_empty());
    }

    #[tokio::test]
    async fn failures_are_isolated_ordered_and_bounded() {
        let snapshot = vec![
            snapshot_member(1, false, &[]),
            snapshot_member(2, false, &[]),
            snapshot_member(3, false, &[]),
        ];

        let failures = run_batch(
            &snapshot,
            |_member| true,
            |member| async move {
                match member.user_id.get() {
                    1 => Err(BatchError::Refused("no permission")),
                    3 => Err(BatchError::Other("boom".to_owned())),
                    _ => Ok(()),
                }
            },
        )
        .await;

        assert!(failures.len() <= snapshot.len());
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].user_id.get(), 1);
        assert_eq!(failures[0].reason, "no permission");
        assert_eq!(failures[1].user_id.get(), 3);
        assert_eq!(failures[1].reason, "Unexpected failure: `boom`");
    }

    #[tokio::test]
    async fn role_target_filters_the_snapshot() {
        let target = Target::parse("<@&50>").unwrap();
        let snapshot = vec![
            snapshot_member(1, false, &[50]),
            snapshot_member(2, false, &[60]),
            snapshot_member(3, false, &[40, 50]),
        ];

        let calls = Cell::new(0_usize);
        run_batch(
            &snapshot,
            |member| !member.bot && target.includes(&member.roles),
            |_member| {
                calls.set(calls.get() + 1);
                async { Ok(()) }
            },
        )
        .await;

        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn target_parses_everyone_and_roles() {
        assert_eq!(Target::parse("everyone"), Some(Target::Everyone));
        assert_eq!(Target::parse("Everyone"), Some(Target::Everyone));
        assert_eq!(Target::parse("@everyone"), Some(Target::Everyone));
        assert_eq!(Target::parse("<@&77>"), Some(Target::Role(Id::new(77))));
        assert_eq!(Target::parse("77"), Some(Target::Role(Id::new(77))));
        assert_eq!(Target::parse("<@77>"), None);
        assert_eq!(Target::parse("someone"), None);
    }
}
