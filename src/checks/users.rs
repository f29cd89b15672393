//! User account checks.

use super::slots::{USERS, USER_NUMBER_ONE};
use crate::audit::{Action, Check, CheckDescriptor, Markup, Registry, Score};
use crate::error::Result;
use crate::report::ReportId;
use crate::runner::ScoringContext;

const UNAVAILABLE: &str = "The user list is unavailable.";

/// Total number of accounts.
pub struct UsersCountAll;

impl UsersCountAll {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "users_count_all",
        name: "UsersCountAll",
        key: "SiteAuditCheckUsersCountAll",
        report: ReportId::Users,
        label: "Count All",
        description: "Total number of Drupal users.",
    };
}

impl Check for UsersCountAll {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        let users = cx.site().users()?;
        let empty = users.total == 0;
        cx.set(&USERS, users);
        Ok(if empty { Score::Warn } else { Score::Info })
    }

    fn result_info(&self, registry: &Registry) -> Option<String> {
        let users = registry.get(&USERS)?;
        Some(match users.total {
            1 => "There is one user.".to_string(),
            n => format!("There are {} users.", n),
        })
    }

    fn result_warn(&self, _registry: &Registry) -> Option<String> {
        Some("There are no users!".to_string())
    }
}

/// Number of blocked accounts.
pub struct UsersCountBlocked;

impl UsersCountBlocked {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "users_count_blocked",
        name: "UsersCountBlocked",
        key: "SiteAuditCheckUsersCountBlocked",
        report: ReportId::Users,
        label: "Count Blocked",
        description: "Total number of blocked Drupal users.",
    };
}

impl Check for UsersCountBlocked {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        cx.require(&USERS, "users_count_all")?;
        Ok(Score::Info)
    }

    fn result_info(&self, registry: &Registry) -> Option<String> {
        let Some(users) = registry.get(&USERS) else {
            return Some(UNAVAILABLE.to_string());
        };
        Some(match users.blocked {
            0 => "There are no blocked users.".to_string(),
            1 => "There is one blocked user.".to_string(),
            n => format!("There are {} blocked users.", n),
        })
    }
}

/// Roles and how many accounts hold them.
pub struct UsersRolesList;

impl UsersRolesList {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "users_roles_list",
        name: "UsersRolesList",
        key: "SiteAuditCheckUsersRolesList",
        report: ReportId::Users,
        label: "List Roles",
        description: "Show all available roles and user counts.",
    };
}

impl Check for UsersRolesList {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        cx.require(&USERS, "users_count_all")?;
        Ok(Score::Info)
    }

    fn result_info(&self, registry: &Registry) -> Option<String> {
        let Some(users) = registry.get(&USERS) else {
            return Some(UNAVAILABLE.to_string());
        };
        if users.roles.is_empty() {
            return Some("There are no roles.".to_string());
        }
        let rows: Vec<(String, String)> = users
            .roles
            .iter()
            .map(|(role, count)| (role.clone(), count.to_string()))
            .collect();
        Some(Markup::new(registry.options().html).key_value_list("Role", "Users", &rows))
    }
}

/// The uid 1 account.
pub struct UsersWhoIsNumberOne;

impl UsersWhoIsNumberOne {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "users_who_is_number_one",
        name: "UsersWhoIsNumberOne",
        key: "SiteAuditCheckUsersWhoIsNumberOne",
        report: ReportId::Users,
        label: "Identify UID #1",
        description: "Show username and email of UID #1.",
    };
}

impl Check for UsersWhoIsNumberOne {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        let Some(users) = cx.require(&USERS, "users_count_all")? else {
            return Ok(Score::Info);
        };
        let Some(number_one) = users.number_one.clone() else {
            return Ok(Score::Fail);
        };
        cx.set(&USER_NUMBER_ONE, number_one);
        Ok(Score::Info)
    }

    fn result_fail(&self, _registry: &Registry) -> Option<String> {
        Some("UID #1 does not exist! This is a serious problem.".to_string())
    }

    fn result_info(&self, registry: &Registry) -> Option<String> {
        let Some(user) = registry.get(&USER_NUMBER_ONE) else {
            return Some(UNAVAILABLE.to_string());
        };
        Some(format!("UID #1: {}, email: {}", user.name, user.email))
    }

    fn action(&self, score: Score, _registry: &Registry) -> Option<Action> {
        (score == Score::Fail).then(|| {
            Action::text("Restore the UID #1 account; core and many extensions assume it exists.")
        })
    }
}

/// Whether the uid 1 account is blocked.
pub struct UsersBlockedNumberOne;

impl UsersBlockedNumberOne {
    const DESCRIPTOR: CheckDescriptor = CheckDescriptor {
        id: "users_blocked_number_one",
        name: "UsersBlockedNumberOne",
        key: "SiteAuditCheckUsersBlockedNumberOne",
        report: ReportId::Users,
        label: "UID #1 access",
        description: "Determine if UID #1 is blocked.",
    };
}

impl Check for UsersBlockedNumberOne {
    fn descriptor(&self) -> &CheckDescriptor {
        &Self::DESCRIPTOR
    }

    fn calculate_score(&self, cx: &mut ScoringContext<'_>) -> Result<Score> {
        if let Some(user) = cx.require(&USER_NUMBER_ONE, "users_who_is_number_one")? {
            return Ok(if user.blocked { Score::Pass } else { Score::Warn });
        }
        // No account, or no user list at all.
        Ok(if cx.get(&USERS).is_some() {
            Score::Fail
        } else {
            Score::Info
        })
    }

    fn result_pass(&self, _registry: &Registry) -> Option<String> {
        Some("UID #1 is blocked, as recommended.".to_string())
    }

    fn result_warn(&self, _registry: &Registry) -> Option<String> {
        Some("UID #1 should be blocked, but is not.".to_string())
    }

    fn result_fail(&self, _registry: &Registry) -> Option<String> {
        Some("UID #1 does not exist! This is a serious problem.".to_string())
    }

    fn result_info(&self, _registry: &Registry) -> Option<String> {
        Some(UNAVAILABLE.to_string())
    }

    fn action(&self, score: Score, _registry: &Registry) -> Option<Action> {
        (score == Score::Warn).then(|| {
            Action::text("Block UID #1 and give administrators their own accounts with the appropriate roles.")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::testing::engine_for;
    use crate::site::SiteSnapshot;

    fn users(yaml: &str) -> SiteSnapshot {
        SiteSnapshot::from_yaml(yaml).unwrap()
    }

    #[test]
    fn counts_are_informational() {
        let mut engine = engine_for(users("users:\n  total: 42\n  blocked: 3\n"));
        let all = engine.result("users_count_all").unwrap();
        assert_eq!(all.score, Score::Info);
        assert_eq!(all.result, "There are 42 users.");
        let blocked = engine.result("users_count_blocked").unwrap();
        assert_eq!(blocked.score, Score::Info);
        assert_eq!(blocked.result, "There are 3 blocked users.");
    }

    #[test]
    fn no_users_warns() {
        let mut engine = engine_for(users("users:\n  total: 0\n"));
        assert_eq!(engine.score("users_count_all").unwrap(), Score::Warn);
    }

    #[test]
    fn number_one_is_reported() {
        let mut engine = engine_for(users(
            "users:\n  total: 2\n  number_one:\n    name: admin\n    email: admin@example.com\n",
        ));
        let result = engine.result("users_who_is_number_one").unwrap();
        assert_eq!(result.score, Score::Info);
        assert_eq!(result.result, "UID #1: admin, email: admin@example.com");
    }

    #[test]
    fn unblocked_number_one_warns() {
        let mut engine = engine_for(users(
            "users:\n  total: 2\n  number_one:\n    name: admin\n",
        ));
        let result = engine.result("users_blocked_number_one").unwrap();
        assert_eq!(result.score, Score::Warn);
        assert!(!result.action.is_empty());
        // Resolved through its producer chain.
        assert!(engine.is_scored("users_who_is_number_one"));
        assert!(engine.is_scored("users_count_all"));
    }

    #[test]
    fn blocked_number_one_passes() {
        let mut engine = engine_for(users(
            "users:\n  total: 2\n  number_one:\n    name: admin\n    blocked: true\n",
        ));
        assert_eq!(engine.score("users_blocked_number_one").unwrap(), Score::Pass);
    }

    #[test]
    fn missing_number_one_fails() {
        let mut engine = engine_for(users("users:\n  total: 2\n"));
        assert_eq!(engine.score("users_who_is_number_one").unwrap(), Score::Fail);
        assert_eq!(engine.score("users_blocked_number_one").unwrap(), Score::Fail);
    }

    #[test]
    fn roles_are_listed_with_counts() {
        let mut engine = engine_for(users(
            "users:\n  total: 12\n  roles:\n    editor: 4\n    administrator: 2\n",
        ));
        let result = engine.result("users_roles_list").unwrap();
        assert_eq!(result.score, Score::Info);
        assert_eq!(result.result, "Role: Users\nadministrator: 2\neditor: 4");
    }

    #[test]
    fn no_roles_is_reported() {
        let mut engine = engine_for(users("users:\n  total: 1\n"));
        let result = engine.result("users_roles_list").unwrap();
        assert_eq!(result.result, "There are no roles.");
    }

    #[test]
    fn missing_user_section_is_info() {
        let mut engine = engine_for(SiteSnapshot::default());
        assert_eq!(engine.score("users_blocked_number_one").unwrap(), Score::Info);
        let blocked = engine.result("users_count_blocked").unwrap();
        assert_eq!(blocked.result, UNAVAILABLE);
    }
}
