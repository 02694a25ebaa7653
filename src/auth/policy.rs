//! Decides which signed-in users are administrators

use std::collections::HashSet;

use super::models::Role;

pub trait AuthorizationPolicy: Send + Sync {
    fn is_admin(&self, email: &str) -> bool;

    fn role_for(&self, email: &str) -> Role {
        if self.is_admin(email) {
            Role::Admin
        } else {
            Role::User
        }
    }
}

/// Admins are the emails listed in `ADMIN_EMAILS` (case-insensitive)
#[derive(Debug, Clone, Default)]
pub struct AdminAllowList {
    emails: HashSet<String>,
}

impl AdminAllowList {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            emails: emails
                .into_iter()
                .map(|e| e.as_ref().trim().to_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }
}

impl AuthorizationPolicy for AdminAllowList {
    fn is_admin(&self, email: &str) -> bool {
        self.emails.contains(&email.trim().to_lowercase())
    }
}

impl<F> AuthorizationPolicy for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_admin(&self, email: &str) -> bool {
        self(email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_allow_list_is_case_insensitive() {
        let policy = AdminAllowList::new(["Admin@Campus.edu", " "]);
        assert!(!policy.is_admin(""));
        assert!(policy.is_admin("admin@campus.edu"));
        assert!(policy.is_admin("ADMIN@CAMPUS.EDU"));
        assert!(!policy.is_admin("student@campus.edu"));
        assert_eq!(policy.role_for("admin@campus.edu"), Role::Admin);
        assert_eq!(policy.role_for("student@campus.edu"), Role::User);
    }

    #[test]
    fn test_closure_policy() {
        let policy: Arc<dyn AuthorizationPolicy> =
            Arc::new(|email: &str| email.ends_with("@staff.campus.edu"));
        assert!(policy.is_admin("desk@staff.campus.edu"));
        assert!(!policy.is_admin("desk@campus.edu"));
    }
}
