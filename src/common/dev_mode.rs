// src/common/dev_mode.rs
//! Local-only sign-in bypass: every request acts as one fixed user

use chrono::Utc;
use std::env;
use tracing::{info, warn};

use crate::auth::models::{Role, User};

const DEV_USER_ID: &str = "U_DEV000";
const DEFAULT_EMAIL: &str = "dev@test.com";
const DEFAULT_NAME: &str = "Dev User";

#[derive(Debug, Clone)]
pub struct DevModeConfig {
    pub enabled: bool,
    pub user_email: String,
    pub user_name: String,
    pub user_is_admin: bool,
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// `--dev` switches the bypass on and `--prod` off; the first flag wins
pub fn dev_flag_from_args<I>(args: I) -> Option<bool>
where
    I: IntoIterator<Item = String>,
{
    args.into_iter().find_map(|arg| match arg.as_str() {
        "--dev" => Some(true),
        "--prod" => Some(false),
        _ => None,
    })
}

impl DevModeConfig {
    /// Reads `DEV_MODE`, `DEV_USER_EMAIL`, `DEV_USER_NAME` and `DEV_USER_IS_ADMIN`
    pub fn from_env() -> Self {
        Self {
            enabled: env_flag("DEV_MODE"),
            user_email: env::var("DEV_USER_EMAIL").unwrap_or_else(|_| DEFAULT_EMAIL.to_string()),
            user_name: env::var("DEV_USER_NAME").unwrap_or_else(|_| DEFAULT_NAME.to_string()),
            user_is_admin: env_flag("DEV_USER_IS_ADMIN"),
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            user_email: DEFAULT_EMAIL.to_string(),
            user_name: DEFAULT_NAME.to_string(),
            user_is_admin: false,
        }
    }

    /// Command-line flags take precedence over the environment
    pub fn with_args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        if let Some(enabled) = dev_flag_from_args(args) {
            info!(enabled, "Dev mode set from command line");
            self.enabled = enabled;
        }
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn log_status(&self) {
        if self.enabled {
            warn!(
                email = %self.user_email,
                is_admin = self.user_is_admin,
                "Dev mode enabled: authentication is bypassed, never run this in production"
            );
        } else {
            info!("Authentication required");
        }
    }

    pub fn create_dev_user(&self) -> User {
        let now = Utc::now().to_rfc3339();

        User {
            id: DEV_USER_ID.to_string(),
            email: self.user_email.clone(),
            full_name: Some(self.user_name.clone()),
            role: if self.user_is_admin { Role::Admin } else { Role::User },
            email_verified: true,
            provider: Some("dev".to_string()),
            provider_id: Some(DEV_USER_ID.to_string()),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn test_dev_user_is_stable() {
        let config = DevModeConfig {
            enabled: true,
            user_email: "finder@campus.edu".to_string(),
            user_name: "Finder".to_string(),
            user_is_admin: true,
        };

        let first = config.create_dev_user();
        let second = config.create_dev_user();
        assert_eq!(first.id, second.id);
        assert_eq!(first.email, "finder@campus.edu");
        assert_eq!(first.role, Role::Admin);
    }

    #[test]
    fn test_disabled_config() {
        let config = DevModeConfig::disabled();
        assert!(!config.is_enabled());
        assert_eq!(config.create_dev_user().role, Role::User);
    }

    #[test]
    fn test_command_line_flags() {
        assert_eq!(dev_flag_from_args(args(&["campus-lost-found"])), None);
        assert_eq!(dev_flag_from_args(args(&["bin", "--dev"])), Some(true));
        assert_eq!(dev_flag_from_args(args(&["bin", "--prod", "--dev"])), Some(false));

        let config = DevModeConfig::disabled().with_args(args(&["bin", "--dev"]));
        assert!(config.is_enabled());

        let unchanged = DevModeConfig::disabled().with_args(args(&["bin", "--verbose"]));
        assert!(!unchanged.is_enabled());
    }
}
