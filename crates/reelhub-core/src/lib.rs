pub mod app_config;
pub mod config;
pub mod credentials;
pub mod media;
pub mod profiles;
pub mod streak;
pub mod views;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, StorageConfig};
pub use config::{load_app_config, load_app_config_from_env};
pub use credentials::PasswordDigest;
pub use media::{parse_visibility, CategoryFilter, MediaKind, ALL_CATEGORIES};
pub use profiles::{account_age_days, parse_social_links, SocialLink, MAX_SOCIAL_LINKS};
pub use streak::{validate_grant, EndorsementSet, GrantOutcome, StreakStatus};
pub use views::{increment_many, IncrementOutcome, IncrementResult, IncrementSummary};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid social links: {0}")]
    InvalidSocialLinks(String),
    #[error("users cannot give a streak to their own profile")]
    SelfEndorsement,
    #[error("{0} is required")]
    EmptyIdentifier(&'static str),
}
