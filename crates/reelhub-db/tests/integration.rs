//! Offline unit tests for reelhub-db pool configuration and row types.
//! These tests do not require a live database connection.

use chrono::Utc;
use reelhub_core::{AppConfig, Environment, PasswordDigest, StorageConfig};
use reelhub_db::{PoolConfig, ProfileDetailRow, ProfileRow, StreakRow, UserRow};
use sqlx::types::Json;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

fn app_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 4000),
        log_level: "info".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        storage: StorageConfig {
            bucket: "bucket".to_string(),
            region: "us-east-1".to_string(),
            access_key_id: None,
            secret_access_key: None,
            endpoint: None,
            public_base_url: "https://bucket.s3.us-east-1.amazonaws.com".to_string(),
        },
        max_upload_bytes: 1024,
        view_batch_size: 10,
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let pool_config = PoolConfig::from_app_config(&app_config());
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

#[test]
fn user_row_checks_password_against_digest() {
    let digest = PasswordDigest::new("pw1");
    let row = UserRow {
        user_id: "u-1".to_string(),
        username: "alice".to_string(),
        email: None,
        password_digest: digest.digest,
        password_salt: digest.salt,
        registered_at: Utc::now(),
    };

    assert!(row.password_matches("pw1"));
    assert!(!row.password_matches("pw2"));
}

#[test]
fn streak_row_exposes_endorsement_set() {
    let row = StreakRow {
        subject_id: "alice".to_string(),
        endorser_ids: vec!["bob".to_string(), "carol".to_string()],
        count: 2,
        updated_at: Utc::now(),
    };

    let status = row.endorsements().status("carol");
    assert_eq!(status.count, 2);
    assert!(status.has_granted);
}

#[test]
fn profile_without_user_dates_from_profile_creation() {
    let created_at = Utc::now();
    let detail = ProfileDetailRow {
        profile: ProfileRow {
            user_id: "u-1".to_string(),
            username: "alice".to_string(),
            name: String::new(),
            bio: String::new(),
            profile_photo_url: None,
            social_links: Json(Vec::new()),
            created_at,
            updated_at: created_at,
        },
        registered_at: None,
    };

    assert_eq!(detail.member_since(), created_at);
}
