//! Live integration tests for reelhub-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/reelhub-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory.

use reelhub_core::{CategoryFilter, MediaKind, PasswordDigest, SocialLink};
use reelhub_db::{
    create_user, find_user_by_identifier, get_media, get_profile, get_streak, grant_streak,
    increment_view_count, insert_media, list_media_by_kind, list_user_media, search_users,
    streak_count, streak_status, upsert_profile, DbError, NewMedia, ProfileUpdate,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn insert_test_media(
    pool: &sqlx::PgPool,
    file_id: &str,
    user_id: &str,
    category: &str,
    kind: MediaKind,
) {
    insert_media(
        pool,
        NewMedia {
            file_id,
            user_id,
            category,
            description: "test upload",
            is_public: true,
            file_name: "clip.mp4",
            file_url: &format!("https://media.example.com/{file_id}-clip.mp4"),
            kind,
            doc_file_url: None,
            doc_file_name: None,
        },
    )
    .await
    .unwrap_or_else(|e| panic!("insert_test_media failed for '{file_id}': {e}"));
}

fn profile_update<'a>(user_id: &'a str, name: &'a str) -> ProfileUpdate<'a> {
    ProfileUpdate {
        user_id,
        username: "alice",
        name,
        bio: "hello",
        profile_photo_url: None,
        social_links: None,
    }
}

// ---------------------------------------------------------------------------
// Section 1: Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn register_then_sign_in(pool: sqlx::PgPool) {
    let user = create_user(&pool, "alice", None, &PasswordDigest::new("pw1"))
        .await
        .expect("create_user failed");

    let found = find_user_by_identifier(&pool, "alice")
        .await
        .expect("lookup failed")
        .expect("user exists");

    assert_eq!(found.user_id, user.user_id);
    assert!(found.password_matches("pw1"));
    assert!(!found.password_matches("wrong"));
    assert_ne!(found.password_digest, "pw1");
}

#[sqlx::test(migrations = "../../migrations")]
async fn duplicate_username_is_rejected(pool: sqlx::PgPool) {
    create_user(&pool, "alice", None, &PasswordDigest::new("pw1"))
        .await
        .expect("first create failed");

    let err = create_user(&pool, "alice", None, &PasswordDigest::new("pw2"))
        .await
        .expect_err("second create should fail");
    assert!(matches!(err, DbError::UsernameTaken), "got {err:?}");
}

#[sqlx::test(migrations = "../../migrations")]
async fn duplicate_email_is_rejected(pool: sqlx::PgPool) {
    create_user(&pool, "alice", Some("a@example.com"), &PasswordDigest::new("pw"))
        .await
        .expect("first create failed");

    let err = create_user(&pool, "bob", Some("a@example.com"), &PasswordDigest::new("pw"))
        .await
        .expect_err("same email should fail");
    assert!(matches!(err, DbError::EmailTaken), "got {err:?}");
}

#[sqlx::test(migrations = "../../migrations")]
async fn users_without_email_do_not_collide(pool: sqlx::PgPool) {
    create_user(&pool, "alice", None, &PasswordDigest::new("pw"))
        .await
        .expect("alice");
    create_user(&pool, "bob", None, &PasswordDigest::new("pw"))
        .await
        .expect("bob");
}

#[sqlx::test(migrations = "../../migrations")]
async fn sign_in_accepts_email_identifier(pool: sqlx::PgPool) {
    let user = create_user(&pool, "alice", Some("a@example.com"), &PasswordDigest::new("pw"))
        .await
        .expect("create failed");

    let found = find_user_by_identifier(&pool, "a@example.com")
        .await
        .expect("lookup failed")
        .expect("user exists");
    assert_eq!(found.user_id, user.user_id);

    assert!(find_user_by_identifier(&pool, "nobody")
        .await
        .expect("lookup failed")
        .is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn search_is_case_insensitive_substring(pool: sqlx::PgPool) {
    for name in ["Alice", "malice", "bob", "ali_baba"] {
        create_user(&pool, name, None, &PasswordDigest::new("pw"))
            .await
            .expect("create failed");
    }

    let hits = search_users(&pool, "ALI").await.expect("search failed");
    let mut names: Vec<_> = hits.iter().map(|h| h.username.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["Alice", "ali_baba", "malice"]);

    // `_` is not a wildcard.
    let literal = search_users(&pool, "i_b").await.expect("search failed");
    assert_eq!(literal.len(), 1);
    assert_eq!(literal[0].username, "ali_baba");
}

// ---------------------------------------------------------------------------
// Section 2: Profiles
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn profile_upsert_keeps_photo_and_links_when_omitted(pool: sqlx::PgPool) {
    let links = vec![SocialLink {
        name: "Main".to_string(),
        url: "https://x.com/alice".to_string(),
        platform: "twitter".to_string(),
    }];
    upsert_profile(
        &pool,
        ProfileUpdate {
            profile_photo_url: Some("https://media.example.com/p.png"),
            social_links: Some(links.as_slice()),
            ..profile_update("u-1", "Alice")
        },
    )
    .await
    .expect("first upsert failed");

    let row = upsert_profile(&pool, profile_update("u-1", "Alice Liddell"))
        .await
        .expect("second upsert failed");

    assert_eq!(row.name, "Alice Liddell");
    assert_eq!(
        row.profile_photo_url.as_deref(),
        Some("https://media.example.com/p.png")
    );
    assert_eq!(row.social_links.0, links);
}

#[sqlx::test(migrations = "../../migrations")]
async fn profile_detail_uses_registration_time(pool: sqlx::PgPool) {
    let user = create_user(&pool, "alice", None, &PasswordDigest::new("pw"))
        .await
        .expect("create failed");
    upsert_profile(&pool, profile_update(&user.user_id, "Alice"))
        .await
        .expect("upsert failed");

    let detail = get_profile(&pool, &user.user_id)
        .await
        .expect("get failed")
        .expect("profile exists");
    assert_eq!(detail.registered_at, Some(user.registered_at));
    assert_eq!(detail.member_since(), user.registered_at);
    assert!(detail.profile.social_links.0.is_empty());

    assert!(get_profile(&pool, "missing").await.expect("get").is_none());
}

// ---------------------------------------------------------------------------
// Section 3: Media
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn feeds_filter_by_kind_and_category(pool: sqlx::PgPool) {
    insert_test_media(&pool, "v1", "u-1", "comedy", MediaKind::Video).await;
    insert_test_media(&pool, "v2", "u-1", "sports", MediaKind::Video).await;
    insert_test_media(&pool, "i1", "u-2", "comedy", MediaKind::Image).await;

    let comedy = CategoryFilter::from_query(Some("comedy"));
    let reels = list_media_by_kind(&pool, MediaKind::Video, &comedy)
        .await
        .expect("reels");
    assert_eq!(reels.len(), 1);
    assert_eq!(reels[0].file_id, "v1");

    let memes = list_media_by_kind(&pool, MediaKind::Image, &comedy)
        .await
        .expect("memes");
    assert_eq!(memes.len(), 1);
    assert_eq!(memes[0].file_type, "image");

    let all_reels = list_media_by_kind(&pool, MediaKind::Video, &CategoryFilter::Any)
        .await
        .expect("all reels");
    assert_eq!(all_reels.len(), 2);
}

#[sqlx::test(migrations = "../../migrations")]
async fn user_media_is_empty_not_error(pool: sqlx::PgPool) {
    insert_test_media(&pool, "v1", "u-1", "comedy", MediaKind::Video).await;

    let mine = list_user_media(&pool, "u-1", &CategoryFilter::Any)
        .await
        .expect("list");
    assert_eq!(mine.len(), 1);

    let none = list_user_media(&pool, "u-2", &CategoryFilter::Any)
        .await
        .expect("list");
    assert!(none.is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn increment_treats_missing_counter_as_zero(pool: sqlx::PgPool) {
    insert_test_media(&pool, "v1", "u-1", "comedy", MediaKind::Video).await;
    sqlx::query("UPDATE media SET view_count = NULL WHERE file_id = 'v1'")
        .execute(&pool)
        .await
        .expect("null out counter");

    let legacy = get_media(&pool, "v1").await.expect("get").expect("row");
    assert_eq!(legacy.view_count, 0);

    assert_eq!(increment_view_count(&pool, "v1").await.expect("inc"), 1);
    assert_eq!(increment_view_count(&pool, "v1").await.expect("inc"), 2);
}

#[sqlx::test(migrations = "../../migrations")]
async fn increment_of_unknown_id_is_not_found(pool: sqlx::PgPool) {
    let err = increment_view_count(&pool, "ghost")
        .await
        .expect_err("unknown id should fail");
    assert!(matches!(err, DbError::NotFound));
}

// ---------------------------------------------------------------------------
// Section 4: Streak ledger
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn first_grant_creates_ledger_row(pool: sqlx::PgPool) {
    let outcome = grant_streak(&pool, "alice", "bob").await.expect("grant");
    assert!(outcome.granted);
    assert_eq!(outcome.count, 1);

    let row = get_streak(&pool, "alice").await.expect("get").expect("row");
    assert_eq!(row.endorser_ids, vec!["bob".to_string()]);
    assert_eq!(row.count, 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn repeated_grant_leaves_count_unchanged(pool: sqlx::PgPool) {
    grant_streak(&pool, "alice", "bob").await.expect("grant");
    let again = grant_streak(&pool, "alice", "bob").await.expect("regrant");

    assert!(!again.granted);
    assert_eq!(again.count, 1);
    assert_eq!(streak_count(&pool, "alice").await.expect("count"), 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn distinct_endorsers_accumulate(pool: sqlx::PgPool) {
    grant_streak(&pool, "alice", "bob").await.expect("bob");
    let second = grant_streak(&pool, "alice", "carol").await.expect("carol");
    assert_eq!(second.count, 2);

    assert!(streak_status(&pool, "alice", "bob").await.expect("status").has_granted);
    assert!(streak_status(&pool, "alice", "carol").await.expect("status").has_granted);
    let stranger = streak_status(&pool, "alice", "dave").await.expect("status");
    assert!(!stranger.has_granted);
    assert_eq!(stranger.count, 2);
}

#[sqlx::test(migrations = "../../migrations")]
async fn unknown_subject_reads_as_zero(pool: sqlx::PgPool) {
    assert_eq!(streak_count(&pool, "nobody").await.expect("count"), 0);
    let status = streak_status(&pool, "nobody", "bob").await.expect("status");
    assert_eq!(status.count, 0);
    assert!(!status.has_granted);
}

#[sqlx::test(migrations = "../../migrations")]
async fn concurrent_first_grants_are_not_lost(pool: sqlx::PgPool) {
    let endorsers: Vec<String> = (0..8).map(|i| format!("fan-{i}")).collect();
    let grants = endorsers.iter().map(|e| {
        let pool = pool.clone();
        let e = e.clone();
        tokio::spawn(async move { grant_streak(&pool, "star", &e).await })
    });

    for handle in grants.collect::<Vec<_>>() {
        let outcome = handle.await.expect("join").expect("grant");
        assert!(outcome.granted);
    }

    let row = get_streak(&pool, "star").await.expect("get").expect("row");
    assert_eq!(row.count, 8);
    assert_eq!(row.endorser_ids.len(), 8);
}
