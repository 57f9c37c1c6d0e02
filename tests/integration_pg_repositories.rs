//! Postgres repository behaviour. Needs `DATABASE_URL`; run with
//! `cargo test -- --ignored`.

use chrono::{NaiveDate, TimeDelta, TimeZone, Utc};
use openhouse::modules::dashboard::repository::{DashboardRepository, PgDashboardRepository};
use openhouse::modules::users::repository::{PgUserRepository, UserRepository};
use openhouse::modules::users::transaction_repository::{
    PgStudentTransactionRepository, StudentTransactionRepository,
};
use openhouse::openhouse_core::ServiceError;
use openhouse::openhouse_models::{Role, StudentTransaction, User, UserDraft, UserPatch};
use sqlx::PgPool;

fn user(id: &str, phone: &str, uid: &str) -> User {
    UserDraft {
        id: id.to_string(),
        name: format!("User {}", id),
        email: format!("{}@example.com", id.to_lowercase()),
        phone: phone.to_string(),
        first_interest: Some("Engineering".to_string()),
        ..UserDraft::default()
    }
    .into_user(
        Role::Student,
        uid.to_string(),
        Utc.with_ymd_and_hms(2025, 1, 10, 3, 0, 0).unwrap(),
    )
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs DATABASE_URL"]
async fn test_create_rejects_duplicate_phone(pool: PgPool) {
    let repo = PgUserRepository::new(pool);
    repo.create(&user("S1", "0810000001", "AB00000001"))
        .await
        .unwrap();

    let err = repo
        .create(&user("S2", "0810000001", "AB00000002"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::DuplicateUser(_)));
    assert!(repo.uid_exists("AB00000001").await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs DATABASE_URL"]
async fn test_mark_entered_is_conditional(pool: PgPool) {
    let repo = PgUserRepository::new(pool);
    repo.create(&user("S1", "0810000001", "AB00000001"))
        .await
        .unwrap();

    let day_start = Utc.with_ymd_and_hms(2025, 1, 10, 17, 0, 0).unwrap();
    let now = day_start + TimeDelta::hours(9);

    assert!(repo.mark_entered("S1", now, day_start).await.unwrap());
    assert!(
        !repo
            .mark_entered("S1", now + TimeDelta::minutes(1), day_start)
            .await
            .unwrap()
    );

    let next_day = day_start + TimeDelta::days(1);
    assert!(
        repo.mark_entered("S1", next_day + TimeDelta::hours(1), next_day)
            .await
            .unwrap()
    );
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs DATABASE_URL"]
async fn test_apply_patch_keeps_absent_fields(pool: PgPool) {
    let repo = PgUserRepository::new(pool);
    repo.create(&user("S1", "0810000001", "AB00000001"))
        .await
        .unwrap();

    let patched = repo
        .apply_patch(
            "S1",
            &UserPatch {
                nickname: Some("Chai".to_string()),
                selected_sources: Some(vec!["Facebook".to_string()]),
                ..UserPatch::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(patched.nickname.as_deref(), Some("Chai"));
    assert_eq!(patched.name, "User S1");
    assert_eq!(patched.selected_sources, vec!["Facebook".to_string()]);
    assert!(
        repo.apply_patch("missing", &UserPatch::default())
            .await
            .unwrap()
            .is_none()
    );
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "needs DATABASE_URL"]
async fn test_one_transaction_per_faculty_and_day(pool: PgPool) {
    let users = PgUserRepository::new(pool.clone());
    let transactions = PgStudentTransactionRepository::new(pool.clone());
    let dashboard = PgDashboardRepository::new(pool);
    users
        .create(&user("S1", "0810000001", "AB00000001"))
        .await
        .unwrap();

    let day = NaiveDate::from_ymd_opt(2025, 1, 11).unwrap();
    let at = Utc.with_ymd_and_hms(2025, 1, 11, 2, 0, 0).unwrap();

    let first = StudentTransaction::new("S1", "Engineering", at, day);
    let second = StudentTransaction::new("S1", "Engineering", at + TimeDelta::hours(1), day);
    assert!(transactions.insert_for_day(&first).await.unwrap());
    assert!(!transactions.insert_for_day(&second).await.unwrap());

    let rows = transactions
        .find_by_student_and_faculty("S1", "Engineering")
        .await
        .unwrap();
    assert_eq!(rows, vec![first]);

    let counts = dashboard.faculty_counts_on(day).await.unwrap();
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].count, 1);

    let interests = dashboard.faculty_interests().await.unwrap();
    assert_eq!(interests[0].faculty, "Engineering");
    assert_eq!(interests[0].first_interest, 1);
}
