//! User seeding functionality.

use std::time::Instant;

use chrono::{Duration, NaiveDate, Utc};
use fake::Fake;
use fake::faker::address::en::CityName;
use fake::faker::name::en::{FirstName, LastName};
use openhouse_core::uid::generate_uid;
use openhouse_models::{Role, StaffKind, User};
use rand::Rng;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::{FACULTIES, SEED_ID_PREFIX, SOURCES};

const STATUSES: &[&str] = &["high_school", "university", "graduated", "teacher", "parent"];

/// Generates student registrations; roughly `attended_ratio` of them have a
/// central check-in during the last day.
pub fn generate_students(count: usize, attended_ratio: f64) -> Vec<User> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let mut rng = rand::thread_rng();
            let mut user = base_user(
                &format!("S{:06}", idx),
                &format!("09{:08}", idx),
                Role::Student,
            );

            let mut interests: Vec<&str> =
                FACULTIES.choose_multiple(&mut rng, 3).copied().collect();
            user.third_interest = interests.pop().map(str::to_string);
            user.second_interest = interests.pop().map(str::to_string);
            user.first_interest = interests.pop().map(str::to_string);
            let source_count = rng.gen_range(1..=3);
            user.selected_sources = SOURCES
                .choose_multiple(&mut rng, source_count)
                .map(|s| s.to_string())
                .collect();
            user.status = STATUSES.choose(&mut rng).map(|s| s.to_string());
            user.province = Some(CityName().fake());
            user.birth_date = NaiveDate::from_ymd_opt(rng.gen_range(2005..=2010), 1, 1);
            if rng.gen_bool(attended_ratio) {
                user.last_entered = Some(Utc::now() - Duration::minutes(rng.gen_range(0..600)));
            }

            user
        })
        .collect()
}

/// Generates staff, a tenth of them central and the rest spread over faculties.
pub fn generate_staff(count: usize) -> Vec<User> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let mut rng = rand::thread_rng();
            let mut user = base_user(
                &format!("T{:06}", idx),
                &format!("08{:08}", idx),
                Role::Staff,
            );

            let kind = if idx % 10 == 0 {
                StaffKind::Central
            } else {
                let faculty = FACULTIES
                    .choose(&mut rng)
                    .copied()
                    .unwrap_or("Engineering");
                StaffKind::Faculty(faculty.to_string())
            };
            let (faculty, is_central_staff) = kind.into_fields();
            user.faculty = faculty;
            user.is_central_staff = is_central_staff;
            user.nickname = Some(FirstName().fake());
            user.year = Some(rng.gen_range(1..=4));

            user
        })
        .collect()
}

fn base_user(suffix: &str, phone: &str, role: Role) -> User {
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();
    let id = format!("{}{}", SEED_ID_PREFIX, suffix);

    User {
        email: Some(format!(
            "{}.{}+{}@example.com",
            first_name.to_lowercase(),
            last_name.to_lowercase(),
            suffix.to_lowercase()
        )),
        id,
        uid: generate_uid(),
        name: format!("{} {}", first_name, last_name),
        phone: phone.to_string(),
        birth_date: None,
        role,
        status: None,
        other_status: None,
        province: None,
        school: None,
        selected_sources: Vec::new(),
        other_source: None,
        first_interest: None,
        second_interest: None,
        third_interest: None,
        objective: None,
        nickname: None,
        student_id: None,
        year: None,
        faculty: None,
        is_central_staff: None,
        registered_at: Some(Utc::now()),
        last_entered: None,
    }
}

/// Inserts users in batches, skipping ids, phones or uids that already exist.
/// Returns the number of inserted rows.
pub async fn insert_users_batch(
    db: &PgPool,
    users: &[User],
) -> Result<u64, Box<dyn std::error::Error>> {
    // 19 params per user
    const BATCH_SIZE: usize = 1_000;

    let mut tx = db.begin().await?;
    let mut inserted = 0;

    for chunk in users.chunks(BATCH_SIZE) {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO users (id, uid, name, email, phone, birth_date, role, status, province, \
             selected_sources, first_interest, second_interest, third_interest, nickname, year, \
             faculty, is_central_staff, registered_at, last_entered) ",
        );
        query.push_values(chunk, |mut row, user| {
            row.push_bind(&user.id)
                .push_bind(&user.uid)
                .push_bind(&user.name)
                .push_bind(&user.email)
                .push_bind(&user.phone)
                .push_bind(user.birth_date)
                .push_bind(user.role.as_str())
                .push_bind(&user.status)
                .push_bind(&user.province)
                .push_bind(&user.selected_sources)
                .push_bind(&user.first_interest)
                .push_bind(&user.second_interest)
                .push_bind(&user.third_interest)
                .push_bind(&user.nickname)
                .push_bind(user.year)
                .push_bind(&user.faculty)
                .push_bind(user.is_central_staff)
                .push_bind(user.registered_at)
                .push_bind(user.last_entered);
        });
        query.push(" ON CONFLICT DO NOTHING");

        inserted += query.build().execute(&mut *tx).await?.rows_affected();
    }

    tx.commit().await?;
    Ok(inserted)
}

/// Deletes every seeded user. Their transactions and evaluations cascade.
pub async fn clear_seeded_users(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded users...");

    let deleted = sqlx::query("DELETE FROM users WHERE id LIKE $1")
        .bind(format!("{}%", SEED_ID_PREFIX))
        .execute(db)
        .await?
        .rows_affected();

    println!(
        "   ✓ Deleted {} users in {:?}",
        deleted,
        start_time.elapsed()
    );

    Ok(deleted)
}
