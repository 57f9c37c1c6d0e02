//! Fake data seeding for local development and dashboard demos.
//!
//! Seeded users carry ids prefixed with [`SEED_ID_PREFIX`] so they can be
//! removed again without touching real registrations.

mod users;

use std::time::Instant;

use sqlx::PgPool;

pub use users::{clear_seeded_users, generate_staff, generate_students, insert_users_batch};

pub const SEED_ID_PREFIX: &str = "SEED-";

/// Faculties used for interests and staff assignment.
pub const FACULTIES: &[&str] = &[
    "Engineering",
    "Medicine",
    "Science",
    "Arts",
    "Law",
    "Economics",
    "Architecture",
    "Education",
    "Pharmaceutical Sciences",
    "Communication Arts",
];

pub const SOURCES: &[&str] = &["Facebook", "Instagram", "TikTok", "X", "Friends", "School"];

/// How many users to seed.
#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub students: usize,
    pub staff: usize,
    /// Share of students marked as centrally checked in, `0.0..=1.0`
    pub attended_ratio: f64,
}

impl SeedConfig {
    pub fn new(students: usize, staff: usize) -> Self {
        Self {
            students,
            staff,
            attended_ratio: 0.5,
        }
    }

    pub fn with_attended_ratio(mut self, ratio: f64) -> Self {
        self.attended_ratio = ratio.clamp(0.0, 1.0);
        self
    }
}

/// Seeds students and staff in one run.
pub async fn seed_all(db: &PgPool, config: SeedConfig) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!(
        "🌱 Seeding {} students and {} staff...",
        config.students, config.staff
    );

    let mut users = generate_students(config.students, config.attended_ratio);
    users.extend(generate_staff(config.staff));

    let inserted = insert_users_batch(db, &users).await?;

    println!(
        "   ✓ Inserted {} users in {:?} ({} already present)",
        inserted,
        start_time.elapsed(),
        users.len() as u64 - inserted
    );

    Ok(inserted)
}
