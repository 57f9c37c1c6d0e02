//! # Open House CLI
//!
//! Out-of-band administration for the Open House API: privileged account
//! provisioning and fake data seeding for development.
//!
//! ## Usage
//!
//! ```ignore
//! use openhouse_cli::{admin, seeder::{self, SeedConfig}};
//!
//! admin::promote_admin(&pool, "0812345678").await?;
//! seeder::seed_all(&pool, SeedConfig::new(200, 20)).await?;
//! ```

pub mod admin;
pub mod seeder;
