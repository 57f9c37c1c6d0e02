//! Privileged account provisioning.
//!
//! Admins are never granted through the public registration endpoints
//! unless their phone is listed in `ADMIN_PHONES`; this module is the
//! explicit provisioning path for everyone else.

use openhouse_models::Role;
use sqlx::PgPool;

/// The user affected by a role change.
#[derive(Debug, sqlx::FromRow)]
pub struct AdminSummary {
    pub id: String,
    pub name: String,
    pub phone: String,
}

/// Grants the admin role to the user registered with `phone`.
///
/// Returns `None` when no user has that phone.
pub async fn promote_admin(
    db: &PgPool,
    phone: &str,
) -> Result<Option<AdminSummary>, Box<dyn std::error::Error>> {
    let summary = sqlx::query_as::<_, AdminSummary>(
        "UPDATE users SET role = $1 WHERE phone = $2 RETURNING id, name, phone",
    )
    .bind(Role::Admin.as_str())
    .bind(phone.trim())
    .fetch_optional(db)
    .await?;

    Ok(summary)
}

/// Returns an admin to the member role.
pub async fn revoke_admin(
    db: &PgPool,
    phone: &str,
) -> Result<Option<AdminSummary>, Box<dyn std::error::Error>> {
    let summary = sqlx::query_as::<_, AdminSummary>(
        "UPDATE users SET role = $1 WHERE phone = $2 AND role = $3 RETURNING id, name, phone",
    )
    .bind(Role::Member.as_str())
    .bind(phone.trim())
    .bind(Role::Admin.as_str())
    .fetch_optional(db)
    .await?;

    Ok(summary)
}

pub async fn list_admins(db: &PgPool) -> Result<Vec<AdminSummary>, Box<dyn std::error::Error>> {
    let admins = sqlx::query_as::<_, AdminSummary>(
        "SELECT id, name, phone FROM users WHERE role = $1 ORDER BY name",
    )
    .bind(Role::Admin.as_str())
    .fetch_all(db)
    .await?;

    Ok(admins)
}
