use clap::{Parser, Subcommand};
use dialoguer::{Confirm, Input};
use dotenvy::dotenv;
use openhouse_cli::admin;
use openhouse_cli::seeder::{self, SeedConfig};
use sqlx::PgPool;

#[derive(Parser)]
#[command(name = "openhouse-cli")]
#[command(about = "Open House CLI - Administrative tools for the Open House API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grant the admin role to a registered user
    PromoteAdmin {
        /// Phone number the user registered with (prompted if omitted)
        phone: Option<String>,
    },
    /// Return an admin to the member role
    RevokeAdmin {
        /// Phone number of the admin
        phone: String,
    },
    /// List every admin account
    ListAdmins,
    /// Apply pending database migrations
    Migrate,
    /// Seed the database with fake students and staff
    Seed {
        /// Number of students to create
        #[arg(short = 's', long, default_value = "200")]
        students: usize,

        /// Number of staff to create
        #[arg(short = 't', long, default_value = "20")]
        staff: usize,

        /// Share of students marked as checked in
        #[arg(long, default_value = "0.5")]
        attended: f64,
    },
    /// Remove all seeded users
    ClearSeed {
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let cli = Cli::parse();

    let pool = match openhouse_db::init_db_pool().await {
        Ok(pool) => pool,
        Err(e) => fail("connecting to the database", e),
    };

    match cli.command {
        Commands::PromoteAdmin { phone } => handle_promote_admin(&pool, phone).await,
        Commands::RevokeAdmin { phone } => handle_revoke_admin(&pool, &phone).await,
        Commands::ListAdmins => handle_list_admins(&pool).await,
        Commands::Migrate => handle_migrate(&pool).await,
        Commands::Seed {
            students,
            staff,
            attended,
        } => handle_seed(&pool, students, staff, attended).await,
        Commands::ClearSeed { yes } => handle_clear_seed(&pool, yes).await,
    }
}

fn fail(action: &str, error: impl std::fmt::Display) -> ! {
    eprintln!("\n❌ Error {}: {}", action, error);
    std::process::exit(1);
}

async fn handle_promote_admin(pool: &PgPool, phone: Option<String>) {
    let phone = match phone {
        Some(phone) => phone,
        None => match Input::<String>::new().with_prompt("Phone").interact_text() {
            Ok(phone) => phone,
            Err(e) => fail("reading phone", e),
        },
    };

    match admin::promote_admin(pool, &phone).await {
        Ok(Some(user)) => {
            println!("\n✅ Admin role granted!");
            println!("   Id: {}", user.id);
            println!("   Name: {}", user.name);
        }
        Ok(None) => fail("promoting admin", format!("no user with phone {}", phone)),
        Err(e) => fail("promoting admin", e),
    }
}

async fn handle_revoke_admin(pool: &PgPool, phone: &str) {
    match admin::revoke_admin(pool, phone).await {
        Ok(Some(user)) => println!("✅ {} ({}) is now a member", user.name, user.phone),
        Ok(None) => fail("revoking admin", format!("no admin with phone {}", phone)),
        Err(e) => fail("revoking admin", e),
    }
}

async fn handle_list_admins(pool: &PgPool) {
    match admin::list_admins(pool).await {
        Ok(admins) if admins.is_empty() => println!("No admins found."),
        Ok(admins) => {
            for user in admins {
                println!("{:<16} {:<12} {}", user.id, user.phone, user.name);
            }
        }
        Err(e) => fail("listing admins", e),
    }
}

async fn handle_migrate(pool: &PgPool) {
    match openhouse_db::run_migrations(pool).await {
        Ok(()) => println!("✅ Migrations applied"),
        Err(e) => fail("running migrations", e),
    }
}

async fn handle_seed(pool: &PgPool, students: usize, staff: usize, attended: f64) {
    let config = SeedConfig::new(students, staff).with_attended_ratio(attended);

    if let Err(e) = seeder::seed_all(pool, config).await {
        fail("seeding database", e);
    }
}

async fn handle_clear_seed(pool: &PgPool, yes: bool) {
    if !yes {
        let confirmed = Confirm::new()
            .with_prompt("Delete all seeded users?")
            .default(false)
            .interact()
            .unwrap_or(false);
        if !confirmed {
            println!("Aborted.");
            return;
        }
    }

    if let Err(e) = seeder::clear_seeded_users(pool).await {
        fail("clearing seed data", e);
    }
}
