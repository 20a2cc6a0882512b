//! Offline maintenance commands run against the live database.
//!
//! ```text
//! playscore-maintenance bulk-approve-evaluations
//! playscore-maintenance user-integrity [--fix]
//! playscore-maintenance restore-user <email>
//! playscore-maintenance verify-admin-email <email>
//! ```
//!
//! Every command connects using `DATABASE_URL` and exits non-zero on
//! failure so it can run under cron or CI.

use std::process::ExitCode;

use playscore_core::roles::{ROLE_ADMIN, ROLE_PLAYER};
use playscore_db::repositories::{EvaluationRepo, RoleRepo, UserRepo};
use playscore_db::DbPool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "Usage:
  playscore-maintenance bulk-approve-evaluations
  playscore-maintenance user-integrity [--fix]
  playscore-maintenance restore-user <email>
  playscore-maintenance verify-admin-email <email>";

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "playscore_maintenance=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        eprintln!("{USAGE}");
        return ExitCode::FAILURE;
    };

    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("DATABASE_URL must be set");
            return ExitCode::FAILURE;
        }
    };
    let pool = match playscore_db::create_pool(&database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("Failed to connect to database: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match command.as_str() {
        "bulk-approve-evaluations" => bulk_approve(&pool).await,
        "user-integrity" => user_integrity(&pool, args.iter().any(|a| a == "--fix")).await,
        "restore-user" => match args.get(1) {
            Some(email) => restore_user(&pool, email).await,
            None => {
                eprintln!("restore-user requires an email argument");
                return ExitCode::FAILURE;
            }
        },
        "verify-admin-email" => match args.get(1) {
            Some(email) => verify_admin_email(&pool, email).await,
            None => {
                eprintln!("verify-admin-email requires an email argument");
                return ExitCode::FAILURE;
            }
        },
        other => {
            eprintln!("Unknown command '{other}'\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Approve every unflagged evaluation with review text still awaiting
/// moderation. Safe to re-run.
async fn bulk_approve(pool: &DbPool) -> Result<(), sqlx::Error> {
    let approved = EvaluationRepo::bulk_approve_reviewed(pool).await?;
    println!("Approved {approved} evaluation(s)");
    Ok(())
}

/// Report (and optionally repair) account integrity problems.
async fn user_integrity(pool: &DbPool, fix: bool) -> Result<(), sqlx::Error> {
    let findings = UserRepo::integrity_scan(pool).await?;
    if findings.is_empty() {
        println!("No integrity problems found");
        return Ok(());
    }

    for finding in &findings {
        println!(
            "user {} <{}>: {}",
            finding.user_id, finding.email, finding.problem
        );
    }
    println!("{} problem(s) found", findings.len());

    if fix {
        let fixed = UserRepo::integrity_fix(pool, ROLE_PLAYER).await?;
        println!("Applied {fixed} repair(s)");
    } else {
        println!("Re-run with --fix to repair");
    }
    Ok(())
}

/// Restore a soft-deleted account back to active.
async fn restore_user(pool: &DbPool, email: &str) -> Result<(), sqlx::Error> {
    let restored = UserRepo::restore(pool, email).await?;
    if restored {
        println!("Restored {email}");
        Ok(())
    } else {
        eprintln!("No deleted account with email {email}");
        Err(sqlx::Error::RowNotFound)
    }
}

/// Stamp `email_verified_at` for an admin account.
async fn verify_admin_email(pool: &DbPool, email: &str) -> Result<(), sqlx::Error> {
    let user = UserRepo::find_by_email(pool, email)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;

    let roles = RoleRepo::names_for_user(pool, user.id).await?;
    if !roles.iter().any(|r| r == ROLE_ADMIN) {
        eprintln!("{email} is not an admin account");
        return Err(sqlx::Error::RowNotFound);
    }

    let stamped = UserRepo::mark_email_verified(pool, email).await?;
    if stamped {
        println!("Verified {email}");
    } else {
        println!("{email} was already verified");
    }
    Ok(())
}
