// src/common/migrations.rs
//! Database migration and schema management

use sqlx::SqlitePool;
use std::env;
use tracing::{info, warn};

/// Run all database migrations
///
/// Tables are created when missing. Existing rows are kept unless
/// `RESET_DB=true`, in which case every table is dropped first.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let should_reset_db = env::var("RESET_DB").unwrap_or_else(|_| "false".to_string()) == "true";

    if should_reset_db {
        warn!("⚠️  RESET_DB=true - Dropping all tables and recreating schema...");
        drop_all_tables(pool).await?;
        info!("✅ Dropped old tables");
    } else {
        info!("ℹ️  Skipping table drop (RESET_DB not set). Tables will be created if they don't exist.");
    }

    create_user_tables(pool).await?;
    create_item_tables(pool).await?;
    create_claim_tables(pool).await?;
    create_indexes(pool).await?;

    info!("✅ Database migration completed successfully!");

    Ok(())
}

async fn drop_all_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Children before parents
    let tables = ["claims", "lost_items", "found_items", "users"];

    for table in tables {
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", table))
            .execute(pool)
            .await?;
    }

    Ok(())
}

async fn create_user_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            email TEXT UNIQUE NOT NULL,
            full_name TEXT,
            role TEXT NOT NULL DEFAULT 'user' CHECK (role IN ('admin', 'user')),
            email_verified INTEGER NOT NULL DEFAULT 0,
            provider TEXT,
            provider_id TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_item_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS found_items (
            id TEXT PRIMARY KEY,
            item_type TEXT NOT NULL,
            description TEXT NOT NULL,
            location_found TEXT NOT NULL,
            date_found TEXT NOT NULL,
            picture_url TEXT,
            submitted_to_office INTEGER NOT NULL DEFAULT 0,
            found_by TEXT NOT NULL,
            reporter_name TEXT NOT NULL,
            reporter_email TEXT NOT NULL,
            reporter_phone TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'reported'
                CHECK (status IN ('reported', 'submitted', 'claim submitted', 'claimed')),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS lost_items (
            id TEXT PRIMARY KEY,
            item_name TEXT NOT NULL,
            item_type TEXT NOT NULL,
            description TEXT NOT NULL,
            location TEXT NOT NULL,
            date_lost TEXT NOT NULL,
            picture_urls TEXT NOT NULL DEFAULT '[]',
            proof_url TEXT,
            reporter_name TEXT NOT NULL,
            reporter_email TEXT NOT NULL,
            reporter_phone TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'reported'
                CHECK (status IN ('reported', 'not_found', 'found', 'claimed')),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_claim_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS claims (
            id TEXT PRIMARY KEY,
            item_id TEXT NOT NULL,
            claimant_email TEXT NOT NULL,
            details TEXT NOT NULL,
            item_images TEXT NOT NULL DEFAULT '[]',
            claimant_image TEXT NOT NULL,
            purchase_receipt TEXT NOT NULL,
            item_type TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'pending'
                CHECK (status IN ('pending', 'approved', 'rejected')),
            extra_info TEXT NOT NULL DEFAULT '{}',
            reviewed_by TEXT,
            reviewed_at TEXT,
            created_at TEXT NOT NULL,
            FOREIGN KEY(item_id) REFERENCES found_items(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_indexes(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_found_items_type ON found_items(item_type)",
        "CREATE INDEX IF NOT EXISTS idx_found_items_status ON found_items(status)",
        "CREATE INDEX IF NOT EXISTS idx_found_items_created ON found_items(created_at)",
        "CREATE INDEX IF NOT EXISTS idx_lost_items_status ON lost_items(status)",
        "CREATE INDEX IF NOT EXISTS idx_lost_items_created ON lost_items(created_at)",
        "CREATE INDEX IF NOT EXISTS idx_claims_item ON claims(item_id)",
        "CREATE INDEX IF NOT EXISTS idx_claims_status ON claims(status)",
        "CREATE INDEX IF NOT EXISTS idx_claims_created ON claims(created_at)",
    ];

    for statement in indexes {
        sqlx::query(statement).execute(pool).await?;
    }

    Ok(())
}
