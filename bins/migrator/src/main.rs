//! Schema runner for the intake metadata store.
//!
//! Applies the `submissions` table migration: one immutable row per
//! accepted submission, with its file manifest as a JSONB array capped at
//! five entries. Connection comes from `DATABASE_URL` (a `.env` file is
//! honored).
//!
//! Commands (from `sea-orm-migration`): `up`, `down`, `status`, `fresh`,
//! `refresh`, `reset`.

use intake_db::migration::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    cli::run_cli(Migrator).await;
}
