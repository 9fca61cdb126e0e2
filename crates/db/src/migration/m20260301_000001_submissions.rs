//! Submissions migration.
//!
//! Creates the submissions table holding one immutable record per accepted
//! submission together with its file manifest.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(SUBMISSIONS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS submissions CASCADE;")
            .await?;
        Ok(())
    }
}

const SUBMISSIONS_SQL: &str = r"
-- One row per accepted submission; rows are never updated or deleted
CREATE TABLE submissions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    project TEXT NOT NULL,
    message TEXT NOT NULL,
    files JSONB NOT NULL DEFAULT '[]'::jsonb,
    date TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_files_is_array CHECK (jsonb_typeof(files) = 'array'),
    CONSTRAINT chk_files_max_five CHECK (jsonb_array_length(files) <= 5)
);

-- Index for looking up a submitter's history
CREATE INDEX idx_submissions_email ON submissions(email, date DESC);

-- Index for chronological listing
CREATE INDEX idx_submissions_date ON submissions(date DESC);
";
