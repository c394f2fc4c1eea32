//! Schema setup and teardown from the crate's `migrations/` and `cleanup/`
//! script directories.

use sqlx::PgPool;
use std::fs;
use std::path::{Path, PathBuf};

/// A directory of numbered SQL scripts and the order they must run in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptSet {
    /// Creates types, tables and indexes; oldest script first.
    Migrations,
    /// Drops them again; newest script first.
    Cleanup,
}

impl ScriptSet {
    pub fn dir(self) -> PathBuf {
        let name = match self {
            ScriptSet::Migrations => "migrations",
            ScriptSet::Cleanup => "cleanup",
        };
        Path::new(env!("CARGO_MANIFEST_DIR")).join(name)
    }

    /// `.sql` files of the set, in execution order.
    pub fn scripts(self) -> Result<Vec<PathBuf>, sqlx::Error> {
        let mut scripts: Vec<PathBuf> = fs::read_dir(self.dir())
            .map_err(sqlx::Error::Io)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "sql"))
            .collect();
        scripts.sort();
        if self == ScriptSet::Cleanup {
            scripts.reverse();
        }
        Ok(scripts)
    }
}

/// Creates the letter registry schema. Scripts are idempotent, so this may
/// run against an existing schema.
///
/// ```rust,no_run
/// # async fn example(pool: &sqlx::PgPool) -> Result<(), sqlx::Error> {
/// letter_registry_postgres::repository::db_init::init_database(pool).await?;
/// # Ok(())
/// # }
/// ```
pub async fn init_database(pool: &PgPool) -> Result<(), sqlx::Error> {
    run_scripts(pool, ScriptSet::Migrations).await
}

/// Drops every table and type of the schema, including issued counters.
pub async fn cleanup_database(pool: &PgPool) -> Result<(), sqlx::Error> {
    run_scripts(pool, ScriptSet::Cleanup).await
}

async fn run_scripts(pool: &PgPool, set: ScriptSet) -> Result<(), sqlx::Error> {
    for script in set.scripts()? {
        let sql = fs::read_to_string(&script).map_err(sqlx::Error::Io)?;
        tracing::debug!(?set, script = %script.display(), "running schema script");
        sqlx::raw_sql(&sql).execute(pool).await?;
    }
    Ok(())
}
