use std::fmt;

use sea_orm::{DbErr, RuntimeErr};
use sqlx::postgres::PgDatabaseError;
use thiserror::Error;

/// Diagnostic fields reported by Postgres for a failed statement
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PgDiagnostics {
    pub code: String,
    pub message: String,
    pub hint: Option<String>,
    pub detail: Option<String>,
    pub data_type: Option<String>,
    pub constraint: Option<String>,
    pub line: Option<usize>,
    pub position: Option<String>,
    pub routine: Option<String>,
}

impl PgDiagnostics {
    fn from_pg(err: &PgDatabaseError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.message().to_string(),
            hint: err.hint().map(str::to_string),
            detail: err.detail().map(str::to_string),
            data_type: err.data_type().map(str::to_string),
            constraint: err.constraint().map(str::to_string),
            line: err.line(),
            position: err.position().map(|p| format!("{:?}", p)),
            routine: err.routine().map(str::to_string),
        }
    }
}

impl fmt::Display for PgDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) {}", self.code, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, ". Hint: {}", hint)?;
        }
        if let Some(detail) = &self.detail {
            write!(f, " (detail: {})", detail)?;
        }
        if let Some(data_type) = &self.data_type {
            write!(f, " (type: {})", data_type)?;
        }
        if let Some(constraint) = &self.constraint {
            write!(f, " (constraint: {})", constraint)?;
        }
        if let Some(routine) = &self.routine {
            write!(
                f,
                " where: line {} position {} in routine {}",
                self.line.map(|l| l.to_string()).unwrap_or_else(|| "?".into()),
                self.position.as_deref().unwrap_or("?"),
                routine
            )?;
        }
        Ok(())
    }
}

/// Error type for database operations
#[derive(Debug, Error)]
pub enum DbError {
    /// Statement rejected by Postgres, with its diagnostics
    #[error("Postgres error {diagnostics}")]
    Postgres {
        diagnostics: PgDiagnostics,
        #[source]
        source: DbErr,
    },
    /// Error from SeaORM
    #[error("Database error: {0}")]
    SeaOrmError(DbErr),
    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),
    /// Query error
    #[error("Query error: {0}")]
    QueryError(String),
}

impl DbError {
    /// Postgres diagnostics, when the failure came from the server
    pub fn diagnostics(&self) -> Option<&PgDiagnostics> {
        match self {
            DbError::Postgres { diagnostics, .. } => Some(diagnostics),
            _ => None,
        }
    }
}

fn postgres_diagnostics(err: &DbErr) -> Option<PgDiagnostics> {
    let runtime = match err {
        DbErr::Conn(e) | DbErr::Exec(e) | DbErr::Query(e) => e,
        _ => return None,
    };
    match runtime {
        RuntimeErr::SqlxError(sqlx::Error::Database(db_err)) => db_err
            .try_downcast_ref::<PgDatabaseError>()
            .map(PgDiagnostics::from_pg),
        _ => None,
    }
}

impl From<DbErr> for DbError {
    fn from(err: DbErr) -> Self {
        match postgres_diagnostics(&err) {
            Some(diagnostics) => DbError::Postgres {
                diagnostics,
                source: err,
            },
            None => DbError::SeaOrmError(err),
        }
    }
}
