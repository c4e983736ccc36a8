use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::infrastructure::persistence::error::DbError;
use crate::utils::logging;

/// Upper bound on pooled connections; one per concurrent chain task plus the report
const MAX_CONNECTIONS: u32 = 4;

/// Manages database connection pool
pub struct DbPool {
    connection: DatabaseConnection,
}

impl DbPool {
    /// Creates a new database connection pool
    pub async fn new(database_url: &str) -> Result<Self, DbError> {
        logging::log_database_connection_details(database_url);

        let mut options = ConnectOptions::new(database_url.to_string());
        options.max_connections(MAX_CONNECTIONS).sqlx_logging(false);

        match Database::connect(options).await {
            Ok(connection) => {
                logging::log_info("Database connection established successfully");
                Ok(DbPool { connection })
            }
            Err(e) => {
                logging::log_error(&format!("Failed to connect to database: {}", e));
                Err(DbError::ConnectionError(format!(
                    "Failed to connect to database: {}",
                    e
                )))
            }
        }
    }

    /// Returns the database connection
    pub fn get_connection(&self) -> &DatabaseConnection {
        &self.connection
    }
}
