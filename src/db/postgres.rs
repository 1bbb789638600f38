use async_trait::async_trait;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DatabaseTransaction,
    QueryResult, Statement, TransactionTrait, Value,
};
use std::sync::Arc;
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::db::handle::{ConnectionHandle, CursorHandle};
use crate::error::DbError;

pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens a single PostgreSQL session described by `config`.
///
/// `DATABASE_URL` is used as-is when present; otherwise the discrete
/// settings are assembled into a URL. Failures are logged and returned,
/// never retried.
pub async fn open_connection(config: &DatabaseConfig) -> Result<Connection, DbError> {
    let url = match config.connection_url() {
        Ok(url) => url,
        Err(e) => {
            log::error!("Error connecting to database: {}", e);
            return Err(e);
        }
    };

    let mut opt = ConnectOptions::new(url);
    opt.max_connections(1)
        .min_connections(1)
        .connect_timeout(CONNECT_TIMEOUT)
        .acquire_timeout(CONNECT_TIMEOUT)
        .sqlx_logging(false);

    match Database::connect(opt).await {
        Ok(db) => {
            log::info!("Database connection established successfully");
            Ok(Connection::new(db))
        }
        Err(e) => {
            log::error!("Error connecting to database: {}", e);
            Err(DbError::Connect(e))
        }
    }
}

/// Live session owned by the caller.
///
/// Statements run through a [`Cursor`] inside a transaction that begins with
/// the first cursor and ends on [`commit`](Connection::commit) or
/// [`rollback`](Connection::rollback). Closing without committing discards it.
pub struct Connection {
    db: DatabaseConnection,
    txn: Option<Arc<DatabaseTransaction>>,
}

impl Connection {
    fn new(db: DatabaseConnection) -> Self {
        Self { db, txn: None }
    }

    pub async fn cursor(&mut self) -> Result<Cursor, DbError> {
        let txn = match &self.txn {
            Some(txn) => txn.clone(),
            None => {
                let txn = Arc::new(self.db.begin().await?);
                self.txn = Some(txn.clone());
                txn
            }
        };
        Ok(Cursor { txn })
    }

    pub fn in_transaction(&self) -> bool {
        self.txn.is_some()
    }

    pub async fn commit(&mut self) -> Result<(), DbError> {
        if let Some(txn) = self.take_transaction()? {
            txn.commit().await?;
        }
        Ok(())
    }

    pub async fn rollback(&mut self) -> Result<(), DbError> {
        if let Some(txn) = self.take_transaction()? {
            txn.rollback().await?;
        }
        Ok(())
    }

    pub async fn close(mut self) -> Result<(), DbError> {
        if let Some(txn) = self.take_transaction()? {
            txn.rollback().await?;
        }
        self.db.close().await?;
        Ok(())
    }

    fn take_transaction(&mut self) -> Result<Option<DatabaseTransaction>, DbError> {
        match self.txn.take() {
            None => Ok(None),
            Some(txn) => match Arc::try_unwrap(txn) {
                Ok(txn) => Ok(Some(txn)),
                Err(txn) => {
                    self.txn = Some(txn);
                    Err(DbError::CursorsOpen)
                }
            },
        }
    }
}

#[async_trait]
impl ConnectionHandle for Connection {
    async fn commit(&mut self) -> Result<(), DbError> {
        Connection::commit(self).await
    }

    async fn close(self) -> Result<(), DbError> {
        Connection::close(self).await
    }
}

/// Executes statements in its connection's current transaction.
pub struct Cursor {
    txn: Arc<DatabaseTransaction>,
}

impl Cursor {
    fn statement<I>(&self, sql: &str, values: I) -> Statement
    where
        I: IntoIterator<Item = Value>,
    {
        Statement::from_sql_and_values(self.txn.get_database_backend(), sql, values)
    }

    /// Runs a statement and returns the number of affected rows.
    pub async fn execute<I>(&self, sql: &str, values: I) -> Result<u64, DbError>
    where
        I: IntoIterator<Item = Value>,
    {
        let result = self.txn.execute(self.statement(sql, values)).await?;
        Ok(result.rows_affected())
    }

    pub async fn fetch_one<I>(&self, sql: &str, values: I) -> Result<Option<QueryResult>, DbError>
    where
        I: IntoIterator<Item = Value>,
    {
        Ok(self.txn.query_one(self.statement(sql, values)).await?)
    }

    pub async fn fetch_all<I>(&self, sql: &str, values: I) -> Result<Vec<QueryResult>, DbError>
    where
        I: IntoIterator<Item = Value>,
    {
        Ok(self.txn.query_all(self.statement(sql, values)).await?)
    }

    pub async fn close(self) -> Result<(), DbError> {
        drop(self.txn);
        Ok(())
    }
}

#[async_trait]
impl CursorHandle for Cursor {
    async fn close(self) -> Result<(), DbError> {
        Cursor::close(self).await
    }
}
