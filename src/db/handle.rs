use async_trait::async_trait;

use crate::error::DbError;

#[async_trait]
pub trait CursorHandle: Send {
    async fn close(self) -> Result<(), DbError>;
}

#[async_trait]
pub trait ConnectionHandle: Send {
    async fn commit(&mut self) -> Result<(), DbError>;

    async fn close(self) -> Result<(), DbError>;
}

/// Releases `cursor`, then commits and releases `conn`. Either may be absent.
/// A failed commit still releases `conn` before the commit error is returned.
///
/// The cursor must be gone before the commit: a connection refuses to commit
/// while cursors over its transaction are still alive.
pub async fn close_connection<C, K>(conn: Option<C>, cursor: Option<K>) -> Result<(), DbError>
where
    C: ConnectionHandle,
    K: CursorHandle,
{
    if let Some(cursor) = cursor {
        cursor.close().await?;
    }
    if let Some(mut conn) = conn {
        let committed = conn.commit().await;
        let closed = conn.close().await;
        if let Err(e) = committed {
            log::error!("Error committing before close: {}", e);
            return Err(e);
        }
        closed?;
        log::info!("Database connection closed");
    }
    Ok(())
}
