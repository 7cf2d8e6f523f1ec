use log::info;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio_rusqlite::Connection;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] tokio_rusqlite::Error),
    #[error("Database connection error: {0}")]
    Connection(String),
}

/// One logged relay exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRecord {
    pub id: i64,
    pub user_input: String,
    pub bot_response: String,
    pub model_used: String,
}

/// Handle to the chat log. Cloning shares the same SQLite connection thread.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Connection>,
}

impl Database {
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;

        let db = Self {
            conn: Arc::new(conn),
        };
        db.initialize().await?;
        Ok(db)
    }

    pub async fn in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;

        let db = Self {
            conn: Arc::new(conn),
        };
        db.initialize().await?;
        Ok(db)
    }

    async fn initialize(&self) -> Result<(), DatabaseError> {
        self.conn
            .call(|conn| {
                conn.execute_batch(
                    "CREATE TABLE IF NOT EXISTS chats (
                        id INTEGER PRIMARY KEY AUTOINCREMENT,
                        user_input TEXT NOT NULL,
                        bot_response TEXT NOT NULL,
                        model_used TEXT NOT NULL
                    );",
                )?;
                Ok(())
            })
            .await?;

        info!("Chat log initialized");
        Ok(())
    }

    /// Appends one exchange and returns its row id.
    pub async fn save_chat(
        &self,
        user_input: String,
        bot_response: String,
        model_used: String,
    ) -> Result<i64, DatabaseError> {
        let id = self
            .conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO chats (user_input, bot_response, model_used) VALUES (?1, ?2, ?3)",
                    [&user_input, &bot_response, &model_used],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;

        Ok(id)
    }

    /// Most recent exchanges first, at most `limit` rows.
    pub async fn recent_chats(&self, limit: i64) -> Result<Vec<ChatRecord>, DatabaseError> {
        let result = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, user_input, bot_response, model_used
                     FROM chats
                     ORDER BY id DESC
                     LIMIT ?",
                )?;

                let rows = stmt.query_map([limit], |row| {
                    Ok(ChatRecord {
                        id: row.get(0)?,
                        user_input: row.get(1)?,
                        bot_response: row.get(2)?,
                        model_used: row.get(3)?,
                    })
                })?;

                let mut chats = Vec::new();
                for row in rows {
                    chats.push(row?);
                }

                Ok(chats)
            })
            .await?;

        Ok(result)
    }

    pub async fn count_chats(&self) -> Result<i64, DatabaseError> {
        let count = self
            .conn
            .call(|conn| {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM chats", [], |row| row.get(0))?;
                Ok(count)
            })
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_and_recent_order() {
        let db = Database::in_memory().await.unwrap();
        for i in 0..3 {
            db.save_chat(format!("q{}", i), format!("a{}", i), "gpt4".to_string())
                .await
                .unwrap();
        }

        let chats = db.recent_chats(20).await.unwrap();
        let inputs: Vec<&str> = chats.iter().map(|c| c.user_input.as_str()).collect();
        assert_eq!(inputs, vec!["q2", "q1", "q0"]);
        assert!(chats[0].id > chats[1].id);
    }

    #[tokio::test]
    async fn test_recent_respects_limit() {
        let db = Database::in_memory().await.unwrap();
        for i in 0..25 {
            db.save_chat(format!("q{}", i), "a".to_string(), "pqai".to_string())
                .await
                .unwrap();
        }

        let chats = db.recent_chats(20).await.unwrap();
        assert_eq!(chats.len(), 20);
        assert_eq!(chats[0].user_input, "q24");
        assert_eq!(chats[19].user_input, "q5");
        assert_eq!(db.count_chats().await.unwrap(), 25);
    }

    #[tokio::test]
    async fn test_file_backed_log_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat_history.db");

        {
            let db = Database::new(&path).await.unwrap();
            db.save_chat("hello".into(), "hi".into(), "gpt4".into())
                .await
                .unwrap();
        }

        let reopened = Database::new(&path).await.unwrap();
        let chats = reopened.recent_chats(20).await.unwrap();
        assert_eq!(chats.len(), 1);
        assert_eq!(chats[0].bot_response, "hi");
    }
}
