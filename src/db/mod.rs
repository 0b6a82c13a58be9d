use std::{
    path::{Path, PathBuf},
    sync::{mpsc, Arc, Mutex},
    thread::{self, JoinHandle},
};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::oneshot;

mod migrations;

use crate::models::FlagRecord;
use migrations::run_migrations;

type DbTask = Box<dyn FnOnce(&mut Connection) + Send + 'static>;

enum DbCommand {
    Execute(DbTask),
    Shutdown,
}

struct DatabaseInner {
    sender: mpsc::Sender<DbCommand>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for DatabaseInner {
    fn drop(&mut self) {
        let mut guard = match self.worker.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(handle) = guard.take() {
            if let Err(err) = self.sender.send(DbCommand::Shutdown) {
                error!("Failed to send shutdown to DB thread: {err}");
            }
            if let Err(join_err) = handle.join() {
                error!("Failed to join DB thread: {join_err:?}");
            }
        }
    }
}

fn parse_datetime(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| anyhow!("invalid datetime '{value}': {err}"))
}

/// Local flag storage on SQLite, behind a dedicated worker thread.
///
/// All connection access happens on that thread; callers submit closures
/// over an mpsc channel and await the reply on a oneshot.
#[derive(Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
    db_path: Arc<PathBuf>,
}

impl Database {
    pub fn new(db_path: PathBuf) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }

        let (command_tx, command_rx) = mpsc::channel::<DbCommand>();
        let (ready_tx, ready_rx) = mpsc::channel();
        let path_for_thread = db_path.clone();

        let worker = thread::Builder::new()
            .name("nudge-db".into())
            .spawn(move || {
                let mut conn = match Connection::open(&path_for_thread) {
                    Ok(connection) => connection,
                    Err(err) => {
                        let _ = ready_tx.send(Err(anyhow::Error::new(err)
                            .context("failed to open SQLite database")));
                        return;
                    }
                };

                if let Err(err) = conn.pragma_update(None, "journal_mode", "WAL") {
                    error!("Failed to enable WAL mode: {err}");
                }

                let init_result =
                    run_migrations(&mut conn).context("failed to run database migrations");
                if ready_tx.send(init_result).is_err() {
                    error!("DB initialization receiver dropped before ready signal");
                    return;
                }

                while let Ok(command) = command_rx.recv() {
                    match command {
                        DbCommand::Execute(task) => {
                            task(&mut conn);
                        }
                        DbCommand::Shutdown => break,
                    }
                }

                info!("Database thread shutting down");
            })
            .with_context(|| "failed to spawn database worker thread")?;

        ready_rx
            .recv()
            .context("database worker exited before signaling readiness")??;

        info!("Database initialized at {}", db_path.as_path().display());

        Ok(Self {
            inner: Arc::new(DatabaseInner {
                sender: command_tx,
                worker: Mutex::new(Some(worker)),
            }),
            db_path: Arc::new(db_path),
        })
    }

    pub fn path(&self) -> &Path {
        self.db_path.as_path()
    }

    pub async fn execute<F, T>(&self, task: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sender = self.inner.sender.clone();
        let (reply_tx, reply_rx) = oneshot::channel();

        let command = DbCommand::Execute(Box::new(move |conn| {
            let result = task(conn);
            if reply_tx.send(result).is_err() {
                error!("DB caller dropped before receiving result");
            }
        }));

        sender
            .send(command)
            .map_err(|err| anyhow!("failed to send command to DB thread: {err}"))?;

        reply_rx
            .await
            .map_err(|_| anyhow!("database thread terminated unexpectedly"))?
    }

    /// Overwrite the latest outcome record for `record.feature`.
    pub async fn upsert_flag(&self, record: &FlagRecord) -> Result<()> {
        let record = record.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO feature_flags (feature, is_desired, reason, updated_at, command_key, command_ts)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(feature) DO UPDATE SET
                     is_desired = excluded.is_desired,
                     reason = excluded.reason,
                     updated_at = excluded.updated_at,
                     command_key = excluded.command_key,
                     command_ts = excluded.command_ts",
                params![
                    record.feature,
                    record.is_desired,
                    record.reason,
                    record.updated_at.to_rfc3339(),
                    record.command_key,
                    record.command_ts,
                ],
            )
            .with_context(|| "failed to upsert feature flag")?;
            Ok(())
        })
        .await
    }

    pub async fn get_flag(&self, feature: &str) -> Result<Option<FlagRecord>> {
        let feature = feature.to_string();
        self.execute(move |conn| {
            conn.query_row(
                "SELECT feature, is_desired, reason, updated_at, command_key, command_ts
                 FROM feature_flags
                 WHERE feature = ?1",
                params![feature],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, bool>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, Option<String>>(4)?,
                        row.get::<_, Option<i64>>(5)?,
                    ))
                },
            )
            .optional()
            .with_context(|| "failed to read feature flag")?
            .map(|(feature, is_desired, reason, updated_at, command_key, command_ts)| {
                Ok(FlagRecord {
                    feature,
                    is_desired,
                    reason,
                    updated_at: parse_datetime(&updated_at)?,
                    command_key,
                    command_ts,
                })
            })
            .transpose()
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_db() -> Database {
        let path = std::env::temp_dir().join(format!("nudge-test-{}.sqlite3", Uuid::new_v4()));
        Database::new(path).expect("test database")
    }

    #[tokio::test]
    async fn upsert_overwrites_previous_record() {
        let db = temp_db();

        let first = FlagRecord {
            feature: "connectivity".into(),
            is_desired: false,
            reason: "user_cancelled".into(),
            updated_at: Utc::now(),
            command_key: None,
            command_ts: None,
        };
        db.upsert_flag(&first).await.unwrap();

        let second = FlagRecord {
            is_desired: true,
            reason: "user_connected".into(),
            command_key: Some("enableInternet".into()),
            command_ts: Some(1_700_000_000_000),
            ..first.clone()
        };
        db.upsert_flag(&second).await.unwrap();

        let stored = db.get_flag("connectivity").await.unwrap().unwrap();
        assert!(stored.is_desired);
        assert_eq!(stored.reason, "user_connected");
        assert_eq!(stored.command_ts, Some(1_700_000_000_000));

        let _ = std::fs::remove_file(db.path());
    }

    #[tokio::test]
    async fn get_flag_returns_none_for_unknown_feature() {
        let db = temp_db();
        assert!(db.get_flag("messaging_handler").await.unwrap().is_none());
        let _ = std::fs::remove_file(db.path());
    }
}
