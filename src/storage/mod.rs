use crate::engage::{ActionKind, ActionRecord};
use crate::error::StorageError;
use crate::social::Post;
use anyhow::Context;
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;

/// SQLite-backed record of posts seen and actions emitted.
///
/// Plumbing only: the in-memory dedup/history state stays authoritative, and
/// a write failure here is logged by the caller, never fatal to the engine
/// loop.
pub struct ActionStore {
    pool: SqlitePool,
}

impl ActionStore {
    /// Open (or create) the database at `path`.
    pub async fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("create storage directory")?;
        }

        let url = format!("sqlite:{}?mode=rwc", path.display());
        let pool = SqlitePool::connect(&url)
            .await
            .map_err(|err| StorageError::Open(format!("{}: {err}", path.display())))?;

        init_schema(&pool).await?;
        Ok(Self { pool })
    }

    /// Open an in-memory database (used by tests and `--dry-run`).
    pub async fn in_memory() -> anyhow::Result<Self> {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .map_err(|err| StorageError::Open(err.to_string()))?;
        init_schema(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn record_post(&self, post: &Post) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT OR IGNORE INTO posts \
             (post_id, author_handle, content, author_followers, author_verified, engagement_score, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&post.id)
        .bind(&post.author_handle)
        .bind(&post.text)
        .bind(i64::try_from(post.author_follower_count).unwrap_or(i64::MAX))
        .bind(post.author_verified)
        .bind(post.engagement_score)
        .bind(post.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .context("insert post")?;
        Ok(())
    }

    pub async fn record_action(&self, record: &ActionRecord) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO action_records (post_id, account_id, content, persona, kind) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&record.post_id)
        .bind(record.account_id)
        .bind(&record.content)
        .bind(&record.persona)
        .bind(record.kind.to_string())
        .execute(&self.pool)
        .await
        .context("insert action record")?;
        Ok(())
    }

    pub async fn actions_for_post(&self, post_id: &str) -> anyhow::Result<Vec<ActionRecord>> {
        let rows: Vec<(String, i64, String, String, String)> = sqlx::query_as(
            "SELECT post_id, account_id, content, persona, kind \
             FROM action_records WHERE post_id = ?1 ORDER BY id ASC",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .context("fetch actions for post")?;

        Ok(rows.into_iter().filter_map(row_to_record).collect())
    }

    pub async fn recent_actions(&self, limit: i64) -> anyhow::Result<Vec<ActionRecord>> {
        let rows: Vec<(String, i64, String, String, String)> = sqlx::query_as(
            "SELECT post_id, account_id, content, persona, kind \
             FROM action_records ORDER BY id DESC LIMIT ?1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("fetch recent actions")?;

        Ok(rows.into_iter().filter_map(row_to_record).collect())
    }

    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await.is_ok()
    }
}

fn row_to_record(row: (String, i64, String, String, String)) -> Option<ActionRecord> {
    let (post_id, account_id, content, persona, kind) = row;
    let kind = ActionKind::from_str(&kind).ok()?;
    Some(ActionRecord {
        post_id,
        account_id,
        content,
        persona,
        kind,
    })
}

async fn init_schema(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::raw_sql(
        "CREATE TABLE IF NOT EXISTS posts (
            post_id TEXT PRIMARY KEY,
            author_handle TEXT NOT NULL,
            content TEXT NOT NULL,
            author_followers INTEGER NOT NULL,
            author_verified INTEGER NOT NULL,
            engagement_score REAL,
            created_at TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS action_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            post_id TEXT NOT NULL,
            account_id INTEGER NOT NULL,
            content TEXT NOT NULL,
            persona TEXT NOT NULL,
            kind TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE INDEX IF NOT EXISTS idx_action_records_post_id ON action_records(post_id);",
    )
    .execute(pool)
    .await
    .context("initialize storage schema")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_post(id: &str) -> Post {
        Post {
            id: id.into(),
            author_handle: "someone".into(),
            text: "hello".into(),
            author_follower_count: 10,
            author_verified: false,
            retweet_count: 0,
            favorite_count: 0,
            created_at: Utc::now(),
            engagement_score: Some(60.0),
        }
    }

    fn sample_record(post_id: &str, kind: ActionKind) -> ActionRecord {
        ActionRecord {
            post_id: post_id.into(),
            account_id: 1,
            content: "reply text".into(),
            persona: "CryptoSavvy".into(),
            kind,
        }
    }

    #[tokio::test]
    async fn records_round_trip() {
        let store = ActionStore::in_memory().await.unwrap();
        store.record_post(&sample_post("p1")).await.unwrap();
        store
            .record_action(&sample_record("p1", ActionKind::Reply))
            .await
            .unwrap();
        store
            .record_action(&sample_record("p1", ActionKind::Like))
            .await
            .unwrap();

        let actions = store.actions_for_post("p1").await.unwrap();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].kind, ActionKind::Reply);
        assert_eq!(actions[1].kind, ActionKind::Like);
    }

    #[tokio::test]
    async fn duplicate_post_insert_is_ignored() {
        let store = ActionStore::in_memory().await.unwrap();
        store.record_post(&sample_post("p1")).await.unwrap();
        store.record_post(&sample_post("p1")).await.unwrap();
        assert!(store.health_check().await);
    }

    #[tokio::test]
    async fn recent_actions_respects_limit_and_order() {
        let store = ActionStore::in_memory().await.unwrap();
        for id in ["p1", "p2", "p3"] {
            store
                .record_action(&sample_record(id, ActionKind::Reply))
                .await
                .unwrap();
        }

        let recent = store.recent_actions(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].post_id, "p3");
        assert_eq!(recent[1].post_id, "p2");
    }
}
