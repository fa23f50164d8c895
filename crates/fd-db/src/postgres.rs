use super::*;
use std::time::Duration;
use tokio_postgres::Client;

/// Environment variable carrying the store connection string.
pub const DB_URL_ENV: &str = "GAME_DB_URL";

/// Table of retired players.
pub const RETIRED_PLAYERS: &str = "retired_players";

const CREATES: &str = const_format::concatcp!(
    "CREATE TABLE IF NOT EXISTS ",
    RETIRED_PLAYERS,
    " (
        id           UUID PRIMARY KEY,
        name         VARCHAR(100) NOT NULL,
        score        INTEGER,
        play_time_ms INTEGER
    );"
);

const INDICES: &str = const_format::concatcp!(
    "CREATE INDEX IF NOT EXISTS retired_players_rank ON ",
    RETIRED_PLAYERS,
    " (score DESC, play_time_ms, name);"
);

const INSERT: &str = const_format::concatcp!(
    "INSERT INTO ",
    RETIRED_PLAYERS,
    " (id, name, score, play_time_ms) VALUES ($1, $2, $3, $4)"
);

const SELECT: &str = const_format::concatcp!(
    "SELECT name, score, play_time_ms FROM ",
    RETIRED_PLAYERS,
    " ORDER BY score DESC, play_time_ms, name LIMIT $1 OFFSET $2"
);

/// Leaderboard store backed by PostgreSQL. One connection is enough; all
/// writes arrive serialized by the engine lock.
pub struct Postgres {
    client: Client,
}

impl Postgres {
    /// Connects and ensures the schema exists.
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let (client, connection) = tokio_postgres::connect(url, tokio_postgres::tls::NoTls).await?;
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                log::error!("[db] connection task failed: {}", e);
            }
        });
        client.batch_execute(CREATES).await?;
        client.batch_execute(INDICES).await?;
        log::info!("[db] connected, schema ready");
        Ok(Self { client })
    }
}

/// Establishes the leaderboard store from the environment.
///
/// # Panics
///
/// Panics when `GAME_DB_URL` is unset or the connection fails; the server
/// must not start without its durable store.
pub async fn db() -> Postgres {
    let url = std::env::var(DB_URL_ENV)
        .unwrap_or_else(|_| panic!("{} must be set", DB_URL_ENV));
    Postgres::connect(&url).await.expect("database connection failed")
}

#[async_trait::async_trait]
impl RecordStore for Postgres {
    async fn save(&self, record: &RetiredRecord) -> anyhow::Result<()> {
        self.client
            .execute(
                INSERT,
                &[
                    &uuid::Uuid::new_v4(),
                    &record.name,
                    &(record.score as i32),
                    &record.play_time_ms(),
                ],
            )
            .await?;
        Ok(())
    }
    async fn query(&self, offset: usize, limit: usize) -> anyhow::Result<Vec<RetiredRecord>> {
        let rows = self
            .client
            .query(SELECT, &[&(limit as i64), &(offset as i64)])
            .await?;
        Ok(rows
            .iter()
            .map(|row| {
                let name: String = row.get(0);
                let score: i32 = row.get(1);
                let play_time_ms: i32 = row.get(2);
                RetiredRecord::new(
                    name,
                    score as fd_core::Score,
                    Duration::from_millis(play_time_ms as u64),
                )
            })
            .collect())
    }
    async fn ping(&self) -> anyhow::Result<()> {
        self.client.execute("SELECT 1", &[]).await?;
        Ok(())
    }
}
