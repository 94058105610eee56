use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use redis::{Client, RedisResult};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};

use crate::error::AppResult;
use crate::models::TimeWindow;

/// Listings move quickly; lookups and details barely change within a day
const LISTING_TTL_SECS: u64 = 600;
const CATALOG_TTL_SECS: u64 = 3600;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Genres,
    MovieSearch(String),
    PersonSearch(String),
    KeywordSearch(String),
    Movie(u64),
    Discover(String),
    Trending(TimeWindow, u32),
}

impl CacheKey {
    /// Seconds an entry under this key stays fresh
    pub fn ttl(&self) -> u64 {
        match self {
            CacheKey::Discover(_) | CacheKey::Trending(..) => LISTING_TTL_SECS,
            _ => CATALOG_TTL_SECS,
        }
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Genres => write!(f, "genres"),
            CacheKey::MovieSearch(query) => write!(f, "search:movie:{}", query.to_lowercase()),
            CacheKey::PersonSearch(query) => write!(f, "search:person:{}", query.to_lowercase()),
            CacheKey::KeywordSearch(query) => {
                write!(f, "search:keyword:{}", query.to_lowercase())
            }
            CacheKey::Movie(id) => write!(f, "movie:{}", id),
            CacheKey::Discover(params) => write!(f, "discover:{}", params),
            CacheKey::Trending(window, page) => write!(f, "trending:{}:{}", window, page),
        }
    }
}

/// Opens (lazily) the Redis client; nothing connects until first use
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    Ok(Client::open(redis_url)?)
}

/// A serialized entry waiting for the writer task
struct PendingWrite {
    key: String,
    payload: String,
    ttl: u64,
}

/// Bound on a cache read; past it the read counts as a miss
const READ_TIMEOUT: Duration = Duration::from_millis(500);

/// One multiplexed connection, opened on first use and shared by readers
/// and the writer; dropped after an error so the next use reconnects
#[derive(Clone)]
struct SharedConnection {
    client: Client,
    slot: Arc<Mutex<Option<MultiplexedConnection>>>,
}

impl SharedConnection {
    fn new(client: Client) -> Self {
        Self {
            client,
            slot: Arc::new(Mutex::new(None)),
        }
    }

    async fn get(&self) -> RedisResult<MultiplexedConnection> {
        let mut slot = self.slot.lock().await;
        if let Some(conn) = slot.as_ref() {
            return Ok(conn.clone());
        }
        let conn = self.client.get_multiplexed_async_connection().await?;
        *slot = Some(conn.clone());
        Ok(conn)
    }

    async fn reset(&self) {
        *self.slot.lock().await = None;
    }
}

/// Read-through JSON cache over Redis
///
/// Any read problem (error, timeout, corrupt entry) is logged and reported
/// as a miss. Writes are queued to a background task. Keys are prefixed
/// with a namespace so catalogs fetched in different languages never
/// collide.
#[derive(Clone)]
pub struct Cache {
    conn: SharedConnection,
    namespace: String,
    writes: mpsc::UnboundedSender<PendingWrite>,
}

/// Stops the background writer once queued writes are flushed
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
    writer: tokio::task::JoinHandle<()>,
}

impl CacheWriterHandle {
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        if let Err(e) = self.writer.await {
            tracing::error!(error = %e, "Cache writer task panicked");
        }
    }
}

struct Writer {
    conn: SharedConnection,
    failed: u64,
}

impl Writer {
    async fn write(&mut self, pending: PendingWrite) {
        if let Err(e) = self.try_write(&pending).await {
            self.conn.reset().await;
            self.failed += 1;
            tracing::warn!(
                key = %pending.key,
                error = %e,
                failed_writes = self.failed,
                "Cache write dropped"
            );
        }
    }

    async fn try_write(&self, pending: &PendingWrite) -> AppResult<()> {
        let mut conn = self.conn.get().await?;
        let _: () = conn
            .set_ex(&pending.key, &pending.payload, pending.ttl)
            .await?;
        Ok(())
    }
}

impl Cache {
    /// Creates the cache and spawns its writer task
    pub async fn new(redis_client: Client, namespace: &str) -> (Self, CacheWriterHandle) {
        let (writes, queue) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let conn = SharedConnection::new(redis_client);
        let writer = Writer {
            conn: conn.clone(),
            failed: 0,
        };
        let writer = tokio::spawn(run_writer(writer, queue, shutdown_rx));

        let cache = Self {
            conn,
            namespace: namespace.to_string(),
            writes,
        };

        (cache, CacheWriterHandle { shutdown_tx, writer })
    }

    /// Full Redis key for a cache key
    pub fn redis_key(&self, key: &CacheKey) -> String {
        format!("{}:{}", self.namespace, key)
    }

    async fn read(&self, key: &CacheKey) -> RedisResult<Option<String>> {
        let mut conn = self.conn.get().await?;
        conn.get(self.redis_key(key)).await
    }

    /// Cached value for `key`; `None` on a miss or when Redis is unusable
    pub async fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let payload = match tokio::time::timeout(READ_TIMEOUT, self.read(key)).await {
            Ok(Ok(payload)) => payload,
            Ok(Err(e)) => {
                self.conn.reset().await;
                tracing::warn!(key = %key, error = %e, "Cache read failed, falling back to source");
                return None;
            }
            Err(_) => {
                tracing::warn!(key = %key, "Cache read timed out, falling back to source");
                return None;
            }
        };

        let Some(payload) = payload else {
            tracing::debug!(key = %key, "Cache miss");
            return None;
        };

        match serde_json::from_str(&payload) {
            Ok(value) => {
                tracing::debug!(key = %key, "Cache hit");
                Some(value)
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Corrupt cache entry ignored");
                None
            }
        }
    }

    /// Queues `value` for storage under `key` with the key's TTL
    pub fn put<T: Serialize>(&self, key: &CacheKey, value: &T) {
        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(key = %key, error = %e, "Cache serialization error");
                return;
            }
        };

        let pending = PendingWrite {
            key: self.redis_key(key),
            payload,
            ttl: key.ttl(),
        };
        if self.writes.send(pending).is_err() {
            tracing::warn!(key = %key, "Cache writer stopped; write skipped");
        }
    }
}

async fn run_writer(
    mut writer: Writer,
    mut queue: mpsc::UnboundedReceiver<PendingWrite>,
    mut shutdown_rx: mpsc::Receiver<()>,
) {
    tracing::info!("Cache writer started");

    loop {
        tokio::select! {
            Some(pending) = queue.recv() => writer.write(pending).await,
            _ = shutdown_rx.recv() => break,
        }
    }

    // Senders live in every Cache clone, so drain what is queued and stop
    let mut flushed = 0;
    while let Ok(pending) = queue.try_recv() {
        writer.write(pending).await;
        flushed += 1;
    }
    tracing::info!(flushed, failed_writes = writer.failed, "Cache writer stopped");
}
