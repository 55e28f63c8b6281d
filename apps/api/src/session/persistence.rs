//! Durable session records: one versioned JSON document per user.
//!
//! Records are decoded through `decode_record`, which upgrades older schema
//! versions in place instead of discarding them.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::session::{AnalysisSession, Filters};
use crate::roadmap::generator::Roadmap;
use crate::session::ledger::SkillLedger;

/// Current record layout.
/// v1: `deleted_skills` / `favorite_skills`, no roadmaps, no version field.
/// v2: `deletion_ledger` / `favorite_ledger`, `roadmaps`, explicit `schema_version`.
pub const SCHEMA_VERSION: u32 = 2;

const KEY_PREFIX: &str = "skillgap:session";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionRecord {
    pub schema_version: u32,
    pub analysis_session: Option<AnalysisSession>,
    #[serde(default)]
    pub deletion_ledger: SkillLedger,
    #[serde(default)]
    pub favorite_ledger: SkillLedger,
    #[serde(default)]
    pub filters: Filters,
    #[serde(default)]
    pub roadmaps: Vec<Roadmap>,
}

pub fn record_key(user_id: Uuid) -> String {
    format!("{KEY_PREFIX}:{user_id}")
}

pub fn encode_record(record: &SessionRecord) -> Result<String, serde_json::Error> {
    serde_json::to_string(record)
}

/// Operation tag of failures caused by an unreadable record, as opposed to an
/// unreachable store.
pub const DECODE_OPERATION: &str = "decode";

/// Parses a stored record, migrating older layouts to the current one.
pub fn decode_record(raw: &str) -> Result<SessionRecord, AppError> {
    let mut value: Value = serde_json::from_str(raw)
        .map_err(|e| AppError::persistence(DECODE_OPERATION, format!("corrupt session record: {e}")))?;

    let version = value
        .get("schema_version")
        .and_then(Value::as_u64)
        .unwrap_or(1) as u32;

    if version > SCHEMA_VERSION {
        return Err(AppError::persistence(
            DECODE_OPERATION,
            format!("session record has schema version {version}, newer than supported {SCHEMA_VERSION}"),
        ));
    }

    if version < 2 {
        value = migrate_v1_to_v2(value);
        debug!("Migrated session record from schema v1 to v2");
    }

    serde_json::from_value(value)
        .map_err(|e| AppError::persistence(DECODE_OPERATION, format!("invalid session record: {e}")))
}

fn migrate_v1_to_v2(mut value: Value) -> Value {
    if let Some(obj) = value.as_object_mut() {
        let deleted = obj.remove("deleted_skills").unwrap_or_else(|| json!([]));
        let favorites = obj.remove("favorite_skills").unwrap_or_else(|| json!([]));
        obj.insert("deletion_ledger".to_string(), deleted);
        obj.insert("favorite_ledger".to_string(), favorites);
        obj.entry("roadmaps").or_insert_with(|| json!([]));
        obj.entry("analysis_session").or_insert(Value::Null);
        obj.insert("schema_version".to_string(), json!(2));
    }
    value
}

/// Durable key-value storage for session records, keyed by user.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn load(&self, user_id: Uuid) -> Result<Option<SessionRecord>, AppError>;
    async fn save(&self, user_id: Uuid, record: &SessionRecord) -> Result<(), AppError>;
}

/// Redis-backed repository. Each user's record lives under `skillgap:session:{user_id}`.
#[derive(Clone)]
pub struct RedisSessionRepository {
    conn: MultiplexedConnection,
}

impl RedisSessionRepository {
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl SessionRepository for RedisSessionRepository {
    async fn load(&self, user_id: Uuid) -> Result<Option<SessionRecord>, AppError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn
            .get(record_key(user_id))
            .await
            .map_err(|e| AppError::persistence("load", e))?;

        match raw {
            Some(raw) => {
                let record = decode_record(&raw)?;
                info!("Loaded session record for user {user_id}");
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, user_id: Uuid, record: &SessionRecord) -> Result<(), AppError> {
        let payload = encode_record(record).map_err(|e| AppError::persistence("save", e))?;
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(record_key(user_id), payload)
            .await
            .map_err(|e| AppError::persistence("save", e))?;
        debug!("Saved session record for user {user_id}");
        Ok(())
    }
}

/// In-memory repository for tests. Stores encoded JSON so the codec is exercised,
/// and can be told to fail reads or writes.
#[cfg(test)]
#[derive(Default)]
pub struct InMemorySessionRepository {
    records: std::sync::Mutex<std::collections::HashMap<Uuid, String>>,
    fail_reads: std::sync::atomic::AtomicBool,
    fail_writes: std::sync::atomic::AtomicBool,
}

#[cfg(test)]
impl InMemorySessionRepository {
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes
            .store(fail, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads
            .store(fail, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn insert_raw(&self, user_id: Uuid, raw: &str) {
        self.records.lock().unwrap().insert(user_id, raw.to_string());
    }

    pub fn stored(&self, user_id: Uuid) -> Option<SessionRecord> {
        let raw = self.records.lock().unwrap().get(&user_id).cloned()?;
        decode_record(&raw).ok()
    }
}

#[cfg(test)]
#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn load(&self, user_id: Uuid) -> Result<Option<SessionRecord>, AppError> {
        if self.fail_reads.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(AppError::persistence("load", "simulated read failure"));
        }
        let raw = self.records.lock().unwrap().get(&user_id).cloned();
        raw.map(|r| decode_record(&r)).transpose()
    }

    async fn save(&self, user_id: Uuid, record: &SessionRecord) -> Result<(), AppError> {
        if self.fail_writes.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(AppError::persistence("save", "simulated write failure"));
        }
        let payload = encode_record(record).map_err(|e| AppError::persistence("save", e))?;
        self.records.lock().unwrap().insert(user_id, payload);
        Ok(())
    }
}
