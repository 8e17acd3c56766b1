//! Credential storage.
//!
//! `CredentialStore` is the seam between the auth handlers and persistence.
//! `PgCredentialStore` backs the running service; `MemoryCredentialStore`
//! backs tests and embedders that do not need Postgres.

use anyhow::{Context, Result, anyhow};
use sqlx::{Connection, PgPool, Row, postgres::PgPoolOptions};
use std::{collections::HashMap, future::Future, pin::Pin, time::Duration};
use tokio::sync::RwLock;
use tracing::{Instrument, info_span};
use uuid::Uuid;

use super::{types::Role, utils::is_unique_violation};

const SCHEMA_SQL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/schema.sql"));

// Serializes bootstrap signups so two concurrent first registrants cannot both
// become admin.
const BOOTSTRAP_LOCK_KEY: i64 = 0x666f_6c69_6f00;

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Stored credential; the password is only ever held as a PHC hash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CredentialRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

#[derive(Clone, Debug)]
pub struct NewCredential {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Precondition checked atomically with the insert.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdminGate {
    /// Insert only while no admin record exists.
    RequireNoAdmin,
    Unrestricted,
}

#[derive(Debug, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(CredentialRecord),
    /// Email already registered.
    Conflict,
    /// `AdminGate::RequireNoAdmin` was set and an admin already exists.
    AdminExists,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

pub trait CredentialStore: Send + Sync {
    /// Look up a record by normalized email.
    fn find_by_email<'a>(&'a self, email: &'a str) -> StoreFuture<'a, Option<CredentialRecord>>;

    /// Insert a new record, honoring the admin gate.
    fn create<'a>(
        &'a self,
        credential: &'a NewCredential,
        gate: AdminGate,
    ) -> StoreFuture<'a, CreateOutcome>;

    /// Create the record as admin, or reset its password hash and role to admin.
    fn upsert_admin<'a>(
        &'a self,
        email: &'a str,
        password_hash: &'a str,
    ) -> StoreFuture<'a, UpsertOutcome>;

    /// Check the backing store is reachable.
    fn ping(&self) -> StoreFuture<'_, ()>;
}

/// Connect a small Postgres pool.
///
/// # Errors
/// Returns an error if the database is unreachable.
pub async fn connect(dsn: &str) -> Result<PgPool> {
    PgPoolOptions::new()
        .min_connections(1)
        .max_connections(5)
        .max_lifetime(Duration::from_secs(60 * 2))
        .test_before_acquire(true)
        .connect(dsn)
        .await
        .context("Failed to connect to database")
}

#[derive(Clone, Debug)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply `sql/schema.sql`; every statement is idempotent.
    ///
    /// # Errors
    /// Returns an error if a statement fails.
    pub async fn ensure_schema(&self) -> Result<()> {
        for (index, statement) in split_sql_statements(SCHEMA_SQL).iter().enumerate() {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .with_context(|| format!("failed to execute schema statement {}", index + 1))?;
        }
        Ok(())
    }
}

impl CredentialStore for PgCredentialStore {
    fn find_by_email<'a>(&'a self, email: &'a str) -> StoreFuture<'a, Option<CredentialRecord>> {
        Box::pin(pg_find_by_email(&self.pool, email))
    }

    fn create<'a>(
        &'a self,
        credential: &'a NewCredential,
        gate: AdminGate,
    ) -> StoreFuture<'a, CreateOutcome> {
        Box::pin(pg_create(&self.pool, credential, gate))
    }

    fn upsert_admin<'a>(
        &'a self,
        email: &'a str,
        password_hash: &'a str,
    ) -> StoreFuture<'a, UpsertOutcome> {
        Box::pin(pg_upsert_admin(&self.pool, email, password_hash))
    }

    fn ping(&self) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let acquire_span = info_span!(
                "db.acquire",
                db.system = "postgresql",
                db.operation = "ACQUIRE"
            );
            let mut conn = self
                .pool
                .acquire()
                .instrument(acquire_span)
                .await
                .context("failed to acquire database connection")?;
            let ping_span = info_span!("db.ping", db.system = "postgresql", db.operation = "PING");
            conn.ping()
                .instrument(ping_span)
                .await
                .context("failed to ping database")
        })
    }
}

fn row_to_record(row: &sqlx::postgres::PgRow) -> Result<CredentialRecord> {
    let role: String = row.get("role");
    Ok(CredentialRecord {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        role: role
            .parse()
            .map_err(|err| anyhow!("invalid stored role: {err}"))?,
    })
}

async fn pg_find_by_email(pool: &PgPool, email: &str) -> Result<Option<CredentialRecord>> {
    let query = "SELECT id, email, password_hash, role FROM users WHERE email = $1";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup credential record")?;

    row.as_ref().map(row_to_record).transpose()
}

async fn pg_create(
    pool: &PgPool,
    credential: &NewCredential,
    gate: AdminGate,
) -> Result<CreateOutcome> {
    let mut tx = pool.begin().await.context("begin signup transaction")?;

    if gate == AdminGate::RequireNoAdmin {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(BOOTSTRAP_LOCK_KEY)
            .execute(&mut *tx)
            .await
            .context("failed to take bootstrap lock")?;

        let query = "SELECT EXISTS(SELECT 1 FROM users WHERE role = 'admin') AS exists";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let admin_exists: bool = sqlx::query(query)
            .fetch_one(&mut *tx)
            .instrument(span)
            .await
            .context("failed to check for existing admin")?
            .get("exists");

        if admin_exists {
            let _ = tx.rollback().await;
            return Ok(CreateOutcome::AdminExists);
        }
    }

    let query = r"
        INSERT INTO users
            (email, password_hash, role)
        VALUES ($1, $2, $3)
        RETURNING id
    ";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(&credential.email)
        .bind(&credential.password_hash)
        .bind(credential.role.as_str())
        .fetch_one(&mut *tx)
        .instrument(span)
        .await;

    let id: Uuid = match row {
        Ok(row) => row.get("id"),
        Err(err) => {
            if is_unique_violation(&err) {
                let _ = tx.rollback().await;
                return Ok(CreateOutcome::Conflict);
            }
            return Err(err).context("failed to insert credential record");
        }
    };

    tx.commit().await.context("commit signup transaction")?;

    Ok(CreateOutcome::Created(CredentialRecord {
        id,
        email: credential.email.clone(),
        password_hash: credential.password_hash.clone(),
        role: credential.role,
    }))
}

async fn pg_upsert_admin(pool: &PgPool, email: &str, password_hash: &str) -> Result<UpsertOutcome> {
    // `xmax = 0` only holds for a freshly inserted row.
    let query = r"
        INSERT INTO users
            (email, password_hash, role)
        VALUES ($1, $2, 'admin')
        ON CONFLICT (email) DO UPDATE
            SET password_hash = EXCLUDED.password_hash,
                role = 'admin',
                updated_at = NOW()
        RETURNING (xmax = 0) AS inserted
    ";
    let span = info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPSERT",
        db.statement = query
    );
    let inserted: bool = sqlx::query(query)
        .bind(email)
        .bind(password_hash)
        .fetch_one(pool)
        .instrument(span)
        .await
        .context("failed to upsert admin record")?
        .get("inserted");

    Ok(if inserted {
        UpsertOutcome::Created
    } else {
        UpsertOutcome::Updated
    })
}

fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();

    for line in sql.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("--") {
            continue;
        }
        current.push_str(line);
        current.push('\n');

        if trimmed.ends_with(';') {
            let statement = current.trim();
            if !statement.is_empty() {
                statements.push(statement.to_string());
            }
            current.clear();
        }
    }

    let leftover = current.trim();
    if !leftover.is_empty() {
        statements.push(leftover.to_string());
    }

    statements
}

/// In-process store keyed by email.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    records: RwLock<HashMap<String, CredentialRecord>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record directly, bypassing signup rules.
    pub async fn insert(&self, record: CredentialRecord) {
        self.records
            .write()
            .await
            .insert(record.email.clone(), record);
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn find_by_email<'a>(&'a self, email: &'a str) -> StoreFuture<'a, Option<CredentialRecord>> {
        Box::pin(async move { Ok(self.records.read().await.get(email).cloned()) })
    }

    fn create<'a>(
        &'a self,
        credential: &'a NewCredential,
        gate: AdminGate,
    ) -> StoreFuture<'a, CreateOutcome> {
        Box::pin(async move {
            let mut records = self.records.write().await;
            if records.contains_key(&credential.email) {
                return Ok(CreateOutcome::Conflict);
            }
            if gate == AdminGate::RequireNoAdmin
                && records.values().any(|record| record.role.is_admin())
            {
                return Ok(CreateOutcome::AdminExists);
            }
            let record = CredentialRecord {
                id: Uuid::new_v4(),
                email: credential.email.clone(),
                password_hash: credential.password_hash.clone(),
                role: credential.role,
            };
            records.insert(record.email.clone(), record.clone());
            Ok(CreateOutcome::Created(record))
        })
    }

    fn upsert_admin<'a>(
        &'a self,
        email: &'a str,
        password_hash: &'a str,
    ) -> StoreFuture<'a, UpsertOutcome> {
        Box::pin(async move {
            let mut records = self.records.write().await;
            if let Some(record) = records.get_mut(email) {
                record.password_hash = password_hash.to_string();
                record.role = Role::Admin;
                return Ok(UpsertOutcome::Updated);
            }
            let record = CredentialRecord {
                id: Uuid::new_v4(),
                email: email.to_string(),
                password_hash: password_hash.to_string(),
                role: Role::Admin,
            };
            records.insert(email.to_string(), record);
            Ok(UpsertOutcome::Created)
        })
    }

    fn ping(&self) -> StoreFuture<'_, ()> {
        Box::pin(async { Ok(()) })
    }
}
