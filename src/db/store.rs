use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::SqlitePool;

use eventdesk_core::{
    Event, EventLookup, EventStore, EventWallet, LinkLookup, LinkStore, NewEvent, NewUser,
    StorageError, User, UserField, UserLookup, UserStore, Wallet, WalletLookup, WalletStore,
};

const USER_COLUMNS: &str =
    "id, name, email, phone, password_hash, birth_date, is_admin, is_active, created_at, updated_at";

const EVENT_COLUMNS: &str = "id, creator_id, name, is_ead, address, event_date, purchase_deadline, \
     capacity, quantity, description, presenters, image IS NOT NULL AS has_image, created_at, updated_at";

/// SQLite implementation of every storage port.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn user_by_id(&self, id: i64) -> Result<Option<User>, StorageError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(row.map(User::from))
    }

    async fn event_by_id(&self, id: i64) -> Result<Option<Event>, StorageError> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        row.map(Event::try_from).transpose()
    }

    /// All events, or only those of `creator_id` when given.
    async fn events(&self, creator_id: Option<i64>) -> Result<Vec<Event>, StorageError> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE (?1 IS NULL OR creator_id = ?1) ORDER BY id"
        ))
        .bind(creator_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        rows.into_iter().map(Event::try_from).collect()
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    phone: Option<String>,
    password_hash: Option<String>,
    birth_date: Option<NaiveDate>,
    is_admin: bool,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            password_hash: row.password_hash,
            birth_date: row.birth_date,
            is_admin: row.is_admin,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct EventRow {
    id: i64,
    creator_id: i64,
    name: String,
    is_ead: bool,
    address: Option<String>,
    event_date: NaiveDateTime,
    purchase_deadline: NaiveDateTime,
    capacity: Option<i32>,
    quantity: i32,
    description: String,
    presenters: String,
    has_image: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = StorageError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let presenters = serde_json::from_str(&row.presenters).map_err(|e| {
            StorageError::Database(format!("corrupt presenters on event {}: {e}", row.id))
        })?;
        Ok(Event {
            id: row.id,
            creator_id: row.creator_id,
            name: row.name,
            is_ead: row.is_ead,
            address: row.address,
            event_date: row.event_date,
            purchase_deadline: row.purchase_deadline,
            capacity: row.capacity,
            quantity: row.quantity,
            description: row.description,
            presenters,
            has_image: row.has_image,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Constraint failures keep their meaning; everything else is opaque.
fn db_error(err: sqlx::Error) -> StorageError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return StorageError::UniqueViolation(violated_columns(db.message()));
        }
        if db.is_foreign_key_violation() {
            return StorageError::ForeignKeyViolation;
        }
    }
    StorageError::Database(err.to_string())
}

/// "UNIQUE constraint failed: users.email" -> "users.email"
fn violated_columns(message: &str) -> String {
    message
        .split_once("failed: ")
        .map(|(_, columns)| columns)
        .unwrap_or(message)
        .to_string()
}

fn presenters_json(presenters: &[String]) -> Result<String, StorageError> {
    serde_json::to_string(presenters).map_err(|e| StorageError::Database(e.to_string()))
}

#[async_trait]
impl UserLookup for SqliteStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StorageError> {
        self.user_by_id(id).await
    }

    async fn find_by(&self, field: UserField, value: &str) -> Result<Option<User>, StorageError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE {} = ?",
            field.as_str()
        ))
        .bind(value)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(row.map(User::from))
    }
}

#[async_trait]
impl UserStore for SqliteStore {
    async fn list(&self) -> Result<Vec<User>, StorageError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn insert(&self, user: NewUser) -> Result<User, StorageError> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (name, email, phone, password_hash, birth_date, is_admin, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.password_hash)
        .bind(user.birth_date)
        .bind(user.is_admin)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(row.into())
    }

    async fn update(&self, user: User) -> Result<Option<User>, StorageError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
            SET name = ?, email = ?, phone = ?, password_hash = ?, birth_date = ?,
                is_admin = ?, updated_at = ?
            WHERE id = ?
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.password_hash)
        .bind(user.birth_date)
        .bind(user.is_admin)
        .bind(Utc::now())
        .bind(user.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(row.map(User::from))
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, StorageError> {
        let result = sqlx::query("UPDATE users SET is_active = 0, updated_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_password_hash(&self, id: i64, hash: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(hash)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl EventLookup for SqliteStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Event>, StorageError> {
        self.event_by_id(id).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Event>, StorageError> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE name = ?"
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        row.map(Event::try_from).transpose()
    }
}

#[async_trait]
impl EventStore for SqliteStore {
    async fn list(&self) -> Result<Vec<Event>, StorageError> {
        self.events(None).await
    }

    async fn list_by_creator(&self, creator_id: i64) -> Result<Vec<Event>, StorageError> {
        self.events(Some(creator_id)).await
    }

    async fn insert(&self, event: NewEvent) -> Result<Event, StorageError> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            INSERT INTO events (creator_id, name, is_ead, address, event_date, purchase_deadline,
                                capacity, quantity, description, presenters, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(event.creator_id)
        .bind(&event.name)
        .bind(event.is_ead)
        .bind(&event.address)
        .bind(event.event_date)
        .bind(event.purchase_deadline)
        .bind(event.capacity)
        .bind(event.quantity)
        .bind(&event.description)
        .bind(presenters_json(&event.presenters)?)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;
        row.try_into()
    }

    async fn update(&self, id: i64, event: NewEvent) -> Result<Option<Event>, StorageError> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            r#"
            UPDATE events
            SET creator_id = ?, name = ?, is_ead = ?, address = ?, event_date = ?,
                purchase_deadline = ?, capacity = ?, quantity = ?, description = ?,
                presenters = ?, updated_at = ?
            WHERE id = ?
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(event.creator_id)
        .bind(&event.name)
        .bind(event.is_ead)
        .bind(&event.address)
        .bind(event.event_date)
        .bind(event.purchase_deadline)
        .bind(event.capacity)
        .bind(event.quantity)
        .bind(&event.description)
        .bind(presenters_json(&event.presenters)?)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        row.map(Event::try_from).transpose()
    }

    async fn delete(&self, id: i64) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_image(&self, id: i64, image: Option<Vec<u8>>) -> Result<bool, StorageError> {
        let result = sqlx::query("UPDATE events SET image = ?, updated_at = ? WHERE id = ?")
            .bind(image)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn image(&self, id: i64) -> Result<Option<Option<Vec<u8>>>, StorageError> {
        sqlx::query_scalar::<_, Option<Vec<u8>>>("SELECT image FROM events WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)
    }
}

#[async_trait]
impl WalletLookup for SqliteStore {
    async fn find(&self, user_id: i64) -> Result<Option<Wallet>, StorageError> {
        let row = sqlx::query_as::<_, (i64, DateTime<Utc>, DateTime<Utc>)>(
            "SELECT user_id, created_at, updated_at FROM wallets WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(row.map(|(user_id, created_at, updated_at)| Wallet {
            user_id,
            created_at,
            updated_at,
        }))
    }
}

#[async_trait]
impl WalletStore for SqliteStore {
    async fn ensure_exists(&self, user_id: i64) -> Result<Wallet, StorageError> {
        let now = Utc::now();
        sqlx::query(
            "INSERT OR IGNORE INTO wallets (user_id, created_at, updated_at) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        self.find(user_id)
            .await?
            .ok_or_else(|| StorageError::Database(format!("wallet {user_id} vanished after insert")))
    }
}

#[async_trait]
impl LinkLookup for SqliteStore {
    async fn exists(&self, user_id: i64, event_id: i64) -> Result<bool, StorageError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM event_wallets WHERE user_id = ? AND event_id = ?)",
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)
    }
}

#[async_trait]
impl LinkStore for SqliteStore {
    async fn insert(&self, user_id: i64, event_id: i64) -> Result<EventWallet, StorageError> {
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO event_wallets (user_id, event_id, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(event_id)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(EventWallet {
            user_id,
            event_id,
            created_at: now,
            updated_at: now,
        })
    }

    async fn delete(&self, user_id: i64, event_id: i64) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM event_wallets WHERE user_id = ? AND event_id = ?")
            .bind(user_id)
            .bind(event_id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<EventWallet>, StorageError> {
        let rows = sqlx::query_as::<_, (i64, i64, DateTime<Utc>, DateTime<Utc>)>(
            "SELECT user_id, event_id, created_at, updated_at FROM event_wallets WHERE user_id = ? ORDER BY event_id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(rows
            .into_iter()
            .map(|(user_id, event_id, created_at, updated_at)| EventWallet {
                user_id,
                event_id,
                created_at,
                updated_at,
            })
            .collect())
    }
}
