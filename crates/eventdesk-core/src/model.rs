use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Reads an explicit `null` as the type's default, so that the validator
/// gets to report the missing value instead of the whole body failing to parse.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A registered user. The password hash never leaves the process.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub is_admin: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Inbound user payload, used for create, update and validate-only calls.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPayload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, alias = "fone")]
    pub phone: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default, alias = "birthdate", alias = "birthDate")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default, alias = "isAdmin", deserialize_with = "null_as_default")]
    pub is_admin: bool,
}

impl UserPayload {
    /// Phone with surrounding whitespace removed; blank counts as absent.
    pub fn normalized_phone(&self) -> Option<&str> {
        self.phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

/// A user record ready to be inserted. The storage layer assigns id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub is_admin: bool,
}

/// Columns of `users` that carry a uniqueness guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Name,
    Email,
    Phone,
}

impl UserField {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserField::Name => "name",
            UserField::Email => "email",
            UserField::Phone => "phone",
        }
    }
}

/// A scheduled event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub id: i64,
    pub creator_id: i64,
    pub name: String,
    #[serde(rename = "is_EAD")]
    pub is_ead: bool,
    pub address: Option<String>,
    pub event_date: NaiveDateTime,
    pub purchase_deadline: NaiveDateTime,
    pub capacity: Option<i32>,
    pub quantity: i32,
    pub description: String,
    pub presenters: Vec<String>,
    pub has_image: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_presenters() -> Option<Vec<String>> {
    Some(Vec::new())
}

/// Inbound event payload.
///
/// `presenters` defaults to an empty list when the field is missing; an
/// explicit `null` deserializes to `None` and is rejected by the validator.
#[derive(Debug, Clone, Deserialize)]
pub struct EventPayload {
    #[serde(default, alias = "creatorId")]
    pub creator_id: Option<i64>,
    #[serde(default, alias = "event_name")]
    pub name: Option<String>,
    #[serde(default, rename = "is_EAD", alias = "is_ead")]
    pub is_ead: Option<bool>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub event_date: Option<NaiveDateTime>,
    #[serde(default, alias = "buy_time_limit")]
    pub purchase_deadline: Option<NaiveDateTime>,
    #[serde(default, alias = "lot_quantity")]
    pub capacity: Option<i32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity: i32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_presenters")]
    pub presenters: Option<Vec<String>>,
}

impl Default for EventPayload {
    fn default() -> Self {
        Self {
            creator_id: None,
            name: None,
            is_ead: None,
            address: None,
            event_date: None,
            purchase_deadline: None,
            capacity: None,
            quantity: 0,
            description: None,
            presenters: default_presenters(),
        }
    }
}

impl EventPayload {
    /// Name used to identify the payload in messages, even when blank.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    /// Convert a payload that passed both validators into an insertable record.
    ///
    /// Returns `None` if a required field is missing, which cannot happen
    /// after validation.
    pub fn into_record(self) -> Option<NewEvent> {
        let event_date = self.event_date?;
        Some(NewEvent {
            creator_id: self.creator_id?,
            name: self.name?.trim().to_string(),
            is_ead: self.is_ead?,
            address: self
                .address
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty()),
            event_date,
            purchase_deadline: self.purchase_deadline.unwrap_or(event_date),
            capacity: self.capacity,
            quantity: self.quantity,
            description: self.description.unwrap_or_default(),
            presenters: self.presenters.unwrap_or_default(),
        })
    }
}

/// An event record ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub creator_id: i64,
    pub name: String,
    pub is_ead: bool,
    pub address: Option<String>,
    pub event_date: NaiveDateTime,
    pub purchase_deadline: NaiveDateTime,
    pub capacity: Option<i32>,
    pub quantity: i32,
    pub description: String,
    pub presenters: Vec<String>,
}

/// The wallet owned by a user. Exactly one per user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Wallet {
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Enrollment of a user's wallet in an event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventWallet {
    pub user_id: i64,
    pub event_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Inbound enrollment payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct LinkPayload {
    #[serde(default, alias = "userId")]
    pub user_id: Option<i64>,
    #[serde(default, alias = "eventId")]
    pub event_id: Option<i64>,
}

impl LinkPayload {
    pub fn new(user_id: i64, event_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
            event_id: Some(event_id),
        }
    }

    /// Key used in messages: `(user:1, event:2)`.
    pub fn display_key(&self) -> String {
        format!(
            "(user:{}, event:{})",
            display_id(self.user_id),
            display_id(self.event_id)
        )
    }
}

fn display_id(id: Option<i64>) -> String {
    id.map(|v| v.to_string()).unwrap_or_else(|| "null".to_string())
}
