//! Persistence ports.
//!
//! Read-only lookups are split from the write stores so that validators can
//! be handed exactly the queries they need.

use async_trait::async_trait;

use crate::error::StorageError;
use crate::model::{Event, EventWallet, NewEvent, NewUser, User, UserField, Wallet};

#[async_trait]
pub trait UserLookup: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StorageError>;

    /// Exact match on a unique column.
    async fn find_by(&self, field: UserField, value: &str) -> Result<Option<User>, StorageError>;

    async fn exists_by(&self, field: UserField, value: &str) -> Result<bool, StorageError> {
        Ok(self.find_by(field, value).await?.is_some())
    }
}

#[async_trait]
pub trait UserStore: UserLookup {
    async fn list(&self) -> Result<Vec<User>, StorageError>;

    /// Insert a user; the store assigns id and timestamps.
    async fn insert(&self, user: NewUser) -> Result<User, StorageError>;

    /// Overwrite the profile columns of `user.id` and refresh `updated_at`.
    /// The active flag is left alone. Returns `None` if no such row exists.
    async fn update(&self, user: User) -> Result<Option<User>, StorageError>;

    /// Flip the active flag off. Returns false if no such row exists.
    async fn soft_delete(&self, id: i64) -> Result<bool, StorageError>;

    async fn set_password_hash(&self, id: i64, hash: &str) -> Result<bool, StorageError>;
}

#[async_trait]
pub trait EventLookup: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Event>, StorageError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Event>, StorageError>;

    async fn name_exists(&self, name: &str) -> Result<bool, StorageError> {
        Ok(self.find_by_name(name).await?.is_some())
    }
}

#[async_trait]
pub trait EventStore: EventLookup {
    /// All events ordered by id.
    async fn list(&self) -> Result<Vec<Event>, StorageError>;

    async fn list_by_creator(&self, creator_id: i64) -> Result<Vec<Event>, StorageError>;

    async fn insert(&self, event: NewEvent) -> Result<Event, StorageError>;

    /// Replace the event's fields. Image and timestamps other than
    /// `updated_at` are kept. Returns `None` if no such row exists.
    async fn update(&self, id: i64, event: NewEvent) -> Result<Option<Event>, StorageError>;

    /// Hard delete; links to the event go with it.
    async fn delete(&self, id: i64) -> Result<bool, StorageError>;

    async fn set_image(&self, id: i64, image: Option<Vec<u8>>) -> Result<bool, StorageError>;

    /// `None` if the event does not exist, `Some(None)` if it has no image.
    async fn image(&self, id: i64) -> Result<Option<Option<Vec<u8>>>, StorageError>;
}

#[async_trait]
pub trait WalletLookup: Send + Sync {
    async fn find(&self, user_id: i64) -> Result<Option<Wallet>, StorageError>;

    async fn exists(&self, user_id: i64) -> Result<bool, StorageError> {
        Ok(self.find(user_id).await?.is_some())
    }
}

#[async_trait]
pub trait WalletStore: WalletLookup {
    /// Insert-if-absent. Returns the wallet either way.
    async fn ensure_exists(&self, user_id: i64) -> Result<Wallet, StorageError>;
}

#[async_trait]
pub trait LinkLookup: Send + Sync {
    async fn exists(&self, user_id: i64, event_id: i64) -> Result<bool, StorageError>;
}

#[async_trait]
pub trait LinkStore: LinkLookup {
    async fn insert(&self, user_id: i64, event_id: i64) -> Result<EventWallet, StorageError>;

    async fn delete(&self, user_id: i64, event_id: i64) -> Result<bool, StorageError>;

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<EventWallet>, StorageError>;
}

// In-memory implementation for testing
#[cfg(any(test, feature = "test-utils"))]
pub mod memory {
    use super::*;
    use chrono::Utc;
    use std::collections::{BTreeMap, HashMap};
    use std::sync::RwLock;

    #[derive(Default)]
    struct Tables {
        users: BTreeMap<i64, User>,
        events: BTreeMap<i64, (Event, Option<Vec<u8>>)>,
        wallets: HashMap<i64, Wallet>,
        links: BTreeMap<(i64, i64), EventWallet>,
        next_user_id: i64,
        next_event_id: i64,
    }

    /// In-memory store implementing every port, with the same unique and
    /// foreign key constraints as the SQL schema.
    #[derive(Default)]
    pub struct InMemoryStore {
        tables: RwLock<Tables>,
    }

    impl InMemoryStore {
        pub fn new() -> Self {
            Self::default()
        }
    }

    fn user_matches(user: &User, field: UserField, value: &str) -> bool {
        match field {
            UserField::Name => user.name == value,
            UserField::Email => user.email == value,
            UserField::Phone => user.phone.as_deref() == Some(value),
        }
    }

    fn unique_conflict(
        users: &BTreeMap<i64, User>,
        id: Option<i64>,
        name: &str,
        email: &str,
        phone: Option<&str>,
    ) -> Option<StorageError> {
        let others = || users.values().filter(move |u| Some(u.id) != id);
        if others().any(|u| u.name == name) {
            return Some(StorageError::UniqueViolation("name".to_string()));
        }
        if others().any(|u| u.email == email) {
            return Some(StorageError::UniqueViolation("email".to_string()));
        }
        if let Some(phone) = phone {
            if others().any(|u| u.phone.as_deref() == Some(phone)) {
                return Some(StorageError::UniqueViolation("phone".to_string()));
            }
        }
        None
    }

    fn with_image_flag(event: &Event, image: &Option<Vec<u8>>) -> Event {
        Event {
            has_image: image.is_some(),
            ..event.clone()
        }
    }

    #[async_trait]
    impl UserLookup for InMemoryStore {
        async fn find_by_id(&self, id: i64) -> Result<Option<User>, StorageError> {
            Ok(self.tables.read().unwrap().users.get(&id).cloned())
        }

        async fn find_by(
            &self,
            field: UserField,
            value: &str,
        ) -> Result<Option<User>, StorageError> {
            let tables = self.tables.read().unwrap();
            Ok(tables
                .users
                .values()
                .find(|u| user_matches(u, field, value))
                .cloned())
        }
    }

    #[async_trait]
    impl UserStore for InMemoryStore {
        async fn list(&self) -> Result<Vec<User>, StorageError> {
            Ok(self.tables.read().unwrap().users.values().cloned().collect())
        }

        async fn insert(&self, user: NewUser) -> Result<User, StorageError> {
            let mut tables = self.tables.write().unwrap();
            if let Some(err) = unique_conflict(
                &tables.users,
                None,
                &user.name,
                &user.email,
                user.phone.as_deref(),
            ) {
                return Err(err);
            }

            tables.next_user_id += 1;
            let now = Utc::now();
            let created = User {
                id: tables.next_user_id,
                name: user.name,
                email: user.email,
                phone: user.phone,
                password_hash: user.password_hash,
                birth_date: user.birth_date,
                is_admin: user.is_admin,
                is_active: true,
                created_at: now,
                updated_at: now,
            };
            tables.users.insert(created.id, created.clone());
            Ok(created)
        }

        async fn update(&self, user: User) -> Result<Option<User>, StorageError> {
            let mut tables = self.tables.write().unwrap();
            if !tables.users.contains_key(&user.id) {
                return Ok(None);
            }
            if let Some(err) = unique_conflict(
                &tables.users,
                Some(user.id),
                &user.name,
                &user.email,
                user.phone.as_deref(),
            ) {
                return Err(err);
            }

            let Some(stored) = tables.users.get_mut(&user.id) else {
                return Ok(None);
            };
            let created_at = stored.created_at;
            let is_active = stored.is_active;
            *stored = User {
                created_at,
                is_active,
                updated_at: Utc::now(),
                ..user
            };
            Ok(Some(stored.clone()))
        }

        async fn soft_delete(&self, id: i64) -> Result<bool, StorageError> {
            let mut tables = self.tables.write().unwrap();
            match tables.users.get_mut(&id) {
                Some(user) => {
                    user.is_active = false;
                    user.updated_at = Utc::now();
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn set_password_hash(&self, id: i64, hash: &str) -> Result<bool, StorageError> {
            let mut tables = self.tables.write().unwrap();
            match tables.users.get_mut(&id) {
                Some(user) => {
                    user.password_hash = Some(hash.to_string());
                    user.updated_at = Utc::now();
                    Ok(true)
                }
                None => Ok(false),
            }
        }
    }

    #[async_trait]
    impl EventLookup for InMemoryStore {
        async fn find_by_id(&self, id: i64) -> Result<Option<Event>, StorageError> {
            let tables = self.tables.read().unwrap();
            Ok(tables
                .events
                .get(&id)
                .map(|(event, image)| with_image_flag(event, image)))
        }

        async fn find_by_name(&self, name: &str) -> Result<Option<Event>, StorageError> {
            let tables = self.tables.read().unwrap();
            Ok(tables
                .events
                .values()
                .find(|(event, _)| event.name == name)
                .map(|(event, image)| with_image_flag(event, image)))
        }
    }

    #[async_trait]
    impl EventStore for InMemoryStore {
        async fn list(&self) -> Result<Vec<Event>, StorageError> {
            let tables = self.tables.read().unwrap();
            Ok(tables
                .events
                .values()
                .map(|(event, image)| with_image_flag(event, image))
                .collect())
        }

        async fn list_by_creator(&self, creator_id: i64) -> Result<Vec<Event>, StorageError> {
            let tables = self.tables.read().unwrap();
            Ok(tables
                .events
                .values()
                .filter(|(event, _)| event.creator_id == creator_id)
                .map(|(event, image)| with_image_flag(event, image))
                .collect())
        }

        async fn insert(&self, event: NewEvent) -> Result<Event, StorageError> {
            let mut tables = self.tables.write().unwrap();
            if tables.events.values().any(|(e, _)| e.name == event.name) {
                return Err(StorageError::UniqueViolation("name".to_string()));
            }
            if !tables.users.contains_key(&event.creator_id) {
                return Err(StorageError::ForeignKeyViolation);
            }

            tables.next_event_id += 1;
            let now = Utc::now();
            let created = Event {
                id: tables.next_event_id,
                creator_id: event.creator_id,
                name: event.name,
                is_ead: event.is_ead,
                address: event.address,
                event_date: event.event_date,
                purchase_deadline: event.purchase_deadline,
                capacity: event.capacity,
                quantity: event.quantity,
                description: event.description,
                presenters: event.presenters,
                has_image: false,
                created_at: now,
                updated_at: now,
            };
            tables.events.insert(created.id, (created.clone(), None));
            Ok(created)
        }

        async fn update(&self, id: i64, event: NewEvent) -> Result<Option<Event>, StorageError> {
            let mut tables = self.tables.write().unwrap();
            if !tables.events.contains_key(&id) {
                return Ok(None);
            }
            if tables
                .events
                .values()
                .any(|(e, _)| e.id != id && e.name == event.name)
            {
                return Err(StorageError::UniqueViolation("name".to_string()));
            }
            if !tables.users.contains_key(&event.creator_id) {
                return Err(StorageError::ForeignKeyViolation);
            }

            let Some((stored, image)) = tables.events.get_mut(&id) else {
                return Ok(None);
            };
            *stored = Event {
                id,
                creator_id: event.creator_id,
                name: event.name,
                is_ead: event.is_ead,
                address: event.address,
                event_date: event.event_date,
                purchase_deadline: event.purchase_deadline,
                capacity: event.capacity,
                quantity: event.quantity,
                description: event.description,
                presenters: event.presenters,
                has_image: image.is_some(),
                created_at: stored.created_at,
                updated_at: Utc::now(),
            };
            Ok(Some(stored.clone()))
        }

        async fn delete(&self, id: i64) -> Result<bool, StorageError> {
            let mut tables = self.tables.write().unwrap();
            let removed = tables.events.remove(&id).is_some();
            if removed {
                tables.links.retain(|(_, event_id), _| *event_id != id);
            }
            Ok(removed)
        }

        async fn set_image(&self, id: i64, image: Option<Vec<u8>>) -> Result<bool, StorageError> {
            let mut tables = self.tables.write().unwrap();
            match tables.events.get_mut(&id) {
                Some((event, stored)) => {
                    event.has_image = image.is_some();
                    event.updated_at = Utc::now();
                    *stored = image;
                    Ok(true)
                }
                None => Ok(false),
            }
        }

        async fn image(&self, id: i64) -> Result<Option<Option<Vec<u8>>>, StorageError> {
            let tables = self.tables.read().unwrap();
            Ok(tables.events.get(&id).map(|(_, image)| image.clone()))
        }
    }

    #[async_trait]
    impl WalletLookup for InMemoryStore {
        async fn find(&self, user_id: i64) -> Result<Option<Wallet>, StorageError> {
            Ok(self.tables.read().unwrap().wallets.get(&user_id).cloned())
        }
    }

    #[async_trait]
    impl WalletStore for InMemoryStore {
        async fn ensure_exists(&self, user_id: i64) -> Result<Wallet, StorageError> {
            let mut tables = self.tables.write().unwrap();
            if !tables.users.contains_key(&user_id) {
                return Err(StorageError::ForeignKeyViolation);
            }
            let now = Utc::now();
            Ok(tables
                .wallets
                .entry(user_id)
                .or_insert_with(|| Wallet {
                    user_id,
                    created_at: now,
                    updated_at: now,
                })
                .clone())
        }
    }

    #[async_trait]
    impl LinkLookup for InMemoryStore {
        async fn exists(&self, user_id: i64, event_id: i64) -> Result<bool, StorageError> {
            let tables = self.tables.read().unwrap();
            Ok(tables.links.contains_key(&(user_id, event_id)))
        }
    }

    #[async_trait]
    impl LinkStore for InMemoryStore {
        async fn insert(&self, user_id: i64, event_id: i64) -> Result<EventWallet, StorageError> {
            let mut tables = self.tables.write().unwrap();
            if tables.links.contains_key(&(user_id, event_id)) {
                return Err(StorageError::UniqueViolation("event_wallets".to_string()));
            }
            if !tables.wallets.contains_key(&user_id) || !tables.events.contains_key(&event_id) {
                return Err(StorageError::ForeignKeyViolation);
            }
            let now = Utc::now();
            let link = EventWallet {
                user_id,
                event_id,
                created_at: now,
                updated_at: now,
            };
            tables.links.insert((user_id, event_id), link.clone());
            Ok(link)
        }

        async fn delete(&self, user_id: i64, event_id: i64) -> Result<bool, StorageError> {
            let mut tables = self.tables.write().unwrap();
            Ok(tables.links.remove(&(user_id, event_id)).is_some())
        }

        async fn list_by_user(&self, user_id: i64) -> Result<Vec<EventWallet>, StorageError> {
            let tables = self.tables.read().unwrap();
            Ok(tables
                .links
                .values()
                .filter(|l| l.user_id == user_id)
                .cloned()
                .collect())
        }
    }

}
