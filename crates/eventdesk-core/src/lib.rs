//! EventDesk Core - Domain models, validation rules and services.
//!
//! Everything here talks to persistence through the traits in [`storage`],
//! so the crate carries no database dependency of its own.

pub mod credentials;
pub mod error;
pub mod model;
pub mod rules;
pub mod seed;
pub mod service;
pub mod storage;
pub mod validation;

pub use credentials::CredentialHasher;
pub use error::{CoreError, StorageError};
pub use model::{
    Event, EventPayload, EventWallet, LinkPayload, NewEvent, NewUser, User, UserField,
    UserPayload, Wallet,
};
pub use rules::{apply_event_defaults, EventRules, LinkRules, UserRules};
pub use seed::{SeedIssue, SeedReport, SeedRequest, SeedStatus, Seeder};
pub use service::{EventService, LinkService, Services, UserService, WalletService};
pub use storage::{
    EventLookup, EventStore, LinkLookup, LinkStore, UserLookup, UserStore, WalletLookup,
    WalletStore,
};
pub use validation::{Validator, MIN_PASSWORD_LEN};

#[cfg(any(test, feature = "test-utils"))]
pub use credentials::PlainHasher;
#[cfg(any(test, feature = "test-utils"))]
pub use storage::memory::InMemoryStore;
