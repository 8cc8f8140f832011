pub mod events;
pub mod links;
pub mod users;
pub mod wallets;

use std::sync::Arc;

pub use events::EventService;
pub use links::LinkService;
pub use users::UserService;
pub use wallets::WalletService;

use crate::credentials::CredentialHasher;
use crate::rules::{EventRules, LinkRules, UserRules};
use crate::seed::Seeder;
use crate::storage::{EventStore, LinkStore, UserStore, WalletStore};

/// All entity services, wired against one backing store.
#[derive(Clone)]
pub struct Services {
    pub users: UserService,
    pub events: EventService,
    pub wallets: WalletService,
    pub links: LinkService,
}

impl Services {
    pub fn new<S>(store: Arc<S>, hasher: Arc<dyn CredentialHasher>) -> Self
    where
        S: UserStore + EventStore + WalletStore + LinkStore + 'static,
    {
        let users: Arc<dyn UserStore> = store.clone();
        let events: Arc<dyn EventStore> = store.clone();
        let wallets: Arc<dyn WalletStore> = store.clone();
        let links: Arc<dyn LinkStore> = store.clone();

        Self {
            users: UserService::new(
                UserRules::new(store.clone()),
                users,
                wallets.clone(),
                hasher,
            ),
            events: EventService::new(EventRules::new(store.clone(), store.clone()), events),
            wallets: WalletService::new(wallets),
            links: LinkService::new(
                LinkRules::new(store.clone(), store.clone(), store),
                links,
            ),
        }
    }

    pub fn seeder(&self) -> Seeder {
        Seeder::new(self.users.clone(), self.events.clone(), self.links.clone())
    }
}
