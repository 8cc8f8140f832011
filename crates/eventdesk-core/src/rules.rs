//! Business rules that need stored data: uniqueness, existence of
//! referenced rows, and derived defaults.
//!
//! Every rule set comes in two flavours. `check_*` stops at the first
//! failure, in the order required fields, field rules, uniqueness,
//! referential existence. `report` collects every violation as text and
//! only fails when the lookups themselves fail.

use std::sync::Arc;

use crate::error::CoreError;
use crate::model::{EventPayload, LinkPayload, UserField, UserPayload};
use crate::storage::{EventLookup, LinkLookup, UserLookup, WalletLookup};
use crate::validation::{is_blank, Validator};

/// Fill the purchase deadline from the event date when it is missing.
pub fn apply_event_defaults(event: &mut EventPayload) {
    if event.purchase_deadline.is_none() {
        event.purchase_deadline = event.event_date;
    }
}

#[derive(Clone)]
pub struct UserRules {
    users: Arc<dyn UserLookup>,
}

impl UserRules {
    pub fn new(users: Arc<dyn UserLookup>) -> Self {
        Self { users }
    }

    /// Rules for a new user.
    pub async fn check_create(&self, user: &UserPayload) -> Result<(), CoreError> {
        self.check(user, None).await
    }

    /// Rules for replacing user `id`; its own row never counts as a duplicate.
    pub async fn check_update(&self, id: i64, user: &UserPayload) -> Result<(), CoreError> {
        self.check(user, Some(id)).await
    }

    async fn check(&self, user: &UserPayload, current_id: Option<i64>) -> Result<(), CoreError> {
        Validator::validate_user(user)?;
        for (field, value) in unique_values(user) {
            if self.taken(field, value, current_id).await? {
                return Err(CoreError::duplicate(field.as_str(), value));
            }
        }
        Ok(())
    }

    /// Every structural and uniqueness violation of a prospective new user.
    pub async fn report(&self, user: &UserPayload) -> Result<Vec<String>, CoreError> {
        let mut violations = Validator::user_violations(user);
        for (field, value) in unique_values(user) {
            if self.taken(field, value, None).await? {
                violations.push(CoreError::duplicate(field.as_str(), value).to_string());
            }
        }
        Ok(violations)
    }

    async fn taken(
        &self,
        field: UserField,
        value: &str,
        current_id: Option<i64>,
    ) -> Result<bool, CoreError> {
        Ok(match current_id {
            None => self.users.exists_by(field, value).await?,
            Some(id) => self
                .users
                .find_by(field, value)
                .await?
                .is_some_and(|existing| existing.id != id),
        })
    }
}

/// Non-blank unique columns of a user payload, trimmed.
fn unique_values(user: &UserPayload) -> Vec<(UserField, &str)> {
    let mut values = Vec::with_capacity(3);
    if !is_blank(&user.name) {
        values.push((UserField::Name, user.name.trim()));
    }
    if !is_blank(&user.email) {
        values.push((UserField::Email, user.email.trim()));
    }
    if let Some(phone) = user.normalized_phone() {
        values.push((UserField::Phone, phone));
    }
    values
}

#[derive(Clone)]
pub struct EventRules {
    users: Arc<dyn UserLookup>,
    events: Arc<dyn EventLookup>,
}

impl EventRules {
    pub fn new(users: Arc<dyn UserLookup>, events: Arc<dyn EventLookup>) -> Self {
        Self { users, events }
    }

    /// Rules for a new event. Defaults must already be applied.
    pub async fn check_create(&self, event: &EventPayload) -> Result<(), CoreError> {
        self.check(event, None).await
    }

    /// Rules for replacing event `id`.
    pub async fn check_update(&self, id: i64, event: &EventPayload) -> Result<(), CoreError> {
        self.check(event, Some(id)).await
    }

    async fn check(&self, event: &EventPayload, current_id: Option<i64>) -> Result<(), CoreError> {
        let Some(creator_id) = event.creator_id else {
            return Err(CoreError::validation("creator_id is required"));
        };
        Validator::validate_event(event)?;

        let name = event.display_name().trim();
        if let Some(existing) = self.events.find_by_name(name).await? {
            if Some(existing.id) != current_id {
                return Err(CoreError::duplicate("event name", name));
            }
        }

        if !self.creator_resolves(creator_id).await? {
            return Err(CoreError::referential("creator", creator_id));
        }
        Ok(())
    }

    /// Every violation of a prospective new event. Defaults are applied to
    /// a copy before checking.
    pub async fn report(&self, event: &EventPayload) -> Result<Vec<String>, CoreError> {
        let mut event = event.clone();
        apply_event_defaults(&mut event);

        let mut violations = Vec::new();
        if event.creator_id.is_none() {
            violations.push("creator_id is required".to_string());
        }
        violations.extend(Validator::event_violations(&event));

        let name = event.display_name().trim();
        if !name.is_empty() && self.events.name_exists(name).await? {
            violations.push(CoreError::duplicate("event name", name).to_string());
        }
        if let Some(creator_id) = event.creator_id {
            if !self.creator_resolves(creator_id).await? {
                violations.push(CoreError::referential("creator", creator_id).to_string());
            }
        }
        Ok(violations)
    }

    /// Creators must exist and still be active.
    async fn creator_resolves(&self, creator_id: i64) -> Result<bool, CoreError> {
        Ok(self
            .users
            .find_by_id(creator_id)
            .await?
            .is_some_and(|u| u.is_active))
    }
}

#[derive(Clone)]
pub struct LinkRules {
    wallets: Arc<dyn WalletLookup>,
    events: Arc<dyn EventLookup>,
    links: Arc<dyn LinkLookup>,
}

impl LinkRules {
    pub fn new(
        wallets: Arc<dyn WalletLookup>,
        events: Arc<dyn EventLookup>,
        links: Arc<dyn LinkLookup>,
    ) -> Self {
        Self {
            wallets,
            events,
            links,
        }
    }

    /// Rules for a new enrollment. Returns the validated `(user, event)` pair.
    pub async fn check_create(&self, link: &LinkPayload) -> Result<(i64, i64), CoreError> {
        Validator::validate_link(link)?;
        let (Some(user_id), Some(event_id)) = (link.user_id, link.event_id) else {
            return Err(CoreError::validation("user_id and event_id are required"));
        };

        if self.links.exists(user_id, event_id).await? {
            return Err(CoreError::duplicate("link", link.display_key()));
        }
        if !self.wallets.exists(user_id).await? {
            return Err(CoreError::referential("wallet", user_id));
        }
        if self.events.find_by_id(event_id).await?.is_none() {
            return Err(CoreError::referential("event", event_id));
        }
        Ok((user_id, event_id))
    }

    pub async fn report(&self, link: &LinkPayload) -> Result<Vec<String>, CoreError> {
        let mut violations = Validator::link_violations(link);
        let user_id = link.user_id.filter(|id| *id > 0);
        let event_id = link.event_id.filter(|id| *id > 0);

        if let (Some(user_id), Some(event_id)) = (user_id, event_id) {
            if self.links.exists(user_id, event_id).await? {
                violations.push(CoreError::duplicate("link", link.display_key()).to_string());
            }
        }
        if let Some(user_id) = user_id {
            if !self.wallets.exists(user_id).await? {
                violations.push(CoreError::referential("wallet", user_id).to_string());
            }
        }
        if let Some(event_id) = event_id {
            if self.events.find_by_id(event_id).await?.is_none() {
                violations.push(CoreError::referential("event", event_id).to_string());
            }
        }
        Ok(violations)
    }
}
