use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use crate::credentials::CredentialHasher;
use crate::error::{CoreError, StorageError};
use crate::model::{NewUser, User, UserField, UserPayload};
use crate::rules::UserRules;
use crate::storage::{UserLookup, UserStore, WalletStore};
use crate::validation::Validator;

#[derive(Clone)]
pub struct UserService {
    rules: UserRules,
    users: Arc<dyn UserStore>,
    wallets: Arc<dyn WalletStore>,
    hasher: Arc<dyn CredentialHasher>,
}

impl UserService {
    pub fn new(
        rules: UserRules,
        users: Arc<dyn UserStore>,
        wallets: Arc<dyn WalletStore>,
        hasher: Arc<dyn CredentialHasher>,
    ) -> Self {
        Self {
            rules,
            users,
            wallets,
            hasher,
        }
    }

    /// Create a user and provision its wallet.
    #[instrument(name = "users.create", skip_all, fields(email = %payload.email))]
    pub async fn create(&self, payload: UserPayload) -> Result<User, CoreError> {
        self.rules.check_create(&payload).await?;

        let record = NewUser {
            name: payload.name.trim().to_string(),
            email: payload.email.trim().to_string(),
            phone: payload.normalized_phone().map(str::to_string),
            password_hash: self.hash_optional(payload.password.as_deref())?,
            birth_date: payload.birth_date,
            is_admin: payload.is_admin,
        };
        let user = self
            .users
            .insert(record)
            .await
            .map_err(|e| write_error(e, &payload))?;

        // The user row is committed at this point; a missing wallet is
        // provisioned again by the next `WalletService::ensure_exists`.
        if let Err(e) = self.wallets.ensure_exists(user.id).await {
            error!(user_id = user.id, error = %e, "wallet provisioning failed");
        }

        info!(user_id = user.id, "user created");
        Ok(user)
    }

    /// Replace the profile of user `id`. A missing or empty password keeps
    /// the current one. The store leaves the active flag alone.
    #[instrument(name = "users.update", skip_all, fields(user_id = id))]
    pub async fn update(&self, id: i64, payload: UserPayload) -> Result<User, CoreError> {
        let current = self.get(id).await?;
        self.rules.check_update(id, &payload).await?;

        let password_hash = match self.hash_optional(payload.password.as_deref())? {
            Some(hash) => Some(hash),
            None => current.password_hash.clone(),
        };
        let replacement = User {
            id,
            name: payload.name.trim().to_string(),
            email: payload.email.trim().to_string(),
            phone: payload.normalized_phone().map(str::to_string),
            password_hash,
            birth_date: payload.birth_date,
            is_admin: payload.is_admin,
            ..current
        };

        let user = self
            .users
            .update(replacement)
            .await
            .map_err(|e| write_error(e, &payload))?
            .ok_or_else(|| CoreError::not_found("user", id))?;

        info!("user updated");
        Ok(user)
    }

    pub async fn get(&self, id: i64) -> Result<User, CoreError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::not_found("user", id))
    }

    pub async fn get_by_email(&self, email: &str) -> Result<User, CoreError> {
        self.users
            .find_by(UserField::Email, email.trim())
            .await?
            .ok_or_else(|| CoreError::not_found("user", email))
    }

    pub async fn list(&self) -> Result<Vec<User>, CoreError> {
        Ok(self.users.list().await?)
    }

    /// Soft delete: the row stays, with `is_active = false`.
    #[instrument(name = "users.deactivate", skip(self))]
    pub async fn deactivate(&self, id: i64) -> Result<(), CoreError> {
        if !self.users.soft_delete(id).await? {
            return Err(CoreError::not_found("user", id));
        }
        info!("user deactivated");
        Ok(())
    }

    /// Every violation of a prospective new user, joined with `"; "`.
    /// Empty means valid.
    pub async fn validation_errors(&self, payload: &UserPayload) -> Result<String, CoreError> {
        Ok(self.rules.report(payload).await?.join("; "))
    }

    /// Resolve an active user by email and password.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, CoreError> {
        let user = self
            .users
            .find_by(UserField::Email, email.trim())
            .await?
            .filter(|u| u.is_active)
            .ok_or(CoreError::InvalidCredentials)?;

        match user.password_hash.as_deref() {
            Some(hash) if self.hasher.verify(password, hash) => Ok(user),
            _ => {
                debug!(user_id = user.id, "password mismatch");
                Err(CoreError::InvalidCredentials)
            }
        }
    }

    #[instrument(name = "users.change_password", skip(self, old_password, new_password))]
    pub async fn change_password(
        &self,
        id: i64,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), CoreError> {
        let user = self.get(id).await?;
        let matches = user
            .password_hash
            .as_deref()
            .is_some_and(|hash| self.hasher.verify(old_password, hash));
        if !matches {
            return Err(CoreError::InvalidCredentials);
        }
        Validator::validate_new_password(new_password)?;

        let hash = self.hasher.hash(new_password)?;
        if !self.users.set_password_hash(id, &hash).await? {
            return Err(CoreError::not_found("user", id));
        }
        info!("password changed");
        Ok(())
    }

    fn hash_optional(&self, password: Option<&str>) -> Result<Option<String>, CoreError> {
        password
            .filter(|p| !p.is_empty())
            .map(|p| self.hasher.hash(p))
            .transpose()
    }
}

/// Constraint violations that slip past validation are reported the same
/// way the validator would have.
fn write_error(err: StorageError, payload: &UserPayload) -> CoreError {
    match err {
        StorageError::UniqueViolation(column) => {
            warn!(%column, "unique constraint rejected user after validation");
            if column.contains("phone") {
                CoreError::duplicate("phone", payload.normalized_phone().unwrap_or_default())
            } else if column.contains("email") {
                CoreError::duplicate("email", payload.email.trim())
            } else {
                CoreError::duplicate("name", payload.name.trim())
            }
        }
        other => other.into(),
    }
}
