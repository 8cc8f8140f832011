use std::sync::Arc;

use tracing::debug;

use crate::error::{CoreError, StorageError};
use crate::model::Wallet;
use crate::storage::{WalletLookup, WalletStore};
use crate::validation::Validator;

#[derive(Clone)]
pub struct WalletService {
    wallets: Arc<dyn WalletStore>,
}

impl WalletService {
    pub fn new(wallets: Arc<dyn WalletStore>) -> Self {
        Self { wallets }
    }

    pub async fn get(&self, user_id: i64) -> Result<Wallet, CoreError> {
        Validator::validate_wallet(Some(user_id))?;
        self.wallets
            .find(user_id)
            .await?
            .ok_or_else(|| CoreError::not_found("wallet", user_id))
    }

    /// Insert-if-absent. Fails with a referential error if the user is unknown.
    pub async fn ensure_exists(&self, user_id: i64) -> Result<Wallet, CoreError> {
        Validator::validate_wallet(Some(user_id))?;
        match self.wallets.ensure_exists(user_id).await {
            Ok(wallet) => Ok(wallet),
            Err(StorageError::ForeignKeyViolation) => {
                debug!(user_id, "wallet requested for unknown user");
                Err(CoreError::referential("user", user_id))
            }
            Err(other) => Err(other.into()),
        }
    }

    pub async fn exists(&self, user_id: i64) -> Result<bool, CoreError> {
        Validator::validate_wallet(Some(user_id))?;
        Ok(self.wallets.exists(user_id).await?)
    }

    pub fn validation_errors(&self, user_id: Option<i64>) -> String {
        Validator::wallet_violations(user_id).join("; ")
    }
}
