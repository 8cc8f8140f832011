use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::error::{CoreError, StorageError};
use crate::model::{EventWallet, LinkPayload};
use crate::rules::LinkRules;
use crate::storage::LinkStore;
use crate::validation::Validator;

/// Enrollment of wallets in events.
#[derive(Clone)]
pub struct LinkService {
    rules: LinkRules,
    links: Arc<dyn LinkStore>,
}

impl LinkService {
    pub fn new(rules: LinkRules, links: Arc<dyn LinkStore>) -> Self {
        Self { rules, links }
    }

    #[instrument(name = "links.add", skip_all, fields(link = %payload.display_key()))]
    pub async fn add(&self, payload: LinkPayload) -> Result<EventWallet, CoreError> {
        let (user_id, event_id) = self.rules.check_create(&payload).await?;

        let link = self
            .links
            .insert(user_id, event_id)
            .await
            .map_err(|e| match e {
                StorageError::UniqueViolation(_) => {
                    warn!("unique constraint rejected link after validation");
                    CoreError::duplicate("link", payload.display_key())
                }
                StorageError::ForeignKeyViolation => {
                    warn!("link target vanished after validation");
                    CoreError::referential("wallet or event", payload.display_key())
                }
                other => other.into(),
            })?;

        info!("link created");
        Ok(link)
    }

    #[instrument(name = "links.remove", skip(self))]
    pub async fn remove(&self, user_id: i64, event_id: i64) -> Result<(), CoreError> {
        let payload = LinkPayload::new(user_id, event_id);
        Validator::validate_link(&payload)?;
        if !self.links.delete(user_id, event_id).await? {
            return Err(CoreError::not_found("link", payload.display_key()));
        }
        info!("link removed");
        Ok(())
    }

    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<EventWallet>, CoreError> {
        Validator::validate_wallet(Some(user_id))?;
        Ok(self.links.list_by_user(user_id).await?)
    }

    /// Every violation of a prospective link, joined with `"; "`.
    pub async fn validation_errors(&self, payload: &LinkPayload) -> Result<String, CoreError> {
        Ok(self.rules.report(payload).await?.join("; "))
    }
}
