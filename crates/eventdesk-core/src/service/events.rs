use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::error::{CoreError, StorageError};
use crate::model::{Event, EventPayload, NewEvent};
use crate::rules::{apply_event_defaults, EventRules};
use crate::storage::{EventLookup, EventStore};

#[derive(Clone)]
pub struct EventService {
    rules: EventRules,
    events: Arc<dyn EventStore>,
}

impl EventService {
    pub fn new(rules: EventRules, events: Arc<dyn EventStore>) -> Self {
        Self { rules, events }
    }

    #[instrument(name = "events.create", skip_all, fields(name = payload.display_name()))]
    pub async fn create(&self, mut payload: EventPayload) -> Result<Event, CoreError> {
        apply_event_defaults(&mut payload);
        self.rules.check_create(&payload).await?;

        let record = into_record(payload)?;
        let event = self
            .events
            .insert(record.clone())
            .await
            .map_err(|e| write_error(e, &record))?;

        info!(event_id = event.id, "event created");
        Ok(event)
    }

    /// Replace event `id`. Its own name does not count as a duplicate.
    #[instrument(name = "events.update", skip_all, fields(event_id = id))]
    pub async fn update(&self, id: i64, mut payload: EventPayload) -> Result<Event, CoreError> {
        self.get(id).await?;
        apply_event_defaults(&mut payload);
        self.rules.check_update(id, &payload).await?;

        let record = into_record(payload)?;
        let event = self
            .events
            .update(id, record.clone())
            .await
            .map_err(|e| write_error(e, &record))?
            .ok_or_else(|| CoreError::not_found("event", id))?;

        info!("event updated");
        Ok(event)
    }

    pub async fn get(&self, id: i64) -> Result<Event, CoreError> {
        self.events
            .find_by_id(id)
            .await?
            .ok_or_else(|| CoreError::not_found("event", id))
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Event, CoreError> {
        self.events
            .find_by_name(name.trim())
            .await?
            .ok_or_else(|| CoreError::not_found("event", name))
    }

    /// Case-insensitive substring search on the name. A blank term lists
    /// every event.
    pub async fn search(&self, term: Option<&str>) -> Result<Vec<Event>, CoreError> {
        let all = self.events.list().await?;
        let term = match term.map(str::trim) {
            Some(t) if !t.is_empty() => t.to_lowercase(),
            _ => return Ok(all),
        };
        Ok(all
            .into_iter()
            .filter(|e| e.name.to_lowercase().contains(&term))
            .collect())
    }

    pub async fn list_by_creator(&self, creator_id: i64) -> Result<Vec<Event>, CoreError> {
        Ok(self.events.list_by_creator(creator_id).await?)
    }

    /// Hard delete. Enrollments in the event are removed with it.
    #[instrument(name = "events.delete", skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), CoreError> {
        if !self.events.delete(id).await? {
            return Err(CoreError::not_found("event", id));
        }
        info!("event deleted");
        Ok(())
    }

    /// Every violation of a prospective new event, joined with `"; "`.
    pub async fn validation_errors(&self, payload: &EventPayload) -> Result<String, CoreError> {
        Ok(self.rules.report(payload).await?.join("; "))
    }

    /// Store the event's image as given. Empty bytes clear it.
    pub async fn set_image(&self, id: i64, bytes: Vec<u8>) -> Result<Event, CoreError> {
        let image = (!bytes.is_empty()).then_some(bytes);
        if !self.events.set_image(id, image).await? {
            return Err(CoreError::not_found("event", id));
        }
        self.get(id).await
    }

    pub async fn image(&self, id: i64) -> Result<Vec<u8>, CoreError> {
        match self.events.image(id).await? {
            None => Err(CoreError::not_found("event", id)),
            Some(None) => Err(CoreError::not_found("image", id)),
            Some(Some(bytes)) => Ok(bytes),
        }
    }
}

fn into_record(payload: EventPayload) -> Result<NewEvent, CoreError> {
    payload
        .into_record()
        .ok_or_else(|| CoreError::validation("event payload is incomplete"))
}

fn write_error(err: StorageError, record: &NewEvent) -> CoreError {
    match err {
        StorageError::UniqueViolation(column) => {
            warn!(%column, "unique constraint rejected event after validation");
            CoreError::duplicate("event name", &record.name)
        }
        StorageError::ForeignKeyViolation => {
            warn!(creator_id = record.creator_id, "creator vanished after validation");
            CoreError::referential("creator", record.creator_id)
        }
        other => other.into(),
    }
}
