//! Batch seeding.
//!
//! Users are created first, then events, then links, so later items may
//! reference earlier ones. Each item runs in its own failure boundary and
//! nothing is rolled back.

use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use crate::error::CoreError;
use crate::model::{EventPayload, LinkPayload, UserPayload};
use crate::service::{EventService, LinkService, UserService};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedRequest {
    #[serde(default)]
    pub users: Vec<UserPayload>,
    #[serde(default)]
    pub events: Vec<EventPayload>,
    #[serde(default, alias = "enrollments")]
    pub links: Vec<LinkPayload>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedStatus {
    Success,
    PartialSuccess,
}

/// One rejected item, keyed by its natural identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeedIssue {
    pub key: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedReport {
    pub users_created: usize,
    pub events_created: usize,
    pub links_created: usize,
    pub warnings: Vec<SeedIssue>,
    pub errors: Vec<SeedIssue>,
    pub status: SeedStatus,
}

impl Default for SeedReport {
    fn default() -> Self {
        Self {
            users_created: 0,
            events_created: 0,
            links_created: 0,
            warnings: Vec::new(),
            errors: Vec::new(),
            status: SeedStatus::Success,
        }
    }
}

impl SeedReport {
    /// Files a failed item as a warning if the payload was at fault, as an
    /// error otherwise.
    fn record_failure(&mut self, kind: &str, key: String, err: CoreError) {
        let issue = SeedIssue {
            key,
            message: err.to_string(),
        };
        if err.is_recoverable() {
            warn!(kind, key = %issue.key, error = %issue.message, "seed item rejected");
            self.warnings.push(issue);
        } else {
            error!(kind, key = %issue.key, error = %issue.message, "seed item failed");
            self.errors.push(issue);
        }
    }

    fn finish(mut self) -> Self {
        self.status = if self.errors.is_empty() {
            SeedStatus::Success
        } else {
            SeedStatus::PartialSuccess
        };
        self
    }
}

#[derive(Clone)]
pub struct Seeder {
    users: UserService,
    events: EventService,
    links: LinkService,
}

impl Seeder {
    pub fn new(users: UserService, events: EventService, links: LinkService) -> Self {
        Self {
            users,
            events,
            links,
        }
    }

    #[instrument(
        name = "seed",
        skip_all,
        fields(
            users = request.users.len(),
            events = request.events.len(),
            links = request.links.len()
        )
    )]
    pub async fn seed(&self, request: SeedRequest) -> SeedReport {
        let mut report = SeedReport::default();

        for user in request.users {
            let key = user.email.trim().to_string();
            match self.users.create(user).await {
                Ok(_) => report.users_created += 1,
                Err(e) => report.record_failure("user", key, e),
            }
        }

        for event in request.events {
            let key = event.display_name().trim().to_string();
            match self.events.create(event).await {
                Ok(_) => report.events_created += 1,
                Err(e) => report.record_failure("event", key, e),
            }
        }

        for link in request.links {
            let key = link.display_key();
            match self.links.add(link).await {
                Ok(_) => report.links_created += 1,
                Err(e) => report.record_failure("link", key, e),
            }
        }

        let report = report.finish();
        info!(
            users_created = report.users_created,
            events_created = report.events_created,
            links_created = report.links_created,
            warnings = report.warnings.len(),
            errors = report.errors.len(),
            status = ?report.status,
            "seed finished"
        );
        report
    }
}
