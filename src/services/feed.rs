use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::models::{Event, EventOperation, EventType, NewEvent};
use crate::store::CatalogStore;

/// Retrieval order for a user's feed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedOrder {
    /// Oldest first
    #[default]
    Asc,
    /// Newest first
    Desc,
}

/// Append-only log of user actions.
///
/// Every mutating collaborator gets an `ActivityFeed` injected and calls
/// `record` after its primary write commits. The feed itself is
/// monotonically growing: events are never updated or deleted.
pub struct ActivityFeed {
    store: Arc<dyn CatalogStore>,
}

impl ActivityFeed {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Appends one event, stamped with the current epoch second.
    ///
    /// Fire-and-forget: a failed append is logged and swallowed so it can
    /// never roll back or fail the primary mutation it follows.
    pub async fn record(
        &self,
        user_id: i64,
        entity_id: i64,
        event_type: EventType,
        operation: EventOperation,
    ) {
        let event = NewEvent {
            event_type,
            operation,
            user_id,
            entity_id,
            timestamp: Utc::now().timestamp(),
        };
        match self.store.insert_event(event).await {
            Ok(event) => tracing::debug!(
                event_id = event.event_id,
                user_id,
                entity_id,
                event_type = event.event_type.as_str(),
                operation = event.operation.as_str(),
                "Feed event recorded"
            ),
            Err(error) => tracing::warn!(
                error = %error,
                user_id,
                entity_id,
                "Feed append failed; primary mutation is unaffected"
            ),
        }
    }

    /// A user's feed, totally ordered by `(timestamp, event_id)`.
    ///
    /// Unknown users are a not-found error; a known user with no events gets
    /// an empty list.
    pub async fn feed_for(&self, user_id: i64, order: FeedOrder) -> AppResult<Vec<Event>> {
        if !self.store.user_exists(user_id).await? {
            return Err(AppError::NotFound(format!(
                "user with id {user_id} does not exist"
            )));
        }

        let mut events = self.store.events_for_user(user_id).await?;
        if order == FeedOrder::Desc {
            events.reverse();
        }
        Ok(events)
    }
}
