use serde::{Deserialize, Serialize};

/// What kind of entity a feed event is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Like,
    Review,
    Friend,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Like => "LIKE",
            EventType::Review => "REVIEW",
            EventType::Friend => "FRIEND",
        }
    }

    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "LIKE" => Some(EventType::Like),
            "REVIEW" => Some(EventType::Review),
            "FRIEND" => Some(EventType::Friend),
            _ => None,
        }
    }
}

/// What the actor did to the entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventOperation {
    Add,
    Remove,
    Update,
}

impl EventOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventOperation::Add => "ADD",
            EventOperation::Remove => "REMOVE",
            EventOperation::Update => "UPDATE",
        }
    }

    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "ADD" => Some(EventOperation::Add),
            "REMOVE" => Some(EventOperation::Remove),
            "UPDATE" => Some(EventOperation::Update),
            _ => None,
        }
    }
}

/// A persisted activity feed entry. Events are immutable: there is no update
/// or delete path anywhere in the codebase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub event_id: i64,
    pub event_type: EventType,
    pub operation: EventOperation,
    pub user_id: i64,
    pub entity_id: i64,
    /// Seconds since epoch, assigned by the writer at insert time
    pub timestamp: i64,
}

/// A feed entry about to be inserted; the store assigns `event_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub event_type: EventType,
    pub operation: EventOperation,
    pub user_id: i64,
    pub entity_id: i64,
    pub timestamp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_db_round_trip() {
        for ty in [EventType::Like, EventType::Review, EventType::Friend] {
            assert_eq!(EventType::from_db(ty.as_str()), Some(ty));
        }
        assert_eq!(EventType::from_db("DISLIKE"), None);
    }

    #[test]
    fn test_event_operation_db_round_trip() {
        for op in [
            EventOperation::Add,
            EventOperation::Remove,
            EventOperation::Update,
        ] {
            assert_eq!(EventOperation::from_db(op.as_str()), Some(op));
        }
        assert_eq!(EventOperation::from_db("UPSERT"), None);
    }

    #[test]
    fn test_event_serializes_screaming_snake_case() {
        let event = Event {
            event_id: 1,
            event_type: EventType::Like,
            operation: EventOperation::Add,
            user_id: 42,
            entity_id: 7,
            timestamp: 1_700_000_000,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"], "LIKE");
        assert_eq!(json["operation"], "ADD");
    }
}
