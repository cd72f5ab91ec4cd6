//! Mock backend state.
//!
//! Appointments live in memory for the lifetime of the process.

use chrono::Utc;
use serde_json::{Map, Value};
use std::time::Instant;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Field holding the generated record id.
pub const ID_FIELD: &str = "_id";

/// Field holding the creation timestamp.
pub const CREATED_AT_FIELD: &str = "createdAt";

/// Shared mock backend state.
pub struct MockState {
    /// Server start time.
    pub start_time: Instant,
    /// Stored appointments, in insertion order.
    appointments: RwLock<Vec<Value>>,
}

impl MockState {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            appointments: RwLock::new(Vec::new()),
        }
    }

    /// Returns the uptime in seconds.
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Returns a snapshot of every appointment.
    pub async fn list(&self) -> Vec<Value> {
        self.appointments.read().await.clone()
    }

    /// Returns the number of stored appointments.
    pub async fn count(&self) -> usize {
        self.appointments.read().await.len()
    }

    /// Stores a payload, stamping it with an id and a creation time.
    pub async fn insert(&self, mut fields: Map<String, Value>) -> Value {
        fields.insert(ID_FIELD.to_string(), Value::String(Uuid::new_v4().to_string()));
        fields.insert(
            CREATED_AT_FIELD.to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
        let record = Value::Object(fields);
        self.appointments.write().await.push(record.clone());
        record
    }

    /// Removes the appointment with the given id, returning it.
    pub async fn remove(&self, id: &str) -> Option<Value> {
        let mut appointments = self.appointments.write().await;
        let index = appointments
            .iter()
            .position(|record| record.get(ID_FIELD).and_then(Value::as_str) == Some(id))?;
        Some(appointments.remove(index))
    }
}

impl Default for MockState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[tokio::test]
    async fn test_insert_stamps_id_and_timestamp() {
        let state = MockState::new();
        let record = state.insert(fields(json!({"name": "Ada"}))).await;

        assert_eq!(record["name"], "Ada");
        assert!(record[ID_FIELD].as_str().is_some());
        assert!(record[CREATED_AT_FIELD].as_str().is_some());
        assert_eq!(state.count().await, 1);
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let state = MockState::new();
        state.insert(fields(json!({"name": "first"}))).await;
        state.insert(fields(json!({"name": "second"}))).await;

        let names: Vec<_> = state
            .list()
            .await
            .into_iter()
            .map(|record| record["name"].clone())
            .collect();
        assert_eq!(names, vec![json!("first"), json!("second")]);
    }

    #[tokio::test]
    async fn test_remove() {
        let state = MockState::new();
        let record = state.insert(fields(json!({"name": "Ada"}))).await;
        let id = record[ID_FIELD].as_str().unwrap().to_string();

        assert!(state.remove("unknown").await.is_none());
        assert_eq!(state.remove(&id).await, Some(record));
        assert!(state.remove(&id).await.is_none());
        assert_eq!(state.count().await, 0);
    }
}
