// Scheduled task module
// Variable-length tasks dropped onto the grid from the host's todo backlog

use serde::{Deserialize, Serialize};

use super::block::{BlockKey, GridKind};

/// A task anchored to a grid cell and spanning one or more contiguous blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledTask {
    pub id: u64,
    /// Id of the backlog todo this task was created from.
    pub source_todo_id: String,
    pub text: String,
    pub start_hour: u8,
    pub start_block: u8,
    pub block_count: u32,
    pub grid: GridKind,
    pub color: String,
}

impl ScheduledTask {
    pub fn start_key(&self) -> BlockKey {
        BlockKey::new(self.start_hour, self.start_block)
    }

    pub fn start_ordinal(&self, blocks_per_hour: u8) -> u32 {
        self.start_key().ordinal(blocks_per_hour)
    }

    /// Ordinal of the last block the task occupies (inclusive).
    pub fn end_ordinal(&self, blocks_per_hour: u8) -> u32 {
        self.start_ordinal(blocks_per_hour) + self.block_count.saturating_sub(1)
    }
}

/// One contiguous run of a task confined to a single hour row. Tasks that
/// cross an hour boundary render as several segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSegment {
    pub task_id: u64,
    pub hour: u8,
    pub start_block: u8,
    pub block_count: u32,
    /// First segment of its task; carries the left resize handle.
    pub is_first: bool,
    /// Last segment of its task; carries the right resize handle.
    pub is_last: bool,
}

/// A backlog todo that can be dropped onto the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulableTodo {
    pub id: String,
    pub text: String,
    pub duration_minutes: f64,
}

/// Wire contract for drops coming from the host. Payloads of any other kind
/// deserialize to [`DropPayload::Unknown`] and are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum DropPayload {
    #[serde(rename = "schedulable-todo")]
    SchedulableTodo(SchedulableTodo),
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task() -> ScheduledTask {
        ScheduledTask {
            id: 1,
            source_todo_id: "todo-9".to_string(),
            text: "write report".to_string(),
            start_hour: 5,
            start_block: 4,
            block_count: 13,
            grid: GridKind::Actual,
            color: "#4a90d9".to_string(),
        }
    }

    #[test]
    fn test_start_and_end_ordinals() {
        let task = sample_task();
        assert_eq!(task.start_ordinal(6), 34);
        assert_eq!(task.end_ordinal(6), 46);
    }

    #[test]
    fn test_end_ordinal_of_single_block_task() {
        let mut task = sample_task();
        task.block_count = 1;
        assert_eq!(task.end_ordinal(6), task.start_ordinal(6));
    }

    #[test]
    fn test_task_serde_round_trip_uses_camel_case() {
        let task = sample_task();
        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("sourceTodoId"));
        assert!(json.contains("startHour"));
        assert!(json.contains("blockCount"));
        assert!(json.contains("\"grid\":\"actual\""));

        let back: ScheduledTask = serde_json::from_str(&json).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn test_drop_payload_parses_schedulable_todo() {
        let json = r#"{"kind":"schedulable-todo","id":"t1","text":"Read","durationMinutes":45}"#;
        let payload: DropPayload = serde_json::from_str(json).unwrap();
        assert_eq!(
            payload,
            DropPayload::SchedulableTodo(SchedulableTodo {
                id: "t1".to_string(),
                text: "Read".to_string(),
                duration_minutes: 45.0,
            })
        );
    }

    #[test]
    fn test_drop_payload_of_other_kind_is_unknown() {
        let json = r#"{"kind":"diary-entry","id":"d1"}"#;
        let payload: DropPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload, DropPayload::Unknown);
    }

    #[test]
    fn test_drop_payload_with_missing_fields_is_an_error() {
        let json = r#"{"kind":"schedulable-todo","id":"t1"}"#;
        assert!(serde_json::from_str::<DropPayload>(json).is_err());
    }
}
