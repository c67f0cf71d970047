//! Client model.
//!
//! A client requests a set of tasks and carries a priority level that
//! drives task ordering and the fulfillment metric.

use serde::{Deserialize, Serialize};

/// Priority level assumed for tasks that no client requests.
pub const DEFAULT_PRIORITY_LEVEL: i32 = 3;

/// Upper bound of the priority scale (used to normalize scores).
pub const MAX_PRIORITY_LEVEL: i32 = 5;

/// A client row.
///
/// Field names serialize to the canonical spreadsheet headers
/// (`ClientID`, `ClientName`, ...). Missing cells deserialize to empty
/// values so that the validator can report them instead of the parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Client {
    /// Unique client identifier.
    #[serde(rename = "ClientID")]
    pub id: String,
    /// Display name.
    #[serde(rename = "ClientName")]
    pub name: String,
    /// Priority level on a 1..=5 scale.
    #[serde(rename = "PriorityLevel")]
    pub priority_level: i32,
    /// Requested task IDs, in request order.
    #[serde(rename = "RequestedTaskIDs")]
    pub requested_task_ids: Vec<String>,
    /// Optional group label (matched by client slot restrictions).
    #[serde(rename = "GroupTag", skip_serializing_if = "Option::is_none")]
    pub group_tag: Option<String>,
    /// Free-form JSON attributes, kept as raw text.
    #[serde(rename = "AttributesJSON", skip_serializing_if = "Option::is_none")]
    pub attributes_json: Option<String>,
}

impl Default for Client {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            priority_level: DEFAULT_PRIORITY_LEVEL,
            requested_task_ids: Vec::new(),
            group_tag: None,
            attributes_json: None,
        }
    }
}

impl Client {
    /// Creates a client with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the priority level.
    pub fn with_priority(mut self, level: i32) -> Self {
        self.priority_level = level;
        self
    }

    /// Appends a requested task.
    pub fn with_task(mut self, task_id: impl Into<String>) -> Self {
        self.requested_task_ids.push(task_id.into());
        self
    }

    /// Sets the group tag.
    pub fn with_group(mut self, tag: impl Into<String>) -> Self {
        self.group_tag = Some(tag.into());
        self
    }

    /// Sets the raw attributes JSON text.
    pub fn with_attributes_json(mut self, json: impl Into<String>) -> Self {
        self.attributes_json = Some(json.into());
        self
    }

    /// Whether this client requests the given task.
    pub fn requests(&self, task_id: &str) -> bool {
        self.requested_task_ids.iter().any(|t| t == task_id)
    }

    /// Priority normalized to the 0..=1 range (`level / 5`).
    pub fn priority_weight(&self) -> f64 {
        self.priority_level as f64 / MAX_PRIORITY_LEVEL as f64
    }
}
