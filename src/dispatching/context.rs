//! Dispatch context for rule evaluation.

use std::collections::HashMap;

use crate::models::{Client, DEFAULT_PRIORITY_LEVEL};

/// Lookup state passed to dispatching rules.
///
/// Maps each requested task to the priority level of the client that
/// requests it. When several clients request the same task, the first
/// client in input order wins.
#[derive(Debug, Clone)]
pub struct DispatchContext {
    /// Client priority level per task ID.
    pub client_priority: HashMap<String, i32>,
    /// Level for tasks no client requests.
    pub default_priority: i32,
}

impl Default for DispatchContext {
    fn default() -> Self {
        Self {
            client_priority: HashMap::new(),
            default_priority: DEFAULT_PRIORITY_LEVEL,
        }
    }
}

impl DispatchContext {
    /// Builds the context from the client list.
    pub fn from_clients(clients: &[Client], default_priority: i32) -> Self {
        let mut client_priority = HashMap::new();
        for client in clients {
            for task_id in &client.requested_task_ids {
                client_priority
                    .entry(task_id.clone())
                    .or_insert(client.priority_level);
            }
        }
        Self {
            client_priority,
            default_priority,
        }
    }

    /// Sets the priority level of a task.
    pub fn with_priority(mut self, task_id: impl Into<String>, level: i32) -> Self {
        self.client_priority.insert(task_id.into(), level);
        self
    }

    /// Priority level governing a task.
    pub fn priority_of(&self, task_id: &str) -> i32 {
        self.client_priority
            .get(task_id)
            .copied()
            .unwrap_or(self.default_priority)
    }

    /// Whether some client requests the task.
    pub fn is_requested(&self, task_id: &str) -> bool {
        self.client_priority.contains_key(task_id)
    }
}
