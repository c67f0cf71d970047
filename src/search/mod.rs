//! Structured search over clients, workers and tasks.
//!
//! A query is turned into [`SearchCriteria`] (an entity collection plus
//! filter conditions) by a [`SearchStrategy`], and the criteria are then
//! applied to each row's canonical JSON shape. Free-text interpretation
//! is left to strategies supplied by the caller; the crate ships
//! [`KeywordSearch`] and the [`FallbackSearch`] combinator.

mod filter;
mod strategy;

pub use filter::{FilterCondition, FilterOperator};
pub use strategy::{FallbackSearch, KeywordSearch, SearchError, SearchStrategy};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{Client, Task, Worker};

/// Collection a search targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchEntity {
    /// Client rows.
    #[default]
    Clients,
    /// Worker rows.
    Workers,
    /// Task rows.
    Tasks,
}

impl SearchEntity {
    /// Canonical key field of the collection.
    pub fn id_field(self) -> &'static str {
        match self {
            Self::Clients => "ClientID",
            Self::Workers => "WorkerID",
            Self::Tasks => "TaskID",
        }
    }

    /// Canonical name field of the collection.
    pub fn name_field(self) -> &'static str {
        match self {
            Self::Clients => "ClientName",
            Self::Workers => "WorkerName",
            Self::Tasks => "TaskName",
        }
    }
}

/// Borrowed view of the data being searched.
#[derive(Debug, Clone, Copy)]
pub struct SearchScope<'a> {
    /// Clients.
    pub clients: &'a [Client],
    /// Workers.
    pub workers: &'a [Worker],
    /// Tasks.
    pub tasks: &'a [Task],
}

impl<'a> SearchScope<'a> {
    /// Creates a scope.
    pub fn new(clients: &'a [Client], workers: &'a [Worker], tasks: &'a [Task]) -> Self {
        Self {
            clients,
            workers,
            tasks,
        }
    }

    /// Canonical JSON rows of one collection, in input order.
    pub fn rows(&self, entity: SearchEntity) -> Vec<Value> {
        fn to_rows<T: Serialize>(items: &[T]) -> Vec<Value> {
            items
                .iter()
                .filter_map(|item| serde_json::to_value(item).ok())
                .collect()
        }

        match entity {
            SearchEntity::Clients => to_rows(self.clients),
            SearchEntity::Workers => to_rows(self.workers),
            SearchEntity::Tasks => to_rows(self.tasks),
        }
    }
}

/// An interpreted query.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchCriteria {
    /// Target collection.
    pub entity: SearchEntity,
    /// Conditions; all must hold.
    #[serde(default)]
    pub filters: Vec<FilterCondition>,
    /// How the query was read.
    #[serde(default)]
    pub explanation: String,
}

impl SearchCriteria {
    /// Creates criteria with no filters (every row matches).
    pub fn new(entity: SearchEntity) -> Self {
        Self {
            entity,
            ..Self::default()
        }
    }

    /// Adds a condition.
    pub fn with_filter(mut self, filter: FilterCondition) -> Self {
        self.filters.push(filter);
        self
    }

    /// Sets the explanation.
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    /// Row IDs matching every filter, in input order.
    pub fn apply(&self, scope: &SearchScope<'_>) -> Vec<String> {
        let id_field = self.entity.id_field();
        scope
            .rows(self.entity)
            .iter()
            .filter(|row| self.filters.iter().all(|f| f.matches(row, scope.tasks)))
            .filter_map(|row| row.get(id_field).and_then(Value::as_str).map(str::to_string))
            .collect()
    }
}

/// Search outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Collection searched.
    pub entity: SearchEntity,
    /// Matching row IDs.
    pub row_ids: Vec<String>,
    /// The original query.
    pub query: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope_data() -> (Vec<Client>, Vec<Worker>, Vec<Task>) {
        let clients = vec![
            Client::new("C1").with_name("Acme").with_priority(5).with_task("T1"),
            Client::new("C2").with_name("Globex").with_priority(2).with_task("T2"),
        ];
        let workers = vec![
            Worker::new("W1").with_name("Ann").with_skill("python").with_max_load(3),
            Worker::new("W2").with_name("Bob").with_skill("excel").with_max_load(1),
        ];
        let tasks = vec![
            Task::new("T1").with_name("ETL").with_skill("python").with_duration(3),
            Task::new("T2").with_name("Report").with_skill("excel").with_duration(1),
        ];
        (clients, workers, tasks)
    }

    #[test]
    fn test_apply_filters() {
        let (c, w, t) = scope_data();
        let scope = SearchScope::new(&c, &w, &t);

        let high = SearchCriteria::new(SearchEntity::Clients).with_filter(FilterCondition::new(
            "PriorityLevel",
            FilterOperator::GreaterThan,
            3,
        ));
        assert_eq!(high.apply(&scope), vec!["C1"]);

        let long_python = SearchCriteria::new(SearchEntity::Tasks)
            .with_filter(FilterCondition::new("Duration", FilterOperator::GreaterThan, 2))
            .with_filter(FilterCondition::new("RequiredSkills", FilterOperator::Contains, "PY"));
        assert_eq!(long_python.apply(&scope), vec!["T1"]);

        let skilled = SearchCriteria::new(SearchEntity::Clients).with_filter(FilterCondition::new(
            "RequestedTaskIDs",
            FilterOperator::HasTasksWithSkill,
            "excel",
        ));
        assert_eq!(skilled.apply(&scope), vec!["C2"]);
    }

    #[test]
    fn test_no_filters_match_all() {
        let (c, w, t) = scope_data();
        let scope = SearchScope::new(&c, &w, &t);
        assert_eq!(
            SearchCriteria::new(SearchEntity::Workers).apply(&scope),
            vec!["W1", "W2"]
        );
    }

    #[test]
    fn test_criteria_wire_shape() {
        let c: SearchCriteria = serde_json::from_str(
            r#"{"entity": "workers", "filters": [{"field": "Skills", "operator": "contains", "value": "python"}]}"#,
        )
        .unwrap();
        assert_eq!(c.entity, SearchEntity::Workers);
        assert_eq!(c.filters.len(), 1);

        let r = SearchResult {
            entity: SearchEntity::Tasks,
            row_ids: vec!["T1".into()],
            query: "q".into(),
        };
        assert_eq!(serde_json::to_value(&r).unwrap()["rowIds"][0], "T1");
    }
}
