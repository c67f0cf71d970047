//! Query interpretation strategies.

use thiserror::Error;
use tracing::warn;

use super::{SearchCriteria, SearchEntity, SearchResult, SearchScope};

/// Errors from a search strategy.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The strategy cannot serve requests right now.
    #[error("search strategy unavailable: {strategy}")]
    Unavailable {
        /// Strategy name.
        strategy: String,
    },

    /// The strategy produced criteria that cannot be applied.
    #[error("invalid search criteria: {message}")]
    InvalidCriteria {
        /// What was wrong.
        message: String,
    },
}

/// Turns a free-text query into search results.
///
/// Implement [`interpret`](Self::interpret) to plug in a query
/// interpreter (for example a remote text-generation service); the
/// default [`search`](Self::search) applies the resulting criteria.
pub trait SearchStrategy {
    /// Strategy name, used in logs.
    fn name(&self) -> &str;

    /// Interprets the query.
    fn interpret(&self, query: &str) -> Result<SearchCriteria, SearchError>;

    /// Interprets the query and applies the criteria.
    fn search(&self, query: &str, scope: &SearchScope<'_>) -> Result<SearchResult, SearchError> {
        let criteria = self.interpret(query)?;
        Ok(SearchResult {
            entity: criteria.entity,
            row_ids: criteria.apply(scope),
            query: query.to_string(),
        })
    }
}

/// Keyword search over IDs and names.
///
/// The first of `client`, `worker` or `task` found in the query picks the
/// collection (clients by default). The remaining words are matched,
/// case-insensitively, against each row's ID and name; a row matches if
/// any word does. A query with no remaining words matches every row.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordSearch;

impl KeywordSearch {
    fn entity_of(query: &str) -> SearchEntity {
        let lower = query.to_lowercase();
        [
            ("client", SearchEntity::Clients),
            ("worker", SearchEntity::Workers),
            ("task", SearchEntity::Tasks),
        ]
        .into_iter()
        .filter_map(|(keyword, entity)| lower.find(keyword).map(|pos| (pos, entity)))
        .min_by_key(|&(pos, _)| pos)
        .map_or(SearchEntity::Clients, |(_, entity)| entity)
    }

    fn terms(query: &str) -> Vec<String> {
        query
            .split(|c: char| !c.is_alphanumeric() && c != '-' && c != '_')
            .map(str::to_lowercase)
            .filter(|w| !w.is_empty())
            .filter(|w| {
                !["client", "worker", "task"]
                    .iter()
                    .any(|&k| w.as_str() == k || w.strip_suffix('s') == Some(k))
            })
            .collect()
    }
}

impl SearchStrategy for KeywordSearch {
    fn name(&self) -> &str {
        "keyword"
    }

    fn interpret(&self, query: &str) -> Result<SearchCriteria, SearchError> {
        Ok(SearchCriteria::new(Self::entity_of(query)).with_explanation("Fallback keyword search"))
    }

    fn search(&self, query: &str, scope: &SearchScope<'_>) -> Result<SearchResult, SearchError> {
        let entity = Self::entity_of(query);
        let terms = Self::terms(query);
        let id_field = entity.id_field();
        let name_field = entity.name_field();

        let row_ids = scope
            .rows(entity)
            .iter()
            .filter_map(|row| {
                let id = row.get(id_field)?.as_str()?;
                let name = row.get(name_field).and_then(|v| v.as_str()).unwrap_or("");
                let haystack = format!("{} {}", id.to_lowercase(), name.to_lowercase());
                let hit = terms.is_empty() || terms.iter().any(|t| haystack.contains(t.as_str()));
                hit.then(|| id.to_string())
            })
            .collect();

        Ok(SearchResult {
            entity,
            row_ids,
            query: query.to_string(),
        })
    }
}

/// Tries a primary strategy, then a fallback when the primary fails.
#[derive(Debug, Clone)]
pub struct FallbackSearch<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> FallbackSearch<P, F>
where
    P: SearchStrategy,
    F: SearchStrategy,
{
    /// Creates the chain.
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P, F> SearchStrategy for FallbackSearch<P, F>
where
    P: SearchStrategy,
    F: SearchStrategy,
{
    fn name(&self) -> &str {
        self.primary.name()
    }

    fn interpret(&self, query: &str) -> Result<SearchCriteria, SearchError> {
        self.primary.interpret(query).or_else(|err| {
            warn!(strategy = self.primary.name(), error = %err, "primary search failed, falling back");
            self.fallback.interpret(query)
        })
    }

    fn search(&self, query: &str, scope: &SearchScope<'_>) -> Result<SearchResult, SearchError> {
        self.primary.search(query, scope).or_else(|err| {
            warn!(
                strategy = self.primary.name(),
                fallback = self.fallback.name(),
                error = %err,
                "primary search failed, falling back"
            );
            self.fallback.search(query, scope)
        })
    }
}
