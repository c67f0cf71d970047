//! Ordered, id-addressed business-rule collection.
//!
//! Rules keep their insertion order, which breaks ties between rules of
//! equal `priority` during evaluation.

use serde::{Deserialize, Serialize};

use crate::error::{AllocateError, Result};
use crate::models::BusinessRule;

/// A mutable collection of business rules.
///
/// # Example
///
/// ```
/// use u_allocate::models::BusinessRule;
/// use u_allocate::rulebook::RuleBook;
///
/// let mut book = RuleBook::new();
/// book.add(BusinessRule::load_limit("cap", "Ops", 2)).unwrap();
/// book.add(BusinessRule::phase_window("early", "T1", vec![1, 2])).unwrap();
/// book.set_enabled("cap", false).unwrap();
///
/// assert_eq!(book.len(), 2);
/// assert_eq!(book.enabled().count(), 1);
/// assert!(book.add(BusinessRule::load_limit("cap", "Ops", 3)).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<BusinessRule>", into = "Vec<BusinessRule>")]
pub struct RuleBook {
    rules: Vec<BusinessRule>,
}

impl RuleBook {
    /// Creates an empty rule book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a rule book from existing rules.
    ///
    /// # Errors
    /// Returns [`AllocateError::DuplicateRule`] on the first repeated id.
    pub fn from_rules(rules: Vec<BusinessRule>) -> Result<Self> {
        let mut book = Self::new();
        for rule in rules {
            book.add(rule)?;
        }
        Ok(book)
    }

    /// Appends a rule.
    ///
    /// # Errors
    /// Returns [`AllocateError::DuplicateRule`] if the id is taken.
    pub fn add(&mut self, rule: BusinessRule) -> Result<()> {
        if self.get(&rule.id).is_some() {
            return Err(AllocateError::DuplicateRule { id: rule.id });
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Edits a rule in place. The rule keeps its position.
    ///
    /// # Errors
    /// Returns [`AllocateError::UnknownRule`] if no rule has the id, or
    /// [`AllocateError::DuplicateRule`] if the edit renames it onto
    /// another rule's id (the edit is then discarded).
    pub fn update<F>(&mut self, id: &str, edit: F) -> Result<()>
    where
        F: FnOnce(&mut BusinessRule),
    {
        let pos = self.position(id)?;
        let mut edited = self.rules[pos].clone();
        edit(&mut edited);

        let clash = self
            .rules
            .iter()
            .enumerate()
            .any(|(i, r)| i != pos && r.id == edited.id);
        if clash {
            return Err(AllocateError::DuplicateRule { id: edited.id });
        }

        self.rules[pos] = edited;
        Ok(())
    }

    /// Removes and returns a rule.
    ///
    /// # Errors
    /// Returns [`AllocateError::UnknownRule`] if no rule has the id.
    pub fn remove(&mut self, id: &str) -> Result<BusinessRule> {
        let pos = self.position(id)?;
        Ok(self.rules.remove(pos))
    }

    /// Enables or disables a rule.
    ///
    /// # Errors
    /// Returns [`AllocateError::UnknownRule`] if no rule has the id.
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> Result<()> {
        let pos = self.position(id)?;
        self.rules[pos].enabled = enabled;
        Ok(())
    }

    /// Looks up a rule.
    pub fn get(&self, id: &str) -> Option<&BusinessRule> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// Iterates all rules in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &BusinessRule> {
        self.rules.iter()
    }

    /// Iterates enabled rules in insertion order.
    pub fn enabled(&self) -> impl Iterator<Item = &BusinessRule> {
        self.rules.iter().filter(|r| r.enabled)
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the book is empty.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules as a slice, for allocation and validation.
    pub fn as_slice(&self) -> &[BusinessRule] {
        &self.rules
    }

    /// Consumes the book.
    pub fn into_rules(self) -> Vec<BusinessRule> {
        self.rules
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.rules
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| AllocateError::UnknownRule { id: id.to_string() })
    }
}

impl TryFrom<Vec<BusinessRule>> for RuleBook {
    type Error = AllocateError;

    fn try_from(rules: Vec<BusinessRule>) -> Result<Self> {
        Self::from_rules(rules)
    }
}

impl From<RuleBook> for Vec<BusinessRule> {
    fn from(book: RuleBook) -> Self {
        book.rules
    }
}
