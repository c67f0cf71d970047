//! Priority weights.

use serde::{Deserialize, Serialize};

/// Relative weights of the three allocation objectives.
///
/// Conventionally each lies in 0..=100. They are multipliers, not
/// probabilities, and need not sum to any total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityWeights {
    /// Weight of serving high-priority clients.
    pub client_priority_fulfillment: f64,
    /// Weight of spreading load across workers.
    pub worker_work_life_balance: f64,
    /// Weight of preferring cheaper (less qualified) workers.
    pub cost_efficiency: f64,
}

impl PriorityWeights {
    /// Creates weights from the three objective values.
    pub fn new(client_priority: f64, work_life_balance: f64, cost_efficiency: f64) -> Self {
        Self {
            client_priority_fulfillment: client_priority,
            worker_work_life_balance: work_life_balance,
            cost_efficiency,
        }
    }
}

impl Default for PriorityWeights {
    fn default() -> Self {
        Self::new(50.0, 50.0, 50.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let w = PriorityWeights::default();
        assert_eq!(w, PriorityWeights::new(50.0, 50.0, 50.0));
    }

    #[test]
    fn test_wire_names() {
        let w: PriorityWeights = serde_json::from_str(
            r#"{"clientPriorityFulfillment": 80, "workerWorkLifeBalance": 10, "costEfficiency": 0}"#,
        )
        .unwrap();
        assert!((w.client_priority_fulfillment - 80.0).abs() < 1e-10);
        assert!((w.worker_work_life_balance - 10.0).abs() < 1e-10);
        assert!(w.cost_efficiency.abs() < 1e-10);
    }
}
