use ashmart_core::TransitionPolicy;
use ashmart_matching::MatchWeights;
use std::time::Duration;

/// Runtime knobs shared by the application services
#[derive(Debug, Clone, Copy)]
pub struct EngineSettings {
    /// Budget for every port call made by a service
    pub operation_timeout: Duration,
    pub transition_policy: TransitionPolicy,
    /// Cap on matches per group in the grouped suggestions view
    pub suggestions_per_entity: usize,
    pub weights: MatchWeights,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            operation_timeout: Duration::from_millis(2000),
            transition_policy: TransitionPolicy::default(),
            suggestions_per_entity: 10,
            weights: MatchWeights::default(),
        }
    }
}
