use crate::permission::gate::{Capability, PermissionDecision, PermissionGate, PermissionState};

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// How often a capability is re-checked against the platform gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
    /// Ask once when the screen starts and reuse that answer.
    CacheOnceAtInit,
    /// Ask the gate again on every use.
    CheckEveryCall,
}

/// Tracks permission decisions per capability, honoring each
/// capability's refresh policy.
pub struct PermissionBroker {
    gate: Box<dyn PermissionGate>,
    policies: HashMap<Capability, RefreshPolicy>,
    cache: HashMap<Capability, PermissionDecision>,
}

impl PermissionBroker {
    pub fn new(
        gate: Box<dyn PermissionGate>,
        policies: HashMap<Capability, RefreshPolicy>,
    ) -> Self {
        Self {
            gate,
            policies,
            cache: HashMap::new(),
        }
    }

    /// Resolves every capability configured as cache-once so later calls
    /// answer from the cache.
    pub async fn prime(&mut self) {
        let cached: Vec<Capability> = self
            .policies
            .iter()
            .filter(|(_, policy)| **policy == RefreshPolicy::CacheOnceAtInit)
            .map(|(capability, _)| *capability)
            .collect();

        for capability in cached {
            let decision = self.resolve(capability).await;
            tracing::info!("Initial {capability} permission: {decision:?}");
        }
    }

    /// Returns the decision for a capability, consulting the gate as the
    /// policy requires.
    pub async fn resolve(&mut self, capability: Capability) -> PermissionDecision {
        if self.policy(capability) == RefreshPolicy::CheckEveryCall {
            return self.gate.check_or_request(capability).await;
        }

        if let Some(decision) = self.cache.get(&capability) {
            return *decision;
        }

        let decision = self.gate.check_or_request(capability).await;
        self.cache.insert(capability, decision);
        decision
    }

    /// What the broker knows without consulting the gate.
    pub fn state(&self, capability: Capability) -> PermissionState {
        self.cache
            .get(&capability)
            .map(|decision| PermissionState::from(*decision))
            .unwrap_or_default()
    }

    fn policy(&self, capability: Capability) -> RefreshPolicy {
        self.policies
            .get(&capability)
            .copied()
            .unwrap_or(RefreshPolicy::CheckEveryCall)
    }
}
