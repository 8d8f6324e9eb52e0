use super::ProductPlan;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Per-conversation schema cache behind an interface so the gateway can swap
/// the in-memory map for a shared store later.
#[async_trait]
pub trait PlanStore: Send + Sync {
    async fn get(&self, conversation_id: &str) -> Option<ProductPlan>;
    async fn put(&self, conversation_id: &str, plan: ProductPlan);
    async fn remove(&self, conversation_id: &str);
}

#[derive(Default)]
pub struct MemoryPlanStore {
    plans: Mutex<HashMap<String, ProductPlan>>,
}

impl MemoryPlanStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlanStore for MemoryPlanStore {
    async fn get(&self, conversation_id: &str) -> Option<ProductPlan> {
        self.plans.lock().await.get(conversation_id).cloned()
    }

    async fn put(&self, conversation_id: &str, plan: ProductPlan) {
        self.plans
            .lock()
            .await
            .insert(conversation_id.to_string(), plan);
    }

    async fn remove(&self, conversation_id: &str) {
        self.plans.lock().await.remove(conversation_id);
    }
}
