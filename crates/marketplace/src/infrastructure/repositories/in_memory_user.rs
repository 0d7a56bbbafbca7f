//! Local adapter onto the user directory

use ashmart_core::{Actor, Role, UserId};
use ashmart_ports::UserDirectory;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// Users seen by the engine, keyed by id. The latest role wins.
pub struct InMemoryUserDirectory {
    users: Arc<DashMap<UserId, Role>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self {
            users: Arc::new(DashMap::new()),
        }
    }

    pub fn role_of(&self, user_id: &UserId) -> Option<Role> {
        self.users.get(user_id).map(|r| *r.value())
    }
}

impl Default for InMemoryUserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for InMemoryUserDirectory {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
        }
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn record(&self, actor: &Actor) {
        self.users.insert(actor.user_id.clone(), actor.role);
    }

    async fn count(&self) -> usize {
        self.users.len()
    }
}
