use serde::{Deserialize, Serialize};
use std::fmt;

use crate::values::UserId;

/// Marketplace role, resolved by the authentication collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Supplier,
    Buyer,
    Logistics,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Supplier => write!(f, "supplier"),
            Role::Buyer => write!(f, "buyer"),
            Role::Logistics => write!(f, "logistics"),
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = &'static str;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "supplier" => Ok(Role::Supplier),
            "buyer" => Ok(Role::Buyer),
            "logistics" => Ok(Role::Logistics),
            _ => Err("Invalid role: must be admin, supplier, buyer or logistics"),
        }
    }
}

/// The `(user_id, role)` pair threaded through every engine call
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: UserId, role: Role) -> Self {
        Actor { user_id, role }
    }

    pub fn is(&self, role: Role) -> bool {
        self.role == role
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.role, self.user_id)
    }
}
