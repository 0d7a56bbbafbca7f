use serde::{Deserialize, Serialize};
use std::fmt;

/// Categorical classification of the traded material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AshType {
    FlyAsh,
    BottomAsh,
    PondAsh,
}

impl AshType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AshType::FlyAsh => "fly_ash",
            AshType::BottomAsh => "bottom_ash",
            AshType::PondAsh => "pond_ash",
        }
    }
}

impl fmt::Display for AshType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AshType {
    type Error = &'static str;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "fly_ash" => Ok(AshType::FlyAsh),
            "bottom_ash" => Ok(AshType::BottomAsh),
            "pond_ash" => Ok(AshType::PondAsh),
            _ => Err("Invalid ash type: must be fly_ash, bottom_ash or pond_ash"),
        }
    }
}
