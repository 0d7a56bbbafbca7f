use serde::{Deserialize, Serialize};

/// Free-text address plus the city/state pair used for matching
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub address: String,
    pub city: String,
    pub state: String,
}

impl Location {
    pub fn new(
        address: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        Location {
            address: address.into(),
            city: city.into(),
            state: state.into(),
        }
    }

    /// Returns the name of the first blank field, if any
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.address.trim().is_empty() {
            Some("address")
        } else if self.city.trim().is_empty() {
            Some("city")
        } else if self.state.trim().is_empty() {
            Some("state")
        } else {
            None
        }
    }

    pub fn same_state(&self, other: &Location) -> bool {
        eq_ignore_case(&self.state, &other.state)
    }

    pub fn same_city_and_state(&self, other: &Location) -> bool {
        self.same_state(other) && eq_ignore_case(&self.city, &other.city)
    }

    /// Case-insensitive substring match used by listing filters
    pub fn city_contains(&self, needle: &str) -> bool {
        contains_ignore_case(&self.city, needle)
    }

    pub fn state_contains(&self, needle: &str) -> bool {
        contains_ignore_case(&self.state, needle)
    }
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack
        .to_lowercase()
        .contains(needle.trim().to_lowercase().as_str())
}
