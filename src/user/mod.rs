use std::fmt::Display;

use serde::{Deserialize, Serialize};

pub mod model;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub struct Sub(pub String);

impl Display for Sub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Sub {
    fn from(sub: &str) -> Self {
        Self(sub.to_string())
    }
}
