//! Response envelopes: exactly one of payload or error is set.

use randocube_core::Item;
use serde::{Deserialize, Serialize};

/// Envelope for operations with no payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BaseResponse {
    pub fn success() -> Self {
        Self { error: None }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Envelope carrying category names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryListResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CategoryListResponse {
    pub fn success(categories: Vec<String>) -> Self {
        Self {
            categories: Some(categories),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            categories: None,
            error: Some(message.into()),
        }
    }
}

/// Envelope carrying items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemListResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Item>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ItemListResponse {
    pub fn success(items: Vec<Item>) -> Self {
        Self {
            items: Some(items),
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            items: None,
            error: Some(message.into()),
        }
    }
}
