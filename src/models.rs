//! Request and response models for the API.
//!
//! Request fields default when absent so that a missing field is handled by
//! the same validation path as an empty one.

use serde::{Deserialize, Serialize};

// ============================================================================
// Auth Models
// ============================================================================

/// Login form (JSON or form-encoded).
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}

/// Whether the caller currently holds a valid session.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub authenticated: bool,
}

// ============================================================================
// Page Models
// ============================================================================

/// Request to create a page (JSON or form-encoded).
#[derive(Debug, Deserialize)]
pub struct CreatePageRequest {
    #[serde(default)]
    pub name: String,
}

/// Response after creating a page.
#[derive(Debug, Serialize)]
pub struct CreatePageResponse {
    pub id: String,
}

/// Page content update (JSON or form-encoded). `pageId` defaults to `page1`.
#[derive(Debug, Default, Deserialize)]
pub struct SavePageRequest {
    #[serde(rename = "pageId", default)]
    pub page_id: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Ordered page ids.
#[derive(Debug, Serialize)]
pub struct PagesResponse {
    pub pages: Vec<String>,
}

// ============================================================================
// Settings Models
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SaveBackgroundRequest {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// `value` may be a number or a numeric string; anything else falls back.
#[derive(Debug, Deserialize)]
pub struct SaveOpacityRequest {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: serde_json::Value,
}
