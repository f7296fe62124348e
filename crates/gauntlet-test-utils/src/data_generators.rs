//! Generators for unique test fixtures.
//!
//! Scenarios run concurrently against a shared store, so every generated
//! account gets a unique e-mail.

use serde_json::{json, Value};
use uuid::Uuid;

use crate::store::Role;

/// Default password used by generated accounts.
pub const TEST_PASSWORD: &str = "TestPassword123!";

/// Unique e-mail so concurrent scenarios never collide on signup.
pub fn unique_email() -> String {
    format!("test-{}@example.com", Uuid::new_v4().simple())
}

/// A complete signup payload for a fresh account.
pub fn test_user(role: Role) -> Value {
    json!({
        "email": unique_email(),
        "password": TEST_PASSWORD,
        "firstName": "Test",
        "lastName": "User",
        "phone": "+33123456789",
        "role": role,
    })
}
