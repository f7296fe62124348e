use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

/// Account role, using the API's wire values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Client,
    Assistant,
}

impl Role {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "client" => Some(Self::Client),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }
}

/// A stored account.
///
/// Passwords are kept in plaintext: this is a test double, not a credential
/// store.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: Role,
    pub suspended: bool,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Public JSON shape of the account. Never includes the password.
    pub fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "email": self.email,
            "firstName": self.first_name,
            "lastName": self.last_name,
            "phone": self.phone,
            "role": self.role,
            "isActive": !self.suspended,
            "createdAt": self.created_at,
        })
    }
}

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, UserRecord>,
    tokens: HashMap<String, Uuid>,
    refresh_tokens: HashMap<String, Uuid>,
}

/// Shared in-memory account and token state behind the auth test server.
///
/// Bearer and refresh tokens are opaque UUID strings; refresh tokens are
/// single-use and rotate on every refresh.
#[derive(Default, Clone)]
pub struct UserStore {
    inner: Arc<Mutex<Tables>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an account, failing when the e-mail is already taken.
    ///
    /// E-mails are compared and stored lowercased.
    pub fn insert(&self, mut record: UserRecord) -> Result<UserRecord, String> {
        record.email = record.email.to_lowercase();
        let mut tables = self.inner.lock().unwrap();
        if tables
            .users
            .values()
            .any(|user| user.email == record.email)
        {
            return Err(format!("email already registered: {}", record.email));
        }
        tables.users.insert(record.id, record.clone());
        Ok(record)
    }

    /// Convenience used by the server builder and by steps that need an
    /// account in a known state.
    pub fn seed_account(
        &self,
        email: &str,
        password: &str,
        suspended: bool,
    ) -> Result<UserRecord, String> {
        self.insert(UserRecord {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password: password.to_string(),
            first_name: "Seed".to_string(),
            last_name: "Account".to_string(),
            phone: None,
            role: Role::Client,
            suspended,
            created_at: Utc::now(),
        })
    }

    pub fn get(&self, id: Uuid) -> Option<UserRecord> {
        self.inner.lock().unwrap().users.get(&id).cloned()
    }

    pub fn find_by_email(&self, email: &str) -> Option<UserRecord> {
        let email = email.to_lowercase();
        self.inner
            .lock()
            .unwrap()
            .users
            .values()
            .find(|user| user.email == email)
            .cloned()
    }

    /// Remove an account and every token issued to it.
    pub fn remove(&self, id: Uuid) -> Option<UserRecord> {
        let mut tables = self.inner.lock().unwrap();
        let removed = tables.users.remove(&id);
        if removed.is_some() {
            tables.tokens.retain(|_, user_id| *user_id != id);
            tables.refresh_tokens.retain(|_, user_id| *user_id != id);
        }
        removed
    }

    pub fn issue_token(&self, id: Uuid) -> String {
        let token = Uuid::new_v4().to_string();
        self.inner
            .lock()
            .unwrap()
            .tokens
            .insert(token.clone(), id);
        token
    }

    pub fn issue_refresh_token(&self, id: Uuid) -> String {
        let token = Uuid::new_v4().to_string();
        self.inner
            .lock()
            .unwrap()
            .refresh_tokens
            .insert(token.clone(), id);
        token
    }

    /// Resolve a bearer token to its account.
    pub fn resolve_token(&self, token: &str) -> Option<UserRecord> {
        let tables = self.inner.lock().unwrap();
        let id = tables.tokens.get(token)?;
        tables.users.get(id).cloned()
    }

    /// Consume a refresh token. Single use: a second call with the same
    /// token returns `None`.
    pub fn take_refresh_token(&self, token: &str) -> Option<Uuid> {
        self.inner.lock().unwrap().refresh_tokens.remove(token)
    }

    pub fn user_count(&self) -> usize {
        self.inner.lock().unwrap().users.len()
    }
}
