use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "http://localhost:5678/api";
pub const SESSION_TOKEN_KEY: &str = "token";
pub const EDIT_QUERY_PARAM: &str = "edit";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /users/login`. Failures come back without a token; their
/// `message`, when present, is only logged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoginResponse {
    pub token: Option<String>,
    pub message: Option<String>,
}

impl LoginResponse {
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    pub fn token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }
}

pub fn works_url(base: &str) -> String {
    format!("{}/works", base.trim_end_matches('/'))
}

pub fn work_url(base: &str, id: u64) -> String {
    format!("{}/works/{id}", base.trim_end_matches('/'))
}

pub fn login_url(base: &str) -> String {
    format!("{}/users/login", base.trim_end_matches('/'))
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Element id named by the fragment of a modal link such as `edit.html#modal1`.
pub fn modal_target(href: &str) -> Option<&str> {
    let (_, fragment) = href.split_once('#')?;
    let fragment = fragment.trim();
    if fragment.is_empty() {
        None
    } else {
        Some(fragment)
    }
}
