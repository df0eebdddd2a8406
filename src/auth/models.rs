//! Authentication Models
//! Mission: Define secure account and token data structures

use serde::{Deserialize, Serialize};

/// User account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub username: String,
    #[serde(skip_serializing)]
    pub hashed_password: String, // bcrypt hash - never serialize
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub disabled: bool,
}

impl Account {
    /// Build a new account from a registration request and a pre-computed
    /// bcrypt hash. Missing email/full_name fall back to derived defaults.
    pub fn from_registration(req: &RegisterRequest, hashed_password: String) -> Self {
        let email = req
            .email
            .as_deref()
            .filter(|e| !e.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| format!("{}@example.com", req.username));

        let full_name = req
            .full_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| title_case(&req.username));

        Self {
            username: req.username.clone(),
            hashed_password,
            full_name: Some(full_name),
            email: Some(email),
            disabled: false,
        }
    }
}

/// JWT Claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // subject (username)
    pub exp: usize,  // expiration timestamp
}

/// Registration request body
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

/// Login request body (form-encoded)
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Issued access token
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String, // always "bearer"
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Demo item owned by the authenticated user
#[derive(Debug, Serialize)]
pub struct OwnedItem {
    pub item_id: String,
    pub owner: String,
}

/// Capitalize the first letter of each alphabetic run, lowercase the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_boundary = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_boundary {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_boundary = false;
        } else {
            out.push(c);
            at_boundary = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request(username: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            password: "s3cret".to_string(),
            full_name: None,
            email: None,
        }
    }

    #[test]
    fn test_account_never_serializes_hash() {
        let account = Account {
            username: "alice".to_string(),
            hashed_password: "$2b$12$secret-hash".to_string(),
            full_name: Some("Alice".to_string()),
            email: Some("alice@example.com".to_string()),
            disabled: false,
        };

        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["username"], "alice");
        assert!(json.get("hashed_password").is_none());
    }

    #[test]
    fn test_registration_defaults() {
        let account = Account::from_registration(&register_request("alice"), "hash".to_string());

        assert_eq!(account.username, "alice");
        assert_eq!(account.email.as_deref(), Some("alice@example.com"));
        assert_eq!(account.full_name.as_deref(), Some("Alice"));
        assert!(!account.disabled);
    }

    #[test]
    fn test_registration_keeps_provided_fields() {
        let mut req = register_request("bob");
        req.full_name = Some("Bob the Builder".to_string());
        req.email = Some("bob@build.it".to_string());

        let account = Account::from_registration(&req, "hash".to_string());
        assert_eq!(account.full_name.as_deref(), Some("Bob the Builder"));
        assert_eq!(account.email.as_deref(), Some("bob@build.it"));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("alice"), "Alice");
        assert_eq!(title_case("mary jane"), "Mary Jane");
        assert_eq!(title_case("o'brien"), "O'Brien");
        assert_eq!(title_case("x"), "X");
    }

    #[test]
    fn test_token_response_is_bearer() {
        let token = TokenResponse::bearer("abc.def.ghi".to_string());
        assert_eq!(token.token_type, "bearer");

        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["access_token"], "abc.def.ghi");
        assert_eq!(json["token_type"], "bearer");
    }
}
