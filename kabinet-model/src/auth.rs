//! Authentication request and response bodies.

use serde::{Deserialize, Serialize};

use crate::user::User;

/// Body of `POST auth/register` and `POST auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Successful register/login response: an opaque bearer token plus a
/// snapshot of the authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_response_round_trips_token_and_user() {
        let json = r#"{
            "access_token": "tok-123",
            "user": {
                "id": 1,
                "username": "ivan",
                "email": "ivan@example.com",
                "isActive": true,
                "createdAt": "2024-01-15T00:00:00Z",
                "updatedAt": "2024-01-15T00:00:00Z"
            }
        }"#;
        let response: AuthResponse =
            serde_json::from_str(json).expect("deserialize auth response");
        assert_eq!(response.access_token, "tok-123");
        assert_eq!(response.user.username, "ivan");
    }
}
