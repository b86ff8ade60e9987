//! API DTOs (Data Transfer Objects)
//!
//! Request types implement neither `Debug` nor `Clone`: they carry the
//! plaintext password.

use serde::{Deserialize, Serialize};

use crate::domain::value_object::user_id::UserId;

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// HS256 access token
    pub token: String,
}

// ============================================================================
// Register
// ============================================================================

/// Register request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Register response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user_id: UserId,
}

#[cfg(test)]
mod tests {
    use std::marker::PhantomData;

    use super::*;

    /// `IMPLS_CLONE` resolves to the inherent const only when `T: Clone`.
    struct CloneCheck<T>(PhantomData<T>);

    trait FallbackNotClone {
        const IMPLS_CLONE: bool = false;
    }

    impl<T> FallbackNotClone for CloneCheck<T> {}

    #[allow(dead_code)]
    impl<T: Clone> CloneCheck<T> {
        const IMPLS_CLONE: bool = true;
    }

    #[test]
    fn test_password_requests_are_not_clone() {
        assert!(!CloneCheck::<LoginRequest>::IMPLS_CLONE);
        assert!(!CloneCheck::<RegisterRequest>::IMPLS_CLONE);
        assert!(CloneCheck::<LoginResponse>::IMPLS_CLONE);
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let req: LoginRequest = serde_json::from_str(r#"{"email":"a@x.com"}"#).unwrap();
        assert_eq!(req.email, "a@x.com");
        assert!(req.password.is_empty());
    }
}
