/// User management operations.
///
/// Each input struct mirrors the fields the upstream endpoint accepts; the
/// builders validate them and map them onto the upstream path and payload.
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AdapterError;
use crate::registry::{body_of, parse_args, require_non_empty, schema_of, Method, Operation, Payload};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateUser {
    /// User's mobile number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    /// User's email address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Source of the user creation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct FetchUserProfile {
    /// User ID to fetch
    pub user_id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UpdateUserOwner {
    /// User ID to update
    pub user_id: String,
    /// New owner ID
    pub owner_id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UpdateUserPool {
    /// User ID to update
    pub user_id: String,
    /// New pool ID
    pub pool_id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UpdateUserEmail {
    /// User ID to update
    pub user_id: String,
    /// New email address
    pub email: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct FetchUserContact {
    /// User ID to fetch contact information for
    pub user_id: String,
}

fn build_create_user(args: Value) -> Result<Payload, AdapterError> {
    let input: CreateUser = parse_args(args)?;
    if input.mobile.is_none() && input.email.is_none() {
        return Err(AdapterError::validation(
            "either mobile or email must be provided",
        ));
    }
    if let Some(mobile) = &input.mobile {
        require_non_empty(mobile, "mobile")?;
    }
    if let Some(email) = &input.email {
        require_non_empty(email, "email")?;
    }
    Ok(body_of(&input))
}

fn build_fetch_user_profile(args: Value) -> Result<Payload, AdapterError> {
    let input: FetchUserProfile = parse_args(args)?;
    require_non_empty(&input.user_id, "user_id")?;
    Ok(Payload::Query(vec![("user_id", input.user_id)]))
}

fn build_update_user_owner(args: Value) -> Result<Payload, AdapterError> {
    let input: UpdateUserOwner = parse_args(args)?;
    require_non_empty(&input.user_id, "user_id")?;
    require_non_empty(&input.owner_id, "owner_id")?;
    Ok(body_of(&input))
}

fn build_update_user_pool(args: Value) -> Result<Payload, AdapterError> {
    let input: UpdateUserPool = parse_args(args)?;
    require_non_empty(&input.user_id, "user_id")?;
    require_non_empty(&input.pool_id, "pool_id")?;
    Ok(body_of(&input))
}

fn build_update_user_email(args: Value) -> Result<Payload, AdapterError> {
    let input: UpdateUserEmail = parse_args(args)?;
    require_non_empty(&input.user_id, "user_id")?;
    require_non_empty(&input.email, "email")?;
    Ok(body_of(&input))
}

fn build_fetch_user_contact(args: Value) -> Result<Payload, AdapterError> {
    let input: FetchUserContact = parse_args(args)?;
    require_non_empty(&input.user_id, "user_id")?;
    Ok(Payload::Query(vec![("user_id", input.user_id)]))
}

pub fn operations() -> Vec<Operation> {
    vec![
        Operation {
            name: "create_user",
            description: "Create a new user by mobile number or email",
            method: Method::Post,
            path: "/api/v5/entity/user/create",
            input_schema: schema_of::<CreateUser>(),
            build: build_create_user,
        },
        Operation {
            name: "fetch_user_profile",
            description: "Fetch user profile information",
            method: Method::Get,
            path: "/api/v5/entity/profile/fetch",
            input_schema: schema_of::<FetchUserProfile>(),
            build: build_fetch_user_profile,
        },
        Operation {
            name: "update_user_owner",
            description: "Update the owner of a user",
            method: Method::Post,
            path: "/api/v5/entity/user/owner/update",
            input_schema: schema_of::<UpdateUserOwner>(),
            build: build_update_user_owner,
        },
        Operation {
            name: "update_user_pool",
            description: "Update the pool assignment of a user",
            method: Method::Post,
            path: "/api/v5/entity/user/pool/update",
            input_schema: schema_of::<UpdateUserPool>(),
            build: build_update_user_pool,
        },
        Operation {
            name: "update_user_email",
            description: "Update a user's email address",
            method: Method::Post,
            path: "/api/v5/entity/user/email/update",
            input_schema: schema_of::<UpdateUserEmail>(),
            build: build_update_user_email,
        },
        Operation {
            name: "fetch_user_contact",
            description: "Fetch user contact information",
            method: Method::Get,
            path: "/api/v5/entity/user/contact/fetch",
            input_schema: schema_of::<FetchUserContact>(),
            build: build_fetch_user_contact,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_user_requires_mobile_or_email() {
        let err = build_create_user(json!({})).unwrap_err();
        assert_eq!(err.kind(), "ValidationError");

        let err = build_create_user(json!({"source": "web"})).unwrap_err();
        assert_eq!(err.kind(), "ValidationError");
    }

    #[test]
    fn create_user_with_mobile_only() {
        let payload = build_create_user(json!({"mobile": "15550100"})).unwrap();
        match payload {
            Payload::Body(body) => {
                assert_eq!(body["mobile"], "15550100");
                assert!(body.get("email").is_none());
                assert!(body.get("source").is_none());
            }
            other => panic!("expected body payload, got {other:?}"),
        }
    }

    #[test]
    fn create_user_rejects_empty_identifier() {
        let err = build_create_user(json!({"mobile": ""})).unwrap_err();
        assert_eq!(err.kind(), "ValidationError");
    }

    #[test]
    fn fetch_user_profile_requires_user_id() {
        let err = build_fetch_user_profile(json!({})).unwrap_err();
        assert_eq!(err.kind(), "ValidationError");

        let payload = build_fetch_user_profile(json!({"user_id": "u-7"})).unwrap();
        assert_eq!(
            payload,
            Payload::Query(vec![("user_id", "u-7".to_string())])
        );
    }

    #[test]
    fn update_user_owner_maps_both_fields() {
        let payload =
            build_update_user_owner(json!({"user_id": "u-7", "owner_id": "o-2"})).unwrap();
        match payload {
            Payload::Body(body) => {
                assert_eq!(body["user_id"], "u-7");
                assert_eq!(body["owner_id"], "o-2");
            }
            other => panic!("expected body payload, got {other:?}"),
        }
    }

    #[test]
    fn update_user_email_rejects_wrong_types() {
        let err = build_update_user_email(json!({"user_id": "u-7", "email": 42})).unwrap_err();
        assert_eq!(err.kind(), "ValidationError");
    }
}
