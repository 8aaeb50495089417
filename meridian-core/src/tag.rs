/// Tag management operations: tag groups plus per-user tag assignment.
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AdapterError;
use crate::registry::{body_of, parse_args, require_non_empty, schema_of, Method, Operation, Payload};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateTagGroup {
    /// Tag group name
    pub name: String,
    /// Tag group description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListTagGroups {
    /// Maximum number of results
    pub limit: Option<u32>,
    /// Offset for pagination
    pub offset: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UpdateTagGroup {
    /// Tag group ID
    pub group_id: String,
    /// New name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct TagGroupId {
    /// Tag group ID
    pub group_id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AssignUserTag {
    /// User ID
    pub user_id: String,
    /// Tag ID to assign
    pub tag_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListUserTags {
    /// User ID to list tags for
    pub user_id: String,
}

fn build_create_tag_group(args: Value) -> Result<Payload, AdapterError> {
    let input: CreateTagGroup = parse_args(args)?;
    require_non_empty(&input.name, "name")?;
    Ok(body_of(&input))
}

fn build_list_tag_groups(args: Value) -> Result<Payload, AdapterError> {
    let input: ListTagGroups = parse_args(args)?;
    Ok(Payload::Query(pagination_pairs(input.limit, input.offset)))
}

fn build_update_tag_group(args: Value) -> Result<Payload, AdapterError> {
    let input: UpdateTagGroup = parse_args(args)?;
    require_non_empty(&input.group_id, "group_id")?;
    Ok(body_of(&input))
}

fn build_tag_group_id(args: Value) -> Result<Payload, AdapterError> {
    let input: TagGroupId = parse_args(args)?;
    require_non_empty(&input.group_id, "group_id")?;
    Ok(body_of(&input))
}

fn build_assign_user_tag(args: Value) -> Result<Payload, AdapterError> {
    let input: AssignUserTag = parse_args(args)?;
    require_non_empty(&input.user_id, "user_id")?;
    require_non_empty(&input.tag_id, "tag_id")?;
    Ok(body_of(&input))
}

fn build_list_user_tags(args: Value) -> Result<Payload, AdapterError> {
    let input: ListUserTags = parse_args(args)?;
    require_non_empty(&input.user_id, "user_id")?;
    Ok(Payload::Query(vec![("user_id", input.user_id)]))
}

pub(crate) fn pagination_pairs(
    limit: Option<u32>,
    offset: Option<u32>,
) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::new();
    if let Some(limit) = limit {
        pairs.push(("limit", limit.to_string()));
    }
    if let Some(offset) = offset {
        pairs.push(("offset", offset.to_string()));
    }
    pairs
}

pub fn operations() -> Vec<Operation> {
    vec![
        Operation {
            name: "create_tag_group",
            description: "Create a new tag group",
            method: Method::Post,
            path: "/api/v5/entity/tags/group/create",
            input_schema: schema_of::<CreateTagGroup>(),
            build: build_create_tag_group,
        },
        Operation {
            name: "list_tag_groups",
            description: "List all tag groups",
            method: Method::Get,
            path: "/api/v5/entity/tags/group/list",
            input_schema: schema_of::<ListTagGroups>(),
            build: build_list_tag_groups,
        },
        Operation {
            name: "update_tag_group",
            description: "Update an existing tag group",
            method: Method::Post,
            path: "/api/v5/entity/tags/group/update",
            input_schema: schema_of::<UpdateTagGroup>(),
            build: build_update_tag_group,
        },
        Operation {
            name: "deactivate_tag_group",
            description: "Deactivate a tag group",
            method: Method::Post,
            path: "/api/v5/entity/tags/group/deactivate",
            input_schema: schema_of::<TagGroupId>(),
            build: build_tag_group_id,
        },
        Operation {
            name: "activate_tag_group",
            description: "Activate a tag group",
            method: Method::Post,
            path: "/api/v5/entity/tags/group/activate",
            input_schema: schema_of::<TagGroupId>(),
            build: build_tag_group_id,
        },
        Operation {
            name: "assign_user_tag",
            description: "Assign a tag to a user",
            method: Method::Post,
            path: "/api/v5/entity/user/tags/assign",
            input_schema: schema_of::<AssignUserTag>(),
            build: build_assign_user_tag,
        },
        Operation {
            name: "list_user_tags",
            description: "List tags assigned to a user",
            method: Method::Get,
            path: "/api/v5/entity/user/tags/list",
            input_schema: schema_of::<ListUserTags>(),
            build: build_list_user_tags,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_tag_group_requires_name() {
        let err = build_create_tag_group(json!({})).unwrap_err();
        assert_eq!(err.kind(), "ValidationError");

        let err = build_create_tag_group(json!({"name": "  "})).unwrap_err();
        assert_eq!(err.kind(), "ValidationError");
    }

    #[test]
    fn list_tag_groups_accepts_empty_arguments() {
        let payload = build_list_tag_groups(json!({})).unwrap();
        assert_eq!(payload, Payload::Query(vec![]));
    }

    #[test]
    fn list_tag_groups_maps_pagination() {
        let payload = build_list_tag_groups(json!({"limit": 25, "offset": 50})).unwrap();
        assert_eq!(
            payload,
            Payload::Query(vec![
                ("limit", "25".to_string()),
                ("offset", "50".to_string()),
            ])
        );
    }

    #[test]
    fn list_tag_groups_rejects_negative_limit() {
        let err = build_list_tag_groups(json!({"limit": -5})).unwrap_err();
        assert_eq!(err.kind(), "ValidationError");
    }

    #[test]
    fn update_tag_group_keeps_only_provided_fields() {
        let payload =
            build_update_tag_group(json!({"group_id": "g-1", "name": "VIP"})).unwrap();
        match payload {
            Payload::Body(body) => {
                assert_eq!(body["group_id"], "g-1");
                assert_eq!(body["name"], "VIP");
                assert!(body.get("description").is_none());
            }
            other => panic!("expected body payload, got {other:?}"),
        }
    }

    #[test]
    fn activate_and_deactivate_share_the_id_builder() {
        let err = build_tag_group_id(json!({})).unwrap_err();
        assert_eq!(err.kind(), "ValidationError");

        let payload = build_tag_group_id(json!({"group_id": "g-1"})).unwrap();
        match payload {
            Payload::Body(body) => assert_eq!(body["group_id"], "g-1"),
            other => panic!("expected body payload, got {other:?}"),
        }
    }
}
