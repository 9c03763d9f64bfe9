//! Tests for the permission query handler.

use std::sync::Arc;

use permtree_domain::PermissionResolver;
use permtree_storage::{InventorySnapshot, MemoryInventoryStore};

use super::*;

type StoreHandler = PermissionQueryHandler<
    MemoryInventoryStore,
    MemoryInventoryStore,
    MemoryInventoryStore,
    MemoryInventoryStore,
>;

const INVENTORY: &str = r#"{
    "nodes": [
        {"id": "default", "key": "1", "value": "Default"},
        {"id": "prod", "key": "1:1", "value": "Production"},
        {"id": "prod-web", "key": "1:1:1", "value": "Web"},
        {"id": "lab", "key": "2", "value": "Lab"},
        {"id": "lab-gpu", "key": "2:1", "value": "GPU"}
    ],
    "assets": [
        {"id": "web-01", "hostname": "web-01", "nodes": ["1:1:1"]},
        {"id": "gpu-01", "hostname": "gpu-01", "nodes": ["2:1"]}
    ],
    "groups": ["sre"],
    "users": [{"id": "alice", "groups": ["sre"]}, {"id": "bob"}],
    "permissions": [
        {
            "id": "sre-prod",
            "user_groups": ["sre"],
            "nodes": ["prod"],
            "system_users": {"root": "CONNECT | UPLOAD", "audit": ""}
        },
        {
            "id": "alice-gpu",
            "users": ["alice"],
            "assets": ["gpu-01"],
            "system_users": {"ubuntu": "ALL"}
        }
    ],
    "applications": [{"id": "pg", "name": "Postgres", "category": "db"}],
    "application_permissions": [{"id": "ap1", "user_groups": ["sre"], "applications": ["pg"]}]
}"#;

fn handler() -> StoreHandler {
    let snapshot = InventorySnapshot::from_json(INVENTORY).unwrap();
    let store = Arc::new(MemoryInventoryStore::from_snapshot(snapshot).unwrap());
    PermissionQueryHandler::new(Arc::new(PermissionResolver::from_store(store)))
}

#[tokio::test]
async fn test_roots_render_as_open_tree_nodes() {
    let roots = handler().node_children("user:alice", None).await.unwrap();

    let ids: Vec<&str> = roots.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
    assert!(roots.iter().all(|n| n.open && n.is_parent && n.p_id.is_empty()));
    assert_eq!(roots[0].name, "Default");
    assert_eq!(roots[0].meta.node_id, "default");
}

#[tokio::test]
async fn test_children_reference_parent_key() {
    let children = handler()
        .node_children("user:alice", Some("1"))
        .await
        .unwrap();

    assert_eq!(children.len(), 1);
    assert_eq!(children[0].id, "1:1");
    assert_eq!(children[0].p_id, "1");
    assert!(!children[0].open);
    assert_eq!(children[0].meta.depth, 2);
}

#[tokio::test]
async fn test_system_users_list_action_names() {
    let handler = handler();

    let web = handler
        .asset_system_users("user:alice", "web-01")
        .await
        .unwrap();
    // "audit" carries no actions and is left out.
    assert_eq!(web.len(), 1);
    assert_eq!(web[0].system_user.as_str(), "root");
    assert_eq!(web[0].actions, vec!["connect", "upload"]);

    let gpu = handler
        .asset_system_users("user:alice", "gpu-01")
        .await
        .unwrap();
    assert_eq!(gpu[0].system_user.as_str(), "ubuntu");
    assert!(gpu[0].actions.contains(&"clipboard_paste"));
}

#[tokio::test]
async fn test_node_assets_by_id() {
    let handler = handler();

    let assets = handler.node_assets("user:alice", "default").await.unwrap();
    let ids: Vec<&str> = assets.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["web-01"]);

    let err = handler.node_assets("user:alice", "missing").await.unwrap_err();
    assert!(matches!(err, HandlerError::NotFound { kind: "node", .. }));
}

#[tokio::test]
async fn test_granted_nodes_include_touch_points() {
    let nodes = handler().granted_nodes("user:alice").await.unwrap();
    let ids: Vec<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["1:1", "2:1"]);
}

#[tokio::test]
async fn test_applications_follow_group_records() {
    let handler = handler();

    let alice = handler.granted_applications("user:alice").await.unwrap();
    assert_eq!(alice.len(), 1);
    assert_eq!(alice[0].name, "Postgres");

    let bob = handler.granted_applications("user:bob").await.unwrap();
    assert!(bob.is_empty());
}

#[tokio::test]
async fn test_bad_input_is_invalid_request() {
    let handler = handler();

    let err = handler.granted_assets("alice").await.unwrap_err();
    assert!(matches!(err, HandlerError::InvalidRequest { .. }));

    let err = handler
        .node_children("user:alice", Some("1:x"))
        .await
        .unwrap_err();
    assert!(matches!(err, HandlerError::InvalidRequest { .. }));
}

#[tokio::test]
async fn test_unknown_principal_is_not_found() {
    let err = handler().granted_assets("group:ghosts").await.unwrap_err();
    assert!(matches!(err, HandlerError::NotFound { kind: "user group", .. }));
}

#[test]
fn test_tree_node_serializes_meta_type() {
    use permtree_domain::model::{Node, PathKey};

    let node = Node::new("web", PathKey::parse("1:1:1").unwrap(), "Web");
    let json = serde_json::to_value(TreeNode::from_node(&node)).unwrap();
    assert_eq!(json["p_id"], "1:1");
    assert_eq!(json["meta"]["type"], "node");
    assert_eq!(json["title"], "Web");
}
