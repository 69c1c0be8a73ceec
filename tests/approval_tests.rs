//! Tests for the approval policy implementations.

use std::collections::HashMap;
use std::sync::Arc;

use agentry::approval::{AllowList, ApprovalPolicy, ApproveAll, DenyAll, HandlerPolicy};
use agentry::error::AgentryError;
use agentry::types::{ToolApproval, ToolCallRequest};

fn call(id: &str, name: &str) -> ToolCallRequest {
    ToolCallRequest {
        id: id.into(),
        name: name.into(),
        server_label: None,
        arguments: serde_json::Value::Null,
    }
}

fn secret_headers() -> HashMap<String, String> {
    HashMap::from([("authorization".to_string(), "SuperSecret".to_string())])
}

#[tokio::test]
async fn approve_all_grants_with_headers() {
    let policy = ApproveAll::new().with_headers(secret_headers());

    let approval = policy.decide(&call("call_1", "search_docs")).await.unwrap();

    assert_eq!(approval.tool_call_id, "call_1");
    assert!(approval.approve);
    assert_eq!(approval.headers, secret_headers());
}

#[tokio::test]
async fn deny_all_denies_everything() {
    let approval = DenyAll.decide(&call("call_1", "search_docs")).await.unwrap();

    assert!(!approval.approve);
    assert!(approval.headers.is_empty());
}

#[tokio::test]
async fn allow_list_grants_by_tool_name() {
    let policy = AllowList::new(["search_docs", "fetch_file"]).with_headers(secret_headers());

    let granted = policy.decide(&call("call_1", "search_docs")).await.unwrap();
    assert!(granted.approve);
    assert_eq!(granted.headers, secret_headers());

    let denied = policy.decide(&call("call_2", "delete_repo")).await.unwrap();
    assert!(!denied.approve);
    assert!(denied.headers.is_empty());
}

#[tokio::test]
async fn handler_policy_defers_to_the_callback() {
    let policy = HandlerPolicy::new(Arc::new(|call| {
        Box::pin(async move {
            if call.name == "delete_repo" {
                Err(AgentryError::Configuration("operator rejected".into()))
            } else {
                Ok(ToolApproval::grant(call.id))
            }
        })
    }));

    let granted = policy.decide(&call("call_1", "search_docs")).await.unwrap();
    assert!(granted.approve);

    let result = policy.decide(&call("call_2", "delete_repo")).await;
    assert!(matches!(result, Err(AgentryError::Configuration(_))));
}
