//! Depth guard tests against the full schema
//!
//! A rejected query must never reach storage, so every rejection also
//! checks the repository journal.

mod common;

use async_graphql::Request;
use rstest::rstest;

use common::*;

const DEPTH_5: &str = "{ users { profile { user { profile { user { id } } } } } }";
const DEPTH_6: &str = "{ users { profile { user { profile { user { profile { id } } } } } } }";

#[rstest]
#[case::root_only("{ users { id } }")]
#[case::at_limit(DEPTH_5)]
#[case::posts_chain("{ posts { author { posts { author { posts { id } } } } } }")]
#[tokio::test]
async fn test_queries_within_limit_execute(#[case] query: &str) {
    let app = TestApp::new();
    seed_user(&app.repos, "reader").await;
    app.store.clear_calls();

    let response = app.execute(query).await;

    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert!(!app.store.calls().is_empty());
}

#[rstest]
#[case::one_past_limit(DEPTH_6)]
#[case::through_subscriptions(
    "{ users { userSubscribedTo { subscribedToUser { userSubscribedTo { subscribedToUser { userSubscribedTo { id } } } } } } }"
)]
#[case::hidden_in_fragment(
    r#"
    query Hidden { users { ...Deep } }
    fragment Deep on User { profile { user { profile { user { ... on User { profile { id } } } } } } }
    "#
)]
#[tokio::test]
async fn test_queries_past_limit_are_rejected(#[case] query: &str) {
    let app = TestApp::new();

    let response = app.execute(query).await;

    assert!(response.data.into_json().unwrap().is_null());
    assert_eq!(response.errors.len(), 1);
    assert_eq!(error_code(&response.errors[0]).as_deref(), Some("QUERY_TOO_DEEP"));
    assert!(response.errors[0]
        .message
        .contains("exceeds maximum operation depth of 5"));
    assert!(app.store.calls().is_empty());
}

#[tokio::test]
async fn test_rejection_names_the_operation() {
    let app = TestApp::new();
    let query = DEPTH_6.replacen('{', "query TooDeep {", 1);

    let response = app.execute(&query).await;

    assert_eq!(response.errors.len(), 1);
    assert!(response.errors[0].message.starts_with("'TooDeep'"));
}

#[tokio::test]
async fn test_rejected_mutation_does_not_write() {
    let app = TestApp::with_max_depth(1);
    let query = r#"
        mutation {
            createUser(dto: { name: "deep", balance: 1.0 }) {
                posts { author { id } }
            }
        }
    "#;

    let response = app.execute(query).await;

    assert_eq!(response.errors.len(), 1);
    assert!(app.store.calls().is_empty());
    let users = app.execute("{ users { id } }").await;
    assert_eq!(data(&users)["users"], serde_json::json!([]));
}

#[tokio::test]
async fn test_configured_limit_is_honoured() {
    let app = TestApp::with_max_depth(6);

    let response = app.execute(DEPTH_6).await;

    assert!(response.errors.is_empty(), "{:?}", response.errors);
}

#[tokio::test]
async fn test_selected_operation_in_multi_operation_document() {
    let app = TestApp::new();
    let document = format!("query Shallow {{ users {{ id }} }}\nquery Deep {}", DEPTH_6);

    let response = app
        .execute_request(Request::new(document).operation_name("Shallow"))
        .await;

    // Every operation in the document is checked, not only the selected one
    assert_eq!(response.errors.len(), 1);
    assert!(response.errors[0].message.starts_with("'Deep'"));
}
