use serde_json::json;

use super::*;
use crate::state::test_helpers;

#[test]
fn layout_error_to_status_maps_invalid_input() {
    let err = LayoutError::InvalidInput("members must be an array".into());
    assert_eq!(layout_error_to_status(&err), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn layout_returns_positioned_graph() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_helpers::test_app_state(dir.path());
    let doc = json!({
        "members": [
            { "id": "self", "name": "Self", "gender": "M", "generation": 0, "isSelf": true },
            { "id": "spouse", "name": "Spouse", "gender": "F", "generation": 0 },
            { "id": "child1", "name": "Child", "gender": "F", "generation": 1 }
        ],
        "marriages": [{ "husband": "self", "wife": "spouse", "children": ["child1"] }]
    });

    let Json(result) = layout(State(state), Json(doc)).await.unwrap();
    assert_eq!(result.diagram.nodes.len(), 4);
    assert_eq!(result.diagram.edges.len(), 3);
    assert!(result.diagnostics.is_empty());
}

#[tokio::test]
async fn layout_rejects_non_document() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_helpers::test_app_state(dir.path());

    let err = layout(State(state), Json(json!({ "members": "nope", "marriages": [] })))
        .await
        .unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
}
