//! Canned API payloads shared by the draft service tests

use serde_json::{json, Value};

use crate::test_utils::MockResponse;

pub(crate) const CREATED_AT: &str = "2024-03-01T10:00:00.000Z";
pub(crate) const UPDATED_AT: &str = "2024-03-01T12:30:00.000Z";

pub(crate) fn envelope(data: Value) -> MockResponse {
    MockResponse::json(200, json!({ "data": data }).to_string())
}

pub(crate) fn draft(id: &str) -> Value {
    json!({
        "id": id,
        "createdBy": "user-1",
        "deepLink": format!("https://gitkraken.dev/drafts/{}", id),
        "isPublic": true,
        "createdAt": CREATED_AT,
        "updatedAt": UPDATED_AT,
        "title": format!("Draft {}", id),
    })
}

pub(crate) fn created_changeset(draft_id: &str, upload_url: &str) -> Value {
    json!({
        "id": "cs-1",
        "draftId": draft_id,
        "parentChangesetId": "00000000-0000-0000-0000-000000000000",
        "userId": "user-1",
        "gitUserName": "Ada",
        "gitUserEmail": "ada@example.com",
        "deepLink": format!("https://gitkraken.dev/drafts/{}/cs-1", draft_id),
        "createdAt": CREATED_AT,
        "updatedAt": UPDATED_AT,
        "patches": [{
            "id": "patch-1",
            "changesetId": "cs-1",
            "baseCommitSha": "a".repeat(40),
            "baseBranchName": "main",
            "gitRepositoryId": "repo-1",
            "secureUploadData": {
                "url": upload_url,
                "method": "PUT",
                "headers": { "Host": ["storage.example.com"] }
            }
        }]
    })
}

pub(crate) fn patch(id: &str, changeset_id: &str, download_url: &str) -> Value {
    json!({
        "id": id,
        "changesetId": changeset_id,
        "userId": "user-1",
        "baseCommitSha": "a".repeat(40),
        "baseBranchName": "main",
        "deepLink": format!("https://gitkraken.dev/patches/{}", id),
        "secureDownloadData": {
            "url": download_url,
            "method": "GET",
            "headers": { "Host": [] }
        },
        "gitRepositoryId": "repo-1",
        "gitRepositoryData": {
            "id": "repo-1",
            "initialCommitSha": "f".repeat(40),
            "createdAt": CREATED_AT,
            "updatedAt": UPDATED_AT
        },
        "createdAt": CREATED_AT,
        "updatedAt": UPDATED_AT
    })
}

pub(crate) fn changeset(id: &str, draft_id: &str, patches: Vec<Value>) -> Value {
    json!({
        "id": id,
        "draftId": draft_id,
        "parentChangesetId": "00000000-0000-0000-0000-000000000000",
        "userId": "user-1",
        "gitUserName": "Ada",
        "gitUserEmail": "ada@example.com",
        "deepLink": format!("https://gitkraken.dev/drafts/{}/{}", draft_id, id),
        "createdAt": CREATED_AT,
        "updatedAt": UPDATED_AT,
        "patches": patches
    })
}
