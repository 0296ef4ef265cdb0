use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub const LIST_ITEM_COLLECTION: &str = "app.bsky.graph.listitem";

/// Relationship between the logged-in account and a profile. The values are
/// record uris; only their presence matters here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerState {
    #[serde(default)]
    pub following: Option<String>,
    #[serde(default)]
    pub followed_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub did: String,
    pub handle: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub viewer: Option<ViewerState>,
}

impl ProfileView {
    pub fn is_followed_by(&self) -> bool {
        self.viewer
            .as_ref()
            .is_some_and(|v| v.followed_by.is_some())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListView {
    pub uri: String,
    pub name: String,
    /// e.g. `app.bsky.graph.defs#curatelist`
    #[serde(default)]
    pub purpose: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListItemView {
    pub uri: String,
    pub subject: ProfileView,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetFollowsResponse {
    pub follows: Vec<ProfileView>,
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetListsResponse {
    pub lists: Vec<ListView>,
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetListResponse {
    pub items: Vec<ListItemView>,
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateSessionRequest<'a> {
    pub identifier: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    pub did: String,
    pub handle: String,
    pub access_jwt: String,
    pub refresh_jwt: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItemRecord<'a> {
    #[serde(rename = "$type")]
    pub record_type: &'static str,
    pub list: &'a str,
    pub subject: &'a str,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateRecordRequest<'a> {
    pub repo: &'a str,
    pub collection: &'static str,
    pub record: ListItemRecord<'a>,
}

#[derive(Debug, Clone, Deserialize)]
#[allow(dead_code)]
pub struct CreateRecordResponse {
    pub uri: String,
    pub cid: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteRecordRequest<'a> {
    pub repo: &'a str,
    pub collection: &'static str,
    pub rkey: &'a str,
}

/// Body of a non-2xx XRPC response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct XrpcErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Record key of an `at://repo/collection/rkey` uri: everything after the
/// final `/`.
pub fn record_key(uri: &str) -> &str {
    uri.rsplit('/').next().unwrap_or(uri)
}

/// Repository (DID) owning a record: segment 2 when splitting on `/`.
pub fn record_repo(uri: &str) -> Result<&str, ApiError> {
    uri.split('/')
        .nth(2)
        .filter(|repo| !repo.is_empty())
        .ok_or_else(|| ApiError::MalformedUri(uri.to_string()))
}
