use serde::Serialize;

use crate::bsky::types::{ListItemView, ListView, ProfileView};

/// One list a profile belongs to, with the list-item record needed to
/// delete that membership later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileList {
    pub name: String,
    pub uri: String,
    pub item_uri: String,
    pub item_rkey: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub did: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub handle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub following: bool,
    pub followed_by: bool,
    pub lists: Vec<ProfileList>,
}

impl Profile {
    pub fn from_view(view: &ProfileView, following: bool) -> Self {
        Self {
            did: view.did.clone(),
            display_name: view.display_name.clone(),
            handle: view.handle.clone(),
            avatar: view.avatar.clone(),
            description: view.description.clone(),
            following,
            followed_by: view.is_followed_by(),
            lists: Vec::new(),
        }
    }

    pub fn is_in_list(&self, list_uri: &str) -> bool {
        self.lists.iter().any(|l| l.uri == list_uri)
    }

    /// Display name when set and non-empty, else the handle.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.handle)
    }
}

/// A list owned by the logged-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct List {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    pub uri: String,
}

/// Harvested list together with every member record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListWithMembers {
    pub name: String,
    pub uri: String,
    pub purpose: Option<String>,
    pub members: Vec<ListItemView>,
}

impl ListWithMembers {
    pub fn new(view: ListView, members: Vec<ListItemView>) -> Self {
        Self {
            name: view.name,
            uri: view.uri,
            purpose: view.purpose,
            members,
        }
    }
}

/// All session state after login.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregatedData {
    pub profiles: Vec<Profile>,
    pub lists: Vec<List>,
}

impl AggregatedData {
    pub fn list(&self, uri: &str) -> Option<&List> {
        self.lists.iter().find(|l| l.uri == uri)
    }
}
