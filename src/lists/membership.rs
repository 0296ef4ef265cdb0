use super::model::{List, Profile, ProfileList};
use crate::bsky::auth::Session;
use crate::bsky::types::{record_key, record_repo};
use crate::bsky::GraphApi;
use crate::error::{Error, Result};

/// Add `profile` to `list` by creating a list-item record in the session's
/// repo, then record the new membership on `profile`.
///
/// A profile that is already in the list is left alone and no record is
/// created. On failure `profile` is unchanged.
pub async fn add_profile_to_list(
    api: &dyn GraphApi,
    session: &Session,
    profile: &mut Profile,
    list: &List,
) -> Result<()> {
    if profile.is_in_list(&list.uri) {
        tracing::debug!(handle = %profile.handle, list = %list.name, "already a member");
        return Ok(());
    }

    let item_uri = api
        .create_list_item(session, &session.did, &list.uri, &profile.did)
        .await?;

    tracing::info!(handle = %profile.handle, list = %list.name, item = %item_uri, "added to list");
    profile.lists.push(ProfileList {
        name: list.name.clone(),
        uri: list.uri.clone(),
        item_rkey: record_key(&item_uri).to_string(),
        item_uri,
    });
    Ok(())
}

/// Remove `profile` from the list identified by `list_uri` by deleting the
/// list-item record, then drop the membership from `profile`.
pub async fn remove_profile_from_list(
    api: &dyn GraphApi,
    session: &Session,
    profile: &mut Profile,
    list_uri: &str,
) -> Result<()> {
    let item = profile
        .lists
        .iter()
        .find(|l| l.uri == list_uri)
        .ok_or_else(|| Error::NotMember {
            handle: profile.handle.clone(),
            list_uri: list_uri.to_string(),
        })?;

    let repo = record_repo(&item.item_uri)?;
    api.delete_list_item(session, repo, &item.item_rkey).await?;

    tracing::info!(handle = %profile.handle, list = %item.name, "removed from list");
    profile.lists.retain(|l| l.uri != list_uri);
    Ok(())
}
