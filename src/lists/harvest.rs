//! Drain the paginated graph endpoints into complete in-memory sequences.
//!
//! Pages are requested strictly one after another and appended in the
//! order the server returns them. The first failing page aborts the whole
//! harvest; nothing partial is returned and nothing is retried.

use super::model::ListWithMembers;
use crate::bsky::auth::Session;
use crate::bsky::types::{ListItemView, ProfileView};
use crate::bsky::{GraphApi, PAGE_LIMIT};
use crate::error::{Error, Result};

/// Fetch every account the session's user follows.
pub async fn get_follows(api: &dyn GraphApi, session: &Session) -> Result<Vec<ProfileView>> {
    let mut all_follows = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = api
            .get_follows(session, &session.did, cursor.as_deref(), PAGE_LIMIT)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "error fetching follows");
                Error::fetch("follows", e)
            })?;

        tracing::debug!(count = page.items.len(), "fetched follows page");
        let next = page.next_cursor().map(str::to_string);
        all_follows.extend(page.items);

        match next {
            Some(c) => cursor = Some(c),
            None => break,
        }
    }

    tracing::info!(total = all_follows.len(), "follows harvested");
    Ok(all_follows)
}

/// Fetch every list the session's user owns, each with all of its members.
pub async fn get_lists_with_members(
    api: &dyn GraphApi,
    session: &Session,
) -> Result<Vec<ListWithMembers>> {
    let mut all_lists = Vec::new();
    let mut lists_cursor: Option<String> = None;

    loop {
        let page = api
            .get_lists(session, &session.did, lists_cursor.as_deref(), PAGE_LIMIT)
            .await
            .map_err(|e| Error::fetch("lists", e))?;
        let next = page.next_cursor().map(str::to_string);

        for list in page.items {
            let members = get_list_members(api, session, &list.uri)
                .await
                .map_err(|e| Error::fetch(format!("members for list: {}", list.name), e))?;
            tracing::debug!(list = %list.name, members = members.len(), "fetched list");
            all_lists.push(ListWithMembers::new(list, members));
        }

        match next {
            Some(c) => lists_cursor = Some(c),
            None => break,
        }
    }

    tracing::info!(total = all_lists.len(), "lists harvested");
    Ok(all_lists)
}

async fn get_list_members(
    api: &dyn GraphApi,
    session: &Session,
    list_uri: &str,
) -> Result<Vec<ListItemView>, crate::error::ApiError> {
    let mut members = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = api
            .get_list(session, list_uri, cursor.as_deref(), PAGE_LIMIT)
            .await?;
        let next = page.next_cursor().map(str::to_string);
        members.extend(page.items);

        match next {
            Some(c) => cursor = Some(c),
            None => break,
        }
    }

    Ok(members)
}
