pub mod aggregate;
pub mod harvest;
pub mod membership;
pub mod model;
pub mod search;

use crate::bsky::auth::Session;
use crate::bsky::GraphApi;
use crate::error::{Error, Result};
use model::AggregatedData;

/// Harvest follows and lists concurrently and aggregate them into a fresh
/// snapshot. Either harvest failing fails the whole load.
pub async fn load_snapshot(api: &dyn GraphApi, session: &Session) -> Result<AggregatedData> {
    let (follows, lists) = tokio::try_join!(
        harvest::get_follows(api, session),
        harvest::get_lists_with_members(api, session),
    )?;
    Ok(aggregate::aggregate_data(&follows, &lists))
}

/// Flip whether `data.profiles[profile]` is in `data.lists[list]`.
/// Returns true when the profile is now a member.
pub async fn toggle_membership(
    api: &dyn GraphApi,
    session: &Session,
    data: &mut AggregatedData,
    profile: usize,
    list: usize,
) -> Result<bool> {
    let list = data
        .lists
        .get(list)
        .ok_or_else(|| Error::InvalidInput(format!("no list at index {}", list)))?;
    let profile = data
        .profiles
        .get_mut(profile)
        .ok_or_else(|| Error::InvalidInput(format!("no profile at index {}", profile)))?;
    if profile.is_in_list(&list.uri) {
        membership::remove_profile_from_list(api, session, profile, &list.uri).await?;
        Ok(false)
    } else {
        membership::add_profile_to_list(api, session, profile, list).await?;
        Ok(true)
    }
}
