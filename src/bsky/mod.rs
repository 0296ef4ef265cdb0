pub mod auth;
pub mod rest;
pub mod types;

use async_trait::async_trait;

use crate::error::{ApiError, Error, Result};
use auth::Session;
use types::{ListItemView, ListView, ProfileView};

/// Fixed page size for every paginated graph query.
pub const PAGE_LIMIT: u32 = 100;

/// Refresh when the access token has less than this many seconds left.
const REFRESH_MARGIN_SECS: i64 = 60;

/// One page of a cursor-paginated collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub cursor: Option<String>,
}

impl<T> Page<T> {
    /// Continuation cursor, if the server signalled more pages. An empty
    /// string counts as the end of the collection.
    pub fn next_cursor(&self) -> Option<&str> {
        self.cursor.as_deref().filter(|c| !c.is_empty())
    }
}

/// The slice of the Bluesky XRPC surface this app needs.
#[async_trait]
pub trait GraphApi: Send + Sync {
    async fn create_session(&self, identifier: &str, password: &str) -> Result<Session, ApiError>;

    async fn refresh_session(&self, session: &Session) -> Result<Session, ApiError>;

    async fn get_follows(
        &self,
        session: &Session,
        actor: &str,
        cursor: Option<&str>,
        limit: u32,
    ) -> Result<Page<ProfileView>, ApiError>;

    async fn get_lists(
        &self,
        session: &Session,
        actor: &str,
        cursor: Option<&str>,
        limit: u32,
    ) -> Result<Page<ListView>, ApiError>;

    async fn get_list(
        &self,
        session: &Session,
        list: &str,
        cursor: Option<&str>,
        limit: u32,
    ) -> Result<Page<ListItemView>, ApiError>;

    /// Create an `app.bsky.graph.listitem` record in `repo`; returns the
    /// new record's uri.
    async fn create_list_item(
        &self,
        session: &Session,
        repo: &str,
        list: &str,
        subject: &str,
    ) -> Result<String, ApiError>;

    async fn delete_list_item(&self, session: &Session, repo: &str, rkey: &str) -> Result<(), ApiError>;
}

/// Log in with a handle (or DID / email) and app password.
pub async fn login(api: &dyn GraphApi, identifier: &str, password: &str) -> Result<Session> {
    let (identifier, password) = auth::validate_credentials(identifier, password)?;
    api.create_session(&identifier, &password)
        .await
        .map_err(Error::Login)
}

/// Swap `session` for a refreshed one if its access token is about to
/// expire.
pub async fn ensure_fresh_session(api: &dyn GraphApi, session: &mut Session) -> Result<()> {
    let now = chrono::Utc::now().timestamp();
    if session.needs_refresh(now, REFRESH_MARGIN_SECS) {
        tracing::debug!(did = %session.did, "access token expiring, refreshing session");
        *session = api.refresh_session(session).await?;
    }
    Ok(())
}
