use super::auth::Session;
use super::types::*;
use super::{GraphApi, Page};
use crate::error::ApiError;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// XRPC client for a Bluesky PDS / entryway (e.g. `https://bsky.social`).
pub struct BskyRest {
    client: Client,
    base_url: String,
}

impl BskyRest {
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .pool_max_idle_per_host(4)
            .timeout(request_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, method: &str) -> String {
        format!("{}/xrpc/{}", self.base_url, method)
    }

    /// GET an XRPC query with the session's access token.
    async fn query<T: DeserializeOwned>(
        &self,
        session: &Session,
        method: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let req = self
            .client
            .get(self.url(method))
            .bearer_auth(session.access_jwt())
            .query(params);
        let resp = self.send(req, method).await?;
        decode(resp, method).await
    }

    /// Send a request and turn non-2xx responses into `ApiError::Status`.
    async fn send(&self, req: RequestBuilder, method: &str) -> Result<Response, ApiError> {
        tracing::debug!(method, "xrpc request");
        let resp = req.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let parsed: XrpcErrorBody = serde_json::from_str(&body).unwrap_or_default();
        let message = parsed
            .message
            .clone()
            .or_else(|| parsed.error.clone())
            .unwrap_or_else(|| {
                if body.is_empty() {
                    status.canonical_reason().unwrap_or("error").to_string()
                } else {
                    body
                }
            });
        tracing::warn!(method, status = status.as_u16(), error = ?parsed.error, "xrpc error");
        Err(ApiError::Status {
            method: method.to_string(),
            status: status.as_u16(),
            error: parsed.error,
            message,
        })
    }
}

async fn decode<T: DeserializeOwned>(resp: Response, method: &str) -> Result<T, ApiError> {
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode {
        method: method.to_string(),
        source,
    })
}

fn page_params<'a>(
    key: &'a str,
    value: &'a str,
    cursor: Option<&'a str>,
    limit: &'a str,
) -> Vec<(&'a str, &'a str)> {
    let mut params = vec![(key, value), ("limit", limit)];
    if let Some(c) = cursor {
        params.push(("cursor", c));
    }
    params
}

#[async_trait]
impl GraphApi for BskyRest {
    async fn create_session(&self, identifier: &str, password: &str) -> Result<Session, ApiError> {
        let method = "com.atproto.server.createSession";
        let req = self
            .client
            .post(self.url(method))
            .json(&CreateSessionRequest { identifier, password });
        let resp = self.send(req, method).await?;
        let created: CreateSessionResponse = decode(resp, method).await?;
        tracing::info!(did = %created.did, handle = %created.handle, "session created");
        Ok(created.into())
    }

    async fn refresh_session(&self, session: &Session) -> Result<Session, ApiError> {
        let method = "com.atproto.server.refreshSession";
        let req = self
            .client
            .post(self.url(method))
            .bearer_auth(session.refresh_jwt());
        let resp = self.send(req, method).await?;
        let refreshed: CreateSessionResponse = decode(resp, method).await?;
        tracing::info!(did = %refreshed.did, "session refreshed");
        Ok(refreshed.into())
    }

    async fn get_follows(
        &self,
        session: &Session,
        actor: &str,
        cursor: Option<&str>,
        limit: u32,
    ) -> Result<Page<ProfileView>, ApiError> {
        let limit = limit.to_string();
        let params = page_params("actor", actor, cursor, &limit);
        let resp: GetFollowsResponse = self
            .query(session, "app.bsky.graph.getFollows", &params)
            .await?;
        Ok(Page {
            items: resp.follows,
            cursor: resp.cursor,
        })
    }

    async fn get_lists(
        &self,
        session: &Session,
        actor: &str,
        cursor: Option<&str>,
        limit: u32,
    ) -> Result<Page<ListView>, ApiError> {
        let limit = limit.to_string();
        let params = page_params("actor", actor, cursor, &limit);
        let resp: GetListsResponse = self
            .query(session, "app.bsky.graph.getLists", &params)
            .await?;
        Ok(Page {
            items: resp.lists,
            cursor: resp.cursor,
        })
    }

    async fn get_list(
        &self,
        session: &Session,
        list: &str,
        cursor: Option<&str>,
        limit: u32,
    ) -> Result<Page<ListItemView>, ApiError> {
        let limit = limit.to_string();
        let params = page_params("list", list, cursor, &limit);
        let resp: GetListResponse = self
            .query(session, "app.bsky.graph.getList", &params)
            .await?;
        Ok(Page {
            items: resp.items,
            cursor: resp.cursor,
        })
    }

    async fn create_list_item(
        &self,
        session: &Session,
        repo: &str,
        list: &str,
        subject: &str,
    ) -> Result<String, ApiError> {
        let method = "com.atproto.repo.createRecord";
        let body = CreateRecordRequest {
            repo,
            collection: LIST_ITEM_COLLECTION,
            record: ListItemRecord {
                record_type: LIST_ITEM_COLLECTION,
                list,
                subject,
                created_at: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            },
        };
        let req = self
            .client
            .post(self.url(method))
            .bearer_auth(session.access_jwt())
            .json(&body);
        let resp = self.send(req, method).await?;
        let created: CreateRecordResponse = decode(resp, method).await?;
        Ok(created.uri)
    }

    async fn delete_list_item(&self, session: &Session, repo: &str, rkey: &str) -> Result<(), ApiError> {
        let method = "com.atproto.repo.deleteRecord";
        let body = DeleteRecordRequest {
            repo,
            collection: LIST_ITEM_COLLECTION,
            rkey,
        };
        let req = self
            .client
            .post(self.url(method))
            .bearer_auth(session.access_jwt())
            .json(&body);
        self.send(req, method).await?;
        Ok(())
    }
}
