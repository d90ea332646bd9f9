//! reqwest-backed implementation of the remote collection contract.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Response, Url};

use super::{decode_payload, RosterService};
use crate::config::Config;
use crate::errors::{server_message, ClientError};
use crate::models::{Member, MemberId, MemberPayload, QueryDescriptor};

/// Header name for the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// HTTP client for `{base_url}{collection_path}`.
#[derive(Debug, Clone)]
pub struct HttpRosterService {
    client: Client,
    collection_url: Url,
}

impl HttpRosterService {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = &config.api_key {
            let value = HeaderValue::from_str(key)
                .map_err(|e| ClientError::Config(format!("Invalid ROSTER_API_KEY: {}", e)))?;
            headers.insert(API_KEY_HEADER, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        let collection_url = Url::parse(&config.collection_url())
            .map_err(|e| ClientError::Config(format!("Invalid ROSTER_BASE_URL: {}", e)))?;

        Ok(Self {
            client,
            collection_url,
        })
    }

    /// `{collection}/{id}` with the id percent-encoded as one path segment.
    fn member_url(&self, id: &MemberId) -> Result<Url, ClientError> {
        let mut url = self.collection_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ClientError::Config(format!("{} cannot take a path", self.collection_url))
            })?
            .pop_if_empty()
            .push(id.as_str());
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<String, ClientError> {
        let response = request.send().await?;
        into_body(response).await
    }
}

/// Read the body of a response, mapping non-success statuses to errors.
async fn into_body(response: Response) -> Result<String, ClientError> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(ClientError::Status {
            status: status.as_u16(),
            message: server_message(&body),
        })
    }
}

#[async_trait]
impl RosterService for HttpRosterService {
    async fn list(&self, query: &QueryDescriptor) -> Result<Vec<Member>, ClientError> {
        let request = self
            .client
            .get(self.collection_url.clone())
            .query(&query.to_query_pairs());
        let body = self.send(request).await?;
        decode_payload(&body)
    }

    async fn create(&self, payload: &MemberPayload) -> Result<Member, ClientError> {
        let request = self.client.post(self.collection_url.clone()).json(payload);
        let body = self.send(request).await?;
        decode_payload(&body)
    }

    async fn update(&self, id: &MemberId, payload: &MemberPayload) -> Result<Member, ClientError> {
        let request = self.client.put(self.member_url(id)?).json(payload);
        let body = self.send(request).await?;
        decode_payload(&body)
    }

    async fn delete(&self, id: &MemberId) -> Result<(), ClientError> {
        let request = self.client.delete(self.member_url(id)?);
        self.send(request).await.map(|_| ())
    }
}
