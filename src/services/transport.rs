// src/services/transport.rs
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::{
    config::TransportConfig,
    error::TransportError,
    message::{ChatRequest, ChatResponse, OutboundRequest},
};

/// Delivers one request and returns the server's answer.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, request: &OutboundRequest) -> Result<ChatResponse, TransportError>;
}

#[async_trait]
impl<T: ChatTransport + ?Sized> ChatTransport for std::sync::Arc<T> {
    async fn send(&self, request: &OutboundRequest) -> Result<ChatResponse, TransportError> {
        (**self).send(request).await
    }
}

/// `POST <endpoint>` with a JSON body.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: TransportConfig,
}

impl HttpTransport {
    pub fn new(config: TransportConfig) -> Self {
        Self { client: Client::new(), config }
    }

    pub fn endpoint(&self) -> &str {
        self.config.endpoint.as_str()
    }

    fn body_for(&self, request: &OutboundRequest) -> ChatRequest {
        match request {
            OutboundRequest::Start => ChatRequest::new(self.config.start_message.clone()),
            OutboundRequest::Message(req) => req.clone(),
        }
    }

    async fn post(&self, body: &ChatRequest) -> Result<ChatResponse, TransportError> {
        let res = self
            .client
            .post(self.config.endpoint.clone())
            .json(body)
            .send()
            .await?;

        // Error statuses still carry a ChatResponse body.
        let status = res.status();
        let text = res.text().await?;
        debug!(%status, bytes = text.len(), "chat response received");

        match serde_json::from_str(&text) {
            Ok(resp) => Ok(resp),
            Err(source) => Err(TransportError::Decode { source, body: text }),
        }
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, request: &OutboundRequest) -> Result<ChatResponse, TransportError> {
        let body = self.body_for(request);
        debug!(endpoint = %self.config.endpoint, kind = request.kind(), "posting chat request");

        match self.config.timeout {
            Some(limit) => tokio::time::timeout(limit, self.post(&body))
                .await
                .map_err(|_| TransportError::Timeout(limit))?,
            None => self.post(&body).await,
        }
    }
}
