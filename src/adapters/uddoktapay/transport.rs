use crate::domain::{
    error::GatewayError,
    ports::{BoxFuture, GatewayTransport, OutboundRequest, RawResponse},
};

/// `GatewayTransport` over `reqwest`. No timeout or retry is applied.
#[derive(Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn post_json_inner(
        &self,
        request: &OutboundRequest,
    ) -> Result<RawResponse, GatewayError> {
        let url = &request.url;
        let mut builder = self.client.post(url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }
        let body = serde_json::to_vec(&request.body)?;

        let response = builder
            .body(body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(format!("POST {url}: {e}")))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(format!("reading body from {url}: {e}")))?;

        Ok(RawResponse { status, body })
    }
}

impl GatewayTransport for ReqwestTransport {
    fn post_json<'a>(
        &'a self,
        request: &'a OutboundRequest,
    ) -> BoxFuture<'a, Result<RawResponse, GatewayError>> {
        Box::pin(async move { self.post_json_inner(request).await })
    }
}
