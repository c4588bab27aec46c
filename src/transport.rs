//! Browser HTTP Transport
//!
//! Sends portal API calls with `fetch` through gloo-net.

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder};
use portal_core::{HttpCall, HttpMethod, HttpTransport, RawResponse};
use web_sys::RequestCredentials;

#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTransport;

fn builder(method: HttpMethod, url: &str) -> RequestBuilder {
    match method {
        HttpMethod::Get => Request::get(url),
        HttpMethod::Post => Request::post(url),
        HttpMethod::Put => Request::put(url),
        HttpMethod::Patch => Request::patch(url),
        HttpMethod::Delete => Request::delete(url),
    }
}

#[async_trait(?Send)]
impl HttpTransport for GlooTransport {
    async fn send(&self, call: HttpCall) -> Result<RawResponse, String> {
        let mut request = builder(call.method, &call.url).header("Accept", "application/json");
        if let Some(token) = &call.bearer {
            request = request.header("Authorization", &format!("Bearer {}", token));
        }
        if call.with_credentials {
            request = request.credentials(RequestCredentials::Include);
        }

        let request = match &call.body {
            Some(body) => request.json(body),
            None => request.build(),
        }
        .map_err(|e| e.to_string())?;

        let response = request.send().await.map_err(|e| e.to_string())?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Ok(RawResponse::new(status, body))
    }
}
