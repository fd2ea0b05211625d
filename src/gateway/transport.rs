// region:    --- Imports
use super::{GatewayError, Method, MultipartForm, Request, Response, Transport};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::debug;

// endregion: --- Imports

// region:    --- Http Transport
/// reqwest 기반 전송 구현체
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    /// 전송 구현체 생성
    /// timeout이 None이면 요청은 응답이 올 때까지 기다린다.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, GatewayError> {
        // 상대 경로 결합을 위해 끝에 '/'를 보장한다
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url =
            Url::parse(&normalized).map_err(|e| GatewayError::InvalidUrl(e.to_string()))?;

        // 로그인 세션은 쿠키(JSESSIONID)로 유지된다
        let mut builder = Client::builder().cookie_store(true);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    fn multipart(form: &MultipartForm) -> Result<Form, GatewayError> {
        let mut multipart = Form::new();
        for (name, value) in &form.fields {
            multipart = multipart.text(name.clone(), value.clone());
        }
        for file in &form.files {
            let part = Part::bytes(file.bytes.clone())
                .file_name(file.file_name.clone())
                .mime_str(&file.content_type)?;
            multipart = multipart.part(file.name.clone(), part);
        }
        Ok(multipart)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &Request) -> Result<Response, GatewayError> {
        let url = self
            .base_url
            .join(&request.path)
            .map_err(|e| GatewayError::InvalidUrl(e.to_string()))?;

        let builder = match (request.method, &request.multipart) {
            (Method::Get, _) => self.client.get(url).query(&request.params),
            (Method::Post, Some(form)) => self.client.post(url).multipart(Self::multipart(form)?),
            (Method::Post, None) => self.client.post(url).form(&request.params),
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(
            "{:<12} --> {} {} -> {} ({} bytes)",
            "Transport",
            request.method,
            request.path,
            status,
            body.len()
        );

        Ok(Response { status, body })
    }
}
// endregion: --- Http Transport
