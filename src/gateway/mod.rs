/// 원격 경매 서비스 요청 게이트웨이
/// 모든 요청은 이 게이트웨이를 통해 나가며, 인증 만료(403) 응답은 호출자에게 전달되지 않는다.
// region:    --- Imports
use crate::session::Session;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

mod transport;
pub use transport::HttpTransport;

// endregion: --- Imports

// region:    --- Constants
pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_UNAUTHORIZED: u16 = 401;
/// 인증 만료 상태 코드
pub const STATUS_UNAUTHENTICATED: u16 = 403;

// 오류 페이지 두 번째 문단의 고정 접두사 길이 ("Message ")
const ERROR_PREFIX_LEN: usize = 8;
// endregion: --- Constants

// region:    --- Errors
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid service url: {0}")]
    InvalidUrl(String),
    #[error("request failed: {0}")]
    Transport(String),
    #[error("user is not authenticated")]
    Unauthenticated,
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        GatewayError::Transport(e.to_string())
    }
}
// endregion: --- Errors

// region:    --- Request / Response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
        }
    }
}

/// multipart 파일 파트
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    pub name: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// multipart 폼 데이터
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    pub fields: Vec<(String, String)>,
    pub files: Vec<FilePart>,
}

impl MultipartForm {
    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.push((name.to_string(), value.into()));
        self
    }

    pub fn file(mut self, part: FilePart) -> Self {
        self.files.push(part);
        self
    }
}

/// 요청
/// GET 파라미터는 쿼리 문자열로, POST 파라미터는 urlencoded 본문으로 전송된다.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub params: Vec<(String, String)>,
    pub multipart: Option<MultipartForm>,
}

impl Request {
    pub fn get(path: &str) -> Self {
        Self {
            method: Method::Get,
            path: path.to_string(),
            params: Vec::new(),
            multipart: None,
        }
    }

    pub fn post(path: &str) -> Self {
        Self {
            method: Method::Post,
            ..Self::get(path)
        }
    }

    pub fn post_multipart(path: &str, form: MultipartForm) -> Self {
        Self {
            multipart: Some(form),
            ..Self::post(path)
        }
    }

    pub fn param(mut self, name: &str, value: impl ToString) -> Self {
        self.params.push((name.to_string(), value.to_string()));
        self
    }

    /// 파라미터 값 조회 (테스트 및 로깅용)
    pub fn param_values(&self, name: &str) -> Vec<&str> {
        self.params
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }
}

/// 응답
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}
// endregion: --- Request / Response

// region:    --- Transport Trait
/// 요청 전송 트레이트
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &Request) -> Result<Response, GatewayError>;
}
// endregion: --- Transport Trait

// region:    --- Gateway
pub struct Gateway {
    transport: Arc<dyn Transport>,
    session: Arc<Session>,
}

impl Gateway {
    pub fn new(transport: Arc<dyn Transport>, session: Arc<Session>) -> Self {
        Self { transport, session }
    }

    pub fn session(&self) -> Arc<Session> {
        Arc::clone(&self.session)
    }

    /// 요청 전송
    /// 403 응답은 세션을 무효화하고 `GatewayError::Unauthenticated`로 바뀐다.
    /// 그 외 상태 코드는 그대로 전달한다. 재시도는 하지 않는다.
    pub async fn call(&self, request: Request) -> Result<Response, GatewayError> {
        info!(
            "{:<12} --> {} {} {:?}",
            "Gateway", request.method, request.path, request.params
        );
        let response = self.transport.send(&request).await.map_err(|e| {
            warn!("{:<12} --> 요청 실패: {} {}", "Gateway", request.path, e);
            e
        })?;

        if response.status == STATUS_UNAUTHENTICATED {
            warn!(
                "{:<12} --> 인증 만료 응답: {} {}",
                "Gateway", request.method, request.path
            );
            self.session.invalidate();
            return Err(GatewayError::Unauthenticated);
        }

        info!(
            "{:<12} --> 응답 수신: {} status={}",
            "Gateway", request.path, response.status
        );
        Ok(response)
    }

    /// 요청 전송 후 응답 분류
    pub async fn exchange(&self, request: Request) -> Reply {
        Reply::from_result(self.call(request).await)
    }
}
// endregion: --- Gateway

// region:    --- Reply
/// 컨트롤러가 처리하는 응답 분류
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// 200, JSON 본문
    Success(String),
    /// 400, 오류 페이지에서 추출한 메시지
    Rejected(String),
    /// 그 밖의 상태 코드 또는 전송 실패
    Failed,
    /// 403, 게이트웨이가 이미 처리함
    LoggedOut,
}

impl Reply {
    pub fn from_result(result: Result<Response, GatewayError>) -> Self {
        match result {
            Ok(response) => Self::from_response(response),
            Err(GatewayError::Unauthenticated) => Reply::LoggedOut,
            Err(_) => Reply::Failed,
        }
    }

    pub fn from_response(response: Response) -> Self {
        match response.status {
            STATUS_OK => Reply::Success(response.body),
            STATUS_BAD_REQUEST => {
                Reply::Rejected(extract_error_message(&response.body).unwrap_or_default())
            }
            STATUS_UNAUTHENTICATED => Reply::LoggedOut,
            _ => Reply::Failed,
        }
    }
}

/// 오류 페이지(HTML)의 두 번째 문단에서 메시지 추출
/// `Label: message` 형태면 라벨을 떼고, 아니면 고정 접두사 길이만큼 건너뛴다.
pub fn extract_error_message(html: &str) -> Option<String> {
    let paragraph = paragraphs(html).into_iter().nth(1)?;
    let text = paragraph.trim_start();

    if let Some((label, rest)) = text.split_once(": ") {
        if !label.is_empty() && !label.contains(char::is_whitespace) {
            return Some(rest.to_string());
        }
    }
    Some(text.chars().skip(ERROR_PREFIX_LEN).collect())
}

// <p> 요소들의 텍스트 내용
fn paragraphs(html: &str) -> Vec<String> {
    let lower = html.to_ascii_lowercase();
    let mut result = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = lower[cursor..].find("<p") {
        let start = cursor + offset;
        let after_name = start + 2;
        // <pre>, <param> 등은 건너뛴다
        match lower[after_name..].chars().next() {
            Some(c) if c == '>' || c.is_whitespace() => {}
            _ => {
                cursor = after_name;
                continue;
            }
        }
        let Some(open_end) = lower[after_name..].find('>') else {
            break;
        };
        let content_start = after_name + open_end + 1;
        let content_end = lower[content_start..]
            .find("</p")
            .map(|i| content_start + i)
            .unwrap_or(html.len());

        result.push(text_content(&html[content_start..content_end]));
        cursor = content_end;
    }
    result
}

// 태그 제거 및 기본 엔티티 복원
fn text_content(fragment: &str) -> String {
    let mut text = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for c in fragment.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
// endregion: --- Reply
