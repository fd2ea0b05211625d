#![allow(dead_code)]
// region:    --- Imports
use async_trait::async_trait;
use auction_client::controllers::PageContext;
use auction_client::gateway::{Gateway, GatewayError, Request, Response, Transport};
use auction_client::model::{Article, Auction, AuctionId, Bid};
use auction_client::notify::{Handler, UiEvent};
use auction_client::session::{HistoryNavigator, Identity, Session};
use auction_client::storage::MemoryStorage;
use chrono::{DateTime, Duration, Local, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, Once};
// endregion: --- Imports

static TRACING: Once = Once::new();

/// 트레이싱 초기화 (테스트 바이너리마다 한 번)
pub fn init_tracing() {
    TRACING.call_once(|| {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .without_time()
            .with_target(false)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_global_default(subscriber).expect("트레이싱 구독자 설정 실패");
    });
}

// region:    --- Scripted Transport
struct Scripted {
    response: Response,
    delay: Option<std::time::Duration>,
}

/// 경로별로 미리 정한 응답을 돌려주는 전송 구현체
/// 큐에 응답이 하나만 남으면 그 응답을 계속 돌려준다.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<String, VecDeque<Scripted>>>,
    requests: Mutex<Vec<Request>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// 응답 등록 ("path" 또는 파라미터로 구분하는 "path?name=value")
    pub fn respond(&self, path: &str, status: u16, body: impl Into<String>) {
        self.push(path, Response::new(status, body), None);
    }

    pub fn respond_json<T: serde::Serialize>(&self, path: &str, value: &T) {
        let body = serde_json::to_string(value).expect("직렬화 실패");
        self.respond(path, 200, body);
    }

    pub fn respond_delayed(
        &self,
        path: &str,
        status: u16,
        body: impl Into<String>,
        delay: std::time::Duration,
    ) {
        self.push(path, Response::new(status, body), Some(delay));
    }

    fn push(&self, path: &str, response: Response, delay: Option<std::time::Duration>) {
        self.routes
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(Scripted { response, delay });
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .count()
    }

    pub fn last(&self, path: &str) -> Option<Request> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|r| r.path == path)
            .cloned()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &Request) -> Result<Response, GatewayError> {
        self.requests.lock().unwrap().push(request.clone());
        let next = {
            let mut routes = self.routes.lock().unwrap();
            // "path?name=value" 경로가 있으면 그것을 우선한다
            let key = request
                .params
                .iter()
                .map(|(name, value)| format!("{}?{}={}", request.path, name, value))
                .find(|key| routes.contains_key(key))
                .unwrap_or_else(|| request.path.clone());
            match routes.get_mut(&key) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().map(|s| Scripted {
                    response: s.response.clone(),
                    delay: s.delay,
                }),
                None => None,
            }
        };
        let Some(scripted) = next else {
            return Ok(Response::new(404, ""));
        };
        if let Some(delay) = scripted.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(scripted.response)
    }
}
// endregion: --- Scripted Transport

// region:    --- Recorder
/// 발행된 이벤트를 기록하는 구독자
#[derive(Default)]
pub struct Recorder {
    events: Mutex<Vec<UiEvent>>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<UiEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl Handler for Recorder {
    fn name(&self) -> &'static str {
        "Recorder"
    }

    async fn handle(&self, event: &UiEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
// endregion: --- Recorder

// region:    --- Harness
pub struct Harness {
    pub transport: Arc<ScriptedTransport>,
    pub navigator: Arc<HistoryNavigator>,
    pub session_storage: Arc<MemoryStorage>,
    pub durable_storage: Arc<MemoryStorage>,
    pub session: Arc<Session>,
    pub gateway: Arc<Gateway>,
}

impl Harness {
    pub fn new() -> Self {
        init_tracing();
        let transport = ScriptedTransport::new();
        let navigator = Arc::new(HistoryNavigator::new());
        let session_storage = Arc::new(MemoryStorage::new());
        let durable_storage = Arc::new(MemoryStorage::new());
        let session = Arc::new(Session::new(
            session_storage.clone(),
            durable_storage.clone(),
            navigator.clone(),
        ));
        let gateway = Arc::new(Gateway::new(transport.clone(), session.clone()));
        Self {
            transport,
            navigator,
            session_storage,
            durable_storage,
            session,
            gateway,
        }
    }

    /// 로그인된 상태의 하네스
    pub fn logged_in(username: &str) -> Self {
        let harness = Self::new();
        harness
            .session
            .login(username, Utc::now())
            .expect("로그인 기록 실패");
        harness
    }

    pub fn identity(&self) -> Identity {
        self.session.identity().expect("로그인 정보 없음")
    }

    pub fn context(&self) -> Arc<PageContext> {
        Arc::new(PageContext::new(self.gateway.clone(), self.identity()))
    }
}
// endregion: --- Harness

// region:    --- Fixtures
/// 열린 경매 (종료까지 hours 시간)
pub fn open_auction(id: AuctionId, hours: i64) -> Auction {
    let now = Utc::now();
    Auction {
        id,
        creator_user_id: 7,
        creator_user_username: "seller".to_string(),
        created_at: now - Duration::days(1),
        terminates_at: now + Duration::hours(hours),
        closed_by_user: false,
        minimum_bid_wedge: 5,
        winner_user_id: None,
        winner_user_username: None,
        winner_user_address: None,
        final_bid_amount: None,
        max_bid: None,
        article_list: Vec::new(),
    }
}

/// 종료되었지만 아직 마감하지 않은 경매
pub fn terminated_auction(id: AuctionId) -> Auction {
    open_auction(id, -2)
}

/// 마감된 경매
pub fn closed_auction(id: AuctionId) -> Auction {
    Auction {
        closed_by_user: true,
        winner_user_id: Some(3),
        winner_user_username: Some("bob".to_string()),
        winner_user_address: Some("Via Roma 1".to_string()),
        final_bid_amount: Some(120.0),
        ..open_auction(id, -2)
    }
}

pub fn article(id: i64, auction_id: AuctionId, name: &str, price: f64) -> Article {
    Article {
        id,
        owner_user_id: 7,
        base_price: price,
        auction_id,
        name: name.to_string(),
        description: format!("{} description", name),
        image_base64: String::new(),
    }
}

pub fn bid(id: i64, auction_id: AuctionId, amount: f64) -> Bid {
    Bid {
        id,
        placed_at: Utc::now() - Duration::minutes(id),
        bidder_user_id: 3,
        bidder_user_username: "bob".to_string(),
        auction_id,
        amount,
    }
}

/// 서비스가 보내는 Gson 기본 시각 형식 (서버 현지 시각)
pub fn gson_time(at: DateTime<Local>) -> String {
    at.format("%b %-d, %Y, %-I:%M:%S %p").to_string()
}

/// 오류 페이지 (두 번째 문단에 메시지)
pub fn error_page(message: &str) -> String {
    format!(
        "<html><body><h1>HTTP Status 400 - Bad Request</h1>\
         <p><b>Type</b> Status Report</p>\
         <p><b>Message</b> {}</p></body></html>",
        message
    )
}
// endregion: --- Fixtures
