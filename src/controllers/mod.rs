/// 화면 컨트롤러
/// 1. 목록 컨트롤러 (공개 경매, 낙찰/판매자 경매, 상품, 입찰)
/// 2. 상세/변경 컨트롤러 (입찰, 마감, 상품 등록, 경매 생성)
/// 3. 로그인
// region:    --- Imports
use crate::cache::{EntityCache, RecentlyViewed};
use crate::gateway::Gateway;
use crate::model::{Auction, AuctionId};
use crate::notify::NotificationHub;
use crate::session::{Identity, Session, UserAction};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::warn;

pub mod add_article;
pub mod add_auction;
pub mod articles;
pub mod auction_details;
pub mod auction_groups;
pub mod bids;
pub mod login;
pub mod open_auctions;
pub mod owner_details;

pub use add_article::AddArticle;
pub use add_auction::AddAuction;
pub use articles::ArticlesList;
pub use auction_details::AuctionDetails;
pub use auction_groups::{AuctionGroupsList, GroupKind};
pub use bids::BidsList;
pub use login::Login;
pub use open_auctions::OpenAuctionsList;
pub use owner_details::OwnerAuctionDetails;

// endregion: --- Imports

// region:    --- Component Trait
/// show()를 일으킨 사용자 입력
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    // 검색 폼 제출
    Search(String),
    // 목록 행의 경매 선택
    Row(AuctionId),
}

/// 컨트롤러 공통 인터페이스
/// init()/reset()은 동기적으로 화면만 초기화하고 이벤트를 발행하지 않는다.
#[async_trait]
pub trait Component: Send + Sync {
    fn name(&self) -> &'static str;
    fn init(&self) {
        self.reset();
    }
    fn reset(&self);
    async fn show(&self, trigger: Option<Trigger>);
    async fn refresh(&self);
}
// endregion: --- Component Trait

// region:    --- Page Context
/// 페이지 로드마다 한 번만 첫 행을 자동으로 여는 플래그
#[derive(Default)]
pub struct AutoOpen {
    done: AtomicBool,
}

impl AutoOpen {
    pub fn new() -> Self {
        Self::default()
    }

    /// 아직 자동으로 연 적이 없으면 true
    pub fn claim(&self) -> bool {
        self.done
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}

/// 한 페이지의 컨트롤러들이 공유하는 상태
pub struct PageContext {
    pub gateway: Arc<Gateway>,
    pub session: Arc<Session>,
    pub identity: Identity,
    pub hub: Arc<NotificationHub>,
    pub cache: Arc<EntityCache>,
    pub recent: Arc<RecentlyViewed>,
    pub auto_open: AutoOpen,
}

impl PageContext {
    pub fn new(gateway: Arc<Gateway>, identity: Identity) -> Self {
        let session = gateway.session();
        let cache = EntityCache::new(session.session_storage(), identity.clone());
        let recent = RecentlyViewed::new(session.durable_storage(), &identity);
        Self {
            gateway,
            session,
            identity,
            hub: Arc::new(NotificationHub::new()),
            cache: Arc::new(cache),
            recent: Arc::new(recent),
            auto_open: AutoOpen::new(),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    /// 마지막 동작 기록 (실패해도 동작은 계속한다)
    pub fn record_action(&self, action: UserAction) {
        if let Err(e) = self
            .session
            .record_action(&self.identity, action, self.now())
        {
            warn!("{:<12} --> 마지막 동작 기록 실패: {}", "Controller", e);
        }
    }

    /// 캐시에서 경매 조회 (손상된 항목은 없는 것으로 본다)
    pub fn cached_auction(&self, id: AuctionId) -> Option<Auction> {
        match self.cache.get(id) {
            Ok(auction) => auction,
            Err(e) => {
                warn!("{:<12} --> 캐시 항목 손상: {}", "Controller", e);
                None
            }
        }
    }

    /// 목록을 캐시에 저장
    pub fn cache_auctions(&self, auctions: &[Auction]) {
        if let Err(e) = self.cache.put(auctions) {
            warn!("{:<12} --> 캐시 저장 실패: {}", "Controller", e);
        }
    }

    /// 로그인 시각 (없으면 현재 시각)
    pub fn login_timestamp(&self) -> DateTime<Utc> {
        self.session
            .login_timestamp()
            .unwrap_or_else(|| self.now())
    }
}

/// JSON 목록 응답 파싱
pub(crate) fn parse_list<T: DeserializeOwned>(source: &str, body: &str) -> Option<Vec<T>> {
    match serde_json::from_str(body) {
        Ok(items) => Some(items),
        Err(e) => {
            warn!("{:<12} --> 응답 파싱 실패: {}", source, e);
            None
        }
    }
}
// endregion: --- Page Context
