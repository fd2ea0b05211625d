/// 페이지 구성
/// 1. 구매 페이지 / 판매 페이지 컨트롤러 생성 및 연결
/// 2. 로그인 후 첫 페이지 결정 (마지막 동작 기준)
///
/// 페이지는 세 단계로 시작한다.
/// 생성 + init() → 구독 연결 → 첫 조회
/// 연결 전에 init()이 끝나므로 초기화 과정에서는 이벤트가 발행되지 않는다.
// region:    --- Imports
use crate::controllers::{
    AddArticle, AddAuction, ArticlesList, AuctionDetails, AuctionGroupsList, BidsList, Component,
    OpenAuctionsList, OwnerAuctionDetails, PageContext,
};
use crate::gateway::Gateway;
use crate::notify::{EventKind, Handler};
use crate::session::{Identity, PageKind, Session, ENTRY_PAGE};
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

// endregion: --- Imports

// 이벤트 종류별 구독 등록
fn subscribe(ctx: &PageContext, kinds: &[EventKind], handler: Arc<dyn Handler>) {
    for kind in kinds {
        ctx.hub.subscribe(*kind, Arc::clone(&handler));
    }
}

// region:    --- Buy Page
/// 구매 페이지
pub struct BuyPage {
    pub ctx: Arc<PageContext>,
    pub details: Arc<AuctionDetails>,
    pub articles: Arc<ArticlesList>,
    pub bids: Arc<BidsList>,
    pub open: Arc<OpenAuctionsList>,
    pub won: Arc<AuctionGroupsList>,
}

impl BuyPage {
    /// 1단계: 생성 및 초기화
    pub fn new(ctx: Arc<PageContext>) -> Self {
        let page = Self {
            details: Arc::new(AuctionDetails::new(Arc::clone(&ctx))),
            articles: Arc::new(ArticlesList::new(Arc::clone(&ctx))),
            bids: Arc::new(BidsList::new(Arc::clone(&ctx))),
            open: Arc::new(OpenAuctionsList::new(Arc::clone(&ctx))),
            won: Arc::new(AuctionGroupsList::won(Arc::clone(&ctx))),
            ctx,
        };
        for component in page.components() {
            component.init();
        }
        page
    }

    pub fn components(&self) -> Vec<&dyn Component> {
        vec![
            &*self.details,
            &*self.articles,
            &*self.bids,
            &*self.open,
            &*self.won,
        ]
    }

    /// 2단계: 구독 연결
    pub fn wire(&self) {
        subscribe(
            &self.ctx,
            &[EventKind::ShowAuction, EventKind::MinimumBidObserved],
            self.details.clone(),
        );
        subscribe(&self.ctx, &[EventKind::ShowAuction], self.articles.clone());
        subscribe(
            &self.ctx,
            &[EventKind::ShowAuction, EventKind::BidPlaced],
            self.bids.clone(),
        );
    }

    /// 3단계: 첫 조회
    pub async fn start(&self) {
        self.open.show(None).await;
        self.won.show(None).await;
    }

    pub async fn load(ctx: Arc<PageContext>) -> Self {
        let page = Self::new(ctx);
        page.wire();
        page.start().await;
        page
    }
}
// endregion: --- Buy Page

// region:    --- Sell Page
/// 판매 페이지
pub struct SellPage {
    pub ctx: Arc<PageContext>,
    pub details: Arc<OwnerAuctionDetails>,
    pub bids: Arc<BidsList>,
    pub not_closed: Arc<AuctionGroupsList>,
    pub closed: Arc<AuctionGroupsList>,
    pub add_article: Arc<AddArticle>,
    pub add_auction: Arc<AddAuction>,
}

impl SellPage {
    /// 1단계: 생성 및 초기화
    pub fn new(ctx: Arc<PageContext>) -> Self {
        let page = Self {
            details: Arc::new(OwnerAuctionDetails::new(Arc::clone(&ctx))),
            bids: Arc::new(BidsList::new(Arc::clone(&ctx))),
            not_closed: Arc::new(AuctionGroupsList::owned(Arc::clone(&ctx), false)),
            closed: Arc::new(AuctionGroupsList::owned(Arc::clone(&ctx), true)),
            add_article: Arc::new(AddArticle::new(Arc::clone(&ctx))),
            add_auction: Arc::new(AddAuction::new(Arc::clone(&ctx))),
            ctx,
        };
        for component in page.components() {
            component.init();
        }
        page
    }

    pub fn components(&self) -> Vec<&dyn Component> {
        vec![
            &*self.bids,
            &*self.details,
            &*self.add_article,
            &*self.add_auction,
            &*self.not_closed,
            &*self.closed,
        ]
    }

    /// 2단계: 구독 연결
    pub fn wire(&self) {
        subscribe(
            &self.ctx,
            &[EventKind::ShowAuction, EventKind::OwnerListReloaded],
            self.details.clone(),
        );
        subscribe(
            &self.ctx,
            &[EventKind::ShowAuction, EventKind::OwnerListReloaded],
            self.bids.clone(),
        );
        subscribe(
            &self.ctx,
            &[EventKind::AuctionClosed, EventKind::AuctionCreated],
            self.not_closed.clone(),
        );
        subscribe(&self.ctx, &[EventKind::AuctionClosed], self.closed.clone());
        subscribe(&self.ctx, &[EventKind::ArticleAdded], self.add_auction.clone());
    }

    /// 3단계: 첫 조회
    pub async fn start(&self) {
        self.not_closed.show(None).await;
        self.closed.show(None).await;
        self.add_auction.show(None).await;
    }

    pub async fn load(ctx: Arc<PageContext>) -> Self {
        let page = Self::new(ctx);
        page.wire();
        page.start().await;
        page
    }
}
// endregion: --- Sell Page

// region:    --- Page Orchestrator
#[derive(Clone)]
pub enum Page {
    Buy(Arc<BuyPage>),
    Sell(Arc<SellPage>),
}

impl Page {
    pub fn kind(&self) -> PageKind {
        match self {
            Page::Buy(_) => PageKind::Buy,
            Page::Sell(_) => PageKind::Sell,
        }
    }

    pub fn context(&self) -> &Arc<PageContext> {
        match self {
            Page::Buy(page) => &page.ctx,
            Page::Sell(page) => &page.ctx,
        }
    }
}

/// 홈 페이지 진입점
pub struct PageOrchestrator {
    gateway: Arc<Gateway>,
    session: Arc<Session>,
    current: Mutex<Option<Page>>,
}

impl PageOrchestrator {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        let session = gateway.session();
        Self {
            gateway,
            session,
            current: Mutex::new(None),
        }
    }

    pub fn current(&self) -> Option<Page> {
        self.slot().clone()
    }

    fn slot(&self) -> MutexGuard<'_, Option<Page>> {
        self.current.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// 홈 페이지 로드
    /// 로그인 정보가 없으면 진입 페이지로 이동한다.
    /// 마지막 동작이 30일 넘게 지났으면 영구 상태를 지운 뒤 마지막 동작에 따라 페이지를 연다.
    pub async fn init(&self) -> Option<Page> {
        let Some(identity) = self.session.identity() else {
            warn!("{:<12} --> 로그인 정보 없음", "Orchestrator");
            self.session.navigator().redirect(ENTRY_PAGE);
            return None;
        };
        info!("{:<12} --> 홈 페이지 로드: {}", "Orchestrator", identity);

        if let Err(e) = self.session.expire_stale_state(&identity, Utc::now()) {
            warn!("{:<12} --> 영구 상태 만료 처리 실패: {}", "Orchestrator", e);
        }

        let page = match self.session.resume_page(&identity) {
            PageKind::Buy => self.open_buy(identity).await,
            PageKind::Sell => self.open_sell(identity).await,
        };
        Some(page)
    }

    /// 구매 페이지로 전환
    pub async fn load_buy(&self) -> Option<Page> {
        let identity = self.require_identity()?;
        Some(self.open_buy(identity).await)
    }

    /// 판매 페이지로 전환
    pub async fn load_sell(&self) -> Option<Page> {
        let identity = self.require_identity()?;
        Some(self.open_sell(identity).await)
    }

    /// 네비게이션의 로그아웃
    pub fn logout(&self) {
        self.tear_down();
        if let Err(e) = self.session.logout() {
            warn!("{:<12} --> 세션 초기화 실패: {}", "Orchestrator", e);
        }
        self.session.navigator().redirect(ENTRY_PAGE);
    }

    fn require_identity(&self) -> Option<Identity> {
        let identity = self.session.identity();
        if identity.is_none() {
            self.session.navigator().redirect(ENTRY_PAGE);
        }
        identity
    }

    async fn open_buy(&self, identity: Identity) -> Page {
        self.tear_down();
        info!("{:<12} --> 구매 페이지 로드", "Orchestrator");
        let ctx = Arc::new(PageContext::new(Arc::clone(&self.gateway), identity));
        let page = Page::Buy(Arc::new(BuyPage::load(ctx).await));
        *self.slot() = Some(page.clone());
        page
    }

    async fn open_sell(&self, identity: Identity) -> Page {
        self.tear_down();
        info!("{:<12} --> 판매 페이지 로드", "Orchestrator");
        let ctx = Arc::new(PageContext::new(Arc::clone(&self.gateway), identity));
        let page = Page::Sell(Arc::new(SellPage::load(ctx).await));
        *self.slot() = Some(page.clone());
        page
    }

    // 이전 페이지의 구독 해제
    fn tear_down(&self) {
        if let Some(previous) = self.slot().take() {
            previous.context().hub.clear();
        }
    }
}
// endregion: --- Page Orchestrator
