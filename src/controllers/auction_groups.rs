/// 상품이 묶인 경매 목록
/// 1. 낙찰 받은 경매 (구매 페이지)
/// 2. 판매자의 열린 경매 / 닫힌 경매 (판매 페이지)
/// 경매 하나에 상품이 여러 개면 경매 셀을 rowspan으로 묶어 한 번만 표시한다.
// region:    --- Imports
use super::{parse_list, Component, PageContext, Trigger};
use crate::gateway::{Reply, Request};
use crate::model::{Auction, AuctionId};
use crate::notify::{Handler, UiEvent};
use crate::view::format::{amount_text, countdown_from_login, date_time, euro};
use crate::view::{row_group, Cell, ListView, Row};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

// endregion: --- Imports

const SERVER_ERROR_TITLE: &str = "Server error: no auctions to display";
// 행 그룹에서 상품이 차지하는 칸 수
const ARTICLE_WIDTH: usize = 3;

/// 목록 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Won,
    Owner { closed: bool },
}

impl GroupKind {
    fn default_title(&self) -> &'static str {
        match self {
            GroupKind::Won => "Auctions you won",
            GroupKind::Owner { closed: true } => "Closed auctions list",
            GroupKind::Owner { closed: false } => "Not closed auctions list",
        }
    }

    fn empty_title(&self) -> &'static str {
        match self {
            GroupKind::Won => "You did not win any auction (yet!)",
            GroupKind::Owner { closed: true } => "You don't have any closed auction",
            GroupKind::Owner { closed: false } => "You don't have any not closed auction",
        }
    }

    fn request(&self) -> Request {
        match self {
            GroupKind::Won => Request::get("wonAuctionsWithArticles"),
            GroupKind::Owner { closed } => {
                Request::get("auctionsForOwner").param("openVsClosed", closed)
            }
        }
    }
}

#[derive(Default)]
struct GroupsState {
    // 마지막으로 그린 경매 id (refresh 시 캐시에서 다시 읽는다)
    ids: Vec<AuctionId>,
    view: ListView,
}

pub struct AuctionGroupsList {
    ctx: Arc<PageContext>,
    kind: GroupKind,
    state: Mutex<GroupsState>,
}

impl AuctionGroupsList {
    pub fn won(ctx: Arc<PageContext>) -> Self {
        Self::new(ctx, GroupKind::Won)
    }

    pub fn owned(ctx: Arc<PageContext>, closed: bool) -> Self {
        Self::new(ctx, GroupKind::Owner { closed })
    }

    pub fn new(ctx: Arc<PageContext>, kind: GroupKind) -> Self {
        Self {
            ctx,
            kind,
            state: Mutex::new(GroupsState::default()),
        }
    }

    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    pub fn view(&self) -> ListView {
        self.state().view.clone()
    }

    fn state(&self) -> MutexGuard<'_, GroupsState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn render(&self, auctions: &[Auction]) -> Vec<Row> {
        let now = self.ctx.now();
        let login_at = self.ctx.login_timestamp();
        auctions
            .iter()
            .flat_map(|auction| match self.kind {
                GroupKind::Won => Self::won_group(auction),
                GroupKind::Owner { closed } => {
                    Self::owner_group(auction, closed, auction.is_terminated(now), login_at)
                }
            })
            .collect()
    }

    fn won_group(auction: &Auction) -> Vec<Row> {
        let auction_cells = vec![
            Cell::text(auction.id.to_string()),
            Cell::text(date_time(auction.terminates_at)),
            Cell::text(&auction.creator_user_username),
            Cell::text(amount_text(auction.max_bid.unwrap_or_default())),
        ];
        let article_cells = auction
            .article_list
            .iter()
            .map(|article| {
                vec![
                    Cell::text(&article.name),
                    Cell::text(&article.description),
                    Cell::article_image(article),
                ]
            })
            .collect();
        row_group(
            auction_cells,
            article_cells,
            ARTICLE_WIDTH,
            vec![Cell::details_link(auction.id)],
        )
    }

    fn owner_group(
        auction: &Auction,
        closed_list: bool,
        terminated: bool,
        login_at: chrono::DateTime<chrono::Utc>,
    ) -> Vec<Row> {
        let mut auction_cells = vec![
            Cell::text(auction.id.to_string()),
            Cell::text(if terminated {
                date_time(auction.terminates_at)
            } else {
                countdown_from_login(auction.terminates_at, login_at)
            }),
        ];
        if !closed_list {
            auction_cells.push(Cell::text(if terminated { "Yes" } else { "No" }));
        }
        let highest = auction.highest_bid();
        auction_cells.push(Cell::text(if highest > 0.0 {
            euro(highest)
        } else {
            "no bids".to_string()
        }));

        let article_cells = auction
            .article_list
            .iter()
            .map(|article| {
                vec![
                    Cell::text(article.id.to_string()),
                    Cell::text(&article.name),
                    Cell::article_image(article),
                ]
            })
            .collect();
        row_group(
            auction_cells,
            article_cells,
            ARTICLE_WIDTH,
            vec![Cell::details_link(auction.id)],
        )
    }
}

#[async_trait]
impl Component for AuctionGroupsList {
    fn name(&self) -> &'static str {
        match self.kind {
            GroupKind::Won => "WonAuctions",
            GroupKind::Owner { .. } => "OwnerAuctions",
        }
    }

    fn reset(&self) {
        self.state().view.reset();
    }

    /// 목록 조회 후 캐시 저장 및 행 그룹 렌더링
    async fn show(&self, _trigger: Option<Trigger>) {
        self.state().view.loading();
        info!("{:<12} --> 경매 목록 조회: {:?}", "GroupList", self.kind);
        let reply = self.ctx.gateway.exchange(self.kind.request()).await;

        let auctions = match reply {
            Reply::Success(body) => parse_list::<Auction>("GroupList", &body),
            Reply::Rejected(_) | Reply::Failed => None,
            Reply::LoggedOut => return,
        };

        let first_link = {
            let mut state = self.state();
            match auctions {
                Some(auctions) if !auctions.is_empty() => {
                    self.ctx.cache_auctions(&auctions);
                    state.ids = auctions.iter().map(|a| a.id).collect();
                    state
                        .view
                        .shown(self.kind.default_title(), self.render(&auctions));
                    state.view.table.first_details_link()
                }
                Some(_) => {
                    state.ids.clear();
                    state.view.empty(self.kind.empty_title());
                    None
                }
                None => {
                    state.ids.clear();
                    state.view.empty(SERVER_ERROR_TITLE);
                    None
                }
            }
        };

        let Some(first) = first_link else {
            return;
        };
        // 캐시가 갱신된 뒤에 상세/입찰 목록을 다시 그린다
        if let GroupKind::Owner { .. } = self.kind {
            self.ctx.hub.publish(UiEvent::OwnerListReloaded).await;
        }
        if self.ctx.auto_open.claim() {
            self.ctx.hub.publish(UiEvent::ShowAuction(first)).await;
        }
    }

    /// 마지막으로 그린 경매들을 캐시에서 다시 그린다
    async fn refresh(&self) {
        let mut state = self.state();
        if state.ids.is_empty() {
            state.view.reset();
            return;
        }
        let auctions: Vec<Auction> = state
            .ids
            .iter()
            .filter_map(|id| self.ctx.cached_auction(*id))
            .collect();
        if auctions.len() != state.ids.len() {
            warn!(
                "{:<12} --> 캐시에서 {}건 중 {}건만 찾음",
                "GroupList",
                state.ids.len(),
                auctions.len()
            );
        }
        let rows = self.render(&auctions);
        state.view.shown(self.kind.default_title(), rows);
    }
}

#[async_trait]
impl Handler for AuctionGroupsList {
    fn name(&self) -> &'static str {
        "AuctionGroupsList"
    }

    async fn handle(&self, event: &UiEvent) {
        match event {
            UiEvent::AuctionClosed(_) | UiEvent::AuctionCreated => self.show(None).await,
            _ => {}
        }
    }
}
