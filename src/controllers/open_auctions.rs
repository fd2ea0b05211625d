/// 공개 경매 목록 (구매 페이지)
/// 1. 검색어로 열린 경매 검색
/// 2. 검색 전에는 최근 본 경매 표시
// region:    --- Imports
use super::{parse_list, Component, PageContext, Trigger};
use crate::forms::SearchForm;
use crate::gateway::{Reply, Request};
use crate::model::{Auction, AuctionId};
use crate::notify::UiEvent;
use crate::session::UserAction;
use crate::view::format::{countdown_from_login, euro};
use crate::view::{Cell, ListView, Row};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

// endregion: --- Imports

const ALL_AUCTIONS_TITLE: &str = "Showing all auctions";
const MATCHING_TITLE: &str = "Showing auctions matching your query";
const RECENT_TITLE: &str = "Showing auctions you recently viewed";
const NO_MATCH_TITLE: &str = "No auction matches your query";
const NO_RECENT_TITLE: &str = "You did not view any auction recently";
const SERVER_ERROR_TITLE: &str = "No auction to show, server error";

/// 목록이 보여주는 내용
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OpenListMode {
    #[default]
    RecentlyViewed,
    // 빈 검색어는 전체 경매 조회
    Search { query: String },
}

impl OpenListMode {
    fn shown_title(&self) -> &'static str {
        match self {
            OpenListMode::RecentlyViewed => RECENT_TITLE,
            OpenListMode::Search { query } if query.is_empty() => ALL_AUCTIONS_TITLE,
            OpenListMode::Search { .. } => MATCHING_TITLE,
        }
    }

    fn empty_title(&self) -> &'static str {
        match self {
            OpenListMode::RecentlyViewed => NO_RECENT_TITLE,
            OpenListMode::Search { query } if query.is_empty() => ALL_AUCTIONS_TITLE,
            OpenListMode::Search { .. } => NO_MATCH_TITLE,
        }
    }
}

#[derive(Default)]
struct OpenState {
    mode: OpenListMode,
    ids: Vec<AuctionId>,
    view: ListView,
}

pub struct OpenAuctionsList {
    ctx: Arc<PageContext>,
    state: Mutex<OpenState>,
}

impl OpenAuctionsList {
    pub fn new(ctx: Arc<PageContext>) -> Self {
        Self {
            ctx,
            state: Mutex::new(OpenState::default()),
        }
    }

    pub fn view(&self) -> ListView {
        self.state().view.clone()
    }

    pub fn mode(&self) -> OpenListMode {
        self.state().mode.clone()
    }

    fn state(&self) -> MutexGuard<'_, OpenState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// 검색 폼 제출
    pub async fn search(&self, form: SearchForm) {
        self.show(Some(Trigger::Search(form.q))).await;
    }

    fn render(&self, auctions: &[Auction]) -> Vec<Row> {
        let login_at = self.ctx.login_timestamp();
        auctions
            .iter()
            .map(|auction| {
                Row::new(vec![
                    Cell::text(auction.id.to_string()),
                    Cell::text(countdown_from_login(auction.terminates_at, login_at)),
                    Cell::text(euro(auction.minimum_bid_wedge as f64)),
                    Cell::text(&auction.creator_user_username),
                    Cell::details_link(auction.id),
                ])
            })
            .collect()
    }

    // 요청 준비: 검색이면 마지막 동작을 남기고, 최근 본 경매면 저장된 id로 요청한다
    fn request_for(&self, mode: &OpenListMode) -> Option<Request> {
        match mode {
            OpenListMode::Search { query } => {
                self.ctx.record_action(UserAction::SearchAuction);
                Some(Request::get("openAuctionsWithSearch").param("q", query))
            }
            OpenListMode::RecentlyViewed => {
                let ids = self.ctx.recent.ids().unwrap_or_else(|e| {
                    warn!("{:<12} --> 최근 본 경매 읽기 실패: {}", "OpenList", e);
                    Vec::new()
                });
                if ids.is_empty() {
                    return None;
                }
                Some(
                    ids.iter()
                        .fold(Request::get("auctionsFromIds"), |req, id| req.param("id", id)),
                )
            }
        }
    }

    // 최근 본 목록을 서버 결과에 맞춘다 (빈 결과면 전체 삭제)
    fn sync_recent(&self, returned: &[AuctionId]) {
        let result = if returned.is_empty() {
            self.ctx.recent.clear()
        } else {
            self.ctx.recent.retain(returned)
        };
        if let Err(e) = result {
            warn!("{:<12} --> 최근 본 경매 갱신 실패: {}", "OpenList", e);
        }
    }
}

#[async_trait]
impl Component for OpenAuctionsList {
    fn name(&self) -> &'static str {
        "OpenAuctionsList"
    }

    fn reset(&self) {
        self.state().view.reset();
    }

    /// 검색 트리거가 있으면 검색, 없으면 최근 본 경매 조회
    async fn show(&self, trigger: Option<Trigger>) {
        let mode = match trigger {
            Some(Trigger::Search(query)) => OpenListMode::Search {
                query: query.trim().to_string(),
            },
            _ => OpenListMode::RecentlyViewed,
        };

        let request = {
            let mut state = self.state();
            state.mode = mode.clone();
            state.view.loading();
            self.request_for(&mode)
        };
        let Some(request) = request else {
            info!("{:<12} --> 최근 본 경매 없음", "OpenList");
            let mut state = self.state();
            state.ids.clear();
            state.view.empty(NO_RECENT_TITLE);
            return;
        };

        info!("{:<12} --> 경매 목록 조회: {:?}", "OpenList", mode);
        let reply = self.ctx.gateway.exchange(request).await;

        let auctions = match reply {
            Reply::Success(body) => parse_list::<Auction>("OpenList", &body),
            Reply::Rejected(message) => {
                let mut state = self.state();
                state.ids.clear();
                state.view.empty(message);
                return;
            }
            Reply::Failed => None,
            Reply::LoggedOut => return,
        };
        let Some(auctions) = auctions else {
            let mut state = self.state();
            state.ids.clear();
            state.view.empty(SERVER_ERROR_TITLE);
            return;
        };

        let recent_mode = mode == OpenListMode::RecentlyViewed;
        let returned: Vec<AuctionId> = auctions.iter().map(|a| a.id).collect();
        if recent_mode {
            self.sync_recent(&returned);
        }

        let first_link = {
            let mut state = self.state();
            state.ids = returned;
            if auctions.is_empty() {
                state.view.empty(mode.empty_title());
                None
            } else {
                self.ctx.cache_auctions(&auctions);
                let rows = self.render(&auctions);
                state.view.shown(mode.shown_title(), rows);
                state.view.table.first_details_link()
            }
        };

        if let Some(first) = first_link.filter(|_| recent_mode) {
            if self.ctx.auto_open.claim() {
                self.ctx.hub.publish(UiEvent::ShowAuction(first)).await;
            }
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
        let rows = self.render(&auctions);
        let title = state.mode.shown_title();
        state.view.shown(title, rows);
    }
}
