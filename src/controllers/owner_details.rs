/// 경매 상세 + 마감 (판매 페이지)
// region:    --- Imports
use super::{Component, PageContext, Trigger};
use crate::gateway::{Reply, Request};
use crate::model::{Auction, AuctionId};
use crate::notify::{Handler, UiEvent};
use crate::session::UserAction;
use crate::view::DetailsView;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

// endregion: --- Imports

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OwnerDetailsView {
    pub details: DetailsView,
    // 종료되었지만 아직 마감하지 않은 경매만 표시
    pub close_visible: bool,
    pub close_message: String,
}

#[derive(Default)]
struct OwnerState {
    auction_id: Option<AuctionId>,
    auction: Option<Auction>,
    view: OwnerDetailsView,
}

pub struct OwnerAuctionDetails {
    ctx: Arc<PageContext>,
    state: Mutex<OwnerState>,
}

impl OwnerAuctionDetails {
    pub fn new(ctx: Arc<PageContext>) -> Self {
        Self {
            ctx,
            state: Mutex::new(OwnerState::default()),
        }
    }

    pub fn view(&self) -> OwnerDetailsView {
        self.state().view.clone()
    }

    pub fn auction_id(&self) -> Option<AuctionId> {
        self.state().auction_id
    }

    fn state(&self) -> MutexGuard<'_, OwnerState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn update(&self, state: &mut OwnerState, auction: Auction) {
        let terminated = auction.is_terminated(self.ctx.now());
        state.view.details = DetailsView::render(&auction, terminated);
        state.view.close_visible = terminated && !auction.closed_by_user;
        state.auction = Some(auction);
    }

    fn hide(state: &mut OwnerState) {
        state.view.details.visible = false;
        state.view.close_visible = false;
    }

    /// 경매 마감 폼 제출
    /// 성공하면 열린 구획에서 경매를 지우고 판매자 목록들이 다시 조회하도록 알린다.
    pub async fn close_auction(&self) {
        self.ctx.record_action(UserAction::CloseAuction);

        let displayed = self.state().auction.as_ref().map(|a| a.id);
        let Some(auction_id) = displayed else {
            warn!("{:<12} --> 선택된 경매 없이 마감 요청", "OwnerDetail");
            return;
        };

        info!("{:<12} --> 경매 마감 요청: {}", "OwnerDetail", auction_id);
        let reply = self
            .ctx
            .gateway
            .exchange(Request::post("closeAuction").param("auction", auction_id))
            .await;

        match reply {
            Reply::Success(_) => {
                self.state().view.close_message = "Auction closed".to_string();
                if let Err(e) = self.ctx.cache.evict_open(auction_id) {
                    warn!("{:<12} --> 열린 경매 캐시 삭제 실패: {}", "OwnerDetail", e);
                }
                self.ctx.hub.publish(UiEvent::AuctionClosed(auction_id)).await;
                self.show_closed(auction_id);
            }
            Reply::Rejected(message) => {
                self.state().view.close_message =
                    format!("Error while closing auction: {}", message);
            }
            Reply::Failed => {
                self.state().view.close_message =
                    "Server error while closing auction".to_string();
            }
            Reply::LoggedOut => {}
        }
    }

    // 마감 후 화면: 목록이 다시 저장한 스냅샷이 있으면 그것을, 없으면 기존 스냅샷을 닫힌 상태로 표시
    fn show_closed(&self, auction_id: AuctionId) {
        let mut state = self.state();
        if state.auction_id != Some(auction_id) {
            return;
        }
        let snapshot = self.ctx.cached_auction(auction_id).or_else(|| {
            state.auction.clone().map(|mut auction| {
                auction.closed_by_user = true;
                auction
            })
        });
        if let Some(auction) = snapshot {
            self.update(&mut state, auction);
        }
    }
}

#[async_trait]
impl Component for OwnerAuctionDetails {
    fn name(&self) -> &'static str {
        "OwnerAuctionDetails"
    }

    fn reset(&self) {
        Self::hide(&mut self.state());
    }

    async fn show(&self, trigger: Option<Trigger>) {
        let Some(Trigger::Row(id)) = trigger else {
            self.reset();
            return;
        };

        let mut state = self.state();
        state.auction_id = Some(id);
        state.view.close_message.clear();
        match self.ctx.cached_auction(id) {
            Some(auction) => self.update(&mut state, auction),
            None => {
                warn!("{:<12} --> 캐시에 없는 경매: {}", "OwnerDetail", id);
                state.auction = None;
                Self::hide(&mut state);
            }
        }
    }

    /// 캐시에서 다시 그리기 (네트워크 요청 없음)
    async fn refresh(&self) {
        let mut state = self.state();
        match state.auction_id.and_then(|id| self.ctx.cached_auction(id)) {
            Some(auction) => self.update(&mut state, auction),
            None => Self::hide(&mut state),
        }
    }
}

#[async_trait]
impl Handler for OwnerAuctionDetails {
    fn name(&self) -> &'static str {
        "OwnerAuctionDetails"
    }

    async fn handle(&self, event: &UiEvent) {
        match event {
            UiEvent::ShowAuction(id) => self.show(Some(Trigger::Row(*id))).await,
            UiEvent::OwnerListReloaded => self.refresh().await,
            _ => {}
        }
    }
}
