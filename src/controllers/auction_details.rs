/// 경매 상세 + 입찰 (구매 페이지)
/// 1. 캐시에서 경매 상세 표시 (네트워크 요청 없음)
/// 2. 입찰 폼 처리
/// 3. 최소 입찰가 추적
// region:    --- Imports
use super::{Component, PageContext, Trigger};
use crate::forms::{FormError, PlaceBidForm};
use crate::gateway::{Reply, Request};
use crate::model::{Auction, AuctionId};
use crate::notify::{AmountSource, Handler, UiEvent};
use crate::session::UserAction;
use crate::view::DetailsView;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- View
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BidPanelView {
    pub visible: bool,
    pub message: String,
    // 입찰 입력의 min 속성
    pub minimum: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuctionDetailsView {
    pub details: DetailsView,
    pub place_bid: BidPanelView,
}
// endregion: --- View

#[derive(Default)]
struct DetailsState {
    auction_id: Option<AuctionId>,
    auction: Option<Auction>,
    view: AuctionDetailsView,
}

pub struct AuctionDetails {
    ctx: Arc<PageContext>,
    state: Mutex<DetailsState>,
}

impl AuctionDetails {
    pub fn new(ctx: Arc<PageContext>) -> Self {
        Self {
            ctx,
            state: Mutex::new(DetailsState::default()),
        }
    }

    pub fn view(&self) -> AuctionDetailsView {
        self.state().view.clone()
    }

    pub fn auction_id(&self) -> Option<AuctionId> {
        self.state().auction_id
    }

    /// 현재 최소 입찰가
    pub fn minimum_bid(&self) -> f64 {
        self.state().view.place_bid.minimum
    }

    fn state(&self) -> MutexGuard<'_, DetailsState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    // 상세 화면 갱신
    // 종료되지 않은 경매는 최근 본 경매 목록에 추가한다.
    fn update(&self, state: &mut DetailsState, auction: Auction) {
        let terminated = auction.is_terminated(self.ctx.now());
        if !terminated {
            if let Err(e) = self.ctx.recent.visit(auction.id) {
                warn!("{:<12} --> 최근 본 경매 기록 실패: {}", "Details", e);
            }
        }

        state.view.details = DetailsView::render(&auction, terminated);
        state.view.place_bid.visible = !terminated;
        state.auction = Some(auction);
    }

    /// 최소 입찰가 갱신
    /// 최고 입찰가에서 온 값에는 경매의 입찰 단위를 더한 뒤 현재 값과 비교한다.
    /// 더 큰 쪽을 남기므로 값은 줄어들지 않는다.
    pub fn update_minimum(&self, amount: f64, source: AmountSource) {
        let mut state = self.state();
        let Some(wedge) = state.auction.as_ref().map(|a| a.minimum_bid_wedge) else {
            return;
        };
        let candidate = match source {
            AmountSource::HighestBid => amount + wedge as f64,
            AmountSource::ArticlePrices => amount,
        };
        let panel = &mut state.view.place_bid;
        if candidate > panel.minimum {
            panel.minimum = candidate;
            info!(
                "{:<12} --> 최소 입찰가 갱신: {}",
                "Details", panel.minimum
            );
        }
    }

    /// 입찰 폼 제출
    pub async fn place_bid(&self, form: PlaceBidForm) -> Result<(), FormError> {
        self.ctx.record_action(UserAction::PlaceBid);

        let (auction_id, amount) = {
            let mut state = self.state();
            // 표시 중인 경매가 있을 때만 입찰한다
            let Some(auction_id) = state.auction.as_ref().map(|a| a.id) else {
                warn!("{:<12} --> 선택된 경매 없이 입찰 요청", "Details");
                return Ok(());
            };
            match form.validate(state.view.place_bid.minimum) {
                Ok(amount) => (auction_id, amount),
                Err(e) => {
                    state.view.place_bid.message = e.to_string();
                    return Err(e);
                }
            }
        };

        info!(
            "{:<12} --> 입찰 요청: auction={} amount={}",
            "Details", auction_id, amount
        );
        let reply = self
            .ctx
            .gateway
            .exchange(
                Request::post("placeBid")
                    .param("auction", auction_id)
                    .param("bid", form.bid.trim()),
            )
            .await;

        let refresh_bids = {
            let mut state = self.state();
            match reply {
                Reply::Success(_) => {
                    state.view.place_bid.message = "Bid placed".to_string();
                    true
                }
                // 다른 사용자가 먼저 입찰했을 수 있으므로 입찰 목록은 다시 읽는다
                Reply::Rejected(message) => {
                    state.view.place_bid.message = format!("Bid not placed: {}", message);
                    true
                }
                Reply::Failed => {
                    state.view.place_bid.message = "Server error, bid not placed".to_string();
                    false
                }
                Reply::LoggedOut => false,
            }
        };

        if refresh_bids {
            self.ctx.hub.publish(UiEvent::BidPlaced(auction_id)).await;
        }
        Ok(())
    }
}

#[async_trait]
impl Component for AuctionDetails {
    fn name(&self) -> &'static str {
        "AuctionDetails"
    }

    fn reset(&self) {
        let mut state = self.state();
        state.view.details.visible = false;
        state.view.place_bid.visible = false;
    }

    /// 목록에서 선택한 경매를 캐시에서 읽어 표시
    async fn show(&self, trigger: Option<Trigger>) {
        let Some(Trigger::Row(id)) = trigger else {
            self.reset();
            return;
        };

        let mut state = self.state();
        state.auction_id = Some(id);
        // 새 경매를 열면 최소 입찰가 추적을 다시 시작한다
        state.view.place_bid.minimum = 0.0;
        state.view.place_bid.message.clear();
        match self.ctx.cached_auction(id) {
            Some(auction) => self.update(&mut state, auction),
            None => {
                warn!("{:<12} --> 캐시에 없는 경매: {}", "Details", id);
                state.auction = None;
                state.view.details.visible = false;
                state.view.place_bid.visible = false;
            }
        }
    }

    /// 캐시에서 다시 그리기, 선택된 경매가 없으면 초기화
    async fn refresh(&self) {
        let mut state = self.state();
        if let Some(auction) = state.auction_id.and_then(|id| self.ctx.cached_auction(id)) {
            self.update(&mut state, auction);
            return;
        }
        state.view.details.visible = false;
        state.view.place_bid.visible = false;
    }
}

#[async_trait]
impl Handler for AuctionDetails {
    fn name(&self) -> &'static str {
        "AuctionDetails"
    }

    async fn handle(&self, event: &UiEvent) {
        match event {
            UiEvent::ShowAuction(id) => self.show(Some(Trigger::Row(*id))).await,
            UiEvent::MinimumBidObserved { amount, source } => {
                self.update_minimum(*amount, *source)
            }
            _ => {}
        }
    }
}
