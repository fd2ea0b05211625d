/// 입찰 목록
// region:    --- Imports
use super::{parse_list, Component, PageContext, Trigger};
use crate::gateway::{Reply, Request};
use crate::model::{AuctionId, Bid};
use crate::notify::{AmountSource, Handler, UiEvent};
use crate::view::format::{amount_text, date_time};
use crate::view::{Cell, ListView, Row};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tracing::info;

// endregion: --- Imports

const DEFAULT_TITLE: &str = "Bids list";
const NO_BIDS_TITLE: &str = "No bids for this auction";
const SERVER_ERROR_TITLE: &str = "Server error, no bids to show";

#[derive(Default)]
struct BidsState {
    auction_id: Option<AuctionId>,
    view: ListView,
}

pub struct BidsList {
    ctx: Arc<PageContext>,
    state: Mutex<BidsState>,
}

impl BidsList {
    pub fn new(ctx: Arc<PageContext>) -> Self {
        Self {
            ctx,
            state: Mutex::new(BidsState::default()),
        }
    }

    pub fn view(&self) -> ListView {
        self.state().view.clone()
    }

    pub fn auction_id(&self) -> Option<AuctionId> {
        self.state().auction_id
    }

    fn state(&self) -> std::sync::MutexGuard<'_, BidsState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn render(bids: &[Bid]) -> (Vec<Row>, f64) {
        let mut max_bid = 0.0_f64;
        let rows = bids
            .iter()
            .map(|bid| {
                max_bid = max_bid.max(bid.amount);
                Row::new(vec![
                    Cell::text(date_time(bid.placed_at)),
                    Cell::text(&bid.bidder_user_username),
                    Cell::text(amount_text(bid.amount)),
                ])
            })
            .collect();
        (rows, max_bid)
    }
}

#[async_trait]
impl Component for BidsList {
    fn name(&self) -> &'static str {
        "BidsList"
    }

    fn reset(&self) {
        self.state().view.reset();
    }

    /// 입찰 목록 조회
    async fn show(&self, trigger: Option<Trigger>) {
        let auction_id = {
            let mut state = self.state();
            if let Some(Trigger::Row(id)) = trigger {
                state.auction_id = Some(id);
            }
            let Some(id) = state.auction_id else {
                state.view.reset();
                return;
            };
            state.view.loading();
            id
        };

        info!("{:<12} --> 입찰 목록 조회: {}", "BidsList", auction_id);
        let reply = self
            .ctx
            .gateway
            .exchange(Request::get("bidsByAuctionId").param("auction", auction_id))
            .await;

        let max_bid = {
            let mut state = self.state();
            match reply {
                Reply::Success(body) => match parse_list::<Bid>("BidsList", &body) {
                    Some(bids) if !bids.is_empty() => {
                        let (rows, max_bid) = Self::render(&bids);
                        state.view.shown(DEFAULT_TITLE, rows);
                        Some(max_bid)
                    }
                    Some(_) => {
                        state.view.empty(NO_BIDS_TITLE);
                        None
                    }
                    None => {
                        state.view.empty(SERVER_ERROR_TITLE);
                        None
                    }
                },
                Reply::Rejected(message) => {
                    state.view.empty(format!("No bids to show: {}", message));
                    None
                }
                Reply::Failed => {
                    state.view.empty(SERVER_ERROR_TITLE);
                    None
                }
                Reply::LoggedOut => None,
            }
        };

        if let Some(amount) = max_bid {
            self.ctx
                .hub
                .publish(UiEvent::MinimumBidObserved {
                    amount,
                    source: AmountSource::HighestBid,
                })
                .await;
        }
    }

    /// 선택된 경매가 있으면 다시 조회, 없으면 초기화
    async fn refresh(&self) {
        if self.auction_id().is_some() {
            self.show(None).await;
        } else {
            self.init();
        }
    }
}

#[async_trait]
impl Handler for BidsList {
    fn name(&self) -> &'static str {
        "BidsList"
    }

    async fn handle(&self, event: &UiEvent) {
        match event {
            UiEvent::ShowAuction(id) | UiEvent::BidPlaced(id) => {
                self.show(Some(Trigger::Row(*id))).await
            }
            UiEvent::OwnerListReloaded => self.refresh().await,
            _ => {}
        }
    }
}
