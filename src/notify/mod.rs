/// 컴포넌트 간 알림
/// 컴포넌트는 이벤트 종류별로 구독하고, 변경을 일으킨 컴포넌트는 이벤트를 발행한다.
// region:    --- Imports
use crate::model::AuctionId;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

// endregion: --- Imports

// region:    --- Events
/// 최소 입찰가 갱신 출처
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountSource {
    /// 현재 최고 입찰가 (입찰 단위를 더한다)
    HighestBid,
    /// 상품 기본가 합계
    ArticlePrices,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // 목록 행의 "Show details" 선택
    ShowAuction(AuctionId),
    // 입찰 목록 / 상품 목록이 관측한 금액
    MinimumBidObserved { amount: f64, source: AmountSource },
    // 입찰 요청 완료 (성공 또는 거절)
    BidPlaced(AuctionId),
    // 경매 마감
    AuctionClosed(AuctionId),
    // 경매 생성
    AuctionCreated,
    // 상품 등록
    ArticleAdded,
    // 판매자 경매 목록 재구성
    OwnerListReloaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ShowAuction,
    MinimumBidObserved,
    BidPlaced,
    AuctionClosed,
    AuctionCreated,
    ArticleAdded,
    OwnerListReloaded,
}

impl UiEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            UiEvent::ShowAuction(_) => EventKind::ShowAuction,
            UiEvent::MinimumBidObserved { .. } => EventKind::MinimumBidObserved,
            UiEvent::BidPlaced(_) => EventKind::BidPlaced,
            UiEvent::AuctionClosed(_) => EventKind::AuctionClosed,
            UiEvent::AuctionCreated => EventKind::AuctionCreated,
            UiEvent::ArticleAdded => EventKind::ArticleAdded,
            UiEvent::OwnerListReloaded => EventKind::OwnerListReloaded,
        }
    }
}
// endregion: --- Events

// region:    --- Handler Trait
/// 이벤트 처리 트레이트
#[async_trait]
pub trait Handler: Send + Sync {
    fn name(&self) -> &'static str;
    async fn handle(&self, event: &UiEvent);
}
// endregion: --- Handler Trait

// region:    --- Notification Hub
#[derive(Default)]
pub struct NotificationHub {
    subscribers: RwLock<HashMap<EventKind, Vec<Arc<dyn Handler>>>>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// 구독 등록 (등록 순서대로 호출된다)
    pub fn subscribe(&self, kind: EventKind, handler: Arc<dyn Handler>) {
        debug!(
            "{:<12} --> 구독 등록: {:?} -> {}",
            "Notify",
            kind,
            handler.name()
        );
        self.subscribers
            .write()
            .unwrap_or_else(|p| p.into_inner())
            .entry(kind)
            .or_default()
            .push(handler);
    }

    /// 이벤트 발행
    pub async fn publish(&self, event: UiEvent) {
        let handlers = self
            .subscribers
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .get(&event.kind())
            .cloned()
            .unwrap_or_default();

        info!(
            "{:<12} --> 이벤트 발행: {:?} (구독자 {})",
            "Notify",
            event,
            handlers.len()
        );
        for handler in handlers {
            handler.handle(&event).await;
        }
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .get(&kind)
            .map_or(0, Vec::len)
    }

    /// 모든 구독 해제 (페이지 교체 시)
    pub fn clear(&self) {
        self.subscribers
            .write()
            .unwrap_or_else(|p| p.into_inner())
            .clear();
    }
}
// endregion: --- Notification Hub
