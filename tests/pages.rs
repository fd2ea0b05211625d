mod common;

use auction_client::cache::Partition;
use auction_client::controllers::Component;
use auction_client::notify::EventKind;
use auction_client::pages::{BuyPage, Page, PageOrchestrator, SellPage};
use auction_client::session::{PageKind, UserAction, ENTRY_PAGE};
use auction_client::view::ListState;
use chrono::{Duration, Utc};
use common::{article, bid, closed_auction, terminated_auction, Harness};

/// 생성 + init 단계에서는 구독도 요청도 없다
#[tokio::test]
async fn test_two_phase_startup() {
    let harness = Harness::logged_in("alice");
    let ctx = harness.context();

    let page = BuyPage::new(ctx.clone());
    assert_eq!(ctx.hub.subscriber_count(EventKind::ShowAuction), 0);
    assert!(harness.transport.requests().is_empty());
    for component in page.components() {
        component.refresh().await;
    }
    assert!(harness.transport.requests().is_empty());
    assert_eq!(page.open.view().state, ListState::Hidden);

    page.wire();
    assert_eq!(ctx.hub.subscriber_count(EventKind::ShowAuction), 3);
    assert_eq!(ctx.hub.subscriber_count(EventKind::MinimumBidObserved), 1);
    assert_eq!(ctx.hub.subscriber_count(EventKind::BidPlaced), 1);
}

/// 구매 페이지: 낙찰 목록의 첫 경매가 자동으로 열리고 상품/입찰 목록이 따라온다
#[tokio::test]
async fn test_buy_page_auto_opens_first_won_auction() {
    let harness = Harness::logged_in("alice");
    let mut won = closed_auction(21);
    won.article_list = vec![article(1, 21, "lamp", 40.0)];
    harness.transport.respond_json("wonAuctionsWithArticles", &vec![won]);
    harness
        .transport
        .respond_json("articlesByAuctionId", &vec![article(1, 21, "lamp", 40.0)]);
    harness
        .transport
        .respond_json("bidsByAuctionId", &vec![bid(1, 21, 120.0)]);

    let page = BuyPage::load(harness.context()).await;

    // 최근 본 경매가 없으므로 공개 목록은 요청하지 않는다
    assert_eq!(harness.transport.count("auctionsFromIds"), 0);
    assert_eq!(
        page.open.view().title.text,
        "You did not view any auction recently"
    );
    assert_eq!(page.won.view().state, ListState::Shown);
    assert_eq!(page.details.auction_id(), Some(21));
    let details = page.details.view();
    assert_eq!(details.details.title, "Auction #21 - Terminated");
    assert!(!details.place_bid.visible);
    assert_eq!(page.articles.view().title.text, "Articles list");
    assert_eq!(page.bids.view().table.rows.len(), 1);
    // 종료된 경매는 최근 본 목록에 넣지 않는다
    assert!(page.ctx.recent.ids().unwrap().is_empty());
}

/// 판매 페이지: 마감하면 열린 구획에서 빠지고 두 목록이 다시 조회된다
#[tokio::test]
async fn test_sell_page_close_auction_flow() {
    let harness = Harness::logged_in("alice");
    let mut pending = terminated_auction(1);
    pending.max_bid = Some(120.0);
    let not_closed = "auctionsForOwner?openVsClosed=false";
    let closed = "auctionsForOwner?openVsClosed=true";
    harness.transport.respond_json(not_closed, &vec![pending]);
    harness.transport.respond(not_closed, 200, "[]");
    harness.transport.respond(closed, 200, "[]");
    harness.transport.respond_json(closed, &vec![closed_auction(1)]);
    harness.transport.respond("availableArticles", 200, "[]");
    harness
        .transport
        .respond_json("bidsByAuctionId", &vec![bid(1, 1, 120.0)]);
    harness.transport.respond("closeAuction", 200, "");

    let page = SellPage::load(harness.context()).await;

    assert_eq!(page.details.auction_id(), Some(1));
    assert!(page.details.view().close_visible);
    assert_eq!(page.bids.view().table.rows.len(), 1);
    assert_eq!(
        page.closed.view().title.text,
        "You don't have any closed auction"
    );
    assert_eq!(
        page.add_auction.articles().title.text,
        "Can't create auction: no available articles to include"
    );

    page.details.close_auction().await;

    let view = page.details.view();
    assert_eq!(view.close_message, "Auction closed");
    assert!(!view.close_visible);
    assert_eq!(view.details.closed, "Yes");
    assert_eq!(view.details.winner.unwrap().final_bid, "€120");
    assert_eq!(
        page.not_closed.view().title.text,
        "You don't have any not closed auction"
    );
    assert_eq!(page.closed.view().title.text, "Closed auctions list");
    assert_eq!(page.closed.view().table.rows.len(), 1);
    assert!(!page.ctx.cache.contains(Partition::Open, 1));
    assert_eq!(
        harness
            .transport
            .last("closeAuction")
            .unwrap()
            .param_values("auction"),
        vec!["1"]
    );
    assert_eq!(
        harness.session.last_action(&harness.identity()),
        Some(UserAction::CloseAuction)
    );
}

#[tokio::test]
async fn test_orchestrator_requires_login() {
    let harness = Harness::new();
    let orchestrator = PageOrchestrator::new(harness.gateway.clone());

    assert!(orchestrator.init().await.is_none());
    assert_eq!(harness.navigator.current().as_deref(), Some(ENTRY_PAGE));
    assert!(harness.transport.requests().is_empty());
}

/// 마지막 동작이 경매 생성이면 판매 페이지를 연다
#[tokio::test]
async fn test_orchestrator_resumes_sell_page() {
    let harness = Harness::logged_in("alice");
    harness
        .session
        .record_action(&harness.identity(), UserAction::AddAuction, Utc::now())
        .unwrap();
    harness.transport.respond("auctionsForOwner", 200, "[]");
    harness.transport.respond("availableArticles", 200, "[]");
    let orchestrator = PageOrchestrator::new(harness.gateway.clone());

    let page = orchestrator.init().await.unwrap();

    assert_eq!(page.kind(), PageKind::Sell);
    assert_eq!(harness.transport.count("auctionsForOwner"), 2);
    assert_eq!(harness.transport.count("wonAuctionsWithArticles"), 0);
}

/// 30일이 지난 동작 기록은 지워지고 구매 페이지로 돌아간다
#[tokio::test]
async fn test_orchestrator_expires_stale_state() {
    let harness = Harness::logged_in("alice");
    let identity = harness.identity();
    harness
        .session
        .record_action(
            &identity,
            UserAction::AddAuction,
            Utc::now() - Duration::days(45),
        )
        .unwrap();
    harness.transport.respond("wonAuctionsWithArticles", 200, "[]");
    let orchestrator = PageOrchestrator::new(harness.gateway.clone());

    let page = orchestrator.init().await.unwrap();

    assert_eq!(page.kind(), PageKind::Buy);
    assert!(harness.session.last_action(&identity).is_none());
}

/// 페이지를 바꾸면 이전 페이지의 구독이 해제된다
#[tokio::test]
async fn test_switching_pages_tears_down_subscriptions() {
    let harness = Harness::logged_in("alice");
    harness.transport.respond("wonAuctionsWithArticles", 200, "[]");
    harness.transport.respond("auctionsForOwner", 200, "[]");
    harness.transport.respond("availableArticles", 200, "[]");
    let orchestrator = PageOrchestrator::new(harness.gateway.clone());

    let buy = orchestrator.load_buy().await.unwrap();
    let buy_ctx = buy.context().clone();
    assert!(buy_ctx.hub.subscriber_count(EventKind::ShowAuction) > 0);

    let sell = orchestrator.load_sell().await.unwrap();
    assert_eq!(buy_ctx.hub.subscriber_count(EventKind::ShowAuction), 0);
    assert!(matches!(sell, Page::Sell(_)));
    assert!(matches!(orchestrator.current(), Some(Page::Sell(_))));

    orchestrator.logout();
    assert!(orchestrator.current().is_none());
    assert!(harness.session.identity().is_none());
    assert_eq!(harness.navigator.current().as_deref(), Some(ENTRY_PAGE));
}
