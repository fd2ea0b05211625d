// region:    --- Imports
use auction_client::config::ClientConfig;
use auction_client::controllers::Login;
use auction_client::forms::LoginForm;
use auction_client::gateway::{Gateway, HttpTransport};
use auction_client::pages::{Page, PageOrchestrator};
use auction_client::session::{HistoryNavigator, Session};
use auction_client::storage::{FileStorage, MemoryStorage};
use auction_client::view::ListView;
use std::sync::Arc;
use tracing::{error, info};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    let config = ClientConfig::from_env()?;
    let (username, password) = config.credentials()?;
    info!(
        "{:<12} --> 서비스: {} (timeout: {:?})",
        "Main", config.service_url, config.request_timeout
    );

    // 세션 저장소는 프로세스 수명, 영구 저장소는 파일
    let durable = Arc::new(FileStorage::open(&config.state_file)?);
    let navigator = Arc::new(HistoryNavigator::new());
    let session = Arc::new(Session::new(
        Arc::new(MemoryStorage::new()),
        durable,
        navigator.clone(),
    ));
    let transport = Arc::new(HttpTransport::new(
        &config.service_url,
        config.request_timeout,
    )?);
    let gateway = Arc::new(Gateway::new(transport, session));

    // 로그인
    let login = Login::new(Arc::clone(&gateway));
    let identity = login
        .submit(LoginForm {
            user: username,
            pass: password,
        })
        .await?;
    let Some(identity) = identity else {
        error!("{:<12} --> 로그인 실패: {}", "Main", login.message());
        return Err(login.message().into());
    };
    info!("{:<12} --> 로그인 성공: {}", "Main", identity);

    // 홈 페이지
    let orchestrator = PageOrchestrator::new(gateway);
    match orchestrator.init().await {
        Some(page) => log_page(&page),
        None => error!(
            "{:<12} --> 페이지를 열지 못함 (이동: {:?})",
            "Main",
            navigator.current()
        ),
    }
    Ok(())
}
// endregion: --- Main

// region:    --- Summary
fn log_list(name: &str, view: &ListView) {
    info!(
        "{:<12} --> {}: {:?} \"{}\" ({} rows)",
        "Page",
        name,
        view.state,
        view.title.text,
        view.table.rows.len()
    );
}

fn log_page(page: &Page) {
    match page {
        Page::Buy(buy) => {
            info!("{:<12} --> 구매 페이지", "Page");
            log_list("open", &buy.open.view());
            log_list("won", &buy.won.view());
            if let Some(id) = buy.details.auction_id() {
                let details = buy.details.view();
                info!("{:<12} --> 상세: {}", "Page", details.details.title);
                log_list("articles", &buy.articles.view());
                log_list("bids", &buy.bids.view());
                info!(
                    "{:<12} --> 경매 {} 최소 입찰가: {}",
                    "Page",
                    id,
                    buy.details.minimum_bid()
                );
            }
        }
        Page::Sell(sell) => {
            info!("{:<12} --> 판매 페이지", "Page");
            log_list("not closed", &sell.not_closed.view());
            log_list("closed", &sell.closed.view());
            log_list("available", &sell.add_auction.articles());
            if sell.details.auction_id().is_some() {
                info!(
                    "{:<12} --> 상세: {}",
                    "Page",
                    sell.details.view().details.title
                );
                log_list("bids", &sell.bids.view());
            }
        }
    }
}
// endregion: --- Summary
