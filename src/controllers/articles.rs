/// 경매에 포함된 상품 목록
// region:    --- Imports
use super::{parse_list, Component, PageContext, Trigger};
use crate::gateway::{Reply, Request};
use crate::model::{Article, AuctionId};
use crate::notify::{AmountSource, Handler, UiEvent};
use crate::view::format::euro;
use crate::view::{Cell, ListView, Row};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

// endregion: --- Imports

const DEFAULT_TITLE: &str = "Articles list";
const NO_ARTICLES_TITLE: &str = "No articles for this auction";
const ERROR_TITLE: &str = "No articles to show";

#[derive(Default)]
struct ArticlesState {
    auction_id: Option<AuctionId>,
    view: ListView,
}

pub struct ArticlesList {
    ctx: Arc<PageContext>,
    state: Mutex<ArticlesState>,
}

impl ArticlesList {
    pub fn new(ctx: Arc<PageContext>) -> Self {
        Self {
            ctx,
            state: Mutex::new(ArticlesState::default()),
        }
    }

    pub fn view(&self) -> ListView {
        self.state().view.clone()
    }

    fn state(&self) -> MutexGuard<'_, ArticlesState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn render(articles: &[Article]) -> Vec<Row> {
        articles
            .iter()
            .map(|article| {
                Row::new(vec![
                    Cell::text(euro(article.base_price)),
                    Cell::text(&article.name),
                    Cell::text(&article.description),
                    Cell::article_image(article),
                ])
            })
            .collect()
    }
}

#[async_trait]
impl Component for ArticlesList {
    fn name(&self) -> &'static str {
        "ArticlesList"
    }

    fn reset(&self) {
        self.state().view.reset();
    }

    /// 상품 목록 조회
    /// 조회가 끝나면 기본가 합계를 최소 입찰가 후보로 알린다.
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

        info!("{:<12} --> 상품 목록 조회: {}", "ArticlesList", auction_id);
        let reply = self
            .ctx
            .gateway
            .exchange(Request::get("articlesByAuctionId").param("auction", auction_id))
            .await;

        let prices_sum = {
            let mut state = self.state();
            match reply {
                Reply::Success(body) => match parse_list::<Article>("ArticlesList", &body) {
                    Some(articles) if !articles.is_empty() => {
                        state.view.shown(DEFAULT_TITLE, Self::render(&articles));
                        Some(articles.iter().map(|a| a.base_price).sum::<f64>())
                    }
                    Some(_) => {
                        state.view.empty(NO_ARTICLES_TITLE);
                        None
                    }
                    None => {
                        state.view.empty(format!("{}, server error", ERROR_TITLE));
                        None
                    }
                },
                Reply::Rejected(message) => {
                    state.view.empty(format!("{}: {}", ERROR_TITLE, message));
                    None
                }
                Reply::Failed => {
                    state.view.empty(format!("{}, server error", ERROR_TITLE));
                    None
                }
                Reply::LoggedOut => None,
            }
        };

        if let Some(amount) = prices_sum {
            self.ctx
                .hub
                .publish(UiEvent::MinimumBidObserved {
                    amount,
                    source: AmountSource::ArticlePrices,
                })
                .await;
        }
    }

    async fn refresh(&self) {
        let active = self.state().auction_id.is_some();
        if active {
            self.show(None).await;
        } else {
            self.init();
        }
    }
}

#[async_trait]
impl Handler for ArticlesList {
    fn name(&self) -> &'static str {
        "ArticlesList"
    }

    async fn handle(&self, event: &UiEvent) {
        if let UiEvent::ShowAuction(id) = event {
            self.show(Some(Trigger::Row(*id))).await;
        }
    }
}
