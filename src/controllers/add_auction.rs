/// 경매 생성 폼 (판매 페이지)
/// 1. 경매에 넣을 수 있는 상품 목록 조회
/// 2. 경매 생성 요청
// region:    --- Imports
use super::{parse_list, Component, PageContext, Trigger};
use crate::forms::{AddAuctionForm, FormError};
use crate::gateway::{Reply, Request};
use crate::model::{Article, ArticleId};
use crate::notify::{Handler, UiEvent};
use crate::session::UserAction;
use crate::view::format::euro;
use crate::view::{Cell, Label, ListView, Row};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

// endregion: --- Imports

const ARTICLES_TITLE: &str = "Articles to include:";
const NO_ARTICLES_TITLE: &str = "Can't create auction: no available articles to include";
/// 체크박스 입력 이름
pub const ARTICLE_CHECKBOX: &str = "articlesId";

#[derive(Default)]
struct AddAuctionState {
    available: Vec<ArticleId>,
    articles: ListView,
    message: Label,
}

pub struct AddAuction {
    ctx: Arc<PageContext>,
    state: Mutex<AddAuctionState>,
}

impl AddAuction {
    pub fn new(ctx: Arc<PageContext>) -> Self {
        Self {
            ctx,
            state: Mutex::new(AddAuctionState::default()),
        }
    }

    /// 등록 가능한 상품 목록
    pub fn articles(&self) -> ListView {
        self.state().articles.clone()
    }

    pub fn available(&self) -> Vec<ArticleId> {
        self.state().available.clone()
    }

    pub fn message(&self) -> Label {
        self.state().message.clone()
    }

    fn state(&self) -> MutexGuard<'_, AddAuctionState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn render(articles: &[Article]) -> Vec<Row> {
        articles
            .iter()
            .map(|article| {
                Row::new(vec![
                    Cell::checkbox(ARTICLE_CHECKBOX, article.id),
                    Cell::text(euro(article.base_price)),
                    Cell::text(&article.name),
                    Cell::text(&article.description),
                    Cell::article_image(article),
                ])
            })
            .collect()
    }

    /// 경매 생성 폼 제출
    pub async fn submit(&self, form: AddAuctionForm) -> Result<(), FormError> {
        self.ctx.record_action(UserAction::AddAuction);

        let auction = form.validate(self.ctx.now()).map_err(|e| {
            self.state().message.show(e.to_string());
            e
        })?;

        info!(
            "{:<12} --> 경매 생성 요청: 상품 {}개, 종료 {}",
            "AddAuction",
            auction.articles.len(),
            auction.terminates_at
        );
        let request = auction.articles.iter().fold(
            Request::post("addAuction")
                .param("terminatesAt", &auction.terminates_at)
                .param("minBidDelta", auction.min_bid_delta),
            |req, id| req.param(ARTICLE_CHECKBOX, id),
        );
        let reply = self.ctx.gateway.exchange(request).await;

        let (created, reload) = {
            let mut state = self.state();
            match reply {
                Reply::Success(_) => {
                    state.message.show("Auction created");
                    (true, true)
                }
                Reply::Rejected(message) => {
                    state
                        .message
                        .show(format!("Error while adding auction: {}", message));
                    (false, false)
                }
                Reply::Failed => {
                    state.message.show("Server error while adding auction");
                    (false, true)
                }
                Reply::LoggedOut => (false, false),
            }
        };

        // 경매에 들어간 상품은 더 이상 선택할 수 없다
        if reload {
            self.show(None).await;
        }
        if created {
            self.ctx.hub.publish(UiEvent::AuctionCreated).await;
        }
        Ok(())
    }
}

#[async_trait]
impl Component for AddAuction {
    fn name(&self) -> &'static str {
        "AddAuction"
    }

    fn reset(&self) {
        let mut state = self.state();
        state.message.text.clear();
        state.message.hide();
        state.articles.reset();
    }

    /// 등록 가능한 상품 조회
    async fn show(&self, _trigger: Option<Trigger>) {
        self.state().articles.loading();
        let reply = self
            .ctx
            .gateway
            .exchange(Request::get("availableArticles"))
            .await;

        let articles = match reply {
            Reply::Success(body) => parse_list::<Article>("AddAuction", &body),
            Reply::Rejected(_) | Reply::Failed => None,
            Reply::LoggedOut => return,
        };

        let mut state = self.state();
        match articles {
            Some(articles) if !articles.is_empty() => {
                state.available = articles.iter().map(|a| a.id).collect();
                state.articles.shown(ARTICLES_TITLE, Self::render(&articles));
            }
            Some(_) => {
                state.available.clear();
                state.articles.empty(NO_ARTICLES_TITLE);
            }
            None => {
                state.available.clear();
                state
                    .articles
                    .empty(format!("{}, server error", NO_ARTICLES_TITLE));
            }
        }
    }

    async fn refresh(&self) {
        self.show(None).await;
    }
}

#[async_trait]
impl Handler for AddAuction {
    fn name(&self) -> &'static str {
        "AddAuction"
    }

    async fn handle(&self, event: &UiEvent) {
        if let UiEvent::ArticleAdded = event {
            self.show(None).await;
        }
    }
}
