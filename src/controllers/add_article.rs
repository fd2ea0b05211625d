/// 상품 등록 폼 (판매 페이지)
// region:    --- Imports
use super::{Component, PageContext, Trigger};
use crate::forms::{AddArticleForm, FormError};
use crate::gateway::{Reply, Request};
use crate::notify::UiEvent;
use crate::session::UserAction;
use crate::view::Label;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

// endregion: --- Imports

pub struct AddArticle {
    ctx: Arc<PageContext>,
    message: Mutex<Label>,
}

impl AddArticle {
    pub fn new(ctx: Arc<PageContext>) -> Self {
        Self {
            ctx,
            message: Mutex::new(Label::default()),
        }
    }

    pub fn message(&self) -> Label {
        self.label().clone()
    }

    fn label(&self) -> MutexGuard<'_, Label> {
        self.message.lock().unwrap_or_else(|p| p.into_inner())
    }

    /// 상품 등록 폼 제출
    /// 성공하면 경매 생성 폼이 등록 가능한 상품 목록을 다시 읽도록 알린다.
    pub async fn submit(&self, form: AddArticleForm) -> Result<(), FormError> {
        self.ctx.record_action(UserAction::AddArticle);

        let multipart = form.validate().map_err(|e| {
            self.label().show(e.to_string());
            e
        })?;

        info!("{:<12} --> 상품 등록 요청: {}", "AddArticle", form.name.trim());
        let reply = self
            .ctx
            .gateway
            .exchange(Request::post_multipart("addArticle", multipart))
            .await;

        let added = {
            let mut label = self.label();
            match reply {
                Reply::Success(_) => {
                    label.show("Article added");
                    true
                }
                Reply::Rejected(message) => {
                    label.show(format!("Article not added: {}", message));
                    false
                }
                Reply::Failed => {
                    label.show("Server error, article not added");
                    false
                }
                Reply::LoggedOut => false,
            }
        };

        if added {
            self.ctx.hub.publish(UiEvent::ArticleAdded).await;
        }
        Ok(())
    }
}

#[async_trait]
impl Component for AddArticle {
    fn name(&self) -> &'static str {
        "AddArticle"
    }

    fn reset(&self) {
        let mut label = self.label();
        label.text.clear();
        label.hide();
    }

    // 조회할 데이터가 없는 폼
    async fn show(&self, _trigger: Option<Trigger>) {
        self.reset();
    }

    async fn refresh(&self) {}
}
