/// 로그인 폼 (진입 페이지)
// region:    --- Imports
use crate::forms::{FormError, LoginForm};
use crate::gateway::{
    extract_error_message, Gateway, GatewayError, Request, STATUS_BAD_REQUEST, STATUS_OK,
    STATUS_UNAUTHORIZED,
};
use crate::session::{Identity, HOME_PAGE};
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

// endregion: --- Imports

pub struct Login {
    gateway: Arc<Gateway>,
    message: Mutex<String>,
}

impl Login {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self {
            gateway,
            message: Mutex::new(String::new()),
        }
    }

    /// 오류 메시지 (성공 시 빈 문자열)
    pub fn message(&self) -> String {
        self.message_slot().clone()
    }

    fn message_slot(&self) -> MutexGuard<'_, String> {
        self.message.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn set_message(&self, text: impl Into<String>) {
        *self.message_slot() = text.into();
    }

    /// 로그인 폼 제출
    /// 성공하면 세션에 사용자와 로그인 시각을 남기고 홈 페이지로 이동한다.
    pub async fn submit(&self, form: LoginForm) -> Result<Option<Identity>, FormError> {
        self.set_message("");
        form.validate().map_err(|e| {
            self.set_message(e.to_string());
            e
        })?;

        let username = form.user.trim().to_string();
        info!("{:<12} --> 로그인 요청: {}", "Login", username);
        let result = self
            .gateway
            .call(
                Request::post("doLogin")
                    .param("user", &username)
                    .param("pass", &form.pass),
            )
            .await;

        let response = match result {
            Ok(response) => response,
            Err(GatewayError::Unauthenticated) => return Ok(None),
            Err(e) => {
                warn!("{:<12} --> 로그인 요청 실패: {}", "Login", e);
                self.set_message("Login error");
                return Ok(None);
            }
        };

        match response.status {
            STATUS_OK => {
                let session = self.gateway.session();
                match session.login(&username, Utc::now()) {
                    Ok(identity) => {
                        session.navigator().redirect(HOME_PAGE);
                        Ok(Some(identity))
                    }
                    Err(e) => {
                        warn!("{:<12} --> 로그인 정보 저장 실패: {}", "Login", e);
                        self.set_message("Login error");
                        Ok(None)
                    }
                }
            }
            STATUS_BAD_REQUEST => {
                let detail = extract_error_message(&response.body).unwrap_or_default();
                self.set_message(format!("Error: {}", detail));
                Ok(None)
            }
            STATUS_UNAUTHORIZED => {
                self.set_message("Error: wrong username or password");
                Ok(None)
            }
            _ => {
                self.set_message("Login error");
                Ok(None)
            }
        }
    }
}
