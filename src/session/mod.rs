/// 로그인 세션 및 사용자별 영구 상태 관리
/// 1. 로그인 사용자 / 로그인 시각 (세션 저장소)
/// 2. 마지막 동작 기록 (영구 저장소)
/// 3. 30일 만료 정책
// region:    --- Imports
use crate::storage::{read_json, write_json, Storage, StorageError};
use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Constants
pub const USERNAME_KEY: &str = "username";
pub const LOGIN_TIMESTAMP_KEY: &str = "loginTimestamp";
pub const LAST_ACTION_KEY: &str = "lastAction";
pub const LAST_ACTION_TIMESTAMP_KEY: &str = "lastActionTimestamp";
pub const RECENTLY_VISITED_KEY: &str = "auctionsRecentlyVisited";

/// 로그인 페이지
pub const ENTRY_PAGE: &str = "index.html";
/// 로그인 후 메인 페이지
pub const HOME_PAGE: &str = "home.html";

/// 마지막 동작 이후 영구 상태를 유지하는 기간
pub const STATE_TTL_DAYS: i64 = 30;
// endregion: --- Constants

// region:    --- Identity
/// 로그인 사용자 식별자
/// 모든 저장소 키는 이 값으로 구분된다.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity(String);

impl Identity {
    pub fn new(username: impl Into<String>) -> Self {
        Self(username.into())
    }

    pub fn username(&self) -> &str {
        &self.0
    }

    /// 사용자별 저장소 키 (`lastAction_alice`)
    pub fn key(&self, name: &str) -> String {
        format!("{}_{}", name, self.0)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
// endregion: --- Identity

// region:    --- User Action
/// 사용자가 직접 수행한 동작
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    SearchAuction,
    PlaceBid,
    CloseAuction,
    AddArticle,
    AddAuction,
}

impl UserAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserAction::SearchAuction => "searchAuction",
            UserAction::PlaceBid => "placeBid",
            UserAction::CloseAuction => "closeAuction",
            UserAction::AddArticle => "addArticle",
            UserAction::AddAuction => "addAuction",
        }
    }
}

impl FromStr for UserAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "searchAuction" => Ok(UserAction::SearchAuction),
            "placeBid" => Ok(UserAction::PlaceBid),
            "closeAuction" => Ok(UserAction::CloseAuction),
            "addArticle" => Ok(UserAction::AddArticle),
            "addAuction" => Ok(UserAction::AddAuction),
            other => Err(format!("unknown action: {}", other)),
        }
    }
}

/// 시작 페이지 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Buy,
    Sell,
}
// endregion: --- User Action

// region:    --- Navigator
/// 페이지 이동 트레이트
pub trait Navigator: Send + Sync {
    fn redirect(&self, location: &str);
}

/// 이동 이력을 기록하는 기본 구현체
#[derive(Default)]
pub struct HistoryNavigator {
    history: Mutex<Vec<String>>,
}

impl HistoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<String> {
        self.history
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .last()
            .cloned()
    }

    pub fn history(&self) -> Vec<String> {
        self.history
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}

impl Navigator for HistoryNavigator {
    fn redirect(&self, location: &str) {
        info!("{:<12} --> 페이지 이동: {}", "Navigator", location);
        self.history
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(location.to_string());
    }
}
// endregion: --- Navigator

// region:    --- Session
/// 클라이언트 세션
pub struct Session {
    session_storage: Arc<dyn Storage>,
    durable_storage: Arc<dyn Storage>,
    navigator: Arc<dyn Navigator>,
}

impl Session {
    pub fn new(
        session_storage: Arc<dyn Storage>,
        durable_storage: Arc<dyn Storage>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            session_storage,
            durable_storage,
            navigator,
        }
    }

    pub fn session_storage(&self) -> Arc<dyn Storage> {
        Arc::clone(&self.session_storage)
    }

    pub fn durable_storage(&self) -> Arc<dyn Storage> {
        Arc::clone(&self.durable_storage)
    }

    pub fn navigator(&self) -> Arc<dyn Navigator> {
        Arc::clone(&self.navigator)
    }

    /// 현재 로그인 사용자
    pub fn identity(&self) -> Option<Identity> {
        self.session_storage
            .get_item(USERNAME_KEY)
            .filter(|name| !name.is_empty())
            .map(Identity::new)
    }

    /// 로그인 정보 기록
    pub fn login(&self, username: &str, at: DateTime<Utc>) -> Result<Identity, StorageError> {
        info!("{:<12} --> 로그인 기록: {}", "Session", username);
        self.session_storage.set_item(USERNAME_KEY, username)?;
        write_json(self.session_storage.as_ref(), LOGIN_TIMESTAMP_KEY, &at)?;
        Ok(Identity::new(username))
    }

    /// 로그인 시각 (기록이 없거나 손상되면 None)
    pub fn login_timestamp(&self) -> Option<DateTime<Utc>> {
        match read_json(self.session_storage.as_ref(), LOGIN_TIMESTAMP_KEY) {
            Ok(at) => at,
            Err(e) => {
                warn!("{:<12} --> 로그인 시각 읽기 실패: {}", "Session", e);
                None
            }
        }
    }

    /// 사용자 로그아웃 (세션 저장소만 비운다)
    pub fn logout(&self) -> Result<(), StorageError> {
        info!("{:<12} --> 로그아웃", "Session");
        self.session_storage.clear()
    }

    /// 인증 만료 처리
    /// 세션 저장소와 현재 사용자의 영구 상태를 모두 지우고 로그인 페이지로 이동한다.
    pub fn invalidate(&self) {
        warn!("{:<12} --> 인증 만료: 클라이언트 상태 초기화", "Session");
        let identity = self.identity();

        if let Err(e) = self.session_storage.clear() {
            warn!("{:<12} --> 세션 저장소 초기화 실패: {}", "Session", e);
        }
        if let Some(identity) = identity {
            for name in [
                RECENTLY_VISITED_KEY,
                LAST_ACTION_KEY,
                LAST_ACTION_TIMESTAMP_KEY,
            ] {
                if let Err(e) = self.durable_storage.remove_item(&identity.key(name)) {
                    warn!("{:<12} --> 영구 상태 삭제 실패: {}", "Session", e);
                }
            }
        }

        self.navigator.redirect(ENTRY_PAGE);
    }

    /// 마지막 동작 기록
    pub fn record_action(
        &self,
        identity: &Identity,
        action: UserAction,
        at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        info!(
            "{:<12} --> 마지막 동작 기록: {} ({})",
            "Session",
            action.as_str(),
            identity
        );
        self.durable_storage
            .set_item(&identity.key(LAST_ACTION_KEY), action.as_str())?;
        write_json(
            self.durable_storage.as_ref(),
            &identity.key(LAST_ACTION_TIMESTAMP_KEY),
            &at,
        )
    }

    /// 마지막 동작 조회
    pub fn last_action(&self, identity: &Identity) -> Option<UserAction> {
        self.durable_storage
            .get_item(&identity.key(LAST_ACTION_KEY))
            .and_then(|raw| raw.parse().ok())
    }

    /// 마지막 동작 시각 조회
    pub fn last_action_timestamp(&self, identity: &Identity) -> Option<DateTime<Utc>> {
        let key = identity.key(LAST_ACTION_TIMESTAMP_KEY);
        match read_json(self.durable_storage.as_ref(), &key) {
            Ok(at) => at,
            Err(e) => {
                warn!("{:<12} --> 마지막 동작 시각 손상: {}", "Session", e);
                None
            }
        }
    }

    /// 만료된 영구 상태 정리
    /// 기록이 없으면 가장 오래된 시각으로 간주한다.
    pub fn expire_stale_state(
        &self,
        identity: &Identity,
        now: DateTime<Utc>,
    ) -> Result<bool, StorageError> {
        let last = self
            .last_action_timestamp(identity)
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

        if last + Duration::days(STATE_TTL_DAYS) < now {
            info!(
                "{:<12} --> 마지막 동작({})이 {}일 이상 지나 영구 상태 삭제",
                "Session", last, STATE_TTL_DAYS
            );
            self.durable_storage.clear()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// 다음 로드 시 열 페이지
    pub fn resume_page(&self, identity: &Identity) -> PageKind {
        match self.last_action(identity) {
            Some(UserAction::AddAuction) => PageKind::Sell,
            _ => PageKind::Buy,
        }
    }
}
// endregion: --- Session
