/// 최근 본 경매 목록 (영구 저장소)
// region:    --- Imports
use crate::model::AuctionId;
use crate::session::{Identity, RECENTLY_VISITED_KEY};
use crate::storage::{read_json, write_json, Storage, StorageError};
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use tracing::info;

// endregion: --- Imports

// region:    --- Persisted Shape
// 예전 형식은 원소가 하나일 때 배열 대신 숫자 하나로 저장했다.
// 읽을 때는 두 형식을 모두 받고, 쓸 때는 항상 배열로 쓴다.
#[derive(Deserialize)]
#[serde(untagged)]
enum PersistedIds {
    One(AuctionId),
    Many(Vec<AuctionId>),
}

impl From<PersistedIds> for Vec<AuctionId> {
    fn from(ids: PersistedIds) -> Self {
        match ids {
            PersistedIds::One(id) => vec![id],
            PersistedIds::Many(ids) => ids,
        }
    }
}
// endregion: --- Persisted Shape

// region:    --- Recently Viewed
pub struct RecentlyViewed {
    storage: Arc<dyn Storage>,
    key: String,
    lock: Mutex<()>,
}

impl RecentlyViewed {
    pub fn new(storage: Arc<dyn Storage>, identity: &Identity) -> Self {
        Self {
            storage,
            key: identity.key(RECENTLY_VISITED_KEY),
            lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<Vec<AuctionId>, StorageError> {
        let ids: Option<PersistedIds> = read_json(self.storage.as_ref(), &self.key)?;
        Ok(ids.map(Vec::from).unwrap_or_default())
    }

    /// 저장된 id 목록 (처음 방문한 순서)
    pub fn ids(&self) -> Result<Vec<AuctionId>, StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(|p| p.into_inner());
        self.load()
    }

    /// 방문 기록 추가 (이미 있으면 무시)
    pub fn visit(&self, id: AuctionId) -> Result<bool, StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(|p| p.into_inner());
        let mut ids = self.load()?;
        if ids.contains(&id) {
            return Ok(false);
        }
        ids.push(id);
        write_json(self.storage.as_ref(), &self.key, &ids)?;
        info!("{:<12} --> 최근 본 경매 추가: {}", "Recent", id);
        Ok(true)
    }

    /// 서버가 돌려준 경매만 남긴다 (순서는 유지)
    pub fn retain(&self, still_open: &[AuctionId]) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(|p| p.into_inner());
        let mut ids = self.load()?;
        ids.retain(|id| still_open.contains(id));
        write_json(self.storage.as_ref(), &self.key, &ids)
    }

    /// 전체 삭제
    pub fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(|p| p.into_inner());
        info!("{:<12} --> 최근 본 경매 목록 삭제", "Recent");
        self.storage.remove_item(&self.key)
    }
}
// endregion: --- Recently Viewed
