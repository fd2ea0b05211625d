/// 경매 엔티티 캐시 (세션 저장소)
/// 닫힌 경매 / 열린 경매 두 구획으로 나뉘며, 하나의 경매 id는 최대 한 구획에만 존재한다.
// region:    --- Imports
use crate::model::{Auction, AuctionId};
use crate::session::Identity;
use crate::storage::{read_json, write_json, Storage, StorageError};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

pub mod recent;
pub use recent::RecentlyViewed;

// endregion: --- Imports

// region:    --- Partition
const OPEN_PREFIX: &str = "auction";
const CLOSED_PREFIX: &str = "closedAuction";

/// 캐시 구획
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    Open,
    Closed,
}

impl Partition {
    pub fn of(auction: &Auction) -> Self {
        if auction.closed_by_user {
            Partition::Closed
        } else {
            Partition::Open
        }
    }

    fn prefix(&self) -> &'static str {
        match self {
            Partition::Open => OPEN_PREFIX,
            Partition::Closed => CLOSED_PREFIX,
        }
    }
}
// endregion: --- Partition

// region:    --- Entity Cache
pub struct EntityCache {
    storage: Arc<dyn Storage>,
    identity: Identity,
    // 구획 간 이동은 여러 키를 건드리므로 한 번에 하나만 수행한다
    lock: Mutex<()>,
}

impl EntityCache {
    pub fn new(storage: Arc<dyn Storage>, identity: Identity) -> Self {
        Self {
            storage,
            identity,
            lock: Mutex::new(()),
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    fn key(&self, partition: Partition, id: AuctionId) -> String {
        format!("{}_{}_{}", partition.prefix(), self.identity, id)
    }

    /// 경매 목록 저장
    /// 구획은 첫 번째 경매의 닫힘 여부로 결정한다.
    /// 닫힌 구획에 쓰면 열린 구획의 항목을 지우고, 이미 닫힌 경매는 열린 구획에 다시 쓰지 않는다.
    pub fn put(&self, auctions: &[Auction]) -> Result<usize, StorageError> {
        let Some(first) = auctions.first() else {
            return Ok(0);
        };
        let partition = Partition::of(first);
        let _guard = self.lock.lock().unwrap_or_else(|p| p.into_inner());

        let mut written = 0;
        for auction in auctions {
            match partition {
                Partition::Closed => {
                    write_json(
                        self.storage.as_ref(),
                        &self.key(Partition::Closed, auction.id),
                        auction,
                    )?;
                    self.storage
                        .remove_item(&self.key(Partition::Open, auction.id))?;
                }
                Partition::Open => {
                    let closed_key = self.key(Partition::Closed, auction.id);
                    if self.storage.get_item(&closed_key).is_some() {
                        debug!(
                            "{:<12} --> 이미 닫힌 경매는 열린 구획에 쓰지 않음: {}",
                            "Cache", auction.id
                        );
                        continue;
                    }
                    write_json(
                        self.storage.as_ref(),
                        &self.key(Partition::Open, auction.id),
                        auction,
                    )?;
                }
            }
            written += 1;
        }

        info!(
            "{:<12} --> 경매 {}건 저장 ({:?})",
            "Cache", written, partition
        );
        Ok(written)
    }

    /// 경매 조회 (닫힌 구획 우선)
    pub fn get(&self, id: AuctionId) -> Result<Option<Auction>, StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(auction) = read_json(self.storage.as_ref(), &self.key(Partition::Closed, id))? {
            return Ok(Some(auction));
        }
        read_json(self.storage.as_ref(), &self.key(Partition::Open, id))
    }

    /// 열린 구획에서만 삭제
    pub fn evict_open(&self, id: AuctionId) -> Result<bool, StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(|p| p.into_inner());
        let key = self.key(Partition::Open, id);
        if self.storage.get_item(&key).is_none() {
            return Ok(false);
        }
        self.storage.remove_item(&key)?;
        info!("{:<12} --> 열린 경매 캐시 삭제: {}", "Cache", id);
        Ok(true)
    }

    /// 구획에 id가 있는지 확인
    pub fn contains(&self, partition: Partition, id: AuctionId) -> bool {
        self.storage.get_item(&self.key(partition, id)).is_some()
    }
}
// endregion: --- Entity Cache
