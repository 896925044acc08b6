use crate::domain::{
    media::{MediaItem, NewMedia},
    value_objects::{MediaId, MediaType},
};
use crate::ports::media_repository::{MediaRepository as MediaRepositoryTrait, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Mutex, MutexGuard};

/// MediaRepositoryのインメモリ実装
///
/// レコードを登録順に1つのMutexの内側で保持する。
/// 貸出のcompare-and-setは他のリクエストに対してアトミックになる。
/// テストと`MEDIA_STORAGE=memory`で使用する。
pub struct MediaRepository {
    items: Mutex<Vec<MediaItem>>,
}

impl MediaRepository {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }

    /// 全種別を合わせた保存済みレコード数
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<MediaItem>>> {
        self.items
            .lock()
            .map_err(|e| format!("media store lock poisoned: {}", e).into())
    }
}

impl Default for MediaRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaRepositoryTrait for MediaRepository {
    async fn create(&self, media: &NewMedia) -> Result<MediaId> {
        let media_id = MediaId::new();
        let item = MediaItem::from_new(media_id, media.clone(), Utc::now());
        self.lock()?.push(item);
        Ok(media_id)
    }

    async fn get(&self, media_type: MediaType, media_id: MediaId) -> Result<Option<MediaItem>> {
        Ok(self
            .lock()?
            .iter()
            .find(|item| item.media_type() == media_type && item.media_id() == media_id)
            .cloned())
    }

    async fn list(&self, media_type: MediaType) -> Result<Vec<MediaItem>> {
        Ok(self
            .lock()?
            .iter()
            .filter(|item| item.media_type() == media_type)
            .cloned()
            .collect())
    }

    async fn update_borrowed(&self, item: &MediaItem) -> Result<bool> {
        let mut items = self.lock()?;
        let Some(stored) = items.iter_mut().find(|stored| {
            stored.media_type() == item.media_type() && stored.media_id() == item.media_id()
        }) else {
            return Ok(false);
        };

        if stored.is_borrowed() {
            return Ok(false);
        }

        *stored = item.clone();
        Ok(true)
    }
}
