use crate::domain::{
    MediaId, MediaType,
    actions::{self, MediaAction},
    media::MediaItem,
};
use crate::ports::*;
use std::sync::Arc;

use super::errors::{CatalogError, Result};
use super::media_factory::get_media_class;

/// サービスの依存関係
///
/// 依存はデータ構造として束ね、各操作の関数に明示的に渡す。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub media_repository: Arc<dyn MediaRepository>,
}

/// 種別ごとにまとめた全メディア
#[derive(Debug, Clone, Default)]
pub struct MediaCatalog {
    pub books: Vec<MediaItem>,
    pub movies: Vec<MediaItem>,
    pub audiobooks: Vec<MediaItem>,
}

/// 詳細表示用のメディアと、現在選択可能なアクション
#[derive(Debug, Clone)]
pub struct MediaDetail {
    pub item: MediaItem,
    pub available_actions: Vec<MediaAction>,
}

/// ストレージからメディアを読み込むヘルパー関数
///
/// 詳細表示、登録後の読み戻し、アクション実行で共通利用される。
///
/// # エラー
/// - StorageError: 読み込み失敗
/// - NotFound: IDに一致するレコードがない
pub(super) async fn load_media(
    deps: &ServiceDependencies,
    media_type: MediaType,
    media_id: MediaId,
) -> Result<MediaItem> {
    deps.media_repository
        .get(media_type, media_id)
        .await
        .map_err(CatalogError::StorageError)?
        .ok_or(CatalogError::NotFound)
}

/// 全メディアを種別ごとに取得する
///
/// 3種類のテーブルを並行して読み込む。
pub async fn list_media(deps: &ServiceDependencies) -> Result<MediaCatalog> {
    let repository = &deps.media_repository;

    let (books, movies, audiobooks) = futures::try_join!(
        repository.list(MediaType::Book),
        repository.list(MediaType::Movie),
        repository.list(MediaType::AudioBook),
    )
    .map_err(CatalogError::StorageError)?;

    Ok(MediaCatalog {
        books,
        movies,
        audiobooks,
    })
}

/// メディアの詳細を取得する
///
/// 表示用に、種別と貸出状態から選択可能なアクションを計算して返す。
///
/// # エラー
/// - UnknownType: 未知の種別タグ
/// - NotFound: IDに一致するレコードがない
pub async fn get_media_detail(
    deps: &ServiceDependencies,
    media_type: &str,
    media_id: MediaId,
) -> Result<MediaDetail> {
    let media_type = get_media_class(media_type)?;
    let item = load_media(deps, media_type, media_id).await?;
    let available_actions = actions::available_actions(&item);

    Ok(MediaDetail {
        item,
        available_actions,
    })
}
