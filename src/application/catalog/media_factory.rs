use crate::domain::{MediaType, media::MediaItem, validation};

use super::catalog_service::{ServiceDependencies, load_media};
use super::errors::{CatalogError, Result};

/// 種別タグからレコード形状を解決する
///
/// 一覧・詳細・アクションのすべてで共通に使われる種別の入口。
///
/// # エラー
/// - UnknownType: book / movie / audiobook 以外のタグ
pub fn get_media_class(media_type: &str) -> Result<MediaType> {
    media_type
        .parse::<MediaType>()
        .map_err(|e| CatalogError::UnknownType(e.0))
}

/// メディアを登録する
///
/// 処理の流れ：
/// 1. 種別タグを解決
/// 2. 種別ごとの必須フィールドを検証（呼び出し側で検証済みでも再度確認する）
/// 3. ストレージに1件保存し、IDを受け取る
/// 4. 保存されたレコードを読み戻して返す
///
/// 検証に失敗した場合は何も保存しない。
///
/// # エラー
/// - UnknownType: 未知の種別タグ
/// - Validation: 必須フィールドの欠落や制約違反（全フィールド分）
/// - StorageError: 保存または読み戻しの失敗
pub async fn create_media(
    deps: &ServiceDependencies,
    media_type: &str,
    fields: &validation::RawFields,
) -> Result<MediaItem> {
    let media_type = get_media_class(media_type)?;

    let new_media =
        validation::validate_media(media_type, fields).map_err(CatalogError::Validation)?;

    let media_id = deps
        .media_repository
        .create(&new_media)
        .await
        .map_err(CatalogError::StorageError)?;

    tracing::info!(%media_id, media_type = %media_type, title = %new_media.title, "media created");

    load_media(deps, media_type, media_id).await
}
