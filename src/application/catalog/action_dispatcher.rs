use crate::domain::{
    Borrower, BorrowError, MediaId,
    actions::{self, Behavior, MediaAction},
    commands::PerformAction,
    media::{self, MediaItem},
};

use super::catalog_service::{ServiceDependencies, load_media};
use super::errors::{CatalogError, Result};
use super::media_factory::get_media_class;

/// メディアに対してアクションを実行する
///
/// 1リクエストごとの状態遷移：
/// 1. TypeResolved   - 種別タグを解決（失敗: UnknownType）
/// 2. ItemLoaded     - レコードを読み込む（失敗: NotFound）
/// 3. ActionResolved - 種別のアクションテーブルから振る舞いを引く（失敗: UnknownAction）
/// 4. Executed       - 振る舞いを実行し、結果の文字列を返す
///
/// いずれの失敗もその時点で終了する。
pub async fn perform_action(deps: &ServiceDependencies, cmd: PerformAction) -> Result<String> {
    let media_type = get_media_class(&cmd.media_type)?;
    tracing::debug!(media_type = %media_type, "action dispatch: type resolved");

    let item = load_media(deps, media_type, cmd.media_id).await?;
    tracing::debug!(media_id = %cmd.media_id, "action dispatch: item loaded");

    let (action, behavior) = actions::resolve_action(media_type, &cmd.action)
        .ok_or_else(|| CatalogError::UnknownAction(cmd.action.clone()))?;
    tracing::debug!(action = action.as_str(), "action dispatch: action resolved");

    execute(deps, item, action, behavior, cmd.caller.as_deref()).await
}

/// 貸出専用の入口
///
/// アクションテーブルを経由せず、種別が貸出に対応しているかを先に確認する。
///
/// # エラー
/// - UnknownType / NotFound
/// - NotBorrowable: 貸出に対応していない種別（映画）
/// - AlreadyBorrowed: 既に貸出中
pub async fn borrow_media(
    deps: &ServiceDependencies,
    media_type: &str,
    media_id: MediaId,
    caller: Option<&str>,
) -> Result<String> {
    let media_type = get_media_class(media_type)?;
    let item = load_media(deps, media_type, media_id).await?;

    if !media_type.capabilities().borrow {
        return Err(CatalogError::NotBorrowable);
    }

    borrow(deps, item, caller).await
}

/// ダウンロード専用の入口
///
/// 種別がダウンロードに対応していない場合（書籍）はNotDownloadableを返す。
pub async fn download_media(
    deps: &ServiceDependencies,
    media_type: &str,
    media_id: MediaId,
) -> Result<String> {
    let media_type = get_media_class(media_type)?;
    let item = load_media(deps, media_type, media_id).await?;

    item.download().ok_or(CatalogError::NotDownloadable)
}

async fn execute(
    deps: &ServiceDependencies,
    item: MediaItem,
    action: MediaAction,
    behavior: Behavior,
    caller: Option<&str>,
) -> Result<String> {
    // テーブルと種別の振る舞いが食い違う場合はUnknownActionとして扱う
    let unsupported = || CatalogError::UnknownAction(action.as_str().to_string());

    match behavior {
        Behavior::Describe => Ok(item.describe()),
        Behavior::ReadSample => item.read_sample().ok_or_else(unsupported),
        Behavior::PlayTrailer => item.play_trailer().ok_or_else(unsupported),
        Behavior::Download => item.download().ok_or_else(unsupported),
        Behavior::Unavailable(text) => Ok(text.to_string()),
        Behavior::Borrow => borrow(deps, item, caller).await,
    }
}

/// 貸出を実行して保存する
///
/// ドメインの純粋関数で新しい状態を作り、ストレージのcompare-and-setで保存する。
/// 同時に貸出要求が来た場合は先に保存した側が優先され、後の側はAlreadyBorrowedになる。
async fn borrow(deps: &ServiceDependencies, item: MediaItem, caller: Option<&str>) -> Result<String> {
    let borrower = Borrower::from_caller(caller);
    let media_id = item.media_id();

    let borrowed =
        media::borrow(item, borrower.clone(), chrono::Utc::now()).map_err(|e| match e {
            BorrowError::AlreadyBorrowed => CatalogError::AlreadyBorrowed,
            BorrowError::NotBorrowable => CatalogError::NotBorrowable,
        })?;

    let saved = deps
        .media_repository
        .update_borrowed(&borrowed)
        .await
        .map_err(CatalogError::StorageError)?;

    if !saved {
        tracing::warn!(%media_id, borrower = %borrower, "borrow lost to a concurrent request");
        return Err(CatalogError::AlreadyBorrowed);
    }

    tracing::info!(%media_id, borrower = %borrower, "media borrowed");

    Ok(media::borrow_confirmation(&borrowed, &borrower))
}
