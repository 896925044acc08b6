use crate::application::catalog::{
    CatalogError, ServiceDependencies, borrow_media as execute_borrow_media,
    create_media as execute_create_media, download_media as execute_download_media,
    get_media_class, get_media_detail, list_media as execute_list_media, perform_action,
};
use crate::domain::{
    commands::PerformAction, validation::ValidationErrors, value_objects::MediaId,
};
use axum::{
    Json,
    body::Bytes,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
};
use std::sync::Arc;
use uuid::Uuid;

use super::{
    error::ApiError,
    types::{
        ActionRequest, ActionResultResponse, BODY_FIELD, CreateMediaRequest,
        MediaDetailResponse, MediaListResponse, MediaResponse,
    },
};

/// 呼び出し元の識別情報を運ぶヘッダー
pub const CALLER_HEADER: &str = "x-user";

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

/// ヘッダーから呼び出し元を取り出す（未指定・非ASCIIの場合はNone）
fn caller_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CALLER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// パスの種別タグとIDを解決する
///
/// 種別を先に確認する（失敗: UnknownType）。
/// UUIDとして解釈できないIDは一致するレコードがないものとして扱う（NotFound）。
fn resolve_path(media_type: &str, media_id: &str) -> Result<MediaId, ApiError> {
    get_media_class(media_type)?;

    let uuid = Uuid::parse_str(media_id).map_err(|_| CatalogError::NotFound)?;
    Ok(MediaId::from_uuid(uuid))
}

/// JSON本文の抽出失敗を検証エラーとして返す
fn invalid_body(rejection: JsonRejection) -> ApiError {
    let mut errors = ValidationErrors::new();
    errors.add(BODY_FIELD, rejection.body_text());
    CatalogError::Validation(errors).into()
}

// ============================================================================
// Command handlers (POST)
// ============================================================================

/// POST /media - メディアを登録
///
/// 種別ごとの必須フィールドを検証し、ファクトリ経由で保存する。
/// 検証エラーはフィールドごとのメッセージとともに400で返す。
pub async fn create_media(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateMediaRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MediaResponse>), ApiError> {
    let Json(req) = payload.map_err(invalid_body)?;
    let media_type = req.media_type().map_err(CatalogError::Validation)?;
    let fields = req.raw_fields();
    let item = execute_create_media(&state.service_deps, media_type, &fields).await?;

    Ok((StatusCode::CREATED, Json(MediaResponse::from(item))))
}

/// POST /media/:media_type/:id/action - アクションを実行
///
/// アクション名を省略した場合（本文が空の場合を含む）はdescribeを実行する。
/// borrowの借り手は`x-user`ヘッダーから取得し、ない場合はゲスト扱い。
pub async fn media_action(
    State(state): State<Arc<AppState>>,
    Path((media_type, media_id)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ActionResultResponse>, ApiError> {
    let media_id = resolve_path(&media_type, &media_id)?;
    let req = ActionRequest::from_body(&body).map_err(CatalogError::Validation)?;

    let cmd = PerformAction {
        media_type,
        media_id,
        action: req.action_name().to_string(),
        caller: caller_from_headers(&headers),
    };

    let result = perform_action(&state.service_deps, cmd).await?;

    Ok(Json(ActionResultResponse { result }))
}

/// POST /media/:media_type/:id/borrow - 貸出
pub async fn borrow_media(
    State(state): State<Arc<AppState>>,
    Path((media_type, media_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Json<ActionResultResponse>, ApiError> {
    let media_id = resolve_path(&media_type, &media_id)?;
    let caller = caller_from_headers(&headers);
    let result =
        execute_borrow_media(&state.service_deps, &media_type, media_id, caller.as_deref())
            .await?;

    Ok(Json(ActionResultResponse { result }))
}

/// POST /media/:media_type/:id/download - ダウンロード
pub async fn download_media(
    State(state): State<Arc<AppState>>,
    Path((media_type, media_id)): Path<(String, String)>,
) -> Result<Json<ActionResultResponse>, ApiError> {
    let media_id = resolve_path(&media_type, &media_id)?;
    let result = execute_download_media(&state.service_deps, &media_type, media_id).await?;

    Ok(Json(ActionResultResponse { result }))
}

// ============================================================================
// Query handlers (GET)
// ============================================================================

/// GET /media - 全メディアを種別ごとに取得
pub async fn list_media(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MediaListResponse>, ApiError> {
    let catalog = execute_list_media(&state.service_deps).await?;

    Ok(Json(MediaListResponse::from(catalog)))
}

/// GET /media/:media_type/:id - メディア詳細
///
/// 見つかった場合は選択可能なアクションとともに返し、見つからない場合は404を返す。
pub async fn get_media(
    State(state): State<Arc<AppState>>,
    Path((media_type, media_id)): Path<(String, String)>,
) -> Result<Json<MediaDetailResponse>, ApiError> {
    let media_id = resolve_path(&media_type, &media_id)?;
    let detail = get_media_detail(&state.service_deps, &media_type, media_id).await?;

    Ok(Json(MediaDetailResponse::from(detail)))
}
