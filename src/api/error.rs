use crate::application::catalog::CatalogError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
#[derive(Debug)]
pub struct ApiError(CatalogError);

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self.0 {
            // 400 Bad Request - 入力の誤り
            CatalogError::UnknownType(_) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("Unknown media type"),
            ),
            CatalogError::UnknownAction(_) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("Unknown action"),
            ),
            CatalogError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::validation(errors))
            }
            CatalogError::NotBorrowable => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("This item cannot be borrowed"),
            ),
            CatalogError::NotDownloadable => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("This item cannot be downloaded"),
            ),

            // 404 Not Found - リクエストされたリソースが存在しない
            CatalogError::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorResponse::new("Media not found"),
            ),

            // 409 Conflict - 既に貸出中
            CatalogError::AlreadyBorrowed => (
                StatusCode::CONFLICT,
                ErrorResponse::new("Media is already borrowed"),
            ),

            // 500 Internal Server Error - システム障害
            // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
            CatalogError::StorageError(ref e) => {
                tracing::error!("Storage error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("An unexpected error occurred"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
