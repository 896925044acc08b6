use crate::domain::validation::ValidationErrors;
use thiserror::Error;

/// カタログアプリケーション層のエラー
#[derive(Debug, Error)]
pub enum CatalogError {
    /// 種別タグが book / movie / audiobook のいずれでもない
    #[error("Unknown media type: {0}")]
    UnknownType(String),

    /// IDに一致するレコードがない
    #[error("Media not found")]
    NotFound,

    /// 種別のアクションテーブルにないアクション
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// 入力値の検証エラー（フィールド単位）
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// 既に貸出中（先に貸し出した側が優先）
    #[error("Media is already borrowed")]
    AlreadyBorrowed,

    /// 貸出できない種別
    #[error("This item cannot be borrowed")]
    NotBorrowable,

    /// ダウンロードできない種別
    #[error("This item cannot be downloaded")]
    NotDownloadable,

    /// ストレージのエラー
    #[error("Storage error")]
    StorageError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, CatalogError>;
