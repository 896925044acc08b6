use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

use crate::application::catalog::{MediaCatalog, MediaDetail};
use crate::domain::{
    actions::MediaAction,
    commands::DEFAULT_ACTION,
    media::MediaItem,
    validation::{self, RawFields, ValidationErrors},
};

/// リクエスト本文そのものの誤りを報告する際のキー
pub const BODY_FIELD: &str = "body";

/// メディア登録リクエスト（POST /media）
///
/// `media_type`以外のフィールドは検証前の生の値として受け取る。
/// 数値は文字列でも数値でも受け付ける。
#[derive(Debug, Deserialize)]
pub struct CreateMediaRequest {
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(flatten)]
    pub fields: HashMap<String, serde_json::Value>,
}

impl CreateMediaRequest {
    /// 種別タグ（未指定・空の場合はフィールドエラー）
    pub fn media_type(&self) -> Result<&str, ValidationErrors> {
        match self.media_type.as_deref().map(str::trim) {
            Some(tag) if !tag.is_empty() => Ok(tag),
            _ => {
                let mut errors = ValidationErrors::new();
                errors.add("media_type", validation::REQUIRED);
                Err(errors)
            }
        }
    }

    /// 検証用の生の値に変換する
    ///
    /// nullは未入力として扱い、配列やオブジェクトは無視する。
    pub fn raw_fields(&self) -> RawFields {
        self.fields
            .iter()
            .filter_map(|(name, value)| {
                let raw = match value {
                    serde_json::Value::String(s) => s.clone(),
                    serde_json::Value::Number(n) => n.to_string(),
                    serde_json::Value::Bool(b) => b.to_string(),
                    _ => return None,
                };
                Some((name.clone(), raw))
            })
            .collect()
    }
}

/// アクション実行リクエスト（POST /media/:media_type/:id/action）
#[derive(Debug, Default, Deserialize)]
pub struct ActionRequest {
    pub action: Option<String>,
}

impl ActionRequest {
    /// 本文からリクエストを読み取る
    ///
    /// 本文が空の場合はアクション名の省略として扱う。
    pub fn from_body(body: &[u8]) -> Result<Self, ValidationErrors> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        serde_json::from_slice(body).map_err(|e| {
            let mut errors = ValidationErrors::new();
            errors.add(BODY_FIELD, format!("Invalid JSON body: {}", e));
            errors
        })
    }

    /// アクション名（省略時はdescribe）
    pub fn action_name(&self) -> &str {
        self.action.as_deref().unwrap_or(DEFAULT_ACTION)
    }
}

/// メディアレスポンス
///
/// 種別固有のフィールドは該当する種別の場合のみ含まれる。
#[derive(Debug, Serialize, Deserialize)]
pub struct MediaResponse {
    pub id: Uuid,
    pub media_type: String,
    pub title: String,
    pub creator: String,
    pub publication_date: NaiveDate,
    pub is_borrowed: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub borrowed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub page_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub narrator: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MediaItem> for MediaResponse {
    fn from(item: MediaItem) -> Self {
        let media_type = item.media_type().as_str().to_string();
        let is_borrowed = item.is_borrowed();
        let borrowed_by = item.borrowed_by().map(|b| b.as_str().to_string());
        let core = item.core().clone();

        let mut response = Self {
            id: core.media_id.value(),
            media_type,
            title: core.title,
            creator: core.creator,
            publication_date: core.publication_date,
            is_borrowed,
            borrowed_by,
            isbn: None,
            page_count: None,
            duration: None,
            format: None,
            narrator: None,
            created_at: core.created_at,
            updated_at: core.updated_at,
        };

        match item {
            MediaItem::Book(book) => {
                response.isbn = Some(book.isbn);
                response.page_count = Some(book.page_count.value());
            }
            MediaItem::Movie(movie) => {
                response.duration = Some(movie.duration.value());
                response.format = Some(movie.format);
            }
            MediaItem::AudioBook(audiobook) => {
                response.duration = Some(audiobook.duration.value());
                response.narrator = Some(audiobook.narrator);
            }
        }

        response
    }
}

/// 種別ごとの一覧レスポンス（GET /media）
#[derive(Debug, Serialize, Deserialize)]
pub struct MediaListResponse {
    pub books: Vec<MediaResponse>,
    pub movies: Vec<MediaResponse>,
    pub audiobooks: Vec<MediaResponse>,
}

impl From<MediaCatalog> for MediaListResponse {
    fn from(catalog: MediaCatalog) -> Self {
        Self {
            books: catalog.books.into_iter().map(MediaResponse::from).collect(),
            movies: catalog.movies.into_iter().map(MediaResponse::from).collect(),
            audiobooks: catalog
                .audiobooks
                .into_iter()
                .map(MediaResponse::from)
                .collect(),
        }
    }
}

/// 選択可能なアクション
#[derive(Debug, Serialize, Deserialize)]
pub struct ActionResponse {
    pub action: String,
    pub label: String,
}

impl From<MediaAction> for ActionResponse {
    fn from(action: MediaAction) -> Self {
        Self {
            action: action.as_str().to_string(),
            label: action.label().to_string(),
        }
    }
}

/// 詳細レスポンス（GET /media/:media_type/:id）
#[derive(Debug, Serialize, Deserialize)]
pub struct MediaDetailResponse {
    #[serde(flatten)]
    pub media: MediaResponse,
    pub available_actions: Vec<ActionResponse>,
}

impl From<MediaDetail> for MediaDetailResponse {
    fn from(detail: MediaDetail) -> Self {
        Self {
            media: MediaResponse::from(detail.item),
            available_actions: detail
                .available_actions
                .into_iter()
                .map(ActionResponse::from)
                .collect(),
        }
    }
}

/// アクション実行結果
#[derive(Debug, Serialize, Deserialize)]
pub struct ActionResultResponse {
    pub result: String,
}

/// エラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    /// 検証エラーの場合のみ、フィールドごとのメッセージ
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub fields: Option<BTreeMap<String, Vec<String>>>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            fields: None,
        }
    }

    pub fn validation(errors: ValidationErrors) -> Self {
        Self {
            error: "Validation failed".to_string(),
            fields: Some(errors.into_map()),
        }
    }
}
