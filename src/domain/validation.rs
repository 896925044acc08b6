use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use super::{
    MediaType, Minutes, PageCount,
    media::{MediaDetails, NewMedia},
};

/// 入力フォームの生の値（フィールド名 → 文字列）
pub type RawFields = HashMap<String, String>;

pub const TITLE_MAX_LEN: usize = 200;
pub const CREATOR_MAX_LEN: usize = 100;
pub const ISBN_MAX_LEN: usize = 20;
pub const FORMAT_MAX_LEN: usize = 10;
pub const NARRATOR_MAX_LEN: usize = 100;

/// 出版日の入力形式
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const REQUIRED: &str = "This field is required.";
const INVALID_NUMBER: &str = "Enter a whole number.";
const NOT_POSITIVE: &str = "Ensure this value is greater than or equal to 1.";
const INVALID_DATE: &str = "Enter a valid date.";

/// フィールド単位の検証エラー
///
/// 最初のエラーで打ち切らず、すべてのエラーを収集する。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// 種別ごとの必須フィールドに従って入力を検証する
///
/// 共通フィールド（title, creator, publication_date）は常に必須。
/// 種別に関係のないフィールドは無視される。
///
/// # 戻り値
/// * 成功時は型の揃った`NewMedia`
/// * 失敗時はフィールド名をキーとしたエラーメッセージ一覧
pub fn validate_media(
    media_type: MediaType,
    fields: &RawFields,
) -> Result<NewMedia, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let title = text_field(fields, "title", TITLE_MAX_LEN, REQUIRED, &mut errors);
    let creator = text_field(fields, "creator", CREATOR_MAX_LEN, REQUIRED, &mut errors);
    let publication_date = date_field(fields, "publication_date", &mut errors);

    let details = match media_type {
        MediaType::Book => {
            let isbn = text_field(
                fields,
                "isbn",
                ISBN_MAX_LEN,
                "ISBN is required for books",
                &mut errors,
            );
            let page_count = count_field(
                fields,
                "page_count",
                "Page count is required for books",
                &mut errors,
            )
            .and_then(|n| PageCount::try_from(n).ok());

            isbn.zip(page_count)
                .map(|(isbn, page_count)| MediaDetails::Book { isbn, page_count })
        }
        MediaType::Movie => {
            let duration = count_field(
                fields,
                "duration",
                "Duration is required for movies",
                &mut errors,
            )
            .and_then(|n| Minutes::try_from(n).ok());
            let format = text_field(
                fields,
                "format",
                FORMAT_MAX_LEN,
                "Format is required for movies",
                &mut errors,
            );

            duration
                .zip(format)
                .map(|(duration, format)| MediaDetails::Movie { duration, format })
        }
        MediaType::AudioBook => {
            let narrator = text_field(
                fields,
                "narrator",
                NARRATOR_MAX_LEN,
                "Narrator is required for audiobooks",
                &mut errors,
            );
            let duration = count_field(
                fields,
                "duration",
                "Duration is required for audiobooks",
                &mut errors,
            )
            .and_then(|n| Minutes::try_from(n).ok());

            duration
                .zip(narrator)
                .map(|(duration, narrator)| MediaDetails::AudioBook { duration, narrator })
        }
    };

    match (title, creator, publication_date, details) {
        (Some(title), Some(creator), Some(publication_date), Some(details))
            if errors.is_empty() =>
        {
            Ok(NewMedia {
                title,
                creator,
                publication_date,
                details,
            })
        }
        _ => Err(errors),
    }
}

/// 前後の空白を除いた値。空文字は未入力として扱う。
fn raw_value<'a>(fields: &'a RawFields, name: &str) -> Option<&'a str> {
    fields
        .get(name)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

fn text_field(
    fields: &RawFields,
    name: &str,
    max_len: usize,
    missing_message: &str,
    errors: &mut ValidationErrors,
) -> Option<String> {
    let Some(value) = raw_value(fields, name) else {
        errors.add(name, missing_message);
        return None;
    };

    let len = value.chars().count();
    if len > max_len {
        errors.add(
            name,
            format!(
                "Ensure this value has at most {} characters (it has {}).",
                max_len, len
            ),
        );
        return None;
    }

    Some(value.to_string())
}

fn count_field(
    fields: &RawFields,
    name: &str,
    missing_message: &str,
    errors: &mut ValidationErrors,
) -> Option<i64> {
    let Some(value) = raw_value(fields, name) else {
        errors.add(name, missing_message);
        return None;
    };

    let Ok(number) = value.parse::<i64>() else {
        errors.add(name, INVALID_NUMBER);
        return None;
    };

    if number < 1 {
        errors.add(name, NOT_POSITIVE);
        return None;
    }

    // i32を超える値も整数として不正扱い
    if number > i64::from(i32::MAX) {
        errors.add(name, INVALID_NUMBER);
        return None;
    }

    Some(number)
}

fn date_field(
    fields: &RawFields,
    name: &str,
    errors: &mut ValidationErrors,
) -> Option<NaiveDate> {
    let Some(value) = raw_value(fields, name) else {
        errors.add(name, REQUIRED);
        return None;
    };

    match NaiveDate::parse_from_str(value, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            errors.add(name, INVALID_DATE);
            None
        }
    }
}
