#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UnknownMediaType;

/// メディアID - カタログ内の各レコードの識別子
///
/// 種別ごとのテーブル内で一意。生成はストレージ側で行う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MediaId(Uuid);

impl MediaId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for MediaId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MediaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// メディア種別（レコード形状のタグ）
///
/// カタログが扱う種別は固定の3種類のみ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Book,
    Movie,
    #[serde(rename = "audiobook")]
    AudioBook,
}

impl MediaType {
    pub const ALL: [MediaType; 3] = [MediaType::Book, MediaType::Movie, MediaType::AudioBook];

    /// タグ文字列（URLやAPIで使用）
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Book => "book",
            MediaType::Movie => "movie",
            MediaType::AudioBook => "audiobook",
        }
    }

    /// 表示用の名称
    pub fn label(&self) -> &'static str {
        match self {
            MediaType::Book => "Book",
            MediaType::Movie => "Movie",
            MediaType::AudioBook => "Audiobook",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MediaType {
    type Err = UnknownMediaType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "book" => Ok(MediaType::Book),
            "movie" => Ok(MediaType::Movie),
            "audiobook" => Ok(MediaType::AudioBook),
            other => Err(UnknownMediaType(other.to_string())),
        }
    }
}

/// 件数エラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountError {
    /// 1未満の値
    NotPositive,
    /// 表現可能な範囲外
    OutOfRange,
}

impl std::fmt::Display for CountError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CountError::NotPositive => f.write_str("value must be at least 1"),
            CountError::OutOfRange => f.write_str("value out of range"),
        }
    }
}

impl std::error::Error for CountError {}

/// ページ数
///
/// 不変条件：1以上。0や負の値は型として作成できない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct PageCount(u32);

impl PageCount {
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for PageCount {
    type Error = CountError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        positive_u32(value).map(Self)
    }
}

impl From<PageCount> for i64 {
    fn from(count: PageCount) -> Self {
        i64::from(count.0)
    }
}

impl std::fmt::Display for PageCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// 再生時間（分）
///
/// 不変条件：1以上。映画とオーディオブックで共通。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Minutes(u32);

impl Minutes {
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for Minutes {
    type Error = CountError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        positive_u32(value).map(Self)
    }
}

impl From<Minutes> for i64 {
    fn from(minutes: Minutes) -> Self {
        i64::from(minutes.0)
    }
}

impl std::fmt::Display for Minutes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

fn positive_u32(value: i64) -> Result<u32, CountError> {
    if value < 1 {
        return Err(CountError::NotPositive);
    }
    // Postgres INTEGER に収まる範囲に制限する
    if value > i64::from(i32::MAX) {
        return Err(CountError::OutOfRange);
    }
    Ok(value as u32)
}

/// 認証されていない呼び出し元の借り手名
pub const GUEST_BORROWER: &str = "Guest";

/// 借り手名の最大文字数（borrowerカラムの長さ）
pub const BORROWER_MAX_LEN: usize = 150;

/// 借り手 - 貸出を記録する呼び出し元の名前
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Borrower(String);

impl Borrower {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn guest() -> Self {
        Self(GUEST_BORROWER.to_string())
    }

    /// 呼び出し元の識別情報から借り手を決める
    ///
    /// 識別情報がない、または空白のみの場合はゲストとして扱う。
    /// 長すぎる名前は`BORROWER_MAX_LEN`文字で切り詰める。
    pub fn from_caller(caller: Option<&str>) -> Self {
        match caller.map(str::trim) {
            Some(name) if !name.is_empty() => {
                Self(name.chars().take(BORROWER_MAX_LEN).collect())
            }
            _ => Self::guest(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Borrower {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_media_id_creation() {
        let id1 = MediaId::new();
        let id2 = MediaId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_media_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = MediaId::from_uuid(uuid);
        assert_eq!(id.value(), uuid);
    }

    #[test]
    fn test_media_type_from_known_tags() {
        assert_eq!(MediaType::from_str("book"), Ok(MediaType::Book));
        assert_eq!(MediaType::from_str("movie"), Ok(MediaType::Movie));
        assert_eq!(MediaType::from_str("audiobook"), Ok(MediaType::AudioBook));
    }

    #[test]
    fn test_media_type_rejects_unknown_tags() {
        for tag in ["", "Book", "magazine", "audio_book", " book"] {
            let result = MediaType::from_str(tag);
            assert_eq!(result, Err(UnknownMediaType(tag.to_string())));
        }
    }

    #[test]
    fn test_media_type_tag_matches_serde_representation() {
        for media_type in MediaType::ALL {
            let json = serde_json::to_value(media_type).unwrap();
            assert_eq!(json, serde_json::json!(media_type.as_str()));
        }
    }

    #[test]
    fn test_page_count_must_be_positive() {
        assert_eq!(PageCount::try_from(0), Err(CountError::NotPositive));
        assert_eq!(PageCount::try_from(-3), Err(CountError::NotPositive));
        assert_eq!(PageCount::try_from(10).unwrap().value(), 10);
    }

    #[test]
    fn test_page_count_deserialization_enforces_invariant() {
        let result: Result<PageCount, _> = serde_json::from_value(serde_json::json!(0));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("value must be at least 1"));

        let count: PageCount = serde_json::from_value(serde_json::json!(12)).unwrap();
        assert_eq!(count.value(), 12);

        let result: Result<Minutes, _> = serde_json::from_value(serde_json::json!(-5));
        assert!(result.is_err());
    }

    #[test]
    fn test_minutes_rejects_out_of_range() {
        assert_eq!(Minutes::try_from(1).unwrap().value(), 1);
        assert_eq!(
            Minutes::try_from(i64::from(i32::MAX) + 1),
            Err(CountError::OutOfRange)
        );
    }

    #[test]
    fn test_borrower_falls_back_to_guest() {
        assert_eq!(Borrower::from_caller(None), Borrower::guest());
        assert_eq!(Borrower::from_caller(Some("   ")), Borrower::guest());
        assert_eq!(Borrower::from_caller(Some(" alice ")).as_str(), "alice");
    }

    #[test]
    fn test_borrower_name_is_truncated() {
        let long_name = "x".repeat(BORROWER_MAX_LEN + 20);
        let borrower = Borrower::from_caller(Some(&long_name));
        assert_eq!(borrower.as_str().chars().count(), BORROWER_MAX_LEN);
    }
}
