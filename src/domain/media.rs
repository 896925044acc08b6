use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{BorrowError, Borrower, MediaId, MediaType, Minutes, PageCount};

// ============================================================================
// 新規作成用の入力
// ============================================================================

/// 種別固有のフィールド（検証済み）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "media_type", rename_all = "lowercase")]
pub enum MediaDetails {
    Book {
        isbn: String,
        page_count: PageCount,
    },
    Movie {
        duration: Minutes,
        format: String,
    },
    #[serde(rename = "audiobook")]
    AudioBook {
        duration: Minutes,
        narrator: String,
    },
}

impl MediaDetails {
    pub fn media_type(&self) -> MediaType {
        match self {
            MediaDetails::Book { .. } => MediaType::Book,
            MediaDetails::Movie { .. } => MediaType::Movie,
            MediaDetails::AudioBook { .. } => MediaType::AudioBook,
        }
    }
}

/// 永続化前の新しいメディア
///
/// 検証ルールを通過した値からのみ作られる。
/// 共通フィールドは空でないことが保証されている。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMedia {
    pub title: String,
    pub creator: String,
    pub publication_date: NaiveDate,
    #[serde(flatten)]
    pub details: MediaDetails,
}

impl NewMedia {
    pub fn media_type(&self) -> MediaType {
        self.details.media_type()
    }
}

// ============================================================================
// 永続化されたレコード
// ============================================================================

/// すべてのメディアで共有されるコアデータ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaCore {
    pub media_id: MediaId,
    pub title: String,
    pub creator: String,
    pub publication_date: NaiveDate,

    // 監査情報
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 書籍
///
/// 試し読みと貸出が可能。ダウンロードは不可。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(flatten)]
    pub core: MediaCore,
    pub isbn: String,
    pub page_count: PageCount,
    pub borrowed_by: Option<Borrower>,
}

impl std::ops::Deref for Book {
    type Target = MediaCore;

    fn deref(&self) -> &Self::Target {
        &self.core
    }
}

/// 映画
///
/// 予告編の再生とダウンロードが可能。貸出は不可。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(flatten)]
    pub core: MediaCore,
    pub duration: Minutes,
    pub format: String,
}

impl std::ops::Deref for Movie {
    type Target = MediaCore;

    fn deref(&self) -> &Self::Target {
        &self.core
    }
}

/// オーディオブック
///
/// ダウンロードと貸出が可能。予告編はない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioBook {
    #[serde(flatten)]
    pub core: MediaCore,
    pub duration: Minutes,
    pub narrator: String,
    pub borrowed_by: Option<Borrower>,
}

impl std::ops::Deref for AudioBook {
    type Target = MediaCore;

    fn deref(&self) -> &Self::Target {
        &self.core
    }
}

/// メディアレコードの統合型
///
/// 閉じた列挙型として3種類のみを表現する。
/// 種別ごとの振る舞いはパターンマッチで分岐する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "media_type", rename_all = "lowercase")]
pub enum MediaItem {
    Book(Book),
    Movie(Movie),
    #[serde(rename = "audiobook")]
    AudioBook(AudioBook),
}

impl MediaItem {
    /// 新しいメディアとストレージが割り当てたIDからレコードを組み立てる
    pub fn from_new(media_id: MediaId, media: NewMedia, created_at: DateTime<Utc>) -> Self {
        let core = MediaCore {
            media_id,
            title: media.title,
            creator: media.creator,
            publication_date: media.publication_date,
            created_at,
            updated_at: created_at,
        };

        match media.details {
            MediaDetails::Book { isbn, page_count } => MediaItem::Book(Book {
                core,
                isbn,
                page_count,
                borrowed_by: None,
            }),
            MediaDetails::Movie { duration, format } => MediaItem::Movie(Movie {
                core,
                duration,
                format,
            }),
            MediaDetails::AudioBook { duration, narrator } => MediaItem::AudioBook(AudioBook {
                core,
                duration,
                narrator,
                borrowed_by: None,
            }),
        }
    }

    pub fn media_type(&self) -> MediaType {
        match self {
            MediaItem::Book(_) => MediaType::Book,
            MediaItem::Movie(_) => MediaType::Movie,
            MediaItem::AudioBook(_) => MediaType::AudioBook,
        }
    }

    pub fn core(&self) -> &MediaCore {
        match self {
            MediaItem::Book(book) => &book.core,
            MediaItem::Movie(movie) => &movie.core,
            MediaItem::AudioBook(audiobook) => &audiobook.core,
        }
    }

    pub fn media_id(&self) -> MediaId {
        self.core().media_id
    }

    pub fn title(&self) -> &str {
        &self.core().title
    }

    pub fn borrowed_by(&self) -> Option<&Borrower> {
        match self {
            MediaItem::Book(book) => book.borrowed_by.as_ref(),
            MediaItem::Movie(_) => None,
            MediaItem::AudioBook(audiobook) => audiobook.borrowed_by.as_ref(),
        }
    }

    /// 貸出中かどうか（借り手が記録されている場合のみtrue）
    pub fn is_borrowed(&self) -> bool {
        self.borrowed_by().is_some()
    }

    /// 説明文
    ///
    /// 可変な状態（貸出状況など）は含めない。同じレコードに対しては常に同じ文字列を返す。
    pub fn describe(&self) -> String {
        match self {
            MediaItem::Book(book) => format!(
                "Book \"{}\" by {}, published {}. ISBN {}, {} pages.",
                book.title, book.creator, book.publication_date, book.isbn, book.page_count
            ),
            MediaItem::Movie(movie) => format!(
                "Movie \"{}\" directed by {}, released {}. {} minutes, {} format.",
                movie.title, movie.creator, movie.publication_date, movie.duration, movie.format
            ),
            MediaItem::AudioBook(audiobook) => format!(
                "Audiobook \"{}\" by {}, published {}. Narrated by {}, {} minutes.",
                audiobook.title,
                audiobook.creator,
                audiobook.publication_date,
                audiobook.narrator,
                audiobook.duration
            ),
        }
    }

    /// 試し読み（書籍のみ）
    pub fn read_sample(&self) -> Option<String> {
        match self {
            MediaItem::Book(book) => Some(format!(
                "Sample from \"{}\" by {}: the opening pages of a {}-page book.",
                book.title, book.creator, book.page_count
            )),
            _ => None,
        }
    }

    /// 予告編の再生（映画のみ）
    pub fn play_trailer(&self) -> Option<String> {
        match self {
            MediaItem::Movie(movie) => Some(format!(
                "Playing trailer for \"{}\" ({} min, {}).",
                movie.title, movie.duration, movie.format
            )),
            _ => None,
        }
    }

    /// ダウンロードの確認（映画・オーディオブックのみ）
    ///
    /// 状態は変更しない。
    pub fn download(&self) -> Option<String> {
        match self {
            MediaItem::Book(_) => None,
            MediaItem::Movie(movie) => Some(format!(
                "Download of \"{}\" ({}) has started.",
                movie.title, movie.format
            )),
            MediaItem::AudioBook(audiobook) => Some(format!(
                "Download of audiobook \"{}\" narrated by {} has started.",
                audiobook.title, audiobook.narrator
            )),
        }
    }
}

/// 純粋関数：メディアを貸し出す
///
/// ビジネスルール：
/// - 書籍とオーディオブックのみ貸出可能
/// - 貸出中のアイテムは貸出不可（先に貸し出した側が優先）
///
/// 副作用なし。借り手を記録した新しいレコードを返す。
pub fn borrow(
    item: MediaItem,
    borrower: Borrower,
    borrowed_at: DateTime<Utc>,
) -> Result<MediaItem, BorrowError> {
    if item.is_borrowed() {
        return Err(BorrowError::AlreadyBorrowed);
    }

    match item {
        MediaItem::Book(book) => Ok(MediaItem::Book(Book {
            core: MediaCore {
                updated_at: borrowed_at,
                ..book.core
            },
            borrowed_by: Some(borrower),
            ..book
        })),
        MediaItem::AudioBook(audiobook) => Ok(MediaItem::AudioBook(AudioBook {
            core: MediaCore {
                updated_at: borrowed_at,
                ..audiobook.core
            },
            borrowed_by: Some(borrower),
            ..audiobook
        })),
        MediaItem::Movie(_) => Err(BorrowError::NotBorrowable),
    }
}

/// 貸出確認メッセージ
pub fn borrow_confirmation(item: &MediaItem, borrower: &Borrower) -> String {
    format!("\"{}\" has been borrowed by {}.", item.title(), borrower)
}
