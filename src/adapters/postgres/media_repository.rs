use crate::domain::{
    Borrower, MediaId, MediaType, Minutes, PageCount,
    media::{AudioBook, Book, MediaCore, MediaDetails, MediaItem, Movie, NewMedia},
};
use crate::ports::media_repository::{MediaRepository as MediaRepositoryTrait, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

/// 共通カラムをMediaCoreに変換する
fn map_row_to_core(row: &PgRow) -> MediaCore {
    MediaCore {
        media_id: MediaId::from_uuid(row.get("id")),
        title: row.get("title"),
        creator: row.get("creator"),
        publication_date: row.get("publication_date"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// INTEGERカラムを正の値オブジェクトに変換する
///
/// CHECK制約で保証されているが、制約のないDBに向けた場合に備えて検証する。
fn positive_column<T>(row: &PgRow, column: &str) -> Result<T>
where
    T: TryFrom<i64>,
{
    let value: i32 = row.get(column);
    T::try_from(i64::from(value)).map_err(|_| {
        Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("{} out of range: {}", column, value),
        )) as Box<dyn std::error::Error + Send + Sync>
    })
}

fn map_row_to_book(row: &PgRow) -> Result<MediaItem> {
    let page_count: PageCount = positive_column(row, "page_count")?;
    let borrower: Option<String> = row.get("borrower");

    Ok(MediaItem::Book(Book {
        core: map_row_to_core(row),
        isbn: row.get("isbn"),
        page_count,
        borrowed_by: borrower.map(Borrower::new),
    }))
}

fn map_row_to_movie(row: &PgRow) -> Result<MediaItem> {
    let duration: Minutes = positive_column(row, "duration")?;

    Ok(MediaItem::Movie(Movie {
        core: map_row_to_core(row),
        duration,
        format: row.get("format"),
    }))
}

fn map_row_to_audiobook(row: &PgRow) -> Result<MediaItem> {
    let duration: Minutes = positive_column(row, "duration")?;
    let borrower: Option<String> = row.get("borrower");

    Ok(MediaItem::AudioBook(AudioBook {
        core: map_row_to_core(row),
        duration,
        narrator: row.get("narrator"),
        borrowed_by: borrower.map(Borrower::new),
    }))
}

/// MediaRepositoryのPostgreSQL実装
///
/// 種別ごとに books / movies / audiobooks テーブルを使い分ける。
/// IDはデータベース側（gen_random_uuid）で生成する。
pub struct MediaRepository {
    pool: PgPool,
}

impl MediaRepository {
    /// PostgreSQLコネクションプールから新しいMediaRepositoryを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MediaRepositoryTrait for MediaRepository {
    /// 種別に応じたテーブルへINSERTし、生成されたIDを返す
    async fn create(&self, media: &NewMedia) -> Result<MediaId> {
        let id: uuid::Uuid = match &media.details {
            MediaDetails::Book { isbn, page_count } => {
                sqlx::query_scalar(
                    r#"
                    INSERT INTO books (title, creator, publication_date, isbn, page_count)
                    VALUES ($1, $2, $3, $4, $5)
                    RETURNING id
                    "#,
                )
                .bind(&media.title)
                .bind(&media.creator)
                .bind(media.publication_date)
                .bind(isbn)
                .bind(page_count.value() as i32)
                .fetch_one(&self.pool)
                .await?
            }
            MediaDetails::Movie { duration, format } => {
                sqlx::query_scalar(
                    r#"
                    INSERT INTO movies (title, creator, publication_date, duration, format)
                    VALUES ($1, $2, $3, $4, $5)
                    RETURNING id
                    "#,
                )
                .bind(&media.title)
                .bind(&media.creator)
                .bind(media.publication_date)
                .bind(duration.value() as i32)
                .bind(format)
                .fetch_one(&self.pool)
                .await?
            }
            MediaDetails::AudioBook { duration, narrator } => {
                sqlx::query_scalar(
                    r#"
                    INSERT INTO audiobooks (title, creator, publication_date, duration, narrator)
                    VALUES ($1, $2, $3, $4, $5)
                    RETURNING id
                    "#,
                )
                .bind(&media.title)
                .bind(&media.creator)
                .bind(media.publication_date)
                .bind(duration.value() as i32)
                .bind(narrator)
                .fetch_one(&self.pool)
                .await?
            }
        };

        Ok(MediaId::from_uuid(id))
    }

    async fn get(&self, media_type: MediaType, media_id: MediaId) -> Result<Option<MediaItem>> {
        match media_type {
            MediaType::Book => {
                let row = sqlx::query(
                    r#"
                    SELECT id, title, creator, publication_date, isbn, page_count,
                           borrower, created_at, updated_at
                    FROM books
                    WHERE id = $1
                    "#,
                )
                .bind(media_id.value())
                .fetch_optional(&self.pool)
                .await?;

                row.as_ref().map(map_row_to_book).transpose()
            }
            MediaType::Movie => {
                let row = sqlx::query(
                    r#"
                    SELECT id, title, creator, publication_date, duration, format,
                           created_at, updated_at
                    FROM movies
                    WHERE id = $1
                    "#,
                )
                .bind(media_id.value())
                .fetch_optional(&self.pool)
                .await?;

                row.as_ref().map(map_row_to_movie).transpose()
            }
            MediaType::AudioBook => {
                let row = sqlx::query(
                    r#"
                    SELECT id, title, creator, publication_date, duration, narrator,
                           borrower, created_at, updated_at
                    FROM audiobooks
                    WHERE id = $1
                    "#,
                )
                .bind(media_id.value())
                .fetch_optional(&self.pool)
                .await?;

                row.as_ref().map(map_row_to_audiobook).transpose()
            }
        }
    }

    async fn list(&self, media_type: MediaType) -> Result<Vec<MediaItem>> {
        match media_type {
            MediaType::Book => {
                let rows = sqlx::query(
                    r#"
                    SELECT id, title, creator, publication_date, isbn, page_count,
                           borrower, created_at, updated_at
                    FROM books
                    ORDER BY created_at ASC, id ASC
                    "#,
                )
                .fetch_all(&self.pool)
                .await?;

                rows.iter().map(map_row_to_book).collect()
            }
            MediaType::Movie => {
                let rows = sqlx::query(
                    r#"
                    SELECT id, title, creator, publication_date, duration, format,
                           created_at, updated_at
                    FROM movies
                    ORDER BY created_at ASC, id ASC
                    "#,
                )
                .fetch_all(&self.pool)
                .await?;

                rows.iter().map(map_row_to_movie).collect()
            }
            MediaType::AudioBook => {
                let rows = sqlx::query(
                    r#"
                    SELECT id, title, creator, publication_date, duration, narrator,
                           borrower, created_at, updated_at
                    FROM audiobooks
                    ORDER BY created_at ASC, id ASC
                    "#,
                )
                .fetch_all(&self.pool)
                .await?;

                rows.iter().map(map_row_to_audiobook).collect()
            }
        }
    }

    /// 貸出状態を保存（compare-and-set）
    ///
    /// `WHERE is_borrowed = FALSE` により、同時に貸出要求が来ても
    /// 先に更新した1件だけが反映される。
    async fn update_borrowed(&self, item: &MediaItem) -> Result<bool> {
        let Some(borrower) = item.borrowed_by() else {
            return Err("update_borrowed called without a borrower".into());
        };

        let query = match item {
            MediaItem::Book(_) => sqlx::query(
                r#"
                UPDATE books
                SET is_borrowed = TRUE, borrower = $2, updated_at = $3
                WHERE id = $1 AND is_borrowed = FALSE
                "#,
            ),
            MediaItem::AudioBook(_) => sqlx::query(
                r#"
                UPDATE audiobooks
                SET is_borrowed = TRUE, borrower = $2, updated_at = $3
                WHERE id = $1 AND is_borrowed = FALSE
                "#,
            ),
            MediaItem::Movie(_) => return Err("movies cannot be borrowed".into()),
        };

        let result = query
            .bind(item.media_id().value())
            .bind(borrower.as_str())
            .bind(item.core().updated_at)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }
}
