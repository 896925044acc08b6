use crate::domain::{
    media::{MediaItem, NewMedia},
    value_objects::{MediaId, MediaType},
};
use async_trait::async_trait;

#[allow(dead_code)]
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// メディアリポジトリポート
///
/// 種別ごとのテーブルへの永続化を抽象化する。
/// IDはストレージ側で生成され、種別テーブル内で一意。
#[async_trait]
pub trait MediaRepository: Send + Sync {
    /// 新しいメディアを保存し、生成されたIDを返す
    async fn create(&self, media: &NewMedia) -> Result<MediaId>;

    /// 種別とIDでメディアを取得する
    ///
    /// 種別が一致しない場合も`None`を返す。
    async fn get(&self, media_type: MediaType, media_id: MediaId) -> Result<Option<MediaItem>>;

    /// 種別ごとの全メディアを作成順に取得する
    async fn list(&self, media_type: MediaType) -> Result<Vec<MediaItem>>;

    /// 貸出状態を保存する（compare-and-set）
    ///
    /// 保存済みのレコードがまだ貸出中でない場合のみ、借り手と更新日時を書き込む。
    /// 既に他の呼び出しが貸し出していた場合は`false`を返す。
    async fn update_borrowed(&self, item: &MediaItem) -> Result<bool>;
}
