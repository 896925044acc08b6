use serde::{Deserialize, Serialize};

use super::{MediaType, media::MediaItem};

/// 書籍のダウンロード要求に返す文言
pub const BOOK_DOWNLOAD_UNAVAILABLE: &str = "Books are not available for download";

/// オーディオブックの予告編要求に返す文言
pub const AUDIOBOOK_TRAILER_UNSUPPORTED: &str = "Audiobooks do not have trailers";

/// メディアに対して呼び出せるアクション
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaAction {
    Describe,
    Read,
    PlayTrailer,
    Borrow,
    Download,
}

impl MediaAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaAction::Describe => "describe",
            MediaAction::Read => "read",
            MediaAction::PlayTrailer => "play_trailer",
            MediaAction::Borrow => "borrow",
            MediaAction::Download => "download",
        }
    }

    /// 画面表示用のラベル
    pub fn label(&self) -> &'static str {
        match self {
            MediaAction::Describe => "Description",
            MediaAction::Read => "Read sample",
            MediaAction::PlayTrailer => "Watch trailer",
            MediaAction::Borrow => "Borrow",
            MediaAction::Download => "Download",
        }
    }
}

impl std::str::FromStr for MediaAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "describe" => Ok(MediaAction::Describe),
            "read" => Ok(MediaAction::Read),
            "play_trailer" => Ok(MediaAction::PlayTrailer),
            "borrow" => Ok(MediaAction::Borrow),
            "download" => Ok(MediaAction::Download),
            _ => Err(format!("Unknown action: {}", s)),
        }
    }
}

/// アクションテーブルの各エントリが実行する振る舞い
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Describe,
    ReadSample,
    PlayTrailer,
    Borrow,
    Download,
    /// 種別が対応していないアクションに固定の文言を返す
    Unavailable(&'static str),
}

const BOOK_ACTIONS: &[(MediaAction, Behavior)] = &[
    (MediaAction::Describe, Behavior::Describe),
    (MediaAction::Read, Behavior::ReadSample),
    (MediaAction::Borrow, Behavior::Borrow),
    (
        MediaAction::Download,
        Behavior::Unavailable(BOOK_DOWNLOAD_UNAVAILABLE),
    ),
];

const MOVIE_ACTIONS: &[(MediaAction, Behavior)] = &[
    (MediaAction::Describe, Behavior::Describe),
    (MediaAction::PlayTrailer, Behavior::PlayTrailer),
    (MediaAction::Download, Behavior::Download),
];

const AUDIOBOOK_ACTIONS: &[(MediaAction, Behavior)] = &[
    (MediaAction::Describe, Behavior::Describe),
    (MediaAction::Download, Behavior::Download),
    (MediaAction::Borrow, Behavior::Borrow),
    (
        MediaAction::PlayTrailer,
        Behavior::Unavailable(AUDIOBOOK_TRAILER_UNSUPPORTED),
    ),
];

/// 種別ごとのアクションテーブル
///
/// ディスパッチはこのテーブルのみを参照する。
pub fn action_table(media_type: MediaType) -> &'static [(MediaAction, Behavior)] {
    match media_type {
        MediaType::Book => BOOK_ACTIONS,
        MediaType::Movie => MOVIE_ACTIONS,
        MediaType::AudioBook => AUDIOBOOK_ACTIONS,
    }
}

/// アクション名をテーブルから解決する
///
/// テーブルにないアクション名、または未知の名前は`None`。
pub fn resolve_action(media_type: MediaType, action: &str) -> Option<(MediaAction, Behavior)> {
    let action: MediaAction = action.parse().ok()?;
    action_table(media_type)
        .iter()
        .find(|(candidate, _)| *candidate == action)
        .copied()
}

/// 種別が実際に備えている振る舞い
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub read_sample: bool,
    pub play_trailer: bool,
    pub borrow: bool,
    pub download: bool,
}

impl MediaType {
    pub fn capabilities(&self) -> Capabilities {
        match self {
            MediaType::Book => Capabilities {
                read_sample: true,
                play_trailer: false,
                borrow: true,
                download: false,
            },
            MediaType::Movie => Capabilities {
                read_sample: false,
                play_trailer: true,
                borrow: false,
                download: true,
            },
            MediaType::AudioBook => Capabilities {
                read_sample: false,
                play_trailer: false,
                borrow: true,
                download: true,
            },
        }
    }
}

/// 画面に表示するアクション一覧を計算する
///
/// describeは常に含む。borrowは貸出可能な種別かつ貸出中でない場合のみ。
pub fn available_actions(item: &MediaItem) -> Vec<MediaAction> {
    let capabilities = item.media_type().capabilities();
    let mut actions = vec![MediaAction::Describe];

    if capabilities.read_sample {
        actions.push(MediaAction::Read);
    }
    if capabilities.play_trailer {
        actions.push(MediaAction::PlayTrailer);
    }
    if capabilities.borrow && !item.is_borrowed() {
        actions.push(MediaAction::Borrow);
    }
    if capabilities.download {
        actions.push(MediaAction::Download);
    }

    actions
}
