use serde::{Deserialize, Serialize};

use super::MediaId;

/// アクション名が省略された場合の既定値
pub const DEFAULT_ACTION: &str = "describe";

/// コマンド：メディアに対してアクションを実行する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformAction {
    pub media_type: String,
    pub media_id: MediaId,
    pub action: String,
    /// 呼び出し元の識別情報（borrowでのみ使用）
    pub caller: Option<String>,
}
