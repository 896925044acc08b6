/// 未知のメディア種別タグ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMediaType(pub String);

impl std::fmt::Display for UnknownMediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown media type: {}", self.0)
    }
}

impl std::error::Error for UnknownMediaType {}

/// 貸出のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BorrowError {
    /// 貸出できない種別（映画）
    NotBorrowable,
    /// 既に貸出中
    AlreadyBorrowed,
}
