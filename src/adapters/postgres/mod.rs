pub mod media_repository;

// パブリックに型を再エクスポート
pub use media_repository::MediaRepository as PostgresMediaRepository;
