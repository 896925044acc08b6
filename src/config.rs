use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/media_catalog";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// 起動時設定のエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// ストレージの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

/// 環境変数から読み込むアプリケーション設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub max_connections: u32,
    pub storage: StorageBackend,
}

impl Config {
    /// プロセスの環境変数から読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 任意の参照関数から読み込む（テスト用に環境変数を差し替えられる）
    ///
    /// - DATABASE_URL: 接続先（既定 postgres://localhost/media_catalog）
    /// - PORT: 待ち受けポート（既定 3000）
    /// - DATABASE_MAX_CONNECTIONS: コネクションプールの上限（既定 5）
    /// - MEDIA_STORAGE: postgres | memory（既定 postgres）
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let port = parse_or("PORT", lookup("PORT"), DEFAULT_PORT)?;
        let max_connections = parse_or(
            "DATABASE_MAX_CONNECTIONS",
            lookup("DATABASE_MAX_CONNECTIONS"),
            DEFAULT_MAX_CONNECTIONS,
        )?;

        let storage = match lookup("MEDIA_STORAGE").as_deref() {
            None | Some("postgres") => StorageBackend::Postgres,
            Some("memory") => StorageBackend::Memory,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    name: "MEDIA_STORAGE",
                    value: other.to_string(),
                });
            }
        };

        Ok(Self {
            database_url,
            port,
            max_connections,
            storage,
        })
    }

    /// 待ち受けアドレス
    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
    }
}
