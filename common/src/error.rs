//! エラー型定義
//!
//! マッチングエンジン自体は失敗しない。ここで扱うのは単語リストの
//! ファイル読み込みと設定JSONの読み込みに伴うエラーのみ。

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
