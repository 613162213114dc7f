//! picsort CLI ライブラリ
//!
//! フォルダの走査・単語リストの読み込み・設定管理を行い、
//! 照合そのものは `picsort-common` に委ねる。

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod matcher;
pub mod scanner;
