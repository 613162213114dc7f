//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use picsort_rust::config::{self, Config};
use picsort_rust::error::PicsortError;
use picsort_rust::scanner;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// 存在しないフォルダをスキャンした場合
#[test]
fn test_scan_nonexistent_folder() {
    let result = scanner::scan_folder(Path::new("/nonexistent/path/12345"), false);
    assert!(result.is_err());

    let err = result.unwrap_err();
    assert!(matches!(err, PicsortError::FolderNotFound(_)));
}

/// 空のフォルダをスキャンした場合
#[test]
fn test_scan_empty_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = scanner::scan_folder(dir.path(), true);

    assert!(result.is_ok());
    assert!(result.unwrap().is_empty());
}

/// 画像・動画のないフォルダをスキャンした場合
#[test]
fn test_scan_folder_no_media() {
    let dir = tempdir().expect("Failed to create temp dir");

    std::fs::write(dir.path().join("test.txt"), "hello").unwrap();
    std::fs::write(dir.path().join("list.csv"), "鈴木花子").unwrap();

    let result = scanner::scan_folder(dir.path(), false);
    assert!(result.unwrap().is_empty());
}

/// 存在しないパスを照合対象に指定した場合
#[test]
fn test_collect_targets_missing_path() {
    let result = scanner::collect_targets(&[PathBuf::from("/nonexistent/IMG_001.jpg")], false);
    assert!(matches!(result, Err(PicsortError::FileNotFound(_))));
}

/// 存在しない単語リストを読み込んだ場合
#[test]
fn test_read_missing_word_list() {
    let result = config::read_word_list(Path::new("/nonexistent/list.csv"));
    assert!(matches!(result, Err(PicsortError::FileNotFound(_))));
}

/// 壊れた設定ファイル
#[test]
fn test_broken_config_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();

    let result = Config::load_from(&path);
    assert!(matches!(result, Err(PicsortError::JsonParse(_))));
}

/// PicsortErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        PicsortError::Config("テスト設定エラー".to_string()),
        PicsortError::FileNotFound("test.jpg".to_string()),
        PicsortError::FolderNotFound("/path/to/folder".to_string()),
        PicsortError::NoFilesFound("photos".to_string()),
        PicsortError::NoWordList,
        PicsortError::InvalidDestination("x".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// NoWordListエラーのメッセージ確認
#[test]
fn test_no_word_list_message() {
    let display = format!("{}", PicsortError::NoWordList);

    assert!(display.contains("単語リスト"));
    assert!(display.contains("picsort config"));
}

/// エラーのDebug実装確認
#[test]
fn test_error_debug() {
    let err = PicsortError::Config("テスト".to_string());
    let debug = format!("{:?}", err);

    assert!(debug.contains("Config"));
    assert!(debug.contains("テスト"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: PicsortError = io_err.into();

    assert!(matches!(err, PicsortError::Io(_)));
    assert!(format!("{}", err).contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: PicsortError = json_err.into();

    assert!(matches!(err, PicsortError::JsonParse(_)));
}

/// picsort_common::Errorからの変換
#[test]
fn test_common_error_conversion() {
    let common_err = picsort_common::Error::Config("スコア範囲外".to_string());
    let err: PicsortError = common_err.into();

    assert!(matches!(err, PicsortError::WordList(_)));
    assert!(format!("{}", err).contains("スコア範囲外"));
}
