use thiserror::Error;

#[derive(Error, Debug)]
pub enum PicsortError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("対象ファイルが見つかりません: {0}")]
    NoFilesFound(String),

    #[error("単語リストが指定されていません。`-w LIST.csv` で指定するか `picsort config --set-destination 1=LIST.csv` で設定してください")]
    NoWordList,

    #[error("振り分け先の指定が不正です（KEY=PATH 形式）: {0}")]
    InvalidDestination(String),

    #[error("単語リストの読み込みに失敗: {0}")]
    WordList(#[from] picsort_common::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PicsortError>;
