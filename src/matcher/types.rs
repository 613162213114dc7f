use picsort_common::{MatchResult, MatchingConfig};
use serde::{Deserialize, Serialize};

/// 1つの単語リストに対する照合結果
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListReport {
    pub word_list: String,
    pub entry_count: usize,
    pub matched_count: usize,
    pub results: Vec<MatchResult>,
}

/// `picsort match` の出力
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
    pub generated_at: String,
    pub config: MatchingConfig,
    pub file_count: usize,
    pub lists: Vec<ListReport>,
}

/// 1ファイルの振り分け先判定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteEntry {
    pub file_path: String,
    /// マッチした振り分け先キー（キー順）
    pub destinations: Vec<String>,
}
