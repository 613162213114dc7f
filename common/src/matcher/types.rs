//! 照合結果・照合設定の型定義

use crate::error::{Error, Result};
use crate::wordlist::EntityType;
use serde::{Deserialize, Serialize};

/// 照合ルール
///
/// A: 完全一致 / B: 部分一致 / C: 伏せ字ワイルドカード / D: あいまい一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchRule {
    A,
    B,
    C,
    D,
}

impl std::fmt::Display for MatchRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MatchRule::A => "A",
            MatchRule::B => "B",
            MatchRule::C => "C",
            MatchRule::D => "D",
        };
        f.write_str(name)
    }
}

/// 1エンティティの照合結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchItem {
    /// `"<type>:<canonical>"`
    pub entity_id: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub canonical: String,
    pub matched_key: String,
    pub matched_key_normalized: String,
    pub rule: MatchRule,
    /// 0.0〜1.0
    pub score: f64,
}

/// 1ファイルの照合結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub file_path: String,
    pub target_text: String,
    pub target_normalized: String,
    /// 確定（A / B / 強いC）。エントリ順
    pub confirmed: Vec<MatchItem>,
    /// 候補（C / D）。スコア降順、上位 `candidate_max_count` 件
    pub candidates: Vec<MatchItem>,
    pub matched: bool,
}

/// 照合設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchingConfig {
    /// ルールBで使う検索キーの最小長
    pub partial_match_min_len: usize,
    /// ルールCで使う検索キーの最小長
    pub wildcard_match_min_len: usize,
    /// 伏せ字1文字あたりの許容文字数
    pub wildcard_tolerance_k: usize,
    /// 候補の最大数
    pub candidate_max_count: usize,
    /// 候補とする最小スコア
    pub candidate_min_score: f64,
    /// ルールCを確定扱いにするスコア
    pub strong_candidate_score: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            partial_match_min_len: 4,
            wildcard_match_min_len: 6,
            wildcard_tolerance_k: 2,
            candidate_max_count: 5,
            candidate_min_score: 0.80,
            strong_candidate_score: 0.92,
        }
    }
}

/// 呼び出し側が上書きする設定値（未指定はベース設定のまま）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchingConfigOverrides {
    pub partial_match_min_len: Option<usize>,
    pub wildcard_match_min_len: Option<usize>,
    pub wildcard_tolerance_k: Option<usize>,
    pub candidate_max_count: Option<usize>,
    pub candidate_min_score: Option<f64>,
    pub strong_candidate_score: Option<f64>,
}

impl MatchingConfig {
    /// 上書き値をマージした設定を返す
    pub fn with_overrides(&self, overrides: &MatchingConfigOverrides) -> Self {
        Self {
            partial_match_min_len: overrides
                .partial_match_min_len
                .unwrap_or(self.partial_match_min_len),
            wildcard_match_min_len: overrides
                .wildcard_match_min_len
                .unwrap_or(self.wildcard_match_min_len),
            wildcard_tolerance_k: overrides
                .wildcard_tolerance_k
                .unwrap_or(self.wildcard_tolerance_k),
            candidate_max_count: overrides
                .candidate_max_count
                .unwrap_or(self.candidate_max_count),
            candidate_min_score: overrides
                .candidate_min_score
                .unwrap_or(self.candidate_min_score),
            strong_candidate_score: overrides
                .strong_candidate_score
                .unwrap_or(self.strong_candidate_score),
        }
    }

    /// JSON文字列から読み込み（未指定のキーはデフォルト値）
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// スコア閾値が 0.0〜1.0 の範囲にあるか検証
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("candidateMinScore", self.candidate_min_score),
            ("strongCandidateScore", self.strong_candidate_score),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::Config(format!("{} は 0.0〜1.0 で指定してください: {}", name, value)));
            }
        }
        Ok(())
    }
}
