//! 照合ルールとスコア計算
//!
//! 各ルールは [`RuleFn`] として独立に評価でき、[`RULES`] の順に試して
//! 最初に成立したものがそのエンティティの結果になる。

use super::types::{MatchItem, MatchRule, MatchingConfig};
use crate::normalize::{has_mask, mask_to_regex, normalize, split_target_parts, strip_mask_tokens};
use crate::wordlist::WordListEntry;
use regex::Regex;
use std::collections::HashSet;

/// 長さボーナスが満点になるキー長
const LENGTH_BONUS_FULL_LEN: f64 = 12.0;
const NGRAM_WEIGHT: f64 = 0.7;
const LENGTH_WEIGHT: f64 = 0.3;

/// ルール評価結果
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Confirmed(MatchItem),
    Candidate(MatchItem),
}

impl Verdict {
    pub fn item(&self) -> &MatchItem {
        match self {
            Verdict::Confirmed(item) | Verdict::Candidate(item) => item,
        }
    }
}

/// 照合対象（1ファイル分の事前計算）
#[derive(Debug, Clone)]
pub struct MatchTarget {
    pub text: String,
    pub normalized: String,
    /// 正規化した親フォルダ名・ファイル名（全体と同じものは除く）
    components: Vec<String>,
    /// マスクトークンを除いた正規化文字列（ルールCのスコア用）
    unmasked: String,
    /// 伏せ字ワイルドカード（マスクがない、または構築失敗なら None）
    wildcard: Option<Regex>,
}

impl MatchTarget {
    /// ファイルパスから照合対象を作成
    pub fn from_path(file_path: &str, config: &MatchingConfig) -> Self {
        let (parent_folder, file_base_name) = split_target_parts(file_path);
        let text = if parent_folder.is_empty() {
            file_base_name.to_string()
        } else {
            format!("{} {}", parent_folder, file_base_name)
        };
        let components = [normalize(parent_folder), normalize(file_base_name)];
        Self::build(text, &components, config)
    }

    /// ターゲット文字列から直接作成
    pub fn from_text(text: &str, config: &MatchingConfig) -> Self {
        Self::build(text.to_string(), &[], config)
    }

    fn build(text: String, components: &[String], config: &MatchingConfig) -> Self {
        let normalized = normalize(&text);

        let mut parts: Vec<String> = Vec::new();
        for component in components {
            if !component.is_empty() && *component != normalized && !parts.contains(component) {
                parts.push(component.clone());
            }
        }

        let wildcard = if has_mask(&normalized) {
            mask_to_regex(&normalized, config.wildcard_tolerance_k)
        } else {
            None
        };

        Self {
            unmasked: strip_mask_tokens(&normalized),
            text,
            normalized,
            components: parts,
            wildcard,
        }
    }
}

/// ルール評価関数
pub type RuleFn = fn(&MatchTarget, &WordListEntry, &MatchingConfig) -> Option<Verdict>;

/// 評価順のルール一覧
pub const RULES: [(MatchRule, RuleFn); 4] = [
    (MatchRule::A, rule_exact),
    (MatchRule::B, rule_partial),
    (MatchRule::C, rule_wildcard),
    (MatchRule::D, rule_fuzzy),
];

/// ルールを順に評価し、最初に成立した結果を返す
pub fn evaluate_entry(
    target: &MatchTarget,
    entry: &WordListEntry,
    config: &MatchingConfig,
) -> Option<Verdict> {
    RULES.iter().find_map(|(_, rule)| rule(target, entry, config))
}

fn make_item(entry: &WordListEntry, key: &str, rule: MatchRule, score: f64) -> MatchItem {
    MatchItem {
        entity_id: entry.entity_id(),
        entity_type: entry.entity_type,
        canonical: entry.canonical.clone(),
        matched_key: entry.canonical.clone(),
        matched_key_normalized: key.to_string(),
        rule,
        score,
    }
}

/// ルールA: 完全一致
///
/// ターゲット全体との一致に加え、親フォルダ名・ファイル名との一致も認める。
/// ただしパスの構成要素との一致は、部分一致と同じ最小長以上のキーに限る。
pub fn rule_exact(target: &MatchTarget, entry: &WordListEntry, config: &MatchingConfig) -> Option<Verdict> {
    entry
        .search_keys_normalized
        .iter()
        .find(|key| {
            **key == target.normalized
                || (key.chars().count() >= config.partial_match_min_len && target.components.contains(*key))
        })
        .map(|key| Verdict::Confirmed(make_item(entry, key, MatchRule::A, 1.0)))
}

/// ルールB: 部分一致（短いキーは誤検出防止のため対象外）
///
/// 一意性は確認せず常に確定扱い。
pub fn rule_partial(target: &MatchTarget, entry: &WordListEntry, config: &MatchingConfig) -> Option<Verdict> {
    entry
        .search_keys_normalized
        .iter()
        .find(|key| key.chars().count() >= config.partial_match_min_len && target.normalized.contains(key.as_str()))
        .map(|key| {
            let score = score(&target.normalized, key);
            Verdict::Confirmed(make_item(entry, key, MatchRule::B, score))
        })
}

/// ルールC: 伏せ字ワイルドカード一致
pub fn rule_wildcard(target: &MatchTarget, entry: &WordListEntry, config: &MatchingConfig) -> Option<Verdict> {
    let wildcard = target.wildcard.as_ref()?;

    let key = entry
        .search_keys_normalized
        .iter()
        .find(|key| key.chars().count() >= config.wildcard_match_min_len && wildcard.is_match(key))?;

    let score = score(&target.unmasked, key);
    let item = make_item(entry, key, MatchRule::C, score);
    if score >= config.strong_candidate_score {
        Some(Verdict::Confirmed(item))
    } else {
        Some(Verdict::Candidate(item))
    }
}

/// ルールD: あいまい一致（候補のみ、確定にはしない）
pub fn rule_fuzzy(target: &MatchTarget, entry: &WordListEntry, config: &MatchingConfig) -> Option<Verdict> {
    let mut best: Option<(&String, f64)> = None;

    for key in &entry.search_keys_normalized {
        let s = score(&target.normalized, key);
        if best.map_or(true, |(_, best_score)| s > best_score) {
            best = Some((key, s));
        }
    }

    best.filter(|(_, s)| *s >= config.candidate_min_score)
        .map(|(key, s)| Verdict::Candidate(make_item(entry, key, MatchRule::D, s)))
}

/// 文字バイグラム集合
pub fn bigrams(text: &str) -> HashSet<(char, char)> {
    let chars: Vec<char> = text.chars().collect();
    chars.windows(2).map(|w| (w[0], w[1])).collect()
}

/// Jaccard係数（両方空なら1.0、片方だけ空なら0.0）
pub fn jaccard_similarity(a: &HashSet<(char, char)>, b: &HashSet<(char, char)>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

/// スコア = 0.7 × バイグラムJaccard + 0.3 × min(1, キー長/12)
pub fn score(target_normalized: &str, key_normalized: &str) -> f64 {
    let similarity = jaccard_similarity(&bigrams(target_normalized), &bigrams(key_normalized));
    let length_bonus = (key_normalized.chars().count() as f64 / LENGTH_BONUS_FULL_LEN).min(1.0);
    NGRAM_WEIGHT * similarity + LENGTH_WEIGHT * length_bonus
}
