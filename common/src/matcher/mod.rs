//! マッチングエンジン
//!
//! ファイルパスと単語リストを照合し、確定マッチと候補マッチを返す。
//! 状態を持たないため、複数ファイルの照合はそれぞれ独立に並列実行できる。

pub mod rules;
pub mod types;

pub use rules::{evaluate_entry, score, MatchTarget, Verdict, RULES};
pub use types::{MatchItem, MatchResult, MatchRule, MatchingConfig, MatchingConfigOverrides};

use crate::wordlist::WordList;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// ファイルと単語リストを照合
pub fn match_file(file_path: &str, word_list: &WordList, config: &MatchingConfig) -> MatchResult {
    let target = MatchTarget::from_path(file_path, config);
    match_prepared(file_path, target, word_list, config)
}

/// ターゲット文字列を直接照合（パスを経由しない）
pub fn match_target(target_text: &str, word_list: &WordList, config: &MatchingConfig) -> MatchResult {
    let target = MatchTarget::from_text(target_text, config);
    match_prepared(target_text, target, word_list, config)
}

fn match_prepared(
    file_path: &str,
    target: MatchTarget,
    word_list: &WordList,
    config: &MatchingConfig,
) -> MatchResult {
    let mut confirmed = Vec::new();
    let mut candidates = Vec::new();

    for entry in &word_list.entries {
        match evaluate_entry(&target, entry, config) {
            Some(Verdict::Confirmed(item)) => confirmed.push(item),
            Some(Verdict::Candidate(item)) => candidates.push(item),
            None => {}
        }
    }

    let candidates = rank_candidates(candidates, config.candidate_max_count);

    debug!(
        file = file_path,
        normalized = %target.normalized,
        list = %word_list.file_name,
        confirmed = confirmed.len(),
        candidates = candidates.len(),
        "matched"
    );

    MatchResult {
        file_path: file_path.to_string(),
        target_text: target.text,
        target_normalized: target.normalized,
        matched: !confirmed.is_empty(),
        confirmed,
        candidates,
    }
}

/// 候補をスコア降順に並べ、上位 `max_count` 件に絞る（同点は元の順序）
pub fn rank_candidates(mut candidates: Vec<MatchItem>, max_count: usize) -> Vec<MatchItem> {
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    candidates.truncate(max_count);
    candidates
}

/// 複数ファイルを一括照合（入力順を保持）
pub fn match_files<S>(file_paths: &[S], word_list: &WordList, config: &MatchingConfig) -> Vec<MatchResult>
where
    S: AsRef<str> + Sync,
{
    #[cfg(feature = "parallel")]
    let results = file_paths
        .par_iter()
        .map(|path| match_file(path.as_ref(), word_list, config))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let results = file_paths
        .iter()
        .map(|path| match_file(path.as_ref(), word_list, config))
        .collect();

    results
}

/// ファイルが単語リストにマッチするか（デフォルト設定）
pub fn is_file_matching(file_path: &str, word_list: &WordList) -> bool {
    match_file(file_path, word_list, &MatchingConfig::default()).matched
}

/// 複数の単語リストのうちマッチするもののキーを返す（デフォルト設定）
pub fn find_matching_word_lists(
    file_path: &str,
    word_lists: &BTreeMap<String, Option<WordList>>,
) -> Vec<String> {
    find_matching_word_lists_with_config(file_path, word_lists, &MatchingConfig::default())
}

/// 複数の単語リストのうちマッチするもののキーを返す
///
/// 未設定（`None`）のキーは対象外。結果はキー順。
pub fn find_matching_word_lists_with_config(
    file_path: &str,
    word_lists: &BTreeMap<String, Option<WordList>>,
    config: &MatchingConfig,
) -> Vec<String> {
    word_lists
        .iter()
        .filter_map(|(key, list)| list.as_ref().map(|l| (key, l)))
        .filter(|(_, list)| match_file(file_path, list, config).matched)
        .map(|(key, _)| key.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wordlist::{parse_word_list, EntityType, WordListEntry};

    const HANAKO_CSV: &str = "鈴木花子,Hanako Suzuki\n";

    fn hanako_list() -> WordList {
        parse_word_list(HANAKO_CSV, "hanako.csv")
    }

    fn item_with_score(name: &str, score: f64) -> MatchItem {
        MatchItem {
            entity_id: format!("character:{}", name),
            entity_type: EntityType::Character,
            canonical: name.to_string(),
            matched_key: name.to_string(),
            matched_key_normalized: name.to_lowercase(),
            rule: MatchRule::D,
            score,
        }
    }

    #[test]
    fn test_match_file_exact_folder() {
        let result = match_file("/photos/鈴木花子/IMG_001.jpg", &hanako_list(), &MatchingConfig::default());
        assert_eq!(result.target_text, "鈴木花子 IMG_001");
        assert!(result.matched);
        assert_eq!(result.confirmed.len(), 1);

        let item = &result.confirmed[0];
        assert_eq!(item.rule, MatchRule::A);
        assert_eq!(item.score, 1.0);
        assert_eq!(item.canonical, "鈴木花子");
        assert_eq!(item.entity_id, "character:鈴木花子");
    }

    #[test]
    fn test_match_file_plain_letters_not_masked() {
        let result = match_file(
            "/photos/folder/Suzuki_Hanako_oo_photo.jpg",
            &hanako_list(),
            &MatchingConfig::default(),
        );
        assert_eq!(result.target_normalized, "foldersuzukihanakooophoto");
        assert!(!crate::normalize::has_mask(&result.target_normalized));
        assert_eq!(result.confirmed.len(), 1);
        assert_eq!(result.confirmed[0].rule, MatchRule::B);
        assert_eq!(result.confirmed[0].matched_key_normalized, "hanako");
    }

    #[test]
    fn test_match_file_circle_masks() {
        let result = match_file(
            "/photos/folder/Suzuki_Hanako_○○_photo.jpg",
            &hanako_list(),
            &MatchingConfig::default(),
        );
        assert_eq!(
            result.target_normalized,
            "foldersuzukihanako<MASK:1><MASK:1>photo"
        );
        // 部分一致がワイルドカードより優先
        assert_eq!(result.confirmed[0].rule, MatchRule::B);
    }

    #[test]
    fn test_match_file_no_match() {
        let result = match_file("/photos/misc/DSC0001.jpg", &hanako_list(), &MatchingConfig::default());
        assert!(!result.matched);
        assert!(result.confirmed.is_empty());
        assert!(result.candidates.is_empty());
    }

    #[test]
    fn test_match_target_wildcard_candidate() {
        let list = WordList {
            file_name: "w.csv".into(),
            entries: vec![WordListEntry::new(
                EntityType::Character,
                "鈴木花子",
                vec!["HanakoSuzuki".into()],
            )],
        };
        let result = match_target("hana○○suzuki", &list, &MatchingConfig::default());
        assert!(!result.matched);
        assert_eq!(result.candidates.len(), 1);
        assert_eq!(result.candidates[0].rule, MatchRule::C);
    }

    #[test]
    fn test_match_entity_contributes_once() {
        // 複数キーがヒットしても1エンティティ1件
        let list = parse_word_list("鈴木花子,Hanako Suzuki,,Hanako|Suzuki Hanako", "x.csv");
        let result = match_target("hanako suzuki hanako", &list, &MatchingConfig::default());
        assert_eq!(result.confirmed.len() + result.candidates.len(), 1);
    }

    #[test]
    fn test_confirmed_keep_entry_order() {
        let list = parse_word_list("@work,Love Live,ラブライブ\n鈴木花子,Hanako Suzuki\n", "x.csv");
        let result = match_file("/ラブライブ/hanako_01.png", &list, &MatchingConfig::default());
        let canonicals: Vec<&str> = result.confirmed.iter().map(|i| i.canonical.as_str()).collect();
        assert_eq!(canonicals, vec!["Love Live", "鈴木花子"]);
        assert_eq!(result.confirmed[0].entity_type, EntityType::Work);
    }

    #[test]
    fn test_rank_candidates() {
        let candidates = vec![
            item_with_score("a", 0.95),
            item_with_score("b", 0.81),
            item_with_score("c", 0.99),
        ];
        let ranked = rank_candidates(candidates.clone(), 5);
        let scores: Vec<f64> = ranked.iter().map(|i| i.score).collect();
        assert_eq!(scores, vec![0.99, 0.95, 0.81]);

        let truncated = rank_candidates(candidates, 2);
        let names: Vec<&str> = truncated.iter().map(|i| i.canonical.as_str()).collect();
        assert_eq!(names, vec!["c", "a"]);
    }

    #[test]
    fn test_match_files_preserves_order() {
        let paths = vec![
            "/a/鈴木花子/1.jpg".to_string(),
            "/a/misc/2.jpg".to_string(),
            "/a/b/hanako.jpg".to_string(),
        ];
        let results = match_files(&paths, &hanako_list(), &MatchingConfig::default());
        let matched: Vec<bool> = results.iter().map(|r| r.matched).collect();
        assert_eq!(matched, vec![true, false, true]);
        assert_eq!(results[1].file_path, "/a/misc/2.jpg");
    }

    #[test]
    fn test_is_file_matching() {
        assert!(is_file_matching("/x/Hanako Suzuki.jpg", &hanako_list()));
        assert!(!is_file_matching("/x/other.jpg", &hanako_list()));
    }

    #[test]
    fn test_find_matching_word_lists() {
        let mut lists = BTreeMap::new();
        lists.insert("2".to_string(), Some(parse_word_list("佐藤,Sato Taro", "sato.csv")));
        lists.insert("1".to_string(), Some(hanako_list()));
        lists.insert("3".to_string(), None);
        lists.insert("4".to_string(), Some(hanako_list()));

        let keys = find_matching_word_lists("/photos/鈴木花子/IMG_001.jpg", &lists);
        assert_eq!(keys, vec!["1", "4"]);
    }
}
