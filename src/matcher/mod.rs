//! 照合の一括実行とレポート整形

pub mod types;

pub use types::{ListReport, MatchReport, RouteEntry};

use picsort_common::{
    find_matching_word_lists_with_config, match_files, MatchResult, MatchingConfig, WordList,
};
use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::PathBuf;
use tracing::info;

/// パスを照合用の文字列に変換
pub fn path_strings(paths: &[PathBuf]) -> Vec<String> {
    paths.iter().map(|p| p.to_string_lossy().to_string()).collect()
}

/// 全ファイルを各単語リストと照合してレポートを作成
pub fn build_report(files: &[String], lists: &[WordList], config: &MatchingConfig) -> MatchReport {
    let lists = lists
        .iter()
        .map(|list| {
            let results = match_files(files, list, config);
            let matched_count = results.iter().filter(|r| r.matched).count();
            info!(
                list = %list.file_name,
                files = files.len(),
                matched = matched_count,
                "word list matched"
            );
            ListReport {
                word_list: list.file_name.clone(),
                entry_count: list.len(),
                matched_count,
                results,
            }
        })
        .collect();

    MatchReport {
        generated_at: chrono::Local::now().to_rfc3339(),
        config: config.clone(),
        file_count: files.len(),
        lists,
    }
}

/// 各ファイルがどの振り分け先にマッチするかを判定
pub fn route_files(
    files: &[String],
    lists: &BTreeMap<String, Option<WordList>>,
    config: &MatchingConfig,
) -> Vec<RouteEntry> {
    files
        .iter()
        .map(|file| RouteEntry {
            file_path: file.clone(),
            destinations: find_matching_word_lists_with_config(file, lists, config),
        })
        .collect()
}

/// 1ファイル分の結果を人間向けに整形
pub fn format_result(result: &MatchResult) -> String {
    let mut out = String::new();
    let mark = if result.matched { "✔" } else { "-" };
    let _ = writeln!(out, "{} {}", mark, result.file_path);
    let _ = writeln!(out, "    対象: {} → {}", result.target_text, result.target_normalized);

    for item in &result.confirmed {
        let _ = writeln!(
            out,
            "    確定 [{}] {} ({}) key={} score={:.3}",
            item.rule, item.canonical, item.entity_type, item.matched_key_normalized, item.score
        );
    }
    for item in &result.candidates {
        let _ = writeln!(
            out,
            "    候補 [{}] {} ({}) key={} score={:.3}",
            item.rule, item.canonical, item.entity_type, item.matched_key_normalized, item.score
        );
    }
    out
}

/// レポート全体を人間向けに整形
pub fn format_report(report: &MatchReport) -> String {
    let mut out = String::new();
    for list in &report.lists {
        let _ = writeln!(
            out,
            "📋 {} ({}件): {}/{} ファイルがマッチ",
            list.word_list, list.entry_count, list.matched_count, report.file_count
        );
        for result in &list.results {
            if result.matched || !result.candidates.is_empty() {
                out.push_str(&format_result(result));
            }
        }
        out.push('\n');
    }
    out
}

/// 振り分け結果を人間向けに整形
pub fn format_routes(routes: &[RouteEntry]) -> String {
    let mut out = String::new();
    for route in routes {
        let dests = if route.destinations.is_empty() {
            "(なし)".to_string()
        } else {
            route.destinations.join(", ")
        };
        let _ = writeln!(out, "{} → {}", route.file_path, dests);
    }
    out
}
