//! 単語リストモジュール
//!
//! 作品名・キャラクター名とその別名を記述したCSVを読み込み、
//! 照合用の正規化済み検索キーを事前に計算する。
//!
//! フォーマット:
//! ```text
//! @work,作品名,英語名,別名1,別名2
//! 日本語名,英語名,中国語名,aliases
//! キャラ1,Char1,角色1,alias1|alias2
//! キャラ2,Char2,角色2,alias3
//! ```

use crate::normalize::normalize;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 作品行の先頭フィールド
const WORK_MARKER: &str = "@work";

/// 複数単語の別名から単語を検索キーにする最小長
const MIN_WORD_LENGTH: usize = 4;

/// 別名を単語に分割する区切り文字
const WORD_SEPARATORS: &[char] = &['\u{3000}', '・', '•', '-', '－', '‐'];

/// ヘッダー行とみなすキーワード
const HEADER_KEYWORDS: &[&str] = &["日本語", "英語", "中国語", "aliases", "name"];

/// エンティティ種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Work,
    Character,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Work => "work",
            EntityType::Character => "character",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 単語リストの1エンティティ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordListEntry {
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub canonical: String,
    pub aliases: Vec<String>,
    pub canonical_normalized: String,
    pub aliases_normalized: Vec<String>,
    /// 正規化名・正規化別名・別名の構成単語（重複なし、空文字なし）
    pub search_keys_normalized: Vec<String>,
}

impl WordListEntry {
    /// 正規化済み検索キーを計算してエントリを作成
    pub fn new(entity_type: EntityType, canonical: &str, aliases: Vec<String>) -> Self {
        let canonical_normalized = normalize(canonical);
        let aliases_normalized: Vec<String> = aliases.iter().map(|a| normalize(a)).collect();

        let mut search_keys: Vec<String> = Vec::new();
        let mut add_key = |key: String| {
            if !key.is_empty() && !search_keys.contains(&key) {
                search_keys.push(key);
            }
        };

        add_key(canonical_normalized.clone());
        for alias in &aliases_normalized {
            add_key(alias.clone());
        }

        // "Grace Howard" → gracehoward, grace, howard
        for alias in &aliases {
            let words: Vec<&str> = alias
                .split(|c: char| c.is_whitespace() || WORD_SEPARATORS.contains(&c))
                .filter(|w| !w.is_empty())
                .collect();
            if words.len() > 1 {
                for word in words {
                    let normalized_word = normalize(word);
                    if normalized_word.chars().count() >= MIN_WORD_LENGTH {
                        add_key(normalized_word);
                    }
                }
            }
        }

        Self {
            entity_type,
            canonical: canonical.to_string(),
            aliases,
            canonical_normalized,
            aliases_normalized,
            search_keys_normalized: search_keys,
        }
    }

    /// `"<type>:<canonical>"`
    pub fn entity_id(&self) -> String {
        format!("{}:{}", self.entity_type, self.canonical)
    }
}

/// 単語リスト
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordList {
    pub file_name: String,
    pub entries: Vec<WordListEntry>,
}

impl WordList {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 指定種別のエントリのみ
    pub fn entries_of(&self, entity_type: EntityType) -> impl Iterator<Item = &WordListEntry> {
        self.entries.iter().filter(move |e| e.entity_type == entity_type)
    }
}

/// CSVテキストをパースしてWordListを生成
///
/// 不正な行・空行は読み飛ばし、エラーにはしない。
///
/// # Examples
/// ```
/// use picsort_common::{parse_word_list, EntityType};
///
/// let list = parse_word_list("@work,ラブライブ,Love Live\n鈴木花子,Hanako Suzuki", "list.csv");
/// assert_eq!(list.entries.len(), 2);
/// assert_eq!(list.entries[0].entity_type, EntityType::Work);
/// ```
pub fn parse_word_list(source_text: &str, file_name: &str) -> WordList {
    let source_text = source_text.strip_prefix('\u{feff}').unwrap_or(source_text);

    let mut entries = Vec::new();
    let mut header_found = false;

    for (line_no, line) in source_text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields = parse_csv_line(line);

        // @work 行は作品名
        if fields[0] == WORK_MARKER {
            match fields.get(1).filter(|c| !c.is_empty()) {
                Some(canonical) => {
                    let aliases = fields[2..].iter().filter(|a| !a.is_empty()).cloned().collect();
                    entries.push(WordListEntry::new(EntityType::Work, canonical, aliases));
                }
                None => debug!(file = file_name, line = line_no + 1, "work row without name skipped"),
            }
            continue;
        }

        // ヘッダー行は1回だけスキップ
        if !header_found && is_header_line(line) {
            header_found = true;
            continue;
        }

        // キャラクター行
        if fields[0].is_empty() {
            debug!(file = file_name, line = line_no + 1, "character row without name skipped");
            continue;
        }

        let mut aliases = Vec::new();

        // 英語名・中国語名
        for field in fields.iter().skip(1).take(2) {
            if !field.is_empty() {
                aliases.push(field.clone());
            }
        }

        // aliases列（パイプ区切り）
        if let Some(extra) = fields.get(3) {
            aliases.extend(
                extra
                    .split('|')
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .map(String::from),
            );
        }

        entries.push(WordListEntry::new(EntityType::Character, &fields[0], aliases));
    }

    debug!(file = file_name, entries = entries.len(), "word list parsed");

    WordList {
        file_name: file_name.to_string(),
        entries,
    }
}

/// ファイルから単語リストを読み込む（非WASM環境のみ）
///
/// `file_name` にはパスのファイル名部分を使う。
#[cfg(not(feature = "wasm"))]
pub fn load_word_list(path: &std::path::Path) -> crate::error::Result<WordList> {
    let content = std::fs::read_to_string(path)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    Ok(parse_word_list(&content, &file_name))
}

/// CSV行をパース（`,` と `，` 区切り、ダブルクォートと `""` エスケープ対応）
///
/// 戻り値は常に1要素以上。
pub fn parse_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' | '，' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }

    fields.push(current.trim().to_string());
    fields
}

/// ヘッダー行かどうか判定
fn is_header_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    HEADER_KEYWORDS.iter().any(|k| lower.contains(k))
}
