//! 正規化エンジン
//!
//! ファイル名・単語リストの文字列を比較可能な形に揃える。
//!
//! ## 処理順序
//! 1. 伏せ字の保護（マスクトークン化）
//! 2. NFKC正規化
//! 3. 小文字化
//! 4. ひらがな→カタカナ
//! 5. 区切り文字→スペース
//! 6. 装飾記号削除
//! 7. 連続空白→1つ、その後空白全削除
//!
//! 最後にNFCで再合成し、結果が変わらなくなるまで1〜7を繰り返す。
//!
//! 伏せ字は `<MASK:N>` トークンとして出力に残る。2〜7はトークン以外の
//! 部分（[`Segment::Literal`]）にだけ適用されるため、トークンが分解されることはない。

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

// =========================
// 1) 伏せ字（保護対象）
// =========================

/// 1文字で伏せ字長1として扱う記号
const MASK_SINGLE_CHARS: &[char] = &['〇', '◯', '○', '●', '*', '?'];

/// 連続アンダースコア・連続x/Xをマスクとみなす最小長
const MASK_RUN_MIN_LEN: usize = 2;

const MASK_TOKEN_PREFIX: &str = "<MASK:";
const MASK_TOKEN_SUFFIX: &str = ">";

/// 初回以降に正規化を繰り返す上限回数
const MAX_EXTRA_PASSES: usize = 4;

/// ワイルドカード正規表現のコンパイル後サイズ上限
const WILDCARD_REGEX_SIZE_LIMIT: usize = 2 * (1 << 20);

lazy_static! {
    static ref MASK_TOKEN_RE: Regex = Regex::new(r"<MASK:(\d+)>").unwrap();
    static ref MASK_TOKEN_HEAD_RE: Regex = Regex::new(r"^<MASK:(\d+)>").unwrap();
}

// =========================
// 2) 区切り文字（スペース化）
// =========================

const SEPARATOR_CHARS: &[char] = &[
    // 空白
    ' ', '\u{3000}',
    // ハイフン・ダッシュ・マイナス
    '-', '‐', '\u{2011}', '‒', '–', '—', '―', '−',
    // 中黒・ビュレット
    '・', '･', '·', '•',
    // スラッシュ・バックスラッシュ
    '/', '／', '\\', '＼',
    // パイプ
    '|', '｜', '¦',
    // 読点・カンマ
    ',', '，', '、',
    // 句点・ピリオド
    '.', '．', '。',
    // コロン・セミコロン
    ':', '：', ';', '；',
    // チルダ・波ダッシュ
    '~', '〜', '～',
    // 連結記号
    '+', '＋', '=', '＝',
    // タグ記号
    '#', '＃', '@', '＠',
    '&', '＆',
    // 感嘆符・疑問符（ASCIIの ? は伏せ字保護で先に消費される）
    '!', '！', '‼', '?', '？',
    // 伏せ字保護で消費されなかった単独の _
    '_',
];

// =========================
// 3) 装飾記号（削除）
// =========================

const DECORATION_CHARS: &[char] = &[
    // 半角括弧
    '(', ')', '[', ']', '{', '}', '<', '>',
    // 全角括弧
    '（', '）', '［', '］', '｛', '｝', '＜', '＞',
    // 鉤括弧など
    '「', '」', '『', '』', '【', '】', '〔', '〕', '〈', '〉', '《', '》', '〖', '〗',
    // 引用符
    '"', '“', '”', '\'', '‘', '’', '＂', '＇',
    // その他
    '※', '★', '☆', '♪', '♯', '♭', '◆', '◇', '■', '□',
];

/// 正規化オプション
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeOptions {
    /// マスクトークンを保持する
    ///
    /// トークンは常に保持されるため、この値は結果に影響しない。
    pub keep_mask_tokens: bool,
}

/// マスクトークンで区切られた正規化途中の文字列
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// 通常の文字列
    Literal(String),
    /// 伏せ字（元の文字数）
    Mask(usize),
}

/// 伏せ字トークン文字列を生成
pub fn make_mask_token(len: usize) -> String {
    format!("{}{}{}", MASK_TOKEN_PREFIX, len, MASK_TOKEN_SUFFIX)
}

/// 文字列を正規化する（デフォルトオプション）
///
/// # Examples
/// ```
/// use picsort_common::normalize;
///
/// assert_eq!(normalize("Grace Howard"), "gracehoward");
/// assert_eq!(normalize("file__name"), "file<MASK:2>name");
/// ```
pub fn normalize(text: &str) -> String {
    normalize_with_options(text, &NormalizeOptions::default())
}

/// 文字列を正規化する
pub fn normalize_with_options(text: &str, options: &NormalizeOptions) -> String {
    // keep_mask_tokens に関わらずトークンは保持する
    let _ = options.keep_mask_tokens;

    // 結果が変わらなくなるまで繰り返す
    let mut current = normalize_pass(text);
    for _ in 0..MAX_EXTRA_PASSES {
        let next = normalize_pass(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn normalize_pass(text: &str) -> String {
    let mut segments = Vec::new();
    for segment in tokenize_masks(text) {
        match segment {
            Segment::Literal(literal) => {
                let normalized = normalize_literal(&literal);
                // 正規化で新たに現れた伏せ字（ｘｘ → xx など）も保護する
                segments.extend(tokenize_masks(&normalized));
            }
            mask => segments.push(mask),
        }
    }

    render_segments(&segments)
}

/// 伏せ字を検出してトークン列に分解する（処理順序1）
///
/// 既に `<MASK:N>` 形式になっているトークンもそのまま伏せ字として扱う。
pub fn tokenize_masks(text: &str) -> Vec<Segment> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut i = 0;

    while i < chars.len() {
        let (offset, c) = chars[i];

        if c == '<' {
            if let Some(caps) = MASK_TOKEN_HEAD_RE.captures(&text[offset..]) {
                if let Some(len) = caps[1].parse::<usize>().ok().filter(|&n| n > 0) {
                    flush_literal(&mut segments, &mut literal);
                    segments.push(Segment::Mask(len));
                    // トークンはASCIIのみなのでバイト数 = 文字数
                    i += caps[0].len();
                    continue;
                }
            }
        }

        if c == '_' || c == 'x' || c == 'X' {
            let run = chars[i..]
                .iter()
                .take_while(|(_, r)| is_same_run(c, *r))
                .count();
            if run >= MASK_RUN_MIN_LEN {
                flush_literal(&mut segments, &mut literal);
                segments.push(Segment::Mask(run));
                i += run;
                continue;
            }
        }

        if MASK_SINGLE_CHARS.contains(&c) {
            flush_literal(&mut segments, &mut literal);
            segments.push(Segment::Mask(1));
        } else {
            literal.push(c);
        }
        i += 1;
    }

    flush_literal(&mut segments, &mut literal);
    segments
}

/// トークン列を文字列に戻す
pub fn render_segments(segments: &[Segment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Literal(s) => out.push_str(s),
            Segment::Mask(len) => out.push_str(&make_mask_token(*len)),
        }
    }
    out
}

fn flush_literal(segments: &mut Vec<Segment>, literal: &mut String) {
    if !literal.is_empty() {
        segments.push(Segment::Literal(std::mem::take(literal)));
    }
}

fn is_same_run(head: char, c: char) -> bool {
    if head == '_' {
        c == '_'
    } else {
        c == 'x' || c == 'X'
    }
}

/// トークン以外の部分に処理順序2〜7を適用
fn normalize_literal(text: &str) -> String {
    let folded: String = text.nfkc().collect();
    let lowered = folded.to_lowercase();
    let katakana = hiragana_to_katakana(&lowered);

    let mut replaced = String::with_capacity(katakana.len());
    for c in katakana.chars() {
        if SEPARATOR_CHARS.contains(&c) {
            replaced.push(' ');
        } else if !DECORATION_CHARS.contains(&c) {
            replaced.push(c);
        }
    }

    let collapsed = replaced.split_whitespace().collect::<Vec<_>>().join(" ");
    let joined: String = collapsed.chars().filter(|c| !c.is_whitespace()).collect();

    // 結合文字を再合成（カ + U+3099 → ガ）
    joined.nfc().collect()
}

/// ひらがな→カタカナ（U+3041〜U+3096 を +0x60）
pub fn hiragana_to_katakana(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{3041}'..='\u{3096}' => char::from_u32(c as u32 + 0x60).unwrap_or(c),
            _ => c,
        })
        .collect()
}

/// ターゲット文字列を生成する
///
/// `"<親フォルダ名> <拡張子なしファイル名>"`。親フォルダがなければファイル名のみ。
pub fn create_target_text(file_path: &str) -> String {
    let (parent_folder, file_base_name) = split_target_parts(file_path);
    if parent_folder.is_empty() {
        file_base_name.to_string()
    } else {
        format!("{} {}", parent_folder, file_base_name)
    }
}

/// パスから（親フォルダ名, 拡張子なしファイル名）を取り出す
pub fn split_target_parts(file_path: &str) -> (&str, &str) {
    let parts: Vec<&str> = file_path.split(['/', '\\']).collect();
    let file_name = parts.last().copied().unwrap_or("");
    let parent_folder = if parts.len() >= 2 { parts[parts.len() - 2] } else { "" };
    (parent_folder, strip_extension(file_name))
}

/// 末尾の `.拡張子` を除去（拡張子は1文字以上）
fn strip_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(pos) if pos + 1 < file_name.len() => &file_name[..pos],
        _ => file_name,
    }
}

/// 正規化済み文字列にマスクトークンが含まれるか
pub fn has_mask(normalized_text: &str) -> bool {
    MASK_TOKEN_RE.is_match(normalized_text)
}

/// マスクトークンを取り除く
pub fn strip_mask_tokens(normalized_text: &str) -> String {
    MASK_TOKEN_RE.replace_all(normalized_text, "").into_owned()
}

/// 伏せ字を含む正規化済み文字列をワイルドカード正規表現に変換
///
/// `<MASK:N>` は `.{0,N*k}` になり、全体は前後アンカー付き・大文字小文字無視。
/// マスクを含まない場合、または構築に失敗した場合は `None`。
pub fn mask_to_regex(normalized_text: &str, k: usize) -> Option<Regex> {
    if !has_mask(normalized_text) {
        return None;
    }

    let mut pattern = String::from("^");
    let mut last = 0;
    for caps in MASK_TOKEN_RE.captures_iter(normalized_text) {
        let token = caps.get(0)?;
        pattern.push_str(&regex::escape(&normalized_text[last..token.start()]));

        let mask_len: usize = caps[1].parse().ok()?;
        let max_len = mask_len.checked_mul(k)?;
        pattern.push_str(&format!(".{{0,{}}}", max_len));

        last = token.end();
    }
    pattern.push_str(&regex::escape(&normalized_text[last..]));
    pattern.push('$');

    match RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .size_limit(WILDCARD_REGEX_SIZE_LIMIT)
        .build()
    {
        Ok(re) => Some(re),
        Err(e) => {
            debug!(pattern = %pattern, error = %e, "wildcard pattern rejected");
            None
        }
    }
}
