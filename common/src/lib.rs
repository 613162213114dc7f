//! picsort Common Library
//!
//! ファイル名と単語リスト（作品名・キャラクター名）の照合エンジン。
//! CLIとUI側で共有される。
//!
//! - [`normalize`]: 伏せ字を保護しつつ文字列を比較可能な形に正規化
//! - [`wordlist`]: 単語リストCSVのパースと検索キーの事前計算
//! - [`matcher`]: ルールA〜Dによる照合

pub mod error;
pub mod matcher;
pub mod normalize;
pub mod wordlist;

pub use error::{Error, Result};
pub use matcher::{
    find_matching_word_lists, find_matching_word_lists_with_config, is_file_matching, match_file,
    match_files, match_target, MatchItem, MatchResult, MatchRule, MatchingConfig,
    MatchingConfigOverrides,
};
pub use normalize::{
    create_target_text, has_mask, mask_to_regex, normalize, normalize_with_options, NormalizeOptions,
};
#[cfg(not(feature = "wasm"))]
pub use wordlist::load_word_list;
pub use wordlist::{parse_word_list, EntityType, WordList, WordListEntry};
