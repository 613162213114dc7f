use clap::{Args, Parser, Subcommand};
use picsort_common::MatchingConfigOverrides;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "picsort")]
#[command(about = "ファイル名と作品・キャラクター単語リストの照合ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// ファイル名を単語リストと照合
    Match {
        /// 対象ファイルまたはフォルダ
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// 単語リストCSV（複数指定可、省略時は設定済みの振り分け先すべて）
        #[arg(short = 'w', long = "word-list")]
        word_lists: Vec<PathBuf>,

        /// サブフォルダも再帰的にスキャン
        #[arg(short = 'r', long)]
        recursive: bool,

        /// 出力形式 (text/json)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// 出力ファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        tuning: TuningArgs,
    },

    /// 設定済みの振り分け先のうちマッチするものを表示
    Route {
        /// 対象ファイルまたはフォルダ
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// サブフォルダも再帰的にスキャン
        #[arg(short = 'r', long)]
        recursive: bool,

        /// 出力形式 (text/json)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        #[command(flatten)]
        tuning: TuningArgs,
    },

    /// 文字列を正規化して表示
    Normalize {
        /// 正規化する文字列
        #[arg(required = true)]
        texts: Vec<String>,

        /// 入力をファイルパスとして扱い、ターゲット文字列を経由する
        #[arg(long)]
        path: bool,
    },

    /// 単語リストの内容と検索キーを表示
    Inspect {
        /// 単語リストCSV
        #[arg(required = true)]
        word_list: PathBuf,

        /// 出力形式 (text/json)
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// 設定を表示/編集
    Config {
        /// 振り分け先の単語リストを設定（例: 1=/path/to/list.csv）
        #[arg(long, value_name = "KEY=PATH")]
        set_destination: Option<String>,

        /// 振り分け先の単語リストを解除
        #[arg(long, value_name = "KEY")]
        clear_destination: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// 照合パラメータの一時上書き
#[derive(Args, Clone, Debug, Default)]
pub struct TuningArgs {
    /// 部分一致（ルールB）の最小キー長
    #[arg(long)]
    pub partial_min_len: Option<usize>,

    /// 伏せ字一致（ルールC）の最小キー長
    #[arg(long)]
    pub wildcard_min_len: Option<usize>,

    /// 伏せ字1文字あたりの許容文字数
    #[arg(long)]
    pub wildcard_k: Option<usize>,

    /// 候補の最大数
    #[arg(long)]
    pub max_candidates: Option<usize>,

    /// 候補とする最小スコア
    #[arg(long)]
    pub min_score: Option<f64>,

    /// 伏せ字一致を確定扱いにするスコア
    #[arg(long)]
    pub strong_score: Option<f64>,
}

impl TuningArgs {
    pub fn to_overrides(&self) -> MatchingConfigOverrides {
        MatchingConfigOverrides {
            partial_match_min_len: self.partial_min_len,
            wildcard_match_min_len: self.wildcard_min_len,
            wildcard_tolerance_k: self.wildcard_k,
            candidate_max_count: self.max_candidates,
            candidate_min_score: self.min_score,
            strong_candidate_score: self.strong_score,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
