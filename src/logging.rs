//! ログ初期化
//!
//! `RUST_LOG` があればそれを優先し、なければ `-v` の有無で
//! debug / warn を切り替える。出力は標準エラー。

use tracing_subscriber::EnvFilter;

pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // テストなどで二重初期化された場合は無視する
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
