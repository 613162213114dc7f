use clap::Parser;
use indicatif::ProgressBar;
use picsort_common::{create_target_text, normalize, MatchingConfig, WordList};
use picsort_rust::{cli, config, error, logging, matcher, scanner};
use cli::{Cli, Commands, OutputFormat, TuningArgs};
use config::Config;
use error::Result;
use std::path::{Path, PathBuf};
use std::time::Duration;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Match { paths, word_lists, recursive, format, output, tuning } => {
            let matching = tuned_matching(&config, &tuning)?;
            let lists = if word_lists.is_empty() {
                config
                    .load_destination_lists()?
                    .into_values()
                    .flatten()
                    .collect::<Vec<WordList>>()
            } else {
                word_lists
                    .iter()
                    .map(|p| config::read_word_list(p))
                    .collect::<Result<Vec<_>>>()?
            };
            if lists.is_empty() {
                return Err(error::PicsortError::NoWordList);
            }

            let files = collect_files(&paths, recursive)?;
            let report = with_spinner(files.len(), || matcher::build_report(&files, &lists, &matching));

            let rendered = match format {
                OutputFormat::Json => serde_json::to_string_pretty(&report)?,
                OutputFormat::Text => matcher::format_report(&report),
            };
            write_output(&rendered, output.as_deref())?;
        }

        Commands::Route { paths, recursive, format, tuning } => {
            if !config.has_destinations() {
                return Err(error::PicsortError::NoWordList);
            }
            let matching = tuned_matching(&config, &tuning)?;
            let lists = config.load_destination_lists()?;

            let files = collect_files(&paths, recursive)?;
            let routes = with_spinner(files.len(), || matcher::route_files(&files, &lists, &matching));

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&routes)?),
                OutputFormat::Text => print!("{}", matcher::format_routes(&routes)),
            }
        }

        Commands::Normalize { texts, path } => {
            for text in texts {
                if path {
                    let target = create_target_text(&text);
                    println!("{}\t{}\t{}", text, target, normalize(&target));
                } else {
                    println!("{}\t{}", text, normalize(&text));
                }
            }
        }

        Commands::Inspect { word_list, format } => {
            let list = config::read_word_list(&word_list)?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&list)?),
                OutputFormat::Text => {
                    println!("📋 {} ({}件)\n", list.file_name, list.len());
                    for entry in &list.entries {
                        println!("[{}] {}", entry.entity_type, entry.canonical);
                        if !entry.aliases.is_empty() {
                            println!("    別名: {}", entry.aliases.join(" / "));
                        }
                        println!("    検索キー: {}", entry.search_keys_normalized.join(", "));
                    }
                }
            }
        }

        Commands::Config { set_destination, clear_destination, show } => {
            let mut config = config;

            if let Some(assignment) = set_destination {
                config.set_destination(&assignment)?;
                config.save()?;
                println!("✔ 振り分け先を設定しました: {}", assignment);
            }

            if let Some(key) = clear_destination {
                config.clear_destination(&key)?;
                config.save()?;
                println!("✔ 振り分け先を解除しました: {}", key);
            }

            if show {
                print_config(&config);
            }
        }
    }

    Ok(())
}

/// 設定値にコマンドラインの上書きを適用
fn tuned_matching(config: &Config, tuning: &TuningArgs) -> Result<MatchingConfig> {
    let matching = config.matching.with_overrides(&tuning.to_overrides());
    matching
        .validate()
        .map_err(|e| error::PicsortError::Config(e.to_string()))?;
    Ok(matching)
}

fn collect_files(paths: &[PathBuf], recursive: bool) -> Result<Vec<String>> {
    let files = scanner::collect_targets(paths, recursive)?;
    if files.is_empty() {
        let joined = paths.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ");
        return Err(error::PicsortError::NoFilesFound(joined));
    }
    Ok(matcher::path_strings(&files))
}

fn with_spinner<T>(count: usize, f: impl FnOnce() -> T) -> T {
    let spinner = ProgressBar::new_spinner();
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("{}件のファイルを照合中...", count));
    let result = f();
    spinner.finish_and_clear();
    result
}

fn write_output(rendered: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, rendered)?;
            eprintln!("✔ 結果を保存: {}", path.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

fn print_config(config: &Config) {
    let MatchingConfig {
        partial_match_min_len,
        wildcard_match_min_len,
        wildcard_tolerance_k,
        candidate_max_count,
        candidate_min_score,
        strong_candidate_score,
    } = &config.matching;

    println!("設定:");
    println!("  部分一致の最小長: {}", partial_match_min_len);
    println!("  伏せ字一致の最小長: {}", wildcard_match_min_len);
    println!("  伏せ字許容量 k: {}", wildcard_tolerance_k);
    println!("  候補最大数: {}", candidate_max_count);
    println!("  候補最小スコア: {:.2}", candidate_min_score);
    println!("  強候補スコア: {:.2}", strong_candidate_score);
    println!("  振り分け先:");
    for (key, path) in &config.destinations {
        match path {
            Some(path) => println!("    {}: {}", key, path.display()),
            None => println!("    {}: 未設定", key),
        }
    }
}
