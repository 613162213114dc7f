use crate::error::{PicsortError, Result};
use picsort_common::{load_word_list, MatchingConfig, WordList};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// 振り分け先キーの既定数（"1"〜"5"）
const DEFAULT_DESTINATION_COUNT: usize = 5;

/// 設定ファイルの場所を上書きする環境変数
const CONFIG_PATH_ENV: &str = "PICSORT_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// 照合パラメータ
    pub matching: MatchingConfig,
    /// 振り分け先キー → 単語リストCSVのパス
    pub destinations: BTreeMap<String, Option<PathBuf>>,
}

impl Default for Config {
    fn default() -> Self {
        let destinations = (1..=DEFAULT_DESTINATION_COUNT)
            .map(|i| (i.to_string(), None))
            .collect();

        Self {
            matching: MatchingConfig::default(),
            destinations,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// 指定パスから読み込み（ファイルがなければデフォルト値）
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config
            .matching
            .validate()
            .map_err(|e| PicsortError::Config(e.to_string()))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        // 環境変数を優先
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let home = dirs::home_dir()
            .ok_or_else(|| PicsortError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("picsort").join("config.json"))
    }

    /// `KEY=PATH` 形式で振り分け先を設定
    pub fn set_destination(&mut self, assignment: &str) -> Result<()> {
        let (key, path) = assignment
            .split_once('=')
            .map(|(k, p)| (k.trim(), p.trim()))
            .filter(|(k, p)| !k.is_empty() && !p.is_empty())
            .ok_or_else(|| PicsortError::InvalidDestination(assignment.to_string()))?;

        self.destinations.insert(key.to_string(), Some(PathBuf::from(path)));
        Ok(())
    }

    /// 振り分け先を解除（キー自体は残す）
    pub fn clear_destination(&mut self, key: &str) -> Result<()> {
        match self.destinations.get_mut(key) {
            Some(slot) => {
                *slot = None;
                Ok(())
            }
            None => Err(PicsortError::InvalidDestination(key.to_string())),
        }
    }

    pub fn has_destinations(&self) -> bool {
        self.destinations.values().any(|p| p.is_some())
    }

    /// 振り分け先ごとの単語リストを読み込む（未設定は `None`）
    pub fn load_destination_lists(&self) -> Result<BTreeMap<String, Option<WordList>>> {
        let mut lists = BTreeMap::new();
        for (key, path) in &self.destinations {
            let list = match path {
                Some(path) => Some(read_word_list(path)?),
                None => None,
            };
            lists.insert(key.clone(), list);
        }
        Ok(lists)
    }
}

/// 単語リストCSVを読み込む
pub fn read_word_list(path: &Path) -> Result<WordList> {
    if !path.exists() {
        return Err(PicsortError::FileNotFound(path.display().to_string()));
    }
    Ok(load_word_list(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_default_when_missing() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();

        assert_eq!(config.destinations.len(), 5);
        assert!(config.destinations.values().all(|v| v.is_none()));
        assert_eq!(config.matching, MatchingConfig::default());
        assert!(!config.has_destinations());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.set_destination("1=/lists/chars.csv").unwrap();
        config.matching.candidate_max_count = 3;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(
            loaded.destinations.get("1"),
            Some(&Some(PathBuf::from("/lists/chars.csv")))
        );
    }

    #[test]
    fn test_partial_matching_section() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"matching": {"wildcardToleranceK": 3}}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.matching.wildcard_tolerance_k, 3);
        assert_eq!(config.matching.partial_match_min_len, 4);
        assert_eq!(config.destinations.len(), 5);
    }

    #[test]
    fn test_invalid_score_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"matching": {"candidateMinScore": -1}}"#).unwrap();

        assert!(matches!(Config::load_from(&path), Err(PicsortError::Config(_))));
    }

    #[test]
    fn test_set_destination_invalid() {
        let mut config = Config::default();
        assert!(matches!(
            config.set_destination("no-equals"),
            Err(PicsortError::InvalidDestination(_))
        ));
        assert!(config.set_destination("=path").is_err());
    }

    #[test]
    fn test_clear_destination() {
        let mut config = Config::default();
        config.set_destination("2=a.csv").unwrap();
        config.clear_destination("2").unwrap();
        assert_eq!(config.destinations.get("2"), Some(&None));
        assert!(config.clear_destination("9").is_err());
    }

    #[test]
    fn test_load_destination_lists() {
        let dir = tempdir().unwrap();
        let csv = dir.path().join("chars.csv");
        std::fs::write(&csv, "鈴木花子,Hanako Suzuki\n").unwrap();

        let mut config = Config::default();
        config.set_destination(&format!("1={}", csv.display())).unwrap();

        let lists = config.load_destination_lists().unwrap();
        assert_eq!(lists.len(), 5);
        assert_eq!(lists["1"].as_ref().map(|l| l.len()), Some(1));
        assert!(lists["2"].is_none());
    }

    #[test]
    fn test_load_destination_lists_missing_file() {
        let mut config = Config::default();
        config.set_destination("1=/nonexistent/list.csv").unwrap();
        assert!(matches!(
            config.load_destination_lists(),
            Err(PicsortError::FileNotFound(_))
        ));
    }
}
