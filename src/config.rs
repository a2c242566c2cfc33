use crate::error::{LedgerError, Result};
use product_ledger_common::ListName;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const STATE_DIR_ENV: &str = "PRODUCT_LEDGER_STATE_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 状態ファイルの保存先（未設定ならデータディレクトリ）
    pub state_dir: Option<PathBuf>,
    /// リスト指定を省略したときの対象
    pub default_list: ListName,
    /// 価格表示の通貨記号
    pub currency: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            state_dir: None,
            default_list: ListName::Main,
            currency: "TRY".into(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| LedgerError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("product-ledger").join("config.json"))
    }

    /// 実際に使う状態ディレクトリ
    ///
    /// 優先順位: 引数 > 環境変数 > 設定ファイル > データディレクトリ
    pub fn resolve_state_dir(&self, override_dir: Option<&Path>) -> Result<PathBuf> {
        if let Some(dir) = override_dir {
            return Ok(dir.to_path_buf());
        }

        if let Ok(dir) = std::env::var(STATE_DIR_ENV) {
            if !dir.trim().is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }

        if let Some(dir) = &self.state_dir {
            return Ok(dir.clone());
        }

        let data = dirs::data_dir()
            .ok_or_else(|| LedgerError::Config("データディレクトリが見つかりません".into()))?;
        Ok(data.join("product-ledger"))
    }

    pub fn set_state_dir(&mut self, dir: PathBuf) -> Result<()> {
        self.state_dir = Some(dir);
        self.save()
    }

    pub fn set_default_list(&mut self, list: ListName) -> Result<()> {
        self.default_list = list;
        self.save()
    }

    pub fn set_currency(&mut self, currency: String) -> Result<()> {
        self.currency = currency;
        self.save()
    }
}
