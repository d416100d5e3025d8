use crate::config::{validate_provider, DEFAULT_INPUT_FILE, DEFAULT_WORKDIR};
use crate::core::ConfigProvider;
use crate::domain::model::{Denylist, FieldNames};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{validate_unique, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub input: InputConfig,
    pub fields: FieldNames,
    pub filter: FilterConfig,
    pub output: OutputConfig,
    #[serde(skip)]
    denylist: Denylist,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub workdir: String,
    pub file: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            workdir: DEFAULT_WORKDIR.to_string(),
            file: DEFAULT_INPUT_FILE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Replaces the built-in denylist when present.
    pub drop: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub package_changes: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let mut config: TomlConfig =
            toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;
        config.refresh_denylist();
        Ok(config)
    }

    /// 替換環境變數 (例如 ${CI_WORKSPACE})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn refresh_denylist(&mut self) {
        self.denylist = match &self.filter.drop {
            Some(drop) => Denylist::new(drop.iter().cloned()),
            None => Denylist::default(),
        };
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_provider(self)?;

        if let Some(drop) = &self.filter.drop {
            validate_unique("filter.drop", drop)?;
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn input_file(&self) -> &str {
        &self.input.file
    }

    fn output_path(&self) -> &str {
        &self.input.workdir
    }

    fn field_names(&self) -> &FieldNames {
        &self.fields
    }

    fn denylist(&self) -> &Denylist {
        &self.denylist
    }

    fn package_changes(&self) -> bool {
        self.output.package_changes
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
