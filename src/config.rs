use crate::error::{AppResult, ConfigError};

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 题库 TOML 文件存放目录
    pub bank_folder: String,
    /// 组卷请求 TOML 文件存放目录
    pub request_folder: String,
    /// 生成的试卷输出目录
    pub output_folder: String,
    /// 组卷完成后写出的题库快照（包含更新后的使用次数）
    pub bank_snapshot_file: String,
    /// 同时处理的组卷请求数量
    pub max_concurrent_requests: usize,
    /// 处理成功后是否删除请求文件
    pub remove_processed_requests: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bank_folder: "question_bank".to_string(),
            request_folder: "paper_requests".to_string(),
            output_folder: "output_papers".to_string(),
            bank_snapshot_file: "question_bank_snapshot.toml".to_string(),
            max_concurrent_requests: 8,
            remove_processed_requests: false,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            bank_folder: std::env::var("BANK_FOLDER").unwrap_or(default.bank_folder),
            request_folder: std::env::var("REQUEST_FOLDER").unwrap_or(default.request_folder),
            output_folder: std::env::var("OUTPUT_FOLDER").unwrap_or(default.output_folder),
            bank_snapshot_file: std::env::var("BANK_SNAPSHOT_FILE").unwrap_or(default.bank_snapshot_file),
            max_concurrent_requests: std::env::var("MAX_CONCURRENT_REQUESTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_concurrent_requests),
            remove_processed_requests: std::env::var("REMOVE_PROCESSED_REQUESTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.remove_processed_requests),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        }
    }

    /// 校验配置
    pub fn validate(&self) -> AppResult<()> {
        if self.max_concurrent_requests == 0 {
            return Err(ConfigError::InvalidValue {
                name: "max_concurrent_requests".to_string(),
                reason: "必须大于 0".to_string(),
            }
            .into());
        }
        for (name, value) in [
            ("bank_folder", &self.bank_folder),
            ("request_folder", &self.request_folder),
            ("output_folder", &self.output_folder),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    name: name.to_string(),
                    reason: "路径不能为空".to_string(),
                }
                .into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_runs_with_bounded_concurrency() {
        let config = Config::default();
        assert_eq!(config.max_concurrent_requests, 8);
        assert!(!config.remove_processed_requests);
        assert_eq!(config.bank_folder, "question_bank");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let config = Config {
            max_concurrent_requests: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
