//! 批量组卷处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量组卷请求的处理和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：校验配置、写日志文件头、加载题库
//! 2. **批量加载**：扫描并加载所有组卷请求（`Vec<GenerateRequest>`）
//! 3. **并发控制**：使用 Semaphore 限制同时处理的请求数量
//! 4. **一致性**：题库放在 Mutex 内，组卷与使用次数累加在同一把锁下完成
//! 5. **持久化**：全部完成后写出带最新使用次数的题库快照
//! 6. **全局统计**：汇总所有请求的处理结果

use crate::config::Config;
use crate::models::{load_all_bank_files, load_all_requests, save_toml, GenerateRequest};
use crate::orchestrator::paper_processor::{self, GenerationState};
use crate::services::{PaperExporter, QuestionBank, WarnWriter};
use crate::utils::logging::{
    init_log_file, log_bank_loaded, log_requests_loaded, log_startup, print_final_stats,
};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};
use tracing::{error, info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    state: Arc<Mutex<GenerationState>>,
    exporter: Arc<PaperExporter>,
    warn_writer: Arc<WarnWriter>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        config.validate()?;

        // 初始化日志文件
        init_log_file(&config.output_log_file).await?;

        log_startup(config.max_concurrent_requests);

        // 加载题库
        info!("\n📚 正在加载题库: {}", config.bank_folder);
        let bank_files = load_all_bank_files(&config.bank_folder).await?;
        let bank = QuestionBank::from_bank_files(bank_files);
        log_bank_loaded(bank.subjects().len(), bank.len());

        Ok(Self::with_bank(config, bank))
    }

    /// 使用已加载的题库创建应用
    pub fn with_bank(config: Config, bank: QuestionBank) -> Self {
        let exporter = PaperExporter::new(&config.output_folder);
        let warn_writer =
            WarnWriter::with_path(Path::new(&config.output_folder).join("warn.txt").to_string_lossy());

        Self {
            state: Arc::new(Mutex::new(GenerationState::new(bank))),
            exporter: Arc::new(exporter),
            warn_writer: Arc::new(warn_writer),
            config,
        }
    }

    /// 共享的组卷状态（题库与试卷）
    pub fn state(&self) -> Arc<Mutex<GenerationState>> {
        self.state.clone()
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<ProcessingStats> {
        // 加载所有待处理的组卷请求
        let requests = self.load_requests().await?;

        if requests.is_empty() {
            warn!("⚠️ 没有找到待处理的组卷请求，程序结束");
            return Ok(ProcessingStats::default());
        }

        log_requests_loaded(requests.len(), self.config.max_concurrent_requests);

        tokio::fs::create_dir_all(&self.config.output_folder)
            .await
            .with_context(|| format!("无法创建输出目录: {}", self.config.output_folder))?;

        // 处理所有请求
        let stats = self.process_all_requests(requests).await?;

        // 写出题库快照（包含更新后的使用次数）
        let snapshot = self.save_bank_snapshot().await?;
        info!("💾 题库快照已保存: {}", snapshot.display());

        // 输出最终统计
        print_final_stats(stats.success, stats.failed, stats.total, &self.config.output_log_file);

        Ok(stats)
    }

    /// 加载组卷请求
    async fn load_requests(&self) -> Result<Vec<GenerateRequest>> {
        info!("\n📁 正在扫描待处理的组卷请求...");
        load_all_requests(&self.config.request_folder).await
    }

    /// 写出题库快照
    async fn save_bank_snapshot(&self) -> Result<PathBuf> {
        let bank_file = self.state.lock().await.bank.to_bank_file();
        let path = PathBuf::from(&self.config.bank_snapshot_file);
        save_toml(&path, &bank_file).await?;
        Ok(path)
    }

    /// 并发处理所有请求
    async fn process_all_requests(&self, requests: Vec<GenerateRequest>) -> Result<ProcessingStats> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_requests));
        let mut stats = ProcessingStats {
            total: requests.len(),
            ..Default::default()
        };
        let mut handles = Vec::new();

        for (idx, request) in requests.into_iter().enumerate() {
            let request_index = idx + 1;
            let permit = semaphore.clone().acquire_owned().await?;

            let state = self.state.clone();
            let exporter = self.exporter.clone();
            let warn_writer = self.warn_writer.clone();
            let config = self.config.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit;
                match paper_processor::process_request(
                    &state,
                    &exporter,
                    &warn_writer,
                    request,
                    request_index,
                    &config,
                )
                .await
                {
                    Ok(generated) => Ok(generated),
                    Err(e) => {
                        error!("[请求 {}] ❌ 处理过程中发生错误: {:#}", request_index, e);
                        Err(e)
                    }
                }
            });
            handles.push((request_index, handle));
        }

        // 等待所有任务完成
        for (request_index, handle) in handles {
            match handle.await {
                Ok(Ok(true)) => {
                    stats.success += 1;
                }
                Ok(Ok(false)) | Ok(Err(_)) => {
                    stats.failed += 1;
                }
                Err(e) => {
                    error!("[请求 {}] 任务执行失败: {}", request_index, e);
                    stats.failed += 1;
                }
            }
        }

        Ok(stats)
    }
}

/// 处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingStats {
    pub success: usize,
    pub failed: usize,
    pub total: usize,
}
