//! 单个组卷请求处理器 - 编排层
//!
//! ## 职责
//!
//! 1. **组卷**：在题库锁内完成"快照 → 组卷 → 导出 → 保存试卷 → 累加使用次数"
//! 2. **导出**：把生成的试卷写成 TOML 文件，导出失败时不提交
//! 3. **兜底**：组卷失败的请求写入 warn.txt
//! 4. **文件清理**：按配置删除已处理的请求文件
//! 5. **统计输出**：记录本次请求的结果

use crate::config::Config;
use crate::models::GenerateRequest;
use crate::services::{PaperExporter, PaperService, QuestionBank, WarnWriter};
use crate::utils::logging::{append_log_line, truncate_text};
use anyhow::{Context, Result};
use std::path::Path;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// 组卷共享状态：题库与已生成的试卷
///
/// 两者必须在同一把锁下修改，保证并发请求之间使用次数的累加不会交错。
#[derive(Debug, Default)]
pub struct GenerationState {
    pub bank: QuestionBank,
    pub papers: PaperService,
}

impl GenerationState {
    pub fn new(bank: QuestionBank) -> Self {
        Self {
            bank,
            papers: PaperService::new(),
        }
    }
}

/// 处理单个组卷请求
///
/// # 参数
/// - `state`: 组卷共享状态
/// - `exporter`: 试卷导出服务
/// - `warn_writer`: 警告写入服务
/// - `request`: 组卷请求
/// - `request_index`: 请求索引（用于日志）
/// - `config`: 配置
///
/// # 返回
/// 返回是否成功生成试卷；组卷失败返回 `Ok(false)`，导出失败返回错误且不提交
pub async fn process_request(
    state: &Mutex<GenerationState>,
    exporter: &PaperExporter,
    warn_writer: &WarnWriter,
    request: GenerateRequest,
    request_index: usize,
    config: &Config,
) -> Result<bool> {
    log_request_start(request_index, &request);

    // 持有锁直到导出完成：导出失败时不提交，使用次数与导出的试卷保持一致
    let mut guard = state.lock().await;
    let GenerationState { bank, papers } = &mut *guard;

    let doc = match papers.prepare(bank, &request) {
        Ok(doc) => doc,
        Err(e) => {
            drop(guard);
            warn!("[请求 {}] ⚠️ 组卷失败: {}", request_index, e);
            warn_writer
                .write(&request.title, request.subject_id, &e.to_string())
                .await?;
            append_log_line(
                &config.output_log_file,
                &format!("[请求 {}] ❌ {} - {}", request_index, request.title, e),
            )
            .await?;
            return Ok(false);
        }
    };

    if config.verbose_logging {
        for (i, question) in doc.questions.iter().enumerate() {
            info!(
                "[请求 {}]   {}. {} {}",
                request_index,
                i + 1,
                question,
                truncate_text(&question.text, 40)
            );
        }
    }

    let path = exporter
        .export(&doc)
        .await
        .with_context(|| format!("试卷导出失败，未提交: {}", request.title))?;

    papers.commit(bank, &doc);
    drop(guard);

    // 试卷已提交，后续的清理和日志失败只记录警告
    if config.remove_processed_requests {
        if let Err(e) = cleanup_file(request.file_path.as_deref(), request_index) {
            warn!("[请求 {}] ⚠️ 清理请求文件失败: {:#}", request_index, e);
        }
    }

    if let Err(e) = append_log_line(
        &config.output_log_file,
        &format!(
            "[请求 {}] ✅ {} -> {} ({} 道题目, {}/{} 分)",
            request_index,
            request.title,
            path.display(),
            doc.paper.question_count(),
            doc.paper.total_marks_allocated,
            doc.paper.total_marks
        ),
    )
    .await
    {
        warn!("[请求 {}] ⚠️ 写入日志失败: {:#}", request_index, e);
    }

    log_request_complete(request_index, doc.paper.question_count(), doc.paper.total_marks_allocated);

    Ok(true)
}

/// 清理已处理的请求文件
fn cleanup_file(file_path: Option<&str>, request_index: usize) -> Result<()> {
    info!("[请求 {}] 🗑️ 清理已处理的文件...", request_index);

    if let Some(file_path) = file_path {
        if Path::new(file_path).exists() {
            std::fs::remove_file(file_path).with_context(|| format!("无法删除文件: {}", file_path))?;
            info!(
                "[请求 {}] ✓ 文件已删除: {}",
                request_index,
                Path::new(file_path)
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
            );
        } else {
            warn!("[请求 {}] ⚠️ 文件不存在: {}", request_index, file_path);
        }
    } else {
        error!("[请求 {}] 文件路径未设置，无法清理", request_index);
    }

    Ok(())
}

// ========== 日志辅助函数 ==========

fn log_request_start(request_index: usize, request: &GenerateRequest) {
    info!("\n[请求 {}] {}", request_index, "─".repeat(30));
    info!("[请求 {}] 试卷: {}", request_index, request.title);
    info!(
        "[请求 {}] 科目ID: {} | 总分: {} | 时长: {} 分钟 | 题型: {}",
        request_index,
        request.subject_id,
        request.total_marks,
        request.duration_minutes,
        request.config.question_type
    );
    info!(
        "[请求 {}] 认知层级分布: {} | 难度分布: {}",
        request_index, request.config.blooms_distribution, request.config.difficulty_distribution
    );
}

fn log_request_complete(request_index: usize, question_count: usize, marks: u64) {
    info!(
        "[请求 {}] ✅ 处理完成: {} 道题目, 共 {} 分\n",
        request_index, question_count, marks
    );
}
