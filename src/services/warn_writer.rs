//! 警告写入服务 - 业务能力层
//!
//! 只负责把组卷失败的请求追加写入 warn.txt，不关心流程

use anyhow::{Context, Result};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// 警告写入服务
pub struct WarnWriter {
    warn_file_path: String,
}

impl WarnWriter {
    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            warn_file_path: path.into(),
        }
    }

    /// 写入警告信息
    ///
    /// # 参数
    /// - `title`: 组卷请求的试卷标题
    /// - `subject_id`: 科目ID
    /// - `reason`: 失败原因
    pub async fn write(&self, title: &str, subject_id: u64, reason: &str) -> Result<()> {
        debug!("写入警告: 试卷 {} | 科目 {} | {}", title, subject_id, reason);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.warn_file_path)
            .await
            .with_context(|| format!("无法打开警告文件: {}", self.warn_file_path))?;

        let warn_msg = format!(
            "[{}] 试卷 {} | 科目 {} | 原因: {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            title,
            subject_id,
            reason
        );

        file.write_all(warn_msg.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn appends_one_line_per_warning() {
        let path = std::env::temp_dir().join(format!("qpg_warn_{}.txt", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let writer = WarnWriter::with_path(path.to_string_lossy().to_string());

        writer.write("Mid Term", 1, "insufficient questions in bank.").await.unwrap();
        writer.write("Final", 2, "科目不存在: 2").await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("试卷 Mid Term | 科目 1"));
        assert!(lines[1].ends_with("原因: 科目不存在: 2"));

        std::fs::remove_file(&path).unwrap();
    }
}
