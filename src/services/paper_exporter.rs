//! 试卷导出服务 - 业务能力层
//!
//! 把生成的试卷写成 TOML 文件

use crate::models::{save_toml, PaperDocument};
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct PaperExporter {
    output_folder: PathBuf,
}

impl PaperExporter {
    pub fn new(output_folder: impl AsRef<Path>) -> Self {
        Self {
            output_folder: output_folder.as_ref().to_path_buf(),
        }
    }

    /// 导出文件路径：`<输出目录>/<试卷ID>_<标题>.toml`
    pub fn file_path_for(&self, doc: &PaperDocument) -> PathBuf {
        self.output_folder
            .join(format!("{}_{}.toml", doc.paper.id, sanitize_file_name(&doc.paper.title)))
    }

    /// 导出试卷
    ///
    /// # 返回
    /// 返回写入的文件路径
    pub async fn export(&self, doc: &PaperDocument) -> Result<PathBuf> {
        let path = self.file_path_for(doc);
        save_toml(&path, doc).await?;
        info!("💾 试卷已导出: {}", path.display());
        Ok(path)
    }
}

/// 替换文件名中不允许出现的字符
fn sanitize_file_name(title: &str) -> String {
    let name: String = title
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_whitespace() => '_',
            c => c,
        })
        .collect();
    if name.is_empty() {
        "paper".to_string()
    } else {
        name
    }
}
