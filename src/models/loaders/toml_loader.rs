use crate::models::paper::GenerateRequest;
use crate::models::question::Question;
use crate::models::subject::Subject;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 题库文件内容
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BankFile {
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// 读取并解析单个 TOML 文件
async fn load_toml<T: DeserializeOwned>(toml_file_path: &Path) -> Result<T> {
    let content = fs::read_to_string(toml_file_path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", toml_file_path.display()))?;

    toml::from_str(&content)
        .with_context(|| format!("无法解析TOML文件: {}", toml_file_path.display()))
}

/// 列出文件夹中的所有 TOML 文件（按文件名排序，保证加载顺序稳定）
async fn list_toml_files(folder_path: &str) -> Result<Vec<PathBuf>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut toml_files = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) == Some("toml") {
            toml_files.push(path);
        }
    }

    toml_files.sort();
    Ok(toml_files)
}

/// 从 TOML 文件加载题库数据
pub async fn load_bank_file(toml_file_path: &Path) -> Result<BankFile> {
    load_toml(toml_file_path).await
}

/// 从文件夹中加载所有题库文件
pub async fn load_all_bank_files(folder_path: &str) -> Result<Vec<BankFile>> {
    let mut bank_files = Vec::new();

    for path in list_toml_files(folder_path).await? {
        tracing::info!(
            "正在加载题库: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match load_bank_file(&path).await {
            Ok(bank) => {
                tracing::info!(
                    "成功加载 {} 个科目, {} 道题目",
                    bank.subjects.len(),
                    bank.questions.len()
                );
                bank_files.push(bank);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {:#}", path.display(), e);
            }
        }
    }

    Ok(bank_files)
}

/// 从 TOML 文件加载组卷请求
pub async fn load_generate_request(toml_file_path: &Path) -> Result<GenerateRequest> {
    let request: GenerateRequest = load_toml(toml_file_path).await?;
    Ok(request.with_file_path(toml_file_path.to_string_lossy().to_string()))
}

/// 从文件夹中加载所有组卷请求
pub async fn load_all_requests(folder_path: &str) -> Result<Vec<GenerateRequest>> {
    let mut requests = Vec::new();

    for path in list_toml_files(folder_path).await? {
        match load_generate_request(&path).await {
            Ok(request) => {
                tracing::info!("成功加载组卷请求: {}", request.title);
                requests.push(request);
            }
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {:#}", path.display(), e);
            }
        }
    }

    Ok(requests)
}

/// 将数据序列化为 TOML 并写入文件（自动创建上级目录）
pub async fn save_toml<T: Serialize>(toml_file_path: &Path, value: &T) -> Result<()> {
    let content = toml::to_string_pretty(value).context("无法序列化为TOML")?;

    if let Some(parent) = toml_file_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("无法创建目录: {}", parent.display()))?;
        }
    }

    fs::write(toml_file_path, content)
        .await
        .with_context(|| format!("无法写入TOML文件: {}", toml_file_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "qpg_loader_{}_{}_{}",
            name,
            std::process::id(),
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_folder_is_an_error() {
        let result = tokio_test::block_on(load_all_bank_files("/definitely/not/here"));
        assert!(result.is_err());
    }

    #[test]
    fn skips_broken_files_and_ignores_other_extensions() {
        let dir = temp_dir("bank");
        std::fs::write(
            dir.join("a.toml"),
            r#"
            [[subjects]]
            id = 1
            name = "Computer Science"
            code = "CS101"

            [[questions]]
            id = 1
            subject_id = 1
            text = "What does CPU stand for?"
            question_type = "mcq"
            blooms_level = "remember"
            difficulty = "easy"
            marks = 1
            "#,
        )
        .unwrap();
        std::fs::write(dir.join("b.toml"), "this is = = not toml").unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let banks = tokio_test::block_on(load_all_bank_files(dir.to_str().unwrap())).unwrap();
        assert_eq!(banks.len(), 1);
        assert_eq!(banks[0].subjects[0].code, "CS101");
        assert_eq!(banks[0].questions.len(), 1);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn save_then_load_request_keeps_file_path() {
        let dir = temp_dir("request");
        let path = dir.join("nested").join("req.toml");
        let request = GenerateRequest {
            title: "Quiz".to_string(),
            subject_id: 1,
            total_marks: 10,
            duration_minutes: 30,
            created_by: 2,
            config: crate::models::PaperConfig {
                question_type: "mcq".to_string(),
                blooms_distribution: crate::models::Distribution::new().with("remember", 100.0),
                difficulty_distribution: crate::models::Distribution::new().with("easy", 100.0),
            },
            file_path: None,
        };

        tokio_test::block_on(save_toml(&path, &request)).unwrap();
        let loaded = tokio_test::block_on(load_generate_request(&path)).unwrap();
        assert_eq!(loaded.config, request.config);
        assert_eq!(loaded.file_path.as_deref(), path.to_str());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
