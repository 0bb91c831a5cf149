use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::distribution::Distribution;
use super::question::{Question, QuestionId};
use super::taxonomy::QuestionType;

/// 组卷配置（同时作为试卷的配置快照保存）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperConfig {
    /// 题型过滤：mcq / short / long / mixed
    #[serde(default = "default_question_type")]
    pub question_type: String,
    /// 各认知层级占总分的百分比
    #[serde(default)]
    pub blooms_distribution: Distribution,
    /// 每个认知层级内部各难度所占的百分比
    #[serde(default)]
    pub difficulty_distribution: Distribution,
}

fn default_question_type() -> String {
    QuestionType::MIXED.to_string()
}

/// 组卷请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub title: String,
    pub subject_id: u64,
    pub total_marks: u32,
    pub duration_minutes: u32,
    /// 发起请求的用户
    #[serde(default)]
    pub created_by: u64,
    pub config: PaperConfig,
    #[serde(skip_serializing, skip_deserializing)]
    pub file_path: Option<String>,
}

impl GenerateRequest {
    pub fn with_file_path(mut self, file_path: String) -> Self {
        self.file_path = Some(file_path);
        self
    }
}

/// 试卷状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperStatus {
    #[default]
    Draft,
    Final,
}

/// 已生成的试卷
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paper {
    pub id: u64,
    pub title: String,
    pub subject_id: u64,
    pub total_marks: u32,
    pub duration_minutes: u32,
    #[serde(default)]
    pub status: PaperStatus,
    pub created_by: u64,
    pub created_at: DateTime<Utc>,
    /// 实际分配到的总分
    pub total_marks_allocated: u64,
    /// 题目ID，按试卷中的顺序排列
    pub question_ids: Vec<QuestionId>,
    pub config: PaperConfig,
}

impl Paper {
    pub fn question_count(&self) -> usize {
        self.question_ids.len()
    }
}

/// 导出用的完整试卷：元数据 + 按顺序排列的题目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperDocument {
    pub paper: Paper,
    pub questions: Vec<Question>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_generate_request() {
        let request: GenerateRequest = toml::from_str(
            r#"
            title = "Mid Term Exam"
            subject_id = 1
            total_marks = 100
            duration_minutes = 180

            [config]
            [config.blooms_distribution]
            remember = 20
            understand = 30
            apply = 50

            [config.difficulty_distribution]
            easy = 30
            medium = 50
            hard = 20
            "#,
        )
        .unwrap();

        assert_eq!(request.config.question_type, "mixed");
        assert_eq!(request.created_by, 0);
        assert_eq!(request.config.blooms_distribution.len(), 3);
        assert_eq!(
            request.config.difficulty_distribution.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            vec!["easy", "medium", "hard"]
        );
        assert!(request.file_path.is_none());
    }
}
