use serde::{Deserialize, Serialize};

use super::taxonomy::{BloomsLevel, Difficulty, QuestionType};

/// 题目ID
pub type QuestionId = u64;

/// 选择题选项
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct McqOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub a: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub c: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,
}

/// 题库中的一道题
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub subject_id: u64,
    pub text: String,
    pub question_type: QuestionType,
    pub blooms_level: BloomsLevel,
    pub difficulty: Difficulty,
    #[serde(default = "default_marks")]
    pub marks: u32,
    /// 已被选入试卷的次数，组卷时优先选择次数少的题目
    #[serde(rename = "times_used", default)]
    pub usage_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<u64>,
    /// 选择题选项（TOML 中为子表，放在最后）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<McqOptions>,
}

fn default_marks() -> u32 {
    1
}

impl Question {
    /// 题目所属的分桶（认知层级 × 难度）在规范顺序中的位置
    pub fn bucket_key(&self) -> (usize, usize) {
        (self.blooms_level.index(), self.difficulty.index())
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} [{} | {} | {}分]",
            self.id, self.blooms_level, self.difficulty, self.marks
        )
    }
}

/// 部分更新题目时使用的字段集合，`None` 表示保持原值
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionUpdate {
    pub text: Option<String>,
    pub blooms_level: Option<BloomsLevel>,
    pub difficulty: Option<Difficulty>,
    pub marks: Option<u32>,
    pub options: Option<McqOptions>,
    pub correct_answer: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_times_used_and_defaults() {
        let q: Question = toml::from_str(
            r#"
            id = 3
            subject_id = 1
            text = "Define an operating system."
            question_type = "short"
            blooms_level = "remember"
            difficulty = "easy"
            "#,
        )
        .unwrap();
        assert_eq!(q.marks, 1);
        assert_eq!(q.usage_count, 0);
        assert_eq!(q.bucket_key(), (0, 0));

        let q: Question = serde_json::from_str(
            r#"{"id":4,"subject_id":1,"text":"t","question_type":"long",
                "blooms_level":"create","difficulty":"hard","marks":10,"times_used":3}"#,
        )
        .unwrap();
        assert_eq!(q.usage_count, 3);
        assert_eq!(q.bucket_key(), (5, 2));
    }

    #[test]
    fn rejects_unknown_blooms_level() {
        let result = serde_json::from_str::<Question>(
            r#"{"id":1,"subject_id":1,"text":"t","question_type":"mcq",
                "blooms_level":"memorise","difficulty":"easy"}"#,
        );
        assert!(result.is_err());
    }
}
