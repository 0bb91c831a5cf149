//! 组卷算法 - 业务能力层
//!
//! 两级贪心：先按认知层级分配目标分值，再在每个层级内按难度分配，
//! 每个分桶（层级 × 难度）内按使用次数从低到高依次装入不超过目标分值的题目。
//!
//! 本模块是纯计算：不做 I/O，不修改题目的使用次数，使用次数的累加由调用方负责。

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::models::{Distribution, Question, QuestionId};

/// 没有选出任何题目时返回的提示信息
pub const INSUFFICIENT_QUESTIONS: &str = "insufficient questions in bank.";

/// 组卷结果
#[derive(Debug, Clone, Serialize)]
pub struct SelectionResult<'a> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// 选中的题目，已按（认知层级, 难度）的规范顺序排列
    pub questions: Vec<&'a Question>,
    /// 各层级可能超出目标分值，总和可能超过 `u32` 范围
    pub total_marks_allocated: u64,
    pub total_questions: usize,
}

impl<'a> SelectionResult<'a> {
    fn failure(message: &str) -> Self {
        Self {
            success: false,
            message: Some(message.to_string()),
            questions: Vec::new(),
            total_marks_allocated: 0,
            total_questions: 0,
        }
    }

    fn success(questions: Vec<&'a Question>) -> Self {
        let total_marks_allocated = questions.iter().map(|q| u64::from(q.marks)).sum();
        let total_questions = questions.len();
        Self {
            success: true,
            message: None,
            questions,
            total_marks_allocated,
            total_questions,
        }
    }

    /// 选中题目的ID（按试卷顺序）
    pub fn question_ids(&self) -> Vec<QuestionId> {
        self.questions.iter().map(|q| q.id).collect()
    }
}

/// 按百分比计算目标分值，四舍六入五成双
///
/// 百分比为负或超过 100 时不做截断，负的目标分值自然选不出任何题目。
pub fn target_marks(percentage: f64, total: i64) -> i64 {
    ((percentage / 100.0) * total as f64).round_ties_even() as i64
}

/// 从题目池中组卷
///
/// # 参数
/// - `pool`: 已按科目过滤的题目快照
/// - `total_marks`: 目标总分
/// - `blooms_distribution`: 各认知层级占总分的百分比（按书写顺序处理）
/// - `difficulty_distribution`: 每个层级内部各难度的百分比（按书写顺序处理）
/// - `question_type`: 题型过滤，`"mixed"` 表示不限
///
/// # 返回
/// 返回组卷结果；一道题也没选出时 `success` 为 `false`
pub fn assemble<'a>(
    pool: &'a [Question],
    total_marks: u32,
    blooms_distribution: &Distribution,
    difficulty_distribution: &Distribution,
    question_type: &str,
) -> SelectionResult<'a> {
    let mut selected: Vec<&'a Question> = Vec::new();
    let mut used_ids: HashSet<QuestionId> = HashSet::new();

    for (blooms_level, blooms_percentage) in blooms_distribution.iter() {
        let level_target = target_marks(blooms_percentage, i64::from(total_marks));

        let mut candidates: Vec<&'a Question> = pool
            .iter()
            .filter(|q| q.blooms_level.as_str() == blooms_level)
            .filter(|q| q.question_type.matches_filter(question_type))
            .collect();
        // 稳定排序：使用次数相同的题目保持题库中的原始顺序
        candidates.sort_by_key(|q| q.usage_count);

        for (difficulty, difficulty_percentage) in difficulty_distribution.iter() {
            let diff_target = target_marks(difficulty_percentage, level_target);
            let mut diff_marks_used: i64 = 0;

            for &question in candidates
                .iter()
                .filter(|q| q.difficulty.as_str() == difficulty)
            {
                if used_ids.contains(&question.id) {
                    continue;
                }
                // 放不下就跳过，后面分值更小的题目仍可能放得下
                let marks = i64::from(question.marks);
                if diff_marks_used + marks <= diff_target {
                    used_ids.insert(question.id);
                    selected.push(question);
                    diff_marks_used += marks;
                }
            }

            debug!(
                "分桶 [{} | {}] 目标 {} 分，实际 {} 分",
                blooms_level, difficulty, diff_target, diff_marks_used
            );
        }
    }

    if selected.is_empty() {
        return SelectionResult::failure(INSUFFICIENT_QUESTIONS);
    }

    selected.sort_by_key(|q| q.bucket_key());

    SelectionResult::success(selected)
}
