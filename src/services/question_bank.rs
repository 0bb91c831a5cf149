//! 题库服务 - 业务能力层
//!
//! 内存中的科目与题目存储，负责题目的增删改查、按科目生成组卷快照、
//! 以及组卷成功后累加题目的使用次数。

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::{AppResult, BusinessError};
use crate::models::{
    BankFile, BloomsLevel, Difficulty, Question, QuestionId, QuestionType, QuestionUpdate, Subject,
};

/// 题目查询条件，`None` 表示不过滤
#[derive(Debug, Clone, Default)]
pub struct QuestionFilter {
    pub subject_id: Option<u64>,
    pub blooms_level: Option<BloomsLevel>,
    pub difficulty: Option<Difficulty>,
    pub question_type: Option<QuestionType>,
}

impl QuestionFilter {
    fn matches(&self, q: &Question) -> bool {
        self.subject_id.map_or(true, |id| q.subject_id == id)
            && self.blooms_level.map_or(true, |level| q.blooms_level == level)
            && self.difficulty.map_or(true, |d| q.difficulty == d)
            && self.question_type.map_or(true, |t| q.question_type == t)
    }
}

/// 题库
///
/// 题目按加入顺序保存，该顺序即组卷时使用次数相同的题目之间的先后顺序。
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    subjects: Vec<Subject>,
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由多个题库文件构建题库
    ///
    /// 先加入所有科目再加入题目；无效的条目记录警告后跳过。
    pub fn from_bank_files(files: Vec<BankFile>) -> Self {
        let mut bank = Self::new();
        let (subjects, questions): (Vec<_>, Vec<_>) =
            files.into_iter().map(|f| (f.subjects, f.questions)).unzip();

        for subject in subjects.into_iter().flatten() {
            if let Err(e) = bank.add_subject(subject) {
                warn!("⚠️ 跳过科目: {}", e);
            }
        }
        for question in questions.into_iter().flatten() {
            if let Err(e) = bank.add_question(question) {
                warn!("⚠️ 跳过题目: {}", e);
            }
        }
        bank
    }

    /// 导出为题库文件（包含当前的使用次数）
    pub fn to_bank_file(&self) -> BankFile {
        BankFile {
            subjects: self.subjects.clone(),
            questions: self.questions.clone(),
        }
    }

    // ========== 科目 ==========

    /// 添加科目，ID 与代码都必须唯一
    pub fn add_subject(&mut self, subject: Subject) -> AppResult<()> {
        if self.subjects.iter().any(|s| s.id == subject.id) {
            return Err(BusinessError::DuplicateSubjectId {
                subject_id: subject.id,
            }
            .into());
        }
        if self.subjects.iter().any(|s| s.code == subject.code) {
            return Err(BusinessError::DuplicateSubjectCode { code: subject.code }.into());
        }
        debug!("添加科目: {}", subject);
        self.subjects.push(subject);
        Ok(())
    }

    pub fn subject(&self, subject_id: u64) -> AppResult<&Subject> {
        self.subjects
            .iter()
            .find(|s| s.id == subject_id)
            .ok_or_else(|| BusinessError::SubjectNotFound { subject_id }.into())
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    // ========== 题目 ==========

    /// 添加题目
    ///
    /// 要求：ID 不重复、分值为正、所属科目存在
    pub fn add_question(&mut self, question: Question) -> AppResult<()> {
        if self.questions.iter().any(|q| q.id == question.id) {
            return Err(BusinessError::DuplicateQuestionId {
                question_id: question.id,
            }
            .into());
        }
        if question.marks == 0 {
            return Err(BusinessError::InvalidMarks {
                question_id: question.id,
                marks: question.marks,
            }
            .into());
        }
        if question.text.trim().is_empty() {
            return Err(BusinessError::MissingField {
                field: "text".to_string(),
            }
            .into());
        }
        self.subject(question.subject_id)?;

        self.questions.push(question);
        Ok(())
    }

    pub fn question(&self, question_id: QuestionId) -> AppResult<&Question> {
        self.questions
            .iter()
            .find(|q| q.id == question_id)
            .ok_or_else(|| BusinessError::QuestionNotFound { question_id }.into())
    }

    /// 部分更新题目，未提供的字段保持不变
    pub fn update_question(
        &mut self,
        question_id: QuestionId,
        update: QuestionUpdate,
    ) -> AppResult<&Question> {
        if update.marks == Some(0) {
            return Err(BusinessError::InvalidMarks {
                question_id,
                marks: 0,
            }
            .into());
        }

        let question = self
            .questions
            .iter_mut()
            .find(|q| q.id == question_id)
            .ok_or(BusinessError::QuestionNotFound { question_id })?;

        if let Some(text) = update.text {
            question.text = text;
        }
        if let Some(level) = update.blooms_level {
            question.blooms_level = level;
        }
        if let Some(difficulty) = update.difficulty {
            question.difficulty = difficulty;
        }
        if let Some(marks) = update.marks {
            question.marks = marks;
        }
        if update.options.is_some() {
            question.options = update.options;
        }
        if update.correct_answer.is_some() {
            question.correct_answer = update.correct_answer;
        }

        Ok(question)
    }

    pub fn delete_question(&mut self, question_id: QuestionId) -> AppResult<Question> {
        let position = self
            .questions
            .iter()
            .position(|q| q.id == question_id)
            .ok_or(BusinessError::QuestionNotFound { question_id })?;
        Ok(self.questions.remove(position))
    }

    /// 按条件查询题目
    pub fn find_questions(&self, filter: &QuestionFilter) -> Vec<&Question> {
        self.questions.iter().filter(|q| filter.matches(q)).collect()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// 生成某个科目的题目快照，供组卷算法使用
    pub fn subject_pool(&self, subject_id: u64) -> Vec<Question> {
        self.questions
            .iter()
            .filter(|q| q.subject_id == subject_id)
            .cloned()
            .collect()
    }

    /// 累加题目使用次数，每个ID只累加一次
    ///
    /// # 返回
    /// 返回实际更新的题目数量（不存在的ID会被忽略）
    pub fn increment_usage(&mut self, question_ids: &[QuestionId]) -> usize {
        let ids: HashSet<QuestionId> = question_ids.iter().copied().collect();
        let mut updated = 0;
        for question in self.questions.iter_mut().filter(|q| ids.contains(&q.id)) {
            question.usage_count = question.usage_count.saturating_add(1);
            updated += 1;
        }
        updated
    }
}
