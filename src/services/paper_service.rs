//! 试卷服务
//!
//! 负责组卷请求的完整处理：校验科目、生成题目快照、调用组卷算法、
//! 保存试卷记录并累加被选中题目的使用次数。

use crate::error::{AppResult, BusinessError};
use crate::models::{GenerateRequest, Paper, PaperDocument, PaperStatus, Question};
use crate::services::paper_assembler;
use crate::services::question_bank::QuestionBank;
use chrono::Utc;
use tracing::{info, warn};

/// 试卷服务
#[derive(Debug)]
pub struct PaperService {
    papers: Vec<Paper>,
    next_id: u64,
}

impl PaperService {
    /// 创建新的试卷服务
    pub fn new() -> Self {
        Self {
            papers: Vec::new(),
            next_id: 1,
        }
    }

    /// 根据请求生成试卷
    ///
    /// 等价于 [`prepare`](Self::prepare) 后立即 [`commit`](Self::commit)。
    ///
    /// # 参数
    /// - `bank`: 题库
    /// - `request`: 组卷请求
    ///
    /// # 返回
    /// 返回生成的完整试卷；题库中没有可用题目时返回 `InsufficientQuestions`
    pub fn generate(
        &mut self,
        bank: &mut QuestionBank,
        request: &GenerateRequest,
    ) -> AppResult<PaperDocument> {
        let doc = self.prepare(bank, request)?;
        self.commit(bank, &doc);
        Ok(doc)
    }

    /// 组卷但不提交
    ///
    /// 不修改题库和试卷列表。返回的试卷占用下一个试卷ID，题目中的使用次数
    /// 是提交之后的值。在 `commit` 之前题库被其他请求修改时需重新组卷。
    pub fn prepare(&self, bank: &QuestionBank, request: &GenerateRequest) -> AppResult<PaperDocument> {
        if request.title.trim().is_empty() {
            return Err(BusinessError::MissingField {
                field: "title".to_string(),
            }
            .into());
        }
        let subject = bank.subject(request.subject_id)?;
        info!("[{}] 科目: {}", request.title, subject);

        let config = &request.config;
        for (name, dist) in [
            ("blooms_distribution", &config.blooms_distribution),
            ("difficulty_distribution", &config.difficulty_distribution),
        ] {
            let total = dist.total_percentage();
            if (total - 100.0).abs() > f64::EPSILON {
                warn!("[{}] ⚠️ {} 合计 {}%，不等于 100%", request.title, name, total);
            }
        }

        let pool = bank.subject_pool(request.subject_id);
        info!("[{}] 题目池: {} 道题目", request.title, pool.len());

        let selection = paper_assembler::assemble(
            &pool,
            request.total_marks,
            &config.blooms_distribution,
            &config.difficulty_distribution,
            &config.question_type,
        );

        if !selection.success {
            let message = selection
                .message
                .unwrap_or_else(|| paper_assembler::INSUFFICIENT_QUESTIONS.to_string());
            return Err(crate::AppError::insufficient_questions(message));
        }

        let question_ids = selection.question_ids();
        // 选中的题目ID互不相同，提交时每道题恰好 +1
        let questions: Vec<_> = selection
            .questions
            .iter()
            .map(|&q| Question {
                usage_count: q.usage_count.saturating_add(1),
                ..q.clone()
            })
            .collect();

        let paper = Paper {
            id: self.next_id,
            title: request.title.clone(),
            subject_id: request.subject_id,
            total_marks: request.total_marks,
            duration_minutes: request.duration_minutes,
            status: PaperStatus::Draft,
            created_by: request.created_by,
            created_at: Utc::now(),
            total_marks_allocated: selection.total_marks_allocated,
            question_ids,
            config: config.clone(),
        };

        Ok(PaperDocument { paper, questions })
    }

    /// 提交试卷：保存试卷记录并累加被选中题目的使用次数
    ///
    /// 调用方需保证从 `prepare` 到 `commit` 期间对 `bank` 的独占访问。
    pub fn commit(&mut self, bank: &mut QuestionBank, doc: &PaperDocument) {
        let paper = doc.paper.clone();
        self.next_id = self.next_id.max(paper.id + 1);

        bank.increment_usage(&paper.question_ids);

        info!(
            "[{}] ✓ 组卷完成: {} 道题目, {}/{} 分",
            paper.title,
            paper.question_count(),
            paper.total_marks_allocated,
            paper.total_marks
        );
        self.papers.push(paper);
    }

    /// 某个用户创建的所有试卷
    pub fn papers_by(&self, user_id: u64) -> Vec<&Paper> {
        self.papers.iter().filter(|p| p.created_by == user_id).collect()
    }

    pub fn paper(&self, paper_id: u64) -> AppResult<&Paper> {
        self.papers
            .iter()
            .find(|p| p.id == paper_id)
            .ok_or_else(|| BusinessError::PaperNotFound { paper_id }.into())
    }

    /// 试卷及其题目（题目信息取自题库当前状态）
    pub fn paper_document(&self, bank: &QuestionBank, paper_id: u64) -> AppResult<PaperDocument> {
        let paper = self.paper(paper_id)?.clone();
        let questions = paper
            .question_ids
            .iter()
            .map(|&id| bank.question(id).cloned())
            .collect::<AppResult<Vec<_>>>()?;
        Ok(PaperDocument { paper, questions })
    }

    /// 将试卷标记为定稿
    pub fn finalize(&mut self, paper_id: u64) -> AppResult<&Paper> {
        let paper = self
            .papers
            .iter_mut()
            .find(|p| p.id == paper_id)
            .ok_or(BusinessError::PaperNotFound { paper_id })?;
        paper.status = PaperStatus::Final;
        Ok(paper)
    }

    /// 删除试卷（不回退题目的使用次数）
    pub fn delete(&mut self, paper_id: u64) -> AppResult<Paper> {
        let position = self
            .papers
            .iter()
            .position(|p| p.id == paper_id)
            .ok_or(BusinessError::PaperNotFound { paper_id })?;
        Ok(self.papers.remove(position))
    }

    pub fn len(&self) -> usize {
        self.papers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }
}

impl Default for PaperService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        BloomsLevel, Difficulty, Distribution, PaperConfig, Question, QuestionType, Subject,
    };
    use crate::AppError;

    fn bank() -> QuestionBank {
        let mut bank = QuestionBank::new();
        bank.add_subject(Subject {
            id: 1,
            name: "Computer Science".to_string(),
            code: "CS101".to_string(),
            description: None,
        })
        .unwrap();
        let rows = [
            (1, BloomsLevel::Remember, Difficulty::Easy, 2, 0),
            (2, BloomsLevel::Remember, Difficulty::Easy, 3, 5),
            (3, BloomsLevel::Apply, Difficulty::Medium, 5, 0),
            (4, BloomsLevel::Apply, Difficulty::Medium, 5, 1),
        ];
        for (id, blooms_level, difficulty, marks, usage_count) in rows {
            bank.add_question(Question {
                id,
                subject_id: 1,
                text: format!("Question {}", id),
                question_type: QuestionType::Short,
                blooms_level,
                difficulty,
                marks,
                usage_count,
                options: None,
                correct_answer: None,
                created_by: None,
            })
            .unwrap();
        }
        bank
    }

    fn request(subject_id: u64) -> GenerateRequest {
        GenerateRequest {
            title: "Unit Test".to_string(),
            subject_id,
            total_marks: 10,
            duration_minutes: 60,
            created_by: 2,
            config: PaperConfig {
                question_type: "mixed".to_string(),
                blooms_distribution: Distribution::new().with("remember", 50.0).with("apply", 50.0),
                difficulty_distribution: Distribution::new().with("easy", 100.0).with("medium", 100.0),
            },
            file_path: None,
        }
    }

    #[test]
    fn generate_records_paper_and_increments_usage() {
        let mut bank = bank();
        let mut service = PaperService::new();

        let doc = service.generate(&mut bank, &request(1)).unwrap();

        assert_eq!(doc.paper.id, 1);
        assert_eq!(doc.paper.question_ids, vec![1, 2, 3]);
        assert_eq!(doc.paper.total_marks_allocated, 10);
        assert_eq!(doc.paper.status, PaperStatus::Draft);
        // 导出的题目带有提交后的使用次数
        assert_eq!(doc.questions[1].usage_count, 6);
        for q in &doc.questions {
            assert_eq!(q.usage_count, bank.question(q.id).unwrap().usage_count);
        }

        assert_eq!(bank.question(1).unwrap().usage_count, 1);
        assert_eq!(bank.question(2).unwrap().usage_count, 6);
        assert_eq!(bank.question(3).unwrap().usage_count, 1);
        assert_eq!(bank.question(4).unwrap().usage_count, 1);
        assert_eq!(service.papers_by(2).len(), 1);
    }

    #[test]
    fn second_generation_rotates_to_less_used_question() {
        let mut bank = bank();
        let mut service = PaperService::new();

        service.generate(&mut bank, &request(1)).unwrap();
        let second = service.generate(&mut bank, &request(1)).unwrap();

        // 题目 3 和 4 使用次数都变成 1，保持题库顺序，仍选 3
        assert_eq!(second.paper.id, 2);
        assert_eq!(second.paper.question_ids, vec![1, 2, 3]);
        assert_eq!(bank.question(3).unwrap().usage_count, 2);

        let third = service.generate(&mut bank, &request(1)).unwrap();
        assert_eq!(third.paper.question_ids, vec![1, 2, 4]);
    }

    #[test]
    fn unknown_subject_is_rejected() {
        let mut bank = bank();
        let mut service = PaperService::new();
        let err = service.generate(&mut bank, &request(9)).unwrap_err();
        assert!(matches!(
            err,
            AppError::Business(BusinessError::SubjectNotFound { subject_id: 9 })
        ));
        assert!(service.is_empty());
    }

    #[test]
    fn empty_selection_surfaces_message_and_keeps_bank_untouched() {
        let mut bank = bank();
        let mut service = PaperService::new();
        let mut req = request(1);
        req.config.question_type = "long".to_string();

        let err = service.generate(&mut bank, &req).unwrap_err();
        match err {
            AppError::Business(BusinessError::InsufficientQuestions { message }) => {
                assert_eq!(message, paper_assembler::INSUFFICIENT_QUESTIONS);
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(bank.question(1).unwrap().usage_count, 0);
        assert!(service.is_empty());
    }

    #[test]
    fn prepare_leaves_bank_and_papers_untouched() {
        let mut bank = bank();
        let mut service = PaperService::new();

        let doc = service.prepare(&bank, &request(1)).unwrap();
        assert_eq!(doc.paper.id, 1);
        assert_eq!(bank.question(1).unwrap().usage_count, 0);
        assert!(service.is_empty());

        // 未提交的试卷不占用ID
        let again = service.prepare(&bank, &request(1)).unwrap();
        assert_eq!(again.paper.id, 1);

        service.commit(&mut bank, &again);
        assert_eq!(service.len(), 1);
        assert_eq!(bank.question(1).unwrap().usage_count, 1);
        assert_eq!(service.prepare(&bank, &request(1)).unwrap().paper.id, 2);
    }

    #[test]
    fn finalize_document_and_delete() {
        let mut bank = bank();
        let mut service = PaperService::new();
        let id = service.generate(&mut bank, &request(1)).unwrap().paper.id;

        assert_eq!(service.finalize(id).unwrap().status, PaperStatus::Final);
        let doc = service.paper_document(&bank, id).unwrap();
        assert_eq!(doc.questions.iter().map(|q| q.id).collect::<Vec<_>>(), vec![1, 2, 3]);

        service.delete(id).unwrap();
        assert!(service.paper(id).is_err());
        assert!(service.finalize(id).is_err());
        // 删除试卷不回退使用次数
        assert_eq!(bank.question(1).unwrap().usage_count, 1);
    }
}
