use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 业务逻辑错误
    #[error("业务错误: {0}")]
    Business(#[from] BusinessError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 业务逻辑错误
#[derive(Debug, Error)]
pub enum BusinessError {
    /// 科目不存在
    #[error("科目不存在: {subject_id}")]
    SubjectNotFound { subject_id: u64 },
    /// 题目不存在
    #[error("题目不存在: {question_id}")]
    QuestionNotFound { question_id: u64 },
    /// 试卷不存在
    #[error("试卷不存在: {paper_id}")]
    PaperNotFound { paper_id: u64 },
    /// 题目ID重复
    #[error("题目ID重复: {question_id}")]
    DuplicateQuestionId { question_id: u64 },
    /// 科目ID重复
    #[error("科目ID重复: {subject_id}")]
    DuplicateSubjectId { subject_id: u64 },
    /// 科目代码重复
    #[error("科目代码重复: {code}")]
    DuplicateSubjectCode { code: String },
    /// 分值必须为正整数
    #[error("题目 {question_id} 的分值无效: {marks}")]
    InvalidMarks { question_id: u64, marks: u32 },
    /// 题库中的题目不足以组卷
    #[error("组卷失败: {message}")]
    InsufficientQuestions { message: String },
    /// 缺少必填字段
    #[error("缺少必填字段: {field}")]
    MissingField { field: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置值无效
    #[error("配置项 {name} 的值无效: {reason}")]
    InvalidValue { name: String, reason: String },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建组卷失败错误
    pub fn insufficient_questions(message: impl Into<String>) -> Self {
        AppError::Business(BusinessError::InsufficientQuestions {
            message: message.into(),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_error_display_is_prefixed() {
        let err = AppError::from(BusinessError::SubjectNotFound { subject_id: 7 });
        assert_eq!(err.to_string(), "业务错误: 科目不存在: 7");
    }

    #[test]
    fn config_error_display_is_prefixed() {
        let err = AppError::from(ConfigError::InvalidValue {
            name: "MAX_CONCURRENT_REQUESTS".to_string(),
            reason: "必须大于 0".to_string(),
        });
        assert_eq!(err.to_string(), "配置错误: 配置项 MAX_CONCURRENT_REQUESTS 的值无效: 必须大于 0");
    }

    #[test]
    fn insufficient_questions_keeps_message() {
        let err = AppError::insufficient_questions("insufficient questions in bank.");
        assert!(err.to_string().contains("insufficient questions in bank."));
    }
}
