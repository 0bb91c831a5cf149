//! # Question Paper Generator
//!
//! 根据题库自动组卷：题目按科目、布鲁姆认知层级、难度、题型和分值打标签，
//! 组卷请求给出目标总分及两级分布（各认知层级占总分的百分比、层级内各难度的百分比），
//! 系统从题库中选出一组尽量贴近目标、并优先使用较少被用过的题目。
//!
//! ## 架构设计
//!
//! ### ① 数据层（Models）
//! - `models/` - 题目、科目、试卷、有序分布表，以及 TOML 加载/写出
//!
//! ### ② 业务能力层（Services）
//! - `paper_assembler` - 组卷算法（纯计算，无副作用）
//! - `QuestionBank` - 题库存储与使用次数
//! - `PaperService` - 组卷请求 → 试卷记录
//! - `PaperExporter` / `WarnWriter` - 导出试卷、记录失败请求
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量请求处理器，管理资源和并发
//! - `orchestrator/paper_processor` - 单个请求处理器
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{
    BloomsLevel, Difficulty, Distribution, GenerateRequest, Paper, PaperConfig, Question,
    QuestionType, Subject,
};
pub use orchestrator::{App, ProcessingStats};
pub use services::{assemble, PaperService, QuestionBank, SelectionResult};
