//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，只做调度和统计，不做具体的组卷判断。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量组卷处理器
//! - 管理应用生命周期（初始化、运行）
//! - 加载题库与所有组卷请求（Vec<GenerateRequest>）
//! - 控制并发数量（Semaphore），串行化题库修改（Mutex）
//! - 写出题库快照，输出全局统计信息
//!
//! ### `paper_processor` - 单个组卷请求处理器
//! - 调用 PaperService 生成试卷
//! - 导出试卷、记录失败请求、清理请求文件
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<GenerateRequest>)
//!     ↓
//! paper_processor (处理单个 GenerateRequest)
//!     ↓
//! services (能力层：paper_service / paper_assembler / question_bank / exporter / warn)
//!     ↓
//! models (数据与 TOML 加载)
//! ```

pub mod batch_processor;
pub mod paper_processor;

// 重新导出主要类型
pub use batch_processor::{App, ProcessingStats};
pub use paper_processor::{process_request, GenerationState};
