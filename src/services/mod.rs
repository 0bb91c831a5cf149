pub mod paper_assembler;
pub mod paper_exporter;
pub mod paper_service;
pub mod question_bank;
pub mod warn_writer;

pub use paper_assembler::{assemble, SelectionResult, INSUFFICIENT_QUESTIONS};
pub use paper_exporter::PaperExporter;
pub use paper_service::PaperService;
pub use question_bank::{QuestionBank, QuestionFilter};
pub use warn_writer::WarnWriter;
