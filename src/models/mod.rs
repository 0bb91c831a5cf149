pub mod distribution;
pub mod loaders;
pub mod paper;
pub mod question;
pub mod subject;
pub mod taxonomy;

pub use distribution::Distribution;
pub use loaders::{
    load_all_bank_files, load_all_requests, load_bank_file, load_generate_request, save_toml,
    BankFile,
};
pub use paper::{GenerateRequest, Paper, PaperConfig, PaperDocument, PaperStatus};
pub use question::{McqOptions, Question, QuestionId, QuestionUpdate};
pub use subject::Subject;
pub use taxonomy::{BloomsLevel, Difficulty, QuestionType};
