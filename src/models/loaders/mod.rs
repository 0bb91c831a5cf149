pub mod toml_loader;

pub use toml_loader::{
    load_all_bank_files, load_all_requests, load_bank_file, load_generate_request, save_toml,
    BankFile,
};
