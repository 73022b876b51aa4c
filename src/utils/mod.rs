pub mod environment;
pub mod files;

pub use environment::ContextConfig;
pub use files::{
    MAX_FILE_SIZE_BYTES, load_conversation, read_input, read_text_file, validate_file_size,
};
