use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::models::Conversation;

/// Maximum size of any input file: 10MB
pub const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Path argument that selects standard input
pub const STDIN_PATH: &str = "-";

/// Validates that a file is within the size limit
///
/// # Errors
///
/// Returns an error if the metadata cannot be read or the file exceeds [`MAX_FILE_SIZE_BYTES`]
pub fn validate_file_size(file: &File, path: &Path) -> Result<()> {
    let metadata = file
        .metadata()
        .with_context(|| format!("Failed to read file metadata: {}", path.display()))?;

    let file_size = metadata.len();
    if file_size > MAX_FILE_SIZE_BYTES {
        bail!(
            "File too large: {} ({} bytes, max {} bytes)",
            path.display(),
            file_size,
            MAX_FILE_SIZE_BYTES
        );
    }

    Ok(())
}

/// Read a UTF-8 text file after checking its size
pub fn read_text_file(path: &Path) -> Result<String> {
    let mut file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    validate_file_size(&file, path)?;

    let mut text = String::new();
    file.read_to_string(&mut text)
        .with_context(|| format!("Failed to read file as UTF-8: {}", path.display()))?;

    debug!(path = %path.display(), bytes = text.len(), "read input file");
    Ok(text)
}

/// Read input text from a file, or from stdin when the path is absent or `-`
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new(STDIN_PATH) => read_text_file(path),
        _ => read_limited(io::stdin().lock(), "stdin"),
    }
}

fn read_limited<R: Read>(reader: R, source: &str) -> Result<String> {
    let mut text = String::new();
    reader
        .take(MAX_FILE_SIZE_BYTES + 1)
        .read_to_string(&mut text)
        .with_context(|| format!("Failed to read {} as UTF-8", source))?;

    if text.len() as u64 > MAX_FILE_SIZE_BYTES {
        bail!("Input too large: {} (max {} bytes)", source, MAX_FILE_SIZE_BYTES);
    }

    Ok(text)
}

/// Load a conversation stored in the client's JSON shape
pub fn load_conversation(path: &Path) -> Result<Conversation> {
    let text = read_text_file(path)?;
    let conversation: Conversation = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse conversation: {}", path.display()))?;

    debug!(
        conversation_id = %conversation.id,
        messages = conversation.messages.len(),
        "loaded conversation"
    );
    Ok(conversation)
}
