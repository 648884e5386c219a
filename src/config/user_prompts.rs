//! Interactive input for configuration updates

use crate::error::AppError;
use tokio::io::{self, AsyncBufReadExt};

/// Prompts for an API-Sports key on stdin and returns the trimmed input.
pub async fn prompt_for_api_key() -> Result<String, AppError> {
    println!("Please enter your API-Sports key: ");
    let mut input = String::new();
    let stdin = io::stdin();
    let mut reader = io::BufReader::new(stdin);
    reader.read_line(&mut input).await?;
    Ok(input.trim().to_string())
}
