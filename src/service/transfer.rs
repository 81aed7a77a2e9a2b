//! Import/export of the quote list as a JSON file.

use crate::error::QuoteError;
use crate::types::Quote;
use serde_json::Value;
use std::path::Path;

/// Name offered for downloads.
pub const EXPORT_FILE_NAME: &str = "quotes.json";

/// Pretty-printed JSON array of every quote.
pub fn export_json(quotes: &[Quote]) -> Result<String, QuoteError> {
    Ok(serde_json::to_string_pretty(quotes)?)
}

/// Parse file contents; anything but a JSON array is rejected, including
/// contents that are not UTF-8.
pub fn parse_import(contents: &[u8]) -> Result<Value, QuoteError> {
    let value: Value = serde_json::from_slice(contents)?;
    if !value.is_array() {
        return Err(QuoteError::ImportNotASequence);
    }
    Ok(value)
}

/// Read a whole file for import. Parsing happens in the quotes actor.
pub async fn read_import_file(path: &Path) -> Result<Vec<u8>, QuoteError> {
    Ok(tokio::fs::read(path).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn parse_import_rejects_garbage_and_objects() {
        assert!(matches!(
            parse_import(b"not json"),
            Err(QuoteError::Json(_))
        ));
        assert!(matches!(
            parse_import(br#"{"text":"a","category":"b"}"#),
            Err(QuoteError::ImportNotASequence)
        ));
        assert!(matches!(
            parse_import(&[b'[', b'"', 0xff, b'"', b']']),
            Err(QuoteError::Json(_))
        ));
        assert!(parse_import(b"[]").unwrap().as_array().unwrap().is_empty());
    }

    #[test]
    fn export_is_pretty_printed_array() {
        let out = export_json(&[Quote::new("a", "b")]).unwrap();
        assert!(out.starts_with("[\n"));
        assert!(out.contains("\"text\": \"a\""));
    }

    #[tokio::test]
    async fn exported_file_reads_back() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();
        let mut dir = std::env::temp_dir();
        dir.push(format!("quotekeeper-export-{}-{}", std::process::id(), nanos));
        tokio::fs::create_dir_all(&dir).await.unwrap();

        let quotes = vec![Quote::new("Stay hungry.", "Motivation")];
        let path = dir.join(EXPORT_FILE_NAME);
        tokio::fs::write(&path, export_json(&quotes).unwrap())
            .await
            .unwrap();

        let contents = read_import_file(&path).await.unwrap();
        let back: Vec<Quote> = serde_json::from_value(parse_import(&contents).unwrap()).unwrap();
        assert_eq!(back, quotes);

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
