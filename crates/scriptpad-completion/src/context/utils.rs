// Offset and identifier-run utilities

use crate::types::*;

/// Characters that may appear inside a Python identifier
pub fn is_identifier_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Check that `offset` is a valid cursor position in `text`
pub fn validate_offset(text: &str, offset: usize) -> CompletionResult<()> {
    if offset > text.len() || !text.is_char_boundary(offset) {
        return Err(CompletionError::InvalidOffset {
            offset,
            len: text.len(),
        });
    }
    Ok(())
}

/// Start of the identifier run ending at `offset`
fn run_start(text: &str, offset: usize) -> usize {
    text[..offset]
        .char_indices()
        .rev()
        .take_while(|(_, ch)| is_identifier_char(*ch))
        .last()
        .map(|(i, _)| i)
        .unwrap_or(offset)
}

/// End of the identifier run starting at `offset`
fn run_end(text: &str, offset: usize) -> usize {
    text[offset..]
        .char_indices()
        .find(|(_, ch)| !is_identifier_char(*ch))
        .map(|(i, _)| offset + i)
        .unwrap_or(text.len())
}

/// The identifier run immediately left of the cursor
pub fn current_word(text: &str, offset: usize) -> CompletionResult<&str> {
    validate_offset(text, offset)?;
    Ok(&text[run_start(text, offset)..offset])
}

/// Span replaced when a completion is accepted at `offset`
///
/// Covers the identifier run left of the cursor and, when that run is
/// non-empty, the run continuing to its right. An empty left run yields an
/// empty range at the cursor.
pub fn word_range(text: &str, offset: usize) -> CompletionResult<TextRange> {
    validate_offset(text, offset)?;
    let start = run_start(text, offset);
    if start == offset {
        return Ok(TextRange::empty(offset));
    }
    Ok(TextRange::new(start, run_end(text, offset)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_word() {
        assert_eq!(current_word("x = nuke.cre", 12).unwrap(), "cre");
        assert_eq!(current_word("x = ", 4).unwrap(), "");
        assert_eq!(current_word("", 0).unwrap(), "");
        assert_eq!(current_word("my_var2", 7).unwrap(), "my_var2");
    }

    #[test]
    fn test_word_range_mid_identifier() {
        // Cursor between "cre" and "ateNode"
        assert_eq!(word_range("createNode()", 3).unwrap(), TextRange::new(0, 10));
    }

    #[test]
    fn test_word_range_pure_insertion() {
        assert_eq!(word_range("(bar", 1).unwrap(), TextRange::empty(1));
        assert_eq!(word_range("a bar", 2).unwrap(), TextRange::empty(2));
    }

    #[test]
    fn test_invalid_offsets() {
        assert!(matches!(
            current_word("abc", 4),
            Err(CompletionError::InvalidOffset { offset: 4, len: 3 })
        ));
        // Inside the two-byte 'é'
        assert!(word_range("é", 1).is_err());
    }

    #[test]
    fn test_unicode_identifiers() {
        let text = "café = 1\ncaf";
        assert_eq!(current_word(text, text.len()).unwrap(), "caf");
        assert_eq!(word_range("café", 3).unwrap(), TextRange::new(0, 5));
    }
}
