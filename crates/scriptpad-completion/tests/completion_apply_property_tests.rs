/// Property-based tests for applying completions to the buffer
use proptest::prelude::*;
use scriptpad_completion::{apply_completion, current_word, CompletionApplier, Symbol, SymbolKind};

fn buffer_strategy() -> impl Strategy<Value = String> {
    "[a-z_0-9 .()=,\n]{0,24}"
}

fn name_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_]{0,12}"
}

proptest! {
    /// Property: the word left of the returned cursor is exactly the applied name
    #[test]
    fn prop_word_under_cursor_is_name(
        buffer in buffer_strategy(),
        name in name_strategy(),
        at in any::<prop::sample::Index>()
    ) {
        let offset = at.index(buffer.len() + 1);
        let applied = apply_completion(&buffer, offset, &name).unwrap();
        prop_assert_eq!(current_word(&applied.text, applied.cursor).unwrap(), name.as_str());
    }

    /// Property: text outside the replaced span is untouched
    #[test]
    fn prop_surrounding_text_preserved(
        buffer in buffer_strategy(),
        name in name_strategy(),
        at in any::<prop::sample::Index>()
    ) {
        let offset = at.index(buffer.len() + 1);
        let applied = apply_completion(&buffer, offset, &name).unwrap();

        prop_assert!(applied.replaced.start <= offset && offset <= applied.replaced.end);
        prop_assert_eq!(&applied.text[..applied.replaced.start], &buffer[..applied.replaced.start]);
        prop_assert_eq!(&applied.text[applied.cursor..], &buffer[applied.replaced.end..]);
        prop_assert_eq!(applied.cursor, applied.replaced.start + name.len());
    }

    /// Property: offsets past the end are rejected
    #[test]
    fn prop_out_of_range_offset_rejected(
        buffer in buffer_strategy(),
        name in name_strategy(),
        past in 1usize..8
    ) {
        prop_assert!(apply_completion(&buffer, buffer.len() + past, &name).is_err());
    }

    /// Property: each accepted completion adds exactly one use
    #[test]
    fn prop_apply_counts_usage(name in name_strategy(), times in 1usize..6) {
        let applier = CompletionApplier::default();
        let symbol = Symbol::new(name.clone(), SymbolKind::UserVariable);
        for _ in 0..times {
            applier.apply("", 0, &symbol).unwrap();
        }
        prop_assert_eq!(applier.history().usage_count(&name).unwrap(), times as u64);
        prop_assert_eq!(applier.history().recency_rank(&name).unwrap(), Some(0));
    }
}

#[test]
fn test_replaces_whole_word_mid_identifier() {
    let applied = apply_completion("blur = nuke.creaXYZ(x)", 16, "createNode").unwrap();
    assert_eq!(applied.text, "blur = nuke.createNode(x)");
    assert_eq!(applied.cursor, 22);
}

#[test]
fn test_multibyte_buffer() {
    let buffer = "naïve = 1\nna";
    let applied = apply_completion(buffer, buffer.len(), "naïve").unwrap();
    assert_eq!(applied.text, "naïve = 1\nnaïve");
    assert_eq!(applied.cursor, applied.text.len());
}
