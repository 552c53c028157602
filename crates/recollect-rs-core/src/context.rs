//! Turns retrieved memory into a prompt-ready text block.

use recollect_rs_memory::MemoryItem;

/// Context text used when retrieval found nothing.
pub const NO_CONTEXT_SENTINEL: &str = "No relevant memory available.";

/// Concatenates memory contents, one per line, in retrieval order.
///
/// Items are neither re-ranked nor deduplicated.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextAssembler;

impl ContextAssembler {
    pub fn assemble(&self, items: &[MemoryItem]) -> String {
        if items.is_empty() {
            return NO_CONTEXT_SENTINEL.to_string();
        }
        items
            .iter()
            .map(|item| item.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether assembled text is the empty-context sentinel.
    pub fn is_sentinel(context: &str) -> bool {
        context == NO_CONTEXT_SENTINEL
    }
}

#[cfg(test)]
mod tests {
    use super::{ContextAssembler, NO_CONTEXT_SENTINEL};
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use recollect_rs_memory::{MemoryItem, Metadata, ScopeKey};
    use uuid::Uuid;

    fn item(content: &str) -> MemoryItem {
        MemoryItem {
            id: Uuid::new_v4(),
            scope: ScopeKey::Individual("CUST-1".to_string()),
            content: content.to_string(),
            metadata: Metadata::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn empty_history_yields_sentinel() {
        let context = ContextAssembler.assemble(&[]);
        assert_eq!(context, NO_CONTEXT_SENTINEL);
        assert!(!context.is_empty());
        assert!(ContextAssembler::is_sentinel(&context));
    }

    #[test]
    fn preserves_order_and_duplicates() {
        let items = vec![item("second claim"), item("first claim"), item("second claim")];
        assert_eq!(
            ContextAssembler.assemble(&items),
            "second claim\nfirst claim\nsecond claim"
        );
    }
}
