//! Property-based test generators using proptest.
//!
//! Provides strategies for generating quotes and collections that keep the
//! repository invariants, plus inputs that deliberately break them.

use quotebook_core::Quote;
use proptest::prelude::*;

/// Strategy for category names drawn from a small pool, so filters hit.
pub fn category_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["Motivation", "Faith", "Humor", "Science", "Server"])
        .prop_map(String::from)
}

/// Strategy for text that is non-empty after trimming.
pub fn field_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[ ]{0,2}[A-Za-z0-9.,'!?][A-Za-z0-9 .,'!?]{0,40}")
        .expect("Invalid regex")
}

/// Strategy for text that is empty after trimming.
pub fn blank_field_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[ \t\n]{0,4}").expect("Invalid regex")
}

/// Strategy for valid quotes.
pub fn quote_strategy() -> impl Strategy<Value = Quote> {
    (field_strategy(), category_strategy())
        .prop_map(|(text, category)| Quote::new(text, category).expect("generated quote is valid"))
}

/// Strategy for collections of valid quotes, duplicates allowed.
pub fn collection_strategy(max_len: usize) -> impl Strategy<Value = Vec<Quote>> {
    prop::collection::vec(quote_strategy(), 0..=max_len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::strategy::ValueTree;
    use proptest::test_runner::TestRunner;

    #[test]
    fn generated_fields_are_non_blank() {
        let mut runner = TestRunner::default();
        for _ in 0..50 {
            let value = field_strategy().new_tree(&mut runner).unwrap().current();
            assert!(!value.trim().is_empty());
        }
    }

    #[test]
    fn generated_blank_fields_are_blank() {
        let mut runner = TestRunner::default();
        for _ in 0..50 {
            let value = blank_field_strategy()
                .new_tree(&mut runner)
                .unwrap()
                .current();
            assert!(value.trim().is_empty());
        }
    }
}
