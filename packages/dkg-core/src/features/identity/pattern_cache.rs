//! Compiled-pattern cache for constraint glob matching: `*` = any run of
//! characters, `?` = exactly one, always anchored to a full match (no
//! substring-containment fallback).

use regex::Regex;
use std::cell::RefCell;
use std::collections::HashMap;

#[derive(Default)]
pub struct PatternCache {
    compiled: RefCell<HashMap<String, Regex>>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether `candidate` fully matches `pattern`, compiling and
    /// caching the pattern's regex on first use.
    pub fn matches(&self, pattern: &str, candidate: &str) -> bool {
        if !pattern.contains('*') && !pattern.contains('?') {
            return pattern == candidate;
        }
        let mut cache = self.compiled.borrow_mut();
        let re = cache
            .entry(pattern.to_string())
            .or_insert_with(|| compile_glob(pattern));
        re.is_match(candidate)
    }
}

fn compile_glob(pattern: &str) -> Regex {
    let mut out = String::from("^");
    for c in pattern.chars() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            _ => out.push_str(&regex::escape(&c.to_string())),
        }
    }
    out.push('$');
    Regex::new(&out).unwrap_or_else(|_| Regex::new("^$").unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_pattern_requires_exact_match() {
        let cache = PatternCache::new();
        assert!(cache.matches("clk", "clk"));
        assert!(!cache.matches("clk", "clk_buf"));
        assert!(!cache.matches("clk", "top/clk"));
    }

    #[test]
    fn star_matches_any_run() {
        let cache = PatternCache::new();
        assert!(cache.matches("top/*/clk", "top/sub/clk"));
        assert!(!cache.matches("top/*/clk", "top/clk"));
    }

    #[test]
    fn question_matches_one_char() {
        let cache = PatternCache::new();
        assert!(cache.matches("reg?", "reg0"));
        assert!(!cache.matches("reg?", "reg10"));
    }

    #[test]
    fn cache_reuses_compiled_regex() {
        let cache = PatternCache::new();
        assert!(cache.matches("a*b", "aXXb"));
        assert!(cache.matches("a*b", "ab"));
        assert_eq!(cache.compiled.borrow().len(), 1);
    }
}
