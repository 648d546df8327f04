//! crates/collapse/src/rule.rs
//!
//! A single named substitution.

use regex::bytes::Regex;

use crate::error::{CollapseError, CollapseResult};

/// A named regex substitution. The name is also the replacement template.
#[derive(Clone, Debug)]
pub struct Rule {
    name: String,
    pattern: Regex,
}

impl Rule {
    /// Compiles `pattern` into a rule called `name`.
    pub fn new(name: impl Into<String>, pattern: &str) -> CollapseResult<Self> {
        let name = name.into();
        let pattern = Regex::new(pattern).map_err(|source| CollapseError::Pattern {
            name: name.clone(),
            source,
        })?;
        Ok(Self { name, pattern })
    }

    /// Rule name, used verbatim as the replacement template.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source text of the pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Replaces every match in `haystack`, writing the result to `out`.
    ///
    /// Returns the number of substitutions. When it is zero `out` is left
    /// empty and the caller should keep using `haystack`.
    pub fn apply(&self, haystack: &[u8], out: &mut Vec<u8>) -> usize {
        out.clear();
        let mut last = 0;
        let mut count = 0;
        for caps in self.pattern.captures_iter(haystack) {
            let Some(whole) = caps.get(0) else { continue };
            out.extend_from_slice(&haystack[last..whole.start()]);
            caps.expand(self.name.as_bytes(), out);
            last = whole.end();
            count += 1;
        }
        if count == 0 {
            return 0;
        }
        out.extend_from_slice(&haystack[last..]);
        count
    }
}
