//! A small regular expression engine.
//!
//! Patterns are always matched against the whole input, as if written
//! `^pattern$`. Repetition is greedy and never backtracks: `a*a` matches
//! nothing, since `a*` takes every `a` and leaves none for the final
//! literal.
//!
//! ```
//! let re = sre::compile("[0-9]+(-[0-9]+)*").unwrap();
//! assert!(re.is_match("209-238-9034"));
//! assert!(!re.is_match("209-238-"));
//! ```

use std::str::FromStr;

use bstr::ByteSlice;
use log::debug;

pub mod ast;
pub mod error;
pub mod lexer;
pub mod matcher;
pub mod parser;

pub use error::{Error, Result};

use crate::ast::RegexNode;

/// A compiled pattern.
///
/// Immutable once built, so it can be shared freely between threads.
#[derive(Debug, Clone)]
pub struct Regex {
    root: RegexNode,
}

impl Regex {
    /// Compile `pattern`. Same as [`compile`].
    pub fn new<P: AsRef<[u8]>>(pattern: P) -> Result<Self> {
        let pattern = pattern.as_ref();
        match parser::Parser::new(pattern).parse() {
            Ok(root) => {
                debug!("compiled pattern {:?}", pattern.as_bstr());
                Ok(Self { root })
            }
            Err(err) => {
                debug!("failed to compile {:?}: {}", pattern.as_bstr(), err);
                Err(err)
            }
        }
    }

    /// Returns true if the pattern consumes all of `input`.
    pub fn is_match<I: AsRef<[u8]>>(&self, input: I) -> bool {
        let input = input.as_ref();
        matcher::consume(&self.root, input) == Some(input.len())
    }

    /// The root of the compiled expression tree.
    pub fn root(&self) -> &RegexNode {
        &self.root
    }
}

impl FromStr for Regex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Regex::new(s)
    }
}

/// Compile a pattern supplied at runtime.
pub fn compile<P: AsRef<[u8]>>(pattern: P) -> Result<Regex> {
    Regex::new(pattern)
}

/// Compile a pattern known when the calling code is written.
///
/// # Panics
///
/// Panics if `pattern` is malformed.
pub fn must_compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(re) => re,
        Err(err) => panic!("sre: compile({:?}): {}", pattern, err),
    }
}

/// Returns true if `re` matches the whole of `input`.
pub fn matches<I: AsRef<[u8]>>(re: &Regex, input: I) -> bool {
    re.is_match(input)
}
