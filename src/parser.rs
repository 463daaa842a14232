use crate::ast::{ClassItem, RegexNode};
use crate::error::{Error, Result};
use crate::lexer::{Lexer, Token};

/// Maximum height of the expression tree a pattern may produce.
///
/// Parsing, matching and dropping the tree all recurse once per level, so
/// deeper patterns are rejected with [`Error::NestingTooDeep`].
pub const MAX_NESTING_DEPTH: usize = 1000;

/// Recursive-descent parser for patterns.
///
/// Pulls tokens from a [`Lexer`] one at a time, with a single token of
/// lookahead.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    peeked: Option<Option<Token>>,
    open_parens: usize,
}

/// A node together with the height of its subtree.
struct Parsed {
    node: RegexNode,
    height: usize,
}

impl Parsed {
    fn leaf(node: RegexNode) -> Self {
        Self { node, height: 1 }
    }

    fn parent(node: RegexNode, child_height: usize) -> Result<Self> {
        let height = child_height + 1;
        if height > MAX_NESTING_DEPTH {
            return Err(Error::NestingTooDeep);
        }
        Ok(Self { node, height })
    }
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given pattern.
    pub fn new(pattern: &'a [u8]) -> Self {
        Self {
            lexer: Lexer::new(pattern),
            peeked: None,
            open_parens: 0,
        }
    }

    /// Entry point for parsing a whole pattern.
    ///
    /// Example:
    /// - Pattern: `ab|c` → Alt(Seq([Literal('a'), Literal('b')]), Seq([Literal('c')]))
    pub fn parse(&mut self) -> Result<RegexNode> {
        Ok(self.parse_group(false)?.node)
    }

    /// Look at the next token without consuming it.
    fn peek(&mut self) -> Result<Option<Token>> {
        if let Some(token) = self.peeked {
            return Ok(token);
        }
        let token = self.lexer.next_token()?;
        self.peeked = Some(token);
        Ok(token)
    }

    /// Consume and return the next token.
    fn advance(&mut self) -> Result<Option<Token>> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.lexer.next_token(),
        }
    }

    /// Parse a sequence of atoms up to end of input, or up to the closing
    /// `)` when `inside_parens` is set.
    ///
    /// Each `|` closes the current sequence and makes it the right-hand
    /// side of a new alternation, so `a|b|c` → Alt(Alt(a, b), c).
    ///
    /// Examples:
    /// - Pattern: `abc`   → Seq([Literal('a'), Literal('b'), Literal('c')])
    /// - Pattern: `(xy)+` → Seq([Repeat { node: Seq([x, y]), min: 1, max: None }])
    fn parse_group(&mut self, inside_parens: bool) -> Result<Parsed> {
        let mut seq = Vec::new();
        let mut alt: Option<Parsed> = None;
        loop {
            let token = match self.advance()? {
                Some(token) => token,
                None if inside_parens => return Err(Error::UnmatchedParen),
                None => break,
            };
            match token {
                Token::RParen if inside_parens => break,
                Token::RParen => return Err(Error::UnmatchedParen),
                Token::Dot => seq.push(Parsed::leaf(RegexNode::Any)),
                Token::LBracket => seq.push(Parsed::leaf(self.parse_char_class()?)),
                Token::LParen => {
                    if self.open_parens >= MAX_NESTING_DEPTH {
                        return Err(Error::NestingTooDeep);
                    }
                    self.open_parens += 1;
                    let group = self.parse_group(true)?;
                    self.open_parens -= 1;
                    seq.push(group);
                }
                Token::Pipe => {
                    let lhs = join(alt.take(), std::mem::take(&mut seq))?;
                    alt = Some(lhs);
                }
                Token::QuestionMark => quantify(&mut seq, 0, Some(1))?,
                Token::Star => quantify(&mut seq, 0, None)?,
                Token::Plus => quantify(&mut seq, 1, None)?,
                Token::LBrace => match self.parse_repetition_bounds()? {
                    Some((min, max)) => quantify(&mut seq, min, max)?,
                    None => seq.push(Parsed::leaf(RegexNode::Literal('{'))),
                },
                // `]`, `}` and `^` have no meaning out here.
                token => seq.push(Parsed::leaf(RegexNode::Literal(token.glyph()))),
            }
        }
        join(alt, seq)
    }

    /// Parse the body of `{m,n}` after the opening brace.
    ///
    /// Returns `None`, consuming nothing, when the brace is not followed by
    /// a digit or a comma; the brace is then an ordinary character.
    ///
    /// Examples:
    /// - `{3}`   → (3, Some(3))
    /// - `{2,}`  → (2, None)
    /// - `{,5}`  → (0, Some(5))
    fn parse_repetition_bounds(&mut self) -> Result<Option<(usize, Option<usize>)>> {
        match self.peek()? {
            Some(Token::Literal(c)) if c.is_ascii_digit() || c == ',' => {}
            _ => return Ok(None),
        }
        let min = self.parse_count()?;
        let max = if self.peek()? == Some(Token::Literal(',')) {
            self.advance()?;
            self.parse_count()?
        } else {
            min
        };
        if self.advance()? != Some(Token::RBrace) {
            return Err(Error::UnterminatedRepetition);
        }
        let min = min.unwrap_or(0);
        if let Some(max) = max {
            if min > max {
                return Err(Error::InvalidRepetitionCount(format!("{min},{max}")));
            }
        }
        Ok(Some((min, max)))
    }

    /// Parse a run of decimal digits, `None` if there are none.
    fn parse_count(&mut self) -> Result<Option<usize>> {
        let mut digits = String::new();
        while let Some(Token::Literal(c)) = self.peek()? {
            if !c.is_ascii_digit() {
                break;
            }
            digits.push(c);
            self.advance()?;
        }
        if digits.is_empty() {
            return Ok(None);
        }
        digits
            .parse::<usize>()
            .map(Some)
            .map_err(|_| Error::InvalidRepetitionCount(digits))
    }

    /// Parse a character class after the opening `[`.
    ///
    /// Inside the brackets every metacharacter except `]` is an ordinary
    /// character. A `-` between two characters forms a range; at either end
    /// of the class it is literal.
    ///
    /// Examples:
    /// - Pattern: `[abc]`   → CharClass { items: [Char('a'), Char('b'), Char('c')], .. }
    /// - Pattern: `[^0-9-]` → CharClass { items: [Range('0', '9'), Char('-')], negated: true }
    fn parse_char_class(&mut self) -> Result<RegexNode> {
        let negated = if self.peek()? == Some(Token::Caret) {
            self.advance()?;
            true
        } else {
            false
        };
        let mut items = Vec::new();
        loop {
            let c = match self.advance()? {
                None => return Err(Error::UnterminatedCharacterClass),
                Some(Token::RBracket) => break,
                Some(token) => token.glyph(),
            };
            if c == '-' {
                if let Some(&ClassItem::Char(from)) = items.last() {
                    if let Some(next) = self.peek()?.filter(|t| *t != Token::RBracket) {
                        self.advance()?;
                        let to = next.glyph();
                        if from > to {
                            return Err(Error::InvalidRange { from, to });
                        }
                        items.pop();
                        items.push(ClassItem::Range(from, to));
                        continue;
                    }
                }
            }
            items.push(ClassItem::Char(c));
        }
        if items.is_empty() {
            return Err(Error::EmptyCharacterClass);
        }
        Ok(RegexNode::CharClass { items, negated })
    }
}

/// Close the current sequence, attaching it to the pending alternation.
fn join(alt: Option<Parsed>, seq: Vec<Parsed>) -> Result<Parsed> {
    let height = seq.iter().map(|p| p.height).max().unwrap_or(0);
    let nodes = seq.into_iter().map(|p| p.node).collect();
    let rhs = Parsed::parent(RegexNode::Seq(nodes), height)?;
    match alt {
        Some(lhs) => {
            let height = lhs.height.max(rhs.height);
            Parsed::parent(RegexNode::alt(lhs.node, rhs.node), height)
        }
        None => Ok(rhs),
    }
}

/// Replace the last node of `seq` with a repetition of itself.
fn quantify(seq: &mut Vec<Parsed>, min: usize, max: Option<usize>) -> Result<()> {
    let last = seq.pop().ok_or(Error::MissingQuantifierOperand)?;
    let node = RegexNode::repeat(last.node, min, max);
    seq.push(Parsed::parent(node, last.height)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ast::ClassItem::{Char, Range};
    use crate::ast::RegexNode::{Any, CharClass, Literal, Seq};

    fn parse(pattern: &str) -> Result<RegexNode> {
        Parser::new(pattern.as_bytes()).parse()
    }

    fn lit(s: &str) -> Vec<RegexNode> {
        s.chars().map(Literal).collect()
    }

    fn class(items: Vec<ClassItem>, negated: bool) -> RegexNode {
        Seq(vec![CharClass { items, negated }])
    }

    #[test]
    fn empty_pattern() {
        assert_eq!(parse("").unwrap(), Seq(vec![]));
    }

    #[test]
    fn sequence() {
        assert_eq!(
            parse("a.c").unwrap(),
            Seq(vec![Literal('a'), Any, Literal('c')])
        );
    }

    #[test]
    fn alternation_is_left_associative() {
        assert_eq!(
            parse("ab|cd|ef").unwrap(),
            RegexNode::alt(
                RegexNode::alt(Seq(lit("ab")), Seq(lit("cd"))),
                Seq(lit("ef")),
            )
        );
    }

    #[test]
    fn alternation_inside_group() {
        assert_eq!(
            parse("a(b|c)").unwrap(),
            Seq(vec![Literal('a'), RegexNode::alt(Seq(lit("b")), Seq(lit("c")))])
        );
    }

    #[test]
    fn quantifiers() {
        assert_eq!(
            parse("a?b*c+").unwrap(),
            Seq(vec![
                RegexNode::repeat(Literal('a'), 0, Some(1)),
                RegexNode::repeat(Literal('b'), 0, None),
                RegexNode::repeat(Literal('c'), 1, None),
            ])
        );
    }

    #[test]
    fn quantified_group() {
        assert_eq!(
            parse("(xy)+").unwrap(),
            Seq(vec![RegexNode::repeat(Seq(lit("xy")), 1, None)])
        );
    }

    #[test]
    fn requantified_repetition() {
        let plus = RegexNode::repeat(Literal('a'), 1, None);
        assert_eq!(
            parse("a++").unwrap(),
            Seq(vec![RegexNode::repeat(plus, 1, None)])
        );
    }

    #[test]
    fn bounded_repetition() {
        let bounds = |pattern: &str| match parse(pattern).unwrap() {
            Seq(nodes) => match &nodes[..] {
                [RegexNode::Repeat { min, max, .. }] => (*min, *max),
                other => panic!("unexpected nodes: {:?}", other),
            },
            other => panic!("unexpected node: {:?}", other),
        };
        assert_eq!(bounds("x{3}"), (3, Some(3)));
        assert_eq!(bounds("x{2,5}"), (2, Some(5)));
        assert_eq!(bounds("x{2,}"), (2, None));
        assert_eq!(bounds("x{,5}"), (0, Some(5)));
        assert_eq!(bounds("x{,}"), (0, None));
    }

    #[test]
    fn braces_without_bounds_are_literal() {
        assert_eq!(parse("a{}").unwrap(), Seq(lit("a{}")));
        assert_eq!(parse("a{b}").unwrap(), Seq(lit("a{b}")));
        assert_eq!(parse("{").unwrap(), Seq(lit("{")));
    }

    #[test]
    fn stray_closers_are_literal() {
        assert_eq!(parse("a]}^").unwrap(), Seq(lit("a]}^")));
    }

    #[test]
    fn char_class() {
        assert_eq!(
            parse("[ab]").unwrap(),
            class(vec![Char('a'), Char('b')], false)
        );
    }

    #[test]
    fn char_class_metacharacters_are_literal() {
        assert_eq!(
            parse("[.?*+()|^{[]").unwrap(),
            class(".?*+()|^{[".chars().map(Char).collect(), false)
        );
    }

    #[test]
    fn negated_char_class() {
        assert_eq!(parse("[^^]").unwrap(), class(vec![Char('^')], true));
        assert_eq!(parse(r"[^\^]").unwrap(), class(vec![Char('^')], true));
    }

    #[test]
    fn char_class_ranges() {
        assert_eq!(
            parse("[0-9-]").unwrap(),
            class(vec![Range('0', '9'), Char('-')], false)
        );
        assert_eq!(
            parse("[-a-cx-]").unwrap(),
            class(
                vec![Char('-'), Range('a', 'c'), Char('x'), Char('-')],
                false
            )
        );
        // A `-` right after a range does not start another one.
        assert_eq!(
            parse("[a-c-e]").unwrap(),
            class(vec![Range('a', 'c'), Char('-'), Char('e')], false)
        );
        assert_eq!(parse("[^-]").unwrap(), class(vec![Char('-')], true));
    }

    #[test]
    fn errors() {
        assert_eq!(parse(r"a\"), Err(Error::TrailingBackslash));
        assert_eq!(parse(r"\a"), Err(Error::InvalidEscape('a')));
        assert_eq!(parse("*a"), Err(Error::MissingQuantifierOperand));
        assert_eq!(parse("a|+"), Err(Error::MissingQuantifierOperand));
        assert_eq!(parse("(?)"), Err(Error::MissingQuantifierOperand));
        assert_eq!(parse("{2}"), Err(Error::MissingQuantifierOperand));
        assert_eq!(parse("a)"), Err(Error::UnmatchedParen));
        assert_eq!(parse("(a"), Err(Error::UnmatchedParen));
        assert_eq!(parse("((a)"), Err(Error::UnmatchedParen));
        assert_eq!(parse("[ab"), Err(Error::UnterminatedCharacterClass));
        assert_eq!(parse("[a-"), Err(Error::UnterminatedCharacterClass));
        assert_eq!(parse("[]"), Err(Error::EmptyCharacterClass));
        assert_eq!(parse("[^]"), Err(Error::EmptyCharacterClass));
        assert_eq!(
            parse("[z-a]"),
            Err(Error::InvalidRange { from: 'z', to: 'a' })
        );
        assert_eq!(parse("x{2"), Err(Error::UnterminatedRepetition));
        assert_eq!(parse("x{2,5"), Err(Error::UnterminatedRepetition));
        assert_eq!(parse("x{2;}"), Err(Error::UnterminatedRepetition));
        assert_eq!(
            parse("x{99999999999999999999999}"),
            Err(Error::InvalidRepetitionCount("99999999999999999999999".into()))
        );
        assert_eq!(
            parse("x{5,2}"),
            Err(Error::InvalidRepetitionCount("5,2".into()))
        );
    }

    #[test]
    fn first_error_wins() {
        assert_eq!(parse(r"(\q"), Err(Error::InvalidEscape('q')));
        assert_eq!(parse(r"[]\"), Err(Error::EmptyCharacterClass));
    }

    #[test]
    fn invalid_encoding() {
        assert_eq!(Parser::new(b"ab\xc3").parse(), Err(Error::InvalidEncoding));
    }

    #[test]
    fn nesting_limit() {
        let nested = |depth: usize| format!("{}a{}", "(".repeat(depth), ")".repeat(depth));
        // The top-level sequence and the innermost literal take two levels.
        assert!(parse(&nested(MAX_NESTING_DEPTH - 2)).is_ok());
        assert_eq!(
            parse(&nested(MAX_NESTING_DEPTH - 1)),
            Err(Error::NestingTooDeep)
        );
        assert_eq!(parse(&nested(5000)), Err(Error::NestingTooDeep));
        assert_eq!(parse(&"(".repeat(5000)), Err(Error::NestingTooDeep));
    }

    #[test]
    fn quantifier_chain_limit() {
        let chain = |len: usize| format!("a{}", "+".repeat(len));
        assert!(parse(&chain(MAX_NESTING_DEPTH - 2)).is_ok());
        assert_eq!(
            parse(&chain(MAX_NESTING_DEPTH - 1)),
            Err(Error::NestingTooDeep)
        );
        assert_eq!(parse(&chain(200_000)), Err(Error::NestingTooDeep));
    }

    #[test]
    fn alternation_chain_limit() {
        let chain = |len: usize| vec!["a"; len].join("|");
        assert!(parse(&chain(MAX_NESTING_DEPTH - 1)).is_ok());
        assert_eq!(parse(&chain(MAX_NESTING_DEPTH)), Err(Error::NestingTooDeep));
    }
}
