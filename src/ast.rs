/// A node of a compiled pattern.
///
/// Groups have no node of their own: `(xy)` is just a nested `Seq`, or an
/// `Alt` when the group contains `|`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegexNode {
    Seq(Vec<RegexNode>),
    Alt(Box<RegexNode>, Box<RegexNode>),
    Repeat {
        node: Box<RegexNode>,
        min: usize,
        /// `None` means unbounded.
        max: Option<usize>,
    },
    Any,
    CharClass {
        items: Vec<ClassItem>,
        negated: bool,
    },
    Literal(char),
}

impl RegexNode {
    pub fn repeat(node: RegexNode, min: usize, max: Option<usize>) -> Self {
        RegexNode::Repeat {
            node: Box::new(node),
            min,
            max,
        }
    }

    pub fn alt(lhs: RegexNode, rhs: RegexNode) -> Self {
        RegexNode::Alt(Box::new(lhs), Box::new(rhs))
    }
}

/// A member of a character class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassItem {
    Char(char),
    /// Inclusive on both ends.
    Range(char, char),
}

impl ClassItem {
    pub fn contains(&self, c: char) -> bool {
        match *self {
            ClassItem::Char(x) => x == c,
            ClassItem::Range(from, to) => (from..=to).contains(&c),
        }
    }
}
