use crate::ast::RegexNode;

/// Try to match `node` against a prefix of `input`.
///
/// Returns the number of bytes consumed, or `None` if the node does not
/// match here. A failing node never consumes anything.
pub fn consume(node: &RegexNode, input: &[u8]) -> Option<usize> {
    match node {
        RegexNode::Literal(c) => {
            let (ch, size) = decode(input)?;
            (ch == *c).then_some(size)
        }
        RegexNode::Any => decode(input).map(|(_, size)| size),
        RegexNode::CharClass { items, negated } => {
            let (ch, size) = decode(input)?;
            let found = items.iter().any(|item| item.contains(ch));
            (found != *negated).then_some(size)
        }
        RegexNode::Seq(nodes) => {
            let mut pos = 0;
            for n in nodes {
                pos += consume(n, &input[pos..])?;
            }
            Some(pos)
        }
        RegexNode::Alt(lhs, rhs) => consume(lhs, input).or_else(|| consume(rhs, input)),
        RegexNode::Repeat { node, min, max } => consume_repeat(node, *min, *max, input),
    }
}

// Greedy and single pass: take as many iterations as possible, then check
// the count. Fewer iterations are never retried.
fn consume_repeat(
    node: &RegexNode,
    min: usize,
    max: Option<usize>,
    input: &[u8],
) -> Option<usize> {
    let mut count = 0;
    let mut pos = 0;
    while pos < input.len() {
        match consume(node, &input[pos..]) {
            // No progress: the iteration does not count and the loop stops.
            Some(0) | None => break,
            Some(n) => {
                count += 1;
                pos += n;
            }
        }
    }
    let within_max = max.map_or(true, |max| count <= max);
    (count >= min && within_max).then_some(pos)
}

/// Decode the character at the start of `input`, with its width in bytes.
/// Invalid utf-8 counts as no character at all.
fn decode(input: &[u8]) -> Option<(char, usize)> {
    match bstr::decode_utf8(input) {
        (Some(ch), size) => Some((ch, size)),
        (None, _) => None,
    }
}
