//! Line-span computation over a file's top-level declarations.
//!
//! [`SpanWalk`] makes a single forward pass. Each node is held as *pending*
//! until a later node with a strictly greater line arrives; the pending node
//! is then released with `offset = next.line - pending.line`. Nodes whose
//! line does not exceed the pending node's are dropped. When the input runs
//! out, the last pending node is released with
//! `offset = total_lines - pending.line + 1`, but only while its line is
//! strictly below `total_lines`.

use crate::inspector::declaration::Declaration;

/// Anything with a (possibly unknown) 1-based start line.
pub trait Spanned {
    fn line(&self) -> Option<usize>;
}

impl Spanned for Declaration<'_> {
    fn line(&self) -> Option<usize> {
        Declaration::line(self)
    }
}

/// A node released by the walk together with the lines it occupies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span<T> {
    pub node: T,
    pub line: usize,
    pub offset: usize,
}

pub struct SpanWalk<I: Iterator> {
    nodes: I,
    total_lines: usize,
    cursor: usize,
    pending: Option<I::Item>,
    exhausted: bool,
}

impl<I> SpanWalk<I>
where
    I: Iterator,
    I::Item: Spanned,
{
    pub fn new(nodes: impl IntoIterator<IntoIter = I>, total_lines: usize) -> Self {
        Self {
            nodes: nodes.into_iter(),
            total_lines,
            cursor: 0,
            pending: None,
            exhausted: false,
        }
    }
}

/// Walks `nodes` in order against a file of `total_lines` lines.
pub fn walk<I>(nodes: I, total_lines: usize) -> SpanWalk<I::IntoIter>
where
    I: IntoIterator,
    I::Item: Spanned,
{
    SpanWalk::new(nodes, total_lines)
}

impl<I> Iterator for SpanWalk<I>
where
    I: Iterator,
    I::Item: Spanned,
{
    type Item = Span<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        for node in self.nodes.by_ref() {
            let Some(line) = node.line() else {
                tracing::trace!("Skipping node without a line number");
                continue;
            };

            match self.pending.take() {
                None => {
                    self.cursor = line;
                    self.pending = Some(node);
                }
                Some(previous) if line > self.cursor => {
                    let span = Span {
                        node: previous,
                        line: self.cursor,
                        offset: line - self.cursor,
                    };
                    self.cursor = line;
                    self.pending = Some(node);
                    return Some(span);
                }
                Some(previous) => {
                    tracing::debug!(
                        "Dropping node at line {} (cursor at line {})",
                        line,
                        self.cursor
                    );
                    self.pending = Some(previous);
                }
            }
        }

        self.exhausted = true;
        let last = self.pending.take()?;
        if self.cursor < self.total_lines {
            Some(Span {
                node: last,
                line: self.cursor,
                offset: self.total_lines - self.cursor + 1,
            })
        } else {
            None
        }
    }
}
