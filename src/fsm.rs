//! Key-sequence recognizer: a deterministic trie mapping byte sequences to
//! [`CommandId`]s, distinguishing prefixes (keep reading) from dead ends
//! (emit what was read as literal text).

use std::collections::HashMap;

/// A stable identifier for every built-in editing command, usable in
/// caller-supplied binding tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    BackwardChar,
    ForwardChar,
    BackwardWord,
    ForwardWord,
    BeginningOfLine,
    EndOfLine,
    PreviousHistory,
    NextHistory,
    BeginningOfHistory,
    EndOfHistory,
    DeleteChar,
    BackwardDeleteChar,
    ForwardKillLine,
    BackwardKillLine,
    ForwardKillWord,
    BackwardKillWord,
    Yank,
    Verbatim,
    AcceptLine,
    Terminate,
    EndOfFile,
}

/// Result of feeding one byte to the [`Fsm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedResult {
    /// More bytes are expected before a command can be resolved.
    Inner,
    /// A bound sequence completed; the state machine has reset to its root.
    Final(CommandId),
    /// The byte sequence read so far matches no binding; the state machine
    /// has reset to its root and the caller should treat the accumulated
    /// bytes as literal input.
    None,
}

#[derive(Debug, Default)]
struct Node {
    children: HashMap<u8, Node>,
    command: Option<CommandId>,
}

/// A single (byte sequence, command) pair used to build an [`Fsm`].
pub type Binding = (Vec<u8>, CommandId);

/// Deterministic trie recognizing key sequences.
///
/// Built from a flat list of bindings; later entries in the list override
/// earlier ones when their sequences collide exactly.
pub struct Fsm {
    root: Node,
    // Index of the node currently being walked, expressed as a path from
    // the root since Rust can't hold a live mutable reference across calls.
    path: Vec<u8>,
}

impl Fsm {
    /// Builds a trie from `bindings`. Later entries win on exact conflicts.
    pub fn new(bindings: &[Binding]) -> Self {
        let mut root = Node::default();
        for (sequence, command) in bindings {
            let mut node = &mut root;
            for &byte in sequence {
                node = node.children.entry(byte).or_default();
            }
            node.command = Some(*command);
        }
        Self {
            root,
            path: Vec::with_capacity(8),
        }
    }

    fn node_at(&self, path: &[u8]) -> Option<&Node> {
        let mut node = &self.root;
        for &byte in path {
            node = node.children.get(&byte)?;
        }
        Some(node)
    }

    /// Resets the walk back to the root, discarding any accumulated path.
    pub fn reset(&mut self) {
        self.path.clear();
    }

    /// Feeds one byte, advancing the walk.
    ///
    /// A node that is both terminal and has further children is treated as
    /// [`FeedResult::Inner`] until a subsequent byte dead-ends (`None`):
    /// prefixes that are also bound commands (e.g. a CSI lead byte that
    /// happens to carry its own binding) never fire the short match while a
    /// longer continuation is still possible.
    pub fn feed(&mut self, byte: u8) -> FeedResult {
        let current = self.node_at(&self.path).expect("path always resolves");
        if !current.children.contains_key(&byte) {
            self.reset();
            return FeedResult::None;
        }

        self.path.push(byte);
        let next = self.node_at(&self.path).expect("just inserted");

        if !next.children.is_empty() {
            log::trace!("fsm: inner state after {} bytes", self.path.len());
            FeedResult::Inner
        } else if let Some(command) = next.command {
            log::trace!("fsm: final state -> {command:?}");
            self.reset();
            FeedResult::Final(command)
        } else {
            // Dead node: neither terminal nor branching. Only reachable if
            // bindings were empty to begin with.
            self.reset();
            FeedResult::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CommandId::*;

    fn default_fsm() -> Fsm {
        Fsm::new(&[
            (vec![0x1B, b'[', b'A'], PreviousHistory),
            (vec![0x1B, b'[', b'B'], NextHistory),
            (vec![0x01], BeginningOfLine),
        ])
    }

    #[test]
    fn resolves_short_binding() {
        let mut fsm = default_fsm();
        assert_eq!(fsm.feed(0x01), FeedResult::Final(BeginningOfLine));
    }

    #[test]
    fn resolves_multi_byte_sequence() {
        let mut fsm = default_fsm();
        assert_eq!(fsm.feed(0x1B), FeedResult::Inner);
        assert_eq!(fsm.feed(b'['), FeedResult::Inner);
        assert_eq!(fsm.feed(b'A'), FeedResult::Final(PreviousHistory));
    }

    #[test]
    fn dead_end_yields_none_and_resets() {
        let mut fsm = default_fsm();
        assert_eq!(fsm.feed(0x1B), FeedResult::Inner);
        assert_eq!(fsm.feed(b'['), FeedResult::Inner);
        assert_eq!(fsm.feed(b'Q'), FeedResult::None);
        // State reset: an unrelated binding still resolves cleanly next.
        assert_eq!(fsm.feed(0x01), FeedResult::Final(BeginningOfLine));
    }

    #[test]
    fn unbound_first_byte_is_none_immediately() {
        let mut fsm = default_fsm();
        assert_eq!(fsm.feed(b'z'), FeedResult::None);
    }

    #[test]
    fn later_binding_overrides_earlier_on_exact_conflict() {
        let fsm = Fsm::new(&[(vec![0x01], BeginningOfLine), (vec![0x01], EndOfLine)]);
        let mut fsm = fsm;
        assert_eq!(fsm.feed(0x01), FeedResult::Final(EndOfLine));
    }
}
