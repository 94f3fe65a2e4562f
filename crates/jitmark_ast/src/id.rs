//! Deterministic node identities.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{NodeKind, SourceSpan};

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// A stable 64-bit node identity.
///
/// Ids are derived from `(kind, span, ordinal, parent)` with an FNV-1a style
/// mix, so the same logical node gets the same id on every parse of the same
/// text, in every process. Distinct nodes can collide; nothing here detects it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    /// Id of the document root and parent of every top-level block.
    pub const ROOT: NodeId = NodeId(0);

    /// Wraps a raw id value.
    #[inline]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw id value.
    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Derives the id of a node from its structural position.
    pub const fn derive(kind: NodeKind, span: SourceSpan, ordinal: usize, parent: NodeId) -> Self {
        let inputs = [
            kind as u64,
            span.start as u64,
            span.end as u64,
            ordinal as u64,
            parent.0,
        ];

        let mut hash = FNV_OFFSET_BASIS;
        let mut i = 0;
        while i < inputs.len() {
            hash ^= inputs[i];
            hash = hash.wrapping_mul(FNV_PRIME);
            i += 1;
        }
        Self(hash)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016X}", self.0)
    }
}
