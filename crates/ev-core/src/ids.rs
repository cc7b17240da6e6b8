//! Dense index types for the road graph.
//!
//! A `NodeId` is only a position in the network's node arrays.  The
//! identity of a node is its normalized coordinate (see
//! [`crate::geo::CoordKey`]); the network keeps the coordinate → `NodeId`
//! map.  `EdgeId`s index the CSR edge arrays and `SegmentId`s the caller's
//! input segment slice.

use std::fmt;

macro_rules! index_type {
    ($(#[$attr:meta])* $name:ident, $label:literal) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub u32);

        impl $name {
            /// Placeholder for "no such element" in dense arrays, e.g. the
            /// predecessor edge of a search root.
            pub const INVALID: $name = $name(u32::MAX);

            /// Wrap a slice position.
            ///
            /// Graphs are capped below `u32::MAX` elements; exceeding that is
            /// a construction bug, caught in debug builds.
            #[inline]
            pub fn from_index(i: usize) -> Self {
                debug_assert!(i < u32::MAX as usize, "{} index {i} out of range", $label);
                $name(i as u32)
            }

            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}#{}", $label, self.0)
                } else {
                    write!(f, "{}#-", $label)
                }
            }
        }
    };
}

index_type!(
    /// Position of a node in the network's node arrays.
    NodeId, "node"
);

index_type!(
    /// Position of a directed edge in the CSR edge arrays.
    EdgeId, "edge"
);

index_type!(
    /// Position of a road segment in the caller's input slice.
    SegmentId, "segment"
);
