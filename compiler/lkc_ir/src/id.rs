//! Flat-arena indices.
//!
//! Grammars, node types and token kinds live in `Vec`-backed arenas and refer
//! to each other through these `u32` indices instead of boxed trees.

/// Define a `u32` index newtype with an `INVALID` sentinel.
macro_rules! define_index {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Sentinel for "not yet assigned".
            pub const INVALID: $name = $name(u32::MAX);

            #[inline]
            pub const fn new(index: u32) -> Self {
                $name(index)
            }

            /// Index into the owning arena.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            #[inline]
            pub const fn is_valid(self) -> bool {
                self.0 != u32::MAX
            }

            /// Build the index of the next arena slot.
            ///
            /// Arenas are bounded by `u32::MAX - 1` entries.
            #[inline]
            pub(crate) fn from_len(len: usize) -> Self {
                let raw = u32::try_from(len).unwrap_or(u32::MAX - 1);
                debug_assert!(raw < u32::MAX, "arena overflow");
                $name(raw)
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", stringify!($name), self.0)
                } else {
                    write!(f, "{}::INVALID", stringify!($name))
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }
    };
}

define_index!(
    /// Index of a combinator in a [`Grammar`](crate::Grammar).
    ParserId
);
define_index!(
    /// Index of a named rule in a [`Grammar`](crate::Grammar).
    RuleId
);
define_index!(
    /// Index of a node type in [`NodeTypes`](crate::NodeTypes).
    NodeTypeId
);
define_index!(
    /// Index of a parse field in [`NodeTypes`](crate::NodeTypes).
    FieldId
);
define_index!(
    /// Index of a token kind in [`TokenKinds`](crate::TokenKinds).
    TokenKindId
);
