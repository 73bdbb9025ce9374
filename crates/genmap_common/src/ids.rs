//! Opaque ID newtypes.
//!
//! [`define_id!`](crate::define_id) generates a thin `u32` wrapper usable as
//! an arena index. Downstream crates use it for role-graph nodes and netlist
//! bit ids so the two can never be mixed up.

/// Defines a `Copy` newtype over `u32` with `from_raw`/`as_raw`/`index`
/// accessors and a `Display` impl.
#[macro_export]
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug,
            serde::Serialize, serde::Deserialize,
        )]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` value.
            pub fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            /// Returns the raw `u32` value.
            pub fn as_raw(self) -> u32 {
                self.0
            }

            /// Returns the value as a `usize`, for indexing dense storage.
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}
