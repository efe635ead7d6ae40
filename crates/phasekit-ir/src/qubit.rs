//! Quantum and classical wires.
//!
//! Ids are dense indices handed out by the circuit in allocation order, so
//! `QubitId(i)` is also bit `i` of a statevector index.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! wire_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub u32);

        impl $name {
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }
    };
}

wire_id!(
    /// A qubit, displayed as `q3`.
    QubitId,
    "q"
);
wire_id!(
    /// A classical bit, displayed as `c3`.
    ClbitId,
    "c"
);

/// Position inside a named register such as `count[2]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegisterSlot {
    pub register: String,
    pub index: u32,
}

/// A qubit and the register it was allocated in, if any.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Qubit {
    pub id: QubitId,
    pub slot: Option<RegisterSlot>,
}

/// A classical bit and the register it was allocated in, if any.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Clbit {
    pub id: ClbitId,
    pub slot: Option<RegisterSlot>,
}

impl Qubit {
    pub fn new(id: QubitId) -> Self {
        Self { id, slot: None }
    }

    pub fn in_register(id: QubitId, register: impl Into<String>, index: u32) -> Self {
        Self {
            id,
            slot: Some(RegisterSlot {
                register: register.into(),
                index,
            }),
        }
    }
}

impl Clbit {
    pub fn new(id: ClbitId) -> Self {
        Self { id, slot: None }
    }

    pub fn in_register(id: ClbitId, register: impl Into<String>, index: u32) -> Self {
        Self {
            id,
            slot: Some(RegisterSlot {
                register: register.into(),
                index,
            }),
        }
    }
}

fn write_wire(
    f: &mut fmt::Formatter<'_>,
    slot: Option<&RegisterSlot>,
    id: &dyn fmt::Display,
) -> fmt::Result {
    match slot {
        Some(RegisterSlot { register, index }) => write!(f, "{register}[{index}]"),
        None => write!(f, "{id}"),
    }
}

impl fmt::Display for Qubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_wire(f, self.slot.as_ref(), &self.id)
    }
}

impl fmt::Display for Clbit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_wire(f, self.slot.as_ref(), &self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_names_win_over_ids() {
        assert_eq!(Qubit::new(QubitId(0)).to_string(), "q0");
        assert_eq!(
            Qubit::in_register(QubitId(5), "count", 2).to_string(),
            "count[2]"
        );
        assert_eq!(Clbit::new(ClbitId(3)).to_string(), "c3");
        assert_eq!(Clbit::in_register(ClbitId(0), "c", 0).to_string(), "c[0]");
    }

    #[test]
    fn test_ids_are_dense_indices() {
        assert_eq!(QubitId(7).index(), 7);
        assert_eq!(ClbitId::from(3).index(), 3);

        let mut ids = vec![QubitId(4), QubitId(0), QubitId(2)];
        ids.sort();
        assert_eq!(ids, vec![QubitId(0), QubitId(2), QubitId(4)]);
    }
}
