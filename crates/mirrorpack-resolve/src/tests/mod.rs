//! Crate-level BDD tests.

mod behaviour;
