//! Internal test modules - whitebox tests with crate access
//!
//! Tests here drive the engine, the replay runner and the terminal host
//! together and can reach crate-private helpers.


mod view_snapshots;
