//! Command-line surface for the `docbench-index` binary.
pub mod args;
