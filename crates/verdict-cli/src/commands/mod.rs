//! CLI subcommands.

pub mod evaluate;
