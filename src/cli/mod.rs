//! CLI subcommand implementations for the Vantage binary.

pub mod doctor;
pub mod verify_cmd;
