// docredact/src/commands/mod.rs
pub mod redact;
