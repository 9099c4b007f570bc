// docredact/src/ui/mod.rs
pub mod summary;
