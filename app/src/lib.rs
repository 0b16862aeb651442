// In app/src/lib.rs

pub mod pipeline;
