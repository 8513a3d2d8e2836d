//! Console output

pub mod transcript;
