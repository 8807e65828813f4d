#![forbid(unsafe_code)]

pub mod config;
pub mod datamodel;
pub mod enrich;
pub mod error;
pub mod infer;
pub mod merge;
pub mod normalize;
pub mod parsing;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
