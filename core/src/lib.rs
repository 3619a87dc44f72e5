//! Port-probing engine and risk-scoring pipeline.

pub mod assessment;
pub mod features;
pub mod network;
pub mod probe;
pub mod scanner;
pub mod scorer;

#[cfg(test)]
mod testing;
