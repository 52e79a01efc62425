//! Error types for the `questmind-engine` crate.
//!
//! Domain rule violations are not errors here; they surface as
//! [`Rejection`](crate::validation::Rejection) values. [`EngineError`] covers
//! the few genuinely exceptional cases: invalid weight tables and arithmetic
//! that would overflow.

/// Errors raised by the engine's calculators.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A weighted draw was configured with an unusable weight table.
    #[error("invalid {table} weights: {source}")]
    InvalidWeights {
        /// Which table was being sampled (e.g. `"class"`).
        table: &'static str,
        /// The underlying sampling error.
        source: rand::distr::weighted::Error,
    },

    /// An integer computation overflowed.
    #[error("arithmetic overflow: {context}")]
    ArithmeticOverflow {
        /// What was being computed.
        context: &'static str,
    },
}
