//! Claim checking against trusted web sources.
//!
//! A claim is searched on the web, hits from allow-listed domains are judged
//! by an NLI model, and the resulting evidence is combined with an optional
//! fake/real classifier score into a [`types::Verdict`]. Every external
//! collaborator may fail; the pipeline degrades towards `UNSURE` instead of
//! erroring.

pub mod classifier;
pub mod config;
pub mod error;
pub mod llm;
pub mod nli;
pub mod pipeline;
pub mod retrieve;
pub mod serper;
pub mod server;
pub mod trust;
pub mod types;
pub mod verdict;
pub mod verification;

pub use config::CheckConfig;
pub use error::{CheckError, CheckResult};
pub use pipeline::Checker;
pub use types::{CheckReport, Claim, EvidenceSet, SearchHit, Verdict, VerdictKind};
