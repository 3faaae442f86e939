pub mod audit;
pub mod phrases;
pub mod report;

pub use audit::{
    engine::{AuditEngine, AuditRunner},
    AuditConfig, AuditResult, AuditTarget, BenchmarkProvider, BenchmarkStats,
    ConfigValidationError, Effort, Impact, KeywordAnalysis, Priority, RawSignals, Recommendation,
    ReferenceItem, ScoreBreakdown, SignalProvider, Signals,
};
pub use phrases::{DefaultPhrases, FilePhraseRepository, PhraseLookup};
