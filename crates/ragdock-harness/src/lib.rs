//! # ragdock harness
//!
//! Two independent flows around a local RAG demo stack:
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────────┐
//! │ Readiness    │ --> │ Pull base    │ --> │ Create derived   │ --> Done
//! │ gate (tags)  │     │ model        │     │ model (tolerant) │
//! └──────────────┘     └──────────────┘     └──────────────────┘
//!
//! ┌──────────┐     ┌──────────┐     ┌────────────┐
//! │ /seed    │ --> │ /query   │ --> │ /generate  │   (each response saved)
//! └──────────┘     └──────────┘     └────────────┘
//! ```
//!
//! The seams (`HealthProbe`, `ModelRuntime`, `Sleeper`, `Transport`,
//! `ResponsePredicate`) are traits so the flows can run against fakes.

pub mod bootstrap;
mod config;
mod error;
pub mod gate;
pub mod probe;
pub mod runtime;
pub mod smoke;

pub use bootstrap::{Bootstrap, BootstrapReport, BootstrapState, DerivedOutcome};
pub use config::{BootstrapConfig, BootstrapConfigBuilder, SmokeConfig, DEFAULT_API_BASE};
pub use error::HarnessError;
pub use gate::{ReadinessGate, Sleeper, TokioSleeper};
pub use probe::{HealthProbe, HttpProbe};
pub use runtime::{ModelRuntime, OllamaRuntime};
pub use smoke::{
    GenerateRequest, JsonKeyPredicate, QueryRequest, ReqwestTransport, ResponsePredicate,
    SmokeCheck, SmokeCheckRecord, SmokePlan, SmokeRunner, SubstringPredicate, Transport,
    TransportResponse,
};
