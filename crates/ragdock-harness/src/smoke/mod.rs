//! Sequential smoke checks against the orchestration API.

mod plan;
mod predicate;
mod runner;
mod transport;

pub use plan::{GenerateRequest, QueryRequest, SmokeCheck, SmokePlan};
pub use predicate::{first_missing, JsonKeyPredicate, ResponsePredicate, SubstringPredicate};
pub use runner::{SmokeCheckRecord, SmokeRunner};
pub use transport::{ReqwestTransport, Transport, TransportResponse};
