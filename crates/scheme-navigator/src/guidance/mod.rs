//! Static, step-specific form guidance served by the form agent.

pub mod router;
pub mod table;

pub use router::{agent_router, FormAnalysisRequest};
pub use table::{GuidanceEntry, GuidanceError, GuidanceTable};
