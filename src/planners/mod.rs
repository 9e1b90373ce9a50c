pub mod audit;
pub mod extension;
pub mod road;

pub use audit::{AuditSummary, BlockingSiteAuditor, Cluster, ProvisionalRemoval};
pub use extension::ExtensionPlanner;
pub use road::{RoadRequest, RoadSynthesizer};
