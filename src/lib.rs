pub mod config;
pub mod dome;
pub mod error;
pub mod filter;
pub mod flatten;
pub mod math;
pub mod members;
pub mod session;
pub mod sink;
pub mod solid;
pub mod tessellation;

pub use config::DomeConfig;
pub use dome::{Dome, DomeMesh, DomeStatistics};
pub use error::{GeodomeError, Result};
pub use sink::{GeneratedSolid, GeometrySink, MemorySink, ObjSink};
pub use solid::PlatonicSolid;
