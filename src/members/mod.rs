//! Member generators.
//!
//! Each generator turns the filtered mesh into [`GeneratedSolid`]s. They do
//! not touch a sink; the dome build streams their output onward. A member
//! whose geometry is degenerate is skipped with a warning and counted.

mod base_frame;
mod frame;
mod hub;
mod panel;
mod plate;
mod revolve;
mod strut;

pub use base_frame::MakeBaseFrame;
pub use frame::{frame_offsets, orientate, MakeFrame};
pub use hub::MakeHubs;
pub use panel::MakePanels;
pub use plate::{Hexahedron, OffsetPlate};
pub use revolve::RevolveProfile;
pub use strut::MakeStruts;

use crate::error::GeometryError;
use crate::sink::{GeneratedSolid, SolidKind};

/// Solids produced by one generator, plus how many members were skipped.
#[derive(Debug, Default)]
pub struct Generated {
    pub solids: Vec<GeneratedSolid>,
    pub skipped: usize,
}

impl Generated {
    fn push_or_skip(&mut self, kind: SolidKind, index: usize, result: Result<GeneratedSolid, GeometryError>) {
        match result {
            Ok(solid) => self.solids.push(solid),
            Err(err) => {
                tracing::warn!(kind = kind.name(), index, %err, "skipping degenerate member");
                self.skipped += 1;
            }
        }
    }
}
