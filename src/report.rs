//! Per-face layout report for measurement overlays and the CLI

use std::fmt;

use crate::error::EditError;
use crate::facade::{resolve_master_face, FacadeResolver};
use crate::footprint::LoopDefect;
use crate::model::{BuildingConfig, FaceId, LayerId};

/// Measurements of one face
#[derive(Debug, Clone, PartialEq)]
pub struct FaceReport {
    pub face: FaceId,
    /// Current edge length
    pub length: f64,
    /// Resolved minimum width
    pub minimum: f64,
    /// Face whose facade is authoritative (itself when unlocked)
    pub master: FaceId,
    pub bays: usize,
    pub groups: usize,
    /// Whether the face is a live measurement guide of the current drag
    pub guide: bool,
}

/// Snapshot of a layer's footprint against its facade constraints
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutReport {
    pub layer: LayerId,
    pub area: f64,
    pub defect: Option<LoopDefect>,
    pub faces: Vec<FaceReport>,
}

impl LayoutReport {
    pub fn is_valid(&self) -> bool {
        self.defect.is_none()
    }

    pub fn face(&self, face: FaceId) -> Option<&FaceReport> {
        self.faces.iter().find(|f| f.face == face)
    }
}

/// Build the report for `layer`, marking `guides` as active drag guides
pub fn layout_report(
    building: &BuildingConfig,
    layer: &LayerId,
    guides: &[FaceId],
) -> Result<LayoutReport, EditError> {
    let floor = building.require_layer(layer)?;
    let resolver = FacadeResolver::for_building(building);
    let minimums = resolver.face_minimums(floor);
    let footprint = &floor.footprint;

    let faces = FaceId::ALL
        .iter()
        .map(|&face| {
            let master = resolve_master_face(&floor.locks, face, building.engine.max_lock_hops);
            let (bays, groups) = floor
                .facade(master)
                .map(|f| (f.bays.len(), f.groups.len()))
                .unwrap_or((0, 0));
            FaceReport {
                face,
                length: footprint.edge_length(face),
                minimum: minimums.get(face),
                master,
                bays,
                groups,
                guide: guides.contains(&face),
            }
        })
        .collect();

    Ok(LayoutReport {
        layer: layer.clone(),
        area: footprint.signed_area().abs(),
        defect: footprint.check(&minimums, &building.engine).err(),
        faces,
    })
}

impl fmt::Display for LayoutReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer {}  area {:.2} m2  ", self.layer, self.area)?;
        match &self.defect {
            None => writeln!(f, "valid")?,
            Some(defect) => writeln!(f, "invalid: {}", defect)?,
        }
        for face in &self.faces {
            write!(
                f,
                "  {}  length {:>6.2}  min {:>6.2}  bays {}  groups {}",
                face.face, face.length, face.minimum, face.bays, face.groups
            )?;
            if face.master != face.face {
                write!(f, "  (locked to {})", face.master)?;
            }
            if face.guide {
                write!(f, "  [guide]")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
