//! Tetrahedral meshes with per-vertex scalars, read from `.off` text files.
//!
//! The format is whitespace-delimited:
//!
//! ```text
//! <n_verts> <n_tets>
//! x y z scalar        (n_verts times)
//! a b c d             (n_tets times, 0-based vertex indices)
//! ```

use std::path::Path;

use glam::Vec3;
use mini_scivis_core::fs::file_content;
use mini_scivis_core::{Bounds, Result, ScivisError, ValueRange};

use crate::volume_brick::{CellType, UnstructuredVolume, VolumeBrick};

/// A parsed tetrahedral mesh with consistently oriented cells.
#[derive(Debug, Clone, PartialEq)]
pub struct TetMesh {
    pub positions: Vec<Vec3>,
    pub scalars: Vec<f32>,
    pub tets: Vec<[u32; 4]>,
    pub value_range: ValueRange,
    pub bounds: Bounds,
    /// How many tets had their winding flipped while parsing.
    pub repaired: usize,
}

impl TetMesh {
    /// Converts the mesh into the engine's unstructured layout.
    pub fn into_volume(self) -> UnstructuredVolume {
        let num_tets = self.tets.len();
        UnstructuredVolume {
            vertex_positions: self.positions,
            vertex_scalars: self.scalars,
            index: self.tets.iter().flatten().copied().collect(),
            cell_index: (0..num_tets as u64).map(|i| i * 4).collect(),
            cell_type: vec![CellType::Tetrahedron; num_tets],
        }
    }
}

/// Returns `dot(cross(b - a, c - a), d - a)`, six times the signed volume of the tet.
pub fn signed_volume(positions: &[Vec3], tet: [u32; 4]) -> Option<f32> {
    let p = |i: u32| positions.get(i as usize).copied();
    let (a, b, c, d) = (p(tet[0])?, p(tet[1])?, p(tet[2])?, p(tet[3])?);
    Some((b - a).cross(c - a).dot(d - a))
}

/// Swaps the second and third index if the tet is inverted.
///
/// Returns the tet and whether it was changed. Indices must be in range.
pub fn repair_tet_winding(positions: &[Vec3], tet: [u32; 4]) -> Result<([u32; 4], bool)> {
    let volume = signed_volume(positions, tet).ok_or_else(|| {
        ScivisError::format(format!(
            "tet {tet:?} references a vertex past {}",
            positions.len()
        ))
    })?;
    if volume < 0.0 {
        Ok(([tet[0], tet[2], tet[1], tet[3]], true))
    } else {
        Ok((tet, false))
    }
}

/// Whitespace token reader that turns missing or bad fields into format errors.
struct Tokens<'a> {
    inner: std::str::SplitWhitespace<'a>,
}

impl Tokens<'_> {
    fn next<T: std::str::FromStr>(&mut self, what: &dyn Fn() -> String) -> Result<T> {
        let token = self
            .inner
            .next()
            .ok_or_else(|| ScivisError::format(format!("truncated mesh: missing {}", what())))?;
        token
            .parse()
            .map_err(|_| ScivisError::format(format!("bad {} '{token}'", what())))
    }
}

/// Parses tetrahedral mesh text.
///
/// Fails with [`ScivisError::Format`] when the text holds fewer vertices or
/// tets than the header declares, or a tet references a missing vertex.
pub fn parse_tetrahedral_mesh(text: &str) -> Result<TetMesh> {
    let mut tokens = Tokens {
        inner: text.split_whitespace(),
    };
    let n_verts: usize = tokens.next(&|| "vertex count".to_string())?;
    let n_tets: usize = tokens.next(&|| "tet count".to_string())?;

    // A record is four tokens, so at least 8 bytes of text; header counts
    // beyond that cannot be satisfied and must not drive the reservation
    let max_records = text.len() / 8;
    let mut positions = Vec::with_capacity(n_verts.min(max_records));
    let mut scalars = Vec::with_capacity(n_verts.min(max_records));
    let mut value_range = ValueRange::EMPTY;
    let mut bounds = Bounds::empty();
    for i in 0..n_verts {
        let mut coord = [0.0_f32; 4];
        for (k, c) in coord.iter_mut().enumerate() {
            *c = tokens.next(&|| format!("field {k} of vertex {i}"))?;
        }
        let p = Vec3::new(coord[0], coord[1], coord[2]);
        positions.push(p);
        scalars.push(coord[3]);
        bounds.extend(p);
        value_range.include(f64::from(coord[3]));
    }

    let mut tets = Vec::with_capacity(n_tets.min(max_records));
    let mut repaired = 0;
    for i in 0..n_tets {
        let mut tet = [0_u32; 4];
        for (k, v) in tet.iter_mut().enumerate() {
            *v = tokens.next(&|| format!("index {k} of tet {i}"))?;
        }
        let (tet, flipped) = repair_tet_winding(&positions, tet)?;
        repaired += usize::from(flipped);
        tets.push(tet);
    }

    Ok(TetMesh {
        positions,
        scalars,
        tets,
        value_range,
        bounds,
        repaired,
    })
}

/// Loads a tetrahedral mesh file as an unstructured brick.
pub fn load_tetrahedral_mesh(path: impl AsRef<Path>) -> Result<VolumeBrick> {
    let path = path.as_ref();
    let mesh = parse_tetrahedral_mesh(&file_content(path)?)?;
    log::info!(
        "loaded '{}': {} vertices, {} tets",
        path.display(),
        mesh.positions.len(),
        mesh.tets.len()
    );
    if mesh.repaired > 0 {
        log::info!("flipped the winding of {} inverted tets", mesh.repaired);
    }

    let bounds = mesh.bounds;
    let value_range = mesh.value_range;
    Ok(VolumeBrick::unstructured(mesh.into_volume(), bounds, value_range))
}
