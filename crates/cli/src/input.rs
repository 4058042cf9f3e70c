//! Ring input for `measure`: CSV (`ring,x,y` rows) or JSON (`[[[x, y], ..], ..]`).

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use mapsketch::{Coord, Vec2};
use polars::prelude::*;

/// A ring read from input, with the id it was labelled by.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelledRing {
    pub id: i64,
    pub vertices: Vec<Coord>,
}

pub fn read_rings(path: &Path) -> Result<Vec<LabelledRing>> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => read_csv(path),
        Some("json") => read_json(path),
        other => bail!("unsupported input extension {:?} (expected csv or json)", other),
    }
}

/// Rows are grouped by `ring`, in order of first appearance; vertex order within a
/// ring follows row order.
fn read_csv(path: &Path) -> Result<Vec<LabelledRing>> {
    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(100))
        .finish()?
        .collect()
        .with_context(|| format!("reading {}", path.display()))?;
    tracing::info!(rows = df.height(), cols = df.width(), "input_csv_shape");

    let ids = df.column("ring")?.cast(&DataType::Int64)?;
    let xs = df.column("x")?.cast(&DataType::Float64)?;
    let ys = df.column("y")?.cast(&DataType::Float64)?;

    let mut rings: Vec<LabelledRing> = Vec::new();
    let mut slot: HashMap<i64, usize> = HashMap::new();
    let rows = ids.i64()?.into_iter().zip(xs.f64()?.into_iter()).zip(ys.f64()?.into_iter());
    for (row, ((id, x), y)) in rows.enumerate() {
        let (Some(id), Some(x), Some(y)) = (id, x, y) else {
            bail!("row {row}: missing ring, x or y");
        };
        let idx = *slot.entry(id).or_insert_with(|| {
            rings.push(LabelledRing {
                id,
                vertices: Vec::new(),
            });
            rings.len() - 1
        });
        rings[idx].vertices.push(Vec2::new(x, y));
    }
    Ok(rings)
}

fn read_json(path: &Path) -> Result<Vec<LabelledRing>> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let raw: Vec<Vec<[f64; 2]>> = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing {} as a list of rings", path.display()))?;
    Ok(raw
        .into_iter()
        .enumerate()
        .map(|(i, ring)| LabelledRing {
            id: i as i64,
            vertices: ring.into_iter().map(|[x, y]| Vec2::new(x, y)).collect(),
        })
        .collect())
}
