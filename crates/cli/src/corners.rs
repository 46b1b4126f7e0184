//! Corner tables on disk.
//!
//! Rows carry the four hit-tested corners of one rectangle as twelve columns
//! `tl_x, tl_y, tl_z, tr_x, …, br_z`. An empty cell (null) stands for a
//! hit-test miss and turns the row into `MissingCorrespondence`. JSON input is
//! an array of records with optional `top_left`/`top_right`/`bottom_left`/
//! `bottom_right` arrays.

use anyhow::{bail, Context, Result};
use polars::prelude::*;
use quadplace::prelude::{Corner, PlacementError, QuadCorners, Vec3};
use quadplace::sample::DrawnQuad;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub type Row = Result<QuadCorners, PlacementError>;

const AXES: [&str; 3] = ["x", "y", "z"];

/// `tl_x, tl_y, …, br_z` in `Corner::ALL` order.
pub fn column_names() -> Vec<String> {
    Corner::ALL
        .iter()
        .flat_map(|c| AXES.iter().map(move |a| format!("{}_{}", c.prefix(), a)))
        .collect()
}

/// Read corner rows from `.csv`, `.parquet` or `.json`.
pub fn read_rows(path: &Path) -> Result<Vec<Row>> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => {
            let lf = LazyCsvReader::new(path)
                .with_has_header(true)
                .with_infer_schema_length(Some(100))
                .finish()?;
            rows_from_frame(lf.collect()?)
        }
        Some("parquet") => {
            let lf = LazyFrame::scan_parquet(path, ScanArgsParquet::default())?;
            rows_from_frame(lf.collect()?)
        }
        Some("json") => read_json(path),
        other => bail!("unsupported input extension {:?} for {}", other, path.display()),
    }
}

fn rows_from_frame(df: DataFrame) -> Result<Vec<Row>> {
    let names = column_names();
    let mut cols = Vec::with_capacity(names.len());
    for name in &names {
        let series = df
            .column(name.as_str())
            .with_context(|| format!("missing column {name}"))?
            .cast(&DataType::Float64)?;
        cols.push(series.f64()?.clone());
    }
    tracing::debug!(rows = df.height(), cols = df.width(), "corner_table_shape");

    let rows = (0..df.height())
        .map(|i| {
            assemble(|corner, axis| {
                let k = corner_index(corner) * 3 + axis;
                cols[k].get(i)
            })
        })
        .collect();
    Ok(rows)
}

#[derive(Deserialize)]
struct Record {
    #[serde(default)]
    top_left: Option<Vec3>,
    #[serde(default)]
    top_right: Option<Vec3>,
    #[serde(default)]
    bottom_left: Option<Vec3>,
    #[serde(default)]
    bottom_right: Option<Vec3>,
}

impl Record {
    fn get(&self, corner: Corner) -> Option<Vec3> {
        match corner {
            Corner::TopLeft => self.top_left,
            Corner::TopRight => self.top_right,
            Corner::BottomLeft => self.bottom_left,
            Corner::BottomRight => self.bottom_right,
        }
    }
}

fn read_json(path: &Path) -> Result<Vec<Row>> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let records: Vec<Record> =
        serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))?;
    Ok(records
        .iter()
        .map(|r| assemble(|corner, axis| r.get(corner).map(|v| v[axis])))
        .collect())
}

#[inline]
fn corner_index(corner: Corner) -> usize {
    match corner {
        Corner::TopLeft => 0,
        Corner::TopRight => 1,
        Corner::BottomLeft => 2,
        Corner::BottomRight => 3,
    }
}

/// Build one row from a coordinate lookup; the first absent or non-finite
/// coordinate names the missing corner.
fn assemble(mut coord: impl FnMut(Corner, usize) -> Option<f64>) -> Row {
    let mut pts = [Vec3::zeros(); 4];
    for (slot, corner) in pts.iter_mut().zip(Corner::ALL) {
        for axis in 0..3 {
            match coord(corner, axis) {
                Some(v) if v.is_finite() => slot[axis] = v,
                _ => return Err(PlacementError::MissingCorrespondence { corner }),
            }
        }
    }
    Ok(QuadCorners::from_array(pts))
}

/// Write drawn quads as a corner table plus `width, height` truth columns.
pub fn write_demo_csv(path: &Path, drawn: &[DrawnQuad]) -> Result<()> {
    let mut columns: Vec<Series> = column_names()
        .iter()
        .enumerate()
        .map(|(k, name)| {
            let corner = Corner::ALL[k / 3];
            let vals: Vec<f64> = drawn.iter().map(|d| d.corners.get(corner)[k % 3]).collect();
            Series::new(name.as_str().into(), vals)
        })
        .collect();
    columns.push(Series::new(
        "width".into(),
        drawn.iter().map(|d| d.width).collect::<Vec<f64>>(),
    ));
    columns.push(Series::new(
        "height".into(),
        drawn.iter().map(|d| d.height).collect::<Vec<f64>>(),
    ));
    let mut df = DataFrame::new(columns)?;
    let mut file =
        fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)?;
    Ok(())
}
