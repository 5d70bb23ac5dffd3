//! Grid save/load with shape validation
//!
//! Features:
//! - Versioned JSON document (version 1; files without a version field are
//!   treated as version 1 for compatibility with older tools)
//! - Field presence and type checks come free from typed deserialization
//! - Dimensional validation before any Grid is handed back: a malformed
//!   document never yields a partial grid
//!
//! Document layout: top-level `rows`, `cols`, `num_layers`, `num_teeth` and a
//! `grid` array of rows of cells; each cell repeats its own `num_teeth` /
//! `num_layers` (asserted equal to the grid-level values, not re-derived) and
//! carries `layers_teeth_flags`, `gear_type`, `direction` and `will_rotate`.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::{Gear, GearKind, Grid, GridError};

/// Current document format version.
pub const FORMAT_VERSION: u32 = 1;

fn default_version() -> u32 {
    FORMAT_VERSION
}

/// Load/save failures. All are fatal to the operation; nothing is retried.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported document version {0} (expected {FORMAT_VERSION})")]
    UnsupportedVersion(u32),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("document declares {expected} rows but grid array has {actual}")]
    RowCountMismatch { expected: usize, actual: usize },
    #[error("row {row} declares {expected} cols but has {actual}")]
    ColCountMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("cell ({row}, {col}) header disagrees with grid dimensions")]
    CellHeaderMismatch { row: usize, col: usize },
    #[error("cell ({row}, {col}) has {actual} layer patterns, expected {expected}")]
    LayerCountMismatch {
        row: usize,
        col: usize,
        expected: usize,
        actual: usize,
    },
    #[error("cell ({row}, {col}) layer {layer} has a tooth array of the wrong length")]
    ToothArrayMismatch { row: usize, col: usize, layer: usize },
    #[error("cell ({row}, {col}) has direction {direction}, expected +1 or -1")]
    BadDirection { row: usize, col: usize, direction: i8 },
}

/// One persisted cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellRecord {
    pub num_teeth: usize,
    pub num_layers: usize,
    pub layers_teeth_flags: Vec<Vec<bool>>,
    pub gear_type: GearKind,
    pub direction: i8,
    pub will_rotate: bool,
}

/// The persisted grid document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridDocument {
    #[serde(default = "default_version")]
    pub version: u32,
    pub rows: usize,
    pub cols: usize,
    pub num_layers: usize,
    pub num_teeth: usize,
    pub grid: Vec<Vec<CellRecord>>,
}

/// Capture a grid's full state as a document.
pub fn to_document(grid: &Grid) -> GridDocument {
    let rows = (0..grid.rows())
        .map(|row| {
            (0..grid.cols())
                .filter_map(|col| grid.gear(row, col))
                .map(|gear| CellRecord {
                    num_teeth: gear.num_teeth,
                    num_layers: gear.num_layers,
                    layers_teeth_flags: gear.layers_teeth_flags.clone(),
                    gear_type: gear.kind,
                    direction: gear.direction,
                    will_rotate: gear.will_rotate,
                })
                .collect()
        })
        .collect();

    GridDocument {
        version: FORMAT_VERSION,
        rows: grid.rows(),
        cols: grid.cols(),
        num_layers: grid.num_layers(),
        num_teeth: grid.num_teeth(),
        grid: rows,
    }
}

/// Validate a document and rebuild the grid it describes. Every cell field is
/// copied verbatim; no default-construction logic (checkerboard directions,
/// empty tooth patterns) is reapplied.
pub fn from_document(doc: &GridDocument) -> Result<Grid, PersistError> {
    if doc.version != FORMAT_VERSION {
        return Err(PersistError::UnsupportedVersion(doc.version));
    }
    if doc.grid.len() != doc.rows {
        return Err(PersistError::RowCountMismatch {
            expected: doc.rows,
            actual: doc.grid.len(),
        });
    }
    for (row, cells) in doc.grid.iter().enumerate() {
        if cells.len() != doc.cols {
            return Err(PersistError::ColCountMismatch {
                row,
                expected: doc.cols,
                actual: cells.len(),
            });
        }
        for (col, cell) in cells.iter().enumerate() {
            if cell.num_teeth != doc.num_teeth || cell.num_layers != doc.num_layers {
                return Err(PersistError::CellHeaderMismatch { row, col });
            }
            if cell.layers_teeth_flags.len() != cell.num_layers {
                return Err(PersistError::LayerCountMismatch {
                    row,
                    col,
                    expected: cell.num_layers,
                    actual: cell.layers_teeth_flags.len(),
                });
            }
            for (layer, flags) in cell.layers_teeth_flags.iter().enumerate() {
                if flags.len() != cell.num_teeth {
                    return Err(PersistError::ToothArrayMismatch { row, col, layer });
                }
            }
            if !matches!(cell.direction, 1 | -1) {
                return Err(PersistError::BadDirection {
                    row,
                    col,
                    direction: cell.direction,
                });
            }
        }
    }

    let mut grid = Grid::new(doc.rows, doc.cols, doc.num_layers, doc.num_teeth)?;
    for (row, cells) in doc.grid.iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            if let Some(gear) = grid.gear_mut(row, col) {
                *gear = Gear {
                    num_teeth: cell.num_teeth,
                    num_layers: cell.num_layers,
                    layers_teeth_flags: cell.layers_teeth_flags.clone(),
                    kind: cell.gear_type,
                    direction: cell.direction,
                    will_rotate: cell.will_rotate,
                };
            }
        }
    }
    Ok(grid)
}

/// Serialize a grid to pretty-printed JSON.
pub fn to_json(grid: &Grid) -> Result<String, PersistError> {
    Ok(serde_json::to_string_pretty(&to_document(grid))?)
}

/// Parse and validate a grid from JSON text.
pub fn from_json(json: &str) -> Result<Grid, PersistError> {
    from_document(&serde_json::from_str(json)?)
}

/// Write a grid document to a writer.
pub fn save_to_writer<W: Write>(grid: &Grid, writer: W) -> Result<(), PersistError> {
    serde_json::to_writer_pretty(writer, &to_document(grid))?;
    Ok(())
}

/// Read and validate a grid document from a reader.
pub fn load_from_reader<R: Read>(reader: R) -> Result<Grid, PersistError> {
    from_document(&serde_json::from_reader(reader)?)
}

/// Save a grid to a JSON file.
pub fn save_to_file<P: AsRef<Path>>(grid: &Grid, path: P) -> Result<(), PersistError> {
    let path = path.as_ref();
    let file = File::create(path)?;
    save_to_writer(grid, BufWriter::new(file))?;
    log::info!(
        "saved {}x{} grid to {}",
        grid.rows(),
        grid.cols(),
        path.display()
    );
    Ok(())
}

/// Load a grid from a JSON file.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Grid, PersistError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let grid = load_from_reader(BufReader::new(file))?;
    log::info!(
        "loaded {}x{} grid from {}",
        grid.rows(),
        grid.cols(),
        path.display()
    );
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_grid() -> Grid {
        let mut grid = Grid::with_defaults(2, 3, 2).unwrap();
        grid.set_kind(0, 0, GearKind::Driver).unwrap();
        grid.set_tooth(0, 0, 0, 0, true).unwrap();
        grid.set_tooth(0, 1, 0, 4, true).unwrap();
        grid.set_tooth(1, 2, 1, 6, true).unwrap();
        grid
    }

    #[test]
    fn test_round_trip_preserves_everything() {
        let grid = sample_grid();
        let restored = from_json(&to_json(&grid).unwrap()).unwrap();
        assert_eq!(restored, grid);
    }

    #[test]
    fn test_round_trip_preserves_will_rotate() {
        let mut grid = sample_grid();
        crate::sim::tick::prepare_iteration(&mut grid);
        crate::sim::tick::iterate(&mut grid);
        let restored = from_json(&to_json(&grid).unwrap()).unwrap();
        assert_eq!(restored, grid);
    }

    #[test]
    fn test_document_field_names_are_stable() {
        // The on-disk names are a compatibility contract with older tools.
        let json = to_json(&sample_grid()).unwrap();
        for field in [
            "\"version\"",
            "\"rows\"",
            "\"cols\"",
            "\"num_layers\"",
            "\"num_teeth\"",
            "\"grid\"",
            "\"layers_teeth_flags\"",
            "\"gear_type\"",
            "\"direction\"",
            "\"will_rotate\"",
            "\"Driver\"",
            "\"Driven\"",
        ] {
            assert!(json.contains(field), "missing {field} in document");
        }
    }

    #[test]
    fn test_missing_version_defaults_to_one() {
        let mut doc = to_document(&sample_grid());
        doc.version = FORMAT_VERSION;
        let mut value = serde_json::to_value(&doc).unwrap();
        value.as_object_mut().unwrap().remove("version");
        let reparsed: GridDocument = serde_json::from_value(value).unwrap();
        assert_eq!(reparsed.version, 1);
        assert!(from_document(&reparsed).is_ok());
    }

    #[test]
    fn test_unsupported_version_rejected() {
        let mut doc = to_document(&sample_grid());
        doc.version = 99;
        assert!(matches!(
            from_document(&doc),
            Err(PersistError::UnsupportedVersion(99))
        ));
    }

    #[test]
    fn test_row_count_mismatch_rejected() {
        let mut doc = to_document(&sample_grid());
        doc.grid.pop();
        assert!(matches!(
            from_document(&doc),
            Err(PersistError::RowCountMismatch { .. })
        ));
    }

    #[test]
    fn test_col_count_mismatch_rejected() {
        let mut doc = to_document(&sample_grid());
        doc.grid[1].pop();
        assert!(matches!(
            from_document(&doc),
            Err(PersistError::ColCountMismatch { row: 1, .. })
        ));
    }

    #[test]
    fn test_cell_header_mismatch_rejected() {
        let mut doc = to_document(&sample_grid());
        doc.grid[0][1].num_teeth = 12;
        assert!(matches!(
            from_document(&doc),
            Err(PersistError::CellHeaderMismatch { row: 0, col: 1 })
        ));
    }

    #[test]
    fn test_truncated_tooth_array_rejected() {
        let mut doc = to_document(&sample_grid());
        doc.grid[0][0].layers_teeth_flags[1].pop();
        assert!(matches!(
            from_document(&doc),
            Err(PersistError::ToothArrayMismatch {
                row: 0,
                col: 0,
                layer: 1
            })
        ));
    }

    #[test]
    fn test_bad_direction_rejected() {
        let mut doc = to_document(&sample_grid());
        doc.grid[0][0].direction = 0;
        assert!(matches!(
            from_document(&doc),
            Err(PersistError::BadDirection { direction: 0, .. })
        ));
    }

    #[test]
    fn test_unknown_gear_type_rejected() {
        let json = to_json(&sample_grid())
            .unwrap()
            .replace("\"Driver\"", "\"Idler\"");
        assert!(matches!(from_json(&json), Err(PersistError::Json(_))));
    }

    #[test]
    fn test_file_round_trip() {
        let grid = sample_grid();
        let path = std::env::temp_dir().join(format!("gear_grid_test_{}.json", std::process::id()));
        save_to_file(&grid, &path).unwrap();
        let restored = load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(restored, grid);
    }

    proptest! {
        #[test]
        fn prop_round_trip_random_grids(
            rows in 1usize..5,
            cols in 1usize..5,
            num_layers in 1usize..4,
            seed in any::<u64>(),
        ) {
            use rand::{Rng, SeedableRng};
            use rand_pcg::Pcg32;

            let mut rng = Pcg32::seed_from_u64(seed);
            let mut grid = Grid::with_defaults(rows, cols, num_layers).unwrap();
            for row in 0..rows {
                for col in 0..cols {
                    if rng.random_bool(0.2) {
                        grid.set_kind(row, col, GearKind::Driver).unwrap();
                    }
                    for layer in 0..num_layers {
                        for slot in 0..grid.num_teeth() {
                            if rng.random_bool(0.4) {
                                grid.set_tooth(row, col, layer, slot, true).unwrap();
                            }
                        }
                    }
                }
            }

            let restored = from_json(&to_json(&grid).unwrap()).unwrap();
            prop_assert_eq!(restored, grid);
        }
    }
}
