// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command parsing and execution.

use anyhow::{anyhow, bail, Context, Result};
use arenamap_core::{
    angular_occupancy, autocorrelation, border_coverage, matrix_rows, AngularConfig,
    CoverageConfig, FieldSet, MaskedGrid, WallCoverage,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One analysis requested on the command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Autocorrelation {
        input: PathBuf,
    },
    BorderCoverage {
        input: PathBuf,
        config_file: Option<PathBuf>,
        overrides: CoverageOverrides,
    },
    AngularOccupancy {
        input: PathBuf,
        config: AngularConfig,
    },
}

/// Border coverage options given as flags; they win over a config file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverageOverrides {
    pub walls: Option<String>,
    pub search_width: Option<usize>,
    pub arena_shape: Option<String>,
}

impl CoverageOverrides {
    fn apply(&self, mut config: CoverageConfig) -> CoverageConfig {
        if let Some(walls) = &self.walls {
            config.walls = walls.clone();
        }
        if let Some(width) = self.search_width {
            config.search_width = width;
        }
        if let Some(shape) = &self.arena_shape {
            config.arena_shape = shape.clone();
        }
        config
    }
}

/// Parse arguments after the program name. `Ok(None)` means help was requested.
pub fn parse_args(args: &[String]) -> Result<Option<Command>> {
    let Some(name) = args.first() else {
        return Ok(None);
    };
    if name == "--help" || name == "-h" || name == "help" {
        return Ok(None);
    }
    let input = args
        .get(1)
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("missing input file for '{}'", name))?;

    let mut overrides = CoverageOverrides::default();
    let mut config_file = None;
    let mut angular = AngularConfig::default();

    let mut i = 2;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--walls" => overrides.walls = Some(flag_value(args, &mut i, flag)?.to_string()),
            "--search-width" => {
                let width = flag_value(args, &mut i, flag)?;
                overrides.search_width = Some(width.parse().context("invalid --search-width value")?);
            }
            "--arena-shape" => {
                overrides.arena_shape = Some(flag_value(args, &mut i, flag)?.to_string())
            }
            "--config" => config_file = Some(PathBuf::from(flag_value(args, &mut i, flag)?)),
            "--bins" => {
                angular.bins = flag_value(args, &mut i, flag)?
                    .parse()
                    .context("invalid --bins value")?
            }
            "--sigma" => {
                let sigma = flag_value(args, &mut i, flag)?;
                angular.sigma = Some(sigma.parse().context("invalid --sigma value")?);
            }
            other => bail!("unknown option: {}", other),
        }
        i += 1;
    }

    let command = match name.as_str() {
        "autocorr" | "autocorrelation" => Command::Autocorrelation { input },
        "border-coverage" => Command::BorderCoverage {
            input,
            config_file,
            overrides,
        },
        "angular-occupancy" => Command::AngularOccupancy {
            input,
            config: angular,
        },
        other => bail!("unknown command: {}", other),
    };
    Ok(Some(command))
}

fn flag_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("missing value for {}", flag))
}

#[derive(Debug, Serialize)]
struct AutocorrelationOutput {
    shape: [usize; 2],
    autocorrelogram: Vec<Vec<f64>>,
}

#[derive(Debug, Serialize)]
struct BorderCoverageOutput {
    coverage: f64,
    best: Option<WallCoverage>,
    evaluations: Vec<WallCoverage>,
}

/// Run a command and return its JSON result.
pub fn run(command: &Command) -> Result<serde_json::Value> {
    let output = match command {
        Command::Autocorrelation { input } => {
            let map = load_map(&read_json(input)?)
                .with_context(|| format!("invalid firing map in {}", input.display()))?;
            tracing::info!(rows = map.nrows(), cols = map.ncols(), "autocorrelating map");
            let acorr = autocorrelation(&map)?;
            serde_json::to_value(AutocorrelationOutput {
                shape: [acorr.nrows(), acorr.ncols()],
                autocorrelogram: matrix_rows(&acorr),
            })?
        }
        Command::BorderCoverage {
            input,
            config_file,
            overrides,
        } => {
            let base = match config_file {
                Some(path) => CoverageConfig::from_json(&read_json(path)?)
                    .with_context(|| format!("invalid coverage config in {}", path.display()))?,
                None => CoverageConfig::default(),
            };
            let config = overrides.apply(base);
            let fields = FieldSet::from_json(&read_json(input)?)
                .with_context(|| format!("invalid fields in {}", input.display()))?;
            tracing::info!(
                fields = fields.len(),
                walls = %config.walls,
                search_width = config.search_width,
                arena_shape = %config.arena_shape,
                "computing border coverage"
            );
            let report = border_coverage(&fields, &config)?;
            serde_json::to_value(BorderCoverageOutput {
                coverage: report.coverage(),
                best: report.best().copied(),
                evaluations: report.evaluations,
            })?
        }
        Command::AngularOccupancy { input, config } => {
            let angles: Vec<f64> = serde_json::from_value(read_json(input)?)
                .with_context(|| format!("expected an array of angles in {}", input.display()))?;
            tracing::info!(samples = angles.len(), bins = config.bins, "angular occupancy");
            serde_json::to_value(angular_occupancy(&angles, config)?)?
        }
    };
    Ok(output)
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("cannot parse {}", path.display()))
}

/// A map is either bare rows or `{"map": rows, "mask": rows}`
fn load_map(value: &serde_json::Value) -> Result<MaskedGrid> {
    let (rows, mask) = match value {
        serde_json::Value::Object(object) => (
            object
                .get("map")
                .cloned()
                .ok_or_else(|| anyhow!("object input needs a 'map' key"))?,
            object.get("mask").cloned(),
        ),
        other => (other.clone(), None),
    };
    let rows: Vec<Vec<Option<f64>>> = serde_json::from_value(rows)?;
    let mut map = MaskedGrid::from_optional_rows(&rows)?;
    if let Some(mask) = mask {
        let mask: Vec<Vec<bool>> = serde_json::from_value(mask)?;
        map = map.masked_by_rows(&mask)?;
    }
    Ok(map)
}
