/* Copyright (C) 2022 Antmicro
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     https://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! Reader for VPR `.place` files.
//!
//! The placement is informational: instructions are synthesized from the
//! route file alone.

use std::io::BufRead;
use std::path::Path;
use serde::Serialize;

use crate::common::Coordinate;
use crate::error::{TranslateError, TranslateResult};
use crate::route_parser::RouteLine;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlacedBlock {
    pub name: String,
    pub coord: Coordinate,
    pub subblock: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub netlist_file: Option<String>,
    pub array_size: Option<(usize, usize)>,
    pub blocks: Vec<PlacedBlock>,
}

fn parse_block(line_no: usize, line: &str) -> TranslateResult<PlacedBlock> {
    let malformed = |reason: &str| TranslateError::MalformedPlacement {
        line: line_no,
        reason: reason.to_string(),
    };

    /* Trailing "#<block number>" is a comment */
    let body = line.split('#').next().unwrap_or("");
    let fields: Vec<&str> = body.split_whitespace().collect();
    if fields.len() < 3 {
        return Err(malformed("expected `<name> <x> <y> [<subblk>]`"));
    }

    let int = |s: &str| s.parse::<i32>().map_err(|_| malformed("non-numeric coordinate"));
    let coord = Coordinate::new(int(fields[1])?, int(fields[2])?);
    let subblock = match fields.get(3) {
        Some(s) => s.parse().map_err(|_| malformed("non-numeric sub-block"))?,
        None => 0,
    };

    Ok(PlacedBlock { name: fields[0].to_string(), coord, subblock })
}

impl Placement {
    pub fn from_reader<R>(reader: R) -> TranslateResult<Self> where
        R: BufRead
    {
        let mut placement = Self::default();

        for (idx, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| TranslateError::Io(format!("{}", e)))?;
            let line_no = idx + 1;
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if trimmed.starts_with("Netlist") {
                placement.netlist_file = trimmed.split_once(':')
                    .and_then(|(_, rest)| rest.split_whitespace().next())
                    .map(str::to_string);
                continue;
            }
            if let Some(RouteLine::ArraySize { rows, cols }) = RouteLine::classify(trimmed) {
                placement.array_size = Some((rows, cols));
                continue;
            }

            placement.blocks.push(parse_block(line_no, trimmed)?);
        }

        Ok(placement)
    }

    pub fn parse_str(text: &str) -> TranslateResult<Self> {
        Self::from_reader(text.as_bytes())
    }

    pub fn load<P>(path: P) -> TranslateResult<Self> where
        P: AsRef<Path>
    {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| TranslateError::from_io(path, e))?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn block(&self, name: &str) -> Option<&PlacedBlock> {
        self.blocks.iter().find(|b| b.name == name)
    }

    pub fn blocks_at(&self, coord: Coordinate) -> impl Iterator<Item = &PlacedBlock> {
        self.blocks.iter().filter(move |b| b.coord == coord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLACE: &str = "\
Netlist file: myblif.net   Architecture file: overlay.xml
Array size: 6 x 6 logic blocks

#block name\tx\ty\tsubblk\tblock number
#----------\t--\t--\t------\t------------
fork_n6\t\t5\t4\t0\t#0
branchC_n4\t4\t4\t0\t#1
out:x\t\t0\t3\t1\t#2
";

    #[test]
    fn test_parse_place_file() {
        let placement = Placement::parse_str(PLACE).unwrap();
        assert_eq!(placement.netlist_file.as_deref(), Some("myblif.net"));
        assert_eq!(placement.array_size, Some((6, 6)));
        assert_eq!(placement.blocks.len(), 3);

        let fork = placement.block("fork_n6").unwrap();
        assert_eq!(fork.coord, Coordinate::new(5, 4));
        assert_eq!(fork.subblock, 0);
        assert_eq!(placement.block("out:x").unwrap().subblock, 1);
        assert!(placement.block("missing").is_none());

        let at: Vec<_> = placement.blocks_at(Coordinate::new(4, 4)).map(|b| &b.name).collect();
        assert_eq!(at, vec!["branchC_n4"]);
    }

    #[test]
    fn test_malformed_block_line() {
        let err = Placement::parse_str("Array size: 2 x 2 logic blocks\nblk a 1 0\n").unwrap_err();
        assert_eq!(
            err,
            TranslateError::MalformedPlacement {
                line: 2,
                reason: "non-numeric coordinate".to_string(),
            }
        );

        let err = Placement::parse_str("lonely\n").unwrap_err();
        assert!(matches!(err, TranslateError::MalformedPlacement { line: 1, .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("circuit.place");
        std::fs::write(&path, PLACE).unwrap();
        assert_eq!(Placement::load(&path).unwrap().blocks.len(), 3);

        let err = Placement::load(dir.path().join("none.place")).unwrap_err();
        assert!(matches!(err, TranslateError::FileNotFound(_)));
    }
}
