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

use std::collections::{BTreeMap, HashSet};
use std::fmt::Write as _;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;

use crate::overlay::{Block, Overlay};

pub trait AsBytes {
    fn as_bytes<'s>(&'s self) -> &'s [u8];
}

impl AsBytes for String {
    fn as_bytes<'s>(&'s self) -> &'s [u8] {
        String::as_bytes(self)
    }
}

impl AsBytes for str {
    fn as_bytes<'s>(&'s self) -> &'s [u8] {
        str::as_bytes(self)
    }
}

/// Selects exported sections by name. `:all` selects everything.
#[derive(Default)]
pub struct ExportChecker {
    export: HashSet<String>,
    export_all: bool,
}

impl ExportChecker {
    pub fn new(arg_list: &Option<Vec<String>>) -> Self {
        let mut checker = Self::default();
        if let Some(args) = arg_list {
            for arg in args {
                if arg == ":all" {
                    checker.export_all = true;
                } else {
                    checker.export.insert(arg.clone());
                }
            }
        }
        checker
    }

    pub fn all() -> Self {
        Self { export: HashSet::new(), export_all: true }
    }

    pub fn should_export(&self, name: &str) -> bool {
        self.export_all || self.export.contains(name)
    }
}

pub trait Exporter<D> {
    fn ignore_or_export<'s, F>(&'s mut self, name: &str, exporter: F)
        -> std::io::Result<()>
    where
        F: FnOnce() -> D + 's;

    fn flush(&mut self) -> std::io::Result<()>;
}

/// Writes the textual listing of selected sections to any writer.
pub struct ListingExporter<W> where W: Write {
    out: W,
    checker: ExportChecker,
}

impl<W> ListingExporter<W> where W: Write {
    pub fn new(out: W, checker: ExportChecker) -> Self {
        Self { out, checker }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<D, W> Exporter<D> for ListingExporter<W> where D: AsBytes, W: Write {
    fn ignore_or_export<'s, F>(&'s mut self, name: &str, exporter: F)
        -> std::io::Result<()>
    where
        F: FnOnce() -> D + 's
    {
        if self.checker.should_export(name) {
            let data = exporter();
            self.out.write_all(data.as_bytes())?;
        }
        Ok(())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.out.flush()
    }
}

/// Gathers named sections and writes them as one JSON object on flush.
pub struct CompoundJsonExporter {
    filename: PathBuf,
    data: BTreeMap<String, serde_json::Value>,
    checker: ExportChecker,
}

impl CompoundJsonExporter {
    pub fn new(arg_list: &Option<Vec<String>>, filename: PathBuf) -> Self {
        Self {
            filename,
            data: BTreeMap::new(),
            checker: ExportChecker::new(arg_list),
        }
    }

    pub fn to_json_string(&self) -> std::io::Result<String> {
        serde_json::to_string_pretty(&self.data)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

impl<D> Exporter<D> for CompoundJsonExporter where D: Serialize {
    fn ignore_or_export<'s, F>(&'s mut self, name: &str, exporter: F)
        -> std::io::Result<()>
    where
        F: FnOnce() -> D + 's
    {
        if self.checker.should_export(name) {
            let value = serde_json::to_value(exporter())
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
            self.data.insert(name.into(), value);
        }
        Ok(())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if self.data.is_empty() {
            return Ok(());
        }
        let data = self.to_json_string()?;
        let mut file = File::create(&self.filename)?;
        file.write_all(data.as_bytes())
    }
}

/// Listing of every non-empty unit of `block`.
pub fn block_listing(block: &Block) -> String {
    let mut out = String::new();
    for unit in block.units() {
        if unit.config.is_empty() {
            continue;
        }
        let _ = writeln!(out, "block {} {} @ {}", block.coord, unit.kind.name(), unit.local_coord);
        for inst in unit.config.iter() {
            let _ = writeln!(out, "    {}", inst);
        }
    }
    out
}

pub fn overlay_listing(overlay: &Overlay) -> String {
    overlay.blocks().map(block_listing).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Coordinate;
    use crate::instruction::{Alignment, Switch};

    fn small_overlay() -> Overlay {
        let mut overlay = Overlay::new(1, 2);
        let sw = Switch::new(
            Alignment::X, 2, Coordinate::new(1, 0), Alignment::Y, 2, Coordinate::new(1, 1)
        );
        overlay.push(sw.into()).unwrap();
        overlay
    }

    #[test]
    fn test_listing_skips_empty_units() {
        let overlay = small_overlay();
        assert_eq!(
            overlay_listing(&overlay),
            "block (1,0) SB @ (0,0)\n    switch W@2 N@2 #(1,0)\n"
        );
        assert_eq!(block_listing(overlay.block(Coordinate::new(0, 0)).unwrap()), "");
    }

    #[test]
    fn test_listing_exporter_respects_selection() {
        let mut exporter = ListingExporter::new(
            Vec::new(),
            ExportChecker::new(&Some(vec!["overlay".to_string()]))
        );
        exporter.ignore_or_export("overlay", || "a\n".to_string()).unwrap();
        exporter.ignore_or_export("summary", || "b\n".to_string()).unwrap();
        Exporter::<String>::flush(&mut exporter).unwrap();
        assert_eq!(exporter.into_inner(), b"a\n".to_vec());
    }

    #[test]
    fn test_json_exporter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let overlay = small_overlay();

        let mut exporter = CompoundJsonExporter::new(&Some(vec![":all".into()]), path.clone());
        exporter.ignore_or_export("overlay", || &overlay).unwrap();
        exporter.ignore_or_export("answer", || 42).unwrap();
        Exporter::<u32>::flush(&mut exporter).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["answer"], 42);
        assert_eq!(json["overlay"]["rows"], 1);
        assert_eq!(json["overlay"]["blocks"][1]["sb"]["config"][0]["op"], "switch");
    }

    #[test]
    fn test_json_exporter_without_selection_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let mut exporter = CompoundJsonExporter::new(&None, path.clone());
        exporter.ignore_or_export("answer", || 42).unwrap();
        Exporter::<u32>::flush(&mut exporter).unwrap();
        assert!(!path.exists());
    }
}
