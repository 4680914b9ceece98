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

use std::ffi::OsString;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use serde::Serialize;

use crate::config::TranslateOpts;
use crate::error::{TranslateError, TranslateResult};
use crate::instruction::Opcode;
use crate::overlay::Overlay;
use crate::place::Placement;
use crate::route_parser::RouteParser;
#[allow(unused)]
use crate::log::*;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TranslationSummary {
    pub lines: usize,
    pub skipped_lines: usize,
    pub nets: usize,
    pub switches: usize,
    pub connects_in: usize,
    pub connects_out: usize,
    pub binds: usize,
}

impl TranslationSummary {
    pub(crate) fn record(&mut self, opcode: Opcode) {
        match opcode {
            Opcode::Switch => self.switches += 1,
            Opcode::ConnectTo => self.connects_in += 1,
            Opcode::ConnectFrom => self.connects_out += 1,
            Opcode::Bind => self.binds += 1,
        }
    }

    pub fn instructions(&self) -> usize {
        self.switches + self.connects_in + self.connects_out + self.binds
    }
}

/// Result of a complete translation run.
#[derive(Clone, Debug)]
pub struct Translation {
    pub overlay: Overlay,
    pub summary: TranslationSummary,
    pub placement: Option<Placement>,
}

pub fn translate_lines<I, S>(lines: I, opts: TranslateOpts) -> TranslateResult<Translation> where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parser = RouteParser::new(opts);
    for line in lines {
        parser.feed_line(line.as_ref())?;
    }
    parser.finish()
}

pub fn translate_str(route: &str, opts: TranslateOpts) -> TranslateResult<Translation> {
    translate_lines(route.lines(), opts)
}

pub fn translate_reader<R>(reader: R, opts: TranslateOpts) -> TranslateResult<Translation> where
    R: BufRead
{
    let mut parser = RouteParser::new(opts);
    for line in reader.lines() {
        let line = line.map_err(|e| TranslateError::Io(format!("{}", e)))?;
        parser.feed_line(&line)?;
    }
    parser.finish()
}

fn with_extension(circuit: &Path, ext: &str) -> PathBuf {
    /* Appended, not replaced: base names may contain dots */
    let mut name = OsString::from(circuit.as_os_str());
    name.push(ext);
    PathBuf::from(name)
}

pub fn route_path(circuit: &Path) -> PathBuf {
    with_extension(circuit, ".route")
}

pub fn place_path(circuit: &Path) -> PathBuf {
    with_extension(circuit, ".place")
}

/// Translates `<circuit>.route`. `<circuit>.place` is read too when present.
pub fn translate_file<P>(circuit: P, opts: TranslateOpts) -> TranslateResult<Translation> where
    P: AsRef<Path>
{
    let circuit = circuit.as_ref();
    let route = route_path(circuit);
    let file = std::fs::File::open(&route).map_err(|e| TranslateError::from_io(&route, e))?;

    let mut translation = translate_reader(std::io::BufReader::new(file), opts)?;

    let place = place_path(circuit);
    translation.placement = match Placement::load(&place) {
        Ok(placement) => Some(placement),
        Err(TranslateError::FileNotFound(_)) => {
            dbg_log!(DBG_WARN, "No placement file {}", place.display());
            None
        },
        Err(e) => return Err(e),
    };

    if let Some((rows, cols)) = translation.placement.as_ref().and_then(|p| p.array_size) {
        let overlay = &translation.overlay;
        if (rows, cols) != (overlay.rows(), overlay.cols()) {
            dbg_log!(
                DBG_WARN,
                "Placement declares a {} x {} array, route declares {} x {}",
                rows, cols, overlay.rows(), overlay.cols()
            );
        }
    }

    Ok(translation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Coordinate;

    const ROUTE: &str = "\
Array size: 2 x 2 logic blocks.
Net 0 (a.out*b.in)
Node: 1 OPIN (1,1) Pin: 0 PE.OUT0[0] Switch: 0
Node: 2 CHANX (1,0) Track: 3 Switch: 0
Node: 3 CHANY (0,1) Track: 3 Switch: 0
Node: 4 IPIN (1,1) Pin: 1 PE.IN0[0] Switch: 0
";

    #[test]
    fn test_missing_route_file() {
        let dir = tempfile::tempdir().unwrap();
        let circuit = dir.path().join("nothing");
        let err = translate_file(&circuit, TranslateOpts::default()).unwrap_err();
        assert_eq!(
            err,
            TranslateError::FileNotFound(route_path(&circuit).display().to_string())
        );
    }

    #[test]
    fn test_route_and_place_files() {
        let dir = tempfile::tempdir().unwrap();
        let circuit = dir.path().join("my.blif");
        std::fs::write(route_path(&circuit), ROUTE).unwrap();

        let translation = translate_file(&circuit, TranslateOpts::default()).unwrap();
        assert!(translation.placement.is_none());
        assert_eq!(translation.summary.instructions(), 3);

        std::fs::write(place_path(&circuit), "Array size: 2 x 2 logic blocks\npe 1 1 0 #0\n")
            .unwrap();
        let translation = translate_file(&circuit, TranslateOpts::default()).unwrap();
        let placement = translation.placement.unwrap();
        assert_eq!(placement.block("pe").unwrap().coord, Coordinate::new(1, 1));
    }

    #[test]
    fn test_paths_append_suffix() {
        let circuit = Path::new("out/my.blif");
        assert_eq!(route_path(circuit), PathBuf::from("out/my.blif.route"));
        assert_eq!(place_path(circuit), PathBuf::from("out/my.blif.place"));
    }

    #[test]
    fn test_translate_reader_matches_translate_str() {
        let from_reader = translate_reader(ROUTE.as_bytes(), TranslateOpts::default()).unwrap();
        let from_str = translate_str(ROUTE, TranslateOpts::default()).unwrap();
        assert_eq!(from_reader.overlay, from_str.overlay);
        assert_eq!(from_reader.summary, from_str.summary);
    }
}
