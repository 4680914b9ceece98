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

use crate::common::Coordinate;

/// Fatal conditions of a translation run. None of them is recoverable: the
/// first one stops the run and no partial overlay is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    /// The required `.route` file does not exist.
    FileNotFound(String),
    /// Any other I/O failure while reading inputs or writing outputs.
    Io(String),
    /// An instruction was synthesized before the `Array size` header.
    UninitializedGrid,
    /// Channel alignments outside `{X, Y} x {X, Y}`.
    InvalidAlignment(char, char),
    /// Dispatch coordinate (after offset adjustment) outside the grid.
    AddressOutOfRange { coord: Coordinate, rows: usize, cols: usize },
    /// `Array size` header whose grid cannot be addressed or allocated.
    InvalidArraySize { rows: usize, cols: usize },
    InvalidConfig(String),
    MalformedPlacement { line: usize, reason: String },
}

impl TranslateError {
    pub(crate) fn from_io(path: &std::path::Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::FileNotFound(path.display().to_string()),
            _ => Self::Io(format!("{}: {}", path.display(), err)),
        }
    }
}

impl std::fmt::Display for TranslateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileNotFound(path) => write!(f, "could not open file {}", path),
            Self::Io(msg) => write!(f, "I/O error: {}", msg),
            Self::UninitializedGrid => write!(
                f,
                "instruction produced before the overlay size was declared \
                 (missing \"Array size\" header)"
            ),
            Self::InvalidAlignment(a, b) => write!(f, "invalid alignment {} -> {}", a, b),
            Self::AddressOutOfRange { coord, rows, cols } => write!(
                f,
                "coordinate {} is outside of the {} x {} overlay",
                coord, rows, cols
            ),
            Self::InvalidArraySize { rows, cols } => write!(
                f,
                "array size {} x {} exceeds the overlay limit of {} blocks",
                rows, cols, crate::overlay::MAX_BLOCKS
            ),
            Self::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
            Self::MalformedPlacement { line, reason } => {
                write!(f, "malformed placement at line {}: {}", line, reason)
            }
        }
    }
}

impl std::error::Error for TranslateError {}

pub type TranslateResult<T> = Result<T, TranslateError>;
