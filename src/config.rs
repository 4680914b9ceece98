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

use std::path::Path;
use serde::{Serialize, Deserialize};

use crate::common::Coordinate;
use crate::error::{TranslateError, TranslateResult};
use crate::instruction::Opcode;

/// Per-opcode adjustment applied to an instruction's owning coordinate before
/// it is turned into a block address.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchOffsets {
    pub switch: Coordinate,
    pub connect_in: Coordinate,
    pub connect_out: Coordinate,
    pub bind: Coordinate,
}

impl DispatchOffsets {
    pub fn for_opcode(&self, opcode: Opcode) -> Coordinate {
        match opcode {
            Opcode::Switch => self.switch,
            Opcode::ConnectTo => self.connect_in,
            Opcode::ConnectFrom => self.connect_out,
            Opcode::Bind => self.bind,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranslateOpts {
    pub offsets: DispatchOffsets,
    /// Emit a `Bind` for every compute unit pin node found in the route.
    pub bind_pins: bool,
}

impl TranslateOpts {
    pub fn from_yaml_str(yaml: &str) -> TranslateResult<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| TranslateError::InvalidConfig(format!("{}", e)))
    }

    pub fn from_yaml_file<P>(path: P) -> TranslateResult<Self> where
        P: AsRef<Path>
    {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| TranslateError::from_io(path, e))?;
        Self::from_yaml_str(&yaml)
    }
}
