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

use serde::Serialize;

use crate::common::Coordinate;
use crate::config::DispatchOffsets;
use crate::error::{TranslateError, TranslateResult};
use crate::instruction::{Instruction, Opcode};
#[allow(unused)]
use crate::log::*;

#[cfg(test)]
mod tests;

/// Append-only list of instructions configuring a single unit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Config {
    instructions: Vec<Instruction>,
}

impl Config {
    pub fn push(&mut self, inst: Instruction) {
        self.instructions.push(inst);
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum UnitKind {
    SwitchBox,
    /// Connection box carrying tracks into the compute unit.
    ConnectionBoxIn,
    /// Connection box carrying compute unit outputs onto tracks.
    ConnectionBoxOut,
    ComputeUnit,
}

impl UnitKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::SwitchBox => "SB",
            Self::ConnectionBoxIn => "CB_IN",
            Self::ConnectionBoxOut => "CB_OUT",
            Self::ComputeUnit => "CU",
        }
    }

    /* Position of the unit inside its block */
    pub fn local_coord(self) -> Coordinate {
        match self {
            Self::SwitchBox => Coordinate::new(0, 0),
            Self::ConnectionBoxIn => Coordinate::new(0, 1),
            Self::ConnectionBoxOut => Coordinate::new(1, 0),
            Self::ComputeUnit => Coordinate::new(1, 1),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Unit {
    pub kind: UnitKind,
    pub local_coord: Coordinate,
    pub config: Config,
}

impl Unit {
    fn new(kind: UnitKind) -> Self {
        Self { kind, local_coord: kind.local_coord(), config: Config::default() }
    }
}

/// A single overlay cell: one switch box, two connection boxes and a compute
/// unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Block {
    pub coord: Coordinate,
    pub sb: Unit,
    pub cb_in: Unit,
    pub cb_out: Unit,
    pub cu: Unit,
}

impl Block {
    pub fn new(coord: Coordinate) -> Self {
        Self {
            coord,
            sb: Unit::new(UnitKind::SwitchBox),
            cb_in: Unit::new(UnitKind::ConnectionBoxIn),
            cb_out: Unit::new(UnitKind::ConnectionBoxOut),
            cu: Unit::new(UnitKind::ComputeUnit),
        }
    }

    pub fn unit(&self, kind: UnitKind) -> &Unit {
        match kind {
            UnitKind::SwitchBox => &self.sb,
            UnitKind::ConnectionBoxIn => &self.cb_in,
            UnitKind::ConnectionBoxOut => &self.cb_out,
            UnitKind::ComputeUnit => &self.cu,
        }
    }

    /// Units in listing order.
    pub fn units(&self) -> [&Unit; 4] {
        [&self.sb, &self.cb_in, &self.cb_out, &self.cu]
    }

    pub fn push(&mut self, inst: Instruction) {
        let unit = match inst.opcode() {
            Opcode::Switch => &mut self.sb,
            Opcode::ConnectTo => &mut self.cb_in,
            Opcode::ConnectFrom => &mut self.cb_out,
            Opcode::Bind => &mut self.cu,
        };
        dbg_log!(DBG_EXTRA, "Appending to {} @ {}: {}", unit.kind.name(), self.coord, inst);
        unit.config.push(inst);
    }

    pub fn instruction_count(&self) -> usize {
        self.units().iter().map(|u| u.config.len()).sum()
    }
}

/// Upper bound on `rows * cols` accepted from route files.
pub const MAX_BLOCKS: usize = 1 << 20;

/// The whole overlay. Blocks are stored row-major, block `i` sits at
/// `(i % cols, i / cols)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Overlay {
    rows: usize,
    cols: usize,
    #[serde(skip)]
    offsets: DispatchOffsets,
    blocks: Vec<Block>,
}

impl Overlay {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::with_offsets(rows, cols, DispatchOffsets::default())
    }

    /// Checks that a `rows x cols` grid fits in [`MAX_BLOCKS`] and that every
    /// block coordinate is representable.
    pub fn validate_size(rows: usize, cols: usize) -> TranslateResult<usize> {
        let fits_i32 = i32::try_from(rows).is_ok() && i32::try_from(cols).is_ok();
        match rows.checked_mul(cols) {
            Some(count) if fits_i32 && count <= MAX_BLOCKS => Ok(count),
            _ => Err(TranslateError::InvalidArraySize { rows, cols }),
        }
    }

    pub fn try_with_offsets(rows: usize, cols: usize, offsets: DispatchOffsets)
        -> TranslateResult<Self>
    {
        Self::validate_size(rows, cols)?;
        Ok(Self::with_offsets(rows, cols, offsets))
    }

    /// Panics when `rows * cols` overflows. Use [`Overlay::try_with_offsets`]
    /// for sizes read from input.
    pub fn with_offsets(rows: usize, cols: usize, offsets: DispatchOffsets) -> Self {
        dbg_log!(DBG_INFO, "Constructing an overlay of size {} x {}", rows, cols);

        let blocks = (0 .. rows * cols)
            .map(|i| Block::new(Coordinate::new((i % cols) as i32, (i / cols) as i32)))
            .inspect(|block| dbg_log!(DBG_EXTRA, "Inserted block @ {}", block.coord))
            .collect();

        Self { rows, cols, offsets, blocks }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn blocks(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    fn block_index(&self, coord: Coordinate) -> Option<usize> {
        if coord.x < 0 || coord.y < 0 {
            return None;
        }
        let (x, y) = (coord.x as usize, coord.y as usize);
        if x >= self.cols || y >= self.rows {
            return None;
        }
        Some(x + y * self.cols)
    }

    pub fn block(&self, coord: Coordinate) -> Option<&Block> {
        self.block_index(coord).map(|idx| &self.blocks[idx])
    }

    /// Address of the block which receives `inst`. `None` when the offset
    /// pushes it past the `i32` range.
    pub fn dispatch_coord(&self, inst: &Instruction) -> Option<Coordinate> {
        inst.coordinates().checked_add(self.offsets.for_opcode(inst.opcode()))
    }

    /// Moves `inst` into the unit it configures.
    pub fn push(&mut self, inst: Instruction) -> TranslateResult<()> {
        let dispatched = self.dispatch_coord(&inst);
        let idx = dispatched.and_then(|coord| self.block_index(coord)).ok_or(
            TranslateError::AddressOutOfRange {
                coord: dispatched.unwrap_or_else(|| inst.coordinates()),
                rows: self.rows,
                cols: self.cols,
            }
        )?;
        self.blocks[idx].push(inst);
        Ok(())
    }

    pub fn instruction_count(&self) -> usize {
        self.blocks.iter().map(Block::instruction_count).sum()
    }
}
