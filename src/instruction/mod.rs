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

//! Configuration instructions for overlay units.
//!
//! Every instruction knows which grid coordinate owns it. The overlay uses
//! that coordinate together with the [`Opcode`] to pick the block and the unit
//! the instruction ends up in.

use serde::{Serialize, Deserialize};

use crate::common::{Coordinate, switch_box_position};
use crate::error::{TranslateError, TranslateResult};


/// Orientation of a routing channel: `CHANX` runs horizontally, `CHANY`
/// vertically.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alignment {
    X,
    Y,
}

impl Alignment {
    pub fn as_char(self) -> char {
        match self {
            Self::X => 'X',
            Self::Y => 'Y',
        }
    }
}

impl TryFrom<char> for Alignment {
    type Error = char;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            'X' => Ok(Self::X),
            'Y' => Ok(Self::Y),
            other => Err(other),
        }
    }
}

/// One of the four sides of a switch box.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortLocation {
    North,
    South,
    East,
    West,
    Floating,
}

impl PortLocation {
    pub fn label(self) -> &'static str {
        match self {
            Self::North => "N",
            Self::South => "S",
            Self::East => "E",
            Self::West => "W",
            Self::Floating => "F",
        }
    }
}

impl std::fmt::Display for PortLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchOperand {
    pub loc: PortLocation,
    pub track: u32,
}

impl std::fmt::Display for SwitchOperand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.loc, self.track)
    }
}

/// Connects two sides of the switch box placed between two adjacent channel
/// segments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Switch {
    pub from: SwitchOperand,
    pub to: SwitchOperand,
    pub coord: Coordinate,
}

impl Switch {
    pub fn new(
        in_alignment: Alignment,
        in_track: u32,
        in_coord: Coordinate,
        out_alignment: Alignment,
        out_track: u32,
        out_coord: Coordinate,
    ) -> Self {
        use Alignment::*;
        use PortLocation::*;

        let coord = switch_box_position(in_coord, out_coord);
        let in_diff = in_coord - coord;
        let out_diff = out_coord - coord;

        let horizontal = |diff: Coordinate| if diff.x == 1 { East } else { West };
        let vertical = |diff: Coordinate| if diff.y == 1 { North } else { South };

        let (from_loc, to_loc) = match (in_alignment, out_alignment) {
            (X, Y) => (horizontal(in_diff), vertical(out_diff)),
            (X, X) => if in_diff.x == 1 { (East, West) } else { (West, East) },
            (Y, X) => (vertical(in_diff), horizontal(out_diff)),
            (Y, Y) => if in_diff.y == 1 { (North, South) } else { (South, North) },
        };

        Self {
            from: SwitchOperand { loc: from_loc, track: in_track },
            to: SwitchOperand { loc: to_loc, track: out_track },
            coord,
        }
    }

    /// Same as [`Switch::new`], but takes raw alignment characters as found
    /// in route files. The route parser already narrows channels to
    /// [`Alignment`], so this is the only way to hit
    /// [`TranslateError::InvalidAlignment`]; it serves callers holding
    /// unvalidated characters.
    pub fn from_raw(
        in_alignment: char,
        in_track: u32,
        in_coord: Coordinate,
        out_alignment: char,
        out_track: u32,
        out_coord: Coordinate,
    ) -> TranslateResult<Self> {
        match (Alignment::try_from(in_alignment), Alignment::try_from(out_alignment)) {
            (Ok(ia), Ok(oa)) => Ok(Self::new(ia, in_track, in_coord, oa, out_track, out_coord)),
            _ => Err(TranslateError::InvalidAlignment(in_alignment, out_alignment)),
        }
    }
}

impl std::fmt::Display for Switch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "switch {} {} #{}", self.from, self.to, self.coord)
    }
}

/// Direction of data relative to the compute unit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinDirection {
    In,
    Out,
}

impl PinDirection {
    /* Everything that is not explicitly an output flows into the unit */
    pub fn from_pin_dir(dir: char) -> Self {
        if dir == 'O' { Self::Out } else { Self::In }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

/// Binds a routing track of a connection box to a compute unit pin.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connect {
    pub direction: PinDirection,
    pub pin_name: String,
    pub pin_index: u32,
    pub pin_coord: Coordinate,
    pub track: u32,
    pub track_alignment: Alignment,
    pub track_coord: Coordinate,
}

impl Connect {
    pub fn new(
        direction: PinDirection,
        pin_name: impl Into<String>,
        pin_index: u32,
        pin_coord: Coordinate,
        track_alignment: Alignment,
        track: u32,
        track_coord: Coordinate,
    ) -> Self {
        Self {
            direction,
            pin_name: pin_name.into(),
            pin_index,
            pin_coord,
            track,
            track_alignment,
            track_coord,
        }
    }

    pub fn is_input(&self) -> bool {
        self.direction == PinDirection::In
    }
}

impl std::fmt::Display for Connect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let pin = format!("{}@{}@{}", self.direction.as_str(), self.pin_name, self.pin_index);
        let track = format!("track@{}", self.track);
        match self.direction {
            PinDirection::In => write!(
                f, "connect {} {} #{} -> {}",
                track, pin, self.track_coord, self.pin_coord
            ),
            PinDirection::Out => write!(
                f, "connect {} {} #{} -> {}",
                pin, track, self.pin_coord, self.track_coord
            ),
        }
    }
}

/// Associates a netlist component pin with the compute unit at `coord`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bind {
    pub component: String,
    pub pin_name: String,
    pub pin_index: u32,
    pub coord: Coordinate,
    pub direction: PinDirection,
}

impl Bind {
    pub fn new(
        component: impl Into<String>,
        pin_name: impl Into<String>,
        pin_index: u32,
        coord: Coordinate,
        direction: PinDirection,
    ) -> Self {
        Self {
            component: component.into(),
            pin_name: pin_name.into(),
            pin_index,
            coord,
            direction,
        }
    }

    pub fn is_outbound(&self) -> bool {
        self.direction == PinDirection::Out
    }
}

impl std::fmt::Display for Bind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f, "bind {}.{}@{} {} #{}",
            self.component, self.pin_name, self.pin_index, self.direction.as_str(), self.coord
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Opcode {
    Switch,
    ConnectTo,
    ConnectFrom,
    Bind,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Instruction {
    Switch(Switch),
    Connect(Connect),
    Bind(Bind),
}

impl Instruction {
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::Switch(_) => Opcode::Switch,
            Self::Connect(c) if c.is_input() => Opcode::ConnectTo,
            Self::Connect(_) => Opcode::ConnectFrom,
            Self::Bind(_) => Opcode::Bind,
        }
    }

    /// Grid coordinate which owns the instruction.
    pub fn coordinates(&self) -> Coordinate {
        match self {
            Self::Switch(s) => s.coord,
            Self::Connect(c) => c.track_coord,
            Self::Bind(b) => b.coord,
        }
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Switch(s) => s.fmt(f),
            Self::Connect(c) => c.fmt(f),
            Self::Bind(b) => b.fmt(f),
        }
    }
}

impl From<Switch> for Instruction {
    fn from(s: Switch) -> Self {
        Self::Switch(s)
    }
}

impl From<Connect> for Instruction {
    fn from(c: Connect) -> Self {
        Self::Connect(c)
    }
}

impl From<Bind> for Instruction {
    fn from(b: Bind) -> Self {
        Self::Bind(b)
    }
}
