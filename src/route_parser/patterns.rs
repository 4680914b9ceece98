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

//! Structural patterns of VPR `.route` files.
//!
//! ```text
//! Array size: 6 x 6 logic blocks.
//! Net 2 (fork_n6.out3*Fork*~branchC_n4.in1*Fork*)
//! Node:  449  SOURCE (5,4)  Class: 5  Switch: 2
//! Node:  458    OPIN (5,4)  Pin: 5   PE_WRAPPER.OUT2[0] Switch: 0
//! Node:  588   CHANX (5,3)  Track: 2  Switch: 0
//! Node:  744   CHANY (5,4)  Track: 2  Switch: 0
//! Node:  456    IPIN (5,4)  Pin: 3   PE_WRAPPER.IN4[0] Switch: 2
//! ```

use regex::{Captures, Regex};

use crate::common::Coordinate;
use crate::instruction::Alignment;

lazy_static! {
    static ref RE_ARRAY: Regex =
        Regex::new(r"^\s*Array size:\s*(\d+)\s*x\s*(\d+)\s*logic blocks\.?\s*$")
            .expect("Failed to compile regex");
    static ref RE_NET: Regex =
        Regex::new(r"^\s*Net\s*(\d+)\s*\((.*)\)\s*$")
            .expect("Failed to compile regex");
    static ref RE_NODE_CHAN: Regex =
        Regex::new(r"^\s*Node:\s*(\d+)\s*CHAN(X|Y)\s*\((\d+),\s*(\d+)\)\s*Track:\s*(\d+)(\s.*)?$")
            .expect("Failed to compile regex");
    static ref RE_NODE_PIN: Regex =
        Regex::new(concat!(
            r"^\s*Node:\s*(\d+)\s*(OPIN|IPIN)\s*\((\d+),\s*(\d+)\)\s*Pin:\s*(\d+)\s*",
            r"(\w+)\.(\w+)\[(\d+)\]"
        ))
            .expect("Failed to compile regex");
    static ref RE_NODE_PAD: Regex =
        Regex::new(r"^\s*Node:\s*(\d+)\s*(\w+)(.*)$")
            .expect("Failed to compile regex");
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetHeader {
    pub id: u64,
    pub descriptor: String,
}

/// `CHANX`/`CHANY` routing node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelNode {
    pub id: u64,
    pub alignment: Alignment,
    pub coord: Coordinate,
    pub track: u32,
}

/// `OPIN`/`IPIN` node of a compute unit, e.g. `PE_WRAPPER.OUT2[0]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PinNode {
    pub id: u64,
    pub coord: Coordinate,
    pub pin: u32,
    pub component: String,
    pub port: String,
    pub index: u32,
}

/// A route file line reduced to the one pattern it matches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteLine {
    ArraySize { rows: usize, cols: usize },
    Net(NetHeader),
    Channel(ChannelNode),
    OutputPin(PinNode),
    InputPin(PinNode),
    /// Any other node: sources, sinks and IO pads.
    Pad { id: u64, kind: String },
}

fn num<T: std::str::FromStr>(caps: &Captures, idx: usize) -> Option<T> {
    caps.get(idx)?.as_str().parse().ok()
}

fn coord(caps: &Captures, x_idx: usize, y_idx: usize) -> Option<Coordinate> {
    Some(Coordinate::new(num(caps, x_idx)?, num(caps, y_idx)?))
}

impl RouteLine {
    /// Matches `line` against the known patterns in priority order. Returns
    /// `None` for lines which match nothing (including ones with numbers too
    /// large to represent).
    pub fn classify(line: &str) -> Option<Self> {
        if let Some(caps) = RE_ARRAY.captures(line) {
            return Some(Self::ArraySize { rows: num(&caps, 1)?, cols: num(&caps, 2)? });
        }

        if let Some(caps) = RE_NET.captures(line) {
            return Some(Self::Net(NetHeader {
                id: num(&caps, 1)?,
                descriptor: caps[2].to_string(),
            }));
        }

        if let Some(caps) = RE_NODE_CHAN.captures(line) {
            let alignment = if &caps[2] == "X" { Alignment::X } else { Alignment::Y };
            return Some(Self::Channel(ChannelNode {
                id: num(&caps, 1)?,
                alignment,
                coord: coord(&caps, 3, 4)?,
                track: num(&caps, 5)?,
            }));
        }

        if let Some(caps) = RE_NODE_PIN.captures(line) {
            let pin = PinNode {
                id: num(&caps, 1)?,
                coord: coord(&caps, 3, 4)?,
                pin: num(&caps, 5)?,
                component: caps[6].to_string(),
                port: caps[7].to_string(),
                index: num(&caps, 8)?,
            };
            return Some(match &caps[2] {
                "OPIN" => Self::OutputPin(pin),
                _ => Self::InputPin(pin),
            });
        }

        if let Some(caps) = RE_NODE_PAD.captures(line) {
            return Some(Self::Pad { id: num(&caps, 1)?, kind: caps[2].to_string() });
        }

        None
    }
}
