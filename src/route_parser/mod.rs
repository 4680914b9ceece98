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

//! Single-pass state machine over route file lines.
//!
//! The machine remembers exactly one recognized record (the previous node) and
//! synthesizes an instruction whenever the previous and current records form
//! one of these pairs:
//!
//! | previous         | current | instruction      |
//! |------------------|---------|------------------|
//! | `ChannelNode`    | `CHAN*` | `Switch`         |
//! | `BlockOutputPin` | `CHAN*` | `Connect` (out)  |
//! | `ChannelNode`    | `IPIN`  | `Connect` (in)   |
//!
//! Every other pair only updates the state. Lines matching no pattern are
//! skipped and leave the state untouched, so the remembered record is always
//! the last *recognized* line rather than the physically previous one.

use crate::config::TranslateOpts;
use crate::error::{TranslateError, TranslateResult};
use crate::instruction::{Bind, Connect, Instruction, PinDirection, Switch};
use crate::overlay::Overlay;
use crate::translate::{Translation, TranslationSummary};
#[allow(unused)]
use crate::log::*;

pub mod patterns;

pub use self::patterns::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseState {
    Init,
    NetHeader,
    ChannelNode(ChannelNode),
    PadNode,
    BlockInputPin(PinNode),
    BlockOutputPin(PinNode),
}

impl ParseState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Init => "Init",
            Self::NetHeader => "NetHeader",
            Self::ChannelNode(_) => "ChannelNode",
            Self::PadNode => "PadNode",
            Self::BlockInputPin(_) => "BlockInputPin",
            Self::BlockOutputPin(_) => "BlockOutputPin",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub state: ParseState,
    pub instruction: Option<Instruction>,
}

fn connect(dir: PinDirection, pin: &PinNode, chan: &ChannelNode) -> Instruction {
    Connect::new(
        dir, pin.port.clone(), pin.index, pin.coord, chan.alignment, chan.track, chan.coord
    ).into()
}

/// Computes the successor of `prev` for a recognized `line`.
pub fn transition(prev: &ParseState, line: &RouteLine) -> Transition {
    use ParseState as S;

    let (state, instruction) = match (prev, line) {
        (_, RouteLine::ArraySize { .. }) => (prev.clone(), None),
        (_, RouteLine::Net(_)) => (S::NetHeader, None),
        (_, RouteLine::Pad { .. }) => (S::PadNode, None),
        (S::ChannelNode(from), RouteLine::Channel(to)) => {
            let sw = Switch::new(
                from.alignment, from.track, from.coord,
                to.alignment, to.track, to.coord
            );
            (S::ChannelNode(to.clone()), Some(sw.into()))
        },
        (S::BlockOutputPin(pin), RouteLine::Channel(chan)) => {
            (S::ChannelNode(chan.clone()), Some(connect(PinDirection::Out, pin, chan)))
        },
        (_, RouteLine::Channel(chan)) => (S::ChannelNode(chan.clone()), None),
        (S::ChannelNode(chan), RouteLine::InputPin(pin)) => {
            (S::BlockInputPin(pin.clone()), Some(connect(PinDirection::In, pin, chan)))
        },
        (_, RouteLine::InputPin(pin)) => (S::BlockInputPin(pin.clone()), None),
        (_, RouteLine::OutputPin(pin)) => (S::BlockOutputPin(pin.clone()), None),
    };

    Transition { state, instruction }
}

enum GridState {
    Uninitialized,
    Ready(Overlay),
}

pub struct RouteParser {
    opts: TranslateOpts,
    grid: GridState,
    state: ParseState,
    net: Option<NetHeader>,
    summary: TranslationSummary,
}

impl RouteParser {
    pub fn new(opts: TranslateOpts) -> Self {
        Self {
            opts,
            grid: GridState::Uninitialized,
            state: ParseState::Init,
            net: None,
            summary: TranslationSummary::default(),
        }
    }

    pub fn state(&self) -> &ParseState {
        &self.state
    }

    /// Net currently being walked, if any header was seen.
    pub fn current_net(&self) -> Option<&NetHeader> {
        self.net.as_ref()
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        match &self.grid {
            GridState::Ready(overlay) => Some(overlay),
            GridState::Uninitialized => None,
        }
    }

    pub fn summary(&self) -> &TranslationSummary {
        &self.summary
    }

    fn init_grid(&mut self, rows: usize, cols: usize) -> TranslateResult<()> {
        if let GridState::Ready(overlay) = &self.grid {
            dbg_log!(
                DBG_WARN,
                "Ignoring repeated array size {} x {}, overlay is already {} x {}",
                rows, cols, overlay.rows(), overlay.cols()
            );
            return Ok(());
        }
        self.grid = GridState::Ready(
            Overlay::try_with_offsets(rows, cols, self.opts.offsets.clone())?
        );
        Ok(())
    }

    fn emit(&mut self, inst: Instruction) -> TranslateResult<()> {
        match &mut self.grid {
            GridState::Ready(overlay) => {
                let opcode = inst.opcode();
                overlay.push(inst)?;
                self.summary.record(opcode);
                Ok(())
            },
            GridState::Uninitialized => Err(TranslateError::UninitializedGrid),
        }
    }

    /// Consumes one line of the route file. Returns the number of instructions
    /// it produced.
    pub fn feed_line(&mut self, line: &str) -> TranslateResult<usize> {
        self.summary.lines += 1;

        let route_line = match RouteLine::classify(line) {
            Some(route_line) => route_line,
            None => {
                dbg_log!(DBG_EXTRA, "Skipping line {}: {:?}", self.summary.lines, line);
                self.summary.skipped_lines += 1;
                return Ok(0);
            },
        };

        let mut emitted: Vec<Instruction> = Vec::new();
        match &route_line {
            RouteLine::ArraySize { rows, cols } => self.init_grid(*rows, *cols)?,
            RouteLine::Net(net) => {
                dbg_log!(DBG_EXTRA, "Found net {}: {}", net.id, net.descriptor);
                self.summary.nets += 1;
                self.net = Some(net.clone());
            },
            RouteLine::OutputPin(pin) | RouteLine::InputPin(pin) if self.opts.bind_pins => {
                let dir = if matches!(route_line, RouteLine::OutputPin(_)) {
                    PinDirection::Out
                } else {
                    PinDirection::In
                };
                emitted.push(
                    Bind::new(pin.component.clone(), pin.port.clone(), pin.index, pin.coord, dir)
                        .into()
                );
            },
            _ => (),
        }

        let Transition { state, instruction } = transition(&self.state, &route_line);
        self.state = state;
        emitted.extend(instruction);

        let count = emitted.len();
        for inst in emitted {
            self.emit(inst)?;
        }
        Ok(count)
    }

    pub fn finish(self) -> TranslateResult<Translation> {
        match self.grid {
            GridState::Ready(overlay) => Ok(Translation {
                overlay,
                summary: self.summary,
                placement: None,
            }),
            GridState::Uninitialized => Err(TranslateError::UninitializedGrid),
        }
    }
}
