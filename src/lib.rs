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

#[macro_use]
extern crate lazy_static;

#[macro_use]
pub mod log;
pub mod common;
pub mod error;
pub mod instruction;
pub mod config;
pub mod overlay;
pub mod route_parser;
pub mod place;
pub mod translate;
pub mod exporter;

pub use crate::common::Coordinate;
pub use crate::config::TranslateOpts;
pub use crate::error::{TranslateError, TranslateResult};
pub use crate::instruction::Instruction;
pub use crate::overlay::Overlay;
pub use crate::translate::{Translation, translate_file, translate_str};
