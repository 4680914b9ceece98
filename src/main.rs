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

use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use ovbgen::common::Coordinate;
use ovbgen::config::TranslateOpts;
use ovbgen::error::TranslateError;
use ovbgen::exporter::*;
use ovbgen::translate::{Translation, translate_file};

#[derive(Parser, Debug)]
#[clap(
    author = "Antmicro",
    version = "0.1.0",
    about = "OVBGEN - Overlay configuration generator for VPR route files",
    long_about = None
)]
struct Args {
    #[clap(help = "Circuit base name, <circuit>.route (and optionally <circuit>.place) is read")]
    circuit: String,
    #[clap(long, help = "YAML file with translation options")]
    config: Option<String>,
    #[clap(long, help = "Emit bind instructions for compute unit pins")]
    bind_pins: bool,
    #[clap(subcommand)]
    command: SubCommands,
}

#[derive(Parser, Debug)]
struct TranslateCmd {
    #[clap(long, help = "Write the instruction listing to a file instead of stdout")]
    listing: Option<String>,
    #[clap(
        long,
        help = "Sections to be exported to JSON: overlay, summary, placement or :all"
    )]
    json: Option<Vec<String>>,
    #[clap(long, default_value = "overlay.json", help = "Path of the JSON file")]
    json_out: String,
}

#[derive(Parser, Debug)]
struct BlockCmd {
    #[clap(help = "Block column")]
    x: i32,
    #[clap(help = "Block row")]
    y: i32,
}

#[derive(Subcommand, Debug)]
enum SubCommands {
    Translate(TranslateCmd),
    Block(BlockCmd),
}

fn fatal(err: TranslateError) -> ! {
    eprintln!("Error: {}", err);
    std::process::exit(1)
}

fn io_fatal(err: std::io::Error) -> ! {
    fatal(TranslateError::Io(format!("{}", err)))
}

fn translate(args: TranslateCmd, translation: &Translation) {
    let out: Box<dyn Write> = match &args.listing {
        Some(path) => Box::new(File::create(path).unwrap_or_else(|e| io_fatal(e))),
        None => Box::new(std::io::stdout()),
    };

    let mut listing = ListingExporter::new(out, ExportChecker::all());
    listing.ignore_or_export("overlay", || overlay_listing(&translation.overlay))
        .unwrap_or_else(|e| io_fatal(e));
    Exporter::<String>::flush(&mut listing).unwrap_or_else(|e| io_fatal(e));

    let mut json_exporter = CompoundJsonExporter::new(&args.json, PathBuf::from(&args.json_out));
    json_exporter.ignore_or_export("overlay", || &translation.overlay)
        .unwrap_or_else(|e| io_fatal(e));
    json_exporter.ignore_or_export("summary", || &translation.summary)
        .unwrap_or_else(|e| io_fatal(e));
    if let Some(placement) = &translation.placement {
        json_exporter.ignore_or_export("placement", || placement)
            .unwrap_or_else(|e| io_fatal(e));
    }
    Exporter::<()>::flush(&mut json_exporter).unwrap_or_else(|e| io_fatal(e));

    let summary = &translation.summary;
    println!(concat!(
        "Overlay {} x {}:\n",
        "    No. of nets:                    {}\n",
        "    No. of switch instructions:     {}\n",
        "    No. of inbound connections:     {}\n",
        "    No. of outbound connections:    {}\n",
        "    No. of bind instructions:       {}\n",
        "    No. of skipped lines:           {}"
        ),
        translation.overlay.rows(),
        translation.overlay.cols(),
        summary.nets,
        summary.switches,
        summary.connects_in,
        summary.connects_out,
        summary.binds,
        summary.skipped_lines
    );
}

fn print_block(args: BlockCmd, translation: &Translation) {
    let coord = Coordinate::new(args.x, args.y);
    let overlay = &translation.overlay;
    match overlay.block(coord) {
        Some(block) => print!("{}", block_listing(block)),
        None => fatal(TranslateError::AddressOutOfRange {
            coord,
            rows: overlay.rows(),
            cols: overlay.cols(),
        }),
    }
}

fn main() {
    let args = Args::parse();

    let mut opts = match &args.config {
        Some(path) => TranslateOpts::from_yaml_file(path).unwrap_or_else(|e| fatal(e)),
        None => TranslateOpts::default(),
    };
    if args.bind_pins {
        opts.bind_pins = true;
    }

    let translation = translate_file(&args.circuit, opts).unwrap_or_else(|e| fatal(e));

    match args.command {
        SubCommands::Translate(sargs) => translate(sargs, &translation),
        SubCommands::Block(sargs) => print_block(sargs, &translation),
    }
}
