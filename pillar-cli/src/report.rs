//! Placement report printed after a compose run.

use std::path::Path;

use owo_colors::OwoColorize;
use pillar_layout::{Instruction, Unit};
use pillar_render::{Raster, Rendered};
use serde::Serialize;

/// One instruction of the computed list.
#[derive(Debug, Serialize)]
pub struct Placement {
    index: usize,
    top: Unit,
    left: Unit,
    bottom: Unit,
    right: Unit,
    /// `(left, top, right, bottom)` in whole pixels.
    pixels: (i64, i64, i64, i64),
    drawn: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<String>,
}

impl Placement {
    fn new(index: usize, inst: &Instruction<Raster>, dpi: f64) -> Self {
        Self {
            index,
            top: inst.top,
            left: inst.left,
            bottom: inst.bottom,
            right: inst.right,
            pixels: inst.box_px(dpi).ltrb(),
            drawn: inst.payload.is_some(),
            trace: inst.trace.as_ref().map(ToString::to_string),
        }
    }
}

/// Summary of one compose run.
#[derive(Debug, Serialize)]
pub struct Report {
    output: String,
    dpi: f64,
    width: u32,
    height: u32,
    pasted: usize,
    placements: Vec<Placement>,
}

impl Report {
    pub fn new(output: &Path, dpi: f64, rendered: &Rendered) -> Self {
        Self {
            output: output.display().to_string(),
            dpi,
            width: rendered.canvas.width(),
            height: rendered.canvas.height(),
            pasted: rendered.pasted,
            placements: rendered
                .instructions
                .iter()
                .enumerate()
                .map(|(i, inst)| Placement::new(i, inst, dpi))
                .collect(),
        }
    }

    /// Print a colored human-readable summary to stdout.
    pub fn print(&self) {
        println!(
            "{} {} ({}x{} px at {} dpi, {} pasted)",
            "wrote".green().bold(),
            self.output,
            self.width,
            self.height,
            self.dpi,
            self.pasted
        );
        for placement in &self.placements {
            let (left, top, right, bottom) = placement.pixels;
            let marker = if placement.drawn {
                "image".cyan().to_string()
            } else {
                "size ".dimmed().to_string()
            };
            print!(
                "  [{:>2}] {marker} ({left}, {top}) -> ({right}, {bottom})",
                placement.index
            );
            match &placement.trace {
                Some(trace) => println!("  {}", trace.yellow()),
                None => println!(),
            }
        }
    }
}
