//! File output: scalar time series, aggregate log, optional grid
//! snapshots and the run banners.
//!
//! File layout matches the historical tooling: `T.dat`, `B.dat`, `P.dat`
//! hold one `<iteration> <value>` line per snapshot, `L.dat` one line of
//! the six coupling scalars, and with `--save-all` each snapshot also
//! writes one `<x> <y> <z> <value>` grid file per field. The last line of
//! a grid file carries no trailing newline.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use immune_sim_core::grid::coords;
use immune_sim_core::{Field, FieldKind, RunSummary, Snapshot, SnapshotSink, VOLUME};

/// Snapshot sink writing the `.dat` series and optional `.csv` grids.
pub struct FileSink {
    dir: PathBuf,
    save_all_fields: bool,
    t_series: BufWriter<File>,
    b_series: BufWriter<File>,
    p_series: BufWriter<File>,
    aggregate_log: BufWriter<File>,
}

impl FileSink {
    /// Open every scalar output file under `dir`, creating the directory
    /// if needed. Any failure here is fatal before the run starts.
    pub fn create(dir: &Path, save_all_fields: bool) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let open = |name: &str| -> io::Result<BufWriter<File>> {
            Ok(BufWriter::new(File::create(dir.join(name))?))
        };
        Ok(Self {
            dir: dir.to_path_buf(),
            save_all_fields,
            t_series: open("T.dat")?,
            b_series: open("B.dat")?,
            p_series: open("P.dat")?,
            aggregate_log: open("L.dat")?,
        })
    }

    /// Flush the scalar series; call once after the run.
    pub fn finish(mut self) -> io::Result<()> {
        self.t_series.flush()?;
        self.b_series.flush()?;
        self.p_series.flush()?;
        self.aggregate_log.flush()
    }

    fn write_grid_file(&self, kind: FieldKind, iteration: u64, field: &Field) -> io::Result<()> {
        let path = self.dir.join(format!("{}_{}.csv", kind.symbol(), iteration));
        let mut w = BufWriter::new(File::create(path)?);
        for (i, &v) in field.current().iter().enumerate() {
            let (x, y, z) = coords(i);
            if i + 1 == VOLUME {
                write!(w, "{x} {y} {z} {}", sci(v, 6))?;
            } else {
                writeln!(w, "{x} {y} {z} {}", sci(v, 6))?;
            }
        }
        w.flush()
    }
}

/// Scientific notation with a two-digit signed exponent (`2.00E+00`,
/// `1.23E-03`), the layout the historical `.dat`/`.csv` consumers parse.
/// Rust's `{:E}` alone renders `2E0`, which those parsers reject.
fn sci(value: f64, precision: usize) -> String {
    let s = format!("{value:.precision$E}");
    match s.split_once('E') {
        Some((mantissa, exp)) => {
            let (sign, digits) = exp.strip_prefix('-').map_or(("+", exp), |d| ("-", d));
            format!("{mantissa}E{sign}{digits:0>2}")
        }
        // NaN and infinities carry no exponent
        None => s,
    }
}

impl SnapshotSink for FileSink {
    fn on_snapshot(&mut self, s: &Snapshot<'_>) -> io::Result<()> {
        // T/B/P lines carry a trailing space before the newline, exactly
        // as the historical files did
        writeln!(self.t_series, "{} {} ", s.iteration, sci(s.lymph.t_helper, 2))?;
        writeln!(self.b_series, "{} {} ", s.iteration, sci(s.lymph.b_lymphocyte, 2))?;
        writeln!(self.p_series, "{} {} ", s.iteration, sci(s.lymph.plasma_cell, 2))?;
        writeln!(
            self.aggregate_log,
            "{} {} {} {} {} {} {}",
            s.iteration,
            sci(s.aggregates.active_macrophage, 2),
            sci(s.aggregates.antibody, 2),
            sci(s.lymph.active_macrophage, 2),
            sci(s.lymph.antibody, 2),
            sci(s.aggregates.bacteria, 2),
            sci(s.aggregates.resting_macrophage, 2),
        )?;

        if self.save_all_fields {
            for kind in [
                FieldKind::Bacteria,
                FieldKind::RestingMacrophage,
                FieldKind::ActiveMacrophage,
                FieldKind::Antibody,
            ] {
                self.write_grid_file(kind, s.iteration, s.fields.field(kind))?;
            }
        }
        Ok(())
    }
}

/// Startup banner reporting the initial bacteria load.
pub fn header(initial_bacteria: f64) -> String {
    let stars = "*".repeat(40);
    format!(
        "{stars}\n* Begin of simulation *\n*\n* Initial bacteria = {initial_bacteria}.\n*\n{stars}"
    )
}

/// Shutdown banner reporting iterations, simulated days and the final
/// bacteria load.
pub fn footer(summary: &RunSummary) -> String {
    let stars = "*".repeat(40);
    format!(
        "The end.\n ...of simulation!\n{} time steps for {} days.\n{stars}\nBacteria in the end : {}\n{stars}",
        summary.iterations, summary.days, summary.final_bacteria
    )
}
