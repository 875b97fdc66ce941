//! Gnuplot export of the response curve.
//!
//! Writes a self-contained gnuplot script: inline data blocks for the
//! curve and its reference lines, styling, and a `plot` command.  Run it
//! with `gnuplot <file>`.
//!
//! | Block        | Content                                          |
//! |--------------|--------------------------------------------------|
//! | `$DutyCycle` | sampled `(pv, duty)` curve                       |
//! | `$tPV`       | vertical line at the target                      |
//! | `$PV`        | short vertical crosshair at the marked pv        |
//! | `$Inter`     | horizontal line from the marked pv to the target |
//! | `$SP`        | current duty across the control range            |
//! | `$lCR/$hCR`  | vertical lines at the control-range bounds       |

use std::io::{self, Write};

use super::yap::ControlLaw;

/// Default sample spacing.
const DEFAULT_STEP: f64 = 1.0;
/// Margin below the low bound included in the curve and x-range.
const MARGIN_LOW: f64 = 10.0;
/// Margin above the high bound included in the curve.
const MARGIN_HIGH: f64 = 10.0;
/// Extra x-range above the high bound, leaves room for the legend.
const LABEL_ROOM_HIGH: f64 = 30.0;
/// Half height of the process-value crosshair, in duty percent.
const CROSSHAIR_HALF: f64 = 3.0;

/// What to render.  `None` fields fall back to ranges derived from the
/// controller's configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotOptions {
    pub start_pv: Option<f64>,
    pub end_pv: Option<f64>,
    /// Process value to mark.  Falls back to the stored one, if any.
    pub process_value: Option<f64>,
    pub step: f64,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            start_pv: None,
            end_pv: None,
            process_value: None,
            step: DEFAULT_STEP,
        }
    }
}

fn invalid_input(e: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, e)
}

/// Write only the `pv duty` data lines, bracketed by comment lines.
pub fn write_curve_data(
    law: &ControlLaw,
    opts: &PlotOptions,
    out: &mut impl Write,
) -> io::Result<()> {
    let cfg = law.config();
    let start = opts.start_pv.unwrap_or(cfg.control_range_low - MARGIN_LOW);
    let end = opts.end_pv.unwrap_or(cfg.control_range_high + MARGIN_HIGH);
    let curve = law.sample_curve(start, end, opts.step).map_err(invalid_input)?;

    writeln!(out, "# Start of process_value/duty_cycle plot data")?;
    for point in &curve {
        writeln!(out, "{} {}", point.process_value, point.duty_cycle)?;
    }
    writeln!(out, "# End of process_value/duty_cycle plot data")
}

/// Write a complete gnuplot script for the current controller state.
///
/// Returns the duty cycle the marked process value would produce, or
/// `None` when there is nothing to mark.
pub fn write_gnuplot(
    law: &ControlLaw,
    opts: &PlotOptions,
    out: &mut impl Write,
) -> io::Result<Option<f64>> {
    let cfg = law.config();
    let x_start = opts.start_pv.unwrap_or(cfg.control_range_low - MARGIN_LOW);
    let x_end = opts.end_pv.unwrap_or(cfg.control_range_high + LABEL_ROOM_HIGH);
    let marked_pv = opts.process_value.or(law.process_value());

    writeln!(out, "$DutyCycle << EOD")?;
    write_curve_data(law, opts, out)?;
    writeln!(out, "EOD")?;

    write_block(out, "tPV", &[(cfg.target_pv, 0.0), (cfg.target_pv, 100.0)])?;

    let marked_duty = marked_pv.map(|pv| (pv, law.evaluate(pv)));
    if let Some((pv, duty)) = marked_duty {
        write_block(
            out,
            "PV",
            &[(pv, duty - CROSSHAIR_HALF), (pv, duty + CROSSHAIR_HALF)],
        )?;
        write_block(out, "Inter", &[(pv, duty), (cfg.target_pv, duty)])?;
    }

    let duty = law.duty_cycle();
    write_block(
        out,
        "SP",
        &[(cfg.control_range_low, duty), (cfg.control_range_high, duty)],
    )?;
    write_block(
        out,
        "lCR",
        &[(cfg.control_range_low, 0.0), (cfg.control_range_low, 100.0)],
    )?;
    write_block(
        out,
        "hCR",
        &[(cfg.control_range_high, 0.0), (cfg.control_range_high, 100.0)],
    )?;

    writeln!(out, "set print \"-\"")?;
    writeln!(out, "set border 15 linewidth 2 linecolor rgb \"black\"")?;
    writeln!(out, "set style line 1 linewidth 3 linecolor rgb \"red\"")?;
    writeln!(out, "set style line 2 linewidth 2 linecolor rgb \"#4B0082\"")?;
    writeln!(out, "set style line 3 linewidth 2 linecolor rgb \"green\"")?;
    writeln!(out, "set style line 4 linewidth 1 linecolor rgb \"brown\"")?;
    writeln!(out, "set style line 5 linewidth 2 linecolor rgb \"blue\"")?;
    writeln!(out, "set dashtype 5 (5,5)")?;
    writeln!(out, "set title \"Temperature (PV) vs Duty Cycle (SP)\"")?;
    writeln!(out, "set xlabel \"Temperature (process value)\"")?;
    writeln!(out, "set xrange [{x_start:.0}:{x_end:.0}] noextend")?;
    writeln!(out, "set ylabel \"Duty Cycle %\"")?;
    writeln!(out, "set yrange [-1:101] noextend")?;
    writeln!(out, "set grid")?;

    write!(out, "plot $DutyCycle ls 1 title \"Duty Cycle Plot\" with lines , ")?;
    write!(out, "  $lCR ls 4 title \"Control Range\" with lines , ")?;
    write!(out, "  $hCR ls 4 notitle with lines , ")?;
    write!(out, "  $SP ls 3 title \"Duty Cycle Set Point\" with lines , ")?;
    write!(out, "  $tPV ls 2 title \"Target Temp\" with lines , ")?;
    if marked_duty.is_some() {
        write!(out, "  $PV ls 5 title \"Measured Temp\" with lines ,")?;
        write!(out, "  $Inter ls 5 dt 5 notitle with lines")?;
    }
    writeln!(out)?;

    writeln!(out, "print \"CR to exit\"")?;
    writeln!(out, "pause -1")?;

    Ok(marked_duty.map(|(_, duty)| duty))
}

fn write_block(out: &mut impl Write, name: &str, points: &[(f64, f64)]) -> io::Result<()> {
    writeln!(out, "${name} << EOD")?;
    for (x, y) in points {
        writeln!(out, "{x} {y}")?;
    }
    writeln!(out, "EOD")
}
