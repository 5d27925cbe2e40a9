//! Terminal rendering for `exactline check` and `exactline bench`

use crate::bench::BenchReport;
use crate::server::Response;
use crate::strategy::SearchOutcome;
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

fn stdout(color: bool) -> StandardStream {
    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    StandardStream::stdout(choice)
}

/// Print a server reply line, green for a hit and yellow for a miss
pub fn print_response(response: Response, color: bool) -> io::Result<()> {
    let mut out = stdout(color);
    let fg = match response {
        Response::Exists => Color::Green,
        Response::NotFound => Color::Yellow,
    };
    out.set_color(ColorSpec::new().set_fg(Some(fg)).set_bold(true))?;
    write!(out, "{}", response.as_line())?;
    out.reset()
}

/// Print a single strategy run
pub fn print_outcome(strategy: &str, outcome: SearchOutcome, color: bool) -> io::Result<()> {
    print_response(Response::from_found(outcome.found), color)?;

    let mut out = stdout(color);
    out.set_color(ColorSpec::new().set_dimmed(true))?;
    writeln!(
        out,
        "{} in {:.3}ms",
        strategy,
        outcome.elapsed.as_secs_f64() * 1000.0
    )?;
    out.reset()
}

/// Print a bench report as a table
pub fn print_bench_report(report: &BenchReport, color: bool) -> io::Result<()> {
    let mut out = stdout(color);

    out.set_color(ColorSpec::new().set_bold(true))?;
    writeln!(
        out,
        "{} ({} lines, {}, {} runs per query)",
        report.corpus.display(),
        report.corpus_lines,
        if report.sorted { "sorted" } else { "unsorted" },
        report.runs
    )?;
    out.reset()?;

    writeln!(
        out,
        "{:<10} {:>10} {:>10} {:>10} {:>10} {:>7}",
        "strategy", "avg ms", "min ms", "max ms", "mismatch", "errors"
    )?;

    for r in &report.strategies {
        out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
        write!(out, "{:<10}", r.strategy.name())?;
        out.reset()?;

        if let Some(reason) = &r.skipped {
            out.set_color(ColorSpec::new().set_dimmed(true))?;
            writeln!(out, " skipped: {}", reason)?;
            out.reset()?;
            continue;
        }

        write!(out, " {:>10.3} {:>10.3} {:>10.3}", r.avg_ms, r.min_ms, r.max_ms)?;

        let bad = r.mismatches > 0 || r.errors > 0;
        if bad {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        }
        writeln!(out, " {:>10} {:>7}", r.mismatches, r.errors)?;
        out.reset()?;
    }

    for r in &report.strategies {
        for q in r.queries.iter().filter(|q| q.error.is_some()) {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
            writeln!(
                out,
                "{}: {:?}: {}",
                r.strategy.name(),
                q.query,
                q.error.as_deref().unwrap_or_default()
            )?;
            out.reset()?;
        }
    }

    Ok(())
}
