use std::io::Write;
use tracing::{debug, info};

use crate::{CliErrors, results::ResultWriter, scenario::Scenario};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub ticks: usize,
    /// Ticks that ended in a numeric fault. Their rows repeat the last valid
    /// output.
    pub faults: usize,
}

/// Steps the scenario's model through its schedule, one row per tick.
///
/// Numeric faults are counted and the replay moves on to the next tick.
/// Lifecycle and signal errors abort the replay.
pub fn replay<W: Write>(
    scenario: &Scenario,
    inner: W,
) -> Result<(ReplaySummary, W), CliErrors> {
    let mut model = scenario
        .model
        .build(&scenario.name);
    for (name, value) in &scenario.inputs {
        model.set_input(name, *value)?;
    }

    let mut results = ResultWriter::new(inner, &model.output_values())?;

    model.activate()?;
    model.start()?;
    info!(
        scenario = %scenario.name,
        rate_hz = scenario.rate_hz,
        duration = scenario.duration,
        "replay started"
    );

    let ticks = scenario.tick_count()?;
    let mut summary = ReplaySummary::default();
    let mut active = None;

    for k in 0..ticks {
        let t = scenario.tick_time(k);

        let segment = scenario.segment_at(t);
        if segment != active {
            if let Some(index) = segment {
                debug!(segment = index, t, "entering segment");
                for (name, value) in &scenario.segments[index].inputs {
                    model.set_input(name, *value)?;
                }
            }
            active = segment;
        }

        match model.execute() {
            Ok(()) => {}
            Err(e) if e.is_numeric() => summary.faults += 1,
            Err(e) => return Err(e.into()),
        }
        summary.ticks += 1;

        results.write_record(t, &model.output_values())?;
    }

    model.deactivate()?;
    results.flush()?;
    info!(ticks = summary.ticks, faults = summary.faults, "replay finished");

    Ok((summary, results.into_inner()?))
}
