//! Step-hold resampling of event trajectories onto a fixed report grid,
//! so independent runs can be averaged elementwise.

use{
    crate::sir_model::Trajectory,
    serde::{Serialize, Deserialize},
    thiserror::Error
};

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum SampleError{
    #[error("report time {report_time} precedes the trajectory start {start}")]
    BeforeStart{ report_time: f64, start: f64 },
    #[error("cannot subsample an empty trajectory")]
    EmptyTrajectory,
}

/// S/I/R values aligned with a report-time grid.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SampledCurves{
    pub times: Vec<f64>,
    pub sus: Vec<u32>,
    pub inf: Vec<u32>,
    pub rec: Vec<u32>,
}

/// For every report time (non-decreasing order expected) takes the last
/// trajectory point at or before it. All three series share one cursor, a
/// single pass over the trajectory regardless of grid size. Values past the
/// last event are carried forward; a report time before the first event is a
/// configuration error.
pub fn subsample(report_times: &[f64], trajectory: &Trajectory) -> Result<SampledCurves, SampleError>{
    if trajectory.is_empty(){
        return Err(SampleError::EmptyTrajectory);
    }
    let mut curves = SampledCurves{
        times: report_times.to_vec(),
        sus: Vec::with_capacity(report_times.len()),
        inf: Vec::with_capacity(report_times.len()),
        rec: Vec::with_capacity(report_times.len()),
    };

    let mut next_observation = 0;
    let mut current: Option<usize> = None;
    for &report_time in report_times{
        while next_observation < trajectory.len()
            && trajectory.times[next_observation] <= report_time
        {
            current = Some(next_observation);
            next_observation += 1;
        }
        let index = current.ok_or(SampleError::BeforeStart{
            report_time,
            start: trajectory.times[0],
        })?;
        curves.sus.push(trajectory.sus[index]);
        curves.inf.push(trajectory.inf[index]);
        curves.rec.push(trajectory.rec[index]);
    }
    Ok(curves)
}
