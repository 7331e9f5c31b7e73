//! Averaging many independent Gillespie runs and sweeping virus strength.

use{
    crate::graph::{ContactGraph, NodeId},
    crate::sir_model::GillespieSir,
    crate::spectral::{largest_eigenvalue, SpectralError},
    crate::stats_methods::MyVariance,
    crate::subsample::{subsample, SampleError, SampledCurves},
    indicatif::{ParallelProgressIterator, ProgressBar},
    rand::{seq::SliceRandom, Rng, SeedableRng},
    rand_pcg::Pcg64,
    rayon::prelude::*,
    serde::{Serialize, Deserialize},
    thiserror::Error
};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExperimentError{
    #[error(transparent)]
    Sample(#[from] SampleError),
    #[error(transparent)]
    Spectral(#[from] SpectralError),
    #[error("at least one iteration is required")]
    NoRuns,
    #[error("the report-time grid is empty")]
    NoReportTimes,
    #[error("initial size {requested} exceeds the node count {nodes}")]
    SeedCount{ requested: usize, nodes: usize },
    #[error("largest eigenvalue is zero, strength cannot be mapped to a transmission rate")]
    ZeroEigenvalue,
}

/// How each independent run picks its initially infected nodes.
/// `UniformRandom` redraws for every run; `Explicit` (typically a
/// centrality top-k) reuses the same set.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum SeedRule<T>{
    UniformRandom(usize),
    Explicit(Vec<T>),
}

impl<T: NodeId> SeedRule<T>{
    fn resolve<R: Rng>(&self, graph: &ContactGraph<T>, rng: &mut R) -> Vec<T>{
        match self{
            Self::UniformRandom(count) => {
                let nodes: Vec<T> = graph.nodes().collect();
                nodes.choose_multiple(rng, *count).copied().collect()
            }
            Self::Explicit(seeds) => seeds.clone(),
        }
    }

    fn validate(&self, graph: &ContactGraph<T>) -> Result<(), ExperimentError>{
        if let Self::UniformRandom(count) = self{
            if *count > graph.node_count(){
                return Err(ExperimentError::SeedCount{
                    requested: *count,
                    nodes: graph.node_count(),
                });
            }
        }
        Ok(())
    }
}

/// Elementwise mean of sampled curves across runs.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AveragedCurves{
    pub times: Vec<f64>,
    pub sus: Vec<f64>,
    pub inf: Vec<f64>,
    pub rec: Vec<f64>,
    pub iterations: usize,
}

/// One point of the effective-strength response curve.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StrengthScanPoint{
    pub strength: f64,
    pub transmission_rate: f64,
    /// Final recovered count at the end of the report grid, averaged over
    /// the runs of this point.
    pub final_recovered: MyVariance,
}

/// Effective virus strength s = lambda * beta / gamma, rounded for reports.
pub fn effective_strength(eigenvalue: f64, transmission_rate: f64, recovery_rate: f64, digits: u32) -> f64{
    let factor = 10_f64.powi(digits as i32);
    (eigenvalue * transmission_rate / recovery_rate * factor).round() / factor
}

/// Runs `iterations` independent trajectories and subsamples each onto the
/// report grid. Per-run seeds are drawn from a master rng up front, so the
/// result is identical whether the runs execute serially or on the rayon
/// pool. Errors are fail-fast: the first failing run aborts the batch.
fn run_samples<T: NodeId>(
    graph: &ContactGraph<T>,
    transmission_rate: f64,
    recovery_rate: f64,
    seed_rule: &SeedRule<T>,
    iterations: usize,
    report_times: &[f64],
    sir_seed: u64,
    parallel: bool
) -> Result<Vec<SampledCurves>, ExperimentError>
{
    if iterations == 0{
        return Err(ExperimentError::NoRuns);
    }
    let t_min = *report_times.first().ok_or(ExperimentError::NoReportTimes)?;
    seed_rule.validate(graph)?;

    let mut master = Pcg64::seed_from_u64(sir_seed);
    let run_seeds: Vec<u64> = (0..iterations).map(|_| master.gen()).collect();

    let run_once = |run_seed: &u64| -> Result<SampledCurves, ExperimentError>{
        let mut rng = Pcg64::seed_from_u64(*run_seed);
        let seeds = seed_rule.resolve(graph, &mut rng);
        let mut model = GillespieSir::from_rng(
            graph,
            transmission_rate,
            recovery_rate,
            t_min,
            f64::INFINITY,
            rng
        );
        let trajectory = model.propagate_until_completion(&seeds);
        Ok(subsample(report_times, &trajectory)?)
    };

    if parallel{
        run_seeds.par_iter().map(run_once).collect()
    } else {
        run_seeds.iter().map(run_once).collect()
    }
}

/// Mean S/I/R curves over independent runs, the time-evolution experiment.
pub fn average_time_evolution<T: NodeId>(
    graph: &ContactGraph<T>,
    transmission_rate: f64,
    recovery_rate: f64,
    seed_rule: &SeedRule<T>,
    iterations: usize,
    report_times: &[f64],
    sir_seed: u64,
    parallel: bool
) -> Result<AveragedCurves, ExperimentError>
{
    let samples = run_samples(
        graph,
        transmission_rate,
        recovery_rate,
        seed_rule,
        iterations,
        report_times,
        sir_seed,
        parallel
    )?;

    let len = report_times.len();
    let mut curves = AveragedCurves{
        times: report_times.to_vec(),
        sus: vec![0.0; len],
        inf: vec![0.0; len],
        rec: vec![0.0; len],
        iterations,
    };
    for sample in &samples{
        for i in 0..len{
            curves.sus[i] += sample.sus[i] as f64;
            curves.inf[i] += sample.inf[i] as f64;
            curves.rec[i] += sample.rec[i] as f64;
        }
    }
    let norm = iterations as f64;
    for i in 0..len{
        curves.sus[i] /= norm;
        curves.inf[i] /= norm;
        curves.rec[i] /= norm;
    }
    Ok(curves)
}

/// One sweep point: maps the strength back to a transmission rate via the
/// supplied eigenvalue (beta = s * gamma / lambda) and summarizes the final
/// recovered counts of its runs.
pub fn strength_point<T: NodeId>(
    graph: &ContactGraph<T>,
    strength: f64,
    eigenvalue: f64,
    recovery_rate: f64,
    seed_rule: &SeedRule<T>,
    iterations: usize,
    report_times: &[f64],
    point_seed: u64,
    system_size_fraction: Option<f64>
) -> Result<StrengthScanPoint, ExperimentError>
{
    let transmission_rate = strength * recovery_rate / eigenvalue;
    let samples = run_samples(
        graph,
        transmission_rate,
        recovery_rate,
        seed_rule,
        iterations,
        report_times,
        point_seed,
        false
    )?;
    let finals: Vec<f64> = samples
        .iter()
        .map(|curves| curves.rec.last().copied().unwrap_or(0) as f64)
        .collect();
    Ok(StrengthScanPoint{
        strength,
        transmission_rate,
        final_recovered: MyVariance::from_slice(&finals, system_size_fraction),
    })
}

/// Sweeps the effective-strength axis, one `StrengthScanPoint` per value.
/// Points are independent and dispatched on the rayon pool; the runs inside
/// a point stay sequential so point seeds fully determine the outcome.
pub fn scan_strength<T: NodeId>(
    graph: &ContactGraph<T>,
    strengths: &[f64],
    recovery_rate: f64,
    seed_rule: &SeedRule<T>,
    iterations: usize,
    report_times: &[f64],
    sir_seed: u64,
    system_size_fraction: Option<f64>,
    bar: Option<ProgressBar>
) -> Result<Vec<StrengthScanPoint>, ExperimentError>
{
    let eigenvalue = largest_eigenvalue(graph)?;
    if eigenvalue <= 0.0{
        return Err(ExperimentError::ZeroEigenvalue);
    }

    let mut master = Pcg64::seed_from_u64(sir_seed);
    let point_seeds: Vec<u64> = strengths.iter().map(|_| master.gen()).collect();

    let compute = |(strength, point_seed): (&f64, &u64)| {
        strength_point(
            graph,
            *strength,
            eigenvalue,
            recovery_rate,
            seed_rule,
            iterations,
            report_times,
            *point_seed,
            system_size_fraction
        )
    };

    let iterator = strengths.par_iter().zip(point_seeds.par_iter());
    match bar{
        Some(bar) => iterator.progress_with(bar).map(compute).collect(),
        None => iterator.map(compute).collect(),
    }
}

#[cfg(test)]
mod tests{
    use super::*;
    use crate::graph::{ring, star, ContactGraph};

    fn report_grid(end: f64, steps: usize) -> Vec<f64>{
        (0..steps)
            .map(|i| end * i as f64 / (steps - 1) as f64)
            .collect()
    }

    #[test]
    fn one_iteration_returns_the_single_sampled_run(){
        let graph = ring(12);
        let report_times = report_grid(20.0, 50);
        let rule = SeedRule::Explicit(vec![0_u32]);

        let averaged = average_time_evolution(
            &graph, 1.0, 1.0, &rule, 1, &report_times, 555, false
        ).unwrap();

        // replicate the aggregator's seed derivation by hand
        let mut master = Pcg64::seed_from_u64(555);
        let run_seed: u64 = master.gen();
        let mut rng = Pcg64::seed_from_u64(run_seed);
        let seeds = rule.resolve(&graph, &mut rng);
        let mut model = GillespieSir::from_rng(&graph, 1.0, 1.0, 0.0, f64::INFINITY, rng);
        let single = subsample(&report_times, &model.propagate_until_completion(&seeds)).unwrap();

        let expected: Vec<f64> = single.rec.iter().map(|&v| v as f64).collect();
        assert_eq!(averaged.rec, expected);
        assert_eq!(averaged.iterations, 1);
    }

    #[test]
    fn parallel_and_serial_dispatch_agree(){
        let graph = ring(20);
        let report_times = report_grid(15.0, 40);
        let rule = SeedRule::UniformRandom(2);

        let serial = average_time_evolution(
            &graph, 0.9, 0.7, &rule, 8, &report_times, 99, false
        ).unwrap();
        let parallel = average_time_evolution(
            &graph, 0.9, 0.7, &rule, 8, &report_times, 99, true
        ).unwrap();

        assert_eq!(serial.inf, parallel.inf);
        assert_eq!(serial.rec, parallel.rec);
    }

    #[test]
    fn averages_are_bounded_by_node_count(){
        let graph = star(10);
        let report_times = report_grid(30.0, 25);
        let rule = SeedRule::Explicit(vec![0_u32]);

        let averaged = average_time_evolution(
            &graph, 2.0, 0.5, &rule, 12, &report_times, 3, false
        ).unwrap();
        for i in 0..report_times.len(){
            let total = averaged.sus[i] + averaged.inf[i] + averaged.rec[i];
            assert!((total - 11.0).abs() < 1e-9);
        }
        assert!(averaged.rec.last().unwrap() >= &1.0);
    }

    #[test]
    fn oversized_random_seed_set_is_rejected(){
        let graph = ring(5);
        let err = average_time_evolution(
            &graph, 1.0, 1.0, &SeedRule::UniformRandom(6), 1, &[0.0, 1.0], 0, false
        ).unwrap_err();
        assert_eq!(err, ExperimentError::SeedCount{ requested: 6, nodes: 5 });
    }

    #[test]
    fn zero_iterations_are_rejected(){
        let graph = ring(5);
        let err = average_time_evolution(
            &graph, 1.0, 1.0, &SeedRule::UniformRandom(1), 0, &[0.0, 1.0], 0, false
        ).unwrap_err();
        assert_eq!(err, ExperimentError::NoRuns);
    }

    #[test]
    fn strength_scan_maps_strength_to_rate(){
        // ring eigenvalue is 2, so beta = s * gamma / 2
        let graph = ring(16);
        let report_times = report_grid(10.0, 20);
        let strengths = [0.5, 1.0, 4.0];
        let points = scan_strength(
            &graph,
            &strengths,
            0.5,
            &SeedRule::UniformRandom(1),
            5,
            &report_times,
            17,
            None,
            None
        ).unwrap();

        assert_eq!(points.len(), 3);
        for (point, &strength) in points.iter().zip(strengths.iter()){
            assert_eq!(point.strength, strength);
            assert!((point.transmission_rate - strength * 0.5 / 2.0).abs() < 1e-9);
            // the seed itself always ends up recovered
            assert!(point.final_recovered.mean() >= 1.0);
        }
    }

    #[test]
    fn edgeless_graph_cannot_anchor_a_strength_scan(){
        let mut graph = ContactGraph::new();
        for i in 0..4_u32{
            graph.add_node(i);
        }
        let err = scan_strength(
            &graph, &[1.0], 1.0, &SeedRule::UniformRandom(1), 1, &[0.0, 1.0], 0, None, None
        ).unwrap_err();
        assert_eq!(err, ExperimentError::ZeroEigenvalue);
    }

    #[test]
    fn effective_strength_rounds_to_requested_digits(){
        assert_eq!(effective_strength(3.0, 0.1, 1.0, 3), 0.3);
        assert_eq!(effective_strength(2.7, 0.123, 1.0, 2), 0.33);
    }
}
