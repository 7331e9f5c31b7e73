use std::io::Write;

use{
    super::*,
    crate::{
        experiment::*,
        json_parsing::*,
        misc_types::*,
        spectral::largest_eigenvalue,
    },
    serde_json::Value,
    std::{num::*, fs::File, io::BufWriter},
};

pub fn run_simulation(param: TimeEvolutionParams, json: Value, num_threads: Option<NonZeroUsize>){
    let k = num_threads.unwrap_or_else(|| NonZeroUsize::new(1).unwrap());
    rayon::ThreadPoolBuilder::new().num_threads(k.get()).build_global().unwrap();

    let graph = param.graph_type.build(param.graph_seed);
    println!("Graph: {} nodes, {} edges", graph.node_count(), graph.edge_count());

    // The eigenvalue is only informative here, so a failed iteration
    // degrades to a sentinel instead of aborting the runs.
    match largest_eigenvalue(&graph){
        Ok(eigenvalue) => {
            let s = effective_strength(
                eigenvalue,
                param.transmission_rate,
                param.recovery_rate,
                DEFAULT_STRENGTH_DIGITS
            );
            println!("Largest eigenvalue: {:.6}, effective strength s = {}", eigenvalue, s);
        },
        Err(e) => {
            eprintln!("Spectral analysis failed ({}), reporting no strength", e);
        }
    }

    let seed_rule = match param.seed_choice.build_rule(&graph, param.initial_size){
        Ok(rule) => rule,
        Err(e) => {
            // Centrality seeding needs a converged ranking. Fall back
            // to uniform seeds rather than dropping the whole run.
            eprintln!("Centrality ranking failed ({}), falling back to random seeds", e);
            SeedRule::UniformRandom(param.initial_size)
        }
    };

    let report_times = param.time_range.get_range();
    let curves = average_time_evolution(
        &graph,
        param.transmission_rate,
        param.recovery_rate,
        &seed_rule,
        param.iterations,
        &report_times,
        param.sir_seed,
        true
    ).expect("simulation failed");

    let normalisation = if param.fraction{
        graph.node_count() as f64
    } else {
        1.0
    };

    let name = param.name("dat", num_threads);
    println!("Creating: {}", &name);
    let file = File::create(name)
        .expect("unable to create file");
    let mut buf = BufWriter::new(file);
    write_json(&mut buf, &json);
    write_curves(&mut buf, &curves, normalisation).unwrap();
}

fn write_curves<W>(mut writer: W, curves: &AveragedCurves, normalisation: f64) -> std::io::Result<()>
where W: Write
{
    writeln!(writer, "#t S I R")?;
    for i in 0..curves.times.len(){
        writeln!(
            writer,
            "{:e} {:e} {:e} {:e}",
            curves.times[i],
            curves.sus[i] / normalisation,
            curves.inf[i] / normalisation,
            curves.rec[i] / normalisation
        )?
    }
    Ok(())
}
