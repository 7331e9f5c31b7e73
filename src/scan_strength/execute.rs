use std::io::Write;

use{
    super::*,
    crate::{
        experiment::*,
        json_parsing::*,
        misc_types::*,
    },
    serde_json::Value,
    std::{num::*, fs::File, io::BufWriter},
};

pub fn run_simulation(param: ScanStrengthParams, json: Value, num_threads: Option<NonZeroUsize>){
    let k = num_threads.unwrap_or_else(|| NonZeroUsize::new(1).unwrap());
    rayon::ThreadPoolBuilder::new().num_threads(k.get()).build_global().unwrap();

    let graph = param.graph_type.build(param.graph_seed);
    println!("Graph: {} nodes, {} edges", graph.node_count(), graph.edge_count());

    let strengths = param.strength_range.get_range();
    let time_range = F64RangeBuilder{
        start: 0.0,
        end: param.end_time,
        steps: param.report_steps
    };
    let report_times = time_range.get_range();

    let system_size_fraction = if param.fraction{
        Some(graph.node_count() as f64)
    } else {
        None
    };

    let mut columns = Vec::with_capacity(param.initial_sizes.len());
    for (j, &initial_size) in param.initial_sizes.iter().enumerate(){
        println!("Scanning with {} initial infecteds", initial_size);
        let seed_rule = param.seed_choice
            .build_rule(&graph, initial_size)
            .expect("centrality ranking did not converge");

        let bar = crate::indication_bar(strengths.len() as u64);
        let points = scan_strength(
            &graph,
            &strengths,
            param.recovery_rate,
            &seed_rule,
            param.iterations,
            &report_times,
            param.sir_seed.wrapping_add(j as u64),
            system_size_fraction,
            Some(bar)
        ).expect("strength scan failed");
        columns.push((initial_size, points));
    }

    let samples = Samples{
        strengths,
        columns
    };
    let name = param.name("dat", num_threads);
    println!("Creating: {}", &name);
    let file = File::create(name)
        .expect("unable to create file");
    let mut buf = BufWriter::new(file);
    write_json(&mut buf, &json);
    samples.write(buf).unwrap()
}

pub struct Samples{
    strengths: Vec<f64>,
    columns: Vec<(usize, Vec<StrengthScanPoint>)>
}

impl Samples{
    fn write<W>(&self, mut writer: W) -> std::io::Result<()>
    where W: Write
    {
        write!(writer, "#strength beta")?;
        for (initial_size, _) in self.columns.iter(){
            write!(writer, " meanI{} varI{}", initial_size, initial_size)?;
        }
        writeln!(writer)?;

        for (i, strength) in self.strengths.iter().enumerate(){
            let beta = self.columns
                .first()
                .map(|(_, points)| points[i].transmission_rate)
                .unwrap_or(f64::NAN);
            write!(writer, "{:e} {:e}", strength, beta)?;
            for (_, points) in self.columns.iter(){
                let var = &points[i].final_recovered;
                write!(writer, " {:e} {:e}", var.mean(), var.variance_of_mean())?;
            }
            writeln!(writer)?
        }
        Ok(())
    }
}
