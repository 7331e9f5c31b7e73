use std::fmt::Display;

use{
    super::*,
    structopt::StructOpt,
    std::num::*,
    crate::json_parsing::*,
    serde::{Serialize, Deserialize},
    serde_json::Value,

    crate::misc_types::*
};

#[derive(Debug, StructOpt, Clone)]
/// Average S, I and R curves of repeated outbreaks on one network.
pub struct TimeEvolution{
    /// Json file with the simulation parameters. Pass nothing
    /// to print a default file to stdout instead.
    #[structopt(long)]
    json: Option<String>,

    #[structopt(long)]
    num_threads: Option<NonZeroUsize>
}

impl TimeEvolution{
    pub fn parse(&self) -> (TimeEvolutionParams, Value){
        parse(self.json.as_ref())
    }
    pub fn execute(&self){
        let (opt, json) = self.parse();
        run_simulation(opt, json, self.num_threads)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TimeEvolutionParams{
    pub graph_type: GraphType,
    pub graph_seed: u64,
    pub transmission_rate: f64,
    pub recovery_rate: f64,
    pub initial_size: usize,
    pub seed_choice: SeedChoice,
    pub time_range: F64RangeBuilder,
    pub iterations: usize,
    pub sir_seed: u64,
    pub fraction: bool,
}

impl Default for TimeEvolutionParams{
    fn default() -> Self{
        let time_range_def = F64RangeBuilder{
            start: 0.0,
            end: 20.0,
            steps: DEFAULT_REPORT_STEPS
        };
        Self{
            graph_type: GraphType::Barabasi(DEFAULT_SYSTEM_SIZE.get(), 2),
            graph_seed: DEFAULT_GRAPH_SEED,
            transmission_rate: 0.2,
            recovery_rate: DEFAULT_RECOVERY_RATE,
            initial_size: 5,
            seed_choice: SeedChoice::Random,
            time_range: time_range_def,
            iterations: DEFAULT_ITERATIONS,
            sir_seed: DEFAULT_SIR_SEED,
            fraction: true,
        }
    }
}

impl TimeEvolutionParams{
    pub fn name<E>(&self, file_ending: E, num_threads: Option<NonZeroUsize>) -> String
    where E: Display{
        let k = match num_threads{
            None => "".to_owned(),
            Some(v) => format!("k{}", v)
        };
        format!(
            "ver{}TimeEvo_{}_b{}r{}t{}-{}_{}Its{}_Seed{}_GSeed{}_SS{}{}.{}",
            crate::VERSION,
            self.graph_type.name(),
            self.transmission_rate,
            self.recovery_rate,
            self.time_range.start,
            self.time_range.end,
            self.time_range.steps,
            self.iterations,
            self.seed_choice.name(),
            self.graph_seed,
            self.sir_seed,
            k,
            file_ending
        )
    }
}
