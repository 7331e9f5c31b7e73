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
/// Outbreak size as a function of the effective virus strength.
pub struct ScanStrength{
    /// Json file with the scan parameters. Pass nothing to print
    /// a default file to stdout instead.
    #[structopt(long)]
    json: Option<String>,

    #[structopt(long)]
    num_threads: Option<NonZeroUsize>
}

impl ScanStrength{
    pub fn parse(&self) -> (ScanStrengthParams, Value){
        parse(self.json.as_ref())
    }
    pub fn execute(&self){
        let (opt, json) = self.parse();
        run_simulation(opt, json, self.num_threads)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ScanStrengthParams{
    pub graph_type: GraphType,
    pub graph_seed: u64,
    pub strength_range: LogRangeBuilder,
    pub recovery_rate: f64,
    /// One response curve per entry, sharing the strength axis.
    pub initial_sizes: Vec<usize>,
    pub seed_choice: SeedChoice,
    pub end_time: f64,
    pub report_steps: NonZeroUsize,
    pub iterations: usize,
    pub sir_seed: u64,
    pub fraction: bool,
}

impl Default for ScanStrengthParams{
    fn default() -> Self{
        let strength_range_def = LogRangeBuilder{
            start: 0.1,
            end: 10.0,
            steps: NonZeroUsize::new(20).unwrap()
        };
        Self{
            graph_type: GraphType::Barabasi(DEFAULT_SYSTEM_SIZE.get(), 2),
            graph_seed: DEFAULT_GRAPH_SEED,
            strength_range: strength_range_def,
            recovery_rate: DEFAULT_RECOVERY_RATE,
            initial_sizes: vec![1, 5],
            seed_choice: SeedChoice::Random,
            end_time: 50.0,
            report_steps: DEFAULT_REPORT_STEPS,
            iterations: DEFAULT_ITERATIONS,
            sir_seed: DEFAULT_SIR_SEED,
            fraction: true,
        }
    }
}

impl ScanStrengthParams{
    pub fn name<E>(&self, file_ending: E, num_threads: Option<NonZeroUsize>) -> String
    where E: Display{
        let k = match num_threads{
            None => "".to_owned(),
            Some(v) => format!("k{}", v)
        };
        format!(
            "ver{}StrScan_{}_r{}s{}-{}_{}Its{}_Seed{}_GSeed{}_SS{}{}.{}",
            crate::VERSION,
            self.graph_type.name(),
            self.recovery_rate,
            self.strength_range.start,
            self.strength_range.end,
            self.strength_range.steps,
            self.iterations,
            self.seed_choice.name(),
            self.graph_seed,
            self.sir_seed,
            k,
            file_ending
        )
    }
}
