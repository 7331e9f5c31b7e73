use indicatif::*;

pub mod event_set;
pub mod graph;
pub mod spectral;
pub mod centrality;
pub mod sir_model;
pub mod subsample;
pub mod experiment;
pub mod stats_methods;
pub mod misc_types;
pub mod json_parsing;
pub mod time_evolution;
pub mod scan_strength;
pub mod critical_node;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn indication_bar(len: u64) -> ProgressBar
{
        // for indication on when it is finished
        let bar = ProgressBar::new(len);
        bar.set_style(ProgressStyle::default_bar()
            .template("{msg} [{elapsed_precise} - {eta_precise}] {wide_bar}"));
        bar
}
