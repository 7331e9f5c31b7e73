use{
    std::time::Instant,
    structopt::StructOpt,
    sir_spectral::{
        time_evolution,
        scan_strength,
        critical_node,
    },
};

fn main() {
    let start_time = Instant::now();
    let opt = CmdOption::from_args();
    match opt{
        CmdOption::TimeEvolution(o) => o.execute(),
        CmdOption::ScanStrength(o) => o.execute(),
        CmdOption::CriticalNode(o) => o.execute(),
    }
    println!("Execution took {}", humantime::format_duration(start_time.elapsed()))
}

#[derive(Debug, StructOpt, Clone)]
#[structopt(about = "Stochastic SIR simulations on contact networks!")]
pub enum CmdOption
{
    TimeEvolution(time_evolution::TimeEvolution),
    ScanStrength(scan_strength::ScanStrength),
    CriticalNode(critical_node::CriticalNode),
}
