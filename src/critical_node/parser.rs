use{
    super::*,
    structopt::StructOpt,
    crate::json_parsing::*,
    serde::{Serialize, Deserialize},
    serde_json::Value,

    crate::misc_types::*
};

#[derive(Debug, StructOpt, Clone)]
/// Find the node whose removal lowers the largest eigenvalue the most.
pub struct CriticalNode{
    /// Json file with the graph parameters. Pass nothing to print
    /// a default file to stdout instead.
    #[structopt(long)]
    json: Option<String>,
}

impl CriticalNode{
    pub fn parse(&self) -> (CriticalNodeParams, Value){
        parse(self.json.as_ref())
    }
    pub fn execute(&self){
        let (opt, _json) = self.parse();
        run_diagnostic(opt)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CriticalNodeParams{
    pub graph_type: GraphType,
    pub graph_seed: u64,
}

impl Default for CriticalNodeParams{
    fn default() -> Self{
        Self{
            graph_type: GraphType::Barabasi(DEFAULT_SYSTEM_SIZE.get(), 2),
            graph_seed: DEFAULT_GRAPH_SEED,
        }
    }
}
