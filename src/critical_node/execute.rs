use{
    super::*,
    crate::spectral::most_critical_node,
};

pub fn run_diagnostic(param: CriticalNodeParams){
    let graph = param.graph_type.build(param.graph_seed);
    println!("Graph: {} nodes, {} edges", graph.node_count(), graph.edge_count());

    let report = match most_critical_node(&graph){
        Some(report) => report,
        None => {
            println!("Graph has no nodes, nothing to remove");
            return;
        }
    };

    if !report.baseline_converged{
        eprintln!("Baseline eigenvalue did not converge, reported as 0");
    }
    for node in report.failed.iter(){
        eprintln!("Eigenvalue after removing {:?} did not converge, candidate skipped", node);
    }

    println!("Most critical node: {:?}", report.removed);
    println!("Largest eigenvalue before removal: {:.6}", report.eigenvalue_before);
    println!("Largest eigenvalue after removal:  {:.6}", report.eigenvalue_after);
    println!(
        "Eigenvalue drop: {:.6}",
        report.eigenvalue_before - report.eigenvalue_after
    );
}
