use rbfnet::{
    create_evaluation_grid, generate_random_points, point_values_to_csv,
    network_config::NetworkSettings,
    progress::LogSink,
    KernelType, RBFNetwork, RBFTestFunctions, SampleTable, SolverParams,
};
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Define input sample points within [0, 1]^2
    let points = generate_random_points(200, 2, Some(42));

    // Define some values at the sample points using Franke's function
    let values: Vec<f64> = RBFTestFunctions::franke_2d(&points).iter().copied().collect();
    let samples = SampleTable::from_points(points.as_ref(), &values)?;

    // Select a normalized Gaussian network
    let settings = NetworkSettings::builder(KernelType::Gaussian)
        .shape(8.0)
        .normalized(true)
        .build();

    // Train the network, forwarding diagnostics to the logger
    let net = RBFNetwork::builder(samples, settings)
        .params(SolverParams::builder().report_residual(true).build())
        .progress_callback(Arc::new(LogSink))
        .build()?;

    // Build a 2D grid of target points in [0, 1]^2 to evaluate the network at
    let n = 50;
    let target_points = create_evaluation_grid(&[(0.0, 1.0), (0.0, 1.0)], &[n, n]);
    let predicted = net.evaluate_many(target_points.as_ref())?;

    // Compare against the true function
    let truth = RBFTestFunctions::franke_2d(&target_points);
    let max_err = predicted
        .iter()
        .zip(truth.iter())
        .fold(0.0f64, |acc, (p, t)| acc.max((p - t).abs()));
    log::info!("{}: max grid error {max_err:.3e}", net.description());

    let out = std::env::temp_dir().join("franke_2d_network.csv");
    point_values_to_csv(target_points.as_ref(), &predicted, "value", &out)?;
    log::info!("wrote {}", out.display());

    Ok(())
}
