use rbfnet::{
    create_evaluation_grid, Approximant, KernelType, RBFNetwork, RBFTestFunctions, SampleTable,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    // Sample Runge's function on [-1, 1]
    let points = create_evaluation_grid(&[(-1.0, 1.0)], &[21]);
    let values = RBFTestFunctions::runge_1d(&points);

    let mut samples = SampleTable::new();
    for i in 0..points.nrows() {
        samples.add_sample(vec![points[(i, 0)]], values[i])?;
    }

    let net = RBFNetwork::new(&samples, KernelType::Multiquadric)?;

    // Raw binary format
    let dir = std::env::temp_dir();
    let bin_path = dir.join("runge.rbfnet");
    net.save(&bin_path)?;
    let restored = RBFNetwork::from_file(&bin_path)?;

    // Versioned JSON format
    let json_path = dir.join("runge.json");
    net.save_model(&json_path)?;
    let from_json = RBFNetwork::load_model(&json_path, None)?;

    for x in [-0.95, -0.3, 0.0, 0.42] {
        let value = net.evaluate(&[x])?;
        assert_eq!(value, restored.evaluate(&[x])?);
        assert_eq!(value, from_json.evaluate(&[x])?);

        let slope = restored.eval_jacobian(&[x])?[(0, 0)];
        let curvature = restored.eval_hessian(&[x])?[(0, 0)];
        log::info!("f({x}) = {value:.6}, f' = {slope:.6}, f'' = {curvature:.4}");
    }

    Ok(())
}
