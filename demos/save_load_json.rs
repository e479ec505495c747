#[cfg(not(feature = "serde"))]
fn main() {
    println!("enable the `serde` feature: cargo run --example save_load_json --features serde");
}

#[cfg(feature = "serde")]
fn main() -> mlp_surrogate::Result<()> {
    use mlp_surrogate::Network;

    let definition = r#"{
        "format_version": 1,
        "input_regularization": "minmax",
        "output_regularization": "robust",
        "inputs": [
            { "name": "T", "norm": [250.0, 450.0] },
            { "name": "p", "norm": [1.0e5, 5.0e5] }
        ],
        "outputs": [
            { "name": "rho", "norm": [2.1, 0.9] },
            { "name": "mu", "norm": [1.8e-5, 4.0e-6] }
        ],
        "hidden_layers": [3],
        "activations": ["elu", "linear"],
        "biases": [[0.1, 0.0, -0.1], [0.0, 0.2]],
        "weights": [
            [-0.9, 1.3, 0.4, 0.2, 0.7, -0.5],
            [0.8, 0.3, -0.2, 0.5, -0.4, 0.9]
        ]
    }"#;

    let mut net = Network::from_json_str(definition)?;

    let path = "target/tmp_surrogate.json";
    net.save_json(path)?;
    let mut loaded = Network::load_json(path)?;

    let x = [300.0, 2.0e5];
    let a = net.evaluate(&x)?.to_vec();
    let b = loaded.evaluate(&x)?.to_vec();
    assert_eq!(a, b);

    println!("saved and loaded network: {path}");
    for (name, y) in loaded.output_names().iter().zip(&b) {
        println!("{name} = {y:.6e}");
    }
    Ok(())
}
