use mlp_surrogate::{Activation, Network, NetworkBuilder, Regularization};

/// A small fitted surrogate `y(u, v)`, configured by hand the way a loader would.
fn build_surrogate() -> mlp_surrogate::Result<Network> {
    let mut net = NetworkBuilder::new()
        .input_layer(2)?
        .hidden_layer(4)?
        .hidden_layer(3)?
        .output_layer(1)?
        .build()?;

    net.set_input_name(0, "u")?;
    net.set_input_name(1, "v")?;
    net.set_output_name(0, "y")?;
    net.set_input_norm(0, (0.0, 2.0))?;
    net.set_input_norm(1, (-1.0, 1.0))?;
    net.set_output_regularization(Regularization::Standard);
    net.set_output_norm(0, (0.5, 1.5))?;

    let w0 = [[0.8, -0.4], [0.3, 1.1], [-1.2, 0.5], [0.6, 0.6]];
    let w1 = [[0.5, -0.7, 0.2, 0.9], [-0.3, 0.4, 1.0, -0.6], [0.7, 0.1, -0.5, 0.3]];
    let w2 = [[1.2, -0.8, 0.5]];
    for (to, row) in w0.iter().enumerate() {
        for (from, &w) in row.iter().enumerate() {
            net.set_weight(0, from, to, w)?;
        }
    }
    for (to, row) in w1.iter().enumerate() {
        for (from, &w) in row.iter().enumerate() {
            net.set_weight(1, from, to, w)?;
        }
    }
    for (to, row) in w2.iter().enumerate() {
        for (from, &w) in row.iter().enumerate() {
            net.set_weight(2, from, to, w)?;
        }
    }
    for (neuron, &b) in [0.1, -0.2, 0.05, 0.0].iter().enumerate() {
        net.set_bias(1, neuron, b)?;
    }

    net.set_activation(1, "tanh")?;
    net.set_activation(2, "swish")?;
    net.set_activation_function(3, Activation::Linear)?;
    Ok(net)
}

fn main() -> mlp_surrogate::Result<()> {
    let mut net = build_surrogate()?;
    println!("{net}");

    // The caller orders its variables differently from the network.
    let inputs = ["v", "u"];
    let outputs = ["y"];
    let Some(pairing) = net.match_variables(&inputs, &outputs) else {
        println!("network cannot serve inputs {inputs:?} -> outputs {outputs:?}");
        return Ok(());
    };

    net.set_first_order_gradient(true);
    net.set_second_order_gradient(true);

    let delta = 1e-5;
    let mut caller_x = [0.0; 2];
    let mut x = [0.0; 2];
    println!("u\tv\ty\tdy/du\tdy/du (fd)\td2y/du2\td2y/du2 (fd)");
    for i in 0..5 {
        for j in 0..5 {
            caller_x[0] = -1.0 + 0.5 * j as f64; // v
            caller_x[1] = 0.5 * i as f64; // u
            for &(candidate, input) in &pairing.inputs {
                x[input] = caller_x[candidate];
            }

            let (_, y_index) = pairing.outputs[0];
            let y = net.evaluate(&x)?[y_index];
            let dy_du = net.d_output_d_input(y_index, 0)?;
            let d2y_du2 = net.d2_output_d_input2(y_index, 0, 0)?;

            let mut xp = x;
            xp[0] += delta;
            let yp = net.evaluate(&xp)?[y_index];
            let mut xm = x;
            xm[0] -= delta;
            let ym = net.evaluate(&xm)?[y_index];
            let dy_du_fd = (yp - ym) / (2.0 * delta);
            let d2y_du2_fd = (yp - 2.0 * y + ym) / (delta * delta);

            let flag = if (0..2).all(|k| net.check_input_inclusion(x[k], k).unwrap_or(false)) {
                ""
            } else {
                " (extrapolated)"
            };
            println!(
                "{:.3}\t{:.3}\t{y:.6e}\t{dy_du:.6e}\t{dy_du_fd:.6e}\t{d2y_du2:.6e}\t{d2y_du2_fd:.6e}{flag}",
                x[0], x[1]
            );
        }
    }
    Ok(())
}
