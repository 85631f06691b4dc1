use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use sigmoid_net::{accuracy, predict, train, Dataset, Mat, Optimizer, TrainConfig};

fn main() -> sigmoid_net::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // Two noisy blobs in 2D, one per class.
    let mut rng = StdRng::seed_from_u64(0);
    let centers = [[-1.0_f64, -1.0], [1.0, 1.0]];
    let per_class = 100;

    let m = 2 * per_class;
    let mut x = Mat::zeros(2, m);
    let mut y = Mat::zeros(1, m);
    for (class, center) in centers.iter().enumerate() {
        for k in 0..per_class {
            let col = class * per_class + k;
            x.set(0, col, center[0] + rng.gen_range(-0.6..0.6));
            x.set(1, col, center[1] + rng.gen_range(-0.6..0.6));
            y.set(0, col, class as f64);
        }
    }
    let data = Dataset::new(x, y)?;

    // 2 -> 8 -> 1 network trained with Adam.
    let report = train(
        &data,
        &TrainConfig {
            hidden_layers: vec![8],
            epochs: 150,
            learning_rate: 0.05,
            optimizer: Optimizer::Adam {
                beta1: 0.9,
                beta2: 0.999,
                eps: 1e-8,
            },
            mini_batch_size: 32,
            seed: 0,
            ..TrainConfig::default()
        },
    )?;

    let pred = predict(&report.net, data.features())?;
    let acc = accuracy(&pred, data.labels())?;
    println!(
        "first_epoch_cost={:.4} last_epoch_cost={:.4} train_accuracy={acc:.3}",
        report.epoch_costs[0],
        report.epoch_costs[report.epoch_costs.len() - 1],
    );

    Ok(())
}
