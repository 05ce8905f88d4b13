use ferrite_mlp::{train_loop, Network, Sample, TrainConfig};

fn main() -> ferrite_mlp::Result<()> {
    let mut network = Network::new(vec![2, 3, 1])?;

    let samples = vec![
        Sample::new(vec![1.0, 0.0], vec![1.0]),
        Sample::new(vec![1.0, 1.0], vec![0.0]),
        Sample::new(vec![0.0, 1.0], vec![1.0]),
        Sample::new(vec![0.0, 0.0], vec![0.0]),
    ];

    let config = TrainConfig::new(10_000, 0.5);
    let history = train_loop(&mut network, &samples, &config)?;

    for stats in history.iter().step_by(1000) {
        println!("Epoch {}: cost = {:.6}", stats.epoch, stats.train_loss);
    }

    for sample in &samples {
        let output = network.predict(&sample.input)?;
        println!("Input: {:?} -> Output: {:.4}", sample.input, output[0]);
    }
    Ok(())
}
