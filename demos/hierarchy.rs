extern crate env_logger;
extern crate lamina;

use std::env;
use std::rc::Rc;

use lamina::{AutoencoderConfig, AutoencoderNode, InputLayer, OutputFolder, Region};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SIDE: usize = 8;

fn main() {
    env_logger::init();

    let rounds = env::args().nth(1).and_then(|arg| arg.parse().ok()).unwrap_or(5usize);
    let output = env::args().nth(2).map(OutputFolder::new);
    println!("Training a two-level hierarchy on {}x{} images for {} rounds", SIDE, SIDE, rounds);

    let input = InputLayer::new("image", SIDE * SIDE);
    let quadrants: Vec<Rc<AutoencoderNode>> = (0..4).map(|i| quadrant_node(i as u64)).collect();
    let top = Rc::new(AutoencoderNode::from_config(&AutoencoderConfig {
                          name: "top".to_owned(),
                          noise: "gaussian".parse().unwrap(),
                          seed: Some(100),
                          ..AutoencoderConfig::new(vec![12, 6], vec![20, 20])
                      })
                      .unwrap());

    let quadrant_width = SIDE * SIDE / 4;
    for (i, node) in quadrants.iter().enumerate() {
        // rows of the image are flattened, a quadrant here is a band of rows
        node.register_for(&input, Some(Region::new(i * quadrant_width, (i + 1) * quadrant_width))).unwrap();
        top.register_for(&**node, None).unwrap();
    }

    let mut rng = StdRng::seed_from_u64(7);
    for round in 0..rounds {
        input.feed(&stripes(&mut rng, 32)).unwrap();
        println!("round {}: top trained {} times", round, top.iteration());
    }

    if let Some(encoding) = top.last_output() {
        println!("top encoding shape {:?}, first row {:?}", encoding.shape(), encoding.row(0));
    }
    if let Some(output) = output {
        for node in quadrants.iter().chain(Some(&top)) {
            match node.save(&output) {
                Ok(path) => println!("saved {} to {}", node.name(), path.display()),
                Err(err) => println!("could not save {}: {}", node.name(), err),
            }
        }
    }
}

fn quadrant_node(i: u64) -> Rc<AutoencoderNode> {
    let config = AutoencoderConfig {
        name: format!("quadrant{}", i),
        noise: "mask-0.2".parse().unwrap(),
        seed: Some(i),
        ..AutoencoderConfig::new(vec![8, 4], vec![20, 20])
    };
    Rc::new(AutoencoderNode::from_config(&config).unwrap())
}

/// Binary images with a random horizontal or vertical stripe.
fn stripes<R: Rng>(rng: &mut R, count: usize) -> Array2<f32> {
    let mut images = Array2::zeros((count, SIDE * SIDE));
    for mut image in images.outer_iter_mut() {
        let line = rng.gen_range(0..SIDE);
        let vertical = rng.gen::<bool>();
        for k in 0..SIDE {
            let (row, column) = if vertical { (k, line) } else { (line, k) };
            image[row * SIDE + column] = 1f32;
        }
    }
    images
}
