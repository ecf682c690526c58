extern crate lamina;

#[cfg(test)]
mod autoencoder_spec {
    use lamina::layers::{Activation, LossFn, LossKind, NoiseSpec};
    use lamina::solver::SolverConfig;
    use lamina::{AutoencoderConfig, Error, Phase, StackedAutoencoder};
    use ndarray::Array2;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn batch(rows: usize, columns: usize) -> Array2<f32> {
        let mut rng = StdRng::seed_from_u64(99);
        Array2::from_shape_fn((rows, columns), |_| if rng.gen::<f32>() < 0.5 { 0f32 } else { 1f32 })
    }

    fn config() -> AutoencoderConfig {
        AutoencoderConfig {
            seed: Some(3),
            ..AutoencoderConfig::new(vec![8, 4], vec![5, 5])
        }
    }

    #[test]
    fn rejects_unsupported_loss() {
        init_logger();
        match AutoencoderConfig::from_json(r#"{"dims": [8, 4], "epochs": [5, 5], "loss": "mse"}"#) {
            Err(Error::Json(_)) => {}
            other => panic!("expected a parse error, got {:?}", other),
        }
        match "mse".parse::<LossKind>() {
            Err(Error::UnsupportedLoss(name)) => assert_eq!("mse", name),
            other => panic!("expected an unsupported loss, got {:?}", other),
        }

        let config = AutoencoderConfig::from_json(r#"{"dims": [8, 4], "epochs": [5, 5], "loss": "rmse"}"#).unwrap();
        assert!(StackedAutoencoder::from_config(&config).is_ok());
    }

    #[test]
    fn rejects_invalid_hyperparameters() {
        init_logger();
        let bad = vec![
            AutoencoderConfig::new(vec![], vec![]),
            AutoencoderConfig::new(vec![8, 4], vec![5]),
            AutoencoderConfig::new(vec![8, 4], vec![5, 0]),
            AutoencoderConfig { noise: NoiseSpec::Mask(1.5), ..config() },
            AutoencoderConfig { learning_rate: -1f32, ..config() },
            AutoencoderConfig { encoding_activations: Some(vec![Activation::Relu; 3]), ..config() },
            AutoencoderConfig { solver: SolverConfig { epsilon: 0f32, ..SolverConfig::default() }, ..config() },
        ];
        for config in bad {
            assert!(StackedAutoencoder::from_config(&config).is_err(), "{:?} should not validate", config);
        }
    }

    #[test]
    fn noise_validator() {
        assert!(NoiseSpec::validate("mask-0.5"));
        assert!(!NoiseSpec::validate("mask-1.5"));
        assert!(!NoiseSpec::validate("banana"));
    }

    #[test]
    fn fit_trains_every_layer_for_its_epochs() {
        init_logger();
        let mut model = StackedAutoencoder::from_config(&config()).unwrap();
        assert!(model.layers().is_empty());
        assert_eq!(Phase::Building, model.phase());

        let input = batch(20, 12);
        model.fit(&input).unwrap();
        assert_eq!(Phase::Running, model.phase());
        assert_eq!(1, model.iteration());

        let layers = model.layers();
        assert_eq!(2, layers.len());
        assert_eq!(5, layers[0].steps());
        assert_eq!(5, layers[1].steps());
        assert_eq!((12, 8), (layers[0].input_dim(), layers[0].hidden_dim()));
        assert_eq!((8, 4), (layers[1].input_dim(), layers[1].hidden_dim()));

        let output = model.transform(&input).unwrap();
        assert_eq!(&[20, 4], output.shape());
        assert_eq!(Some(&output), model.last_output());
    }

    #[test]
    fn second_fit_keeps_the_layers() {
        init_logger();
        let mut model = StackedAutoencoder::from_config(&config()).unwrap();
        let input = batch(10, 6);
        model.fit(&input).unwrap();
        model.fit(&input).unwrap();
        assert_eq!(2, model.iteration());
        assert_eq!(10, model.layers()[0].steps());
        assert_eq!(6, model.layers()[0].input_dim());
    }

    #[test]
    fn upper_layer_trains_on_clean_encoding_of_lower_layer() {
        init_logger();
        let config = AutoencoderConfig { metadata: true, ..config() };
        let mut model = StackedAutoencoder::from_config(&config).unwrap();
        let input = batch(6, 10);
        model.fit(&input).unwrap();
        let records = model.step_records();
        assert_eq!(10, records.len());
        assert!(records[..5].iter().all(|record| record.layer == 0));
        assert!(records[5..].iter().all(|record| record.layer == 1 && record.iteration == 1));

        let lower = model.layers()[0].encode(&input).unwrap();
        let top = model.layers()[1].encode(&lower).unwrap();
        assert_eq!(model.transform(&input).unwrap(), top);
    }

    #[test]
    fn denoising_reconstructs_clean_input_from_corrupted_copy() {
        init_logger();
        let config = AutoencoderConfig { noise: NoiseSpec::Mask(1.0), metadata: true, ..config() };
        let input = batch(6, 10);
        let zeros = Array2::<f32>::zeros((6, 10));

        // same seed, same untrained layers
        let mut untrained = StackedAutoencoder::from_config(&config).unwrap();
        untrained.transform(&input).unwrap();
        let mut model = StackedAutoencoder::from_config(&config).unwrap();
        model.fit(&input).unwrap();
        let records = model.step_records();

        let first = untrained.layers()[0].forward(&zeros).unwrap().decoded;
        let expected = LossKind::Rmse.compute_loss(&input, &first);
        assert!((expected - records[0].loss).abs() < 1e-6);

        let clean_encoding = model.layers()[0].encode(&input).unwrap();
        let upper = untrained.layers()[1].forward(&Array2::zeros((6, 8))).unwrap().decoded;
        let expected_upper = LossKind::Rmse.compute_loss(&clean_encoding, &upper);
        assert_eq!(1, records[5].layer);
        assert!((expected_upper - records[5].loss).abs() < 1e-6);
    }

    #[test]
    fn training_reduces_reconstruction_loss() {
        init_logger();
        let config = AutoencoderConfig {
            dims: vec![4],
            epochs: vec![300],
            learning_rate: 0.05,
            metadata: true,
            ..config()
        };
        let mut model = StackedAutoencoder::from_config(&config).unwrap();
        model.fit(&batch(16, 8)).unwrap();
        let records = model.step_records();
        assert!(records[records.len() - 1].loss < 0.9 * records[0].loss);
    }

    #[test]
    fn weights_stay_tied() {
        init_logger();
        let config = AutoencoderConfig { noise: NoiseSpec::Gaussian, ..config() };
        let mut model = StackedAutoencoder::from_config(&config).unwrap();
        model.fit(&batch(8, 10)).unwrap();
        for layer in model.layers() {
            assert_eq!(layer.encode_weights().t(), layer.decode_weights());
        }
    }

    #[test]
    fn transform_before_fit_uses_untrained_layers() {
        init_logger();
        let mut model = StackedAutoencoder::from_config(&config()).unwrap();
        let output = model.transform(&batch(3, 5)).unwrap();
        assert_eq!(&[3, 4], output.shape());
        assert_eq!(0, model.iteration());
        assert_eq!(Phase::Building, model.phase());
        assert!(model.layers().iter().all(|layer| layer.steps() == 0));
    }

    #[test]
    fn mismatching_batch_fails_before_training() {
        init_logger();
        let mut model = StackedAutoencoder::from_config(&config()).unwrap();
        model.fit(&batch(4, 6)).unwrap();
        match model.fit(&batch(4, 7)) {
            Err(Error::ShapeMismatch { expected: 6, actual: 7 }) => {}
            other => panic!("expected a shape mismatch, got {:?}", other),
        }
        assert_eq!(1, model.iteration());
        assert_eq!(5, model.layers()[0].steps());
    }

    #[test]
    fn every_activation_and_loss_trains() {
        init_logger();
        for activation in Activation::ALL.iter() {
            for loss in &[LossKind::Rmse, LossKind::CrossEntropy] {
                let config = AutoencoderConfig {
                    activations: vec![*activation],
                    loss: *loss,
                    noise: NoiseSpec::Mask(0.2),
                    ..config()
                };
                let mut model = StackedAutoencoder::from_config(&config).unwrap();
                let output = model.fit_transform(&batch(5, 10)).unwrap();
                assert_eq!(&[5, 4], output.shape());
                assert!(output.iter().all(|x| x.is_finite()), "{} with {} diverged", activation, loss);
            }
        }
    }
}
