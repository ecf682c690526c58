extern crate lamina;

#[cfg(test)]
mod checkpoint_spec {
    use std::rc::Rc;

    use lamina::checkpoint::{Checkpoint, CHECKPOINT_FOLDER};
    use lamina::trace::TIMELINE_FOLDER;
    use lamina::{AutoencoderConfig, AutoencoderNode, InputLayer, OutputFolder, StackedAutoencoder};
    use ndarray::Array2;
    use tempfile::TempDir;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn config() -> AutoencoderConfig {
        AutoencoderConfig {
            seed: Some(21),
            ..AutoencoderConfig::new(vec![5, 3], vec![4, 4])
        }
    }

    fn batch() -> Array2<f32> {
        Array2::from_shape_fn((8, 7), |(row, column)| ((row + 2 * column) % 3) as f32 / 2f32)
    }

    #[test]
    fn save_writes_named_file() {
        init_logger();
        let dir = TempDir::new().unwrap();
        let output = OutputFolder::new(dir.path());
        let mut model = StackedAutoencoder::from_config(&config()).unwrap();
        model.fit(&batch()).unwrap();

        let path = model.save(&output).unwrap();
        let expected = dir.path().join(CHECKPOINT_FOLDER).join(format!("{}_1.json", model.name()));
        assert_eq!(expected, path);
        assert!(path.is_file());

        let checkpoint = Checkpoint::load(&path).unwrap();
        assert_eq!(model.name(), checkpoint.name);
        assert_eq!(1, checkpoint.iteration);
        assert_eq!(2, checkpoint.depth());
        assert_eq!(6, checkpoint.tensors.len());
    }

    #[test]
    fn load_restores_weights_into_fresh_model() {
        init_logger();
        let dir = TempDir::new().unwrap();
        let output = OutputFolder::new(dir.path());
        let mut trained = StackedAutoencoder::from_config(&config()).unwrap();
        let expected = trained.fit_transform(&batch()).unwrap();
        let path = trained.save(&output).unwrap();

        let fresh_config = AutoencoderConfig { seed: Some(99), ..config() };
        let mut fresh = StackedAutoencoder::from_config(&fresh_config).unwrap();
        fresh.load(&path).unwrap();
        assert_eq!(0, fresh.iteration());
        assert_eq!(Some(7), fresh.input_dim());
        for (restored, original) in fresh.layers().iter().zip(trained.layers()) {
            assert_eq!(original.encode_weights(), restored.encode_weights());
            assert_eq!(original.encode_biases(), restored.encode_biases());
            assert_eq!(original.decode_biases(), restored.decode_biases());
        }
        assert_eq!(expected, fresh.transform(&batch()).unwrap());
    }

    #[test]
    fn load_overwrites_trained_layers() {
        init_logger();
        let dir = TempDir::new().unwrap();
        let output = OutputFolder::new(dir.path());
        let mut model = StackedAutoencoder::from_config(&config()).unwrap();
        model.fit(&batch()).unwrap();
        let before = model.transform(&batch()).unwrap();
        let path = model.save(&output).unwrap();

        model.fit(&batch()).unwrap();
        assert_ne!(before, model.transform(&batch()).unwrap());
        model.load(&path).unwrap();
        assert_eq!(before, model.transform(&batch()).unwrap());
        assert_eq!(2, model.iteration());
    }

    #[test]
    fn incompatible_checkpoint_leaves_model_unchanged() {
        init_logger();
        let dir = TempDir::new().unwrap();
        let output = OutputFolder::new(dir.path());
        let mut shallow = StackedAutoencoder::from_config(&AutoencoderConfig {
                              seed: Some(1),
                              ..AutoencoderConfig::new(vec![5], vec![2])
                          })
                          .unwrap();
        shallow.fit(&batch()).unwrap();
        let shallow_path = shallow.save(&output).unwrap();

        let mut wide = StackedAutoencoder::from_config(&AutoencoderConfig {
                           seed: Some(2),
                           ..AutoencoderConfig::new(vec![6, 3], vec![2, 2])
                       })
                       .unwrap();
        wide.fit(&batch()).unwrap();
        let wide_path = wide.save(&output).unwrap();

        let mut model = StackedAutoencoder::from_config(&config()).unwrap();
        model.fit(&batch()).unwrap();
        let before = model.transform(&batch()).unwrap();
        assert!(model.load(&shallow_path).is_err());
        assert!(model.load(&wide_path).is_err());
        assert!(model.load(&dir.path().join("missing.json")).is_err());
        assert_eq!(before, model.transform(&batch()).unwrap());
    }

    #[test]
    fn node_saves_and_loads_its_model() {
        init_logger();
        let dir = TempDir::new().unwrap();
        let output = OutputFolder::new(dir.path());
        let input = InputLayer::new("in", 7);
        let node = Rc::new(AutoencoderNode::from_config(&config()).unwrap());
        node.register_for(&input, None).unwrap();
        input.feed(&batch()).unwrap();
        let path = node.save(&output).unwrap();

        let copy = AutoencoderNode::from_config(&config()).unwrap();
        copy.load(&path).unwrap();
        assert_eq!(node.last_output().unwrap(), copy.transform(&batch()).unwrap());
    }

    #[test]
    fn timelines_are_written_per_layer() {
        init_logger();
        let dir = TempDir::new().unwrap();
        let config = AutoencoderConfig {
            metadata: true,
            timeline: true,
            output_folder: Some(dir.path().to_path_buf()),
            ..config()
        };
        let mut model = StackedAutoencoder::from_config(&config).unwrap();
        model.fit(&batch()).unwrap();
        model.fit(&batch()).unwrap();

        let folder = dir.path().join(TIMELINE_FOLDER);
        for iteration in 1..=2 {
            for layer in 0..2 {
                let path = folder.join(format!("{}_layer_{}_iteration_{}.json", model.name(), layer, iteration));
                let document: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
                assert_eq!(4, document["traceEvents"].as_array().unwrap().len());
            }
        }
        assert_eq!(8, model.step_records().len());
    }

    #[test]
    fn no_timelines_without_metadata() {
        init_logger();
        let dir = TempDir::new().unwrap();
        let config = AutoencoderConfig {
            timeline: true,
            output_folder: Some(dir.path().to_path_buf()),
            ..config()
        };
        let mut model = StackedAutoencoder::from_config(&config).unwrap();
        model.fit(&batch()).unwrap();
        assert!(!dir.path().join(TIMELINE_FOLDER).exists());
        assert!(model.step_records().is_empty());
    }
}
