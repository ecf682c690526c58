extern crate lamina;

#[cfg(test)]
mod graph_spec {
    use std::cell::RefCell;
    use std::rc::Rc;

    use lamina::{AutoencoderConfig, AutoencoderNode, Error, InputLayer, Phase, Producer, Receipt, Region,
                 SourceId, StackedAutoencoder, TransformSubscriber};
    use ndarray::{concatenate, Array2, Axis};

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn config(dims: Vec<usize>) -> AutoencoderConfig {
        let epochs = vec![2; dims.len()];
        AutoencoderConfig {
            seed: Some(11),
            ..AutoencoderConfig::new(dims, epochs)
        }
    }

    fn node(dims: Vec<usize>) -> Rc<AutoencoderNode> {
        Rc::new(AutoencoderNode::from_config(&config(dims)).unwrap())
    }

    fn ramp(rows: usize, columns: usize, offset: f32) -> Array2<f32> {
        Array2::from_shape_fn((rows, columns), |(row, column)| {
            ((offset + (row * columns + column) as f32) * 0.37).sin().abs()
        })
    }

    struct Recorder {
        id: SourceId,
        batches: RefCell<Vec<(SourceId, Array2<f32>)>>,
    }

    impl Recorder {
        fn new() -> Rc<Recorder> {
            Rc::new(Recorder {
                id: SourceId::next(),
                batches: RefCell::new(Vec::new()),
            })
        }
    }

    impl TransformSubscriber for Recorder {
        fn subscriber_id(&self) -> SourceId {
            self.id
        }

        fn on_transformed(&self, source: SourceId, data: &Array2<f32>) {
            self.batches.borrow_mut().push((source, data.clone()));
        }
    }

    #[test]
    fn fires_once_every_source_delivered() {
        init_logger();
        let a = InputLayer::new("a", 3);
        let b = InputLayer::new("b", 2);
        let sink = node(vec![2]);
        sink.register_for(&a, None).unwrap();
        sink.register_for(&b, None).unwrap();
        assert_eq!(2, sink.registered_sources());
        assert_eq!(5, sink.input_columns());

        assert_eq!(Receipt::Buffered, sink.receive(a.source_id(), &ramp(4, 3, 0f32)));
        assert_eq!(0, sink.iteration());
        assert_eq!(1, sink.pending());

        assert_eq!(Receipt::Fired, sink.receive(b.source_id(), &ramp(4, 2, 1f32)));
        assert_eq!(1, sink.iteration());
        assert_eq!(0, sink.pending());
        assert_eq!(Phase::Running, sink.phase());
        assert_eq!(&[4, 2], sink.last_output().unwrap().shape());
    }

    #[test]
    fn full_slot_drops_new_batch() {
        init_logger();
        let a = InputLayer::new("a", 3);
        let b = InputLayer::new("b", 2);
        let sink = node(vec![2]);
        sink.register_for(&a, None).unwrap();
        sink.register_for(&b, None).unwrap();

        let first = ramp(4, 3, 0f32);
        assert_eq!(Receipt::Buffered, sink.receive(a.source_id(), &first));
        assert_eq!(Receipt::SlotFull, sink.receive(a.source_id(), &ramp(4, 3, 7f32)));
        assert_eq!(Some(first), sink.buffered(a.source_id()));
        assert_eq!(0, sink.iteration());

        assert_eq!(Receipt::Fired, sink.receive(b.source_id(), &ramp(4, 2, 1f32)));
        assert_eq!(1, sink.iteration());
    }

    #[test]
    fn unregistered_source_is_dropped() {
        init_logger();
        let a = InputLayer::new("a", 3);
        let stranger = InputLayer::new("stranger", 3);
        let sink = node(vec![2]);
        sink.register_for(&a, None).unwrap();

        assert_eq!(Receipt::Unregistered, sink.receive(stranger.source_id(), &ramp(2, 3, 0f32)));
        assert_eq!(0, sink.pending());
        assert_eq!(0, sink.iteration());
    }

    #[test]
    fn ragged_batches_fail_and_flush() {
        init_logger();
        let a = InputLayer::new("a", 3);
        let b = InputLayer::new("b", 2);
        let sink = node(vec![2]);
        sink.register_for(&a, None).unwrap();
        sink.register_for(&b, None).unwrap();

        assert_eq!(Receipt::Buffered, sink.receive(a.source_id(), &ramp(4, 3, 0f32)));
        assert_eq!(Receipt::Failed, sink.receive(b.source_id(), &ramp(5, 2, 0f32)));
        assert_eq!(0, sink.pending());
        assert_eq!(0, sink.iteration());
    }

    #[test]
    fn registration_is_frozen_after_training() {
        init_logger();
        let a = InputLayer::new("a", 3);
        let late = InputLayer::new("late", 2);
        let sink = node(vec![2]);
        sink.register_for(&a, None).unwrap();
        a.feed(&ramp(4, 3, 0f32)).unwrap();
        assert_eq!(1, sink.iteration());

        match sink.register_for(&late, None) {
            Err(Error::TopologyFrozen { .. }) => {}
            other => panic!("expected a frozen topology, got {:?}", other),
        }
        assert_eq!(1, sink.registered_sources());
        assert_eq!(0, late.subscriber_count());
    }

    #[test]
    fn self_and_duplicate_registration_fail() {
        init_logger();
        let a = InputLayer::new("a", 3);
        let sink = node(vec![2]);
        match sink.register_for(&*sink, None) {
            Err(Error::SelfRegistration(_)) => {}
            other => panic!("expected a self registration error, got {:?}", other),
        }

        sink.register_for(&a, None).unwrap();
        match sink.register_for(&a, Some(Region::new(0, 1))) {
            Err(Error::AlreadyRegistered { .. }) => {}
            other => panic!("expected a duplicate registration error, got {:?}", other),
        }
        assert_eq!(1, sink.registered_sources());
        assert_eq!(1, a.subscriber_count());
    }

    #[test]
    fn region_must_fit_into_input() {
        init_logger();
        let a = InputLayer::new("a", 4);
        let sink = node(vec![2]);
        match sink.register_for(&a, Some(Region::new(2, 6))) {
            Err(Error::InvalidRegion { start: 2, end: 6, width: 4 }) => {}
            other => panic!("expected an invalid region, got {:?}", other),
        }
        assert_eq!(0, sink.registered_sources());
        assert_eq!(0, a.subscriber_count());
    }

    #[test]
    fn joins_in_registration_order() {
        init_logger();
        let inputs = vec![InputLayer::new("a", 1), InputLayer::new("b", 2), InputLayer::new("c", 3)];
        let sink = Rc::new(AutoencoderNode::new(StackedAutoencoder::from_config(&config(vec![2])).unwrap()));
        for input in &inputs {
            sink.register_for(input, None).unwrap();
        }
        let batches: Vec<Array2<f32>> = (0..3).map(|i| ramp(5, i + 1, i as f32 * 10f32)).collect();

        assert_eq!(Receipt::Buffered, sink.receive(inputs[2].source_id(), &batches[2]));
        assert_eq!(Receipt::Buffered, sink.receive(inputs[0].source_id(), &batches[0]));
        assert_eq!(Receipt::Fired, sink.receive(inputs[1].source_id(), &batches[1]));

        let joined = concatenate(Axis(1), &[batches[0].view(), batches[1].view(), batches[2].view()]).unwrap();
        let mut reference = StackedAutoencoder::from_config(&config(vec![2])).unwrap();
        let expected = reference.fit_transform(&joined).unwrap();
        assert_eq!(Some(expected), sink.last_output());
        assert_eq!(6, sink.model().input_dim().unwrap());
    }

    #[test]
    fn emits_encoding_to_subscribers() {
        init_logger();
        let a = InputLayer::new("a", 4);
        let sink = node(vec![3]);
        let recorder = Recorder::new();
        sink.register_for(&a, None).unwrap();
        sink.subscribe(recorder.clone(), None).unwrap();
        assert_eq!(1, sink.subscriber_count());

        a.feed(&ramp(6, 4, 0f32)).unwrap();
        let batches = recorder.batches.borrow();
        assert_eq!(1, batches.len());
        assert_eq!(sink.id(), batches[0].0);
        assert_eq!(Some(batches[0].1.clone()), sink.last_output());
    }

    #[test]
    fn input_delivers_regions() {
        init_logger();
        let input = InputLayer::new("pixels", 4);
        let left = Recorder::new();
        let whole = Recorder::new();
        input.subscribe(left.clone(), Some(Region::new(0, 2))).unwrap();
        input.subscribe(whole.clone(), None).unwrap();

        let batch = ramp(3, 4, 0f32);
        input.feed(&batch).unwrap();
        assert_eq!(Region::new(0, 2).select(&batch), left.batches.borrow()[0].1);
        assert_eq!(batch, whole.batches.borrow()[0].1);
        assert!(input.feed(&ramp(3, 5, 0f32)).is_err());
        assert_eq!(1, whole.batches.borrow().len());
    }

    #[test]
    fn two_level_hierarchy() {
        init_logger();
        let input = InputLayer::new("image", 8);
        let quadrants: Vec<Rc<AutoencoderNode>> = (0..4).map(|_| node(vec![3, 2])).collect();
        let top = node(vec![4]);
        for (i, quadrant) in quadrants.iter().enumerate() {
            quadrant.register_for(&input, Some(Region::new(2 * i, 2 * i + 2))).unwrap();
            top.register_for(&**quadrant, None).unwrap();
        }
        assert_eq!(8, top.input_columns());

        for round in 1..=3 {
            input.feed(&ramp(10, 8, round as f32)).unwrap();
            assert!(quadrants.iter().all(|quadrant| quadrant.iteration() == round));
            assert_eq!(round, top.iteration());
            assert_eq!(0, top.pending());
        }
        assert_eq!(&[10, 4], top.last_output().unwrap().shape());
        assert_eq!(8, top.model().input_dim().unwrap());
    }

    #[test]
    fn diamond_fires_bottom_once_per_feed() {
        init_logger();
        let input = InputLayer::new("in", 6);
        let bottom = node(vec![4]);
        let left = node(vec![2]);
        let right = node(vec![3]);
        let top = node(vec![2]);
        bottom.register_for(&input, None).unwrap();
        left.register_for(&*bottom, None).unwrap();
        right.register_for(&*bottom, None).unwrap();
        top.register_for(&*left, None).unwrap();
        top.register_for(&*right, None).unwrap();
        assert_eq!(5, top.input_columns());

        input.feed(&ramp(7, 6, 0f32)).unwrap();
        input.feed(&ramp(7, 6, 3f32)).unwrap();
        for node in &[&bottom, &left, &right, &top] {
            assert_eq!(2, node.iteration(), "{} trained {} times", node.name(), node.iteration());
        }
    }

    #[test]
    fn region_on_node_output_is_ignored() {
        init_logger();
        let input = InputLayer::new("in", 4);
        let lower = node(vec![3]);
        let upper = node(vec![2]);
        lower.register_for(&input, None).unwrap();
        upper.register_for(&*lower, Some(Region::new(0, 1))).unwrap();
        assert_eq!(3, upper.input_columns());

        input.feed(&ramp(5, 4, 0f32)).unwrap();
        assert_eq!(1, upper.iteration());
        assert_eq!(3, upper.model().input_dim().unwrap());
    }
}
