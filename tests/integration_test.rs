use klingt_synthdef::{
    ControlDesc, ControlNode, ControlRate, Error, Rate, SynthGraph, UGen, UGenInput,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

fn assert_same_except_rate(a: &ControlNode, b: &ControlNode) {
    assert_eq!(a.name(), b.name());
    assert_eq!(a.num_outputs(), b.num_outputs());
    assert_eq!(a.inputs(), b.inputs());
    assert_eq!(a.special_index(), b.special_index());
    for (x, y) in a.descs().iter().zip(b.descs()) {
        assert_eq!(x.name(), y.name());
        assert_eq!(x.default_value(), y.default_value());
        assert_eq!(x.lag(), y.lag());
    }
}

#[test]
/// `ir("freq", 440)` is one scalar output with one descriptor
fn ir_single_value() {
    init_tracing();
    let ctl = ControlNode::ir_value("freq", 440.0);

    assert_eq!(ctl.num_outputs(), 1);
    assert_eq!(
        ctl.desc(0),
        Ok(&ControlDesc::new(Some("freq".to_owned()), Rate::Scalar, 440.0, 0.0))
    );
}

#[test]
/// `kr(["amp", "pan"], [0.5, 0.0])` gives two control outputs, "pan" is output 1
fn kr_named_pair() {
    init_tracing();
    let ctl = ControlNode::kr_named(["amp", "pan"], &[0.5, 0.0]).unwrap();

    assert_eq!(ctl.num_descs(), 2);
    assert_eq!(ctl.num_outputs(), 2);
    assert!(ctl.descs().iter().all(|d| d.rate() == Rate::Control));
    assert_eq!(ctl.desc(0).unwrap().name(), Some("amp"));
    assert_eq!(ctl.desc(0).unwrap().default_value(), 0.5);
    assert_eq!(ctl.channel_named("pan"), Some(ctl.channel(1).unwrap()));
    assert_eq!(ctl.channel(1).unwrap().rate(), Rate::Control);
}

#[test]
fn named_lists_keep_every_pair() {
    let names = ["freq", "amp", "pan", "gate", "att", "rel"];
    let values: [f32; 6] = [220.0, 0.2, -0.5, 1.0, 0.01, 1.5];
    let ctl = ControlNode::kr_named(names, &values).unwrap();

    assert_eq!(ctl.num_descs(), names.len());
    for (i, (name, value)) in names.iter().zip(values).enumerate() {
        let desc = ctl.desc(i).unwrap();
        assert_eq!(desc.name(), Some(*name));
        assert_eq!(desc.default_value(), value);
        assert_eq!(desc.lag(), 0.0);
        assert_eq!(desc.rate(), Rate::Control);
        assert_eq!(ctl.channel_named(name), Some(ctl.channel(i).unwrap()));
    }
}

#[test]
fn mismatched_lists_fail_for_both_families() {
    for (names, values) in [(2, 3), (3, 2), (0, 1), (1, 0)] {
        let names = (0..names).map(|i| format!("p{}", i)).collect::<Vec<_>>();
        let values = vec![0.0f32; values];
        let expected = Err(Error::ArityMismatch {
            names: names.len(),
            values: values.len(),
        });

        assert_eq!(ControlNode::ir_named(names.clone(), &values), expected);
        assert_eq!(ControlNode::kr_named(names, &values), expected);
    }
}

#[test]
fn single_name_bank() {
    let ctl = ControlNode::ir_values("i_bufs", &[10.0, 11.0, 12.0, 13.0]).unwrap();

    assert_eq!(ctl.num_descs(), 4);
    assert_eq!(ctl.desc(0).unwrap().name(), Some("i_bufs"));
    for i in 1..4 {
        assert_eq!(ctl.desc(i).unwrap().name(), None);
        assert_eq!(ctl.desc(i).unwrap().default_value(), 10.0 + i as f32);
    }
    assert_eq!(ctl.channel_named("i_bufs"), Some(ctl.channel(0).unwrap()));
}

#[test]
fn index_past_end_fails() {
    let ctl = ControlNode::kr_values("out", &[0.0, 1.0]).unwrap();
    let len = ctl.num_descs();

    for index in [len, len + 1, usize::MAX] {
        assert_eq!(ctl.channel(index), Err(Error::OutputIndexOutOfRange { index, len }));
        assert_eq!(ctl.desc(index), Err(Error::DescIndexOutOfRange { index, len }));
    }
}

#[test]
fn scalar_and_control_families_match() {
    assert_same_except_rate(&ControlNode::ir("x"), &ControlNode::kr("x"));
    assert_same_except_rate(&ControlNode::ir_value("x", 3.0), &ControlNode::kr_value("x", 3.0));
    assert_same_except_rate(
        &ControlNode::ir_named(["a", "b"], &[1.0, 2.0]).unwrap(),
        &ControlNode::kr_named(["a", "b"], &[1.0, 2.0]).unwrap(),
    );
    assert_same_except_rate(
        &ControlNode::ir_values("a", &[1.0, 2.0]).unwrap(),
        &ControlNode::kr_values("a", &[1.0, 2.0]).unwrap(),
    );

    assert_eq!(ControlNode::ir("x").rate(), Rate::Scalar);
    assert_eq!(ControlNode::kr("x").rate(), Rate::Control);
}

#[test]
fn single_value_is_one_element_bank() {
    assert_eq!(
        ControlNode::single(ControlRate::Control, "gate", 1.0),
        ControlNode::bank(ControlRate::Control, "gate", &[1.0]).unwrap()
    );
    assert_eq!(ControlNode::kr("gate"), ControlNode::kr_value("gate", 0.0));
}

#[test]
/// declares controls, wires them into an oscillator and an output, reads back the parameter table
fn sine_definition() {
    init_tracing();
    let mut graph = SynthGraph::new("sine");

    let init = graph.add(ControlNode::ir_value("i_out", 0.0)).unwrap();
    let ctl = graph
        .add(
            ControlNode::builder(ControlRate::Control)
                .param("freq", 440.0)
                .param("amp", 0.1)
                .build()
                .unwrap(),
        )
        .unwrap();

    let freq = graph.control("freq").unwrap();
    assert_eq!(freq, graph.output(ctl, 0).unwrap());

    let osc = graph
        .add(UGen::uniform(
            "SinOsc",
            Rate::Audio,
            1,
            vec![freq.into(), UGenInput::Constant(0.0)],
            0,
        ))
        .unwrap();
    let amp = graph.control("amp").unwrap();
    let osc_out = graph.output(osc, 0).unwrap();
    let scaled = graph
        .add(UGen::uniform(
            "BinaryOpUGen",
            Rate::Audio,
            1,
            vec![osc_out.into(), amp.into()],
            2,
        ))
        .unwrap();
    let bus = graph.control("i_out").unwrap();
    assert_eq!(bus.node(), init);
    let signal = graph.output(scaled, 0).unwrap();
    graph
        .add(UGen::uniform(
            "Out",
            Rate::Audio,
            0,
            vec![bus.into(), signal.into()],
            0,
        ))
        .unwrap();

    assert_eq!(graph.len(), 5);
    assert_eq!(graph.controls().count(), 2);

    let params = graph.parameters();
    assert_eq!(params.initial_values(), &[0.0, 440.0, 0.1]);
    assert_eq!(params.offset_of("freq"), Some(1));
    assert_eq!(params.offset_of("amp"), Some(2));

    let names = graph
        .nodes()
        .map(|(_, node)| node.ugen().name().to_owned())
        .collect::<Vec<_>>();
    assert_eq!(names, ["Control", "Control", "SinOsc", "BinaryOpUGen", "Out"]);
}

#[cfg(feature = "serde")]
#[test]
fn descriptors_serialize() {
    let ctl = ControlNode::kr_values("out", &[0.0, 1.0]).unwrap();
    let json = serde_json::to_string(ctl.descs()).unwrap();
    let back: Vec<ControlDesc> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, ctl.descs());
}
