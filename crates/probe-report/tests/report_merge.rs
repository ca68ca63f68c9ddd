//! End-to-end merging of control state from several probes.

use probe_core::serialization::{from_slice, from_str, to_string, to_vec};
use probe_core::{join_all, ManualClock, ProbeConfig};
use probe_report::{
    Control, Controls, ControlsBuilder, NodeControls, NodeControlsMap, PhysicalClock,
    PhysicalTime, ReportControls,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn docker_catalog() -> Controls {
    let mut builder = ControlsBuilder::new();
    builder
        .add_control(Control::new("docker_stop", "Stop", "fa-stop", 0))
        .add_control(Control::new("docker_start", "Start", "fa-play", 1))
        .add_control(Control::new("docker_pause", "Pause", "fa-pause", 2));
    builder.build()
}

#[test]
fn two_probes_converge_on_node_state_regardless_of_order() {
    init_tracing();
    let clock = ManualClock::with_step(1_000, 10);

    let running = NodeControls::new().add(&clock, ["docker_stop", "docker_pause"]);
    let stopped = NodeControls::new().add(&clock, ["docker_start"]);

    let probe_a = ReportControls::new(
        docker_catalog(),
        NodeControlsMap::new().insert("container-1", running),
    );
    let probe_b = ReportControls::new(
        docker_catalog(),
        NodeControlsMap::new().insert("container-1", stopped.clone()),
    );

    let ab = probe_a.merge(&probe_b);
    let ba = probe_b.merge(&probe_a);
    assert_eq!(ab, ba);

    let container = ab.node_controls.get("container-1").unwrap();
    assert_eq!(container, &stopped);
    assert!(!container.contains("docker_stop"));
}

#[test]
fn catalog_conflicts_resolve_by_fold_order() {
    init_tracing();
    let stop = ReportControls::new(
        Controls::from_controls([Control::new("stop", "Stop", "fa-stop", 0)]),
        NodeControlsMap::new(),
    );
    let halt = ReportControls::new(
        Controls::from_controls([Control::new("stop", "Halt", "fa-hand", 0)]),
        NodeControlsMap::new(),
    );

    let forward = join_all(&[stop.clone(), halt.clone()]);
    let backward = join_all(&[halt.clone(), stop.clone()]);
    assert_eq!(forward.controls.get("stop").unwrap().human, "Halt");
    assert_eq!(backward.controls.get("stop").unwrap().human, "Stop");
    assert_ne!(forward, backward);
    assert_eq!(forward, stop.merge(&halt));
}

#[test]
fn repeated_merges_are_stable() {
    init_tracing();
    let clock = ManualClock::with_step(0, 1);
    let reports: Vec<ReportControls> = (0..5)
        .map(|i| {
            ReportControls::new(
                Controls::from_controls([Control::new(format!("c{i}"), "", "", i)]),
                NodeControlsMap::new()
                    .insert("host", NodeControls::new().add(&clock, [format!("c{i}")])),
            )
        })
        .collect();

    let once = join_all(&reports);
    let twice = join_all(&[once.clone(), once.clone()]);
    assert_eq!(once, twice);
    assert_eq!(once.controls.len(), 5);
    assert!(once.node_controls.get("host").unwrap().contains("c4"));
}

#[test]
fn configured_clock_drives_add() {
    let config = ProbeConfig::from_toml_str("[clock]\nsource = \"manual\"\nstart_ms = 77\n").unwrap();
    let clock = config.build_clock().unwrap();

    let nc = NodeControls::with_timestamp(PhysicalTime::from_ms(5), ["a"]).add(&clock, ["b"]);
    assert_eq!(nc.timestamp(), Some(PhysicalTime::from_ms(77)));
    assert!(nc.contains("a") && nc.contains("b"));
}

#[test]
fn add_is_not_earlier_than_any_observed_clock_value() {
    let clock = ManualClock::with_step(10, 5);
    let mut observed = Vec::new();
    let mut nc = NodeControls::new();
    for id in ["a", "b", "c"] {
        observed.push(clock.peek());
        nc = nc.add(&clock, [id]);
        let ts = nc.timestamp().unwrap();
        assert!(observed.iter().all(|t| *t <= ts));
    }
    assert_eq!(nc.controls().len(), 3);
    assert!(clock.physical_time() > nc.timestamp().unwrap());
}

#[test]
fn control_roundtrip_json() {
    let control = Control::new("docker_exec", "Exec shell", "fa-terminal", 3);
    let bytes = to_vec(&control).unwrap();
    let decoded: Control = from_slice(&bytes).unwrap();
    assert_eq!(decoded, control);
}

#[test]
fn sparse_control_decodes_to_empty_fields() {
    let decoded: Control = from_str(r#"{"id":"docker_exec"}"#).unwrap();
    assert_eq!(decoded, Control::new("docker_exec", "", "", 0));
}

#[test]
fn node_controls_roundtrip_json() {
    let set = NodeControls::with_timestamp(PhysicalTime::from_ms(1_700_000_000_000), ["a", "b"]);
    let decoded: NodeControls = from_str(&to_string(&set).unwrap()).unwrap();
    assert_eq!(decoded, set);

    let unset = NodeControls::new();
    let text = to_string(&unset).unwrap();
    assert_eq!(text, "{}");
    let decoded: NodeControls = from_str(&text).unwrap();
    assert_eq!(decoded, unset);
    assert!(!decoded.is_set());
}

#[test]
fn report_roundtrip_json() {
    let clock = ManualClock::new(42);
    let report = ReportControls::new(
        docker_catalog(),
        NodeControlsMap::new()
            .insert("container-1", NodeControls::new().add(&clock, ["docker_stop"]))
            .insert("container-2", NodeControls::new()),
    );

    let decoded: ReportControls = from_str(&to_string(&report).unwrap()).unwrap();
    assert_eq!(decoded, report);
}
