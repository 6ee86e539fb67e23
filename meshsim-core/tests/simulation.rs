//! Tests for the simulation cycle API.

mod common;

use std::collections::BTreeSet;

use common::{ScriptedSelector, demo_mesh_edges};
use meshsim_core::{
    CycleBudget, MAX_FAILURES_PER_CYCLE, NodeId, NodeStatus, Simulation, SimulationBuilder,
};
use meshsim_test_support::tracing::RecordingLayer;
use rstest::{fixture, rstest};
use tracing_subscriber::layer::SubscriberExt;

fn node(id: u32) -> NodeId {
    NodeId::new(id)
}

#[fixture]
fn demo_simulation() -> Simulation {
    SimulationBuilder::new()
        .with_edges(demo_mesh_edges())
        .with_seed(2024)
        .build()
        .expect("demo mesh must build")
}

#[rstest]
fn full_run_preserves_every_cycle_invariant(mut demo_simulation: Simulation) {
    let baseline = demo_simulation.topology().snapshot();
    let mut cycle = 0;

    while !demo_simulation.is_complete() {
        cycle += 1;
        let report = demo_simulation.run_cycle().expect("cycle must succeed");

        assert_eq!(report.cycle(), cycle);
        let draw = report.failures();
        assert!((1..=MAX_FAILURES_PER_CYCLE).contains(&draw.requested()));
        assert!(!draw.nodes().is_empty());
        assert!(draw.nodes().len() <= draw.requested());
        assert!(!draw.nodes().contains(&node(1)));
        assert_eq!(report.node_statuses().len(), 25);

        if let Some(path) = report.route().path() {
            assert_eq!(path.nodes().first(), Some(&node(1)));
            assert_eq!(path.nodes().last(), Some(&node(25)));
            assert_eq!(report.hop_count(), Some(path.nodes().len() - 1));
            for step in path.nodes() {
                assert!(!draw.nodes().contains(step), "route walks a failed node");
            }
            assert_eq!(report.path_edges().len(), path.nodes().len() - 1);
        } else {
            assert!(report.path_edges().is_empty());
        }

        for link in report.reachable_edges() {
            assert!(!draw.nodes().contains(&link.lower()));
            assert!(!draw.nodes().contains(&link.upper()));
        }

        assert_eq!(demo_simulation.topology().snapshot(), baseline);
    }

    assert_eq!(cycle, 30);
    assert_eq!(demo_simulation.cycles_completed(), 30);
}

#[rstest]
fn scripted_run_degrades_and_recovers() {
    // Minimal mesh: 1 reaches 5 through relay 2 or relay 3.
    let mut sim = SimulationBuilder::new()
        .with_node_count(5)
        .with_edges([(1, 2), (2, 5), (1, 3), (3, 5)])
        .with_budget(CycleBudget::Bounded(3))
        .with_selector(Box::new(ScriptedSelector::new([
            BTreeSet::from([node(2)]),
            BTreeSet::from([node(2), node(3)]),
            BTreeSet::from([node(4)]),
        ])))
        .build()
        .expect("mesh must build");

    let first = sim.run_cycle().expect("first cycle must succeed");
    let path: Vec<u32> = first
        .route()
        .path()
        .expect("one relay remains")
        .nodes()
        .iter()
        .map(|n| n.get())
        .collect();
    assert_eq!(path, vec![1, 3, 5]);

    let second = sim.run_cycle().expect("second cycle must succeed");
    assert!(!second.route().is_reachable());
    assert_eq!(
        second.node_statuses(),
        &[
            (node(1), NodeStatus::Active),
            (node(2), NodeStatus::Failed),
            (node(3), NodeStatus::Failed),
            (node(4), NodeStatus::Active),
            (node(5), NodeStatus::Active),
        ],
    );

    // Node 4 is isolated, so failing it leaves the best route intact.
    let third = sim.run_cycle().expect("third cycle must succeed");
    let path: Vec<u32> = third
        .route()
        .path()
        .expect("both relays are back")
        .nodes()
        .iter()
        .map(|n| n.get())
        .collect();
    assert_eq!(path, vec![1, 2, 5]);
    assert!(sim.is_complete());
}

#[rstest]
fn cycles_emit_completion_events(mut demo_simulation: Simulation) {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    tracing::subscriber::with_default(subscriber, || {
        for _ in 0..3 {
            demo_simulation.run_cycle().expect("cycle must succeed");
        }
    });

    let spans: Vec<_> = layer
        .spans()
        .into_iter()
        .filter(|span| span.name == "sim.cycle")
        .collect();
    assert_eq!(spans.len(), 3);

    let completions = layer
        .events()
        .into_iter()
        .filter(|event| {
            event.fields.get("message").map(String::as_str) == Some("cycle completed")
        })
        .count();
    assert_eq!(completions, 3);
}
