mod common;

use std::fs;

use roadrouter_lib::{
    apply_traffic_overrides, create_planner, load_network, Config, Coordinates, CostFunction,
    EdgeKey, Error, NetworkFilter, NetworkSummary, RouteSummary, TrafficOverride,
    TrafficOverrides, ALL_EDGES,
};

use common::{fixture_config, fixtures_dir};

const START: Coordinates = Coordinates {
    latitude: 37.78,
    longitude: -122.42,
};
const END: Coordinates = Coordinates {
    latitude: 37.77,
    longitude: -122.41,
};

#[test]
fn fixture_config_resolves_data_files() {
    let config = fixture_config();
    assert!(config.nodes_file.ends_with("nodes.json"));
    assert!(config.nodes_file.exists());
    assert!(config.edges_file.exists());
    assert_eq!(
        config.cost_functions,
        vec![CostFunction::Distance, CostFunction::Time]
    );
    assert_eq!(config.default_start, Some(START));
    assert_eq!(config.default_end, Some(END));
}

#[test]
fn unfiltered_fixture_keeps_every_edge() {
    let config = fixture_config();
    let network = load_network(
        &config.nodes_file,
        &config.edges_file,
        &NetworkFilter::allow_all(),
    )
    .expect("fixture loads");

    assert_eq!(network.nodes.len(), 9);
    assert_eq!(network.edges.len(), 14);

    let graph = network.into_graph();
    assert_eq!(graph.outgoing_edges(ALL_EDGES).len(), 14);
    // 108 -> 109 is one-way, 105 -> 108 too.
    assert!(graph.edge_between(109, 108).is_none());
    assert!(graph.edge_between(108, 105).is_none());
    assert!(graph.edge_between(106, 109).is_some());
    assert!(graph.edge_between(109, 106).is_some());
}

#[test]
fn highway_filter_drops_footway_but_keeps_untagged_edges() {
    let config = fixture_config();
    let network = load_network(&config.nodes_file, &config.edges_file, &config.network)
        .expect("fixture loads");

    assert_eq!(network.edges.len(), 13);
    assert!(network
        .edges
        .iter()
        .all(|edge| edge.highway_type.as_deref() != Some("footway")));
    assert!(network
        .edges
        .iter()
        .any(|edge| edge.source == 107 && edge.target == 105 && edge.highway_type.is_none()));
}

#[test]
fn fixture_speed_limits_are_parsed() {
    let config = fixture_config();
    let network = load_network(
        &config.nodes_file,
        &config.edges_file,
        &NetworkFilter::allow_all(),
    )
    .expect("fixture loads");
    let speed = |source, target| {
        network
            .edges
            .iter()
            .find(|edge| edge.source == source && edge.target == target)
            .and_then(|edge| edge.max_speed)
    };

    assert_eq!(speed(101, 102), Some(25.0));
    assert_eq!(speed(104, 105), Some(35.0));
    assert_eq!(speed(103, 106), Some(65.0));
    assert_eq!(speed(106, 109), Some(100.0));
    assert_eq!(speed(102, 103), None);

    let model = config.cost_model(CostFunction::Time);
    let motorway = network
        .edges
        .iter()
        .find(|edge| edge.source == 106)
        .expect("motorway edge");
    // 100 is above the mph ceiling, so it is read as km/h.
    assert!((model.effective_speed_mph(motorway) - 62.1371).abs() < 1e-9);
}

#[test]
fn distance_route_takes_footway_only_when_allowed() {
    let config = fixture_config();
    let planner = create_planner(config.planner, config.cost_model(CostFunction::Distance));

    let open = load_network(
        &config.nodes_file,
        &config.edges_file,
        &NetworkFilter::allow_all(),
    )
    .expect("fixture loads")
    .into_graph();
    let result = planner.plan(&open, &START, &END);
    assert_eq!(result.path, vec![101, 109]);
    assert!((result.total_distance_m - 1_417.4).abs() < 1e-9);

    let roads = load_network(&config.nodes_file, &config.edges_file, &config.network)
        .expect("fixture loads")
        .into_graph();
    let result = planner.plan(&roads, &START, &END);
    assert_eq!(result.path, vec![101, 102, 103, 106, 109]);
    assert!((result.total_distance_m - 1_990.8).abs() < 1e-6);
}

#[test]
fn time_route_prefers_faster_roads() {
    let config = fixture_config();
    let graph = load_network(&config.nodes_file, &config.edges_file, &config.network)
        .expect("fixture loads")
        .into_graph();
    let result = create_planner(config.planner, config.cost_model(CostFunction::Time))
        .plan(&graph, &START, &END);

    assert!(result.success);
    assert_eq!(result.path, vec![101, 104, 105, 106, 109]);
    assert!((result.total_time_s - 117.652_949).abs() < 1e-3);
    assert_eq!(result.total_cost, result.total_time_s);

    let summary = RouteSummary::from_result(&graph, &result).expect("summary builds");
    assert_eq!(summary.hops, 4);
    assert_eq!(summary.steps[2].road.as_deref(), Some("Market Street"));
}

#[test]
fn slow_traffic_moves_the_time_route() {
    let config = fixture_config();
    let mut network = load_network(&config.nodes_file, &config.edges_file, &config.network)
        .expect("fixture loads");
    let overrides: TrafficOverrides = [(EdgeKey::new(104, 105), TrafficOverride::Absolute(10.0))]
        .into_iter()
        .collect();
    assert_eq!(apply_traffic_overrides(&mut network.edges, &overrides), 1);

    let graph = network.into_graph();
    let result = create_planner(config.planner, config.cost_model(CostFunction::Time))
        .plan(&graph, &START, &END);
    assert_eq!(result.path, vec![101, 102, 103, 106, 109]);
}

#[test]
fn traffic_from_config_is_applied_at_load() {
    let dir = tempfile::tempdir().expect("temp dir");
    let fixtures = fixtures_dir();
    let text = format!(
        "[data]\nnodes_file = {:?}\nedges_file = {:?}\n\n[traffic]\n\"104-105\" = {{ multiplier = 0.25 }}\n",
        fixtures.join("nodes.json"),
        fixtures.join("edges.json"),
    );
    let path = dir.path().join("traffic.toml");
    fs::write(&path, text).expect("write config");

    let config = Config::from_path(&path).expect("config loads");
    let mut network = load_network(&config.nodes_file, &config.edges_file, &config.network)
        .expect("fixture loads");
    apply_traffic_overrides(&mut network.edges, &config.traffic);

    let edge = network
        .edges
        .iter()
        .find(|edge| EdgeKey::of(edge) == EdgeKey::new(104, 105))
        .expect("edge present");
    let model = config.cost_model(CostFunction::Time);
    assert_eq!(model.effective_speed_mph(edge), 35.0 * 0.25);
}

#[test]
fn summary_reports_fixture_composition() {
    let config = fixture_config();
    let network = load_network(
        &config.nodes_file,
        &config.edges_file,
        &NetworkFilter::allow_all(),
    )
    .expect("fixture loads");
    let summary = NetworkSummary::from_edges(&network.edges);

    assert_eq!(summary.total_edges, 14);
    assert_eq!(summary.edges_with_highway, 13);
    assert_eq!(summary.edges_with_max_speed, 6);
    assert_eq!(summary.highway_counts["residential"], 4);
    assert_eq!(summary.highway_counts["motorway"], 2);
    assert_eq!(summary.edges_missing_highway(), 1);
}

#[test]
fn malformed_edges_file_is_a_json_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let edges = dir.path().join("edges.json");
    fs::write(&edges, r#"[{"u": 1, "v": 2}]"#).expect("write edges");

    let err = load_network(
        &fixtures_dir().join("nodes.json"),
        &edges,
        &NetworkFilter::allow_all(),
    )
    .expect_err("distance is required");
    assert!(matches!(err, Error::Json(_)));
}

#[test]
fn negative_edge_length_fails_the_load() {
    let dir = tempfile::tempdir().expect("temp dir");
    let edges = dir.path().join("edges.json");
    fs::write(
        &edges,
        r#"[{"u": 101, "v": 102, "distance": 400.0, "highway": "residential"},
            {"u": 102, "v": 103, "distance": -5.0, "highway": "footway"}]"#,
    )
    .expect("write edges");

    // Length is checked before the highway filter drops the footway.
    let err = load_network(
        &fixtures_dir().join("nodes.json"),
        &edges,
        &NetworkFilter::only(["residential"]),
    )
    .expect_err("negative length is rejected");
    assert!(matches!(
        err,
        Error::InvalidEdgeLength {
            from: 102,
            to: 103,
            ..
        }
    ));
}
