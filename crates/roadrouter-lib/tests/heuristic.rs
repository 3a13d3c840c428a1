mod common;

use roadrouter_lib::{
    find_route_a_star, CostFunction, CostModel, Graph, NodeId, PlanFailure,
};

/// All-pairs shortest costs, indexed by node id.
fn floyd_warshall(graph: &Graph, model: &CostModel) -> Vec<Vec<f64>> {
    let n = graph.node_count();
    let mut dist = vec![vec![f64::INFINITY; n]; n];
    for (i, row) in dist.iter_mut().enumerate() {
        row[i] = 0.0;
    }
    for id in 0..n as NodeId {
        for (next, _, edge) in graph.neighbours(id) {
            let (a, b) = (id as usize, next as usize);
            dist[a][b] = dist[a][b].min(model.edge_cost(edge));
        }
    }
    for k in 0..n {
        for i in 0..n {
            for j in 0..n {
                let through = dist[i][k] + dist[k][j];
                if through < dist[i][j] {
                    dist[i][j] = through;
                }
            }
        }
    }
    dist
}

#[test]
fn heuristic_never_overestimates() {
    for seed in [1, 2, 3] {
        let graph = common::random_road_graph(seed, 25, 70);
        for cost_function in CostFunction::ALL {
            let model = CostModel::new(cost_function, 25.0);
            let exact = floyd_warshall(&graph, &model);

            for from in 0..25 {
                for to in 0..25 {
                    let best = exact[from][to];
                    if best.is_infinite() {
                        continue;
                    }
                    let estimate = model.heuristic(&graph, from as NodeId, to as NodeId);
                    assert!(
                        estimate <= best + 1e-7,
                        "{cost_function}: h({from}, {to}) = {estimate} exceeds {best}"
                    );
                }
            }
        }
    }
}

#[test]
fn astar_finds_optimal_cost() {
    let graph = common::random_road_graph(42, 25, 70);
    for cost_function in CostFunction::ALL {
        let model = CostModel::new(cost_function, 25.0);
        let exact = floyd_warshall(&graph, &model);

        for goal in 0..25 {
            let search = find_route_a_star(&graph, 0, goal as NodeId, &model);
            match search.route {
                Ok(route) => {
                    assert!(
                        (route.total_cost - exact[0][goal]).abs() < 1e-9,
                        "{cost_function}: cost to {goal} was {}, optimum {}",
                        route.total_cost,
                        exact[0][goal]
                    );
                    assert_eq!(route.nodes.first(), Some(&0));
                    assert_eq!(route.nodes.last(), Some(&(goal as NodeId)));
                }
                Err(failure) => {
                    assert_eq!(failure, PlanFailure::Unreachable);
                    assert!(exact[0][goal].is_infinite());
                }
            }
        }
    }
}

#[test]
fn heuristic_is_zero_at_goal_and_for_unknown_nodes() {
    let graph = common::three_node_line();
    let model = CostModel::time(25.0);
    assert_eq!(model.heuristic(&graph, 2, 2), 0.0);
    assert_eq!(model.heuristic(&graph, 99, 2), 0.0);
    assert!(model.heuristic(&graph, 1, 3) > 0.0);
}
