use grape::community::{CommunityOracle, GreedyModularity};
use grape::config::{SearchConfig, SearchStrategy};
use grape::GrapeError;
use grape::diagnostics::Diagnostics;
use grape::model::{GraphVertex, PartitionHistory, WeightedGraph};
use grape::search::{
    AdaptiveTarget, DynamicGrowth, Evaluation, FixedIncrement, Proposal, ResolutionSearch, ResolutionSweep,
    SearchOutcome,
};

fn evaluated(resolution: f64, num_communities: usize) -> Option<Evaluation> {
    Some(Evaluation {
        resolution,
        num_communities,
    })
}

/// Two triangles of weight 1 joined by a bridge of weight 0.1.
fn two_triangles() -> WeightedGraph {
    let mut graph = WeightedGraph::new(6);
    for (i, j) in [(0, 1), (0, 2), (1, 2), (3, 4), (3, 5), (4, 5)] {
        graph.set_weight(i, j, 1.0);
    }
    graph.set_weight(2, 3, 0.1);
    graph
}

// ============================================================================
// Strategies
// ============================================================================
#[test]
fn test_fixed_increment() {
    let history = PartitionHistory::new(4);
    let mut strategy = FixedIncrement::new(0.0, 0.25, 10);

    assert_eq!(strategy.initialize(), 0.0);
    assert_eq!(strategy.propose(&history, evaluated(0.0, 1)), Proposal::Next(0.25));
    assert_eq!(strategy.propose(&history, evaluated(0.25, 2)), Proposal::Next(0.5));
    assert_eq!(
        strategy.propose(&history, evaluated(0.5, 4)),
        Proposal::Stop(SearchOutcome::Converged)
    );
}

#[test]
fn test_fixed_increment_cap() {
    let history = PartitionHistory::new(4);
    let mut strategy = FixedIncrement::new(0.0, 0.25, 2);
    strategy.initialize();

    assert_eq!(strategy.propose(&history, evaluated(0.0, 1)), Proposal::Next(0.25));
    assert_eq!(
        strategy.propose(&history, evaluated(0.25, 1)),
        Proposal::Stop(SearchOutcome::MaxIterationsReached)
    );
}

#[test]
fn test_fixed_increment_continues_after_failure() {
    let history = PartitionHistory::new(4);
    let mut strategy = FixedIncrement::new(1.0, 0.5, 10);
    strategy.initialize();

    assert_eq!(strategy.propose(&history, None), Proposal::Next(1.5));
}

#[test]
fn test_initialize_resets_state() {
    let history = PartitionHistory::new(4);
    let mut strategy = FixedIncrement::new(0.0, 0.25, 10);
    strategy.initialize();
    strategy.propose(&history, evaluated(0.0, 1));
    strategy.propose(&history, evaluated(0.25, 1));

    assert_eq!(strategy.initialize(), 0.0);
    assert_eq!(strategy.propose(&history, evaluated(0.0, 1)), Proposal::Next(0.25));
}

#[test]
fn test_dynamic_growth_plateau() {
    let history = PartitionHistory::new(10);
    let mut strategy = DynamicGrowth::new(0.5, 2.0, 50).with_patience(2);

    assert_eq!(strategy.initialize(), 0.5);
    assert_eq!(strategy.propose(&history, evaluated(0.5, 1)), Proposal::Next(1.0));
    // A single community does not count as a plateau
    assert_eq!(strategy.propose(&history, evaluated(1.0, 1)), Proposal::Next(2.0));
    assert_eq!(strategy.propose(&history, evaluated(2.0, 3)), Proposal::Next(4.0));
    assert_eq!(strategy.propose(&history, evaluated(4.0, 3)), Proposal::Next(8.0));
    assert_eq!(
        strategy.propose(&history, evaluated(8.0, 3)),
        Proposal::Stop(SearchOutcome::Converged)
    );
}

#[test]
fn test_dynamic_growth_stops_at_singletons() {
    let history = PartitionHistory::new(3);
    let mut strategy = DynamicGrowth::new(0.5, 2.0, 50);
    strategy.initialize();

    assert_eq!(
        strategy.propose(&history, evaluated(0.5, 3)),
        Proposal::Stop(SearchOutcome::Converged)
    );
}

#[test]
fn test_dynamic_growth_first_repeat_with_patience_one() {
    let history = PartitionHistory::new(10);
    let mut strategy = DynamicGrowth::new(0.5, 2.0, 50).with_patience(1);
    strategy.initialize();

    assert_eq!(strategy.propose(&history, evaluated(0.5, 4)), Proposal::Next(1.0));
    assert_eq!(
        strategy.propose(&history, evaluated(1.0, 4)),
        Proposal::Stop(SearchOutcome::Converged)
    );
}

#[test]
fn test_dynamic_growth_single_community_never_converges() {
    let history = PartitionHistory::new(10);
    let mut strategy = DynamicGrowth::new(0.5, 2.0, 6);
    let mut resolution = strategy.initialize();

    for _ in 0..5 {
        match strategy.propose(&history, evaluated(resolution, 1)) {
            Proposal::Next(next) => resolution = next,
            stop => panic!("stopped early: {:?}", stop),
        }
    }
    assert_eq!(
        strategy.propose(&history, evaluated(resolution, 1)),
        Proposal::Stop(SearchOutcome::MaxIterationsReached)
    );
}

#[test]
fn test_dynamic_growth_default_patience() {
    let history = PartitionHistory::new(10);
    let mut strategy = DynamicGrowth::new(0.5, 2.0, 50);
    strategy.initialize();

    assert_eq!(strategy.propose(&history, evaluated(0.5, 2)), Proposal::Next(1.0));
    assert_eq!(strategy.propose(&history, evaluated(1.0, 2)), Proposal::Next(2.0));
    assert_eq!(strategy.propose(&history, evaluated(2.0, 2)), Proposal::Next(4.0));
    assert_eq!(
        strategy.propose(&history, evaluated(4.0, 2)),
        Proposal::Stop(SearchOutcome::Converged)
    );
}

#[test]
#[should_panic(expected = "growth factor")]
fn test_dynamic_growth_needs_growth() {
    DynamicGrowth::new(0.5, 1.0, 10);
}

#[test]
fn test_adaptive_target() {
    let history = PartitionHistory::new(6);
    let mut strategy = AdaptiveTarget::new(1.0, 0.25, 3, 0.1, 50);

    assert_eq!(strategy.initialize(), 1.0);
    assert_eq!(strategy.propose(&history, evaluated(1.0, 1)), Proposal::Next(1.25));
    assert_eq!(strategy.propose(&history, evaluated(1.25, 5)), Proposal::Next(1.0));
    // Failed evaluation: keep moving away from the last known count
    assert_eq!(strategy.propose(&history, None), Proposal::Next(0.75));
    assert_eq!(
        strategy.propose(&history, evaluated(0.75, 3)),
        Proposal::Stop(SearchOutcome::Converged)
    );
}

#[test]
fn test_adaptive_target_respects_floor() {
    let history = PartitionHistory::new(6);
    let mut strategy = AdaptiveTarget::new(0.2, 0.25, 2, 0.1, 50);
    strategy.initialize();

    assert_eq!(strategy.propose(&history, evaluated(0.2, 4)), Proposal::Next(0.1));
    assert_eq!(strategy.propose(&history, evaluated(0.1, 4)), Proposal::Next(0.1));
}

#[test]
fn test_build_strategy_from_config() {
    let mut config = SearchConfig::default();
    assert_eq!(config.build_strategy(5).unwrap().name(), "fixed");

    config.strategy = SearchStrategy::Dynamic;
    let dynamic = config.build_strategy(5).unwrap();
    assert_eq!(dynamic.name(), "dynamic");
    assert_eq!(dynamic.max_iterations(), config.max_iterations);

    config.strategy = SearchStrategy::Adaptive;
    let mut adaptive = config.build_strategy(5).unwrap();
    assert_eq!(adaptive.name(), "adaptive");
    assert_eq!(adaptive.initialize(), 0.1);
    // Target defaults to the number of languages
    let history = PartitionHistory::new(5);
    assert_eq!(
        adaptive.propose(&history, evaluated(0.1, 5)),
        Proposal::Stop(SearchOutcome::Converged)
    );
}

#[test]
fn test_build_strategy_rejects_bad_parameters() {
    let mut config = SearchConfig {
        strategy: SearchStrategy::Dynamic,
        growth_factor: 1.0,
        ..SearchConfig::default()
    };
    assert!(matches!(config.build_strategy(5), Err(GrapeError::Configuration(_))));

    config.growth_factor = 1.5;
    config.initial_value = Some(0.0);
    assert!(matches!(config.build_strategy(5), Err(GrapeError::Configuration(_))));

    config.strategy = SearchStrategy::Fixed;
    config.increment = 0.0;
    assert!(matches!(config.build_strategy(5), Err(GrapeError::Configuration(_))));
}

// ============================================================================
// Sweep
// ============================================================================
#[test]
fn test_sweep_fixed_reaches_singletons() {
    let graph = two_triangles();
    let mut strategy = FixedIncrement::new(0.0, 0.5, 200);
    let mut diagnostics = Diagnostics::new();

    let result = ResolutionSweep::run(&graph, &mut GreedyModularity::new(), &mut strategy, &mut diagnostics).unwrap();

    assert_eq!(result.outcome, SearchOutcome::Converged);
    assert_eq!(result.iterations, result.history.len());
    assert!(result.history.last().unwrap().partition.is_all_singletons());
    assert!(diagnostics.is_empty());

    let resolutions: Vec<f64> = result.history.steps().iter().map(|s| s.resolution).collect();
    assert!(resolutions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_sweep_adaptive_finds_target() {
    let graph = two_triangles();
    let mut strategy = AdaptiveTarget::new(0.1, 0.1, 2, 0.01, 50);
    let mut diagnostics = Diagnostics::new();

    let result = ResolutionSweep::run(&graph, &mut GreedyModularity::new(), &mut strategy, &mut diagnostics).unwrap();

    assert_eq!(result.outcome, SearchOutcome::Converged);
    assert_eq!(result.iterations, 1);
    assert_eq!(
        result.history.last().unwrap().partition.communities(),
        &[vec![0, 1, 2], vec![3, 4, 5]]
    );
}

#[test]
fn test_sweep_respects_budget() {
    let graph = two_triangles();
    let mut strategy = FixedIncrement::new(0.0, 0.001, 5);
    let mut diagnostics = Diagnostics::new();

    let result = ResolutionSweep::run(&graph, &mut GreedyModularity::new(), &mut strategy, &mut diagnostics).unwrap();

    assert_eq!(result.outcome, SearchOutcome::MaxIterationsReached);
    assert_eq!(result.iterations, 5);
    assert_eq!(result.history.len(), 5);
    assert_eq!(diagnostics.count("convergence-failure"), 1);
}

/// Oracle returning overlapping groups every time.
struct Broken;

impl CommunityOracle for Broken {
    fn name(&self) -> &str {
        "broken"
    }

    fn detect(&mut self, graph: &WeightedGraph, _resolution: f64) -> Vec<Vec<GraphVertex>> {
        let all: Vec<GraphVertex> = (0..graph.num_vertices()).collect();
        vec![all.clone(), all]
    }
}

#[test]
fn test_sweep_survives_failing_oracle() {
    let graph = two_triangles();
    let mut strategy = FixedIncrement::new(0.0, 0.1, 4);
    let mut diagnostics = Diagnostics::new();

    let result = ResolutionSweep::run(&graph, &mut Broken, &mut strategy, &mut diagnostics).unwrap();

    assert!(result.history.is_empty());
    assert_eq!(result.outcome, SearchOutcome::MaxIterationsReached);
    assert_eq!(diagnostics.count("oracle-failure"), 4);
    assert_eq!(diagnostics.count("convergence-failure"), 1);
}
