pub mod crossover;
pub mod mutation;
pub mod selection;

pub use crossover::{
    cross_population, BlendCrossover, Crossover, MultiPointCrossover, PathMergeCrossover,
    PmxCrossover,
};
pub use mutation::{
    mutate_population, FlipMutation, Mutation, MutationStats, PermutationMutation, ResetMutation,
};
pub use selection::{
    selector_from_config, EliteSelector, RouletteSelector, Selector, TournamentSelector,
};
