//! In-process agents.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::agent::Agent;
use crate::game::{is_valid_order, ColonyId, Direction, Order, VisibleCell, World};

/// Never issues an order.
#[derive(Debug, Clone, Copy, Default)]
pub struct LazyAgent;

impl Agent for LazyAgent {
    fn name(&self) -> &str {
        "lazy"
    }

    fn play_turn(&mut self, _view: &[VisibleCell], _turn: u32, _world: &World) -> Vec<Order> {
        Vec::new()
    }
}

/// Sends each ant a random legal step, never two ants to the same cell.
#[derive(Debug, Clone)]
pub struct RandomAgent {
    colony: ColonyId,
    rng: ChaCha8Rng,
}

impl RandomAgent {
    /// Create a random agent for `colony`.
    #[must_use]
    pub fn new(colony: ColonyId, seed: u64) -> Self {
        Self {
            colony,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        "random"
    }

    fn play_turn(&mut self, _view: &[VisibleCell], _turn: u32, world: &World) -> Vec<Order> {
        let torus = world.torus();
        let mut claimed = HashSet::new();
        let mut orders = Vec::new();

        for ant in world.live_ants(self.colony) {
            let mut directions = Direction::ALL;
            directions.shuffle(&mut self.rng);
            let choice = directions.into_iter().map(|d| Order::new(ant.position, d)).find(|&order| {
                is_valid_order(world, self.colony, order) && !claimed.contains(&order.target(torus))
            });
            if let Some(order) = choice {
                claimed.insert(order.target(torus));
                orders.push(order);
            }
        }
        orders
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Rules;

    fn world(text: &str) -> World {
        World::load(text, Rules::default(), 1).unwrap()
    }

    #[test]
    fn test_lazy_agent_stays_put() {
        let w = world("players 1\nrows 1\ncols 3\nm a..\n");
        assert!(LazyAgent.play_turn(&[], 1, &w).is_empty());
    }

    #[test]
    fn test_random_orders_are_legal_and_distinct() {
        let w = world("players 2\nrows 4\ncols 4\nm aa..\nm a%..\nm ..b.\nm ....\n");
        let mut agent = RandomAgent::new(ColonyId(0), 99);
        for turn in 1..20 {
            let orders = agent.play_turn(&[], turn, &w);
            let targets: HashSet<_> = orders.iter().map(|o| o.target(w.torus())).collect();
            assert_eq!(targets.len(), orders.len());
            assert!(orders.iter().all(|&o| is_valid_order(&w, ColonyId(0), o)));
        }
    }

    #[test]
    fn test_random_agent_is_seeded() {
        let w = world("players 1\nrows 3\ncols 3\nm ...\nm .a.\nm ...\n");
        let mut a = RandomAgent::new(ColonyId(0), 5);
        let mut b = RandomAgent::new(ColonyId(0), 5);
        for turn in 1..10 {
            assert_eq!(a.play_turn(&[], turn, &w), b.play_turn(&[], turn, &w));
        }
    }

    #[test]
    fn test_walled_in_ant_has_no_order() {
        let w = world("players 1\nrows 3\ncols 3\nm .%.\nm %a%\nm .%.\n");
        let mut agent = RandomAgent::new(ColonyId(0), 1);
        assert!(agent.play_turn(&[], 1, &w).is_empty());
    }
}
