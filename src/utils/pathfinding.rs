//! # Pathfinding Algorithms
//!
//! Bounded A* for monster movement, with a straight-line steering fallback.
//!
//! Paths are computed fresh on every call; nothing is cached between turns.

use crate::{Level, Position};
use pathfinding::prelude::astar;
use std::collections::HashSet;

/// Paths this long or longer are ignored in favour of steering.
pub const MAX_PATH_STEPS: usize = 25;

/// Cost of a cardinal step, scaled so diagonal costs stay integral.
const CARDINAL_COST: u32 = 1000;

/// Cost of a diagonal step; √2 rounded up so the heuristic stays admissible.
const DIAGONAL_COST: u32 = 1415;

fn heuristic(from: Position, to: Position) -> u32 {
    (from.euclidean_distance(to) * CARDINAL_COST as f64).floor() as u32
}

/// Finds a shortest 8-connected path from `from` to `to`.
///
/// Terrain that blocks movement and every position in `obstacles` is avoided,
/// except the goal itself, which may be occupied. The returned path starts at
/// `from` and ends at `to`.
///
/// # Examples
///
/// ```
/// use std::collections::HashSet;
/// use tombs::{find_path, Level, Position};
///
/// let level = Level::from_ascii(&[
///     "#####",
///     "#...#",
///     "#####",
/// ]);
/// let path = find_path(&level, &HashSet::new(), Position::new(1, 1), Position::new(3, 1)).unwrap();
/// assert_eq!(path.len(), 3);
/// ```
pub fn find_path(
    level: &Level,
    obstacles: &HashSet<Position>,
    from: Position,
    to: Position,
) -> Option<Vec<Position>> {
    let passable = |pos: Position| pos == to || (!level.is_blocked(pos) && !obstacles.contains(&pos));

    astar(
        &from,
        |&pos| {
            pos.adjacent_positions()
                .into_iter()
                .filter(|&next| passable(next))
                .map(move |next| {
                    let cost = if next.x != pos.x && next.y != pos.y {
                        DIAGONAL_COST
                    } else {
                        CARDINAL_COST
                    };
                    (next, cost)
                })
                .collect::<Vec<_>>()
        },
        |&pos| heuristic(pos, to),
        |&pos| pos == to,
    )
    .map(|(path, _cost)| path)
}

/// Unit step from `from` towards `to`, each axis rounded to -1, 0 or 1.
///
/// ```
/// use tombs::{step_towards, Position};
///
/// assert_eq!(step_towards(Position::new(0, 0), Position::new(10, 1)), Position::new(1, 0));
/// assert_eq!(step_towards(Position::new(0, 0), Position::new(5, 5)), Position::new(1, 1));
/// assert_eq!(step_towards(Position::new(3, 3), Position::new(3, 3)), Position::new(0, 0));
/// ```
pub fn step_towards(from: Position, to: Position) -> Position {
    let dx = (to.x - from.x) as f64;
    let dy = (to.y - from.y) as f64;
    let distance = (dx * dx + dy * dy).sqrt();
    if distance == 0.0 {
        return Position::origin();
    }
    Position::new((dx / distance).round() as i32, (dy / distance).round() as i32)
}

/// The move delta an actor at `from` should take to approach `to`.
///
/// Uses the A* path when one exists with fewer than [`MAX_PATH_STEPS`] steps,
/// otherwise falls back to [`step_towards`]. The caller is responsible for
/// leaving the mover's and target's positions out of `obstacles`; the fallback
/// step is not checked against terrain and must go through the normal move
/// attempt.
pub fn next_step(
    level: &Level,
    obstacles: &HashSet<Position>,
    from: Position,
    to: Position,
) -> Position {
    match find_path(level, obstacles, from, to) {
        Some(path) if path.len() >= 2 && path.len() - 1 < MAX_PATH_STEPS => path[1] - from,
        _ => step_towards(from, to),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_goes_around_wall() {
        let level = Level::from_ascii(&[
            "#######",
            "#.....#",
            "#.###.#",
            "#.....#",
            "#######",
        ]);
        let from = Position::new(1, 1);
        let to = Position::new(5, 3);
        let path = find_path(&level, &HashSet::new(), from, to).unwrap();
        assert_eq!(path.first(), Some(&from));
        assert_eq!(path.last(), Some(&to));
        assert!(path.iter().all(|pos| !level.is_blocked(*pos)));
    }

    #[test]
    fn test_diagonal_is_preferred() {
        let level = Level::from_ascii(&["#####", "#...#", "#...#", "#...#", "#####"]);
        let step = next_step(&level, &HashSet::new(), Position::new(1, 1), Position::new(3, 3));
        assert_eq!(step, Position::new(1, 1));
    }

    #[test]
    fn test_obstacles_are_avoided_but_goal_is_allowed() {
        let level = Level::from_ascii(&["#####", "#...#", "#...#", "#####"]);
        let mut obstacles = HashSet::new();
        obstacles.insert(Position::new(2, 1));
        obstacles.insert(Position::new(3, 1));

        let path = find_path(&level, &obstacles, Position::new(1, 1), Position::new(3, 1)).unwrap();
        assert!(!path.contains(&Position::new(2, 1)));
        assert_eq!(path.last(), Some(&Position::new(3, 1)));
    }

    #[test]
    fn test_unreachable_target_steers() {
        let level = Level::from_ascii(&["#######", "#..#..#", "#######"]);
        let step = next_step(&level, &HashSet::new(), Position::new(1, 1), Position::new(5, 1));
        assert_eq!(step, Position::new(1, 0));
    }

    #[test]
    fn test_long_path_steers() {
        // Corridor that doubles back: the direct line is walled off
        let mut rows = vec!["#".repeat(32)];
        rows.push(format!("#{}#", ".".repeat(30)));
        rows.push(format!("{}.#", "#".repeat(30)));
        rows.push(format!("#{}#", ".".repeat(30)));
        rows.push("#".repeat(32));
        let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
        let level = Level::from_ascii(&rows);

        let from = Position::new(1, 1);
        let to = Position::new(1, 3);
        let path = find_path(&level, &HashSet::new(), from, to).unwrap();
        assert!(path.len() - 1 >= MAX_PATH_STEPS);

        // Steering heads straight for the target through the wall
        assert_eq!(next_step(&level, &HashSet::new(), from, to), Position::new(0, 1));
    }
}
