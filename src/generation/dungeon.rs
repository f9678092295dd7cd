//! # Dungeon Generation
//!
//! Room-and-tunnel level layout.
//!
//! Rooms are placed by rejection sampling: each attempt draws a random size
//! and position and is discarded if it touches an accepted room. Every
//! accepted room after the first is tunnelled to the previous one, so all
//! rooms form a single chain reachable from the player start.

use crate::{
    place_items, place_monsters, Entity, GeneratedLevel, GenerationConfig, Generator, Level,
    Position, Room, TombsError, TombsResult,
};
use log::{debug, info, warn};
use pathfinding::prelude::bfs_reach;
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::HashSet;

/// Primary dungeon generator using the room-and-tunnel algorithm.
#[derive(Debug, Clone, Default)]
pub struct RoomCorridorGenerator;

impl RoomCorridorGenerator {
    /// Creates a new dungeon generator.
    ///
    /// # Examples
    ///
    /// ```
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    /// use tombs::{GenerationConfig, Generator, RoomCorridorGenerator};
    ///
    /// let config = GenerationConfig::for_testing(3);
    /// let mut rng = StdRng::seed_from_u64(config.seed);
    /// let generated = RoomCorridorGenerator::new().generate(&config, 1, &mut rng).unwrap();
    /// assert!(!generated.level.is_blocked(generated.player_start));
    /// ```
    pub fn new() -> Self {
        Self
    }

    /// Draws one candidate room, or `None` if the map is too small for it.
    fn room_candidate(&self, config: &GenerationConfig, rng: &mut StdRng) -> Option<Room> {
        let width = rng.gen_range(config.min_room_size..=config.max_room_size);
        let height = rng.gen_range(config.min_room_size..=config.max_room_size);

        let max_x = config.width as i64 - width as i64 - 1;
        let max_y = config.height as i64 - height as i64 - 1;
        if max_x < 0 || max_y < 0 {
            return None;
        }

        let x = rng.gen_range(0..=max_x as i32);
        let y = rng.gen_range(0..=max_y as i32);
        Some(Room::new(x, y, width, height))
    }

    fn carve_room(&self, level: &mut Level, room: &Room) {
        for pos in room.interior() {
            level.carve(pos);
        }
    }

    fn carve_h_tunnel(&self, level: &mut Level, x1: i32, x2: i32, y: i32) {
        for x in x1.min(x2)..=x1.max(x2) {
            level.carve(Position::new(x, y));
        }
    }

    fn carve_v_tunnel(&self, level: &mut Level, y1: i32, y2: i32, x: i32) {
        for y in y1.min(y2)..=y1.max(y2) {
            level.carve(Position::new(x, y));
        }
    }

    /// Joins two points with an L-shaped tunnel, bending either way at random.
    fn connect(&self, level: &mut Level, from: Position, to: Position, rng: &mut StdRng) {
        if rng.gen_bool(0.5) {
            self.carve_h_tunnel(level, from.x, to.x, from.y);
            self.carve_v_tunnel(level, from.y, to.y, to.x);
        } else {
            self.carve_v_tunnel(level, from.y, to.y, from.x);
            self.carve_h_tunnel(level, from.x, to.x, to.y);
        }
    }
}

impl Generator<GeneratedLevel> for RoomCorridorGenerator {
    fn generate(
        &self,
        config: &GenerationConfig,
        depth: u32,
        rng: &mut StdRng,
    ) -> TombsResult<GeneratedLevel> {
        config.validate()?;

        let mut level = Level::new(config.width, config.height);
        let mut rooms: Vec<Room> = Vec::new();
        let mut entities: Vec<Entity> = Vec::new();
        let mut player_start = None;

        for _ in 0..config.max_rooms {
            let Some(room) = self.room_candidate(config, rng) else {
                continue;
            };
            if rooms.iter().any(|other| room.intersects(other)) {
                continue;
            }

            self.carve_room(&mut level, &room);
            let center = room.center();
            match rooms.last() {
                None => player_start = Some(center),
                Some(previous) => self.connect(&mut level, previous.center(), center, rng),
            }

            let start = player_start.unwrap_or(center);
            place_monsters(&room, depth, &level, &mut entities, start, rng);
            place_items(&room, depth, &level, &mut entities, start, rng);

            debug!("Accepted room {} at {:?}", rooms.len(), room);
            rooms.push(room);
        }

        let (player_start, stairs_position) = match (player_start, rooms.last()) {
            (Some(start), Some(last)) => (start, last.center()),
            _ => {
                let center = Position::new(config.width as i32 / 2, config.height as i32 / 2);
                warn!(
                    "No rooms could be placed on a {}x{} level; opening a single tile at {:?}",
                    config.width, config.height, center
                );
                level.carve(center);
                (center, center)
            }
        };

        let stairs = Entity::stairs(stairs_position);
        let stairs_id = stairs.id;
        entities.insert(0, stairs);

        info!(
            "Generated depth {} with {} rooms and {} entities",
            depth,
            rooms.len(),
            entities.len()
        );

        let generated = GeneratedLevel {
            level,
            entities,
            player_start,
            stairs_position,
            stairs_id,
        };
        self.validate(&generated, config)?;
        Ok(generated)
    }

    /// Checks that every open tile is reachable from the player start.
    fn validate(&self, generated: &GeneratedLevel, _config: &GenerationConfig) -> TombsResult<()> {
        let level = &generated.level;
        if level.is_blocked(generated.player_start) {
            return Err(TombsError::GenerationFailed(
                "Player start is not an open tile".to_string(),
            ));
        }

        let reachable: HashSet<Position> = bfs_reach(generated.player_start, |pos| {
            pos.cardinal_adjacent_positions()
                .into_iter()
                .filter(|next| !level.is_blocked(*next))
                .collect::<Vec<_>>()
        })
        .collect();

        if let Some(pos) = level.open_positions().find(|pos| !reachable.contains(pos)) {
            return Err(TombsError::GenerationFailed(format!(
                "Tile {:?} is not connected to the player start",
                pos
            )));
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "RoomCorridorGenerator"
    }
}
