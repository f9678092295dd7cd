//! # Render Snapshot
//!
//! A read-only picture of everything a front-end may draw.
//!
//! The snapshot only contains what the player knows about: tile flags for the
//! whole map, but entities only where they are currently visible (or, for
//! always-visible entities such as stairs, remembered). Entities come out in
//! draw order, back to front.

use crate::{
    Color, EntityId, GameState, Message, PlayState, Position, RenderOrder, Slot, TombsResult,
};

/// How one map cell should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileView {
    /// In the player's field of view right now
    pub visible: bool,
    /// Seen at some point on this level
    pub explored: bool,
    /// Blocks sight
    pub wall: bool,
}

/// A drawable entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityView {
    pub id: EntityId,
    pub position: Position,
    pub glyph: char,
    pub color: Color,
    pub name: String,
    pub render_order: RenderOrder,
}

/// Player numbers for the status panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerStats {
    pub hp: i32,
    pub max_hp: i32,
    pub power: i32,
    pub defence: i32,
    pub level: u32,
    pub xp: i32,
    /// Experience needed for the next level
    pub xp_to_next: i32,
}

/// One carried item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryEntry {
    pub id: EntityId,
    pub name: String,
    /// Slot the item is worn in, if equipped
    pub equipped: Option<Slot>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderSnapshot {
    pub width: u32,
    pub height: u32,
    /// Indexed `[y][x]`
    pub tiles: Vec<Vec<TileView>>,
    /// Drawable entities, back to front
    pub entities: Vec<EntityView>,
    /// Message log, oldest first
    pub messages: Vec<Message>,
    pub player: PlayerStats,
    pub player_position: Position,
    pub inventory: Vec<InventoryEntry>,
    pub depth: u32,
    pub turn_number: u64,
    pub play_state: PlayState,
}

impl RenderSnapshot {
    pub fn tile(&self, pos: Position) -> Option<&TileView> {
        if pos.x < 0 || pos.y < 0 {
            return None;
        }
        self.tiles.get(pos.y as usize)?.get(pos.x as usize)
    }

    /// The entity drawn on top at a position.
    pub fn top_entity_at(&self, pos: Position) -> Option<&EntityView> {
        self.entities.iter().rev().find(|entity| entity.position == pos)
    }
}

impl GameState {
    /// Captures what the player can currently see and knows.
    ///
    /// # Examples
    ///
    /// ```
    /// use tombs::{GameState, GenerationConfig};
    ///
    /// let game = GameState::new_game(GenerationConfig::for_testing(2)).unwrap();
    /// let snapshot = game.render_snapshot().unwrap();
    ///
    /// // The player is always drawn last
    /// assert_eq!(snapshot.entities.last().unwrap().id, game.player_id);
    /// assert_eq!(snapshot.player.hp, 100);
    /// ```
    pub fn render_snapshot(&self) -> TombsResult<RenderSnapshot> {
        let tiles = (0..self.level.height as i32)
            .map(|y| {
                (0..self.level.width as i32)
                    .map(|x| {
                        let pos = Position::new(x, y);
                        TileView {
                            visible: self.is_visible(pos),
                            explored: self.level.is_explored(pos),
                            wall: self.level.blocks_sight(pos),
                        }
                    })
                    .collect()
            })
            .collect();

        let mut drawable: Vec<_> = self
            .entities
            .iter()
            .filter(|entity| {
                self.is_visible(entity.position)
                    || (entity.always_visible && self.level.is_explored(entity.position))
            })
            .collect();
        // Stable, so collection order breaks ties within a layer
        drawable.sort_by_key(|entity| (entity.render_order, entity.id == self.player_id));
        let entities = drawable
            .into_iter()
            .map(|entity| EntityView {
                id: entity.id,
                position: entity.position,
                glyph: entity.glyph,
                color: entity.color,
                name: entity.name.clone(),
                render_order: entity.render_order,
            })
            .collect();

        let fighter = self.player_fighter()?;
        let player = PlayerStats {
            hp: fighter.hp,
            max_hp: self.max_hp(self.player_id).unwrap_or(fighter.base_max_hp),
            power: self.power(self.player_id).unwrap_or(fighter.base_power),
            defence: self.defence(self.player_id).unwrap_or(fighter.base_defence),
            level: fighter.level,
            xp: fighter.xp,
            xp_to_next: fighter.level_up_threshold(),
        };

        let inventory = self
            .inventory
            .iter()
            .map(|item| InventoryEntry {
                id: item.id,
                name: item.name.clone(),
                equipped: item
                    .equipment
                    .filter(|equipment| equipment.is_equipped)
                    .map(|equipment| equipment.slot),
            })
            .collect();

        Ok(RenderSnapshot {
            width: self.level.width,
            height: self.level.height,
            tiles,
            entities,
            messages: self.messages.iter().cloned().collect(),
            player,
            player_position: self.player_position()?,
            inventory,
            depth: self.depth,
            turn_number: self.turn_number,
            play_state: self.play_state,
        })
    }
}
