// Domain-level tank entities: submitted drawings and their presentation state.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::frameworks::config::{
    BOUNDS_X, BOUNDS_Y, ROTATION_DEGREES, SCALE, VELOCITY_VX, VELOCITY_VY,
};

pub const DEFAULT_AUTHOR: &str = "Anonymous artist";

/// Position of a fish inside the tank, in stage coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// Swim velocity of a fish, stage units per tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub vx: f32,
    pub vy: f32,
}

/// A comment left on a drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub author: String,
    pub content: String,
}

/// The atomic game entity: one submitted drawing ("fish").
///
/// `id` is globally unique within a session and assigned by whichever side
/// first creates the item (client for local submissions, server for the
/// authoritative echo). `is_ai` is never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct GameItem {
    pub id: String,
    pub image_url: String,
    pub name: String,
    pub description: String,
    pub author: String,
    pub is_ai: bool,
    /// Unix millis at creation time.
    pub created_at: u64,
    pub position: Position,
    pub velocity: Velocity,
    pub rotation: f32,
    pub scale: f32,
    pub flip_x: bool,
    pub comments: Vec<Comment>,
}

/// Creation payload for a new item. Every field is optional; the store fills
/// gaps with randomized defaults so the engine never sees partial data.
#[derive(Debug, Clone, Default)]
pub struct ItemSeed {
    pub id: Option<String>,
    pub image_url: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub is_ai: bool,
    pub created_at: Option<u64>,
    pub position: Option<Position>,
    pub velocity: Option<Velocity>,
    pub rotation: Option<f32>,
    pub scale: Option<f32>,
    pub flip_x: Option<bool>,
    pub comments: Option<Vec<Comment>>,
}

impl ItemSeed {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn impostor(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            is_ai: true,
            ..Self::default()
        }
    }

    /// Turns the seed into a complete item, randomizing whatever is missing
    /// within the configured tank ranges. A wire item and a locally created
    /// one are indistinguishable after this.
    pub fn materialize(self) -> GameItem {
        let mut rng = rand::thread_rng();
        // Coin flip decides the horizontal swim direction for defaults.
        let direction: f32 = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };

        let velocity = self.velocity.unwrap_or_else(|| Velocity {
            vx: direction * rng.gen_range(VELOCITY_VX),
            vy: rng.gen_range(VELOCITY_VY),
        });

        GameItem {
            id: self.id.unwrap_or_else(generate_item_id),
            image_url: self.image_url.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            author: self
                .author
                .filter(|author| !author.is_empty())
                .unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
            is_ai: self.is_ai,
            created_at: self.created_at.unwrap_or_else(now_millis),
            position: self.position.unwrap_or_else(|| Position {
                x: rng.gen_range(BOUNDS_X),
                y: rng.gen_range(BOUNDS_Y),
            }),
            velocity,
            rotation: self.rotation.unwrap_or_else(|| rng.gen_range(ROTATION_DEGREES)),
            scale: self.scale.unwrap_or_else(|| rng.gen_range(SCALE)),
            // Fish sprites face right; a leftward swimmer gets mirrored.
            flip_x: self.flip_x.unwrap_or(velocity.vx < 0.0),
            comments: self.comments.unwrap_or_default(),
        }
    }
}

/// Unix millis for item timestamps.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Generates a session-unique item id for locally created submissions.
/// The random suffix avoids collisions when several items are created within
/// the same millisecond.
pub fn generate_item_id() -> String {
    let suffix: u32 = rand::thread_rng().r#gen();
    format!("{}-{:08x}", now_millis(), suffix)
}

impl From<GameItem> for ItemSeed {
    fn from(item: GameItem) -> Self {
        Self {
            id: Some(item.id),
            image_url: Some(item.image_url),
            name: Some(item.name),
            description: Some(item.description),
            author: Some(item.author),
            is_ai: item.is_ai,
            created_at: Some(item.created_at),
            position: Some(item.position),
            velocity: Some(item.velocity),
            rotation: Some(item.rotation),
            scale: Some(item.scale),
            flip_x: Some(item.flip_x),
            comments: Some(item.comments),
        }
    }
}

/// Partial mutation for an existing item. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub position: Option<Position>,
    pub velocity: Option<Velocity>,
    pub rotation: Option<f32>,
    pub scale: Option<f32>,
    pub flip_x: Option<bool>,
    pub comments: Option<Vec<Comment>>,
}
