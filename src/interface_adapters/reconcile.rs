// Normalization and merge between wire items and the local tank. Pure
// functions, no store access: the dispatcher feeds the results in.

use rand::Rng;

use crate::domain::theme::{ThemeAiSettings, ThemeAssets, ThemeConfig, ThemeGameRules};
use crate::domain::{GameItem, GamePhase, ItemSeed, Position, Velocity};
use crate::frameworks::config::{BOUNDS_X, BOUNDS_Y, ROTATION_DEGREES, SCALE, VELOCITY_VX, VELOCITY_VY};
use crate::interface_adapters::protocol::{WireItem, WireTheme};

/// Converts a wire item into a complete `GameItem`. Missing or non-finite
/// numeric fields are randomized per field within the tank ranges, so a
/// half-broken payload still yields a fish that swims.
pub fn normalize(wire: WireItem) -> GameItem {
    let mut rng = rand::thread_rng();

    let x = wire
        .x
        .filter(|v| v.is_finite())
        .unwrap_or_else(|| rng.gen_range(BOUNDS_X));
    let y = wire
        .y
        .filter(|v| v.is_finite())
        .unwrap_or_else(|| rng.gen_range(BOUNDS_Y));

    let direction: f32 = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    let vx = wire
        .vx
        .filter(|v| v.is_finite())
        .unwrap_or_else(|| direction * rng.gen_range(VELOCITY_VX));
    let vy = wire
        .vy
        .filter(|v| v.is_finite())
        .unwrap_or_else(|| rng.gen_range(VELOCITY_VY));

    let rotation = wire
        .rotation
        .filter(|v| v.is_finite())
        .unwrap_or_else(|| rng.gen_range(ROTATION_DEGREES));
    let scale = wire
        .scale
        .filter(|v| v.is_finite())
        .unwrap_or_else(|| rng.gen_range(SCALE));

    ItemSeed {
        id: wire.id,
        image_url: wire.image_url,
        name: wire.name,
        description: wire.description,
        author: wire.author,
        is_ai: wire.is_ai,
        created_at: wire.created_at,
        position: Some(Position { x, y }),
        velocity: Some(Velocity { vx, vy }),
        rotation: Some(rotation),
        scale: Some(scale),
        flip_x: wire.flip_x,
        comments: Some(wire.comments.into_iter().map(Into::into).collect()),
    }
    .materialize()
}

/// Merges the server's item list into the local one. The server wins on any
/// id present in both; local items absent from the snapshot survive (the
/// backend prunes lazily and a snapshot may race a local add). Remote
/// ordering comes first.
pub fn merge(local: Vec<GameItem>, remote: Vec<GameItem>) -> Vec<GameItem> {
    let mut merged = remote;
    for item in local {
        if !merged.iter().any(|r| r.id == item.id) {
            merged.push(item);
        }
    }
    merged
}

/// Wire phase strings onto the phase enum.
pub fn map_phase(raw: &str) -> GamePhase {
    GamePhase::from_wire(raw)
}

pub fn convert_theme(wire: WireTheme) -> ThemeConfig {
    let defaults = ThemeGameRules::default();
    ThemeConfig {
        theme_id: wire.theme_id.unwrap_or_default(),
        theme_name: wire.theme_name.unwrap_or_default(),
        assets: ThemeAssets {
            background_url: wire.background_url.unwrap_or_default(),
            particle_effect: wire.particle_effect,
        },
        palette: wire.palette,
        ai_settings: ThemeAiSettings {
            keywords: wire.keywords,
            prompt_style: wire.prompt_style.unwrap_or_default(),
        },
        game_rules: ThemeGameRules {
            spawn_rate: wire.spawn_rate.unwrap_or(defaults.spawn_rate),
            max_imposters: wire.max_imposters.unwrap_or(defaults.max_imposters),
        },
    }
}
