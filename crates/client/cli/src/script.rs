//! Scripted opening used by the headless client.
use maze_core::{Facing, Position, SimSnapshot};
use maze_runtime::{InputFrame, ScriptedInput};

const MELEE_SLOT: usize = 0;
const DASH_SLOT: usize = 1;
const MAGIC_SLOT: usize = 2;

/// Frames spent aiming before the area cast is committed.
const AIM_HOLD: usize = 20;
const SWING_INTERVAL: usize = 25;
const SWINGS: usize = 6;

/// Aims an area cast at the nearest enemy, commits it, dashes toward that
/// enemy and then swings at whatever is in front of the player.
pub fn encounter(opening: &SimSnapshot) -> ScriptedInput {
    let origin = opening.player.position;
    let Some(target) = opening
        .enemies
        .iter()
        .min_by_key(|enemy| enemy.position.distance_squared(origin))
        .map(|enemy| enemy.position)
    else {
        return ScriptedInput::new(Vec::new());
    };
    let facing = facing_toward(origin, target);

    let mut frames = vec![
        InputFrame::press(MAGIC_SLOT)
            .with_aim(target)
            .with_pose(origin, facing),
    ];
    frames.extend(std::iter::repeat_n(InputFrame::idle(), AIM_HOLD));
    frames.push(InputFrame::press(MAGIC_SLOT));
    frames.push(InputFrame::press(DASH_SLOT));
    for _ in 0..SWINGS {
        frames.extend(std::iter::repeat_n(InputFrame::idle(), SWING_INTERVAL));
        frames.push(InputFrame::press(MELEE_SLOT));
    }
    ScriptedInput::new(frames)
}

/// Cardinal facing along the dominant axis; vertical wins ties.
fn facing_toward(from: Position, to: Position) -> Facing {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if dx.abs() > dy.abs() {
        if dx > 0 { Facing::Right } else { Facing::Left }
    } else if dy > 0 {
        Facing::Up
    } else {
        Facing::Down
    }
}
