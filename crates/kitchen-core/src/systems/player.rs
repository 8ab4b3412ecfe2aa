//! Player system - movement against the host's collision and station targeting

use crate::components::{Player, Position, Station, Vec3};
use crate::error::KitchenError;
use crate::events::{EventBus, Notification};
use crate::external::SpatialQuery;
use hecs::{Entity, World};

/// Input axis magnitude needed before sliding along a wall on that axis
const SLIDE_THRESHOLD: f32 = 0.5;

/// Move the player by a 2D input (x, forward) for one tick.
///
/// When the full direction is blocked the player slides along X, then Z,
/// whichever axis is both strong enough in the input and free.
pub fn move_player(
    world: &mut World,
    player: Entity,
    input: [f32; 2],
    delta: f32,
    spatial: &dyn SpatialQuery,
) -> Result<(), KitchenError> {
    let from = world.get::<&Position>(player)?.world;
    let speed = world.get::<&Player>(player)?.move_speed;
    let direction = Vec3::from_planar(input[0], input[1]).normalize();
    let distance = speed * delta;

    let step = if direction.is_zero() || spatial.can_move(from, direction, distance) {
        direction
    } else {
        slide(from, direction, distance, spatial)
    };

    if !step.is_zero() {
        world.get::<&mut Position>(player)?.world = from + step * distance;
    }

    let mut state = world.get::<&mut Player>(player)?;
    state.walking = !direction.is_zero();
    if !direction.is_zero() {
        state.facing = direction;
    }
    Ok(())
}

fn slide(from: Vec3, direction: Vec3, distance: f32, spatial: &dyn SpatialQuery) -> Vec3 {
    let along_x = Vec3::from_planar(direction.x, 0.0).normalize();
    if direction.x.abs() > SLIDE_THRESHOLD && spatial.can_move(from, along_x, distance) {
        return along_x;
    }
    let along_z = Vec3::from_planar(0.0, direction.z).normalize();
    if direction.z.abs() > SLIDE_THRESHOLD && spatial.can_move(from, along_z, distance) {
        return along_z;
    }
    Vec3::ZERO
}

/// Ask the host what the player is facing and keep it if it is a station
pub fn update_target(
    world: &mut World,
    player: Entity,
    spatial: &dyn SpatialQuery,
    bus: &mut EventBus,
) -> Result<Option<Entity>, KitchenError> {
    let from = world.get::<&Position>(player)?.world;
    let (facing, reach) = {
        let state = world.get::<&Player>(player)?;
        (state.facing, state.reach)
    };
    let found = spatial
        .station_in_reach(from, facing, reach)
        .filter(|entity| world.get::<&Station>(*entity).is_ok());
    set_target(world, player, found, bus)?;
    Ok(found)
}

/// Select `station` directly. Publishes only when the selection changes.
pub fn set_target(
    world: &mut World,
    player: Entity,
    station: Option<Entity>,
    bus: &mut EventBus,
) -> Result<(), KitchenError> {
    let changed = {
        let mut state = world.get::<&mut Player>(player)?;
        let changed = state.target != station;
        state.target = station;
        changed
    };
    if changed {
        bus.publish(Notification::SelectedStationChanged { player, station });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Holder, StationKind};

    /// Wall along the line x = 1 and a single station straight ahead on +z
    struct WallAndCounter {
        counter: Entity,
    }

    impl SpatialQuery for WallAndCounter {
        fn can_move(&self, from: Vec3, direction: Vec3, distance: f32) -> bool {
            (from + direction * distance).x < 1.0
        }

        fn station_in_reach(&self, _from: Vec3, direction: Vec3, _reach: f32) -> Option<Entity> {
            (direction.z > 0.9).then_some(self.counter)
        }
    }

    fn setup() -> (World, Entity, Entity) {
        let mut world = World::new();
        let player = world.spawn((Player::new(7.0, 2.0), Holder::hands(), Position::new(0.0, 0.0)));
        let counter = world.spawn((Station::new(StationKind::Plain, "counter"), Holder::counter_top()));
        (world, player, counter)
    }

    fn position(world: &World, player: Entity) -> Vec3 {
        world.get::<&Position>(player).unwrap().world
    }

    #[test]
    fn test_free_movement() {
        let (mut world, player, counter) = setup();
        let spatial = WallAndCounter { counter };

        move_player(&mut world, player, [0.0, 1.0], 0.1, &spatial).unwrap();
        let pos = position(&world, player);
        assert!((pos.z - 0.7).abs() < 0.001);
        assert!(world.get::<&Player>(player).unwrap().walking);
    }

    #[test]
    fn test_slides_along_wall() {
        let (mut world, player, counter) = setup();
        let spatial = WallAndCounter { counter };
        world.get::<&mut Position>(player).unwrap().world = Vec3::from_planar(0.9, 0.0);

        // diagonal into the wall: x blocked, z strong enough to slide
        move_player(&mut world, player, [0.6, 0.8], 0.1, &spatial).unwrap();
        let pos = position(&world, player);
        assert!((pos.x - 0.9).abs() < 0.001);
        assert!((pos.z - 0.7).abs() < 0.001);
    }

    #[test]
    fn test_weak_axis_does_not_slide() {
        let (mut world, player, counter) = setup();
        let spatial = WallAndCounter { counter };
        world.get::<&mut Position>(player).unwrap().world = Vec3::from_planar(0.9, 0.0);

        move_player(&mut world, player, [0.95, 0.3], 0.1, &spatial).unwrap();
        let pos = position(&world, player);
        assert!((pos.x - 0.9).abs() < 0.001);
        assert_eq!(pos.z, 0.0);
    }

    #[test]
    fn test_no_input_stops_walking_and_keeps_facing() {
        let (mut world, player, counter) = setup();
        let spatial = WallAndCounter { counter };

        move_player(&mut world, player, [-1.0, 0.0], 0.1, &spatial).unwrap();
        move_player(&mut world, player, [0.0, 0.0], 0.1, &spatial).unwrap();
        let state = world.get::<&Player>(player).unwrap();
        assert!(!state.walking);
        assert!((state.facing.x + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_target_changes_are_published_once() {
        let (mut world, player, counter) = setup();
        let spatial = WallAndCounter { counter };
        let mut bus = EventBus::new();

        assert_eq!(update_target(&mut world, player, &spatial, &mut bus).unwrap(), Some(counter));
        assert_eq!(update_target(&mut world, player, &spatial, &mut bus).unwrap(), Some(counter));
        assert_eq!(bus.pending().len(), 1);

        move_player(&mut world, player, [-1.0, 0.0], 0.1, &spatial).unwrap();
        assert_eq!(update_target(&mut world, player, &spatial, &mut bus).unwrap(), None);
        assert_eq!(
            bus.pending().last(),
            Some(&Notification::SelectedStationChanged { player, station: None })
        );
    }

    #[test]
    fn test_non_station_hits_are_ignored() {
        let (mut world, player, _) = setup();
        let crate_box = world.spawn((Position::new(0.0, 1.0),));
        let spatial = WallAndCounter { counter: crate_box };
        let mut bus = EventBus::new();

        assert_eq!(update_target(&mut world, player, &spatial, &mut bus).unwrap(), None);
        assert!(bus.pending().is_empty());
    }
}
