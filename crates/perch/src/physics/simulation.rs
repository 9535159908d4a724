//! # Simulation — One Physics Tick
//!
//! [`Simulation`] holds everything about the physics that isn't per-body:
//! drag, gravity, the broad-phase [`CollisionMap`], the fixed-step clock and
//! the queue collision callbacks write into. Two simulations never share
//! state, so tests can run as many as they like side by side.
//!
//! ## The Tick
//!
//! ```text
//! step(world, dt):
//!   take Physics + Position stores out of the world
//!   ┌ broad phase ───────────────────────────────────────────────┐
//!   │ clear map; mark every solid or observed body by its slot   │
//!   └────────────────────────────────────────────────────────────┘
//!   for each body P in store order:
//!     integrate P (gravity, drag, velocity)        unless fixed
//!     for each other body O in P's cells, O > P, once:
//!       narrow phase → normal
//!       P's callbacks(O), O's callbacks(P)         always
//!       resolve                                    unless both fixed / either non-solid
//!   put the stores back
//!   apply queued commands                          sync point
//! ```
//!
//! Only the lower identity of a pair runs the test, so each touching pair is
//! seen once per tick. P moves before it is tested, so contacts use P's new
//! position.
//!
//! ## Slot Validity
//!
//! Buckets store dense slots into the `Physics` store. Nothing can insert into
//! or remove from that store mid-tick: it's out of the world, and callbacks
//! only get a [`Commands`] queue, which runs after the stores are back.

use std::ops::AddAssign;

use crate::components::Position;
use crate::ecs::{Commands, ComponentSet, Entity, World};
use crate::error::{CollisionMapError, ConfigError, EcsError};
use crate::math::{IVec2, Vec2};
use crate::time::FixedTimestep;

use super::body::{Physics, collides, resolve_collision};
use super::collision_map::{BodySlot, CollisionMap};
use super::config::{PhysicsConfig, check_drag, check_gravity};

/// Counters from one or more ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Ticks run.
    pub steps: u32,
    /// Bodies iterated.
    pub bodies: usize,
    /// Bodies marked into the broad phase.
    pub indexed: usize,
    /// Narrow-phase tests run.
    pub candidates: usize,
    /// Tests that found an overlap.
    pub contacts: usize,
    /// Contacts that moved something.
    pub resolved: usize,
    /// Deferred commands applied after the tick.
    pub commands: usize,
    /// Of those, how many failed (logged as warnings).
    pub failed_commands: usize,
}

impl AddAssign for StepStats {
    fn add_assign(&mut self, rhs: Self) {
        self.steps += rhs.steps;
        self.bodies += rhs.bodies;
        self.indexed += rhs.indexed;
        self.candidates += rhs.candidates;
        self.contacts += rhs.contacts;
        self.resolved += rhs.resolved;
        self.commands += rhs.commands;
        self.failed_commands += rhs.failed_commands;
    }
}

/// The physics context: parameters, broad phase and clock.
#[derive(Debug)]
pub struct Simulation {
    drag: f32,
    gravity: f32,
    map: CollisionMap,
    timestep: FixedTimestep,
    commands: Commands,
}

impl Simulation {
    /// A simulation with [`PhysicsConfig::default`] settings.
    pub fn new() -> Self {
        Self::from_config(&PhysicsConfig::default())
            .unwrap_or_else(|err| panic!("default physics config rejected: {err}"))
    }

    pub fn from_config(config: &PhysicsConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut map = CollisionMap::new();
        map.configure(config.cell_scale, config.grid_dims, config.grid_offset)
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;
        Ok(Self {
            drag: config.drag,
            gravity: config.gravity,
            map,
            timestep: FixedTimestep::new(config.fixed_dt)
                .with_max_frame_delta(config.max_frame_delta),
            commands: Commands::new(),
        })
    }

    // ── Parameters ───────────────────────────────────────────────────

    /// Replace the broad-phase grid.
    pub fn configure(
        &mut self,
        cell_scale: f32,
        dims: IVec2,
        offset: IVec2,
    ) -> Result<(), CollisionMapError> {
        self.map.configure(cell_scale, dims, offset)
    }

    /// Velocity multiplier per second for bodies with `has_drag`. Rejects
    /// the same values [`PhysicsConfig::validate`] does.
    pub fn set_drag(&mut self, drag: f32) -> Result<(), ConfigError> {
        check_drag(drag)?;
        log::debug!("drag {} -> {}", self.drag, drag);
        self.drag = drag;
        Ok(())
    }

    /// Subtracted from `velocity.y` of every movable body each tick.
    pub fn set_gravity(&mut self, gravity: f32) -> Result<(), ConfigError> {
        check_gravity(gravity)?;
        log::debug!("gravity {} -> {}", self.gravity, gravity);
        self.gravity = gravity;
        Ok(())
    }

    pub fn drag(&self) -> f32 {
        self.drag
    }

    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    /// Switch gravity between zero and `on`. Returns the new value.
    pub fn toggle_gravity(&mut self, on: f32) -> Result<f32, ConfigError> {
        let next = if self.gravity == 0.0 { on } else { 0.0 };
        self.set_gravity(next)?;
        Ok(next)
    }

    pub fn map(&self) -> &CollisionMap {
        &self.map
    }

    pub fn timestep(&self) -> &FixedTimestep {
        &self.timestep
    }

    // ── Ticking ──────────────────────────────────────────────────────

    /// Bank `frame_dt` and run however many fixed steps are due.
    ///
    /// A step is only paid out of the bank once it has run. If one fails, it
    /// and the rest stay banked for the next call.
    pub fn advance(&mut self, world: &mut World, frame_dt: f32) -> Result<StepStats, EcsError> {
        self.timestep.bank(frame_dt);
        let dt = self.timestep.step();
        let mut total = StepStats::default();
        while self.timestep.is_due() {
            total += self.step(world, dt)?;
            self.timestep.consume();
        }
        Ok(total)
    }

    /// Run one tick of `dt` seconds.
    ///
    /// Fails with [`EcsError::MissingComponent`] if any `Physics` entity has
    /// no `Position`. The check runs before anything moves.
    pub fn step(&mut self, world: &mut World, dt: f32) -> Result<StepStats, EcsError> {
        let mut bodies = world.take_store::<Physics>();
        let mut positions = world.take_store::<Position>();

        let mut position_slots = Vec::with_capacity(bodies.len());
        let mut missing = None;
        for (entity, _) in bodies.iter() {
            match positions.slot_of(entity) {
                Some(slot) => position_slots.push(slot),
                None => {
                    missing = Some(entity);
                    break;
                }
            }
        }
        if let Some(entity) = missing {
            world.restore_store(positions);
            world.restore_store(bodies);
            return Err(EcsError::missing::<Position>(entity));
        }

        let mut stats = self.tick(&mut bodies, &mut positions, &position_slots, dt);

        world.restore_store(positions);
        world.restore_store(bodies);
        stats.commands = self.commands.apply(world);
        stats.failed_commands = self.commands.take_errors().len();

        log::trace!("physics step: {:?}", stats);
        Ok(stats)
    }

    /// Rebuild the broad phase from the world as it stands, without moving
    /// anything. Returns how many bodies were indexed.
    pub fn rebuild(&mut self, world: &World) -> Result<usize, EcsError> {
        let Some(bodies) = world.store::<Physics>() else {
            self.map.clear();
            return Ok(0);
        };
        let mut placed = Vec::with_capacity(bodies.len());
        for (slot, (entity, body)) in bodies.iter().enumerate() {
            let position = world.try_get::<Position>(entity)?;
            placed.push((slot, entity, position.xy(), body));
        }
        Ok(self.index_bodies(placed))
    }

    fn index_bodies<'a>(
        &mut self,
        placed: impl IntoIterator<Item = (BodySlot, Entity, Vec2, &'a Physics)>,
    ) -> usize {
        self.map.clear();
        let mut indexed = 0;
        for (slot, entity, center, body) in placed {
            if !body.is_indexed() {
                continue;
            }
            let (minima, maxima) = self.map.cell_range(center, body.half_extents);
            if !self.map.overlaps_grid(minima, maxima) {
                log::warn!("body {} at {} is outside the collision grid", entity, center);
            }
            match self.map.mark(minima, maxima, slot) {
                Ok(()) => indexed += 1,
                Err(err) => log::warn!("body {} not indexed: {}", entity, err),
            }
        }
        indexed
    }

    fn tick(
        &mut self,
        bodies: &mut ComponentSet<Physics>,
        positions: &mut ComponentSet<Position>,
        position_slots: &[usize],
        dt: f32,
    ) -> StepStats {
        let mut stats = StepStats {
            steps: 1,
            bodies: bodies.len(),
            ..StepStats::default()
        };

        let placed: Vec<_> = bodies
            .iter()
            .enumerate()
            .map(|(slot, (entity, body))| {
                let center = positions.entry(position_slots[slot]).1.xy();
                (slot, entity, center, body)
            })
            .collect();
        stats.indexed = self.index_bodies(placed);

        let mut tested: Vec<BodySlot> = Vec::new();
        for slot in 0..bodies.len() {
            let (entity, center, half_extents) = {
                let (entity, body) = bodies.entry_mut(slot);
                let position = positions.entry_mut(position_slots[slot]).1;
                if !body.fixed {
                    body.velocity.y -= self.gravity;
                    if body.has_drag {
                        body.velocity *= self.drag.powf(dt);
                    }
                    position.set_xy(position.xy() + body.velocity * dt);
                }
                (entity, position.xy(), body.half_extents)
            };

            let (minima, maxima) = self.map.cell_range(center, half_extents);
            let Some((minima, maxima)) = self.map.clamp_range(minima, maxima) else {
                continue;
            };
            tested.clear();
            for y in minima.y..=maxima.y {
                for x in minima.x..=maxima.x {
                    let Ok(Some(bucket)) = self.map.bucket_at(IVec2::new(x, y)) else {
                        continue;
                    };
                    for &other_slot in bucket {
                        let other = bodies.entry(other_slot).0;
                        if other <= entity || tested.contains(&other_slot) {
                            continue;
                        }
                        tested.push(other_slot);
                        stats.candidates += 1;

                        let this_box = bodies
                            .entry(slot)
                            .1
                            .aabb(positions.entry(position_slots[slot]).1.xy());
                        let other_box = bodies
                            .entry(other_slot)
                            .1
                            .aabb(positions.entry(position_slots[other_slot]).1.xy());
                        let Some(normal) = collides(&this_box, &other_box) else {
                            continue;
                        };
                        stats.contacts += 1;

                        bodies.entry_mut(slot).1.notify(other, &mut self.commands);
                        bodies.entry_mut(other_slot).1.notify(entity, &mut self.commands);

                        let (body, other_body) = bodies.pair_mut(slot, other_slot);
                        if !body.resolves_with(other_body) {
                            continue;
                        }
                        let (position, other_position) =
                            positions.pair_mut(position_slots[slot], position_slots[other_slot]);
                        resolve_collision(body, position, other_body, other_position, normal);
                        stats.resolved += 1;
                    }
                }
            }
        }
        stats
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::components::{Alignment, Sprite, Status};

    const EPS: f32 = 1e-6;

    fn spawn_body(world: &mut World, x: f32, y: f32, body: Physics) -> Entity {
        world
            .build()
            .insert(Position::new(x, y))
            .insert(body)
            .finish()
            .into_entity()
    }

    type ContactLog = Rc<RefCell<Vec<Entity>>>;

    fn recorder() -> (ContactLog, impl FnMut(Entity, &mut Commands) + 'static) {
        let log: ContactLog = Rc::default();
        let sink = Rc::clone(&log);
        (log, move |other: Entity, _: &mut Commands| {
            sink.borrow_mut().push(other)
        })
    }

    #[test]
    fn fixed_wall_displaces_movable_body_only() {
        let mut world = World::new();
        let mut sim = Simulation::new();
        let ball = spawn_body(&mut world, 0.0, 0.15, Physics::new(Vec2::splat(0.1)));
        let wall = spawn_body(&mut world, 0.0, 0.0, Physics::fixed(Vec2::new(1.0, 0.1)));

        let stats = sim.step(&mut world, 1.0 / 60.0).unwrap();
        assert_eq!(stats.contacts, 1);
        assert_eq!(stats.resolved, 1);
        assert!((world.get::<Position>(ball).xy().y - 0.2).abs() < EPS);
        assert_eq!(world.get::<Position>(wall).xy(), Vec2::ZERO);
    }

    #[test]
    fn wall_spawned_first_still_pushes_ball() {
        let mut world = World::new();
        let mut sim = Simulation::new();
        let wall = spawn_body(&mut world, 0.0, 0.0, Physics::fixed(Vec2::new(1.0, 0.1)));
        let ball = spawn_body(&mut world, 0.0, 0.15, Physics::new(Vec2::splat(0.1)));

        sim.step(&mut world, 1.0 / 60.0).unwrap();
        assert!((world.get::<Position>(ball).xy().y - 0.2).abs() < EPS);
        assert_eq!(world.get::<Position>(wall).xy(), Vec2::ZERO);
    }

    #[test]
    fn callbacks_fire_once_per_pair_regardless_of_solidity() {
        let mut world = World::new();
        let mut sim = Simulation::new();
        let (a_log, a_cb) = recorder();
        let (b_log, b_cb) = recorder();
        let ghost = || Physics::new(Vec2::splat(0.1)).non_solid();
        let a = spawn_body(&mut world, 0.0, 0.0, ghost().on_collide(a_cb));
        let b = spawn_body(&mut world, 0.15, 0.0, ghost().on_collide(b_cb));

        let stats = sim.step(&mut world, 1.0 / 60.0).unwrap();
        assert_eq!(*a_log.borrow(), vec![b]);
        assert_eq!(*b_log.borrow(), vec![a]);
        assert_eq!(stats.contacts, 1);
        assert_eq!(stats.resolved, 0);
        // Non-solid: nobody moved.
        assert_eq!(world.get::<Position>(a).xy(), Vec2::ZERO);
        assert_eq!(world.get::<Position>(b).xy(), Vec2::new(0.15, 0.0));

        sim.step(&mut world, 1.0 / 60.0).unwrap();
        assert_eq!(a_log.borrow().len(), 2);
        assert_eq!(b_log.borrow().len(), 2);
    }

    #[test]
    fn callbacks_fire_between_fixed_bodies() {
        let mut world = World::new();
        let mut sim = Simulation::new();
        let (log, cb) = recorder();
        spawn_body(&mut world, 0.0, 0.0, Physics::fixed(Vec2::splat(0.1)).on_collide(cb));
        let other = spawn_body(&mut world, 0.1, 0.0, Physics::fixed(Vec2::splat(0.1)));

        let stats = sim.step(&mut world, 0.1).unwrap();
        assert_eq!(*log.borrow(), vec![other]);
        assert_eq!(stats.resolved, 0);
        assert_eq!(world.get::<Position>(other).xy(), Vec2::new(0.1, 0.0));
    }

    #[test]
    fn separated_bodies_do_not_collide() {
        let mut world = World::new();
        let mut sim = Simulation::new();
        let (log, cb) = recorder();
        spawn_body(&mut world, 0.0, 0.0, Physics::new(Vec2::splat(0.1)).on_collide(cb));
        spawn_body(&mut world, 0.25, 0.0, Physics::new(Vec2::splat(0.1)));

        let stats = sim.step(&mut world, 0.1).unwrap();
        assert!(log.borrow().is_empty());
        assert_eq!(stats.contacts, 0);
        // Neighbouring cells make them candidates all the same.
        assert_eq!(stats.candidates, 1);
    }

    #[test]
    fn drag_scales_velocity_by_rate_to_the_dt() {
        let mut world = World::new();
        let mut sim = Simulation::new();
        sim.set_drag(0.5).unwrap();
        let body = spawn_body(
            &mut world,
            0.0,
            0.0,
            Physics::new(Vec2::splat(0.1)).with_velocity(Vec2::new(1.0, -2.0)),
        );

        sim.step(&mut world, 0.5).unwrap();
        let factor = 0.5f32.powf(0.5);
        assert_eq!(world.get::<Physics>(body).velocity, Vec2::new(1.0, -2.0) * factor);
    }

    #[test]
    fn unit_drag_keeps_velocity_constant() {
        let mut world = World::new();
        let mut sim = Simulation::new();
        assert_eq!(sim.drag(), 1.0);
        let body = spawn_body(
            &mut world,
            0.0,
            0.0,
            Physics::new(Vec2::splat(0.1)).with_velocity(Vec2::new(0.3, 0.0)),
        );
        for _ in 0..10 {
            sim.step(&mut world, 1.0 / 60.0).unwrap();
            assert_eq!(world.get::<Physics>(body).velocity.x, 0.3);
        }
        assert!((world.get::<Position>(body).xy().x - 0.05).abs() < 1e-5);
    }

    #[test]
    fn bodies_without_drag_ignore_it() {
        let mut world = World::new();
        let mut sim = Simulation::new();
        sim.set_drag(0.1).unwrap();
        let body = spawn_body(
            &mut world,
            0.0,
            0.0,
            Physics::new(Vec2::splat(0.1)).with_velocity(Vec2::X).without_drag(),
        );
        sim.step(&mut world, 0.5).unwrap();
        assert_eq!(world.get::<Physics>(body).velocity, Vec2::X);
    }

    #[test]
    fn gravity_is_per_tick_and_skips_fixed_bodies() {
        let mut world = World::new();
        let mut sim = Simulation::new();
        assert_eq!(sim.toggle_gravity(0.1).unwrap(), 0.1);
        let falling = spawn_body(&mut world, 0.0, 5.0, Physics::new(Vec2::splat(0.1)));
        let fixed = spawn_body(&mut world, 3.0, 0.0, Physics::fixed(Vec2::splat(0.1)));

        sim.step(&mut world, 0.5).unwrap();
        sim.step(&mut world, 0.25).unwrap();
        assert!((world.get::<Physics>(falling).velocity.y + 0.2).abs() < EPS);
        assert_eq!(world.get::<Physics>(fixed).velocity, Vec2::ZERO);

        assert_eq!(sim.toggle_gravity(0.1).unwrap(), 0.0);
        assert_eq!(sim.gravity(), 0.0);
    }

    #[test]
    fn rebuild_is_idempotent() {
        let mut world = World::new();
        let mut sim = Simulation::new();
        spawn_body(&mut world, 0.0, 0.0, Physics::new(Vec2::splat(0.1)));
        spawn_body(&mut world, 0.12, 0.03, Physics::fixed(Vec2::new(0.3, 0.05)));
        spawn_body(&mut world, -1.0, 2.0, Physics::new(Vec2::splat(0.2)));
        // Neither solid nor observed: never indexed.
        spawn_body(&mut world, 0.0, 0.0, Physics::new(Vec2::splat(0.1)).non_solid());

        assert_eq!(sim.rebuild(&world).unwrap(), 3);
        let first = sim.map().buckets().to_vec();
        assert_eq!(sim.rebuild(&world).unwrap(), 3);
        assert_eq!(sim.map().buckets(), first.as_slice());
        assert!(sim.map().occupied_buckets() > 0);
    }

    #[test]
    fn commands_from_callbacks_apply_after_the_step() {
        let mut world = World::new();
        let mut sim = Simulation::new();
        let bullet = world
            .build()
            .insert(Position::new(0.0, 0.0))
            .insert(Physics::new(Vec2::splat(0.05)).non_solid())
            .finish()
            .into_entity();
        let enemy = world
            .build()
            .insert(Position::new(0.05, 0.0))
            .insert(Status::new(10, 0, Alignment::Evil))
            .insert(Physics::new(Vec2::splat(0.1)))
            .finish()
            .into_entity();
        world.get_mut::<Physics>(bullet).add_callback(move |other, commands| {
            commands.modify::<Status>(other, |status| status.damage(10));
            commands.despawn(bullet);
            commands.remove::<Sprite>(other);
        });

        let stats = sim.step(&mut world, 1.0 / 60.0).unwrap();
        assert_eq!(stats.commands, 3);
        // The enemy never had a sprite.
        assert_eq!(stats.failed_commands, 1);
        assert_eq!(world.get::<Status>(enemy).health, 0);
        assert!(!world.has::<Physics>(bullet));
        assert!(world.has::<Physics>(enemy));

        // The bullet is gone, so nothing else happens.
        let stats = sim.step(&mut world, 1.0 / 60.0).unwrap();
        assert_eq!(stats.commands, 0);
        assert_eq!(stats.bodies, 1);
    }

    #[test]
    fn missing_position_fails_before_moving_anything() {
        let mut world = World::new();
        let mut sim = Simulation::new();
        let moving = spawn_body(
            &mut world,
            0.0,
            0.0,
            Physics::new(Vec2::splat(0.1)).with_velocity(Vec2::X),
        );
        let orphan = world.spawn();
        world.insert(orphan, Physics::new(Vec2::splat(0.1)));

        let err = sim.step(&mut world, 1.0).unwrap_err();
        assert_eq!(err, EcsError::missing::<Position>(orphan));
        assert_eq!(world.get::<Position>(moving).xy(), Vec2::ZERO);
        assert_eq!(world.count::<Physics>(), 2);
        assert!(sim.rebuild(&world).is_err());
    }

    #[test]
    fn bodies_outside_the_grid_never_collide() {
        let mut world = World::new();
        let mut sim = Simulation::new();
        sim.configure(1.0, IVec2::new(4, 4), IVec2::ZERO).unwrap();
        let (log, cb) = recorder();
        spawn_body(&mut world, -50.0, -50.0, Physics::new(Vec2::splat(0.5)).on_collide(cb));
        spawn_body(&mut world, -50.0, -50.0, Physics::new(Vec2::splat(0.5)));

        let stats = sim.step(&mut world, 0.1).unwrap();
        assert!(log.borrow().is_empty());
        assert_eq!(stats.candidates, 0);
    }

    #[test]
    fn advance_runs_whole_fixed_steps() {
        let mut world = World::new();
        let config = PhysicsConfig {
            fixed_dt: 0.125,
            ..PhysicsConfig::default()
        };
        let mut sim = Simulation::from_config(&config).unwrap();
        let body = spawn_body(
            &mut world,
            0.0,
            0.0,
            Physics::new(Vec2::splat(0.1)).with_velocity(Vec2::X),
        );

        assert_eq!(sim.advance(&mut world, 0.1).unwrap().steps, 0);
        let stats = sim.advance(&mut world, 0.2).unwrap();
        assert_eq!(stats.steps, 2);
        assert_eq!(stats.bodies, 2);
        assert!((world.get::<Position>(body).xy().x - 0.25).abs() < EPS);
        assert_eq!(sim.timestep().steps_taken(), 2);
    }

    #[test]
    fn from_config_rejects_invalid_grid() {
        let config = PhysicsConfig {
            cell_scale: -1.0,
            ..PhysicsConfig::default()
        };
        assert!(Simulation::from_config(&config).is_err());
    }

    #[test]
    fn far_away_body_steps_without_touching_the_grid() {
        let mut world = World::new();
        let mut sim = Simulation::new();
        let (log, cb) = recorder();
        let far = spawn_body(
            &mut world,
            3.0e8,
            0.0,
            Physics::new(Vec2::splat(0.1)).on_collide(cb),
        );
        let wide = spawn_body(&mut world, 0.0, 0.0, Physics::fixed(Vec2::new(1.0e6, 0.1)));

        let stats = sim.step(&mut world, 1.0 / 60.0).unwrap();
        assert_eq!(stats.candidates, 0);
        assert!(log.borrow().is_empty());
        assert_eq!(world.get::<Position>(far).xy(), Vec2::new(3.0e8, 0.0));
        assert_eq!(world.get::<Position>(wide).xy(), Vec2::ZERO);
        // The wide wall is marked into one row of the grid, no further.
        assert_eq!(sim.map().occupied_buckets(), 200 * 3);
    }

    #[test]
    fn invalid_drag_and_gravity_are_rejected() {
        let mut sim = Simulation::new();
        for drag in [-0.5, f32::NAN, f32::INFINITY] {
            assert!(matches!(sim.set_drag(drag), Err(ConfigError::Invalid(_))));
        }
        assert!(sim.set_gravity(f32::NAN).is_err());
        assert!(sim.toggle_gravity(f32::INFINITY).is_err());
        assert_eq!(sim.drag(), 1.0);
        assert_eq!(sim.gravity(), 0.0);
    }

    #[test]
    fn failed_step_stays_banked() {
        let mut world = World::new();
        let config = PhysicsConfig {
            fixed_dt: 0.125,
            ..PhysicsConfig::default()
        };
        let mut sim = Simulation::from_config(&config).unwrap();
        let orphan = world.spawn();
        world.insert(orphan, Physics::new(Vec2::splat(0.1)));

        assert!(sim.advance(&mut world, 0.25).is_err());
        assert_eq!(sim.timestep().steps_taken(), 0);

        world.insert(orphan, Position::new(0.0, 0.0));
        let stats = sim.advance(&mut world, 0.0).unwrap();
        assert_eq!(stats.steps, 2);
        assert_eq!(sim.timestep().steps_taken(), 2);
    }
}
