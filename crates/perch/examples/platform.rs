//! Platform: a headless run of the perch frame loop.
//!
//! A bird drops into a walled arena, enemies drift toward it and hurt it on
//! contact, and the bird fires bullets that hurt enemies. Dead creatures are
//! reaped each frame; the bird's death leaves a popup behind.
//!
//! Gravity toggles on at frame 120 and off again at frame 480, the way the
//! debug key does in the interactive game.
//!
//! Run with `RUST_LOG=perch=debug cargo run --example platform` to watch
//! despawns and reaping.

use perch::components::{Ai, Alignment, AnimationLoop, Position, Sprite, Status};
use perch::ecs::{Commands, Composite, Entity, Roster, World};
use perch::math::{IVec2, Vec2};
use perch::physics::{Physics, PhysicsConfig, Simulation, StepStats};

const FRAME_DT: f32 = 1.0 / 60.0;
const FRAMES: u32 = 600;

fn main() {
    perch::logging::init_logger();

    let config = PhysicsConfig {
        drag: 0.1,
        ..PhysicsConfig::default()
    };
    let mut sim = match Simulation::from_config(&config) {
        Ok(sim) => sim,
        Err(err) => {
            log::error!("bad physics config: {err}");
            return;
        }
    };
    if let Err(err) = sim.configure(0.1, IVec2::new(200, 200), IVec2::new(-100, -100)) {
        log::error!("bad collision grid: {err}");
        return;
    }

    let mut world = World::new();
    let mut roster = Roster::new();

    let arena = spawn_arena(&mut world);
    let bird = spawn_bird(&mut world, &mut roster);
    for i in 0..3 {
        spawn_enemy(&mut world, &mut roster, bird, Vec2::new(-1.5 + 1.5 * i as f32, 1.0));
    }

    let mut totals = StepStats::default();
    for frame in 0..FRAMES {
        roster.reap(&mut world);
        world.cleanup();

        if frame == 120 || frame == 480 {
            match sim.toggle_gravity(0.1) {
                Ok(g) => log::info!("frame {frame}: gravity {g}"),
                Err(err) => log::warn!("gravity unchanged: {err}"),
            }
        }
        if frame % 30 == 0 && world.has::<Position>(bird) {
            fire_bullet(&mut world, &mut roster, bird);
        }
        Ai::update_all(&mut world, FRAME_DT);

        match sim.advance(&mut world, FRAME_DT) {
            Ok(stats) => totals += stats,
            Err(err) => {
                log::error!("physics step failed: {err}");
                return;
            }
        }
        world.fixed_update::<Sprite>();

        if frame % 120 == 0 {
            let (spawned, despawned) = world.take_frame_counts();
            log::info!(
                "frame {frame}: {} creatures, {} bodies, {} components, {} contacts so far (+{spawned}/-{despawned})",
                roster.len(),
                world.count::<Physics>(),
                world.component_count(),
                totals.contacts
            );
        }
    }

    log::info!("done: {:?}", totals);
    log::info!("{} walls standing", arena.len());
    for entity in roster.entities() {
        let status = world.get::<Status>(entity);
        log::info!(
            "{entity}: {:?} health {} at {}",
            status.alignment,
            status.health,
            world.get::<Position>(entity).xy()
        );
    }
}

fn spawn_arena(world: &mut World) -> Vec<Composite> {
    let walls = [
        (Vec2::new(0.0, -2.0), Vec2::new(3.0, 0.1)),
        (Vec2::new(-3.0, 0.0), Vec2::new(0.1, 2.0)),
        (Vec2::new(3.0, 0.0), Vec2::new(0.1, 2.0)),
        (Vec2::new(0.0, 2.0), Vec2::new(3.0, 0.1)),
    ];
    walls
        .into_iter()
        .map(|(center, half)| {
            world
                .build()
                .insert(Position::from(center))
                .insert(Physics::fixed(half))
                .insert(Sprite::new("assets/wall.png", half))
                .finish()
        })
        .collect()
}

fn spawn_bird(world: &mut World, roster: &mut Roster) -> Entity {
    let flap = AnimationLoop::new(
        vec!["assets/bird_0.png".into(), "assets/bird_1.png".into()],
        8,
    );
    let bird = world
        .build()
        .insert(Position::new(0.0, -1.0))
        .insert(Physics::new(Vec2::splat(0.1)).with_velocity(Vec2::new(0.5, 0.0)))
        .insert(Sprite::new("assets/bird_0.png", Vec2::splat(0.1)).with_animation(flap))
        .insert(Status::new(100, 0, Alignment::Good))
        .finish();
    roster.track_with(bird, |entity, world, roster| {
        let at = world.get::<Position>(entity).xy();
        log::info!("bird {entity} died at {at}");
        let popup = world
            .build()
            .insert(Position::with_depth(at.x, at.y, -0.1))
            .insert(Sprite::new("assets/game_over.png", Vec2::new(0.4, 0.1)))
            .insert(Status::new(90, 0, Alignment::Neutral))
            .insert(burn_down())
            .finish();
        roster.track(popup);
    })
}

fn spawn_enemy(world: &mut World, roster: &mut Roster, target: Entity, at: Vec2) {
    let body = Physics::new(Vec2::splat(0.12)).on_collide(|other, commands: &mut Commands| {
        commands.push(move |world| {
            if let Ok(status) = world.try_get_mut::<Status>(other)
                && status.alignment == Alignment::Good
            {
                status.damage(10);
            }
        });
    });
    let enemy = world
        .build()
        .insert(Position::from(at))
        .insert(body)
        .insert(Sprite::new("assets/enemy.png", Vec2::splat(0.12)))
        .insert(Status::new(100, 0, Alignment::Evil))
        .insert(Ai::new(move |me, _, commands| {
            commands.push(move |world| steer(world, me, target));
        }))
        .finish();
    roster.track(enemy);
}

/// Bullets are neutral and non-solid, and burn down like the popup.
fn fire_bullet(world: &mut World, roster: &mut Roster, from: Entity) {
    let origin = world.get::<Position>(from).xy();
    let direction = Vec2::new(0.0, 1.0);
    let body = Physics::new(Vec2::splat(0.03))
        .non_solid()
        .without_drag()
        .with_velocity(direction * 5.0)
        .on_collide(|other, commands: &mut Commands| {
            commands.push(move |world| {
                if let Ok(status) = world.try_get_mut::<Status>(other)
                    && status.alignment == Alignment::Evil
                {
                    status.damage(10);
                }
            });
        });
    let bullet = world
        .build()
        .insert(Position::from(origin + direction * 0.15))
        .insert(body)
        .insert(Sprite::new("assets/bullet.png", Vec2::splat(0.03)))
        .insert(Status::new(40, 0, Alignment::Neutral))
        .insert(burn_down())
        .finish();
    roster.track(bullet);
}

/// Lose one health point per frame, so the roster reaps it eventually.
fn burn_down() -> Ai {
    Ai::new(|me, _, commands| commands.modify::<Status>(me, |status| status.damage(1)))
}

/// Nudge `me` toward `target`, if the target is still around.
fn steer(world: &mut World, me: Entity, target: Entity) {
    let Ok(goal) = world.try_get::<Position>(target).map(|p| p.xy()) else {
        return;
    };
    let Ok(at) = world.try_get::<Position>(me).map(|p| p.xy()) else {
        return;
    };
    if let Ok(body) = world.try_get_mut::<Physics>(me) {
        body.velocity += (goal - at).normalize_or_zero() * 0.02;
    }
}
