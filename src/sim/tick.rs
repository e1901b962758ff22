//! Fixed timestep simulation tick
//!
//! Core game loop that advances a session deterministically: status timers,
//! spawning, then the fall/collision pass.

use super::effects::{EffectOutcome, apply_effect, expire_effect};
use super::state::{Facing, Session};
use crate::audio::AudioSink;
use crate::consts::FALL_STEP;

/// Player input that reaches the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    /// Key released or input went idle
    ReleaseMovement,
}

impl Session {
    /// Apply a movement command. Ignored once the session is over.
    pub fn command(&mut self, command: Command) {
        if self.is_terminal() {
            return;
        }
        let width = self.config.screen_width;
        match command {
            Command::MoveLeft => self.player.walk(Facing::Left, width),
            Command::MoveRight => self.player.walk(Facing::Right, width),
            Command::ReleaseMovement => self.player.stop_walking(),
        }
    }
}

/// Advance the session by `dt_ms` of simulated time
pub fn tick(session: &mut Session, dt_ms: u32, audio: &mut impl AudioSink) {
    // Terminal sessions are frozen
    if session.is_terminal() {
        return;
    }

    session.time_ticks += 1;
    session.time_ms += u64::from(dt_ms);

    for effect in session.timers.advance(dt_ms) {
        expire_effect(effect, session);
    }

    let width = session.config.screen_width;
    session.scheduler.update(dt_ms, &mut session.objects, width);

    resolve_objects(session, audio);

    session.player.animate();
}

/// Move every object down one step and resolve catches.
///
/// Iterates over a snapshot of ids: objects removed mid-pass (caught, fallen
/// off screen, or pulled in by a magnet) are skipped when their turn comes.
fn resolve_objects(session: &mut Session, audio: &mut impl AudioSink) {
    let floor = session.config.screen_height;

    for id in session.objects.ids() {
        let Some(obj) = session.objects.get_mut(id) else {
            continue;
        };
        obj.fall(FALL_STEP);

        if obj.rect.pos.y > floor {
            session.objects.remove(id);
            continue;
        }
        if !obj.rect.intersects(&session.player.rect) {
            continue;
        }

        let kind = obj.kind;
        session.objects.remove(id);
        if apply_effect(kind, session, audio) == EffectOutcome::StopPass {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{NullAudio, RecordingAudio, SoundEffect};
    use crate::consts::*;
    use crate::sim::registry::ObjectId;
    use crate::sim::spawn::Variant;
    use crate::sim::state::{Fruit, Kind, MovementState, SessionConfig};
    use proptest::prelude::*;

    fn session() -> Session {
        Session::new(SessionConfig::default(), 12345)
    }

    /// Drop an object so it overlaps the player after one fall step
    fn drop_on_player(s: &mut Session, kind: Kind) -> ObjectId {
        let x = s.player.rect.pos.x + 20;
        let y = s.player.rect.pos.y - 50;
        s.spawn(kind, x, y)
    }

    fn apple() -> Kind {
        Kind::Fruit(Fruit::Apple)
    }

    #[test]
    fn test_object_falls_one_step() {
        let mut s = session();
        let id = s.spawn(Kind::Bomb, 0, 0);
        tick(&mut s, TICK_MS, &mut NullAudio);
        assert_eq!(s.objects.get(id).map(|o| o.rect.pos.y), Some(FALL_STEP));
    }

    #[test]
    fn test_three_fruit_no_threshold() {
        let mut s = session();
        for _ in 0..3 {
            drop_on_player(&mut s, apple());
        }
        let rates = *s.scheduler.rates();
        tick(&mut s, TICK_MS, &mut NullAudio);
        assert_eq!(s.score, 3);
        assert_eq!(s.level(), 0);
        assert_eq!(s.scheduler.level(), 0);
        assert_eq!(*s.scheduler.rates(), rates);
        assert!(s.objects.is_empty());
    }

    #[test]
    fn test_nineteen_to_twenty_levels_up() {
        let mut s = session();
        s.score = 19;
        drop_on_player(&mut s, apple());
        tick(&mut s, TICK_MS, &mut NullAudio);
        assert_eq!(s.score, 20);
        assert_eq!(s.level(), 1);
        assert_eq!(*s.scheduler.rates(), Variant::Full.rates(1));
    }

    #[test]
    fn test_classic_levels_every_fifty() {
        let config = SessionConfig {
            variant: Variant::Classic,
            ..Default::default()
        };
        let mut s = Session::new(config, 1);
        s.score = 19;
        drop_on_player(&mut s, apple());
        tick(&mut s, TICK_MS, &mut NullAudio);
        assert_eq!(s.level(), 0);

        s.score = 49;
        drop_on_player(&mut s, apple());
        tick(&mut s, TICK_MS, &mut NullAudio);
        assert_eq!(s.level(), 1);
    }

    #[test]
    fn test_fall_off_screen_no_effect() {
        let mut s = session();
        let id = s.spawn(Kind::Bomb, 0, DEFAULT_SCREEN_HEIGHT - 4);
        tick(&mut s, TICK_MS, &mut NullAudio);
        assert!(!s.objects.contains(id));
        assert_eq!(s.player.health, MAX_HEALTH);
        assert_eq!(s.score, 0);
    }

    #[test]
    fn test_miss_keeps_object() {
        let mut s = session();
        let id = s.spawn(apple(), 0, 100);
        tick(&mut s, TICK_MS, &mut NullAudio);
        assert!(s.objects.contains(id));
        assert_eq!(s.score, 0);
    }

    #[test]
    fn test_bomb_stops_pass() {
        let mut s = session();
        drop_on_player(&mut s, Kind::Bomb);
        let fruit = drop_on_player(&mut s, apple());
        let y_before = s.objects.get(fruit).map(|o| o.rect.pos.y);

        tick(&mut s, TICK_MS, &mut NullAudio);
        assert_eq!(s.player.health, 80);
        assert_eq!(s.score, 0);
        // The fruit was not reached this tick
        assert_eq!(s.objects.get(fruit).map(|o| o.rect.pos.y), y_before);

        tick(&mut s, TICK_MS, &mut NullAudio);
        assert_eq!(s.score, 1);
    }

    #[test]
    fn test_shielded_bomb_also_stops_pass() {
        let mut s = session();
        s.player.shielded = true;
        drop_on_player(&mut s, Kind::Bomb);
        drop_on_player(&mut s, apple());
        tick(&mut s, TICK_MS, &mut NullAudio);
        assert_eq!(s.player.health, MAX_HEALTH);
        assert!(!s.player.shielded);
        assert_eq!(s.score, 0);
    }

    #[test]
    fn test_game_over_freezes_session() {
        let mut s = session();
        s.player.health = 20;
        drop_on_player(&mut s, Kind::Bomb);
        let other = s.spawn(apple(), 0, 0);
        tick(&mut s, TICK_MS, &mut NullAudio);
        assert!(s.is_game_over());

        let ticks = s.time_ticks;
        let y = s.objects.get(other).map(|o| o.rect.pos.y);
        let x = s.player.rect.pos.x;
        for _ in 0..100 {
            s.command(Command::MoveLeft);
            tick(&mut s, TICK_MS, &mut NullAudio);
        }
        assert_eq!(s.time_ticks, ticks);
        assert_eq!(s.objects.get(other).map(|o| o.rect.pos.y), y);
        assert_eq!(s.player.rect.pos.x, x);
        assert!(s.is_game_over());
        assert!(!s.is_cleared());
    }

    #[test]
    fn test_pending_timer_after_game_over_is_noop() {
        let mut s = session();
        s.player.health = 20;
        drop_on_player(&mut s, Kind::Poison);
        drop_on_player(&mut s, Kind::Rock);
        tick(&mut s, TICK_MS, &mut NullAudio);
        assert!(s.player.paralyzed);
        assert!(s.player.movement_penalized);
        assert_eq!(s.timers.len(), 2);

        drop_on_player(&mut s, Kind::Bomb);
        tick(&mut s, TICK_MS, &mut NullAudio);
        assert!(s.is_game_over());

        for _ in 0..ROCK_PENALTY_MS / TICK_MS + 10 {
            tick(&mut s, TICK_MS, &mut NullAudio);
        }
        assert!(s.player.paralyzed);
        assert!(s.player.movement_penalized);
        assert_eq!(s.player.movement, MovementState::Paralyzed);
        assert_eq!(s.timers.len(), 2);
    }

    #[test]
    fn test_cleared_excludes_game_over() {
        let mut s = session();
        s.score = 99;
        s.player.health = 20;
        drop_on_player(&mut s, apple());
        drop_on_player(&mut s, Kind::Bomb);
        tick(&mut s, TICK_MS, &mut NullAudio);
        assert!(s.is_cleared());
        tick(&mut s, TICK_MS, &mut NullAudio);
        assert!(!s.is_game_over());
        assert_eq!(s.player.health, 20);
    }

    #[test]
    fn test_poison_wears_off_after_exact_delay() {
        let mut s = session();
        drop_on_player(&mut s, Kind::Poison);
        tick(&mut s, TICK_MS, &mut NullAudio);
        assert!(s.player.paralyzed);

        let x = s.player.rect.pos.x;
        let ticks = PARALYSIS_MS / TICK_MS;
        for _ in 0..ticks - 1 {
            s.command(Command::MoveRight);
            tick(&mut s, TICK_MS, &mut NullAudio);
            assert!(s.player.paralyzed);
        }
        assert_eq!(s.player.rect.pos.x, x);

        tick(&mut s, TICK_MS, &mut NullAudio);
        assert!(!s.player.paralyzed);
        assert_eq!(s.player.movement, MovementState::Idle);

        s.command(Command::MoveRight);
        assert_eq!(s.player.rect.pos.x, x + MOVE_STEP);
    }

    #[test]
    fn test_repoison_keeps_first_timer() {
        let mut s = session();
        drop_on_player(&mut s, Kind::Poison);
        tick(&mut s, TICK_MS, &mut NullAudio);
        for _ in 0..10 {
            tick(&mut s, TICK_MS, &mut NullAudio);
        }
        drop_on_player(&mut s, Kind::Poison);
        tick(&mut s, TICK_MS, &mut NullAudio);
        assert_eq!(s.timers.len(), 2);

        // The first timer lifts paralysis 1500 ms after the first hit
        for _ in 0..38 {
            tick(&mut s, TICK_MS, &mut NullAudio);
        }
        assert!(s.player.paralyzed);
        tick(&mut s, TICK_MS, &mut NullAudio);
        assert!(!s.player.paralyzed);
        assert_eq!(s.timers.len(), 1);
    }

    #[test]
    fn test_rock_slows_then_expires() {
        let mut s = session();
        drop_on_player(&mut s, Kind::Rock);
        tick(&mut s, TICK_MS, &mut NullAudio);
        assert!(s.player.movement_penalized);

        let x = s.player.rect.pos.x;
        s.command(Command::MoveLeft);
        assert_eq!(s.player.rect.pos.x, x - PENALIZED_MOVE_STEP);

        for _ in 0..ROCK_PENALTY_MS / TICK_MS {
            tick(&mut s, TICK_MS, &mut NullAudio);
        }
        assert!(!s.player.movement_penalized);
    }

    #[test]
    fn test_magnet_in_pass() {
        let mut s = session();
        let magnet = drop_on_player(&mut s, Kind::Magnet);
        let far_fruit = s.spawn(Kind::Fruit(Fruit::Banana), 0, 0);
        let bomb = s.spawn(Kind::Bomb, 0, 0);
        let mut audio = RecordingAudio::default();

        tick(&mut s, TICK_MS, &mut audio);
        assert!(!s.objects.contains(magnet));
        assert!(!s.objects.contains(far_fruit));
        assert!(s.objects.contains(bomb));
        assert_eq!(s.score, 1);
        // The bomb still advanced this tick
        assert_eq!(s.objects.get(bomb).map(|o| o.rect.pos.y), Some(FALL_STEP));
        assert_eq!(
            audio.effects(),
            vec![SoundEffect::Magnet, SoundEffect::CatchFruit]
        );
    }

    #[test]
    fn test_release_returns_to_idle() {
        let mut s = session();
        s.command(Command::MoveRight);
        assert_eq!(s.player.movement, MovementState::Walking);
        s.command(Command::ReleaseMovement);
        assert_eq!(s.player.movement, MovementState::Idle);
    }

    #[test]
    fn test_determinism() {
        let mut a = session();
        let mut b = session();
        let script = [
            Command::MoveLeft,
            Command::MoveLeft,
            Command::ReleaseMovement,
            Command::MoveRight,
        ];
        for i in 0..2000 {
            let command = script[i % script.len()];
            a.command(command);
            b.command(command);
            tick(&mut a, TICK_MS, &mut NullAudio);
            tick(&mut b, TICK_MS, &mut NullAudio);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.player, b.player);
        assert_eq!(a.phase, b.phase);
        let objs_a: Vec<_> = a.objects.iter().cloned().collect();
        let objs_b: Vec<_> = b.objects.iter().cloned().collect();
        assert_eq!(objs_a, objs_b);
    }

    fn kind_for(index: usize) -> Kind {
        match index {
            0 => apple(),
            1 => Kind::Bomb,
            2 => Kind::Potion,
            3 => Kind::Poison,
            4 => Kind::Magnet,
            5 => Kind::Shield,
            _ => Kind::Rock,
        }
    }

    proptest! {
        #[test]
        fn prop_health_and_score_invariants(
            seed in any::<u64>(),
            ops in prop::collection::vec((0u8..6, 0usize..7), 1..400),
        ) {
            let mut s = Session::new(SessionConfig::default(), seed);
            let mut last_score = 0;
            let mut was_terminal = false;
            let mut was_game_over = false;
            let mut was_cleared = false;

            for (op, kind) in ops {
                match op {
                    0 => s.command(Command::MoveLeft),
                    1 => s.command(Command::MoveRight),
                    2 => s.command(Command::ReleaseMovement),
                    3 => {
                        drop_on_player(&mut s, kind_for(kind));
                    }
                    _ => tick(&mut s, TICK_MS, &mut NullAudio),
                }

                prop_assert!(s.player.health <= MAX_HEALTH);
                prop_assert!(s.score >= last_score);
                prop_assert!(s.level() <= MAX_LEVEL);
                if s.player.paralyzed {
                    prop_assert_eq!(s.player.movement, MovementState::Paralyzed);
                }
                let max_x = DEFAULT_SCREEN_WIDTH - PLAYER_WIDTH;
                prop_assert!(s.player.rect.pos.x >= 0 && s.player.rect.pos.x <= max_x);
                prop_assert!(!(s.is_game_over() && s.is_cleared()));
                if was_terminal {
                    prop_assert!(s.is_terminal());
                    prop_assert_eq!(s.is_game_over(), was_game_over);
                    prop_assert_eq!(s.is_cleared(), was_cleared);
                }

                last_score = s.score;
                was_terminal = s.is_terminal();
                was_game_over = s.is_game_over();
                was_cleared = s.is_cleared();
            }
        }
    }
}
