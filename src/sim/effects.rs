//! What happens when the hippo catches something
//!
//! `apply_effect` is called after the caught object has been taken out of the
//! registry. It mutates the session and fires audio cues at the point each
//! effect resolves.

use super::state::{Kind, Phase, Session};
use super::timers::TimedEffect;
use crate::audio::{AudioSink, SoundEffect};
use crate::consts::*;

/// Whether the collision pass may continue after an effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectOutcome {
    /// Keep processing the remaining objects
    Continue,
    /// Abandon the rest of this tick's pass
    StopPass,
}

/// Apply the effect of catching an object of `kind`
pub fn apply_effect(
    kind: Kind,
    session: &mut Session,
    audio: &mut impl AudioSink,
) -> EffectOutcome {
    match kind {
        Kind::Fruit(_) => {
            eat_fruit(session, audio);
            settle_progress(session, audio)
        }
        Kind::Bomb => {
            if session.player.shielded {
                session.player.shielded = false;
                log::debug!("Shield absorbed a bomb");
            } else {
                let health = session.player.damage(BOMB_DAMAGE);
                audio.play_effect(SoundEffect::Explode);
                if health == 0 {
                    finish(session, Phase::GameOver, audio);
                }
            }
            // A bomb always ends the pass
            EffectOutcome::StopPass
        }
        Kind::Potion => {
            session.player.heal(POTION_HEAL);
            session.player.recover();
            audio.play_effect(SoundEffect::Heal);
            EffectOutcome::Continue
        }
        Kind::Poison => {
            session.player.paralyze();
            audio.play_effect(SoundEffect::Poison);
            session.timers.start(TimedEffect::Paralysis, PARALYSIS_MS);
            EffectOutcome::Continue
        }
        Kind::Magnet => {
            audio.play_effect(SoundEffect::Magnet);
            // Pulled-in fruit is eaten on the spot
            for id in session.objects.ids() {
                let is_fruit = session.objects.get(id).is_some_and(|o| o.kind.is_fruit());
                if !is_fruit {
                    continue;
                }
                session.objects.remove(id);
                session.score += 1;
                audio.play_effect(SoundEffect::CatchFruit);
            }
            settle_progress(session, audio)
        }
        Kind::Shield => {
            session.player.shielded = true;
            audio.play_effect(SoundEffect::Shield);
            EffectOutcome::Continue
        }
        Kind::Rock => {
            session.player.movement_penalized = true;
            audio.play_effect(SoundEffect::Rock);
            session.timers.start(TimedEffect::MovementPenalty, ROCK_PENALTY_MS);
            EffectOutcome::Continue
        }
    }
}

/// Revert the flag behind an expired status timer
pub fn expire_effect(effect: TimedEffect, session: &mut Session) {
    match effect {
        TimedEffect::Paralysis => session.player.recover(),
        TimedEffect::MovementPenalty => session.player.movement_penalized = false,
    }
}

fn eat_fruit(session: &mut Session, audio: &mut impl AudioSink) {
    session.score += 1;
    session.player.open_mouth();
    audio.play_effect(SoundEffect::CatchFruit);
}

/// Apply level changes and the win check for the current score
fn settle_progress(session: &mut Session, audio: &mut impl AudioSink) -> EffectOutcome {
    let progress = session.progression.on_score(session.score);
    if let Some(level) = progress.new_level {
        log::info!("Level {} reached at score {}", level, session.score);
        session.scheduler.reconfigure(level);
    }
    if progress.cleared {
        finish(session, Phase::Cleared, audio);
        return EffectOutcome::StopPass;
    }
    EffectOutcome::Continue
}

fn finish(session: &mut Session, phase: Phase, audio: &mut impl AudioSink) {
    session.phase = phase;
    audio.stop_background();
    match phase {
        Phase::GameOver => log::info!("Game over with score {}", session.score),
        Phase::Cleared => log::info!("Game cleared with score {}", session.score),
        Phase::Playing => {}
    }
}
