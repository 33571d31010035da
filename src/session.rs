//! Run lifecycle facade
//!
//! The only type a host shell talks to. It owns the world and the spawn
//! director, turns polled input into [`TickInput`], and turns tick events
//! into sound cues.

use crate::audio::{AudioSink, SoundCue};
use crate::consts::MAX_FRAME_DT;
use crate::platform::{DiscreteKey, InputProvider, Renderer, movement_vector};
use crate::settings::Settings;
use crate::sim::state::{GameEvent, RunOutcome, RunSummary, World};
use crate::sim::{SpawnDirector, TickInput, WorldView, tick};

pub struct Session {
    settings: Settings,
    world: World,
    director: SpawnDirector,
    escape_requested: bool,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        let world = settings.new_world();
        Self {
            settings,
            world,
            director: SpawnDirector::new(),
            escape_requested: false,
        }
    }

    /// Reset to a fresh run
    pub fn init(&mut self, audio: &mut impl AudioSink) {
        self.world = self.settings.new_world();
        self.director = SpawnDirector::new();
        self.escape_requested = false;
        log::info!(
            "Run started (seed {}, mode {:?})",
            self.settings.seed,
            self.settings.mode
        );
        audio.play(SoundCue::BackgroundLoopStart);
    }

    /// Poll input and advance by `dt` seconds (clamped to a single frame's worth)
    pub fn update(
        &mut self,
        dt: f32,
        input: &mut impl InputProvider,
        audio: &mut impl AudioSink,
    ) {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);

        let mut tick_input = TickInput {
            movement: movement_vector(input),
            aim: Some(input.aim_point()),
            select: None,
            confirm: input.primary_action_edge(),
        };
        for key in input.drain_discrete_keys() {
            match key {
                DiscreteKey::Escape => {
                    log::debug!("Escape requested");
                    self.escape_requested = true;
                }
                DiscreteKey::Digit(n @ 1..=9) => tick_input.select = Some(usize::from(n) - 1),
                DiscreteKey::Digit(_) => {}
            }
        }

        tick(&mut self.world, &mut self.director, &tick_input, dt);
        self.play_cues(audio);
    }

    fn play_cues(&self, audio: &mut impl AudioSink) {
        let mut hit = false;
        for event in &self.world.events {
            match event {
                GameEvent::EnemyDamaged { .. } | GameEvent::PlayerDamaged { .. } => hit = true,
                GameEvent::LevelUp { .. } | GameEvent::BossDefeated { .. } => {
                    audio.play(SoundCue::Success)
                }
                GameEvent::RunOver { .. } => audio.play(SoundCue::BackgroundLoopStop),
                _ => {}
            }
        }
        // One hit cue per update, however many hits landed
        if hit {
            audio.play(SoundCue::Hit);
        }
    }

    pub fn render(&self, renderer: &mut impl Renderer) {
        renderer.render(&self.world.view());
    }

    pub fn view(&self) -> WorldView<'_> {
        self.world.view()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Terminal result once the run is over
    pub fn outcome(&self) -> Option<RunOutcome> {
        self.world.outcome()
    }

    pub fn is_over(&self) -> bool {
        self.world.is_over()
    }

    /// Whether Escape was pressed since the last call
    pub fn take_escape_request(&mut self) -> bool {
        std::mem::take(&mut self.escape_requested)
    }

    pub fn summary(&self) -> RunSummary {
        self.world.summary()
    }
}
