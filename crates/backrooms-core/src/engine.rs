//! Simulation engine - main entry point for running the simulation

use std::fmt;
use std::path::PathBuf;

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use backrooms_logic::config::GameConfig;
use backrooms_logic::constants::colors;
use backrooms_logic::constants::timing::{HINT_FRAMES, STATUS_MESSAGE_SECONDS, TICK_SECONDS};
use backrooms_logic::constants::WALL_SHADE_JITTER;
use backrooms_logic::footsteps::FootstepTracker;
use backrooms_logic::geometry::RoomCoordinate;
use backrooms_logic::lighting::{cast_cone, Flicker, IlluminationMask};
use backrooms_logic::lookup::{parse_coordinate, LookupError};
use backrooms_logic::movement::{try_step, StepOutcome};

use crate::input::{Command, InputState};
use crate::persistence::{SaveError, SaveRecord, SaveStore};
use crate::render::{self, DrawCommand, Frame, Hud};
use crate::world::{VisitedSet, WorldCache};

/// The explorer, in panel-local pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub radius: f32,
}

impl Player {
    /// A player standing at the panel center
    pub fn spawn(config: &GameConfig) -> Self {
        let (x, y) = config.panel.center();
        Self {
            x,
            y,
            speed: config.player.speed,
            radius: config.player.radius,
        }
    }
}

/// Temporary on-screen message (save/load feedback)
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    /// Seconds left before it disappears
    pub remaining: f32,
}

/// Answer to a coordinate lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    Visited(RoomCoordinate),
    Unknown(RoomCoordinate),
}

impl fmt::Display for LookupOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupOutcome::Visited(c) => write!(f, "Room {} has been visited.", c),
            LookupOutcome::Unknown(c) => write!(f, "Room {} is unknown (not yet visited).", c),
        }
    }
}

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Any movement key was held
    pub moving: bool,
    /// Rooms entered this tick, in order
    pub entered: Vec<RoomCoordinate>,
    /// One answer line per lookup command
    pub lookups: Vec<String>,
    pub quit: bool,
}

/// Main simulation engine
pub struct SimulationEngine {
    config: GameConfig,
    world: WorldCache,
    visited: VisitedSet,
    /// Player position and movement parameters
    pub player: Player,
    room: RoomCoordinate,
    footsteps: FootstepTracker,
    flicker: Flicker,
    /// Wall tint and flicker only; never touches room content
    cosmetic_rng: Xoshiro256PlusPlus,
    status: Option<StatusMessage>,
    frame_count: u64,
    store: SaveStore,
    illumination: IlluminationMask,
    wall_shades: Vec<i32>,
    moving: bool,
}

impl SimulationEngine {
    /// Create a session in the start room, with a random cosmetic stream
    pub fn new(config: GameConfig) -> Self {
        Self::with_cosmetic_seed(config, rand::thread_rng().gen())
    }

    /// Create a session whose cosmetic effects are reproducible
    pub fn with_cosmetic_seed(config: GameConfig, cosmetic_seed: u64) -> Self {
        let mut world = WorldCache::new(config.panel);
        world.get_or_create(RoomCoordinate::ORIGIN);

        let mut visited = VisitedSet::new();
        visited.insert(RoomCoordinate::ORIGIN);

        let illumination = IlluminationMask::new(
            &config.panel,
            config.lighting.mask_cell,
            config.lighting.ambient,
        );

        Self {
            world,
            visited,
            player: Player::spawn(&config),
            room: RoomCoordinate::ORIGIN,
            footsteps: FootstepTracker::new(config.footsteps),
            flicker: Flicker::default(),
            cosmetic_rng: Xoshiro256PlusPlus::seed_from_u64(cosmetic_seed),
            status: None,
            frame_count: 0,
            store: SaveStore::new(config.save_dir.clone()),
            illumination,
            wall_shades: Vec::new(),
            moving: false,
            config,
        }
    }

    /// Advance the simulation by one fixed step
    pub fn tick(&mut self, input: &InputState) -> TickReport {
        self.frame_count += 1;
        self.update_status(TICK_SECONDS);

        let mut report = TickReport::default();

        for command in &input.commands {
            match command {
                // Failures already surface as status messages
                Command::QuickSave => {
                    let _ = self.save(1);
                }
                Command::QuickLoad => {
                    let _ = self.load(1);
                }
                Command::Lookup(query) => {
                    let answer = match self.lookup(query) {
                        Ok(outcome) => outcome.to_string(),
                        Err(e) => e.to_string(),
                    };
                    report.lookups.push(answer);
                }
                Command::Quit => report.quit = true,
            }
        }

        for (dx, dy) in input.steps(self.player.speed) {
            if let StepOutcome::Transition(_) = self.step(dx, dy) {
                report.entered.push(self.room);
            }
        }
        self.moving = input.is_moving();
        report.moving = self.moving;

        self.footsteps.update();
        self.flicker.step(&mut self.cosmetic_rng);
        self.illuminate(input.aim);
        self.shade_walls();

        if let Some(radius) = self.config.cache_retention {
            let evicted = self.world.evict_beyond(self.room, radius);
            if evicted > 0 {
                log::debug!("Evicted {} rooms beyond {} of {}", evicted, radius, self.room);
            }
        }

        report
    }

    /// Attempt one single-axis movement step
    pub fn step(&mut self, dx: f32, dy: f32) -> StepOutcome {
        let room = self.world.get_or_create(self.room);
        let outcome = try_step(
            self.player.x,
            self.player.y,
            dx,
            dy,
            self.player.radius,
            &room.walls,
            &self.config.panel,
        );

        match outcome {
            StepOutcome::Transition(transition) => {
                let destination = transition.destination(self.room);
                self.enter_room(destination, transition.x, transition.y);
            }
            StepOutcome::Moved { x, y } => {
                self.player.x = x;
                self.player.y = y;
                if dx != 0.0 || dy != 0.0 {
                    self.footsteps.push(x, y);
                }
            }
            StepOutcome::Blocked => {}
        }

        outcome
    }

    /// Move into `room` at `(x, y)`. Returns true on a first visit.
    fn enter_room(&mut self, room: RoomCoordinate, x: f32, y: f32) -> bool {
        self.footsteps.clear();
        self.room = room;
        self.player.x = x;
        self.player.y = y;

        let first_visit = self.visited.insert(room);
        if first_visit {
            log::info!("Entered room: {}", room);
        }
        self.world.get_or_create(room);
        first_visit
    }

    fn illuminate(&mut self, aim: (f32, f32)) {
        let floor = self.flicker.floor(&self.config.lighting);
        let walls = &self.world.get_or_create(self.room).walls;
        self.illumination = cast_cone(
            (self.player.x, self.player.y),
            aim,
            walls,
            floor,
            &self.config.lighting,
            &self.config.panel,
        );
    }

    fn shade_walls(&mut self) {
        let count = self.world.get(self.room).map_or(0, |room| room.walls.len());
        let rng = &mut self.cosmetic_rng;
        self.wall_shades = (0..count)
            .map(|_| rng.gen_range(-WALL_SHADE_JITTER..=WALL_SHADE_JITTER))
            .collect();
    }

    fn set_status(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            remaining: STATUS_MESSAGE_SECONDS,
        });
    }

    fn update_status(&mut self, dt: f32) {
        if let Some(status) = &mut self.status {
            status.remaining -= dt;
            if status.remaining <= 0.0 {
                self.status = None;
            }
        }
    }

    // ── Persistence ──

    /// Snapshot of the current progress
    pub fn snapshot(&self) -> SaveRecord {
        SaveRecord::new((self.player.x, self.player.y), self.room, &self.visited)
    }

    /// Replace progress with `record`. The active room regenerates through
    /// the cache if it is not already there.
    pub fn restore(&mut self, record: SaveRecord) {
        self.player.x = record.player.x;
        self.player.y = record.player.y;
        self.room = record.current_room;
        self.visited = record.visited_set();
        self.footsteps.clear();
        self.world.get_or_create(self.room);
    }

    /// Write the current progress to `slot`
    pub fn save(&mut self, slot: u32) -> Result<PathBuf, SaveError> {
        let record = self.snapshot();
        match self.store.save(slot, &record) {
            Ok(path) => {
                log::info!("Game saved to {}", path.display());
                self.set_status(format!("Game saved to slot {}!", slot));
                Ok(path)
            }
            Err(e) => {
                log::warn!("Error saving game: {}", e);
                self.set_status("Save failed!");
                Err(e)
            }
        }
    }

    /// Restore progress from `slot`. On failure nothing changes.
    pub fn load(&mut self, slot: u32) -> Result<(), SaveError> {
        match self.store.load(slot) {
            Ok(record) => {
                self.restore(record);
                log::info!(
                    "Game loaded from slot {}: room {}, {} rooms explored",
                    slot,
                    self.room,
                    self.visited.len()
                );
                self.set_status(format!("Game loaded from slot {}!", slot));
                Ok(())
            }
            Err(SaveError::NotFound { slot }) => {
                log::warn!("No save found in slot {}", slot);
                self.set_status(format!("No save found in slot {}!", slot));
                Err(SaveError::NotFound { slot })
            }
            Err(e) => {
                log::warn!("Error loading game: {}", e);
                self.set_status("Load failed!");
                Err(e)
            }
        }
    }

    /// Has the `"x,y"` room been visited? Never changes state.
    pub fn lookup(&self, query: &str) -> Result<LookupOutcome, LookupError> {
        let coord = parse_coordinate(query)?;
        Ok(if self.visited.contains(coord) {
            LookupOutcome::Visited(coord)
        } else {
            LookupOutcome::Unknown(coord)
        })
    }

    // ── Presentation ──

    /// Draw list for the current state, back to front
    pub fn frame(&self) -> Frame {
        let panel = &self.config.panel;
        let mut commands = vec![DrawCommand::Fill {
            color: colors::BACKGROUND,
        }];
        commands.extend(render::carpet_tiles(self.room, panel));
        commands.extend(self.footsteps.iter().filter_map(render::ripple_ring));

        if let Some(room) = self.world.get(self.room) {
            for (i, wall) in room.walls.iter().enumerate() {
                let shade = self.wall_shades.get(i).copied().unwrap_or(0);
                commands.push(DrawCommand::FillRect {
                    rect: wall.rect(),
                    color: render::wall_color(shade),
                });
                commands.push(DrawCommand::OutlineRect {
                    rect: wall.rect(),
                    color: colors::CEILING,
                    width: 1.0,
                });
            }
        }

        commands.push(DrawCommand::Circle {
            x: self.player.x,
            y: self.player.y,
            radius: self.player.radius,
            fill: if self.moving {
                colors::PLAYER_MOVING
            } else {
                colors::PLAYER
            },
            outline: colors::PLAYER_OUTLINE,
            outline_width: 2.0,
        });
        commands.push(DrawCommand::Darkness(self.illumination.clone()));

        Frame {
            commands,
            hud: Hud {
                room: format!("Room: {}", self.room),
                visited: format!("Rooms Visited: {}", self.visited.len()),
                status: self.status.as_ref().map(|s| s.text.clone()),
                hint: (self.frame_count < HINT_FRAMES).then_some(render::HINT),
            },
        }
    }

    /// Closing line for the session
    pub fn summary(&self) -> String {
        format!(
            "Session ended. You explored {} rooms in the Backrooms.",
            self.visited.len()
        )
    }

    // ── Accessors ──

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn room(&self) -> RoomCoordinate {
        self.room
    }

    pub fn world(&self) -> &WorldCache {
        &self.world
    }

    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    pub fn footsteps(&self) -> &FootstepTracker {
        &self.footsteps
    }

    pub fn illumination(&self) -> &IlluminationMask {
        &self.illumination
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_ref().map(|s| s.text.as_str())
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn save_store(&self) -> &SaveStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backrooms_logic::geometry::Edge;

    fn temp_config(name: &str) -> GameConfig {
        let dir = std::env::temp_dir().join(format!(
            "backrooms-engine-{}-{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        GameConfig {
            save_dir: dir,
            ..Default::default()
        }
    }

    fn engine() -> SimulationEngine {
        SimulationEngine::with_cosmetic_seed(temp_config("default"), 7)
    }

    fn held_right() -> InputState {
        InputState {
            right: true,
            aim: (1900.0, 540.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_starts_in_origin() {
        let e = engine();
        assert_eq!(e.room(), RoomCoordinate::ORIGIN);
        assert_eq!(e.visited().len(), 1);
        assert!(e.world().contains(RoomCoordinate::ORIGIN));
        assert_eq!((e.player.x, e.player.y), (960.0, 540.0));
    }

    #[test]
    fn test_edge_step_transitions_instead_of_colliding() {
        let mut e = engine();
        e.player.x = 5.0;
        e.player.y = 1000.0;

        match e.step(-5.0, 0.0) {
            StepOutcome::Transition(t) => assert_eq!(t.edge, Edge::Left),
            other => panic!("expected transition, got {:?}", other),
        }
        assert_eq!(e.room(), RoomCoordinate::new(-1, 0));
        assert_eq!((e.player.x, e.player.y), (1870.0, 1000.0));
        assert!(e.visited().contains(RoomCoordinate::new(-1, 0)));
        assert!(e.world().contains(RoomCoordinate::new(-1, 0)));
    }

    #[test]
    fn test_walk_right_through_start_room_door() {
        let mut e = engine();
        let mut entered = Vec::new();
        for _ in 0..400 {
            entered.extend(e.tick(&held_right()).entered);
            if !entered.is_empty() {
                break;
            }
        }
        assert_eq!(entered, vec![RoomCoordinate::new(1, 0)]);
        assert_eq!(e.room(), RoomCoordinate::new(1, 0));
        assert_eq!(e.player.x, 50.0);
        assert_eq!(e.visited().len(), 2);
        assert!(e.footsteps().is_empty());
    }

    #[test]
    fn test_footsteps_stay_bounded() {
        let mut e = engine();
        let input = InputState {
            up: true,
            ..Default::default()
        };
        for _ in 0..20 {
            let report = e.tick(&input);
            assert!(report.moving);
            assert!(e.footsteps().len() <= 8);
        }
        assert_eq!(e.footsteps().len(), 8);
        assert!(e.is_moving());
    }

    #[test]
    fn test_blocked_step_leaves_no_ripple() {
        let mut e = engine();
        // Just below the top border, away from the door
        e.player.x = 200.0;
        e.player.y = 18.0;
        assert_eq!(e.step(0.0, -3.0), StepOutcome::Blocked);
        assert_eq!((e.player.x, e.player.y), (200.0, 18.0));
        assert!(e.footsteps().is_empty());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let mut e = SimulationEngine::with_cosmetic_seed(temp_config("roundtrip"), 1);
        e.player.x = 5.0;
        e.player.y = 1000.0;
        e.step(-5.0, 0.0);
        e.player.y = 612.5;

        let path = e.save(1).expect("Save failed");
        assert!(path.ends_with("save_slot_1.json"));
        assert_eq!(e.status(), Some("Game saved to slot 1!"));

        let mut fresh = SimulationEngine::with_cosmetic_seed(temp_config("roundtrip-load"), 2);
        let record = e.save_store().load(1).expect("Load failed");
        fresh.restore(record);
        assert_eq!(fresh.room(), RoomCoordinate::new(-1, 0));
        assert_eq!((fresh.player.x, fresh.player.y), (1870.0, 612.5));
        assert_eq!(fresh.visited(), e.visited());
        assert!(fresh.world().contains(RoomCoordinate::new(-1, 0)));

        e.player.x = 300.0;
        e.load(1).expect("Load failed");
        assert_eq!(e.player.x, 1870.0);
        assert_eq!(e.status(), Some("Game loaded from slot 1!"));

        let _ = std::fs::remove_dir_all(e.save_store().dir());
    }

    #[test]
    fn test_load_missing_slot_keeps_state() {
        let mut e = SimulationEngine::with_cosmetic_seed(temp_config("missing"), 3);
        let before = e.player;
        assert!(matches!(e.load(3), Err(SaveError::NotFound { slot: 3 })));
        assert_eq!(e.status(), Some("No save found in slot 3!"));
        assert_eq!(e.player, before);
        assert_eq!(e.room(), RoomCoordinate::ORIGIN);
    }

    #[test]
    fn test_save_into_file_path_fails() {
        let mut config = temp_config("save-blocked");
        std::fs::write(&config.save_dir, b"not a directory").unwrap();
        let blocker = config.save_dir.clone();
        config.save_dir = blocker.join("slots");

        let mut e = SimulationEngine::with_cosmetic_seed(config, 5);
        assert!(matches!(e.save(1), Err(SaveError::Io(_))));
        assert_eq!(e.status(), Some("Save failed!"));
        assert!(!e.save_store().exists(1));

        let _ = std::fs::remove_file(blocker);
    }

    #[test]
    fn test_corrupt_slot_fails_without_changing_state() {
        let mut e = SimulationEngine::with_cosmetic_seed(temp_config("corrupt"), 6);
        e.player.x = 5.0;
        e.player.y = 1000.0;
        e.step(-5.0, 0.0);
        let (player, room, visited) = (e.player, e.room(), e.visited().clone());

        std::fs::create_dir_all(e.save_store().dir()).unwrap();
        std::fs::write(e.save_store().slot_path(2), b"{ \"version\": \"1.0\", ").unwrap();

        assert!(e.load(2).is_err());
        assert_eq!(e.status(), Some("Load failed!"));
        assert_eq!(e.player, player);
        assert_eq!(e.room(), room);
        assert_eq!(e.visited(), &visited);

        let _ = std::fs::remove_dir_all(e.save_store().dir());
    }

    #[test]
    fn test_quick_save_command() {
        let mut e = SimulationEngine::with_cosmetic_seed(temp_config("quicksave"), 4);
        e.tick(&InputState {
            commands: vec![Command::QuickSave],
            ..Default::default()
        });
        assert!(e.save_store().exists(1));
        assert_eq!(e.status(), Some("Game saved to slot 1!"));
        let _ = std::fs::remove_dir_all(e.save_store().dir());
    }

    #[test]
    fn test_status_expires() {
        let mut e = engine();
        e.set_status("Game saved to slot 1!");
        let idle = InputState::default();
        for _ in 0..170 {
            e.tick(&idle);
        }
        assert!(e.status().is_some());
        for _ in 0..20 {
            e.tick(&idle);
        }
        assert!(e.status().is_none());
    }

    #[test]
    fn test_lookup() {
        let mut e = engine();
        assert_eq!(
            e.lookup("0,0"),
            Ok(LookupOutcome::Visited(RoomCoordinate::ORIGIN))
        );
        assert_eq!(
            e.lookup(" 4 , -2 "),
            Ok(LookupOutcome::Unknown(RoomCoordinate::new(4, -2)))
        );
        assert!(e.lookup("4;2").is_err());

        let report = e.tick(&InputState {
            commands: vec![
                Command::Lookup("0,0".into()),
                Command::Lookup("9,9".into()),
                Command::Lookup("nope".into()),
            ],
            ..Default::default()
        });
        assert_eq!(
            report.lookups,
            vec![
                "Room (0, 0) has been visited.".to_string(),
                "Room (9, 9) is unknown (not yet visited).".to_string(),
                "Invalid format. Use: x,y".to_string(),
            ]
        );
        assert_eq!(e.visited().len(), 1);
    }

    #[test]
    fn test_quit_command() {
        let mut e = engine();
        let report = e.tick(&InputState {
            commands: vec![Command::Quit],
            ..Default::default()
        });
        assert!(report.quit);
    }

    #[test]
    fn test_hint_only_in_first_frames() {
        let mut e = engine();
        let idle = InputState::default();
        for _ in 0..299 {
            e.tick(&idle);
        }
        assert_eq!(e.frame().hud.hint, Some(render::HINT));
        e.tick(&idle);
        assert_eq!(e.frame().hud.hint, None);
    }

    #[test]
    fn test_frame_layers() {
        let mut e = engine();
        e.tick(&InputState::with_aim((1500.0, 540.0)));
        let frame = e.frame();

        assert!(matches!(frame.commands.first(), Some(DrawCommand::Fill { .. })));
        assert!(matches!(frame.commands.last(), Some(DrawCommand::Darkness(_))));
        let walls = frame
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::OutlineRect { .. }))
            .count();
        assert_eq!(walls, 8);
        assert_eq!(frame.hud.room, "Room: (0, 0)");
        assert_eq!(frame.hud.visited, "Rooms Visited: 1");
        assert!(e.illumination().lit_cell_count() > 0);
    }

    #[test]
    fn test_cosmetic_seed_does_not_change_rooms() {
        let mut a = SimulationEngine::with_cosmetic_seed(temp_config("cosmetic-a"), 10);
        let mut b = SimulationEngine::with_cosmetic_seed(temp_config("cosmetic-b"), 99);
        for _ in 0..400 {
            a.tick(&held_right());
            b.tick(&held_right());
        }
        assert_eq!(a.room(), b.room());
        assert_eq!(
            a.world().get(a.room()).map(|r| &r.walls),
            b.world().get(b.room()).map(|r| &r.walls)
        );
        assert_eq!((a.player.x, a.player.y), (b.player.x, b.player.y));
    }

    #[test]
    fn test_cache_retention_evicts() {
        let mut config = temp_config("retention");
        config.cache_retention = Some(0);
        let mut e = SimulationEngine::with_cosmetic_seed(config, 5);
        e.player.x = 5.0;
        e.step(-5.0, 0.0);
        e.tick(&InputState::default());
        assert_eq!(e.world().len(), 1);
        assert!(e.world().contains(RoomCoordinate::new(-1, 0)));
    }

    #[test]
    fn test_summary() {
        let e = engine();
        assert_eq!(
            e.summary(),
            "Session ended. You explored 1 rooms in the Backrooms."
        );
    }
}
