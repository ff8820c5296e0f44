//! Backrooms Viewer - Bevy front end for the simulation
//!
//! Reads the keyboard and mouse into an [`InputState`], ticks the engine at a
//! fixed 60 Hz and paints each [`backrooms_core::render::Frame`] into a
//! texture the size of one panel. HUD lines are `Text2d` entities on top.
//!
//! An optional `backrooms.json` in the working directory overrides
//! [`GameConfig`] defaults.

mod canvas;

use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::input::ButtonState;
use bevy::prelude::*;
use bevy::render::camera::ScalingMode;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy::sprite::Anchor;
use bevy::window::PrimaryWindow;

use backrooms_core::engine::SimulationEngine;
use backrooms_core::input::{Command, InputState};
use backrooms_logic::config::{GameConfig, PanelConfig};
use backrooms_logic::constants::colors::{self, Rgb};

use canvas::Canvas;

const CONFIG_PATH: &str = "backrooms.json";
const LOOKUP_PROMPT: &str = "Enter room coordinates to search (x,y): ";

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Backrooms - 2D Edition".to_string(),
                resolution: (1280.0, 720.0).into(),
                present_mode: bevy::window::PresentMode::AutoVsync,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(Time::<Fixed>::from_hz(60.0))
        .insert_resource(PendingInput::default())
        .insert_resource(LookupPrompt::default())
        .add_systems(Startup, setup)
        .add_systems(Update, (lookup_prompt, gather_input, render_frame).chain())
        .add_systems(FixedUpdate, update_simulation)
        .add_systems(Last, print_summary)
        .run();
}

#[derive(Resource)]
struct SimWrapper(SimulationEngine);

/// Input collected between fixed ticks
#[derive(Resource, Default)]
struct PendingInput(InputState);

/// The typed `x,y` query, open between two Enter presses
#[derive(Resource, Default)]
struct LookupPrompt {
    open: bool,
    text: String,
    /// Enter/Esc already handled this frame
    closed_this_frame: bool,
    last_answer: Option<String>,
}

#[derive(Resource)]
struct PanelCanvas {
    canvas: Canvas,
    image: Handle<Image>,
}

#[derive(Component, Clone, Copy, PartialEq, Eq)]
enum HudText {
    Room,
    Visited,
    Status,
    Hint,
    Prompt,
}

fn load_config() -> GameConfig {
    if !std::path::Path::new(CONFIG_PATH).exists() {
        return GameConfig::default();
    }
    match GameConfig::load(CONFIG_PATH) {
        Ok(config) => {
            info!("Loaded config from {}", CONFIG_PATH);
            config
        }
        Err(e) => {
            warn!("Ignoring {}: {}", CONFIG_PATH, e);
            GameConfig::default()
        }
    }
}

fn rgb(color: Rgb) -> Color {
    Color::srgb_u8(color.0, color.1, color.2)
}

/// Panel pixels (y down, origin top-left) to world units (y up, centered)
fn panel_to_world(x: f32, y: f32, panel: &PanelConfig) -> Vec2 {
    Vec2::new(x - panel.width_f() / 2.0, panel.height_f() / 2.0 - y)
}

fn world_to_panel(world: Vec2, panel: &PanelConfig) -> (f32, f32) {
    (
        world.x + panel.width_f() / 2.0,
        panel.height_f() / 2.0 - world.y,
    )
}

fn setup(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    mut pending: ResMut<PendingInput>,
) {
    let config = load_config();
    let panel = config.panel;
    let (width, height) = (panel.width as u32, panel.height as u32);

    commands.spawn((
        Camera2d,
        OrthographicProjection {
            scaling_mode: ScalingMode::AutoMin {
                min_width: panel.width_f(),
                min_height: panel.height_f(),
            },
            ..OrthographicProjection::default_2d()
        },
    ));

    let image = Image::new_fill(
        Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        &[0, 0, 0, 255],
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
    );
    let handle = images.add(image);
    commands.spawn(Sprite::from_image(handle.clone()));
    commands.insert_resource(PanelCanvas {
        canvas: Canvas::new(width, height),
        image: handle,
    });

    // HUD lines
    let lines = [
        (HudText::Room, (10.0, 10.0), colors::HUD_TEXT, Anchor::TopLeft),
        (HudText::Visited, (10.0, 50.0), colors::HUD_TEXT, Anchor::TopLeft),
        (HudText::Status, (10.0, 90.0), colors::STATUS_TEXT, Anchor::TopLeft),
        (HudText::Prompt, (10.0, 130.0), colors::HUD_TEXT, Anchor::TopLeft),
        (
            HudText::Hint,
            (panel.width_f() / 2.0, panel.height_f() - 50.0),
            colors::HINT_TEXT,
            Anchor::Center,
        ),
    ];
    for (kind, (x, y), color, anchor) in lines {
        commands.spawn((
            Text2d::new(""),
            TextFont {
                font_size: 36.0,
                ..default()
            },
            TextColor(rgb(color)),
            anchor,
            Transform::from_translation(panel_to_world(x, y, &panel).extend(10.0)),
            kind,
        ));
    }

    let (cx, cy) = panel.center();
    pending.0.aim = (cx + 100.0, cy);

    println!("{}", "=".repeat(60));
    println!("Welcome to the Backrooms - 2D Edition");
    println!("{}", "=".repeat(60));
    println!("Controls:");
    println!("  WASD - Move between rooms");
    println!("  F5 - Quick save (slot 1)");
    println!("  F9 - Quick load (slot 1)");
    println!("  ENTER - Search for room coordinates");
    println!("  ESC - Exit");
    println!("{}", "=".repeat(60));

    commands.insert_resource(SimWrapper(SimulationEngine::new(config)));
}

fn lookup_prompt(
    mut events: EventReader<KeyboardInput>,
    mut prompt: ResMut<LookupPrompt>,
    mut pending: ResMut<PendingInput>,
) {
    prompt.closed_this_frame = false;

    for event in events.read() {
        if event.state != ButtonState::Pressed {
            continue;
        }
        if !prompt.open {
            if event.key_code == KeyCode::Enter || event.key_code == KeyCode::NumpadEnter {
                prompt.open = true;
                prompt.text.clear();
            }
            continue;
        }

        match &event.logical_key {
            Key::Enter => {
                let query = std::mem::take(&mut prompt.text);
                pending.0.commands.push(Command::Lookup(query));
                prompt.open = false;
                prompt.closed_this_frame = true;
            }
            Key::Escape => {
                prompt.open = false;
                prompt.text.clear();
                prompt.closed_this_frame = true;
            }
            Key::Backspace => {
                prompt.text.pop();
            }
            Key::Space => prompt.text.push(' '),
            Key::Character(s) => prompt.text.push_str(s),
            _ => {}
        }
    }
}

fn gather_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    prompt: Res<LookupPrompt>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform)>,
    sim: Option<Res<SimWrapper>>,
    mut pending: ResMut<PendingInput>,
) {
    let Some(sim) = sim else {
        return;
    };
    let input = &mut pending.0;

    // Typing a query freezes the player
    let typing = prompt.open || prompt.closed_this_frame;
    input.up = !typing && (keyboard.pressed(KeyCode::KeyW) || keyboard.pressed(KeyCode::ArrowUp));
    input.down =
        !typing && (keyboard.pressed(KeyCode::KeyS) || keyboard.pressed(KeyCode::ArrowDown));
    input.left =
        !typing && (keyboard.pressed(KeyCode::KeyA) || keyboard.pressed(KeyCode::ArrowLeft));
    input.right =
        !typing && (keyboard.pressed(KeyCode::KeyD) || keyboard.pressed(KeyCode::ArrowRight));

    if !typing {
        if keyboard.just_pressed(KeyCode::F5) {
            input.commands.push(Command::QuickSave);
        }
        if keyboard.just_pressed(KeyCode::F9) {
            input.commands.push(Command::QuickLoad);
        }
        if keyboard.just_pressed(KeyCode::Escape) {
            input.commands.push(Command::Quit);
        }
    }

    // Flashlight follows the cursor; keep the last aim when it leaves
    let Ok(window) = window_query.get_single() else {
        return;
    };
    let Some(cursor_pos) = window.cursor_position() else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.get_single() else {
        return;
    };
    let Ok(world_pos) = camera.viewport_to_world_2d(camera_transform, cursor_pos) else {
        return;
    };
    input.aim = world_to_panel(world_pos, &sim.0.config().panel);
}

fn update_simulation(
    sim: Option<ResMut<SimWrapper>>,
    mut pending: ResMut<PendingInput>,
    mut prompt: ResMut<LookupPrompt>,
    mut exit: EventWriter<AppExit>,
) {
    let Some(mut sim) = sim else {
        return;
    };

    let input = pending.0.clone();
    pending.0.commands.clear();

    let report = sim.0.tick(&input);
    for answer in report.lookups {
        info!("{}", answer);
        prompt.last_answer = Some(answer);
    }
    if report.quit {
        exit.send(AppExit::Success);
    }
}

fn render_frame(
    sim: Option<Res<SimWrapper>>,
    canvas: Option<ResMut<PanelCanvas>>,
    prompt: Res<LookupPrompt>,
    mut images: ResMut<Assets<Image>>,
    mut text_query: Query<(&mut Text2d, &HudText)>,
) {
    let (Some(sim), Some(mut canvas)) = (sim, canvas) else {
        return;
    };

    let frame = sim.0.frame();
    canvas.canvas.draw_frame(&frame);
    if let Some(image) = images.get_mut(&canvas.image) {
        image.data.copy_from_slice(canvas.canvas.data());
    }

    for (mut text, kind) in &mut text_query {
        **text = match kind {
            HudText::Room => frame.hud.room.clone(),
            HudText::Visited => frame.hud.visited.clone(),
            HudText::Status => frame.hud.status.clone().unwrap_or_default(),
            HudText::Hint => frame.hud.hint.unwrap_or_default().to_string(),
            HudText::Prompt if prompt.open => format!("{}{}_", LOOKUP_PROMPT, prompt.text),
            HudText::Prompt => prompt.last_answer.clone().unwrap_or_default(),
        };
    }
}

fn print_summary(
    mut exits: EventReader<AppExit>,
    sim: Option<Res<SimWrapper>>,
    mut printed: Local<bool>,
) {
    if exits.read().next().is_none() || *printed {
        return;
    }
    if let Some(sim) = sim {
        println!("\n{}", sim.0.summary());
        *printed = true;
    }
}
