use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyCode},
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, Clear, ClearType},
};
use flying_toasters::{
    create_clap_command, handle_clap_matches,
    pipeline::{FrameBuffer, Pipeline, TermBuffer},
    DisplayTarget, Invocation, RenderOptions, Result, Scene, Settings, DEFAULT_HEIGHT,
    DEFAULT_WIDTH,
};
use log::{info, warn, LevelFilter};
use minifb::{Key, KeyRepeat, Scale, Window, WindowOptions};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode, WriteLogger};
use std::{
    fs::OpenOptions,
    io,
    time::{Duration, Instant},
};

const LOG_FILE: &str = "flying_toasters.log";
const FRAME_INTERVAL: Duration = Duration::from_millis(16); // ~60 FPS

fn main() -> Result<()> {
    let matches = create_clap_command().get_matches();
    let invocation = handle_clap_matches(&matches);

    init_logging(&invocation.target, invocation.log_level)?;

    let stored = Settings::load(&invocation.settings_path).unwrap_or_else(|e| {
        warn!("Ignoring unreadable settings: {e}");
        Settings::default()
    });
    let settings = invocation.apply(stored);
    if invocation.save_settings {
        settings.save(&invocation.settings_path)?;
    }
    info!("Running with {settings:?}");

    match invocation.target.clone() {
        DisplayTarget::Window => run_win(&invocation, settings),
        DisplayTarget::Terminal => run_term(&invocation, settings),
        DisplayTarget::Frame {
            frames,
            out,
            width,
            height,
        } => {
            let scene = build_scene(&invocation, settings, width, height);
            let mut pipeline = Pipeline::<FrameBuffer>::new(width, height, scene);
            let options = settings.render_options();
            for _ in 0..frames {
                pipeline.render_frame(&options, None)?;
            }
            pipeline.front_buffer().to_image().save(&out)?;
            info!("Wrote frame {frames} to {}", out.display());
            Ok(())
        }
    }
}

/// The terminal renderer owns stdout, so it logs to a file.
fn init_logging(target: &DisplayTarget, level: LevelFilter) -> Result<()> {
    match target {
        DisplayTarget::Terminal => {
            let log_file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(LOG_FILE)?;
            WriteLogger::init(level, Config::default(), log_file)?;
        }
        _ => {
            TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto)?;
        }
    }
    Ok(())
}

fn build_scene(invocation: &Invocation, settings: Settings, width: usize, height: usize) -> Scene {
    match invocation.seed {
        Some(seed) => Scene::with_seed(settings.toaster_count, width, height, seed),
        None => Scene::initialize(settings.toaster_count, width, height),
    }
}

fn run_win(invocation: &Invocation, settings: Settings) -> Result<()> {
    let mut window = Window::new(
        "Flying Toasters",
        DEFAULT_WIDTH,
        DEFAULT_HEIGHT,
        WindowOptions {
            resize: true,
            scale: Scale::X1,
            ..WindowOptions::default()
        },
    )?;
    window.set_target_fps(60);

    let scene = build_scene(invocation, settings, DEFAULT_WIDTH, DEFAULT_HEIGHT);
    let mut pipeline = Pipeline::<FrameBuffer>::new(DEFAULT_WIDTH, DEFAULT_HEIGHT, scene);
    let mut options = settings.render_options();

    while window.is_open() {
        if window.is_key_down(Key::Escape) || window.is_key_down(Key::Q) {
            break;
        }
        window_handle_input(&window, &mut options);

        let (w, h) = window.get_size();
        if w > 0 && h > 0 && (w, h) != (pipeline.width, pipeline.height) {
            pipeline.resize(w, h);
        }

        pipeline.render_frame(&options, Some(&mut window))?;

        if pipeline.metrics().fps_counter % 60 == 0 {
            window.set_title(&format!("Flying Toasters | {}", pipeline.metrics()));
        }
    }

    Ok(())
}

/// S, G and T flip scanlines, glow and trails.
fn window_handle_input(window: &Window, options: &mut RenderOptions) {
    if window.is_key_pressed(Key::S, KeyRepeat::No) {
        options.show_scanlines = !options.show_scanlines;
        info!("Scanlines: {}", options.show_scanlines);
    }
    if window.is_key_pressed(Key::G, KeyRepeat::No) {
        options.show_glow = !options.show_glow;
        info!("Glow: {}", options.show_glow);
    }
    if window.is_key_pressed(Key::T, KeyRepeat::No) {
        options.show_trails = !options.show_trails;
        info!("Trails: {}", options.show_trails);
    }
}

fn run_term(invocation: &Invocation, settings: Settings) -> Result<()> {
    // 1) Setup crossterm
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        terminal::EnterAlternateScreen,
        Hide,
        Clear(ClearType::All)
    )?;

    let result = term_loop(invocation, settings);

    // Restore the terminal even if the loop failed
    cleanup_terminal()?;
    result
}

fn term_loop(invocation: &Invocation, settings: Settings) -> Result<()> {
    // 2) Create pipeline
    let (cols, rows) = terminal::size()?;
    let (width, height) = TermBuffer::dims_for_terminal(cols, rows);
    let scene = build_scene(invocation, settings, width, height);
    let mut pipeline = Pipeline::<TermBuffer>::new(width, height, scene);
    let options = settings.render_options();

    // 3) For timing
    let mut last_frame = Instant::now();

    // 4) Main loop
    loop {
        // (a) Check for input
        if event::poll(Duration::from_millis(1))? {
            match event::read()? {
                Event::Key(key) if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) => {
                    break;
                }
                Event::Resize(cols, rows) => {
                    let (w, h) = TermBuffer::dims_for_terminal(cols, rows);
                    pipeline.resize(w, h);
                }
                _ => {}
            }
        }

        // (b) Check if enough time has passed
        let now = Instant::now();
        if now - last_frame >= FRAME_INTERVAL {
            pipeline.render_frame(&options, None)?;
            last_frame = now;
        }
    }

    info!("{}", pipeline.metrics());
    Ok(())
}

fn cleanup_terminal() -> Result<()> {
    disable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, Show, terminal::LeaveAlternateScreen)?;
    Ok(())
}
