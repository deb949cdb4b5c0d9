use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use badgeforge::{
    BadgeConfig, BadgeEditor, DevicePixelRatio, DirectorySink, DisplayLayout, GestureEvent,
    TransformState, Vec2,
};

#[derive(Parser, Debug)]
#[command(name = "badgeforge", version)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a badge once and write it as `badge.png`.
    Render(RenderArgs),
    /// Feed a recorded gesture script to the editor, then export.
    Replay(ReplayArgs),
    /// Print the display box for a viewport width.
    Layout(LayoutArgs),
}

#[derive(Parser, Debug)]
struct SourceArgs {
    /// Editor config JSON. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the template and placeholder images.
    #[arg(long, default_value = ".")]
    assets: PathBuf,

    /// Avatar image to upload.
    #[arg(long)]
    avatar: Option<PathBuf>,

    /// Override the configured device pixel ratio.
    #[arg(long)]
    dpr: Option<f64>,

    /// Output directory for `badge.png`.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Horizontal avatar offset in logical pixels.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    offset_x: f64,

    /// Vertical avatar offset in logical pixels.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    offset_y: f64,

    /// Avatar zoom factor.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,
}

#[derive(Parser, Debug)]
struct ReplayArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Gesture script JSON: `{ "viewport_width": f64?, "events": [GestureEvent] }`.
    #[arg(long)]
    gestures: PathBuf,
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    /// Editor config JSON. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Viewport width in CSS pixels.
    #[arg(long)]
    viewport_width: f64,
}

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct GestureScript {
    #[serde(default = "default_viewport_width")]
    viewport_width: f64,
    events: Vec<GestureEvent>,
}

fn default_viewport_width() -> f64 {
    1024.0
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Replay(args) => cmd_replay(args),
        Command::Layout(args) => cmd_layout(args),
    }
}

fn load_config(path: Option<&Path>, dpr: Option<f64>) -> anyhow::Result<BadgeConfig> {
    let mut cfg = match path {
        Some(p) => BadgeConfig::from_path(p)
            .with_context(|| format!("load config '{}'", p.display()))?,
        None => BadgeConfig::default(),
    };
    if let Some(dpr) = dpr {
        cfg.dpr = DevicePixelRatio::new(dpr)?;
    }
    Ok(cfg)
}

fn open_editor(source: &SourceArgs) -> anyhow::Result<BadgeEditor> {
    let cfg = load_config(source.config.as_deref(), source.dpr)?;
    let mut editor = BadgeEditor::new(cfg, &source.assets).context("create editor")?;
    editor
        .upload_file(source.avatar.as_deref())
        .context("upload avatar")?;
    Ok(editor)
}

fn export(editor: &mut BadgeEditor, out: &Path) -> anyhow::Result<()> {
    let mut sink = DirectorySink::new(out);
    editor
        .download(&mut sink)
        .with_context(|| format!("export badge to '{}'", out.display()))?;
    if let Some(path) = sink.last_written() {
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut editor = open_editor(&args.source)?;
    editor.set_transform(TransformState {
        offset: Vec2::new(args.offset_x, args.offset_y),
        scale: args.scale,
    });
    export(&mut editor, &args.source.out)
}

fn cmd_replay(args: ReplayArgs) -> anyhow::Result<()> {
    let f = std::fs::File::open(&args.gestures)
        .with_context(|| format!("open gesture script '{}'", args.gestures.display()))?;
    let script: GestureScript = serde_json::from_reader(std::io::BufReader::new(f))
        .with_context(|| format!("parse gesture script '{}'", args.gestures.display()))?;

    let mut editor = open_editor(&args.source)?;
    editor.mount(script.viewport_width);
    let mut changed = 0usize;
    for event in &script.events {
        if editor.handle_gesture(event).changed {
            changed += 1;
        }
    }
    let t = editor.transform();
    tracing::info!(
        events = script.events.len(),
        changed,
        offset_x = t.offset.x,
        offset_y = t.offset.y,
        scale = t.scale,
        "gesture script replayed"
    );
    export(&mut editor, &args.source.out)?;
    editor.unmount();
    Ok(())
}

fn cmd_layout(args: LayoutArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref(), None)?;
    cfg.validate()?;
    let layout = DisplayLayout::for_viewport(args.viewport_width, cfg.template.canvas, &cfg.layout);
    let d = layout.display();
    println!("{}x{}", d.width, d.height);
    Ok(())
}
