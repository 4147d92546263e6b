use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use lumen_core::load_obj;
use lumen_renderer::{render, Scene};

mod settings;

use settings::Settings;

const USAGE: &str = "Usage: lumen <mesh.obj> [output-stem] [--config <settings.json>]";

/// Command line arguments
#[derive(Debug, PartialEq)]
struct Args {
    mesh: PathBuf,
    output: PathBuf,
    config: Option<PathBuf>,
}

impl Args {
    fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self> {
        let mut positional = Vec::new();
        let mut config = None;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => match args.next() {
                    Some(path) => config = Some(PathBuf::from(path)),
                    None => bail!("--config needs a path\n{USAGE}"),
                },
                "--help" | "-h" => bail!("{USAGE}"),
                flag if flag.starts_with('-') => bail!("unknown option {flag}\n{USAGE}"),
                _ => positional.push(PathBuf::from(arg)),
            }
        }

        let mut positional = positional.into_iter();
        let Some(mesh) = positional.next() else {
            bail!("missing mesh path\n{USAGE}");
        };
        let output = positional.next().unwrap_or_else(|| PathBuf::from("render"));
        if let Some(extra) = positional.next() {
            bail!("unexpected argument {}\n{USAGE}", extra.display());
        }

        Ok(Self { mesh, output, config })
    }

    /// `<output>.<extension>`, keeping any dots already in the stem.
    fn output_path(&self, extension: &str) -> PathBuf {
        let mut path = OsString::from(self.output.as_os_str());
        path.push(".");
        path.push(extension);
        PathBuf::from(path)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse(std::env::args().skip(1))?;

    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    log::debug!("Settings: {:?}", settings);

    let start = Instant::now();
    let mut mesh = load_obj(&args.mesh)
        .with_context(|| format!("failed to load mesh {}", args.mesh.display()))?;
    if !settings.model.is_identity() {
        mesh.transform(&settings.model.matrix());
    }
    log::info!("Mesh loaded in {:.2?}", start.elapsed());

    let scene = Scene::from_mesh(&mesh);
    let camera = settings.camera.camera();

    let cancel = AtomicBool::new(false);
    let image = render(&scene, &camera, &settings.render, &cancel);

    image.save_png(args.output_path("png"))?;
    image.save_hdr(args.output_path("hdr"))?;

    Ok(())
}
