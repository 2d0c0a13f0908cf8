use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};
use geohash_tree::{
    BackendKind, IndexConfig, Point, StorageBackend, TreeBuilder, create_disk_index,
    index_from_geojson,
};
use log::info;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(version, about = "Build and query geohash polygon indexes", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Index a GeoJSON FeatureCollection into a textual index
    Index {
        input: PathBuf,
        output: PathBuf,

        #[arg(long, default_value_t = 3)]
        min: usize,

        #[arg(long, default_value_t = 8)]
        max: usize,

        /// Feature property holding the polygon id
        #[arg(long, default_value = "id")]
        id_field: String,

        /// Features indexed concurrently per batch
        #[arg(long, default_value_t = 2)]
        batch_size: usize,

        /// JSON (or TOML, with the `toml` feature) file overriding the flags above
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Convert a textual index into a table file
    BuildDb { input: PathBuf, output: PathBuf },
    /// Resolve `lon,lat` points to polygon ids
    Query {
        index: PathBuf,

        #[arg(required = true, allow_hyphen_values = true)]
        points: Vec<String>,

        #[arg(long, value_enum, default_value_t = Backend::Memory)]
        backend: Backend,
    },
    /// Look up one exact key
    Get {
        index: PathBuf,
        key: String,

        #[arg(long, value_enum, default_value_t = Backend::Memory)]
        backend: Backend,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Backend {
    Memory,
    Disk,
}

impl From<Backend> for BackendKind {
    fn from(backend: Backend) -> Self {
        match backend {
            Backend::Memory => BackendKind::Memory,
            Backend::Disk => BackendKind::Disk,
        }
    }
}

fn load_config(path: &Path) -> anyhow::Result<IndexConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;

    #[cfg(feature = "toml")]
    if path.extension().is_some_and(|ext| ext == "toml") {
        return Ok(IndexConfig::from_toml(&text)?);
    }

    Ok(IndexConfig::from_json(&text)?)
}

fn parse_point(text: &str) -> anyhow::Result<Point> {
    let Some((lon, lat)) = text.split_once(',') else {
        bail!("Expected lon,lat but got '{}'", text);
    };
    let lon: f64 = lon.trim().parse().with_context(|| format!("Bad longitude in '{}'", text))?;
    let lat: f64 = lat.trim().parse().with_context(|| format!("Bad latitude in '{}'", text))?;
    Ok(Point::new(lon, lat))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    match args.command {
        Command::Index {
            input,
            output,
            min,
            max,
            id_field,
            batch_size,
            config,
        } => {
            let config = match config {
                Some(path) => load_config(&path)?,
                None => IndexConfig::default()
                    .with_precision(min, max)
                    .with_id_field(id_field)
                    .with_batch_size(batch_size),
            };
            let stats = index_from_geojson(&input, &output, &config)?;
            info!(
                "Indexed {} features ({} skipped) into {}",
                stats.indexed,
                stats.skipped,
                output.display()
            );
        }
        Command::BuildDb { input, output } => {
            let table = create_disk_index(&input, &output)?;
            info!("Built {} with {} keys", output.display(), table.len());
        }
        Command::Query {
            index,
            points,
            backend,
        } => {
            let tree = TreeBuilder::new().path(index).backend(backend.into()).build()?;
            for text in &points {
                let point = parse_point(text)?;
                match tree.query(&point)? {
                    Some(id) => println!("{},{},{}", point.x(), point.y(), id),
                    None => println!("{},{},", point.x(), point.y()),
                }
            }
        }
        Command::Get {
            index,
            key,
            backend,
        } => {
            let tree = TreeBuilder::new().path(index).backend(backend.into()).build()?;
            match tree.get(&key)? {
                Some(value) => println!("{}", value),
                None => bail!("Key '{}' not found", key),
            }
        }
    }

    Ok(())
}

