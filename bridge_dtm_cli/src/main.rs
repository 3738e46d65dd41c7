use bridge_dtm::{
    config::{read_config_json, write_config_json, DeckConfig},
    geometry::{Point, Point3},
    gis::{AttributeFilter, LineFeature},
    interpolate::ElevationInterpolator,
    io::{
        cloud::InMemoryCloud,
        geojson::GeoJsonFile,
        sink::{DirectorySink, OutputFormat},
        write_string,
    },
    pipeline::{bridge_groups, reference_lines, write_outcomes, FeatureSource, PointCloudSource},
    Error, Pipeline, Result, SpatialIndex,
};
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use log::LevelFilter;

#[cfg(feature = "shapefile")]
use bridge_dtm::io::shp::ShapefileSource;

#[derive(Parser)]
#[command(name = "bridge_dtm_cli", version)]
struct Cli {
    /// Log debug details of every processed segment.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

/// Overrides applied on top of the default or loaded configuration.
#[derive(Args, Default)]
struct ConfigArgs {
    /// JSON configuration file.
    #[arg(long)]
    config: Option<String>,
    /// Half width of the bridge deck.
    #[arg(long)]
    half_width: Option<f64>,
    /// Distance between stations and between offsets.
    #[arg(long)]
    step: Option<f64>,
    /// Number of neighbours used for interpolation.
    #[arg(long)]
    neighbors: Option<usize>,
    /// Span limit as a multiple of the half width.
    #[arg(long)]
    max_span_factor: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Remove bridge points and fill the gap with interpolated terrain.
    Run {
        #[arg(long)]
        cloud: String,
        #[arg(long)]
        bridges: String,
        /// Rivers, roads or railways crossed by the bridges.
        #[arg(long)]
        references: Option<String>,
        #[arg(long)]
        bridge_filter: Option<String>,
        #[arg(long)]
        reference_filter: Option<String>,
        #[arg(long)]
        out_dir: String,
        #[arg(long, default_value = "test")]
        prefix: String,
        /// Output format: obj, csv or las.
        #[arg(long, default_value = "obj")]
        format: String,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Print bridge groups after merging overlapping skirts.
    Merge {
        #[arg(long)]
        bridges: String,
        #[arg(long)]
        bridge_filter: Option<String>,
    },
    /// Write every fetched point labelled as bridge or terrain.
    Classify {
        #[arg(long)]
        cloud: String,
        #[arg(long)]
        bridges: String,
        #[arg(long)]
        bridge_filter: Option<String>,
        #[arg(long)]
        output: String,
        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Interpolate the elevation at a location from the whole cloud.
    Interpolate {
        #[arg(long)]
        cloud: String,
        x: f64,
        y: f64,
        #[arg(long)]
        neighbors: Option<usize>,
    },
    /// Write the default configuration as JSON.
    WriteConfig { path: String },
}

fn load_config(args: &ConfigArgs) -> Result<DeckConfig> {
    let mut config = match &args.config {
        Some(path) => read_config_json(path)?,
        None => DeckConfig::default(),
    };
    if let Some(w) = args.half_width {
        config.half_width = w;
    }
    if let Some(s) = args.step {
        config.station_step = s;
        config.offset_step = s;
    }
    if let Some(k) = args.neighbors {
        config.neighbors = k;
        config.candidates = config.candidates.max(k);
    }
    if let Some(f) = args.max_span_factor {
        config.max_span_factor = f;
    }
    config.validate()?;
    Ok(config)
}

fn parse_filter(expr: Option<&str>) -> Result<AttributeFilter> {
    expr.map_or_else(|| Ok(AttributeFilter::all()), AttributeFilter::parse)
}

fn feature_source(path: &str) -> Result<Box<dyn FeatureSource>> {
    if path.to_ascii_lowercase().ends_with(".shp") {
        #[cfg(feature = "shapefile")]
        {
            return Ok(Box::new(ShapefileSource::new(path)));
        }
        #[cfg(not(feature = "shapefile"))]
        {
            return Err(Error::InvalidData(format!(
                "{path}: shapefile support not enabled"
            )));
        }
    }
    Ok(Box::new(GeoJsonFile::new(path)))
}

fn read_bridges(
    path: &str,
    filter: Option<&str>,
    cloud: Option<&InMemoryCloud>,
) -> Result<Vec<LineFeature>> {
    let extent = cloud.and_then(|c| c.bounds());
    feature_source(path)?.read_features(&parse_filter(filter)?, extent.as_ref())
}

#[allow(clippy::too_many_arguments)]
fn run(
    cloud: &str,
    bridges: &str,
    references: Option<&str>,
    bridge_filter: Option<&str>,
    reference_filter: Option<&str>,
    out_dir: &str,
    prefix: &str,
    format: &str,
    config: &ConfigArgs,
) -> Result<()> {
    let config = load_config(config)?;
    let format = OutputFormat::parse(format)
        .ok_or_else(|| Error::InvalidConfig(format!("unknown output format {format}")))?;
    let cloud = InMemoryCloud::from_path(cloud)?;
    let extent = cloud.bounds();
    let features = read_bridges(bridges, bridge_filter, Some(&cloud))?;
    let references = match references {
        Some(path) => reference_lines(
            &feature_source(path)?.read_features(&parse_filter(reference_filter)?, None)?,
        ),
        None => Vec::new(),
    };
    let groups = bridge_groups(&features, extent.as_ref());
    println!(
        "{} bridge features in {} groups, {} cloud points",
        features.len(),
        groups.len(),
        cloud.len()
    );

    let pipeline = Pipeline::new(config)?;
    let outcomes = pipeline.run(&groups, &references, &cloud);
    let mut sink = DirectorySink::new(out_dir, prefix, format)?;
    let written = write_outcomes(&outcomes, &mut sink)?;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(out) => println!(
                "group {}: {} points ({} bridge removed, {} synthetic)",
                outcome.group,
                out.points.len(),
                out.bridge,
                out.synthetic
            ),
            Err(e) => println!("group {}: skipped ({})", outcome.group, e),
        }
    }
    println!("Wrote {} files to {}", written, out_dir);
    Ok(())
}

fn merge(bridges: &str, bridge_filter: Option<&str>) -> Result<()> {
    let features = read_bridges(bridges, bridge_filter, None)?;
    let groups = bridge_groups(&features, None);
    for (i, g) in groups.iter().enumerate() {
        println!(
            "group {}: ({:.3}, {:.3}) - ({:.3}, {:.3}), {} polylines, {} segments",
            i,
            g.skirt.min_x,
            g.skirt.min_y,
            g.skirt.max_x,
            g.skirt.max_y,
            g.polylines.len(),
            g.segments().len()
        );
    }
    Ok(())
}

fn classify(
    cloud: &str,
    bridges: &str,
    bridge_filter: Option<&str>,
    output: &str,
    config: &ConfigArgs,
) -> Result<()> {
    let pipeline = Pipeline::new(load_config(config)?)?;
    let cloud = InMemoryCloud::from_path(cloud)?;
    let features = read_bridges(bridges, bridge_filter, Some(&cloud))?;
    let groups = bridge_groups(&features, cloud.bounds().as_ref());
    let mut lines = Vec::new();
    let (mut bridge, mut terrain) = (0, 0);
    for group in &groups {
        let classified = pipeline.classify_group(group, &cloud)?;
        bridge += classified.bridge.len();
        terrain += classified.terrain.len();
        let labelled = |pts: &[Point3], label: &str| -> Vec<String> {
            pts.iter()
                .map(|p| format!("{},{},{},{}", p.x, p.y, p.z, label))
                .collect()
        };
        lines.extend(labelled(&classified.terrain, "terrain"));
        lines.extend(labelled(&classified.bridge, "bridge"));
    }
    let mut contents = lines.join("\n");
    contents.push('\n');
    write_string(output, &contents)?;
    println!("Bridge: {}, terrain: {}", bridge, terrain);
    Ok(())
}

fn interpolate(cloud: &str, x: f64, y: f64, neighbors: Option<usize>) -> Result<()> {
    let mut config = DeckConfig::default();
    if let Some(k) = neighbors {
        config.neighbors = k;
        config.candidates = config.candidates.max(k);
    }
    config.validate()?;
    let cloud = InMemoryCloud::from_path(cloud)?;
    let index = SpatialIndex::from_points(cloud.points());
    let z = ElevationInterpolator::from_config(&index, &config).elevation_at(Point::new(x, y))?;
    println!("Elevation: {:.3}", z);
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let mut logger = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    if cli.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    let result = match cli.command {
        Commands::Run {
            cloud,
            bridges,
            references,
            bridge_filter,
            reference_filter,
            out_dir,
            prefix,
            format,
            config,
        } => run(
            &cloud,
            &bridges,
            references.as_deref(),
            bridge_filter.as_deref(),
            reference_filter.as_deref(),
            &out_dir,
            &prefix,
            &format,
            &config,
        ),
        Commands::Merge {
            bridges,
            bridge_filter,
        } => merge(&bridges, bridge_filter.as_deref()),
        Commands::Classify {
            cloud,
            bridges,
            bridge_filter,
            output,
            config,
        } => classify(&cloud, &bridges, bridge_filter.as_deref(), &output, &config),
        Commands::Interpolate {
            cloud,
            x,
            y,
            neighbors,
        } => interpolate(&cloud, x, y, neighbors),
        Commands::WriteConfig { path } => write_config_json(&path, &DeckConfig::default())
            .map(|()| println!("Wrote default configuration to {}", path)),
    };
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
