mod input;
mod provenance;
mod script;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use mapsketch::prelude::*;
use mapsketch::report;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;
use tracing_subscriber::EnvFilter;

/// Log directives used when `RUST_LOG` is unset or unparsable.
const DEFAULT_LOG: &str = "info";

#[derive(Parser)]
#[command(name = "mapsketch")]
#[command(about = "Measure markers and polygons drawn on a map, headlessly")]
struct Cmd {
    /// Report open side lengths (adjacent pairs only, no closing edge)
    #[arg(long, global = true)]
    open: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Measure rings from a CSV (ring,x,y) or JSON file and write measurements JSON
    Measure {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Replay a JSON gesture script through a headless map session
    Replay {
        #[arg(long)]
        script: PathBuf,
        /// Print the session state and rendered overlays as JSON instead of the text report
        #[arg(long)]
        json: bool,
        /// Icon asset for marker overlays
        #[arg(long)]
        marker_src: Option<String>,
        /// Icon scale for marker overlays
        #[arg(long)]
        marker_scale: Option<f64>,
    },
    /// Draw random markers and polygons around the view center
    Demo {
        #[arg(long, default_value_t = 4)]
        shapes: u64,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 77.026344)]
        lon: f64,
        #[arg(long, default_value_t = 28.457523)]
        lat: f64,
        #[arg(long, default_value_t = 12.0)]
        zoom: f64,
    },
    /// Convert between lon/lat and Web Mercator metres
    Project {
        #[arg(long, requires = "lat", conflicts_with_all = ["x", "y"])]
        lon: Option<f64>,
        #[arg(long, requires = "lon")]
        lat: Option<f64>,
        #[arg(long, requires = "y")]
        x: Option<f64>,
        #[arg(long, requires = "x")]
        y: Option<f64>,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok()))
        .with_target(false)
        .init();
    let cmd = Cmd::parse();
    let cfg = if cmd.open {
        MeasureCfg::open()
    } else {
        MeasureCfg::default()
    };
    match cmd.action {
        Action::Measure { input, out } => measure(&input, &out, cfg),
        Action::Replay {
            script,
            json,
            marker_src,
            marker_scale,
        } => replay(&script, json, marker_style(marker_src, marker_scale), cfg),
        Action::Demo {
            shapes,
            seed,
            lon,
            lat,
            zoom,
        } => demo(
            shapes,
            seed,
            ViewCfg {
                center: LonLat::new(lon, lat),
                zoom,
            },
            cfg,
        ),
        Action::Project { lon, lat, x, y } => project(lon.zip(lat), x.zip(y)),
        Action::Report => report_block(cfg),
    }
}

fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG))
}

fn marker_style(src: Option<String>, scale: Option<f64>) -> Option<MarkerStyle> {
    if src.is_none() && scale.is_none() {
        return None;
    }
    let default = MarkerStyle::default();
    Some(MarkerStyle {
        src: src.unwrap_or(default.src),
        scale: scale.unwrap_or(default.scale),
        cross_origin: default.cross_origin,
    })
}

fn measure(input: &Path, out: &Path, cfg: MeasureCfg) -> Result<()> {
    tracing::info!(input = %input.display(), out = %out.display(), convention = ?cfg.convention, "measure");
    let rings = input::read_rings(input)?;
    let mut measured = Vec::with_capacity(rings.len());
    for ring in &rings {
        let m = measure_polygon(&ring.vertices, cfg).with_context(|| format!("ring {}", ring.id))?;
        tracing::info!(ring = ring.id, area = m.area, sides = m.sides_length.len(), "measured");
        measured.push(m);
    }

    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(out, serde_json::to_vec_pretty(&measured)?)
        .with_context(|| format!("writing {}", out.display()))?;

    let payload = provenance::Payload::new(
        "measure",
        serde_json::json!({
            "input": input.to_string_lossy(),
            "convention": cfg.convention,
            "rings": rings.len(),
        }),
    );
    provenance::write_sidecar(out, payload)?;
    Ok(())
}

fn replay(
    script_path: &Path,
    json: bool,
    style: Option<MarkerStyle>,
    cfg: MeasureCfg,
) -> Result<()> {
    let bytes = std::fs::read(script_path)
        .with_context(|| format!("reading {}", script_path.display()))?;
    let steps: Vec<script::Step> = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing {}", script_path.display()))?;
    let mut surface = HeadlessSurface::new();
    let replayed = script::run(&steps, &mut surface, cfg, style);
    let tally = replayed.tally;
    tracing::info!(
        steps = steps.len(),
        accepted = tally.accepted,
        rejected = tally.rejected,
        dropped = tally.dropped,
        "replay"
    );
    if json {
        let out = serde_json::json!({
            "state": replayed.state,
            "overlays": replayed.overlays,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!("{}", report::render(&replayed.state));
    }
    Ok(())
}

fn demo(shapes: u64, seed: u64, view: ViewCfg, cfg: MeasureCfg) -> Result<()> {
    tracing::info!(shapes, seed, zoom = view.zoom, "demo");
    let center = view.center_projected();
    // Keep shapes within a few hundred screen pixels of the center.
    let spread = 300.0 * view.resolution();
    let mut surface = HeadlessSurface::new();
    let mut session = MapSession::new(
        &mut surface,
        ModeToggles {
            marker: true,
            polygon: true,
        },
        cfg,
    );
    for index in 0..shapes {
        let tok = ReplayToken { seed, index };
        let event = if index % 2 == 0 {
            session.surface().finish_point(draw_point(center, spread, tok))
        } else {
            let ring_cfg = RingCfg {
                vertex_count: VertexCount::Uniform { min: 3, max: 8 },
                base_radius: spread / 4.0,
                center: draw_point(center, spread, tok),
                ..RingCfg::default()
            };
            session
                .surface()
                .finish_polygon(&draw_ring_radial(ring_cfg, tok))
        };
        if let Some(ev) = event {
            session.handle(&ev);
        }
    }
    let state = session.finish();
    print!("{}", report::render(&state));
    Ok(())
}

fn project(lon_lat: Option<(f64, f64)>, xy: Option<(f64, f64)>) -> Result<()> {
    let out = match (lon_lat, xy) {
        (Some((lon, lat)), None) => {
            let p = from_lon_lat(LonLat::new(lon, lat));
            serde_json::json!({ "x": p.x, "y": p.y })
        }
        (None, Some((x, y))) => serde_json::to_value(to_lon_lat(Vec2::new(x, y)))?,
        _ => bail!("pass either --lon/--lat or --x/--y"),
    };
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn report_block(cfg: MeasureCfg) -> Result<()> {
    let obj = provenance::block(
        "report",
        serde_json::json!({ "convention": cfg.convention, "view": ViewCfg::default() }),
        &[],
    );
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::fs;
    use tempfile::tempdir;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn measure_writes_measurements_and_sidecar() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("rings.csv");
        fs::write(&input, "ring,x,y\n1,0,0\n1,3,0\n1,3,4\n2,0,0\n2,4,0\n2,0,3\n").unwrap();
        let out = dir.path().join("out").join("measurements.json");
        measure(&input, &out, MeasureCfg::default()).unwrap();

        let parsed: Value = serde_json::from_slice(&fs::read(&out).unwrap()).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
        assert_eq!(parsed[0]["sidesLength"], serde_json::json!([3.0, 4.0, 5.0]));
        assert_eq!(parsed[1]["area"], 6.0);

        let sidecar = dir.path().join("out").join("measurements.provenance.json");
        let prov: Value = serde_json::from_slice(&fs::read(sidecar).unwrap()).unwrap();
        assert_eq!(prov["command"], "measure");
        assert_eq!(prov["params"]["convention"], "closed");
        assert_eq!(prov["params"]["rings"], 2);
    }

    #[test]
    fn measure_open_convention_and_invalid_ring() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("rings.json");
        fs::write(&input, "[[[0,0],[3,0],[3,4]]]").unwrap();
        let out = dir.path().join("open.json");
        measure(&input, &out, MeasureCfg::open()).unwrap();
        let parsed: Value = serde_json::from_slice(&fs::read(&out).unwrap()).unwrap();
        assert_eq!(parsed[0]["sidesLength"], serde_json::json!([3.0, 4.0]));

        fs::write(&input, "[[[0,0],[3,0],[3,4]],[[0,0],[1,1]]]").unwrap();
        let err = measure(&input, &dir.path().join("bad.json"), MeasureCfg::default()).unwrap_err();
        assert!(format!("{err:#}").contains("ring 1"), "{err:#}");
        assert!(!dir.path().join("bad.json").exists());
    }

    #[test]
    fn log_filter_defaults_to_info() {
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(
            log_filter(Some("debug".to_string())).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
    }

    #[test]
    fn marker_style_only_when_flags_given() {
        assert!(marker_style(None, None).is_none());
        let style = marker_style(None, Some(0.1)).unwrap();
        assert_eq!(style.scale, 0.1);
        assert_eq!(style.src, MarkerStyle::default().src);
    }
}
