use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use quadplace::placement::{place_2d, PlaneSize, Reference};
use quadplace::prelude::{FrameProcessor, GeomCfg, PlacementCfg, Variant, Vec3};
use quadplace::sample::{draw_quads, QuadCfg};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

mod corners;
mod provenance;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Batch runner for rectangle overlay placement")]
struct Cmd {
    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Reconstruct overlays from a corner table (.csv, .parquet or .json)
    Reconstruct {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, value_enum, default_value_t = VariantArg::Plane)]
        variant: VariantArg,
        #[command(flatten)]
        placement: PlacementArgs,
    },
    /// Place one fixed-size rectangle and print it as JSON
    Place {
        /// Surface normal as `x,y,z`
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        normal: Vec3,
        /// Target center as `x,y,z`
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        center: Vec3,
        #[command(flatten)]
        placement: PlacementArgs,
    },
    /// Write random posed rectangles as a corner table
    Demo {
        #[arg(long, default_value_t = 16)]
        count: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Max corner jitter (meters)
        #[arg(long, default_value_t = 0.0)]
        noise: f64,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a small provenance JSON block
    Report,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum VariantArg {
    /// Filled quad on a tracked plane
    Plane,
    /// Fixed-size stand-in from feature points
    Air,
}

impl From<VariantArg> for Variant {
    fn from(v: VariantArg) -> Self {
        match v {
            VariantArg::Plane => Variant::OnExistingPlane,
            VariantArg::Air => Variant::InTheAir,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ReferenceArg {
    /// Rotate the center ray onto the normal
    Center,
    /// Rotate the +z facing axis onto the normal
    Axis,
}

#[derive(Args, Clone, Copy, Debug)]
struct PlacementArgs {
    /// Placeholder width (meters)
    #[arg(long, default_value_t = 0.8)]
    width: f64,
    /// Placeholder height (meters)
    #[arg(long, default_value_t = 0.45)]
    height: f64,
    #[arg(long, value_enum, default_value_t = ReferenceArg::Center)]
    reference: ReferenceArg,
}

impl PlacementArgs {
    fn to_cfg(self) -> Result<PlacementCfg> {
        let size = PlaneSize::new(self.width, self.height)?;
        let reference = match self.reference {
            ReferenceArg::Center => Reference::CenterRay,
            ReferenceArg::Axis => Reference::facing_z(),
        };
        Ok(PlacementCfg { size, reference })
    }
}

fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected x,y,z but got {s:?}"));
    }
    let mut v = Vec3::zeros();
    for (k, p) in parts.iter().enumerate() {
        v[k] = p
            .parse::<f64>()
            .map_err(|e| format!("component {k} of {s:?}: {e}"))?;
    }
    Ok(v)
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = match cmd.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .init();
    match cmd.action {
        Action::Reconstruct {
            input,
            out,
            variant,
            placement,
        } => reconstruct(input, out, variant, placement),
        Action::Place {
            normal,
            center,
            placement,
        } => place(normal, center, placement),
        Action::Demo {
            count,
            seed,
            noise,
            out,
        } => demo(count, seed, noise, out),
        Action::Report => report(),
    }
}

fn reconstruct(input: PathBuf, out: PathBuf, variant: VariantArg, args: PlacementArgs) -> Result<()> {
    tracing::info!(input = %input.display(), out = %out.display(), ?variant, "reconstruct");
    let rows = corners::read_rows(&input)
        .with_context(|| format!("reading corners from {}", input.display()))?;
    let fp = FrameProcessor {
        variant: variant.into(),
        placement: args.to_cfg()?,
        geom: GeomCfg::default(),
    };
    let report = fp.process_quads(rows);
    tracing::info!(
        overlays = report.overlays.len(),
        skipped = report.skipped.len(),
        "reconstruct_done"
    );

    provenance::ensure_parent(&out)?;
    std::fs::write(&out, serde_json::to_vec_pretty(&report)?)
        .with_context(|| format!("writing {}", out.display()))?;
    provenance::write_sidecar(
        &out,
        "reconstruct",
        serde_json::json!({
            "input": input.to_string_lossy(),
            "variant": fp.variant,
            "placement": fp.placement,
            "geom": fp.geom,
            "overlays": report.overlays.len(),
            "skipped": report.skipped.len()
        }),
    )?;
    Ok(())
}

fn place(normal: Vec3, center: Vec3, args: PlacementArgs) -> Result<()> {
    let cfg = args.to_cfg()?;
    tracing::debug!(?normal, ?center, reference = ?cfg.reference, "place");
    let placement = place_2d(cfg.size, normal, center, cfg.reference, GeomCfg::default())?;
    println!("{}", serde_json::to_string_pretty(&placement)?);
    Ok(())
}

fn demo(count: usize, seed: u64, noise: f64, out: PathBuf) -> Result<()> {
    if !(noise.is_finite() && noise >= 0.0) {
        bail!("--noise must be a finite non-negative distance, got {noise}");
    }
    tracing::info!(count, seed, noise, out = %out.display(), "demo");
    let cfg = QuadCfg {
        corner_noise: noise,
        ..QuadCfg::default()
    };
    let drawn = draw_quads(cfg, seed, count);
    provenance::ensure_parent(&out)?;
    corners::write_demo_csv(&out, &drawn)?;
    provenance::write_sidecar(
        &out,
        "demo",
        serde_json::json!({ "count": count, "seed": seed, "sampler": cfg }),
    )?;
    Ok(())
}

fn report() -> Result<()> {
    let obj = serde_json::json!({
        "code_rev": provenance::current_git_rev(),
        "quadplace_version": quadplace::VERSION,
        "defaults": {
            "placement": PlacementCfg::default(),
            "geom": GeomCfg::default()
        }
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::tempdir;

    #[test]
    fn command_definition_is_valid() {
        Cmd::command().debug_assert();
    }

    #[test]
    fn parse_vec3_accepts_negative_components() {
        assert_eq!(parse_vec3("-1, 0.5,2").unwrap(), Vec3::new(-1.0, 0.5, 2.0));
        assert!(parse_vec3("1,2").is_err());
        assert!(parse_vec3("1,a,2").is_err());
    }

    #[test]
    fn place_args_parse() {
        let cmd = Cmd::try_parse_from([
            "cli", "place", "--normal", "-1,0,0", "--center", "0,0,-2", "--reference", "axis",
        ])
        .unwrap();
        match cmd.action {
            Action::Place {
                normal, placement, ..
            } => {
                assert_eq!(normal, Vec3::new(-1.0, 0.0, 0.0));
                assert!(matches!(placement.reference, ReferenceArg::Axis));
                assert_eq!(placement.width, 0.8);
            }
            _ => panic!("expected place"),
        }
    }

    #[test]
    fn zero_width_rejected() {
        let args = PlacementArgs {
            width: 0.0,
            height: 1.0,
            reference: ReferenceArg::Center,
        };
        assert!(args.to_cfg().is_err());
    }

    #[test]
    fn demo_rejects_unbounded_noise() {
        let dir = tempdir().unwrap();
        let table = dir.path().join("demo.csv");
        for noise in [f64::INFINITY, f64::NAN, -0.1] {
            let err = demo(2, 0, noise, table.clone()).unwrap_err();
            assert!(err.to_string().contains("--noise"));
        }
        assert!(!table.exists());
    }

    #[test]
    fn demo_then_reconstruct_round_trip() {
        let dir = tempdir().unwrap();
        let table = dir.path().join("demo.csv");
        let out = dir.path().join("out").join("overlays.json");
        demo(6, 3, 0.0, table.clone()).unwrap();
        let args = PlacementArgs {
            width: 0.8,
            height: 0.45,
            reference: ReferenceArg::Center,
        };
        reconstruct(table, out.clone(), VariantArg::Plane, args).unwrap();
        let doc: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&out).unwrap()).unwrap();
        assert_eq!(doc["overlays"].as_array().unwrap().len(), 6);
        assert!(doc["skipped"].as_array().unwrap().is_empty());
        assert!(dir.path().join("out").join("overlays.provenance.json").exists());
        assert!(dir.path().join("demo.provenance.json").exists());
    }
}
