use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use clap::{Parser, ValueEnum};
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;
use meshplan::config::SweepConfig;
use meshplan::ramp::{self, PlanFormat, RampPlanner, RowPlan};
use meshplan::registry;
use meshplan::Error;




#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Cbor,
    Msgpack,
}




#[derive(Debug, Parser)]
#[clap(version = "0.1", author = "J. Zrake <jzrake@clemson.edu>")]
#[clap(about = "Plan the row ramps of a constrained 2D parameter sweep")]
struct Opts {
    /// YAML sweep configuration
    config: PathBuf,

    /// Write the row plans to this file
    #[clap(short, long)]
    output: Option<PathBuf>,

    #[clap(short, long, value_enum, default_value = "cbor")]
    format: Format,

    #[clap(short, long)]
    verbose: bool,
}




// ============================================================================
fn write_plans(plans: &[RowPlan], opts: &Opts, path: &Path) -> Result<(), Error> {
    let format = match opts.format {
        Format::Cbor => PlanFormat::Cbor,
        Format::Msgpack => PlanFormat::Msgpack,
    };
    let bytes = ramp::encode_plans(plans, format)?;
    let mut file = File::create(path).map_err(Error::io(path))?;
    file.write_all(&bytes).map_err(Error::io(path))?;
    Ok(())
}

fn run(opts: &Opts) -> Result<(), Error> {
    let config = SweepConfig::from_yaml_file(&opts.config)?;
    let bindings = config.channel_bindings();
    let mut engine = config.engine()?;

    let mesh = engine.generate()?;
    let filtered = engine.filter()?;

    if let Some(point) = config.balance_point {
        let values = registry::evaluate_at(engine.function(), point.x, point.y, engine.parameters());
        for (channel, value) in ramp::setpoints(&bindings, &values) {
            println!("balance point: channel {} -> {:.6}", channel, value);
        }
    }

    let planner = RampPlanner::new(&mesh, &filtered.mask, &bindings);
    let plans = planner.rows().collect::<Result<Vec<_>, _>>()?;

    for plan in &plans {
        match plan {
            RowPlan::Ramp(r) => println!(
                "[{}] columns {}..={} points={} channels={:?} start={:?} stop={:?}",
                r.row, r.first_column, r.last_column, r.point_count, r.channels, r.start, r.stop),
            RowPlan::Empty { row } => println!("[{}] empty", row),
        }
    }

    if let Some(path) = &opts.output {
        write_plans(&plans, opts, path)?;
        info!("wrote {} row plans to {}", plans.len(), path.display());
    }
    Ok(())
}




// ============================================================================
fn main() {
    let opts = Opts::parse();
    let level = if opts.verbose { LevelFilter::Debug } else { LevelFilter::Info };

    SimpleLogger::new().with_level(level).init().unwrap();

    if let Err(e) = run(&opts) {
        eprintln!("meshplan: {}", e);
        std::process::exit(1);
    }
}
