//! Command dispatch

use std::io::{self, Write};

use tracing::{debug, info, instrument};

use crate::bench::Harness;
use crate::cli::args::{Cli, Commands, OrderArg, ShapeArgs, Variant};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{Overrides, Settings};
use crate::domain::{path_label, Cursor, DualTree, Order, Strategy, TreeArena, TreeNodeConvert};

/// Above this many nodes `order` and `show` warn before printing.
const PRINT_WARN_NODES: u64 = 100_000;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    debug!(?settings, "loaded settings");

    match &cli.command {
        Some(Commands::Bench {
            shape,
            strategies,
            repeat,
        }) => {
            let overrides = Overrides {
                repeat: *repeat,
                strategies: strategies.clone(),
                ..shape.overrides()
            };
            cmd_bench(settings.with_overrides(&overrides)?)
        }
        Some(Commands::Sum { shape, strategy }) => cmd_sum(apply(settings, shape)?, *strategy),
        Some(Commands::Order {
            shape,
            order,
            variant,
        }) => cmd_order(apply(settings, shape)?, *order, *variant),
        Some(Commands::Show { shape }) => cmd_show(apply(settings, shape)?),
        Some(Commands::Config { template }) => cmd_config(&settings, *template),
        Some(Commands::Completion { .. }) => Ok(()),
        None => Err(CliError::Usage(
            "no command given, see `treewalk --help`".to_string(),
        )),
    }
}

fn apply(settings: Settings, shape: &ShapeArgs) -> CliResult<Settings> {
    Ok(settings.with_overrides(&shape.overrides())?)
}

#[instrument(skip_all)]
fn cmd_bench(settings: Settings) -> CliResult<()> {
    output::header(&format!(
        "tree depth {} arity {} ({} nodes)",
        settings.depth,
        settings.arity,
        settings
            .tree_builder()
            .node_count()
            .map_or_else(|| "too many".to_string(), |n| n.to_string())
    ));
    let harness = Harness::new(settings);
    let tree = harness.prepare()?;
    for measurement in harness.run(&tree) {
        output::timing(&measurement.title, measurement.elapsed, measurement.result);
    }
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_sum(settings: Settings, strategy: Strategy) -> CliResult<()> {
    let builder = settings.tree_builder();
    let tree = if strategy.needs_arena() {
        DualTree::from_parts(builder.build()?, builder.build_arena()?)
    } else {
        DualTree::from_parts(builder.build()?, TreeArena::new())
    };
    let sum = tree.sum(strategy);
    info!(%strategy, sum, "aggregated");
    output::action(strategy.name(), &sum);
    output::action("nodes", &tree.root.node_count());
    Ok(())
}

fn warn_if_large(settings: &Settings) {
    match settings.tree_builder().node_count() {
        Some(n) if n <= PRINT_WARN_NODES => {}
        _ => output::warning(&format!(
            "printing a tree of depth {} and arity {}, this may take a while",
            settings.depth, settings.arity
        )),
    }
}

fn write_labels<C: Cursor>(out: &mut impl Write, nodes: impl Iterator<Item = C>) -> io::Result<()> {
    for node in nodes {
        writeln!(out, "{}", path_label(&node.path()))?;
    }
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_order(settings: Settings, order: OrderArg, variant: Variant) -> CliResult<()> {
    warn_if_large(&settings);
    let builder = settings.tree_builder();
    let order = Order::from(order);
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    match variant {
        Variant::Linked => {
            let root = builder.build()?;
            write_labels(&mut out, root.traverse(order))?;
        }
        Variant::Guaranteed => {
            let root = builder.build()?;
            // SAFETY: `root` outlives the loop and is not restructured.
            write_labels(&mut out, unsafe { root.traverse_guaranteed(order) })?;
        }
        Variant::Arena => {
            let tree = builder.build_arena()?;
            write_labels(&mut out, tree.traverse(order))?;
        }
    }
    out.flush()?;
    Ok(())
}

#[instrument(skip_all)]
fn cmd_show(settings: Settings) -> CliResult<()> {
    warn_if_large(&settings);
    let root = settings.tree_builder().build()?;
    print!("{}", root.to_tree_string());
    Ok(())
}

fn cmd_config(settings: &Settings, template: bool) -> CliResult<()> {
    if template {
        print!("{}", Settings::template());
        return Ok(());
    }
    output::header("effective configuration");
    print!("{}", settings.to_toml()?);
    Ok(())
}
