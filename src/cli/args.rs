//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};

use crate::config::Overrides;
use crate::domain::{Order, Strategy};

/// Parent-linked trees: stackless bottom-up and top-down traversal benchmarks
#[derive(Parser, Debug)]
#[command(name = "treewalk")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Turn debugging information on (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Shape of the generated complete tree.
#[derive(Args, Debug, Clone, Default)]
pub struct ShapeArgs {
    /// Levels below the root
    #[arg(long)]
    pub depth: Option<u32>,

    /// Children per inner node
    #[arg(short, long)]
    pub arity: Option<u32>,

    /// Value stored in every node
    #[arg(long)]
    pub value: Option<f64>,
}

impl ShapeArgs {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            depth: self.depth,
            arity: self.arity,
            value: self.value,
            ..Overrides::default()
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Time every strategy on a complete tree
    Bench {
        #[command(flatten)]
        shape: ShapeArgs,

        /// Strategies to measure (default: from config)
        #[arg(short, long = "strategy", value_delimiter = ',')]
        strategies: Vec<Strategy>,

        /// Measurements per strategy
        #[arg(short, long)]
        repeat: Option<u32>,
    },

    /// Aggregate the tree with one strategy
    Sum {
        #[command(flatten)]
        shape: ShapeArgs,

        #[arg(short, long, default_value_t = Strategy::BottomUp)]
        strategy: Strategy,
    },

    /// Print node paths in traversal order
    Order {
        #[command(flatten)]
        shape: ShapeArgs,

        #[arg(short, long, value_enum, default_value_t = OrderArg::BottomUp)]
        order: OrderArg,

        /// Tree representation to walk
        #[arg(long, value_enum, default_value_t = Variant::Linked)]
        variant: Variant,
    },

    /// Render the tree
    Show {
        #[command(flatten)]
        shape: ShapeArgs,
    },

    /// Print the effective configuration
    Config {
        /// Print a commented template instead
        #[arg(long)]
        template: bool,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderArg {
    BottomUp,
    TopDown,
}

impl From<OrderArg> for Order {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::BottomUp => Order::BottomUp,
            OrderArg::TopDown => Order::TopDown,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Reference-counted nodes
    Linked,
    /// Reference-counted nodes walked without refcount traffic
    Guaranteed,
    /// Arena copy
    Arena,
}
