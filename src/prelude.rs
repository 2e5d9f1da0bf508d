//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and functions from the actiongraph
//! crate, so that loading, building and rendering an action list needs a single import.
//!
//! # Example
//!
//! ```rust,no_run
//! use actiongraph::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let records = Records::from_snapshot("path/to/records.bin")?;
//! let graph = GraphBuilder::new(&records).build(42)?;
//!
//! let roots = default_roots(&graph.context, &graph.action_list);
//! let reached = reachable(&graph.context, roots);
//! println!("{} actions reachable from the file's triggers", reached.len());
//! # Ok(())
//! # }
//! ```

// Loading
pub use crate::records::{JsonDump, RecordSource, Records, Row};

// Building
pub use crate::builder::{BuiltGraph, Diagnostics, GraphBuilder, MissingReference};
pub use crate::model::{
    Action, ActionId, ActionKey, ActionList, Affect, Context, Email, ExternalAction, Group,
    GroupId, Task, Trigger,
};

// Analysis and output
pub use crate::describe::{describe, describe_affect};
pub use crate::dot::{DigraphOptions, Scope, emit, render, render_action_list, render_group};
pub use crate::dump::ActionListDump;
pub use crate::graph::{default_roots, find_roots, reachable};

// Error types
pub use crate::error::{AffectError, BuildError, RecordError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
