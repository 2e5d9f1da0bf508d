//! # actiongraph - ResWare Action List Dependency Graphs
//!
//! **actiongraph** turns the flat workflow tables of a ResWare database into a cross-referenced
//! graph of groups, actions, affects, triggers and emails, and renders that graph as Graphviz dot
//! text for visualization.
//!
//! ## Core Workflow
//!
//! 1.  **Load Records**: Implement `RecordSource` for wherever your rows come from (or use the
//!     bundled `JsonDump`), then call `Records::load` to map every table into typed records.
//! 2.  **Build**: Use `GraphBuilder::build` with an action list id. Records are constructed into
//!     a `Context` arena, affects into empty groups are pruned, and every affect is bound to the
//!     action it targets. Dangling references end up in the build's `Diagnostics`.
//! 3.  **Render**: Produce dot statements for the whole list (optionally scoped to what is
//!     reachable from trigger roots) or for a single group, and hand them to `emit`/`render`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use actiongraph::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let source = JsonDump::from_file("path/to/resware.json")?;
//!     let graph = GraphBuilder::build_from_source(&source, 42)?;
//!
//!     for missing in graph.diagnostics.missing() {
//!         eprintln!("missing {}", missing);
//!     }
//!
//!     let dot = render_action_list(&graph, &DigraphOptions::default());
//!     println!("{}", dot);
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod describe;
pub mod dot;
pub mod dump;
pub mod error;
pub mod graph;
pub mod model;
pub mod prelude;
pub mod records;
