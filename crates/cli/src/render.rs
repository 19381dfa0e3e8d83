//! Human-readable rendering of command output.

use crate::commands::CommandResult;
use corelib::{FingerTable, NodeRecord};
use std::fmt::{self, Display, Formatter};

const RULE: &str = "-------------------";

fn write_table(f: &mut Formatter<'_>, table: Option<&FingerTable>) -> fmt::Result {
    writeln!(f, "FINGER TABLE")?;
    writeln!(f, "{}", RULE)?;
    match table {
        Some(table) => {
            for entry in table {
                writeln!(f, "Key = {} , Value = {}", entry.key, entry.successor_at_key)?;
            }
        }
        None => writeln!(f, "(not built)")?,
    }
    Ok(())
}

fn write_node(f: &mut Formatter<'_>, node: &NodeRecord) -> fmt::Result {
    writeln!(f, "Node: {}", node.id())?;
    writeln!(f, "{}", RULE)?;
    writeln!(f, "Active: {}", node.is_active())?;
    match node.successor() {
        Some(successor) => writeln!(f, "Successor: {}", successor)?,
        None => writeln!(f, "Successor: (unresolved)")?,
    }
    writeln!(f, "{}", RULE)?;
    write_table(f, node.table())
}

impl Display for CommandResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CommandResult::Lookup { key, route } => {
                let path: Vec<String> = route.path.iter().map(|id| id.to_string()).collect();
                writeln!(f, "Route: {}", path.join(" -> "))?;
                write!(
                    f,
                    "Key {} is stored at node {} ({} hops)",
                    key,
                    route.owner,
                    route.hops()
                )
            }
            CommandResult::Successor { key, owner } => {
                write!(f, "Successor of {}: {}", key, owner)
            }
            CommandResult::Active { nodes } => {
                writeln!(f, "Active Nodes:")?;
                write!(f, "{}", RULE)?;
                for id in nodes {
                    write!(f, "\nNode: {}", id)?;
                }
                Ok(())
            }
            CommandResult::Network { size, nodes } => {
                writeln!(f, "Network Size: {}", size)?;
                for node in nodes {
                    writeln!(f)?;
                    write_node(f, node)?;
                }
                Ok(())
            }
            CommandResult::Node { node } => write_node(f, node),
        }
    }
}
