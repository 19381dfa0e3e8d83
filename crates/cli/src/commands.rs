//! Subcommands run against a built ring.

use anyhow::{bail, Context};
use clap::Subcommand;
use corelib::{NodeId, NodeRecord, Ring, Route};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Find the active node owning a key, starting from any node
    Lookup {
        /// Node to start the search from
        #[arg(long)]
        start: u64,
        /// Key to resolve
        #[arg(long)]
        key: u64,
        /// Hop ceiling (defaults to twice the finger table size)
        #[arg(long)]
        max_hops: Option<usize>,
    },
    /// Print the resolved successor of a key without walking finger tables
    Successor {
        #[arg(long)]
        key: u64,
    },
    /// List the active nodes
    Active,
    /// Dump node state: active flag, successor and finger table
    Show {
        /// Only this node (all nodes when omitted)
        #[arg(long)]
        node: Option<u64>,
    },
}

/// Output of a command, rendered as text or JSON.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommandResult {
    Lookup { key: u64, route: Route },
    Successor { key: u64, owner: NodeId },
    Active { nodes: Vec<NodeId> },
    Network { size: u64, nodes: Vec<NodeRecord> },
    Node { node: NodeRecord },
}

impl Command {
    pub fn execute(&self, ring: &Ring) -> anyhow::Result<CommandResult> {
        debug!(command = ?self, "executing");
        match *self {
            Command::Lookup { start, key, max_hops } => {
                let max_hops = max_hops.unwrap_or_else(|| ring.default_hop_limit());
                let route = ring
                    .route_with_limit(start, key, max_hops)
                    .with_context(|| format!("lookup of {} from node {} failed", key, start))?;
                Ok(CommandResult::Lookup { key, route })
            }
            Command::Successor { key } => {
                let owner = ring
                    .successor_of(key)
                    .context("successors have not been resolved")?;
                Ok(CommandResult::Successor { key, owner })
            }
            Command::Active => Ok(CommandResult::Active {
                nodes: ring.active_nodes().collect(),
            }),
            Command::Show { node: None } => Ok(CommandResult::Network {
                size: ring.size(),
                nodes: ring.nodes().to_vec(),
            }),
            Command::Show { node: Some(id) } => match ring.node(NodeId(id)) {
                Some(node) => Ok(CommandResult::Node { node: node.clone() }),
                None => bail!("node {} is outside the ring (size {})", id, ring.size()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::RingBuilder;

    fn ring() -> Ring {
        RingBuilder::new(32)
            .with_active([1, 4, 7, 12, 15, 20, 27])
            .build()
            .unwrap()
    }

    #[test]
    fn test_lookup_command() {
        let command = Command::Lookup {
            start: 7,
            key: 21,
            max_hops: None,
        };
        match command.execute(&ring()).unwrap() {
            CommandResult::Lookup { key, route } => {
                assert_eq!(key, 21);
                assert_eq!(route.owner, NodeId(27));
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_lookup_command_divergence() {
        let command = Command::Lookup {
            start: 1,
            key: 0,
            max_hops: Some(1),
        };
        let err = command.execute(&ring()).unwrap_err();
        assert!(err.to_string().contains("lookup of 0 from node 1 failed"));
    }

    #[test]
    fn test_successor_command() {
        let result = Command::Successor { key: 29 }.execute(&ring()).unwrap();
        assert!(matches!(
            result,
            CommandResult::Successor { key: 29, owner: NodeId(1) }
        ));
    }

    #[test]
    fn test_active_command() {
        match Command::Active.execute(&ring()).unwrap() {
            CommandResult::Active { nodes } => assert_eq!(nodes.len(), 7),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_show_out_of_range() {
        assert!(Command::Show { node: Some(32) }.execute(&ring()).is_err());
    }

    #[test]
    fn test_json_output_is_tagged() {
        let result = Command::Show { node: Some(4) }.execute(&ring()).unwrap();
        let json: serde_json::Value = serde_json::to_value(&result).unwrap();
        assert_eq!(json["kind"], "node");
        assert_eq!(json["node"]["id"], 4);
        assert_eq!(json["node"]["successor"], 4);
        assert_eq!(json["node"]["table"][0]["key"], 5);
        assert_eq!(json["node"]["table"][0]["successor"], 7);
    }
}
