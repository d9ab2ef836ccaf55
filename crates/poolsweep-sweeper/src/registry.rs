use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use petgraph::graph::{DiGraph, NodeIndex};
use poolsweep_domain::{Region, SweeperName};
use poolsweep_driver::ClientFactory;
use tracing::debug;

use crate::error::{RegistryError, SweepError};
use crate::report::{SweepOptions, SweepReport};
use crate::sweep::sweep_user_pools;

/// Registered name of the user pool sweeper.
pub const USER_POOL_SWEEPER: &str = "aws_cognito_user_pool";

/// A named cleanup routine that empties one resource type in one region.
#[async_trait]
pub trait Sweeper: Send + Sync + 'static {
    async fn sweep(
        &self,
        name: &SweeperName,
        region: &Region,
        factory: &dyn ClientFactory,
        options: &SweepOptions,
    ) -> Result<SweepReport, SweepError>;
}

/// Deletes every Cognito user pool in the region.
#[derive(Debug, Clone, Copy, Default)]
pub struct CognitoUserPoolSweeper;

#[async_trait]
impl Sweeper for CognitoUserPoolSweeper {
    async fn sweep(
        &self,
        name: &SweeperName,
        region: &Region,
        factory: &dyn ClientFactory,
        options: &SweepOptions,
    ) -> Result<SweepReport, SweepError> {
        sweep_user_pools(name, region, factory, options).await
    }
}

#[derive(Clone)]
pub struct RegisteredSweeper {
    pub name: SweeperName,
    /// Sweepers that must run before this one.
    pub dependencies: Vec<SweeperName>,
    pub sweeper: Arc<dyn Sweeper>,
}

impl std::fmt::Debug for RegisteredSweeper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredSweeper")
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .finish_non_exhaustive()
    }
}

/// Named sweepers plus the order they must run in.
///
/// Dependencies are checked lazily by [`SweeperRegistry::run_order`], so
/// sweepers may be registered in any order.
#[derive(Debug, Default)]
pub struct SweeperRegistry {
    entries: Vec<RegisteredSweeper>,
}

impl SweeperRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sweeper under `name`. Returns `&mut self` for chaining.
    pub fn register(
        &mut self,
        name: &str,
        dependencies: &[&str],
        sweeper: Arc<dyn Sweeper>,
    ) -> Result<&mut Self, RegistryError> {
        let name = SweeperName::new(name)?;
        if self.get(&name).is_some() {
            return Err(RegistryError::Duplicate(name));
        }
        let dependencies = dependencies
            .iter()
            .map(|d| SweeperName::new(*d))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(sweeper = %name, ?dependencies, "registered sweeper");
        self.entries.push(RegisteredSweeper { name, dependencies, sweeper });
        Ok(self)
    }

    pub fn get(&self, name: &SweeperName) -> Option<&RegisteredSweeper> {
        self.entries.iter().find(|e| &e.name == name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<SweeperName> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    /// Resolve a selection (by name) into the sweepers to run, dependencies first.
    ///
    /// An empty selection means every registered sweeper. Dependencies of a
    /// selected sweeper are pulled in even when not named.
    pub fn run_order(&self, selected: &[String]) -> Result<Vec<&RegisteredSweeper>, RegistryError> {
        let mut graph: DiGraph<usize, ()> = DiGraph::new();
        let nodes: Vec<NodeIndex> = (0..self.entries.len()).map(|i| graph.add_node(i)).collect();
        let index: HashMap<&SweeperName, usize> =
            self.entries.iter().enumerate().map(|(i, e)| (&e.name, i)).collect();

        // dependency → dependent
        for (i, entry) in self.entries.iter().enumerate() {
            for dep in &entry.dependencies {
                let j = *index.get(dep).ok_or_else(|| RegistryError::UnknownDependency {
                    sweeper: entry.name.clone(),
                    dependency: dep.clone(),
                })?;
                graph.add_edge(nodes[j], nodes[i], ());
            }
        }

        let topo = petgraph::algo::toposort(&graph, None)
            .map_err(|c| RegistryError::Cycle(self.entries[graph[c.node_id()]].name.clone()))?;

        let wanted: BTreeSet<usize> = if selected.is_empty() {
            (0..self.entries.len()).collect()
        } else {
            let mut wanted = BTreeSet::new();
            let mut stack = Vec::new();
            for raw in selected {
                let i = SweeperName::new(raw.as_str())
                    .ok()
                    .and_then(|n| index.get(&n).copied())
                    .ok_or_else(|| RegistryError::UnknownSweeper(raw.clone()))?;
                stack.push(i);
            }
            while let Some(i) = stack.pop() {
                if wanted.insert(i) {
                    stack.extend(self.entries[i].dependencies.iter().map(|d| index[d]));
                }
            }
            wanted
        };

        Ok(topo
            .into_iter()
            .map(|n| graph[n])
            .filter(|i| wanted.contains(i))
            .map(|i| &self.entries[i])
            .collect())
    }
}

/// Registry with every built-in sweeper.
pub fn init() -> Result<SweeperRegistry, RegistryError> {
    let mut registry = SweeperRegistry::new();
    registry.register(USER_POOL_SWEEPER, &[], Arc::new(CognitoUserPoolSweeper))?;
    Ok(registry)
}
