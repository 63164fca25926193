//! Expvar-style introspection tree
//!
//! A hierarchical namespace of lazily-evaluated debug variables. Leaves are
//! zero-argument closures evaluated at read time, so a scrape always sees the
//! live counter values without coordinating with writers. The tree structure
//! itself is only written during startup registration.

use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock, RwLock};
use tracing::debug;

use crate::ProxyMetrics;

/// A lazily-evaluated variable published in a [`VarTree`]
pub type Var = Arc<dyn Fn() -> Value + Send + Sync>;

enum Node {
    Map(BTreeMap<String, Node>),
    Leaf(Var),
}

/// Hierarchical namespace of lazily-evaluated variables.
///
/// The lock guards the tree *structure*, which is built once at process start
/// and read on scrape; the published closures themselves read atomics and
/// never block the request path.
#[derive(Default)]
pub struct VarTree {
    root: RwLock<BTreeMap<String, Node>>,
}

impl VarTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide tree, created on first use.
    ///
    /// Lives for the process lifetime; tests that need isolation should
    /// construct their own [`VarTree`] instead.
    pub fn global() -> &'static VarTree {
        static GLOBAL: OnceLock<VarTree> = OnceLock::new();
        GLOBAL.get_or_init(VarTree::new)
    }

    /// Publish a variable at the given path, creating intermediate maps.
    ///
    /// Idempotent: existing intermediate maps are reused, and an existing
    /// entry at the target path is left untouched so repeated registration
    /// never clobbers earlier publishers or their sibling entries.
    ///
    /// # Panics
    ///
    /// Panics if an intermediate path component already holds a value where a
    /// map is required. That shape mismatch is a wiring bug, and metrics are
    /// set up once at startup, so failing fast beats serving a partial tree.
    pub fn publish(&self, path: &[&str], var: Var) {
        let Some((leaf, dirs)) = path.split_last() else {
            panic!("cannot publish a variable at an empty path");
        };

        let mut guard = self.root.write().expect("introspection tree lock poisoned");
        let mut map = &mut *guard;
        for part in dirs {
            let node = map
                .entry((*part).to_string())
                .or_insert_with(|| Node::Map(BTreeMap::new()));
            match node {
                Node::Map(children) => map = children,
                Node::Leaf(_) => panic!(
                    "introspection path {path:?}: component {part:?} already holds a value"
                ),
            }
        }

        if map.contains_key(*leaf) {
            debug!(?path, "introspection variable already published, keeping existing");
            return;
        }
        map.insert((*leaf).to_string(), Node::Leaf(var));
    }

    /// Evaluate the entry at the given path.
    ///
    /// A leaf yields its value; an intermediate map yields the rendered
    /// subtree. Returns `None` if the path does not exist.
    pub fn get(&self, path: &[&str]) -> Option<Value> {
        let (leaf, dirs) = path.split_last()?;

        let guard = self.root.read().expect("introspection tree lock poisoned");
        let mut map = &*guard;
        for part in dirs {
            match map.get(*part)? {
                Node::Map(children) => map = children,
                Node::Leaf(_) => return None,
            }
        }
        map.get(*leaf).map(render_node)
    }

    /// Render the whole tree, evaluating every published variable
    pub fn render(&self) -> Value {
        let guard = self.root.read().expect("introspection tree lock poisoned");
        Value::Object(
            guard
                .iter()
                .map(|(name, node)| (name.clone(), render_node(node)))
                .collect(),
        )
    }
}

fn render_node(node: &Node) -> Value {
    match node {
        Node::Map(children) => Value::Object(
            children
                .iter()
                .map(|(name, child)| (name.clone(), render_node(child)))
                .collect(),
        ),
        Node::Leaf(var) => var(),
    }
}

/// Publish the proxy counter groups under `registry.proxy.{blobs,manifests}`.
///
/// Each leaf snapshots the corresponding counter group at read time. Calling
/// this more than once in a process is a no-op and preserves the original
/// registration (and therefore the counter values it reports).
pub fn register_proxy_vars(tree: &VarTree, metrics: &ProxyMetrics) {
    let blobs = metrics.clone();
    tree.publish(
        &["registry", "proxy", "blobs"],
        Arc::new(move || serde_json::to_value(blobs.blob_stats()).unwrap_or(Value::Null)),
    );

    let manifests = metrics.clone();
    tree.publish(
        &["registry", "proxy", "manifests"],
        Arc::new(move || serde_json::to_value(manifests.manifest_stats()).unwrap_or(Value::Null)),
    );
}
