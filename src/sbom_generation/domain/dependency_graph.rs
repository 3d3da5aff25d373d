use super::PackageUrl;
use crate::shared::error::SbomError;
use std::collections::{HashMap, HashSet};

/// Stable handle to a component inside one [`DependencyGraph`].
///
/// Handles are never reused, so a handle to a removed component simply
/// stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentId(usize);

/// A node of the graph: one purl and its direct children in insertion order
#[derive(Debug, Clone)]
pub struct Component {
    purl: PackageUrl,
    children: Vec<ComponentId>,
}

impl Component {
    pub fn purl(&self) -> &PackageUrl {
        &self.purl
    }

    pub fn children(&self) -> &[ComponentId] {
        &self.children
    }
}

/// DependencyGraph aggregate: the SBOM under construction
///
/// Components live in an arena indexed by their canonical purl string and
/// edges are stored as handles, so construction never aliases nodes.
/// Iteration follows insertion order, which keeps serialization
/// byte-reproducible for identical inputs.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    slots: Vec<Option<Component>>,
    index: HashMap<String, ComponentId>,
    root: Option<ComponentId>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the unique root, replacing any previous one.
    ///
    /// The root must not have incoming edges; making an existing child the
    /// root is rejected.
    pub fn add_root(&mut self, purl: PackageUrl) -> Result<ComponentId, SbomError> {
        let id = self.add_component(purl);
        if self.parents_of(id).next().is_some() {
            return Err(SbomError::InvalidGraph {
                reason: format!("{} already has incoming edges", self.purl_key(id)),
            });
        }
        self.root = Some(id);
        Ok(id)
    }

    /// Returns the component for `purl`, creating it when absent
    pub fn add_component(&mut self, purl: PackageUrl) -> ComponentId {
        let key = purl.to_string();
        if let Some(id) = self.index.get(&key) {
            return *id;
        }
        let id = ComponentId(self.slots.len());
        self.slots.push(Some(Component {
            purl,
            children: Vec::new(),
        }));
        self.index.insert(key, id);
        id
    }

    /// Adds the edge `parent -> child`, creating the child when absent.
    ///
    /// Re-adding an existing edge is a no-op. The returned handle lets
    /// callers descend into the child while mirroring nested tool output.
    pub fn add_dependency(
        &mut self,
        parent: ComponentId,
        child: PackageUrl,
    ) -> Result<ComponentId, SbomError> {
        if self.get(parent).is_none() {
            return Err(SbomError::InvalidGraph {
                reason: format!("parent of {} is not part of the graph", child),
            });
        }
        let child_id = self.add_component(child);
        if Some(child_id) == self.root {
            return Err(SbomError::InvalidGraph {
                reason: format!(
                    "{} cannot depend on the root {}",
                    self.purl_key(parent),
                    self.purl_key(child_id)
                ),
            });
        }
        if let Some(component) = self.slots[parent.0].as_mut() {
            if !component.children.contains(&child_id) {
                component.children.push(child_id);
            }
        }
        Ok(child_id)
    }

    /// Resumes construction at a previously created node
    pub fn lookup(&self, purl: &PackageUrl) -> Option<ComponentId> {
        self.index.get(&purl.to_string()).copied()
    }

    pub fn get(&self, id: ComponentId) -> Option<&Component> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn root(&self) -> Option<ComponentId> {
        self.root
    }

    pub fn root_component(&self) -> Option<&Component> {
        self.root.and_then(|id| self.get(id))
    }

    /// Live components in insertion order
    pub fn components(&self) -> impl Iterator<Item = (ComponentId, &Component)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|c| (ComponentId(i), c)))
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, purl: &PackageUrl) -> bool {
        self.lookup(purl).is_some()
    }

    /// Purls of the direct children of `id`, in insertion order
    pub fn dependencies_of(&self, id: ComponentId) -> Vec<&PackageUrl> {
        self.get(id)
            .map(|c| {
                c.children
                    .iter()
                    .filter_map(|child| self.get(*child).map(Component::purl))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every component with its direct children, root first and then in
    /// insertion order. This is the relationship list of the serialized SBOM.
    pub fn relationships(&self) -> Vec<(&PackageUrl, Vec<&PackageUrl>)> {
        let root = self.root.and_then(|id| self.get(id).map(|c| (id, c)));
        root.into_iter()
            .chain(self.components().filter(|(id, _)| Some(*id) != self.root))
            .map(|(id, c)| (&c.purl, self.dependencies_of(id)))
            .collect()
    }

    /// Removes every non-root component whose qualified name is listed,
    /// whatever its version. Returns the number of removed components.
    pub fn filter_ignored_deps<S: AsRef<str>>(&mut self, names: &[S]) -> usize {
        if names.is_empty() {
            return 0;
        }
        let names: HashSet<&str> = names.iter().map(AsRef::as_ref).collect();
        let doomed: Vec<ComponentId> = self
            .components()
            .filter(|(_, c)| names.contains(c.purl.qualified_name().as_str()))
            .map(|(id, _)| id)
            .collect();
        self.remove_all(&doomed)
    }

    /// Removes every non-root component whose canonical purl is listed.
    /// Returns the number of removed components.
    pub fn filter_ignored_deps_including_version<S: AsRef<str>>(&mut self, purls: &[S]) -> usize {
        let doomed: Vec<ComponentId> = purls
            .iter()
            .filter_map(|purl| self.index.get(purl.as_ref()).copied())
            .collect();
        self.remove_all(&doomed)
    }

    /// Whether the direct children of `start` include a component named `name`
    pub fn depends_directly_on(&self, start: ComponentId, name: &str) -> bool {
        self.get(start).is_some_and(|c| {
            c.children.iter().any(|child| {
                self.get(*child)
                    .is_some_and(|comp| comp.purl.qualified_name() == name)
            })
        })
    }

    /// Whether a component named `name` is transitively reachable from `start`
    pub fn reachable_by_name(&self, start: ComponentId, name: &str) -> bool {
        let mut visited = HashSet::new();
        let mut stack: Vec<ComponentId> = self
            .get(start)
            .map(|c| c.children.clone())
            .unwrap_or_default();

        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            if let Some(component) = self.get(id) {
                if component.purl.qualified_name() == name {
                    return true;
                }
                stack.extend(component.children.iter().copied());
            }
        }
        false
    }

    /// Single-node removal: the node and its incident edges go, its children
    /// stay even when nothing else points at them. The root is never removed.
    fn remove_all(&mut self, ids: &[ComponentId]) -> usize {
        let doomed: HashSet<ComponentId> = ids
            .iter()
            .copied()
            .filter(|id| Some(*id) != self.root && self.get(*id).is_some())
            .collect();
        if doomed.is_empty() {
            return 0;
        }

        for id in &doomed {
            if let Some(component) = self.slots[id.0].take() {
                self.index.remove(&component.purl.to_string());
            }
        }
        for component in self.slots.iter_mut().flatten() {
            component.children.retain(|child| !doomed.contains(child));
        }
        doomed.len()
    }

    fn parents_of(&self, id: ComponentId) -> impl Iterator<Item = ComponentId> + '_ {
        self.components()
            .filter(move |(_, c)| c.children.contains(&id))
            .map(|(parent, _)| parent)
    }

    fn purl_key(&self, id: ComponentId) -> String {
        self.get(id)
            .map(|c| c.purl.to_string())
            .unwrap_or_else(|| "<removed>".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sbom_generation::domain::{Ecosystem, VersionDelimiter};

    fn purl(token: &str) -> PackageUrl {
        PackageUrl::from_coordinate(Ecosystem::Golang, token, VersionDelimiter::At).unwrap()
    }

    fn child_keys(graph: &DependencyGraph, id: ComponentId) -> Vec<String> {
        graph
            .dependencies_of(id)
            .into_iter()
            .map(ToString::to_string)
            .collect()
    }

    /// root -> a -> c, root -> b -> c, a -> d
    fn diamond() -> (DependencyGraph, ComponentId) {
        let mut graph = DependencyGraph::new();
        let root = graph.add_root(purl("root@v0.0.0")).unwrap();
        let a = graph.add_dependency(root, purl("a@v1.0.0")).unwrap();
        let b = graph.add_dependency(root, purl("b@v1.0.0")).unwrap();
        graph.add_dependency(a, purl("c@v1.0.0")).unwrap();
        graph.add_dependency(b, purl("c@v1.0.0")).unwrap();
        graph.add_dependency(a, purl("d@v1.0.0")).unwrap();
        (graph, root)
    }

    #[test]
    fn test_add_dependency_is_idempotent() {
        let mut graph = DependencyGraph::new();
        let root = graph.add_root(purl("root@v0.0.0")).unwrap();
        let first = graph.add_dependency(root, purl("a@v1.0.0")).unwrap();
        let second = graph.add_dependency(root, purl("a@v1.0.0")).unwrap();

        assert_eq!(first, second);
        assert_eq!(graph.len(), 2);
        assert_eq!(child_keys(&graph, root), vec!["pkg:golang/a@v1.0.0"]);
    }

    #[test]
    fn test_shared_child_is_a_single_node() {
        let (graph, _) = diamond();
        assert_eq!(graph.len(), 5);
        let c = graph.lookup(&purl("c@v1.0.0")).unwrap();
        let a = graph.lookup(&purl("a@v1.0.0")).unwrap();
        let b = graph.lookup(&purl("b@v1.0.0")).unwrap();
        assert!(graph.get(a).unwrap().children().contains(&c));
        assert!(graph.get(b).unwrap().children().contains(&c));
    }

    #[test]
    fn test_versions_are_distinct_nodes() {
        let mut graph = DependencyGraph::new();
        let root = graph.add_root(purl("root@v0.0.0")).unwrap();
        graph.add_dependency(root, purl("a@v1.0.0")).unwrap();
        graph.add_dependency(root, purl("a@v1.1.0")).unwrap();
        assert_eq!(graph.len(), 3);
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let (graph, _) = diamond();
        let order: Vec<String> = graph
            .components()
            .map(|(_, c)| c.purl().name().to_string())
            .collect();
        assert_eq!(order, vec!["root", "a", "b", "c", "d"]);
    }

    #[test]
    fn test_edge_into_root_is_rejected() {
        let mut graph = DependencyGraph::new();
        let root = graph.add_root(purl("root@v0.0.0")).unwrap();
        let a = graph.add_dependency(root, purl("a@v1.0.0")).unwrap();
        let result = graph.add_dependency(a, purl("root@v0.0.0"));
        assert!(matches!(result, Err(SbomError::InvalidGraph { .. })));
    }

    #[test]
    fn test_add_root_replaces_previous_root() {
        let mut graph = DependencyGraph::new();
        graph.add_root(purl("first@v0.0.0")).unwrap();
        let second = graph.add_root(purl("second@v0.0.0")).unwrap();
        assert_eq!(graph.root(), Some(second));

        let a = graph.add_dependency(second, purl("a@v1.0.0")).unwrap();
        assert!(graph.add_root(purl("a@v1.0.0")).is_err());
        assert_eq!(graph.root(), Some(second));
        assert!(graph.get(a).is_some());
    }

    #[test]
    fn test_filter_by_name_removes_every_version() {
        let mut graph = DependencyGraph::new();
        let root = graph.add_root(purl("root@v0.0.0")).unwrap();
        let a = graph.add_dependency(root, purl("github.com/x/a@v1.0.0")).unwrap();
        graph.add_dependency(a, purl("github.com/x/a@v0.9.0")).unwrap();
        graph.add_dependency(root, purl("github.com/y/a@v1.0.0")).unwrap();

        let removed = graph.filter_ignored_deps(&["github.com/x/a"]);

        assert_eq!(removed, 2);
        assert_eq!(child_keys(&graph, root), vec!["pkg:golang/github.com/y/a@v1.0.0"]);
    }

    #[test]
    fn test_filter_including_version_is_exact() {
        let mut graph = DependencyGraph::new();
        let root = graph.add_root(purl("root@v0.0.0")).unwrap();
        graph.add_dependency(root, purl("a@v1.0.0")).unwrap();
        graph.add_dependency(root, purl("a@v1.1.0")).unwrap();

        graph.filter_ignored_deps_including_version(&["pkg:golang/a@v1.0.0"]);

        assert_eq!(child_keys(&graph, root), vec!["pkg:golang/a@v1.1.0"]);
    }

    #[test]
    fn test_empty_ignore_list_is_noop() {
        let (mut graph, root) = diamond();
        let empty: [&str; 0] = [];
        assert_eq!(graph.filter_ignored_deps(&empty), 0);
        assert_eq!(graph.filter_ignored_deps_including_version(&empty), 0);
        assert_eq!(graph.len(), 5);
        assert_eq!(child_keys(&graph, root).len(), 2);
    }

    #[test]
    fn test_filtering_twice_equals_filtering_once() {
        let (mut once, _) = diamond();
        let (mut twice, _) = diamond();
        let ignored = ["a", "pkg:golang/c@v1.0.0"];

        once.filter_ignored_deps(&ignored[..1]);
        once.filter_ignored_deps_including_version(&ignored[1..]);
        for _ in 0..2 {
            twice.filter_ignored_deps(&ignored[..1]);
            twice.filter_ignored_deps_including_version(&ignored[1..]);
        }

        let keys = |g: &DependencyGraph| -> Vec<(String, Vec<String>)> {
            g.components()
                .map(|(id, c)| (c.purl().to_string(), child_keys(g, id)))
                .collect()
        };
        assert_eq!(keys(&once), keys(&twice));
    }

    #[test]
    fn test_root_is_never_filtered() {
        let (mut graph, root) = diamond();
        graph.filter_ignored_deps(&["root"]);
        graph.filter_ignored_deps_including_version(&["pkg:golang/root@v0.0.0"]);
        assert_eq!(graph.root(), Some(root));
        assert!(graph.root_component().is_some());
    }

    #[test]
    fn test_removal_keeps_orphaned_children() {
        let (mut graph, root) = diamond();

        graph.filter_ignored_deps(&["a"]);

        // d was only reachable through a; single-node removal keeps it
        assert!(graph.contains(&purl("d@v1.0.0")));
        assert!(!graph.reachable_by_name(root, "d"));
        // c is still reachable through b
        assert!(graph.reachable_by_name(root, "c"));
        assert_eq!(child_keys(&graph, root), vec!["pkg:golang/b@v1.0.0"]);
    }

    #[test]
    fn test_reachable_by_name_is_transitive() {
        let (graph, root) = diamond();
        assert!(graph.reachable_by_name(root, "d"));
        assert!(graph.depends_directly_on(root, "a"));
        assert!(!graph.depends_directly_on(root, "d"));
        assert!(!graph.reachable_by_name(root, "missing"));
    }

    #[test]
    fn test_reachable_by_name_survives_cycles() {
        let mut graph = DependencyGraph::new();
        let root = graph.add_root(purl("root@v0.0.0")).unwrap();
        let a = graph.add_dependency(root, purl("a@v1.0.0")).unwrap();
        let b = graph.add_dependency(a, purl("b@v1.0.0")).unwrap();
        graph.add_dependency(b, purl("a@v1.0.0")).unwrap();
        assert!(!graph.reachable_by_name(root, "zzz"));
    }

    #[test]
    fn test_readding_removed_purl_creates_fresh_node() {
        let (mut graph, root) = diamond();
        let old = graph.lookup(&purl("a@v1.0.0")).unwrap();
        graph.filter_ignored_deps(&["a"]);
        assert!(graph.get(old).is_none());

        let fresh = graph.add_dependency(root, purl("a@v1.0.0")).unwrap();
        assert_ne!(old, fresh);
        assert!(graph.get(fresh).unwrap().children().is_empty());
    }

    #[test]
    fn test_relationships_put_root_first() {
        let mut graph = DependencyGraph::new();
        let dep = graph.add_component(purl("a@v1.0.0"));
        graph.add_dependency(dep, purl("b@v1.0.0")).unwrap();
        let root = graph.add_root(purl("root@v0.0.0")).unwrap();
        graph.add_dependency(root, purl("a@v1.0.0")).unwrap();

        let rendered: Vec<(String, Vec<String>)> = graph
            .relationships()
            .into_iter()
            .map(|(p, deps)| (p.to_string(), deps.iter().map(ToString::to_string).collect()))
            .collect();
        assert_eq!(
            rendered,
            vec![
                ("pkg:golang/root@v0.0.0".to_string(), vec!["pkg:golang/a@v1.0.0".to_string()]),
                ("pkg:golang/a@v1.0.0".to_string(), vec!["pkg:golang/b@v1.0.0".to_string()]),
                ("pkg:golang/b@v1.0.0".to_string(), vec![]),
            ]
        );
    }
}
