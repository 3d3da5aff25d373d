//! Gradle parsing: `gradle dependencies` tree text, `gradle properties`
//! output and `exhortignore` markers in build scripts.

use crate::sbom_generation::domain::{DependencyGraph, Ecosystem, PackageUrl};
use crate::shared::error::SbomError;
use crate::shared::Result;

const INDENT_WIDTH: usize = 5;
const BRANCH_MARKERS: [&str; 2] = ["+--- ", "\\--- "];
const IGNORE_MARKER: &str = "exhortignore";

/// One resolved entry of the dependency tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub depth: usize,
    pub purl: PackageUrl,
    /// `(*)`: already listed elsewhere, children not repeated
    pub omitted: bool,
}

/// Parses the text tree printed by `gradle dependencies`.
///
/// Constraints `(c)`, unresolved `(n)` entries and `project :x` entries are
/// skipped together with anything nested under them.
///
/// # Errors
/// Returns `ToolOutputParse` if a tree line carries no `group:artifact`
/// coordinate
pub fn parse_dependency_tree(output: &str) -> Result<Vec<TreeEntry>> {
    let mut entries = Vec::new();
    let mut skip_below: Option<usize> = None;

    for line in output.lines() {
        let Some((depth, text)) = split_tree_line(line) else {
            continue;
        };
        if let Some(limit) = skip_below {
            if depth > limit {
                continue;
            }
            skip_below = None;
        }

        let (text, omitted) = match text.strip_suffix(" (*)") {
            Some(rest) => (rest, true),
            None => (text, false),
        };
        if text.ends_with(" (c)") || text.ends_with(" (n)") || text.starts_with("project ") {
            skip_below = Some(depth);
            continue;
        }

        entries.push(TreeEntry {
            depth,
            purl: parse_coordinate(text)?,
            omitted,
        });
    }
    Ok(entries)
}

/// Depth and entry text of a tree line; `None` for headers and legends
fn split_tree_line(line: &str) -> Option<(usize, &str)> {
    let position = BRANCH_MARKERS
        .iter()
        .filter_map(|marker| line.find(marker))
        .min()?;
    let prefix = &line[..position];
    if !prefix.chars().all(|c| c == '|' || c == ' ') || position % INDENT_WIDTH != 0 {
        return None;
    }
    let text = line[position + INDENT_WIDTH..].trim();
    Some((position / INDENT_WIDTH, text))
}

/// `group:artifact[:version][ -> resolved]`
fn parse_coordinate(text: &str) -> Result<PackageUrl> {
    let (declared, resolved) = match text.split_once(" -> ") {
        Some((declared, resolved)) => (declared, Some(resolved.trim())),
        None => (text, None),
    };

    let mut parts = declared.splitn(3, ':');
    let (Some(group), Some(artifact)) = (parts.next(), parts.next()) else {
        return Err(SbomError::ToolOutputParse {
            tool: "gradle dependencies".to_string(),
            details: format!("expected group:artifact[:version], got {}", text),
        }
        .into());
    };
    let version = resolved.or_else(|| parts.next()).map(str::to_string);

    Ok(PackageUrl::new(
        Ecosystem::Maven,
        Some(group.trim().to_string()),
        artifact.trim(),
        version,
    )?)
}

/// Root purl from `gradle properties` output (`group`, `name`, `version`)
///
/// # Errors
/// Returns `ToolOutputParse` if the output has no `name:` property
pub fn parse_root_properties(output: &str) -> Result<PackageUrl> {
    let property = |key: &str| {
        output.lines().find_map(|line| {
            line.split_once(':')
                .filter(|(k, _)| k.trim() == key)
                .map(|(_, v)| v.trim().to_string())
        })
    };

    let name = property("name").filter(|n| !n.is_empty()).ok_or_else(|| {
        SbomError::ToolOutputParse {
            tool: "gradle properties".to_string(),
            details: "no project name in output".to_string(),
        }
    })?;

    Ok(PackageUrl::new(
        Ecosystem::Maven,
        property("group"),
        name,
        property("version"),
    )?)
}

/// `group/artifact` names of build-script dependencies marked with a
/// trailing `exhortignore` comment
pub fn parse_ignored_dependencies(script: &str) -> Vec<String> {
    script
        .lines()
        .filter_map(|line| {
            let (code, comment) = line.split_once("//")?;
            let last = comment
                .split(|c: char| c.is_whitespace() || c == '/')
                .filter(|t| !t.is_empty())
                .last()?;
            if last != IGNORE_MARKER {
                return None;
            }
            ignored_coordinate(code)
        })
        .collect()
}

fn ignored_coordinate(code: &str) -> Option<String> {
    if let (Some(group), Some(name)) = (named_param(code, "group"), named_param(code, "name")) {
        return Some(format!("{}/{}", group, name));
    }
    quoted_strings(code).into_iter().find_map(|literal| {
        let mut parts = literal.split(':');
        match (parts.next(), parts.next()) {
            (Some(group), Some(artifact)) if !group.is_empty() && !artifact.is_empty() => {
                Some(format!("{}/{}", group, artifact))
            }
            _ => None,
        }
    })
}

/// Contents of every '...' or "..." literal in `code`
fn quoted_strings(code: &str) -> Vec<&str> {
    let mut literals = Vec::new();
    let mut rest = code;
    while let Some(start) = rest.find(['"', '\'']) {
        let quote = rest[start..].chars().next().unwrap_or('"');
        let after = &rest[start + 1..];
        let Some(end) = after.find(quote) else {
            break;
        };
        literals.push(&after[..end]);
        rest = &after[end + 1..];
    }
    literals
}

/// Value of `key: 'v'` (Groovy map) or `key = "v"` (Kotlin named argument)
fn named_param<'a>(code: &'a str, key: &str) -> Option<&'a str> {
    let mut offset = 0;
    while let Some(found) = code[offset..].find(key) {
        let start = offset + found;
        let end = start + key.len();
        offset = end;

        let bounded = code[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric() && c != '_');
        if !bounded {
            continue;
        }
        let rest = code[end..].trim_start();
        let Some(rest) = rest.strip_prefix([':', '=']) else {
            continue;
        };
        let rest = rest.trim_start();
        if rest.starts_with(['"', '\'']) {
            if let Some(value) = quoted_strings(rest).first() {
                return Some(*value);
            }
        }
    }
    None
}

/// Builds the graph under `root`.
///
/// Component mode keeps only depth-0 entries. Ignored names are matched
/// without version.
///
/// # Arguments
/// * `root` - Project purl from [`parse_root_properties`]
/// * `entries` - Flattened tree from [`parse_dependency_tree`]
/// * `ignored` - `group/artifact` names from [`parse_ignored_dependencies`]
/// * `transitive` - Whether to descend below the direct dependencies
///
/// # Returns
/// The graph with every ignored artifact removed
pub fn build_gradle_graph<S: AsRef<str>>(
    root: PackageUrl,
    entries: &[TreeEntry],
    ignored: &[S],
    transitive: bool,
) -> Result<DependencyGraph> {
    let mut graph = DependencyGraph::new();
    let root_id = graph.add_root(root)?;
    let mut parents = vec![root_id];

    for entry in entries {
        if !transitive && entry.depth > 0 {
            continue;
        }
        if entry.depth >= parents.len() {
            return Err(SbomError::ToolOutputParse {
                tool: "gradle dependencies".to_string(),
                details: format!("{} is nested deeper than its parent", entry.purl),
            }
            .into());
        }
        parents.truncate(entry.depth + 1);
        let child = graph.add_dependency(parents[entry.depth], entry.purl.clone())?;
        if !entry.omitted {
            parents.push(child);
        }
    }

    let removed = graph.filter_ignored_deps(ignored);
    tracing::debug!(removed, "removed ignored gradle dependencies");
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TREE: &str = r#"
------------------------------------------------------------
Root project 'demo'
------------------------------------------------------------

runtimeClasspath - Runtime classpath of source set 'main'.
+--- org.springframework.boot:spring-boot-starter-web:3.1.0
|    +--- org.springframework.boot:spring-boot-starter:3.1.0
|    |    +--- org.yaml:snakeyaml:1.33 -> 2.0
|    |    \--- org.springframework:spring-core:6.0.9
|    \--- org.springframework:spring-core:6.0.9 (*)
+--- project :shared
|    \--- com.google.guava:guava:32.0.0-jre
+--- org.apache.logging.log4j:log4j-core:2.17.1
+--- com.fasterxml.jackson:jackson-bom:2.15.0 (c)
\--- io.netty:netty-all -> 4.1.94.Final

(*) - Indicates repeated occurrences of a transitive dependency subtree.
"#;

    const NO_IGNORES: [&str; 0] = [];

    fn root() -> PackageUrl {
        parse_root_properties("group: com.acme\nname: demo\nversion: 1.0.0\n").unwrap()
    }

    fn purls(graph: &DependencyGraph) -> Vec<String> {
        graph
            .components()
            .map(|(_, c)| c.purl().to_string())
            .collect()
    }

    #[test]
    fn test_parse_dependency_tree() {
        let entries = parse_dependency_tree(TREE).unwrap();
        let rendered: Vec<(usize, String, bool)> = entries
            .iter()
            .map(|e| (e.depth, e.purl.to_string(), e.omitted))
            .collect();
        assert_eq!(
            rendered,
            vec![
                (0, "pkg:maven/org.springframework.boot/spring-boot-starter-web@3.1.0".to_string(), false),
                (1, "pkg:maven/org.springframework.boot/spring-boot-starter@3.1.0".to_string(), false),
                (2, "pkg:maven/org.yaml/snakeyaml@2.0".to_string(), false),
                (2, "pkg:maven/org.springframework/spring-core@6.0.9".to_string(), false),
                (1, "pkg:maven/org.springframework/spring-core@6.0.9".to_string(), true),
                (0, "pkg:maven/org.apache.logging.log4j/log4j-core@2.17.1".to_string(), false),
                (0, "pkg:maven/io.netty/netty-all@4.1.94.Final".to_string(), false),
            ]
        );
    }

    #[test]
    fn test_stack_graph_shares_repeated_entries() {
        let entries = parse_dependency_tree(TREE).unwrap();
        let graph = build_gradle_graph(root(), &entries, &NO_IGNORES, true).unwrap();

        assert_eq!(graph.len(), 7);
        let web = graph.dependencies_of(graph.root().unwrap())[0].clone();
        let web_id = graph.lookup(&web).unwrap();
        let web_children: Vec<String> = graph
            .dependencies_of(web_id)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            web_children,
            vec![
                "pkg:maven/org.springframework.boot/spring-boot-starter@3.1.0",
                "pkg:maven/org.springframework/spring-core@6.0.9",
            ]
        );
    }

    #[test]
    fn test_component_graph_keeps_top_level_only() {
        let entries = parse_dependency_tree(TREE).unwrap();
        let graph = build_gradle_graph(root(), &entries, &NO_IGNORES, false).unwrap();
        assert_eq!(
            purls(&graph),
            vec![
                "pkg:maven/com.acme/demo@1.0.0",
                "pkg:maven/org.springframework.boot/spring-boot-starter-web@3.1.0",
                "pkg:maven/org.apache.logging.log4j/log4j-core@2.17.1",
                "pkg:maven/io.netty/netty-all@4.1.94.Final",
            ]
        );
    }

    #[test]
    fn test_ignored_names_removed_regardless_of_resolved_version() {
        let entries = parse_dependency_tree(TREE).unwrap();
        let graph =
            build_gradle_graph(root(), &entries, &["org.yaml/snakeyaml"], true).unwrap();
        assert!(purls(&graph).iter().all(|p| !p.contains("snakeyaml")));
    }

    #[test]
    fn test_root_properties() {
        let purl = parse_root_properties(
            "> Task :properties\n\nallprojects: [root project 'demo']\ngroup: \nname: demo\nversion: unspecified\n",
        )
        .unwrap();
        assert_eq!(purl.to_string(), "pkg:maven/demo@unspecified");
        assert!(parse_root_properties("version: 1.0\n").is_err());
    }

    #[test]
    fn test_ignore_markers_in_build_scripts() {
        let script = r#"
dependencies {
    implementation "log4j:log4j:1.2.17" // exhortignore
    implementation("org.yaml:snakeyaml:1.33") // exhortignore
    implementation group: 'io.netty', name: 'netty-all', version: '4.1.94.Final' // exhortignore
    implementation(group = "com.google.guava", name = "guava", version = "32.0.0-jre") //exhortignore
    implementation "org.apache.commons:commons-lang3:3.12.0" // exhortignore later
    implementation "org.slf4j:slf4j-api:2.0.7"
}
"#;
        assert_eq!(
            parse_ignored_dependencies(script),
            vec![
                "log4j/log4j",
                "org.yaml/snakeyaml",
                "io.netty/netty-all",
                "com.google.guava/guava",
            ]
        );
    }

    #[test]
    fn test_named_param_requires_word_boundary() {
        assert_eq!(named_param("subgroup: 'x', group: 'y'", "group"), Some("y"));
        assert_eq!(named_param("group: other", "group"), None);
    }

    #[test]
    fn test_malformed_nesting_is_rejected() {
        let entries = parse_dependency_tree("|    +--- a:b:1.0\n").unwrap();
        assert!(build_gradle_graph(root(), &entries, &NO_IGNORES, true).is_err());
    }
}
