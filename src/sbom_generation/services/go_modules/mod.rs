//! Go module graph construction: manifest tokenizer plus the pure
//! algorithms over `go mod graph` / `go list -m all` output.

mod manifest;
mod module_graph;

pub use manifest::{classify, Directive, GoModManifest, GoRequirement, LineKind, IGNORE_MARKER};
pub use module_graph::{
    apply_final_versions, build_module_graph, check_manifest_versions, module_path,
    module_version, parse_final_versions, parse_module_graph, root_token, ModuleEdge,
    DEFAULT_MAIN_MODULE_VERSION,
};
