pub mod go_modules;
pub mod gradle_tree;
pub mod npm_listing;
pub mod yarn_listing;
mod sbom_generator;

pub use sbom_generator::SbomGenerator;
