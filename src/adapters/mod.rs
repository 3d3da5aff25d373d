/// Adapters layer - Infrastructure implementations
///
/// This layer contains concrete implementations of the outbound ports:
/// native tool processes, the file system, the console and SBOM formatting.
pub mod outbound;
