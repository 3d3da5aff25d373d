/// Ports module defining the seams of the hexagonal layout
///
/// Inbound ports are what a driving adapter (the CLI) calls; outbound
/// ports are what the core needs from processes, files and the console.
pub mod inbound;
pub mod outbound;
