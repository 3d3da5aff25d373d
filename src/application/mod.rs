/// Application layer - Use cases, providers and DTOs
///
/// This layer contains the application logic that orchestrates
/// domain services and coordinates with infrastructure through ports.
pub mod dto;
pub mod factories;
pub mod providers;
pub mod use_cases;
