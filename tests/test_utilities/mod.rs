/// Test doubles and fixtures shared by the integration tests
#[allow(dead_code)]
pub mod fake_tools;
#[allow(dead_code)]
pub mod mocks;
