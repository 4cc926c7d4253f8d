//! Shared test utilities for feldera-provider integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use feldera_mock::MockServer;
use feldera_provider::{
    ProgramConfig, ProgramReconciler, ProgramState, ProviderConfig, ProviderContext,
};

/// Mock Feldera API plus a reconciler configured against it.
pub struct TestEnv {
    pub server: MockServer,
    pub reconciler: ProgramReconciler,
}

impl TestEnv {
    pub async fn spawn() -> Self {
        let server = MockServer::spawn().await.expect("Failed to spawn mock server");
        let ctx = ProviderContext::configure(&ProviderConfig::new(server.endpoint()))
            .expect("Failed to configure provider");
        Self {
            server,
            reconciler: ProgramReconciler::new(Arc::new(ctx)),
        }
    }

    pub fn shutdown(self) {
        self.server.shutdown();
    }
}

pub fn program_config(name: &str) -> ProgramConfig {
    ProgramConfig {
        name: name.to_string(),
        description: format!("{} pipeline", name),
        code: "CREATE TABLE orders (id INT, amount DECIMAL(10, 2));".to_string(),
        should_compile: false,
    }
}

pub fn declared(name: &str) -> ProgramState {
    ProgramState::planned(&program_config(name), None)
}
