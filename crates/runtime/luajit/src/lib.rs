//! LuaJIT evaluation sandbox for the harness.
//!
//! Runs generated Lua text with the intrinsics table bound and marshals the
//! value it produces back into a [`Value`].
//!
//! Each run gets a fresh Lua state. The chunk sees a dedicated environment
//! holding the intrinsics and a whitelist of built-ins, so `io`, `os`,
//! `require` and the loaders are out of reach. Nothing bounds CPU time or
//! memory: callers that run untrusted text must impose their own limits.

mod config;
mod intrinsics;
mod marshal;
mod observer;
mod variant;

pub use config::{ConfigError, SandboxConfig};
pub use marshal::{from_lua, to_lua};
pub use observer::{Observer, RecordingObserver, TracingObserver};
pub use variant::LuaVariant;

use std::rc::Rc;

use mlua::{Lua, LuaOptions, StdLib, Value as LuaValue};
use rhizome_harness_core::{Equality, MarshalError, Value};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during execution.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The code faulted: syntax error, `error(...)`, intrinsic misuse or a
    /// bad variant dispatch. Carries the original message.
    #[error("{0}")]
    Fault(String),

    #[error("result has no encoding: {0}")]
    Result(#[from] MarshalError),

    #[error("sandbox setup failed: {0}")]
    Setup(#[source] mlua::Error),
}

/// Executes code text with the intrinsics bound.
pub struct Sandbox {
    config: SandboxConfig,
    observer: Rc<dyn Observer>,
}

impl Sandbox {
    pub fn new(config: SandboxConfig) -> Self {
        Self::with_observer(config, Rc::new(TracingObserver))
    }

    /// Create a sandbox that reports `debug` output to `observer`.
    pub fn with_observer(config: SandboxConfig, observer: Rc<dyn Observer>) -> Self {
        Self { config, observer }
    }

    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    /// The equality used by the `equal` intrinsic.
    pub fn equality(&self) -> Equality {
        Equality::new(self.config.key_sets)
    }

    /// Evaluate `code` and return the value it produces.
    ///
    /// The chunk is evaluated as an expression when it parses as one and as
    /// a block otherwise. Faults are not caught.
    pub fn run(&self, code: &str) -> Result<Value, ExecutionError> {
        let lua = Lua::new_with(
            StdLib::STRING | StdLib::TABLE | StdLib::MATH,
            LuaOptions::new(),
        )
        .map_err(ExecutionError::Setup)?;
        let env = intrinsics::environment(&lua, self.equality(), self.observer.clone())
            .map_err(ExecutionError::Setup)?;

        debug!(chunk = %self.config.chunk_name, bytes = code.len(), "evaluating");
        let result: LuaValue = lua
            .load(code)
            .set_name(self.config.chunk_name.as_str())
            .set_environment(env)
            .eval()
            .map_err(|e| ExecutionError::Fault(fault_message(&e)))?;

        Ok(from_lua(&lua, result)?)
    }
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new(SandboxConfig::default())
    }
}

/// Evaluate `code` in a sandbox with the default configuration.
pub fn run(code: &str) -> Result<Value, ExecutionError> {
    Sandbox::default().run(code)
}

/// The message of the fault that started an error chain.
fn fault_message(err: &mlua::Error) -> String {
    match err {
        mlua::Error::CallbackError { cause, .. } => fault_message(cause),
        mlua::Error::WithContext { cause, .. } => fault_message(cause),
        mlua::Error::SyntaxError { message, .. } => message.clone(),
        mlua::Error::RuntimeError(message) => message.clone(),
        mlua::Error::ExternalError(cause) => cause.to_string(),
        other => other.to_string(),
    }
}
