//! Module definitions and the handler seam.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use landing_core::ExecutionPhase;

use crate::context::ExecutionContext;
use crate::error::ModuleError;

/// The automation a module performs.
///
/// Handlers resolve with a status line for every outcome they consider
/// handled, intentional skips included, and reject only for conditions that
/// must abort their scheduling group.
#[async_trait]
pub trait ModuleHandler: Send + Sync {
    /// Run the module once.
    async fn handle(&self, ctx: Arc<ExecutionContext>) -> Result<String, ModuleError>;
}

struct FnHandler<F>(F);

#[async_trait]
impl<F, Fut> ModuleHandler for FnHandler<F>
where
    F: Fn(Arc<ExecutionContext>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String, ModuleError>> + Send,
{
    async fn handle(&self, ctx: Arc<ExecutionContext>) -> Result<String, ModuleError> {
        (self.0)(ctx).await
    }
}

/// Wrap an async closure as a [`ModuleHandler`].
///
/// # Examples
///
/// ```
/// use landing_runner::{ModuleDefinition, handler_fn};
/// use landing_core::ExecutionPhase;
///
/// let module = ModuleDefinition::new(
///     "noop",
///     1,
///     ExecutionPhase::Deploy,
///     handler_fn(|ctx| async move { Ok(format!("{} did nothing", ctx.module_name())) }),
/// );
/// assert_eq!(module.name(), "noop");
/// ```
pub fn handler_fn<F, Fut>(f: F) -> Arc<dyn ModuleHandler>
where
    F: Fn(Arc<ExecutionContext>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String, ModuleError>> + Send + 'static,
{
    Arc::new(FnHandler(f))
}

/// A unit of automation belonging to one stage.
#[derive(Clone)]
pub struct ModuleDefinition {
    name: String,
    run_order: i32,
    phase: ExecutionPhase,
    handler: Arc<dyn ModuleHandler>,
}

impl fmt::Debug for ModuleDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleDefinition")
            .field("name", &self.name)
            .field("run_order", &self.run_order)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl ModuleDefinition {
    /// Define a module. `run_order` only orders modules within their stage.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        run_order: i32,
        phase: ExecutionPhase,
        handler: Arc<dyn ModuleHandler>,
    ) -> Self {
        Self {
            name: name.into(),
            run_order,
            phase,
            handler,
        }
    }

    /// Module name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Order within the owning stage.
    #[must_use]
    pub fn run_order(&self) -> i32 {
        self.run_order
    }

    /// Phase the module runs in.
    #[must_use]
    pub fn phase(&self) -> ExecutionPhase {
        self.phase
    }

    /// The module's handler.
    #[must_use]
    pub fn handler(&self) -> &Arc<dyn ModuleHandler> {
        &self.handler
    }
}
