use viewport_render::RenderError;

/// Errors surfaced by the harness to its host. All of them are fatal.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// `initialize` was called without a drawing surface.
    #[error("no drawing surface was provided")]
    MissingSurface,
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl HarnessError {
    pub fn is_surface_lost(&self) -> bool {
        matches!(self, HarnessError::Render(RenderError::SurfaceLost(_)))
    }
}
