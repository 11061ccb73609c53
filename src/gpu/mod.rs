mod context;
mod renderer;

pub use context::GpuContext;
pub use renderer::GridRenderer;
