//! Address naming: resolutions produced upstream and the renderers that
//! present them.

mod presenter;
mod registry;
mod renderer;

pub use presenter::AddressPresenter;
pub use registry::{AddressResolutionRegistry, ResolvedAddress};
pub use renderer::{
    plain_address, AddressRenderer, DisplayUnit, RendererRegistry, ENS_RESOLVER, LABEL_RESOLVER,
};
