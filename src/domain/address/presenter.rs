//! Address presentation policy

use alloy_primitives::Address;

use super::{plain_address, AddressResolutionRegistry, DisplayUnit, RendererRegistry};

/// Chooses how an address is shown
///
/// Unresolved addresses, and resolutions whose kind has no registered
/// renderer, fall back to the plain address. An address equal to the
/// selected one is never linkable.
#[derive(Debug, Clone, Copy)]
pub struct AddressPresenter<'a> {
    resolutions: &'a AddressResolutionRegistry,
    renderers: &'a RendererRegistry,
    selected: Option<Address>,
    dont_override_colors: bool,
}

impl<'a> AddressPresenter<'a> {
    pub fn new(
        resolutions: &'a AddressResolutionRegistry,
        renderers: &'a RendererRegistry,
    ) -> Self {
        Self {
            resolutions,
            renderers,
            selected: None,
            dont_override_colors: false,
        }
    }

    /// Address of the page being viewed; it renders as non-linkable
    pub fn with_selected(mut self, selected: Option<Address>) -> Self {
        self.selected = selected;
        self
    }

    pub fn with_dont_override_colors(mut self, dont_override_colors: bool) -> Self {
        self.dont_override_colors = dont_override_colors;
        self
    }

    pub fn is_linkable(&self, address: Address) -> bool {
        self.selected != Some(address)
    }

    pub fn present(&self, address: Address) -> DisplayUnit {
        let linkable = self.is_linkable(address);

        let Some(resolved) = self.resolutions.resolve(&address) else {
            return plain_address(address, linkable, self.dont_override_colors);
        };

        match self.renderers.renderer_for(&resolved.resolver) {
            Some(renderer) => renderer.render(
                address,
                &resolved.name,
                linkable,
                self.dont_override_colors,
            ),
            None => {
                tracing::trace!(
                    address = %address,
                    resolver = %resolved.resolver,
                    "no renderer registered for resolver kind"
                );
                plain_address(address, linkable, self.dont_override_colors)
            }
        }
    }
}
