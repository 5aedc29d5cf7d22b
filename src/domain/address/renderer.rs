//! Renderer registry - presentation strategies keyed by resolver kind

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use alloy_primitives::Address;
use once_cell::sync::Lazy;
use serde::Serialize;

/// Resolver kind for on-chain name service resolutions
pub const ENS_RESOLVER: &str = "ens";
/// Resolver kind for user or known-contract labels
pub const LABEL_RESOLVER: &str = "label";

/// A presentable address
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayUnit {
    pub address: Address,
    /// Primary text (resolved name, or the checksummed address)
    pub text: String,
    /// Secondary text shown on hover
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Resolver kind whose renderer produced this unit, `None` for plain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolver: Option<String>,
    /// Whether the unit should navigate to the address page
    pub linkable: bool,
    pub dont_override_colors: bool,
}

impl DisplayUnit {
    pub fn is_plain(&self) -> bool {
        self.resolver.is_none()
    }
}

/// Plain checksummed address, the universal fallback
pub fn plain_address(address: Address, linkable: bool, dont_override_colors: bool) -> DisplayUnit {
    DisplayUnit {
        address,
        text: address.to_checksum(None),
        title: None,
        resolver: None,
        linkable,
        dont_override_colors,
    }
}

/// Strategy turning a resolved name into a display unit
pub trait AddressRenderer: Send + Sync {
    fn render(
        &self,
        address: Address,
        name: &str,
        linkable: bool,
        dont_override_colors: bool,
    ) -> DisplayUnit;
}

impl<F> AddressRenderer for F
where
    F: Fn(Address, &str, bool, bool) -> DisplayUnit + Send + Sync,
{
    fn render(
        &self,
        address: Address,
        name: &str,
        linkable: bool,
        dont_override_colors: bool,
    ) -> DisplayUnit {
        self(address, name, linkable, dont_override_colors)
    }
}

/// Renderers by resolver kind
///
/// Built once, then shared read-only by every decode pass.
#[derive(Default, Clone)]
pub struct RendererRegistry {
    renderers: HashMap<String, Arc<dyn AddressRenderer>>,
}

static DEFAULT_RENDERERS: Lazy<RendererRegistry> = Lazy::new(|| {
    RendererRegistry::new()
        .with(ENS_RESOLVER, render_name_service)
        .with(LABEL_RESOLVER, render_label)
});

impl RendererRegistry {
    /// Create an empty registry (every address renders plain)
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry with the built-in renderers
    pub fn defaults() -> &'static RendererRegistry {
        &DEFAULT_RENDERERS
    }

    /// Register a renderer, replacing any previous one for the kind
    pub fn register(&mut self, kind: impl Into<String>, renderer: impl AddressRenderer + 'static) {
        self.renderers.insert(kind.into(), Arc::new(renderer));
    }

    pub fn with(
        mut self,
        kind: impl Into<String>,
        renderer: impl AddressRenderer + 'static,
    ) -> Self {
        self.register(kind, renderer);
        self
    }

    pub fn renderer_for(&self, kind: &str) -> Option<&dyn AddressRenderer> {
        self.renderers.get(kind).map(|renderer| renderer.as_ref())
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.renderers.keys().map(String::as_str)
    }
}

impl fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&str> = self.kinds().collect();
        kinds.sort_unstable();
        f.debug_struct("RendererRegistry").field("kinds", &kinds).finish()
    }
}

fn render_name_service(
    address: Address,
    name: &str,
    linkable: bool,
    dont_override_colors: bool,
) -> DisplayUnit {
    DisplayUnit {
        address,
        text: name.to_string(),
        title: Some(format!("{}: {}", name, address.to_checksum(None))),
        resolver: Some(ENS_RESOLVER.to_string()),
        linkable,
        dont_override_colors,
    }
}

fn render_label(
    address: Address,
    name: &str,
    linkable: bool,
    dont_override_colors: bool,
) -> DisplayUnit {
    DisplayUnit {
        address,
        text: name.to_string(),
        title: Some(address.to_checksum(None)),
        resolver: Some(LABEL_RESOLVER.to_string()),
        linkable,
        dont_override_colors,
    }
}
