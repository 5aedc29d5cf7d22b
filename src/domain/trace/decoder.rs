//! Trace node decoder - walks a trace tree and decodes every frame

use alloy_primitives::{Address, Selector};
use tracing::{debug, warn};

use super::{
    CallDetail, CallKind, DecodedTraceNode, NodePath, NodePayload, TraceEntry, TraceError,
};
use crate::domain::abi::{
    extract_selector, selector_hex, InputDecoder, SignatureCatalog, SignatureEntry,
};
use crate::domain::address::{AddressPresenter, AddressResolutionRegistry, RendererRegistry};

/// Label shown for calls without a selector (plain value transfers)
pub const FALLBACK_LABEL: &str = "<fallback>";

/// Label for a call: function name when known, else the raw selector
pub fn call_label(selector: Option<Selector>, signature: Option<&SignatureEntry>) -> String {
    match (selector, signature) {
        (None, _) => FALLBACK_LABEL.to_string(),
        (Some(_), Some(signature)) => signature.name.clone(),
        (Some(selector), None) => selector_hex(selector),
    }
}

/// Decodes trace trees against read-only lookup tables
///
/// Holds no mutable state, so one decoder can serve any number of passes,
/// including concurrent ones over independent trees.
#[derive(Clone, Copy)]
pub struct TraceNodeDecoder<'a> {
    catalog: &'a SignatureCatalog,
    input_decoder: &'a dyn InputDecoder,
    presenter: AddressPresenter<'a>,
    expand_params: bool,
}

impl<'a> TraceNodeDecoder<'a> {
    pub fn new(
        catalog: &'a SignatureCatalog,
        input_decoder: &'a dyn InputDecoder,
        resolutions: &'a AddressResolutionRegistry,
        renderers: &'a RendererRegistry,
    ) -> Self {
        Self {
            catalog,
            input_decoder,
            presenter: AddressPresenter::new(resolutions, renderers),
            expand_params: false,
        }
    }

    /// Address being viewed; it is presented as non-linkable
    pub fn with_selected(mut self, selected: Option<Address>) -> Self {
        self.presenter = self.presenter.with_selected(selected);
        self
    }

    pub fn with_dont_override_colors(mut self, dont_override_colors: bool) -> Self {
        self.presenter = self.presenter.with_dont_override_colors(dont_override_colors);
        self
    }

    /// Decode call parameters up front instead of leaving them for
    /// [`CallDetail::decode_input`]
    pub fn with_expanded_params(mut self, expand_params: bool) -> Self {
        self.expand_params = expand_params;
        self
    }

    pub fn input_decoder(&self) -> &'a dyn InputDecoder {
        self.input_decoder
    }

    /// Decode a whole tree
    ///
    /// Missing signatures or names never fail; only a structurally broken
    /// frame does, and the error names that frame.
    pub fn decode(&self, root: &TraceEntry) -> Result<DecodedTraceNode, TraceError> {
        self.decode_node(root, NodePath::root())
    }

    fn decode_node(
        &self,
        entry: &TraceEntry,
        path: NodePath,
    ) -> Result<DecodedTraceNode, TraceError> {
        let payload = match entry.kind {
            CallKind::SelfDestruct => NodePayload::SelfDestruct,
            CallKind::Create | CallKind::Create2 => NodePayload::Create {
                init_code: entry.input.clone(),
            },
            CallKind::Call | CallKind::CallCode | CallKind::DelegateCall | CallKind::StaticCall => {
                if entry.target.is_none() {
                    warn!(path = %path, kind = %entry.kind, "call frame without target");
                    return Err(TraceError::MissingTarget {
                        path,
                        kind: entry.kind,
                    });
                }
                NodePayload::Call(self.decode_call(entry, &path))
            }
        };

        let target = entry.target.map(|address| self.presenter.present(address));

        let children = entry
            .children
            .iter()
            .enumerate()
            .map(|(index, child)| self.decode_node(child, path.child(index)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DecodedTraceNode {
            path,
            kind: entry.kind,
            target,
            payload,
            children,
        })
    }

    fn decode_call(&self, entry: &TraceEntry, path: &NodePath) -> CallDetail {
        let selector = extract_selector(&entry.input);
        let signature = selector.and_then(|selector| self.catalog.lookup(selector));

        if let (Some(selector), None) = (selector, signature) {
            debug!(path = %path, selector = %selector_hex(selector), "unknown selector");
        }

        let mut detail = CallDetail {
            selector,
            signature: signature.cloned(),
            label: call_label(selector, signature),
            value: (!entry.value.is_zero()).then_some(entry.value),
            has_params: entry.input.len() > 4,
            input: entry.input.clone(),
            decoded: None,
        };

        if self.expand_params {
            detail.decoded = Some(detail.decode_input(self.input_decoder));
        }

        detail
    }
}
