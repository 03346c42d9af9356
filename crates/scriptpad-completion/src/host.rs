//! Host API reflection
//!
//! The host scripting API is only importable inside the host process. The
//! engine therefore talks to it through the [`HostIntrospector`] capability;
//! [`NullHost`] stands in when the host is absent (tests, standalone use).
//!
//! Reflected members are classified once, at collection time, by
//! [`classify_member`]. Ranking never probes the host again.

use crate::providers::{SourceCategory, SymbolProvider};
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shape of a reflected host member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum HostMemberShape {
    /// A plain function
    Callable { params: Vec<String> },
    /// A class; calling it constructs an instance
    Class { params: Vec<String> },
    /// A sub-module
    Module,
    /// A knob type or knob-like attribute with an optional default
    Knob { default: Option<String> },
    /// Any other value, with its literal representation when cheap to render
    Value { literal: Option<String> },
}

/// A member reflected from the host API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostMember {
    pub name: String,
    #[serde(flatten)]
    pub shape: HostMemberShape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl HostMember {
    pub fn new(name: impl Into<String>, shape: HostMemberShape) -> Self {
        Self {
            name: name.into(),
            shape,
            doc: None,
        }
    }

    pub fn callable(name: impl Into<String>, params: &[&str]) -> Self {
        Self::new(
            name,
            HostMemberShape::Callable {
                params: params.iter().map(|p| p.to_string()).collect(),
            },
        )
    }

    pub fn value(name: impl Into<String>, literal: Option<&str>) -> Self {
        Self::new(
            name,
            HostMemberShape::Value {
                literal: literal.map(str::to_string),
            },
        )
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

/// Capability interface over the host scripting API
pub trait HostIntrospector: Send + Sync {
    /// Enumerate the public members of the host API
    fn members(&self) -> CompletionResult<Vec<HostMember>>;

    /// Documentation summary for a member
    fn doc(&self, _name: &str) -> Option<String> {
        None
    }
}

/// Introspector used outside the host: exposes nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHost;

impl HostIntrospector for NullHost {
    fn members(&self) -> CompletionResult<Vec<HostMember>> {
        Ok(Vec::new())
    }
}

/// Introspector over a fixed member list
#[derive(Debug, Default, Clone)]
pub struct StaticHost {
    members: Vec<HostMember>,
}

impl StaticHost {
    pub fn new(members: Vec<HostMember>) -> Self {
        Self { members }
    }
}

impl HostIntrospector for StaticHost {
    fn members(&self) -> CompletionResult<Vec<HostMember>> {
        Ok(self.members.clone())
    }

    fn doc(&self, name: &str) -> Option<String> {
        self.members
            .iter()
            .find(|m| m.name == name)
            .and_then(|m| m.doc.clone())
    }
}

fn render_params(params: &[String]) -> String {
    format!("({})", params.join(", "))
}

fn is_dunder(name: &str) -> bool {
    name.len() > 4 && name.starts_with("__") && name.ends_with("__")
}

/// Classify a reflected member into a symbol kind and signature hint
///
/// Returns `None` for private members, which are never offered.
pub fn classify_member(member: &HostMember) -> Option<(SymbolKind, Option<String>)> {
    if member.name.is_empty() || (member.name.starts_with('_') && !is_dunder(&member.name)) {
        return None;
    }

    let classified = match &member.shape {
        HostMemberShape::Callable { params } | HostMemberShape::Class { params } => {
            (SymbolKind::HostFunction, Some(render_params(params)))
        }
        HostMemberShape::Module => (SymbolKind::Module, None),
        HostMemberShape::Knob { default } => (SymbolKind::HostObject, default.clone()),
        HostMemberShape::Value { literal } => (SymbolKind::HostObject, literal.clone()),
    };
    Some(classified)
}

/// Symbol provider backed by host reflection
pub struct HostApiProvider {
    introspector: Arc<dyn HostIntrospector>,
}

impl HostApiProvider {
    pub fn new(introspector: Arc<dyn HostIntrospector>) -> Self {
        Self { introspector }
    }

    /// Provider that reports no host symbols
    pub fn detached() -> Self {
        Self::new(Arc::new(NullHost))
    }
}

impl SymbolProvider for HostApiProvider {
    fn name(&self) -> &str {
        "host_api"
    }

    fn category(&self) -> SourceCategory {
        SourceCategory::HostApi
    }

    fn collect(&self) -> CompletionResult<Vec<Symbol>> {
        let members = self.introspector.members()?;
        let symbols = members
            .iter()
            .filter_map(|member| {
                let (kind, signature_hint) = classify_member(member)?;
                Some(Symbol {
                    name: member.name.clone(),
                    kind,
                    signature_hint,
                    doc_summary: None,
                })
            })
            .collect();
        Ok(symbols)
    }

    fn describe(&self, name: &str) -> Option<String> {
        self.introspector.doc(name)
    }
}
