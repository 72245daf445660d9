//! Property type resolution.
//!
//! Resolution runs in two steps:
//! 1. [`get_component_property_type`] finds the type node describing a
//!    component's props (parameter annotation, generic component type, or
//!    higher-order wrapper type argument).
//! 2. [`TypeEngine::resolve_type_properties`] flattens that node into a
//!    property list, following aliases, interfaces, `extends` clauses,
//!    intersections, utility types and imports.
//!
//! Results are cached in the [`ResolutionSession`](crate::ResolutionSession):
//! by file-qualified signature, by declaration, and by intersection.

mod flatten;
mod locate;
mod members;

pub(crate) use locate::get_component_property_type;
pub(crate) use locate::ComponentShape;
pub use members::MemberResolution;

use crate::session::ResolutionSession;
use component_registry::PropertyDescriptor;
use tsx_parser::ParsedFile;

/// A type node together with the file it is written in.
#[derive(Debug, Clone, Copy)]
pub struct TypeHandle<'a> {
    /// The file holding the node.
    pub file: &'a ParsedFile,
    /// The type node.
    pub ty: &'a swc_ecma_ast::TsType,
}

/// Resolves type nodes to property lists through a session's caches.
#[derive(Debug, Clone, Copy)]
pub struct TypeEngine<'s> {
    session: &'s ResolutionSession,
}

impl<'s> TypeEngine<'s> {
    /// Creates an engine over a session.
    pub fn new(session: &'s ResolutionSession) -> Self {
        Self { session }
    }

    /// Locates and resolves a component's declared props.
    pub(crate) fn component_properties(
        &self,
        file: &ParsedFile,
        shape: &ComponentShape<'_>,
    ) -> Vec<PropertyDescriptor> {
        match get_component_property_type(file, shape, self.session) {
            Some(handle) => self.resolve_type_properties(handle, 0).to_vec(),
            None => Vec::new(),
        }
    }
}

/// Replaces same-named properties in place and appends new ones.
pub(crate) fn merge_by_name(
    target: &mut Vec<PropertyDescriptor>,
    incoming: impl IntoIterator<Item = PropertyDescriptor>,
) {
    for prop in incoming {
        match target.iter_mut().find(|existing| existing.name == prop.name) {
            Some(existing) => *existing = prop,
            None => target.push(prop),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use component_registry::PropertySource;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_merge_by_name_overrides_in_place() {
        let mut props = vec![
            PropertyDescriptor::new("a", "string", PropertySource::ResolvedType),
            PropertyDescriptor::new("b", "string", PropertySource::ResolvedType),
        ];
        merge_by_name(
            &mut props,
            [
                PropertyDescriptor::new("a", "number", PropertySource::ResolvedType),
                PropertyDescriptor::new("c", "boolean", PropertySource::ResolvedType),
            ],
        );
        let summary: Vec<_> = props.iter().map(|p| (p.name.as_str(), p.ty.as_str())).collect();
        assert_eq!(summary, [("a", "number"), ("b", "string"), ("c", "boolean")]);
    }
}
