// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Method resolution within a single export entry.

use crate::config::INTROSPECT_METHOD;
use crate::export::{ExportEntry, ExportKind, Member};
use crate::method::Method;
use crate::name;
use std::sync::Arc;

/// Outcome of resolving a wire method name against an entry.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// Callable handler
    Method(Method),
    /// Structurally present but not invocable (reason given); invocation
    /// always fails with INVALID_METHOD
    Invalid(String),
    /// Static introspection document
    Document(Arc<str>),
}

/// Resolve `member` (a wire name) against `entry`.
///
/// Returns `None` when nothing is reachable under that name (UNKNOWN_METHOD).
pub fn resolve(entry: &ExportEntry, member: &str) -> Option<Resolution> {
    match entry.kind() {
        ExportKind::Methods(set) => {
            let method = entry
                .declared_names(member)
                .into_iter()
                .filter(|declared| name::is_visible_member(declared))
                .find_map(|declared| set.get(declared))?;
            Some(Resolution::Method(method.clone()))
        }
        ExportKind::Table(table) => {
            let (declared, found) = entry
                .declared_names(member)
                .into_iter()
                .find_map(|declared| table.get(declared).map(|m| (declared, m)))?;
            match found {
                Member::Value(value) => Some(Resolution::Invalid(format!(
                    "member '{}' is not callable (holds a value of type '{}')",
                    declared,
                    value.kind()
                ))),
                Member::Method(method) if !method.descriptor().returns_error => {
                    Some(Resolution::Invalid(format!(
                        "method '{}' must return Result<_, MethodError>",
                        declared
                    )))
                }
                Member::Method(method) => Some(Resolution::Method(method.clone())),
            }
        }
        ExportKind::Document(xml) => {
            (member == INTROSPECT_METHOD).then(|| Resolution::Document(Arc::clone(xml)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MethodError;
    use crate::export::{MethodSet, MethodTable};

    fn server_entry() -> ExportEntry {
        ExportEntry::methods(
            MethodSet::new()
                .with("Double", |x: i64| x * 2)
                .with("lower", || 0u8),
        )
    }

    #[test]
    fn bound_method_by_own_name() {
        assert!(matches!(
            resolve(&server_entry(), "Double"),
            Some(Resolution::Method(_))
        ));
    }

    #[test]
    fn invisible_name_is_unreachable_even_verbatim() {
        assert!(resolve(&server_entry(), "lower").is_none());
    }

    #[test]
    fn alias_replaces_original_name() {
        let entry = server_entry().with_aliases([("Double", "double")]);
        assert!(matches!(resolve(&entry, "double"), Some(Resolution::Method(_))));
        assert!(resolve(&entry, "Double").is_none());
    }

    #[test]
    fn alias_to_itself_keeps_original() {
        let entry = server_entry().with_aliases([("Double", "Double")]);
        assert!(resolve(&entry, "Double").is_some());
    }

    #[test]
    fn shared_wire_name_falls_back_to_present_method() {
        let entry = server_entry().with_aliases([("Absent", "calc"), ("Double", "calc")]);
        assert!(matches!(resolve(&entry, "calc"), Some(Resolution::Method(_))));
        assert_eq!(entry.wire_names(), vec!["calc".to_string()]);

        let table = MethodTable::new().method("Second", || -> Result<u8, MethodError> { Ok(2) });
        let entry = ExportEntry::table(table).with_aliases([("First", "get"), ("Second", "get")]);
        assert!(matches!(resolve(&entry, "get"), Some(Resolution::Method(_))));
    }

    #[test]
    fn bound_methods_tolerate_plain_returns() {
        let entry = ExportEntry::methods(
            MethodSet::new().with("Pair", || ("a".to_string(), "b".to_string())),
        );
        assert!(matches!(resolve(&entry, "Pair"), Some(Resolution::Method(_))));
    }

    #[test]
    fn table_members() {
        let table = MethodTable::new()
            .method("Foo", |s: String| -> Result<String, MethodError> { Ok(s) })
            .method("Pair", |s: String| (s.clone(), s))
            .value("Foo2", "foobar");
        let entry = ExportEntry::table(table);

        assert!(matches!(resolve(&entry, "Foo"), Some(Resolution::Method(_))));
        assert!(matches!(resolve(&entry, "Pair"), Some(Resolution::Invalid(_))));
        match resolve(&entry, "Foo2") {
            Some(Resolution::Invalid(reason)) => assert!(reason.contains("not callable")),
            other => panic!("unexpected resolution: {:?}", other),
        }
        assert!(resolve(&entry, "Missing").is_none());
    }

    #[test]
    fn table_aliases() {
        let table = MethodTable::new().method("Foo", || -> Result<(), MethodError> { Ok(()) });
        let entry = ExportEntry::table(table).with_aliases([("Foo", "foo")]);
        assert!(resolve(&entry, "foo").is_some());
        assert!(resolve(&entry, "Foo").is_none());
    }

    #[test]
    fn document_answers_only_introspect() {
        let entry = ExportEntry::document("<node/>");
        match resolve(&entry, "Introspect") {
            Some(Resolution::Document(xml)) => assert_eq!(&*xml, "<node/>"),
            other => panic!("unexpected resolution: {:?}", other),
        }
        assert!(resolve(&entry, "Foo").is_none());
    }
}
