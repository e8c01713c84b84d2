// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Introspection document builder.
//!
//! Documents are computed fresh from the live registry on every query:
//!
//! ```xml
//! <node>
//!   <interface name="org.example.Test">
//!     <method name="Double">
//!       <arg direction="in" type="x"/>
//!       <arg direction="out" type="x"/>
//!     </method>
//!   </interface>
//!   <node name="child"/>
//! </node>
//! ```
//!
//! Only exact registrations contribute. A static document registered under
//! the introspection interface at the requested path is returned verbatim
//! instead of the computed one.

use crate::config::{
    ServerConfig, GET_MACHINE_ID_METHOD, INTROSPECTABLE_INTERFACE, INTROSPECT_METHOD,
    PEER_INTERFACE, PING_METHOD,
};
use crate::export::ExportEntry;
use crate::method::MethodDescriptor;
use crate::path::ObjectPath;
use crate::registry::Registry;
use crate::types::Kind;
use std::fmt::Write;

/// Build the introspection document for `path`.
///
/// Never fails: a path with no registrations yields an empty `<node>`.
pub fn introspect(registry: &Registry, path: &ObjectPath, config: &ServerConfig) -> String {
    let exported = registry.exact_at(path);

    if let Some(xml) = exported
        .iter()
        .find(|(iface, _)| iface == INTROSPECTABLE_INTERFACE)
        .and_then(|(_, entry)| entry.document_xml())
    {
        return xml.to_string();
    }

    let mut output = String::with_capacity(512);
    output.push_str("<node>\n");

    for (iface, entry) in &exported {
        write_interface(&mut output, iface, entry);
    }

    if !exported.is_empty() {
        let has = |name: &str| exported.iter().any(|(iface, _)| iface == name);
        if config.introspection && !has(INTROSPECTABLE_INTERFACE) {
            write_standard(
                &mut output,
                INTROSPECTABLE_INTERFACE,
                &[(INTROSPECT_METHOD, vec![Kind::String])],
            );
        }
        if config.peer && !has(PEER_INTERFACE) {
            write_standard(
                &mut output,
                PEER_INTERFACE,
                &[
                    (PING_METHOD, Vec::new()),
                    (GET_MACHINE_ID_METHOD, vec![Kind::String]),
                ],
            );
        }
    }

    for child in registry.exact_children(path) {
        let _ = writeln!(output, "  <node name=\"{}\"/>", child);
    }

    output.push_str("</node>");
    output
}

// Names and path segments are validated at registration and contain no XML
// metacharacters.

fn write_interface(output: &mut String, iface: &str, entry: &ExportEntry) {
    let methods = entry.reachable_methods();
    if methods.is_empty() {
        let _ = writeln!(output, "  <interface name=\"{}\"/>", iface);
        return;
    }

    let _ = writeln!(output, "  <interface name=\"{}\">", iface);
    for (name, method) in methods {
        write_method(output, &name, method.descriptor());
    }
    output.push_str("  </interface>\n");
}

fn write_method(output: &mut String, name: &str, descriptor: &MethodDescriptor) {
    if descriptor.args.is_empty() && descriptor.results.is_empty() {
        let _ = writeln!(output, "    <method name=\"{}\"/>", name);
        return;
    }

    let _ = writeln!(output, "    <method name=\"{}\">", name);
    write_args(output, "in", &descriptor.args);
    write_args(output, "out", &descriptor.results);
    output.push_str("    </method>\n");
}

fn write_args(output: &mut String, direction: &str, kinds: &[Kind]) {
    for kind in kinds {
        let _ = writeln!(
            output,
            "      <arg direction=\"{}\" type=\"{}\"/>",
            direction,
            kind.signature()
        );
    }
}

fn write_standard(output: &mut String, iface: &str, methods: &[(&str, Vec<Kind>)]) {
    let _ = writeln!(output, "  <interface name=\"{}\">", iface);
    for (name, results) in methods {
        let descriptor = MethodDescriptor {
            args: Vec::new(),
            results: results.clone(),
            wants_context: false,
            returns_error: true,
        };
        write_method(output, name, &descriptor);
    }
    output.push_str("  </interface>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MethodError;
    use crate::export::{MethodSet, MethodTable};

    const IFACE: &str = "org.guelfey.DBus.Test";

    fn p(s: &str) -> ObjectPath {
        ObjectPath::new(s).expect("valid path")
    }

    fn doc(registry: &Registry, path: &str) -> String {
        introspect(registry, &p(path), &ServerConfig::default())
    }

    #[test]
    fn empty_path_gives_empty_node() {
        let registry = Registry::new();
        assert_eq!(doc(&registry, "/nothing/here"), "<node>\n</node>");
    }

    #[test]
    fn ancestor_lists_only_children() {
        let registry = Registry::new();
        let entry = || ExportEntry::methods(MethodSet::new().with("Foo", || 1u8));
        registry.register_exact("/a/b", IFACE, Some(entry())).expect("register");
        registry.register_exact("/a/c/d", IFACE, Some(entry())).expect("register");
        registry.register_exact("/a/c", IFACE, Some(entry())).expect("register");

        assert_eq!(
            doc(&registry, "/a"),
            "<node>\n  <node name=\"b\"/>\n  <node name=\"c\"/>\n</node>"
        );
    }

    #[test]
    fn subtree_exports_are_not_listed() {
        let registry = Registry::new();
        let entry = ExportEntry::methods(MethodSet::new().with("Foo", || 1u8));
        registry.register_subtree("/a/b", IFACE, Some(entry)).expect("register");
        assert_eq!(doc(&registry, "/a"), "<node>\n</node>");
        assert_eq!(doc(&registry, "/a/b"), "<node>\n</node>");
    }

    #[test]
    fn interfaces_with_methods_and_args() {
        let registry = Registry::new();
        let entry = ExportEntry::methods(
            MethodSet::new()
                .with("Double", |x: i64| x * 2)
                .with("hidden", || ()),
        );
        registry.register_exact("/obj", IFACE, Some(entry)).expect("register");

        let xml = doc(&registry, "/obj");
        assert!(xml.contains("<interface name=\"org.guelfey.DBus.Test\">"));
        assert!(xml.contains(concat!(
            "    <method name=\"Double\">\n",
            "      <arg direction=\"in\" type=\"x\"/>\n",
            "      <arg direction=\"out\" type=\"x\"/>\n",
            "    </method>"
        )));
        assert!(!xml.contains("hidden"));
        assert!(xml.contains(INTROSPECTABLE_INTERFACE));
        assert!(xml.contains(PEER_INTERFACE));
    }

    #[test]
    fn standard_interfaces_follow_config() {
        let registry = Registry::new();
        let entry = ExportEntry::methods(MethodSet::new().with("Foo", || 1u8));
        registry.register_exact("/obj", IFACE, Some(entry)).expect("register");

        let config = ServerConfig::new().peer(false).introspection(false);
        let xml = introspect(&registry, &p("/obj"), &config);
        assert!(!xml.contains(PEER_INTERFACE));
        assert!(!xml.contains(INTROSPECTABLE_INTERFACE));
    }

    #[test]
    fn aliased_table_lists_wire_names() {
        let registry = Registry::new();
        let table = MethodTable::new()
            .method("Foo", || -> Result<String, MethodError> { Ok("x".to_string()) })
            .value("Foo2", "data");
        let entry = ExportEntry::table(table).with_aliases([("Foo", "foo")]);
        registry.register_exact("/t", IFACE, Some(entry)).expect("register");

        let xml = doc(&registry, "/t");
        assert!(xml.contains("<method name=\"foo\">"));
        assert!(!xml.contains("Foo2"));
    }

    #[test]
    fn static_document_wins() {
        let registry = Registry::new();
        let entry = ExportEntry::methods(MethodSet::new().with("Foo", || 1u8));
        registry.register_exact("/s", IFACE, Some(entry)).expect("register");
        registry
            .register_exact("/s/child", IFACE, Some(ExportEntry::methods(MethodSet::new())))
            .expect("register");
        registry
            .register_exact(
                "/s",
                INTROSPECTABLE_INTERFACE,
                Some(ExportEntry::document("<node name=\"/s\"/>")),
            )
            .expect("register");

        assert_eq!(doc(&registry, "/s"), "<node name=\"/s\"/>");
    }

    #[test]
    fn document_under_other_interface_is_empty_element() {
        let registry = Registry::new();
        registry
            .register_exact("/d", IFACE, Some(ExportEntry::document("<node/>")))
            .expect("register");
        let xml = doc(&registry, "/d");
        assert!(xml.contains("  <interface name=\"org.guelfey.DBus.Test\"/>\n"));
    }
}
