// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Introspection documents, checked with a real XML parser.

use bus_export::config::{INTROSPECTABLE_INTERFACE, INTROSPECT_METHOD, PEER_INTERFACE};
use bus_export::{
    Call, Exportable, MethodError, MethodSet, MethodTable, ObjectPath, ObjectServer, Reply, Value,
};
use std::sync::Arc;

const IFACE: &str = "org.guelfey.DBus.Test";

struct Server;

impl Exportable for Server {
    fn export_methods(self: Arc<Self>, methods: &mut MethodSet) {
        methods.add("Double", |x: i64| x * 2);
        methods.add("Echo", |s: String, n: u32| -> Result<(String, u32), MethodError> {
            Ok((s, n))
        });
    }
}

fn introspect(server: &ObjectServer, path: &str) -> String {
    let path = ObjectPath::new(path).expect("valid path");
    match server.dispatch(Call::new(path, INTROSPECTABLE_INTERFACE, INTROSPECT_METHOD)) {
        Reply::Return { results, .. } => match results.as_slice() {
            [Value::String(xml)] => xml.clone(),
            other => panic!("unexpected results: {:?}", other),
        },
        Reply::Error { name, message, .. } => panic!("error reply {}: {}", name, message),
    }
}

fn child_names(xml: &str) -> Vec<String> {
    let doc = roxmltree::Document::parse(xml).expect("well-formed document");
    let root = doc.root_element();
    assert_eq!(root.tag_name().name(), "node");
    root.children()
        .filter(|n| n.is_element() && n.tag_name().name() == "node")
        .filter_map(|n| n.attribute("name").map(str::to_string))
        .collect()
}

fn interface_names(xml: &str) -> Vec<String> {
    let doc = roxmltree::Document::parse(xml).expect("well-formed document");
    doc.root_element()
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "interface")
        .filter_map(|n| n.attribute("name").map(str::to_string))
        .collect()
}

#[test]
fn ancestor_lists_one_child_per_segment() {
    let server = ObjectServer::new();
    server.export("/a/b", IFACE, Arc::new(Server)).expect("export");
    server.export("/a/c", IFACE, Arc::new(Server)).expect("export");

    let xml = introspect(&server, "/a");
    assert_eq!(child_names(&xml), vec!["b", "c"]);
    assert!(interface_names(&xml).is_empty());
}

#[test]
fn intermediate_paths_list_next_segment() {
    let server = ObjectServer::new();
    let table = MethodTable::new()
        .method("Foo", || -> Result<String, MethodError> { Ok("foo".to_string()) });
    server
        .export_method_table("/org/guelfey/DBus/Test", IFACE, table)
        .expect("export");

    for (path, child) in [
        ("/", "org"),
        ("/org", "guelfey"),
        ("/org/guelfey", "DBus"),
        ("/org/guelfey/DBus", "Test"),
    ] {
        let xml = introspect(&server, path);
        assert_eq!(xml, format!("<node>\n  <node name=\"{}\"/>\n</node>", child));
        assert_eq!(child_names(&xml), vec![child.to_string()]);
    }
}

#[test]
fn unrelated_path_is_empty_document() {
    let server = ObjectServer::new();
    server.export("/a/b", IFACE, Arc::new(Server)).expect("export");

    let xml = introspect(&server, "/zzz/nothing");
    assert!(child_names(&xml).is_empty());
    assert!(interface_names(&xml).is_empty());
}

#[test]
fn exported_object_describes_methods() {
    let server = ObjectServer::new();
    server.export("/obj", IFACE, Arc::new(Server)).expect("export");
    server.export("/obj/child", IFACE, Arc::new(Server)).expect("export");

    let xml = introspect(&server, "/obj");
    assert_eq!(
        interface_names(&xml),
        vec![IFACE, INTROSPECTABLE_INTERFACE, PEER_INTERFACE]
    );
    assert_eq!(child_names(&xml), vec!["child"]);

    let doc = roxmltree::Document::parse(&xml).expect("well-formed document");
    let echo = doc
        .descendants()
        .find(|n| n.tag_name().name() == "method" && n.attribute("name") == Some("Echo"))
        .expect("Echo method");
    let args: Vec<(&str, &str)> = echo
        .children()
        .filter(|n| n.is_element())
        .map(|n| {
            (
                n.attribute("direction").unwrap_or_default(),
                n.attribute("type").unwrap_or_default(),
            )
        })
        .collect();
    assert_eq!(args, vec![("in", "s"), ("in", "u"), ("out", "s"), ("out", "u")]);
}

#[test]
fn static_document_bypasses_builder() {
    let server = ObjectServer::new();
    server.export("/obj", IFACE, Arc::new(Server)).expect("export");
    server.export("/obj/child", IFACE, Arc::new(Server)).expect("export");

    let fixed = "<node><interface name=\"org.example.Fixed\"/></node>";
    server.export_introspection("/obj", fixed).expect("export");
    assert_eq!(introspect(&server, "/obj"), fixed);

    server.unexport("/obj", INTROSPECTABLE_INTERFACE).expect("unexport");
    assert!(introspect(&server, "/obj").contains(IFACE));
}

#[test]
fn document_reflects_live_registry() {
    let server = ObjectServer::new();
    server.export("/a/b", IFACE, Arc::new(Server)).expect("export");
    assert_eq!(child_names(&introspect(&server, "/a")), vec!["b"]);

    server.export("/a/c/d", IFACE, Arc::new(Server)).expect("export");
    assert_eq!(child_names(&introspect(&server, "/a")), vec!["b", "c"]);

    server.unexport("/a/b", IFACE).expect("unexport");
    assert_eq!(child_names(&introspect(&server, "/a")), vec!["c"]);
}
