//! Introspector path helpers and the heap snapshot.

use recprobe_core::introspect::{Handle, HeapObject, HeapSnapshot, Slot, Value};
use recprobe_core::{CaptureError, Introspector};

/// `inst` global pointing at an op with a nested `inst_info.addr` and a null link.
fn sample_heap() -> (HeapSnapshot, Handle) {
    let mut heap = HeapSnapshot::new();
    let info = heap.alloc(HeapObject::new().with("addr", 0x4005d0_u64));
    let op = heap.alloc(
        HeapObject::new()
            .with("inst_info", Slot::to(info))
            .with("off_path", true)
            .with("next_node", Slot::Null),
    );
    heap.set_global("inst", Slot::to(op));
    heap.set_global("cycle_count", 42_u64);
    (heap, op)
}

#[test]
fn dotted_path_follows_structures() {
    let (heap, op) = sample_heap();

    assert_eq!(heap.scalar_at(op, "inst_info.addr").unwrap(), 0x4005d0);
    assert_eq!(heap.scalar_at(op, "off_path").unwrap(), 1);
}

#[test]
fn path_through_a_scalar_names_the_prefix() {
    let (heap, op) = sample_heap();

    let err = heap.path(op, "off_path.addr").unwrap_err();
    assert!(matches!(err, CaptureError::ExpectedStructure(prefix) if prefix == "off_path"));
}

#[test]
fn missing_field_reports_handle_and_name() {
    let (heap, op) = sample_heap();

    let err = heap.scalar_at(op, "done_cycle").unwrap_err();
    assert!(matches!(
        err,
        CaptureError::MissingField { handle, field } if handle == op && field == "done_cycle"
    ));
}

#[test]
fn resolve_checks_value_kind() {
    let (heap, op) = sample_heap();

    assert_eq!(heap.resolve_struct("inst").unwrap(), op);
    assert_eq!(heap.resolve_scalar("cycle_count").unwrap(), 42);
    assert!(matches!(heap.resolve_scalar("inst"), Err(CaptureError::ExpectedScalar(_))));
    assert!(matches!(
        heap.resolve_struct("cycle_count"),
        Err(CaptureError::ExpectedStructure(_))
    ));
    assert!(matches!(
        heap.resolve("no_such_symbol"),
        Err(CaptureError::UnresolvedSymbol(name)) if name == "no_such_symbol"
    ));
}

#[test]
fn link_at_maps_null_to_none() {
    let (heap, op) = sample_heap();

    assert_eq!(heap.link_at(op, "next_node").unwrap(), None);
    assert!(heap.link_at(op, "inst_info").unwrap().is_some());
    assert!(matches!(heap.link_at(op, "off_path"), Err(CaptureError::ExpectedStructure(_))));
}

#[test]
fn struct_at_rejects_null() {
    let (heap, op) = sample_heap();

    assert!(matches!(heap.struct_at(op, "next_node"), Err(CaptureError::ExpectedStructure(_))));
}

#[test]
fn dangling_handle_is_an_error() {
    let (heap, _) = sample_heap();

    assert!(matches!(
        heap.field(Handle(77), "addr"),
        Err(CaptureError::DanglingHandle(Handle(77)))
    ));
}

#[test]
fn unset_global_unbinds_a_symbol() {
    let (mut heap, _) = sample_heap();
    heap.unset_global("inst");

    assert!(matches!(heap.resolve("inst"), Err(CaptureError::UnresolvedSymbol(_))));
}

#[test]
fn snapshot_parses_from_json() {
    let heap = HeapSnapshot::from_json(
        r#"{
            "globals": { "cycle_count": 120, "op": { "ref": 1 } },
            "objects": [
                { "node_head": { "ref": 1 } },
                { "done_cycle": 0, "off_path": false, "next_node": null }
            ]
        }"#,
    )
    .unwrap();

    assert_eq!(heap.len(), 2);
    assert_eq!(heap.resolve("op").unwrap(), Value::Struct(Handle(1)));
    assert_eq!(heap.field(Handle(1), "next_node").unwrap(), Value::Null);
    assert_eq!(heap.field(Handle(1), "off_path").unwrap(), Value::Scalar(0));
    assert_eq!(heap.link_at(Handle(0), "node_head").unwrap(), Some(Handle(1)));
}
