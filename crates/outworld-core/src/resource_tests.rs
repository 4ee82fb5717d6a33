use crate::resource::{ResourceEntry, ResourceKind, ResourceState};
use crate::vars;

#[test]
fn kind_byte_roundtrip() {
    for v in 0..=0x06u8 {
        assert_eq!(ResourceKind::from_u8(v).to_u8(), v);
    }
    assert_eq!(ResourceKind::from_u8(0x42), ResourceKind::Unknown(0x42));
    assert_eq!(ResourceKind::from_u8(0x42).name(), "unknown");
}

#[test]
fn kind_names() {
    assert_eq!(ResourceKind::PolyCinematic.to_string(), "polygon1");
    assert_eq!(ResourceKind::PolyCharacters.to_string(), "polygon2");
    assert_eq!(ResourceKind::Bytecode.to_string(), "bytecode");
}

#[test]
fn state_decoding() {
    assert_eq!(ResourceState::from_u8(0), ResourceState::NotNeeded);
    assert_eq!(ResourceState::from_u8(1), ResourceState::Needed);
    assert_eq!(ResourceState::from_u8(2), ResourceState::Loaded);
    assert_eq!(ResourceState::from_u8(0xff), ResourceState::NotNeeded);
    assert_eq!(ResourceState::Loaded.to_u8(), 2);
}

#[test]
fn entry_serializes_snake_case() {
    let entry = ResourceEntry {
        kind: ResourceKind::Music,
        state: ResourceState::Loaded,
        size: 1234,
    };
    assert!(entry.is_loaded());
    let json = serde_json::to_string(&entry).unwrap();
    assert_eq!(json, r#"{"kind":"music","state":"loaded","size":1234}"#);
}

#[test]
fn register_names() {
    assert_eq!(vars::name(vars::PAUSE_SLICES), Some("pause_slices"));
    assert_eq!(vars::name(0x00), None);
}
