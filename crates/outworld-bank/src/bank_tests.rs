use std::fs;
use std::path::Path;

use outworld_core::{PART_INTRODUCTION, PART_WATER, ResourceKind, ResourceState};
use outworld_vm::ResourceProvider;

use crate::bank::{BankError, DUMP_SUMMARY_FILE, MEMLIST_FILE, Resources};
use crate::memlist::{MemEntry, MemList};
use crate::pack::pack;

const PROGRAM: &[u8] = &[0x06, 0x07, 0x00, 0x00];

fn picture() -> Vec<u8> {
    b"outworld ".repeat(64)
}

/// Write `MEMLIST.BIN` and a single `BANK01` holding `resources` back to back.
fn write_banks(dir: &Path, resources: &[(ResourceKind, Vec<u8>)]) {
    let mut bank = Vec::new();
    let mut entries = Vec::new();
    for (i, (kind, data)) in resources.iter().enumerate() {
        let packed = pack(data);
        entries.push(MemEntry {
            id: i as u16,
            state: ResourceState::NotNeeded,
            kind: *kind,
            rank: 0,
            bank: 1,
            bank_offset: bank.len() as u32,
            packed_size: packed.len() as u16,
            unpacked_size: data.len() as u16,
        });
        bank.extend_from_slice(&packed);
    }
    fs::write(dir.join(MEMLIST_FILE), MemList::new(entries).to_bytes()).unwrap();
    fs::write(dir.join("BANK01"), bank).unwrap();
}

/// Enough resources for the introduction part (0x17..=0x19), with a packed
/// bitmap at 0x02.
fn game_resources() -> Vec<(ResourceKind, Vec<u8>)> {
    (0..0x1au8)
        .map(|id| match id {
            0x02 => (ResourceKind::Bitmap, picture()),
            0x17 => (ResourceKind::Palette, vec![0x17; 32]),
            0x18 => (ResourceKind::Bytecode, PROGRAM.to_vec()),
            0x19 => (ResourceKind::PolyCinematic, vec![0x19; 16]),
            _ => (ResourceKind::Sound, vec![id; 4]),
        })
        .collect()
}

fn open_game() -> (tempfile::TempDir, Resources) {
    let dir = tempfile::tempdir().unwrap();
    write_banks(dir.path(), &game_resources());
    let res = Resources::open(dir.path()).unwrap();
    (dir, res)
}

#[test]
fn open_reads_memlist() {
    let (_dir, res) = open_game();

    assert_eq!(res.memlist().len(), 0x1a);
    let entry = res.resource(0x02).unwrap();
    assert_eq!(entry.kind, ResourceKind::Bitmap);
    assert_eq!(entry.state, ResourceState::NotNeeded);
    assert_eq!(entry.size, 576);
    assert!(res.entry(0x02).unwrap().is_packed());
    assert!(res.resource(0x1a).is_none());
}

#[test]
fn read_unpacks_without_loading() {
    let (_dir, res) = open_game();

    assert_eq!(res.read(0x02).unwrap(), picture());
    assert_eq!(res.read(0x05).unwrap(), vec![5; 4]);
    assert_eq!(res.state(0x02), Some(ResourceState::NotNeeded));
    assert!(res.data(0x02).is_none());
}

#[test]
fn load_keeps_data() {
    let (_dir, mut res) = open_game();

    let data = res.load(0x02).unwrap();

    assert_eq!(&data[..], &picture()[..]);
    assert_eq!(res.state(0x02), Some(ResourceState::Loaded));
    assert_eq!(res.data(0x02), Some(&picture()[..]));
    assert!(res.resource(0x02).unwrap().is_loaded());
}

#[test]
fn load_part_replaces_resources() {
    let (_dir, mut res) = open_game();
    res.load(0x03).unwrap();

    let loaded = res.load_part(PART_INTRODUCTION).unwrap();

    assert_eq!(loaded.part.name, "introduction");
    assert_eq!(&loaded.bytecode[..], PROGRAM);
    assert_eq!(&loaded.palettes[..], &[0x17; 32][..]);
    assert!(loaded.characters.is_none());
    assert_eq!(res.current_part(), Some(PART_INTRODUCTION));
    assert_eq!(res.state(0x03), Some(ResourceState::NotNeeded));
    for id in 0x17..=0x19 {
        assert_eq!(res.state(id), Some(ResourceState::Loaded));
    }
}

#[test]
fn unknown_part() {
    let (_dir, mut res) = open_game();
    insta::assert_snapshot!(
        res.load_part(0x1234).unwrap_err(),
        @"unknown game part 0x1234"
    );
}

#[test]
fn part_beyond_memlist_fails_to_load() {
    // The water part needs resources up to 0x1c.
    let (_dir, mut res) = open_game();
    assert!(matches!(
        res.load_part(PART_WATER),
        Err(BankError::UnknownResource(0x1a))
    ));
}

#[test]
fn loadres_past_the_list_requests_a_part() {
    let (_dir, mut res) = open_game();

    res.load_resource(PART_WATER).unwrap();

    assert_eq!(res.take_requested_part(), Some(PART_WATER));
    assert_eq!(res.take_requested_part(), None);
    assert_eq!(res.current_part(), None);
}

#[test]
fn loadres_past_the_list_must_name_a_part() {
    let (_dir, mut res) = open_game();

    let err = res.load_resource(0x0100).unwrap_err();

    insta::assert_snapshot!(err, @"unknown game part 0x0100");
    assert_eq!(res.take_requested_part(), None);
}

#[test]
fn loadres_loads_entries() {
    let (_dir, mut res) = open_game();

    res.load_resource(0x04).unwrap();

    assert_eq!(res.data(0x04), Some(&[4u8; 4][..]));
}

#[test]
fn dump_writes_resources_and_summary() {
    let (dir, mut res) = open_game();
    let dump = dir.path().join("dump");
    res.dump_to(&dump).unwrap();

    res.load(0x02).unwrap();
    res.load_part(PART_INTRODUCTION).unwrap();

    assert_eq!(fs::read(dump.join("02_bitmap.data")).unwrap(), picture());
    assert_eq!(fs::read(dump.join("18_bytecode.data")).unwrap(), PROGRAM);
    assert!(dump.join("17_palette.data").exists());
    let summary = fs::read_to_string(dump.join(DUMP_SUMMARY_FILE)).unwrap();
    assert!(summary.contains("| 0x02 | bitmap   |      28 bytes |     576 bytes |"));
}

#[test]
fn missing_memlist() {
    let dir = tempfile::tempdir().unwrap();
    let err = Resources::open(dir.path()).unwrap_err();
    assert!(matches!(err, BankError::Io { ref path, .. } if path.ends_with(MEMLIST_FILE)));
}

#[test]
fn missing_bank_file() {
    let (dir, res) = open_game();
    fs::remove_file(dir.path().join("BANK01")).unwrap();

    let err = res.read(0x02).unwrap_err();
    assert!(matches!(err, BankError::Io { ref path, .. } if path.ends_with("BANK01")));
}

#[test]
fn short_bank_file() {
    let (dir, res) = open_game();
    let bank = dir.path().join("BANK01");
    let bytes = fs::read(&bank).unwrap();
    fs::write(&bank, &bytes[..bytes.len() - 1]).unwrap();

    insta::assert_snapshot!(
        res.read(0x19).unwrap_err(),
        @"BANK01 ends before the end of resource 0x19"
    );
}

#[test]
fn corrupted_resource() {
    let (dir, res) = open_game();
    let entry = *res.entry(0x02).unwrap();
    let bank = dir.path().join("BANK01");
    let mut bytes = fs::read(&bank).unwrap();
    let check_low = entry.bank_offset as usize + usize::from(entry.packed_size) - 5;
    bytes[check_low] ^= 1;
    fs::write(&bank, bytes).unwrap();

    insta::assert_snapshot!(
        res.read(0x02).unwrap_err(),
        @"cannot unpack resource 0x02: checksum mismatch: 0x00000001"
    );
}
