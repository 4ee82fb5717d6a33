use outworld_bank::pack;

use super::pack::{VerifyError, verify};

#[test]
fn accepts_what_the_loader_reads() {
    let mut data = vec![0x11; 3000];
    data.extend((0..=255u8).cycle().step_by(7).take(900));
    data.extend(vec![0x22; 3000]);

    let packed = pack(&data);
    assert!(packed.len() < data.len());
    verify(&packed, &data).unwrap();
}

#[test]
fn accepts_stored_blocks() {
    let data: Vec<u8> = (0..=255).collect();
    verify(&pack(&data), &data).unwrap();
}

#[test]
fn rejects_blocks_for_other_data() {
    let data = vec![0x33; 2000];
    let other = vec![0x44; 2000];
    let packed = pack(&data);

    assert!(matches!(verify(&packed, &other), Err(VerifyError::Mismatch)));
}

#[test]
fn rejects_damaged_blocks() {
    let data = vec![0x55; 2000];
    let mut packed = pack(&data);
    packed[0] ^= 0xff;

    let err = verify(&packed, &data).unwrap_err();
    assert!(matches!(err, VerifyError::Unpack(_)));
}
