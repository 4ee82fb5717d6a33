//! Tests for the disassembler.

use outworld_core::Colors;

use crate::dump::dump;

#[test]
fn dump_countdown() {
    let segment = [
        0x00, 0x00, 0x00, 0x05, // movi [00], 5
        0x09, 0x00, 0x00, 0x04, // djnz [00], @0004
        0x11, // kill
    ];

    insta::assert_snapshot!(dump(&segment, Colors::OFF), @r"
    [segment]
    size = 9

    [code]
      0000  movi    [00], 0x0005
      0004  djnz    [00], @0004
      0008  kill
    ");
}

#[test]
fn dump_operand_forms() {
    let segment = [
        0x0a, 0x80, 0x29, 0x1e, 0x00, 0x10, // cjmp eq reg/reg
        0x0a, 0x44, 0xff, 0x00, 0x0a, 0x00, 0x00, // cjmp lt reg/word
        0x0a, 0x02, 0x3c, 0x07, 0x00, 0x20, // cjmp gt reg/byte
        0x1b, // invalid
        0x80, 0x10, 0x20, 0xd0, // poly2, y clamped to 199
        0x7f, 0x01, 0x00, 0x10, 0x20, // poly1, byte coords, character bank
        0x40, 0x00, 0x08, 0x00, 0x05, 0xff, 0xfe, // poly1, word coords
        0x55, 0x00, 0x01, 0x12, 0x34, 0x56, // poly1, register coords and zoom
        0x0c, 0x01, 0x3f, 0x02, // reset 1..63 halt
        0x00, 0x05, // truncated movi
    ];

    insta::assert_snapshot!(dump(&segment, Colors::OFF), @r"
    [segment]
    size = 48

    [code]
      0000  cjmp    eq [29], [1e], @0010
      0006  cjmp    lt [pause_slices], 0x000a, @0000
      000d  cjmp    gt [random_seed], 7, @0020
      0013  invalid 0x1b
      0014  poly2   0x0020, x=41, y=199, zoom=64
      0018  poly1   0x0200, x=272, y=32, zoom=64 (characters)
      001d  poly1   0x0010, x=5, y=-2, zoom=64
      0024  poly1   0x0002, x=[12], y=[34], zoom=[56]
      002a  reset   1..63 halt
      002e  ; read of 2 byte(s) at 0x0030 runs past end of segment (48 bytes)
    ");
}

#[test]
fn dump_media_instructions() {
    let segment = [
        0x0b, 0x05, 0x00, // palette 5
        0x0d, 0x01, // page 1
        0x0e, 0x02, 0x0f, // fill 2, 15
        0x0f, 0x40, 0x00, // copy 64 -> 0
        0x10, 0xff, // blit 255
        0x12, 0x01, 0x81, 0x0a, 0x14, 0x03, // print
        0x18, 0x00, 0x2a, 0x10, 0x3f, 0x02, // sound
        0x19, 0x3e, 0x82, // loadres
        0x1a, 0x00, 0x07, 0x00, 0x00, 0x00, // music
    ];

    insta::assert_snapshot!(dump(&segment, Colors::OFF), @r"
    [segment]
    size = 34

    [code]
      0000  palette 5
      0003  page    1
      0005  fill    2, 15
      0008  copy    64 -> 0
      000b  blit    255
      000d  print   0x0181, 10, 20, 3
      0013  sound   0x002a, freq=16, vol=63, chan=2
      0019  loadres 0x3e82
      001c  music   0x0007, delay=0, pos=0
    ");
}

#[test]
fn dump_colored_wraps_mnemonic() {
    let out = dump(&[0x06], Colors::ON);
    assert!(out.contains("\x1b[34myield  \x1b[0m"));
    assert!(out.contains("\x1b[2m0000\x1b[0m"));
}

#[test]
fn dump_colored_targets_and_invalid_opcodes() {
    let out = dump(&[0x07, 0x00, 0x04, 0x1b], Colors::ON);
    assert!(out.contains("\x1b[33m@0004\x1b[0m"));
    assert!(out.contains("\x1b[31m0x1b\x1b[0m"));
}
