//! Tests for opcode and instruction decoding.

use crate::instruction::{
    CmpOperand, Condition, Coord, DEFAULT_ZOOM, Instruction, PolyBuffer, ResetMode, Zoom,
};
use crate::opcode::Opcode;
use crate::stream::ByteCodeStream;

fn decode(bytes: &[u8]) -> (Instruction, u16) {
    let mut s = ByteCodeStream::new(bytes);
    let instr = Instruction::decode(&mut s).unwrap();
    (instr, s.offset())
}

#[test]
fn opcode_table_is_dense() {
    for v in 0..=255u8 {
        let op = Opcode::from_u8(v);
        assert_eq!(op.to_u8(), v);
        match v {
            0x00..=0x1a => assert!(!matches!(
                op,
                Opcode::Invalid(_) | Opcode::PolyLong(_) | Opcode::PolyShort(_)
            )),
            0x1b..=0x3f => assert_eq!(op, Opcode::Invalid(v)),
            0x40..=0x7f => assert_eq!(op, Opcode::PolyLong(v)),
            0x80..=0xff => assert_eq!(op, Opcode::PolyShort(v)),
        }
    }
}

#[test]
fn only_yield_and_kill_end_a_slice() {
    let yielding: Vec<u8> = (0..=255u8)
        .filter(|&v| Opcode::from_u8(v).yields())
        .collect();
    assert_eq!(yielding, vec![0x06, 0x11]);
}

#[test]
fn decode_arithmetic() {
    assert_eq!(
        decode(&[0x00, 0x10, 0xbe, 0xef]),
        (Instruction::Movi { dst: 0x10, imm: 0xbeef }, 4)
    );
    assert_eq!(
        decode(&[0x13, 0x01, 0x02]),
        (Instruction::Subr { dst: 1, src: 2 }, 3)
    );
    assert_eq!(
        decode(&[0x17, 0x05, 0x00, 0x03]),
        (Instruction::Shri { dst: 5, imm: 3 }, 4)
    );
}

#[test]
fn decode_control_flow() {
    assert_eq!(decode(&[0x04, 0x12, 0x34]), (Instruction::Call { target: 0x1234 }, 3));
    assert_eq!(decode(&[0x05]), (Instruction::Ret, 1));
    assert_eq!(
        decode(&[0x08, 0x3f, 0x00, 0x20]),
        (
            Instruction::Init {
                thread: 0x3f,
                target: 0x20
            },
            4
        )
    );
    assert_eq!(
        decode(&[0x0c, 0x00, 0x3f, 0x01]),
        (
            Instruction::Reset {
                first: 0,
                last: 0x3f,
                mode: ResetMode::Pause
            },
            4
        )
    );
    assert_eq!(
        decode(&[0x0c, 0x00, 0x01, 0x07]).0,
        Instruction::Reset {
            first: 0,
            last: 1,
            mode: ResetMode::Invalid(7)
        }
    );
}

#[test]
fn decode_cjmp_variants() {
    assert_eq!(
        decode(&[0x0a, 0x81, 0x01, 0x02, 0x00, 0x30]),
        (
            Instruction::Cjmp {
                cond: Condition::Ne,
                reg: 1,
                operand: CmpOperand::Reg(2),
                target: 0x30
            },
            6
        )
    );
    assert_eq!(
        decode(&[0x0a, 0x45, 0x01, 0x80, 0x00, 0x00, 0x30]),
        (
            Instruction::Cjmp {
                cond: Condition::Le,
                reg: 1,
                operand: CmpOperand::Word(0x8000),
                target: 0x30
            },
            7
        )
    );
    // Register flag wins over the word flag.
    assert_eq!(
        decode(&[0x0a, 0xc0, 0x01, 0x02, 0x00, 0x30]).0,
        Instruction::Cjmp {
            cond: Condition::Eq,
            reg: 1,
            operand: CmpOperand::Reg(2),
            target: 0x30
        }
    );
    assert_eq!(
        decode(&[0x0a, 0x07, 0x01, 0xff, 0x00, 0x30]).0,
        Instruction::Cjmp {
            cond: Condition::Invalid(7),
            reg: 1,
            operand: CmpOperand::Byte(0xff),
            target: 0x30
        }
    );
}

#[test]
fn conditions_compare_signed() {
    assert_eq!(Condition::Gt.holds(0x7fff, 0x8000u16 as i16), Some(true));
    assert_eq!(Condition::Lt.holds(0x8000u16 as i16, 0x7fff), Some(true));
    assert_eq!(Condition::Ge.holds(-1, -1), Some(true));
    assert_eq!(Condition::Le.holds(0, -1), Some(false));
    assert_eq!(Condition::Invalid(6).holds(0, 0), None);
}

#[test]
fn decode_poly_long_x_forms() {
    // x as byte plus 0x100, y as register, zoom as byte
    assert_eq!(
        decode(&[0x76, 0x00, 0x10, 0x20, 0x05, 0x80]),
        (
            Instruction::Poly {
                opcode: 0x76,
                offset: 0x20,
                x: Coord::Imm(0x120),
                y: Coord::Reg(5),
                zoom: Zoom::Imm(0x80),
                buffer: PolyBuffer::Cinematic,
            },
            6
        )
    );
}

#[test]
fn decode_poly_long_offset_wraps() {
    let (instr, _) = decode(&[0x40, 0x80, 0x01, 0x00, 0x00, 0x00, 0x00]);
    let Instruction::Poly { offset, zoom, .. } = instr else {
        panic!("expected poly, got {instr:?}");
    };
    assert_eq!(offset, 0x0002);
    assert_eq!(zoom, Zoom::Imm(DEFAULT_ZOOM));
}

#[test]
fn decode_poly_short_clamps_y() {
    let (instr, len) = decode(&[0xff, 0xff, 0x00, 0xff]);
    assert_eq!(len, 4);
    assert_eq!(
        instr,
        Instruction::Poly {
            opcode: 0xff,
            offset: 0xfffe,
            x: Coord::Imm(56),
            y: Coord::Imm(199),
            zoom: Zoom::Imm(DEFAULT_ZOOM),
            buffer: PolyBuffer::Cinematic,
        }
    );
}

#[test]
fn decode_truncated_operand_fails() {
    let mut s = ByteCodeStream::new(&[0x18, 0x00, 0x01, 0x02]);
    assert!(Instruction::decode(&mut s).is_err());
}
