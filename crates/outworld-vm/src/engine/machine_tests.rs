use outworld_core::{Colors, PARTS, vars};

use super::test_host::{TestHost, asm::*};
use super::{Controls, Machine, PrintTracer, ThreadStatus, Variant};

#[test]
fn power_on_registers() {
    let m = Machine::builder()
        .random_seed(0x1234)
        .variant(Variant::OutOfThisWorld)
        .build();

    assert_eq!(m.register(vars::RANDOM_SEED), 0x1234);
    assert_eq!(m.register(vars::DOS_MARKER), 0x0014);
    assert_eq!(m.register(vars::LANGUAGE), 0x0081);
    for (reg, value) in vars::PROTECTION_PRESETS {
        assert_eq!(m.register(reg), value);
    }
    assert_eq!(m.thread(0).unwrap().current_pc, 0);
    assert_eq!(m.thread(1).unwrap().status(), ThreadStatus::Halted);
}

#[test]
fn power_on_without_protection_bypass() {
    let m = Machine::builder()
        .random_seed(7)
        .bypass_protection(false)
        .build();

    assert_eq!(m.register(vars::LANGUAGE), 0x0001);
    for (reg, _) in vars::PROTECTION_PRESETS {
        assert_eq!(m.register(reg), 0);
    }
}

#[test]
fn set_bytecode_resets_state() {
    let mut m = Machine::builder().random_seed(9).build();
    m.set_bytecode(program(&[init(3, 0), call(0x0008), kill(), yld()]));
    let mut host = TestHost::new();
    m.step(&mut Controls::default(), &mut host).unwrap();
    m.set_register(0x10, 0xbeef);
    assert_eq!(m.stack_depth(), 1);

    m.set_bytecode(program(&[yld()]));

    assert_eq!(m.stack_depth(), 0);
    assert_eq!(m.register(0x10), 0);
    assert_eq!(m.register(vars::RANDOM_SEED), 9);
    assert_eq!(m.thread(0).unwrap().current_pc, 0);
    assert_eq!(m.thread(3).unwrap().requested_pc, 0xffff);
}

#[test]
fn carry_registers_across_segments() {
    let mut m = Machine::builder().carry_registers(true).build();
    m.set_register(0x10, 0xbeef);
    m.enter_part(&PARTS[1], program(&[yld()]));

    assert_eq!(m.register(0x10), 0xbeef);
    assert_eq!(m.part(), Some(PARTS[1].id));
}

#[test]
fn controls_fill_input_registers() {
    let mut m = Machine::builder().build();
    m.set_bytecode(program(&[yld(), jump(0)]));
    let mut host = TestHost::new();
    let mut controls = Controls {
        mask: Controls::DPAD_LEFT | Controls::DPAD_BUTTON,
        horz: -1,
        vert: 1,
        btns: 1,
        input: b'a',
        ..Controls::default()
    };

    m.step(&mut controls, &mut host).unwrap();

    assert_eq!(m.register(vars::HERO_POS_LEFT_RIGHT), 0xffff);
    assert_eq!(m.register(vars::HERO_POS_UP_DOWN), 1);
    assert_eq!(m.register(vars::HERO_POS_JUMP_DOWN), 1);
    assert_eq!(m.register(vars::HERO_POS_MASK), 0x0082);
    assert_eq!(m.register(vars::HERO_ACTION), 1);
    assert_eq!(m.register(vars::HERO_ACTION_POS_MASK), 0x0082);
    assert_eq!(m.register(vars::INPUT_KEY), u16::from(b'a'));
    assert_eq!(controls.input, 0);

    // A key press is seen by one pass only.
    m.step(&mut controls, &mut host).unwrap();
    assert_eq!(m.register(vars::INPUT_KEY), 0);
}

#[test]
fn host_written_registers_are_visible() {
    let mut m = Machine::builder().build();
    m.set_bytecode(program(&[movr(1, vars::MUSIC_MARK), yld()]));
    m.set_register(vars::MUSIC_MARK, 7);
    m.step(&mut Controls::default(), &mut TestHost::new()).unwrap();

    assert_eq!(m.register(1), 7);
}

fn busy_program() -> Vec<u8> {
    program(&[
        init(1, 0x0010),            // 0000
        init(2, 0x0017),            // 0004
        addi(vars::RANDOM_SEED, 3), // 0008
        yld(),                      // 000c
        jump(0x0008),               // 000d
        addr_seed(),                // 0010
        yld(),                      // 0013
        jump(0x0010),               // 0014
        kill(),                     // 0017
    ])
}

/// `addr [20], [random_seed]`
fn addr_seed() -> Vec<u8> {
    vec![0x02, 0x20, vars::RANDOM_SEED]
}

fn run_passes(seed: u16, passes: usize) -> Machine {
    let mut m = Machine::builder().random_seed(seed).build();
    m.set_bytecode(busy_program());
    let mut host = TestHost::new();
    let mut controls = Controls::default();
    for _ in 0..passes {
        m.step(&mut controls, &mut host).unwrap();
    }
    m
}

#[test]
fn execution_is_deterministic() {
    let a = run_passes(0x0042, 5);
    let b = run_passes(0x0042, 5);
    assert_eq!(a.snapshot(), b.snapshot());

    let c = run_passes(0x0043, 5);
    assert_ne!(a.snapshot(), c.snapshot());
}

#[test]
fn snapshot_lists_live_threads() {
    let m = run_passes(0x0042, 2);
    let snapshot = m.snapshot();

    assert_eq!(snapshot.registers.get(vars::RANDOM_SEED), 0x0048);
    insta::assert_snapshot!(
        serde_json::to_string(&snapshot.threads).unwrap(),
        @r#"[{"index":0,"status":"runnable","pc":13,"requested_pc":65535},{"index":1,"status":"runnable","pc":20,"requested_pc":65535}]"#
    );
}

#[test]
fn print_tracer_lists_instructions() {
    let mut m = Machine::builder().build();
    m.set_bytecode(program(&[movi(0, 3), djnz(0, 0x0004), kill()]));
    let mut tracer = PrintTracer::new(Colors::OFF);
    m.step_with(&mut Controls::default(), &mut TestHost::new(), &mut tracer)
        .unwrap();

    insta::assert_snapshot!(tracer.lines().join("\n"), @r"
    pass 0
      #00 0000  movi    [00], 0x0003
      #00 0004  djnz    [00], @0004
      #00 0004  djnz    [00], @0004
      #00 0004  djnz    [00], @0004
      #00 0008  kill
      #00 ---- -> ffff
    ");
}

#[test]
fn paced_run_waits_for_deadline() {
    let mut m = Machine::builder().build();
    m.set_bytecode(program(&[movi(vars::PAUSE_SLICES, 3), yld(), jump(0)]));
    let mut host = TestHost::new();
    let mut controls = Controls::default();

    assert!(m.run(&mut controls, &mut host).unwrap());
    assert_eq!(m.next_deadline(), 60);

    host.now = 30;
    assert!(!m.run(&mut controls, &mut host).unwrap());

    host.now = 60;
    assert!(m.run(&mut controls, &mut host).unwrap());
    assert_eq!(m.next_deadline(), 120);
    assert_eq!(m.passes(), 2);
}

#[test]
fn paced_run_idles_while_paused() {
    let mut m = Machine::builder().build();
    m.set_bytecode(program(&[yld(), jump(0)]));
    let mut host = TestHost::new();
    let mut controls = Controls {
        pause: true,
        ..Controls::default()
    };

    host.now = 200;
    assert!(!m.run(&mut controls, &mut host).unwrap());
    assert_eq!(m.next_deadline(), 300);
    assert_eq!(m.passes(), 0);
}
