mod common;

use common::{config, Operation, SimChip};
use mcp23017_smbus::{Bank, Bit, Error, Register, RegisterMap, Session};

#[test]
fn alternate_bank_addresses() {
    let chip = SimChip::new();
    let cfg = config("alt-bank-addresses").with_bank(Bank::Bank1);
    let session = Session::init(chip.clone(), &cfg).unwrap();

    assert_eq!(session.address(Register::IODIRB), 0x10);
    assert_eq!(session.address(Register::OLATA), 0x0a);
    assert_eq!(session.register_map(), &RegisterMap::new(Bank::Bank1));
}

#[test]
fn init_sets_iocon_bank_bit() {
    let chip = SimChip::new();
    // IOCON already has MIRROR set; it must survive the bank switch
    {
        use mcp23017_smbus::Smbus;
        let mut raw = chip.clone();
        raw.write_byte_data(0x0a, 0x40).unwrap();
    }
    chip.clear_operations();

    let cfg = config("iocon-bank-bit").with_bank(Bank::Bank1);
    let _session = Session::init(chip.clone(), &cfg).unwrap();

    assert_eq!(
        chip.operations(),
        vec![
            Operation::Bind(0x20),
            Operation::Read(0x0a),
            Operation::Write(0x0a, 0xc0),
        ]
    );
    assert!(chip.is_bank1());
}

#[test]
fn only_the_active_layout_is_valid() {
    let chip = SimChip::new();
    let cfg = config("alt-bank-validity").with_bank(Bank::Bank1);
    let mut session = Session::init(chip.clone(), &cfg).unwrap();
    chip.clear_operations();

    for addr in [0x01, 0x12, 0x13, 0x14, 0x15] {
        assert!(!session.is_valid_register(addr));
        assert!(matches!(
            session.read_register(addr),
            Err(Error::InvalidRegister(a)) if a == addr
        ));
        assert!(matches!(
            session.set_ones(addr, 0x00),
            Err(Error::InvalidRegister(a)) if a == addr
        ));
    }
    assert_eq!(chip.transfer_count(), 0);

    for addr in [0x00, 0x10, 0x09, 0x19, 0x0a, 0x1a] {
        assert!(session.is_valid_register(addr));
    }
}

#[test]
fn pin_operations_use_the_alternate_addresses() {
    let chip = SimChip::new();
    let cfg = config("alt-bank-pins").with_bank(Bank::Bank1);
    let mut session = Session::init(chip.clone(), &cfg).unwrap();
    chip.clear_operations();

    session.set_output_pins(0x00, 0x08).unwrap();
    session.set_bit(Bit::GPB3).unwrap();
    assert_eq!(
        chip.operations(),
        vec![
            // IODIRB
            Operation::Read(0x10),
            Operation::Write(0x10, 0xf7),
            // direction check, OLATB, GPIOB
            Operation::Read(0x10),
            Operation::Read(0x1a),
            Operation::Write(0x19, 0x08),
        ]
    );

    assert_eq!(session.read_port_b().unwrap(), 0x08);
    assert_eq!(chip.peek(0x15), 0x08);
}

#[test]
fn same_scenario_in_both_banks() {
    for bank in [Bank::Bank0, Bank::Bank1] {
        let chip = SimChip::new();
        let cfg = config(&format!("both-banks-{bank:?}")).with_bank(bank);
        let mut session = Session::init(chip.clone(), &cfg).unwrap();

        session.set_output_pins(0x0f, 0x00).unwrap();
        session.set_bit(Bit::GPA2).unwrap();
        session.set_bit(Bit::GPA3).unwrap();
        session.clear_bit(Bit::GPA3).unwrap();

        assert_eq!(session.read_port_a().unwrap(), 0x04, "{bank}");
        assert_eq!(session.read_latch(mcp23017_smbus::Port::A).unwrap(), 0x04);
        assert_eq!(chip.peek(0x00), 0xf0, "{bank}");
    }
}

#[test]
fn reinit_in_bank1_after_revert_keeps_the_latch() {
    let chip = SimChip::new();
    let cfg = config("alt-bank-reinit").with_bank(Bank::Bank1);

    let mut session = Session::init(chip.clone(), &cfg).unwrap();
    session.set_output_pins(0xff, 0xff).unwrap();
    session.write_port_a(0x00).unwrap();
    chip.clear_operations();
    session.revert_bank().unwrap();
    assert_eq!(
        chip.operations(),
        vec![Operation::Read(0x05), Operation::Write(0x05, 0x00)]
    );
    assert!(!chip.is_bank1());
    assert_eq!(session.bank(), Bank::Bank0);
    drop(session);

    let mut session = Session::init(chip.clone(), &cfg).unwrap();
    session.set_output_pins(0xff, 0xff).unwrap();
    assert_eq!(chip.peek(0x14), 0x00);
    assert_eq!(session.read_port_a().unwrap(), 0x00);
    assert!(chip.is_bank1());
}

#[test]
fn revert_keeps_the_other_iocon_bits() {
    let chip = SimChip::new();
    {
        use mcp23017_smbus::Smbus;
        let mut raw = chip.clone();
        raw.write_byte_data(0x0a, 0x44).unwrap();
    }

    let cfg = config("alt-bank-revert-iocon").with_bank(Bank::Bank1);
    let mut session = Session::init(chip.clone(), &cfg).unwrap();
    assert_eq!(chip.peek(0x0a), 0xc4);
    session.revert_bank().unwrap();
    assert_eq!(chip.peek(0x0a), 0x44);

    // bank 0 addresses are valid from now on
    assert_eq!(session.address(Register::OLATA), 0x14);
    session.write_register(0x14, 0x01).unwrap();
    assert_eq!(chip.peek(0x14), 0x01);
}

#[test]
fn revert_on_bank0_or_cleaned_up_session() {
    let chip = SimChip::new();
    let mut session = Session::init(chip.clone(), &config("bank0-revert")).unwrap();
    chip.clear_operations();
    session.revert_bank().unwrap();
    assert_eq!(chip.transfer_count(), 0);

    session.cleanup();
    assert!(matches!(session.revert_bank(), Err(Error::NotInitialized)));
}
