use super::*;
use crate::instruction::*;

fn c(x: i32, y: i32) -> Coordinate {
    Coordinate::new(x, y)
}

fn sample_instructions() -> Vec<Instruction> {
    vec![
        Switch::new(Alignment::X, 2, c(1, 0), Alignment::Y, 2, c(1, 1)).into(),
        Connect::new(PinDirection::Out, "OUT2", 0, c(1, 1), Alignment::X, 2, c(1, 0)).into(),
        Connect::new(PinDirection::In, "IN4", 0, c(1, 1), Alignment::Y, 1, c(0, 1)).into(),
        Switch::new(Alignment::Y, 2, c(1, 1), Alignment::X, 1, c(1, 1)).into(),
        Bind::new("PE_WRAPPER", "IN4", 0, c(1, 1), PinDirection::In).into(),
    ]
}

#[test]
fn test_blocks_are_row_major() {
    let overlay = Overlay::new(2, 3);
    let coords: Vec<_> = overlay.blocks().map(|b| b.coord).collect();
    assert_eq!(coords, vec![c(0, 0), c(1, 0), c(2, 0), c(0, 1), c(1, 1), c(2, 1)]);
    assert_eq!(overlay.block(c(2, 1)).unwrap().coord, c(2, 1));
    assert!(overlay.block(c(3, 0)).is_none());
    assert!(overlay.block(c(0, 2)).is_none());
}

#[test]
fn test_unit_local_offsets() {
    let block = Block::new(c(0, 0));
    assert_eq!(block.sb.local_coord, c(0, 0));
    assert_eq!(block.cb_in.local_coord, c(0, 1));
    assert_eq!(block.cb_out.local_coord, c(1, 0));
    assert_eq!(block.cu.local_coord, c(1, 1));
}

#[test]
fn test_dispatch_by_opcode() {
    let mut overlay = Overlay::new(2, 2);
    for inst in sample_instructions() {
        overlay.push(inst).unwrap();
    }
    assert_eq!(overlay.instruction_count(), 5);

    let b10 = overlay.block(c(1, 0)).unwrap();
    assert_eq!(b10.sb.config.len(), 1);
    assert_eq!(b10.cb_out.config.len(), 1);
    assert!(b10.cb_in.config.is_empty());

    let b01 = overlay.block(c(0, 1)).unwrap();
    assert_eq!(b01.cb_in.config.len(), 1);
    assert!(matches!(
        b01.cb_in.config.iter().next(),
        Some(Instruction::Connect(conn)) if conn.pin_name == "IN4"
    ));

    let b11 = overlay.block(c(1, 1)).unwrap();
    assert_eq!(b11.sb.config.len(), 1);
    assert_eq!(b11.unit(UnitKind::ComputeUnit).config.len(), 1);
}

#[test]
fn test_unit_order_is_insertion_order() {
    let mut overlay = Overlay::new(1, 1);
    let first = Switch::new(Alignment::X, 1, c(0, 0), Alignment::X, 2, c(0, 0));
    let second = Switch::new(Alignment::Y, 3, c(0, 0), Alignment::Y, 4, c(0, 0));
    overlay.push(first.clone().into()).unwrap();
    overlay.push(second.clone().into()).unwrap();

    let sb = &overlay.block(c(0, 0)).unwrap().sb;
    let got: Vec<_> = sb.config.iter().cloned().collect();
    assert_eq!(got, vec![Instruction::from(first), Instruction::from(second)]);
}

#[test]
fn test_same_input_gives_same_overlay() {
    let mut a = Overlay::new(2, 2);
    let mut b = Overlay::new(2, 2);
    for inst in sample_instructions() {
        a.push(inst).unwrap();
    }
    for inst in sample_instructions() {
        b.push(inst).unwrap();
    }
    assert_eq!(a, b);
}

#[test]
fn test_out_of_range() {
    let mut overlay = Overlay::new(2, 2);
    let sw = Switch::new(Alignment::X, 0, c(2, 0), Alignment::X, 0, c(3, 0));
    assert_eq!(
        overlay.push(sw.into()),
        Err(TranslateError::AddressOutOfRange { coord: c(2, 0), rows: 2, cols: 2 })
    );

    let sw = Switch::new(Alignment::Y, 0, c(0, -1), Alignment::Y, 0, c(0, 0));
    assert!(matches!(
        overlay.push(sw.into()),
        Err(TranslateError::AddressOutOfRange { .. })
    ));
    assert_eq!(overlay.instruction_count(), 0);
}

#[test]
fn test_rows_and_cols_are_not_swapped() {
    /* 1 row, 3 columns: x may reach 2, y may not exceed 0 */
    let mut overlay = Overlay::new(1, 3);
    let sw = Switch::new(Alignment::X, 0, c(2, 0), Alignment::X, 0, c(2, 0));
    assert!(overlay.push(sw.into()).is_ok());
    let sw = Switch::new(Alignment::X, 0, c(0, 1), Alignment::X, 0, c(0, 1));
    assert!(overlay.push(sw.into()).is_err());
}

#[test]
fn test_dispatch_offsets() {
    let offsets = DispatchOffsets { connect_in: c(-1, 0), ..Default::default() };
    let mut overlay = Overlay::with_offsets(2, 2, offsets);
    let conn: Instruction =
        Connect::new(PinDirection::In, "IN0", 0, c(1, 1), Alignment::Y, 0, c(1, 1)).into();
    assert_eq!(overlay.dispatch_coord(&conn), Some(c(0, 1)));
    overlay.push(conn).unwrap();
    assert_eq!(overlay.block(c(0, 1)).unwrap().cb_in.config.len(), 1);
    assert!(overlay.block(c(1, 1)).unwrap().cb_in.config.is_empty());
}

#[test]
fn test_dispatch_offset_overflow_is_out_of_range() {
    let offsets = DispatchOffsets { switch: c(1, 0), ..Default::default() };
    let mut overlay = Overlay::with_offsets(2, 2, offsets);
    let sw: Instruction =
        Switch::new(Alignment::X, 0, c(i32::MAX, 0), Alignment::X, 0, c(i32::MAX, 0)).into();
    assert_eq!(overlay.dispatch_coord(&sw), None);
    assert_eq!(
        overlay.push(sw),
        Err(TranslateError::AddressOutOfRange { coord: c(i32::MAX, 0), rows: 2, cols: 2 })
    );
}

#[test]
fn test_validate_size() {
    assert_eq!(Overlay::validate_size(6, 6), Ok(36));
    assert_eq!(Overlay::validate_size(0, 4), Ok(0));
    assert_eq!(Overlay::validate_size(1, MAX_BLOCKS), Ok(MAX_BLOCKS));
    for (rows, cols) in [(1, MAX_BLOCKS + 1), (100_000, 100_000), (usize::MAX, 2)] {
        assert_eq!(
            Overlay::validate_size(rows, cols),
            Err(TranslateError::InvalidArraySize { rows, cols })
        );
    }
    assert!(Overlay::try_with_offsets(2, 3, DispatchOffsets::default()).is_ok());
}
