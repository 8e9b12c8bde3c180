use battleship_server::{Position, PositionError};

#[test]
fn test_parse_letter_and_row() {
    assert_eq!(Position::parse("A1", 10).unwrap(), Position::new(0, 0));
    assert_eq!(Position::parse("C4", 10).unwrap(), Position::new(3, 2));
    assert_eq!(Position::parse("J10", 10).unwrap(), Position::new(9, 9));
}

#[test]
fn test_parse_is_case_and_space_insensitive() {
    assert_eq!(Position::parse("  b7 ", 10).unwrap(), Position::new(6, 1));
}

#[test]
fn test_display_matches_parse() {
    for text in ["A1", "C4", "J10", "Z26"] {
        let pos = Position::parse(text, 26).unwrap();
        assert_eq!(pos.to_string(), text);
    }
}

#[test]
fn test_parse_rejects_malformed() {
    for text in ["", "1A", "A", "AA1", "A-1", "?3"] {
        assert!(
            matches!(Position::parse(text, 10), Err(PositionError::Malformed(_))),
            "{:?} should be malformed",
            text
        );
    }
}

#[test]
fn test_parse_rejects_out_of_bounds() {
    for text in ["A0", "A11", "K1", "Z26"] {
        assert!(
            matches!(
                Position::parse(text, 10),
                Err(PositionError::OutOfBounds { size: 10, .. })
            ),
            "{:?} should be out of bounds",
            text
        );
    }
}

#[test]
fn test_error_message_names_position() {
    let err = Position::parse("k1", 10).unwrap_err();
    assert!(err.to_string().contains("K1"));
}
