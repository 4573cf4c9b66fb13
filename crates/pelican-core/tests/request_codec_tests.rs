//! Request codec tests
//!
//! Exercises the substring-marker wire format: port extraction, command
//! priority, filename extraction, and tolerance of client padding.

use pelican_core::{Command, PelicanError, Request, MAX_REQUEST_BYTES};

#[test]
fn test_decode_list_request() {
    let request = Request::decode(b"PORTSTART:4444PORTENDCMD:LIST").unwrap();

    assert_eq!(request.command, Command::List);
    assert_eq!(request.data_port, Some(4444));
    assert_eq!(request.filename, None);
}

#[test]
fn test_decode_get_request() {
    let raw = b"PORTSTART:5000PORTENDGETFILENAME:notes.txtFILENAMEEND";
    let request = Request::decode(raw).unwrap();

    assert_eq!(request.command, Command::Get);
    assert_eq!(request.data_port, Some(5000));
    assert_eq!(request.filename.as_deref(), Some("notes.txt"));
}

#[test]
fn test_decode_unknown_regardless_of_content() {
    for raw in [
        b"PORTSTART:4444PORTENDCMD:UNKNOWN".as_slice(),
        b"complete nonsense".as_slice(),
        b"".as_slice(),
    ] {
        let request = Request::decode(raw).unwrap();
        assert_eq!(request.command, Command::Unknown);
        assert_eq!(request.filename, None);
    }
}

#[test]
fn test_decode_tolerates_padding() {
    // The original client pads every request to the 100-byte cap with '#'
    // and a trailing NUL.
    let mut raw = b"PORTSTART:6001PORTENDCMD:LIST".to_vec();
    while raw.len() < MAX_REQUEST_BYTES - 1 {
        raw.push(b'#');
    }
    raw.push(0);

    let request = Request::decode(&raw).unwrap();
    assert_eq!(request.command, Command::List);
    assert_eq!(request.data_port, Some(6001));
}

#[test]
fn test_decode_list_wins_over_get() {
    let raw = b"PORTSTART:4444PORTENDCMD:LISTGETFILENAME:aFILENAMEEND";
    let request = Request::decode(raw).unwrap();

    assert_eq!(request.command, Command::List);
    assert_eq!(request.filename, None);
}

#[test]
fn test_decode_rejects_bad_port_for_recognized_command() {
    let err = Request::decode(b"PORTSTART:notaportPORTENDCMD:LIST").unwrap_err();
    assert!(matches!(err, PelicanError::Parse(_)));

    let err = Request::decode(b"CMD:LIST").unwrap_err();
    assert!(matches!(err, PelicanError::Parse(_)));
}

#[test]
fn test_decode_rejects_get_without_filename_markers() {
    let err = Request::decode(b"PORTSTART:5000PORTENDCMD:GET").unwrap_err();
    assert!(matches!(err, PelicanError::Parse(_)));
}

#[test]
fn test_encode_produces_fixed_size_request() {
    let raw = Request::get(5000, "notes.txt").encode().unwrap();

    assert_eq!(raw.len(), MAX_REQUEST_BYTES);
    assert_eq!(raw[MAX_REQUEST_BYTES - 1], 0);

    let text = String::from_utf8_lossy(&raw);
    assert!(text.contains("PORTSTART:5000PORTEND"));
    assert!(text.contains("FILENAME:notes.txtFILENAMEEND"));

    // The server must be able to decode its own client's encoding.
    let request = Request::decode(&raw).unwrap();
    assert_eq!(request, Request::get(5000, "notes.txt"));
}

#[test]
fn test_encode_rejects_request_exceeding_wire_cap() {
    // Truncating would eat the FILENAMEEND marker and the server would see
    // a malformed request, so encoding must fail instead.
    let long_name = "n".repeat(200);
    let err = Request::get(5000, long_name).encode().unwrap_err();
    assert!(matches!(err, PelicanError::Protocol(_)));
}

#[test]
fn test_encode_accepts_filename_that_just_fits() {
    // Fixed overhead: PORTSTART:5000PORTEND + CMD:GET + the filename
    // markers leaves room for a 51-byte name inside the 99-byte body.
    let name = "f".repeat(51);
    let raw = Request::get(5000, name.clone()).encode().unwrap();

    assert_eq!(raw.len(), MAX_REQUEST_BYTES);
    let request = Request::decode(&raw).unwrap();
    assert_eq!(request.filename.as_deref(), Some(name.as_str()));
}
