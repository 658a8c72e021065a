//! List framing helpers on top of alloy-rlp

use alloy_primitives::Address;
use alloy_rlp::{Decodable, Header, EMPTY_STRING_CODE};

/// Write a list header for a payload of `payload_length` bytes
pub(crate) fn encode_list_header(payload_length: usize, out: &mut Vec<u8>) {
    Header {
        list: true,
        payload_length,
    }
    .encode(out);
}

/// Encoded length of a list with the given payload length
pub(crate) fn list_length(payload_length: usize) -> usize {
    payload_length + alloy_rlp::length_of_length(payload_length)
}

/// Consume a list header and return the list payload, advancing `buf` past it
pub(crate) fn take_list<'a>(buf: &mut &'a [u8]) -> alloy_rlp::Result<&'a [u8]> {
    let header = Header::decode(buf)?;
    if !header.list {
        return Err(alloy_rlp::Error::UnexpectedString);
    }

    let current: &'a [u8] = *buf;
    if current.len() < header.payload_length {
        return Err(alloy_rlp::Error::InputTooShort);
    }
    let (body, rest) = current.split_at(header.payload_length);
    *buf = rest;
    Ok(body)
}

/// Decode an address that may be encoded as the empty string
pub(crate) fn decode_optional_address(buf: &mut &[u8]) -> alloy_rlp::Result<Option<Address>> {
    if buf.first() == Some(&EMPTY_STRING_CODE) {
        *buf = &buf[1..];
        return Ok(None);
    }
    Address::decode(buf).map(Some)
}
